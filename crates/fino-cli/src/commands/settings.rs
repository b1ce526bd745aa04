//! Effective configuration display

use std::path::Path;

use anyhow::Result;
use fino_core::{config::default_config_path, CacheBackend, FinoConfig};

pub fn cmd_config(config: &FinoConfig, explicit_path: Option<&Path>) -> Result<()> {
    let source = match explicit_path {
        Some(path) => path.display().to_string(),
        None => match default_config_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };
    print!("{}", render_config(config, &source));
    Ok(())
}

pub fn render_config(config: &FinoConfig, source: &str) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("⚙️  Fino Configuration\n");
    out.push_str("   ─────────────────────────────────────────────────────────────\n");
    out.push_str(&format!("   Source:        {}\n", source));
    out.push_str(&format!(
        "   API:           {} (timeout {}s)\n",
        config.api.base_url,
        config.api.timeout.as_secs()
    ));
    out.push_str(&format!(
        "   Categorizer:   {}{}\n",
        config.categorizer.backend,
        config
            .categorizer
            .base_url
            .as_deref()
            .map(|url| format!(" at {}", url))
            .unwrap_or_default()
    ));
    out.push_str(&format!("   Page size:     {}\n", config.page_size));

    let cache = match config.cache.backend {
        CacheBackend::Memory => "memory".to_string(),
        CacheBackend::File => match config.cache_dir() {
            Some(dir) => format!("file ({})", dir.display()),
            None => "file (no cache directory)".to_string(),
        },
    };
    out.push_str(&format!("   Cache:         {}\n", cache));
    out.push('\n');
    out
}
