//! Keyword categorizer
//!
//! Maps well-known words in the description to a category. Used when no
//! categorization service is configured and in tests, where its call
//! counter shows whether the pipeline reached the categorize stage.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::TransactionType;

use super::Categorizer;

/// Category for an expense nothing matched
pub const FALLBACK_EXPENSE_CATEGORY: &str = "Other";

/// Category for income nothing matched
pub const FALLBACK_INCOME_CATEGORY: &str = "Other Income";

/// Keyword-based categorizer
#[derive(Clone, Default)]
pub struct KeywordCategorizer {
    calls: Arc<AtomicUsize>,
    /// When set, every call fails with this message
    failure: Option<String>,
}

impl KeywordCategorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A categorizer whose every call fails
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            failure: Some(message.to_string()),
        }
    }

    /// Number of categorize calls made so far (shared across clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Pure keyword lookup
pub fn categorize_by_keyword(reason: &str, transaction_type: TransactionType) -> &'static str {
    let r = reason.to_uppercase();
    match transaction_type {
        TransactionType::Income => match r.as_str() {
            m if m.contains("SALARY") || m.contains("PAYROLL") || m.contains("WAGE") => "Salary",
            m if m.contains("FREELANCE") || m.contains("INVOICE") || m.contains("CLIENT") => {
                "Freelance"
            }
            m if m.contains("DIVIDEND") || m.contains("INTEREST") => "Investments",
            m if m.contains("REFUND") || m.contains("CASHBACK") => "Refunds",
            m if m.contains("GIFT") => "Gifts",
            _ => FALLBACK_INCOME_CATEGORY,
        },
        TransactionType::Expense => match r.as_str() {
            m if m.contains("NETFLIX") || m.contains("SPOTIFY") || m.contains("SUBSCRIPTION") => {
                "Subscriptions"
            }
            m if m.contains("RENT") || m.contains("MORTGAGE") => "Housing",
            m if m.contains("GROCER") || m.contains("SUPERMARKET") || m.contains("WHOLE FOODS") => {
                "Groceries"
            }
            m if m.contains("RESTAURANT")
                || m.contains("COFFEE")
                || m.contains("STARBUCKS")
                || m.contains("LUNCH")
                || m.contains("DINNER") =>
            {
                "Dining"
            }
            m if m.contains("UBER")
                || m.contains("TAXI")
                || m.contains("FUEL")
                || m.contains("GAS STATION")
                || m.contains("BUS") =>
            {
                "Transport"
            }
            m if m.contains("ELECTRIC") || m.contains("WATER BILL") || m.contains("INTERNET") => {
                "Utilities"
            }
            m if m.contains("PHARMACY") || m.contains("DOCTOR") || m.contains("GYM") => "Health",
            m if m.contains("AMAZON") || m.contains("SHOP") => "Shopping",
            _ => FALLBACK_EXPENSE_CATEGORY,
        },
    }
}

#[async_trait]
impl Categorizer for KeywordCategorizer {
    async fn categorize(
        &self,
        reason: &str,
        _amount: f64,
        transaction_type: TransactionType,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.failure {
            return Err(Error::Categorization(message.clone()));
        }
        Ok(categorize_by_keyword(reason, transaction_type).to_string())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(
            categorize_by_keyword("Whole Foods run", TransactionType::Expense),
            "Groceries"
        );
        assert_eq!(
            categorize_by_keyword("monthly rent", TransactionType::Expense),
            "Housing"
        );
        assert_eq!(
            categorize_by_keyword("Payroll deposit", TransactionType::Income),
            "Salary"
        );
        assert_eq!(
            categorize_by_keyword("mystery", TransactionType::Expense),
            FALLBACK_EXPENSE_CATEGORY
        );
        assert_eq!(
            categorize_by_keyword("mystery", TransactionType::Income),
            FALLBACK_INCOME_CATEGORY
        );
    }

    #[tokio::test]
    async fn test_calls_are_counted_across_clones() {
        let categorizer = KeywordCategorizer::new();
        let handle = categorizer.clone();
        categorizer
            .categorize("coffee", 4.0, TransactionType::Expense)
            .await
            .unwrap();
        assert_eq!(handle.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_categorizer() {
        let categorizer = KeywordCategorizer::failing("service down");
        let err = categorizer
            .categorize("coffee", 4.0, TransactionType::Expense)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Categorization(_)));
        assert_eq!(categorizer.calls(), 1);
    }
}
