//! Domain models for Fino
//!
//! Wire shapes follow the budget API: transactions carry a positive `amount`
//! and a `type` tag, and date-times are exchanged as `YYYY-MM-DD HH:MM:SS`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[serde(alias = "Expense", alias = "EXPENSE")]
    Expense,
    #[serde(alias = "Income", alias = "INCOME")]
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// Sign used when presenting an amount (`-` for expenses)
    pub fn sign(&self) -> &'static str {
        match self {
            Self::Expense => "-",
            Self::Income => "+",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "wire::string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "wire::string_or_number")]
    pub user_id: String,
    #[serde(with = "wire::datetime")]
    pub date: NaiveDateTime,
    /// Always positive; direction lives in `transaction_type`
    pub amount: f64,
    pub reason: String,
    /// Assigned by the categorizer at creation time. Empty when the source
    /// omitted it.
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(with = "wire::datetime")]
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// Current and previous period totals plus the period's transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    #[serde(deserialize_with = "wire::string_or_number")]
    pub user_id: String,
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    #[serde(default)]
    pub previous_balance: f64,
    #[serde(default)]
    pub previous_income: f64,
    #[serde(default)]
    pub previous_expense: f64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl TransactionSummary {
    /// Net savings for the current period
    pub fn net_savings(&self) -> f64 {
        self.income - self.expense
    }

    /// Whether `balance == income - expense` (to the cent)
    ///
    /// The engine trusts the source and never re-derives the balance; this is
    /// for validating fixtures.
    pub fn is_consistent(&self) -> bool {
        (self.balance - self.net_savings()).abs() < 0.005
    }
}

/// Headline numbers of a budget report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expense: f64,
    #[serde(default)]
    pub net_savings: f64,
}

/// Server-generated budget report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    #[serde(default)]
    pub summary: ReportSummary,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// Response of the report endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReportResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budget_report: BudgetReport,
}

/// Create payload sent to the transaction store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: String,
    #[serde(with = "wire::datetime")]
    pub date: NaiveDateTime,
    pub reason: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    #[serde(with = "wire::datetime")]
    pub created_at: NaiveDateTime,
}

/// Request body for the categorizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub reason: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// Categorizer response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub category: String,
}

/// Helpers for the budget API's wire formats
pub mod wire {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    /// Format used when sending date-times
    pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Parse any of the date-time shapes the API and users produce
    ///
    /// Accepts `YYYY-MM-DD HH:MM:SS`, ISO-8601 with `T` (optional fraction,
    /// optional `Z`/offset) and a bare `YYYY-MM-DD` (midnight).
    pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }
        for fmt in [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
        ] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub mod datetime {
        use super::*;
        use serde::Serializer;

        pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&value.format(DATETIME_FORMAT).to_string())
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            parse_datetime(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time '{}'", raw)))
        }
    }

    /// Ids arrive as strings from some deployments and integers from others
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Int(n) => n.to_string(),
        })
    }
}
