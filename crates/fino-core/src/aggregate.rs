//! Category aggregation
//!
//! Grouping and totalling are separate passes: `group_by_category` only
//! buckets, and the reducers below filter a bucket by type and sum it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionType};

/// Bucket key for transactions without a category
pub const UNCATEGORIZED: &str = "uncategorized";

/// Category label -> transactions with that label, in input order
pub type CategoryBuckets = HashMap<String, Vec<Transaction>>;

/// Total of one transaction type within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: usize,
}

/// Bucket key for a transaction
pub fn category_key(tx: &Transaction) -> &str {
    let category = tx.category.trim();
    if category.is_empty() {
        UNCATEGORIZED
    } else {
        category
    }
}

/// Group transactions by category in a single pass
///
/// Relative order inside each bucket matches the input. Transactions with
/// a blank category land in [`UNCATEGORIZED`].
pub fn group_by_category(transactions: &[Transaction]) -> CategoryBuckets {
    let mut buckets: CategoryBuckets = HashMap::new();
    for tx in transactions {
        buckets
            .entry(category_key(tx).to_string())
            .or_default()
            .push(tx.clone());
    }
    buckets
}

/// Sum of absolute amounts of one type
pub fn total_by_type(transactions: &[Transaction], transaction_type: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| t.amount.abs())
        .sum()
}

/// Per-category totals for one type, largest first
///
/// Categories with no transaction of the requested type are left out.
/// Ties are broken by category name so the output is stable.
pub fn category_totals(
    buckets: &CategoryBuckets,
    transaction_type: TransactionType,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = buckets
        .iter()
        .filter_map(|(category, txns)| {
            let count = txns
                .iter()
                .filter(|t| t.transaction_type == transaction_type)
                .count();
            if count == 0 {
                return None;
            }
            Some(CategoryTotal {
                category: category.clone(),
                amount: total_by_type(txns, transaction_type),
                count,
            })
        })
        .collect();

    totals.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Category with the largest total for a type
pub fn largest_category(
    buckets: &CategoryBuckets,
    transaction_type: TransactionType,
) -> Option<CategoryTotal> {
    category_totals(buckets, transaction_type).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wire::parse_datetime;

    fn tx(id: &str, category: &str, amount: f64, transaction_type: TransactionType) -> Transaction {
        let date = parse_datetime("2024-01-01 00:00:00").unwrap();
        Transaction {
            id: id.to_string(),
            user_id: "u".to_string(),
            date,
            amount,
            reason: format!("tx {}", id),
            category: category.to_string(),
            transaction_type,
            created_at: date,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", "Food", 20.0, TransactionType::Expense),
            tx("2", "Salary", 3000.0, TransactionType::Income),
            tx("3", "Food", 35.5, TransactionType::Expense),
            tx("4", "", 5.0, TransactionType::Expense),
            tx("5", "Rent", 1200.0, TransactionType::Expense),
            tx("6", "Food", 10.0, TransactionType::Income),
            tx("7", "   ", 1.0, TransactionType::Income),
        ]
    }

    fn mixed(n: usize) -> Vec<Transaction> {
        const CATEGORIES: [&str; 5] = ["Food", "", "Rent", " ", "Travel"];
        (0..n)
            .map(|i| {
                let transaction_type = if i % 3 == 0 {
                    TransactionType::Income
                } else {
                    TransactionType::Expense
                };
                tx(
                    &i.to_string(),
                    CATEGORIES[i % CATEGORIES.len()],
                    1.0 + i as f64,
                    transaction_type,
                )
            })
            .collect()
    }

    #[test]
    fn test_group_keeps_every_transaction_once() {
        for n in [0, 1, 8, 9, 25] {
            let input = mixed(n);
            let buckets = group_by_category(&input);

            let bucketed: usize = buckets.values().map(Vec::len).sum();
            assert_eq!(bucketed, n, "n={}", n);

            let mut ids: Vec<String> = buckets
                .values()
                .flat_map(|b| b.iter().map(|t| t.id.clone()))
                .collect();
            ids.sort();
            let mut expected: Vec<String> = input.iter().map(|t| t.id.clone()).collect();
            expected.sort();
            assert_eq!(ids, expected, "n={}", n);

            for (category, txns) in &buckets {
                assert!(!category.trim().is_empty(), "n={}", n);
                assert!(txns.iter().all(|t| category_key(t) == category));
            }

            let blank = input.iter().filter(|t| t.category.trim().is_empty()).count();
            let uncategorized = buckets.get(UNCATEGORIZED).map_or(0, Vec::len);
            assert_eq!(uncategorized, blank, "n={}", n);
        }
    }

    #[test]
    fn test_group_preserves_order_within_bucket() {
        let buckets = group_by_category(&sample());
        let food: Vec<&str> = buckets["Food"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(food, vec!["1", "3", "6"]);
    }

    #[test]
    fn test_blank_category_is_uncategorized() {
        let buckets = group_by_category(&sample());
        assert_eq!(buckets[UNCATEGORIZED].len(), 2);
        assert!(!buckets.contains_key(""));
    }

    #[test]
    fn test_group_empty_input() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn test_category_totals_filter_by_type() {
        let buckets = group_by_category(&sample());

        let expenses = category_totals(&buckets, TransactionType::Expense);
        assert_eq!(expenses[0].category, "Rent");
        assert_eq!(expenses[1].category, "Food");
        assert_eq!(expenses[1].amount, 55.5);
        assert_eq!(expenses[1].count, 2);
        assert!(expenses.iter().all(|t| t.category != "Salary"));

        let income = category_totals(&buckets, TransactionType::Income);
        assert_eq!(income[0].category, "Salary");
        assert!(income.iter().any(|t| t.category == "Food" && t.amount == 10.0));
    }

    #[test]
    fn test_totals_use_absolute_amounts() {
        let txns = vec![
            tx("1", "A", -40.0, TransactionType::Expense),
            tx("2", "A", 10.0, TransactionType::Expense),
        ];
        assert_eq!(total_by_type(&txns, TransactionType::Expense), 50.0);
        assert_eq!(total_by_type(&txns, TransactionType::Income), 0.0);
    }

    #[test]
    fn test_largest_category() {
        let buckets = group_by_category(&sample());
        let largest = largest_category(&buckets, TransactionType::Expense).unwrap();
        assert_eq!(largest.category, "Rent");
        assert_eq!(largest.amount, 1200.0);

        let none = largest_category(&group_by_category(&[]), TransactionType::Expense);
        assert!(none.is_none());
    }
}
