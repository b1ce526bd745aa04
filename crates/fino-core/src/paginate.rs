//! Per-view pagination of transaction lists

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionType};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// One of the three independently paged transaction lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    All,
    Expenses,
    Income,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::All => "all",
            View::Expenses => "expenses",
            View::Income => "income",
        }
    }

    pub fn all() -> &'static [View] {
        &[View::All, View::Expenses, View::Income]
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(View::All),
            "expenses" | "expense" => Ok(View::Expenses),
            "income" => Ok(View::Income),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

/// Number of pages for `count` items, never less than 1
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Slice out 1-based `page`
///
/// Does not clamp: page 0, a page past the end, or a zero page size all
/// give an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Current page of each view
///
/// Every counter moves on its own; nothing here touches another view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursors {
    pub all: usize,
    pub expenses: usize,
    pub income: usize,
}

impl Default for PageCursors {
    fn default() -> Self {
        Self {
            all: 1,
            expenses: 1,
            income: 1,
        }
    }
}

impl PageCursors {
    pub fn get(&self, view: View) -> usize {
        match view {
            View::All => self.all,
            View::Expenses => self.expenses,
            View::Income => self.income,
        }
    }

    fn slot(&mut self, view: View) -> &mut usize {
        match view {
            View::All => &mut self.all,
            View::Expenses => &mut self.expenses,
            View::Income => &mut self.income,
        }
    }

    /// Jump to `page`, clamped to `[1, total_pages]`
    pub fn set(&mut self, view: View, page: usize, total_pages: usize) -> usize {
        let clamped = page.clamp(1, total_pages.max(1));
        *self.slot(view) = clamped;
        clamped
    }

    pub fn next(&mut self, view: View, total_pages: usize) -> usize {
        let current = self.get(view);
        self.set(view, current.saturating_add(1), total_pages)
    }

    pub fn previous(&mut self, view: View, total_pages: usize) -> usize {
        let current = self.get(view);
        self.set(view, current.saturating_sub(1), total_pages)
    }
}

/// One rendered page of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub view: View,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<Transaction>,
}

impl PageView {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// The three views over one transaction list
///
/// `all` is sorted by date descending; `expenses` and `income` are filtered
/// from that sorted list so every tab shows the same ordering.
#[derive(Debug, Clone)]
pub struct TransactionViews {
    all: Vec<Transaction>,
    expenses: Vec<Transaction>,
    income: Vec<Transaction>,
    page_size: usize,
}

impl TransactionViews {
    pub fn new(transactions: &[Transaction], page_size: usize) -> Self {
        let mut all = transactions.to_vec();
        // Stable: same-date rows keep their source order
        all.sort_by(|a, b| b.date.cmp(&a.date));

        let expenses = filter_type(&all, TransactionType::Expense);
        let income = filter_type(&all, TransactionType::Income);

        Self {
            all,
            expenses,
            income,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn items(&self, view: View) -> &[Transaction] {
        match view {
            View::All => &self.all,
            View::Expenses => &self.expenses,
            View::Income => &self.income,
        }
    }

    pub fn total_pages(&self, view: View) -> usize {
        total_pages(self.items(view).len(), self.page_size)
    }

    /// Render `page` of `view` without clamping
    pub fn page(&self, view: View, page: usize) -> PageView {
        let items = self.items(view);
        PageView {
            view,
            page,
            total_pages: total_pages(items.len(), self.page_size),
            total_items: items.len(),
            items: paginate(items, page, self.page_size).to_vec(),
        }
    }

    /// Render the page each cursor points at
    pub fn page_for(&self, view: View, cursors: &PageCursors) -> PageView {
        self.page(view, cursors.get(view))
    }
}

fn filter_type(sorted: &[Transaction], transaction_type: TransactionType) -> Vec<Transaction> {
    sorted
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .cloned()
        .collect()
}
