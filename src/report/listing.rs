//! Free text search and pagination over the transaction collection.

use serde::{Deserialize, Serialize};

use crate::{
    pagination::{PageRequest, page_count},
    transaction::Transaction,
};

/// One page of transactions along with where it sits in the full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// The 1-indexed page number.
    pub page: u64,
    /// The requested page size.
    pub per_page: u64,
    /// The number of transactions matching the search across all pages.
    pub total_count: u64,
    /// The number of pages needed to show every matching transaction.
    pub page_count: u64,
    /// The transactions on this page, in store order.
    pub transactions: Vec<Transaction>,
}

/// Search the transactions and return the requested page of matches.
///
/// An empty `search` matches everything. Otherwise a transaction matches if
/// `search` appears, ignoring case, in its title, its description or its
/// price as text (see [format_price_for_search]).
///
/// A page past the last match is empty rather than an error.
pub fn list_transactions(
    transactions: &[Transaction],
    search: &str,
    page: PageRequest,
) -> TransactionPage {
    let needle = search.to_lowercase();

    let matches: Vec<Transaction> = if needle.is_empty() {
        transactions.to_vec()
    } else {
        transactions
            .iter()
            .filter(|transaction| matches_search(transaction, &needle))
            .cloned()
            .collect()
    };

    let total_count = matches.len() as u64;

    TransactionPage {
        page: page.page(),
        per_page: page.per_page(),
        total_count,
        page_count: page_count(total_count, page.per_page()),
        transactions: page.slice(&matches),
    }
}

/// `needle` must already be lowercase.
fn matches_search(transaction: &Transaction, needle: &str) -> bool {
    transaction.title.to_lowercase().contains(needle)
        || transaction.description.to_lowercase().contains(needle)
        || format_price_for_search(transaction.price).contains(needle)
}

/// Render a price the way it is compared against search text.
///
/// This is the shortest text that parses back to the same `f64`, with a
/// trailing `.0` on whole numbers: `50.0`, `329.85`, `0.30000000000000004`.
/// Very large or small values use exponent form (`1e16`).
pub fn format_price_for_search(price: f64) -> String {
    format!("{price:?}")
}
