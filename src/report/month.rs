//! Selecting transactions by a month token.

use crate::transaction::Transaction;

/// Returns the transactions whose `date_of_sale` contains `month` as a substring.
///
/// This is a plain text match, not a calendar match. The token is compared
/// against whatever text the feed stored, so `"03"` selects
/// `"2021-03-01"` but also `"2021-11-03"`, and `"1"` selects almost every
/// date. The empty token matches every transaction. Case matters and `%`
/// or `_` in the token are ordinary characters.
///
/// An unmatched token is not an error; the result is simply empty.
pub fn match_month_by_substring<'a>(
    transactions: &'a [Transaction],
    month: &str,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.date_of_sale.contains(month))
        .collect()
}
