//! Sales totals for a month.

use serde::{Deserialize, Serialize};

use crate::{report::match_month_by_substring, transaction::Transaction};

/// Sales totals over the transactions that match a month token.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// The sum of the prices of sold products.
    pub total_sale_amount: f64,
    /// The number of sold products.
    pub total_sold_items: u64,
    /// The number of products that did not sell.
    pub total_not_sold_items: u64,
}

/// Compute the sales totals for the transactions matching `month`.
///
/// No rounding is applied to the sale amount. An empty selection gives all
/// zeros.
pub fn compute_statistics(transactions: &[Transaction], month: &str) -> Statistics {
    match_month_by_substring(transactions, month)
        .into_iter()
        .fold(Statistics::default(), |mut statistics, transaction| {
            if transaction.sold {
                statistics.total_sale_amount += transaction.price;
                statistics.total_sold_items += 1;
            } else {
                statistics.total_not_sold_items += 1;
            }

            statistics
        })
}
