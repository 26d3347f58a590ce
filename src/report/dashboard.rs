//! The combined view of every report for one month.

use serde::Serialize;

use crate::{
    pagination::PageRequest,
    report::{
        CategoryDistribution, PriceHistogram, Statistics, TransactionPage,
        compute_category_distribution, compute_price_histogram, compute_statistics,
        list_transactions,
    },
    transaction::Transaction,
};

/// Every report in one structure, each with the same shape as its own route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// The searched and paged transaction listing.
    pub transactions: TransactionPage,
    /// Sales totals for the month.
    pub statistics: Statistics,
    /// Transactions per price range for the month.
    pub bar_chart: PriceHistogram,
    /// Transactions per category for the month.
    pub pie_chart: CategoryDistribution,
}

/// Build every report from one snapshot of the collection.
///
/// The statistics and charts each run their own month filter over
/// `transactions`. The listing takes the caller's `search` and `page`
/// and is not filtered by month.
pub fn build_dashboard(
    transactions: &[Transaction],
    month: &str,
    search: &str,
    page: PageRequest,
) -> Dashboard {
    Dashboard {
        transactions: list_transactions(transactions, search, page),
        statistics: compute_statistics(transactions, month),
        bar_chart: compute_price_histogram(transactions, month),
        pie_chart: compute_category_distribution(transactions, month),
    }
}
