//! The reporting engine.
//!
//! Every report is a pure function over a snapshot of the transaction
//! collection. The month based reports select transactions with
//! [match_month_by_substring], and the dashboard combines all of them.

mod category;
mod dashboard;
mod handlers;
mod histogram;
mod listing;
mod month;
mod statistics;

pub use category::{CategoryDistribution, compute_category_distribution};
pub use dashboard::{Dashboard, build_dashboard};
pub use handlers::{
    DashboardQuery, ListingQuery, MonthQuery, ReportState, get_bar_chart, get_combined_data,
    get_pie_chart, get_statistics, get_transactions,
};
pub use histogram::{PriceBucket, PriceHistogram, compute_price_histogram};
pub use listing::{TransactionPage, format_price_for_search, list_transactions};
pub use month::match_month_by_substring;
pub use statistics::{Statistics, compute_statistics};
