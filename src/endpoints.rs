//! The API endpoints URIs.

/// The root route which redirects to the combined report.
pub const ROOT: &str = "/";
/// The route for the searchable, paged list of transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the sales totals of a month.
pub const STATISTICS: &str = "/api/statistics";
/// The route for the price range histogram of a month.
pub const BAR_CHART: &str = "/api/bar_chart";
/// The route for the category counts of a month.
pub const PIE_CHART: &str = "/api/pie_chart";
/// The route for every report at once.
pub const COMBINED_DATA: &str = "/api/combined_data";
/// The route for replacing the collection with a product feed.
pub const INITIALIZE_DB: &str = "/api/initialize_db";
