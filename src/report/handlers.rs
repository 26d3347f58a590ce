//! Report HTTP handlers.
//!
//! Each handler reads one snapshot of the collection and computes its report
//! from that snapshot after releasing the database lock.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::lock_connection,
    pagination::{PageRequest, PaginationConfig},
    report::{
        CategoryDistribution, Dashboard, PriceHistogram, Statistics, TransactionPage,
        build_dashboard, compute_category_distribution, compute_price_histogram,
        compute_statistics, list_transactions,
    },
    transaction::{Transaction, get_all_transactions},
};

/// The state needed for the report routes.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the paging of the transaction listing.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the month based reports.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// Matched against the sale date as a substring. Absent matches everything.
    pub month: Option<String>,
}

/// The query parameters for the transaction listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// The 1-indexed page number.
    pub page: Option<u64>,
    /// The number of transactions per page.
    pub per_page: Option<u64>,
    /// Text to look for in the title, description or price.
    pub search: Option<String>,
}

/// The query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Matched against the sale date as a substring. Absent matches everything.
    pub month: Option<String>,
    /// The 1-indexed page number of the listing.
    pub page: Option<u64>,
    /// The number of transactions per page of the listing.
    pub per_page: Option<u64>,
    /// Text to look for in the listing.
    pub search: Option<String>,
}

/// A route handler for a searchable, paged list of transactions.
pub async fn get_transactions(
    State(state): State<ReportState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<TransactionPage>, Error> {
    let Query(query) = query.map_err(invalid_query)?;
    let page = PageRequest::new(query.page, query.per_page, &state.pagination_config)?;

    let transactions = read_snapshot(&state.db_connection)?;

    Ok(Json(list_transactions(
        &transactions,
        query.search.as_deref().unwrap_or_default(),
        page,
    )))
}

/// A route handler for the sales totals of a month.
pub async fn get_statistics(
    State(state): State<ReportState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Statistics>, Error> {
    let Query(query) = query.map_err(invalid_query)?;

    let transactions = read_snapshot(&state.db_connection)?;

    Ok(Json(compute_statistics(
        &transactions,
        query.month.as_deref().unwrap_or_default(),
    )))
}

/// A route handler for the price range histogram of a month.
pub async fn get_bar_chart(
    State(state): State<ReportState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<PriceHistogram>, Error> {
    let Query(query) = query.map_err(invalid_query)?;

    let transactions = read_snapshot(&state.db_connection)?;

    Ok(Json(compute_price_histogram(
        &transactions,
        query.month.as_deref().unwrap_or_default(),
    )))
}

/// A route handler for the category counts of a month.
pub async fn get_pie_chart(
    State(state): State<ReportState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<CategoryDistribution>, Error> {
    let Query(query) = query.map_err(invalid_query)?;

    let transactions = read_snapshot(&state.db_connection)?;

    Ok(Json(compute_category_distribution(
        &transactions,
        query.month.as_deref().unwrap_or_default(),
    )))
}

/// A route handler for every report at once.
///
/// All reports are computed from the same snapshot. If the snapshot cannot
/// be read, no report is returned.
pub async fn get_combined_data(
    State(state): State<ReportState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<Dashboard>, Error> {
    let Query(query) = query.map_err(invalid_query)?;
    let page = PageRequest::new(query.page, query.per_page, &state.pagination_config)?;

    let transactions = read_snapshot(&state.db_connection)?;

    Ok(Json(build_dashboard(
        &transactions,
        query.month.as_deref().unwrap_or_default(),
        query.search.as_deref().unwrap_or_default(),
        page,
    )))
}

fn invalid_query(rejection: QueryRejection) -> Error {
    Error::InvalidParameter(rejection.body_text())
}

/// The lock is released before returning.
fn read_snapshot(db_connection: &Mutex<Connection>) -> Result<Vec<Transaction>, Error> {
    let connection = lock_connection(db_connection)?;

    get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not read transactions: {error}"))
}
