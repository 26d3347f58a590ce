//! Bulk replacement of the transaction collection from the external product feed.
//!
//! The feed is a JSON array of product objects. Seeding validates every
//! record before touching the database, then swaps the whole collection in
//! one SQL transaction with [replace_all_transactions].

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    db::lock_connection,
    transaction::{Transaction, TransactionBuilder, replace_all_transactions},
};

/// One product as it appears in the external feed.
///
/// Feed fields that the store does not keep, such as `id` and `image`, are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    /// The product name.
    pub title: String,
    /// A free text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// A short label for the kind of product.
    pub category: String,
    /// When the product was sold, kept as text.
    pub date_of_sale: String,
    /// Whether the product was sold.
    pub sold: bool,
}

impl SeedRecord {
    /// Check the record can be stored and convert it into a [TransactionBuilder].
    ///
    /// # Errors
    /// Returns [Error::InvalidSeedData] if the price is negative or not a finite number.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidSeedData(format!(
                "\"{}\" has an invalid price {}, prices must be non-negative numbers",
                self.title, self.price
            )));
        }

        Ok(Transaction::build(&self.title, self.price, &self.date_of_sale)
            .description(&self.description)
            .category(&self.category)
            .sold(self.sold))
    }
}

/// Parse the JSON text of a product feed.
///
/// # Errors
/// Returns [Error::InvalidSeedData] if `json` is not an array of product objects.
pub fn parse_seed_records(json: &str) -> Result<Vec<SeedRecord>, Error> {
    serde_json::from_str(json).map_err(|error| Error::InvalidSeedData(error.to_string()))
}

/// Download a product feed from `url` and parse it.
///
/// # Errors
/// Returns [Error::FeedUnavailable] if the request fails or the response
/// status is not a success, or [Error::InvalidSeedData] if the body is not a
/// product feed.
pub async fn fetch_seed_records(url: &str) -> Result<Vec<SeedRecord>, Error> {
    tracing::debug!("Fetching product feed from {url}");

    let response = reqwest::get(url)
        .await
        .map_err(|error| Error::FeedUnavailable(format!("could not fetch {url}: {error}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::FeedUnavailable(format!("{url} responded with {status}")));
    }

    let feed = response
        .text()
        .await
        .map_err(|error| Error::FeedUnavailable(format!("could not read {url}: {error}")))?;

    parse_seed_records(&feed)
}

/// Replace the stored collection with `records`.
///
/// Every record is validated first, so an invalid feed leaves the store untouched.
/// Returns the number of stored transactions.
///
/// # Errors
/// Returns [Error::InvalidSeedData] for an invalid record, or
/// [Error::StoreUnavailable] if the database could not be written.
pub fn seed_transactions(records: Vec<SeedRecord>, connection: &Connection) -> Result<usize, Error> {
    let builders = records
        .into_iter()
        .map(SeedRecord::into_builder)
        .collect::<Result<Vec<_>, Error>>()?;

    let count = replace_all_transactions(builders, connection)
        .inspect_err(|error| tracing::error!("could not replace transactions: {error}"))?;

    tracing::info!("Seeded the database with {count} transactions");

    Ok(count)
}

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body for a successful seed.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedSummary {
    /// A human readable confirmation.
    pub message: String,
    /// The number of transactions now in the store.
    pub count: usize,
}

/// A route handler that replaces the collection with the feed in the request body.
pub async fn initialize_db_endpoint(
    State(state): State<SeedState>,
    body: Result<Json<Vec<SeedRecord>>, JsonRejection>,
) -> Result<Json<SeedSummary>, Error> {
    let Json(records) = body.map_err(|rejection| Error::InvalidSeedData(rejection.body_text()))?;

    let connection = lock_connection(&state.db_connection)?;

    let count = seed_transactions(records, &connection)?;

    Ok(Json(SeedSummary {
        message: "Database initialized with seed data".to_owned(),
        count,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use rusqlite::Connection;
    use tokio::net::TcpListener;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            Transaction, count_transactions, create_transaction, get_all_transactions,
            seed::{SeedRecord, fetch_seed_records, parse_seed_records, seed_transactions},
        },
    };

    const FEED: &str = r#"[
        {
            "id": 1,
            "title": "Fjallraven  Foldsack No 1 Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://example.com/backpack.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        },
        {
            "id": 2,
            "title": "Mens Casual Slim Fit",
            "price": 15.99,
            "description": "The color could be slightly different",
            "category": "men's clothing",
            "image": "https://example.com/shirt.jpg",
            "sold": true,
            "dateOfSale": "2021-10-27T20:29:54+05:30"
        }
    ]"#;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn parses_feed_and_ignores_unknown_fields() {
        let records = parse_seed_records(FEED).expect("Could not parse feed");

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            SeedRecord {
                title: "Mens Casual Slim Fit".to_owned(),
                description: "The color could be slightly different".to_owned(),
                price: 15.99,
                category: "men's clothing".to_owned(),
                date_of_sale: "2021-10-27T20:29:54+05:30".to_owned(),
                sold: true,
            }
        );
    }

    #[test]
    fn parse_fails_on_malformed_feed() {
        let result = parse_seed_records(r#"{"title": "not an array"}"#);

        assert!(matches!(result, Err(Error::InvalidSeedData(_))));
    }

    #[test]
    fn seed_replaces_existing_transactions() {
        let conn = get_test_connection();
        create_transaction(Transaction::build("stale", 1.0, "2020-01-01"), &conn).unwrap();

        let count = seed_transactions(parse_seed_records(FEED).unwrap(), &conn)
            .expect("Could not seed transactions");

        assert_eq!(count, 2);
        let transactions = get_all_transactions(&conn).unwrap();
        assert_eq!(transactions[0].id, 1);
        assert_eq!(transactions[0].title, "Fjallraven  Foldsack No 1 Backpack");
        assert_eq!(transactions[1].date_of_sale, "2021-10-27T20:29:54+05:30");
        assert!(transactions[1].sold);
    }

    #[test]
    fn seed_rejects_negative_price_and_keeps_store() {
        let conn = get_test_connection();
        create_transaction(Transaction::build("kept", 1.0, "2020-01-01"), &conn).unwrap();
        let mut records = parse_seed_records(FEED).unwrap();
        records[1].price = -15.99;

        let result = seed_transactions(records, &conn);

        assert!(matches!(result, Err(Error::InvalidSeedData(_))));
        assert_eq!(count_transactions(&conn).unwrap(), 1);
    }

    /// Serve `body` with `status` at `/feed` on a local port and return its URL.
    async fn serve_feed(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/feed", get(move || async move { (status, body) }));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind listener");
        let addr = listener.local_addr().expect("Could not get local address");
        tokio::spawn(async move { axum::serve(listener, app).await });

        format!("http://{addr}/feed")
    }

    #[tokio::test]
    async fn fetches_feed_from_url() {
        let url = serve_feed(StatusCode::OK, FEED).await;

        let records = fetch_seed_records(&url).await.expect("Could not fetch feed");

        assert_eq!(records, parse_seed_records(FEED).unwrap());
    }

    #[tokio::test]
    async fn error_status_is_feed_unavailable() {
        let url = serve_feed(StatusCode::NOT_FOUND, "not here").await;

        let result = fetch_seed_records(&url).await;

        assert!(matches!(result, Err(Error::FeedUnavailable(_))));
    }

    #[tokio::test]
    async fn fetched_body_that_is_not_a_feed_is_invalid_seed_data() {
        let url = serve_feed(StatusCode::OK, r#"{"products": []}"#).await;

        let result = fetch_seed_records(&url).await;

        assert!(matches!(result, Err(Error::InvalidSeedData(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_feed_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind listener");
        let addr = listener.local_addr().expect("Could not get local address");
        drop(listener);

        let result = fetch_seed_records(&format!("http://{addr}/feed")).await;

        assert!(matches!(result, Err(Error::FeedUnavailable(_))));
    }
}
