//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    report::{get_bar_chart, get_combined_data, get_pie_chart, get_statistics, get_transactions},
    transaction::initialize_db_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics))
        .route(endpoints::BAR_CHART, get(get_bar_chart))
        .route(endpoints::PIE_CHART, get(get_pie_chart))
        .route(endpoints::COMBINED_DATA, get(get_combined_data))
        .route(endpoints::INITIALIZE_DB, post(initialize_db_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the combined report.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::COMBINED_DATA)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints, pagination::PaginationConfig};

    const FEED: &str = r#"[
        {"id": 1, "title": "Ring", "price": 50, "description": "Silver", "category": "jewelery",
         "image": "", "sold": true, "dateOfSale": "2021-03-01T20:29:54+05:30"},
        {"id": 2, "title": "Monitor", "price": 150, "description": "27 inch", "category": "electronics",
         "image": "", "sold": false, "dateOfSale": "2021-03-15T20:29:54+05:30"},
        {"id": 3, "title": "Television", "price": 950, "description": "OLED", "category": "electronics",
         "image": "", "sold": true, "dateOfSale": "2021-07-15T20:29:54+05:30"}
    ]"#;

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state =
            AppState::new(conn, PaginationConfig::default()).expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn root_redirects_to_combined_data() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::COMBINED_DATA);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let server = get_test_server();

        let response = server.get("/api/nope").expect_failure().await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn empty_store_gives_empty_reports() {
        let server = get_test_server();

        let response = server.get(endpoints::COMBINED_DATA).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["transactions"]["transactions"], json!([]));
        assert_eq!(body["statistics"]["total_sold_items"], 0);
        assert_eq!(body["bar_chart"].as_object().unwrap().len(), 10);
        assert_eq!(body["pie_chart"], json!({}));
    }

    #[tokio::test]
    async fn seed_then_report() {
        let server = get_test_server();

        let seed = server
            .post(endpoints::INITIALIZE_DB)
            .json(&serde_json::from_str::<Value>(FEED).unwrap())
            .await;
        seed.assert_status_ok();
        assert_eq!(seed.json::<Value>()["count"], 3);

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "-03-")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "total_sale_amount": 50.0,
            "total_sold_items": 1,
            "total_not_sold_items": 1,
        }));
    }

    #[tokio::test]
    async fn reseeding_replaces_collection() {
        let server = get_test_server();
        server
            .post(endpoints::INITIALIZE_DB)
            .json(&serde_json::from_str::<Value>(FEED).unwrap())
            .await
            .assert_status_ok();

        server
            .post(endpoints::INITIALIZE_DB)
            .json(&json!([{
                "title": "Book", "price": 12.5, "description": "Paperback",
                "category": "books", "sold": true, "dateOfSale": "2022-01-02"
            }]))
            .await
            .assert_status_ok();

        let body: Value = server.get(endpoints::TRANSACTIONS).await.json();
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["transactions"][0]["id"], 1);
        assert_eq!(body["transactions"][0]["title"], "Book");
    }

    #[tokio::test]
    async fn invalid_seed_is_bad_request_and_keeps_store() {
        let server = get_test_server();
        server
            .post(endpoints::INITIALIZE_DB)
            .json(&serde_json::from_str::<Value>(FEED).unwrap())
            .await
            .assert_status_ok();

        let response = server
            .post(endpoints::INITIALIZE_DB)
            .json(&json!([{
                "title": "Refund", "price": -5.0, "description": "",
                "category": "misc", "sold": true, "dateOfSale": "2022-01-02"
            }]))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let body: Value = server.get(endpoints::TRANSACTIONS).await.json();
        assert_eq!(body["total_count"], 3);
    }
}
