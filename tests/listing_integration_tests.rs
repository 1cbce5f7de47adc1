mod common;

use axum::http::StatusCode;
use common::TestHarness;
use sales_dashboard::test_utils::{sale, titled_sale};
use sales_dashboard::utils::REQUEST_ID_HEADER;

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

async fn march_harness() -> TestHarness {
    TestHarness::with_records(vec![
        sale(1, 50.0, true, "2023-03-05T10:00:00Z"),
        sale(2, 150.0, false, "2023-03-20T10:00:00Z"),
        sale(3, 50.0, true, "2023-04-01T10:00:00Z"),
    ])
    .await
}

#[tokio::test]
async fn test_get_all_data_defaults() {
    let harness = march_harness().await;
    let (status, body) = harness.get_json("/getAllData").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["perPage"], 10);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["totalRecords"], 3);
}

#[tokio::test]
async fn test_record_serialization_uses_wire_names() {
    let harness = march_harness().await;
    let (_, body) = harness.get_json("/getAllData?perPage=1").await;

    let record = &body["transactions"][0];
    assert!(record["_id"].is_number());
    assert_eq!(record["id"], 1);
    assert_eq!(record["dateOfSale"], "2023-03-05T10:00:00Z");
    assert_eq!(record["price"], 50.0);
    assert_eq!(record["sold"], true);
    assert!(record.get("date_of_sale").is_none());
}

#[tokio::test]
async fn test_second_page_of_month() {
    let harness = march_harness().await;
    let (status, body) = harness
        .get_json("/getAllData?page=2&perPage=1&month=03")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2]);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn test_month_padding_is_consistent_across_aliases() {
    let harness = march_harness().await;

    for uri in [
        "/getAllData?month=3",
        "/getAllData?month=03",
        "/transactions?month=3",
        "/transactions?month=03",
    ] {
        let (status, body) = harness.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(ids(&body), vec![1, 2], "{uri}");
    }

    let (_, april) = harness.get_json("/transactions?month=4").await;
    assert_eq!(ids(&april), vec![3]);
}

#[tokio::test]
async fn test_total_pages_rounds_up() {
    let records = (1..=25)
        .map(|id| sale(id, 10.0, id % 2 == 0, "2022-06-15T00:00:00Z"))
        .collect();
    let harness = TestHarness::with_records(records).await;

    let (_, body) = harness.get_json("/transactions?perPage=10").await;
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["totalRecords"], 25);

    let (_, last) = harness.get_json("/transactions?perPage=10&page=3").await;
    assert_eq!(ids(&last), vec![21, 22, 23, 24, 25]);

    let (status, beyond) = harness.get_json("/transactions?perPage=10&page=4").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&beyond).is_empty());
    assert_eq!(beyond["totalPages"], 3);
}

#[tokio::test]
async fn test_search_with_no_matches() {
    let harness = march_harness().await;
    let (status, body) = harness.get_json("/getAllData?search=zeppelin").await;

    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["totalRecords"], 0);
}

#[tokio::test]
async fn test_search_text_and_price() {
    let harness = TestHarness::with_records(vec![
        titled_sale(1, "Mens Cotton Jacket", "great outerwear", 55.99, "2021-12-01T00:00:00Z"),
        titled_sale(2, "Solid Gold Bracelet", "A JACKET for your wrist", 168.0, "2021-12-02T00:00:00Z"),
        titled_sale(3, "SSD", "Fast storage", 109.0, "2021-12-03T00:00:00Z"),
    ])
    .await;

    let (_, by_text) = harness.get_json("/getAllData?search=JaCkEt").await;
    assert_eq!(ids(&by_text), vec![1, 2]);

    let (_, by_price) = harness.get_json("/getAllData?search=109").await;
    assert_eq!(ids(&by_price), vec![3]);

    let (_, blank) = harness.get_json("/getAllData?search=%20%20").await;
    assert_eq!(ids(&blank), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_non_numeric_search_does_not_match_on_price() {
    let harness = march_harness().await;
    let (_, body) = harness.get_json("/getAllData?search=abc").await;
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_search_wildcards_are_literal() {
    let harness = TestHarness::with_records(vec![
        titled_sale(1, "100% cotton tee", "soft", 20.0, "2022-01-01T00:00:00Z"),
        titled_sale(2, "1000 piece puzzle", "hard", 25.0, "2022-01-02T00:00:00Z"),
    ])
    .await;

    let (_, body) = harness.get_json("/getAllData?search=100%25").await;
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_search_folds_ascii_letters_only() {
    let harness = TestHarness::with_records(vec![titled_sale(
        1,
        "Écran OLED",
        "monitor",
        300.0,
        "2022-02-01T00:00:00Z",
    )])
    .await;

    let (_, upper) = harness.get_json("/getAllData?search=%C3%89CRAN%20oled").await;
    assert_eq!(ids(&upper), vec![1]);

    let (_, lower) = harness.get_json("/getAllData?search=%C3%A9cran").await;
    assert!(ids(&lower).is_empty());
}

#[tokio::test]
async fn test_invalid_parameters_are_rejected() {
    let harness = march_harness().await;

    for (uri, fragment) in [
        ("/getAllData?perPage=0", "perPage"),
        ("/getAllData?perPage=101", "perPage"),
        ("/getAllData?page=abc", "page"),
        ("/getAllData?page=0", "page"),
        ("/transactions?month=13", "month"),
        ("/transactions?month=march", "month"),
    ] {
        let (status, body) = harness.get_json(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            body["error"].as_str().unwrap().contains(fragment),
            "{uri}: {body}"
        );
    }
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let harness = march_harness().await;
    let response = harness.get("/getAllData").await;

    let header = response.headers().get(REQUEST_ID_HEADER).unwrap();
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
