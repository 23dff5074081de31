//! Extraction client tests against a mock HTTP server

use curator::adapters::extraction::{ExtractionClient, ExtractionRequest};
use curator::config::{secret_string, ExtractionConfig, RetryConfig};
use curator::domain::{CuratorError, ExtractionError, MuseumId, Venue};
use mockito::{Matcher, Server};
use serde_json::json;

fn config(endpoint: String, max_retries: usize) -> ExtractionConfig {
    ExtractionConfig {
        endpoint,
        api_key: Some(secret_string("test-key".to_string())),
        prompt: "extract exhibitions".to_string(),
        timeout_seconds: 5,
        max_concurrent_venues: 2,
        retry: RetryConfig {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        },
    }
}

fn request(url: &str) -> ExtractionRequest {
    ExtractionRequest {
        urls: vec![url.to_string()],
        prompt: "extract exhibitions".to_string(),
    }
}

#[tokio::test]
async fn test_extraction_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/extract")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "urls": ["https://tnm.example/exhibitions"],
            "prompt": "extract exhibitions"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"title": "Treasures", "venue": "TNM", "startDate": "2025-04-01", "endDate": "2025-06-01"},
                {"title": "", "venue": "TNM"}
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = ExtractionClient::new(config(format!("{}/extract", server.url()), 0)).unwrap();
    let parsed = client
        .run_extraction(&request("https://tnm.example/exhibitions"))
        .await
        .unwrap();

    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].title, "Treasures");
    assert_eq!(parsed.records[0].start_date.as_deref(), Some("2025-04-01"));
    assert_eq!(parsed.rejected, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_wrapped_output() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/extract")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"exhibitions": [{"title": "Light", "venue": "Mori"}]}).to_string())
        .create_async()
        .await;

    let client = ExtractionClient::new(config(format!("{}/extract", server.url()), 0)).unwrap();
    let parsed = client.run_extraction(&request("https://mori.example")).await.unwrap();

    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].venue, "Mori");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried_until_exhausted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/extract")
        .with_status(503)
        .with_body("overloaded")
        .expect(3)
        .create_async()
        .await;

    let client = ExtractionClient::new(config(format!("{}/extract", server.url()), 2)).unwrap();
    let result = client.run_extraction(&request("https://tnm.example")).await;

    match result {
        Err(CuratorError::Extraction(ExtractionError::ServerError { status, message })) => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/extract")
        .with_status(401)
        .with_body("bad key")
        .expect(1)
        .create_async()
        .await;

    let client = ExtractionClient::new(config(format!("{}/extract", server.url()), 3)).unwrap();
    let result = client.run_extraction(&request("https://tnm.example")).await;

    assert!(matches!(
        result,
        Err(CuratorError::Extraction(ExtractionError::ClientError { status: 401, .. }))
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unrecognized_output_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/extract")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "ok"}).to_string())
        .create_async()
        .await;

    let client = ExtractionClient::new(config(format!("{}/extract", server.url()), 0)).unwrap();
    let result = client.run_extraction(&request("https://tnm.example")).await;

    assert!(matches!(
        result,
        Err(CuratorError::Extraction(ExtractionError::InvalidResponse(_)))
    ));
}

#[tokio::test]
async fn test_run_for_venues() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("POST", "/extract")
        .match_body(Matcher::PartialJson(json!({"urls": ["https://tnm.example"]})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"title": "Treasures", "venue": "Tokyo National Museum"},
                {"title": "Armor", "venue": "TNM"}
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let failing = server
        .mock("POST", "/extract")
        .match_body(Matcher::PartialJson(json!({"urls": ["https://mori.example"]})))
        .with_status(400)
        .expect(1)
        .create_async()
        .await;

    let venues = vec![
        Venue::new(MuseumId::new("tnm").unwrap(), "Tokyo National Museum")
            .with_scrape_url("https://tnm.example"),
        Venue::new(MuseumId::new("mori").unwrap(), "Mori Art Museum")
            .with_scrape_url("https://mori.example"),
        Venue::new(MuseumId::new("nact").unwrap(), "The National Art Center"),
    ];

    let client = ExtractionClient::new(config(format!("{}/extract", server.url()), 1)).unwrap();
    let run = client.run_for_venues(&venues).await;

    assert_eq!(run.parsed.records.len(), 2);
    assert_eq!(run.failed_venues, vec!["Mori Art Museum".to_string()]);
    assert_eq!(run.skipped_venues, 1);
    ok.assert_async().await;
    failing.assert_async().await;
}
