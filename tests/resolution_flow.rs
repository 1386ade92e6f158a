//! End-to-end resolution against a mock Open Food Facts server

use std::time::Duration;

use nutriscan::external::openfoodfacts::SEARCH_PATH;
use nutriscan::external::OpenFoodFactsConfig;
use nutriscan::resolve::{self, BulkResolver};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server: &MockServer) -> BulkResolver {
    let config = OpenFoodFactsConfig {
        base_url: server.uri(),
        user_agent: "nutriscan-it/1.0 (mailto:it@example.com)".to_string(),
        page_size: 8,
        timeout: Duration::from_secs(2),
    };
    resolve::open_food_facts(config, 64).unwrap()
}

fn products(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "products": body }))
}

#[tokio::test]
async fn test_cascade_picks_best_ranked_product_of_later_variant() {
    let server = MockServer::start().await;

    // First variant: hits, but nothing usable
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("search_terms", "hotdog"))
        .respond_with(products(json!([
            {"product_name": "Hotdog keychain", "lang": "en", "nutriments": {}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // Second variant of "hotdog" and sole variant of "hot dog": the most
    // complete candidate must win
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("search_terms", "hot dog"))
        .respond_with(products(json!([
            {"product_name": "Hot dog sauce", "lang": "fr",
             "nutriments": {"energy-kcal_100g": 120}},
            {"product_name": "Hot Dog Classic", "lang": "de",
             "categories_tags": ["en:generic-foods"],
             "nutriments": {
                "energy-kj_100g": 1130, "energy-kcal_100g": 270, "fat_100g": 16.04,
                "carbohydrates_100g": "21.5", "sugars_100g": 3.1, "proteins_100g": 10
             }}
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let result = resolver.resolve_many(&["Hot-Dog", "HOTDOG", "hotdog"]).await;

    // "Hot-Dog" normalizes to "hot dog", the other two to "hotdog"
    assert_eq!(result.len(), 2);

    let spaced = result.get("hot dog").cloned().flatten().unwrap();
    assert_eq!(spaced.query, "hot dog");

    let compound = result.get("hotdog").cloned().flatten().unwrap();
    assert_eq!(compound.query, "hot dog");
    assert_eq!(compound.product_name.as_deref(), Some("Hot Dog Classic"));
    assert_eq!(compound.energy_kj, Some(1130.0));
    assert_eq!(compound.energy_kcal, Some(270.0));
    assert_eq!(compound.fat_g, Some(16.0));
    assert_eq!(compound.carbs_g, Some(21.5));
    assert_eq!(compound.source, "OpenFoodFacts");
}

#[tokio::test]
async fn test_absent_label_is_cached_across_batches() {
    let server = MockServer::start().await;

    // "gravel" has a single variant; one search in total despite two batches
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("search_terms", "gravel"))
        .respond_with(products(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let first = resolver.resolve_many(&["gravel"]).await;
    let second = resolver.resolve_many(&[" Gravel "]).await;

    assert_eq!(first.get("gravel"), Some(&None));
    assert_eq!(second.get("gravel"), Some(&None));

    let stats = resolver.cache().stats().await;
    assert_eq!(stats.computations, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_server_failure_falls_through_to_next_variant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("search_terms", "7up"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("search_terms", "7 up"))
        .respond_with(products(json!([
            {"product_name": "7UP", "lang": "en", "nutriments": {"energy_100g": 176, "sugars_100g": 10.2}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let result = resolver.resolve_many(&["7UP"]).await;

    let record = result.get("7up").cloned().flatten().unwrap();
    assert_eq!(record.query, "7 up");
    assert_eq!(record.energy_kj, Some(176.0));
    assert_eq!(record.energy_kcal, Some(42.1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_issue_one_search_sequence() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("search_terms", "mango"))
        .respond_with(
            products(json!([
                {"product_name": "Mango", "lang": "en", "nutriments": {"energy-kcal_100g": 60}}
            ]))
            .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let mut handles = Vec::new();
    for label in ["Mango", "mango", "MANGO "] {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move { resolver.resolve_many(&[label]).await }));
    }

    let mut records = Vec::new();
    for handle in handles {
        let result = handle.await.unwrap();
        records.push(result.get("mango").cloned().flatten());
    }

    assert!(records.iter().all(|r| r == &records[0]));
    assert_eq!(records[0].as_ref().and_then(|r| r.energy_kcal), Some(60.0));
}
