//! Behavior tests for the response cache
//!
//! These tests verify what a reader observes: repeated reads inside five
//! minutes never hit the network, older entries are never served, and the
//! cache key does not depend on parameter order.

use std::time::Duration;

use newsdesk_core::{config::CACHE_TTL, generate_key, QueryParams};
use newsdesk_tests::*;
use serde_json::json;

// =============================================================================
// Cache: TTL
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_value_is_stored_it_is_served_until_ttl_elapses() {
    // Given: A cache with the standard TTL holding one entry
    let cache = CacheStore::with_default_ttl();
    cache.put(String::from("/search?page=1"), json!({"n": 1})).await;

    // When: It is read immediately and again exactly at the TTL boundary
    let immediate = cache.get("/search?page=1").await;
    tokio::time::advance(CACHE_TTL).await;
    let at_boundary = cache.get("/search?page=1").await;

    // Then: Both reads return the stored value
    assert_eq!(immediate, Some(json!({"n": 1})));
    assert_eq!(at_boundary, Some(json!({"n": 1})));
}

#[tokio::test(start_paused = true)]
async fn when_ttl_has_elapsed_entry_is_absent_and_evicted() {
    // Given: A stored entry
    let cache = CacheStore::with_default_ttl();
    cache.put(String::from("/search?page=1"), json!("stale soon")).await;

    // When: Just over five minutes pass
    tokio::time::advance(CACHE_TTL + Duration::from_millis(1)).await;

    // Then: The read misses and the entry is gone
    assert_eq!(cache.get("/search?page=1").await, None);
    assert!(cache.is_empty().await, "stale entry should be evicted by the read");
}

#[tokio::test(start_paused = true)]
async fn when_list_page_is_read_twice_within_ttl_network_is_used_once() {
    // Given: A gateway whose transport can answer exactly once
    let client = Arc::new(ScriptedHttpClient::new());
    client.push_response(200, search_body(1, 10));
    let gateway = gateway_over(&client);

    // When: The same page is requested twice, four minutes apart
    let first = gateway.fetch_list_page(1).await.expect("first read");
    tokio::time::advance(Duration::from_secs(4 * 60)).await;
    let second = gateway.fetch_list_page(1).await.expect("cached read");

    // Then: Both calls agree and only one request went out
    assert_eq!(first, second);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn when_cached_page_expires_gateway_refetches() {
    // Given: A page fetched once
    let client = Arc::new(ScriptedHttpClient::new());
    client.push_response(200, search_body(1, 10));
    client.push_response(200, search_body(1, 3));
    let gateway = gateway_over(&client);
    gateway.fetch_list_page(1).await.expect("first read");

    // When: The TTL passes and the page is requested again
    tokio::time::advance(CACHE_TTL + Duration::from_secs(1)).await;
    let refreshed = gateway.fetch_list_page(1).await.expect("refetch");

    // Then: The fresh response is served
    assert_eq!(refreshed.results.len(), 3);
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn when_cache_is_cleared_next_read_goes_to_network() {
    // Given: An article already cached
    let client = Arc::new(ScriptedHttpClient::new());
    let id = ArticleId::parse("technology/2024/jan/15/chips").expect("valid id");
    client.push_response(200, content_body(id.as_str()));
    client.push_response(200, content_body(id.as_str()));
    let gateway = gateway_over(&client);
    gateway.fetch_by_id(&id).await.expect("first read");

    // When: The cache is cleared
    gateway.cache().clear().await;
    gateway.fetch_by_id(&id).await.expect("second read");

    // Then: The article was fetched again
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn when_list_and_detail_share_a_cache_their_keys_do_not_collide() {
    // Given: A gateway with one list page and one article scripted
    let client = Arc::new(ScriptedHttpClient::new());
    client.push_response(200, search_body(1, 2));
    client.push_response(200, content_body("technology/page-1/story-0"));
    let gateway = gateway_over(&client);
    let id = ArticleId::parse("technology/page-1/story-0").expect("valid id");

    // When: Both are fetched
    gateway.fetch_list_page(1).await.expect("list");
    let detail = gateway.fetch_by_id(&id).await.expect("detail");

    // Then: Two separate entries exist and the detail carries its body
    assert_eq!(gateway.cache().len().await, 2);
    assert_eq!(detail.body.as_deref(), Some("<p>Full story.</p>"));
}

// =============================================================================
// Cache: Key determinism
// =============================================================================

#[test]
fn when_params_are_inserted_in_any_order_key_is_identical() {
    // Given: The same parameters inserted in opposite orders
    let forward = QueryParams::new().with("a", 1).with("b", 2);
    let backward = QueryParams::new().with("b", 2).with("a", 1);

    // When / Then: The keys match
    assert_eq!(
        generate_key("/api/news", &forward),
        generate_key("/api/news", &backward)
    );

    let z_first = QueryParams::new().with("z", 1).with("a", 2);
    let a_first = QueryParams::new().with("a", 2).with("z", 1);
    assert_eq!(
        generate_key("/api/news", &z_first),
        generate_key("/api/news", &a_first)
    );
}

#[test]
fn when_mixed_value_types_are_used_key_has_exact_sorted_form() {
    // Given: Boolean, string and numeric parameters
    let params = QueryParams::new()
        .with("page", 1)
        .with("category", "tech")
        .with("active", true);

    // When: A key is generated
    let key = generate_key("/api/news", &params);

    // Then: It lists parameters alphabetically
    assert_eq!(key, "/api/news?active=true&category=tech&page=1");
}
