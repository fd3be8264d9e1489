use saferemediate_dashboard::cache::{CacheKey, DiskCache, FlowCache, MemoryCache};
use saferemediate_dashboard::flows::builder::{build_full_stack_flows, FlowBuildContext};
use saferemediate_dashboard::model::{Flow, GraphNode};
use tempfile::TempDir;

const TTL: u64 = 300;

fn sample_flows() -> Vec<Flow> {
    let ctx = FlowBuildContext::new(
        vec![
            GraphNode::new("i-1", "app-1", "ec2"),
            GraphNode::new("db-1", "payments-db", "rds"),
        ],
        vec![],
        vec![],
        vec![],
    );
    build_full_stack_flows(&ctx)
}

#[test]
fn disk_cache_returns_entry_within_ttl() {
    let dir = TempDir::new().unwrap();
    let cache = DiskCache::new(dir.path().to_str().unwrap(), TTL);
    let key = CacheKey::new("payments", "24h");
    let flows = sample_flows();

    cache.set(&key, &flows, 1_000);
    let cached = cache.get(&key, 1_060).unwrap();
    assert_eq!(cached, flows);
}

#[test]
fn disk_cache_expires_after_ttl() {
    let dir = TempDir::new().unwrap();
    let cache = DiskCache::new(dir.path().to_str().unwrap(), TTL);
    let key = CacheKey::new("payments", "24h");

    cache.set(&key, &sample_flows(), 1_000);
    // Exactly at the boundary the entry is still fresh; one second past it
    // is stale.
    assert!(cache.get(&key, 1_000 + TTL).is_some());
    assert!(cache.get(&key, 1_000 + TTL + 1).is_none());
}

#[test]
fn disk_cache_misses_on_unknown_key() {
    let dir = TempDir::new().unwrap();
    let cache = DiskCache::new(dir.path().to_str().unwrap(), TTL);
    assert!(cache.get(&CacheKey::new("payments", "24h"), 1_000).is_none());
}

#[test]
fn disk_cache_entries_survive_a_new_instance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_str().unwrap().to_string();
    let key = CacheKey::new("payments", "24h");
    let flows = sample_flows();

    DiskCache::new(&path, TTL).set(&key, &flows, 2_000);
    let reopened = DiskCache::new(&path, TTL);
    assert_eq!(reopened.get(&key, 2_100).unwrap(), flows);
}

#[test]
fn disk_cache_keys_are_window_scoped() {
    let dir = TempDir::new().unwrap();
    let cache = DiskCache::new(dir.path().to_str().unwrap(), TTL);
    let flows = sample_flows();

    cache.set(&CacheKey::new("payments", "24h"), &flows, 1_000);
    assert!(cache.get(&CacheKey::new("payments", "7d"), 1_010).is_none());
    assert!(cache.get(&CacheKey::new("billing", "24h"), 1_010).is_none());
}

#[test]
fn memory_cache_has_the_same_ttl_semantics() {
    let cache = MemoryCache::new(TTL);
    let key = CacheKey::new("payments", "24h");
    let flows = sample_flows();

    cache.set(&key, &flows, 5_000);
    assert_eq!(cache.get(&key, 5_200).unwrap(), flows);
    assert!(cache.get(&key, 5_000 + TTL + 1).is_none());
}

#[test]
fn last_writer_wins() {
    let cache = MemoryCache::new(TTL);
    let key = CacheKey::new("payments", "24h");
    let flows = sample_flows();

    cache.set(&key, &flows, 1_000);
    cache.set(&key, &[], 1_050);
    assert_eq!(cache.get(&key, 1_060).unwrap(), Vec::<Flow>::new());
}
