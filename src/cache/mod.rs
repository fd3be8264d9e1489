use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::model::Flow;

/// Default freshness window for built flows: five minutes. The cache is a
/// perceived-latency optimization (paint a non-empty screen instantly while
/// a refetch runs), never a correctness mechanism.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Cache key: one entry per `(system_name, window)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub system_name: String,
    pub window: String,
}

impl CacheKey {
    pub fn new(system_name: &str, window: &str) -> Self {
        CacheKey {
            system_name: system_name.to_string(),
            window: window.to_string(),
        }
    }

    fn file_name(&self) -> String {
        let sanitize = |s: &str| {
            s.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
                .collect::<String>()
        };
        format!(
            "{}--{}.json",
            sanitize(&self.system_name),
            sanitize(&self.window)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub flows: Vec<Flow>,
    pub timestamp: u64,
}

/// Injected cache abstraction so the flow endpoint stays testable without a
/// real disk. `now` is passed in (unix seconds) rather than read internally
/// so TTL expiry can be exercised with a simulated clock.
pub trait FlowCache: Send + Sync {
    /// Returns the cached flows if an entry exists and is still within the
    /// TTL at `now`; `None` for a miss or a stale entry.
    fn get(&self, key: &CacheKey, now: u64) -> Option<Vec<Flow>>;

    /// Stores flows under `key`, stamped with `now`. Last writer wins.
    fn set(&self, key: &CacheKey, flows: &[Flow], now: u64);
}

/// File-backed cache: one JSON file per key under a namespace directory.
/// Survives restarts; write failures are logged and ignored.
pub struct DiskCache {
    dir: PathBuf,
    ttl_secs: u64,
}

impl DiskCache {
    pub fn new(dir: &str, ttl_secs: u64) -> Self {
        let dir = PathBuf::from(dir);
        if let Err(e) = fs::create_dir_all(&dir) {
            log::warn!("Could not create flow cache dir {}: {}", dir.display(), e);
        }
        DiskCache { dir, ttl_secs }
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl FlowCache for DiskCache {
    fn get(&self, key: &CacheKey, now: u64) -> Option<Vec<Flow>> {
        let content = fs::read_to_string(self.path_for(key)).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;
        if now.saturating_sub(entry.timestamp) <= self.ttl_secs {
            Some(entry.flows)
        } else {
            None
        }
    }

    fn set(&self, key: &CacheKey, flows: &[Flow], now: u64) {
        let entry = CacheEntry {
            flows: flows.to_vec(),
            timestamp: now,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if let Err(e) = fs::write(self.path_for(key), json) {
                    log::warn!("Failed to write flow cache entry: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize flow cache entry: {}", e),
        }
    }
}

/// In-memory cache with the same TTL semantics, used in tests and as a
/// fallback when no writable disk is available.
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl_secs: u64,
}

impl MemoryCache {
    pub fn new(ttl_secs: u64) -> Self {
        MemoryCache {
            entries: Mutex::new(HashMap::new()),
            ttl_secs,
        }
    }
}

impl FlowCache for MemoryCache {
    fn get(&self, key: &CacheKey, now: u64) -> Option<Vec<Flow>> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if now.saturating_sub(entry.timestamp) <= self.ttl_secs {
            Some(entry.flows.clone())
        } else {
            None
        }
    }

    fn set(&self, key: &CacheKey, flows: &[Flow], now: u64) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.clone(),
                CacheEntry {
                    flows: flows.to_vec(),
                    timestamp: now,
                },
            );
        }
    }
}
