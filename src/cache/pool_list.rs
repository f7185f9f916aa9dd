use crate::cache::entry::{now_ms, TimedEntry};
use crate::core::{BasicPoolInfo, PoolListSnapshot, SwapError, SwapResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// On-disk layout of the pool list file
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolListFile {
    time: i64,
    amm_pools: Vec<StoredPool>,
    clmm_pools: Vec<StoredPool>,
    cpmm_pools: Vec<StoredPool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPool {
    id: String,
    version: u8,
    mint_a: String,
    mint_b: String,
}

impl From<&BasicPoolInfo> for StoredPool {
    fn from(pool: &BasicPoolInfo) -> Self {
        Self {
            id: pool.id.to_string(),
            version: pool.version,
            mint_a: pool.mint_a.to_string(),
            mint_b: pool.mint_b.to_string(),
        }
    }
}

impl TryFrom<&StoredPool> for BasicPoolInfo {
    type Error = SwapError;

    fn try_from(pool: &StoredPool) -> SwapResult<Self> {
        Ok(Self {
            id: Pubkey::from_str(&pool.id)?,
            version: pool.version,
            mint_a: Pubkey::from_str(&pool.mint_a)?,
            mint_b: Pubkey::from_str(&pool.mint_b)?,
        })
    }
}

impl PoolListFile {
    fn decode(&self) -> SwapResult<PoolListSnapshot> {
        Ok(PoolListSnapshot {
            amm_pools: decode_pools(&self.amm_pools)?,
            clmm_pools: decode_pools(&self.clmm_pools)?,
            cpmm_pools: decode_pools(&self.cpmm_pools)?,
        })
    }
}

fn decode_pools(pools: &[StoredPool]) -> SwapResult<Vec<BasicPoolInfo>> {
    pools.iter().map(BasicPoolInfo::try_from).collect()
}

fn encode_pools(pools: &[BasicPoolInfo]) -> Vec<StoredPool> {
    pools.iter().map(StoredPool::from).collect()
}

/// File-backed cache of the Raydium pool list.
///
/// Reads never fail: a missing, corrupt, stale or malformed file is a miss.
/// Writes replace the file through a rename, so concurrent writers resolve
/// to the last one and readers never see a partial file.
pub struct PoolListCache {
    path: PathBuf,
    ttl: Duration,
    strict: bool,
}

impl PoolListCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration, strict: bool) -> Self {
        Self {
            path: path.into(),
            ttl,
            strict,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached snapshot if the file exists, parses and is within its TTL
    pub fn read(&self) -> Option<PoolListSnapshot> {
        let entry = self.load()?;
        if !entry.is_fresh(self.ttl, now_ms()) {
            debug!("Pool list cache at {} is stale", self.path.display());
            return None;
        }
        Some(entry.payload)
    }

    /// Creation time (ms since epoch) of the stored snapshot, stale or not
    pub fn stored_at(&self) -> Option<i64> {
        self.load().map(|entry| entry.created_at_ms)
    }

    fn load(&self) -> Option<TimedEntry<PoolListSnapshot>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Pool list cache unavailable at {}: {}", self.path.display(), e);
                return None;
            }
        };

        let file: PoolListFile = match serde_json::from_slice(&bytes) {
            Ok(file) => file,
            Err(e) => {
                debug!("Ignoring unreadable pool list cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match file.decode() {
            Ok(snapshot) => Some(TimedEntry::with_timestamp(snapshot, file.time)),
            Err(e) => {
                debug!("Ignoring pool list cache with invalid address: {}", e);
                None
            }
        }
    }

    /// Persist a snapshot stamped with the current time.
    ///
    /// Failures are logged and ignored unless the cache is strict.
    pub fn write(&self, snapshot: &PoolListSnapshot) -> SwapResult<()> {
        self.write_with_timestamp(snapshot, now_ms())
    }

    /// Persist a snapshot with an explicit creation time (ms since epoch)
    pub fn write_with_timestamp(&self, snapshot: &PoolListSnapshot, time: i64) -> SwapResult<()> {
        match self.try_write(snapshot, time) {
            Ok(()) => {
                info!(
                    "Cached {} pools to {}",
                    snapshot.len(),
                    self.path.display()
                );
                Ok(())
            }
            Err(e) if self.strict => Err(SwapError::CacheError(format!(
                "failed to write {}: {}",
                self.path.display(),
                e
            ))),
            Err(e) => {
                warn!("Cache pool data failed ({}): {}", self.path.display(), e);
                Ok(())
            }
        }
    }

    fn try_write(&self, snapshot: &PoolListSnapshot, time: i64) -> SwapResult<()> {
        let file = PoolListFile {
            time,
            amm_pools: encode_pools(&snapshot.amm_pools),
            clmm_pools: encode_pools(&snapshot.clmm_pools),
            cpmm_pools: encode_pools(&snapshot.cpmm_pools),
        };
        let contents = serde_json::to_vec(&file)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &contents).and_then(|_| fs::rename(&temp_path, &self.path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(
            ".{}.{}.tmp",
            std::process::id(),
            TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        self.path.with_file_name(name)
    }

    /// Remove the cache file. A missing file is not an error.
    pub fn clear(&self) -> SwapResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SwapError::CacheError(format!(
                "failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::POOL_LIST_CACHE_TTL;
    use std::thread;
    use tempfile::tempdir;

    fn pool(version: u8) -> BasicPoolInfo {
        BasicPoolInfo {
            id: Pubkey::new_unique(),
            version,
            mint_a: Pubkey::new_unique(),
            mint_b: Pubkey::new_unique(),
        }
    }

    fn snapshot() -> PoolListSnapshot {
        PoolListSnapshot {
            amm_pools: vec![pool(4), pool(4)],
            clmm_pools: vec![pool(6)],
            cpmm_pools: vec![pool(7), pool(7), pool(7)],
        }
    }

    fn cache_in(dir: &Path) -> PoolListCache {
        PoolListCache::new(
            dir.join("data").join("pool_data.json"),
            Duration::from_secs(POOL_LIST_CACHE_TTL),
            false,
        )
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let original = snapshot();

        assert!(cache.read().is_none());
        cache.write(&original).unwrap();

        assert!(cache.path().exists(), "data directory should be created");
        assert_eq!(cache.read(), Some(original));
    }

    #[test]
    fn test_file_format() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let original = snapshot();
        cache.write_with_timestamp(&original, 1_700_000_000_000).unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(cache.path()).unwrap()).unwrap();
        assert_eq!(json["time"], 1_700_000_000_000i64);
        assert_eq!(json["ammPools"].as_array().unwrap().len(), 2);
        assert_eq!(json["clmmPools"][0]["version"], 6);
        assert_eq!(
            json["cpmmPools"][0]["mintA"],
            original.cpmm_pools[0].mint_a.to_string()
        );
        assert_eq!(json["cpmmPools"][0]["id"], original.cpmm_pools[0].id.to_string());
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        fs::create_dir_all(cache.path().parent().unwrap()).unwrap();

        fs::write(cache.path(), b"{ not json").unwrap();
        assert!(cache.read().is_none());

        fs::write(cache.path(), br#"{"time": 1, "ammPools": []}"#).unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_invalid_address_reads_as_absent() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        fs::create_dir_all(cache.path().parent().unwrap()).unwrap();

        let file = serde_json::json!({
            "time": now_ms(),
            "ammPools": [{ "id": "not-a-pubkey", "version": 4, "mintA": "x", "mintB": "y" }],
            "clmmPools": [],
            "cpmmPools": [],
        });
        fs::write(cache.path(), serde_json::to_vec(&file).unwrap()).unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_expired_snapshot_is_absent() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let ttl_ms = cache.ttl().as_millis() as i64;

        cache.write_with_timestamp(&snapshot(), now_ms() - ttl_ms - 1).unwrap();
        assert!(cache.read().is_none());
        assert!(cache.stored_at().is_some(), "stale file stays on disk");

        cache.write_with_timestamp(&snapshot(), now_ms() - ttl_ms + 60_000).unwrap();
        assert!(cache.read().is_some());
    }

    #[test]
    fn test_snapshot_from_the_future_is_absent() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());

        // written by a host whose clock runs an hour ahead
        cache.write_with_timestamp(&snapshot(), now_ms() + 3_600_000).unwrap();
        assert!(cache.read().is_none());
        assert!(cache.stored_at().is_some());
    }

    #[test]
    fn test_write_failure_is_swallowed_unless_strict() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").unwrap();
        let path = blocker.join("pool_data.json");
        let ttl = Duration::from_secs(POOL_LIST_CACHE_TTL);

        let lenient = PoolListCache::new(&path, ttl, false);
        assert!(lenient.write(&snapshot()).is_ok());
        assert!(lenient.read().is_none());

        let strict = PoolListCache::new(&path, ttl, true);
        assert!(matches!(
            strict.write(&snapshot()),
            Err(SwapError::CacheError(_))
        ));
    }

    #[test]
    fn test_concurrent_writers_last_one_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("pool_data.json");
        let snapshots: Vec<PoolListSnapshot> = (0..8).map(|_| snapshot()).collect();

        let handles: Vec<_> = snapshots
            .iter()
            .cloned()
            .map(|s| {
                let path = path.clone();
                thread::spawn(move || {
                    let cache =
                        PoolListCache::new(path, Duration::from_secs(POOL_LIST_CACHE_TTL), true);
                    for _ in 0..10 {
                        cache.write(&s).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cache = PoolListCache::new(&path, Duration::from_secs(POOL_LIST_CACHE_TTL), true);
        let stored = cache.read().expect("snapshot must be readable after races");
        assert!(snapshots.contains(&stored));

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        assert!(cache.clear().is_ok());

        cache.write(&snapshot()).unwrap();
        cache.clear().unwrap();
        assert!(cache.read().is_none());
        assert!(!cache.path().exists());
    }
}
