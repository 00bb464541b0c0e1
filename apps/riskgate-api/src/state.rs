//! Application state shared across all request handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use riskgate_db::DbPool;

/// Application state shared across all handlers.
///
/// Cloned per request; the inner resources use `Arc` internally so cloning
/// is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,

    /// Service startup time for uptime calculation.
    pub startup_time: Arc<Instant>,

    /// Application version from Cargo.toml.
    pub version: &'static str,

    /// Whether the service is shutting down (readiness probe drains traffic).
    pub shutting_down: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            startup_time: Arc::new(Instant::now()),
            version: env!("CARGO_PKG_VERSION"),
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the service uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.startup_time.elapsed().as_secs()
    }

    /// Check if the service is shutting down.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
    }

    #[test]
    fn test_shutting_down_default_false() {
        let flag = Arc::new(AtomicBool::new(false));
        assert!(!flag.load(Ordering::Acquire));
        flag.store(true, Ordering::Release);
        assert!(flag.load(Ordering::Acquire));
    }
}
