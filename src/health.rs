//! Liveness and readiness state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared readiness flag. Liveness is implicit: if the process answers, it
/// is alive. Readiness flips on once the Kubernetes client is usable.
#[derive(Clone, Default)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
}

impl HealthState {
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_flips() {
        let health = HealthState::default();
        assert!(!health.is_ready());
        health.set_ready(true);
        assert!(health.is_ready());
        let clone = health.clone();
        clone.set_ready(false);
        assert!(!health.is_ready());
    }
}
