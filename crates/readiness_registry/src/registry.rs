use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::RegistrySummary;

/// Readiness flags keyed by component name.
///
/// Reads share the lock, writes take it exclusively. Every operation holds the
/// lock for a single map access, so callers on async runtimes may call these
/// methods directly from handlers.
///
/// Entries are created by the first [`set_state`](Self::set_state) for a name
/// and are never removed.
#[derive(Debug, Default)]
pub struct ReadinessRegistry {
    states: RwLock<HashMap<String, bool>>,
}

impl ReadinessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the readiness flag for `component`.
    ///
    /// Returns the previous flag, or `None` when the component was not known
    /// yet. Once this returns, every subsequent read observes `ready`.
    pub fn set_state(&self, component: impl Into<String>, ready: bool) -> Option<bool> {
        let component = component.into();
        trace!(%component, ready, "set readiness");
        self.write().insert(component, ready)
    }

    /// Current flag for `component`, or `None` if it was never set.
    pub fn is_ready(&self, component: &str) -> Option<bool> {
        self.read().get(component).copied()
    }

    /// Owned point-in-time copy of every component and its flag.
    ///
    /// Iteration order is unspecified.
    pub fn list_components(&self) -> HashMap<String, bool> {
        self.read().clone()
    }

    /// Number of components ever registered.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True until the first `set_state`.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Ready / not-ready counts taken under a single read lock.
    pub fn summary(&self) -> RegistrySummary {
        let states = self.read();
        let ready = states.values().filter(|ready| **ready).count();
        RegistrySummary {
            total: states.len(),
            ready,
            not_ready: states.len() - ready,
        }
    }

    // A panicking writer can only leave a fully inserted or untouched entry
    // behind, so a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, bool>> {
        self.states.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, bool>> {
        self.states.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn unknown_component_is_absent() {
        let registry = ReadinessRegistry::new();
        assert_eq!(registry.is_ready("db"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn set_then_get() {
        let registry = ReadinessRegistry::new();

        assert_eq!(registry.set_state("db", true), None);
        assert_eq!(registry.is_ready("db"), Some(true));

        assert_eq!(registry.set_state("db", false), Some(true));
        assert_eq!(registry.is_ready("db"), Some(false));
    }

    #[test]
    fn repeated_write_is_idempotent() {
        let registry = ReadinessRegistry::new();
        registry.set_state("cache", true);
        let once = registry.list_components();

        registry.set_state("cache", true);
        assert_eq!(registry.list_components(), once);
        assert_eq!(registry.is_ready("cache"), Some(true));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let registry = ReadinessRegistry::new();
        registry.set_state("db", true);
        registry.set_state("db", false);
        assert_eq!(registry.is_ready("db"), Some(false));
    }

    #[test]
    fn list_components_returns_all_entries() {
        let registry = ReadinessRegistry::new();
        registry.set_state("db", true);
        registry.set_state("cache", false);

        let components = registry.list_components();
        assert_eq!(components.len(), 2);
        assert_eq!(components.get("db"), Some(&true));
        assert_eq!(components.get("cache"), Some(&false));
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let registry = ReadinessRegistry::new();
        registry.set_state("db", true);

        let snapshot = registry.list_components();
        registry.set_state("db", false);
        registry.set_state("queue", true);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("db"), Some(&true));
    }

    #[test]
    fn editing_snapshot_does_not_touch_registry() {
        let registry = ReadinessRegistry::new();
        registry.set_state("db", true);

        let mut snapshot = registry.list_components();
        snapshot.insert("db".into(), false);
        snapshot.insert("ghost".into(), true);

        assert_eq!(registry.is_ready("db"), Some(true));
        assert_eq!(registry.is_ready("ghost"), None);
    }

    #[test]
    fn empty_name_is_an_ordinary_key() {
        let registry = ReadinessRegistry::new();
        registry.set_state("", true);
        assert_eq!(registry.is_ready(""), Some(true));
    }

    #[test]
    fn summary_counts_flags() {
        let registry = ReadinessRegistry::new();
        registry.set_state("db", true);
        registry.set_state("cache", false);
        registry.set_state("queue", true);

        let summary = registry.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.ready, 2);
        assert_eq!(summary.not_ready, 1);
    }

    #[test]
    fn concurrent_writers_are_not_lost() {
        const WRITERS: usize = 32;
        const READERS: usize = 8;

        let registry = Arc::new(ReadinessRegistry::new());

        std::thread::scope(|s| {
            for i in 0..WRITERS {
                let registry = registry.clone();
                s.spawn(move || {
                    registry.set_state(format!("component-{i}"), i % 2 == 0);
                });
            }
        });

        std::thread::scope(|s| {
            for _ in 0..READERS {
                let registry = registry.clone();
                s.spawn(move || {
                    let snapshot = registry.list_components();
                    assert_eq!(snapshot.len(), WRITERS);
                    for i in 0..WRITERS {
                        assert_eq!(
                            registry.is_ready(&format!("component-{i}")),
                            Some(i % 2 == 0)
                        );
                    }
                });
            }
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_tasks_observe_writes() {
        let registry = Arc::new(ReadinessRegistry::new());

        let writers: Vec<_> = (0..64)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.set_state(format!("svc-{i}"), true);
                })
            })
            .collect();
        for w in writers {
            w.await.unwrap();
        }

        let readers: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.summary() })
            })
            .collect();
        for r in readers {
            let summary = r.await.unwrap();
            assert_eq!(summary.total, 64);
            assert_eq!(summary.ready, 64);
        }
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let registry = Arc::new(ReadinessRegistry::new());
        registry.set_state("db", true);

        let poisoner = registry.clone();
        let res = std::thread::spawn(move || {
            let _guard = poisoner.states.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(res.is_err());

        assert_eq!(registry.is_ready("db"), Some(true));
        registry.set_state("db", false);
        assert_eq!(registry.is_ready("db"), Some(false));
    }
}
