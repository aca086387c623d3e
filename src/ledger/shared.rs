use parking_lot::Mutex;

use super::{KnowledgePoint, Ledger, ProgressSummary};

/// Ledger behind a single mutex so read-modify-write sequences from several
/// callers stay atomic.
#[derive(Debug, Default)]
pub struct SharedLedger {
    inner: Mutex<Ledger>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Mutex::new(ledger),
        }
    }

    /// Runs `f` with exclusive access for the whole closure.
    pub fn transact<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn upsert(
        &self,
        name: &str,
        target_mastery: f64,
        note: &str,
        initial_mastery: f64,
    ) -> KnowledgePoint {
        self.transact(|ledger| {
            ledger
                .upsert(name, target_mastery, note, initial_mastery)
                .clone()
        })
    }

    pub fn record_update(&self, name: &str, new_mastery: f64, score: f64, feedback: &str) -> bool {
        self.transact(|ledger| ledger.record_update(name, new_mastery, score, feedback))
    }

    pub fn get(&self, name: &str) -> Option<KnowledgePoint> {
        self.inner.lock().get(name).cloned()
    }

    pub fn progress_summary(&self) -> ProgressSummary {
        self.inner.lock().progress_summary()
    }

    pub fn snapshot(&self) -> Ledger {
        self.inner.lock().clone()
    }

    pub fn into_inner(self) -> Ledger {
        self.inner.into_inner()
    }
}
