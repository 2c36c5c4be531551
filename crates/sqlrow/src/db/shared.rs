use super::Db;
use std::sync::{Arc, Mutex, MutexGuard};

/// A [`Db`] shared across threads.
///
/// Clause state is mutated in place, so a whole accumulate → render →
/// execute → reset cycle must run under one lock. [`SharedDb::with`] holds the
/// lock for the duration of the closure.
#[derive(Clone)]
pub struct SharedDb {
    inner: Arc<Mutex<Db>>,
}

impl SharedDb {
    pub fn new(db: Db) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    /// Run `f` with exclusive access to the context.
    pub fn with<R>(&self, f: impl FnOnce(&mut Db) -> R) -> R {
        f(&mut self.lock())
    }

    /// Lock the context. A poisoned lock is recovered and its pending
    /// clause state discarded.
    pub fn lock(&self) -> MutexGuard<'_, Db> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                guard.reset();
                self.inner.clear_poison();
                guard
            }
        }
    }
}

impl From<Db> for SharedDb {
    fn from(db: Db) -> Self {
        Self::new(db)
    }
}
