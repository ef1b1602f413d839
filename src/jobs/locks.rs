//! Single-writer guard per employee.
//!
//! A replace-window write and any read of the same employee's records go
//! through the same lock, so a reader never sees a half-replaced window and
//! two reconciliations of one employee never overlap.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct EmployeeLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

fn relock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panic in another worker leaves no partial state behind the unit lock
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, employee_id: i64) -> Arc<Mutex<()>> {
        relock(&self.inner)
            .entry(employee_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` while holding the employee's lock.
    pub fn with_lock<T>(&self, employee_id: i64, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(employee_id);
        let _guard = relock(&lock);
        f()
    }
}
