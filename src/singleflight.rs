//! Per-key deduplication of concurrent operations.
//!
//! Mirrors Go's `x/sync/singleflight`: the first caller for a key becomes
//! the leader and actually runs the work; every other caller for the same
//! key during the flight blocks and receives the exact same result (an
//! `Arc` clone of the leader's output, not a re-computed value). Once the
//! flight completes its record is removed, so a later call for the same key
//! starts a fresh flight.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

enum CallState<T> {
    Pending,
    Ready(Arc<T>),
}

struct Call<T> {
    state: Mutex<CallState<T>>,
    ready: Condvar,
}

impl<T> Call<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(CallState::Pending),
            ready: Condvar::new(),
        }
    }

    /// Block until the leader completes, then return its result.
    fn wait(&self) -> Arc<T> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                CallState::Ready(value) => return value.clone(),
                CallState::Pending => self.ready.wait(&mut state),
            }
        }
    }

    fn complete(&self, value: Arc<T>) {
        let mut state = self.state.lock();
        *state = CallState::Ready(value);
        self.ready.notify_all();
    }
}

/// Dedup gate keyed by cache key.
pub(crate) struct SingleFlight<K, T> {
    calls: Mutex<HashMap<K, Arc<Call<T>>>>,
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` at most once per in-flight `key`. The first caller for a key
    /// runs `f` as the leader; concurrent callers for the same key wait and
    /// receive the leader's result instead of re-running `f`.
    pub(crate) fn do_call<F>(&self, key: K, f: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        let (call, is_leader) = {
            let mut calls = self.calls.lock();
            if let Some(existing) = calls.get(&key) {
                (existing.clone(), false)
            } else {
                let call = Arc::new(Call::new());
                calls.insert(key.clone(), call.clone());
                (call, true)
            }
        };

        if !is_leader {
            return call.wait();
        }

        let result = Arc::new(f());
        call.complete(result.clone());
        self.calls.lock().remove(&key);
        result
    }
}
