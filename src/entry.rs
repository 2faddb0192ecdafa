//! A single cached record: key, value, timestamps, access counter, and the
//! per-entry list of about-to-expire observers.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

/// Callback fired just before a specific entry is removed, either by
/// [`crate::Table::delete`] or by the janitor's expiration pass. Receives the
/// entry's key.
pub type EntryObserver<K> = Arc<dyn Fn(&K) + Send + Sync>;

struct AccessState {
    accessed_on: Instant,
    access_count: u64,
}

/// One cached record.
///
/// `value` is `None` exactly when this entry was admitted via the
/// `allow_null_on_load_error` path after a loader failure — a deliberately
/// cacheable "no value" result, not the absence of an entry.
///
/// All fields except the access timestamp/counter and the about-to-expire
/// observer list are immutable once constructed: a refresh on sweep builds a
/// brand new `Entry` and swaps it into the table rather than mutating this
/// one in place (see `Table::run_expiration_pass`).
pub struct Entry<K, V> {
    key: K,
    value: Option<V>,
    life_span: Duration,
    created_on: Instant,
    access: RwLock<AccessState>,
    about_to_expire: Mutex<Vec<EntryObserver<K>>>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: Option<V>, life_span: Duration) -> Self {
        let now = Instant::now();
        Self {
            key,
            value,
            life_span,
            created_on: now,
            access: RwLock::new(AccessState {
                accessed_on: now,
                access_count: 0,
            }),
            about_to_expire: Mutex::new(Vec::new()),
        }
    }

    /// The entry's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The cached value, or `None` for a null entry admitted after a
    /// swallowed loader error.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Configured lifetime. Zero means "never expires by time".
    pub fn life_span(&self) -> Duration {
        self.life_span
    }

    /// Wall-clock time of admission.
    pub fn created_on(&self) -> Instant {
        self.created_on
    }

    /// Wall-clock time of the last [`Entry::keep_alive`] call.
    pub fn accessed_on(&self) -> Instant {
        self.access.read().accessed_on
    }

    /// Number of successful keep-alive (hit) accesses since admission.
    pub fn access_count(&self) -> u64 {
        self.access.read().access_count
    }

    /// Record a read hit: bump `accessed_on` to now and increment
    /// `access_count`. Uses the entry's own lock, never the owning table's
    /// lock, so a hot read never upgrades the table's read lock to a write
    /// lock.
    pub(crate) fn keep_alive(&self) {
        let mut access = self.access.write();
        access.accessed_on = Instant::now();
        access.access_count += 1;
    }

    /// Append an about-to-expire observer without clearing existing ones.
    pub fn add_about_to_expire_callback(&self, f: EntryObserver<K>) {
        self.about_to_expire.lock().push(f);
    }

    /// Clear any existing about-to-expire observers, then register `f` as
    /// the sole observer.
    pub fn set_about_to_expire_callback(&self, f: EntryObserver<K>) {
        let mut observers = self.about_to_expire.lock();
        observers.clear();
        observers.push(f);
    }

    /// Remove all about-to-expire observers.
    pub fn remove_about_to_expire_callbacks(&self) {
        self.about_to_expire.lock().clear();
    }

    /// Snapshot the current about-to-expire observer list in registration
    /// order. Called by the owning table while holding its write lock, so
    /// callers get a stable list to fan out after releasing that lock.
    pub(crate) fn snapshot_about_to_expire(&self) -> Vec<EntryObserver<K>> {
        self.about_to_expire.lock().clone()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("life_span", &self.life_span)
            .field("access_count", &self.access_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_alive_advances_accessed_on_and_count() {
        let entry: Entry<&str, i32> = Entry::new("k", Some(1), Duration::from_secs(1));
        assert_eq!(entry.access_count(), 0);
        let created = entry.accessed_on();

        std::thread::sleep(Duration::from_millis(2));
        entry.keep_alive();

        assert_eq!(entry.access_count(), 1);
        assert!(entry.accessed_on() >= created);

        entry.keep_alive();
        assert_eq!(entry.access_count(), 2);
    }

    #[test]
    fn null_entry_has_no_value() {
        let entry: Entry<&str, i32> = Entry::new("k", None, Duration::from_secs(1));
        assert_eq!(entry.value(), None);
    }

    #[test]
    fn about_to_expire_set_then_add_then_remove() {
        let entry: Entry<&str, i32> = Entry::new("k", Some(1), Duration::ZERO);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let c1 = calls.clone();
        entry.set_about_to_expire_callback(Arc::new(move |k: &&str| c1.lock().push((*k, 1))));
        let c2 = calls.clone();
        entry.add_about_to_expire_callback(Arc::new(move |k: &&str| c2.lock().push((*k, 2))));

        let observers = entry.snapshot_about_to_expire();
        assert_eq!(observers.len(), 2);
        for obs in &observers {
            obs(entry.key());
        }
        assert_eq!(*calls.lock(), vec![("k", 1), ("k", 2)]);

        entry.remove_about_to_expire_callbacks();
        assert!(entry.snapshot_about_to_expire().is_empty());
    }

    #[test]
    fn set_about_to_expire_clears_prior_registrations() {
        let entry: Entry<&str, i32> = Entry::new("k", Some(1), Duration::ZERO);
        entry.add_about_to_expire_callback(Arc::new(|_k: &&str| {}));
        entry.add_about_to_expire_callback(Arc::new(|_k: &&str| {}));
        assert_eq!(entry.snapshot_about_to_expire().len(), 2);

        entry.set_about_to_expire_callback(Arc::new(|_k: &&str| {}));
        assert_eq!(entry.snapshot_about_to_expire().len(), 1);
    }
}
