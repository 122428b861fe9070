//! In-memory share store using dashmap.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use quickshare_core::types::ShareId;
use quickshare_entity::share::ShareRecord;

/// Outcome of looking a share up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The share is live; the record reflects any counter update just made.
    Live(ShareRecord),
    /// The share had expired and was removed by this lookup.
    Expired(ShareRecord),
    /// No record under that code.
    Missing,
}

impl Lookup {
    /// The live record, if any.
    pub fn live(self) -> Option<ShareRecord> {
        match self {
            Self::Live(record) => Some(record),
            _ => None,
        }
    }
}

/// The live share map.
///
/// Every operation on a single code runs under that entry's shard lock, so
/// expiry checks and counter updates are exact under concurrency.
#[derive(Debug, Default)]
pub struct ShareStore {
    shares: DashMap<ShareId, ShareRecord>,
    dirty: AtomicBool,
}

impl ShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `record.share_id` if it is vacant or held by an expired record.
    ///
    /// Returns the evicted expired record on success, or hands `record`
    /// back when the code is held by a live share.
    pub fn try_claim(
        &self,
        record: ShareRecord,
        now: DateTime<Utc>,
    ) -> Result<Option<ShareRecord>, ShareRecord> {
        let claimed = match self.shares.entry(record.share_id) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                None
            }
            Entry::Occupied(mut slot) => {
                if !slot.get().is_expired(now) {
                    return Err(record);
                }
                Some(slot.insert(record))
            }
        };
        self.mark_dirty();
        Ok(claimed)
    }

    /// Look a share up and count the view.
    pub fn get_and_touch(&self, id: ShareId, now: DateTime<Utc>) -> Lookup {
        self.lookup_with(id, now, |record| record.view_count += 1)
    }

    /// Look a share up and count a download.
    pub fn record_download(&self, id: ShareId, now: DateTime<Utc>) -> Lookup {
        self.lookup_with(id, now, |record| record.download_count += 1)
    }

    /// Look a share up without touching its counters.
    pub fn peek(&self, id: ShareId, now: DateTime<Utc>) -> Lookup {
        match self.shares.entry(id) {
            Entry::Vacant(_) => Lookup::Missing,
            Entry::Occupied(slot) => {
                if slot.get().is_expired(now) {
                    self.mark_dirty();
                    Lookup::Expired(slot.remove())
                } else {
                    Lookup::Live(slot.get().clone())
                }
            }
        }
    }

    fn lookup_with(
        &self,
        id: ShareId,
        now: DateTime<Utc>,
        touch: impl FnOnce(&mut ShareRecord),
    ) -> Lookup {
        let lookup = match self.shares.entry(id) {
            Entry::Vacant(_) => return Lookup::Missing,
            Entry::Occupied(mut slot) => {
                if slot.get().is_expired(now) {
                    Lookup::Expired(slot.remove())
                } else {
                    touch(slot.get_mut());
                    Lookup::Live(slot.get().clone())
                }
            }
        };
        self.mark_dirty();
        lookup
    }

    /// Remove a share only if it is still the one created at `created_at`.
    ///
    /// Guards against deleting a share that expired and was replaced while
    /// the caller was checking a password.
    pub fn remove_if_created_at(
        &self,
        id: ShareId,
        created_at: DateTime<Utc>,
    ) -> Option<ShareRecord> {
        let removed = self
            .shares
            .remove_if(&id, |_, record| record.created_at == created_at)
            .map(|(_, record)| record);
        if removed.is_some() {
            self.mark_dirty();
        }
        removed
    }

    /// Remove every expired share and return the removed records.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Vec<ShareRecord> {
        let expired: Vec<ShareId> = self
            .shares
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| *entry.key())
            .collect();

        let removed: Vec<ShareRecord> = expired
            .into_iter()
            .filter_map(|id| {
                self.shares
                    .remove_if(&id, |_, record| record.is_expired(now))
                    .map(|(_, record)| record)
            })
            .collect();

        if !removed.is_empty() {
            self.mark_dirty();
            debug!(count = removed.len(), "Purged expired shares");
        }
        removed
    }

    /// Blob names referenced by any record still in the map.
    pub fn referenced_blobs(&self) -> HashSet<String> {
        self.shares
            .iter()
            .filter_map(|entry| entry.value().storage_path().map(str::to_string))
            .collect()
    }

    /// Number of shares that are still live at `now`.
    pub fn live_count(&self, now: DateTime<Utc>) -> usize {
        self.shares
            .iter()
            .filter(|entry| !entry.value().is_expired(now))
            .count()
    }

    /// Number of records held, expired or not.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Copy every record out, ordered by share code.
    pub fn snapshot(&self) -> Vec<ShareRecord> {
        let mut records: Vec<ShareRecord> =
            self.shares.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|record| record.share_id);
        records
    }

    /// Load records, skipping those already expired at `now`.
    ///
    /// Returns how many records were loaded.
    pub fn restore(&self, records: Vec<ShareRecord>, now: DateTime<Utc>) -> usize {
        let mut loaded = 0;
        for record in records {
            if record.is_expired(now) {
                continue;
            }
            self.shares.insert(record.share_id, record);
            loaded += 1;
        }
        loaded
    }

    /// Flag that the snapshot is stale.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clear the dirty flag and report whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}
