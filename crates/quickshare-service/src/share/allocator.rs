//! Four-digit share code allocation.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use quickshare_core::error::AppError;
use quickshare_core::types::{SHARE_ID_SPACE, ShareId};
use quickshare_entity::share::ShareRecord;
use quickshare_store::ShareStore;

/// A code successfully claimed in the store.
#[derive(Debug)]
pub struct Claimed {
    /// The claimed code.
    pub share_id: ShareId,
    /// An expired record that previously held the code.
    pub evicted: Option<ShareRecord>,
}

/// Picks a free share code and claims it atomically.
///
/// A fixed number of random codes is tried first. If all of them are taken
/// the whole code space is probed in order from a random offset, so a
/// request only fails when every code is held by a live share.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    random_attempts: usize,
}

impl IdAllocator {
    /// Creates an allocator that draws `random_attempts` random codes
    /// before probing.
    pub fn new(random_attempts: usize) -> Self {
        Self { random_attempts }
    }

    fn candidates(&self) -> Vec<ShareId> {
        let mut rng = rand::rng();
        let random: Vec<ShareId> = (0..self.random_attempts)
            .map(|_| ShareId::random(&mut rng))
            .collect();
        let start = ShareId::random(&mut rng);
        let probe = std::iter::successors(Some(start), |id| Some(id.next()))
            .take(SHARE_ID_SPACE as usize);
        random.into_iter().chain(probe).collect()
    }

    /// Claim a code for `record`, overwriting its `share_id`.
    pub fn claim(
        &self,
        store: &ShareStore,
        mut record: ShareRecord,
        now: DateTime<Utc>,
    ) -> Result<Claimed, AppError> {
        for (attempt, candidate) in self.candidates().into_iter().enumerate() {
            record.share_id = candidate;
            match store.try_claim(record, now) {
                Ok(evicted) => {
                    if attempt >= self.random_attempts {
                        debug!(share_id = %candidate, attempt, "Share code found by probing");
                    }
                    return Ok(Claimed {
                        share_id: candidate,
                        evicted,
                    });
                }
                Err(returned) => record = returned,
            }
        }

        warn!("All share codes are in use");
        Err(AppError::service_unavailable(
            "No share codes are available, please try again later",
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use quickshare_entity::share::ShareContent;

    use super::*;

    fn record(now: DateTime<Utc>) -> ShareRecord {
        ShareRecord::new(
            ShareId::new(0).unwrap(),
            ShareContent::Text {
                text: "x".into(),
                rich_text: false,
            },
            now,
            Duration::hours(24),
            None,
        )
    }

    #[test]
    fn test_claims_distinct_codes() {
        let store = ShareStore::new();
        let allocator = IdAllocator::new(10);
        let now = Utc::now();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let claimed = allocator.claim(&store, record(now), now).unwrap();
            assert!(seen.insert(claimed.share_id));
        }
        assert_eq!(store.len(), 500);
    }

    #[test]
    fn test_probe_finds_last_free_code() {
        let store = ShareStore::new();
        let now = Utc::now();
        for n in 0..SHARE_ID_SPACE {
            if n == 4321 {
                continue;
            }
            let mut r = record(now);
            r.share_id = ShareId::new(n).unwrap();
            store.try_claim(r, now).unwrap();
        }

        let claimed = IdAllocator::new(3).claim(&store, record(now), now).unwrap();
        assert_eq!(claimed.share_id.value(), 4321);

        let err = IdAllocator::new(3)
            .claim(&store, record(now), now)
            .unwrap_err();
        assert_eq!(err.kind, quickshare_core::error::ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_expired_code_is_reused() {
        let store = ShareStore::new();
        let then = Utc::now();
        for n in 0..SHARE_ID_SPACE {
            let mut r = record(then);
            r.share_id = ShareId::new(n).unwrap();
            store.try_claim(r, then).unwrap();
        }

        let later = then + Duration::hours(25);
        let claimed = IdAllocator::new(10)
            .claim(&store, record(later), later)
            .unwrap();
        assert!(claimed.evicted.is_some());
    }
}
