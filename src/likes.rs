//! Projects the visitor has liked, kept in their own storage slot as `{ "<id>": true, ... }`.

use std::collections::{BTreeMap, BTreeSet};

use crate::store::KeyValueStore;

pub struct LikeBook {
    backend: Box<dyn KeyValueStore>,
    key: String,
    liked: BTreeSet<String>,
}

impl LikeBook {
    /// Same fail-soft rules as the cart slot: unreadable or malformed data starts empty.
    pub fn load(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let liked = match backend.get(&key) {
            Ok(Some(text)) => match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&text) {
                Ok(map) => map
                    .into_iter()
                    .filter(|(_, v)| v.as_bool().unwrap_or(false))
                    .map(|(id, _)| id)
                    .collect(),
                Err(e) => {
                    log::warn!("discarding malformed likes in `{key}`: {e}");
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                log::warn!("likes slot `{key}` unreadable: {e}");
                BTreeSet::new()
            }
        };
        Self { backend, key, liked }
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    /// Flips the like for `id` and returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let liked = if self.liked.remove(id) {
            false
        } else {
            self.liked.insert(id.to_owned());
            true
        };
        self.persist();
        liked
    }

    /// Count to display next to the heart: the feed's count plus the visitor's own like.
    pub fn displayed_count(&self, base: u64, id: &str) -> u64 {
        base.saturating_add(u64::from(self.is_liked(id)))
    }

    fn persist(&self) {
        let map: BTreeMap<&str, bool> = self.liked.iter().map(|id| (id.as_str(), true)).collect();
        let result = serde_json::to_string(&map)
            .map_err(crate::store::StoreError::from)
            .and_then(|text| self.backend.set(&self.key, &text));
        if let Err(e) = result {
            log::error!("failed to persist likes: {e}");
        }
    }
}
