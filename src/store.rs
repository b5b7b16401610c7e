//! Durable key-value slots.
//!
//! The browser gets `localStorage`; tests and native builds get [`MemoryStore`]. The cart slot
//! holds a JSON array of line records and is always rewritten whole.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

use crate::cart::CartLine;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage rejected write to `{key}`: {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process slots. Clones share the same map, so a test can hold one handle while the
/// engine writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(describe(&e)))?
            .ok_or_else(|| StoreError::Unavailable("no localStorage".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(describe(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Quota exhaustion surfaces here as a DOMException.
        self.storage.set_item(key, value).map_err(|e| StoreError::WriteRejected {
            key: key.to_owned(),
            reason: describe(&e),
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Lenient shape of a persisted line; anything may be missing or mistyped.
#[derive(Debug, serde::Deserialize)]
struct StoredLine {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    timestamp: Option<f64>,
}

impl StoredLine {
    fn into_line(self) -> Option<CartLine> {
        let quantity = self.quantity.filter(|q| q.is_finite() && *q >= 1.0)?;
        let line = CartLine::new(
            self.id.unwrap_or_default(),
            self.title.unwrap_or_default(),
            self.price.unwrap_or(0.0),
        )
        .ok()?
        .with_image(self.image)
        .with_quantity(quantity.min(u32::MAX as f64) as u32);
        Some(match self.timestamp {
            Some(ts) if ts.is_finite() => line.with_added_at(ts),
            _ => line,
        })
    }
}

/// The cart's slot in a [`KeyValueStore`].
pub struct CartStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl CartStore {
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored lines. Never fails: a missing slot, an unreadable backend or a
    /// document that is not a JSON array all yield an empty cart. Individual records that
    /// cannot be salvaged are dropped; duplicate ids are folded into the first occurrence.
    pub fn load(&self) -> Vec<CartLine> {
        let text = match self.backend.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("cart slot `{}` unreadable: {e}", self.key);
                return Vec::new();
            }
        };
        let records: Vec<serde_json::Value> = match serde_json::from_str(&text) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("discarding malformed cart in `{}`: {e}", self.key);
                return Vec::new();
            }
        };

        let mut lines: Vec<CartLine> = Vec::with_capacity(records.len());
        for record in records {
            let Some(line) = serde_json::from_value::<StoredLine>(record)
                .ok()
                .and_then(StoredLine::into_line)
            else {
                log::debug!("skipping unusable cart record in `{}`", self.key);
                continue;
            };
            match lines.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => lines.push(line),
            }
        }
        lines
    }

    /// Overwrites the slot with the full line list.
    pub fn save(&self, lines: &[CartLine]) -> Result<(), StoreError> {
        let text = serde_json::to_string(lines)?;
        self.backend.set(&self.key, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(raw: Option<&str>) -> (MemoryStore, CartStore) {
        let mem = MemoryStore::new();
        if let Some(raw) = raw {
            mem.set("cart", raw).unwrap();
        }
        (mem.clone(), CartStore::new(Box::new(mem), "cart"))
    }

    #[test]
    fn missing_slot_loads_empty() {
        let (_, store) = store_with(None);
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_slot_loads_empty() {
        let (_, store) = store_with(Some("{\"id\": oops"));
        assert!(store.load().is_empty());
        let (_, store) = store_with(Some("{\"id\": \"x\"}"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_keeps_order_and_values() {
        let (_, store) = store_with(None);
        let lines = vec![
            CartLine::new("b", "Benchy", 10.0).unwrap().with_quantity(2),
            CartLine::new("a", "Vase", 5.5).unwrap().with_quantity(3).with_image(Some("vase.jpg".into())),
        ];
        store.save(&lines).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "b");
        assert_eq!(loaded[0].quantity, 2);
        assert_eq!(loaded[0].unit_price, 10.0);
        assert_eq!(loaded[1].id, "a");
        assert_eq!(loaded[1].quantity, 3);
        assert_eq!(loaded[1].unit_price, 5.5);
        assert_eq!(loaded[1].image_ref.as_deref(), Some("vase.jpg"));
    }

    #[test]
    fn persisted_shape_uses_site_field_names() {
        let (mem, store) = store_with(None);
        store
            .save(&[CartLine::new("x", "Gear", 12.0).unwrap().with_added_at(1000.0)])
            .unwrap();
        let raw: serde_json::Value = serde_json::from_str(&mem.raw("cart").unwrap()).unwrap();
        let record = &raw[0];
        assert_eq!(record["id"], "x");
        assert_eq!(record["title"], "Gear");
        assert_eq!(record["price"], 12.0);
        assert_eq!(record["quantity"], 1);
        assert_eq!(record["timestamp"], 1000.0);
        assert!(record["image"].is_null());
    }

    #[test]
    fn unusable_records_are_dropped_and_duplicates_folded() {
        let (_, store) = store_with(Some(
            r#"[
                {"id":"x","title":"Gear","price":4,"quantity":1},
                {"title":"no id","price":1,"quantity":1},
                {"id":"y","price":2,"quantity":0},
                "garbage",
                {"id":"x","price":4,"quantity":2},
                {"id":"z","price":-3,"quantity":1,"image":""}
            ]"#,
        ));
        let loaded = store.load();
        let ids: Vec<&str> = loaded.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["x", "z"]);
        assert_eq!(loaded[0].quantity, 3);
        assert_eq!(loaded[1].unit_price, 0.0);
        assert_eq!(loaded[1].image_ref, None);
        assert!(!loaded[1].title.is_empty());
    }
}
