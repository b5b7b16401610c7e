//! Cart lines, the cart collection and the engine that owns it.
//!
//! [`CartEngine`] is the single writer. Every mutation is applied in memory, written to the
//! [`CartStore`] and then broadcast to subscribers, in that order.

use serde::Serialize;

use crate::store::CartStore;

pub const DEFAULT_TITLE: &str = "Custom Project";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("cart line has no stable id")]
    MissingId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub id: String,
    pub title: String,
    #[serde(rename = "price")]
    pub unit_price: f64,
    #[serde(rename = "image")]
    pub image_ref: Option<String>,
    pub quantity: u32,
    /// Milliseconds since the epoch.
    #[serde(rename = "timestamp")]
    pub added_at: f64,
}

impl CartLine {
    /// A single unit of `id`. A blank id is refused; a blank title and a negative or
    /// non-finite price are replaced with safe defaults.
    pub fn new(id: impl Into<String>, title: impl Into<String>, unit_price: f64) -> Result<Self, CartError> {
        let id = id.into().trim().to_owned();
        if id.is_empty() {
            return Err(CartError::MissingId);
        }
        let title = title.into();
        let title = match title.trim() {
            "" => DEFAULT_TITLE.to_owned(),
            t => t.to_owned(),
        };
        let unit_price = if unit_price.is_finite() && unit_price > 0.0 { unit_price } else { 0.0 };

        Ok(Self {
            id,
            title,
            unit_price,
            image_ref: None,
            quantity: 1,
            added_at: now_millis(),
        })
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image_ref = image.filter(|s| !s.trim().is_empty());
        self
    }

    /// Zero is raised to one.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn with_added_at(mut self, millis: f64) -> Self {
        self.added_at = millis;
        self
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Lines in insertion order, at most one per id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities, not the number of lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().fold(0u32, |n, l| n.saturating_add(l.quantity))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.id == id)
    }
}

type Listener = Box<dyn FnMut(&Cart)>;

/// Owns the cart. Subscribers are called synchronously after each persisted change and must
/// not reach back into the engine from inside the callback.
pub struct CartEngine {
    cart: Cart,
    store: CartStore,
    listeners: Vec<Listener>,
}

impl CartEngine {
    /// Hydrates from `store`.
    pub fn new(store: CartStore) -> Self {
        let lines = store.load();
        log::debug!("cart hydrated from `{}` with {} line(s)", store.key(), lines.len());
        Self {
            cart: Cart { lines },
            store,
            listeners: Vec::new(),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn subtotal(&self) -> f64 {
        self.cart.subtotal()
    }

    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Registers `listener` and immediately hands it the current cart so late subscribers
    /// start in sync.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&Cart) + 'static) {
        listener(&self.cart);
        self.listeners.push(Box::new(listener));
    }

    /// Merges into an existing line with the same id, otherwise appends.
    pub fn add_item(&mut self, candidate: CartLine) {
        match self.cart.position(&candidate.id) {
            Some(i) => {
                let line = &mut self.cart.lines[i];
                line.quantity = line.quantity.saturating_add(candidate.quantity.max(1));
            }
            None => self.cart.lines.push(candidate),
        }
        self.commit();
    }

    /// Sets an absolute quantity; anything below one removes the line. Returns whether a
    /// line with `id` existed.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        let Some(i) = self.cart.position(id) else {
            return false;
        };
        if quantity < 1 {
            self.cart.lines.remove(i);
        } else {
            self.cart.lines[i].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.commit();
        true
    }

    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let Some(i) = self.cart.position(id) else {
            return false;
        };
        self.cart.lines.remove(i);
        self.commit();
        true
    }

    fn commit(&mut self) {
        // A failed write keeps the in-memory cart authoritative for this session.
        if let Err(e) = self.store.save(&self.cart.lines) {
            log::error!("failed to persist cart: {e}");
        }
        for listener in &mut self.listeners {
            listener(&self.cart);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
