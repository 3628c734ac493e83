//! Shopper cart kept in the local key-value store.
//!
//! The cart is the one piece of client-owned state: nothing is mirrored on the
//! backend until an order is placed. Every view that shows cart data goes
//! through a [`CartStore`] and re-reads after a change notification instead
//! of sharing an in-memory copy.
//!
//! # Invariants
//!
//! - At most one line item per product.
//! - Every line item has `quantity >= 1`; an item that would drop to zero is
//!   removed instead.
//! - Storage failures never reach the caller. A cart that cannot be read is
//!   empty; a write that fails is logged and dropped.

mod listeners;

pub use listeners::{CartEvent, CartListener, SubscriptionId};

use std::sync::{Arc, Mutex};

use airshop_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::Product;
use crate::storage::{self, KeyValueStore, keys};
use listeners::Listeners;

/// One product entry in the cart.
///
/// Persisted as camelCase JSON. `id` is accepted as an alias of `productId`
/// so carts written by the browser storefront load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub volume: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Product snapshot captured when it is first added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub price: Decimal,
    pub volume: String,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            image: product.image.clone(),
            price: product.price,
            volume: product.volume.clone(),
        }
    }
}

impl CartProduct {
    fn into_line_item(self, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: self.product_id,
            name: self.name,
            brand: self.brand,
            image: self.image,
            price: self.price,
            volume: self.volume,
            quantity,
        }
    }
}

/// Read/mutate interface over the shopper's cart.
///
/// Implemented by [`Cart`]; views and the checkout flow depend on this trait
/// so they can be handed any backing store.
pub trait CartStore: Send + Sync {
    /// Line items in insertion order. Empty when nothing is stored or the
    /// stored data is unreadable.
    fn read(&self) -> Vec<CartLineItem>;

    /// Add `quantity` of `product`, merging into an existing line item.
    /// A zero quantity is ignored.
    fn add(&self, product: CartProduct, quantity: u32);

    /// Set a line item's quantity to `max(1, quantity)`. No-op when absent.
    fn update_quantity(&self, product_id: ProductId, quantity: i64);

    /// Remove the line item for `product_id`, if present.
    fn remove(&self, product_id: ProductId);

    /// Remove every line item.
    fn clear(&self);

    /// Register a listener called after every successful mutation.
    fn subscribe(&self, listener: CartListener) -> SubscriptionId;

    /// Drop a listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Sum of price × quantity over all line items.
    fn total(&self) -> Decimal {
        self.read().iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all line items.
    fn count(&self) -> u64 {
        self.read().iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether the cart holds no line items.
    fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

/// [`CartStore`] persisted under [`keys::CART`] in a [`KeyValueStore`].
///
/// Cheap to clone; clones share the backing store and listeners.
#[derive(Clone)]
pub struct Cart {
    inner: Arc<CartInner>,
}

struct CartInner {
    store: Arc<dyn KeyValueStore>,
    listeners: Listeners,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl Cart {
    /// Create a cart over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(CartInner {
                store,
                listeners: Listeners::default(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    fn load(&self) -> Vec<CartLineItem> {
        let items: Vec<CartLineItem> =
            match storage::get_json(self.inner.store.as_ref(), keys::CART) {
                Ok(Some(items)) => items,
                Ok(None) => return Vec::new(),
                Err(e) => {
                    warn!(error = %e, "Cart storage unreadable, treating cart as empty");
                    return Vec::new();
                }
            };

        normalize(items)
    }

    fn save(&self, items: &[CartLineItem]) -> bool {
        match storage::set_json(self.inner.store.as_ref(), keys::CART, items) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to persist cart");
                false
            }
        }
    }

    /// Run a read-modify-write cycle. `mutate` returns the event to publish,
    /// or `None` when nothing changed and nothing should be written.
    fn mutate<F>(&self, mutate: F)
    where
        F: FnOnce(&mut Vec<CartLineItem>) -> Option<CartEvent>,
    {
        let event = {
            let _guard = self
                .inner
                .write_lock
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);

            let mut items = self.load();
            let Some(event) = mutate(&mut items) else {
                return;
            };
            if !self.save(&items) {
                return;
            }
            event
        };

        debug!(event = ?event, "Cart updated");
        self.inner.listeners.notify(&event);
    }
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("listeners", &self.inner.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CartStore for Cart {
    fn read(&self) -> Vec<CartLineItem> {
        self.load()
    }

    fn add(&self, product: CartProduct, quantity: u32) {
        if quantity == 0 {
            return;
        }

        self.mutate(|items| {
            let product_id = product.product_id;
            let quantity = match items.iter_mut().find(|i| i.product_id == product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(quantity);
                    existing.quantity
                }
                None => {
                    items.push(product.into_line_item(quantity));
                    quantity
                }
            };
            Some(CartEvent::Added {
                product_id,
                quantity,
            })
        });
    }

    fn update_quantity(&self, product_id: ProductId, quantity: i64) {
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);

        self.mutate(|items| {
            let item = items.iter_mut().find(|i| i.product_id == product_id)?;
            item.quantity = quantity;
            Some(CartEvent::QuantityUpdated {
                product_id,
                quantity,
            })
        });
    }

    fn remove(&self, product_id: ProductId) {
        self.mutate(|items| {
            let before = items.len();
            items.retain(|i| i.product_id != product_id);
            (items.len() < before).then_some(CartEvent::Removed { product_id })
        });
    }

    fn clear(&self) {
        self.mutate(|items| {
            items.clear();
            Some(CartEvent::Cleared)
        });
    }

    fn subscribe(&self, listener: CartListener) -> SubscriptionId {
        self.inner.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.remove(id)
    }
}

/// Restore the cart invariants on data read back from storage: drop
/// zero-quantity lines and merge duplicate products into their first line.
fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut out: Vec<CartLineItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity == 0 {
            continue;
        }
        match out.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => out.push(item),
        }
    }
    out
}
