//! Change notification for cart views.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use airshop_core::ProductId;

/// What changed in the cart. Listeners usually ignore the detail and re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product was added; `quantity` is the resulting line quantity.
    Added { product_id: ProductId, quantity: u32 },
    QuantityUpdated { product_id: ProductId, quantity: u32 },
    Removed { product_id: ProductId },
    Cleared,
}

/// Callback registered with [`super::CartStore::subscribe`].
pub type CartListener = Box<dyn Fn(&CartEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SharedListener = Arc<dyn Fn(&CartEvent) + Send + Sync>;

#[derive(Default)]
pub(super) struct Listeners {
    entries: Mutex<Vec<(SubscriptionId, SharedListener)>>,
    next_id: AtomicU64,
}

impl Listeners {
    pub(super) fn add(&self, listener: CartListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::from(listener)));
        id
    }

    pub(super) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() < before
    }

    pub(super) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Call every listener. The list is snapshotted first so a listener may
    /// read the cart or (un)subscribe without deadlocking.
    pub(super) fn notify(&self, event: &CartEvent) {
        let snapshot: Vec<SharedListener> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }
}
