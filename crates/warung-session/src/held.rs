//! # Held Order Store
//!
//! The client-side view of orders parked on the backend as unpaid.
//!
//! ## Reconciliation Model
//! The backend is authoritative. Every refresh replaces the collection
//! wholesale from `GET /orders?status=unpaid`; after a hold or a settled
//! recall the session refreshes again rather than patching locally.
//!
//! Two local overlays survive that model:
//! - **Discount memory**: the order API does not carry discount info, so
//!   specs for orders held in this session are remembered by id and
//!   re-attached after each refresh. Recalling such an order restores its
//!   discount; orders held by an earlier session recall without one.
//! - **Local deletes**: there is no delete endpoint, so deleting a held
//!   order only hides it locally. The backend retains the unpaid row and
//!   it will reappear on the next full reload.
//!
//! ## Staleness Guard
//! Refresh is split into `begin_refresh` / `apply_refresh`. The token taken
//! before the network call must still match when the response lands; a
//! local mutation in between bumps the generation and the stale response
//! is discarded instead of clobbering newer state.

use std::collections::HashMap;

use tracing::debug;

use warung_core::{DiscountSpec, HeldOrder};

/// Client-side cache of parked (unpaid) orders.
#[derive(Debug, Default)]
pub struct HeldOrderStore {
    orders: Vec<HeldOrder>,
    /// Discount specs for orders held in this session, keyed by order id.
    discounts: HashMap<String, DiscountSpec>,
    /// Bumped on every local mutation; stale refreshes are discarded.
    generation: u64,
}

impl HeldOrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current collection, newest last (backend order).
    pub fn orders(&self) -> &[HeldOrder] {
        &self.orders
    }

    /// Looks up a held order by backend id.
    pub fn get(&self, id: &str) -> Option<&HeldOrder> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Number of parked orders currently visible.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Checks whether any orders are parked.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Takes a staleness token before starting a refresh fetch.
    pub fn begin_refresh(&self) -> u64 {
        self.generation
    }

    /// Installs a fetched collection, unless local state moved on since the
    /// token was taken. Returns whether the refresh was applied.
    pub fn apply_refresh(&mut self, token: u64, mut orders: Vec<HeldOrder>) -> bool {
        if token != self.generation {
            debug!(
                token,
                generation = self.generation,
                "Discarding stale held-order refresh"
            );
            return false;
        }

        for order in &mut orders {
            if let Some(spec) = self.discounts.get(&order.id) {
                order.discount = Some(spec.clone());
            }
        }
        self.orders = orders;
        true
    }

    /// Remembers the discount attached to an order held in this session so
    /// refreshes (which cannot see it) keep it attached.
    pub fn remember_discount(&mut self, id: impl Into<String>, spec: DiscountSpec) {
        self.discounts.insert(id.into(), spec);
    }

    /// Removes an order from the local view and forgets its discount.
    /// Returns false if the id is unknown.
    ///
    /// This is also the "delete" operation: with no backend delete
    /// endpoint, removal is local-only and the unpaid row survives on the
    /// server.
    pub fn remove_local(&mut self, id: &str) -> bool {
        let before = self.orders.len();
        self.orders.retain(|order| order.id != id);
        self.discounts.remove(id);

        let removed = self.orders.len() != before;
        if removed {
            self.generation += 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warung_core::Money;

    fn held(id: &str) -> HeldOrder {
        HeldOrder {
            id: id.to_string(),
            items: Vec::new(),
            timestamp: "2024-05-01 12:30".to_string(),
            total: Money::from_rupiah(10_000),
            customer_type: "dine-in".to_string(),
            discount: None,
        }
    }

    #[test]
    fn test_refresh_replaces_wholesale() {
        let mut store = HeldOrderStore::new();

        let token = store.begin_refresh();
        assert!(store.apply_refresh(token, vec![held("1"), held("2")]));
        assert_eq!(store.len(), 2);

        let token = store.begin_refresh();
        assert!(store.apply_refresh(token, vec![held("3")]));
        assert_eq!(store.len(), 1);
        assert!(store.get("1").is_none());
        assert!(store.get("3").is_some());
    }

    #[test]
    fn test_stale_refresh_discarded() {
        let mut store = HeldOrderStore::new();
        let token = store.begin_refresh();
        assert!(store.apply_refresh(token, vec![held("1"), held("2")]));

        // Fetch starts, then the cashier deletes locally before it lands
        let token = store.begin_refresh();
        assert!(store.remove_local("1"));

        assert!(!store.apply_refresh(token, vec![held("1"), held("2")]));
        assert!(store.get("1").is_none());
    }

    #[test]
    fn test_discount_survives_refresh() {
        let mut store = HeldOrderStore::new();
        store.remember_discount("1", DiscountSpec::percentage("10"));

        let token = store.begin_refresh();
        assert!(store.apply_refresh(token, vec![held("1"), held("2")]));

        assert_eq!(
            store.get("1").unwrap().discount,
            Some(DiscountSpec::percentage("10"))
        );
        assert!(store.get("2").unwrap().discount.is_none());
    }

    #[test]
    fn test_remove_local_unknown_id() {
        let mut store = HeldOrderStore::new();
        let token = store.begin_refresh();
        assert!(store.apply_refresh(token, vec![held("1")]));

        assert!(!store.remove_local("99"));
        // No generation bump for a no-op, so a pending refresh still lands
        let token2 = store.begin_refresh();
        assert!(store.apply_refresh(token2, vec![held("1")]));
    }
}
