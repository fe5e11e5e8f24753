//! Server-side carts keyed by visitor.
//!
//! Each cart sits behind its own async mutex. A change holds the lock from
//! read to write, so concurrent requests from one visitor apply one after
//! another and none is lost. Carts idle for the session lifetime are
//! dropped along with the session that pointed at them.

use std::sync::Arc;
use std::time::Duration;

use athyre_core::Cart;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

/// Maximum carts held at once; least recently used go first.
const MAX_CARTS: u64 = 100_000;

/// Matches the session inactivity expiry (7 days).
const CART_IDLE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Carts for every active visitor.
#[derive(Clone)]
pub struct CartStore {
    carts: Cache<Uuid, Arc<Mutex<Cart>>>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        let carts = Cache::builder()
            .max_capacity(MAX_CARTS)
            .time_to_idle(CART_IDLE_TIMEOUT)
            .build();
        Self { carts }
    }

    /// Snapshot of a visitor's cart; empty if they never added anything.
    pub async fn get(&self, visitor: Uuid) -> Cart {
        match self.carts.get(&visitor).await {
            Some(cart) => cart.lock().await.clone(),
            None => Cart::default(),
        }
    }

    /// Apply `change` to a visitor's cart while holding its lock.
    ///
    /// Returns the cart as it stands after the change along with the
    /// change's own result. A failed change leaves the cart as it was.
    ///
    /// # Errors
    ///
    /// Returns whatever `change` returns.
    #[instrument(skip(self, change))]
    pub async fn update<T, E>(
        &self,
        visitor: Uuid,
        change: impl FnOnce(&mut Cart) -> Result<T, E>,
    ) -> Result<(Cart, T), E> {
        let cart = self
            .carts
            .get_with(visitor, async { Arc::new(Mutex::new(Cart::default())) })
            .await;
        let mut cart = cart.lock().await;

        let mut draft = cart.clone();
        let outcome = change(&mut draft)?;
        *cart = draft;

        Ok((cart.clone(), outcome))
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use athyre_core::{Product, ProductId};

    use super::*;
    use crate::catalog::Catalog;

    fn tank() -> Product {
        Catalog::rise()
            .product(ProductId::new(3))
            .cloned()
            .expect("tank in catalog")
    }

    #[tokio::test]
    async fn test_unknown_visitor_has_empty_cart() {
        let store = CartStore::new();
        assert_eq!(store.get(Uuid::new_v4()).await, Cart::default());
    }

    #[tokio::test]
    async fn test_update_is_visible_to_later_reads() {
        let store = CartStore::new();
        let visitor = Uuid::new_v4();
        let product = tank();

        let (cart, quantity) = store
            .update(visitor, |cart| cart.add(&product, "M", "Black"))
            .await
            .expect("add");

        assert_eq!(quantity, 1);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(store.get(visitor).await.item_count(), 1);
        assert_eq!(store.get(Uuid::new_v4()).await.item_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_cart_unchanged() {
        let store = CartStore::new();
        let visitor = Uuid::new_v4();
        let product = tank();

        store
            .update(visitor, |cart| cart.add(&product, "M", "Black"))
            .await
            .expect("add");
        let result = store
            .update(visitor, |cart| {
                cart.add(&product, "S", "Black")?;
                cart.add(&product, "XXL", "Black")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.get(visitor).await.item_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let store = CartStore::new();
        let visitor = Uuid::new_v4();
        let product = Arc::new(tank());

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                let product = Arc::clone(&product);
                tokio::spawn(async move {
                    store
                        .update(visitor, |cart| cart.add(&product, "M", "Black"))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("join").expect("add");
        }

        assert_eq!(store.get(visitor).await.item_count(), 50);
    }
}
