//! Guest cart backed by durable storage.

use buylock_store::Store;

use crate::cart::{CartLine, NewCartLine};
use crate::error::CommerceError;
use crate::ids::LineItemId;
use crate::keys;

/// Cart for a shopper who has not signed in.
///
/// The full collection is written back to storage after every mutation, so
/// the stored copy always matches memory once a call returns. Two processes
/// sharing a store can still overwrite each other's changes.
#[derive(Debug)]
pub struct GuestCart {
    store: Store,
    lines: Vec<CartLine>,
}

impl GuestCart {
    /// Open the cart persisted in `store`.
    ///
    /// An unreadable or malformed stored cart opens as an empty cart.
    pub fn open(store: Store) -> Self {
        let lines = Self::load(&store).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable guest cart");
            Vec::new()
        });
        Self { store, lines }
    }

    /// Read the persisted lines without any fallback.
    pub fn load(store: &Store) -> Result<Vec<CartLine>, CommerceError> {
        Ok(store.get(&keys::guest_cart())?.unwrap_or_default())
    }

    /// Add an item, merging it into an existing line for the same product or
    /// service.
    ///
    /// On a merge only the existing line's quantity changes; its snapshot and
    /// booking details are kept. Returns the id of the line holding the item.
    pub fn add(&mut self, item: NewCartLine) -> Result<LineItemId, CommerceError> {
        if item.quantity == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        if item.product_id.is_none() && item.service_id.is_none() {
            return Err(CommerceError::MissingItemReference);
        }

        let id = match self.lines.iter_mut().find(|line| line.refers_to_same(&item)) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                existing.id.clone()
            }
            None => {
                let id = LineItemId::generate();
                self.lines.push(item.into_line(id.clone()));
                id
            }
        };

        self.persist();
        Ok(id)
    }

    /// Set a line's quantity.
    ///
    /// Negative quantities count as zero, and any line left at zero is removed
    /// in the same step. Returns whether a line with `id` existed.
    pub fn update_quantity(&mut self, id: &LineItemId, quantity: i64) -> bool {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        let mut found = false;
        for line in self.lines.iter_mut().filter(|line| &line.id == id) {
            line.quantity = quantity;
            found = true;
        }
        self.lines.retain(|line| line.quantity > 0);

        self.persist();
        found
    }

    /// Remove a line. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &LineItemId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        let removed = self.lines.len() < len_before;

        self.persist();
        removed
    }

    /// Empty the cart and delete the stored copy.
    pub fn clear(&mut self) {
        self.lines.clear();
        if let Err(e) = self.store.delete(&keys::guest_cart()) {
            tracing::warn!(error = %e, "failed to delete stored guest cart");
        }
    }

    /// Hand the lines to checkout and empty the cart.
    pub fn take_for_checkout(&mut self) -> Vec<CartLine> {
        let lines = std::mem::take(&mut self.lines);
        self.clear();
        tracing::info!(lines = lines.len(), "guest cart handed off to checkout");
        lines
    }

    /// Sum of quantity times unit price, in the base currency.
    pub fn total(&self) -> f64 {
        // Fold from +0.0; an empty f64 `sum` is -0.0.
        self.lines
            .iter()
            .fold(0.0, |total, line| total + line.subtotal())
    }

    /// Sum of quantities.
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, id: &LineItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write the full collection to storage. Failures are logged only.
    pub fn persist(&self) {
        if let Err(e) = self.store.set(&keys::guest_cart(), &self.lines) {
            tracing::warn!(error = %e, "failed to save guest cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CatalogSnapshot;
    use buylock_store::MemoryBackend;

    fn priced(product_id: &str, quantity: u32, price: f64) -> NewCartLine {
        NewCartLine::product(product_id, quantity)
            .with_snapshot(CatalogSnapshot::new(product_id, product_id, price))
    }

    fn empty_cart() -> (Store, GuestCart) {
        let store = Store::new(MemoryBackend::new());
        let cart = GuestCart::open(store.clone());
        (store, cart)
    }

    #[test]
    fn test_add_same_product_merges() {
        let (_, mut cart) = empty_cart();

        let first = cart.add(NewCartLine::product("p1", 2)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&first).unwrap().quantity, 2);

        let second = cart.add(NewCartLine::product("p1", 3)).unwrap();
        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&first).unwrap().quantity, 5);
    }

    #[test]
    fn test_merge_keeps_existing_snapshot() {
        let (_, mut cart) = empty_cart();

        let id = cart.add(priced("p1", 1, 100.0)).unwrap();
        cart.add(priced("p1", 1, 999.0)).unwrap();

        assert_eq!(cart.get(&id).unwrap().unit_price(), Some(100.0));
        assert_eq!(cart.total(), 200.0);
    }

    #[test]
    fn test_services_merge_by_service_id() {
        let (_, mut cart) = empty_cart();

        cart.add(NewCartLine::service("s1", 1)).unwrap();
        cart.add(NewCartLine::service("s1", 1)).unwrap();
        cart.add(NewCartLine::service("s2", 1)).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_add_rejects_zero_quantity_and_missing_reference() {
        let (_, mut cart) = empty_cart();

        assert!(matches!(
            cart.add(NewCartLine::product("p1", 0)),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(matches!(
            cart.add(NewCartLine {
                quantity: 1,
                ..NewCartLine::default()
            }),
            Err(CommerceError::MissingItemReference)
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let (_, mut cart) = empty_cart();
        let id = cart.add(NewCartLine::product("p1", 2)).unwrap();

        assert!(cart.update_quantity(&id, 0));
        assert!(cart.is_empty());
        assert!(cart.get(&id).is_none());
    }

    #[test]
    fn test_update_quantity_negative_clamps_to_zero() {
        let (_, mut cart) = empty_cart();
        let keep = cart.add(NewCartLine::product("p1", 2)).unwrap();
        let dropped = cart.add(NewCartLine::product("p2", 2)).unwrap();

        assert!(cart.update_quantity(&dropped, -4));
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&keep).is_some());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let (_, mut cart) = empty_cart();
        let id = cart.add(NewCartLine::product("p1", 2)).unwrap();

        assert!(cart.update_quantity(&id, 7));
        assert_eq!(cart.count(), 7);
        assert!(!cart.update_quantity(&LineItemId::new("missing"), 3));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (_, mut cart) = empty_cart();
        cart.add(NewCartLine::product("p1", 1)).unwrap();

        assert!(!cart.remove(&LineItemId::new("missing")));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_count_and_total() {
        let (_, mut cart) = empty_cart();
        cart.add(priced("p1", 2, 100.0)).unwrap();
        cart.add(priced("p2", 3, 200.0)).unwrap();

        assert_eq!(cart.count(), 5);
        assert_eq!(cart.total(), 800.0);
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let (store, mut cart) = empty_cart();
        let id = cart.add(priced("p1", 2, 100.0)).unwrap();
        cart.add(NewCartLine::service("s1", 1)).unwrap();
        cart.remove(&id);

        let reopened = GuestCart::open(store);
        assert_eq!(reopened.lines(), cart.lines());
        assert_eq!(reopened.count(), 1);
    }

    #[test]
    fn test_clear_deletes_stored_copy() {
        let (store, mut cart) = empty_cart();
        cart.add(NewCartLine::product("p1", 1)).unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert!(!store.exists(&keys::guest_cart()).unwrap());
    }

    #[test]
    fn test_corrupt_storage_opens_empty() {
        let store = Store::new(MemoryBackend::new());
        store.set_raw(&keys::guest_cart(), b"[{\"id\": ").unwrap();

        assert!(GuestCart::load(&store).is_err());
        let cart = GuestCart::open(store);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_take_for_checkout_empties_cart() {
        let (store, mut cart) = empty_cart();
        cart.add(priced("p1", 2, 100.0)).unwrap();

        let lines = cart.take_for_checkout();
        assert_eq!(lines.len(), 1);
        assert!(cart.is_empty());
        assert!(GuestCart::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_empty_cart_total_is_positive_zero() {
        let (_, cart) = empty_cart();

        assert!(cart.total().is_sign_positive());
        assert_eq!(serde_json::to_string(&cart.total()).unwrap(), "0.0");
    }

    #[test]
    fn test_odd_snapshot_does_not_discard_cart() {
        let store = Store::new(MemoryBackend::new());
        store
            .set(
                &keys::guest_cart(),
                &serde_json::json!([
                    {
                        "id": "l1",
                        "productId": "p1",
                        "quantity": 2,
                        "product": {"id": "p1", "name": "Kiondo", "price": "100"}
                    },
                    {
                        "id": "l2",
                        "productId": "p2",
                        "quantity": 1,
                        "product": {"id": 42, "name": null, "vendorId": 7}
                    }
                ]),
            )
            .unwrap();

        let cart = GuestCart::open(store);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), 200.0);
        assert_eq!(cart.get(&LineItemId::new("l2")).unwrap().name(), None);
    }
}
