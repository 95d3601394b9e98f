//! Cart Store

use std::collections::HashSet;

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric};

use crate::cart::{
    CartError,
    models::{CartItem, NewCartItem},
    storage::CartStorage,
};

const ID_SUFFIX_LEN: usize = 9;

/// Persisted list of pending orders.
///
/// Every mutation is written through to the storage before it becomes
/// visible; a failed write leaves the in-memory cart unchanged.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    items: Vec<CartItem>,
}

impl<S: CartStorage> CartStore<S> {
    /// Rehydrate the cart from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read.
    pub fn load(storage: S) -> Result<Self, CartError> {
        let items = storage.load()?;

        Ok(Self { storage, items })
    }

    /// Add an item, assigning it a fresh id and creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add_item(&mut self, item: NewCartItem) -> Result<CartItem, CartError> {
        let now = Timestamp::now();
        let mut id = generate_item_id(now);

        while self.get(&id).is_some() {
            id = generate_item_id(now);
        }

        let added = item.into_item(id, now);

        let mut items = self.items.clone();
        items.push(added.clone());

        self.commit(items)?;

        Ok(added)
    }

    /// Remove one item. Returns whether an item was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_item(&mut self, id: &str) -> Result<bool, CartError> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();

        self.commit(items)?;

        Ok(true)
    }

    /// Remove several items in one write. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_items<I, T>(&mut self, ids: I) -> Result<usize, CartError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ids: HashSet<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();

        let items: Vec<CartItem> = self
            .items
            .iter()
            .filter(|item| !ids.contains(&item.id))
            .cloned()
            .collect();

        let removed = self.items.len() - items.len();

        if removed > 0 {
            self.commit(items)?;
        }

        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new())
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of the item totals.
    pub fn total_amount(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |acc, item| acc.saturating_add(item.total))
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn commit(&mut self, items: Vec<CartItem>) -> Result<(), CartError> {
        self.storage.save(&items)?;
        self.items = items;

        Ok(())
    }
}

/// Client-side id: unix milliseconds, a dash and a random lowercase
/// alphanumeric suffix.
pub fn generate_item_id(now: Timestamp) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();

    format!("{}-{suffix}", now.as_millisecond())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use testresult::TestResult;

    use crate::{
        cart::storage::MemoryCartStorage,
        orders::OrderData,
        pricing::PriceBreakdown,
    };

    use super::*;

    fn new_item(total: u64) -> NewCartItem {
        NewCartItem::priced(
            OrderData {
                product_id: "p1".to_string(),
                variant_id: "v1".to_string(),
                selected_options: Vec::new(),
                custom_quantities: BTreeMap::new(),
                selected_category_products: None,
                multi_item_customizations: None,
                product_total_price: total,
                selected_background_ids: Vec::new(),
                background_form_data: None,
                background_total_price: 0,
                total_price: total,
            },
            &PriceBreakdown {
                product_total: total,
                background_total: 0,
                subtotal: total,
                shipping_fee: 0,
                discount: 0,
                total,
            },
            None,
            None,
        )
    }

    #[test]
    fn generated_ids_have_timestamp_and_suffix() -> TestResult {
        let now = Timestamp::from_millisecond(1_700_000_000_000)?;
        let id = generate_item_id(now);

        let (millis, suffix) = id.split_once('-').unwrap_or_default();

        assert_eq!(millis, "1700000000000");
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );

        Ok(())
    }

    #[test]
    fn add_assigns_unique_ids() -> TestResult {
        let mut cart = CartStore::load(MemoryCartStorage::new())?;

        let first = cart.add_item(new_item(100))?.id;
        let second = cart.add_item(new_item(200))?.id;

        assert_ne!(first, second);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn remove_unknown_item_is_a_no_op() -> TestResult {
        let mut cart = CartStore::load(MemoryCartStorage::new())?;

        cart.add_item(new_item(100))?;

        assert!(!cart.remove_item("missing")?);
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn remove_items_drops_only_listed_ids() -> TestResult {
        let mut cart = CartStore::load(MemoryCartStorage::new())?;

        let a = cart.add_item(new_item(100))?.id;
        let b = cart.add_item(new_item(200))?.id;
        cart.add_item(new_item(300))?;

        assert_eq!(cart.remove_items([&a, &b, &"missing".to_string()])?, 2);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_amount(), 300);

        Ok(())
    }

    #[test]
    fn mutations_are_persisted() -> TestResult {
        let storage = MemoryCartStorage::new();
        let mut cart = CartStore::load(storage.clone())?;

        let id = cart.add_item(new_item(150_000))?.id;

        let rehydrated = CartStore::load(storage.clone())?;

        assert_eq!(rehydrated.item_count(), 1);
        assert_eq!(rehydrated.get(&id).map(|item| item.total), Some(150_000));

        cart.remove_item(&id)?;

        assert!(CartStore::load(storage)?.is_empty());

        Ok(())
    }
}
