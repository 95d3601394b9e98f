//! Checkout
//!
//! Moves configured orders into the cart and submits cart items to the
//! backend, one at a time or as a batch. Items leave the cart only after the
//! backend has accepted them.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use futures::future::try_join_all;
use giftbox::{
    cart::{CartItem, CartStorage, CartStore, NewCartItem},
    orders::{
        BatchOrderRequest, BatchReceipt, CustomerInfo, OrderData, OrderReceipt,
        submission::{BatchMetadata, BatchPricing, PromotionSelection, ShippingSelection},
    },
    pricing::OrderPricing,
    promotions::Promotion,
    shipping::{ShippingFee, find_shipping_fee},
};
use jiff::Timestamp;
use rusty_money::iso::Currency;
use tracing::info;

use crate::{
    api::{CatalogApi, OrdersApi},
    orders::{
        compose::{SubmissionContext, compose_order},
        errors::CheckoutError,
    },
};

/// Order to place in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddToCart {
    /// Priced selections.
    pub order_data: OrderData,

    /// Chosen shipping option.
    pub shipping_id: Option<String>,

    /// Promotion code typed by the customer.
    pub promotion_code: Option<String>,
}

/// Checkout of several cart items in one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCheckout {
    /// Shared customer details.
    pub customer_info: CustomerInfo,

    /// Shared shipping option.
    pub shipping_id: Option<String>,

    /// Shared promotion code, applied to the sum of the item totals.
    pub promotion_code: Option<String>,

    /// Items to check out; empty means the whole cart.
    pub item_ids: Vec<String>,
}

/// Cart and checkout operations against the storefront API.
pub struct CheckoutService<S> {
    catalog: Arc<dyn CatalogApi>,
    orders: Arc<dyn OrdersApi>,
    cart: CartStore<S>,
    currency: &'static Currency,
}

impl<S: CartStorage> CheckoutService<S> {
    /// Create a service over a loaded cart.
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        orders: Arc<dyn OrdersApi>,
        cart: CartStore<S>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            catalog,
            orders,
            cart,
            currency,
        }
    }

    /// The cart.
    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// The cart, for direct edits.
    pub fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// Look up a promotion code and check it against `subtotal`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownPromotion`] for an unknown code or the
    /// rejection reason when the promotion cannot be used.
    #[tracing::instrument(name = "checkout.check_promotion", skip(self), err)]
    pub async fn check_promotion(
        &self,
        code: &str,
        subtotal: u64,
        now: Timestamp,
    ) -> Result<Promotion, CheckoutError> {
        let promotion = self.lookup_promotion(code).await?;

        promotion.validate(subtotal, now)?;

        Ok(promotion)
    }

    /// Price an order and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the shipping option or promotion is unknown, the
    /// promotion is rejected, pricing fails, or the cart cannot be saved.
    #[tracing::instrument(
        name = "checkout.add_to_cart",
        skip(self, request),
        fields(product_id = %request.order_data.product_id),
        err
    )]
    pub async fn add_to_cart(
        &mut self,
        request: AddToCart,
        now: Timestamp,
    ) -> Result<CartItem, CheckoutError> {
        let mut pricing = OrderPricing::new(self.currency);

        pricing.set_product_total(request.order_data.product_total_price);
        pricing.set_background_total(request.order_data.background_total_price);

        if let Some(shipping_id) = request.shipping_id.as_deref() {
            let fees = self.catalog.shipping_fees().await?;
            let fee = find_shipping_fee(&fees, Some(shipping_id))
                .ok_or_else(|| CheckoutError::UnknownShipping(shipping_id.to_string()))?;

            pricing.set_shipping_fee(fee.shipping_fee);
        }

        if let Some(code) = request.promotion_code.as_deref() {
            let promotion = self.lookup_promotion(code).await?;

            pricing.apply_promotion(promotion, now)?;
        }

        let breakdown = pricing.breakdown()?;
        let promotion_code = pricing
            .applied_promotion()
            .map(|promotion| promotion.code.clone());

        let item = self.cart.add_item(NewCartItem::priced(
            request.order_data,
            &breakdown,
            request.shipping_id,
            promotion_code,
        ))?;

        info!(item_id = %item.id, total = item.total, "added to cart");

        Ok(item)
    }

    /// Submit a single cart item and remove it once the order is created.
    ///
    /// The item's promotion is checked again; a promotion that is no longer
    /// valid fails the checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is unknown, the customer details are
    /// incomplete, a lookup or pricing fails, or the backend refuses the
    /// order. The cart is unchanged on error.
    #[tracing::instrument(name = "checkout.item", skip(self, customer_info), err)]
    pub async fn checkout_item(
        &mut self,
        item_id: &str,
        customer_info: CustomerInfo,
        now: Timestamp,
    ) -> Result<OrderReceipt, CheckoutError> {
        let item = self
            .cart
            .get(item_id)
            .cloned()
            .ok_or_else(|| CheckoutError::ItemNotFound(item_id.to_string()))?;

        customer_info.validate()?;

        let fees = self
            .shipping_fees_for(item.selected_shipping_id.is_some())
            .await?;
        let shipping = select_shipping(&fees, item.selected_shipping_id.as_deref())?;

        let mut pricing = OrderPricing::new(self.currency);

        pricing.set_product_total(item.order_data.product_total_price);
        pricing.set_background_total(item.order_data.background_total_price);
        pricing.set_shipping_fee(shipping.as_ref().map_or(item.shipping_fee, |s| s.fee));

        if let Some(code) = item.applied_promotion_code.as_deref() {
            let promotion = self.lookup_promotion(code).await?;

            pricing.apply_promotion(promotion, now)?;
        }

        let breakdown = pricing.breakdown()?;
        let promotion = pricing
            .applied_promotion()
            .map(|promotion| PromotionSelection::new(promotion, breakdown.discount));

        let submission = compose_order(
            self.catalog.as_ref(),
            &item.order_data,
            SubmissionContext {
                customer_info: Some(customer_info),
                shipping,
                promotion,
                pricing: breakdown,
            },
        )
        .await?;

        let receipt = self
            .orders
            .create_order(&submission)
            .await
            .map_err(CheckoutError::Submit)?;

        self.cart.remove_item(&item.id)?;

        info!(
            item_id = %item.id,
            order_code = %receipt.order_code,
            total = breakdown.total,
            "order placed"
        );

        Ok(receipt)
    }

    /// Submit several cart items as one batch with shared customer details,
    /// shipping and promotion, then remove them from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, an item is unknown, the
    /// customer details are incomplete, a lookup or pricing fails, or the
    /// backend refuses the batch. The cart is unchanged on error.
    #[tracing::instrument(
        name = "checkout.batch",
        skip(self, request),
        fields(items = request.item_ids.len()),
        err
    )]
    pub async fn checkout_batch(
        &mut self,
        request: BatchCheckout,
        now: Timestamp,
    ) -> Result<BatchReceipt, CheckoutError> {
        let items = self.batch_items(&request.item_ids)?;

        request.customer_info.validate()?;

        let needs_fees = request.shipping_id.is_some()
            || items.iter().any(|item| item.selected_shipping_id.is_some());
        let fees = self.shipping_fees_for(needs_fees).await?;
        let shipping = select_shipping(&fees, request.shipping_id.as_deref())?;

        let mut promotions: HashMap<String, Promotion> = HashMap::new();

        let items_total = items
            .iter()
            .fold(0_u64, |acc, item| acc.saturating_add(item.total));

        let shared_promotion = match request.promotion_code.as_deref() {
            Some(code) => Some(self.check_promotion(code, items_total, now).await?),
            None => None,
        };

        let pricing = BatchPricing::calculate(
            self.currency,
            items.iter().map(|item| item.total),
            shipping.as_ref().map_or(0, |s| s.fee),
            shared_promotion.as_ref(),
        )?;

        let mut contexts = Vec::with_capacity(items.len());

        for item in &items {
            let promotion = match item.applied_promotion_code.as_deref() {
                Some(code) => {
                    if !promotions.contains_key(code) {
                        let promotion = self.lookup_promotion(code).await?;

                        promotions.insert(code.to_string(), promotion);
                    }

                    promotions
                        .get(code)
                        .map(|promotion| PromotionSelection::new(promotion, item.discount))
                }
                None => None,
            };

            contexts.push(SubmissionContext {
                customer_info: None,
                shipping: select_shipping(&fees, item.selected_shipping_id.as_deref())?,
                promotion,
                pricing: item.pricing(),
            });
        }

        let catalog = self.catalog.as_ref();
        let submissions = try_join_all(
            items
                .iter()
                .zip(contexts)
                .map(|(item, context)| compose_order(catalog, &item.order_data, context)),
        )
        .await?;

        let batch = BatchOrderRequest {
            customer_info: request.customer_info,
            shipping,
            promotion: shared_promotion
                .as_ref()
                .map(|promotion| PromotionSelection::new(promotion, pricing.discount)),
            items: submissions,
            pricing,
            metadata: BatchMetadata::new(items.len(), now),
        };

        let receipt = self
            .orders
            .create_batch(&batch)
            .await
            .map_err(CheckoutError::Submit)?;

        let removed = self.cart.remove_items(items.iter().map(|item| &item.id))?;

        info!(
            items = removed,
            orders = receipt.orders.len(),
            total = pricing.total,
            "batch placed"
        );

        Ok(receipt)
    }

    fn batch_items(&self, item_ids: &[String]) -> Result<Vec<CartItem>, CheckoutError> {
        let items: Vec<CartItem> = if item_ids.is_empty() {
            self.cart.items().to_vec()
        } else {
            let mut seen = HashSet::new();

            item_ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .map(|id| {
                    self.cart
                        .get(id)
                        .cloned()
                        .ok_or_else(|| CheckoutError::ItemNotFound(id.clone()))
                })
                .collect::<Result<_, _>>()?
        };

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(items)
    }

    async fn lookup_promotion(&self, code: &str) -> Result<Promotion, CheckoutError> {
        self.catalog
            .promotion_by_code(code)
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    CheckoutError::UnknownPromotion(code.trim().to_string())
                } else {
                    CheckoutError::Api(error)
                }
            })
    }

    async fn shipping_fees_for(&self, needed: bool) -> Result<Vec<ShippingFee>, CheckoutError> {
        if needed {
            Ok(self.catalog.shipping_fees().await?)
        } else {
            Ok(Vec::new())
        }
    }
}

fn select_shipping(
    fees: &[ShippingFee],
    id: Option<&str>,
) -> Result<Option<ShippingSelection>, CheckoutError> {
    match id {
        Some(id) => find_shipping_fee(fees, Some(id))
            .map(|fee| Some(ShippingSelection::from(fee)))
            .ok_or_else(|| CheckoutError::UnknownShipping(id.to_string())),
        None => Ok(None),
    }
}
