//! Order submission wire types
//!
//! Shapes of the order-creation requests and responses. These are built at
//! submit time and never persisted.

use jiff::Timestamp;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    money,
    orders::{CustomerInfo, OrderData},
    pricing::{self, PriceBreakdown, PricingError},
    promotions::{Promotion, PromotionType},
    serde_lenient,
    shipping::ShippingFee,
};

/// Status every new order is created with.
pub const PENDING_STATUS: &str = "pending";

/// Source tag sent with batch submissions.
pub const BATCH_SOURCE: &str = "giftbox-cli";

/// Resolved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Product identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Resolved variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    /// Variant identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: u64,

    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Resolved custom product with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProductLine {
    /// Custom product identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Unit price.
    pub price: u64,

    /// Units ordered.
    pub quantity: u32,

    /// `price * quantity`.
    pub subtotal: u64,
}

/// Resolved product picked from a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProductLine {
    /// Category identifier.
    pub category_id: String,

    /// Category name.
    pub category_name: String,

    /// Product identifier.
    pub product_id: String,

    /// Product name.
    pub product_name: String,

    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Unit price.
    pub price: u64,

    /// Units ordered.
    pub quantity: u32,
}

/// Resolved background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundLine {
    /// Background identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Price.
    pub price: u64,
}

/// Shipping option chosen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSelection {
    /// Shipping option identifier.
    pub id: String,

    /// Delivery method.
    pub shipping_type: String,

    /// Area served.
    pub area: String,

    /// Delivery estimate.
    pub estimated_delivery_time: String,

    /// Fee charged.
    pub fee: u64,
}

impl From<&ShippingFee> for ShippingSelection {
    fn from(fee: &ShippingFee) -> Self {
        Self {
            id: fee.id.clone(),
            shipping_type: fee.shipping_type.clone(),
            area: fee.area.clone(),
            estimated_delivery_time: fee.estimated_delivery_time.clone(),
            fee: fee.shipping_fee,
        }
    }
}

/// Promotion applied at checkout and the discount it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionSelection {
    /// Promotion identifier.
    pub id: String,

    /// Promotion code.
    pub code: String,

    /// Promotion type.
    #[serde(rename = "type")]
    pub kind: PromotionType,

    /// Promotion value.
    pub value: f64,

    /// Discount granted.
    pub discount: u64,
}

impl PromotionSelection {
    /// Record an applied promotion with the discount it granted.
    pub fn new(promotion: &Promotion, discount: u64) -> Self {
        Self {
            id: promotion.id.clone(),
            code: promotion.code.clone(),
            kind: promotion.kind,
            value: promotion.value,
            discount,
        }
    }
}

/// [`OrderData`] enriched with resolved catalog data, customer, shipping,
/// promotion and pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmissionData {
    /// Raw selections.
    #[serde(flatten)]
    pub order: OrderData,

    /// Resolved product.
    pub product: ProductSummary,

    /// Resolved variant.
    pub variant: VariantSummary,

    /// Resolved custom products.
    pub custom_products: Vec<CustomProductLine>,

    /// Resolved category picks.
    pub category_products: Vec<CategoryProductLine>,

    /// Resolved backgrounds.
    pub backgrounds: Vec<BackgroundLine>,

    /// Customer details; omitted for batch items, which share them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,

    /// Shipping choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingSelection>,

    /// Applied promotion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionSelection>,

    /// Pricing breakdown.
    pub pricing: PriceBreakdown,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest<'a> {
    /// Order payload.
    pub order_data: &'a OrderSubmissionData,

    /// Initial status.
    pub status: &'static str,
}

impl<'a> CreateOrderRequest<'a> {
    /// Wrap a payload as a new pending order.
    pub fn pending(order_data: &'a OrderSubmissionData) -> Self {
        Self {
            order_data,
            status: PENDING_STATUS,
        }
    }
}

/// Pricing of a batch checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPricing {
    /// Sum of the cart item totals.
    pub items_total: u64,

    /// Shared shipping fee.
    pub shipping_fee: u64,

    /// Discount from the shared promotion.
    pub discount: u64,

    /// Amount to pay.
    pub total: u64,
}

impl BatchPricing {
    /// Price a batch: the item totals are summed, then the shared shipping
    /// fee and promotion are applied to that sum.
    ///
    /// # Errors
    ///
    /// Propagates amount conversion and discount errors.
    pub fn calculate(
        currency: &Currency,
        item_totals: impl IntoIterator<Item = u64>,
        shipping_fee: u64,
        promotion: Option<&Promotion>,
    ) -> Result<Self, PricingError> {
        let items_total = item_totals
            .into_iter()
            .try_fold(money::zero(currency), |acc, total| {
                Ok::<_, PricingError>(acc.add(money::to_money(total, currency)?)?)
            })?;

        let discount = pricing::calculate_discount(promotion, items_total)?;
        let total =
            pricing::calculate_total(items_total, money::to_money(shipping_fee, currency)?, discount)?;

        Ok(Self {
            items_total: money::to_amount(&items_total)?,
            shipping_fee,
            discount: money::to_amount(&discount)?,
            total: money::to_amount(&total)?,
        })
    }
}

/// Batch bookkeeping sent alongside the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMetadata {
    /// Number of items in the batch.
    pub item_count: usize,

    /// When the batch was sent.
    pub submitted_at: Timestamp,

    /// Submitting client.
    pub source: String,
}

impl BatchMetadata {
    /// Metadata for a batch of `item_count` items sent at `submitted_at`.
    pub fn new(item_count: usize, submitted_at: Timestamp) -> Self {
        Self {
            item_count,
            submitted_at,
            source: BATCH_SOURCE.to_string(),
        }
    }
}

/// Body of `POST /orders/batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOrderRequest {
    /// Shared customer details.
    pub customer_info: CustomerInfo,

    /// Shared shipping choice.
    pub shipping: Option<ShippingSelection>,

    /// Shared promotion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionSelection>,

    /// One payload per cart item.
    pub items: Vec<OrderSubmissionData>,

    /// Batch totals.
    pub pricing: BatchPricing,

    /// Batch bookkeeping.
    pub metadata: BatchMetadata,
}

/// Order created by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Order identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Code the customer uses to track the order.
    #[serde(alias = "code", alias = "orderNumber")]
    pub order_code: String,

    /// Initial status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Orders created by a batch submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReceipt {
    /// Code grouping the batch, when the backend issues one.
    #[serde(default)]
    pub batch_code: Option<String>,

    /// Created orders.
    #[serde(default, alias = "items")]
    pub orders: Vec<OrderReceipt>,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::VND;
    use serde_json::json;
    use testresult::TestResult;

    use crate::promotions::PromotionType;

    use super::*;

    fn order_data() -> OrderData {
        OrderData {
            product_id: "p1".to_string(),
            variant_id: "v1".to_string(),
            selected_options: Vec::new(),
            custom_quantities: std::collections::BTreeMap::new(),
            selected_category_products: None,
            multi_item_customizations: None,
            product_total_price: 200_000,
            selected_background_ids: Vec::new(),
            background_form_data: None,
            background_total_price: 0,
            total_price: 200_000,
        }
    }

    fn submission() -> OrderSubmissionData {
        OrderSubmissionData {
            order: order_data(),
            product: ProductSummary {
                id: "p1".to_string(),
                name: "Hamper".to_string(),
                description: None,
                image: None,
            },
            variant: VariantSummary {
                id: "v1".to_string(),
                name: "Large".to_string(),
                price: 200_000,
                image: None,
            },
            custom_products: Vec::new(),
            category_products: Vec::new(),
            backgrounds: Vec::new(),
            customer_info: None,
            shipping: None,
            promotion: None,
            pricing: PriceBreakdown::default(),
        }
    }

    #[test]
    fn submission_is_a_superset_of_order_data() -> TestResult {
        let value = serde_json::to_value(CreateOrderRequest::pending(&submission()))?;

        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["orderData"]["productId"], json!("p1"));
        assert_eq!(value["orderData"]["totalPrice"], json!(200_000));
        assert_eq!(value["orderData"]["product"]["name"], json!("Hamper"));
        assert_eq!(value["orderData"]["variant"]["price"], json!(200_000));
        assert!(value["orderData"].get("promotion").is_none());

        Ok(())
    }

    #[test]
    fn batch_grand_total_is_sum_of_item_totals() -> TestResult {
        let pricing = BatchPricing::calculate(VND, [200_000, 350_000], 0, None)?;

        assert_eq!(pricing.items_total, 550_000);
        assert_eq!(pricing.total, 550_000);

        Ok(())
    }

    #[test]
    fn batch_applies_shared_shipping_and_promotion() -> TestResult {
        let promotion = Promotion {
            id: "1".to_string(),
            code: "BATCH".to_string(),
            name: None,
            kind: PromotionType::Percentage,
            value: 10.0,
            min_order_value: 0,
            max_discount_amount: Some(40_000),
            start_date: Timestamp::UNIX_EPOCH,
            end_date: None,
            usage_limit: None,
            usage_count: 0,
            is_active: true,
        };

        let pricing = BatchPricing::calculate(VND, [200_000, 350_000], 30_000, Some(&promotion))?;

        assert_eq!(pricing.discount, 40_000);
        assert_eq!(pricing.total, 540_000);

        Ok(())
    }

    #[test]
    fn receipt_accepts_code_aliases() -> TestResult {
        let receipt: OrderReceipt =
            serde_json::from_value(json!({ "id": 41, "code": "GB-0041", "status": "pending" }))?;

        let batch: BatchReceipt = serde_json::from_value(json!({
            "items": [{ "id": "a", "orderCode": "GB-1" }, { "id": "b", "orderNumber": "GB-2" }]
        }))?;

        assert_eq!(receipt.id, "41");
        assert_eq!(receipt.order_code, "GB-0041");
        assert_eq!(batch.orders.len(), 2);
        assert_eq!(batch.batch_code, None);

        Ok(())
    }
}
