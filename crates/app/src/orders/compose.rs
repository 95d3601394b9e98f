//! Order composition
//!
//! Resolves the ids in an [`OrderData`] snapshot against the catalog and
//! assembles the payload sent to the order endpoints.

use futures::future::try_join_all;
use giftbox::{
    catalog::Category,
    orders::{
        CustomerInfo, OrderData, OrderSubmissionData,
        submission::{
            BackgroundLine, CategoryProductLine, CustomProductLine, ProductSummary,
            PromotionSelection, ShippingSelection, VariantSummary,
        },
    },
    pricing::PriceBreakdown,
};

use crate::{api::CatalogApi, orders::errors::ComposeError};

/// Checkout details attached to a composed order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionContext {
    /// Customer details; `None` for batch items.
    pub customer_info: Option<CustomerInfo>,

    /// Shipping choice.
    pub shipping: Option<ShippingSelection>,

    /// Applied promotion.
    pub promotion: Option<PromotionSelection>,

    /// Pricing breakdown.
    pub pricing: PriceBreakdown,
}

/// Resolve every referenced catalog entry and build the submission payload.
///
/// Lookups run concurrently; the first failure aborts composition.
///
/// # Errors
///
/// Returns an error if a lookup fails, a picked category product is not in
/// its category, or a line price overflows.
#[tracing::instrument(
    name = "orders.compose",
    skip(catalog, order, context),
    fields(product_id = %order.product_id, variant_id = %order.variant_id),
    err
)]
pub async fn compose_order(
    catalog: &dyn CatalogApi,
    order: &OrderData,
    context: SubmissionContext,
) -> Result<OrderSubmissionData, ComposeError> {
    let custom_quantities: Vec<(&str, u32)> = order.custom_product_quantities().collect();
    let category_ids = order.category_ids();

    let (product, variant, custom_products, categories, backgrounds) = tokio::try_join!(
        catalog.product(&order.product_id),
        catalog.variant(&order.variant_id),
        try_join_all(
            custom_quantities
                .iter()
                .map(|(id, _)| catalog.custom_product(id))
        ),
        try_join_all(category_ids.iter().map(|id| catalog.category(id))),
        try_join_all(
            order
                .selected_background_ids
                .iter()
                .map(|id| catalog.background(id))
        ),
    )?;

    let custom_products = custom_products
        .into_iter()
        .zip(custom_quantities.iter().map(|(_, quantity)| *quantity))
        .map(|(product, quantity)| {
            let subtotal = product
                .price
                .checked_mul(u64::from(quantity))
                .ok_or_else(|| ComposeError::LineOverflow {
                    id: product.id.clone(),
                    quantity,
                })?;

            Ok(CustomProductLine {
                id: product.id,
                name: product.name,
                description: product.description,
                image: product.image,
                price: product.price,
                quantity,
                subtotal,
            })
        })
        .collect::<Result<Vec<_>, ComposeError>>()?;

    let category_products = category_lines(order, &categories)?;

    let backgrounds = backgrounds
        .into_iter()
        .map(|background| BackgroundLine {
            id: background.id,
            name: background.name,
            image: background.image,
            price: background.price,
        })
        .collect();

    Ok(OrderSubmissionData {
        order: order.clone(),
        product: ProductSummary {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
        },
        variant: VariantSummary {
            id: variant.id,
            name: variant.name,
            price: variant.price,
            image: variant.image,
        },
        custom_products,
        category_products,
        backgrounds,
        customer_info: context.customer_info,
        shipping: context.shipping,
        promotion: context.promotion,
        pricing: context.pricing,
    })
}

fn category_lines(
    order: &OrderData,
    categories: &[Category],
) -> Result<Vec<CategoryProductLine>, ComposeError> {
    order
        .category_products()
        .iter()
        .map(|selection| {
            let unknown = || ComposeError::UnknownCategoryProduct {
                category_id: selection.category_id.clone(),
                product_id: selection.product_id.clone(),
            };

            let category = categories
                .iter()
                .find(|category| category.id == selection.category_id)
                .ok_or_else(unknown)?;
            let product = category.product(&selection.product_id).ok_or_else(unknown)?;

            Ok(CategoryProductLine {
                category_id: category.id.clone(),
                category_name: category.name.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                image: product.image.clone(),
                price: product.price,
                quantity: selection.quantity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use giftbox::{catalog::CustomProduct, orders::CategoryProductSelection};
    use testresult::TestResult;

    use crate::{api::MockCatalogApi, test::fixtures};

    use super::*;

    fn catalog() -> MockCatalogApi {
        let mut catalog = MockCatalogApi::new();

        catalog
            .expect_product()
            .withf(|id| id == "12")
            .returning(|_| Ok(fixtures::product()));
        catalog
            .expect_variant()
            .withf(|id| id == "34")
            .returning(|_| Ok(fixtures::variant()));
        catalog
            .expect_category()
            .withf(|id| id == "3")
            .returning(|_| Ok(fixtures::category()));
        catalog
            .expect_background()
            .withf(|id| id == "5")
            .returning(|_| Ok(fixtures::background()));

        catalog
    }

    fn context() -> SubmissionContext {
        SubmissionContext {
            customer_info: None,
            shipping: fixtures::shipping_fees().first().map(ShippingSelection::from),
            promotion: None,
            pricing: fixtures::submission().pricing,
        }
    }

    #[tokio::test]
    async fn order_is_resolved_against_catalog() -> TestResult {
        let mut catalog = catalog();

        catalog
            .expect_custom_product()
            .withf(|id| id == "7")
            .times(1)
            .returning(|_| Ok(fixtures::custom_product()));

        let submission = compose_order(&catalog, &fixtures::order_data(), context()).await?;

        assert_eq!(submission.product.name, "Tet hamper");
        assert_eq!(submission.variant.price, 250_000);
        assert_eq!(
            submission.custom_products,
            vec![CustomProductLine {
                id: "7".to_string(),
                name: "Scented candle".to_string(),
                description: None,
                image: None,
                price: 20_000,
                quantity: 2,
                subtotal: 40_000,
            }]
        );

        let tea = submission
            .category_products
            .first()
            .ok_or("missing category product")?;

        assert_eq!(tea.category_name, "Teas");
        assert_eq!(tea.product_name, "Lotus tea");

        assert_eq!(
            submission.backgrounds.first().map(|line| line.name.as_str()),
            Some("Red lanterns")
        );
        assert_eq!(submission.shipping.map(|s| s.fee), Some(30_000));
        assert_eq!(submission.order, fixtures::order_data());

        Ok(())
    }

    #[tokio::test]
    async fn product_missing_from_category_is_rejected() -> TestResult {
        let mut catalog = catalog();

        catalog
            .expect_custom_product()
            .returning(|_| Ok(fixtures::custom_product()));

        let mut order = fixtures::order_data();

        order.selected_category_products = Some(vec![CategoryProductSelection {
            category_id: "3".to_string(),
            product_id: "404".to_string(),
            quantity: 1,
        }]);

        let result = compose_order(&catalog, &order, context()).await;

        assert!(matches!(
            result,
            Err(ComposeError::UnknownCategoryProduct { product_id, .. }) if product_id == "404"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn overflowing_line_is_rejected() -> TestResult {
        let mut catalog = catalog();

        catalog.expect_custom_product().returning(|_| {
            Ok(CustomProduct {
                price: u64::MAX,
                ..fixtures::custom_product()
            })
        });

        let result = compose_order(&catalog, &fixtures::order_data(), context()).await;

        assert!(matches!(
            result,
            Err(ComposeError::LineOverflow { quantity: 2, .. })
        ));

        Ok(())
    }
}
