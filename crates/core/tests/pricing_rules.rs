//! Integration tests for order pricing and promotion acceptance.

use jiff::Timestamp;
use rusty_money::{Money, iso::VND};
use testresult::TestResult;

use giftbox::{
    orders::BatchPricing,
    pricing::{self, OrderPricing, PriceBreakdown},
    promotions::{Promotion, PromotionRejection, PromotionType},
};

fn promotion(kind: PromotionType, value: f64) -> TestResult<Promotion> {
    Ok(Promotion {
        id: "1".to_string(),
        code: "GIFT".to_string(),
        name: None,
        kind,
        value,
        min_order_value: 0,
        max_discount_amount: None,
        start_date: "2026-01-01T00:00:00Z".parse()?,
        end_date: None,
        usage_limit: None,
        usage_count: 0,
        is_active: true,
    })
}

fn now() -> TestResult<Timestamp> {
    Ok("2026-06-01T12:00:00Z".parse()?)
}

#[test]
fn capped_percentage_promotion_prices_order() -> TestResult {
    let mut tet = promotion(PromotionType::Percentage, 10.0)?;
    tet.max_discount_amount = Some(40_000);

    let breakdown = pricing::price_breakdown(VND, 500_000, 0, 30_000, Some(&tet))?;

    // 10% of 500 000 is 50 000, capped at 40 000.
    assert_eq!(
        breakdown,
        PriceBreakdown {
            product_total: 500_000,
            background_total: 0,
            subtotal: 500_000,
            shipping_fee: 30_000,
            discount: 40_000,
            total: 490_000,
        }
    );

    Ok(())
}

#[test]
fn fixed_promotion_larger_than_subtotal_only_covers_subtotal() -> TestResult {
    let voucher = promotion(PromotionType::FixedAmount, 150_000.0)?;

    let breakdown = pricing::price_breakdown(VND, 100_000, 0, 30_000, Some(&voucher))?;

    assert_eq!(breakdown.discount, 100_000);
    assert_eq!(breakdown.total, 30_000);

    Ok(())
}

#[test]
fn percentage_discount_never_exceeds_cap_or_subtotal() -> TestResult {
    let caps = [None, Some(0), Some(1_000), Some(25_000), Some(10_000_000)];
    let values = [0.0, 1.0, 12.5, 50.0, 100.0];
    let subtotals = [0_i64, 1, 999, 20_000, 333_333, 5_000_000];

    for cap in caps {
        for value in values {
            let mut percent = promotion(PromotionType::Percentage, value)?;
            percent.max_discount_amount = cap;

            for subtotal in subtotals {
                let discount =
                    pricing::calculate_discount(Some(&percent), Money::from_minor(subtotal, VND))?
                        .to_minor_units();

                let cap_minor = cap.map_or(i64::MAX, |cap| i64::try_from(cap).unwrap_or(i64::MAX));

                assert!(discount >= 0, "discount must not be negative");
                assert!(discount <= subtotal, "discount must not exceed subtotal");
                assert!(discount <= cap_minor, "discount must not exceed the cap");
            }
        }
    }

    Ok(())
}

#[test]
fn fixed_discount_is_value_or_subtotal() -> TestResult {
    let values = [(0.0, 0_i64), (5_000.0, 5_000), (100_000.0, 100_000), (250_000.0, 250_000)];

    for (value, value_minor) in values {
        let voucher = promotion(PromotionType::FixedAmount, value)?;

        for subtotal in [0_i64, 4_999, 100_000, 400_000] {
            let discount =
                pricing::calculate_discount(Some(&voucher), Money::from_minor(subtotal, VND))?;

            assert_eq!(discount.to_minor_units(), value_minor.min(subtotal));
        }
    }

    Ok(())
}

#[test]
fn total_is_never_negative() -> TestResult {
    let cases = [
        (0_i64, 0_i64, 0_i64, 0_i64),
        (100_000, 30_000, 0, 130_000),
        (100_000, 0, 100_000, 0),
        (100_000, 30_000, 100_000, 30_000),
        (10_000, 0, 50_000, 0),
    ];

    for (subtotal, shipping, discount, expected) in cases {
        let total = pricing::calculate_total(
            Money::from_minor(subtotal, VND),
            Money::from_minor(shipping, VND),
            Money::from_minor(discount, VND),
        )?;

        assert_eq!(total.to_minor_units(), expected);
    }

    Ok(())
}

#[test]
fn order_below_minimum_keeps_no_promotion() -> TestResult {
    let mut big_spender = promotion(PromotionType::Percentage, 20.0)?;
    big_spender.min_order_value = 1_000_000;

    let mut order = OrderPricing::new(VND);
    order.set_product_total(400_000);
    order.set_shipping_fee(30_000);

    let rejection = order.apply_promotion(big_spender, now()?);

    assert!(matches!(
        rejection,
        Err(PromotionRejection::BelowMinimumOrder {
            minimum: 1_000_000,
            subtotal: 400_000,
        })
    ));
    assert!(order.applied_promotion().is_none());
    assert_eq!(order.breakdown()?.total, 430_000);

    Ok(())
}

#[test]
fn backgrounds_count_towards_promotion_minimum() -> TestResult {
    let mut big_spender = promotion(PromotionType::FixedAmount, 50_000.0)?;
    big_spender.min_order_value = 500_000;

    let mut order = OrderPricing::new(VND);
    order.set_product_total(450_000);
    order.set_background_total(50_000);

    order.apply_promotion(big_spender, now()?)?;

    let breakdown = order.breakdown()?;

    assert_eq!(breakdown.subtotal, 500_000);
    assert_eq!(breakdown.discount, 50_000);
    assert_eq!(breakdown.total, 450_000);

    Ok(())
}

#[test]
fn batch_total_sums_item_totals() -> TestResult {
    let pricing = BatchPricing::calculate(VND, [200_000, 350_000], 0, None)?;

    assert_eq!(pricing.items_total, 550_000);
    assert_eq!(pricing.total, 550_000);

    Ok(())
}
