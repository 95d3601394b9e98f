//! Order tracking.

use std::io;

use giftbox::{
    money,
    receipt::ReceiptError,
    tracking::{StepState, TrackedOrder},
};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::api::{ApiError, OrdersApi};

/// Errors raised while looking up an order.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// No code was given.
    #[error("enter an order code")]
    EmptyCode,

    /// No order has this code.
    #[error("no order found with code {0}")]
    NotFound(String),

    /// The lookup failed.
    #[error("failed to look up order")]
    Api(#[from] ApiError),
}

impl TrackingError {
    /// Message to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(error) => error.user_message(&self.to_string()),
            _ => self.to_string(),
        }
    }
}

/// Find an order by its tracking code.
///
/// # Errors
///
/// Returns [`TrackingError::EmptyCode`] for a blank code,
/// [`TrackingError::NotFound`] when no order matches, or the lookup error.
#[tracing::instrument(name = "orders.track", skip(orders), err)]
pub async fn track_order(orders: &dyn OrdersApi, code: &str) -> Result<TrackedOrder, TrackingError> {
    let code = code.trim();

    if code.is_empty() {
        return Err(TrackingError::EmptyCode);
    }

    orders
        .search_order(code)
        .await?
        .ok_or_else(|| TrackingError::NotFound(code.to_string()))
}

/// Write an order's status as a stepper.
///
/// # Errors
///
/// Returns an error if the total cannot be formatted or the output cannot be
/// written.
pub fn write_progress(
    mut out: impl io::Write,
    order: &TrackedOrder,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    let progress = order.progress();

    writeln!(out, "Order {} ({})", order.order_code, order.status)
        .map_err(|_err| ReceiptError::IO)?;

    if let Some(created_at) = order.created_at {
        writeln!(out, "Placed {created_at}").map_err(|_err| ReceiptError::IO)?;
    }

    if let Some(total) = order.total {
        writeln!(out, "Total {}", money::display(total, currency)?)
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)?;

    for (phase, state) in &progress.steps {
        let marker = match state {
            StepState::Done => "[x]",
            StepState::Current => "[>]",
            StepState::Upcoming => "[ ]",
        };

        writeln!(out, "  {marker} {}", phase.label()).map_err(|_err| ReceiptError::IO)?;
    }

    if progress.current.is_none() {
        writeln!(out, "\nStatus \"{}\" is not part of the usual flow.", order.status)
            .map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::VND;
    use testresult::TestResult;

    use crate::api::MockOrdersApi;

    use super::*;

    fn order(status: &str) -> TrackedOrder {
        TrackedOrder {
            id: "501".to_string(),
            order_code: "GB-501".to_string(),
            status: status.to_string(),
            created_at: None,
            updated_at: None,
            total: Some(318_000),
        }
    }

    #[tokio::test]
    async fn code_is_trimmed_before_search() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders
            .expect_search_order()
            .withf(|code| code == "GB-501")
            .returning(|_| Ok(Some(order("pending"))));

        let found = track_order(&orders, "  GB-501 ").await?;

        assert_eq!(found.order_code, "GB-501");

        Ok(())
    }

    #[tokio::test]
    async fn blank_code_is_rejected_without_lookup() {
        let mut orders = MockOrdersApi::new();

        orders.expect_search_order().never();

        let result = track_order(&orders, "   ").await;

        assert!(matches!(result, Err(TrackingError::EmptyCode)));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let mut orders = MockOrdersApi::new();

        orders.expect_search_order().returning(|_| Ok(None));

        let result = track_order(&orders, "GB-404").await;

        assert_eq!(
            result.err().map(|error| error.user_message()),
            Some("no order found with code GB-404".to_string())
        );
    }

    #[test]
    fn progress_marks_passed_and_current_phases() -> TestResult {
        let mut out = Vec::new();

        write_progress(&mut out, &order("in_production"), VND)?;

        let text = String::from_utf8(out)?;
        let steps: Vec<&str> = text
            .lines()
            .filter(|line| line.starts_with("  ["))
            .collect();

        assert_eq!(steps.len(), 6);
        assert!(steps.first().is_some_and(|line| line.starts_with("  [x]")));
        assert_eq!(
            steps.iter().filter(|line| line.starts_with("  [>]")).count(),
            1
        );
        assert!(steps.last().is_some_and(|line| line.starts_with("  [ ]")));
        assert!(text.starts_with("Order GB-501 (in_production)"));

        Ok(())
    }

    #[test]
    fn unknown_status_is_called_out() -> TestResult {
        let mut out = Vec::new();

        write_progress(&mut out, &order("cancelled"), VND)?;

        let text = String::from_utf8(out)?;

        assert!(!text.contains("[>]"));
        assert!(text.contains("Status \"cancelled\" is not part of the usual flow."));

        Ok(())
    }
}
