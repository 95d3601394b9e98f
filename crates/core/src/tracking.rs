//! Order tracking
//!
//! The backend reports a fine-grained, opaque status string. For display it
//! is grouped into a handful of phases shown as a progress stepper.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::serde_lenient;

/// Coarse grouping of order statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Order received and being clarified with the customer.
    Intake,

    /// Design mock-up being prepared and approved.
    Demo,

    /// Deposit and payment.
    Finance,

    /// Gift being produced.
    Production,

    /// Packing, shipping and delivery.
    Fulfillment,

    /// Completion, warranty and returns.
    AfterSales,
}

impl Phase {
    /// Phases in stepper order.
    pub const ALL: [Phase; 6] = [
        Phase::Intake,
        Phase::Demo,
        Phase::Finance,
        Phase::Production,
        Phase::Fulfillment,
        Phase::AfterSales,
    ];

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intake => "Intake",
            Self::Demo => "Demo",
            Self::Finance => "Finance",
            Self::Production => "Production",
            Self::Fulfillment => "Fulfillment",
            Self::AfterSales => "After sales",
        }
    }

    /// Zero-based position in [`Phase::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const STATUS_PHASES: &[(&str, Phase)] = &[
    ("pending", Phase::Intake),
    ("new", Phase::Intake),
    ("received", Phase::Intake),
    ("consulting", Phase::Intake),
    ("confirmed", Phase::Intake),
    ("designing", Phase::Demo),
    ("demo_pending", Phase::Demo),
    ("demo_sent", Phase::Demo),
    ("demo_revision", Phase::Demo),
    ("demo_approved", Phase::Demo),
    ("awaiting_deposit", Phase::Finance),
    ("deposit_paid", Phase::Finance),
    ("awaiting_payment", Phase::Finance),
    ("paid", Phase::Finance),
    ("in_production", Phase::Production),
    ("producing", Phase::Production),
    ("quality_check", Phase::Production),
    ("production_done", Phase::Production),
    ("packing", Phase::Fulfillment),
    ("ready_to_ship", Phase::Fulfillment),
    ("shipping", Phase::Fulfillment),
    ("delivered", Phase::Fulfillment),
    ("completed", Phase::AfterSales),
    ("feedback", Phase::AfterSales),
    ("warranty", Phase::AfterSales),
    ("return_requested", Phase::AfterSales),
    ("returned", Phase::AfterSales),
    ("refunded", Phase::AfterSales),
];

/// Phase of a backend status, matched case-insensitively with `-` and
/// spaces treated as `_`. Unknown statuses (including `cancelled`) have no
/// phase.
pub fn phase_for_status(status: &str) -> Option<Phase> {
    let normalized: String = status
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();

    STATUS_PHASES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, phase)| *phase)
}

/// State of one stepper step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    /// Phase already passed.
    Done,

    /// Phase the order is in.
    Current,

    /// Phase still ahead.
    Upcoming,
}

/// Stepper view of an order's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderProgress {
    /// Current phase, `None` for statuses outside the stepper.
    pub current: Option<Phase>,

    /// Every phase with its state.
    pub steps: Vec<(Phase, StepState)>,
}

impl OrderProgress {
    /// Build the stepper for a backend status.
    pub fn from_status(status: &str) -> Self {
        let current = phase_for_status(status);

        let steps = Phase::ALL
            .into_iter()
            .map(|phase| {
                let state = match current {
                    Some(at) if phase < at => StepState::Done,
                    Some(at) if phase == at => StepState::Current,
                    _ => StepState::Upcoming,
                };

                (phase, state)
            })
            .collect();

        Self { current, steps }
    }
}

/// Order as returned by the order search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedOrder {
    /// Order identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Tracking code.
    #[serde(alias = "code", alias = "orderNumber")]
    pub order_code: String,

    /// Opaque backend status.
    pub status: String,

    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,

    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,

    /// Amount to pay, when reported.
    #[serde(default, deserialize_with = "serde_lenient::optional_amount")]
    pub total: Option<u64>,
}

impl TrackedOrder {
    /// Stepper view of this order.
    pub fn progress(&self) -> OrderProgress {
        OrderProgress::from_status(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn statuses_map_to_phases() {
        assert_eq!(phase_for_status("pending"), Some(Phase::Intake));
        assert_eq!(phase_for_status("demo_sent"), Some(Phase::Demo));
        assert_eq!(phase_for_status("deposit_paid"), Some(Phase::Finance));
        assert_eq!(phase_for_status("in_production"), Some(Phase::Production));
        assert_eq!(phase_for_status("shipping"), Some(Phase::Fulfillment));
        assert_eq!(phase_for_status("refunded"), Some(Phase::AfterSales));
    }

    #[test]
    fn status_matching_is_normalised() {
        assert_eq!(phase_for_status(" Demo-Approved "), Some(Phase::Demo));
        assert_eq!(phase_for_status("READY TO SHIP"), Some(Phase::Fulfillment));
    }

    #[test]
    fn unknown_status_has_no_phase() {
        assert_eq!(phase_for_status("cancelled"), None);
        assert_eq!(phase_for_status(""), None);
    }

    #[test]
    fn phases_are_in_stepper_order() {
        for (index, phase) in Phase::ALL.into_iter().enumerate() {
            assert_eq!(phase.index(), index);
        }
    }

    #[test]
    fn progress_marks_done_current_and_upcoming() {
        let progress = OrderProgress::from_status("paid");

        assert_eq!(progress.current, Some(Phase::Finance));
        assert_eq!(
            progress.steps,
            vec![
                (Phase::Intake, StepState::Done),
                (Phase::Demo, StepState::Done),
                (Phase::Finance, StepState::Current),
                (Phase::Production, StepState::Upcoming),
                (Phase::Fulfillment, StepState::Upcoming),
                (Phase::AfterSales, StepState::Upcoming),
            ]
        );
    }

    #[test]
    fn progress_of_unknown_status_is_all_upcoming() {
        let progress = OrderProgress::from_status("on_hold");

        assert_eq!(progress.current, None);
        assert!(
            progress
                .steps
                .iter()
                .all(|(_, state)| *state == StepState::Upcoming)
        );
    }

    #[test]
    fn tracked_order_deserializes_search_result() -> TestResult {
        let order: TrackedOrder = serde_json::from_value(json!({
            "id": 9,
            "orderCode": "GB-0009",
            "status": "packing",
            "createdAt": "2026-10-01T08:00:00Z",
            "total": "490000.00"
        }))?;

        assert_eq!(order.total, Some(490_000));
        assert_eq!(order.progress().current, Some(Phase::Fulfillment));

        Ok(())
    }
}
