//! Premium report unlock state machine.
//!
//! An evaluation starts `Free`, moves to `PendingPayment` when checkout
//! begins, and becomes `Premium` once the payment provider reports a capture
//! for the pending order. `Premium` is terminal.
//!
//! Provider webhooks may be delivered more than once, so re-applying a
//! capture that already produced the current state is a no-op rather than an
//! error.

use serde::{Deserialize, Serialize};

use super::error::PremiumError;

/// Unlock state of a single evaluation report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PremiumState {
    #[default]
    Free,
    PendingPayment { order_id: String },
    Premium { payment_id: String },
}

/// Payment lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentEvent {
    CheckoutStarted { order_id: String },
    PaymentCaptured { order_id: String, payment_id: String },
    PaymentFailed { order_id: String },
}

/// Outcome of applying a [`PaymentEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Changed(PremiumState),
    Unchanged,
}

impl PremiumState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::PendingPayment { .. } => "pending_payment",
            Self::Premium { .. } => "premium",
        }
    }

    /// Whether the full report may be shown.
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Premium { .. })
    }

    /// Compute the state that follows `event`.
    ///
    /// # Errors
    ///
    /// - `PremiumError::EmptyOrderId`: the event carries a blank order id.
    /// - `PremiumError::OrderMismatch`: a capture or failure names an order
    ///   other than the pending one.
    /// - `PremiumError::InvalidTransition`: the event makes no sense in the
    ///   current state (e.g. a capture while `Free`).
    pub fn apply(&self, event: &PaymentEvent) -> Result<Transition, PremiumError> {
        if event.order_id().trim().is_empty() {
            return Err(PremiumError::EmptyOrderId);
        }

        let transition = match (self, event) {
            (Self::Free, PaymentEvent::CheckoutStarted { order_id }) => {
                Transition::Changed(Self::PendingPayment {
                    order_id: order_id.clone(),
                })
            }

            // A retried checkout replaces the abandoned order.
            (Self::PendingPayment { order_id: current }, PaymentEvent::CheckoutStarted { order_id }) => {
                if current == order_id {
                    Transition::Unchanged
                } else {
                    Transition::Changed(Self::PendingPayment {
                        order_id: order_id.clone(),
                    })
                }
            }

            (
                Self::PendingPayment { order_id: current },
                PaymentEvent::PaymentCaptured {
                    order_id,
                    payment_id,
                },
            ) => {
                check_order(current, order_id)?;
                Transition::Changed(Self::Premium {
                    payment_id: payment_id.clone(),
                })
            }

            (Self::PendingPayment { order_id: current }, PaymentEvent::PaymentFailed { order_id }) => {
                check_order(current, order_id)?;
                Transition::Changed(Self::Free)
            }

            (Self::Premium { payment_id: current }, PaymentEvent::PaymentCaptured { payment_id, .. })
                if current == payment_id =>
            {
                Transition::Unchanged
            }

            // Late failure notices for orders that are no longer pending.
            (Self::Free | Self::Premium { .. }, PaymentEvent::PaymentFailed { .. }) => {
                Transition::Unchanged
            }

            (state, event) => {
                return Err(PremiumError::InvalidTransition {
                    state: state.name(),
                    event: event.name(),
                })
            }
        };

        if let Transition::Changed(next) = &transition {
            crate::obs::emit_premium_transition(self.name(), next.name(), event.name());
            crate::metrics::METRICS.inc_premium_transitions();
        }
        Ok(transition)
    }

    /// Apply `event` and return the resulting state.
    pub fn advance(self, event: &PaymentEvent) -> Result<Self, PremiumError> {
        match self.apply(event)? {
            Transition::Changed(next) => Ok(next),
            Transition::Unchanged => Ok(self),
        }
    }
}

impl PaymentEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckoutStarted { .. } => "checkout_started",
            Self::PaymentCaptured { .. } => "payment_captured",
            Self::PaymentFailed { .. } => "payment_failed",
        }
    }

    pub fn order_id(&self) -> &str {
        match self {
            Self::CheckoutStarted { order_id }
            | Self::PaymentCaptured { order_id, .. }
            | Self::PaymentFailed { order_id } => order_id,
        }
    }
}

fn check_order(expected: &str, got: &str) -> Result<(), PremiumError> {
    if expected == got {
        Ok(())
    } else {
        Err(PremiumError::OrderMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout(order: &str) -> PaymentEvent {
        PaymentEvent::CheckoutStarted {
            order_id: order.to_string(),
        }
    }

    fn captured(order: &str, payment: &str) -> PaymentEvent {
        PaymentEvent::PaymentCaptured {
            order_id: order.to_string(),
            payment_id: payment.to_string(),
        }
    }

    #[test]
    fn test_happy_path_reaches_premium() {
        let state = PremiumState::Free
            .advance(&checkout("order_1"))
            .expect("checkout")
            .advance(&captured("order_1", "pay_1"))
            .expect("capture");
        assert!(state.is_premium());
    }

    #[test]
    fn test_duplicate_capture_is_unchanged() {
        let state = PremiumState::Premium {
            payment_id: "pay_1".to_string(),
        };
        let t = state.apply(&captured("order_1", "pay_1")).expect("replay");
        assert_eq!(t, Transition::Unchanged);
    }

    #[test]
    fn test_capture_while_free_is_rejected() {
        let err = PremiumState::Free
            .apply(&captured("order_1", "pay_1"))
            .unwrap_err();
        assert_eq!(
            err,
            PremiumError::InvalidTransition {
                state: "free",
                event: "payment_captured",
            }
        );
    }

    #[test]
    fn test_capture_for_other_order_is_rejected() {
        let pending = PremiumState::PendingPayment {
            order_id: "order_1".to_string(),
        };
        let err = pending.apply(&captured("order_2", "pay_1")).unwrap_err();
        assert!(matches!(err, PremiumError::OrderMismatch { .. }));
    }

    #[test]
    fn test_failure_returns_to_free() {
        let pending = PremiumState::PendingPayment {
            order_id: "order_1".to_string(),
        };
        let next = pending
            .advance(&PaymentEvent::PaymentFailed {
                order_id: "order_1".to_string(),
            })
            .expect("failure");
        assert_eq!(next, PremiumState::Free);
    }

    #[test]
    fn test_late_failure_after_premium_is_unchanged() {
        let state = PremiumState::Premium {
            payment_id: "pay_2".to_string(),
        };
        let failed = PaymentEvent::PaymentFailed {
            order_id: "order_1".to_string(),
        };
        assert_eq!(state.apply(&failed).expect("late failure"), Transition::Unchanged);
        assert!(state.advance(&failed).expect("late failure").is_premium());
    }

    #[test]
    fn test_blank_order_id_rejected() {
        let err = PremiumState::Free.apply(&checkout("  ")).unwrap_err();
        assert_eq!(err, PremiumError::EmptyOrderId);
    }

    #[test]
    fn test_state_serde_tagged() {
        let state = PremiumState::PendingPayment {
            order_id: "order_9".to_string(),
        };
        let v = serde_json::to_value(&state).expect("serialize");
        assert_eq!(v["state"], "pending_payment");
        assert_eq!(v["order_id"], "order_9");
    }
}
