//! Saga error types.

use thiserror::Error;

use common::TripId;
use domain::DomainError;
use store::StoreError;

use crate::trip::TripStep;

/// Errors that can occur during trip saga operations.
///
/// The variants keep the taxonomy explicit so callers can tell a
/// validation or conflict failure (no compensation ran) from a remote
/// failure that was cleanly compensated, and both from a failed
/// compensation that left cross-system state inconsistent.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The hotel leg (or trip validation) failed before any remote
    /// state existed; nothing needed compensation.
    #[error(transparent)]
    Booking(#[from] DomainError),

    /// Trip booking record not found.
    #[error("trip booking not found: {0}")]
    TripNotFound(TripId),

    /// A forward step failed and every completed earlier step was
    /// compensated in reverse order.
    #[error("trip step '{step}' failed: {reason}")]
    StepFailed {
        /// The forward step that failed.
        step: TripStep,
        /// Why it failed.
        reason: String,
        /// The compensations that ran, in the order they ran.
        compensated: Vec<TripStep>,
    },

    /// A compensating action itself failed. Not automatically
    /// recoverable: the remaining compensations were not attempted and
    /// an operator must reconcile the cross-system state by hand.
    #[error(
        "compensation of step '{compensation_step}' failed ({reason}) while rolling back \
         failed step '{failed_step}' ({trigger}); manual reconciliation required"
    )]
    CompensationFailed {
        /// The forward step whose failure triggered compensation.
        failed_step: TripStep,
        /// Why the forward step failed.
        trigger: String,
        /// The step whose compensating action could not be completed.
        compensation_step: TripStep,
        /// Why the compensating action failed.
        reason: String,
        /// The compensations that did complete before the failure.
        compensated: Vec<TripStep>,
    },

    /// A teardown (cancel-trip) call failed. The remaining teardown
    /// steps were not attempted and must be reconciled by hand.
    #[error("teardown of step '{step}' failed: {reason}")]
    TeardownFailed {
        /// The leg whose teardown call failed.
        step: TripStep,
        /// Why it failed.
        reason: String,
        /// The teardown steps that completed before the failure.
        completed: Vec<TripStep>,
    },
}

impl From<StoreError> for SagaError {
    fn from(e: StoreError) -> Self {
        SagaError::Booking(e.into())
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_failed_display_names_the_step() {
        let err = SagaError::StepFailed {
            step: TripStep::BookFlight,
            reason: "connection refused".to_string(),
            compensated: vec![TripStep::BookHotel],
        };
        assert_eq!(
            err.to_string(),
            "trip step 'book_flight' failed: connection refused"
        );
    }

    #[test]
    fn compensation_failed_display_flags_reconciliation() {
        let err = SagaError::CompensationFailed {
            failed_step: TripStep::BookTaxi,
            trigger: "taxi rejected".to_string(),
            compensation_step: TripStep::BookFlight,
            reason: "cancel timed out".to_string(),
            compensated: vec![],
        };
        assert!(err.to_string().contains("manual reconciliation required"));
    }

    #[test]
    fn store_errors_pass_through_the_domain_mapping() {
        let err: SagaError = StoreError::DuplicateEmail("a@x.com".to_string()).into();
        assert!(matches!(
            err,
            SagaError::Booking(DomainError::EmailInUse(_))
        ));
    }
}
