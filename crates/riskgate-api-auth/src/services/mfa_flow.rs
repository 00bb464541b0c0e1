//! Login MFA state machine.
//!
//! Tracks a single login attempt from password success through second-factor
//! verification. Transitions are explicit: an out-of-order event (e.g.
//! verifying a code before a challenge exists) is rejected rather than
//! silently ignored.
//!
//! Every login goes through a second factor. A user with no factor is routed
//! into enrollment rather than granted access, and a failed factor lookup
//! moves the flow to `Failed`; it is never treated as "no factors enrolled",
//! since that would let a database outage bypass MFA entirely.

use riskgate_core::{ChallengeId, FactorId};

/// State of one login attempt's MFA leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MfaLoginFlow {
    /// Password accepted; factor inventory not yet resolved.
    AuthenticatedNoMfaCheck,
    /// No factor existed; a pending factor was created and its enrollment
    /// payload shown. Awaits the first code.
    Enrolling { factor_id: FactorId },
    /// A challenge has been issued and awaits a code.
    Challenging {
        factor_id: FactorId,
        challenge_id: ChallengeId,
    },
    /// Second factor satisfied; full tokens may be issued.
    Verified,
    /// The flow ended without verification; the verification step must be
    /// retried.
    Failed,
}

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MFA flow transition: {event} in state {state}")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub event: &'static str,
}

impl MfaLoginFlow {
    /// Start a flow after password authentication succeeds.
    #[must_use]
    pub fn new() -> Self {
        MfaLoginFlow::AuthenticatedNoMfaCheck
    }

    fn state_name(&self) -> &'static str {
        match self {
            MfaLoginFlow::AuthenticatedNoMfaCheck => "AuthenticatedNoMfaCheck",
            MfaLoginFlow::Enrolling { .. } => "Enrolling",
            MfaLoginFlow::Challenging { .. } => "Challenging",
            MfaLoginFlow::Verified => "Verified",
            MfaLoginFlow::Failed => "Failed",
        }
    }

    /// The factor inventory check failed. Always terminal.
    #[must_use]
    pub fn factor_check_failed(self) -> Self {
        MfaLoginFlow::Failed
    }

    /// Enrollment started for a user with no existing factor.
    pub fn enrollment_started(self, factor_id: FactorId) -> Result<Self, InvalidTransition> {
        match self {
            MfaLoginFlow::AuthenticatedNoMfaCheck => Ok(MfaLoginFlow::Enrolling { factor_id }),
            _ => Err(InvalidTransition {
                state: self.state_name(),
                event: "enrollment_started",
            }),
        }
    }

    /// A challenge was issued against a factor.
    ///
    /// Valid after a non-empty factor listing, or during enrollment when the
    /// first code must be confirmed against the new factor.
    pub fn challenge_issued(
        self,
        factor_id: FactorId,
        challenge_id: ChallengeId,
    ) -> Result<Self, InvalidTransition> {
        match self {
            MfaLoginFlow::AuthenticatedNoMfaCheck => Ok(MfaLoginFlow::Challenging {
                factor_id,
                challenge_id,
            }),
            MfaLoginFlow::Enrolling {
                factor_id: enrolling,
            } if enrolling == factor_id => Ok(MfaLoginFlow::Challenging {
                factor_id,
                challenge_id,
            }),
            _ => Err(InvalidTransition {
                state: self.state_name(),
                event: "challenge_issued",
            }),
        }
    }

    /// The challenge code verified successfully.
    pub fn challenge_passed(self, challenge_id: ChallengeId) -> Result<Self, InvalidTransition> {
        match self {
            MfaLoginFlow::Challenging {
                challenge_id: pending,
                ..
            } if pending == challenge_id => Ok(MfaLoginFlow::Verified),
            _ => Err(InvalidTransition {
                state: self.state_name(),
                event: "challenge_passed",
            }),
        }
    }

    /// The challenge failed (bad code, expiry, or lockout). Terminal for
    /// this attempt; the verification step may be retried with a new flow.
    #[must_use]
    pub fn challenge_failed(self) -> Self {
        MfaLoginFlow::Failed
    }

    /// Whether full tokens may be issued in this state.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, MfaLoginFlow::Verified)
    }

    /// Whether the flow ended without verification.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, MfaLoginFlow::Failed)
    }
}

impl Default for MfaLoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_challenge_path() {
        let factor_id = FactorId::new();
        let challenge_id = ChallengeId::new();

        let flow = MfaLoginFlow::new()
            .challenge_issued(factor_id, challenge_id)
            .unwrap()
            .challenge_passed(challenge_id)
            .unwrap();

        assert!(flow.is_verified());
    }

    #[test]
    fn enrollment_path() {
        let factor_id = FactorId::new();
        let challenge_id = ChallengeId::new();

        let flow = MfaLoginFlow::new()
            .enrollment_started(factor_id)
            .unwrap()
            .challenge_issued(factor_id, challenge_id)
            .unwrap()
            .challenge_passed(challenge_id)
            .unwrap();

        assert!(flow.is_verified());
    }

    #[test]
    fn password_alone_never_verifies() {
        let flow = MfaLoginFlow::new();
        assert!(!flow.is_verified());
        assert!(flow.challenge_passed(ChallengeId::new()).is_err());
    }

    #[test]
    fn factor_check_failure_is_terminal_not_empty() {
        // A lookup error must not behave like an empty factor list.
        let flow = MfaLoginFlow::new().factor_check_failed();
        assert!(flow.is_failed());
        assert!(!flow.is_verified());
        assert!(flow.enrollment_started(FactorId::new()).is_err());
    }

    #[test]
    fn challenge_failure_is_terminal() {
        let factor_id = FactorId::new();
        let flow = MfaLoginFlow::new()
            .challenge_issued(factor_id, ChallengeId::new())
            .unwrap()
            .challenge_failed();
        assert!(flow.is_failed());
    }

    #[test]
    fn cannot_pass_wrong_challenge() {
        let factor_id = FactorId::new();
        let flow = MfaLoginFlow::new()
            .challenge_issued(factor_id, ChallengeId::new())
            .unwrap();

        let result = flow.challenge_passed(ChallengeId::new());
        assert!(result.is_err());
    }

    #[test]
    fn cannot_verify_without_challenge() {
        let result = MfaLoginFlow::new().challenge_passed(ChallengeId::new());
        let err = result.unwrap_err();
        assert_eq!(err.state, "AuthenticatedNoMfaCheck");
        assert_eq!(err.event, "challenge_passed");
    }

    #[test]
    fn cannot_issue_challenge_for_other_enrolling_factor() {
        let flow = MfaLoginFlow::new().enrollment_started(FactorId::new()).unwrap();
        let result = flow.challenge_issued(FactorId::new(), ChallengeId::new());
        assert!(result.is_err());
    }

    #[test]
    fn cannot_enroll_twice() {
        let flow = MfaLoginFlow::new().enrollment_started(FactorId::new()).unwrap();
        assert!(flow.enrollment_started(FactorId::new()).is_err());
    }

    #[test]
    fn verified_state_rejects_further_events() {
        let challenge_id = ChallengeId::new();
        let flow = MfaLoginFlow::new()
            .challenge_issued(FactorId::new(), challenge_id)
            .unwrap()
            .challenge_passed(challenge_id)
            .unwrap();

        assert!(flow.clone().enrollment_started(FactorId::new()).is_err());
        assert!(flow.challenge_passed(challenge_id).is_err());
    }
}
