//! Pure (role, action) -> allow/deny mapping. Every mutating operation
//! consults this before touching the store; denial is a Forbidden error,
//! never an empty result.

use crate::domain::Role;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SubmitOwnContribution,
    SubmitOnBehalf,
    TransitionStatus,
    ReadAllContributions,
    /// Reading another member's contributions. Reading your own is
    /// always allowed and never reaches the policy.
    ReadMemberContributions,
}

pub fn allows(role: Role, action: Action) -> bool {
    match action {
        Action::SubmitOwnContribution => role != Role::Guest,
        Action::SubmitOnBehalf | Action::TransitionStatus => {
            matches!(role, Role::Admin | Role::Treasurer)
        }
        Action::ReadAllContributions => true,
        Action::ReadMemberContributions => role == Role::Admin,
    }
}

pub fn authorize(role: Role, action: Action) -> Result<()> {
    if allows(role, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_treasurer_may_transition() {
        for role in [
            Role::Pradhan,
            Role::UpPradhan,
            Role::Secretary,
            Role::ChiefAdvisor,
            Role::Advisor,
            Role::CoreMember,
            Role::OtherMember,
            Role::Guest,
        ] {
            assert!(!allows(role, Action::TransitionStatus), "{role} passed");
            assert!(!allows(role, Action::SubmitOnBehalf), "{role} passed");
        }
        assert!(allows(Role::Admin, Action::TransitionStatus));
        assert!(allows(Role::Treasurer, Action::SubmitOnBehalf));
    }

    #[test]
    fn guests_cannot_submit_but_can_read() {
        assert!(!allows(Role::Guest, Action::SubmitOwnContribution));
        assert!(allows(Role::Guest, Action::ReadAllContributions));
    }

    #[test]
    fn cross_member_reads_are_admin_only() {
        assert!(allows(Role::Admin, Action::ReadMemberContributions));
        assert!(!allows(Role::Treasurer, Action::ReadMemberContributions));
    }

    #[test]
    fn authorize_maps_denial_to_forbidden() {
        let err = authorize(Role::Guest, Action::SubmitOwnContribution).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
