//! Outstanding dues: the derived view answering "who still owes for this
//! period". Pure function of its inputs, recomputed on every request.

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::{Contribution, ContributionStatus, Member, Month, Role};

/// Returns the members of `roster` with no Approved contribution for
/// (month, year). Admins are exempt from dues tracking. Pending and
/// Rejected records leave a member outstanding; when several records
/// exist for one member and period, any Approved one clears the due.
pub fn compute_outstanding(
    month: Month,
    year: i32,
    roster: &[Member],
    contributions: &[Contribution],
) -> Vec<Member> {
    let paid: HashSet<Uuid> = contributions
        .iter()
        .filter(|c| {
            c.month == month && c.year == year && c.status == ContributionStatus::Approved
        })
        .map(|c| c.member_id)
        .collect();

    roster
        .iter()
        .filter(|m| m.role != Role::Admin && !paid.contains(&m.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(name: &str, role: Role) -> Member {
        Member {
            id: Uuid::new_v4(),
            name: name.to_string(),
            village_name: "Rampur".to_string(),
            mobile_number: format!("99999{}", name.len()),
            role,
            created_at: Utc::now(),
        }
    }

    fn contribution(member_id: Uuid, month: Month, year: i32, status: ContributionStatus) -> Contribution {
        Contribution {
            id: Uuid::new_v4(),
            member_id,
            amount: 500,
            month,
            year,
            payment_date: Utc::now(),
            status,
            approved_by: None,
            approval_date: None,
            notes: None,
        }
    }

    #[test]
    fn paid_and_admins_are_excluded() {
        let alice = member("Alice", Role::CoreMember);
        let bob = member("Bob", Role::OtherMember);
        let carol = member("Carol", Role::Admin);
        let roster = vec![alice.clone(), bob.clone(), carol];

        let contributions = vec![contribution(
            alice.id,
            Month::March,
            2025,
            ContributionStatus::Approved,
        )];

        let outstanding = compute_outstanding(Month::March, 2025, &roster, &contributions);
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].id, bob.id);
    }

    #[test]
    fn pending_and_rejected_count_as_outstanding() {
        let alice = member("Alice", Role::CoreMember);
        let bob = member("Bob", Role::OtherMember);
        let roster = vec![alice.clone(), bob.clone()];

        let contributions = vec![
            contribution(alice.id, Month::March, 2025, ContributionStatus::Pending),
            contribution(bob.id, Month::March, 2025, ContributionStatus::Rejected),
        ];

        let outstanding = compute_outstanding(Month::March, 2025, &roster, &contributions);
        assert_eq!(outstanding.len(), 2);
    }

    #[test]
    fn any_approved_record_clears_the_due() {
        // The privileged self path can leave several records for one
        // member and period.
        let treasurer = member("Tara", Role::Treasurer);
        let roster = vec![treasurer.clone()];

        let contributions = vec![
            contribution(treasurer.id, Month::April, 2025, ContributionStatus::Rejected),
            contribution(treasurer.id, Month::April, 2025, ContributionStatus::Approved),
        ];

        let outstanding = compute_outstanding(Month::April, 2025, &roster, &contributions);
        assert!(outstanding.is_empty());
    }

    #[test]
    fn other_periods_do_not_clear_the_due() {
        let alice = member("Alice", Role::CoreMember);
        let roster = vec![alice.clone()];

        let contributions = vec![contribution(
            alice.id,
            Month::February,
            2025,
            ContributionStatus::Approved,
        )];

        let outstanding = compute_outstanding(Month::March, 2025, &roster, &contributions);
        assert_eq!(outstanding.len(), 1);
    }
}
