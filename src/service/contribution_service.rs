use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::AuthPrincipal,
    domain::*,
    error::{AppError, Result},
    policy::{self, Action},
    repository::{ContributionRepository, MemberDirectory},
    service::dues,
};

/// Orchestrates the contribution lifecycle: submission, privileged add,
/// status transitions and the derived reads. Every operation takes the
/// caller's principal explicitly and checks the policy before touching
/// the store.
pub struct ContributionService {
    contributions: Arc<dyn ContributionRepository>,
    directory: Arc<dyn MemberDirectory>,
}

impl ContributionService {
    pub fn new(
        contributions: Arc<dyn ContributionRepository>,
        directory: Arc<dyn MemberDirectory>,
    ) -> Self {
        Self {
            contributions,
            directory,
        }
    }

    /// A member submits their own contribution; it enters the pending
    /// queue until a treasurer or admin transitions it.
    pub async fn submit_own(
        &self,
        principal: &AuthPrincipal,
        request: SubmitContributionRequest,
    ) -> Result<ContributionView> {
        policy::authorize(principal.role, Action::SubmitOwnContribution)?;
        let month = validate_period(&request.month, request.year)?;
        validate_amount(request.amount)?;

        let contribution = Contribution {
            id: Uuid::new_v4(),
            member_id: principal.member_id,
            amount: request.amount,
            month,
            year: request.year,
            payment_date: Utc::now(),
            status: ContributionStatus::Pending,
            approved_by: None,
            approval_date: None,
            notes: request.notes,
        };

        let created = self.contributions.insert_unique(contribution).await?;

        tracing::info!(
            member = %principal.member_id,
            %month,
            year = request.year,
            "contribution submitted"
        );

        self.resolve_view(created).await
    }

    /// Admin/treasurer records a payment collected in person. The record
    /// is created directly in Approved state; no second approval step.
    pub async fn submit_on_behalf(
        &self,
        principal: &AuthPrincipal,
        request: AdminAddContributionRequest,
    ) -> Result<ContributionView> {
        policy::authorize(principal.role, Action::SubmitOnBehalf)?;
        let month = validate_period(&request.month, request.year)?;
        validate_amount(request.amount)?;

        self.directory
            .find_by_id(request.member_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        let now = Utc::now();
        let contribution = Contribution {
            id: Uuid::new_v4(),
            member_id: request.member_id,
            amount: request.amount,
            month,
            year: request.year,
            payment_date: now,
            status: ContributionStatus::Approved,
            approved_by: Some(principal.member_id),
            approval_date: Some(now),
            notes: request.notes,
        };

        // The duplicate check is skipped when the actor targets their own
        // record through this path. Observed behavior of the existing
        // clients, kept as-is; see DESIGN.md.
        let created = if request.member_id == principal.member_id {
            self.contributions.insert(contribution).await?
        } else {
            self.contributions.insert_unique(contribution).await?
        };

        tracing::info!(
            actor = %principal.member_id,
            member = %request.member_id,
            %month,
            year = request.year,
            "contribution added on behalf"
        );

        self.resolve_view(created).await
    }

    /// Pending -> Approved/Rejected. Terminal states stay terminal; a
    /// repeat call fails rather than silently succeeding.
    pub async fn transition_status(
        &self,
        principal: &AuthPrincipal,
        contribution_id: Uuid,
        request: UpdateStatusRequest,
    ) -> Result<ContributionView> {
        policy::authorize(principal.role, Action::TransitionStatus)?;

        let new_status = request
            .status
            .parse::<ContributionStatus>()
            .map_err(|_| AppError::Validation("Invalid status".to_string()))?;
        if new_status == ContributionStatus::Pending {
            return Err(AppError::Validation("Invalid status".to_string()));
        }

        let updated = self
            .contributions
            .transition(
                contribution_id,
                new_status,
                principal.member_id,
                Utc::now(),
                request.notes.as_deref(),
            )
            .await?;

        tracing::info!(
            actor = %principal.member_id,
            contribution = %contribution_id,
            status = %new_status,
            "contribution status updated"
        );

        self.resolve_view(updated).await
    }

    pub async fn list_all(
        &self,
        principal: &AuthPrincipal,
        filter: ContributionFilter,
    ) -> Result<Vec<ContributionView>> {
        policy::authorize(principal.role, Action::ReadAllContributions)?;
        let contributions = self.contributions.list(&filter).await?;
        self.resolve_views(contributions).await
    }

    pub async fn list_by_member(
        &self,
        principal: &AuthPrincipal,
        member_id: Uuid,
    ) -> Result<Vec<ContributionView>> {
        if principal.member_id != member_id {
            policy::authorize(principal.role, Action::ReadMemberContributions)?;
        }

        let filter = ContributionFilter {
            member_id: Some(member_id),
            ..Default::default()
        };
        let contributions = self.contributions.list(&filter).await?;
        self.resolve_views(contributions).await
    }

    pub async fn list_by_period(
        &self,
        principal: &AuthPrincipal,
        month: &str,
        year: i32,
    ) -> Result<Vec<ContributionView>> {
        policy::authorize(principal.role, Action::ReadAllContributions)?;
        let month = validate_period(month, year)?;

        let filter = ContributionFilter {
            month: Some(month),
            year: Some(year),
            ..Default::default()
        };
        let contributions = self.contributions.list(&filter).await?;
        self.resolve_views(contributions).await
    }

    /// Joins the directory roster with the period's contributions to
    /// answer "who still owes".
    pub async fn outstanding(
        &self,
        principal: &AuthPrincipal,
        month: &str,
        year: i32,
    ) -> Result<Vec<Member>> {
        policy::authorize(principal.role, Action::ReadAllContributions)?;
        let month = validate_period(month, year)?;

        let roster = self.directory.list().await?;
        let filter = ContributionFilter {
            month: Some(month),
            year: Some(year),
            ..Default::default()
        };
        let contributions = self.contributions.list(&filter).await?;

        Ok(dues::compute_outstanding(month, year, &roster, &contributions))
    }

    async fn resolve_view(&self, contribution: Contribution) -> Result<ContributionView> {
        let member_name = self
            .directory
            .find_by_id(contribution.member_id)
            .await?
            .map(|m| m.name);
        let approved_by_name = match contribution.approved_by {
            Some(id) => self.directory.find_by_id(id).await?.map(|m| m.name),
            None => None,
        };

        Ok(ContributionView {
            contribution,
            member_name,
            approved_by_name,
        })
    }

    async fn resolve_views(
        &self,
        contributions: Vec<Contribution>,
    ) -> Result<Vec<ContributionView>> {
        let names: HashMap<Uuid, String> = self
            .directory
            .list()
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        Ok(contributions
            .into_iter()
            .map(|c| {
                let member_name = names.get(&c.member_id).cloned();
                let approved_by_name = c.approved_by.and_then(|id| names.get(&id).cloned());
                ContributionView {
                    contribution: c,
                    member_name,
                    approved_by_name,
                }
            })
            .collect())
    }
}

fn validate_amount(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(AppError::Validation(
            "Amount must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_period(month: &str, year: i32) -> Result<Month> {
    let month = month
        .parse::<Month>()
        .map_err(|_| AppError::Validation(format!("Unrecognized month: {}", month)))?;

    if !(2000..=2100).contains(&year) {
        return Err(AppError::Validation(format!("Implausible year: {}", year)));
    }

    Ok(month)
}
