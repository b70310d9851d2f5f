use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod contribution_repository;
pub mod member_repository;

pub use contribution_repository::SqliteContributionRepository;
pub use member_repository::SqliteMemberDirectory;

/// The membership directory. Read-only from the core's perspective;
/// `create` exists for seeding and tests and enforces the singleton-role
/// invariant so the core never has to.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn create(&self, request: CreateMemberRequest) -> Result<Member>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;
    async fn list(&self) -> Result<Vec<Member>>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<Member>>;
}

#[async_trait]
pub trait ContributionRepository: Send + Sync {
    /// Insert without the per-period duplicate check. Only the privileged
    /// self path uses this.
    async fn insert(&self, contribution: Contribution) -> Result<Contribution>;

    /// Duplicate-check-then-insert as one transaction; fails with
    /// Duplicate if a record for (member, month, year) already exists.
    async fn insert_unique(&self, contribution: Contribution) -> Result<Contribution>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contribution>>;

    /// All contributions matching the filter, ordered (year desc,
    /// calendar month desc).
    async fn list(&self, filter: &ContributionFilter) -> Result<Vec<Contribution>>;

    /// Pending -> new_status as a single conditional update; fails with
    /// NotFound or InvalidTransition, leaving the record untouched.
    async fn transition(
        &self,
        id: Uuid,
        new_status: ContributionStatus,
        approved_by: Uuid,
        approval_date: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Contribution>;
}
