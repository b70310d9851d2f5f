pub mod contribution_service;
pub mod dues;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::repository::{ContributionRepository, MemberDirectory};
use contribution_service::ContributionService;

pub struct ServiceContext {
    pub contribution_service: Arc<ContributionService>,
    pub directory: Arc<dyn MemberDirectory>,
    pub auth_service: Arc<AuthService>,
}

impl ServiceContext {
    pub fn new(
        contribution_repo: Arc<dyn ContributionRepository>,
        directory: Arc<dyn MemberDirectory>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let contribution_service = Arc::new(ContributionService::new(
            contribution_repo,
            directory.clone(),
        ));

        Self {
            contribution_service,
            directory,
            auth_service,
        }
    }
}
