//! Shared handler state.

use auth_adapters::AdminToken;
use services::{AssistService, ComplaintService, LifecycleService, UserService, VotingService};

#[derive(Clone)]
pub struct AppState {
    pub complaints: ComplaintService,
    pub lifecycle: LifecycleService,
    pub voting: VotingService,
    pub users: UserService,
    pub assist: AssistService,
    pub admin: AdminToken,
}
