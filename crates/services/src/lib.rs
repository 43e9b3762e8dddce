//! # services
//!
//! Business logic of Civic Guardian. Each service owns its port handles
//! and enforces the contracts the HTTP layer relies on: the lifecycle
//! state machine, round-scoped verification voting, complaint intake and
//! listing, user registration, and the AI-assist degradation path.

pub mod assist;
pub mod complaints;
pub mod lifecycle;
pub mod users;
pub mod voting;

pub use assist::AssistService;
pub use complaints::{ComplaintService, ComplaintSubmission};
pub use lifecycle::LifecycleService;
pub use users::{RegisterUser, UserService};
pub use voting::{VoteOutcome, VotePolicy, VotingService};
