//! Shared fixtures for the end-to-end tests.
//!
//! Everything runs against a real in-memory SQLite database and the real
//! service layer; only the outbound assist collaborator is mocked.

use std::sync::Arc;

use api_adapters::{AppState, MediaDir};
use auth_adapters::{AdminToken, ArgonPasswordHasher};
use axum::Router;
use domains::models::AssistSuggestion;
use domains::ports::MockAssistProvider;
use secrecy::SecretString;
use services::{
    AssistService, ComplaintService, ComplaintSubmission, LifecycleService, RegisterUser,
    UserService, VotePolicy, VotingService,
};
use storage_adapters::{
    CivicDb, LocalMediaStore, SqliteComplaintRepo, SqliteUserRepo, SqliteVoteRepo,
};
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestApp {
    pub complaints: ComplaintService,
    pub lifecycle: LifecycleService,
    pub voting: VotingService,
    pub users: UserService,
    pub router: Router,
}

/// Canned assist provider: always succeeds with a fixed suggestion.
fn canned_assist() -> AssistService {
    let mut provider = MockAssistProvider::new();
    provider.expect_suggest().returning(|_| {
        Ok(AssistSuggestion {
            inferred_title: "Pothole near school".into(),
            description: "Large pothole slowing traffic".into(),
            descriptions: vec![],
            suggested_category: "potholes".into(),
            suggested_department: "roads".into(),
            tags: vec!["pothole".into()],
        })
    });
    AssistService::new(Arc::new(provider))
}

impl TestApp {
    pub async fn spawn(policy: VotePolicy) -> Self {
        let db = CivicDb::in_memory().await.expect("in-memory database");
        let complaint_repo = Arc::new(SqliteComplaintRepo::new(db.clone()));
        let vote_repo = Arc::new(SqliteVoteRepo::new(db.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(db));
        let media_root = std::env::temp_dir().join(format!("civic-test-{}", Uuid::new_v4()));
        let media = Arc::new(LocalMediaStore::new(media_root.clone(), "/uploads".into()));

        let complaints = ComplaintService::new(complaint_repo.clone(), media);
        let lifecycle = LifecycleService::new(complaint_repo.clone());
        let voting = VotingService::new(complaint_repo, vote_repo, user_repo.clone(), policy);
        let users = UserService::new(user_repo, Arc::new(ArgonPasswordHasher));

        let state = AppState {
            complaints: complaints.clone(),
            lifecycle: lifecycle.clone(),
            voting: voting.clone(),
            users: users.clone(),
            assist: canned_assist(),
            admin: AdminToken::new(SecretString::from(ADMIN_TOKEN.to_string())),
        };
        let router = api_adapters::router(
            state,
            MediaDir {
                url_prefix: "/uploads".into(),
                root: media_root,
            },
        );

        Self {
            complaints,
            lifecycle,
            voting,
            users,
            router,
        }
    }

    pub async fn register_citizen(&self, tag: &str) -> Uuid {
        self.users
            .register(RegisterUser {
                first_name: format!("Citizen {tag}"),
                last_name: "Test".into(),
                age: 30,
                aadhar_number: format!("{:012}", Uuid::new_v4().as_u128() % 1_000_000_000_000),
                email: format!("{tag}@example.com"),
                phone: "9999999999".into(),
                password: "hunter2hunter2".into(),
            })
            .await
            .expect("register citizen")
    }

    pub async fn file_complaint(&self, department: &str) -> Uuid {
        self.complaints
            .create(ComplaintSubmission {
                title: "Pothole on Main St".into(),
                description: "Deep pothole near the junction".into(),
                department: department.into(),
                latitude: Some(13.08),
                longitude: Some(80.22),
                location_name: "Main St".into(),
                ..ComplaintSubmission::default()
            })
            .await
            .expect("file complaint")
            .id
    }
}
