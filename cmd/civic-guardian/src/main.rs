//! Civic Guardian API server.
//!
//! Wires the SQLite repositories, the local media store, the argon2
//! hasher and the assist client into the axum router and serves it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use api_adapters::{AppState, MediaDir};
use auth_adapters::{AdminToken, ArgonPasswordHasher};
use configs::AppConfig;
use domains::schema::ProcessStage;
use services::{
    AssistService, ComplaintService, LifecycleService, UserService, VotePolicy, VotingService,
};
use storage_adapters::{
    CivicDb, LocalMediaStore, SqliteComplaintRepo, SqliteUserRepo, SqliteVoteRepo,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use upstream_adapters::HttpAssistProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let admin_token = config
        .require_admin_token()
        .context("the admin surface needs a token")?;

    let db = CivicDb::connect(&config.database.url, config.database.max_connections)
        .await
        .context("connecting to the database")?;
    info!(url = %config.database.url, "database ready");

    let complaint_repo = Arc::new(SqliteComplaintRepo::new(db.clone()));
    let vote_repo = Arc::new(SqliteVoteRepo::new(db.clone()));
    let user_repo = Arc::new(SqliteUserRepo::new(db));
    let media = Arc::new(LocalMediaStore::new(
        PathBuf::from(&config.media.root_path),
        config.media.url_prefix.clone(),
    ));
    let hasher = Arc::new(ArgonPasswordHasher);
    let assist_provider = Arc::new(HttpAssistProvider::new(
        config.assist.base_url.clone(),
        config.assist.api_key.clone(),
        config.assist.model.clone(),
    ));

    let policy = VotePolicy {
        resolve_threshold: config.voting.resolve_threshold,
        reopen_threshold: config.voting.reopen_threshold,
        reopen_stage: ProcessStage::parse(&config.voting.reopen_stage)
            .context("voting.reopen_stage is not a valid process stage")?,
    };

    let state = AppState {
        complaints: ComplaintService::new(complaint_repo.clone(), media),
        lifecycle: LifecycleService::new(complaint_repo.clone()),
        voting: VotingService::new(complaint_repo, vote_repo, user_repo.clone(), policy),
        users: UserService::new(user_repo, hasher),
        assist: AssistService::new(assist_provider),
        admin: AdminToken::new(admin_token),
    };

    let app = api_adapters::router(
        state,
        MediaDir {
            url_prefix: config.media.url_prefix.clone(),
            root: PathBuf::from(&config.media.root_path),
        },
    );
    let listener = tokio::net::TcpListener::bind(&config.http.bind)
        .await
        .with_context(|| format!("binding {}", config.http.bind))?;
    info!(bind = %config.http.bind, "civic guardian listening");
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
