pub mod admin;
pub mod assist;
pub mod complaints;
pub mod users;
pub mod votes;

/// Health banner for load balancers and the curious.
pub async fn health() -> &'static str {
    "Civic Guardian API running"
}
