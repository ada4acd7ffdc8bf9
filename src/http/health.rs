/// Liveness probe. Does not touch the upstream provider.
pub async fn health() -> &'static str {
    "Service is up and running"
}
