// Request logging middleware
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

/// Log every inbound request with a generated request id
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().simple().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let span = tracing::info_span!("request", id = %request_id);

    async move {
        tracing::info!("Request: {} {}", method, uri);
        let started = std::time::Instant::now();

        let response = next.run(request).await;

        let status = response.status();
        if status.is_server_error() {
            tracing::warn!(
                "Response: {} {} -> {} ({} ms)",
                method,
                uri,
                status,
                started.elapsed().as_millis()
            );
        } else {
            tracing::info!(
                "Response: {} {} -> {} ({} ms)",
                method,
                uri,
                status,
                started.elapsed().as_millis()
            );
        }
        response
    }
    .instrument(span)
    .await
}
