use axum::http::StatusCode;

/// `GET /healthz`. Liveness only; readiness needs the service's database and
/// lives in the service router.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a readiness check result to the status code reported on `/readyz`.
pub fn readiness_status<E: std::fmt::Display>(check: Result<(), E>) -> StatusCode {
    match check {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
