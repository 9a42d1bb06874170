use axum::response::Html;

/// GET /
///
/// Liveness page for humans poking the service.
pub async fn index() -> Html<&'static str> {
    Html("<h1>AI code review service is running</h1>")
}
