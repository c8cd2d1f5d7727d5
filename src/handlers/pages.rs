use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET / -> the single-page client.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /healthz
pub async fn health_handler() -> &'static str {
    "ok"
}
