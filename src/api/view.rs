use axum::response::Html;

const INDEX_PAGE: &str = include_str!("../../templates/index.html");

/// The expense page. Data is loaded by the page itself from `/api/expenses`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
