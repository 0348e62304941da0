pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::newsletter::handlers as newsletter;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

/// Upper bound for multipart requests carrying student documents.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// GET /
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        // Profile sidebar
        .route(
            "/api/v1/students",
            get(profiles::handle_list_students).post(profiles::handle_save_student),
        )
        .route(
            "/api/v1/students/:name",
            get(profiles::handle_get_student).delete(profiles::handle_delete_student),
        )
        .route(
            "/api/v1/students/:name/files",
            get(profiles::handle_saved_files),
        )
        // Master plan and chatbot
        .route(
            "/api/v1/documents",
            post(generation::handle_available_documents),
        )
        .route("/api/v1/plans", post(generation::handle_generate_plan))
        .route("/api/v1/chat", post(generation::handle_chat))
        // Newsletter
        .route(
            "/api/v1/subscribers",
            get(newsletter::handle_list_subscribers)
                .post(newsletter::handle_add_subscribers)
                .delete(newsletter::handle_remove_subscribers),
        )
        .route(
            "/api/v1/newsletter/sender",
            get(newsletter::handle_sender_status),
        )
        .route(
            "/api/v1/newsletter/preview",
            post(newsletter::handle_preview),
        )
        .route("/api/v1/newsletter/draft", post(newsletter::handle_draft))
        .route("/api/v1/newsletter/send", post(newsletter::handle_send))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
