use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 Prompt library
        // ========================================
        .route(
            "/api/a001-prompt-library",
            get(handlers::a001_prompt_library::get_library),
        )
        .route(
            "/api/a001-prompt-library/status",
            get(handlers::a001_prompt_library::get_status),
        )
        .route(
            "/api/a001-prompt-library/reload",
            post(handlers::a001_prompt_library::reload),
        )
        .route(
            "/api/a001-prompt-library/export",
            get(handlers::a001_prompt_library::export),
        )
        .route(
            "/api/a001-prompt-library/tags",
            get(handlers::a001_prompt_library::list_tags),
        )
        .route(
            "/api/a001-prompt-library/search",
            get(handlers::a001_prompt_library::search),
        )
        .route(
            "/api/a001-prompt-library/families",
            get(handlers::a001_prompt_library::list_families)
                .post(handlers::a001_prompt_library::create_family),
        )
        .route(
            "/api/a001-prompt-library/families/:family",
            axum::routing::delete(handlers::a001_prompt_library::delete_family),
        )
        .route(
            "/api/a001-prompt-library/use-cases/:family/:use_case",
            get(handlers::a001_prompt_library::get_use_case)
                .post(handlers::a001_prompt_library::upsert_use_case)
                .delete(handlers::a001_prompt_library::delete_use_case),
        )
        .route(
            "/api/a001-prompt-library/use-cases/:family/:use_case/duplicate",
            post(handlers::a001_prompt_library::duplicate_use_case),
        )
        // ========================================
        // UseCases
        // ========================================
        .route("/api/u501/generate", post(handlers::usecases::u501_generate))
        .route("/api/u502/inject", post(handlers::usecases::u502_inject))
        .route(
            "/api/u503/meta-prompt",
            post(handlers::usecases::u503_meta_prompt),
        )
}
