use axum::{
    routing::{get, put},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{HistoryConfig, SecurityConfig};
use crate::database::StoreHandle;
use crate::handlers;
use crate::middleware::create_cors;

/// Full application router over the given store
pub fn app(store: StoreHandle, history: HistoryConfig, security: &SecurityConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .merge(rule_routes())
        .merge(template_routes())
        .merge(history_routes())
        .layer(Extension(store))
        .layer(Extension(history))
        .layer(TraceLayer::new_for_http());

    if !security.enable_cors {
        return router;
    }
    let cors = if crate::is_development!() {
        CorsLayer::permissive()
    } else {
        create_cors(security)
    };
    router.layer(cors)
}

fn rule_routes() -> Router {
    use handlers::rules;

    Router::new()
        .route("/api/rules", get(rules::list).post(rules::create))
        .route("/api/rules/:id", put(rules::update).delete(rules::delete))
}

fn template_routes() -> Router {
    use handlers::templates;

    Router::new()
        .route("/api/templates", get(templates::list).post(templates::create))
        .route(
            "/api/templates/:id",
            put(templates::update).delete(templates::delete),
        )
}

fn history_routes() -> Router {
    use handlers::history;

    Router::new()
        .route("/api/history", get(history::list).post(history::create))
        .route("/api/history/user/:uid", get(history::list_for_user))
}
