use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::{author_handlers, handlers, responder};
use crate::config::Mode;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Task manager
        .route(
            "/api/v1/tasks",
            get(handlers::get_all_tasks::<S>).post(handlers::create_task::<S>),
        )
        .route(
            "/api/v1/tasks/:id",
            get(handlers::get_task::<S>)
                .patch(handlers::update_task::<S>)
                .delete(handlers::delete_task::<S>),
        )
        // Local library catalog
        .route(
            "/catalog/authors",
            get(author_handlers::list_authors::<S>).post(author_handlers::create_author::<S>),
        )
        .route(
            "/catalog/authors/:id",
            get(author_handlers::get_author::<S>)
                .patch(author_handlers::update_author::<S>)
                .delete(author_handlers::delete_author::<S>),
        )
}

/// Route unmatched requests, panics and handler errors to the centralized responder.
///
/// The responder is the outermost layer so it also sees what the panic catcher produced.
pub fn with_error_handling<St>(router: Router<St>, mode: Mode) -> Router<St>
where
    St: Clone + Send + Sync + 'static,
{
    router
        .fallback(responder::route_not_found)
        .layer(CatchPanicLayer::custom(responder::panic_response))
        .layer(middleware::from_fn_with_state(mode, responder::respond))
}

/// The complete application, ready to be served
pub fn build_app<S: Store + 'static>(store: Arc<S>, mode: Mode) -> Router {
    with_error_handling(create_router::<S>(), mode).with_state(store)
}
