//! Main [axum::Router] interface for webserver.

use crate::{
    app_state::AppState,
    routes::{authenticate, fallback, health, ping, send_mail, verify},
    setups::ServerSetup,
};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Setup main router for application.
pub fn setup_app_router<S: ServerSetup>(app_state: AppState<S>) -> Router {
    // Browsers may call from any origin; preflights are answered for every route.
    let cors = CorsLayer::new()
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    let router = Router::new()
        .route("/", get(fallback::greeting))
        .route("/authenticate", get(authenticate::lookup::<S>))
        // A browser reload on these paths gets the app shell.
        .route(
            "/verify",
            post(verify::verify::<S>).get(fallback::spa_shell::<S>),
        )
        .route(
            "/sendMail",
            post(send_mail::send_mail::<S>).get(fallback::spa_shell::<S>),
        )
        .fallback(fallback::spa_shell::<S>)
        .layer(cors)
        .with_state(app_state);

    let healthcheck_router = Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .route("/ping", get(ping::get));

    Router::merge(router, healthcheck_router)
}
