use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{
    admin, funds, health, instruments, investments, investors, market, portfolios, transactions,
    watchlists,
};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/instruments", instruments::router())
        .nest("/api/portfolios", portfolios::router())
        .nest("/api/transactions", transactions::router())
        .nest("/api/funds", funds::router())
        .nest("/api/investors", investors::router())
        .nest("/api/investments", investments::router())
        .nest("/api/watchlists", watchlists::router())
        .nest("/api/market", market::router())
        .nest("/api/admin", admin::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
