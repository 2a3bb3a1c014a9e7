pub mod boleto;
pub mod test_triggers;
pub mod webhooks;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router(test_routes_enabled: bool) -> Router<AppState> {
    let router = Router::new()
        .merge(boleto::router())
        .merge(webhooks::router());

    if test_routes_enabled {
        router.merge(test_triggers::router())
    } else {
        router
    }
}
