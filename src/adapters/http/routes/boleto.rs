use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::use_cases::boleto::BoletoRequest,
};

/// POST /gerar-boleto
async fn create_boleto(
    State(app_state): State<AppState>,
    payload: Result<Json<BoletoRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let created = app_state.boleto_use_cases.create_boleto(&request).await?;
    Ok(Json(created))
}

/// GET /verificar-boleto/{boleto_id}
async fn check_boleto(
    State(app_state): State<AppState>,
    Path(boleto_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let report = app_state.boleto_use_cases.check_status(&boleto_id).await?;
    Ok(Json(report))
}

/// POST /simular-pagamento/{boleto_id}
///
/// Local simulation only; nothing is sent to the processor or written.
async fn simulate_payment(
    State(app_state): State<AppState>,
    Path(boleto_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let simulated = app_state
        .boleto_use_cases
        .simulate_payment(&boleto_id)
        .await?;
    Ok(Json(simulated))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gerar-boleto", post(create_boleto))
        .route("/verificar-boleto/{boleto_id}", get(check_boleto))
        .route("/simular-pagamento/{boleto_id}", post(simulate_payment))
}
