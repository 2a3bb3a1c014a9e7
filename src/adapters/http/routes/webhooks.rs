//! Payment-processor webhook receivers.
//!
//! Every receiver verifies the `Stripe-Signature` header against the raw
//! body before parsing it. Events of a type a receiver does not handle are
//! acknowledged with 200 and change nothing.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{error, info};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::use_cases::{
        monthly_invoices::InvoiceSettlement, opencode::PlanGrant,
    },
    domain::entities::payment_event::{EventKind, WebhookEvent},
    infra::stripe_client::StripeClient,
};

pub const GENERIC_WEBHOOK_PATH: &str = "/webhook";
pub const MONTHLY_WEBHOOK_PATH: &str = "/webhook-mensal";
pub const CUSTOM_SOFTWARE_WEBHOOK_PATH: &str = "/webhook/software-personalizado";
pub const OPENCODE_WEBHOOK_PATH: &str = "/webhook-opencode";

/// Verifies the signature and parses the event.
fn verified_event(app_state: &AppState, headers: &HeaderMap, body: &str) -> AppResult<WebhookEvent> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::InvalidSignature("Missing Stripe-Signature header".into()))?;

    StripeClient::verify_webhook_signature(
        body,
        signature,
        app_state.config.stripe_webhook_secret.expose_secret(),
        app_state.config.webhook_tolerance_secs,
    )?;

    serde_json::from_str(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid webhook payload: {}", e)))
}

fn success() -> Json<serde_json::Value> {
    Json(json!({ "status": "success" }))
}

/// POST /webhook
async fn generic_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let event = verified_event(&app_state, &headers, &body)?;

    if event.kind() == EventKind::CheckoutSessionCompleted {
        info!(
            event_id = event.event_id(),
            session_id = event.object_id().unwrap_or_default(),
            "Checkout session completed"
        );
    }

    Ok(success())
}

/// POST /webhook-mensal
async fn monthly_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let event = verified_event(&app_state, &headers, &body)?;

    let outcome = app_state
        .monthly_invoice_use_cases
        .handle_event(&event)
        .await?;

    let message = match outcome {
        InvoiceSettlement::Settled { .. } | InvoiceSettlement::AlreadyPaid { .. } => {
            "Pagamento processado com sucesso"
        }
        InvoiceSettlement::Ignored => "Evento ignorado",
    };
    Ok(Json(json!({ "mensagem": message })))
}

/// POST /webhook/software-personalizado
async fn custom_software_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let event = verified_event(&app_state, &headers, &body)?;

    app_state
        .custom_software_use_cases
        .handle_event(&event)
        .await?;

    Ok(success())
}

/// POST /webhook-opencode
///
/// Store failures are logged and acknowledged so the processor does not
/// redeliver the event.
async fn opencode_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let event = verified_event(&app_state, &headers, &body)?;

    match app_state.opencode_use_cases.handle_event(&event).await {
        Ok(PlanGrant::Granted { client_id, plan }) => {
            info!(
                client_id = %client_id,
                service_id = plan.service_id.as_deref().unwrap_or_default(),
                "Opencode purchase processed"
            );
        }
        Ok(_) => {}
        Err(AppError::Store(detail)) => {
            error!(
                error = %detail,
                event_id = event.event_id(),
                event_type = %event.event_type,
                "Opencode webhook could not update the store, acknowledging anyway"
            );
        }
        Err(e) => return Err(e),
    }

    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(GENERIC_WEBHOOK_PATH, post(generic_webhook))
        .route(MONTHLY_WEBHOOK_PATH, post(monthly_webhook))
        .route(CUSTOM_SOFTWARE_WEBHOOK_PATH, post(custom_software_webhook))
        .route(OPENCODE_WEBHOOK_PATH, post(opencode_webhook))
}
