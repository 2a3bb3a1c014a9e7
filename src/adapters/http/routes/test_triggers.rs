//! Manual test endpoints that deliver signed synthetic events to this
//! service's own webhook receivers and relay what they answered.
//!
//! Mounted only when test routes are enabled in the configuration.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{Local, TimeZone};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::{
    adapters::http::{
        app_state::AppState,
        routes::webhooks::{
            CUSTOM_SOFTWARE_WEBHOOK_PATH, GENERIC_WEBHOOK_PATH, MONTHLY_WEBHOOK_PATH,
            OPENCODE_WEBHOOK_PATH,
        },
    },
    app_error::AppResult,
    application::{
        helpers::timestamps::iso_local,
        use_cases::opencode::{OPENCODE_PAYMENT_KIND, OPENCODE_PLAN_TITLE},
    },
    domain::entities::custom_project::{CustomProject, ProjectPaymentStatus},
    infra::loopback::LoopbackResponse,
};

const DEFAULT_CLIENT_ID: &str = "MaiNCXusd8iuPpczSTKj";
const DEFAULT_INVOICE_ID: &str = "proporcional-fat-47ca67cc";
const DEFAULT_PROJECT_NAME: &str = "Carlinhos maia";
const DEFAULT_CATALOG_PROJECT_ID: &str = "m124yZcOF7evXvZwxpKD";
const MEETING_TIMESTAMP: i64 = 1747312200;

/// Query parameters overriding the fixture ids.
#[derive(Debug, Default, Deserialize)]
struct FixtureOverrides {
    cliente_id: Option<String>,
    fatura_id: Option<String>,
    projeto_id: Option<String>,
    projeto_nome: Option<String>,
}

impl FixtureOverrides {
    fn client_id(&self) -> &str {
        self.cliente_id.as_deref().unwrap_or(DEFAULT_CLIENT_ID)
    }

    fn invoice_id(&self) -> &str {
        self.fatura_id.as_deref().unwrap_or(DEFAULT_INVOICE_ID)
    }

    fn catalog_project_id(&self) -> &str {
        self.projeto_id.as_deref().unwrap_or(DEFAULT_CATALOG_PROJECT_ID)
    }

    fn project_name(&self) -> &str {
        self.projeto_nome.as_deref().unwrap_or(DEFAULT_PROJECT_NAME)
    }
}

async fn deliver(app_state: &AppState, path: &str, event: &Value) -> AppResult<LoopbackResponse> {
    let response = app_state
        .webhook_loopback
        .deliver(
            path,
            event,
            app_state.config.stripe_webhook_secret.expose_secret(),
        )
        .await?;
    info!(path, status = response.status, "Test webhook delivered");
    Ok(response)
}

fn synthetic_object_id(prefix: &str) -> String {
    format!("pi_{}_{}", prefix, Local::now().timestamp())
}

fn cliente_mock() -> Value {
    json!({
        "nome": "favio",
        "email": "favio@gmail.com",
        "telefone": "5594823462",
        "cpfCnpj": "18667894060"
    })
}

/// Seed document for the custom-software trigger.
fn project_seed(client_id: &str, project_name: &str) -> CustomProject {
    let now = Local::now();
    let meeting = Local
        .timestamp_opt(MEETING_TIMESTAMP, 0)
        .single()
        .map(iso_local)
        .unwrap_or_default();

    let mut extra = Map::new();
    for (key, value) in [
        ("clienteCpfCnpj", json!("18667894060")),
        ("clienteEmail", json!("favio@gmail.com")),
        ("clienteNome", json!("favio")),
        ("clienteTelefone", json!("5594823462")),
        ("createdAt", json!(iso_local(now))),
        ("dataReuniao", json!(meeting)),
        ("horaReuniao", json!("09:30")),
        ("numeroNota", json!("INV-9151-2025")),
        ("status", json!("Em Produção")),
        ("valor", json!(2222)),
    ] {
        extra.insert(key.to_string(), value);
    }

    CustomProject {
        id: String::new(),
        client_id: client_id.to_string(),
        project_name: project_name.to_string(),
        payment_status: Some(ProjectPaymentStatus::Pending.to_string()),
        extra,
    }
}

/// GET /testar-webhook
async fn trigger_generic(
    State(app_state): State<AppState>,
    Query(overrides): Query<FixtureOverrides>,
) -> AppResult<impl IntoResponse> {
    let event = json!({
        "id": format!("evt_test_{}", Local::now().timestamp()),
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": format!("cs_test_{}", Local::now().timestamp()),
                "metadata": { "cliente_id": overrides.client_id() }
            }
        }
    });

    let response = deliver(&app_state, GENERIC_WEBHOOK_PATH, &event).await?;
    Ok(Json(json!({
        "status": response.status,
        "resposta": response.body
    })))
}

/// GET /testar-webhook-mensal
async fn trigger_monthly(
    State(app_state): State<AppState>,
    Query(overrides): Query<FixtureOverrides>,
) -> AppResult<impl IntoResponse> {
    let event = json!({
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": synthetic_object_id("mensal"),
                "metadata": {
                    "tipo_pagamento": "boleto",
                    "fatura_id": overrides.invoice_id(),
                    "cliente_id": overrides.client_id(),
                    "cliente_nome": "favio",
                    "cliente_email": "favio@gmail.com",
                    "cliente_cpf": "18667894060",
                    "servico_id": "1aIqO9jNYNeMPrZxJiwE",
                    "servico_nome": "imagem",
                    "periodo_inicio": "23/05/2025",
                    "periodo_fim": "10/06/2025",
                    "valor_original": 100,
                    "valor_proporcional": 73.2,
                    "data_vencimento": "10/06/2025"
                }
            }
        }
    });

    let response = deliver(&app_state, MONTHLY_WEBHOOK_PATH, &event).await?;
    Ok(Json(json!({
        "status": response.status,
        "resposta": response.body
    })))
}

/// GET /testar-webhook-software
///
/// Seeds the project when missing, then reports whether the delivery moved
/// it to paid.
async fn trigger_custom_software(
    State(app_state): State<AppState>,
    Query(overrides): Query<FixtureOverrides>,
) -> AppResult<impl IntoResponse> {
    let client_id = overrides.client_id();
    let project_name = overrides.project_name();
    let use_cases = &app_state.custom_software_use_cases;

    let seed = project_seed(client_id, project_name);
    let project_data = serde_json::to_value(&seed).unwrap_or_default();
    use_cases
        .ensure_project(client_id, project_name, seed)
        .await?;

    let event = json!({
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": synthetic_object_id("software"),
                "metadata": {
                    "projectId": client_id,
                    "projectName": project_name,
                    "cliente_cpf_cnpj": "18667894060",
                    "cliente_email": "favio@gmail.com",
                    "valor": 2222
                },
                "status": "succeeded",
                "amount": 222200,
                "currency": "brl"
            }
        }
    });
    let response = deliver(&app_state, CUSTOM_SOFTWARE_WEBHOOK_PATH, &event).await?;

    let paid = ProjectPaymentStatus::Paid.to_string();
    let status_atualizado = use_cases
        .payment_statuses(client_id, project_name)
        .await?
        .last()
        .is_some_and(|status| status.as_deref() == Some(paid.as_str()));

    Ok(Json(json!({
        "status": "success",
        "message": "Testes do webhook Software Personalizado concluídos",
        "resultados": [{
            "cenario": "Pagamento bem-sucedido",
            "status": response.status,
            "resposta": response.body
        }],
        "dados_mock": {
            "projeto_id": project_name,
            "cliente_id": client_id,
            "projeto_data": project_data,
            "cliente_data": cliente_mock(),
            "status_atualizado": status_atualizado
        }
    })))
}

/// GET /testar-webhook-opencode
async fn trigger_opencode(
    State(app_state): State<AppState>,
    Query(overrides): Query<FixtureOverrides>,
) -> AppResult<impl IntoResponse> {
    let valor_plano = "22";
    let endereco = json!({
        "rua": "Rua Exemplo",
        "numero": "123",
        "complemento": "Apto 45",
        "cidade": "São Paulo",
        "estado": "SP",
        "cep": "12345678"
    });

    let payload = json!({
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": synthetic_object_id("opencode"),
                "metadata": {
                    "tipo_pagamento": OPENCODE_PAYMENT_KIND,
                    "projeto_id": overrides.catalog_project_id(),
                    "projeto_titulo": "carros",
                    "plano_titulo": OPENCODE_PLAN_TITLE,
                    "cliente_id": overrides.client_id(),
                    "cliente_nome": "favio",
                    "cliente_email": "favio@gmail.com",
                    "cliente_cpf": "186.678.940-60",
                    "cliente_telefone": "5594823462",
                    "cliente_endereco": endereco.to_string(),
                    "data_compra": iso_local(Local::now()),
                    "valor_plano": valor_plano,
                    "status_pagamento": "succeeded"
                },
                "status": "succeeded",
                "amount": 2200,
                "currency": "brl"
            }
        }
    });

    let response = deliver(&app_state, OPENCODE_WEBHOOK_PATH, &payload).await?;
    Ok(Json(json!({
        "status": "success",
        "webhook_response": {
            "status_code": response.status,
            "response": response.body
        },
        "payload_enviado": payload
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/testar-webhook", get(trigger_generic))
        .route("/testar-webhook-mensal", get(trigger_monthly))
        .route("/testar-webhook-software", get(trigger_custom_software))
        .route("/testar-webhook-opencode", get(trigger_opencode))
}
