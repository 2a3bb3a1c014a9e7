use std::{collections::HashMap, sync::Arc};

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        helpers::timestamps::{due_date, iso_local, unix_to_local},
        ports::payment_processor::{
            BillingAddress, BoletoPaymentRequest, BoletoVoucher, CHARGE_SUCCEEDED,
            INTENT_REQUIRES_ACTION, PaymentIntentInfo, PaymentProcessorPort,
        },
        validators::{is_blank, is_valid_email, strip_document_punctuation},
    },
    domain::entities::{
        amount::{Centavos, ReaisInput},
        payment_event::{WebhookEvent, WebhookEventData},
    },
};

pub const DEFAULT_DESCRIPTION: &str = "Pagamento via Boleto";
pub const BOLETO_CURRENCY: &str = "brl";
pub const BOLETO_COUNTRY: &str = "BR";

const PAYMENT_INSTRUCTIONS: [&str; 4] = [
    "1. Copie o código de barras ou linha digitável",
    "2. Pague em qualquer banco ou lotérica",
    "3. Ou acesse o PDF do boleto para imprimir",
    "4. O pagamento será confirmado automaticamente",
];

// ============================================================================
// Request types
// ============================================================================

/// Accepts text or a bare number (`"numero": 123`) and keeps the text form.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text or number, found {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInput {
    #[serde(default, deserialize_with = "scalar_text")]
    pub rua: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub complemento: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub cidade: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub estado: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub cep: Option<String>,
}

impl AddressInput {
    /// Fills unset fields with the placeholders the processor accepts.
    fn to_billing_address(&self) -> BillingAddress {
        let rua = self.rua.as_deref().unwrap_or("Rua não informada");
        let numero = self.numero.as_deref().unwrap_or("S/N");
        BillingAddress {
            line1: format!("{}, {}", rua, numero),
            line2: self.complemento.clone().unwrap_or_default(),
            city: self
                .cidade
                .clone()
                .unwrap_or_else(|| "Cidade não informada".to_string()),
            state: self
                .estado
                .clone()
                .unwrap_or_else(|| "Estado não informado".to_string()),
            postal_code: strip_document_punctuation(self.cep.as_deref().unwrap_or("00000000")),
            country: BOLETO_COUNTRY.to_string(),
        }
    }
}

/// Body of `POST /gerar-boleto`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoletoRequest {
    pub valor: Option<ReaisInput>,
    pub email: Option<String>,
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub cpf: Option<String>,
    pub descricao: Option<String>,
    pub endereco: Option<AddressInput>,
    /// Forwarded to the processor so webhooks can route the payment.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl BoletoRequest {
    /// Checks required fields one at a time, in a fixed order; the first
    /// missing field is reported.
    pub fn validate(&self) -> AppResult<BoletoPaymentRequest> {
        let valor = match &self.valor {
            Some(v) if !v.is_empty() => v,
            _ => return Err(AppError::missing("Valor é obrigatório")),
        };
        if is_blank(self.email.as_deref()) {
            return Err(AppError::missing("Email é obrigatório"));
        }
        if is_blank(self.nome.as_deref()) {
            return Err(AppError::missing("Nome é obrigatório"));
        }
        if is_blank(self.cpf.as_deref()) {
            return Err(AppError::missing("CPF é obrigatório"));
        }

        let amount = valor
            .to_reais()
            .and_then(Centavos::from_reais)
            .filter(Centavos::is_positive)
            .ok_or_else(|| AppError::missing("Valor inválido"))?;

        let email = self.email.as_deref().unwrap_or_default().trim().to_string();
        if !is_valid_email(&email) {
            return Err(AppError::missing("Email inválido"));
        }

        Ok(BoletoPaymentRequest {
            amount,
            currency: BOLETO_CURRENCY.to_string(),
            tax_id: strip_document_punctuation(self.cpf.as_deref().unwrap_or_default()),
            name: self.nome.clone().unwrap_or_default(),
            email,
            address: self.endereco.clone().unwrap_or_default().to_billing_address(),
            description: self
                .descricao
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            metadata: self.metadata.clone(),
        })
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BoletoCreated {
    pub boleto_id: String,
    pub codigo_barras: Option<String>,
    pub linha_digitavel: Option<String>,
    pub pdf_url: Option<String>,
    /// Echo of the amount as the caller sent it.
    pub valor: Option<ReaisInput>,
    pub data_vencimento: String,
    pub status: String,
    pub public_key: String,
    pub instrucoes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoucherDetails {
    pub codigo_barras: Option<String>,
    pub linha_digitavel: Option<String>,
    pub pdf_url: Option<String>,
}

impl From<&BoletoVoucher> for VoucherDetails {
    fn from(v: &BoletoVoucher) -> Self {
        Self {
            codigo_barras: v.number.clone(),
            linha_digitavel: v.line.clone(),
            pdf_url: v.hosted_voucher_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDebugInfo {
    pub payment_intent_status: String,
    pub has_charges: bool,
    pub charge_status: Option<String>,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoletoStatusReport {
    pub status: String,
    pub valor: f64,
    pub email: Option<String>,
    pub data_criacao: Option<String>,
    pub data_aprovacao: Option<String>,
    pub public_key: String,
    pub boleto: Option<VoucherDetails>,
    pub debug_info: PaymentDebugInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulatedPayment {
    pub status: String,
    pub payment_intent_id: String,
    pub data_aprovacao: String,
    pub debug_info: PaymentDebugInfo,
}

// ============================================================================
// Use cases
// ============================================================================

#[derive(Clone)]
pub struct BoletoUseCases {
    processor: Arc<dyn PaymentProcessorPort>,
    public_key: String,
    due_days: i64,
}

impl BoletoUseCases {
    pub fn new(processor: Arc<dyn PaymentProcessorPort>, public_key: String, due_days: i64) -> Self {
        Self {
            processor,
            public_key,
            due_days,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_boleto(&self, request: &BoletoRequest) -> AppResult<BoletoCreated> {
        let payment = request.validate()?;

        let intent = self.processor.create_boleto_intent(&payment).await?;
        info!(
            payment_intent_id = %intent.id,
            amount = %payment.amount,
            status = %intent.status,
            "Boleto payment intent created"
        );

        let display = intent.boleto_display.clone().unwrap_or_default();
        Ok(BoletoCreated {
            boleto_id: intent.id,
            codigo_barras: display.number,
            linha_digitavel: display.line,
            pdf_url: display.hosted_voucher_url,
            valor: request.valor.clone(),
            data_vencimento: due_date(Local::now(), self.due_days),
            status: intent.status,
            public_key: self.public_key.clone(),
            instrucoes: PAYMENT_INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn check_status(&self, boleto_id: &str) -> AppResult<BoletoStatusReport> {
        let intent = self.processor.retrieve_intent(boleto_id, true).await?;
        let charge = intent.first_charge();
        let is_paid = intent.is_paid();

        info!(
            payment_intent_id = %intent.id,
            intent_status = %intent.status,
            charges = intent.charges.len(),
            is_paid,
            "Boleto status checked"
        );

        Ok(BoletoStatusReport {
            status: if is_paid {
                CHARGE_SUCCEEDED.to_string()
            } else {
                INTENT_REQUIRES_ACTION.to_string()
            },
            valor: intent.amount.as_reais(),
            email: intent.receipt_email.clone(),
            data_criacao: unix_to_local(intent.created),
            data_aprovacao: charge
                .filter(|_| is_paid)
                .and_then(|c| unix_to_local(c.created)),
            public_key: self.public_key.clone(),
            boleto: charge
                .and_then(|c| c.boleto.as_ref())
                .map(VoucherDetails::from),
            debug_info: PaymentDebugInfo {
                payment_intent_status: intent.status.clone(),
                has_charges: !intent.charges.is_empty(),
                charge_status: charge.map(|c| c.status.clone()),
                is_paid,
            },
        })
    }

    /// Builds a local `payment_intent.succeeded` event for an intent still
    /// waiting for the payer and reads the resulting state from it. Nothing
    /// is written anywhere.
    #[instrument(skip(self))]
    pub async fn simulate_payment(&self, boleto_id: &str) -> AppResult<SimulatedPayment> {
        let intent = self.processor.retrieve_intent(boleto_id, false).await?;

        let mut status = intent.status.clone();
        if intent.requires_action() {
            let event = simulated_success_event(&intent, Local::now().timestamp());
            status = event.data.object["status"]
                .as_str()
                .unwrap_or(CHARGE_SUCCEEDED)
                .to_string();
            info!(
                payment_intent_id = %intent.id,
                event_id = event.event_id(),
                new_status = %status,
                "Simulated payment event built"
            );
        }

        Ok(SimulatedPayment {
            status: CHARGE_SUCCEEDED.to_string(),
            payment_intent_id: intent.id,
            data_aprovacao: iso_local(Local::now()),
            debug_info: PaymentDebugInfo {
                payment_intent_status: status,
                has_charges: true,
                charge_status: Some(CHARGE_SUCCEEDED.to_string()),
                is_paid: true,
            },
        })
    }
}

/// Event shaped like the processor's `payment_intent.succeeded`, carrying a
/// single succeeded charge.
pub fn simulated_success_event(intent: &PaymentIntentInfo, now: i64) -> WebhookEvent {
    let raw = json!({
        "id": format!("evt_simulado_{}", now),
        "object": "event",
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": intent.id,
                "object": "payment_intent",
                "status": CHARGE_SUCCEEDED,
                "amount": intent.amount.get(),
                "currency": intent.currency,
                "payment_method": intent.payment_method,
                "charges": {
                    "data": [{
                        "id": format!("ch_simulado_{}", now),
                        "object": "charge",
                        "status": CHARGE_SUCCEEDED,
                        "amount": intent.amount.get(),
                        "currency": intent.currency,
                        "payment_intent": intent.id,
                    }]
                }
            }
        }
    });

    WebhookEvent {
        id: raw["id"].as_str().map(str::to_string),
        event_type: "payment_intent.succeeded".to_string(),
        data: WebhookEventData {
            object: raw["data"]["object"].clone(),
        },
        metadata: None,
    }
}
