use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::{app_error::AppResult, domain::entities::amount::Centavos};

// ============================================================================
// Port Types - Provider-agnostic domain types
// ============================================================================

/// Status the processor reports for a charge that collected the money.
pub const CHARGE_SUCCEEDED: &str = "succeeded";

/// Status of an intent still waiting for the payer (boleto not paid yet).
pub const INTENT_REQUIRES_ACTION: &str = "requires_action";

/// Billing address sent with a boleto. Boletos are Brazil-only.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingAddress {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Everything the processor needs to issue a boleto and confirm it right away.
#[derive(Debug, Clone, PartialEq)]
pub struct BoletoPaymentRequest {
    pub amount: Centavos,
    pub currency: String,
    /// CPF/CNPJ, digits only.
    pub tax_id: String,
    pub name: String,
    pub email: String,
    pub address: BillingAddress,
    pub description: String,
    pub metadata: HashMap<String, String>,
}

/// Voucher details a payer needs to pay a boleto.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoletoVoucher {
    /// Barcode number.
    pub number: Option<String>,
    /// Typeable line ("linha digitável").
    pub line: Option<String>,
    pub hosted_voucher_url: Option<String>,
    pub pdf: Option<String>,
    pub expires_at: Option<i64>,
}

/// A collection attempt against an intent.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeInfo {
    pub id: String,
    pub status: String,
    pub created: i64,
    /// Boleto details from the charge's payment-method details.
    pub boleto: Option<BoletoVoucher>,
}

impl ChargeInfo {
    pub fn is_succeeded(&self) -> bool {
        self.status == CHARGE_SUCCEEDED
    }
}

/// Read-only view of a processor payment intent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentInfo {
    pub id: String,
    pub status: String,
    pub amount: Centavos,
    pub currency: String,
    pub receipt_email: Option<String>,
    /// Unix timestamp.
    pub created: i64,
    pub payment_method: Option<String>,
    /// Voucher shown right after confirmation (`next_action`).
    pub boleto_display: Option<BoletoVoucher>,
    /// Associated charges, most relevant first. Empty when nothing was
    /// collected yet.
    pub charges: Vec<ChargeInfo>,
}

impl PaymentIntentInfo {
    pub fn first_charge(&self) -> Option<&ChargeInfo> {
        self.charges.first()
    }

    /// Paid strictly when the first charge succeeded; the intent's own
    /// status is not consulted.
    pub fn is_paid(&self) -> bool {
        self.first_charge().map(ChargeInfo::is_succeeded).unwrap_or(false)
    }

    pub fn requires_action(&self) -> bool {
        self.status == INTENT_REQUIRES_ACTION
    }
}

// ============================================================================
// Payment Processor Port
// ============================================================================

/// Payment processor port - the operations this service needs from the
/// processor, expressed in domain terms.
#[async_trait]
pub trait PaymentProcessorPort: Send + Sync {
    /// Creates and confirms a boleto-only payment intent.
    async fn create_boleto_intent(
        &self,
        request: &BoletoPaymentRequest,
    ) -> AppResult<PaymentIntentInfo>;

    /// Retrieves an intent; with `expand_charges` the latest charge is
    /// included so the caller can tell whether it was paid.
    async fn retrieve_intent(
        &self,
        intent_id: &str,
        expand_charges: bool,
    ) -> AppResult<PaymentIntentInfo>;
}
