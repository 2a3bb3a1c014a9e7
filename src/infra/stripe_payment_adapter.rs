use async_trait::async_trait;
use secrecy::SecretString;

use crate::{
    app_error::AppResult,
    application::ports::payment_processor::{
        BoletoPaymentRequest, BoletoVoucher, ChargeInfo, PaymentIntentInfo, PaymentProcessorPort,
    },
    domain::entities::amount::Centavos,
    infra::stripe_client::{
        BoletoIntentParams, StripeBoletoDetails, StripeCharge, StripeClient, StripePaymentIntent,
    },
};

/// Adapter that wraps StripeClient to implement PaymentProcessorPort.
#[derive(Clone)]
pub struct StripePaymentAdapter {
    client: StripeClient,
}

impl StripePaymentAdapter {
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            client: StripeClient::new(secret_key),
        }
    }

    fn map_voucher(details: &StripeBoletoDetails) -> BoletoVoucher {
        BoletoVoucher {
            number: details.number.clone(),
            line: details.line.clone(),
            hosted_voucher_url: details.hosted_voucher_url.clone(),
            pdf: details.pdf.clone(),
            expires_at: details.expires_at,
        }
    }

    fn map_charge(charge: &StripeCharge) -> ChargeInfo {
        ChargeInfo {
            id: charge.id.clone(),
            status: charge.status.clone(),
            created: charge.created,
            boleto: charge
                .payment_method_details
                .as_ref()
                .and_then(|d| d.boleto.as_ref())
                .map(Self::map_voucher),
        }
    }

    fn map_intent(intent: &StripePaymentIntent) -> PaymentIntentInfo {
        PaymentIntentInfo {
            id: intent.id.clone(),
            status: intent.status.clone(),
            amount: Centavos(intent.amount),
            currency: intent.currency.clone(),
            receipt_email: intent.receipt_email.clone(),
            created: intent.created,
            payment_method: intent.payment_method_id(),
            boleto_display: intent
                .next_action
                .as_ref()
                .and_then(|a| a.boleto_display_details.as_ref())
                .map(Self::map_voucher),
            charges: intent.charges().iter().map(Self::map_charge).collect(),
        }
    }
}

#[async_trait]
impl PaymentProcessorPort for StripePaymentAdapter {
    async fn create_boleto_intent(
        &self,
        request: &BoletoPaymentRequest,
    ) -> AppResult<PaymentIntentInfo> {
        let params = BoletoIntentParams {
            amount: request.amount.get(),
            currency: &request.currency,
            tax_id: &request.tax_id,
            name: &request.name,
            email: &request.email,
            line1: &request.address.line1,
            line2: &request.address.line2,
            city: &request.address.city,
            state: &request.address.state,
            postal_code: &request.address.postal_code,
            country: &request.address.country,
            description: &request.description,
            metadata: &request.metadata,
        };

        let intent = self.client.create_payment_intent(&params).await?;
        Ok(Self::map_intent(&intent))
    }

    async fn retrieve_intent(
        &self,
        intent_id: &str,
        expand_charges: bool,
    ) -> AppResult<PaymentIntentInfo> {
        let intent = self
            .client
            .retrieve_payment_intent(intent_id, expand_charges)
            .await?;
        Ok(Self::map_intent(&intent))
    }
}
