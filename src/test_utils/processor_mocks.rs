//! Payment processor stand-in that keeps intents in memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_processor::{
        BoletoPaymentRequest, PaymentIntentInfo, PaymentProcessorPort,
    },
    test_utils::create_test_intent,
};

#[derive(Default)]
pub struct StubPaymentProcessor {
    pub intents: Mutex<HashMap<String, PaymentIntentInfo>>,
    created: Mutex<Vec<BoletoPaymentRequest>>,
    failure: Option<String>,
}

impl StubPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intent(self, intent: PaymentIntentInfo) -> Self {
        self.intents
            .lock()
            .unwrap()
            .insert(intent.id.clone(), intent);
        self
    }

    /// Boleto creation fails with `message`, as the processor would report it.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn created_requests(&self) -> Vec<BoletoPaymentRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProcessorPort for StubPaymentProcessor {
    async fn create_boleto_intent(
        &self,
        request: &BoletoPaymentRequest,
    ) -> AppResult<PaymentIntentInfo> {
        if let Some(message) = &self.failure {
            return Err(AppError::Processor(message.clone()));
        }

        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        let intent = create_test_intent(&format!("pi_test_{}", created.len()), |i| {
            i.amount = request.amount;
            i.currency = request.currency.clone();
            i.receipt_email = Some(request.email.clone());
        });
        self.intents
            .lock()
            .unwrap()
            .insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn retrieve_intent(
        &self,
        intent_id: &str,
        _expand_charges: bool,
    ) -> AppResult<PaymentIntentInfo> {
        self.intents
            .lock()
            .unwrap()
            .get(intent_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Processor(format!("No such payment_intent: '{}'", intent_id))
            })
    }
}
