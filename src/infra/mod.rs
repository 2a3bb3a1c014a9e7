use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::{
    adapters::persistence::FirestorePersistence,
    infra::{
        config::AppConfig,
        error::InfraError,
        firestore::{
            FirestoreClient,
            auth::{ServiceAccount, TokenProvider},
        },
    },
};

pub mod app;
pub mod config;
pub mod error;
pub mod firestore;
pub mod http_client;
pub mod loopback;
pub mod setup;
pub mod stripe_client;
pub mod stripe_payment_adapter;
pub mod webhook_signer;

pub fn firestore_persistence(config: &AppConfig) -> Result<FirestorePersistence, InfraError> {
    let account = ServiceAccount::from_base64(config.firebase_credentials.expose_secret())?;
    let tokens = TokenProvider::new(account, http_client::build_client())?;
    let client = FirestoreClient::new(http_client::build_client(), tokens, &config.firestore_database);
    Ok(FirestorePersistence::new(Arc::new(client)))
}
