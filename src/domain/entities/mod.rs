pub mod amount;
pub mod catalog_project;
pub mod client;
pub mod custom_project;
pub mod payment_event;
