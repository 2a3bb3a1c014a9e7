pub mod boleto;
pub mod clients;
pub mod custom_software;
pub mod monthly_invoices;
pub mod opencode;
