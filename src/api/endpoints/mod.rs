//! API endpoint handlers. One module per resource.

pub mod analyze;
pub mod health;
pub mod history;
pub mod prescriptions;
