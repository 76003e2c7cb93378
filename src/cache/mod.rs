pub mod error;
pub mod freshness;
pub mod invalidator;

pub use error::InvalidatorError;
pub use freshness::{Freshness, StalenessPolicy};
pub use invalidator::{MaintenanceAction, MaintenanceReport, StalenessInvalidator};
