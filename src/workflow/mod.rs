pub mod error;
pub mod record;

pub use error::ProgressError;
pub use record::{EmployeeRecord, ProgressOutcome, ProgressSubmission};
