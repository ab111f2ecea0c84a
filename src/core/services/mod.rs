pub mod health;
pub mod verification;

pub use health::HealthService;
pub use verification::{VerificationPolicy, VerificationReason, VerificationResult, VerificationService};
