// Top-up Service Library
// Validates user and company datasets, applies company token top-ups and
// renders the per-company report

pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod reporter;
pub mod topup;
pub mod validator;

// Re-export commonly used types
pub use error::{LoadError, ServiceError, ServiceResult};
pub use loader::DatasetLoader;
pub use models::{Company, User};
pub use pipeline::{prepare, run, Report, RunConfig, RunOutcome, DEFAULT_OUTPUT_FILE};
pub use reporter::{format_amount, ReportRenderer};
pub use topup::{apply_top_ups, group_by_company, CompanyTopUp, TopUpEntry};
pub use validator::{
    RejectReason, Rejection, UserValidator, ValidationOutcome, ValidationWarning, REQUIRED_FIELDS,
};
