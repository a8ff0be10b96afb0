// User Validator
// Checks raw user records for required fields, types and company references

use crate::models::{integral_number, Company, User};

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Fields every user record must carry
pub const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "company_id",
    "email_status",
    "active_status",
    "tokens",
];

/// Why a user record was dropped
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// The array element is not a JSON object
    NotAnObject,
    /// A required field is absent
    MissingField(&'static str),
    /// A numeric or boolean field has the wrong type
    IncorrectTypes,
    /// Email is absent, not a string, or blank
    MissingEmail,
    /// `company_id` does not match any loaded company
    UnknownCompany(i64),
}

/// A dropped user record together with its diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position of the record in the users file
    pub index: usize,
    /// Rendered `id` of the record, if it had one
    pub user_id: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            RejectReason::NotAnObject => write!(
                f,
                "Invalid user data: Entry at index {} is not an object",
                self.index
            ),
            RejectReason::MissingField(field) => write!(
                f,
                "Invalid user data: Missing required field '{}' for user ID {}",
                field, self.user_id
            ),
            RejectReason::IncorrectTypes => write!(
                f,
                "Invalid user data: Incorrect data types for user ID {}",
                self.user_id
            ),
            RejectReason::MissingEmail => write!(
                f,
                "Invalid user data: Missing or empty email field for user ID {}",
                self.user_id
            ),
            RejectReason::UnknownCompany(company_id) => write!(
                f,
                "Invalid user data: User {} references a non-existent company (company_id: {})",
                self.user_id, company_id
            ),
        }
    }
}

/// Recoverable problem found during validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Balance was below zero and has been reset to zero
    NegativeTokens { user_id: String },
    DuplicateUserId { user_id: i64 },
    DuplicateCompanyId { company_id: i64 },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::NegativeTokens { user_id } => write!(
                f,
                "Warning: User {} has a negative token balance. Adjusting to 0.",
                user_id
            ),
            ValidationWarning::DuplicateUserId { user_id } => {
                write!(f, "Warning: User ID {} appears more than once", user_id)
            }
            ValidationWarning::DuplicateCompanyId { company_id } => {
                write!(f, "Warning: Company ID {} appears more than once", company_id)
            }
        }
    }
}

/// Result of validating a users dataset
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    /// Users that passed every check, in input order
    pub valid: Vec<User>,
    pub rejected: Vec<Rejection>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationOutcome {
    pub fn has_valid_users(&self) -> bool {
        !self.valid.is_empty()
    }
}

/// Validator for raw user records
pub struct UserValidator;

impl UserValidator {
    /// Validate every record against the loaded companies
    ///
    /// Each rejection and warning is logged as it is found.
    pub fn validate(records: Vec<Value>, companies: &[Company]) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();

        let mut company_ids = HashSet::new();
        for company in companies {
            if !company_ids.insert(company.id) {
                Self::warn(
                    &mut outcome.warnings,
                    ValidationWarning::DuplicateCompanyId {
                        company_id: company.id,
                    },
                );
            }
        }

        let mut seen_users = HashSet::new();
        for (index, record) in records.into_iter().enumerate() {
            match Self::validate_record(&record, &company_ids, &mut outcome.warnings) {
                Ok(user) => {
                    if !seen_users.insert(user.id) {
                        Self::warn(
                            &mut outcome.warnings,
                            ValidationWarning::DuplicateUserId { user_id: user.id },
                        );
                    }
                    outcome.valid.push(user);
                }
                Err(reason) => {
                    let rejection = Rejection {
                        index,
                        user_id: field_label(record.get("id")),
                        reason,
                    };
                    tracing::error!("{}", rejection);
                    outcome.rejected.push(rejection);
                }
            }
        }

        tracing::debug!(
            valid = outcome.valid.len(),
            rejected = outcome.rejected.len(),
            "validated users"
        );
        outcome
    }

    fn validate_record(
        record: &Value,
        company_ids: &HashSet<i64>,
        warnings: &mut Vec<ValidationWarning>,
    ) -> Result<User, RejectReason> {
        let fields = record.as_object().ok_or(RejectReason::NotAnObject)?;

        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|field| !fields.contains_key(**field))
        {
            return Err(RejectReason::MissingField(*missing));
        }

        let typed = (
            integer_field(fields, "id"),
            integer_field(fields, "company_id"),
            fields["email_status"].as_bool(),
            fields["active_status"].as_bool(),
            fields["tokens"].as_f64(),
        );
        let (id, company_id, email_status, active_status, mut tokens) = match typed {
            (Some(id), Some(company_id), Some(email), Some(active), Some(tokens)) => {
                (id, company_id, email, active, tokens)
            }
            _ => return Err(RejectReason::IncorrectTypes),
        };

        // Coerced before the remaining checks so the warning is emitted even
        // when the record is dropped later on.
        if tokens < 0.0 {
            Self::warn(
                warnings,
                ValidationWarning::NegativeTokens {
                    user_id: id.to_string(),
                },
            );
            tokens = 0.0;
        }

        let email = fields
            .get("email")
            .and_then(Value::as_str)
            .filter(|email| !email.trim().is_empty())
            .ok_or(RejectReason::MissingEmail)?;

        if !company_ids.contains(&company_id) {
            return Err(RejectReason::UnknownCompany(company_id));
        }

        Ok(User {
            id,
            first_name: field_label(fields.get("first_name")),
            last_name: field_label(fields.get("last_name")),
            email: email.to_string(),
            company_id,
            email_status,
            active_status,
            tokens,
        })
    }

    fn warn(warnings: &mut Vec<ValidationWarning>, warning: ValidationWarning) {
        tracing::warn!("{}", warning);
        warnings.push(warning);
    }
}

/// Integral numeric field; `3.0` is accepted, `3.5` is not
fn integer_field(fields: &Map<String, Value>, name: &str) -> Option<i64> {
    integral_number(fields.get(name)?.as_number()?)
}

/// Render a field for diagnostics and report lines: strings verbatim,
/// anything else as JSON text
fn field_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}
