// Dataset Models
// Typed user and company records shared by every pipeline stage

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

/// A user record that passed validation
///
/// Users are never deserialized directly: the validator builds them from raw
/// JSON so each missing or mistyped field can be reported on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_id: i64,
    /// Whether the user was emailed
    pub email_status: bool,
    pub active_status: bool,
    /// Token balance, never negative once validated
    pub tokens: f64,
}

impl User {
    /// Emailed users are listed regardless of their activity
    pub fn is_emailed(&self) -> bool {
        self.email_status
    }

    /// Not-emailed users are only listed while active
    pub fn is_not_emailed(&self) -> bool {
        !self.email_status && self.active_status
    }

    /// Whether the company top-up is credited to this user
    pub fn is_eligible_for_top_up(&self) -> bool {
        self.active_status
    }
}

/// A company record as loaded from the companies file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "deserialize_integral")]
    pub id: i64,
    pub name: String,
    /// Amount credited per eligible user, may be negative in the input
    pub top_up: f64,
}

impl Company {
    pub fn new(id: i64, name: impl Into<String>, top_up: f64) -> Self {
        Self {
            id,
            name: name.into(),
            top_up,
        }
    }

    /// The amount actually credited: negative top-ups never lower a balance
    pub fn effective_top_up(&self) -> f64 {
        self.top_up.max(0.0)
    }
}

/// Integral JSON number as `i64`; `3.0` is accepted, `3.5` and values
/// outside the `i64` range are not
pub(crate) fn integral_number(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn deserialize_integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    integral_number(&number)
        .ok_or_else(|| D::Error::custom(format!("expected an integer, found {}", number)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email_status: bool, active_status: bool) -> User {
        User {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company_id: 10,
            email_status,
            active_status,
            tokens: 0.0,
        }
    }

    #[test]
    fn test_segment_predicates() {
        assert!(user(true, true).is_emailed());
        assert!(user(true, false).is_emailed());
        assert!(!user(true, true).is_not_emailed());
        assert!(user(false, true).is_not_emailed());

        let dormant = user(false, false);
        assert!(!dormant.is_emailed());
        assert!(!dormant.is_not_emailed());
    }

    #[test]
    fn test_effective_top_up_is_clamped() {
        assert_eq!(Company::new(1, "Acme", 7.0).effective_top_up(), 7.0);
        assert_eq!(Company::new(2, "Debt Co", -4.0).effective_top_up(), 0.0);
    }

    #[test]
    fn test_company_deserialize() {
        let company: Company =
            serde_json::from_str(r#"{"id": 3, "name": "Initech", "top_up": 12}"#).unwrap();
        assert_eq!(company, Company::new(3, "Initech", 12.0));
    }

    #[test]
    fn test_company_integral_float_id() {
        let company: Company =
            serde_json::from_str(r#"{"id": 10.0, "name": "Acme", "top_up": 3}"#).unwrap();
        assert_eq!(company.id, 10);
    }

    #[test]
    fn test_company_fractional_id_is_rejected() {
        let result: Result<Company, _> =
            serde_json::from_str(r#"{"id": 10.5, "name": "Acme", "top_up": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_integral_number_range() {
        let number = |f: f64| Number::from_f64(f).unwrap();
        assert_eq!(integral_number(&number(-4.0)), Some(-4));
        assert_eq!(integral_number(&number(i64::MIN as f64)), Some(i64::MIN));
        assert_eq!(integral_number(&number(9.223372036854775807e18)), None);
        assert_eq!(integral_number(&Number::from(u64::MAX)), None);
    }

    #[test]
    fn test_company_deserialize_ignores_extra_fields() {
        let company: Company = serde_json::from_str(
            r#"{"id": 4, "name": "Hooli", "top_up": 2.5, "email_status": true}"#,
        )
        .unwrap();
        assert_eq!(company.top_up, 2.5);
    }
}
