//! Input validation service.
//!
//! Field rules are declared on the payload types with `validator` derives;
//! [`InputValidator`] runs them and translates failures into the
//! field → message map that travels inside [`Error::validation`]. It also owns
//! the identifier rule used by every path that takes an `{id}` segment.

use validator::{Validate, ValidationError, ValidationErrors};

use super::employee::EmployeeId;
use super::error::{Error, FieldErrors};

/// Code attached to blank-string failures.
pub const NOT_BLANK: &str = "notblank";

/// Longest name or position the `employee` table stores, in characters.
pub const MAX_TEXT_LEN: u64 = 255;

/// Largest identifier accepted by [`InputValidator::check_id`].
pub const MAX_ID: i64 = 4_294_967_295;

/// Message returned to clients for any malformed identifier.
pub const INVALID_ID_MESSAGE: &str = "ID is not in its proper form";

/// Field rule rejecting strings that are empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(NOT_BLANK));
    }
    Ok(())
}

/// Reasons an identifier fails the positive-integer rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdRuleViolation {
    /// Not a base-10 integer at all.
    #[error("{0} is not a valid number")]
    NotANumber(String),
    /// Exactly zero.
    #[error("value cannot be zero")]
    Zero,
    /// Below zero.
    #[error("value cannot be negative")]
    Negative,
    /// Above [`MAX_ID`].
    #[error("value cannot be greater than {MAX_ID}")]
    TooLarge,
}

/// Immutable validation service shared by the domain services.
///
/// Construct once at start-up and hand clones to whoever needs it.
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    _private: (),
}

impl InputValidator {
    /// Create the validator.
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Run the declared field rules on `value`.
    ///
    /// # Errors
    /// Returns [`Error::validation`] with one message per failing field.
    pub fn validate<T: Validate>(&self, value: &T) -> Result<(), Error> {
        value
            .validate()
            .map_err(|errors| Error::validation(translate(&errors)))
    }

    /// Check that `raw` is a positive integer no larger than [`MAX_ID`].
    ///
    /// # Errors
    /// Returns the specific rule that failed.
    ///
    /// # Examples
    /// ```
    /// use employee_service::domain::{EmployeeId, InputValidator, IdRuleViolation};
    ///
    /// let validator = InputValidator::new();
    /// assert_eq!(validator.check_positive_int("12"), Ok(EmployeeId::new(12)));
    /// assert_eq!(validator.check_positive_int("0"), Err(IdRuleViolation::Zero));
    /// ```
    pub fn check_positive_int(&self, raw: &str) -> Result<EmployeeId, IdRuleViolation> {
        let value: i128 = raw
            .parse()
            .map_err(|_| IdRuleViolation::NotANumber(raw.to_owned()))?;
        match value {
            0 => Err(IdRuleViolation::Zero),
            v if v < 0 => Err(IdRuleViolation::Negative),
            v => i64::try_from(v)
                .ok()
                .filter(|id| *id <= MAX_ID)
                .map(EmployeeId::new)
                .ok_or(IdRuleViolation::TooLarge),
        }
    }

    /// Identifier check surfaced to callers as [`Error::invalid_id`].
    ///
    /// # Errors
    /// Returns an invalid-id error whose diagnostic names the broken rule.
    pub fn check_id(&self, raw: &str) -> Result<EmployeeId, Error> {
        self.check_positive_int(raw).map_err(|violation| {
            Error::invalid_id(INVALID_ID_MESSAGE).with_diagnostic(violation.to_string())
        })
    }
}

fn translate(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            let field = field.to_string();
            let first = failures.first()?;
            Some((field.clone(), describe(&field, first)))
        })
        .collect()
}

fn describe(field: &str, failure: &ValidationError) -> String {
    if let Some(message) = &failure.message {
        return message.to_string();
    }
    match failure.code.as_ref() {
        NOT_BLANK => format!("{field} cannot be blank"),
        "length" => format!("{field} cannot be longer than {MAX_TEXT_LEN} characters"),
        code => format!("{field} failed {code} validation"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, NewEmployee, UpdateEmployee};
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_name_yields_single_field_error(#[case] name: &str) {
        let payload = NewEmployee {
            name: name.to_owned(),
            position: "Engineer".to_owned(),
        };

        let err = InputValidator::new()
            .validate(&payload)
            .expect_err("blank name must fail");

        assert_eq!(err.code(), ErrorCode::Validation);
        let fields = err.fields().expect("fields");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("name").map(String::as_str), Some("name cannot be blank"));
    }

    #[rstest]
    #[case(256, 0, "name")]
    #[case(1, 256, "position")]
    fn overlong_text_is_a_field_error(
        #[case] name_len: usize,
        #[case] position_len: usize,
        #[case] field: &str,
    ) {
        let payload = NewEmployee {
            name: "x".repeat(name_len),
            position: "y".repeat(position_len),
        };

        let err = InputValidator::new()
            .validate(&payload)
            .expect_err("text above the column width must fail");

        assert_eq!(err.code(), ErrorCode::Validation);
        let fields = err.fields().expect("fields");
        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields.get(field).map(String::as_str),
            Some(format!("{field} cannot be longer than 255 characters").as_str())
        );
    }

    #[rstest]
    fn text_at_the_column_width_passes() {
        let payload = NewEmployee {
            name: "x".repeat(255),
            position: "y".repeat(255),
        };
        assert!(InputValidator::new().validate(&payload).is_ok());

        let patch = UpdateEmployee {
            position: Some("z".repeat(256)),
        };
        let err = InputValidator::new().validate(&patch).expect_err("overlong patch");
        assert!(err.fields().is_some_and(|fields| fields.contains_key("position")));
    }

    #[rstest]
    fn valid_payload_passes() {
        let payload = NewEmployee {
            name: "Ada".to_owned(),
            position: String::new(),
        };
        assert!(InputValidator::new().validate(&payload).is_ok());
        assert!(InputValidator::new().validate(&UpdateEmployee::default()).is_ok());
    }

    #[rstest]
    #[case("1", 1)]
    #[case("4294967295", MAX_ID)]
    fn accepts_positive_ids(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(
            InputValidator::new().check_positive_int(raw),
            Ok(EmployeeId::new(expected))
        );
    }

    #[rstest]
    #[case("0", IdRuleViolation::Zero)]
    #[case("-1", IdRuleViolation::Negative)]
    #[case("4294967296", IdRuleViolation::TooLarge)]
    #[case("99999999999999999999999", IdRuleViolation::TooLarge)]
    #[case("abc", IdRuleViolation::NotANumber("abc".to_owned()))]
    #[case("", IdRuleViolation::NotANumber(String::new()))]
    #[case("1.5", IdRuleViolation::NotANumber("1.5".to_owned()))]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: IdRuleViolation) {
        assert_eq!(InputValidator::new().check_positive_int(raw), Err(expected));
    }

    #[rstest]
    fn violation_messages_match_contract() {
        assert_eq!(
            IdRuleViolation::NotANumber("abc".to_owned()).to_string(),
            "abc is not a valid number"
        );
        assert_eq!(
            IdRuleViolation::TooLarge.to_string(),
            "value cannot be greater than 4294967295"
        );
    }

    #[rstest]
    fn check_id_surfaces_invalid_id() {
        let err = InputValidator::new().check_id("-3").expect_err("negative");
        assert_eq!(err.code(), ErrorCode::InvalidId);
        assert_eq!(err.message(), INVALID_ID_MESSAGE);
        assert_eq!(err.diagnostic(), Some("value cannot be negative"));
    }
}
