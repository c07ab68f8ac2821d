//! Employee aggregate and its input payloads.
//!
//! `Employee` is the API-facing view of a persisted row. Soft-deleted rows
//! keep their data; `deleted_on` marks them inactive and every read path
//! filters them out.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::not_blank;

/// Storage identifier of an employee.
///
/// Numeric in storage, rendered as a JSON string so clients treat it as
/// opaque.
///
/// # Examples
/// ```
/// use employee_service::domain::EmployeeId;
///
/// let id = EmployeeId::new(42);
/// assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema)]
#[schema(value_type = String, example = "1")]
pub struct EmployeeId(i64);

impl EmployeeId {
    /// Wrap a raw storage identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw storage identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for EmployeeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Employee {
    /// Storage identifier.
    pub id: EmployeeId,
    /// Display name; never blank.
    #[schema(example = "Sachin Prasad")]
    pub name: String,
    /// Job title; may be empty.
    #[schema(example = "Senior Software Engineer")]
    pub position: String,
    /// When the record was created.
    pub created_on: DateTime<Utc>,
    /// When the record was last touched by create, update or undelete.
    pub updated_on: DateTime<Utc>,
    /// When the record was soft-deleted; absent while active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_on: Option<DateTime<Utc>>,
}

impl Employee {
    /// Whether the record is visible to queries.
    pub fn is_active(&self) -> bool {
        self.deleted_on.is_none()
    }
}

/// Payload for creating an employee.
///
/// Missing fields deserialize as empty strings so that a missing name is
/// reported as a field error rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewEmployee {
    /// Display name; required and non-blank.
    #[serde(default)]
    #[validate(custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "Sachin Prasad", max_length = 255)]
    pub name: String,
    /// Job title.
    #[serde(default)]
    #[validate(length(max = 255))]
    #[schema(example = "Senior Software Engineer", max_length = 255)]
    pub position: String,
}

impl NewEmployee {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            position: self.position.trim().to_owned(),
        }
    }
}

/// Partial update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateEmployee {
    /// New job title; an empty string clears it.
    #[serde(default)]
    #[validate(length(max = 255))]
    #[schema(example = "Staff Software Engineer", max_length = 255)]
    pub position: Option<String>,
}

impl UpdateEmployee {
    /// Whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
    }

    /// Apply the present fields to `employee`, trimmed, returning whether
    /// anything was applied.
    pub fn apply_to(&self, employee: &mut Employee) -> bool {
        let mut applied = false;
        if let Some(position) = &self.position {
            position.trim().clone_into(&mut employee.position);
            applied = true;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn employee() -> Employee {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 25, 0, 53, 16)
            .single()
            .expect("valid timestamp");
        Employee {
            id: EmployeeId::new(7),
            name: "Ada".to_owned(),
            position: "Engineer".to_owned(),
            created_on: at,
            updated_on: at,
            deleted_on: None,
        }
    }

    #[rstest]
    fn serialises_id_as_string_and_omits_active_deleted_on(employee: Employee) {
        let json = serde_json::to_value(&employee).expect("serialise");
        assert_eq!(json["id"], "7");
        assert_eq!(json["name"], "Ada");
        assert!(json.get("deleted_on").is_none());
    }

    #[rstest]
    fn new_employee_rejects_unknown_fields() {
        let result = serde_json::from_str::<NewEmployee>(r#"{"name":"A","salary":1}"#);
        assert!(result.is_err());
    }

    #[rstest]
    fn new_employee_defaults_missing_fields() {
        let payload: NewEmployee = serde_json::from_str("{}").expect("decode");
        assert_eq!(payload, NewEmployee::default());
    }

    #[rstest]
    fn trimmed_strips_whitespace() {
        let payload = NewEmployee {
            name: "  Ada ".to_owned(),
            position: "\tEngineer\n".to_owned(),
        };
        let trimmed = payload.trimmed();
        assert_eq!(trimmed.name, "Ada");
        assert_eq!(trimmed.position, "Engineer");
    }

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"position":null}"#, None)]
    #[case(r#"{"position":""}"#, Some(""))]
    #[case(r#"{"position":"Lead"}"#, Some("Lead"))]
    fn update_distinguishes_absent_from_empty(#[case] body: &str, #[case] expected: Option<&str>) {
        let patch: UpdateEmployee = serde_json::from_str(body).expect("decode");
        assert_eq!(patch.position.as_deref(), expected);
    }

    #[rstest]
    fn empty_patch_applies_nothing(mut employee: Employee) {
        let before = employee.clone();
        assert!(!UpdateEmployee::default().apply_to(&mut employee));
        assert_eq!(employee, before);
    }

    #[rstest]
    fn patch_overwrites_present_fields(mut employee: Employee) {
        let patch = UpdateEmployee {
            position: Some(String::new()),
        };
        assert!(patch.apply_to(&mut employee));
        assert_eq!(employee.position, "");
    }

    #[rstest]
    fn patch_trims_the_stored_position(mut employee: Employee) {
        let patch = UpdateEmployee {
            position: Some("  Lead \t".to_owned()),
        };
        assert!(patch.apply_to(&mut employee));
        assert_eq!(employee.position, "Lead");
    }
}
