//! Request bodies for the `/todos` endpoints.
//!
//! Missing or `null` string fields bind to `""` and a missing or `null`
//! `is_completed` to `false`. Field names also match in their capitalized
//! and upper-case spellings. Unknown fields are ignored.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use crate::persistence::{NewTodo, TodoChanges};

/// Request body for `POST /todos`.
///
/// `id`, `is_completed`, and `created_at` are always assigned by the store,
/// so they are not part of this shape.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateTodoRequest {
    /// Step number.
    #[serde(alias = "Number", alias = "NUMBER", deserialize_with = "null_as_default")]
    pub number: String,
    /// Category.
    #[serde(alias = "Category", alias = "CATEGORY", deserialize_with = "null_as_default")]
    pub category: String,
    /// Content.
    #[serde(alias = "Content", alias = "CONTENT", deserialize_with = "null_as_default")]
    pub content: String,
    /// Environment label.
    #[serde(alias = "Env", alias = "ENV", deserialize_with = "null_as_default")]
    pub env: String,
    /// Expected result.
    #[serde(alias = "Expected", alias = "EXPECTED", deserialize_with = "null_as_default")]
    pub expected: String,
}

/// Binds JSON `null` to the type's default instead of rejecting it.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// RFC 3339 with the submitted offset, written as `Z` when it is zero.
fn rfc3339_zulu<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        None => serializer.serialize_none(),
    }
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(req: CreateTodoRequest) -> Self {
        Self {
            number: req.number,
            category: req.category,
            content: req.content,
            env: req.env,
            expected: req.expected,
        }
    }
}

/// Request body for `PUT /todos/{id}`, echoed back as the response.
///
/// `id` and `created_at` are never written; they are only echoed when the
/// client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateTodoRequest {
    /// Client's view of the row id.
    #[serde(alias = "Id", alias = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Step number.
    #[serde(alias = "Number", alias = "NUMBER", deserialize_with = "null_as_default")]
    pub number: String,
    /// Category.
    #[serde(alias = "Category", alias = "CATEGORY", deserialize_with = "null_as_default")]
    pub category: String,
    /// Content.
    #[serde(alias = "Content", alias = "CONTENT", deserialize_with = "null_as_default")]
    pub content: String,
    /// Environment label.
    #[serde(alias = "Env", alias = "ENV", deserialize_with = "null_as_default")]
    pub env: String,
    /// Expected result.
    #[serde(alias = "Expected", alias = "EXPECTED", deserialize_with = "null_as_default")]
    pub expected: String,
    /// Completion flag.
    #[serde(
        alias = "Is_completed",
        alias = "IS_COMPLETED",
        deserialize_with = "null_as_default"
    )]
    pub is_completed: bool,
    /// Client's view of the creation timestamp, offset preserved.
    #[serde(
        alias = "Created_at",
        alias = "CREATED_AT",
        serialize_with = "rfc3339_zulu",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl UpdateTodoRequest {
    /// The columns this request overwrites.
    #[must_use]
    pub fn changes(&self) -> TodoChanges {
        TodoChanges {
            number: self.number.clone(),
            category: self.category.clone(),
            content: self.content.clone(),
            env: self.env.clone(),
            expected: self.expected.clone(),
            is_completed: self.is_completed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_ignores_client_id_and_completion() {
        let body = r#"{"id":4242,"number":"T1","category":"smoke","content":"check","env":"prod","expected":"ok","is_completed":true}"#;
        let Ok(req) = serde_json::from_str::<CreateTodoRequest>(body) else {
            panic!("valid body must parse");
        };
        let new = NewTodo::from(req);
        assert_eq!(new.number, "T1");
        assert_eq!(new.expected, "ok");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let Ok(req) = serde_json::from_str::<CreateTodoRequest>(r#"{"number":"T1"}"#) else {
            panic!("partial body must parse");
        };
        assert_eq!(req.number, "T1");
        assert_eq!(req.category, "");
    }

    #[test]
    fn type_mismatch_is_rejected() {
        assert!(serde_json::from_str::<CreateTodoRequest>(r#"{"number":7}"#).is_err());
        assert!(serde_json::from_str::<CreateTodoRequest>(r#""not json""#).is_err());
    }

    #[test]
    fn update_echo_omits_absent_id_and_timestamp() {
        let Ok(req) = serde_json::from_str::<UpdateTodoRequest>(
            r#"{"number":"X","category":"Y","content":"Z","env":"E","expected":"Ex","is_completed":true}"#,
        ) else {
            panic!("valid body must parse");
        };
        assert!(req.changes().is_completed);

        let Ok(echo) = serde_json::to_value(&req) else {
            panic!("serialization failed");
        };
        assert_eq!(
            echo,
            serde_json::json!({
                "number": "X",
                "category": "Y",
                "content": "Z",
                "env": "E",
                "expected": "Ex",
                "is_completed": true,
            })
        );
    }

    #[test]
    fn null_fields_bind_to_defaults() {
        let Ok(req) = serde_json::from_str::<CreateTodoRequest>(
            r#"{"number":null,"category":"smoke","content":null,"env":"prod","expected":"ok"}"#,
        ) else {
            panic!("null strings must bind");
        };
        assert_eq!(req.number, "");
        assert_eq!(req.content, "");
        assert_eq!(req.category, "smoke");

        let Ok(req) = serde_json::from_str::<UpdateTodoRequest>(
            r#"{"number":"X","is_completed":null,"id":null,"created_at":null}"#,
        ) else {
            panic!("null completion flag must bind");
        };
        assert!(!req.is_completed);
        assert_eq!(req.id, None);
        assert_eq!(req.created_at, None);
    }

    #[test]
    fn capitalized_field_names_bind() {
        let Ok(req) = serde_json::from_str::<CreateTodoRequest>(
            r#"{"Number":"T1","CATEGORY":"smoke","Content":"check","ENV":"prod","Expected":"ok"}"#,
        ) else {
            panic!("capitalized names must bind");
        };
        let new = NewTodo::from(req);
        assert_eq!(new.number, "T1");
        assert_eq!(new.category, "smoke");
        assert_eq!(new.content, "check");
        assert_eq!(new.env, "prod");
        assert_eq!(new.expected, "ok");

        let Ok(req) = serde_json::from_str::<UpdateTodoRequest>(
            r#"{"ID":5,"Number":"X","IS_COMPLETED":true}"#,
        ) else {
            panic!("capitalized names must bind");
        };
        assert_eq!(req.id, Some(5));
        assert!(req.changes().is_completed);
    }

    #[test]
    fn echo_keeps_submitted_offset() {
        let Ok(req) = serde_json::from_str::<UpdateTodoRequest>(
            r#"{"number":"X","created_at":"2024-05-01T09:30:00+09:00"}"#,
        ) else {
            panic!("offset timestamp must parse");
        };
        let Ok(echo) = serde_json::to_value(&req) else {
            panic!("serialization failed");
        };
        assert_eq!(echo["created_at"], "2024-05-01T09:30:00+09:00");
    }

    #[test]
    fn echo_writes_zero_offset_as_zulu() {
        let Ok(req) = serde_json::from_str::<UpdateTodoRequest>(
            r#"{"number":"X","created_at":"2024-05-01T00:30:00.123456Z"}"#,
        ) else {
            panic!("utc timestamp must parse");
        };
        let Ok(echo) = serde_json::to_value(&req) else {
            panic!("serialization failed");
        };
        assert_eq!(echo["created_at"], "2024-05-01T00:30:00.123456Z");
    }
}
