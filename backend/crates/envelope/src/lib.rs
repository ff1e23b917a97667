//! Shared response envelope primitives for the rental backend endpoints.
//!
//! Every HTTP endpoint answers with the same JSON envelope:
//! `{ success, data?, error?, message?, source? }`. The `source` field names
//! the storage backend that served the request so clients can surface
//! degraded-mode operation.

use serde::{Deserialize, Serialize};

/// Storage backend that served a request.
///
/// Serialised with the wire names clients already rely on: the hosted
/// database is reported as `supabase`, the local file fallback as
/// `temporary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The hosted relational database reached over the network.
    Supabase,
    /// The local JSON-file record store used when the primary is unavailable.
    Temporary,
}

impl Backend {
    /// Wire name of the backend as it appears in the `source` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supabase => "supabase",
            Self::Temporary => "temporary",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a backend name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend name: {name}")]
pub struct BackendParseError {
    /// The rejected input.
    pub name: String,
}

impl std::str::FromStr for Backend {
    type Err = BackendParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supabase" => Ok(Self::Supabase),
            "temporary" => Ok(Self::Temporary),
            other => Err(BackendParseError {
                name: other.to_owned(),
            }),
        }
    }
}

/// Standard response envelope shared by every endpoint.
///
/// Optional fields are omitted from the wire when unset, so a plain success
/// serialises as `{"success":true,"data":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload for successful requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable failure description for unsuccessful requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Informational message accompanying a success without a payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Backend that served the request, when a store was consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Backend>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying a payload.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            source: None,
        }
    }

    /// Successful envelope carrying a payload and the backend that served it.
    #[must_use]
    pub const fn served(data: T, source: Backend) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            source: Some(source),
        }
    }

    /// Successful envelope carrying only an informational message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Failure envelope carrying an error description.
    #[must_use]
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            source: None,
        }
    }

    /// Attach the serving backend to the envelope.
    #[must_use]
    pub fn with_source(mut self, source: Backend) -> Self {
        self.source = Some(source);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn to_value<T: Serialize>(envelope: &ApiResponse<T>) -> Value {
        serde_json::to_value(envelope).expect("envelope serialises")
    }

    #[rstest]
    #[case(Backend::Supabase, "supabase")]
    #[case(Backend::Temporary, "temporary")]
    fn backend_wire_names_round_trip(#[case] backend: Backend, #[case] name: &str) {
        assert_eq!(backend.as_str(), name);
        assert_eq!(name.parse::<Backend>().expect("known name"), backend);
    }

    #[rstest]
    fn unknown_backend_name_is_rejected() {
        let err = "redis".parse::<Backend>().expect_err("unknown name");
        assert_eq!(err.name, "redis");
    }

    #[rstest]
    fn success_envelope_omits_unset_fields() {
        let value = to_value(&ApiResponse::ok(json!({ "id": 1 })));
        assert_eq!(value, json!({ "success": true, "data": { "id": 1 } }));
    }

    #[rstest]
    fn served_envelope_reports_its_source() {
        let value = to_value(&ApiResponse::served(json!(42), Backend::Temporary));
        assert_eq!(
            value,
            json!({ "success": true, "data": 42, "source": "temporary" })
        );
    }

    #[rstest]
    fn error_envelope_carries_only_the_error() {
        let value = to_value(&ApiResponse::<Value>::error("boom"));
        assert_eq!(value, json!({ "success": false, "error": "boom" }));
    }

    #[rstest]
    fn message_envelope_survives_deserialisation() {
        let raw = r#"{"success":true,"message":"cleared","source":"supabase"}"#;
        let envelope: ApiResponse<Value> = serde_json::from_str(raw).expect("envelope parses");
        assert!(envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("cleared"));
        assert_eq!(envelope.source, Some(Backend::Supabase));
    }
}
