//! The structured requirements contract produced by extraction.
//!
//! Field and key names match the JSON shape the completion prompt asks the
//! model to return. Every field carries a structural default so that a
//! response missing one or more top-level keys deserializes cleanly — the
//! backfill invariant that lets downstream stages skip existence checks.

use serde::{Deserialize, Serialize};

/// Functional list entry used when the completion could not be decoded as
/// JSON at all. Kept distinct from the empty-list backfill on purpose: an
/// empty list means "the model reported no functional requirements", this
/// sentinel means "the response was not parseable".
pub const PARSE_FAILURE_SENTINEL: &str = "Failed to parse requirements";

/// Structured requirements extracted from an SRS document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Plain-language functional requirements.
    #[serde(default)]
    pub functional_requirements: Vec<String>,
    /// REST endpoints the generated service must expose.
    #[serde(default)]
    pub api_endpoints: Vec<EndpointSpec>,
    /// Database schema: tables and their fields.
    #[serde(default)]
    pub db_schema: DbSchema,
    /// Authentication/authorization descriptor.
    #[serde(default)]
    pub auth_requirements: AuthSpec,
}

impl Requirements {
    /// The sentinel produced when a completion response cannot be decoded.
    #[must_use]
    pub fn parse_failure_sentinel() -> Self {
        Self {
            functional_requirements: vec![PARSE_FAILURE_SENTINEL.to_string()],
            ..Self::default()
        }
    }

    /// Data-model names, in schema order. These drive model test and code
    /// generation (one artifact per table).
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.db_schema.tables.iter().map(|t| t.name.as_str())
    }
}

/// One REST endpoint descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// URL path, e.g. `/api/users`.
    pub path: String,
    /// HTTP method, e.g. `POST`.
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub description: String,
}

impl EndpointSpec {
    /// The resource name derived from the last path segment, used for
    /// deterministic file naming (`/api/users` becomes `users`).
    ///
    /// Falls back to `root` for a bare `/`.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
        if segment.is_empty() { "root" } else { segment }
    }
}

/// Database schema descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DbSchema {
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

/// One table descriptor: a name and its field list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Authentication descriptor: a type tag plus either a feature list or a
/// token expiry in seconds (both may be present).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSpec {
    /// Scheme tag, e.g. `JWT`. `Unknown` is the backfill default.
    #[serde(rename = "type", default = "default_auth_type")]
    pub auth_type: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Token lifetime in seconds, when the scheme declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<u64>,
}

impl AuthSpec {
    /// Whether this descriptor is the backfill default, i.e. the SRS
    /// declared no authentication. Stages that emit one artifact "per auth
    /// descriptor, if present" use this to decide presence.
    #[must_use]
    pub fn is_unspecified(&self) -> bool {
        self.auth_type == "Unknown" && self.features.is_empty() && self.token_expiry.is_none()
    }
}

impl Default for AuthSpec {
    fn default() -> Self {
        Self {
            auth_type: default_auth_type(),
            features: Vec::new(),
            token_expiry: None,
        }
    }
}

fn default_auth_type() -> String {
    "Unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_object_round_trips_without_loss() {
        let json = serde_json::json!({
            "functional_requirements": ["User registration", "Password reset"],
            "api_endpoints": [
                {"path": "/api/users", "method": "POST", "description": "Create new user"}
            ],
            "db_schema": {
                "tables": [{"name": "users", "fields": ["id", "username", "email"]}]
            },
            "auth_requirements": {"type": "JWT", "features": ["RBAC"]}
        });
        let req: Requirements = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(req.functional_requirements[1], "Password reset");
        assert_eq!(req.api_endpoints[0].method, "POST");
        assert_eq!(req.db_schema.tables[0].fields.len(), 3);
        assert_eq!(req.auth_requirements.auth_type, "JWT");
        assert_eq!(serde_json::to_value(&req).unwrap(), json);
    }

    #[test]
    fn missing_keys_fill_structural_defaults() {
        let req: Requirements = serde_json::from_value(serde_json::json!({
            "functional_requirements": ["Only this"]
        }))
        .unwrap();
        assert!(req.api_endpoints.is_empty());
        assert!(req.db_schema.tables.is_empty());
        assert_eq!(req.auth_requirements.auth_type, "Unknown");
        assert!(req.auth_requirements.is_unspecified());
    }

    #[test]
    fn resource_name_comes_from_last_segment() {
        let users = EndpointSpec {
            path: "/api/users".to_string(),
            ..EndpointSpec::default()
        };
        assert_eq!(users.resource_name(), "users");

        let trailing = EndpointSpec {
            path: "/api/orders/".to_string(),
            ..EndpointSpec::default()
        };
        assert_eq!(trailing.resource_name(), "orders");

        let bare = EndpointSpec {
            path: "/".to_string(),
            ..EndpointSpec::default()
        };
        assert_eq!(bare.resource_name(), "root");
    }

    #[test]
    fn auth_with_expiry_is_specified() {
        let auth = AuthSpec {
            auth_type: "Unknown".to_string(),
            features: Vec::new(),
            token_expiry: Some(3600),
        };
        assert!(!auth.is_unspecified());
    }

    #[test]
    fn sentinel_is_distinct_from_empty_backfill() {
        let sentinel = Requirements::parse_failure_sentinel();
        assert_eq!(
            sentinel.functional_requirements,
            vec![PARSE_FAILURE_SENTINEL]
        );
        assert_ne!(sentinel, Requirements::default());
    }
}
