use serde::{Deserialize, Serialize};

use crate::auth::UserCredentials;

/// API ingress configuration, read from `modules.api_ingress`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Serve `/openapi.json` (still behind authentication).
    #[serde(default = "default_true")]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    /// Realm advertised in the `WWW-Authenticate` challenge.
    #[serde(default = "default_realm")]
    pub realm: String,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Provisioned accounts for HTTP Basic authentication.
    #[serde(default)]
    pub users: Vec<UserCredentials>,
}

fn default_true() -> bool {
    true
}

fn default_realm() -> String {
    "animes".to_string()
}

fn default_body_limit() -> usize {
    16 * 1024 * 1024
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            enable_docs: default_true(),
            cors_enabled: false,
            realm: default_realm(),
            body_limit_bytes: default_body_limit(),
            users: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg: ApiIngressConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.enable_docs);
        assert!(!cfg.cors_enabled);
        assert_eq!(cfg.realm, "animes");
        assert!(cfg.users.is_empty());
    }

    #[test]
    fn parses_users() {
        let cfg: ApiIngressConfig = serde_json::from_value(serde_json::json!({
            "users": [
                {"username": "admin", "password": "admin", "roles": ["ADMIN", "USER"]}
            ]
        }))
        .unwrap();

        assert_eq!(cfg.users.len(), 1);
        assert_eq!(cfg.users[0].roles, vec![Role::Admin, Role::User]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<ApiIngressConfig, _> = serde_json::from_str(r#"{"bind_addr":"x"}"#);
        assert!(res.is_err());
    }
}
