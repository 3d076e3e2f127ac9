//! Table-driven access policy.
//!
//! Rules are evaluated in order and the first rule matching the verb and
//! path applies; the principal must hold every role the rule lists. A path
//! matched by no rule only needs an authenticated principal, so nothing is
//! ever public.

use axum::http::Method;
use thiserror::Error;

use super::{Principal, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches the path itself (with or without a trailing `/`).
    Exact(String),
    /// Matches the base path and everything below it (`/base/**`).
    Subtree(String),
}

impl PathPattern {
    /// `"/animes/**"` becomes a subtree pattern, anything else is exact.
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(base) => Self::Subtree(base.to_string()),
            None => Self::Exact(pattern.trim_end_matches('/').to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match self {
            Self::Exact(p) => path == p,
            Self::Subtree(base) => {
                path == base
                    || path
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    methods: Vec<Method>,
    pattern: PathPattern,
    required: Vec<Role>,
}

impl AccessRule {
    pub fn new(methods: &[Method], pattern: &str, required: &[Role]) -> Self {
        Self {
            methods: methods.to_vec(),
            pattern: PathPattern::parse(pattern),
            required: required.to_vec(),
        }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.methods.contains(method) && self.pattern.matches(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Full authentication is required to access this resource")]
    Unauthenticated,
    #[error("Access denied: missing role(s) {}", join_roles(.missing))]
    Forbidden { missing: Vec<Role> },
}

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<AccessDenied> for api_errors::ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => Self::unauthenticated(denied.to_string()),
            AccessDenied::Forbidden { .. } => Self::forbidden(denied.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: impl IntoIterator<Item = AccessRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = AccessRule>) {
        self.rules.extend(rules);
    }

    pub fn decide(
        &self,
        method: &Method,
        path: &str,
        principal: Option<&Principal>,
    ) -> Result<(), AccessDenied> {
        let Some(principal) = principal else {
            return Err(AccessDenied::Unauthenticated);
        };

        let Some(rule) = self.rules.iter().find(|r| r.matches(method, path)) else {
            return Ok(());
        };

        let missing: Vec<Role> = rule
            .required
            .iter()
            .copied()
            .filter(|role| !principal.has_role(*role))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AccessDenied::Forbidden { missing })
        }
    }
}
