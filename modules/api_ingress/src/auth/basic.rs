use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Username/password pair taken from an `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Returns `None` when the header is absent or is not well-formed Basic
/// credentials; both cases are treated as "no principal" by the caller.
pub fn from_headers(headers: &HeaderMap) -> Option<BasicCredentials> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    parse(value)
}

pub fn parse(value: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn encode(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn parses_well_formed_header() {
        let creds = parse(&encode("admin:s3cret")).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "s3cret");
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = parse(&encode("user:a:b:c")).unwrap();
        assert_eq!(creds.password, "a:b:c");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = encode("user:pw").replacen("Basic", "bAsIc", 1);
        assert!(parse(&value).is_some());
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(parse("Bearer abc"), None);
        assert_eq!(parse("Basic !!!not-base64"), None);
        assert_eq!(parse(&encode("no-colon")), None);
        assert_eq!(parse("Basic"), None);
    }

    #[test]
    fn missing_header_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(from_headers(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_str(&encode("u:p")).unwrap());
        assert!(from_headers(&headers).is_some());
    }

    #[test]
    fn debug_hides_password() {
        let creds = parse(&encode("u:topsecret")).unwrap();
        assert!(!format!("{creds:?}").contains("topsecret"));
    }
}
