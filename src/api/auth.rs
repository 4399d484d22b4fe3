//! Principal extraction.
//!
//! Credentials are verified upstream; the gateway forwards the caller as
//! `X-User-Id` and `X-User-Role` headers and the handlers turn them into a
//! [`Principal`].

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};

use super::ApiError;
use crate::domain::{Principal, Role};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Optional principal for endpoints that also serve anonymous callers.
#[derive(Debug, Clone, Copy)]
pub struct MaybePrincipal(pub Option<Principal>);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ApiError> {
    headers
        .get(name)
        .map(|v| {
            v.to_str()
                .map(str::trim)
                .map_err(|_| ApiError::validation(format!("{name} header is not valid text")))
        })
        .transpose()
}

/// Reads the principal headers. Both absent means anonymous; one without the
/// other, a non-positive id or an unknown role is a malformed request.
fn principal_from_headers(headers: &HeaderMap) -> Result<Option<Principal>, ApiError> {
    let id = header(headers, USER_ID_HEADER)?;
    let role = header(headers, USER_ROLE_HEADER)?;

    let (id, role) = match (id, role) {
        (None, None) => return Ok(None),
        (Some(id), Some(role)) => (id, role),
        _ => {
            return Err(ApiError::validation(
                "X-User-Id and X-User-Role must be supplied together",
            ));
        }
    };

    let id: i32 = id
        .parse()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::validation("X-User-Id must be a positive integer"))?;
    let role: Role = role.parse().map_err(ApiError::validation)?;

    tracing::Span::current().record("user_id", id);

    Ok(Some(Principal::new(id, role)))
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_headers(&parts.headers)?
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}

impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_headers(&parts.headers).map(MaybePrincipal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_anonymous_when_both_absent() {
        assert!(principal_from_headers(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn test_reads_id_and_role() {
        let p = principal_from_headers(&headers(&[
            (USER_ID_HEADER, "42"),
            (USER_ROLE_HEADER, "Vendor"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(p, Principal::new(42, Role::Vendor));
    }

    #[test]
    fn test_malformed_headers_rejected() {
        for pairs in [
            vec![(USER_ID_HEADER, "42")],
            vec![(USER_ID_HEADER, "abc"), (USER_ROLE_HEADER, "buyer")],
            vec![(USER_ID_HEADER, "0"), (USER_ROLE_HEADER, "buyer")],
            vec![(USER_ID_HEADER, "3"), (USER_ROLE_HEADER, "root")],
        ] {
            assert!(matches!(
                principal_from_headers(&headers(&pairs)),
                Err(ApiError::ValidationError(_))
            ));
        }
    }
}
