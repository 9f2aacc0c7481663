use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, Header};

use crate::services::Credentials;

/// Optional Basic credentials of the caller.
///
/// An absent or undecodable `Authorization` header yields `None` rather
/// than rejecting the request; the presence service decides what that means.
#[derive(Debug, Clone)]
pub struct BasicCredentials(pub Option<Credentials>);

#[async_trait]
impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut headers = parts.headers.get_all(header::AUTHORIZATION).iter();

        let credentials = Authorization::<Basic>::decode(&mut headers)
            .ok()
            .map(|basic| Credentials::new(basic.username(), basic.password()));

        Ok(Self(credentials))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(authorization: Option<&str>) -> Option<Credentials> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();

        BasicCredentials::from_request_parts(&mut parts, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn test_decode_basic_header() {
        // "user:pass"
        let credentials = extract(Some("Basic dXNlcjpwYXNz")).await;

        assert_eq!(credentials, Some(Credentials::new("user", "pass")));
    }

    #[tokio::test]
    async fn test_missing_or_foreign_header_is_none() {
        assert_eq!(extract(None).await, None);
        assert_eq!(extract(Some("Bearer token")).await, None);
        assert_eq!(extract(Some("Basic !!!")).await, None);
    }
}
