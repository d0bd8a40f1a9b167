use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, error::ErrorUnauthorized};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infrastructure::security::JwtKeys;

/// The caller identity the auth middleware verified, available to handlers
/// as an extractor.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(*user)),
            None => ready(Err(ErrorUnauthorized("missing authenticated user"))),
        }
    }
}

/// Validate an `Authorization: Bearer <jwt>` header value and yield the
/// caller id. Purely local token verification, no store access.
pub fn extract_user_from_token(
    header: Option<&str>,
    keys: &JwtKeys,
) -> Result<AuthenticatedUser, DomainError> {
    let header = header.ok_or(DomainError::Unauthorized)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(DomainError::Unauthorized)?;
    let claims = keys
        .verify_token(token)
        .map_err(|_| DomainError::Unauthorized)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::Unauthorized)?;
    Ok(AuthenticatedUser { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_valid_bearer_token() {
        let keys = JwtKeys::new("secret".into());
        let id = Uuid::new_v4();
        let token = keys.generate_token(id).unwrap();
        let header = format!("Bearer {}", token);

        let user = extract_user_from_token(Some(&header), &keys).unwrap();
        assert_eq!(user.id, id);
    }

    #[test]
    fn rejects_missing_header_malformed_scheme_and_garbage() {
        let keys = JwtKeys::new("secret".into());
        let token = keys.generate_token(Uuid::new_v4()).unwrap();

        for header in [None, Some(token.as_str()), Some("Bearer not-a-jwt")] {
            let err = extract_user_from_token(header, &keys).unwrap_err();
            assert!(matches!(err, DomainError::Unauthorized));
        }
    }
}
