/// Bearer-token authentication middleware.
/// Validates the JWT and adds the caller's user id to request extensions.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use chrono::Utc;
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// User id of the authenticated caller. Extracting it fails with 401
/// when the request carries no valid token.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

/// Viewer identity on routes that also serve anonymous requests.
/// `None` when no Authorization header was sent; a present-but-invalid
/// token is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUserId(pub Option<Uuid>);

pub fn decode_user_id(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Authentication("Invalid user id in token".to_string()))
}

/// Issue an HS256 token for the given user. The platform's identity provider
/// owns real issuance; this exists for integration tests and dev tooling.
pub fn mint_token(
    user_id: Uuid,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Resolves the caller's identity from a request.
///
/// Checks extensions first (populated by [`JwtAuth`] on wrapped scopes),
/// then falls back to decoding the Authorization header so extractors
/// work on routes outside any wrapped scope. Returns `Ok(None)` when no
/// header was sent and an error when one was sent but does not verify.
fn identity_from_request(req: &HttpRequest) -> Result<Option<Uuid>, AppError> {
    if let Some(user_id) = req.extensions().get::<UserId>() {
        return Ok(Some(user_id.0));
    }

    let header = match req.headers().get("Authorization") {
        Some(h) => h
            .to_str()
            .map_err(|_| AppError::Authentication("Invalid Authorization header".to_string()))?
            .to_string(),
        None => return Ok(None),
    };

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Authentication("Invalid Authorization scheme, expected Bearer".to_string())
    })?;

    let secret = req
        .app_data::<web::Data<Config>>()
        .map(|config| config.auth.jwt_secret.clone())
        .ok_or_else(|| AppError::Internal("Auth configuration missing".to_string()))?;

    decode_user_id(token, &secret).map(Some).map_err(|e| {
        tracing::debug!("Token validation failed: {}", e);
        AppError::Authentication("Invalid or expired token".to_string())
    })
}

/// Middleware factory for protected scopes. Rejects requests without a
/// valid token before they reach any handler.
pub struct JwtAuth;

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Resolve identity before touching extensions_mut: no RefCell
            // borrows may be active when we insert.
            let identity = identity_from_request(req.request());

            match identity {
                Ok(Some(user_id)) => {
                    req.extensions_mut().insert(UserId(user_id));
                    let res = service.call(req).await?;
                    Ok(res)
                }
                Ok(None) => {
                    Err(AppError::Authentication("Authentication required".to_string()).into())
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match identity_from_request(req) {
            Ok(Some(user_id)) => Ok(UserId(user_id)),
            Ok(None) => {
                Err(AppError::Authentication("Authentication required".to_string()).into())
            }
            Err(e) => Err(e.into()),
        })
    }
}

impl FromRequest for MaybeUserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            identity_from_request(req)
                .map(MaybeUserId)
                .map_err(Error::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token = mint_token(user_id, "test-secret", 3600).unwrap();
        let decoded = decode_user_id(&token, "test-secret").unwrap();
        assert_eq!(decoded, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = mint_token(Uuid::new_v4(), "test-secret", 3600).unwrap();
        assert!(decode_user_id(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = mint_token(Uuid::new_v4(), "test-secret", -120).unwrap();
        assert!(decode_user_id(&token, "test-secret").is_err());
    }
}
