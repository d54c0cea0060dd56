use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use brezora_core::identity::{self, Identity};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::main_lib::AppState;

const TOKEN_COOKIE: &str = "token";

/// Verifies (and, for seeding and tests, issues) HS256 identity tokens.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Forbidden,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    id: String,
    #[serde(default)]
    is_admin: bool,
    iat: usize,
    exp: usize,
}

impl AuthManager {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let secret = secret.trim();
        if secret.is_empty() {
            anyhow::bail!("JWT secret cannot be empty");
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue_token(&self, identity: &Identity, ttl: Duration) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + ttl;
        let claims = Claims {
            id: identity.user_id.clone(),
            is_admin: identity.is_admin,
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| {
                tracing::debug!("Rejected token: {:?}", err.kind());
                AuthError::Unauthorized
            })?;
        if data.claims.id.trim().is_empty() {
            return Err(AuthError::Unauthorized);
        }
        Ok(Identity::new(data.claims.id, data.claims.is_admin))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Admin access required".to_string()),
            AuthError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

/// Bearer header first, then the `token` cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| {
            let mut parts = header.splitn(2, ' ');
            match (parts.next(), parts.next()) {
                (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("Bearer") => {
                    Some(token.trim().to_string())
                }
                _ => None,
            }
        })
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Attaches the caller's [`Identity`] to the request when a valid token is
/// present. Never rejects; routes decide what they require.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(request.headers()) {
        if let Ok(identity) = state.auth.validate_token(&token) {
            request.extensions_mut().insert(identity);
        }
    }
    next.run(request).await
}

/// Gate for admin routes: no identity is 401, a non-admin identity is 403.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AuthError> {
    let caller = request.extensions().get::<Identity>();
    identity::require_identity(caller).map_err(|_| AuthError::Unauthorized)?;
    identity::require_admin(caller).map_err(|_| AuthError::Forbidden)?;
    Ok(next.run(request).await)
}

/// The identity resolved for this request, if any.
pub struct CurrentIdentity(pub Option<Identity>);

impl CurrentIdentity {
    pub fn get(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}
