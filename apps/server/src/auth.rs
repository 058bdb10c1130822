use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use onekaday_core::errors::Error as CoreError;
use onekaday_core::users::User;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ErrorBody;
use crate::main_lib::AppState;

pub const SESSION_COOKIE: &str = "okd_session";

/// Signs and verifies session tokens and renders the session cookie.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_ttl: Duration,
    remember_ttl: Duration,
    cookie_secure: bool,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default)]
    pub remember: bool,
}

/// A freshly signed session token.
pub struct IssuedSession {
    pub token: String,
    pub expires_in: Duration,
    pub remember: bool,
}

/// The authenticated user, inserted into request extensions by [`require_session`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl SessionManager {
    pub fn new(config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(&config.secret_key),
            decoding_key: DecodingKey::from_secret(&config.secret_key),
            validation,
            session_ttl: config.session_ttl,
            remember_ttl: config.remember_ttl,
            cookie_secure: config.cookie_secure,
        }
    }

    pub fn issue(&self, user_id: &str, remember: bool) -> Result<IssuedSession, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let expires_in = if remember {
            self.remember_ttl
        } else {
            self.session_ttl
        };
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.as_secs() as usize,
            exp: (now + expires_in).as_secs() as usize,
            remember,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;
        Ok(IssuedSession {
            token,
            expires_in,
            remember,
        })
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("Rejected session token: {:?}", err.kind());
                AuthError::Unauthorized
            })
    }

    /// `Set-Cookie` value for a new session. A remembered session persists with
    /// `Max-Age`; otherwise the browser drops it on close.
    pub fn session_cookie(&self, session: &IssuedSession) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            session.token
        );
        if session.remember {
            cookie.push_str(&format!("; Max-Age={}", session.expires_in.as_secs()));
        }
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Internal(msg) => {
                tracing::error!("Session handling failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Secret key cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => bytes,
        _ if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Ok(_) => anyhow::bail!("Secret key must decode to exactly 32 bytes"),
        Err(_) => {
            anyhow::bail!("Secret key must be base64 encoded or a 32-byte ASCII string")
        }
    };

    Ok(decoded)
}

/// Reads the session token from `Authorization: Bearer` or the session cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let mut parts = header.splitn(2, ' ');
        if let (Some(scheme), Some(token)) = (parts.next(), parts.next()) {
            let token = token.trim();
            if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Rejects requests without a valid session and attaches the [`CurrentUser`].
///
/// The user is reloaded on every request, so a token outliving its account is
/// rejected.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(request.headers()).ok_or(AuthError::Unauthorized)?;
    let claims = state.sessions.validate(&token)?;

    let user = match state.user_service.get_user(&claims.sub) {
        Ok(user) => user,
        Err(CoreError::NotFound(_)) => return Err(AuthError::Unauthorized),
        Err(e) => return Err(AuthError::Internal(e.to_string())),
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
