use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::error;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::repository::users;

/// Caller identity established by a verified bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let config = match req.app_data::<web::Data<AppConfig>>() {
            Some(cfg) => cfg,
            None => return ready(Err(AppError::database("system_exception").into())),
        };
        let auth = extract_token(req, config)
            .ok_or_else(AppError::need_login)
            .and_then(|token| authenticate_token(config, &token));
        ready(auth.map_err(Into::into))
    }
}

fn extract_token(req: &HttpRequest, config: &AppConfig) -> Option<String> {
    let header = config.token_header.as_str();
    req.headers()
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty())
}

fn authenticate_token(config: &AppConfig, token: &str) -> Result<AuthUser, AppError> {
    let claims = decode_jwt(&config.jwt_secret, token)?;
    let username = extract_username(&claims).ok_or_else(AppError::need_login)?;
    Ok(AuthUser { username })
}

fn decode_jwt(secret: &str, token: &str) -> Result<serde_json::Value, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<serde_json::Value>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::need_login())
}

fn extract_username(claims: &serde_json::Value) -> Option<String> {
    let scopes = [Some(claims), claims.get("data"), claims.get("user")];
    for scope in scopes.into_iter().flatten() {
        for key in ["username", "sub"] {
            if let Some(name) = scope.get(key).and_then(|v| v.as_str()) {
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }
    None
}

/// True only when both sides resolved to a stored user and it is the same one.
pub fn same_identity(target: Option<&user::Model>, caller: Option<&user::Model>) -> bool {
    match (target, caller) {
        (Some(t), Some(c)) => t.id == c.id,
        _ => false,
    }
}

/// Resolve `target` and the caller and require them to be the same user.
/// A missing target is reported as unauthorized, not as not-found.
pub async fn authorize_owner(
    db: &DatabaseConnection,
    target: &str,
    caller: &AuthUser,
    denied_msg: &str,
) -> Result<user::Model, AppError> {
    let owner = users::find_by_username(db, target).await.map_err(|e| {
        error!("authorize_owner find target failed: {}", e);
        AppError::database("Failed to verify ownership")
    })?;
    let me = users::find_by_username(db, &caller.username).await.map_err(|e| {
        error!("authorize_owner find caller failed: {}", e);
        AppError::database("Failed to verify ownership")
    })?;
    if !same_identity(owner.as_ref(), me.as_ref()) {
        return Err(AppError::unauthorized(denied_msg));
    }
    owner.ok_or_else(|| AppError::unauthorized(denied_msg))
}

#[cfg(test)]
pub fn issue_token(secret: &str, username: &str, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let claims = serde_json::json!({ "username": username, "exp": exp });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).expect("sign")
}
