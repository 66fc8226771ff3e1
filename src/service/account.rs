use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{error, info, warn};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Deserialize;

use crate::auth::{authorize_owner, AuthUser};
use crate::error::AppError;
use crate::repository::users::{self, NewUser};
use crate::repository::{follows, memberships, projects};
use crate::service::view::{ActivatedUser, UserView};

#[derive(Deserialize)]
struct ActivationClaims {
    data: PendingUser,
}

/// Account data carried inside an activation token. The password is already
/// hashed by whoever issued the token.
#[derive(Deserialize)]
struct PendingUser {
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    hash: String,
}

pub async fn activate_account(
    db: &DatabaseConnection,
    secret: &str,
    token: &str,
) -> Result<ActivatedUser, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    let claims = decode::<ActivationClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            warn!("activation token rejected: {}", e);
            AppError::unauthorized("Activation link expired")
        })?;

    let pending = claims.data;
    let username = pending.username.clone();
    // creation failures answer 401 as well, duplicates included
    let user = users::insert(
        db,
        NewUser {
            username: pending.username,
            email: pending.email,
            name: pending.name,
            tagline: pending.tagline,
            password_hash: pending.hash,
        },
    )
    .await
    .map_err(|e| {
        error!("activate {} failed: {}", username, e);
        AppError::unauthorized("Failed to activate user account")
    })?;

    info!("account activated: {}", user.username);
    Ok(ActivatedUser {
        user: UserView::from(user),
    })
}

/// Remove the account and everything hanging off it. Steps run one after
/// another with no transaction: a failure part way leaves the earlier
/// deletions in place.
pub async fn delete_account(
    db: &DatabaseConnection,
    target: &str,
    caller: &AuthUser,
) -> Result<(), AppError> {
    let owner = authorize_owner(
        db,
        target,
        caller,
        "User is not authorised to change this project",
    )
    .await?;

    cascade(db, owner.id).await.map_err(|e| {
        error!("delete_account {} failed mid-cascade: {}", target, e);
        AppError::database("Failed to delete account")
    })?;

    info!("account deleted: {}", target);
    Ok(())
}

async fn cascade(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
    let hosted = projects::find_ids_by_owner(db, user_id).await?;
    if !hosted.is_empty() {
        for project_id in &hosted {
            projects::delete_contributors_of(db, *project_id).await?;
        }
        projects::delete_by_owner(db, user_id).await?;
    }
    follows::delete_touching(db, user_id).await?;
    memberships::delete_contributions_of(db, user_id).await?;
    memberships::delete_project_follows_of(db, user_id).await?;
    memberships::delete_comments_of(db, user_id).await?;
    users::delete(db, user_id).await?;
    Ok(())
}
