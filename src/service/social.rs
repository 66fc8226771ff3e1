use std::collections::HashMap;

use log::{error, warn};
use sea_orm::{DatabaseConnection, DbErr};

use crate::entity::user;
use crate::error::AppError;
use crate::repository::{follows, users};
use crate::service::view::{FollowerEdge, FollowingEdge, PublicUserView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Created,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Removed,
    NotFollowing,
}

pub async fn list_following(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Vec<FollowingEdge>, AppError> {
    let fail = |e: DbErr| {
        error!("list_following {} failed: {}", username, e);
        AppError::database("Failed to fetch followingUsers from database")
    };
    let user = users::find_by_username(db, username)
        .await
        .map_err(fail)?
        .ok_or(AppError::NotFound)?;
    let edges = follows::find_by_follower(db, user.id).await.map_err(fail)?;
    let counterparts = users::find_by_ids(db, edges.iter().map(|e| e.followee).collect())
        .await
        .map_err(fail)?;

    Ok(edges
        .into_iter()
        .map(|edge| FollowingEdge {
            id: edge.id,
            followee: expand(&counterparts, edge.followee),
        })
        .collect())
}

pub async fn list_followers(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Vec<FollowerEdge>, AppError> {
    let fail = |e: DbErr| {
        error!("list_followers {} failed: {}", username, e);
        AppError::database("Failed to fetch followerUsers from database")
    };
    let user = users::find_by_username(db, username)
        .await
        .map_err(fail)?
        .ok_or(AppError::NotFound)?;
    let edges = follows::find_by_followee(db, user.id).await.map_err(fail)?;
    let counterparts = users::find_by_ids(db, edges.iter().map(|e| e.follower).collect())
        .await
        .map_err(fail)?;

    Ok(edges
        .into_iter()
        .map(|edge| FollowerEdge {
            id: edge.id,
            follower: expand(&counterparts, edge.follower),
        })
        .collect())
}

pub async fn follow(
    db: &DatabaseConnection,
    follower: &str,
    followee: &str,
) -> Result<FollowOutcome, AppError> {
    let (from, to) = resolve_pair(db, follower, followee, "Failed to follow User").await?;
    let created = follows::upsert_pair(db, from, to).await.map_err(|e| {
        error!("follow {} -> {} failed: {}", follower, followee, e);
        AppError::database("Failed to follow User")
    })?;
    Ok(if created {
        FollowOutcome::Created
    } else {
        FollowOutcome::Unchanged
    })
}

pub async fn unfollow(
    db: &DatabaseConnection,
    follower: &str,
    followee: &str,
) -> Result<UnfollowOutcome, AppError> {
    let (from, to) = resolve_pair(db, follower, followee, "Failed to unfollow User").await?;
    let removed = follows::delete_pair(db, from, to).await.map_err(|e| {
        error!("unfollow {} -> {} failed: {}", follower, followee, e);
        AppError::database("Failed to unfollow User")
    })?;
    Ok(if removed > 0 {
        UnfollowOutcome::Removed
    } else {
        UnfollowOutcome::NotFollowing
    })
}

/// Both usernames to ids. Either one missing counts as a store failure.
async fn resolve_pair(
    db: &DatabaseConnection,
    follower: &str,
    followee: &str,
    msg: &str,
) -> Result<(i32, i32), AppError> {
    let to = resolve_id(db, followee, msg).await?;
    let from = resolve_id(db, follower, msg).await?;
    Ok((from, to))
}

async fn resolve_id(db: &DatabaseConnection, username: &str, msg: &str) -> Result<i32, AppError> {
    match users::find_by_username(db, username).await {
        Ok(Some(user)) => Ok(user.id),
        Ok(None) => {
            warn!("{}: no user named {}", msg, username);
            Err(AppError::database(msg))
        }
        Err(e) => {
            error!("{}: lookup of {} failed: {}", msg, username, e);
            Err(AppError::database(msg))
        }
    }
}

/// Counterpart user of an edge; a dangling reference expands to `None`.
fn expand(counterparts: &HashMap<i32, user::Model>, user_id: i32) -> Option<PublicUserView> {
    counterparts.get(&user_id).cloned().map(PublicUserView::from)
}
