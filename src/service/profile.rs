use log::error;
use sea_orm::DatabaseConnection;

use crate::auth::{authorize_owner, AuthUser};
use crate::entity::{contributor_relationship, project};
use crate::error::AppError;
use crate::repository::{projects, users};
use crate::service::view::{ProfileView, ProjectView, UserView};
use crate::validation::{ProfileEditRequest, SkillCatalog};

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<UserView>, AppError> {
    let list = users::find_all_by_recency(db).await.map_err(|e| {
        error!("list_users failed: {}", e);
        AppError::database("Failed to fetch users from database")
    })?;
    Ok(list.into_iter().map(UserView::from).collect())
}

pub async fn get_profile(db: &DatabaseConnection, username: &str) -> Result<ProfileView, AppError> {
    let fail = |e: sea_orm::DbErr| {
        error!("get_profile {} failed: {}", username, e);
        AppError::database("Failed to fetch user by username from database")
    };

    let owner = users::find_by_username(db, username)
        .await
        .map_err(fail)?
        .ok_or(AppError::NotFound)?;

    let hosted = projects::find_by_owner(db, owner.id).await.map_err(fail)?;
    let hosted_public = projects::find_by_owner_in_state(db, owner.id, project::STATE_PUBLISHED)
        .await
        .map_err(fail)?;
    let contributed =
        projects::find_via_contributions(db, owner.id, contributor_relationship::STATE_ACCEPTED)
            .await
            .map_err(fail)?;
    let applied =
        projects::find_via_contributions(db, owner.id, contributor_relationship::STATE_APPLIED)
            .await
            .map_err(fail)?;
    let following = projects::find_via_follows(db, owner.id, project::STATE_PUBLISHED)
        .await
        .map_err(fail)?;

    Ok(ProfileView {
        profile_owner: owner.into(),
        hosted_projects: hosted.into_iter().map(ProjectView::from).collect(),
        hosted_public_projects: hosted_public.into_iter().map(ProjectView::from).collect(),
        contributed_projects: into_views(contributed),
        applied_projects: into_views(applied),
        following_projects: into_views(following),
    })
}

pub async fn edit_profile(
    db: &DatabaseConnection,
    catalog: &SkillCatalog,
    target: &str,
    caller: &AuthUser,
    payload: ProfileEditRequest,
) -> Result<(), AppError> {
    payload.check()?;

    let owner = authorize_owner(
        db,
        target,
        caller,
        "User is not authorised to change this profile",
    )
    .await?;

    users::update_profile(db, owner.id, payload.into_update(catalog))
        .await
        .map_err(|e| {
            error!("edit_profile {} failed: {}", target, e);
            AppError::database("Failed to edit profile")
        })
}

fn into_views(list: Vec<Option<project::Model>>) -> Vec<Option<ProjectView>> {
    list.into_iter().map(|p| p.map(ProjectView::from)).collect()
}
