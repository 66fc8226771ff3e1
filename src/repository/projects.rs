use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::{contributor, contributor_relationship, project, project_relationship};

pub async fn find_by_owner(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<project::Model>, DbErr> {
    project::Entity::find()
        .filter(project::Column::UserId.eq(user_id))
        .order_by_asc(project::Column::Id)
        .all(db)
        .await
}

/// Owned projects in the given state, most recently updated first.
pub async fn find_by_owner_in_state(
    db: &DatabaseConnection,
    user_id: i32,
    state: &str,
) -> Result<Vec<project::Model>, DbErr> {
    project::Entity::find()
        .filter(project::Column::UserId.eq(user_id))
        .filter(project::Column::State.eq(state))
        .order_by_desc(project::Column::Updated)
        .order_by_desc(project::Column::Id)
        .all(db)
        .await
}

pub async fn find_ids_by_owner(db: &DatabaseConnection, user_id: i32) -> Result<Vec<i32>, DbErr> {
    project::Entity::find()
        .select_only()
        .column(project::Column::Id)
        .filter(project::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await
}

pub async fn delete_by_owner(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
    let res = project::Entity::delete_many()
        .filter(project::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_contributors_of(db: &DatabaseConnection, project_id: i32) -> Result<u64, DbErr> {
    let res = contributor::Entity::delete_many()
        .filter(contributor::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Projects reached through the user's contributor relationships in `state`.
///
/// One entry per relationship row, in row order. A relationship whose
/// contributor or project no longer exists yields `None` at its position.
pub async fn find_via_contributions(
    db: &DatabaseConnection,
    user_id: i32,
    state: &str,
) -> Result<Vec<Option<project::Model>>, DbErr> {
    let relationships = contributor_relationship::Entity::find()
        .filter(contributor_relationship::Column::UserId.eq(user_id))
        .filter(contributor_relationship::Column::State.eq(state))
        .order_by_asc(contributor_relationship::Column::Id)
        .all(db)
        .await?;
    if relationships.is_empty() {
        return Ok(Vec::new());
    }

    let contributor_ids: Vec<i32> = relationships.iter().map(|r| r.contributor_id).collect();
    let contributors: HashMap<i32, contributor::Model> = contributor::Entity::find()
        .filter(contributor::Column::Id.is_in(contributor_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let project_ids: Vec<i32> = contributors.values().map(|c| c.project_id).collect();
    let projects = find_by_ids(db, project_ids).await?;

    Ok(relationships
        .iter()
        .map(|r| {
            contributors
                .get(&r.contributor_id)
                .and_then(|c| projects.get(&c.project_id).cloned())
        })
        .collect())
}

/// Projects the user follows through project relationships in `state`, with
/// the same positional contract as [`find_via_contributions`].
pub async fn find_via_follows(
    db: &DatabaseConnection,
    user_id: i32,
    state: &str,
) -> Result<Vec<Option<project::Model>>, DbErr> {
    let relationships = project_relationship::Entity::find()
        .filter(project_relationship::Column::UserId.eq(user_id))
        .filter(project_relationship::Column::State.eq(state))
        .order_by_asc(project_relationship::Column::Id)
        .all(db)
        .await?;
    if relationships.is_empty() {
        return Ok(Vec::new());
    }

    let project_ids: Vec<i32> = relationships.iter().map(|r| r.project_id).collect();
    let projects = find_by_ids(db, project_ids).await?;

    Ok(relationships
        .iter()
        .map(|r| projects.get(&r.project_id).cloned())
        .collect())
}

async fn find_by_ids(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, project::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let projects = project::Entity::find()
        .filter(project::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(projects.into_iter().map(|p| (p.id, p)).collect())
}
