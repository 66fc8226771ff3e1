use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entity::{comment, contributor_relationship, project_relationship};

pub async fn delete_contributions_of(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
    let res = contributor_relationship::Entity::delete_many()
        .filter(contributor_relationship::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_project_follows_of(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
    let res = project_relationship::Entity::delete_many()
        .filter(project_relationship::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_comments_of(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
    let res = comment::Entity::delete_many()
        .filter(comment::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
