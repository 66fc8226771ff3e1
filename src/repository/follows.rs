use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entity::user_relationship;

pub async fn find_pair(
    db: &DatabaseConnection,
    follower: i32,
    followee: i32,
) -> Result<Option<user_relationship::Model>, DbErr> {
    user_relationship::Entity::find()
        .filter(user_relationship::Column::Follower.eq(follower))
        .filter(user_relationship::Column::Followee.eq(followee))
        .one(db)
        .await
}

/// Insert the edge unless one already exists. Returns whether a row was
/// written. Lookup and insert are separate statements, so two concurrent
/// calls for the same pair can both insert.
pub async fn upsert_pair(db: &DatabaseConnection, follower: i32, followee: i32) -> Result<bool, DbErr> {
    if find_pair(db, follower, followee).await?.is_some() {
        return Ok(false);
    }
    let now = Utc::now();
    user_relationship::ActiveModel {
        follower: Set(follower),
        followee: Set(followee),
        created: Set(Some(now)),
        updated: Set(Some(now)),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(true)
}

pub async fn delete_pair(db: &DatabaseConnection, follower: i32, followee: i32) -> Result<u64, DbErr> {
    let res = user_relationship::Entity::delete_many()
        .filter(user_relationship::Column::Follower.eq(follower))
        .filter(user_relationship::Column::Followee.eq(followee))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn find_by_follower(
    db: &DatabaseConnection,
    follower: i32,
) -> Result<Vec<user_relationship::Model>, DbErr> {
    user_relationship::Entity::find()
        .filter(user_relationship::Column::Follower.eq(follower))
        .order_by_asc(user_relationship::Column::Id)
        .all(db)
        .await
}

pub async fn find_by_followee(
    db: &DatabaseConnection,
    followee: i32,
) -> Result<Vec<user_relationship::Model>, DbErr> {
    user_relationship::Entity::find()
        .filter(user_relationship::Column::Followee.eq(followee))
        .order_by_asc(user_relationship::Column::Id)
        .all(db)
        .await
}

/// Drop every edge the user sits on, either end.
pub async fn delete_touching(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
    let res = user_relationship::Entity::delete_many()
        .filter(
            Condition::any()
                .add(user_relationship::Column::Follower.eq(user_id))
                .add(user_relationship::Column::Followee.eq(user_id)),
        )
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;

    #[actix_web::test]
    async fn upsert_is_idempotent() {
        let db = connect_memory().await;
        assert!(upsert_pair(&db, 1, 2).await.unwrap());
        assert!(!upsert_pair(&db, 1, 2).await.unwrap());
        assert_eq!(find_by_follower(&db, 1).await.unwrap().len(), 1);
        // the reverse direction is a different edge
        assert!(upsert_pair(&db, 2, 1).await.unwrap());
    }

    #[actix_web::test]
    async fn delete_pair_reports_rows() {
        let db = connect_memory().await;
        upsert_pair(&db, 1, 2).await.unwrap();
        assert_eq!(delete_pair(&db, 1, 2).await.unwrap(), 1);
        assert_eq!(delete_pair(&db, 1, 2).await.unwrap(), 0);
        assert!(find_pair(&db, 1, 2).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn delete_touching_removes_both_directions_only() {
        let db = connect_memory().await;
        upsert_pair(&db, 1, 2).await.unwrap();
        upsert_pair(&db, 3, 1).await.unwrap();
        upsert_pair(&db, 2, 3).await.unwrap();
        assert_eq!(delete_touching(&db, 1).await.unwrap(), 2);
        assert!(find_by_follower(&db, 1).await.unwrap().is_empty());
        assert!(find_by_followee(&db, 1).await.unwrap().is_empty());
        assert_eq!(find_by_follower(&db, 2).await.unwrap().len(), 1);
    }
}
