//! Row builders for store-backed tests.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::entity::{
    comment, contributor, contributor_relationship, project, project_relationship, user,
    user_relationship,
};
use crate::repository::users::{self, NewUser};

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    users::insert(
        db,
        NewUser {
            username: username.to_string(),
            email: Some(format!("{}@example.com", username)),
            name: Some(username.to_uppercase()),
            tagline: None,
            password_hash: format!("hash-of-{}", username),
        },
    )
    .await
    .expect("seed user")
}

/// `age_minutes` pushes `updated` into the past so recency ordering is stable.
pub async fn seed_project(
    db: &DatabaseConnection,
    owner: i32,
    title: &str,
    state: &str,
    age_minutes: i64,
) -> project::Model {
    let at = Utc::now() - Duration::minutes(age_minutes);
    project::ActiveModel {
        user_id: Set(owner),
        title: Set(title.to_string()),
        description: Set(Some(format!("about {}", title))),
        state: Set(state.to_string()),
        created: Set(Some(at)),
        updated: Set(Some(at)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed project")
}

pub async fn seed_contributor(db: &DatabaseConnection, project_id: i32) -> contributor::Model {
    contributor::ActiveModel {
        project_id: Set(project_id),
        title: Set(Some("backend dev".to_string())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed contributor")
}

pub async fn seed_contribution(
    db: &DatabaseConnection,
    user_id: i32,
    contributor_id: i32,
    state: &str,
) -> contributor_relationship::Model {
    contributor_relationship::ActiveModel {
        user_id: Set(user_id),
        contributor_id: Set(contributor_id),
        state: Set(state.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed contribution")
}

pub async fn seed_project_follow(
    db: &DatabaseConnection,
    user_id: i32,
    project_id: i32,
    state: &str,
) -> project_relationship::Model {
    project_relationship::ActiveModel {
        user_id: Set(user_id),
        project_id: Set(project_id),
        state: Set(state.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed project follow")
}

pub async fn seed_comment(db: &DatabaseConnection, user_id: i32, project_id: i32) -> comment::Model {
    comment::ActiveModel {
        user_id: Set(user_id),
        project_id: Set(project_id),
        content: Set("nice".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed comment")
}

pub async fn count_users(db: &DatabaseConnection) -> u64 {
    user::Entity::find().count(db).await.expect("count users")
}

pub async fn count_contributors_of(db: &DatabaseConnection, project_id: i32) -> u64 {
    contributor::Entity::find()
        .filter(contributor::Column::ProjectId.eq(project_id))
        .count(db)
        .await
        .expect("count contributors")
}

pub async fn count_edges_touching(db: &DatabaseConnection, user_id: i32) -> u64 {
    user_relationship::Entity::find()
        .filter(
            sea_orm::Condition::any()
                .add(user_relationship::Column::Follower.eq(user_id))
                .add(user_relationship::Column::Followee.eq(user_id)),
        )
        .count(db)
        .await
        .expect("count edges")
}

pub async fn count_rows_of_user(db: &DatabaseConnection, user_id: i32) -> u64 {
    let projects = project::Entity::find()
        .filter(project::Column::UserId.eq(user_id))
        .count(db)
        .await
        .expect("count projects");
    let contributions = contributor_relationship::Entity::find()
        .filter(contributor_relationship::Column::UserId.eq(user_id))
        .count(db)
        .await
        .expect("count contributions");
    let follows = project_relationship::Entity::find()
        .filter(project_relationship::Column::UserId.eq(user_id))
        .count(db)
        .await
        .expect("count project follows");
    let comments = comment::Entity::find()
        .filter(comment::Column::UserId.eq(user_id))
        .count(db)
        .await
        .expect("count comments");
    projects + contributions + follows + comments + count_edges_touching(db, user_id).await
}
