use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::entity::user;

pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub password_hash: String,
}

pub struct ProfileUpdate {
    pub name: String,
    /// `None` leaves the stored tagline alone.
    pub tagline: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub socmed: BTreeMap<String, String>,
}

/// Every user, most recently updated first.
pub async fn find_all_by_recency(db: &DatabaseConnection) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find()
        .order_by_desc(user::Column::Updated)
        .order_by_desc(user::Column::Id)
        .all(db)
        .await
}

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

pub async fn find_by_ids(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, user::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn insert(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model, DbErr> {
    let now = Utc::now();
    user::ActiveModel {
        username: Set(new_user.username),
        email: Set(new_user.email),
        name: Set(new_user.name),
        tagline: Set(new_user.tagline),
        password_hash: Set(new_user.password_hash),
        skills: Set(encode_list(&[])),
        interests: Set(encode_list(&[])),
        socmed: Set(encode_map(&BTreeMap::new())),
        created: Set(Some(now)),
        updated: Set(Some(now)),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i32,
    update: ProfileUpdate,
) -> Result<(), DbErr> {
    let active = user::ActiveModel {
        id: Set(user_id),
        name: Set(Some(update.name)),
        tagline: update.tagline.map_or(NotSet, |t| Set(Some(t))),
        skills: Set(encode_list(&update.skills)),
        interests: Set(encode_list(&update.interests)),
        socmed: Set(encode_map(&update.socmed)),
        updated: Set(Some(Utc::now())),
        ..Default::default()
    };
    user::Entity::update(active).exec(db).await?;
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
    let res = user::Entity::delete_by_id(user_id).exec(db).await?;
    Ok(res.rows_affected)
}

fn encode_list(items: &[String]) -> Option<String> {
    serde_json::to_string(items).ok()
}

fn encode_map(map: &BTreeMap<String, String>) -> Option<String> {
    serde_json::to_string(map).ok()
}

/// Stored JSON array column back to a list; unreadable values read as empty.
pub fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
}

pub fn decode_map(raw: Option<&str>) -> BTreeMap<String, String> {
    raw.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
}
