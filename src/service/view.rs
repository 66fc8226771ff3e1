use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::entity::{project, user};
use crate::repository::users::{decode_list, decode_map};

/// User as listed and as profile owner: everything but the credential hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub socmed: BTreeMap<String, String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

/// User as seen from someone else's follow list: no hash, no email.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserView {
    pub id: i32,
    pub username: String,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub socmed: BTreeMap<String, String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

/// Project without its row id or owner id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub title: String,
    pub description: Option<String>,
    pub state: String,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub profile_owner: UserView,
    pub hosted_projects: Vec<ProjectView>,
    pub hosted_public_projects: Vec<ProjectView>,
    pub contributed_projects: Vec<Option<ProjectView>>,
    pub applied_projects: Vec<Option<ProjectView>>,
    pub following_projects: Vec<Option<ProjectView>>,
}

#[derive(Debug, Serialize)]
pub struct FollowingEdge {
    pub id: i32,
    pub followee: Option<PublicUserView>,
}

#[derive(Debug, Serialize)]
pub struct FollowerEdge {
    pub id: i32,
    pub follower: Option<PublicUserView>,
}

#[derive(Debug, Serialize)]
pub struct ActivatedUser {
    pub user: UserView,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            skills: decode_list(model.skills.as_deref()),
            interests: decode_list(model.interests.as_deref()),
            socmed: decode_map(model.socmed.as_deref()),
            username: model.username,
            email: model.email,
            name: model.name,
            tagline: model.tagline,
            created: model.created.map(to_rfc3339),
            updated: model.updated.map(to_rfc3339),
        }
    }
}

impl From<user::Model> for PublicUserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            skills: decode_list(model.skills.as_deref()),
            interests: decode_list(model.interests.as_deref()),
            socmed: decode_map(model.socmed.as_deref()),
            username: model.username,
            name: model.name,
            tagline: model.tagline,
            created: model.created.map(to_rfc3339),
            updated: model.updated.map(to_rfc3339),
        }
    }
}

impl From<project::Model> for ProjectView {
    fn from(model: project::Model) -> Self {
        Self {
            title: model.title,
            description: model.description,
            state: model.state,
            created: model.created.map(to_rfc3339),
            updated: model.updated.map(to_rfc3339),
        }
    }
}

fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, false)
}
