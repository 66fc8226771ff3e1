pub mod comment;
pub mod contributor;
pub mod contributor_relationship;
pub mod project;
pub mod project_relationship;
pub mod user;
pub mod user_relationship;
