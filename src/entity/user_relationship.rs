use sea_orm::entity::prelude::*;

/// Directed follow edge. Uniqueness of (follower, followee) is kept by the
/// repository, the table has no constraint for it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "t_user_relationship")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub follower: i32,
    pub followee: i32,
    pub created: Option<DateTimeUtc>,
    pub updated: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
