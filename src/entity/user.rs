use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "t_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub password_hash: String,
    /// JSON array of skill tags
    pub skills: Option<String>,
    /// JSON array of free-form interests
    pub interests: Option<String>,
    /// JSON object, platform name to handle
    pub socmed: Option<String>,
    pub created: Option<DateTimeUtc>,
    pub updated: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
