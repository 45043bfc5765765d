use sea_orm::entity::prelude::*;

/// One row per catalog title the user has ever acted on. `tmdb_id` is the
/// catalog identifier, not a local sequence.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "log_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tmdb_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub status: String,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub watched_date: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
