use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, DerivePartialModel, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, Set,
};

use crate::{
    entities::log_entry,
    error::{AppError, AppResult},
    models::WatchStatus,
};

/// CRUD over the `log_entry` table, keyed by the catalog identifier.
#[derive(Clone)]
pub struct LogStore {
    db: DatabaseConnection,
}

/// Column projection used by the list pages: enough to render a poster tile
/// with a status badge, nothing more.
#[derive(Clone, Debug, PartialEq, DerivePartialModel, FromQueryResult)]
#[sea_orm(entity = "log_entry::Entity")]
pub struct LogTile {
    pub tmdb_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub status: String,
}

/// Rating/comment/date fields as the log editor submits them.
#[derive(Clone, Debug, Default)]
pub struct LogEdit {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub watched_date: Option<String>,
}

impl LogEdit {
    /// Trims the free-text fields and checks ranges before anything touches
    /// the store.
    fn normalized(mut self) -> AppResult<Self> {
        if let Some(rating) = self.rating {
            if !(0..=5).contains(&rating) {
                return Err(AppError::InvalidInput(format!(
                    "rating must be between 0 and 5, got {rating}"
                )));
            }
        }
        self.comment = self.comment.and_then(|c| {
            let c = c.trim().to_string();
            (!c.is_empty()).then_some(c)
        });
        self.watched_date = match self.watched_date {
            Some(d) => {
                let d = d.trim().to_string();
                if d.is_empty() {
                    None
                } else {
                    d.parse::<jiff::civil::Date>()?;
                    Some(d)
                }
            },
            None => None,
        };
        Ok(self)
    }
}

impl LogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every entry, newest first.
    pub async fn list_tiles(&self) -> AppResult<Vec<LogTile>> {
        Ok(log_entry::Entity::find()
            .order_by_desc(log_entry::Column::CreatedAt)
            .into_partial_model::<LogTile>()
            .all(&self.db)
            .await?)
    }

    pub async fn list_by_status(&self, status: WatchStatus) -> AppResult<Vec<LogTile>> {
        Ok(log_entry::Entity::find()
            .filter(log_entry::Column::Status.eq(status.as_str()))
            .order_by_desc(log_entry::Column::CreatedAt)
            .into_partial_model::<LogTile>()
            .all(&self.db)
            .await?)
    }

    pub async fn get(&self, tmdb_id: i32) -> AppResult<Option<log_entry::Model>> {
        Ok(log_entry::Entity::find_by_id(tmdb_id).one(&self.db).await?)
    }

    /// Puts a title on the want-to-watch list. Re-adding a title already on
    /// the list is a no-op: the first add wins.
    pub async fn add_want(
        &self,
        tmdb_id: i32,
        title: &str,
        poster_path: Option<&str>,
    ) -> AppResult<()> {
        let model = log_entry::ActiveModel {
            tmdb_id: Set(tmdb_id),
            title: Set(title.to_string()),
            poster_path: Set(poster_path.map(str::to_string)),
            status: Set(WatchStatus::WantToWatch.as_str().to_string()),
            rating: Set(None),
            comment: Set(None),
            watched_date: Set(None),
            created_at: Set(now_sec()),
        };

        let res = log_entry::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(log_entry::Column::TmdbId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match res {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Transitions an entry to watched. Stamps `today` as the watched date
    /// unless a date was already saved through the editor.
    pub async fn mark_watched(&self, tmdb_id: i32, today: jiff::civil::Date) -> AppResult<()> {
        let Some(existing) = log_entry::Entity::find_by_id(tmdb_id).one(&self.db).await? else {
            return Err(AppError::NotFound(format!("no log entry for title {tmdb_id}")));
        };

        let date = existing.watched_date.clone().unwrap_or_else(|| today.to_string());
        let mut active: log_entry::ActiveModel = existing.into();
        active.status = Set(WatchStatus::Watched.as_str().to_string());
        active.watched_date = Set(Some(date));
        active.update(&self.db).await?;
        Ok(())
    }

    /// The log editor's save path: upserts rating/comment/date and forces the
    /// status to watched. Inserts a fresh row when the user logs a title that
    /// was never added to the list.
    pub async fn save_log(
        &self,
        tmdb_id: i32,
        title: &str,
        poster_path: Option<&str>,
        edit: LogEdit,
    ) -> AppResult<()> {
        let edit = edit.normalized()?;

        match log_entry::Entity::find_by_id(tmdb_id).one(&self.db).await? {
            Some(existing) => {
                let mut active: log_entry::ActiveModel = existing.into();
                active.status = Set(WatchStatus::Watched.as_str().to_string());
                active.rating = Set(edit.rating);
                active.comment = Set(edit.comment);
                active.watched_date = Set(edit.watched_date);
                active.update(&self.db).await?;
            },
            None => {
                let model = log_entry::ActiveModel {
                    tmdb_id: Set(tmdb_id),
                    title: Set(title.to_string()),
                    poster_path: Set(poster_path.map(str::to_string)),
                    status: Set(WatchStatus::Watched.as_str().to_string()),
                    rating: Set(edit.rating),
                    comment: Set(edit.comment),
                    watched_date: Set(edit.watched_date),
                    created_at: Set(now_sec()),
                };
                log_entry::Entity::insert(model).exec(&self.db).await?;
            },
        }
        Ok(())
    }

    pub async fn remove(&self, tmdb_id: i32) -> AppResult<()> {
        log_entry::Entity::delete_by_id(tmdb_id).exec(&self.db).await?;
        Ok(())
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> LogStore {
        let db = crate::db::connect_and_migrate("sqlite::memory:").await.unwrap();
        LogStore::new(db)
    }

    fn today() -> jiff::civil::Date {
        jiff::civil::date(2026, 8, 7)
    }

    #[tokio::test]
    async fn add_then_get_is_want_to_watch() {
        let store = store().await;
        store.add_want(550, "Fight Club", None).await.unwrap();

        let entry = store.get(550).await.unwrap().unwrap();
        assert_eq!(entry.status, "want_to_watch");
        assert_eq!(entry.title, "Fight Club");
        assert!(entry.watched_date.is_none());
    }

    #[tokio::test]
    async fn re_adding_keeps_the_first_entry() {
        let store = store().await;
        store.add_want(550, "Fight Club", None).await.unwrap();
        store.mark_watched(550, today()).await.unwrap();

        // A second add must not reset the status or overwrite the row.
        store.add_want(550, "Fight Club Again", None).await.unwrap();

        let entry = store.get(550).await.unwrap().unwrap();
        assert_eq!(entry.status, "watched");
        assert_eq!(entry.title, "Fight Club");
    }

    #[tokio::test]
    async fn mark_watched_sets_status_and_date() {
        let store = store().await;
        store.add_want(550, "Fight Club", None).await.unwrap();
        store.mark_watched(550, today()).await.unwrap();

        let entry = store.get(550).await.unwrap().unwrap();
        assert_eq!(entry.status, "watched");
        assert_eq!(entry.watched_date.as_deref(), Some("2026-08-07"));
    }

    #[tokio::test]
    async fn mark_watched_keeps_an_explicit_date() {
        let store = store().await;
        let edit = LogEdit { watched_date: Some("2025-12-31".to_string()), ..Default::default() };
        store.save_log(550, "Fight Club", None, edit).await.unwrap();

        store.mark_watched(550, today()).await.unwrap();

        let entry = store.get(550).await.unwrap().unwrap();
        assert_eq!(entry.watched_date.as_deref(), Some("2025-12-31"));
    }

    #[tokio::test]
    async fn mark_watched_unknown_id_is_not_found() {
        let store = store().await;
        let err = store.mark_watched(999, today()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn save_log_inserts_when_missing() {
        let store = store().await;
        let edit = LogEdit {
            rating: Some(5),
            comment: Some("  a classic  ".to_string()),
            watched_date: Some("2026-01-15".to_string()),
        };
        store.save_log(238, "The Godfather", None, edit).await.unwrap();

        let entry = store.get(238).await.unwrap().unwrap();
        assert_eq!(entry.status, "watched");
        assert_eq!(entry.rating, Some(5));
        assert_eq!(entry.comment.as_deref(), Some("a classic"));
        assert_eq!(entry.watched_date.as_deref(), Some("2026-01-15"));
    }

    #[tokio::test]
    async fn save_log_rejects_out_of_range_rating() {
        let store = store().await;
        let edit = LogEdit { rating: Some(9), ..Default::default() };
        let err = store.save_log(550, "Fight Club", None, edit).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(store.get(550).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_log_rejects_a_bad_date() {
        let store = store().await;
        let edit = LogEdit { watched_date: Some("2026-02-30".to_string()), ..Default::default() };
        let err = store.save_log(550, "Fight Club", None, edit).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn remove_deletes_the_entry() {
        let store = store().await;
        store.add_want(550, "Fight Club", None).await.unwrap();
        store.remove(550).await.unwrap();

        assert!(store.get(550).await.unwrap().is_none());
        assert!(store.list_tiles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_by_status_filters() {
        let store = store().await;
        store.add_want(550, "Fight Club", None).await.unwrap();
        store.add_want(603, "The Matrix", None).await.unwrap();
        store.mark_watched(603, today()).await.unwrap();

        let want = store.list_by_status(WatchStatus::WantToWatch).await.unwrap();
        let watched = store.list_by_status(WatchStatus::Watched).await.unwrap();

        assert_eq!(want.len(), 1);
        assert_eq!(want[0].tmdb_id, 550);
        assert_eq!(watched.len(), 1);
        assert_eq!(watched[0].tmdb_id, 603);
    }

    #[tokio::test]
    async fn list_tiles_projects_the_tile_columns() {
        let store = store().await;
        store.add_want(550, "Fight Club", Some("/poster.jpg")).await.unwrap();

        let tiles = store.list_tiles().await.unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].title, "Fight Club");
        assert_eq!(tiles[0].poster_path.as_deref(), Some("/poster.jpg"));
        assert_eq!(tiles[0].status, "want_to_watch");
    }
}
