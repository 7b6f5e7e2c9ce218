use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

#[derive(Queryable, Selectable, Debug, Clone, serde::Serialize)]
#[diesel(table_name = crate::schema::search_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SearchHistory {
    pub id: i64,
    pub query: String,
    pub user_ip: String,
    pub search_time: Option<DateTime<Utc>>,
    pub results_count: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::search_history)]
pub struct NewSearchHistory {
    pub query: String,
    pub user_ip: String,
}

impl SearchHistory {
    /// Insert one recorded search. The id and search_time are assigned by
    /// the database, results_count stays unset.
    pub async fn create(
        entry: NewSearchHistory,
        conn: &mut AsyncPgConnection,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::search_history::dsl::search_history;

        diesel::insert_into(search_history)
            .values(&entry)
            .returning(SearchHistory::as_returning())
            .get_result(conn)
            .await
    }

    /// Get the last N recorded searches ordered by most recent first.
    pub async fn get_latest(
        limit: i64,
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::search_history::dsl::*;

        search_history
            .order(search_time.desc())
            .limit(limit)
            .load(conn)
            .await
    }
}
