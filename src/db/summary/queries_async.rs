use super::{queries, schema::DailySummary, schema::SummaryInput};
use crate::Result;
use deadpool_sqlite::Pool;
use time::Date;

pub async fn upsert(input: SummaryInput, pool: &Pool) -> Result<DailySummary> {
    pool.get()
        .await?
        .interact(move |conn| queries::upsert(&input, conn))
        .await?
}

pub async fn select_by_date(date: Date, pool: &Pool) -> Result<Option<DailySummary>> {
    pool.get()
        .await?
        .interact(move |conn| queries::select_by_date(date, conn))
        .await?
}

pub async fn select_latest(pool: &Pool) -> Result<Option<DailySummary>> {
    pool.get()
        .await?
        .interact(|conn| queries::select_latest(conn))
        .await?
}

pub async fn select_history(limit: i64, offset: i64, pool: &Pool) -> Result<Vec<DailySummary>> {
    pool.get()
        .await?
        .interact(move |conn| queries::select_history(limit, offset, conn))
        .await?
}

pub async fn select_by_date_range(
    start: Date,
    end: Date,
    pool: &Pool,
) -> Result<Vec<DailySummary>> {
    pool.get()
        .await?
        .interact(move |conn| queries::select_by_date_range(start, end, conn))
        .await?
}

pub async fn delete_by_date(date: Date, pool: &Pool) -> Result<bool> {
    pool.get()
        .await?
        .interact(move |conn| queries::delete_by_date(date, conn))
        .await?
}

pub async fn select_count(pool: &Pool) -> Result<i64> {
    pool.get()
        .await?
        .interact(|conn| queries::select_count(conn))
        .await?
}
