use super::schema::{self, Columns, DailySummary, SummaryInput};
use crate::{Error, Result};
use rusqlite::{named_params, params, Connection, OptionalExtension};
use time::Date;
use uuid::Uuid;

pub fn upsert(input: &SummaryInput, conn: &Connection) -> Result<DailySummary> {
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {id},
                {date},
                {rooms_total},
                {rooms_occupied},
                {rooms_available},
                {cash_collected},
                {momo_collected},
                {total_collected},
                {expected_balance},
                {expenses_logged}
            ) VALUES (
                :id,
                :date,
                :rooms_total,
                :rooms_occupied,
                :rooms_available,
                :cash_collected,
                :momo_collected,
                :total_collected,
                :expected_balance,
                :expenses_logged
            )
            ON CONFLICT ({date}) DO UPDATE SET
                {rooms_total} = excluded.{rooms_total},
                {rooms_occupied} = excluded.{rooms_occupied},
                {rooms_available} = excluded.{rooms_available},
                {cash_collected} = excluded.{cash_collected},
                {momo_collected} = excluded.{momo_collected},
                {total_collected} = excluded.{total_collected},
                {expected_balance} = excluded.{expected_balance},
                {expenses_logged} = excluded.{expenses_logged},
                {last_updated} = strftime('%Y-%m-%dT%H:%M:%fZ')
        "#,
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
        date = Columns::Date.as_str(),
        rooms_total = Columns::RoomsTotal.as_str(),
        rooms_occupied = Columns::RoomsOccupied.as_str(),
        rooms_available = Columns::RoomsAvailable.as_str(),
        cash_collected = Columns::CashCollected.as_str(),
        momo_collected = Columns::MomoCollected.as_str(),
        total_collected = Columns::TotalCollected.as_str(),
        expected_balance = Columns::ExpectedBalance.as_str(),
        expenses_logged = Columns::ExpensesLogged.as_str(),
        last_updated = Columns::LastUpdated.as_str(),
    );
    // The fresh id survives only when the row is actually inserted, a
    // conflict update keeps the original one
    conn.execute(
        &sql,
        named_params! {
            ":id": Uuid::new_v4().to_string(),
            ":date": input.date.to_string(),
            ":rooms_total": input.rooms_total,
            ":rooms_occupied": input.rooms_occupied,
            ":rooms_available": input.rooms_available,
            ":cash_collected": input.cash_collected,
            ":momo_collected": input.momo_collected,
            ":total_collected": input.total_collected,
            ":expected_balance": input.expected_balance,
            ":expenses_logged": input.expenses_logged,
        },
    )?;
    select_by_date(input.date, conn)?.ok_or_else(|| {
        Error::Generic(format!("Failed to load stored summary for {}", input.date))
    })
}

pub fn select_by_date(date: Date, conn: &Connection) -> Result<Option<DailySummary>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {date} = ?1
        "#,
        projection = DailySummary::projection(),
        table = schema::TABLE_NAME,
        date = Columns::Date.as_str(),
    );
    conn.query_row(&sql, params![date.to_string()], DailySummary::mapper())
        .optional()
        .map_err(Into::into)
}

pub fn select_latest(conn: &Connection) -> Result<Option<DailySummary>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            ORDER BY {date} DESC
            LIMIT 1
        "#,
        projection = DailySummary::projection(),
        table = schema::TABLE_NAME,
        date = Columns::Date.as_str(),
    );
    conn.query_row(&sql, [], DailySummary::mapper())
        .optional()
        .map_err(Into::into)
}

pub fn select_history(limit: i64, offset: i64, conn: &Connection) -> Result<Vec<DailySummary>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            ORDER BY {date} DESC
            LIMIT ?1 OFFSET ?2
        "#,
        projection = DailySummary::projection(),
        table = schema::TABLE_NAME,
        date = Columns::Date.as_str(),
    );
    conn.prepare(&sql)?
        .query_map(params![limit, offset], DailySummary::mapper())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

pub fn select_by_date_range(
    start: Date,
    end: Date,
    conn: &Connection,
) -> Result<Vec<DailySummary>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {date} >= ?1 AND {date} <= ?2
            ORDER BY {date} DESC
        "#,
        projection = DailySummary::projection(),
        table = schema::TABLE_NAME,
        date = Columns::Date.as_str(),
    );
    conn.prepare(&sql)?
        .query_map(
            params![start.to_string(), end.to_string()],
            DailySummary::mapper(),
        )?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

pub fn delete_by_date(date: Date, conn: &Connection) -> Result<bool> {
    let sql = format!(
        r#"
            DELETE FROM {table}
            WHERE {date} = ?1
        "#,
        table = schema::TABLE_NAME,
        date = Columns::Date.as_str(),
    );
    Ok(conn.execute(&sql, params![date.to_string()])? > 0)
}

pub fn select_count(conn: &Connection) -> Result<i64> {
    let sql = format!(
        r#"
            SELECT count(*)
            FROM {table}
        "#,
        table = schema::TABLE_NAME,
    );
    conn.query_row(&sql, [], |row| row.get(0)).map_err(Into::into)
}

#[cfg(test)]
pub fn set_last_updated(
    date: Date,
    last_updated: time::OffsetDateTime,
    conn: &Connection,
) -> Result<DailySummary> {
    use time::format_description::well_known::Rfc3339;
    let sql = format!(
        r#"
            UPDATE {table}
            SET {last_updated} = ?2
            WHERE {date} = ?1
        "#,
        table = schema::TABLE_NAME,
        last_updated = Columns::LastUpdated.as_str(),
        date = Columns::Date.as_str(),
    );
    conn.execute(&sql, params![date.to_string(), last_updated.format(&Rfc3339)?])?;
    select_by_date(date, conn)?
        .ok_or_else(|| Error::Generic(format!("No summary for date {date}")))
}
