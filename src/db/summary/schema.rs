use rusqlite::Row;
use std::sync::OnceLock;
use time::{Date, OffsetDateTime};

pub const TABLE_NAME: &str = "summary";

pub enum Columns {
    Id,
    Date,
    RoomsTotal,
    RoomsOccupied,
    RoomsAvailable,
    CashCollected,
    MomoCollected,
    TotalCollected,
    ExpectedBalance,
    ExpensesLogged,
    LastUpdated,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::Date => "date",
            Columns::RoomsTotal => "rooms_total",
            Columns::RoomsOccupied => "rooms_occupied",
            Columns::RoomsAvailable => "rooms_available",
            Columns::CashCollected => "cash_collected",
            Columns::MomoCollected => "momo_collected",
            Columns::TotalCollected => "total_collected",
            Columns::ExpectedBalance => "expected_balance",
            Columns::ExpensesLogged => "expenses_logged",
            Columns::LastUpdated => "last_updated",
        }
    }
}

/// One row per calendar date, `date` is the business key and `id` is the
/// storage key. Later submissions for the same date overwrite every field
/// except `id`.
#[derive(Debug, PartialEq)]
pub struct DailySummary {
    pub id: String,
    pub date: Date,
    pub rooms_total: i64,
    pub rooms_occupied: i64,
    pub rooms_available: i64,
    pub cash_collected: f64,
    pub momo_collected: f64,
    pub total_collected: f64,
    pub expected_balance: f64,
    pub expenses_logged: f64,
    pub last_updated: OffsetDateTime,
}

impl DailySummary {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::Id,
                Columns::Date,
                Columns::RoomsTotal,
                Columns::RoomsOccupied,
                Columns::RoomsAvailable,
                Columns::CashCollected,
                Columns::MomoCollected,
                Columns::TotalCollected,
                Columns::ExpectedBalance,
                Columns::ExpensesLogged,
                Columns::LastUpdated,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<DailySummary> {
        |row: &_| {
            Ok(DailySummary {
                id: row.get(Columns::Id.as_str())?,
                date: row.get(Columns::Date.as_str())?,
                rooms_total: row.get(Columns::RoomsTotal.as_str())?,
                rooms_occupied: row.get(Columns::RoomsOccupied.as_str())?,
                rooms_available: row.get(Columns::RoomsAvailable.as_str())?,
                cash_collected: row.get(Columns::CashCollected.as_str())?,
                momo_collected: row.get(Columns::MomoCollected.as_str())?,
                total_collected: row.get(Columns::TotalCollected.as_str())?,
                expected_balance: row.get(Columns::ExpectedBalance.as_str())?,
                expenses_logged: row.get(Columns::ExpensesLogged.as_str())?,
                last_updated: row.get(Columns::LastUpdated.as_str())?,
            })
        }
    }
}

/// Validated input for an upsert, `id` and `last_updated` are server-assigned.
#[derive(Debug)]
pub struct SummaryInput {
    pub date: Date,
    pub rooms_total: i64,
    pub rooms_occupied: i64,
    pub rooms_available: i64,
    pub cash_collected: f64,
    pub momo_collected: f64,
    pub total_collected: f64,
    pub expected_balance: f64,
    pub expenses_logged: f64,
}

#[cfg(test)]
impl SummaryInput {
    pub fn mock(date: Date) -> SummaryInput {
        SummaryInput {
            date,
            rooms_total: 20,
            rooms_occupied: 15,
            rooms_available: 5,
            cash_collected: 1500.0,
            momo_collected: 450.5,
            total_collected: 1950.5,
            expected_balance: 1800.0,
            expenses_logged: 150.5,
        }
    }
}
