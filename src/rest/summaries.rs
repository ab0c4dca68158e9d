use crate::db;
use crate::db::summary::schema::{DailySummary, SummaryInput};
use crate::Error;
use actix_web::delete;
use actix_web::get;
use actix_web::post;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Path;
use actix_web::web::Query;
use actix_web::HttpResponse;
use deadpool_sqlite::Pool;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;
use time::{Date, OffsetDateTime};

#[derive(Deserialize)]
pub struct PostArgs {
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

impl From<PostArgs> for SummaryInput {
    fn from(args: PostArgs) -> Self {
        SummaryInput {
            date: args.date,
            rooms_total: args.rooms_total,
            rooms_occupied: args.rooms_occupied,
            rooms_available: args.rooms_available,
            cash_collected: args.cash_collected,
            momo_collected: args.momo_collected,
            total_collected: args.total_collected,
            expected_balance: args.expected_balance,
            expenses_logged: args.expenses_logged,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct GetItem {
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
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl From<DailySummary> for GetItem {
    fn from(val: DailySummary) -> Self {
        GetItem {
            id: val.id,
            date: val.date,
            rooms_total: val.rooms_total,
            rooms_occupied: val.rooms_occupied,
            rooms_available: val.rooms_available,
            cash_collected: val.cash_collected,
            momo_collected: val.momo_collected,
            total_collected: val.total_collected,
            expected_balance: val.expected_balance,
            expenses_logged: val.expenses_logged,
            last_updated: val.last_updated,
        }
    }
}

impl From<DailySummary> for Json<GetItem> {
    fn from(val: DailySummary) -> Self {
        Json(val.into())
    }
}

#[post("")]
pub async fn post(args: Json<PostArgs>, pool: Data<Pool>) -> Result<HttpResponse, Error> {
    let summary = db::summary::queries_async::upsert(args.into_inner().into(), &pool)
        .await
        .map_err(|e| Error::Generic(format!("Failed to create summary: {e}")))?;
    Ok(HttpResponse::Created().json(GetItem::from(summary)))
}

#[get("today")]
pub async fn get_today(pool: Data<Pool>) -> Result<Json<GetItem>, Error> {
    let today = OffsetDateTime::now_utc().date();
    db::summary::queries_async::select_by_date(today, &pool)
        .await?
        .map(Into::into)
        .ok_or(Error::NotFound(format!(
            "No summary found for today ({today})"
        )))
}

#[get("latest")]
pub async fn get_latest(pool: Data<Pool>) -> Result<Json<GetItem>, Error> {
    db::summary::queries_async::select_latest(&pool)
        .await?
        .map(Into::into)
        .ok_or(Error::NotFound("No summaries found in database".into()))
}

#[derive(Deserialize)]
pub struct HistoryArgs {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[get("history")]
pub async fn get_history(
    args: Query<HistoryArgs>,
    pool: Data<Pool>,
) -> Result<Json<Vec<GetItem>>, Error> {
    let limit = args.limit.unwrap_or(30);
    if !(1..=100).contains(&limit) {
        return Err(Error::InvalidInput(format!(
            "limit must be in range [1, 100], got {limit}"
        )));
    }
    let offset = args.offset.unwrap_or(0);
    if offset < 0 {
        return Err(Error::InvalidInput(format!(
            "offset must not be negative, got {offset}"
        )));
    }
    let summaries = db::summary::queries_async::select_history(limit, offset, &pool).await?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct RangeArgs {
    start_date: Date,
    end_date: Date,
}

#[get("range")]
pub async fn get_range(
    args: Query<RangeArgs>,
    pool: Data<Pool>,
) -> Result<Json<Vec<GetItem>>, Error> {
    if args.start_date > args.end_date {
        return Err(Error::InvalidInput(
            "start_date must be before or equal to end_date".into(),
        ));
    }
    let summaries =
        db::summary::queries_async::select_by_date_range(args.start_date, args.end_date, &pool)
            .await?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

#[get("date/{date}")]
pub async fn get_by_date(date: Path<Date>, pool: Data<Pool>) -> Result<Json<GetItem>, Error> {
    let date = date.into_inner();
    db::summary::queries_async::select_by_date(date, &pool)
        .await?
        .map(Into::into)
        .ok_or(Error::NotFound(format!("No summary found for date {date}")))
}

#[delete("date/{date}")]
pub async fn delete_by_date(date: Path<Date>, pool: Data<Pool>) -> Result<Json<Value>, Error> {
    let date = date.into_inner();
    let deleted = db::summary::queries_async::delete_by_date(date, &pool).await?;
    if !deleted {
        return Err(Error::NotFound(format!("No summary found for date {date}")));
    }
    Ok(Json(json!({
        "message": "Summary deleted successfully",
        "detail": format!("Summary for {date} has been removed"),
    })))
}

#[cfg(test)]
mod test {
    use crate::error;
    use crate::test::mock_state;
    use crate::Result;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web::{scope, Data, JsonConfig, PathConfig, QueryConfig};
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use time::macros::date;
    use time::OffsetDateTime;

    fn mock_body(date: &str) -> Value {
        json!({
            "date": date,
            "rooms_total": 20,
            "rooms_occupied": 15,
            "rooms_available": 5,
            "cash_collected": 1500.0,
            "momo_collected": 450.5,
            "total_collected": 1950.5,
            "expected_balance": 1800.0,
            "expenses_logged": 150.5,
        })
    }

    macro_rules! mock_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new($state.pool.clone()))
                    .app_data(QueryConfig::default().error_handler(error::query_error_handler))
                    .app_data(JsonConfig::default().error_handler(error::json_error_handler))
                    .app_data(PathConfig::default().error_handler(error::path_error_handler))
                    .service(
                        scope("summary")
                            .service(super::post)
                            .service(super::get_today)
                            .service(super::get_latest)
                            .service(super::get_history)
                            .service(super::get_range)
                            .service(super::get_by_date)
                            .service(super::delete_by_date),
                    ),
            )
        };
    }

    #[test]
    async fn post_creates_summary() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::post()
            .uri("/summary")
            .set_json(mock_body("2024-01-01"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::CREATED, res.status());
        let body: super::GetItem = test::read_body_json(res).await;
        assert_eq!(date!(2024 - 01 - 01), body.date);
        assert_eq!(20, body.rooms_total);
        assert_eq!(1950.5, body.total_collected);
        assert!(!body.id.is_empty());
        Ok(())
    }

    #[test]
    async fn post_overwrites_same_date() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::post()
            .uri("/summary")
            .set_json(mock_body("2024-01-01"))
            .to_request();
        let first: super::GetItem =
            test::read_body_json(test::call_service(&app, req).await).await;

        let mut body = mock_body("2024-01-01");
        body["rooms_occupied"] = json!(9);
        body["cash_collected"] = json!(2500.0);
        let req = TestRequest::post().uri("/summary").set_json(body).to_request();
        let second: super::GetItem =
            test::read_body_json(test::call_service(&app, req).await).await;

        assert_eq!(first.id, second.id);
        assert_eq!(9, second.rooms_occupied);
        assert_eq!(2500.0, second.cash_collected);

        let req = TestRequest::get().uri("/summary/history").to_request();
        let res: Vec<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(1, res.len());
        assert_eq!(second, res[0]);
        assert_eq!(1, crate::db::summary::queries::select_count(&state.conn)?);
        Ok(())
    }

    #[test]
    async fn post_rejects_missing_field() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let mut body = mock_body("2024-01-01");
        body.as_object_mut().unwrap().remove("expenses_logged");
        let req = TestRequest::post().uri("/summary").set_json(body).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        Ok(())
    }

    #[test]
    async fn get_today() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::get().uri("/summary/today").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());

        let today = OffsetDateTime::now_utc().date();
        let req = TestRequest::post()
            .uri("/summary")
            .set_json(mock_body(&today.to_string()))
            .to_request();
        test::call_service(&app, req).await;

        let req = TestRequest::get().uri("/summary/today").to_request();
        let res: super::GetItem = test::call_and_read_body_json(&app, req).await;
        assert_eq!(today, res.date);
        Ok(())
    }

    #[test]
    async fn get_latest() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::get().uri("/summary/latest").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());

        for date in ["2024-01-01", "2024-01-03", "2024-01-02"] {
            let req = TestRequest::post()
                .uri("/summary")
                .set_json(mock_body(date))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = TestRequest::get().uri("/summary/latest").to_request();
        let res: super::GetItem = test::call_and_read_body_json(&app, req).await;
        assert_eq!(date!(2024 - 01 - 03), res.date);
        Ok(())
    }

    #[test]
    async fn get_history_pages_descending() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            let req = TestRequest::post()
                .uri("/summary")
                .set_json(mock_body(date))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = TestRequest::get()
            .uri("/summary/history?limit=2&offset=1")
            .to_request();
        let res: Vec<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(2, res.len());
        assert_eq!(date!(2024 - 01 - 02), res[0].date);
        assert_eq!(date!(2024 - 01 - 01), res[1].date);

        let req = TestRequest::get().uri("/summary/history").to_request();
        let res: Vec<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(3, res.len());
        Ok(())
    }

    #[test]
    async fn get_history_rejects_bad_paging() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        for uri in [
            "/summary/history?limit=0",
            "/summary/history?limit=101",
            "/summary/history?offset=-1",
        ] {
            let req = TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(StatusCode::BAD_REQUEST, res.status());
        }
        Ok(())
    }

    #[test]
    async fn get_range() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            let req = TestRequest::post()
                .uri("/summary")
                .set_json(mock_body(date))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = TestRequest::get()
            .uri("/summary/range?start_date=2024-01-01&end_date=2024-01-02")
            .to_request();
        let res: Vec<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(2, res.len());
        assert_eq!(date!(2024 - 01 - 02), res[0].date);
        assert_eq!(date!(2024 - 01 - 01), res[1].date);
        Ok(())
    }

    #[test]
    async fn get_range_rejects_inverted_bounds() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::get()
            .uri("/summary/range?start_date=2024-01-02&end_date=2024-01-01")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        Ok(())
    }

    #[test]
    async fn get_range_rejects_missing_bounds() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::get()
            .uri("/summary/range?start_date=2024-01-01")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        Ok(())
    }

    #[test]
    async fn get_by_date() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::post()
            .uri("/summary")
            .set_json(mock_body("2024-01-01"))
            .to_request();
        test::call_service(&app, req).await;

        let req = TestRequest::get().uri("/summary/date/2024-01-01").to_request();
        let res: super::GetItem = test::call_and_read_body_json(&app, req).await;
        assert_eq!(date!(2024 - 01 - 01), res.date);

        let req = TestRequest::get().uri("/summary/date/2024-01-02").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());

        let req = TestRequest::get().uri("/summary/date/not-a-date").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        Ok(())
    }

    #[test]
    async fn delete_by_date() -> Result<()> {
        let state = mock_state();
        let app = mock_app!(state).await;
        let req = TestRequest::delete()
            .uri("/summary/date/2024-01-01")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());

        let req = TestRequest::post()
            .uri("/summary")
            .set_json(mock_body("2024-01-01"))
            .to_request();
        test::call_service(&app, req).await;

        let req = TestRequest::delete()
            .uri("/summary/date/2024-01-01")
            .to_request();
        let res: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!("Summary deleted successfully", res["message"]);
        assert_eq!(
            "Summary for 2024-01-01 has been removed",
            res["detail"],
        );

        let req = TestRequest::get().uri("/summary/date/2024-01-01").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());
        Ok(())
    }
}
