use crate::conf::Conf;
use crate::db;
use crate::Error;
use actix_web::get;
use actix_web::web::Data;
use actix_web::web::Json;
use deadpool_sqlite::Pool;
use serde_json::json;
use serde_json::Value;

#[get("/")]
pub async fn get_root(conf: Data<Conf>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "message": conf.app_name,
        "version": conf.app_version,
    }))
}

// The count query doubles as a database liveness check
#[get("/health")]
pub async fn get_health(pool: Data<Pool>) -> Result<Json<Value>, Error> {
    let summaries = db::summary::queries_async::select_count(&pool).await?;
    Ok(Json(json!({
        "status": "healthy",
        "service": "backend-api",
        "summaries": summaries,
    })))
}
