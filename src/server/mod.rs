use crate::conf::Conf;
use crate::db;
use crate::rest;
use crate::{error, Result};
use actix_cors::Cors;
use actix_web::dev::Service;
use actix_web::http::header;
use actix_web::middleware::{Compress, NormalizePath};
use actix_web::web::{scope, Data, JsonConfig, PathConfig, QueryConfig};
use actix_web::{App, HttpServer};
use futures_util::future::FutureExt;
use time::OffsetDateTime;
use tracing::info;

pub async fn run(conf: Conf) -> Result<()> {
    // All the worker threads are sharing a single connection pool
    let pool = db::pool(&conf)?;
    let bind_addr = (conf.host.clone(), conf.port);

    info!(
        host = bind_addr.0,
        port = bind_addr.1,
        "Starting HTTP server",
    );

    HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let req_query_string = req.query_string().to_string();
                let req_method = req.method().as_str().to_string();
                let req_path = req.path().to_string();
                let req_time = OffsetDateTime::now_utc();
                srv.call(req).map(move |res| {
                    if let Ok(res) = res.as_ref() {
                        let res_status = res.status().as_u16();
                        info!(
                            req_method,
                            req_path,
                            req_query_string,
                            res_status,
                            res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64(),
                        );
                    }
                    res
                })
            })
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .wrap(cors(&conf.allowed_origins))
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(conf.clone()))
            .app_data(QueryConfig::default().error_handler(error::query_error_handler))
            .app_data(JsonConfig::default().error_handler(error::json_error_handler))
            .app_data(PathConfig::default().error_handler(error::path_error_handler))
            .service(rest::status::get_root)
            .service(rest::status::get_health)
            .service(
                scope("summary")
                    .service(rest::summaries::post)
                    .service(rest::summaries::get_today)
                    .service(rest::summaries::get_latest)
                    .service(rest::summaries::get_history)
                    .service(rest::summaries::get_range)
                    .service(rest::summaries::get_by_date)
                    .service(rest::summaries::delete_by_date),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}

fn cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .expose_any_header()
        .supports_credentials()
        .max_age(3600);
    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}
