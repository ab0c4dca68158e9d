pub use error::ApiError;
pub use error::Error;
mod command;
mod conf;
mod db;
mod error;
mod rest;
mod server;
use crate::conf::Conf;
use std::env;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let conf = Conf::from_env()?;
    init_logging(&conf);

    let mut db = command::db::open_connection(&conf)?;
    command::db::migrate(&mut db)?;

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str).unwrap_or("server") {
        "server" => server::run(conf).await?,
        "db" => command::db::run(&args[2..], db)?,
        first_arg => Err(Error::CLI(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

fn init_logging(conf: &Conf) {
    let default_directive = if conf.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
        )
        .init();
}
