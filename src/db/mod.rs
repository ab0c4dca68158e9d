pub mod summary;

use crate::conf::Conf;
use crate::Result;
use deadpool_sqlite::{Config, Hook, Pool, Runtime};

pub fn pool(conf: &Conf) -> Result<Pool> {
    let pool = Config::new(conf.database_url.as_str())
        .builder(Runtime::Tokio1)?
        .max_size(conf.db_pool_size)
        .post_create(Hook::Fn(Box::new(|conn, _| {
            let conn = conn.lock().unwrap();
            conn.pragma_update(None, "journal_mode", "WAL").unwrap();
            conn.pragma_update(None, "synchronous", "NORMAL").unwrap();
            Ok(())
        })))
        .build()?;
    Ok(pool)
}
