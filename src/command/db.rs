use crate::conf::Conf;
use crate::error::Error;
use crate::Result;
use include_dir::include_dir;
use include_dir::Dir;
use rusqlite::Connection;
use std::fmt;
use std::fs::remove_file;
use tracing::{info, warn};

static MIGRATIONS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/migrations");

struct Migration(i16, String);

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            self.0,
            self.1
                .replace("\n", "")
                .replace("    ", "")
                .replace(";", "; "),
        )
    }
}

pub fn run(args: &[String], db: Connection) -> Result<()> {
    let first_arg = match args.first() {
        Some(some) => some,
        None => Err(Error::CLI("No DB actions passed".into()))?,
    };

    match first_arg.as_str() {
        // Migrations run on every start, nothing left to do here
        "migrate" => {}
        "drop" => drop(db)?,
        _ => Err(Error::CLI(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

pub fn migrate(db: &mut Connection) -> Result<()> {
    execute_migrations(&get_migrations()?, db)
}

pub fn open_connection(conf: &Conf) -> Result<Connection> {
    let conn = Connection::open(&conf.database_url)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(conn)
}

fn execute_migrations(migrations: &[Migration], db: &mut Connection) -> Result<()> {
    let mut schema_ver: i16 =
        db.query_row("SELECT user_version FROM pragma_user_version", [], |row| {
            row.get(0)
        })?;

    let new_migrations: Vec<&Migration> =
        migrations.iter().filter(|it| it.0 > schema_ver).collect();

    for migration in new_migrations {
        warn!("Found new migration: {migration}");
        let tx = db.transaction()?;
        tx.execute_batch(&migration.1)?;
        tx.execute_batch(&format!("PRAGMA user_version={}", migration.0))?;
        tx.commit()?;
        schema_ver = migration.0;
    }

    info!("Database schema is up to date (version {schema_ver})");

    Ok(())
}

fn drop(db: Connection) -> Result<()> {
    remove_file(
        db.path()
            .ok_or(Error::Generic("Failed to find database path".into()))?,
    )?;
    info!("Database file was removed");
    Ok(())
}

fn get_migrations() -> Result<Vec<Migration>> {
    let mut index = 1;
    let mut res = vec![];

    loop {
        let file_name = format!("{index}.sql");
        let file = MIGRATIONS_DIR.get_file(&file_name);
        match file {
            Some(file) => {
                let sql = file.contents_utf8().ok_or(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Can't read {file_name} in UTF-8"),
                ))?;

                res.push(Migration(index, sql.to_string()));

                index += 1;
            }
            None => {
                break;
            }
        }
    }

    Ok(res)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn run_migrations() {
        let mut db = Connection::open_in_memory().unwrap();
        let mut migrations = vec![Migration(1, "CREATE TABLE foo(bar);".into())];
        execute_migrations(&migrations, &mut db).unwrap();

        let schema_ver: i16 = db
            .query_row("SELECT user_version FROM pragma_user_version", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(1, schema_ver);

        migrations.push(Migration(
            2,
            "INSERT INTO foo (bar) values ('qwerty');".into(),
        ));
        execute_migrations(&migrations, &mut db).unwrap();

        let schema_ver: i16 = db
            .query_row("SELECT user_version FROM pragma_user_version", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(2, schema_ver);
    }

    #[test]
    fn embedded_migrations_create_summary_table() {
        let mut db = Connection::open_in_memory().unwrap();
        migrate(&mut db).unwrap();
        let count: i64 = db
            .query_row("SELECT count(*) FROM summary", [], |row| row.get(0))
            .unwrap();
        assert_eq!(0, count);
    }
}
