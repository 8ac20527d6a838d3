pub mod schema;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::PathBuf;

/// Returns the path to the local settings database
pub fn get_database_path() -> PathBuf {
    PathBuf::from("./data/marketplace.db")
}

/// Opens the settings database and applies the schema
pub fn init_database() -> Result<Connection, AppError> {
    let db_path = get_database_path();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(&db_path)?;
    schema::init_schema(&conn)?;

    Ok(conn)
}
