use crate::error::AppError;
use crate::models::Theme;
use rusqlite::Connection;

const THEME_KEY: &str = "theme";

/// Loads a raw setting value
pub fn load_setting(conn: &Connection, key: &str) -> Result<Option<String>, AppError> {
    let result = conn.query_row(
        "SELECT value FROM app_settings WHERE key = ?1",
        [key],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Saves or updates a raw setting value
pub fn save_setting(conn: &Connection, key: &str, value: &str) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO app_settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        (key, value),
    )?;
    Ok(())
}

/// Loads the stored theme; unknown or missing values fall back to the default
pub fn load_theme(conn: &Connection) -> Result<Theme, AppError> {
    let stored = load_setting(conn, THEME_KEY)?;
    Ok(match stored.as_deref().and_then(Theme::from_str) {
        Some(theme) => theme,
        None => {
            if let Some(raw) = stored {
                log::warn!("Ignoring unknown theme '{}'", raw);
            }
            Theme::default()
        }
    })
}

pub fn save_theme(conn: &Connection, theme: Theme) -> Result<(), AppError> {
    save_setting(conn, THEME_KEY, theme.as_str())?;
    log::info!("Theme set to {}", theme.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_default_theme() {
        assert_eq!(load_theme(&conn()).unwrap(), Theme::Light);
    }

    #[test]
    fn test_save_and_reload_theme() {
        let conn = conn();
        save_theme(&conn, Theme::Dark).unwrap();
        assert_eq!(load_theme(&conn).unwrap(), Theme::Dark);

        save_theme(&conn, Theme::Light).unwrap();
        assert_eq!(load_theme(&conn).unwrap(), Theme::Light);

        let rows: i32 = conn
            .query_row("SELECT COUNT(*) FROM app_settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let conn = conn();
        save_setting(&conn, THEME_KEY, "sepia").unwrap();
        assert_eq!(load_theme(&conn).unwrap(), Theme::Light);
    }
}
