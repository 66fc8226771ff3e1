use log::{info, warn};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement};
use std::fs;
use std::path::Path;

use crate::config::AppConfig;

const SQLITE_SCHEMA: &str = include_str!("../schema-sqlite.sql");

pub async fn connect_db(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let url = config.database_url();
    if let Err(e) = ensure_sqlite_dir(&url) {
        warn!("could not create sqlite directory for {}: {}", url, e);
    }
    let mut opt = ConnectOptions::new(url);
    opt.sqlx_logging(false);
    let db = Database::connect(opt).await?;
    init_sqlite_schema(&db).await?;
    Ok(db)
}

fn ensure_sqlite_dir(url: &str) -> std::io::Result<()> {
    let Some(rest) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

async fn init_sqlite_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    if backend != DbBackend::Sqlite {
        // other backends are migrated out of band
        return Ok(());
    }
    for stmt in split_sql(SQLITE_SCHEMA) {
        db.execute(Statement::from_string(backend, stmt)).await?;
    }
    info!("sqlite schema ready");
    Ok(())
}

fn split_sql(input: &str) -> Vec<String> {
    let mut buf = String::new();
    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }
        buf.push_str(line);
        buf.push('\n');
    }
    buf.split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Single-connection in-memory store with the schema applied.
#[cfg(test)]
pub async fn connect_memory() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("memory db");
    init_sqlite_schema(&db).await.expect("schema");
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sql_drops_comments_and_blanks() {
        let stmts = split_sql("-- head\nCREATE TABLE a (id INT);\n\n  -- x\nCREATE TABLE b (id INT);\n");
        assert_eq!(stmts, vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]);
    }

    #[test]
    fn bundled_schema_has_every_table() {
        let stmts = split_sql(SQLITE_SCHEMA);
        for table in [
            "t_user",
            "t_project",
            "t_contributor",
            "t_contributor_relationship",
            "t_project_relationship",
            "t_user_relationship",
            "t_comment",
        ] {
            let needle = format!("CREATE TABLE IF NOT EXISTS {} ", table);
            assert!(stmts.iter().any(|s| s.starts_with(&needle)), "missing {}", table);
        }
    }

    #[test]
    fn sqlite_dir_failures_are_reported() {
        let base = std::env::temp_dir().join(format!("projecthub-db-{}", std::process::id()));
        fs::create_dir_all(&base).unwrap();
        let blocker = base.join("file");
        fs::write(&blocker, b"x").unwrap();

        let nested = base.join("nested").join("app.sqlite");
        assert!(ensure_sqlite_dir(&format!("sqlite://{}?mode=rwc", nested.display())).is_ok());
        assert!(base.join("nested").is_dir());

        let under_file = blocker.join("app.sqlite");
        assert!(ensure_sqlite_dir(&format!("sqlite://{}", under_file.display())).is_err());
        assert!(ensure_sqlite_dir("sqlite::memory:").is_ok());

        fs::remove_dir_all(&base).unwrap();
    }

    #[actix_web::test]
    async fn schema_is_idempotent() {
        let db = connect_memory().await;
        init_sqlite_schema(&db).await.unwrap();
    }
}
