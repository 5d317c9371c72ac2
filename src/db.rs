// ==========================================
// 集装箱船配载分析 - SQLite 连接初始化
// ==========================================
// 用途: 配置存储 (config_kv) 的连接打开与建表
// 目标: 统一 busy_timeout,统一建表语句
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 配置库路径环境变量
pub const CONFIG_DB_ENV: &str = "STOWAGE_ANALYSIS_CONFIG_DB";

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一参数
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建 config_kv 表（幂等）
pub fn ensure_config_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

/// 默认配置库路径
///
/// # 优先级
/// 1. 环境变量 STOWAGE_ANALYSIS_CONFIG_DB
/// 2. 用户数据目录/stowage-analysis/config.db
/// 3. 当前目录 ./stowage_analysis_config.db
pub fn get_default_config_db_path() -> String {
    if let Ok(path) = std::env::var(CONFIG_DB_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./stowage_analysis_config.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("stowage-analysis");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("config.db");
        }
    }
    path.to_string_lossy().to_string()
}
