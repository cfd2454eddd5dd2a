// ==========================================
// 机队维修适航跟踪系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等建表（无独立迁移工具）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS aircraft (
            aircraft_id TEXT PRIMARY KEY,
            registration TEXT NOT NULL UNIQUE,
            aircraft_type TEXT NOT NULL,
            current_hours REAL NOT NULL DEFAULT 0,
            current_cycles INTEGER NOT NULL DEFAULT 0,
            as_of_date TEXT NOT NULL,
            avg_daily_hours REAL NOT NULL DEFAULT 0,
            avg_daily_cycles REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS maintenance_item (
            item_id TEXT PRIMARY KEY,
            aircraft_id TEXT NOT NULL REFERENCES aircraft(aircraft_id) ON DELETE CASCADE,
            kind TEXT NOT NULL DEFAULT 'TASK',
            title TEXT NOT NULL,
            reference TEXT,
            due_units TEXT NOT NULL DEFAULT '',
            initial_hrs REAL,
            initial_cyc REAL,
            initial_days REAL,
            repeat_hrs REAL,
            repeat_cyc REAL,
            repeat_days REAL,
            legacy_hrs REAL,
            legacy_cyc REAL,
            legacy_days REAL,
            last_done_date TEXT,
            last_done_hrs REAL,
            last_done_cyc INTEGER,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_maintenance_item_aircraft
            ON maintenance_item(aircraft_id);

        CREATE TABLE IF NOT EXISTS compliance_record (
            record_id TEXT PRIMARY KEY,
            item_id TEXT NOT NULL REFERENCES maintenance_item(item_id) ON DELETE CASCADE,
            aircraft_id TEXT NOT NULL REFERENCES aircraft(aircraft_id) ON DELETE CASCADE,
            done_date TEXT NOT NULL,
            hours_at_completion REAL,
            cycles_at_completion INTEGER,
            remarks TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_compliance_record_aircraft_item
            ON compliance_record(aircraft_id, item_id);

        CREATE TABLE IF NOT EXISTS deferred_defect (
            defect_id TEXT PRIMARY KEY,
            aircraft_id TEXT NOT NULL REFERENCES aircraft(aircraft_id) ON DELETE CASCADE,
            description TEXT NOT NULL,
            mel_reference TEXT,
            category TEXT NOT NULL,
            raised_date TEXT NOT NULL,
            deferral_days INTEGER NOT NULL,
            expiry_date TEXT NOT NULL,
            closed_date TEXT
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
