// ==========================================
// 机队维修适航跟踪系统 - 飞机数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::aircraft::Aircraft;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    aircraft_id, registration, aircraft_type,
    current_hours, current_cycles, as_of_date,
    avg_daily_hours, avg_daily_cycles
"#;

// ==========================================
// AircraftRepository - 飞机仓储
// ==========================================
/// 职责: 管理 aircraft 表（含利用率快照字段）
pub struct AircraftRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AircraftRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新飞机（按 aircraft_id）
    pub fn upsert(&self, aircraft: &Aircraft) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO aircraft (
                aircraft_id, registration, aircraft_type,
                current_hours, current_cycles, as_of_date,
                avg_daily_hours, avg_daily_cycles, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))
            ON CONFLICT(aircraft_id) DO UPDATE SET
                registration = excluded.registration,
                aircraft_type = excluded.aircraft_type,
                current_hours = excluded.current_hours,
                current_cycles = excluded.current_cycles,
                as_of_date = excluded.as_of_date,
                avg_daily_hours = excluded.avg_daily_hours,
                avg_daily_cycles = excluded.avg_daily_cycles,
                updated_at = datetime('now')
            "#,
            params![
                aircraft.aircraft_id,
                aircraft.registration,
                aircraft.aircraft_type,
                aircraft.current_hours,
                aircraft.current_cycles,
                aircraft.current_date.to_string(),
                aircraft.avg_daily_hours,
                aircraft.avg_daily_cycles,
            ],
        )?;
        Ok(())
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Aircraft)): 找到
    /// - Ok(None): 未找到
    pub fn get(&self, aircraft_id: &str) -> RepositoryResult<Option<Aircraft>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM aircraft WHERE aircraft_id = ?1", SELECT_COLUMNS);
        let result = conn.query_row(&sql, params![aircraft_id], map_raw_row);

        match result {
            Ok(raw) => Ok(Some(raw.into_aircraft()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按注册号查询
    pub fn get_by_registration(&self, registration: &str) -> RepositoryResult<Option<Aircraft>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM aircraft WHERE registration = ?1", SELECT_COLUMNS);
        let result = conn.query_row(&sql, params![registration], map_raw_row);

        match result {
            Ok(raw) => Ok(Some(raw.into_aircraft()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部飞机（按注册号排序）
    pub fn list(&self) -> RepositoryResult<Vec<Aircraft>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM aircraft ORDER BY registration", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_raw_row)?;

        let mut fleet = Vec::new();
        for row in rows {
            fleet.push(row?.into_aircraft()?);
        }
        Ok(fleet)
    }

    /// 删除飞机（级联删除项目、履历、保留故障）
    pub fn delete(&self, aircraft_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM aircraft WHERE aircraft_id = ?1", params![aircraft_id])?;
        Ok(affected)
    }
}

// 日期列在 SQLite 中为 TEXT，映射时先取原值再校验
struct AircraftRow {
    aircraft_id: String,
    registration: String,
    aircraft_type: String,
    current_hours: f64,
    current_cycles: i64,
    as_of_date: String,
    avg_daily_hours: f64,
    avg_daily_cycles: f64,
}

impl AircraftRow {
    fn into_aircraft(self) -> RepositoryResult<Aircraft> {
        let current_date = NaiveDate::parse_from_str(&self.as_of_date, "%Y-%m-%d").map_err(|e| {
            RepositoryError::FieldValueError {
                field: "as_of_date".to_string(),
                message: format!("aircraft_id={}: {}", self.aircraft_id, e),
            }
        })?;

        Ok(Aircraft {
            aircraft_id: self.aircraft_id,
            registration: self.registration,
            aircraft_type: self.aircraft_type,
            current_hours: self.current_hours,
            current_cycles: self.current_cycles,
            current_date,
            avg_daily_hours: self.avg_daily_hours,
            avg_daily_cycles: self.avg_daily_cycles,
        })
    }
}

fn map_raw_row(row: &Row) -> rusqlite::Result<AircraftRow> {
    Ok(AircraftRow {
        aircraft_id: row.get(0)?,
        registration: row.get(1)?,
        aircraft_type: row.get(2)?,
        current_hours: row.get(3)?,
        current_cycles: row.get(4)?,
        as_of_date: row.get(5)?,
        avg_daily_hours: row.get(6)?,
        avg_daily_cycles: row.get(7)?,
    })
}
