// ==========================================
// 机队维修适航跟踪系统 - 保留故障仓储
// ==========================================

use crate::domain::deferral::DeferredDefect;
use crate::domain::types::DeferralCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    defect_id, aircraft_id, description, mel_reference, category,
    raised_date, deferral_days, expiry_date, closed_date
"#;

pub struct DeferredDefectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DeferredDefectRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新保留故障（按 defect_id）
    pub fn upsert(&self, defect: &DeferredDefect) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO deferred_defect (
                defect_id, aircraft_id, description, mel_reference, category,
                raised_date, deferral_days, expiry_date, closed_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(defect_id) DO UPDATE SET
                aircraft_id = excluded.aircraft_id,
                description = excluded.description,
                mel_reference = excluded.mel_reference,
                category = excluded.category,
                raised_date = excluded.raised_date,
                deferral_days = excluded.deferral_days,
                expiry_date = excluded.expiry_date,
                closed_date = excluded.closed_date
            "#,
            params![
                defect.defect_id,
                defect.aircraft_id,
                defect.description,
                defect.mel_reference,
                defect.category.to_db_str(),
                defect.raised_date.to_string(),
                defect.deferral_days,
                defect.expiry_date.to_string(),
                defect.closed_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, defect_id: &str) -> RepositoryResult<Option<DeferredDefect>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM deferred_defect WHERE defect_id = ?1", SELECT_COLUMNS);
        let result = conn.query_row(&sql, params![defect_id], map_raw_row);

        match result {
            Ok(raw) => Ok(Some(raw.into_defect()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询某飞机的全部保留故障（含已关闭）
    pub fn list_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<Vec<DeferredDefect>> {
        self.query_for_aircraft(aircraft_id, false)
    }

    /// 查询某飞机尚未关闭的保留故障（按到期日升序）
    pub fn list_open_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<Vec<DeferredDefect>> {
        self.query_for_aircraft(aircraft_id, true)
    }

    fn query_for_aircraft(
        &self,
        aircraft_id: &str,
        open_only: bool,
    ) -> RepositoryResult<Vec<DeferredDefect>> {
        let conn = self.get_conn()?;
        let open_filter = if open_only { "AND closed_date IS NULL" } else { "" };
        let sql = format!(
            "SELECT {} FROM deferred_defect WHERE aircraft_id = ?1 {} ORDER BY expiry_date, defect_id",
            SELECT_COLUMNS, open_filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![aircraft_id], map_raw_row)?;

        let mut defects = Vec::new();
        for row in rows {
            defects.push(row?.into_defect()?);
        }
        Ok(defects)
    }

    /// 关闭保留故障
    ///
    /// # 返回
    /// - Ok(true): 已关闭
    /// - Ok(false): 不存在或已关闭
    pub fn close(&self, defect_id: &str, closed_date: NaiveDate) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE deferred_defect SET closed_date = ?2 WHERE defect_id = ?1 AND closed_date IS NULL",
            params![defect_id, closed_date.to_string()],
        )?;
        Ok(affected > 0)
    }

    pub fn delete(&self, defect_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM deferred_defect WHERE defect_id = ?1", params![defect_id])?;
        Ok(affected)
    }
}

struct DefectRow {
    defect_id: String,
    aircraft_id: String,
    description: String,
    mel_reference: Option<String>,
    category: String,
    raised_date: String,
    deferral_days: i64,
    expiry_date: String,
    closed_date: Option<String>,
}

fn parse_date_field(raw: &str, field: &str, defect_id: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("defect_id={}: {}", defect_id, e),
    })
}

impl DefectRow {
    fn into_defect(self) -> RepositoryResult<DeferredDefect> {
        let category = DeferralCategory::from_str(&self.category).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "category".to_string(),
                message: format!("defect_id={}: 未知保留类别 {}", self.defect_id, self.category),
            }
        })?;
        let raised_date = parse_date_field(&self.raised_date, "raised_date", &self.defect_id)?;
        let expiry_date = parse_date_field(&self.expiry_date, "expiry_date", &self.defect_id)?;
        let closed_date = match self.closed_date.as_deref() {
            Some(raw) => Some(parse_date_field(raw, "closed_date", &self.defect_id)?),
            None => None,
        };

        Ok(DeferredDefect {
            defect_id: self.defect_id,
            aircraft_id: self.aircraft_id,
            description: self.description,
            mel_reference: self.mel_reference,
            category,
            raised_date,
            deferral_days: self.deferral_days,
            expiry_date,
            closed_date,
        })
    }
}

fn map_raw_row(row: &Row) -> rusqlite::Result<DefectRow> {
    Ok(DefectRow {
        defect_id: row.get(0)?,
        aircraft_id: row.get(1)?,
        description: row.get(2)?,
        mel_reference: row.get(3)?,
        category: row.get(4)?,
        raised_date: row.get(5)?,
        deferral_days: row.get(6)?,
        expiry_date: row.get(7)?,
        closed_date: row.get(8)?,
    })
}
