// ==========================================
// 机队维修适航跟踪系统 - 完成履历仓储
// ==========================================
// 红线: 履历只追加，不修改
// ==========================================

use crate::domain::compliance::ComplianceRecord;
use crate::domain::dates::parse_date_lenient;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ComplianceRecordRepository - 完成履历仓储
// ==========================================
pub struct ComplianceRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ComplianceRecordRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条完成记录
    pub fn append(&self, record: &ComplianceRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO compliance_record (
                record_id, item_id, aircraft_id, done_date,
                hours_at_completion, cycles_at_completion, remarks
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.record_id,
                record.item_id,
                record.aircraft_id,
                record.date.to_string(),
                record.hours_at_completion,
                record.cycles_at_completion,
                record.remarks,
            ],
        )?;
        Ok(())
    }

    /// 查询某飞机的全部履历（按日期升序）
    pub fn list_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<Vec<ComplianceRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT record_id, item_id, aircraft_id, done_date,
                   hours_at_completion, cycles_at_completion, remarks
            FROM compliance_record
            WHERE aircraft_id = ?1
            ORDER BY done_date, record_id
            "#,
        )?;
        let rows = stmt.query_map(params![aircraft_id], map_compliance_row)?;
        collect_records(rows)
    }

    /// 查询某项目在某飞机上的履历
    pub fn list_for_item(
        &self,
        item_id: &str,
        aircraft_id: &str,
    ) -> RepositoryResult<Vec<ComplianceRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT record_id, item_id, aircraft_id, done_date,
                   hours_at_completion, cycles_at_completion, remarks
            FROM compliance_record
            WHERE item_id = ?1 AND aircraft_id = ?2
            ORDER BY done_date, record_id
            "#,
        )?;
        let rows = stmt.query_map(params![item_id, aircraft_id], map_compliance_row)?;
        collect_records(rows)
    }
}

// ==========================================
// ComplianceRow - 数据库行（日期未解析）
// ==========================================
struct ComplianceRow {
    record_id: String,
    item_id: String,
    aircraft_id: String,
    done_date: String,
    hours_at_completion: Option<f64>,
    cycles_at_completion: Option<i64>,
    remarks: Option<String>,
}

impl ComplianceRow {
    /// 转换为领域记录；done_date 不可解析时返回 None
    fn into_record(self) -> Option<ComplianceRecord> {
        let Some(date) = parse_date_lenient(&self.done_date) else {
            tracing::warn!(
                record_id = %self.record_id,
                item_id = %self.item_id,
                done_date = %self.done_date,
                "完成日期无法解析，忽略该条履历"
            );
            return None;
        };

        Some(ComplianceRecord {
            record_id: self.record_id,
            item_id: self.item_id,
            aircraft_id: self.aircraft_id,
            date,
            hours_at_completion: self.hours_at_completion,
            cycles_at_completion: self.cycles_at_completion,
            remarks: self.remarks,
        })
    }
}

fn map_compliance_row(row: &Row) -> rusqlite::Result<ComplianceRow> {
    Ok(ComplianceRow {
        record_id: row.get(0)?,
        item_id: row.get(1)?,
        aircraft_id: row.get(2)?,
        done_date: row.get(3)?,
        hours_at_completion: row.get(4)?,
        cycles_at_completion: row.get(5)?,
        remarks: row.get(6)?,
    })
}

// 坏日期的履历被跳过，项目回退到静态基线，不影响整机清单
fn collect_records(
    rows: impl Iterator<Item = rusqlite::Result<ComplianceRow>>,
) -> RepositoryResult<Vec<ComplianceRecord>> {
    let mut records = Vec::new();
    for row in rows {
        if let Some(record) = row?.into_record() {
            records.push(record);
        }
    }
    Ok(records)
}
