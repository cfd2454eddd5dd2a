// ==========================================
// 机队维修适航跟踪系统 - 维修项目仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约定: due_units 以逗号分隔字符串存储
// ==========================================

use crate::domain::dates::parse_optional_date;
use crate::domain::item::{IntervalSpec, LastDoneBaseline, MaintainableItem, UnitIntervals};
use crate::domain::types::{DueUnit, ItemKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    item_id, aircraft_id, kind, title, reference, due_units,
    initial_hrs, initial_cyc, initial_days,
    repeat_hrs, repeat_cyc, repeat_days,
    legacy_hrs, legacy_cyc, legacy_days,
    last_done_date, last_done_hrs, last_done_cyc
"#;

// ==========================================
// MaintenanceItemRepository - 维修项目仓储
// ==========================================
pub struct MaintenanceItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceItemRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新单个项目
    pub fn upsert(&self, item: &MaintainableItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        upsert_with_conn(&conn, item)
    }

    /// 批量插入或更新（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn batch_upsert(&self, items: &[MaintainableItem]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        for item in items {
            upsert_with_conn(&tx, item)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(items.len())
    }

    /// 按主键查询
    pub fn get(&self, item_id: &str) -> RepositoryResult<Option<MaintainableItem>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM maintenance_item WHERE item_id = ?1", SELECT_COLUMNS);
        let result = conn.query_row(&sql, params![item_id], map_item_row);

        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询某飞机的全部项目
    pub fn list_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<Vec<MaintainableItem>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_item WHERE aircraft_id = ?1 ORDER BY item_id",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![aircraft_id], map_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// 查询全部项目
    pub fn list(&self) -> RepositoryResult<Vec<MaintainableItem>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_item ORDER BY aircraft_id, item_id",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map([], map_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// 删除项目（级联删除其履历）
    pub fn delete(&self, item_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM maintenance_item WHERE item_id = ?1",
            params![item_id],
        )?;
        Ok(affected)
    }
}

fn join_units(units: &[DueUnit]) -> String {
    units
        .iter()
        .map(|u| u.to_db_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn upsert_with_conn(conn: &Connection, item: &MaintainableItem) -> RepositoryResult<()> {
    let iv = &item.intervals;
    conn.execute(
        r#"
        INSERT INTO maintenance_item (
            item_id, aircraft_id, kind, title, reference, due_units,
            initial_hrs, initial_cyc, initial_days,
            repeat_hrs, repeat_cyc, repeat_days,
            legacy_hrs, legacy_cyc, legacy_days,
            last_done_date, last_done_hrs, last_done_cyc, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, datetime('now'))
        ON CONFLICT(item_id) DO UPDATE SET
            aircraft_id = excluded.aircraft_id,
            kind = excluded.kind,
            title = excluded.title,
            reference = excluded.reference,
            due_units = excluded.due_units,
            initial_hrs = excluded.initial_hrs,
            initial_cyc = excluded.initial_cyc,
            initial_days = excluded.initial_days,
            repeat_hrs = excluded.repeat_hrs,
            repeat_cyc = excluded.repeat_cyc,
            repeat_days = excluded.repeat_days,
            legacy_hrs = excluded.legacy_hrs,
            legacy_cyc = excluded.legacy_cyc,
            legacy_days = excluded.legacy_days,
            last_done_date = excluded.last_done_date,
            last_done_hrs = excluded.last_done_hrs,
            last_done_cyc = excluded.last_done_cyc,
            updated_at = datetime('now')
        "#,
        params![
            item.item_id,
            item.aircraft_id,
            item.kind.to_db_str(),
            item.title,
            item.reference,
            join_units(&iv.due_units),
            iv.initial.hours,
            iv.initial.cycles,
            iv.initial.days,
            iv.repeat.hours,
            iv.repeat.cycles,
            iv.repeat.days,
            iv.legacy.hours,
            iv.legacy.cycles,
            iv.legacy.days,
            item.baseline.date.map(|d| d.to_string()),
            item.baseline.hours,
            item.baseline.cycles,
        ],
    )?;
    Ok(())
}

fn map_item_row(row: &Row) -> rusqlite::Result<MaintainableItem> {
    let item_id: String = row.get(0)?;
    let raw_units: String = row.get(5)?;
    let raw_date: Option<String> = row.get(15)?;

    Ok(MaintainableItem {
        aircraft_id: row.get(1)?,
        kind: ItemKind::from_str(&row.get::<_, String>(2)?),
        title: row.get(3)?,
        reference: row.get(4)?,
        intervals: IntervalSpec {
            initial: UnitIntervals::new(row.get(6)?, row.get(7)?, row.get(8)?),
            repeat: UnitIntervals::new(row.get(9)?, row.get(10)?, row.get(11)?),
            legacy: UnitIntervals::new(row.get(12)?, row.get(13)?, row.get(14)?),
            due_units: DueUnit::parse_list(&raw_units),
        },
        baseline: LastDoneBaseline {
            date: parse_optional_date(raw_date.as_deref(), "last_done_date", &item_id),
            hours: row.get(16)?,
            cycles: row.get(17)?,
        },
        item_id,
    })
}
