// ==========================================
// 机队维修适航跟踪系统 - 维修项目 CSV 导入器
// ==========================================
// 流程: 文件解析 → 按 kind 映射来源形状 → 归一化 → 校验飞机 → 批量写入
// 红线: 行级错误不中断整批，逐行记录行号与原因
// ==========================================

use crate::domain::item::{ComponentRecord, MaintainableItem, MonitoringRecord, TaskRecord};
use crate::domain::types::ItemKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, RawRow};
use crate::repository::{AircraftRepository, MaintenanceItemRepository};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::instrument;

/// 被拒绝的行
#[derive(Debug, Clone, Serialize)]
pub struct RowRejection {
    pub row: usize,
    pub reason: String,
}

/// 解析结果（成功项目 + 被拒绝行）
#[derive(Debug, Default)]
pub struct ItemImportOutcome {
    pub items: Vec<MaintainableItem>,
    pub rejected: Vec<RowRejection>,
}

/// 导入汇总
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub imported: usize,
    pub rejected: Vec<RowRejection>,
}

// ==========================================
// ItemCsvImporter
// ==========================================
pub struct ItemCsvImporter {
    parser: CsvParser,
}

impl Default for ItemCsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemCsvImporter {
    pub fn new() -> Self {
        Self { parser: CsvParser }
    }

    /// 解析 CSV 文件为归一化项目（不落库）
    pub fn parse_file(&self, path: &Path) -> ImportResult<ItemImportOutcome> {
        let rows = self.parser.parse_to_raw_records(path)?;
        Ok(Self::map_rows(&rows))
    }

    /// 解析任意读取源（测试与管道输入）
    pub fn parse_reader<R: std::io::Read>(&self, source: R) -> ImportResult<ItemImportOutcome> {
        let rows = self.parser.parse_reader(source)?;
        Ok(Self::map_rows(&rows))
    }

    fn map_rows(rows: &[RawRow]) -> ItemImportOutcome {
        let (numbered, rejected) = Self::map_numbered_rows(rows);
        ItemImportOutcome {
            items: numbered.into_iter().map(|(_, item)| item).collect(),
            rejected,
        }
    }

    // 成功项目保留来源行号，重复 id 时也能定位到正确的行
    fn map_numbered_rows(rows: &[RawRow]) -> (Vec<(usize, MaintainableItem)>, Vec<RowRejection>) {
        let mut items = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();
        for raw in rows {
            match map_row(raw) {
                Ok(item) => items.push((raw.row, item)),
                Err(e) => {
                    tracing::warn!(row = raw.row, error = %e, "导入行被拒绝");
                    rejected.push(RowRejection {
                        row: raw.row,
                        reason: e.to_string(),
                    });
                }
            }
        }
        (items, rejected)
    }

    /// 解析并写入数据库
    ///
    /// 关联飞机不存在的行被拒绝；其余项目单事务写入
    #[instrument(skip(self, aircraft_repo, item_repo), fields(path = %path.display()))]
    pub fn import_file(
        &self,
        path: &Path,
        aircraft_repo: &AircraftRepository,
        item_repo: &MaintenanceItemRepository,
    ) -> ImportResult<ImportSummary> {
        let rows = self.parser.parse_to_raw_records(path)?;
        let total_rows = rows.len();
        let (numbered, mut rejected) = Self::map_numbered_rows(&rows);

        // 逐机校验一次
        let mut known: HashMap<String, bool> = HashMap::new();
        let mut accepted = Vec::with_capacity(numbered.len());
        for (row, item) in numbered {
            let exists = match known.get(&item.aircraft_id) {
                Some(v) => *v,
                None => {
                    let v = aircraft_repo.get(&item.aircraft_id)?.is_some();
                    known.insert(item.aircraft_id.clone(), v);
                    v
                }
            };

            if exists {
                accepted.push(item);
            } else {
                let err = ImportError::UnknownAircraft {
                    row,
                    aircraft_id: item.aircraft_id.clone(),
                };
                tracing::warn!(row, item_id = %item.item_id, "导入行被拒绝: 飞机不存在");
                rejected.push(RowRejection {
                    row,
                    reason: err.to_string(),
                });
            }
        }

        let imported = item_repo.batch_upsert(&accepted)?;
        rejected.sort_by_key(|r| r.row);

        tracing::info!(
            total_rows,
            imported,
            rejected = rejected.len(),
            "维修项目导入完成"
        );

        Ok(ImportSummary {
            total_rows,
            imported,
            rejected,
        })
    }
}

// ==========================================
// 行映射
// ==========================================

const ID_KEYS: &[&str] = &["id", "item_id"];

fn parse_f64(raw: &RawRow, field: &str) -> ImportResult<Option<f64>> {
    match raw.get(field) {
        None => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ImportError::TypeConversionError {
                row: raw.row,
                field: field.to_string(),
                message: format!("{} ({})", e, v),
            }),
    }
}

// 计数列允许 "1200.0" 这类写法
fn parse_i64(raw: &RawRow, field: &str) -> ImportResult<Option<i64>> {
    match parse_f64(raw, field)? {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 && v.is_finite() => Ok(Some(v as i64)),
        Some(v) => Err(ImportError::TypeConversionError {
            row: raw.row,
            field: field.to_string(),
            message: format!("期望整数，实际 {}", v),
        }),
    }
}

fn text(raw: &RawRow, keys: &[&str]) -> Option<String> {
    raw.get_any(keys).map(str::to_string)
}

fn units(raw: &RawRow) -> Vec<String> {
    raw.get("due_units")
        .map(|v| {
            v.split(|c| c == ',' || c == ';' || c == '|')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn map_row(raw: &RawRow) -> ImportResult<MaintainableItem> {
    let id = text(raw, ID_KEYS).ok_or_else(|| ImportError::PrimaryKeyMissing {
        row: raw.row,
        field: "id".to_string(),
    })?;
    let aircraft_id = text(raw, &["aircraft_id"]).ok_or_else(|| ImportError::PrimaryKeyMissing {
        row: raw.row,
        field: "aircraft_id".to_string(),
    })?;
    let kind = ItemKind::from_str(raw.get("kind").unwrap_or("TASK"));

    let item = match kind {
        ItemKind::Task => MaintainableItem::from(TaskRecord {
            id,
            aircraft_id,
            title: text(raw, &["title", "description", "name"]).unwrap_or_default(),
            task_ref: text(raw, &["reference", "task_ref"]),
            due_units: units(raw),
            initial_interval_hrs: parse_f64(raw, "initial_interval_hrs")?,
            initial_interval_cyc: parse_f64(raw, "initial_interval_cyc")?,
            initial_interval_days: parse_f64(raw, "initial_interval_days")?,
            repeat_interval_hrs: parse_f64(raw, "repeat_interval_hrs")?,
            repeat_interval_cyc: parse_f64(raw, "repeat_interval_cyc")?,
            repeat_interval_days: parse_f64(raw, "repeat_interval_days")?,
            interval_hrs: parse_f64(raw, "interval_hrs")?,
            interval_cyc: parse_f64(raw, "interval_cyc")?,
            interval_days: parse_f64(raw, "interval_days")?,
            last_done_date: text(raw, &["last_done_date"]),
            last_done_hrs: parse_f64(raw, "last_done_hrs")?,
            last_done_cyc: parse_i64(raw, "last_done_cyc")?,
        }),
        ItemKind::Component => MaintainableItem::from(ComponentRecord {
            id,
            aircraft_id,
            description: text(raw, &["description", "title", "name"]).unwrap_or_default(),
            part_number: text(raw, &["part_number", "reference"]),
            serial_number: text(raw, &["serial_number"]),
            due_units: units(raw),
            initial_interval_hrs: parse_f64(raw, "initial_interval_hrs")?,
            initial_interval_cyc: parse_f64(raw, "initial_interval_cyc")?,
            initial_interval_days: parse_f64(raw, "initial_interval_days")?,
            repeat_interval_hrs: parse_f64(raw, "repeat_interval_hrs")?,
            repeat_interval_cyc: parse_f64(raw, "repeat_interval_cyc")?,
            repeat_interval_days: parse_f64(raw, "repeat_interval_days")?,
            interval_hrs: parse_f64(raw, "interval_hrs")?,
            interval_cyc: parse_f64(raw, "interval_cyc")?,
            interval_days: parse_f64(raw, "interval_days")?,
            installed_date: text(raw, &["installed_date"]),
            installed_at_ac_hrs: parse_f64(raw, "installed_at_ac_hrs")?,
            installed_at_ac_cyc: parse_i64(raw, "installed_at_ac_cyc")?,
            last_done_date: text(raw, &["last_done_date"]),
            last_done_hrs: parse_f64(raw, "last_done_hrs")?,
            last_done_cyc: parse_i64(raw, "last_done_cyc")?,
        }),
        monitoring => MaintainableItem::from(MonitoringRecord {
            id,
            aircraft_id,
            kind: monitoring.to_db_str().to_string(),
            name: text(raw, &["name", "title", "description"]).unwrap_or_default(),
            serial_number: text(raw, &["serial_number", "reference"]),
            last_checked_date: text(raw, &["last_checked_date", "last_done_date"]),
            validity_days: parse_f64(raw, "validity_days")?
                .or(parse_f64(raw, "interval_days")?),
        }),
    };

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::DueUnit;
    use chrono::NaiveDate;

    #[test]
    fn test_map_rows_by_kind() {
        let data = "\
id,aircraft_id,kind,title,due_units,repeat_interval_hrs,interval_days,last_done_date,last_done_hrs,part_number,serial_number,installed_date,installed_at_ac_hrs,validity_days
T1,AC1,TASK,Engine borescope,HOURS,500,,2024-01-10,1200,,,,,
C1,AC1,COMPONENT,Starter generator,HOURS,3000,,,,PN-1,SN-9,2023-05-01,800,
B1,AC1,BATTERY,ELT battery,,,,2024-02-01,,,,,,365
";
        let outcome = ItemCsvImporter::new().parse_reader(data.as_bytes()).unwrap();
        assert!(outcome.rejected.is_empty(), "{:?}", outcome.rejected);
        assert_eq!(outcome.items.len(), 3);

        let task = &outcome.items[0];
        assert_eq!(task.kind, ItemKind::Task);
        assert_eq!(task.intervals.due_units, vec![DueUnit::Hours]);
        assert_eq!(task.baseline.hours, Some(1200.0));

        let component = &outcome.items[1];
        assert_eq!(component.reference.as_deref(), Some("PN-1 S/N SN-9"));
        assert_eq!(component.baseline.hours, Some(800.0), "无送修记录时以装机为基线");
        assert_eq!(component.baseline.date, NaiveDate::from_ymd_opt(2023, 5, 1));

        let battery = &outcome.items[2];
        assert_eq!(battery.kind, ItemKind::Battery);
        assert_eq!(battery.intervals.legacy.days, Some(365.0));
    }

    #[test]
    fn test_row_errors_carry_row_numbers() {
        let data = "\
id,aircraft_id,title,repeat_interval_hrs,last_done_cyc
T1,AC1,Good,100,
,AC1,Missing id,100,
T3,AC1,Bad number,abc,
T4,AC1,Fractional cycles,100,12.5
";
        let outcome = ItemCsvImporter::new().parse_reader(data.as_bytes()).unwrap();
        assert_eq!(outcome.items.len(), 1);
        let rows: Vec<usize> = outcome.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![3, 4, 5]);
        assert!(outcome.rejected[1].reason.contains("repeat_interval_hrs"));
    }

    #[test]
    fn test_numbered_rows_keep_source_row_for_duplicate_ids() {
        let data = "\
id,aircraft_id,title,repeat_interval_hrs
T1,AC9,First copy,100
T2,AC1,Other,100
T1,AC1,Second copy,200
";
        let rows = CsvParser.parse_reader(data.as_bytes()).unwrap();
        let (numbered, rejected) = ItemCsvImporter::map_numbered_rows(&rows);
        assert!(rejected.is_empty());

        let found: Vec<(usize, &str, &str)> = numbered
            .iter()
            .map(|(row, item)| (*row, item.item_id.as_str(), item.aircraft_id.as_str()))
            .collect();
        assert_eq!(found, vec![(2, "T1", "AC9"), (3, "T2", "AC1"), (4, "T1", "AC1")]);
    }
}
