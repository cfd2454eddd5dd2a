// ==========================================
// 机队维修适航跟踪系统 - 可维护项目领域模型
// ==========================================
// 职责: 间隔模型 + 完成基线 + 来源记录适配
// 红线: 引擎只接受归一化后的 MaintainableItem
//       任务/部件/监控项三种来源形状在此统一
// ==========================================

use crate::domain::dates::parse_optional_date;
use crate::domain::types::{DueUnit, ItemKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// UnitIntervals - 按单位的间隔值
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitIntervals {
    pub hours: Option<f64>,
    pub cycles: Option<f64>,
    pub days: Option<f64>,
}

impl UnitIntervals {
    pub fn new(hours: Option<f64>, cycles: Option<f64>, days: Option<f64>) -> Self {
        Self { hours, cycles, days }
    }

    /// 取某单位的间隔值
    ///
    /// 0、负数、NaN 视为未定义
    pub fn get(&self, unit: DueUnit) -> Option<f64> {
        let raw = match unit {
            DueUnit::Hours => self.hours,
            DueUnit::Cycles => self.cycles,
            DueUnit::Days => self.days,
        };
        raw.filter(|v| v.is_finite() && *v > 0.0)
    }

    /// 是否定义了任一单位的有效间隔
    pub fn any(&self) -> bool {
        DueUnit::ALL.iter().any(|u| self.get(*u).is_some())
    }
}

// ==========================================
// IntervalSpec - 间隔定义
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalSpec {
    pub initial: UnitIntervals, // 首次间隔
    pub repeat: UnitIntervals,  // 重复间隔
    pub legacy: UnitIntervals,  // 旧版单字段间隔
    pub due_units: Vec<DueUnit>, // 受控单位（空 = 按已定义间隔推断）
}

impl IntervalSpec {
    /// 是否定义了任一单位的重复间隔（按项目整体判定）
    pub fn has_repeat_interval(&self) -> bool {
        self.repeat.any()
    }

    /// 本项目实际受控的单位列表
    ///
    /// 未声明受控单位时，取任一档位定义了间隔的单位
    pub fn governing_units(&self) -> Vec<DueUnit> {
        if !self.due_units.is_empty() {
            let mut units = self.due_units.clone();
            units.sort();
            units.dedup();
            return units;
        }

        DueUnit::ALL
            .iter()
            .copied()
            .filter(|u| {
                self.initial.get(*u).is_some()
                    || self.repeat.get(*u).is_some()
                    || self.legacy.get(*u).is_some()
            })
            .collect()
    }
}

// ==========================================
// LastDoneBaseline - 上次完成基线
// ==========================================
// 部件的"装机"与任务的"上次完成"语义相同
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LastDoneBaseline {
    pub date: Option<NaiveDate>,
    pub hours: Option<f64>,
    pub cycles: Option<i64>,
}

impl LastDoneBaseline {
    pub fn none() -> Self {
        Self::default()
    }

    /// 是否存在任一可识别的完成标记
    pub fn is_present(&self) -> bool {
        self.date.is_some() || self.hours.is_some() || self.cycles.is_some()
    }
}

// ==========================================
// MaintainableItem - 归一化的可维护项目
// ==========================================
// 对齐: maintenance_item 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintainableItem {
    pub item_id: String,
    pub aircraft_id: String,
    pub kind: ItemKind,
    pub title: String,
    pub reference: Option<String>, // 任务号 / 件号
    pub intervals: IntervalSpec,
    pub baseline: LastDoneBaseline, // 静态基线（无履历时使用）
}

// ==========================================
// 来源记录形状
// ==========================================
// 外部协作方以 JSON 交付，字段命名沿用其约定

fn parse_units(raw: &[String]) -> Vec<DueUnit> {
    let mut units: Vec<DueUnit> = raw.iter().filter_map(|s| DueUnit::parse(s)).collect();
    units.sort();
    units.dedup();
    units
}

/// 维修任务记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRecord {
    pub id: String,
    pub aircraft_id: String,
    pub title: String,
    pub task_ref: Option<String>,
    pub due_units: Vec<String>,
    pub initial_interval_hrs: Option<f64>,
    pub initial_interval_cyc: Option<f64>,
    pub initial_interval_days: Option<f64>,
    pub repeat_interval_hrs: Option<f64>,
    pub repeat_interval_cyc: Option<f64>,
    pub repeat_interval_days: Option<f64>,
    pub interval_hrs: Option<f64>,
    pub interval_cyc: Option<f64>,
    pub interval_days: Option<f64>,
    pub last_done_date: Option<String>,
    #[serde(alias = "lastDoneHours")]
    pub last_done_hrs: Option<f64>,
    #[serde(alias = "lastDoneCycles")]
    pub last_done_cyc: Option<i64>,
}

impl From<TaskRecord> for MaintainableItem {
    fn from(r: TaskRecord) -> Self {
        let date = parse_optional_date(r.last_done_date.as_deref(), "lastDoneDate", &r.id);
        MaintainableItem {
            kind: ItemKind::Task,
            title: r.title,
            reference: r.task_ref,
            intervals: IntervalSpec {
                initial: UnitIntervals::new(
                    r.initial_interval_hrs,
                    r.initial_interval_cyc,
                    r.initial_interval_days,
                ),
                repeat: UnitIntervals::new(
                    r.repeat_interval_hrs,
                    r.repeat_interval_cyc,
                    r.repeat_interval_days,
                ),
                legacy: UnitIntervals::new(r.interval_hrs, r.interval_cyc, r.interval_days),
                due_units: parse_units(&r.due_units),
            },
            baseline: LastDoneBaseline {
                date,
                hours: r.last_done_hrs,
                cycles: r.last_done_cyc,
            },
            item_id: r.id,
            aircraft_id: r.aircraft_id,
        }
    }
}

/// 时寿/硬时限部件记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentRecord {
    pub id: String,
    pub aircraft_id: String,
    pub description: String,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub due_units: Vec<String>,
    pub initial_interval_hrs: Option<f64>,
    pub initial_interval_cyc: Option<f64>,
    pub initial_interval_days: Option<f64>,
    pub repeat_interval_hrs: Option<f64>,
    pub repeat_interval_cyc: Option<f64>,
    pub repeat_interval_days: Option<f64>,
    pub interval_hrs: Option<f64>,
    pub interval_cyc: Option<f64>,
    pub interval_days: Option<f64>,
    pub installed_date: Option<String>,
    pub installed_at_ac_hrs: Option<f64>,
    pub installed_at_ac_cyc: Option<i64>,
    pub last_done_date: Option<String>,
    pub last_done_hrs: Option<f64>,
    pub last_done_cyc: Option<i64>,
}

impl From<ComponentRecord> for MaintainableItem {
    fn from(r: ComponentRecord) -> Self {
        // 有后续送修记录时以送修为准，否则装机即"上次完成"（逐字段回退）
        let last_done = parse_optional_date(r.last_done_date.as_deref(), "lastDoneDate", &r.id);
        let installed = parse_optional_date(r.installed_date.as_deref(), "installedDate", &r.id);

        let reference = match (&r.part_number, &r.serial_number) {
            (Some(pn), Some(sn)) => Some(format!("{} S/N {}", pn, sn)),
            (Some(pn), None) => Some(pn.clone()),
            (None, Some(sn)) => Some(format!("S/N {}", sn)),
            (None, None) => None,
        };

        MaintainableItem {
            kind: ItemKind::Component,
            title: r.description,
            reference,
            intervals: IntervalSpec {
                initial: UnitIntervals::new(
                    r.initial_interval_hrs,
                    r.initial_interval_cyc,
                    r.initial_interval_days,
                ),
                repeat: UnitIntervals::new(
                    r.repeat_interval_hrs,
                    r.repeat_interval_cyc,
                    r.repeat_interval_days,
                ),
                legacy: UnitIntervals::new(r.interval_hrs, r.interval_cyc, r.interval_days),
                due_units: parse_units(&r.due_units),
            },
            baseline: LastDoneBaseline {
                date: last_done.or(installed),
                hours: r.last_done_hrs.or(r.installed_at_ac_hrs),
                cycles: r.last_done_cyc.or(r.installed_at_ac_cyc),
            },
            item_id: r.id,
            aircraft_id: r.aircraft_id,
        }
    }
}

/// 周期监控项记录（证书/应急包/电池）
///
/// 只按日历日监控，有效期视为旧版单字段间隔
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitoringRecord {
    pub id: String,
    pub aircraft_id: String,
    pub kind: String,
    pub name: String,
    pub serial_number: Option<String>,
    pub last_checked_date: Option<String>,
    pub validity_days: Option<f64>,
}

impl From<MonitoringRecord> for MaintainableItem {
    fn from(r: MonitoringRecord) -> Self {
        let date = parse_optional_date(r.last_checked_date.as_deref(), "lastCheckedDate", &r.id);
        let kind = match ItemKind::from_str(&r.kind) {
            ItemKind::Task | ItemKind::Component => ItemKind::Certificate,
            other => other,
        };

        MaintainableItem {
            kind,
            title: r.name,
            reference: r.serial_number,
            intervals: IntervalSpec {
                legacy: UnitIntervals::new(None, None, r.validity_days),
                due_units: vec![DueUnit::Days],
                ..IntervalSpec::default()
            },
            baseline: LastDoneBaseline {
                date,
                hours: None,
                cycles: None,
            },
            item_id: r.id,
            aircraft_id: r.aircraft_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_intervals_ignore_zero_and_negative() {
        let iv = UnitIntervals::new(Some(0.0), Some(-5.0), Some(f64::NAN));
        assert!(!iv.any());
        assert_eq!(iv.get(DueUnit::Hours), None);

        let iv = UnitIntervals::new(None, Some(300.0), None);
        assert!(iv.any());
        assert_eq!(iv.get(DueUnit::Cycles), Some(300.0));
    }

    #[test]
    fn test_governing_units_inferred_when_undeclared() {
        let intervals = IntervalSpec {
            initial: UnitIntervals::new(Some(100.0), None, None),
            legacy: UnitIntervals::new(None, None, Some(365.0)),
            ..IntervalSpec::default()
        };
        assert_eq!(intervals.governing_units(), vec![DueUnit::Hours, DueUnit::Days]);
    }

    #[test]
    fn test_task_record_from_json() {
        let json = r#"{
            "id": "T-100",
            "aircraftId": "AC1",
            "title": "Engine borescope",
            "taskRef": "72-00-01",
            "dueUnits": ["HOURS", "DAYS"],
            "initialIntervalHrs": 100,
            "repeatIntervalHrs": 50,
            "repeatIntervalDays": 180,
            "lastDoneDate": "2024-01-01",
            "lastDoneHours": 100.0
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        let item = MaintainableItem::from(record);

        assert_eq!(item.kind, ItemKind::Task);
        assert_eq!(item.reference.as_deref(), Some("72-00-01"));
        assert_eq!(item.intervals.due_units, vec![DueUnit::Hours, DueUnit::Days]);
        assert_eq!(item.baseline.hours, Some(100.0));
        assert_eq!(item.baseline.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(item.intervals.has_repeat_interval());
    }

    #[test]
    fn test_task_record_malformed_date_is_no_baseline() {
        let record = TaskRecord {
            id: "T-1".to_string(),
            aircraft_id: "AC1".to_string(),
            last_done_date: Some("31/31/2024".to_string()),
            ..TaskRecord::default()
        };
        let item = MaintainableItem::from(record);
        assert_eq!(item.baseline.date, None);
        assert!(!item.baseline.is_present());
    }

    #[test]
    fn test_component_uses_installation_as_baseline() {
        let record = ComponentRecord {
            id: "C-1".to_string(),
            aircraft_id: "AC1".to_string(),
            description: "Starter generator".to_string(),
            part_number: Some("23078-001".to_string()),
            serial_number: Some("SN55".to_string()),
            due_units: vec!["HOURS".to_string()],
            interval_hrs: Some(3000.0),
            installed_date: Some("2023-05-01".to_string()),
            installed_at_ac_hrs: Some(1500.0),
            installed_at_ac_cyc: Some(1200),
            ..ComponentRecord::default()
        };
        let item = MaintainableItem::from(record);

        assert_eq!(item.kind, ItemKind::Component);
        assert_eq!(item.reference.as_deref(), Some("23078-001 S/N SN55"));
        assert_eq!(item.baseline.date, NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(item.baseline.hours, Some(1500.0));
        assert_eq!(item.baseline.cycles, Some(1200));
    }

    #[test]
    fn test_component_last_done_overrides_installation() {
        let record = ComponentRecord {
            id: "C-2".to_string(),
            aircraft_id: "AC1".to_string(),
            installed_date: Some("2023-05-01".to_string()),
            installed_at_ac_hrs: Some(1500.0),
            last_done_date: Some("2024-02-01".to_string()),
            last_done_hrs: Some(2100.0),
            ..ComponentRecord::default()
        };
        let item = MaintainableItem::from(record);
        assert_eq!(item.baseline.date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(item.baseline.hours, Some(2100.0));
    }

    #[test]
    fn test_monitoring_record_is_days_only() {
        let record = MonitoringRecord {
            id: "M-1".to_string(),
            aircraft_id: "AC1".to_string(),
            kind: "battery".to_string(),
            name: "ELT battery".to_string(),
            serial_number: None,
            last_checked_date: Some("2024-01-01".to_string()),
            validity_days: Some(730.0),
        };
        let item = MaintainableItem::from(record);
        assert_eq!(item.kind, ItemKind::Battery);
        assert_eq!(item.intervals.governing_units(), vec![DueUnit::Days]);
        assert_eq!(item.intervals.legacy.get(DueUnit::Days), Some(730.0));
    }
}
