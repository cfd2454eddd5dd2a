// ==========================================
// 机队维修适航跟踪系统 - 到期计算结果
// ==========================================
// 红线: 派生结果，不落库，每次读取重新计算
// ==========================================

use crate::domain::types::{DueStatus, DueUnit, IntervalTier, ItemKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DueLimit - 单一单位的剩余裕度
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueLimit {
    pub unit: DueUnit,
    pub remaining: f64,                  // 剩余裕度（负数 = 已超期）
    pub interval: f64,                   // 实际采用的间隔值
    pub tier: IntervalTier,              // 采用的间隔档位
    pub next_due_value: Option<f64>,     // 下次到期的小时/循环读数
    pub next_due_date: Option<NaiveDate>, // 下次到期日期（日历日单位）
}

// ==========================================
// DueThresholds - 四级状态阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueThresholds {
    pub due_soon_days: i64, // (0, due_soon_days] → DUE_SOON
    pub due_days: i64,      // (due_soon_days, due_days] → DUE
}

impl Default for DueThresholds {
    fn default() -> Self {
        Self {
            due_soon_days: 30,
            due_days: 60,
        }
    }
}

impl DueThresholds {
    /// 阈值是否自洽（0 < due_soon ≤ due）
    pub fn is_valid(&self) -> bool {
        self.due_soon_days > 0 && self.due_soon_days <= self.due_days
    }

    /// 按预计剩余天数划分四级状态
    pub fn classify(&self, projected_days: f64) -> DueStatus {
        if projected_days <= 0.0 {
            DueStatus::Overdue
        } else if projected_days <= self.due_soon_days as f64 {
            DueStatus::DueSoon
        } else if projected_days <= self.due_days as f64 {
            DueStatus::Due
        } else {
            DueStatus::Ok
        }
    }
}

// ==========================================
// ComputedDue - 项目到期计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedDue {
    pub item_id: String,
    pub aircraft_id: String,
    pub kind: ItemKind,
    pub title: String,
    pub reference: Option<String>,
    pub limits: Vec<DueLimit>,
    pub status: DueStatus,
    pub estimated_days_to_due: Option<f64>,
}

impl ComputedDue {
    /// 是否受间隔监控（至少一个可计算单位）
    pub fn is_monitored(&self) -> bool {
        !self.limits.is_empty()
    }

    /// 是否需要关注
    pub fn needs_attention(&self) -> bool {
        self.status.needs_attention()
    }

    /// 各单位中最小的剩余裕度（排序主键）
    pub fn min_remaining(&self) -> Option<f64> {
        self.limits
            .iter()
            .map(|l| l.remaining)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// 三级制原始状态（仅看剩余裕度，不看日历投影）
    ///
    /// 任一 < 0 → OVERDUE；任一 = 0 → DUE；否则 OK
    pub fn raw_status(&self) -> DueStatus {
        if self.limits.iter().any(|l| l.remaining < 0.0) {
            DueStatus::Overdue
        } else if self.limits.iter().any(|l| l.remaining <= 0.0) {
            DueStatus::Due
        } else {
            DueStatus::Ok
        }
    }

    /// 取指定单位的裕度
    pub fn limit(&self, unit: DueUnit) -> Option<&DueLimit> {
        self.limits.iter().find(|l| l.unit == unit)
    }
}

// ==========================================
// DueSummary - 状态计数
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueSummary {
    pub total: usize,
    pub ok: usize,
    pub due_soon: usize,
    pub due: usize,
    pub overdue: usize,
}

impl DueSummary {
    pub fn from_results(results: &[ComputedDue]) -> Self {
        let mut summary = DueSummary::default();
        for r in results {
            summary.total += 1;
            match r.status {
                DueStatus::Ok => summary.ok += 1,
                DueStatus::DueSoon => summary.due_soon += 1,
                DueStatus::Due => summary.due += 1,
                DueStatus::Overdue => summary.overdue += 1,
            }
        }
        summary
    }
}
