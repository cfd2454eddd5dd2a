// ==========================================
// 机队维修适航跟踪系统 - 飞机领域模型
// ==========================================
// 用途: 外部数据源提供，引擎层只读
// 红线: 利用率快照在一次计算内不可变
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Aircraft - 飞机利用率记录
// ==========================================
// 对齐: aircraft 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub aircraft_id: String,     // 飞机唯一标识
    pub registration: String,    // 注册号
    pub aircraft_type: String,   // 机型
    pub current_hours: f64,      // 当前累计飞行小时
    pub current_cycles: i64,     // 当前累计起落循环
    pub current_date: NaiveDate, // 数据截止日期
    pub avg_daily_hours: f64,    // 日均飞行小时（应 > 0）
    pub avg_daily_cycles: f64,   // 日均起落循环（应 > 0）
}

impl Aircraft {
    /// 生成本次计算使用的利用率快照
    pub fn snapshot(&self) -> UtilizationSnapshot {
        UtilizationSnapshot {
            current_hours: self.current_hours,
            current_cycles: self.current_cycles,
            current_date: self.current_date,
            avg_daily_hours: self.avg_daily_hours,
            avg_daily_cycles: self.avg_daily_cycles,
        }
    }
}

// ==========================================
// UtilizationSnapshot - 利用率快照
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSnapshot {
    pub current_hours: f64,
    pub current_cycles: i64,
    pub current_date: NaiveDate,
    pub avg_daily_hours: f64,
    pub avg_daily_cycles: f64,
}

impl UtilizationSnapshot {
    /// 日均利用率（按单位），非有限值或 ≤ 0 时返回 None
    pub fn daily_rate(&self, unit: crate::domain::types::DueUnit) -> Option<f64> {
        use crate::domain::types::DueUnit;
        let rate = match unit {
            DueUnit::Hours => self.avg_daily_hours,
            DueUnit::Cycles => self.avg_daily_cycles,
            DueUnit::Days => 1.0,
        };
        if rate.is_finite() && rate > 0.0 {
            Some(rate)
        } else {
            None
        }
    }
}
