// ==========================================
// 机队维修适航跟踪系统 - 完成履历领域模型
// ==========================================
// 红线: 履历只追加，不修改
// 对齐: compliance_record 表
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 完成履历记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub record_id: String,                // 记录ID（同日多条时用于确定性取舍）
    pub item_id: String,                  // 关联 maintenance_item
    pub aircraft_id: String,              // 关联 aircraft
    pub date: NaiveDate,                  // 完成日期
    pub hours_at_completion: Option<f64>, // 完成时飞机累计小时
    pub cycles_at_completion: Option<i64>, // 完成时飞机累计循环
    pub remarks: Option<String>,
}

impl ComplianceRecord {
    /// 是否属于指定 (项目, 飞机)
    pub fn matches(&self, item_id: &str, aircraft_id: &str) -> bool {
        self.item_id == item_id && self.aircraft_id == aircraft_id
    }
}
