// ==========================================
// 机队维修适航跟踪系统 - 保留故障领域模型
// ==========================================
// 对齐: deferred_defect 表
// ==========================================

use crate::domain::types::DeferralCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 保留故障
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredDefect {
    pub defect_id: String,
    pub aircraft_id: String,
    pub description: String,
    pub mel_reference: Option<String>,
    pub category: DeferralCategory,
    pub raised_date: NaiveDate,  // 保留起始日期
    pub deferral_days: i64,      // 保留期限（天）
    pub expiry_date: NaiveDate,  // 到期日期 = raised_date + deferral_days
    pub closed_date: Option<NaiveDate>, // 关闭日期（None = 仍在保留）
}

impl DeferredDefect {
    pub fn is_open(&self) -> bool {
        self.closed_date.is_none()
    }
}
