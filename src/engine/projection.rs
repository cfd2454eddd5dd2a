// ==========================================
// 机队维修适航跟踪系统 - 预测窗口过滤
// ==========================================
// 职责: 判断项目是否落入未来 N 天预测窗口（30/60/90）
// 红线: 多单位之间是"或"关系，任一单位落入即纳入
// ==========================================

use crate::domain::aircraft::UtilizationSnapshot;
use crate::domain::due::{ComputedDue, DueLimit};
use crate::domain::types::DueUnit;
use serde::{Deserialize, Serialize};

/// 默认预测窗口（天）
pub const DEFAULT_PROJECTION_WINDOWS: [i64; 3] = [30, 60, 90];

// ==========================================
// ProjectionFilter - 预测窗口过滤器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectionFilter;

impl ProjectionFilter {
    pub fn new() -> Self {
        Self
    }

    /// 单位对应的窗口阈值
    ///
    /// HOURS → 窗口天数 × 日均小时；CYCLES → 窗口天数 × 日均循环；DAYS → 窗口天数
    /// 日均利用率非正或非有限时阈值取 0（只有已到期的裕度能落入）
    pub fn window_threshold(unit: DueUnit, snapshot: &UtilizationSnapshot, window_days: i64) -> f64 {
        let window = window_days as f64;
        match unit {
            DueUnit::Days => window,
            unit => snapshot.daily_rate(unit).map(|r| window * r).unwrap_or(0.0),
        }
    }

    /// 单一裕度是否落入窗口
    pub fn limit_within_window(
        limit: &DueLimit,
        snapshot: &UtilizationSnapshot,
        window_days: i64,
    ) -> bool {
        limit.remaining <= Self::window_threshold(limit.unit, snapshot, window_days)
    }

    /// 项目是否落入预测窗口（任一单位满足即可）
    pub fn is_within_projection_window(
        &self,
        computed: &ComputedDue,
        snapshot: &UtilizationSnapshot,
        window_days: i64,
    ) -> bool {
        computed
            .limits
            .iter()
            .any(|l| Self::limit_within_window(l, snapshot, window_days))
    }

    /// 从到期清单中筛出落入窗口的项目（保持原有顺序）
    pub fn filter_window(
        &self,
        results: &[ComputedDue],
        snapshot: &UtilizationSnapshot,
        window_days: i64,
    ) -> Vec<ComputedDue> {
        results
            .iter()
            .filter(|c| self.is_within_projection_window(c, snapshot, window_days))
            .cloned()
            .collect()
    }

    /// 按多个窗口分桶
    pub fn bucket(
        &self,
        results: &[ComputedDue],
        snapshot: &UtilizationSnapshot,
        windows: &[i64],
    ) -> Vec<ProjectionBucket> {
        windows
            .iter()
            .map(|&window_days| ProjectionBucket {
                window_days,
                items: self.filter_window(results, snapshot, window_days),
            })
            .collect()
    }
}

/// 预测窗口分桶结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBucket {
    pub window_days: i64,
    pub items: Vec<ComputedDue>,
}
