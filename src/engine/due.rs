// ==========================================
// 机队维修适航跟踪系统 - 到期计算引擎
// ==========================================
// 职责: (利用率快照, 项目间隔, 有效基线) → 各单位剩余裕度 + 四级状态 + 预计剩余天数
// 红线: 到期状态是"等级制",按最差单位取值,不做平均
// 红线: 除零/日期异常不得抛错,一律降级为"该单位无估算/无基线"
// 红线: 全系统只有这一份到期计算逻辑,其他调用点一律调用本引擎
// ==========================================

use crate::domain::aircraft::UtilizationSnapshot;
use crate::domain::due::{ComputedDue, DueLimit, DueThresholds};
use crate::domain::item::{IntervalSpec, LastDoneBaseline, MaintainableItem};
use crate::domain::types::{DueStatus, DueUnit, IntervalTier};
use chrono::{Days, NaiveDate};

// ==========================================
// DueEngine - 到期计算引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DueEngine {
    thresholds: DueThresholds,
}

impl Default for DueEngine {
    fn default() -> Self {
        Self::new(DueThresholds::default())
    }
}

impl DueEngine {
    /// 创建到期计算引擎
    ///
    /// 阈值不自洽（due_soon ≤ 0 或 due_soon > due）时回退默认 30/60
    pub fn new(thresholds: DueThresholds) -> Self {
        let thresholds = if thresholds.is_valid() {
            thresholds
        } else {
            tracing::warn!(
                due_soon_days = thresholds.due_soon_days,
                due_days = thresholds.due_days,
                "到期阈值配置不自洽，使用默认阈值"
            );
            DueThresholds::default()
        };
        Self { thresholds }
    }

    pub fn thresholds(&self) -> DueThresholds {
        self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单个项目的到期状态
    ///
    /// 步骤:
    /// 1) 判定间隔档位（按项目整体判定，不逐单位判定）
    /// 2) 逐受控单位计算剩余裕度（无适用间隔的单位跳过）
    /// 3) 逐单位换算预计剩余天数，取最小值
    /// 4) 逐单位判定四级状态，取最差
    pub fn compute_due(
        &self,
        item: &MaintainableItem,
        snapshot: &UtilizationSnapshot,
        baseline: &LastDoneBaseline,
    ) -> ComputedDue {
        let use_repeat = Self::use_repeat_tier(&item.intervals, baseline);

        let limits: Vec<DueLimit> = item
            .intervals
            .governing_units()
            .into_iter()
            .filter_map(|unit| {
                let (interval, tier) = Self::interval_for(&item.intervals, unit, use_repeat)?;
                Some(Self::unit_limit(unit, interval, tier, snapshot, baseline))
            })
            .collect();

        if limits.is_empty() {
            tracing::debug!(item_id = %item.item_id, "项目无可计算的到期单位，不纳入间隔监控");
        }

        let estimated_days_to_due = Self::estimate_days_to_due(&limits, snapshot);
        let status = self.derive_status(&limits, snapshot);

        ComputedDue {
            item_id: item.item_id.clone(),
            aircraft_id: item.aircraft_id.clone(),
            kind: item.kind,
            title: item.title.clone(),
            reference: item.reference.clone(),
            limits,
            status,
            estimated_days_to_due,
        }
    }

    // ==========================================
    // 间隔档位判定
    // ==========================================

    /// 是否采用重复间隔
    ///
    /// use_repeat = 存在任一完成标记 && 定义了任一单位的重复间隔
    pub fn use_repeat_tier(intervals: &IntervalSpec, baseline: &LastDoneBaseline) -> bool {
        baseline.is_present() && intervals.has_repeat_interval()
    }

    /// 取某单位适用的间隔值与档位
    ///
    /// 顺序: 选中档位 → 另一档位 → 旧版单字段间隔
    /// 均未定义时返回 None（该单位不产生裕度）
    pub fn interval_for(
        intervals: &IntervalSpec,
        unit: DueUnit,
        use_repeat: bool,
    ) -> Option<(f64, IntervalTier)> {
        let (primary, secondary) = if use_repeat {
            (
                (intervals.repeat.get(unit), IntervalTier::Repeat),
                (intervals.initial.get(unit), IntervalTier::Initial),
            )
        } else {
            (
                (intervals.initial.get(unit), IntervalTier::Initial),
                (intervals.repeat.get(unit), IntervalTier::Repeat),
            )
        };

        if let (Some(v), tier) = primary {
            return Some((v, tier));
        }
        if let (Some(v), tier) = secondary {
            return Some((v, tier));
        }
        intervals
            .legacy
            .get(unit)
            .map(|v| (v, IntervalTier::Legacy))
    }

    // ==========================================
    // 剩余裕度计算
    // ==========================================

    /// 计算单一单位的剩余裕度
    ///
    /// - HOURS/CYCLES: 有上次读数 → 上次 + 间隔 − 当前；无 → 间隔 − 当前（从零起算）
    /// - DAYS: 有上次日期 → ceil(上次 + 间隔 − 当前日期)；无 → 间隔本身
    pub fn unit_limit(
        unit: DueUnit,
        interval: f64,
        tier: IntervalTier,
        snapshot: &UtilizationSnapshot,
        baseline: &LastDoneBaseline,
    ) -> DueLimit {
        match unit {
            DueUnit::Hours => {
                let next = baseline.hours.unwrap_or(0.0) + interval;
                DueLimit {
                    unit,
                    remaining: next - snapshot.current_hours,
                    interval,
                    tier,
                    next_due_value: Some(next),
                    next_due_date: None,
                }
            }
            DueUnit::Cycles => {
                let next = baseline.cycles.map(|c| c as f64).unwrap_or(0.0) + interval;
                DueLimit {
                    unit,
                    remaining: next - snapshot.current_cycles as f64,
                    interval,
                    tier,
                    next_due_value: Some(next),
                    next_due_date: None,
                }
            }
            DueUnit::Days => {
                let (remaining, next_date) = match baseline.date {
                    Some(last) => {
                        let elapsed = (snapshot.current_date - last).num_days() as f64;
                        (
                            normalize_zero((interval - elapsed).ceil()),
                            add_days(last, interval),
                        )
                    }
                    None => (interval.ceil(), add_days(snapshot.current_date, interval)),
                };
                DueLimit {
                    unit,
                    remaining,
                    interval,
                    tier,
                    next_due_value: None,
                    next_due_date: next_date,
                }
            }
        }
    }

    // ==========================================
    // 预计剩余天数
    // ==========================================

    /// 单一单位换算为预计剩余日历日
    ///
    /// 日均利用率 ≤ 0 或非有限值时返回 None（不产生 Infinity/NaN）
    pub fn projected_days(limit: &DueLimit, snapshot: &UtilizationSnapshot) -> Option<f64> {
        let days = match limit.unit {
            DueUnit::Days => limit.remaining.ceil(),
            unit => {
                let rate = snapshot.daily_rate(unit)?;
                (limit.remaining / rate).ceil()
            }
        };
        if days.is_finite() {
            Some(normalize_zero(days))
        } else {
            None
        }
    }

    /// 全部单位中最紧的预计剩余天数
    pub fn estimate_days_to_due(limits: &[DueLimit], snapshot: &UtilizationSnapshot) -> Option<f64> {
        limits
            .iter()
            .filter_map(|l| Self::projected_days(l, snapshot))
            .min_by(|a, b| a.total_cmp(b))
    }

    // ==========================================
    // 四级状态判定
    // ==========================================

    /// 单一单位的状态
    ///
    /// - 可换算天数 → 按阈值分档
    /// - 不可换算（日均利用率缺失）→ 裕度 ≤ 0 为 OVERDUE，否则 OK
    pub fn unit_status(&self, limit: &DueLimit, snapshot: &UtilizationSnapshot) -> DueStatus {
        if limit.remaining < 0.0 {
            return DueStatus::Overdue;
        }
        match Self::projected_days(limit, snapshot) {
            Some(days) => self.thresholds.classify(days),
            None if limit.remaining <= 0.0 => DueStatus::Overdue,
            None => DueStatus::Ok,
        }
    }

    /// 项目状态 = 各单位状态中最差者（无单位 → OK）
    pub fn derive_status(&self, limits: &[DueLimit], snapshot: &UtilizationSnapshot) -> DueStatus {
        limits
            .iter()
            .map(|l| self.unit_status(l, snapshot))
            .max()
            .unwrap_or(DueStatus::Ok)
    }
}

/// 日期加上（可能带小数的）天数，小数部分向上取整；越界返回 None
fn add_days(base: NaiveDate, days: f64) -> Option<NaiveDate> {
    let whole = days.ceil();
    if !whole.is_finite() || whole < 0.0 || whole > u32::MAX as f64 {
        return None;
    }
    base.checked_add_days(Days::new(whole as u64))
}

/// 把 -0.0 规整为 0.0
fn normalize_zero(v: f64) -> f64 {
    v + 0.0
}
