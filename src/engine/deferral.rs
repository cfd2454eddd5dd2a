// ==========================================
// 机队维修适航跟踪系统 - 保留故障期限引擎
// ==========================================
// 依据: MEL 保留类别期限
// 红线: B/C/D 类期限固定为 3/10/120 天，忽略人工输入
//       A 类按人工输入，缺省 1 天
// ==========================================

use crate::domain::deferral::DeferredDefect;
use crate::domain::due::DueThresholds;
use crate::domain::types::{DeferralCategory, DueStatus};
use chrono::{Days, NaiveDate};

/// B 类固定期限（天）
pub const CATEGORY_B_DAYS: i64 = 3;
/// C 类固定期限（天）
pub const CATEGORY_C_DAYS: i64 = 10;
/// D 类固定期限（天）
pub const CATEGORY_D_DAYS: i64 = 120;
/// A 类缺省期限（天）
pub const DEFAULT_CATEGORY_A_DAYS: i64 = 1;

/// 新建保留故障的输入
#[derive(Debug, Clone)]
pub struct DeferralRequest {
    pub defect_id: String,
    pub aircraft_id: String,
    pub description: String,
    pub mel_reference: Option<String>,
    pub category: DeferralCategory,
    pub raised_date: NaiveDate,
    pub requested_days: Option<i64>, // 人工指定期限（仅 A 类生效）
}

// ==========================================
// DeferralEngine - 保留期限引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DeferralEngine {
    category_a_default_days: i64,
    thresholds: DueThresholds,
}

impl Default for DeferralEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_A_DAYS, DueThresholds::default())
    }
}

impl DeferralEngine {
    pub fn new(category_a_default_days: i64, thresholds: DueThresholds) -> Self {
        let category_a_default_days = if category_a_default_days > 0 {
            category_a_default_days
        } else {
            DEFAULT_CATEGORY_A_DAYS
        };
        Self {
            category_a_default_days,
            thresholds,
        }
    }

    /// 判定保留期限（天）
    pub fn resolve_deferral_days(&self, category: DeferralCategory, requested: Option<i64>) -> i64 {
        match category {
            DeferralCategory::A => match requested {
                Some(days) if days > 0 => days,
                Some(days) => {
                    tracing::warn!(requested_days = days, "A 类保留期限非正数，使用缺省期限");
                    self.category_a_default_days
                }
                None => self.category_a_default_days,
            },
            fixed => {
                let days = match fixed {
                    DeferralCategory::B => CATEGORY_B_DAYS,
                    DeferralCategory::C => CATEGORY_C_DAYS,
                    _ => CATEGORY_D_DAYS,
                };
                if let Some(req) = requested {
                    if req != days {
                        tracing::debug!(
                            category = %fixed,
                            requested_days = req,
                            fixed_days = days,
                            "固定期限类别忽略人工指定期限"
                        );
                    }
                }
                days
            }
        }
    }

    /// 生成保留故障记录（到期日 = 起始日 + 期限）
    pub fn defer(&self, request: DeferralRequest) -> DeferredDefect {
        let deferral_days = self.resolve_deferral_days(request.category, request.requested_days);
        let expiry_date = request
            .raised_date
            .checked_add_days(Days::new(deferral_days as u64))
            .unwrap_or(NaiveDate::MAX);

        DeferredDefect {
            defect_id: request.defect_id,
            aircraft_id: request.aircraft_id,
            description: request.description,
            mel_reference: request.mel_reference,
            category: request.category,
            raised_date: request.raised_date,
            deferral_days,
            expiry_date,
            closed_date: None,
        }
    }

    /// 距到期剩余天数（负数 = 已超期）
    pub fn days_remaining(defect: &DeferredDefect, today: NaiveDate) -> i64 {
        (defect.expiry_date - today).num_days()
    }

    /// 保留故障状态（已关闭 → OK）
    pub fn status(&self, defect: &DeferredDefect, today: NaiveDate) -> DueStatus {
        if !defect.is_open() {
            return DueStatus::Ok;
        }
        self.thresholds
            .classify(Self::days_remaining(defect, today) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(category: DeferralCategory, requested_days: Option<i64>) -> DeferralRequest {
        DeferralRequest {
            defect_id: "D1".to_string(),
            aircraft_id: "AC1".to_string(),
            description: "Cabin reading light inop".to_string(),
            mel_reference: Some("33-20-01".to_string()),
            category,
            raised_date: date(2024, 3, 1),
            requested_days,
        }
    }

    #[test]
    fn test_fixed_categories_ignore_user_value() {
        let engine = DeferralEngine::default();
        assert_eq!(engine.resolve_deferral_days(DeferralCategory::B, Some(99)), 3);
        assert_eq!(engine.resolve_deferral_days(DeferralCategory::C, Some(1)), 10);
        assert_eq!(engine.resolve_deferral_days(DeferralCategory::D, None), 120);
    }

    #[test]
    fn test_category_a_honors_user_value() {
        let engine = DeferralEngine::default();
        assert_eq!(engine.resolve_deferral_days(DeferralCategory::A, Some(5)), 5);
        assert_eq!(engine.resolve_deferral_days(DeferralCategory::A, None), 1);
        assert_eq!(engine.resolve_deferral_days(DeferralCategory::A, Some(0)), 1);
    }

    #[test]
    fn test_defer_sets_expiry() {
        let engine = DeferralEngine::default();
        let defect = engine.defer(request(DeferralCategory::C, Some(30)));
        assert_eq!(defect.deferral_days, 10);
        assert_eq!(defect.expiry_date, date(2024, 3, 11));
        assert!(defect.is_open());
    }

    #[test]
    fn test_status_by_days_remaining() {
        let engine = DeferralEngine::default();
        let defect = engine.defer(request(DeferralCategory::D, None)); // 到期 2024-06-29

        assert_eq!(engine.status(&defect, date(2024, 3, 1)), DueStatus::Ok);
        assert_eq!(engine.status(&defect, date(2024, 5, 15)), DueStatus::Due);
        assert_eq!(engine.status(&defect, date(2024, 6, 20)), DueStatus::DueSoon);
        assert_eq!(engine.status(&defect, date(2024, 6, 29)), DueStatus::Overdue);

        let mut closed = defect.clone();
        closed.closed_date = Some(date(2024, 7, 5));
        assert_eq!(engine.status(&closed, date(2024, 7, 10)), DueStatus::Ok);
    }
}
