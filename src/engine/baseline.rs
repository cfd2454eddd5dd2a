// ==========================================
// 机队维修适航跟踪系统 - 完成履历基线解析
// ==========================================
// 职责: 静态"上次完成"字段 + 完成履历 → 有效基线
// 红线: 有履历则履历优先，取日期最新的一条
//       纯函数，无副作用
// ==========================================

use crate::domain::compliance::ComplianceRecord;
use crate::domain::item::{LastDoneBaseline, MaintainableItem};
use std::cmp::Ordering;
use std::collections::HashMap;

// ==========================================
// ComplianceHistoryResolver - 履历基线解析器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ComplianceHistoryResolver;

impl ComplianceHistoryResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析项目在指定飞机上的有效基线
    ///
    /// 规则:
    /// 1) 只看 item_id 与 aircraft_id 同时匹配的履历
    /// 2) 无匹配 → 原样返回项目静态基线
    /// 3) 有匹配 → 取日期最新的一条（同日取 record_id 较大者）
    /// 4) 日期取自履历；小时/循环履历缺失时保留静态值，不清空
    pub fn resolve_effective_baseline(
        &self,
        item: &MaintainableItem,
        aircraft_id: &str,
        history: &[ComplianceRecord],
    ) -> LastDoneBaseline {
        let latest = history
            .iter()
            .filter(|r| r.matches(&item.item_id, aircraft_id))
            .max_by(|a, b| Self::recency_order(a, b));

        Self::apply_record(item, latest)
    }

    /// 按项目分组取最新履历（批量计算用）
    ///
    /// 与逐个调用 `resolve_effective_baseline` 的取舍规则完全一致
    pub fn latest_by_item<'a>(
        &self,
        aircraft_id: &str,
        history: &'a [ComplianceRecord],
    ) -> HashMap<&'a str, &'a ComplianceRecord> {
        let mut latest: HashMap<&'a str, &'a ComplianceRecord> = HashMap::new();

        for record in history.iter().filter(|r| r.aircraft_id == aircraft_id) {
            latest
                .entry(record.item_id.as_str())
                .and_modify(|current| {
                    if Self::recency_order(record, *current) == Ordering::Greater {
                        *current = record;
                    }
                })
                .or_insert(record);
        }

        latest
    }

    /// 用已选定的履历（可无）构造有效基线
    pub fn apply_record(
        item: &MaintainableItem,
        record: Option<&ComplianceRecord>,
    ) -> LastDoneBaseline {
        match record {
            None => item.baseline,
            Some(r) => LastDoneBaseline {
                date: Some(r.date),
                hours: r.hours_at_completion.or(item.baseline.hours),
                cycles: r.cycles_at_completion.or(item.baseline.cycles),
            },
        }
    }

    /// 履历新旧排序: 先比日期，同日比 record_id
    fn recency_order(a: &ComplianceRecord, b: &ComplianceRecord) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| a.record_id.cmp(&b.record_id))
    }
}
