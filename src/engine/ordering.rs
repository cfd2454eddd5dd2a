// ==========================================
// 机队维修适航跟踪系统 - 到期清单排序
// ==========================================
// 规则: 主键 = 各单位最小剩余裕度（升序，最紧迫在前）
//       次键 = 标题 → 参考号 → 项目ID（保证确定性）
// ==========================================

use crate::domain::due::ComputedDue;
use std::cmp::Ordering;

/// 到期清单排序比较器
pub fn compare_urgency(a: &ComputedDue, b: &ComputedDue) -> Ordering {
    let ka = a.min_remaining().unwrap_or(f64::INFINITY);
    let kb = b.min_remaining().unwrap_or(f64::INFINITY);

    ka.total_cmp(&kb)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.reference.cmp(&b.reference))
        .then_with(|| a.item_id.cmp(&b.item_id))
}

/// 原地按紧迫度排序
pub fn sort_due_list(results: &mut [ComputedDue]) {
    results.sort_by(compare_urgency);
}
