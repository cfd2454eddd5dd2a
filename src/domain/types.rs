// ==========================================
// 机队维修适航跟踪系统 - 领域类型定义
// ==========================================
// 红线: 状态是"等级制",不是评分制
// 红线: 到期单位只有 小时/循环/日历日 三种
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 到期单位 (Due Unit)
// ==========================================
// 一个项目可以同时受多个单位约束（以先到者为准）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueUnit {
    Hours,  // 飞行小时
    Cycles, // 起落循环
    Days,   // 日历日
}

impl DueUnit {
    /// 全部单位（固定顺序：小时 → 循环 → 日历日）
    pub const ALL: [DueUnit; 3] = [DueUnit::Hours, DueUnit::Cycles, DueUnit::Days];

    /// 从字符串解析到期单位
    ///
    /// 兼容 "HRS"/"CYC"/"DAY" 等常见缩写，无法识别返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "HOURS" | "HOUR" | "HRS" | "HR" | "FH" => Some(DueUnit::Hours),
            "CYCLES" | "CYCLE" | "CYC" | "FC" => Some(DueUnit::Cycles),
            "DAYS" | "DAY" | "CAL" => Some(DueUnit::Days),
            _ => None,
        }
    }

    /// 解析逗号/分号/竖线分隔的单位列表（去重，保持固定顺序）
    pub fn parse_list(s: &str) -> Vec<Self> {
        let mut units: Vec<DueUnit> = s
            .split(|c| c == ',' || c == ';' || c == '|')
            .filter_map(DueUnit::parse)
            .collect();
        units.sort();
        units.dedup();
        units
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DueUnit::Hours => "HOURS",
            DueUnit::Cycles => "CYCLES",
            DueUnit::Days => "DAYS",
        }
    }
}

impl fmt::Display for DueUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 到期状态 (Due Status)
// ==========================================
// 四级制: Ok < DueSoon < Due < Overdue（按紧迫度递增）
// 依据: 按预计剩余日历日划分档位，阈值见 DueThresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueStatus {
    Ok,      // 正常
    DueSoon, // 即将到期（≤ due_soon_days）
    Due,     // 到期关注（≤ due_days）
    Overdue, // 超期（≤ 0）
}

impl DueStatus {
    /// 是否需要关注（三级制的 "非 OK"）
    pub fn needs_attention(&self) -> bool {
        *self != DueStatus::Ok
    }

    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "OK" => Some(DueStatus::Ok),
            "DUE_SOON" => Some(DueStatus::DueSoon),
            "DUE" => Some(DueStatus::Due),
            "OVERDUE" => Some(DueStatus::Overdue),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DueStatus::Ok => "OK",
            DueStatus::DueSoon => "DUE_SOON",
            DueStatus::Due => "DUE",
            DueStatus::Overdue => "OVERDUE",
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 间隔档位 (Interval Tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalTier {
    Initial, // 首次间隔（从零/装机起算）
    Repeat,  // 重复间隔（已有完成基线）
    Legacy,  // 旧版单字段间隔（无首次/重复之分）
}

impl fmt::Display for IntervalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalTier::Initial => write!(f, "INITIAL"),
            IntervalTier::Repeat => write!(f, "REPEAT"),
            IntervalTier::Legacy => write!(f, "LEGACY"),
        }
    }
}

// ==========================================
// 项目类型 (Item Kind)
// ==========================================
// Task: 维修任务; Component: 时寿/硬时限部件
// Certificate/Kit/Battery: 周期监控项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Task,
    Component,
    Certificate,
    Kit,
    Battery,
}

impl ItemKind {
    /// 是否为周期监控项
    pub fn is_monitoring(&self) -> bool {
        matches!(self, ItemKind::Certificate | ItemKind::Kit | ItemKind::Battery)
    }

    /// 从字符串解析项目类型（未知值按维修任务处理）
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "COMPONENT" => ItemKind::Component,
            "CERTIFICATE" => ItemKind::Certificate,
            "KIT" => ItemKind::Kit,
            "BATTERY" => ItemKind::Battery,
            _ => ItemKind::Task,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ItemKind::Task => "TASK",
            ItemKind::Component => "COMPONENT",
            ItemKind::Certificate => "CERTIFICATE",
            ItemKind::Kit => "KIT",
            ItemKind::Battery => "BATTERY",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 保留类别 (Deferral Category)
// ==========================================
// 依据: MEL 保留故障类别
// B/C/D 为固定期限，A 由人工指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeferralCategory {
    A,
    B,
    C,
    D,
}

impl DeferralCategory {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(DeferralCategory::A),
            "B" => Some(DeferralCategory::B),
            "C" => Some(DeferralCategory::C),
            "D" => Some(DeferralCategory::D),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DeferralCategory::A => "A",
            DeferralCategory::B => "B",
            DeferralCategory::C => "C",
            DeferralCategory::D => "D",
        }
    }
}

impl fmt::Display for DeferralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_unit_parse_aliases() {
        assert_eq!(DueUnit::parse("hrs"), Some(DueUnit::Hours));
        assert_eq!(DueUnit::parse(" CYC "), Some(DueUnit::Cycles));
        assert_eq!(DueUnit::parse("days"), Some(DueUnit::Days));
        assert_eq!(DueUnit::parse("weeks"), None);
    }

    #[test]
    fn test_due_unit_parse_list_dedup_and_order() {
        let units = DueUnit::parse_list("DAYS,hours;HRS|bogus");
        assert_eq!(units, vec![DueUnit::Hours, DueUnit::Days]);
    }

    #[test]
    fn test_due_status_order() {
        assert!(DueStatus::Overdue > DueStatus::Due);
        assert!(DueStatus::Due > DueStatus::DueSoon);
        assert!(DueStatus::DueSoon > DueStatus::Ok);
        assert!(!DueStatus::Ok.needs_attention());
        assert!(DueStatus::DueSoon.needs_attention());
    }

    #[test]
    fn test_status_serde_screaming_snake() {
        let json = serde_json::to_string(&DueStatus::DueSoon).unwrap();
        assert_eq!(json, "\"DUE_SOON\"");
        assert_eq!(DueStatus::from_str("due_soon"), Some(DueStatus::DueSoon));
    }

    #[test]
    fn test_item_kind_monitoring() {
        assert!(ItemKind::Battery.is_monitoring());
        assert!(!ItemKind::Component.is_monitoring());
        assert_eq!(ItemKind::from_str("kit"), ItemKind::Kit);
        assert_eq!(ItemKind::from_str("anything"), ItemKind::Task);
    }
}
