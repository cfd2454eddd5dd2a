// ==========================================
// 机队维修适航跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、来源记录适配
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod aircraft;
pub mod compliance;
pub mod dates;
pub mod deferral;
pub mod due;
pub mod item;
pub mod types;

// 重导出核心类型
pub use aircraft::{Aircraft, UtilizationSnapshot};
pub use compliance::ComplianceRecord;
pub use deferral::DeferredDefect;
pub use due::{ComputedDue, DueLimit, DueSummary, DueThresholds};
pub use item::{
    ComponentRecord, IntervalSpec, LastDoneBaseline, MaintainableItem, MonitoringRecord,
    TaskRecord, UnitIntervals,
};
pub use types::{DeferralCategory, DueStatus, DueUnit, IntervalTier, ItemKind};
