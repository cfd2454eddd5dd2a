// ==========================================
// 机队维修适航跟踪系统 - 引擎层
// ==========================================
// 职责: 实现到期计算规则,不访问数据库
// 红线: Engine 不拼 SQL, 不持有仓储, 只接受不可变快照
// ==========================================

pub mod baseline;
pub mod deferral;
pub mod due;
pub mod ordering;
pub mod orchestrator;
pub mod projection;

// 重导出核心引擎
pub use baseline::ComplianceHistoryResolver;
pub use deferral::{DeferralEngine, DeferralRequest};
pub use due::DueEngine;
pub use orchestrator::{AircraftDueReport, DueOrchestrator};
pub use ordering::{compare_urgency, sort_due_list};
pub use projection::{ProjectionBucket, ProjectionFilter, DEFAULT_PROJECTION_WINDOWS};
