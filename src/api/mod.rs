// ==========================================
// 机队维修适航跟踪系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod defect_api;
pub mod due_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use defect_api::{DefectApi, DefectStatusView, RaiseDefectRequest};
pub use due_api::{DueApi, RecordComplianceRequest};
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
