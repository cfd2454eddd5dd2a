// ==========================================
// 机队维修适航跟踪系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 到期状态计算 (只回答"剩余裕度与状态"，不做排班)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 到期计算规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DeferralCategory, DueStatus, DueUnit, IntervalTier, ItemKind};

// 领域实体
pub use domain::{
    Aircraft, ComplianceRecord, ComputedDue, DeferredDefect, DueLimit, DueSummary,
    DueThresholds, IntervalSpec, LastDoneBaseline, MaintainableItem, UnitIntervals,
    UtilizationSnapshot,
};

// 引擎
pub use engine::{
    ComplianceHistoryResolver, DeferralEngine, DueEngine, DueOrchestrator, ProjectionFilter,
};

// API
pub use api::{DefectApi, DueApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "机队维修适航跟踪系统";
