// ==========================================
// 机队维修适航跟踪系统 - 配置层
// ==========================================
// 职责: 系统配置管理（到期阈值、预测窗口、保留期限）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
