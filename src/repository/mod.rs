// ==========================================
// 机队维修适航跟踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod aircraft_repo;
pub mod compliance_repo;
pub mod defect_repo;
pub mod error;
pub mod item_repo;

// 重导出核心仓储
pub use aircraft_repo::AircraftRepository;
pub use compliance_repo::ComplianceRecordRepository;
pub use defect_repo::DeferredDefectRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use item_repo::MaintenanceItemRepository;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// MaintenanceRepositories - 仓储集合
// ==========================================
/// 共享同一连接的全部仓储，供 API 层注入
pub struct MaintenanceRepositories {
    pub aircraft: Arc<AircraftRepository>,
    pub items: Arc<MaintenanceItemRepository>,
    pub compliance: Arc<ComplianceRecordRepository>,
    pub defects: Arc<DeferredDefectRepository>,
}

impl MaintenanceRepositories {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            aircraft: Arc::new(AircraftRepository::from_connection(conn.clone())),
            items: Arc::new(MaintenanceItemRepository::from_connection(conn.clone())),
            compliance: Arc::new(ComplianceRecordRepository::from_connection(conn.clone())),
            defects: Arc::new(DeferredDefectRepository::from_connection(conn)),
        }
    }
}
