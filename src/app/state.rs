// ==========================================
// 机队维修适航跟踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{DefectApi, DueApi, ImportApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::MaintenanceRepositories;

/// 应用状态
///
/// 包含所有API实例和共享资源（单连接共享）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 仓储集合
    pub repos: MaintenanceRepositories,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 到期查询API
    pub due_api: Arc<DueApi>,

    /// 保留故障API
    pub defect_api: Arc<DefectApi>,

    /// 维修项目导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并幂等建表
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;

        match read_schema_version(&conn) {
            Ok(Some(v)) if v > CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    db_version = v,
                    code_version = CURRENT_SCHEMA_VERSION,
                    "数据库 schema 版本高于当前程序"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        let repos = MaintenanceRepositories::from_connection(conn.clone());
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let due_api = Arc::new(DueApi::new(&repos, config_manager.clone()));
        let defect_api = Arc::new(DefectApi::new(&repos, config_manager.clone()));
        let import_api = Arc::new(ImportApi::new(&repos));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            repos,
            config_manager,
            due_api,
            defect_api,
            import_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 FLEET_MX_DB_PATH，其次为用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("FLEET_MX_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./fleet_mx.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("fleet-mx");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("fleet_mx.db");
        }
    }

    path.to_string_lossy().to_string()
}
