// ==========================================
// 机队维修适航跟踪系统 - 导入 API
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::importer::{ImportSummary, ItemCsvImporter};
use crate::repository::{AircraftRepository, MaintenanceItemRepository, MaintenanceRepositories};

pub struct ImportApi {
    aircraft_repo: Arc<AircraftRepository>,
    item_repo: Arc<MaintenanceItemRepository>,
    importer: ItemCsvImporter,
}

impl ImportApi {
    pub fn new(repos: &MaintenanceRepositories) -> Self {
        Self {
            aircraft_repo: repos.aircraft.clone(),
            item_repo: repos.items.clone(),
            importer: ItemCsvImporter::new(),
        }
    }

    /// 导入维修项目 CSV
    pub fn import_items(&self, file_path: &str) -> ApiResult<ImportSummary> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let summary = self.importer.import_file(
            Path::new(file_path),
            &self.aircraft_repo,
            &self.item_repo,
        )?;
        Ok(summary)
    }
}
