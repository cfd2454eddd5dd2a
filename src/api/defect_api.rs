// ==========================================
// 机队维修适航跟踪系统 - 保留故障 API
// ==========================================
// 职责: 保留故障登记、查询、关闭
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::deferral::DeferredDefect;
use crate::domain::types::{DeferralCategory, DueStatus};
use crate::engine::deferral::{DeferralEngine, DeferralRequest};
use crate::repository::{AircraftRepository, DeferredDefectRepository, MaintenanceRepositories};

/// 登记保留故障的请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaiseDefectRequest {
    pub aircraft_id: String,
    pub description: String,
    pub mel_reference: Option<String>,
    pub category: DeferralCategory,
    pub raised_date: NaiveDate,
    pub requested_days: Option<i64>,
}

/// 保留故障及其当前状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefectStatusView {
    pub defect: DeferredDefect,
    pub days_remaining: i64,
    pub status: DueStatus,
}

pub struct DefectApi {
    aircraft_repo: Arc<AircraftRepository>,
    defect_repo: Arc<DeferredDefectRepository>,
    config_manager: Arc<ConfigManager>,
}

impl DefectApi {
    pub fn new(repos: &MaintenanceRepositories, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            aircraft_repo: repos.aircraft.clone(),
            defect_repo: repos.defects.clone(),
            config_manager,
        }
    }

    fn engine(&self) -> ApiResult<DeferralEngine> {
        let cat_a_days = self
            .config_manager
            .get_category_a_default_days()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let thresholds = self
            .config_manager
            .get_due_thresholds()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let thresholds = if thresholds.is_valid() {
            thresholds
        } else {
            Default::default()
        };
        Ok(DeferralEngine::new(cat_a_days, thresholds))
    }

    /// 登记保留故障
    pub fn raise_deferred_defect(&self, request: RaiseDefectRequest) -> ApiResult<DeferredDefect> {
        if request.description.trim().is_empty() {
            return Err(ApiError::InvalidInput("故障描述不能为空".to_string()));
        }
        if self.aircraft_repo.get(&request.aircraft_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "飞机(id={})不存在",
                request.aircraft_id
            )));
        }

        let defect = self.engine()?.defer(DeferralRequest {
            defect_id: uuid::Uuid::new_v4().to_string(),
            aircraft_id: request.aircraft_id,
            description: request.description,
            mel_reference: request.mel_reference,
            category: request.category,
            raised_date: request.raised_date,
            requested_days: request.requested_days,
        });

        self.defect_repo.upsert(&defect)?;
        tracing::info!(
            defect_id = %defect.defect_id,
            category = %defect.category,
            expiry = %defect.expiry_date,
            "保留故障已登记"
        );
        Ok(defect)
    }

    /// 查询某飞机未关闭的保留故障及状态
    pub fn list_open(&self, aircraft_id: &str, today: NaiveDate) -> ApiResult<Vec<DefectStatusView>> {
        let engine = self.engine()?;
        let defects = self.defect_repo.list_open_for_aircraft(aircraft_id)?;

        Ok(defects
            .into_iter()
            .map(|defect| DefectStatusView {
                days_remaining: DeferralEngine::days_remaining(&defect, today),
                status: engine.status(&defect, today),
                defect,
            })
            .collect())
    }

    /// 单个保留故障状态
    pub fn status(&self, defect_id: &str, today: NaiveDate) -> ApiResult<DefectStatusView> {
        let defect = self
            .defect_repo
            .get(defect_id)?
            .ok_or_else(|| ApiError::NotFound(format!("保留故障(id={})不存在", defect_id)))?;
        let engine = self.engine()?;

        Ok(DefectStatusView {
            days_remaining: DeferralEngine::days_remaining(&defect, today),
            status: engine.status(&defect, today),
            defect,
        })
    }

    /// 关闭保留故障
    pub fn close_defect(&self, defect_id: &str, closed_date: NaiveDate) -> ApiResult<()> {
        let defect = self
            .defect_repo
            .get(defect_id)?
            .ok_or_else(|| ApiError::NotFound(format!("保留故障(id={})不存在", defect_id)))?;

        if closed_date < defect.raised_date {
            return Err(ApiError::InvalidInput(format!(
                "关闭日期{}早于登记日期{}",
                closed_date, defect.raised_date
            )));
        }
        if !self.defect_repo.close(defect_id, closed_date)? {
            return Err(ApiError::BusinessRuleViolation(format!(
                "保留故障{}已关闭",
                defect_id
            )));
        }
        Ok(())
    }
}
