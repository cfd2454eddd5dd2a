// ==========================================
// 机队维修适航跟踪系统 - 到期查询 API
// ==========================================
// 职责: 到期清单、预测窗口、单项计算、完成履历登记
// 红线: 所有到期计算都经由同一个 DueEngine（经 DueOrchestrator）
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::aircraft::Aircraft;
use crate::domain::compliance::ComplianceRecord;
use crate::domain::due::ComputedDue;
use crate::engine::due::DueEngine;
use crate::engine::orchestrator::{AircraftDueReport, DueOrchestrator};
use crate::repository::{
    AircraftRepository, ComplianceRecordRepository, MaintenanceItemRepository,
    MaintenanceRepositories,
};

/// 完成登记请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordComplianceRequest {
    pub item_id: String,
    pub aircraft_id: String,
    pub date: NaiveDate,
    pub hours_at_completion: Option<f64>,  // 缺省取飞机当前累计小时
    pub cycles_at_completion: Option<i64>, // 缺省取飞机当前累计循环
    pub remarks: Option<String>,
}

// ==========================================
// DueApi - 到期查询 API
// ==========================================
pub struct DueApi {
    aircraft_repo: Arc<AircraftRepository>,
    item_repo: Arc<MaintenanceItemRepository>,
    compliance_repo: Arc<ComplianceRecordRepository>,
    config_manager: Arc<ConfigManager>,
}

impl DueApi {
    pub fn new(repos: &MaintenanceRepositories, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            aircraft_repo: repos.aircraft.clone(),
            item_repo: repos.items.clone(),
            compliance_repo: repos.compliance.clone(),
            config_manager,
        }
    }

    /// 按当前配置构建编排器（阈值变更即时生效）
    fn orchestrator(&self) -> ApiResult<DueOrchestrator> {
        let thresholds = self
            .config_manager
            .get_due_thresholds()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(DueOrchestrator::new(DueEngine::new(thresholds)))
    }

    fn projection_windows(&self) -> ApiResult<Vec<i64>> {
        self.config_manager
            .get_projection_windows()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    fn load_aircraft(&self, aircraft_id: &str) -> ApiResult<Aircraft> {
        if aircraft_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("飞机ID不能为空".to_string()));
        }
        self.aircraft_repo
            .get(aircraft_id)?
            .ok_or_else(|| ApiError::NotFound(format!("飞机(id={})不存在", aircraft_id)))
    }

    /// 单机到期清单（已排序，不含未受监控项目）
    pub fn list_due_items(&self, aircraft_id: &str) -> ApiResult<Vec<ComputedDue>> {
        let aircraft = self.load_aircraft(aircraft_id)?;
        let items = self.item_repo.list_for_aircraft(aircraft_id)?;
        let history = self.compliance_repo.list_for_aircraft(aircraft_id)?;

        Ok(self.orchestrator()?.build_due_list(&aircraft, &items, &history))
    }

    /// 单机到期报告（清单 + 计数 + 配置的预测窗口）
    pub fn get_report(&self, aircraft_id: &str) -> ApiResult<AircraftDueReport> {
        let aircraft = self.load_aircraft(aircraft_id)?;
        let items = self.item_repo.list_for_aircraft(aircraft_id)?;
        let history = self.compliance_repo.list_for_aircraft(aircraft_id)?;
        let windows = self.projection_windows()?;

        Ok(self
            .orchestrator()?
            .build_report(&aircraft, &items, &history, &windows))
    }

    /// 全机队报告
    pub fn get_fleet_report(&self) -> ApiResult<Vec<AircraftDueReport>> {
        let fleet = self.aircraft_repo.list()?;
        let items = self.item_repo.list()?;
        let windows = self.projection_windows()?;
        let orchestrator = self.orchestrator()?;

        let mut reports = Vec::with_capacity(fleet.len());
        for aircraft in &fleet {
            let history = self.compliance_repo.list_for_aircraft(&aircraft.aircraft_id)?;
            reports.push(orchestrator.build_report(aircraft, &items, &history, &windows));
        }
        Ok(reports)
    }

    /// 指定窗口的预测清单
    pub fn get_projection(&self, aircraft_id: &str, window_days: i64) -> ApiResult<Vec<ComputedDue>> {
        if window_days <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "预测窗口必须为正数: {}",
                window_days
            )));
        }

        let aircraft = self.load_aircraft(aircraft_id)?;
        let items = self.item_repo.list_for_aircraft(aircraft_id)?;
        let history = self.compliance_repo.list_for_aircraft(aircraft_id)?;
        let orchestrator = self.orchestrator()?;

        let due_list = orchestrator.build_due_list(&aircraft, &items, &history);
        Ok(orchestrator
            .projection()
            .filter_window(&due_list, &aircraft.snapshot(), window_days))
    }

    /// 单项计算
    ///
    /// 未受监控的项目也返回结果（limits 为空）
    pub fn compute_item(&self, item_id: &str) -> ApiResult<ComputedDue> {
        let item = self
            .item_repo
            .get(item_id)?
            .ok_or_else(|| ApiError::NotFound(format!("维修项目(id={})不存在", item_id)))?;
        let aircraft = self.load_aircraft(&item.aircraft_id)?;
        let history = self
            .compliance_repo
            .list_for_item(&item.item_id, &item.aircraft_id)?;

        Ok(self.orchestrator()?.compute_item(&aircraft, &item, &history))
    }

    /// 登记一次完成（只追加）
    pub fn record_compliance(&self, request: RecordComplianceRequest) -> ApiResult<ComplianceRecord> {
        let aircraft = self.load_aircraft(&request.aircraft_id)?;
        let item = self.item_repo.get(&request.item_id)?.ok_or_else(|| {
            ApiError::NotFound(format!("维修项目(id={})不存在", request.item_id))
        })?;

        if item.aircraft_id != aircraft.aircraft_id {
            return Err(ApiError::BusinessRuleViolation(format!(
                "维修项目{}不属于飞机{}",
                item.item_id, aircraft.aircraft_id
            )));
        }
        if request.date > aircraft.current_date {
            tracing::warn!(
                item_id = %item.item_id,
                date = %request.date,
                as_of = %aircraft.current_date,
                "完成日期晚于飞机数据截止日期"
            );
        }
        if let Some(hours) = request.hours_at_completion {
            if !hours.is_finite() || hours < 0.0 {
                return Err(ApiError::InvalidInput(format!("完成时小时数无效: {}", hours)));
            }
        }
        if let Some(cycles) = request.cycles_at_completion {
            if cycles < 0 {
                return Err(ApiError::InvalidInput(format!("完成时循环数无效: {}", cycles)));
            }
        }

        // 仅当日完成可取飞机当前读数；补录的记录缺读数时留空
        let done_today = request.date == aircraft.current_date;
        let hours_at_completion = request
            .hours_at_completion
            .or_else(|| done_today.then_some(aircraft.current_hours));
        let cycles_at_completion = request
            .cycles_at_completion
            .or_else(|| done_today.then_some(aircraft.current_cycles));

        let record = ComplianceRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            item_id: item.item_id,
            aircraft_id: aircraft.aircraft_id,
            date: request.date,
            hours_at_completion,
            cycles_at_completion,
            remarks: request.remarks,
        };

        self.compliance_repo.append(&record)?;
        tracing::info!(
            record_id = %record.record_id,
            item_id = %record.item_id,
            aircraft_id = %record.aircraft_id,
            "完成履历已登记"
        );
        Ok(record)
    }
}
