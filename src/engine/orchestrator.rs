// ==========================================
// 机队维修适航跟踪系统 - 到期清单编排器
// ==========================================
// 职责: 编排 履历基线解析 → 到期计算 → 排序 → 预测窗口分桶
// 红线: 编排器不访问数据库，只接受已加载的快照与清单
//       单项计算与批量计算结果必须一致
// ==========================================

use crate::domain::aircraft::{Aircraft, UtilizationSnapshot};
use crate::domain::compliance::ComplianceRecord;
use crate::domain::due::{ComputedDue, DueSummary};
use crate::domain::item::MaintainableItem;
use crate::engine::baseline::ComplianceHistoryResolver;
use crate::engine::due::DueEngine;
use crate::engine::ordering::sort_due_list;
use crate::engine::projection::{ProjectionBucket, ProjectionFilter};
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// AircraftDueReport - 单机到期报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftDueReport {
    pub aircraft_id: String,
    pub registration: String,
    pub snapshot: UtilizationSnapshot,
    pub items: Vec<ComputedDue>, // 已排序，不含未受监控项目
    pub summary: DueSummary,
    pub projections: Vec<ProjectionBucket>,
}

// ==========================================
// DueOrchestrator - 到期清单编排器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DueOrchestrator {
    engine: DueEngine,
    resolver: ComplianceHistoryResolver,
    projection: ProjectionFilter,
}

impl DueOrchestrator {
    pub fn new(engine: DueEngine) -> Self {
        Self {
            engine,
            resolver: ComplianceHistoryResolver::new(),
            projection: ProjectionFilter::new(),
        }
    }

    pub fn engine(&self) -> &DueEngine {
        &self.engine
    }

    pub fn projection(&self) -> &ProjectionFilter {
        &self.projection
    }

    /// 单项计算（逐条解析履历）
    pub fn compute_item(
        &self,
        aircraft: &Aircraft,
        item: &MaintainableItem,
        history: &[ComplianceRecord],
    ) -> ComputedDue {
        let baseline =
            self.resolver
                .resolve_effective_baseline(item, &aircraft.aircraft_id, history);
        self.engine.compute_due(item, &aircraft.snapshot(), &baseline)
    }

    /// 批量生成单机到期清单
    ///
    /// - 只处理属于该飞机的项目
    /// - 剔除无可计算单位的项目
    /// - 按紧迫度排序
    #[instrument(skip_all, fields(
        aircraft_id = %aircraft.aircraft_id,
        items = items.len(),
        records = history.len()
    ))]
    pub fn build_due_list(
        &self,
        aircraft: &Aircraft,
        items: &[MaintainableItem],
        history: &[ComplianceRecord],
    ) -> Vec<ComputedDue> {
        let snapshot = aircraft.snapshot();
        let latest = self.resolver.latest_by_item(&aircraft.aircraft_id, history);

        let mut results: Vec<ComputedDue> = items
            .iter()
            .filter(|item| item.aircraft_id == aircraft.aircraft_id)
            .map(|item| {
                let record = latest.get(item.item_id.as_str()).copied();
                let baseline = ComplianceHistoryResolver::apply_record(item, record);
                self.engine.compute_due(item, &snapshot, &baseline)
            })
            .filter(ComputedDue::is_monitored)
            .collect();

        sort_due_list(&mut results);

        tracing::debug!(monitored = results.len(), "到期清单生成完成");
        results
    }

    /// 生成单机到期报告（清单 + 计数 + 预测窗口）
    pub fn build_report(
        &self,
        aircraft: &Aircraft,
        items: &[MaintainableItem],
        history: &[ComplianceRecord],
        windows: &[i64],
    ) -> AircraftDueReport {
        let snapshot = aircraft.snapshot();
        let due_list = self.build_due_list(aircraft, items, history);
        let summary = DueSummary::from_results(&due_list);
        let projections = self.projection.bucket(&due_list, &snapshot, windows);

        AircraftDueReport {
            aircraft_id: aircraft.aircraft_id.clone(),
            registration: aircraft.registration.clone(),
            snapshot,
            items: due_list,
            summary,
            projections,
        }
    }

    /// 全机队报告
    #[instrument(skip_all, fields(fleet = fleet.len(), items = items.len()))]
    pub fn compute_fleet(
        &self,
        fleet: &[Aircraft],
        items: &[MaintainableItem],
        history: &[ComplianceRecord],
        windows: &[i64],
    ) -> Vec<AircraftDueReport> {
        fleet
            .iter()
            .map(|aircraft| self.build_report(aircraft, items, history, windows))
            .collect()
    }
}
