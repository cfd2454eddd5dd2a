// ==========================================
// 完成履历基线解析测试
// ==========================================


use fleet_mx_compliance::{
    ComplianceHistoryResolver, DueEngine, DueOrchestrator, DueStatus, DueUnit, LastDoneBaseline,
};
use test_helpers::{compliance, date, test_aircraft, ItemBuilder};

#[test]
fn test_no_history_keeps_static_baseline() {
    let item = ItemBuilder::new("T1", "AC1")
        .last_done(Some(date(2024, 1, 1)), Some(500.0), Some(400))
        .build();

    let baseline = ComplianceHistoryResolver::new().resolve_effective_baseline(&item, "AC1", &[]);
    assert_eq!(baseline, item.baseline);
}

#[test]
fn test_latest_matching_record_wins() {
    let item = ItemBuilder::new("T1", "AC1")
        .last_done(Some(date(2023, 6, 1)), Some(300.0), Some(250))
        .build();
    let history = vec![
        compliance("r1", "T1", "AC1", date(2024, 1, 1), Some(500.0), Some(400)),
        compliance("r2", "T1", "AC1", date(2024, 3, 1), Some(700.0), Some(560)),
        // 其他飞机、其他项目的较新记录不参与
        compliance("r3", "T1", "AC2", date(2024, 5, 1), Some(900.0), Some(700)),
        compliance("r4", "T2", "AC1", date(2024, 5, 1), Some(950.0), Some(760)),
    ];

    let baseline =
        ComplianceHistoryResolver::new().resolve_effective_baseline(&item, "AC1", &history);

    assert_eq!(
        baseline,
        LastDoneBaseline {
            date: Some(date(2024, 3, 1)),
            hours: Some(700.0),
            cycles: Some(560),
        }
    );
}

#[test]
fn test_missing_counters_retain_static_values() {
    let item = ItemBuilder::new("T1", "AC1")
        .last_done(Some(date(2023, 6, 1)), Some(300.0), Some(250))
        .build();
    let history = vec![compliance("r1", "T1", "AC1", date(2024, 2, 1), None, Some(600))];

    let baseline =
        ComplianceHistoryResolver::new().resolve_effective_baseline(&item, "AC1", &history);

    assert_eq!(baseline.date, Some(date(2024, 2, 1)));
    assert_eq!(baseline.hours, Some(300.0), "履历缺小时数时应保留静态值");
    assert_eq!(baseline.cycles, Some(600));
}

#[test]
fn test_same_day_tie_breaks_on_record_id() {
    let item = ItemBuilder::new("T1", "AC1").build();
    let history = vec![
        compliance("rec-b", "T1", "AC1", date(2024, 4, 1), Some(820.0), None),
        compliance("rec-a", "T1", "AC1", date(2024, 4, 1), Some(810.0), None),
    ];
    let resolver = ComplianceHistoryResolver::new();

    let baseline = resolver.resolve_effective_baseline(&item, "AC1", &history);
    assert_eq!(baseline.hours, Some(820.0));

    // 输入顺序不影响结果
    let reversed: Vec<_> = history.iter().rev().cloned().collect();
    let baseline = resolver.resolve_effective_baseline(&item, "AC1", &reversed);
    assert_eq!(baseline.hours, Some(820.0));
}

#[test]
fn test_latest_by_item_agrees_with_single_resolution() {
    let items = vec![
        ItemBuilder::new("T1", "AC1").build(),
        ItemBuilder::new("T2", "AC1").build(),
        ItemBuilder::new("T3", "AC1").build(),
    ];
    let history = vec![
        compliance("r1", "T1", "AC1", date(2024, 1, 1), Some(500.0), None),
        compliance("r2", "T1", "AC1", date(2024, 2, 1), Some(600.0), None),
        compliance("r3", "T2", "AC1", date(2024, 3, 1), Some(700.0), None),
        compliance("r4", "T2", "AC2", date(2024, 4, 1), Some(800.0), None),
    ];
    let resolver = ComplianceHistoryResolver::new();
    let latest = resolver.latest_by_item("AC1", &history);

    assert_eq!(latest.len(), 2);
    for item in &items {
        let batch = ComplianceHistoryResolver::apply_record(
            item,
            latest.get(item.item_id.as_str()).copied(),
        );
        let single = resolver.resolve_effective_baseline(item, "AC1", &history);
        assert_eq!(batch, single, "项目 {} 的批量与逐个解析结果不一致", item.item_id);
    }
}

#[test]
fn test_compliance_moves_item_onto_repeat_interval() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours])
        .initial(Some(600.0), None, None)
        .repeat(Some(500.0), None, None)
        .build();
    let orchestrator = DueOrchestrator::new(DueEngine::default());

    // 首次间隔 600h 已超
    let before = orchestrator.compute_item(&aircraft, &item, &[]);
    assert_eq!(before.status, DueStatus::Overdue);
    assert_eq!(before.limits[0].remaining, -400.0);

    let history = vec![compliance("r1", "T1", "AC1", date(2024, 5, 20), Some(950.0), Some(780))];
    let after = orchestrator.compute_item(&aircraft, &item, &history);

    // 950 + 500 − 1000 = 450h → 90 天
    assert_eq!(after.limits[0].remaining, 450.0);
    assert_eq!(after.estimated_days_to_due, Some(90.0));
    assert_eq!(after.status, DueStatus::Ok);
}
