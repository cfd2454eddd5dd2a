// ==========================================
// 预测窗口过滤测试
// ==========================================
// 覆盖: 多单位"或"关系、已超期项目、分桶、零利用率
// ==========================================


use fleet_mx_compliance::domain::ComputedDue;
use fleet_mx_compliance::engine::DEFAULT_PROJECTION_WINDOWS;
use fleet_mx_compliance::{Aircraft, DueEngine, DueOrchestrator, DueUnit, ProjectionFilter};
use test_helpers::{date, test_aircraft, ItemBuilder};

fn due_list(aircraft: &Aircraft) -> Vec<ComputedDue> {
    let items = vec![
        // 小时 400h (80 天)，日历 20 天
        ItemBuilder::new("MIXED", "AC1")
            .units(&[DueUnit::Hours, DueUnit::Days])
            .repeat(Some(500.0), None, Some(51.0))
            .last_done(Some(date(2024, 5, 1)), Some(900.0), None)
            .build(),
        // 小时 200h (40 天)
        ItemBuilder::new("HRS", "AC1")
            .units(&[DueUnit::Hours])
            .initial(Some(1200.0), None, None)
            .build(),
        // 循环 −20
        ItemBuilder::new("LATE", "AC1")
            .units(&[DueUnit::Cycles])
            .repeat(None, Some(100.0), None)
            .last_done(None, None, Some(680))
            .build(),
        // 日历 400 天
        ItemBuilder::new("FAR", "AC1")
            .legacy(None, None, Some(400.0))
            .build(),
    ];
    DueOrchestrator::new(DueEngine::default()).build_due_list(aircraft, &items, &[])
}

fn ids(items: &[ComputedDue]) -> Vec<&str> {
    items.iter().map(|c| c.item_id.as_str()).collect()
}

#[test]
fn test_window_thresholds_per_unit() {
    let snapshot = test_aircraft("AC1").snapshot();

    assert_eq!(ProjectionFilter::window_threshold(DueUnit::Hours, &snapshot, 30), 150.0);
    assert_eq!(ProjectionFilter::window_threshold(DueUnit::Cycles, &snapshot, 30), 120.0);
    assert_eq!(ProjectionFilter::window_threshold(DueUnit::Days, &snapshot, 30), 30.0);
}

#[test]
fn test_any_unit_inside_window_includes_item() {
    let aircraft = test_aircraft("AC1");
    let list = due_list(&aircraft);
    let filter = ProjectionFilter::new();
    let snapshot = aircraft.snapshot();

    let mixed = list.iter().find(|c| c.item_id == "MIXED").unwrap();
    assert_eq!(mixed.limit(DueUnit::Days).unwrap().remaining, 20.0);
    // 小时单位在 30 天窗口外，但日历单位在窗口内
    assert!(filter.is_within_projection_window(mixed, &snapshot, 30));

    let hrs = list.iter().find(|c| c.item_id == "HRS").unwrap();
    assert!(!filter.is_within_projection_window(hrs, &snapshot, 30));
    assert!(filter.is_within_projection_window(hrs, &snapshot, 60));
}

#[test]
fn test_filter_window_keeps_order_and_overdue_items() {
    let aircraft = test_aircraft("AC1");
    let list = due_list(&aircraft);
    let filter = ProjectionFilter::new();

    let within_30 = filter.filter_window(&list, &aircraft.snapshot(), 30);
    assert_eq!(ids(&within_30), vec!["LATE", "MIXED"]);

    let within_60 = filter.filter_window(&list, &aircraft.snapshot(), 60);
    assert_eq!(ids(&within_60), vec!["LATE", "MIXED", "HRS"]);
}

#[test]
fn test_default_buckets() {
    let aircraft = test_aircraft("AC1");
    let list = due_list(&aircraft);

    let buckets =
        ProjectionFilter::new().bucket(&list, &aircraft.snapshot(), &DEFAULT_PROJECTION_WINDOWS);

    let sizes: Vec<(i64, usize)> = buckets
        .iter()
        .map(|b| (b.window_days, b.items.len()))
        .collect();
    assert_eq!(sizes, vec![(30, 2), (60, 3), (90, 3)]);
}

#[test]
fn test_zero_rate_only_admits_expired_limits() {
    let mut aircraft = test_aircraft("AC1");
    aircraft.avg_daily_cycles = 0.0;
    let snapshot = aircraft.snapshot();

    assert_eq!(ProjectionFilter::window_threshold(DueUnit::Cycles, &snapshot, 90), 0.0);

    let list = due_list(&aircraft);
    let late = list.iter().find(|c| c.item_id == "LATE").unwrap();
    assert!(ProjectionFilter::new().is_within_projection_window(late, &snapshot, 30));
}
