// ==========================================
// 到期计算引擎集成测试
// ==========================================
// 覆盖: 间隔档位判定、各单位剩余裕度、四级状态、预计天数、排序
// ==========================================


use fleet_mx_compliance::domain::DueThresholds;
use fleet_mx_compliance::{
    DueEngine, DueOrchestrator, DueStatus, DueUnit, IntervalTier, ItemKind, LastDoneBaseline,
};
use test_helpers::{date, test_aircraft, ItemBuilder};

fn engine() -> DueEngine {
    DueEngine::new(DueThresholds::default())
}

// ==========================================
// 间隔档位
// ==========================================

#[test]
fn test_initial_tier_without_baseline() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours])
        .initial(Some(1100.0), None, None)
        .repeat(Some(500.0), None, None)
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    let hours = due.limit(DueUnit::Hours).expect("应有小时裕度");
    assert_eq!(hours.tier, IntervalTier::Initial);
    assert_eq!(hours.remaining, 100.0);
    assert_eq!(hours.next_due_value, Some(1100.0));
    // 100h / 5h 每日 = 20 天
    assert_eq!(due.estimated_days_to_due, Some(20.0));
    assert_eq!(due.status, DueStatus::DueSoon);
}

#[test]
fn test_repeat_tier_after_baseline() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours])
        .initial(Some(1100.0), None, None)
        .repeat(Some(500.0), None, None)
        .last_done(None, Some(900.0), None)
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    let hours = due.limit(DueUnit::Hours).unwrap();
    assert_eq!(hours.tier, IntervalTier::Repeat);
    assert_eq!(hours.remaining, 400.0);
    assert_eq!(due.estimated_days_to_due, Some(80.0));
    assert_eq!(due.status, DueStatus::Ok);
}

#[test]
fn test_initial_then_repeat_after_first_accomplishment() {
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours])
        .initial(Some(100.0), None, None)
        .repeat(Some(50.0), None, None)
        .build();

    let mut aircraft = test_aircraft("AC1");
    aircraft.current_hours = 80.0;
    let due = engine().compute_due(&item, &aircraft.snapshot(), &LastDoneBaseline::none());
    assert_eq!(due.limits[0].remaining, 20.0);

    aircraft.current_hours = 120.0;
    let done_at_100 = LastDoneBaseline {
        date: None,
        hours: Some(100.0),
        cycles: None,
    };
    let due = engine().compute_due(&item, &aircraft.snapshot(), &done_at_100);
    assert_eq!(due.limits[0].remaining, 30.0);
    assert_eq!(due.limits[0].tier, IntervalTier::Repeat);
}

#[test]
fn test_repeat_tier_falls_back_to_initial_per_unit() {
    // 档位按项目判定；选中档位缺该单位时回退另一档位
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours, DueUnit::Cycles])
        .initial(None, Some(1000.0), None)
        .repeat(Some(500.0), None, None)
        .last_done(None, Some(900.0), Some(100))
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    assert_eq!(due.limit(DueUnit::Hours).unwrap().tier, IntervalTier::Repeat);
    let cycles = due.limit(DueUnit::Cycles).unwrap();
    assert_eq!(cycles.tier, IntervalTier::Initial);
    assert_eq!(cycles.remaining, 300.0);
}

#[test]
fn test_legacy_interval_used_when_no_tier_defined() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .legacy(None, None, Some(365.0))
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    assert_eq!(due.limits.len(), 1);
    let days = due.limit(DueUnit::Days).unwrap();
    assert_eq!(days.tier, IntervalTier::Legacy);
    assert_eq!(days.remaining, 365.0);
    assert_eq!(days.next_due_date, Some(date(2025, 6, 1)));
    assert_eq!(due.status, DueStatus::Ok);
}

// ==========================================
// 各单位剩余裕度
// ==========================================

#[test]
fn test_cycles_remaining_from_last_done() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Cycles])
        .repeat(None, Some(200.0), None)
        .last_done(None, None, Some(700))
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    let cycles = due.limit(DueUnit::Cycles).unwrap();
    assert_eq!(cycles.remaining, 100.0);
    assert_eq!(cycles.next_due_value, Some(900.0));
    // 100cyc / 4cyc 每日 = 25 天
    assert_eq!(due.estimated_days_to_due, Some(25.0));
    assert_eq!(due.status, DueStatus::DueSoon);
}

#[test]
fn test_days_remaining_from_last_done_date() {
    let mut aircraft = test_aircraft("AC1");
    aircraft.current_date = date(2024, 1, 20);

    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Days])
        .repeat(None, None, Some(30.0))
        .last_done(Some(date(2024, 1, 1)), None, None)
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    let days = due.limit(DueUnit::Days).unwrap();
    assert_eq!(days.next_due_date, Some(date(2024, 1, 31)));
    assert_eq!(days.remaining, 11.0);
    assert_eq!(due.estimated_days_to_due, Some(11.0));
    assert_eq!(due.status, DueStatus::DueSoon);
}

#[test]
fn test_invalid_intervals_are_undefined() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours, DueUnit::Days])
        .initial(Some(0.0), None, Some(-10.0))
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    assert!(due.limits.is_empty(), "0/负数间隔不应产生裕度");
    assert!(!due.is_monitored());
    assert_eq!(due.status, DueStatus::Ok);
    assert_eq!(due.estimated_days_to_due, None);
}

#[test]
fn test_governing_units_inferred_when_absent() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .initial(Some(2000.0), Some(1600.0), None)
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    let units: Vec<DueUnit> = due.limits.iter().map(|l| l.unit).collect();
    assert_eq!(units, vec![DueUnit::Hours, DueUnit::Cycles]);
}

// ==========================================
// 四级状态
// ==========================================

#[test]
fn test_worst_unit_governs_status() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours, DueUnit::Days])
        .repeat(Some(500.0), None, Some(40.0))
        .last_done(Some(date(2024, 5, 1)), Some(900.0), None)
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);

    // 小时: 400h → 80 天 (OK)；日历: 40 − 31 = 9 天 (DUE_SOON)
    assert_eq!(due.limit(DueUnit::Hours).unwrap().remaining, 400.0);
    assert_eq!(due.limit(DueUnit::Days).unwrap().remaining, 9.0);
    assert_eq!(due.status, DueStatus::DueSoon);
    assert_eq!(due.estimated_days_to_due, Some(9.0));
    assert_eq!(due.min_remaining(), Some(9.0));
}

#[test]
fn test_status_bands() {
    let aircraft = test_aircraft("AC1");
    let snapshot = aircraft.snapshot();
    let engine = engine();

    // (上次完成小时, 期望状态)；间隔 500h，当前 1000h，日均 5h
    let cases = [
        (900.0, DueStatus::Ok),      // 400h → 80 天
        (800.0, DueStatus::Due),     // 300h → 60 天，恰在上界
        (760.0, DueStatus::Due),     // 260h → 52 天
        (650.0, DueStatus::DueSoon), // 150h → 30 天
        (620.0, DueStatus::DueSoon), // 120h → 24 天
        (500.0, DueStatus::Overdue), // 0h → 0 天
        (490.0, DueStatus::Overdue), // -10h
    ];

    for (last_hours, expected) in cases {
        let item = ItemBuilder::new("T1", "AC1")
            .units(&[DueUnit::Hours])
            .repeat(Some(500.0), None, None)
            .last_done(None, Some(last_hours), None)
            .build();
        let due = engine.compute_due(&item, &snapshot, &item.baseline);
        assert_eq!(due.status, expected, "上次完成 {}h 的状态不符", last_hours);
    }
}

#[test]
fn test_zero_rate_has_no_estimate() {
    let mut aircraft = test_aircraft("AC1");
    aircraft.avg_daily_hours = 0.0;

    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours])
        .repeat(Some(500.0), None, None)
        .last_done(None, Some(550.0), None)
        .build();

    let due = engine().compute_due(&item, &aircraft.snapshot(), &item.baseline);
    assert_eq!(due.limit(DueUnit::Hours).unwrap().remaining, 50.0);
    assert_eq!(due.estimated_days_to_due, None);
    assert_eq!(due.status, DueStatus::Ok);

    let overdue = ItemBuilder::new("T2", "AC1")
        .units(&[DueUnit::Hours])
        .repeat(Some(500.0), None, None)
        .last_done(None, Some(400.0), None)
        .build();
    let due = engine().compute_due(&overdue, &aircraft.snapshot(), &overdue.baseline);
    assert_eq!(due.status, DueStatus::Overdue);
}

#[test]
fn test_custom_thresholds_and_invalid_fallback() {
    let aircraft = test_aircraft("AC1");
    let item = ItemBuilder::new("T1", "AC1")
        .units(&[DueUnit::Hours])
        .initial(Some(1100.0), None, None)
        .build();

    // 20 天: 自定义阈值 10/20 下为 DUE
    let tight = DueEngine::new(DueThresholds {
        due_soon_days: 10,
        due_days: 20,
    });
    let due = tight.compute_due(&item, &aircraft.snapshot(), &LastDoneBaseline::none());
    assert_eq!(due.status, DueStatus::Due);

    let broken = DueEngine::new(DueThresholds {
        due_soon_days: 90,
        due_days: 60,
    });
    assert_eq!(broken.thresholds(), DueThresholds::default());
}

// ==========================================
// 到期清单（过滤 + 排序）
// ==========================================

#[test]
fn test_due_list_filters_and_orders() {
    let aircraft = test_aircraft("AC1");
    let items = vec![
        ItemBuilder::new("A", "AC1")
            .title("Alpha")
            .units(&[DueUnit::Hours])
            .repeat(Some(500.0), None, None)
            .last_done(None, Some(900.0), None)
            .build(),
        ItemBuilder::new("B", "AC1")
            .title("Bravo")
            .repeat(None, None, Some(40.0))
            .last_done(Some(date(2024, 5, 1)), None, None)
            .build(),
        ItemBuilder::new("C", "AC1")
            .title("Charlie")
            .units(&[DueUnit::Hours])
            .repeat(Some(500.0), None, None)
            .last_done(None, Some(490.0), None)
            .build(),
        // 无间隔: 不纳入监控
        ItemBuilder::new("D", "AC1").title("Delta").build(),
        // 其他飞机
        ItemBuilder::new("E", "AC2")
            .units(&[DueUnit::Hours])
            .initial(Some(10.0), None, None)
            .build(),
    ];

    let orchestrator = DueOrchestrator::new(engine());
    let list = orchestrator.build_due_list(&aircraft, &items, &[]);

    let ids: Vec<&str> = list.iter().map(|d| d.item_id.as_str()).collect();
    assert_eq!(ids, vec!["C", "B", "A"]);
    assert_eq!(list[0].status, DueStatus::Overdue);
}

#[test]
fn test_due_list_ties_break_on_title_then_reference() {
    let aircraft = test_aircraft("AC1");
    let make = |id: &str, title: &str, reference: &str| {
        ItemBuilder::new(id, "AC1")
            .kind(ItemKind::Task)
            .title(title)
            .reference(reference)
            .units(&[DueUnit::Hours])
            .initial(Some(1100.0), None, None)
            .build()
    };
    let items = vec![
        make("3", "Wheel change", "32-40-01"),
        make("1", "Wheel change", "32-40-00"),
        make("2", "Brake wear check", "32-42-00"),
    ];

    let list = DueOrchestrator::new(engine()).build_due_list(&aircraft, &items, &[]);
    let ids: Vec<&str> = list.iter().map(|d| d.item_id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1", "3"]);
}
