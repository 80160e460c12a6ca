//! End-to-end pipeline tests: raw input → canonical dataset → analysis.

use anyhow::{Context, Result, ensure};
use std::collections::HashMap;

use lapboard::{
    AnalysisScope, ImportError, LapFlag, LapStatus, Lapboard, RawTable, TableContainer,
    analysis::downsample_lttb,
};

const GENERIC_HEADER: &str =
    "session_id;track;car_model;driver;stint;lap_number;lap_time_s;session_elapsed_s;pit_type;pit_time_s";

fn generic_csv(rows: &[&str]) -> String {
    let mut text = String::from(GENERIC_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text
}

#[test]
fn semicolon_export_imports_and_computes_kpis() -> Result<()> {
    let csv = generic_csv(&[
        "s1;Spa;GT3;Alice;1;1;30.0;30.0;;",
        "s1;Spa;GT3;Alice;1;2;31.0;61.0;;",
    ]);
    let session = Lapboard::from_delimited(&csv).context("importing semicolon export")?;
    ensure!(session.len() == 2, "expected 2 laps, got {}", session.len());

    let kpis = session.kpis(false);
    ensure!(kpis.best_lap == Some(30.0), "best lap should be 30.0");
    ensure!(kpis.average_pace == Some(30.5), "average should be 30.5");
    let consistency = kpis.consistency.context("two laps must yield a consistency")?;
    ensure!((consistency - 0.7071).abs() < 1e-3, "consistency ≈ 0.707, got {consistency}");
    ensure!(kpis.degradation.is_none(), "degradation needs ten laps");
    ensure!(kpis.total_laps == 2 && kpis.pit_stops == 0, "count mismatch");
    Ok(())
}

#[test]
fn comma_export_is_detected() -> Result<()> {
    let csv = "session_id,track,car_model,driver,stint,lap_number,lap_time_s\n\
               s1,Spa,GT3,Alice,1,1,102.4\n";
    let session = Lapboard::from_delimited(csv).context("importing comma export")?;
    ensure!(session.len() == 1);
    ensure!((session.laps()[0].record.lap_time_s - 102.4).abs() < 1e-9);
    Ok(())
}

#[test]
fn zero_time_lap_with_elapsed_is_retained_as_invalid() -> Result<()> {
    let csv = generic_csv(&[
        "s1;Spa;GT3;Alice;1;1;30.0;30.0;;",
        "s1;Spa;GT3;Alice;1;2;0;120.5;;",
    ]);
    let session = Lapboard::from_delimited(&csv)?;
    ensure!(session.len() == 2, "zero-time lap with elapsed must survive");

    let lap = &session.laps()[1];
    ensure!(lap.record.session_elapsed_s == Some(120.5));
    ensure!(lap.status == LapStatus::Invalid, "status should be invalid, got {:?}", lap.status);
    ensure!(lap.has_flag(LapFlag::NonPositiveTime));
    Ok(())
}

#[test]
fn rows_without_any_time_signal_fail_as_empty_dataset() {
    let csv = generic_csv(&["s1;Spa;GT3;Alice;1;1;0;;;"]);
    let error = Lapboard::from_delimited(&csv).unwrap_err();
    assert_eq!(error, ImportError::EmptyDataset);
    assert_eq!(error.messages().len(), 1);
}

#[test]
fn missing_required_columns_abort_with_named_fields() {
    let csv = "driver;lap_time_s\nAlice;30.0\n";
    let error = Lapboard::from_delimited(csv).unwrap_err();
    match error {
        ImportError::MissingColumns { ref columns } => {
            assert_eq!(
                columns,
                &["session_id", "track", "car_model", "stint", "lap_number"]
            );
            assert_eq!(error.messages().len(), 5);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn scope_filters_only_when_enabled() -> Result<()> {
    let csv = generic_csv(&[
        "s1;Spa;GT3;A;1;1;30.0;30.0;;",
        "s1;Spa;GT3;B;1;1;32.0;32.0;;",
        "s1;Spa;GT3;A;1;2;30.5;60.5;;",
    ]);
    let session = Lapboard::from_delimited(&csv)?;

    let mut scope = AnalysisScope::for_drivers(["A"]);
    let scoped = session.scoped(&scope);
    ensure!(scoped.len() == 2);
    ensure!(scoped.iter().all(|lap| lap.record.driver == "A"));

    scope.enabled = false;
    ensure!(session.scoped(&scope).len() == 3, "disabled scope must return all laps");
    Ok(())
}

#[test]
fn dual_context_comparison_end_to_end() -> Result<()> {
    let csv = generic_csv(&[
        "s1;Spa;GT3;A;1;1;30.0;30.0;;",
        "s1;Spa;GT3;A;1;2;30.0;60.0;;",
        "s1;Spa;GT3;B;1;1;34.0;34.0;;",
        "s1;Spa;GT3;B;1;2;34.0;68.0;;",
    ]);
    let session = Lapboard::from_delimited(&csv)?;

    let comparison = session
        .compare(&AnalysisScope::for_drivers(["A"]), false)
        .context("enabled scope on non-empty dataset must compare")?;
    ensure!((comparison.relative_pace.unwrap() + 2.0).abs() < 1e-9);
    ensure!(comparison.lap_count_ratio == "2 / 4");
    Ok(())
}

#[test]
fn smartrace_dialect_converts_milliseconds_end_to_end() -> Result<()> {
    let csv = "event_id;track;car_model;driver_id;stint;lap_number;lap_time_ms;controller_id;team_id;elapsed_ms\n\
               e1;Clubman;DTM;7;1;1;31245;2;4;31245\n\
               e1;Clubman;DTM;7;1;2;31530;2;4;62775\n";
    let session = Lapboard::from_delimited(csv).context("importing SmartRace export")?;

    let lap = &session.laps()[0];
    ensure!((lap.record.lap_time_s - 31.245).abs() < 1e-9, "ms lap time must convert");
    ensure!(lap.record.session_elapsed_s == Some(31.245));
    ensure!(lap.record.lane == Some(2), "controller id maps to lane");
    ensure!(lap.record.team_number == Some(4), "team id maps to team number");
    Ok(())
}

struct MemoryContainer {
    tables: HashMap<String, RawTable>,
}

impl TableContainer for MemoryContainer {
    fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    fn table(&self, name: &str) -> Option<RawTable> {
        self.tables.get(name).cloned()
    }
}

fn lap_table() -> RawTable {
    RawTable {
        columns: [
            "session_id", "track", "car_model", "driver", "stint", "lap_number", "lap_time_ms",
            "elapsed_ms",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        rows: vec![
            vec![
                "s1".into(), "Club".into(), "GT".into(), "Alice".into(), "1".into(), "1".into(),
                "30500".into(), "30500".into(),
            ],
            vec![
                "s1".into(), "Club".into(), "GT".into(), "Alice".into(), "1".into(), "2".into(),
                "30900".into(), "61400".into(),
            ],
        ],
    }
}

#[test]
fn container_import_matches_text_path_semantics() -> Result<()> {
    let mut tables = HashMap::new();
    tables.insert("Lap Times".to_string(), lap_table());
    tables.insert("Drivers".to_string(), RawTable::default());
    let container = MemoryContainer { tables };

    let session = Lapboard::from_container(&container).context("importing container")?;
    ensure!(session.len() == 2);
    ensure!((session.laps()[0].record.lap_time_s - 30.5).abs() < 1e-9);
    ensure!(session.laps()[0].status == LapStatus::Valid);

    let kpis = session.kpis(false);
    ensure!(kpis.best_lap == Some(30.5));
    Ok(())
}

#[test]
fn container_without_lap_table_is_a_typed_failure() {
    let container = MemoryContainer { tables: HashMap::new() };
    let error = Lapboard::from_container(&container).unwrap_err();
    assert!(matches!(error, ImportError::TableNotFound { .. }));
}

#[test]
fn outlier_is_flagged_but_kept() -> Result<()> {
    let rows: Vec<String> = (1..=5)
        .map(|i| {
            let time = if i == 5 { 100.0 } else { 10.0 };
            format!("s1;Spa;GT3;A;1;{i};{time};{};;", i as f64 * 30.0)
        })
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let session = Lapboard::from_delimited(&generic_csv(&row_refs))?;

    ensure!(session.len() == 5, "outlier must not be dropped");
    let outlier = &session.laps()[4];
    ensure!(outlier.has_flag(LapFlag::StatisticalOutlier));
    ensure!(outlier.status == LapStatus::Suspect);
    Ok(())
}

#[test]
fn benchmark_and_setup_performance_end_to_end() -> Result<()> {
    let csv = "session_id;track;car_model;driver;stint;lap_number;lap_time_s;s1;s2;s3\n\
               s1;Spa;GT3;A;1;1;30.0;9.5;10.2;10.3\n\
               s1;Spa;GT3;A;1;2;30.3;9.4;10.5;10.4\n\
               s1;Spa;GT3;B;1;1;30.6;9.6;10.6;10.4\n";
    let session = Lapboard::from_delimited(csv)?;

    let benchmark = session.benchmark();
    ensure!(benchmark.best_lap == Some(30.0));
    ensure!(benchmark.has_sector_data);
    let theoretical = benchmark.theoretical_best.context("all sectors report")?;
    ensure!(theoretical <= benchmark.best_lap.unwrap(), "theoretical ≤ best lap");
    for lap in session.laps() {
        ensure!(benchmark.best_lap.unwrap() <= lap.record.lap_time_s);
    }

    let subset = session.scoped(&AnalysisScope::for_drivers(["B"]));
    let metrics = session.setup_performance(&subset);
    ensure!(metrics.lap_count == 1);
    let index = metrics.performance_index.context("index computable")?;
    ensure!((index - 30.6 / 30.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn cache_and_pace_series_end_to_end() -> Result<()> {
    let rows: Vec<String> = (1..=40)
        .map(|i| format!("s1;Spa;GT3;A;{};{i};30.0;{};;", if i <= 20 { 1 } else { 2 }, i as f64 * 30.0))
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let session = Lapboard::from_delimited(&generic_csv(&row_refs))?;

    let cache = session.cache();
    ensure!(cache.stints.len() == 2);
    ensure!(cache.drivers.len() == 1);
    ensure!(cache.drivers[0].stint_count == 2);
    ensure!(cache.total_laps == 40);
    ensure!(cache.session_best == Some(30.0));

    let pace = session.pace_series();
    ensure!(pace.len() == 40, "one point per eligible lap");
    ensure!(pace.iter().all(|p| (p.avg_pace_s - 30.0).abs() < 1e-9));

    let bounded = session.pace_series_with(300.0, 10);
    ensure!(bounded.len() <= 11, "decimation bounds the series");
    ensure!(bounded.last().unwrap().elapsed_s == pace.last().unwrap().elapsed_s);
    Ok(())
}

#[test]
fn pace_series_downsamples_for_charting() -> Result<()> {
    let rows: Vec<String> =
        (1..=200).map(|i| format!("s1;Spa;GT3;A;1;{i};30.0;{};;", i as f64 * 30.0)).collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let session = Lapboard::from_delimited(&generic_csv(&row_refs))?;

    let pace = session.pace_series();
    let charted = downsample_lttb(&pace, 50, |p| p.elapsed_s, |p| p.avg_pace_s);
    ensure!(charted.len() == 50);
    ensure!(charted[0].elapsed_s == pace[0].elapsed_s);
    ensure!(charted[49].elapsed_s == pace[199].elapsed_s);
    Ok(())
}

#[test]
fn dataset_orders_by_elapsed_not_input_order() -> Result<()> {
    let csv = generic_csv(&[
        "s1;Spa;GT3;A;1;2;31.0;60.0;;",
        "s1;Spa;GT3;A;1;1;30.0;30.0;;",
    ]);
    let session = Lapboard::from_delimited(&csv)?;
    ensure!(session.laps()[0].record.lap_number == 1);
    ensure!(session.laps()[1].record.lap_number == 2);
    Ok(())
}
