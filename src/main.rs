// ==========================================
// 机队维修适航跟踪系统 - 命令行入口
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use fleet_mx_compliance::api::{RaiseDefectRequest, RecordComplianceRequest};
use fleet_mx_compliance::app::{get_default_db_path, AppState};
use fleet_mx_compliance::domain::{Aircraft, ComputedDue, DueUnit};
use fleet_mx_compliance::{logging, DeferralCategory};

#[derive(Parser)]
#[command(name = "fleet-mx")]
#[command(about = "Fleet maintenance compliance due-status tracker", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database path (defaults to FLEET_MX_DB_PATH or the user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs to stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    InitDb,
    /// Create or update an aircraft utilization record
    UpsertAircraft {
        #[arg(long)]
        id: String,
        #[arg(long)]
        registration: String,
        #[arg(long = "type")]
        aircraft_type: String,
        #[arg(long)]
        hours: f64,
        #[arg(long)]
        cycles: i64,
        #[arg(long)]
        as_of: NaiveDate,
        #[arg(long)]
        avg_daily_hours: f64,
        #[arg(long)]
        avg_daily_cycles: f64,
    },
    /// Import maintenance items from a CSV file
    ImportItems {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show the due list for one aircraft, or every aircraft when omitted
    Due {
        #[arg(long)]
        aircraft: Option<String>,
    },
    /// Show items falling due within a forward window
    Projection {
        #[arg(long)]
        aircraft: String,
        #[arg(long, default_value_t = 30)]
        window: i64,
    },
    /// Record an accomplishment of a maintenance item
    Record {
        #[arg(long)]
        aircraft: String,
        #[arg(long)]
        item: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        cycles: Option<i64>,
        #[arg(long)]
        remarks: Option<String>,
    },
    /// Raise a deferred defect under a MEL category
    Defer {
        #[arg(long)]
        aircraft: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        mel: Option<String>,
        #[arg(long)]
        raised: NaiveDate,
        /// Deferral period in days (category A only)
        #[arg(long)]
        days: Option<i64>,
    },
    /// List open deferred defects for an aircraft
    Defects {
        #[arg(long)]
        aircraft: String,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Close a deferred defect
    CloseDefect {
        #[arg(long)]
        id: String,
        #[arg(long)]
        date: NaiveDate,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_limits(due: &ComputedDue) -> String {
    due.limits
        .iter()
        .map(|l| match l.unit {
            DueUnit::Days => format!("{} {:.0}d", l.unit, l.remaining),
            _ => format!("{} {:.1}", l.unit, l.remaining),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_due_table(items: &[ComputedDue]) {
    if items.is_empty() {
        println!("No interval-monitored items.");
        return;
    }
    for due in items {
        let est = due
            .estimated_days_to_due
            .map(|d| format!("{:.0}d", d))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<12} {:<40} [{}] est {}",
            due.status.to_db_str(),
            due.item_id,
            due.title,
            format_limits(due),
            est
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    tracing::info!("{} v{} 使用数据库: {}", fleet_mx_compliance::APP_NAME, fleet_mx_compliance::VERSION, db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::InitDb => {
            println!("Schema ready at {}.", state.db_path);
        }
        Commands::UpsertAircraft {
            id,
            registration,
            aircraft_type,
            hours,
            cycles,
            as_of,
            avg_daily_hours,
            avg_daily_cycles,
        } => {
            let aircraft = Aircraft {
                aircraft_id: id,
                registration,
                aircraft_type,
                current_hours: hours,
                current_cycles: cycles,
                current_date: as_of,
                avg_daily_hours,
                avg_daily_cycles,
            };
            state.repos.aircraft.upsert(&aircraft)?;
            println!("Aircraft {} saved.", aircraft.registration);
        }
        Commands::ImportItems { csv } => {
            let summary = state
                .import_api
                .import_items(&csv.to_string_lossy())
                .with_context(|| format!("failed to import {}", csv.display()))?;
            if cli.json {
                print_json(&summary)?;
            } else {
                println!(
                    "Imported {} of {} rows from {}.",
                    summary.imported,
                    summary.total_rows,
                    csv.display()
                );
                for rejection in &summary.rejected {
                    println!("  row {}: {}", rejection.row, rejection.reason);
                }
            }
        }
        Commands::Due { aircraft: Some(aircraft) } => {
            let report = state.due_api.get_report(&aircraft)?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!(
                    "{} as of {}: {} items, {} overdue, {} due, {} due soon",
                    report.registration,
                    report.snapshot.current_date,
                    report.summary.total,
                    report.summary.overdue,
                    report.summary.due,
                    report.summary.due_soon
                );
                print_due_table(&report.items);
            }
        }
        Commands::Due { aircraft: None } => {
            let reports = state.due_api.get_fleet_report()?;
            if cli.json {
                print_json(&reports)?;
            } else {
                for report in &reports {
                    println!("== {} ({})", report.registration, report.aircraft_id);
                    print_due_table(&report.items);
                }
            }
        }
        Commands::Projection { aircraft, window } => {
            let items = state.due_api.get_projection(&aircraft, window)?;
            if cli.json {
                print_json(&items)?;
            } else {
                println!("Items due within {} days:", window);
                print_due_table(&items);
            }
        }
        Commands::Record {
            aircraft,
            item,
            date,
            hours,
            cycles,
            remarks,
        } => {
            let record = state.due_api.record_compliance(RecordComplianceRequest {
                item_id: item,
                aircraft_id: aircraft,
                date,
                hours_at_completion: hours,
                cycles_at_completion: cycles,
                remarks,
            })?;
            if cli.json {
                print_json(&record)?;
            } else {
                println!("Recorded {} for item {}.", record.record_id, record.item_id);
            }
        }
        Commands::Defer {
            aircraft,
            category,
            description,
            mel,
            raised,
            days,
        } => {
            let category = DeferralCategory::from_str(&category)
                .ok_or_else(|| anyhow!("unknown deferral category: {}", category))?;
            let defect = state.defect_api.raise_deferred_defect(RaiseDefectRequest {
                aircraft_id: aircraft,
                description,
                mel_reference: mel,
                category,
                raised_date: raised,
                requested_days: days,
            })?;
            if cli.json {
                print_json(&defect)?;
            } else {
                println!(
                    "Deferred {} (cat {}) for {} days, expires {}.",
                    defect.defect_id, defect.category, defect.deferral_days, defect.expiry_date
                );
            }
        }
        Commands::Defects { aircraft, today } => {
            let today = match today {
                Some(d) => d,
                None => state
                    .repos
                    .aircraft
                    .get(&aircraft)?
                    .map(|a| a.current_date)
                    .ok_or_else(|| anyhow!("aircraft {} not found", aircraft))?,
            };
            let defects = state.defect_api.list_open(&aircraft, today)?;
            if cli.json {
                print_json(&defects)?;
            } else if defects.is_empty() {
                println!("No open deferred defects.");
            } else {
                for view in &defects {
                    println!(
                        "{:<10} cat {} {:>4}d  {}  {}",
                        view.status.to_db_str(),
                        view.defect.category,
                        view.days_remaining,
                        view.defect.expiry_date,
                        view.defect.description
                    );
                }
            }
        }
        Commands::CloseDefect { id, date } => {
            state.defect_api.close_defect(&id, date)?;
            println!("Closed {}.", id);
        }
    }

    Ok(())
}
