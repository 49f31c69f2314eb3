use analytics::export::export_csv_file;
use analytics::{alerts, equipment, feed, finance, health, labour, milk, AnalyticsEngine, FarmSnapshot};
use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use configuration::{init_tracing, load_config, resolve_from_environment, Settings};
use core_types::RecordFilter;
use database::{connect, init_schema, DbRepository};
use std::path::{Path, PathBuf};

mod render;

use render::{emit, opt, table};

/// The main entry point for the dairy farm records tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; DATABASE_URL may come from the shell or the secret store.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = load_config().context("Failed to load configuration")?;
    let _log_guard = init_tracing(&settings.logging).context("Failed to initialise logging")?;

    let location = resolve_from_environment(&settings.database)
        .context("Could not determine where the farm database lives")?;
    let pool = connect(&location, &settings.database)
        .await
        .context("Failed to connect to the farm database")?;
    init_schema(&pool)
        .await
        .context("Failed to initialise the database schema")?;
    tracing::debug!("Schema is up to date.");

    let app = App {
        repo: DbRepository::new(pool)
            .with_cascade_policy(settings.cascade.clone())
            .context("Invalid cascade policy")?,
        engine: AnalyticsEngine::new(&settings.metrics),
        today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        json: cli.json,
        settings,
    };

    match cli.command {
        Commands::InitDb => app.init_db().await,
        Commands::Dashboard => app.dashboard().await,
        Commands::Herd => app.herd().await,
        Commands::Milk(range) => app.milk(range).await,
        Commands::Breeding => app.breeding().await,
        Commands::Alerts => app.alerts().await,
        Commands::Finance(range) => app.finance(range).await,
        Commands::Feed(range) => app.feed(range).await,
        Commands::Labour(range) => app.labour(range).await,
        Commands::Equipment(range) => app.equipment(range).await,
        Commands::Health(range) => app.health(range).await,
        Commands::Export(args) => app.export(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Records and reports for a small dairy farm.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Evaluate date-dependent metrics as of this day (format: YYYY-MM-DD).
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create any missing tables and show row counts.
    InitDb,
    /// Herd, milk, money and alerts at a glance.
    Dashboard,
    /// List the herd with pregnancy and lactation status.
    Herd,
    /// Milk production totals.
    Milk(RangeArgs),
    /// Inseminations still waiting for a calving.
    Breeding,
    /// Expiring stock, low stock and health follow-ups.
    Alerts,
    /// Income, expense and net by category and month.
    Finance(RangeArgs),
    /// Feed use, feed cost and milk per kg of feed.
    Feed(RangeArgs),
    /// Wage cost from attendance.
    Labour(RangeArgs),
    /// Maintenance cost per machine and per month.
    Equipment(RangeArgs),
    /// Health record counts and costs.
    Health(RangeArgs),
    /// Write a table or report as CSV.
    Export(ExportArgs),
}

#[derive(Args)]
struct RangeArgs {
    /// First day of the period (defaults to the start of the dashboard window).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the period (defaults to today).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct ExportArgs {
    /// What to export.
    #[arg(value_enum)]
    table: ExportTable,

    /// Destination CSV file.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportTable {
    Animals,
    MilkRecords,
    BreedingRecords,
    HealthRecords,
    MedicineInventory,
    FodderCultivation,
    FeedInventory,
    FeedConsumption,
    Workers,
    Attendance,
    Equipment,
    EquipmentMaintenance,
    FinancialTransactions,
    BreedingStatus,
    ExpiryAlerts,
}

// ==============================================================================
// Command Logic
// ==============================================================================

struct App {
    repo: DbRepository,
    engine: AnalyticsEngine,
    settings: Settings,
    today: NaiveDate,
    json: bool,
}

impl App {
    fn period(&self, range: &RangeArgs) -> (NaiveDate, NaiveDate) {
        let to = range.to.unwrap_or(self.today);
        let window = i64::from(self.settings.metrics.dashboard_window_days.max(1)) - 1;
        let from = range.from.unwrap_or(to - Duration::days(window));
        (from, to)
    }

    async fn init_db(&self) -> anyhow::Result<()> {
        let counts = self.repo.table_counts().await?;
        emit(self.json, &counts, |counts| {
            let mut t = table(&["Table", "Rows"]);
            for count in counts {
                t.add_row(vec![count.table.to_string(), count.rows.to_string()]);
            }
            println!("{t}");
        })
    }

    async fn dashboard(&self) -> anyhow::Result<()> {
        let all = RecordFilter::all();
        let animals = self.repo.get_animals(&all).await?;
        let milk = self.repo.get_milk_records(&all).await?;
        let breeding = self.repo.get_breeding_records(&all).await?;
        let health = self.repo.get_health_records(&all).await?;
        let medicines = self.repo.get_medicines(&all).await?;
        let feeds = self.repo.get_feeds(&all).await?;
        let workers = self.repo.get_workers(&all).await?;
        let equipment = self.repo.get_equipments(&all).await?;
        let transactions = self.repo.get_transactions(&all).await?;

        let farm = FarmSnapshot {
            animals: &animals,
            milk: &milk,
            breeding: &breeding,
            health: &health,
            medicines: &medicines,
            feeds: &feeds,
            workers: &workers,
            equipment: &equipment,
            transactions: &transactions,
        };
        let dashboard = self.engine.dashboard(&farm, self.today)?;

        emit(self.json, &dashboard, |d| {
            let mut t = table(&["Metric", "Value"]);
            let rows = [
                ("As of", d.as_of.to_string()),
                ("Animals (active / total)", format!("{} / {}", d.active_animals, d.total_animals)),
                ("Pregnant", d.pregnant.to_string()),
                ("Overdue calvings", d.overdue_calvings.to_string()),
                ("Milk today (L)", d.milk_today_litres.to_string()),
                (
                    "Milk last window (L)",
                    format!("{} over {} days", d.window_milk_litres, d.window_days),
                ),
                ("Avg per cow-day (L)", d.window_average_per_animal_day.round_dp(2).to_string()),
                ("Income", d.window_income.to_string()),
                ("Expense", d.window_expense.to_string()),
                ("Net", d.window_net.to_string()),
                ("Alerts", d.alert_count().to_string()),
                ("Active workers", d.active_workers.to_string()),
                (
                    "Equipment (operational / total)",
                    format!("{} / {}", d.operational_equipment, d.equipment_total),
                ),
            ];
            for (label, value) in rows {
                t.add_row(vec![label.to_string(), value]);
            }
            for stage in &d.herd_by_stage {
                t.add_row(vec![format!("Stage: {}", stage.stage), stage.count.to_string()]);
            }
            println!("{t}");
        })
    }

    async fn herd(&self) -> anyhow::Result<()> {
        let all = RecordFilter::all();
        let animals = self.repo.get_animals(&all).await?;
        let breeding = self.repo.get_breeding_records(&all).await?;
        let statuses = self.engine.breeding_status(&animals, &breeding, self.today);

        emit(self.json, &animals, |animals| {
            let mut t = table(&[
                "Tag", "Name", "Breed", "Stage", "Status", "Pregnancy", "Expected calving", "Lactation",
            ]);
            for animal in animals {
                let status = statuses.iter().find(|s| s.animal_id == animal.id);
                t.add_row(vec![
                    animal.tag_id.clone(),
                    opt(animal.name.as_deref()),
                    opt(animal.breed.as_deref()),
                    animal.lifecycle_stage.to_string(),
                    animal.status.to_string(),
                    opt(status.map(|s| format!("{:?}", s.state))),
                    opt(status.and_then(|s| s.expected_calving)),
                    opt(status.map(|s| format!("{:?}", s.lactation_stage))),
                ]);
            }
            println!("{t}");
        })
    }

    async fn milk(&self, range: RangeArgs) -> anyhow::Result<()> {
        let (from, to) = self.period(&range);
        let records = self
            .repo
            .get_milk_records(&RecordFilter::between(from, to))
            .await?;
        let summary = milk::milk_summary(&records, from, to)?;

        emit(self.json, &summary, |s| {
            println!(
                "{} to {}: {} L from {} records, {} L per cow-day, sales {}",
                s.start,
                s.end,
                s.total_litres,
                s.record_count,
                s.average_per_animal_day.round_dp(2),
                s.sales_revenue
            );
            let mut t = table(&["Animal", "Litres", "Days milked"]);
            for row in &s.by_animal {
                t.add_row(vec![
                    row.animal_id.to_string(),
                    row.total_litres.to_string(),
                    row.milking_days.to_string(),
                ]);
            }
            println!("{t}");
        })
    }

    async fn breeding(&self) -> anyhow::Result<()> {
        let pending = self.repo.get_pending_calvings().await?;
        let gestation = Duration::days(i64::from(self.settings.metrics.gestation_days));

        emit(self.json, &pending, |pending| {
            let mut t = table(&["Animal", "Inseminated", "Method", "Bull", "Expected calving"]);
            for record in pending {
                t.add_row(vec![
                    record.animal_id.to_string(),
                    record.event_date.to_string(),
                    opt(record.method),
                    opt(record.bull_id.as_deref()),
                    (record.event_date + gestation).to_string(),
                ]);
            }
            println!("{t}");
        })
    }

    async fn alerts(&self) -> anyhow::Result<()> {
        let all = RecordFilter::all();
        let medicines = self.repo.get_medicines(&all).await?;
        let feeds = self.repo.get_feeds(&all).await?;
        let health = self.repo.get_health_records(&all).await?;

        let expiring = self.engine.expiry_alerts(&medicines, &feeds, self.today);
        let low_stock = alerts::low_stock_alerts(&medicines);
        let follow_ups = self.engine.follow_ups(&health, self.today);

        let report = (&expiring, &low_stock, &follow_ups);
        emit(self.json, &report, |_| {
            let mut t = table(&["Item", "Kind", "Expires", "Status", "Days left"]);
            for alert in &expiring {
                t.add_row(vec![
                    alert.name.clone(),
                    format!("{:?}", alert.kind),
                    alert.expiry_date.to_string(),
                    format!("{:?}", alert.status),
                    alert.days_until_expiry.to_string(),
                ]);
            }
            println!("{t}");

            let mut t = table(&["Medicine", "Quantity", "Reorder level"]);
            for item in &low_stock {
                t.add_row(vec![
                    item.name.clone(),
                    format!("{} {}", item.quantity, item.unit),
                    item.reorder_level.to_string(),
                ]);
            }
            println!("{t}");

            let mut t = table(&["Animal", "Type", "Diagnosis", "Due", "Days"]);
            for due in &follow_ups {
                t.add_row(vec![
                    due.animal_id.to_string(),
                    due.record_type.to_string(),
                    due.diagnosis.clone(),
                    due.next_due.to_string(),
                    due.days_until_due.to_string(),
                ]);
            }
            println!("{t}");
        })
    }

    async fn finance(&self, range: RangeArgs) -> anyhow::Result<()> {
        let (from, to) = self.period(&range);
        let ledger = self
            .repo
            .get_transactions(&RecordFilter::between(from, to))
            .await?;
        let summary = finance::financial_summary(&ledger, from, to)?;

        emit(self.json, &summary, |s| {
            println!(
                "{} to {}: income {}, expense {}, net {}",
                s.start, s.end, s.total_income, s.total_expense, s.net
            );
            let mut t = table(&["Direction", "Category", "Entries", "Total"]);
            for row in &s.by_category {
                t.add_row(vec![
                    row.direction.to_string(),
                    row.category.clone(),
                    row.entries.to_string(),
                    row.total.to_string(),
                ]);
            }
            println!("{t}");

            let mut t = table(&["Month", "Income", "Expense", "Net"]);
            for month in &s.monthly {
                t.add_row(vec![
                    month.month.clone(),
                    month.income.to_string(),
                    month.expense.to_string(),
                    month.net.to_string(),
                ]);
            }
            println!("{t}");
        })
    }

    async fn feed(&self, range: RangeArgs) -> anyhow::Result<()> {
        let (from, to) = self.period(&range);
        let window = RecordFilter::between(from, to);
        let consumption = self.repo.get_feed_consumptions(&window).await?;
        let inventory = self.repo.get_feeds(&RecordFilter::all()).await?;
        let milk = self.repo.get_milk_records(&window).await?;
        let summary = feed::feed_summary(&consumption, &inventory, &milk, from, to)?;

        emit(self.json, &summary, |s| {
            println!(
                "{} to {}: {} kg fed, cost {}, milk {} L, efficiency {} L/kg",
                s.start,
                s.end,
                s.total_kg,
                s.total_cost,
                s.milk_litres,
                opt(s.efficiency.map(|e| e.round_dp(3)))
            );
            let mut t = table(&["Feed", "Kg", "Cost"]);
            for row in &s.by_feed {
                t.add_row(vec![
                    row.feed_name.clone(),
                    row.quantity_kg.to_string(),
                    row.cost.to_string(),
                ]);
            }
            println!("{t}");
        })
    }

    async fn labour(&self, range: RangeArgs) -> anyhow::Result<()> {
        let (from, to) = self.period(&range);
        let workers = self.repo.get_workers(&RecordFilter::all()).await?;
        let attendance = self
            .repo
            .get_attendances(&RecordFilter::between(from, to))
            .await?;
        let summary = labour::labour_cost(&workers, &attendance, from, to)?;

        emit(self.json, &summary, |s| {
            let mut t = table(&["Worker", "Role", "Days", "Wage", "Cost"]);
            for row in &s.by_worker {
                t.add_row(vec![
                    row.name.clone(),
                    row.role.clone(),
                    row.days_worked.to_string(),
                    row.daily_wage.to_string(),
                    row.cost.to_string(),
                ]);
            }
            println!("{t}");
            println!("Total: {} days, {}", s.total_days, s.total_cost);
        })
    }

    async fn equipment(&self, range: RangeArgs) -> anyhow::Result<()> {
        let (from, to) = self.period(&range);
        let kit = self.repo.get_equipments(&RecordFilter::all()).await?;
        let log = self
            .repo
            .get_maintenances(&RecordFilter::between(from, to))
            .await?;
        let summary = equipment::equipment_cost(&kit, &log, from, to)?;

        emit(self.json, &summary, |s| {
            let mut t = table(&["Equipment", "Services", "Cost", "Fuel (L)", "Hours"]);
            for row in &s.by_equipment {
                t.add_row(vec![
                    row.name.clone(),
                    row.services.to_string(),
                    row.cost.to_string(),
                    row.fuel_litres.to_string(),
                    row.hours_used.to_string(),
                ]);
            }
            println!("{t}");
            println!("Total maintenance cost: {}", s.total_cost);
        })
    }

    async fn health(&self, range: RangeArgs) -> anyhow::Result<()> {
        let (from, to) = self.period(&range);
        let records = self
            .repo
            .get_health_records(&RecordFilter::between(from, to))
            .await?;
        let summary = health::health_summary(&records, from, to)?;

        emit(self.json, &summary, |s| {
            let mut t = table(&["Type", "Records", "Cost"]);
            for row in &s.by_type {
                t.add_row(vec![
                    row.record_type.to_string(),
                    row.records.to_string(),
                    row.cost.to_string(),
                ]);
            }
            println!("{t}");
            println!("Total: {} records, {}", s.total_records, s.total_cost);
        })
    }

    async fn export(&self, args: ExportArgs) -> anyhow::Result<()> {
        let all = RecordFilter::all();
        let out = args.out.as_path();
        let written = match args.table {
            ExportTable::Animals => write(&self.repo.get_animals(&all).await?, out)?,
            ExportTable::MilkRecords => write(&self.repo.get_milk_records(&all).await?, out)?,
            ExportTable::BreedingRecords => {
                write(&self.repo.get_breeding_records(&all).await?, out)?
            }
            ExportTable::HealthRecords => write(&self.repo.get_health_records(&all).await?, out)?,
            ExportTable::MedicineInventory => write(&self.repo.get_medicines(&all).await?, out)?,
            ExportTable::FodderCultivation => write(&self.repo.get_fodders(&all).await?, out)?,
            ExportTable::FeedInventory => write(&self.repo.get_feeds(&all).await?, out)?,
            ExportTable::FeedConsumption => {
                write(&self.repo.get_feed_consumptions(&all).await?, out)?
            }
            ExportTable::Workers => write(&self.repo.get_workers(&all).await?, out)?,
            ExportTable::Attendance => write(&self.repo.get_attendances(&all).await?, out)?,
            ExportTable::Equipment => write(&self.repo.get_equipments(&all).await?, out)?,
            ExportTable::EquipmentMaintenance => {
                write(&self.repo.get_maintenances(&all).await?, out)?
            }
            ExportTable::FinancialTransactions => {
                write(&self.repo.get_transactions(&all).await?, out)?
            }
            ExportTable::BreedingStatus => {
                let animals = self.repo.get_animals(&all).await?;
                let breeding = self.repo.get_breeding_records(&all).await?;
                write(&self.engine.breeding_status(&animals, &breeding, self.today), out)?
            }
            ExportTable::ExpiryAlerts => {
                let medicines = self.repo.get_medicines(&all).await?;
                let feeds = self.repo.get_feeds(&all).await?;
                write(&self.engine.expiry_alerts(&medicines, &feeds, self.today), out)?
            }
        };
        println!("Wrote {written} rows to {}", out.display());
        Ok(())
    }
}

fn write<T: serde::Serialize>(rows: &[T], out: &Path) -> anyhow::Result<usize> {
    export_csv_file(rows, out).with_context(|| format!("Failed to write {}", out.display()))
}
