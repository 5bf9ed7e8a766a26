use std::{
    error::Error,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Collection, Engine, Peso, Scope};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "bigd_admin")]
#[command(about = "Admin utilities for the BigD sales desk (codes, reports, seeding)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./bigd.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the code the next created record would receive.
    NextCode(NextCodeArgs),
    /// Print the reports page.
    Report(ReportArgs),
    /// Write the reports page as CSV.
    Export(ExportArgs),
    /// Load documents from a JSON file shaped `{ "<collection>": { "<key>": { ... } } }`.
    Seed(SeedArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodeKind {
    Agents,
    Customers,
}

#[derive(Args, Debug)]
struct NextCodeArgs {
    kind: CodeKind,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Restrict the report to the agent with this store key.
    #[arg(long)]
    agent: Option<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long)]
    output: PathBuf,
    #[arg(long)]
    agent: Option<String>,
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long)]
    file: PathBuf,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn print_report(engine: &Engine, scope: &Scope) -> Result<(), Box<dyn Error + Send + Sync>> {
    let reports = engine.reports(scope).await?;
    if reports.is_empty() {
        println!("nothing to report");
        return Ok(());
    }

    println!("Agent performance");
    for row in &reports.agent_performance {
        println!(
            "  {:<10} {:<24} {:>14} / {:<14} {:>3}%{}",
            row.code,
            row.name,
            Peso(row.sales).to_string(),
            Peso(row.target).to_string(),
            row.percentage,
            if row.met_target { "  target met" } else { "" }
        );
    }

    println!("Customer rebates");
    for row in &reports.customer_rebates {
        println!(
            "  {:<24} {:>14} -> {:>12}",
            row.name,
            Peso(row.purchases).to_string(),
            Peso(row.rebate).to_string()
        );
    }

    println!("Product sales");
    for row in &reports.product_sales {
        println!("  {:<24} {:>14}", row.name, Peso(row.sales).to_string());
    }
    Ok(())
}

async fn seed(engine: &Engine, file: &Path) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let raw = std::fs::read_to_string(file)?;
    let Value::Object(collections) = serde_json::from_str::<Value>(&raw)? else {
        return Err("seed file must be a JSON object of collections".into());
    };

    let mut written = 0;
    for (name, documents) in collections {
        let collection = Collection::try_from(name.as_str())?;
        let Value::Object(documents) = documents else {
            eprintln!("skipping {name}: not an object of documents");
            continue;
        };
        for (id, document) in documents {
            engine.store().create(collection, &id, document).await?;
            written += 1;
        }
    }
    Ok(written)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::NextCode(args) => {
            let code = match args.kind {
                CodeKind::Agents => engine.next_agent_code().await?,
                CodeKind::Customers => engine.next_customer_code().await?,
            };
            println!("{code}");
        }
        Command::Report(args) => {
            let scope = Scope::from_agent(args.agent.as_deref());
            print_report(&engine, &scope).await?;
        }
        Command::Export(args) => {
            let scope = Scope::from_agent(args.agent.as_deref());
            let csv = engine.export_reports(&scope).await?;
            std::fs::write(&args.output, csv)?;
            println!("wrote {}", args.output.display());
        }
        Command::Seed(args) => {
            let written = seed(&engine, &args.file).await?;
            println!("seeded {written} documents");
        }
    }

    Ok(())
}
