use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use sales_data_api::{
    chart::ChartMode,
    client::{render, ClientError, Dashboard, FormField, FormSession, SalesDataClient, DEFAULT_BASE_URL},
    validation::FieldErrors,
};

const CHART_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "sales-data", about = "Terminal client for the sales data API", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "SALES_API_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Base URL of the API, including the /api prefix"
    )]
    base_url: String,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every sales record
    List,
    /// Show one sales record
    Get { id: i32 },
    /// Create a sales record
    Create(CreateArgs),
    /// Replace the fields of a sales record; omitted flags keep their current value
    Update(UpdateArgs),
    /// Delete a sales record
    Delete(DeleteArgs),
    /// Draw one of the chart projections
    Chart(ChartArgs),
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long, help = "Product name (max 255 characters)")]
    product_name: String,
    #[arg(long = "q1", help = "Q1 sales")]
    q1_sales: String,
    #[arg(long = "q2", help = "Q2 sales")]
    q2_sales: String,
    #[arg(long = "q3", help = "Q3 sales")]
    q3_sales: String,
    #[arg(long = "q4", help = "Q4 sales")]
    q4_sales: String,
    #[arg(long, help = "Sales target")]
    target: String,
}

#[derive(Args)]
struct UpdateArgs {
    id: i32,
    #[arg(long)]
    product_name: Option<String>,
    #[arg(long = "q1")]
    q1_sales: Option<String>,
    #[arg(long = "q2")]
    q2_sales: Option<String>,
    #[arg(long = "q3")]
    q3_sales: Option<String>,
    #[arg(long = "q4")]
    q4_sales: Option<String>,
    #[arg(long)]
    target: Option<String>,
}

#[derive(Args)]
struct DeleteArgs {
    id: i32,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Skip the confirmation prompt"
    )]
    yes: bool,
}

#[derive(Args)]
struct ChartArgs {
    #[arg(long, default_value = "quarterly", help = "quarterly, performance or product")]
    mode: ChartMode,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Ask the server for the projection instead of computing it locally"
    )]
    remote: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ClientError>() {
                Some(ClientError::Validation(errors)) => print_field_errors(errors),
                Some(client_err) => eprintln!("error: {}", client_err.banner()),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = SalesDataClient::new(&cli.base_url).context("failed to build HTTP client")?;
    let mut dashboard = Dashboard::new(client);

    match cli.command {
        Commands::List => {
            dashboard.refresh().await?;
            print_records(&dashboard, cli.json)?;
        }
        Commands::Get { id } => {
            let record = dashboard.client().get(id).await?;
            if cli.json {
                print_json(&record)?;
            } else {
                print!("{}", render::records_table(std::slice::from_ref(&record)));
            }
        }
        Commands::Create(args) => {
            let mut form = FormSession::new();
            form.set_field(FormField::ProductName, args.product_name);
            form.set_field(FormField::Q1Sales, args.q1_sales);
            form.set_field(FormField::Q2Sales, args.q2_sales);
            form.set_field(FormField::Q3Sales, args.q3_sales);
            form.set_field(FormField::Q4Sales, args.q4_sales);
            form.set_field(FormField::Target, args.target);

            let record = dashboard.submit(&mut form).await?;
            if !cli.json {
                println!("Created sales data {}", record.id);
            }
            print_records(&dashboard, cli.json)?;
        }
        Commands::Update(args) => {
            let current = dashboard.client().get(args.id).await?;
            let mut form = FormSession::new();
            form.begin_edit(&current);

            let changes = [
                (FormField::ProductName, args.product_name),
                (FormField::Q1Sales, args.q1_sales),
                (FormField::Q2Sales, args.q2_sales),
                (FormField::Q3Sales, args.q3_sales),
                (FormField::Q4Sales, args.q4_sales),
                (FormField::Target, args.target),
            ];
            for (field, value) in changes {
                if let Some(value) = value {
                    form.set_field(field, value);
                }
            }

            let record = dashboard.submit(&mut form).await?;
            if !cli.json {
                println!("Updated sales data {}", record.id);
            }
            print_records(&dashboard, cli.json)?;
        }
        Commands::Delete(args) => {
            if !args.yes && !confirm(&format!("Delete sales data {}?", args.id))? {
                println!("Aborted; nothing was deleted.");
                return Ok(());
            }
            let message = dashboard.delete(args.id).await?;
            if !cli.json {
                println!("{}", message);
            }
            print_records(&dashboard, cli.json)?;
        }
        Commands::Chart(args) => {
            let data = if args.remote {
                dashboard.client().chart(args.mode).await?
            } else {
                dashboard.refresh().await?;
                dashboard.chart(args.mode)
            };
            if cli.json {
                print_json(&data)?;
            } else {
                print!("{}", render::chart(&data, CHART_WIDTH));
            }
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn print_records(dashboard: &Dashboard, json: bool) -> Result<()> {
    if let Some(banner) = dashboard.banner() {
        eprintln!("warning: {}", banner);
        return Ok(());
    }
    if json {
        print_json(&dashboard.records())
    } else {
        print!("{}", render::records_table(dashboard.records()));
        Ok(())
    }
}

fn print_field_errors(errors: &FieldErrors) {
    eprintln!("The given data was invalid:");
    for (field, messages) in errors {
        for message in messages {
            eprintln!("  {}: {}", field, message);
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
