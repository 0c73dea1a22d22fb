use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fipe_client::{CatalogConfig, FipeCatalog, VehicleType};

/// Browse the FIPE vehicle price catalog.
///
/// Every level depends on the session state of the level above it, so each
/// command replays the chain from the brand listing down.
#[derive(Parser, Debug)]
#[command(name = "fipe", version)]
struct Cli {
    /// Increase verbosity (-v debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print JSON instead of tab separated lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List vehicle types
    Types,
    /// List brands of a vehicle type
    Brands { vtype: VehicleType },
    /// List models of a brand
    Models { vtype: VehicleType, brand: String },
    /// List model years of a model
    Years {
        vtype: VehicleType,
        brand: String,
        model: String,
    },
    /// Show the price record of a model year
    Price {
        vtype: VehicleType,
        brand: String,
        model: String,
        year: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CatalogConfig::from_env();
    info!("Using catalog endpoint {}", config.base_url);

    let mut catalog = FipeCatalog::new(&config)?;

    match cli.command {
        Command::Types => {
            let types: Vec<Row> = catalog
                .vehicle_types()
                .into_iter()
                .map(|(vtype, label)| Row::new(vtype.index().to_string(), label))
                .collect();
            print_rows(&types, cli.json)
        }
        Command::Brands { vtype } => {
            let brands = catalog.list_brands(vtype).await?;
            if cli.json {
                return print_json(&brands);
            }
            print_rows(&rows(&brands, |b| (&b.pk, &b.brand)), false)
        }
        Command::Models { vtype, brand } => {
            let brands = catalog.list_brands(vtype).await?;
            let brand = pick(brands, &brand, |b| &b.pk, "brand")?;
            let models = catalog.list_models(&brand).await?;
            if cli.json {
                return print_json(&models);
            }
            print_rows(&rows(&models, |m| (&m.pk, &m.model)), false)
        }
        Command::Years {
            vtype,
            brand,
            model,
        } => {
            let brands = catalog.list_brands(vtype).await?;
            let brand = pick(brands, &brand, |b| &b.pk, "brand")?;
            let model = pick(catalog.list_models(&brand).await?, &model, |m| &m.pk, "model")?;
            let years = catalog.list_years(&model).await?;
            if cli.json {
                return print_json(&years);
            }
            print_rows(&rows(&years, |y| (&y.pk, &y.label)), false)
        }
        Command::Price {
            vtype,
            brand,
            model,
            year,
        } => {
            let brands = catalog.list_brands(vtype).await?;
            let brand = pick(brands, &brand, |b| &b.pk, "brand")?;
            let model = pick(catalog.list_models(&brand).await?, &model, |m| &m.pk, "model")?;
            let year = pick(catalog.list_years(&model).await?, &year, |y| &y.pk, "year")?;

            let record = catalog
                .fetch_price_record(&year)
                .await?
                .with_context(|| format!("no price published for {} {}", model.model, year.label))?;

            if cli.json {
                return print_json(&record);
            }
            print_rows(
                &[
                    Row::new("fipe_code", &record.fipe_code),
                    Row::new("reference", &record.reference),
                    Row::new("average_value", &record.average_value),
                    Row::new("query_date", &record.query_date),
                ],
                false,
            )
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = if verbose > 0 { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[derive(Serialize)]
struct Row {
    key: String,
    name: String,
}

impl Row {
    fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

fn rows<E>(items: &[E], fields: impl Fn(&E) -> (&String, &String)) -> Vec<Row> {
    items
        .iter()
        .map(|item| {
            let (key, name) = fields(item);
            Row::new(key.as_str(), name.as_str())
        })
        .collect()
}

fn pick<E>(items: Vec<E>, key: &str, pk: impl Fn(&E) -> &String, level: &str) -> Result<E> {
    items
        .into_iter()
        .find(|item| pk(item) == key)
        .ok_or_else(|| anyhow!("{level} `{key}` not found in the catalog listing"))
}

fn print_rows(rows: &[Row], json: bool) -> Result<()> {
    if json {
        return print_json(&rows);
    }
    for row in rows {
        println!("{}\t{}", row.key, row.name);
    }
    Ok(())
}

fn print_json<S: Serialize + ?Sized>(value: &S) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
