//! Process command - turn a single purchase order into an order record.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use poflow_core::models::config::PoflowConfig;
use poflow_core::{read_workbook_file, Grid, OrderLookups, OrderPipeline, ProcessedOrder};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.xls workbook or .json cell grid)
    #[arg(required = true)]
    input: PathBuf,

    /// Lookup tables (statuses, sources, extra fields, existing orders) as JSON
    #[arg(short, long)]
    lookups: PathBuf,

    /// Sender mailbox, overrides the configured one
    #[arg(long)]
    sender: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the processing checklist
    #[arg(long)]
    checklist: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per product
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(sender) = &args.sender {
        config.lookups.sender_email = sender.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    pb.set_message("Loading lookups...");
    let lookups = load_lookups(&args.lookups)?;

    pb.set_message("Reading purchase order...");
    let grid = load_grid(&args.input)?;
    debug!("Grid has {} rows", grid.len());

    pb.set_message("Building order...");
    let pipeline = OrderPipeline::new(config);
    let processed = match pipeline.process(&grid, &lookups) {
        Ok(processed) => processed,
        Err(err) => {
            pb.finish_and_clear();
            if args.checklist {
                eprint!("{}", err.checklist);
            }
            return Err(err.into());
        }
    };

    pb.finish_and_clear();

    for notice in &processed.notices {
        eprintln!("{} {}", style("!").yellow(), notice);
    }
    if args.checklist {
        eprint!("{}", processed.checklist);
    }

    let output = format_order(&processed, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load the configuration file, or defaults when none is given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PoflowConfig> {
    match config_path {
        Some(path) => Ok(PoflowConfig::from_file(Path::new(path))?),
        None => Ok(PoflowConfig::default()),
    }
}

pub fn load_lookups(path: &Path) -> anyhow::Result<OrderLookups> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read lookups {}: {}", path.display(), e))?;
    Ok(OrderLookups::from_json(&content)?)
}

/// Read a grid from an `.xls` workbook or a JSON array of rows.
pub fn load_grid(path: &Path) -> anyhow::Result<Grid> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "xls" => Ok(read_workbook_file(path)?),
        "json" => {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

pub fn format_order(processed: &ProcessedOrder, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(processed)?),
        OutputFormat::Csv => format_csv(processed),
        OutputFormat::Text => Ok(format_text(processed)),
    }
}

fn format_csv(processed: &ProcessedOrder) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "ean",
        "name",
        "quantity",
        "price_brutto",
        "tax_rate",
        "line_total",
    ])?;

    for product in &processed.order.products {
        wtr.write_record([
            &product.ean,
            &product.name,
            &product.quantity.to_string(),
            &product.unit_price.to_string(),
            &product.tax_rate.to_string(),
            &product.line_total().map(|t| t.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(processed: &ProcessedOrder) -> String {
    let order = &processed.order;
    let mut output = String::new();

    output.push_str(&format!("Status: {}\n", order.order_status_id));
    output.push_str(&format!("Source: {}\n", order.custom_source_id));
    output.push_str(&format!("Date:   {}\n", format_timestamp(order.date_add)));
    output.push('\n');

    output.push_str("Deliver to:\n");
    output.push_str(&format!("  {}\n", order.delivery_address));
    output.push_str(&format!(
        "  {} {}\n",
        order.delivery_state.as_deref().unwrap_or("-"),
        order.delivery_postcode.as_deref().unwrap_or("-")
    ));
    output.push('\n');

    output.push_str("Products:\n");
    for product in &order.products {
        output.push_str(&format!(
            "  {:<20} {:>5} x {:>10} {}\n",
            product.ean, product.quantity, product.unit_price, product.name
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "Total: {} {} ({} units)\n",
        order.calculated_total,
        order.currency,
        order.total_quantity()
    ));

    output
}

fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
