//! Weight Tracker CLI
//!
//! Command-line access to the configured entry document:
//! - List entries
//! - Add an entry for a day
//! - Export entries as CSV or JSON
//! - Generate a default config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use weight_tracker::config::{generate_default_config, Config};
use weight_tracker::storage::{open_store, Document, Entry, EntryRepository, DATE_FORMAT};

#[derive(Parser)]
#[command(name = "weight-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Record daily weight, waist, fasting and energy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all entries
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Add an entry and save the whole document
    Add {
        /// Weight (kg)
        #[arg(short, long)]
        weight: String,
        /// Waist (cm)
        #[arg(long)]
        waist: Option<String>,
        /// Fasting window, e.g. 16:8
        #[arg(short, long, default_value = "")]
        fasting: String,
        /// Energy (1-5)
        #[arg(short, long, default_value = "")]
        energy: String,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Day of the entry, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Export entries
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ListFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { format } => {
            let repo = open_repository(cli.config.as_ref())?;
            let doc = repo.read().await;
            print!("{}", render_list(&doc, format)?);
        }

        Commands::Add {
            weight,
            waist,
            fasting,
            energy,
            notes,
            date,
        } => {
            let mut entry = match date {
                Some(date) => {
                    chrono::NaiveDate::parse_from_str(&date, DATE_FORMAT)
                        .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", date))?;
                    Entry::new(date)
                }
                None => Entry::today(),
            };
            let repo = open_repository(cli.config.as_ref())?;
            entry = entry.weight(weight).fasting(fasting).energy(energy).notes(notes);
            if let Some(waist) = waist {
                entry = entry.waist(waist);
            }

            let doc = repo
                .append(&entry)
                .await
                .context("Failed to save entry")?;
            println!("Saved entry for {} ({} total)", entry.date, doc.len());
        }

        Commands::Export { format, output } => {
            let repo = open_repository(cli.config.as_ref())?;
            let doc = repo.read().await;
            let content = match format {
                ExportFormat::Csv => export_csv(&doc)?,
                ExportFormat::Json => serde_json::to_vec_pretty(&doc)?,
            };
            write_output(output.as_ref(), &content)?;
            if let Some(path) = output {
                eprintln!("Exported {} entries to {}", doc.len(), path.display());
            }
        }

        Commands::Config { output } => {
            write_output(output.as_ref(), generate_default_config().as_bytes())?;
        }
    }

    Ok(())
}

/// Load configuration, start logging and open the configured store
fn open_repository(config_path: Option<&PathBuf>) -> Result<EntryRepository> {
    let config = Config::resolve(config_path.map(PathBuf::as_path))?;
    config.logging.init();

    Ok(EntryRepository::from_arc(open_store(&config.storage)?))
}

const COLUMNS: [&str; 6] = ["Date", "Weight", "Waist", "Fasting", "Energy", "Notes"];

fn row(entry: &Entry) -> [&str; 6] {
    [
        entry.date.as_str(),
        entry.weight.as_str(),
        entry.waist.as_deref().unwrap_or(""),
        entry.fasting.as_str(),
        entry.energy.as_str(),
        entry.notes.as_str(),
    ]
}

/// Render entries as an aligned text table
fn format_table(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No entries yet\n".to_string();
    }

    let rows: Vec<[&str; 6]> = entries.iter().map(row).collect();
    let mut widths = COLUMNS.map(str::len);
    for r in &rows {
        for (width, cell) in widths.iter_mut().zip(r.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[&str; 6]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_line(&COLUMNS);
    for r in &rows {
        push_line(r);
    }
    out
}

/// `list` output; logging goes to stderr so this is all stdout carries
fn render_list(doc: &Document, format: ListFormat) -> Result<String> {
    Ok(match format {
        ListFormat::Table => format_table(&doc.entries()),
        ListFormat::Json => format!("{}\n", serde_json::to_string_pretty(doc)?),
    })
}

/// Entries as CSV with a header row
fn export_csv(doc: &Document) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS.map(str::to_lowercase))?;
    for entry in doc.entries() {
        writer.write_record(row(&entry))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}

fn write_output(path: Option<&PathBuf>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(content)?,
    }
    Ok(())
}
