//! Stocktake - scan barcodes against an inventory export
//!
//! Every command re-reads the scan log from disk, so several invocations (or a
//! scanner feeding `interactive`) always work on the current state.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use stocktake::config::{default_data_dir, Config, DEFAULT_INVENTORY_DIR};
use stocktake::formatters::{format_summary, format_table};
use stocktake::inventory::list_inventory_files;
use stocktake::{ExportFormat, ExportKind, ScanLogStore, Stocktake, StocktakeError};

/// Barcode stocktake - record scans and reconcile them against the inventory
#[derive(Parser, Debug)]
#[command(name = "stocktake")]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder containing the inventory export(s)
    #[arg(long, default_value = DEFAULT_INVENTORY_DIR)]
    inventory_dir: PathBuf,

    /// Inventory file to use when the folder holds several
    #[arg(long)]
    inventory: Option<String>,

    /// Folder for the scan log and its backups
    #[arg(long, default_value_os_t = default_data_dir())]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record one scanned barcode
    Scan { barcode: String },
    /// Remove the most recent scan
    Undo,
    /// Remove scans of a barcode (all of them unless --timestamp is given)
    Remove {
        barcode: String,
        /// Only remove the scan made at this time (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Remove every scan
    Clear {
        /// Confirm clearing the scan log
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Show scanned products, most recent first
    View {
        /// Only show rows containing this text
        #[arg(short, long)]
        search: Option<String>,
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show inventory products that have not been scanned
    Missing,
    /// Show counts for the current stocktake
    Summary {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the scanned or missing table to a file
    Export {
        #[arg(value_enum)]
        kind: ExportKind,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output path (default: stocktake_<kind>.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List scan log backups, newest first
    Backups,
    /// Replace the scan log with a backup
    Restore { name: String },
    /// List inventory files in the inventory folder
    Inventories,
    /// Read barcodes from stdin, one per line
    Interactive,
}

fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=stocktake=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config {
        inventory_dir: args.inventory_dir,
        inventory_file: args.inventory,
        data_dir: args.data_dir,
    };
    log::debug!("Data directory: {}", config.data_dir.display());

    if let Err(e) = run(&config, args.command) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(if e.is_recoverable() { 2 } else { 1 });
    }
}

fn run(config: &Config, command: Command) -> stocktake::Result<()> {
    let store = ScanLogStore::new(config.scan_log_path(), config.backup_dir());

    match command {
        Command::Undo => {
            if store.undo()? {
                println!("Last scan removed.");
            } else {
                println!("Nothing to undo.");
            }
        }
        Command::Remove { barcode, timestamp } => {
            let barcode = stocktake::normalize(&barcode);
            let removed = store.remove(&barcode, timestamp.as_deref())?;
            println!("Removed {removed} scan(s) of {barcode}.");
        }
        Command::Clear { yes } => {
            if !yes {
                return Err(StocktakeError::Validation(
                    "Refusing to clear the scan log without --yes".to_string(),
                ));
            }
            store.clear()?;
            println!("Scan log cleared.");
        }
        Command::Backups => {
            for name in store.list_backups()? {
                println!("{name}");
            }
        }
        Command::Restore { name } => {
            store.restore_backup(&name)?;
            println!("Scan log restored from {name}.");
        }
        Command::Inventories => {
            for name in list_inventory_files(&config.inventory_dir)? {
                println!("{name}");
            }
        }
        Command::Scan { barcode } => {
            let session = Stocktake::open(config)?;
            report_scan(&session, &barcode)?;
        }
        Command::View { search, json } => {
            let session = Stocktake::open(config)?;
            if json {
                let records = session.merged_view(search.as_deref())?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", format_table(&session.scanned_table(search.as_deref())?));
            }
        }
        Command::Missing => {
            let session = Stocktake::open(config)?;
            print!("{}", format_table(&session.missing_view()?));
        }
        Command::Summary { json } => {
            let session = Stocktake::open(config)?;
            let summary = session.summary()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", format_summary(&summary));
            }
        }
        Command::Export {
            kind,
            format,
            output,
        } => {
            let session = Stocktake::open(config)?;
            let path = output.unwrap_or_else(|| PathBuf::from(kind.default_file_name(format)));
            let rows = session.export(kind, format, &path)?;
            println!("Wrote {} row(s) to {}", rows, path.display());
        }
        Command::Interactive => {
            let session = Stocktake::open(config)?;
            run_interactive(&session)?;
        }
    }

    Ok(())
}

fn report_scan(session: &Stocktake, raw: &str) -> stocktake::Result<()> {
    let outcome = session.append_scan(raw)?;
    if outcome.is_duplicate() {
        println!(
            "Added barcode: {} (scanned {} times)",
            outcome.event.barcode, outcome.times_scanned
        );
    } else {
        println!("Added barcode: {}", outcome.event.barcode);
    }
    Ok(())
}

/// Scanner loop. Validation errors are reported and the loop continues; anything
/// else ends the session.
fn run_interactive(session: &Stocktake) -> stocktake::Result<()> {
    println!(
        "Scanning against {} ({} products). Commands: :undo :view :missing :summary :quit",
        session.inventory_path().display(),
        session.inventory().len()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            ":quit" | ":q" => break,
            ":undo" => {
                if session.undo_last()? {
                    println!("Last scan removed.");
                } else {
                    println!("Nothing to undo.");
                }
            }
            ":view" => print!("{}", format_table(&session.scanned_table(None)?)),
            ":missing" => print!("{}", format_table(&session.missing_view()?)),
            ":summary" => print!("{}", format_summary(&session.summary()?)),
            input => match report_scan(session, input) {
                Err(e) if e.is_recoverable() => println!("{e}"),
                other => other?,
            },
        }
        print!("> ");
        stdout.flush()?;
    }

    println!();
    Ok(())
}
