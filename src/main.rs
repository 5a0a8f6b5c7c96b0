//! Ownbuf CLI
//!
//! Runs walkthroughs of buffer, device and message semantics against the
//! library.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ownbuf::{
    telemetry, write_log, AllocationLedger, DataBuffer, DecoratedMessage, Device, DeviceRegistry,
    DeviceStatus, DeviceType, Message, OwnbufConfig, PlainMessage, SequentialIds,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ownbuf")]
#[command(version)]
#[command(about = "Owning buffers with explicit copy and transfer", long_about = None)]
struct Cli {
    /// Config file (default: search for ownbuf.toml upwards from cwd)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy, transfer and replace a data buffer
    Buffer {
        /// Initial content of the first buffer
        #[arg(long, default_value = "Hello")]
        content: String,
    },

    /// Build, list, copy and transfer devices in a registry
    Devices {
        /// Print the final listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render plain and decorated log messages
    Messages {
        /// Message text
        #[arg(default_value = "Preparing Logger")]
        text: String,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Also save it to this path
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => OwnbufConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => OwnbufConfig::load_from_cwd().context("Failed to load ownbuf.toml")?,
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    telemetry::init(level);

    match cli.command {
        Commands::Buffer { content } => cmd_buffer(&config, &content),
        Commands::Devices { json } => cmd_devices(&config, json),
        Commands::Messages { text } => cmd_messages(&text),
        Commands::Config { write } => {
            let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
            print!("{}", rendered);
            if let Some(path) = write {
                config
                    .save(&path)
                    .with_context(|| format!("Failed to write config {}", path.display()))?;
            }
            Ok(())
        }
    }
}

fn show(label: &str, buf: &DataBuffer) {
    println!("{}: {:?}", label, String::from_utf8_lossy(buf.as_bytes()));
}

fn cmd_buffer(config: &OwnbufConfig, content: &str) -> Result<()> {
    let ledger = AllocationLedger::new();

    {
        let mut db1 = DataBuffer::with_capacity(config.buffer.default_capacity)
            .with_ledger(Arc::clone(&ledger));
        db1.replace(content);
        show("db1", &db1);

        let mut db2 = DataBuffer::from_nul_terminated(b"Input\0")?.with_ledger(Arc::clone(&ledger));
        show("db2", &db2);

        db2 = db1.clone();
        show("db2 after copy", &db2);

        db2 = DataBuffer::from("TempBuffer").with_ledger(Arc::clone(&ledger));
        show("db2 after temporary", &db2);

        db2.transfer_from(&mut db1);
        show("db2 after transfer", &db2);
        show("db1 after transfer", &db1);
        println!("db1 emptied: {}", db1.is_emptied());

        db1.replace(" and friends");
        std::mem::swap(&mut db1, &mut db2);
        show("concatenated", &(&db1 + &db2));
    }

    let stats = ledger.stats();
    println!(
        "allocations: {}, releases: {}, live bytes: {}",
        stats.allocations, stats.releases, stats.live_bytes
    );
    Ok(())
}

fn cmd_devices(config: &OwnbufConfig, json: bool) -> Result<()> {
    let registry =
        DeviceRegistry::with_ids(Arc::new(SequentialIds::starting_at(config.device.first_id)));
    let capacity = config.device.default_capacity;

    let first = registry.create(DeviceType::GenericIo, DeviceStatus::Idle, capacity)?;
    registry.with_mut(first, |d| d.add_comment("Request to Print Device Info DONE"))?;
    println!("{}", registry.get(first)?);
    println!("comment: {:?}", registry.get(first)?.comment());

    for kind in [
        DeviceType::Keyboard,
        DeviceType::Mouse,
        DeviceType::Display,
        DeviceType::Printer,
    ] {
        let status = match kind {
            DeviceType::Keyboard | DeviceType::Mouse => DeviceStatus::Stopped,
            _ => DeviceStatus::Idle,
        };
        registry.create(kind, status, capacity)?;
    }
    registry.insert(Device::with_capacity(registry.ids(), 256))?;
    print_listing(&registry);

    let mut copied = registry.get_slot(0)?;
    let moved = copied.transfer();
    println!("after transfer, source is {}", copied);

    println!("----------------------------------------------------");
    let displaced = registry.replace(0, Device::with_capacity(registry.ids(), 128))?;
    println!("replaced {}", displaced);
    registry.insert(moved)?;
    print_listing(&registry);

    if json {
        let listing = serde_json::to_string_pretty(&registry.summaries())?;
        println!("{}", listing);
    }

    registry.clear();
    Ok(())
}

fn print_listing(registry: &DeviceRegistry) {
    println!("{} devices:", registry.len());
    for summary in registry.summaries() {
        println!(
            "Device #{} -> Type: {} -> Status: {}",
            summary.id, summary.kind, summary.status
        );
    }
}

fn cmd_messages(text: &str) -> Result<()> {
    let base = PlainMessage::default();
    println!("plain: {}", base.text());

    let decorated = DecoratedMessage::new(text);
    println!("by reference: {}", write_log(&decorated));

    let narrowed: PlainMessage = decorated.into();
    println!("narrowed: {}", write_log(&narrowed));
    Ok(())
}
