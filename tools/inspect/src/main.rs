//! Envelope stream inspector
//!
//! Usage:
//!   envelope-inspect tx.bin
//!   envelope-inspect tx.bin --dump
//!   envelope-inspect tx.bin --config config/decoder.toml --log-level debug

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use codec::{dump, hex_dump, AnyValue, SignedTransaction, TypeRegistry};
use config::DecoderConfig;
use tracing::{debug, error, info};
use types::WireTransaction;

#[derive(Parser, Debug)]
#[command(name = "envelope-inspect")]
#[command(about = "Decode and report on an AMQP envelope stream")]
#[command(version)]
struct Args {
    /// Serialised stream to inspect
    file: PathBuf,

    /// Print the hex rows and the structural tree before decoding
    #[arg(short, long)]
    dump: bool,

    /// Path to a decoder configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    info!(file = %args.file.display(), len = bytes.len(), "Inspecting stream");

    if args.dump {
        println!("{}", hex_dump(&bytes));
        println!();
        match dump(&bytes) {
            Ok(tree) => println!("{tree}"),
            Err(e) => error!("Structural dump failed: {}", e),
        }
        println!();
    }

    // Explicit configuration gets a private registry; otherwise the shared one
    let owned;
    let registry = match &args.config {
        Some(path) => {
            let config = DecoderConfig::load(path)?;
            owned = TypeRegistry::with_builtins(config);
            &owned
        }
        None => TypeRegistry::global(),
    };
    debug!(types = registry.len(), "Registry ready");

    let value = registry.decode_any(&bytes).map_err(|e| {
        error!(kind = ?e.kind(), offset = ?e.offset(), "Decode failed");
        e
    })?;

    for line in report(&value, registry)? {
        println!("{line}");
    }
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Human readable summary of a decoded root value
fn report(value: &AnyValue, registry: &TypeRegistry) -> Result<Vec<String>> {
    let mut lines = vec![format!("root: {}", value.type_name())];

    if let Some(stx) = value.downcast_ref::<SignedTransaction>() {
        lines.push(format!("signatures: {}", stx.sigs.len()));
        for (i, sig) in stx.sigs.iter().enumerate() {
            lines.push(format!(
                "  [{i}] key {} bytes, platform {}, scheme {}",
                sig.by.x509_bits.len(),
                sig.signature_metadata.platform_version,
                sig.signature_metadata.scheme_number_id,
            ));
        }
        let wtx = stx
            .wire_transaction(registry)
            .context("Failed to decode the transaction body")?;
        report_groups(wtx, &mut lines);
    } else if let Some(wtx) = value.downcast_ref::<WireTransaction>() {
        report_groups(wtx, &mut lines);
    } else if let Some(payload) = value.as_opaque() {
        lines.push(format!(
            "unregistered type {} ({} bytes captured)",
            payload.descriptor(),
            payload.bytes().len()
        ));
    }
    Ok(lines)
}

fn report_groups(wtx: &WireTransaction, lines: &mut Vec<String>) {
    lines.push(format!("component groups: {}", wtx.component_groups().len()));
    for (kind, components) in wtx.ordered_groups() {
        lines.push(format!(
            "  {:>2} {:<12} {} components",
            kind.ordinal(),
            kind.name(),
            components.len()
        ));
    }
}
