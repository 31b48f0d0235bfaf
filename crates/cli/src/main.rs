mod display;

use anyhow::{Context, Result};
use clap::Parser;
use codec::{decode_trace, Encoding, SystemClock};
use config::Config;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, error};

/// Decode a Zipkin v1 span batch into its canonical trace
#[derive(Parser, Debug)]
#[command(name = "zipkin-decode")]
#[command(about = "Decode and normalize Zipkin v1 spans", long_about = None)]
struct Args {
    /// File containing the request body; reads stdin when omitted
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Output format, overriding the configuration ("table" or "json")
    #[arg(short, long)]
    format: Option<String>,

    /// Pick the encoding from an HTTP Content-Type instead of the configuration
    #[arg(long)]
    content_type: Option<String>,
}

fn main() -> Result<()> {
    // Set RUST_LOG to control the log level, e.g. RUST_LOG=codec=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(format) = args.format {
        config.output.format = format;
    }
    config.validate()?;

    let encoding = match args.content_type.as_deref() {
        Some(content_type) => Encoding::from_content_type(content_type)?,
        None => config.codec.encoding.parse()?,
    };

    let body = read_input(args.input.as_ref())?;
    anyhow::ensure!(
        config.codec.accepts_payload(body.len()),
        codec::CodecError::PayloadTooLarge {
            size: body.len(),
            limit: config.codec.max_payload_bytes,
        }
    );
    debug!("Read {} byte(s) of {} input", body.len(), encoding);

    let trace = match decode_trace(encoding, &body, &SystemClock) {
        Ok(trace) => trace,
        Err(e) => {
            error!("Rejected span batch: {}", e);
            return Err(e).context("Failed to decode span batch");
        }
    };

    match config.output.format.as_str() {
        "json" => println!("{}", display::format_json(&trace, config.output.pretty)?),
        _ => println!("{}", display::format_trace(&trace)),
    }

    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut body = Vec::new();
            std::io::stdin()
                .read_to_end(&mut body)
                .context("Failed to read stdin")?;
            Ok(body)
        }
    }
}
