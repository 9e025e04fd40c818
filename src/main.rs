use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use kaiju_params::config::Settings;
use kaiju_params::payload::load_record;
use kaiju_params::{KaijuInputParams, KaijuReadsInputParams, Record, Validate};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "kaiju-params")]
#[command(about = "Decode, check and re-encode Kaiju app parameter payloads")]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configured log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload and print it re-encoded as JSON
    Decode {
        #[arg(short, long, value_enum, default_value = "input")]
        variant: Variant,

        /// Payload file (JSON, or TOML by extension)
        payload: PathBuf,
    },

    /// Decode and validate a payload, resolving its database and references
    Check {
        #[arg(short, long, value_enum, default_value = "input")]
        variant: Variant,

        payload: PathBuf,
    },

    /// Print the wire/in-memory field name table
    Fields {
        #[arg(short, long, value_enum, default_value = "input")]
        variant: Variant,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// Multi-reference app (KaijuInputParams)
    Input,
    /// Single reads app (KaijuReadsInputParams)
    Reads,
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {info}");
        if let Some(loc) = info.location() {
            eprintln!("at: {}:{}", loc.file(), loc.line());
        }
    }));
}

fn decode<R: Record>(path: &Path, settings: &Settings) -> Result<()>
where
    R: Validate,
{
    let record: R = load_record(path)?;
    info!("{record}");
    if settings.validate {
        record.validate()?;
    }
    println!("{}", serde_json::to_string_pretty(&record.encode())?);
    Ok(())
}

fn check_input(path: &Path, settings: &Settings) -> Result<()> {
    let params: KaijuInputParams = load_record(path)?;
    info!("{params}");
    params.validate()?;
    for object_ref in params.input_ref_list()? {
        info!(numeric = object_ref.is_numeric(), "input reference: {object_ref}");
    }
    report_extras(&params);
    if let Some(db) = params.database()? {
        let files = db.files(&settings.db_root);
        info!("database {db}: index {}, nodes {}", files.index.display(), files.nodes.display());
    }
    info!("{} is valid", path.display());
    Ok(())
}

fn check_reads(path: &Path, settings: &Settings) -> Result<()> {
    let params: KaijuReadsInputParams = load_record(path)?;
    info!("{params}");
    params.validate()?;
    if let Some(object_ref) = params.reads_object_ref()? {
        info!(numeric = object_ref.is_numeric(), "reads reference: {object_ref}");
    }
    report_extras(&params);
    if let Some(db) = params.database()? {
        let files = db.files(&settings.db_root);
        info!("database {db}: index {}, nodes {}", files.index.display(), files.nodes.display());
    }
    info!("{} is valid", path.display());
    Ok(())
}

fn report_extras<R: Record>(record: &R) {
    let extras: Vec<&str> = record
        .additional_properties()
        .keys()
        .map(String::as_str)
        .collect();
    if !extras.is_empty() {
        warn!("{} carries undeclared fields: {}", R::NAME, extras.join(", "));
    }
}

fn print_fields<R: Record>() {
    println!("{}", R::NAME);
    for spec in R::FIELDS {
        println!("  {:<28}{}", spec.wire, spec.camel);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    // Keep stdout clean for the encoded payload.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(settings.level()?)
        .init();
    install_panic_hook();

    match cli.command {
        Commands::Decode { variant, payload } => match variant {
            Variant::Input => decode::<KaijuInputParams>(&payload, &settings),
            Variant::Reads => decode::<KaijuReadsInputParams>(&payload, &settings),
        },
        Commands::Check { variant, payload } => match variant {
            Variant::Input => check_input(&payload, &settings),
            Variant::Reads => check_reads(&payload, &settings),
        },
        Commands::Fields { variant } => {
            match variant {
                Variant::Input => print_fields::<KaijuInputParams>(),
                Variant::Reads => print_fields::<KaijuReadsInputParams>(),
            }
            Ok(())
        }
    }
}
