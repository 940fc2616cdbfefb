//! IZL CLI - Command-line tool for I, Zombie level files
//!
//! This binary provides command-line interfaces for:
//! - inspect: decode a level of any generation and print it
//! - validate: check level files against the publication rules
//! - convert: upgrade any generation to the current format
//! - pack: encode a plain JSON level

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use izl_codec::{
    decode, decode_str, detect_bytes, detect_str, encode, encode_to_string, Detection, Framing,
    Level, Rules,
};
use izl_io::{validate_files_with, BatchOptions, FileReport, Verdict};
use serde_json::{json, Value};
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "izl")]
#[command(about = "I, Zombie level codec and validator")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "izl_codec=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a level file of any generation and print it
    ///
    /// Examples:
    ///   izl inspect level.izl3
    ///   izl inspect upload.txt --text --format json
    Inspect {
        /// Input file
        input: PathBuf,
        /// Treat the input as a text payload ("|", "=" or original base64)
        #[arg(long)]
        text: bool,
        /// Output format (summary, json)
        #[arg(long, value_enum, default_value_t = InspectFormat::Summary)]
        format: InspectFormat,
    },
    /// Check level files against the publication rules
    ///
    /// Exits with status 1 when any file is rejected or cannot be decoded.
    Validate {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// TOML file overriding the default rules
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Output format (table, json)
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
        /// Maximum worker threads
        #[arg(long)]
        threads: Option<usize>,
        /// Show progress while validating
        #[arg(long)]
        progress: bool,
    },
    /// Convert a level of any generation to the current format
    Convert {
        /// Input file
        input: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Write the "|" text form instead of binary
        #[arg(long)]
        text: bool,
    },
    /// Encode a plain JSON level
    Pack {
        /// Input JSON file
        input: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Write the "|" text form instead of binary
        #[arg(long)]
        text: bool,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum InspectFormat {
    Summary,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

/// Run a command. `Ok(false)` means it completed but found failures.
fn run(command: Commands) -> Result<bool, Box<dyn Error>> {
    match command {
        Commands::Inspect {
            input,
            text,
            format,
        } => handle_inspect(&input, text, format)?,
        Commands::Validate {
            inputs,
            rules,
            format,
            threads,
            progress,
        } => return handle_validate(&inputs, rules.as_deref(), format, threads, progress),
        Commands::Convert {
            input,
            output,
            text,
        } => {
            let (_, level) = read_level(&input, false)?;
            write_level(&level, &output, text)?;
        }
        Commands::Pack {
            input,
            output,
            text,
        } => handle_pack(&input, &output, text)?,
    }

    Ok(true)
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_level(path: &Path, as_text: bool) -> Result<(Detection, Level), Box<dyn Error>> {
    if as_text {
        let text = fs::read_to_string(path)?;
        let detection = Detection {
            version: detect_str(&text)?,
            framing: Framing::Text,
        };
        Ok((detection, decode_str(&text)?))
    } else {
        let bytes = fs::read(path)?;
        let detection = detect_bytes(&bytes);
        debug!(path = %path.display(), len = bytes.len(), "read input");
        Ok((detection, decode(&bytes)?))
    }
}

fn write_level(level: &Level, output: &Path, as_text: bool) -> Result<(), Box<dyn Error>> {
    let bytes = if as_text {
        encode_to_string(level)?.into_bytes()
    } else {
        encode(level)?
    };
    fs::write(output, &bytes)?;
    info!(output = %output.display(), len = bytes.len(), "wrote level");
    Ok(())
}

fn handle_inspect(input: &Path, as_text: bool, format: InspectFormat) -> Result<(), Box<dyn Error>> {
    let (detection, level) = read_level(input, as_text)?;
    let verdict = Rules::default().check(&level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        InspectFormat::Json => {
            let report = json!({
                "version": detection.version,
                "framing": detection.framing,
                "valid": verdict.is_ok(),
                "rejection": verdict.as_ref().err().map(|r| r.to_string()),
                "level": level,
            });
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        InspectFormat::Summary => {
            let framing = match detection.framing {
                Framing::Binary => "binary",
                Framing::Text => "text",
            };
            writeln!(out, "Format:      {} ({})", detection.version, framing)?;
            writeln!(out, "Name:        {}", level.name.as_deref().unwrap_or("-"))?;
            if let Some(author) = &level.author {
                writeln!(out, "Author:      {}", author)?;
            }
            writeln!(out, "Music:       {}", level.music.as_deref().unwrap_or("-"))?;
            writeln!(out, "Sun:         {}", display_opt(level.sun))?;
            writeln!(out, "Stripe:      {}", display_opt(level.stripe_col))?;
            writeln!(out, "Water:       {}", if level.is_water() { "yes" } else { "no" })?;
            if let Some(flags) = &level.lf_value {
                writeln!(out, "lfValue:     {:?}", flags.as_slice())?;
            }
            writeln!(out, "Plants:      {}", level.placements().len())?;
            if let Some(zombies) = &level.selected_zombies {
                writeln!(out, "Zombies:     {}", zombies.join(", "))?;
            }
            writeln!(
                out,
                "Screenshot:  {}",
                if level.screenshot.is_some() { "yes" } else { "no" }
            )?;
            match verdict {
                Ok(()) => writeln!(out, "Publishable: yes")?,
                Err(rejection) => writeln!(out, "Publishable: no ({})", rejection)?,
            }
        }
    }
    Ok(())
}

fn display_opt(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn load_rules(path: Option<&Path>) -> Result<Rules, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let rules: Rules = toml::from_str(&text)?;
            debug!(path = %path.display(), "loaded rules");
            Ok(rules)
        }
        None => Ok(Rules::default()),
    }
}

fn handle_validate(
    inputs: &[PathBuf],
    rules_path: Option<&Path>,
    format: ReportFormat,
    threads: Option<usize>,
    show_progress: bool,
) -> Result<bool, Box<dyn Error>> {
    let start = Instant::now();
    let rules = load_rules(rules_path)?;
    let opts = BatchOptions {
        max_threads: threads,
        ..BatchOptions::default()
    };

    let progress_bar = show_progress.then(|| create_spinner("Validating levels"));
    let reports = validate_files_with(inputs, &rules, &opts, |_| {
        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    })?;
    let passed = reports.iter().filter(|r| r.verdict.is_valid()).count();
    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "Validated {} files in {:.2?} ({} passed)",
            reports.len(),
            start.elapsed(),
            passed
        ));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &reports)?;
            writeln!(out)?;
        }
        ReportFormat::Table => print_report_table(&mut out, &reports)?,
    }

    Ok(passed == reports.len())
}

fn print_report_table<W: Write>(writer: &mut W, reports: &[FileReport]) -> std::io::Result<()> {
    let width = reports
        .iter()
        .map(|r| r.path.display().to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    writeln!(writer, "{:<width$}  {:<7}  {:<8}  Detail", "File", "Format", "Status")?;
    for report in reports {
        let version = report
            .version
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        let (status, detail) = match &report.verdict {
            Verdict::Valid => ("valid", ""),
            Verdict::Rejected(message) => ("rejected", message.as_str()),
            Verdict::Failed(message) => ("error", message.as_str()),
        };
        writeln!(
            writer,
            "{:<width$}  {:<7}  {:<8}  {}",
            report.path.display(),
            version,
            status,
            detail
        )?;
    }
    Ok(())
}

fn handle_pack(input: &Path, output: &Path, as_text: bool) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(input)?;
    let Value::Object(map) = serde_json::from_str::<Value>(&text)? else {
        return Err("level JSON must be an object".into());
    };
    let level = Level::from_json_map(map)?;
    write_level(&level, output, as_text)
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
