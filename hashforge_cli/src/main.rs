use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use hashforge_cli::config::{AppConfig, ConfigManager};
use hashforge_cli::output::{HashRecord, OutputFormat, create_formatter};
use hashforge_cli::{progress, terminal};
use hashforge_core::{
    AlgorithmRegistry, Digest, FormatterRegistry, HashCalculator, HashResult, ProgressProvider,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "hashforge")]
#[command(author, version, about = "Incremental block hashing with pluggable algorithms", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the digest of files, stdin or a string
    Hash {
        /// Files to hash; `-` or no path reads stdin
        paths: Vec<PathBuf>,

        /// Algorithm name (see `hashforge list`); defaults to the configured one
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Digest encoding: hex, hex-upper, base64, base64url or raw
        #[arg(short, long)]
        format: Option<String>,

        /// Hash this string instead of reading input
        #[arg(short, long, conflicts_with = "paths")]
        text: Option<String>,

        /// Expected digest in hex; exits with status 1 on mismatch
        #[arg(long, value_name = "HEX")]
        check: Option<String>,

        /// Result layout
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Disable progress bar display
        #[arg(long)]
        no_progress: bool,
    },

    /// List registered algorithms
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Hash command arguments after parsing
struct HashArgs {
    paths: Vec<PathBuf>,
    algorithm: Option<String>,
    format: Option<String>,
    text: Option<String>,
    check: Option<String>,
    output: Option<OutputFormat>,
    no_progress: bool,
}

enum Input {
    Text(String),
    Stdin,
    File(PathBuf),
}

impl Input {
    fn label(&self) -> String {
        match self {
            Input::Text(text) => format!("{text:?}"),
            Input::Stdin => "-".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("hashforge_core", log::LevelFilter::Debug)
            .filter_module("hashforge_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let manager = ConfigManager::new();

    match cli.command {
        Commands::Hash {
            paths,
            algorithm,
            format,
            text,
            check,
            output,
            no_progress,
        } => {
            let config = load_config(&manager)?;
            let args = HashArgs {
                paths,
                algorithm,
                format,
                text,
                check,
                output,
                no_progress,
            };
            hash_command(&config, args).await?;
        }
        Commands::List { json } => {
            load_config(&manager)?;
            list_command(json)?;
        }
        Commands::Config { command } => config_command(&manager, command)?,
    }

    Ok(())
}

/// Load the layered configuration and install its defaults globally
fn load_config(manager: &ConfigManager) -> Result<AppConfig> {
    let config = manager.load()?;
    config
        .hashing
        .apply_defaults()
        .context("Configured defaults are not registered")?;
    log::debug!("Loaded configuration: {config:?}");
    Ok(config)
}

async fn hash_command(config: &AppConfig, args: HashArgs) -> Result<()> {
    let calculator = HashCalculator::with_config(&config.hashing)?;
    let algorithm = args.algorithm.as_deref();

    let formatter = FormatterRegistry::global().resolve(args.format.as_deref())?;
    let output_format = match args.output {
        Some(format) => format,
        None => OutputFormat::from_string(&config.output.format)?,
    };

    let expected = args
        .check
        .as_deref()
        .map(Digest::from_hex)
        .transpose()
        .context("--check expects a hex digest")?;

    let inputs = match args.text {
        Some(text) => vec![Input::Text(text)],
        None if args.paths.is_empty() => vec![Input::Stdin],
        None => args
            .paths
            .into_iter()
            .map(|p| {
                if p.as_os_str() == "-" {
                    Input::Stdin
                } else {
                    Input::File(p)
                }
            })
            .collect(),
    };

    if expected.is_some() && inputs.len() != 1 {
        anyhow::bail!("--check needs exactly one input");
    }
    if inputs.is_empty() {
        anyhow::bail!("Nothing to hash");
    }
    if matches!(inputs.as_slice(), [Input::Stdin]) && terminal::stdin_is_terminal() {
        eprintln!("{}", "Reading from stdin (Ctrl-D to finish)".dimmed());
    }

    let show_progress = !args.no_progress
        && config.output.progress_enabled
        && terminal::should_show_progress_by_default();

    let total_start = Instant::now();
    let mut results: Vec<(String, HashResult)> = Vec::with_capacity(inputs.len());

    for input in &inputs {
        let label = input.label();
        let bar = show_progress.then(|| progress::create_progress_infrastructure(&label));
        let provider = bar
            .as_ref()
            .map(|(adapter, _)| adapter.as_ref() as &dyn ProgressProvider);

        let outcome = match input {
            Input::Text(text) => calculator.calculate_str(algorithm, text),
            // Blocking stdin reads must not stall the progress render task
            Input::Stdin => tokio::task::block_in_place(|| {
                calculator.calculate_reader(algorithm, std::io::stdin().lock(), None, provider)
            }),
            Input::File(path) => {
                calculator
                    .calculate_file_async(algorithm, path, provider)
                    .await
            }
        };

        if let Some((adapter, handle)) = bar {
            adapter.complete();
            let _ = handle.await;
        }

        let result = outcome.with_context(|| format!("Failed to hash {label}"))?;
        log::debug!(
            "{label}: {} bytes in {:?}",
            result.input_size,
            result.duration
        );
        results.push((label, result));
    }

    if formatter.name() == "raw" {
        let mut stdout = std::io::stdout().lock();
        for (_, result) in &results {
            stdout.write_all(result.digest.as_bytes())?;
        }
        stdout.flush()?;
    } else {
        let records = results
            .iter()
            .map(|(label, result)| {
                HashRecord::from_result(label.as_str(), result, formatter.as_ref())
            })
            .collect::<Result<Vec<_>>>()?;

        let use_color = config.output.color_enabled && terminal::supports_ansi();
        let rendered = create_formatter(output_format, use_color).format_batch(&records)?;
        println!("{rendered}");
    }

    if results.len() > 1 && terminal::is_interactive() {
        let total_size: u64 = results.iter().map(|(_, r)| r.input_size).sum();
        let elapsed = total_start.elapsed();
        eprintln!("\n{}", "Summary:".bold().green());
        eprintln!("Inputs hashed: {}", results.len());
        eprintln!("Total size: {}", progress::format_bytes(total_size));
        eprintln!(
            "Throughput: {}",
            progress::format_throughput(total_size, elapsed)
        );
    }

    if let (Some(expected), Some((label, result))) = (expected, results.first()) {
        if result.digest.ct_eq(expected.as_bytes()) {
            eprintln!("{}: {}", label, "OK".green());
        } else {
            eprintln!("{}: {}", label, "FAILED".red());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn list_command(json: bool) -> Result<()> {
    let registry = AlgorithmRegistry::global();
    let default = registry.default_algorithm().map(|d| d.name().to_string());
    let algorithms = registry.list();

    if json {
        let entries: Vec<_> = algorithms
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name(),
                    "display_name": d.display_name(),
                    "identity": format!("{:#x}", d.identity()),
                    "digest_size": d.digest_size(),
                    "block_size": d.block_size(),
                    "default": default.as_deref() == Some(d.name()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{:<10} {:<10} {:>8} {:>8}  {}",
        "NAME", "IDENTITY", "DIGEST", "BLOCK", "DISPLAY"
    );
    for descriptor in &algorithms {
        let marker = if default.as_deref() == Some(descriptor.name()) {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<10} {:<10} {:>8} {:>8}  {}{}",
            descriptor.name(),
            format!("{:#x}", descriptor.identity()),
            descriptor.digest_size(),
            descriptor.block_size(),
            descriptor.display_name(),
            marker
        );
    }

    Ok(())
}

fn config_command(manager: &ConfigManager, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            eprintln!("Config file: {}", manager.config_path().display());
            print!("{}", manager.show()?);
        }
        ConfigCommand::Path => {
            println!("{}", manager.config_path().display());
        }
        ConfigCommand::Init { force } => {
            let path = manager.init(force)?;
            eprintln!(
                "{}",
                format!("Configuration written to: {}", path.display()).green()
            );
        }
    }

    Ok(())
}
