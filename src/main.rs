use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use kalman_mem_gen::fixed_point::{format_token, FixedPoint};
use kalman_mem_gen::{generate, mem_file, ConfigOverrides, GeneratorConfig, DEFAULT_SCALE};

#[derive(Parser, Debug)]
#[command(name = "kalman_mem_gen")]
#[command(about = "Fixed-point Kalman filter memory image generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write .mem files for each state size (default)
    Generate(GenerateArgs),
    /// Print the words of a .mem file as signed integers and reals
    Decode(DecodeArgs),
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// JSON config file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Fixed-point scale factor (16384 = Q14)
    #[arg(long)]
    scale: Option<u32>,

    /// State size to generate; repeat for several (replaces 4, 6, 12)
    #[arg(long = "state-size", value_name = "N")]
    state_sizes: Vec<usize>,

    /// Directory that receives kalman_matrices_N/
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Print the generation report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to a .mem file
    file: PathBuf,

    /// Fixed-point scale the file was written with
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Decode(args)) => run_decode(args),
        Some(Command::Generate(args)) => run_generate(args),
        None => run_generate(GenerateArgs::default()),
    }
}

fn build_config(args: &GenerateArgs) -> Result<GeneratorConfig> {
    let overrides = ConfigOverrides {
        dt: args.dt,
        scale: args.scale,
        state_sizes: args.state_sizes.clone(),
        output_root: args.output_root.clone(),
    };
    GeneratorConfig::load(args.config.as_deref(), &overrides).with_context(|| match &args.config {
        Some(path) => format!("Failed to load config {}", path.display()),
        None => "Failed to build config".to_string(),
    })
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = build_config(&args)?;

    if !args.json {
        println!("[{}] Kalman memory generator starting", ts_now());
        println!("  dt: {}", config.dt);
        println!("  Scale: {}", config.scale);
        println!("  State sizes: {:?}", config.state_sizes);
        println!("  Output root: {}", config.output_root.display());
    }

    let report = generate(&config).context("Memory image generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (label, dir) in report.output_dirs() {
        println!("  {:<10} -> {}", label, dir.display());
    }
    let wrapped = report.wrapped_total();
    if wrapped > 0 {
        println!(
            "[{}] Done ({} element(s) wrapped past 16 bits, see warnings)",
            ts_now(),
            wrapped
        );
    } else {
        println!("[{}] Done", ts_now());
    }
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let fixed = FixedPoint::new(args.scale)?;
    let words = mem_file::read_words(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    for (idx, word) in words.iter().enumerate() {
        println!(
            "{:>4}  {}  {:>6}  {:>12.6}",
            idx,
            format_token(*word),
            *word as i16,
            fixed.decode_real(*word)
        );
    }
    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}
