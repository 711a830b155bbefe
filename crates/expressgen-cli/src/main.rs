use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use expressgen_core::CodeGenerator;
use expressgen_core::config::{self, CONFIG_FILE_NAME, ExpressgenConfig};
use expressgen_core::ir::{self, IrSpec};
use expressgen_core::output::{WriteReport, write_files};
use expressgen_core::postprocess::PostProcessHook;
use expressgen_express_server::{ExpressServerGenerator, GENERATOR_NAME};

#[derive(Parser)]
#[command(
    name = "expressgen",
    about = "Express (ES modules) server generator for OpenAPI models",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a server from a parsed API model
    Generate {
        /// Generator to run
        #[arg(short = 'g', long)]
        generator_name: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to the model document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the specification features a generator supports
    Features {
        /// Generator to describe
        #[arg(short = 'g', long, default_value = GENERATOR_NAME)]
        generator_name: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Initialize a new expressgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            generator_name,
            output,
            input,
        } => cmd_generate(generator_name, output, input),

        Commands::Features {
            generator_name,
            format,
        } => cmd_features(&generator_name, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "expressgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ExpressgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn load_model(path: &Path) -> Result<IrSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let model = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ir::from_json(&content),
        _ => ir::from_yaml(&content),
    }
    .with_context(|| format!("invalid model document {}", path.display()))?;
    log::debug!(
        "loaded {} operations from {}",
        model.operations.len(),
        path.display()
    );
    Ok(model)
}

/// Look up a generator by its name.
fn get_generator(name: &str) -> Result<Box<dyn CodeGenerator>> {
    match name {
        GENERATOR_NAME => Ok(Box::new(ExpressServerGenerator::new())),
        other => anyhow::bail!("unknown generator `{other}` (available: {GENERATOR_NAME})"),
    }
}

fn cmd_generate(
    generator_name: Option<String>,
    output: Option<PathBuf>,
    input: Option<PathBuf>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let generator_name = generator_name.unwrap_or(cfg.generator);
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));

    let generator = get_generator(&generator_name)?;
    let model = load_model(&input)?;

    eprintln!("Generating {} → {}", generator.name(), output_dir.display());
    let files = generator
        .generate(&model, &cfg.server)
        .with_context(|| format!("{} failed", generator.name()))?;

    let hook =
        PostProcessHook::from_env(generator.post_process_env(), generator.source_extension());
    if !hook.is_enabled() {
        eprintln!(
            "  note: set {} to format each generated .{} file",
            generator.post_process_env(),
            generator.source_extension()
        );
    }

    let report = write_files(&output_dir, &files, &hook)?;

    eprintln!(
        "Generated {} files in {} ({} existing files kept)",
        report.written.len(),
        output_dir.display(),
        report.skipped.len()
    );
    if report.has_warnings() {
        for line in warning_lines(&report) {
            eprintln!("{line}");
        }
        eprintln!(
            "Completed with {} post-processing warnings",
            report.warnings.len()
        );
    }
    Ok(())
}

/// One indented line per formatter failure.
fn warning_lines(report: &WriteReport) -> Vec<String> {
    report
        .warnings
        .iter()
        .map(|warning| format!("  warning: {warning}"))
        .collect()
}

fn cmd_features(generator_name: &str, format: OutputFormat) -> Result<()> {
    let generator = get_generator(generator_name)?;
    let features = generator.features();

    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(features)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(features)?),
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
