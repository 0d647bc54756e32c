use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use archscope::config::AnalyzerConfig;
use archscope::export::{export, ExportData, ExportFormat};
use archscope::report::{analyze_file, AnalysisSession};

#[derive(Parser)]
#[command(name = "archscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Structural analyzer for JavaScript/TypeScript codebases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Config file (defaults to archscope.toml in the analyzed directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Effective-line threshold for the size advisor
    #[arg(long)]
    threshold: Option<usize>,

    /// Responsibilities a file may have before it is flagged
    #[arg(long)]
    max_responsibilities: Option<usize>,

    /// Add unresolved bare imports to the graph as external nodes
    #[arg(long)]
    include_external: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every source file under a directory
    Analyze {
        /// Path to analyze (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output format: json, markdown or dot
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Analyze a single file and print the result as JSON
    File {
        /// File to analyze
        path: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the import graph only
    Graph {
        /// Path to analyze (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output format: dot or json
        #[arg(short, long, default_value = "dot")]
        format: ExportFormat,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("archscope={}", default_level))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Some(Commands::Analyze {
            path,
            format,
            output,
            config,
        }) => {
            let config = load_config(&config, &path)?;
            let mut session =
                AnalysisSession::new(config).context("Failed to initialize the parser")?;
            let report = session.analyze_directory(&path);
            let data = ExportData::new(project_name(&path), report, session.dependency_graph());

            match output {
                Some(file) => {
                    let mut buffer = Vec::new();
                    export(format, &data, &mut buffer)?;
                    fs::write(&file, buffer)
                        .with_context(|| format!("Failed to write report to {}", file.display()))?;
                    eprintln!("Report written to {}", file.display());
                }
                None => export(format, &data, &mut io::stdout().lock())?,
            }
        }
        Some(Commands::File { path, config }) => {
            let root = path.parent().unwrap_or(Path::new("."));
            let config = load_config(&config, root)?;
            let analysis = analyze_file(&path, &config)
                .with_context(|| format!("Failed to analyze {}", path.display()))?;
            let json = serde_json::to_string_pretty(&analysis)?;
            writeln!(io::stdout().lock(), "{}", json)?;
        }
        Some(Commands::Graph { path, format, config }) => {
            let config = load_config(&config, &path)?;
            let mut session =
                AnalysisSession::new(config).context("Failed to initialize the parser")?;
            let report = session.analyze_directory(&path);
            let mut stdout = io::stdout().lock();

            match format {
                ExportFormat::Json => {
                    writeln!(stdout, "{}", serde_json::to_string_pretty(&report.graph)?)?;
                }
                ExportFormat::Dot => write!(stdout, "{}", session.dependency_graph().to_dot())?,
                ExportFormat::Markdown => {
                    anyhow::bail!("The graph command supports dot and json output")
                }
            }
        }
        Some(Commands::Version) => {
            println!("archscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("archscope - structural analyzer for JavaScript/TypeScript");
            println!("Run 'archscope analyze' to analyze the current directory");
            println!("Run 'archscope --help' for more information");
        }
    }

    Ok(())
}

/// Loads `--config`, or discovers `archscope.toml` under `root`, then applies
/// the flag overrides.
fn load_config(args: &ConfigArgs, root: &Path) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(file) => AnalyzerConfig::load(file)
            .with_context(|| format!("Failed to load config {}", file.display()))?,
        None => AnalyzerConfig::discover(root)
            .with_context(|| format!("Failed to load config from {}", root.display()))?,
    };

    if let Some(threshold) = args.threshold {
        config.size.threshold = threshold;
    }
    if let Some(max) = args.max_responsibilities {
        config.responsibilities.max_responsibilities = max;
    }
    if args.include_external {
        config.dependencies.include_external_deps = true;
    }
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

fn project_name(path: &Path) -> String {
    fs::canonicalize(path)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}
