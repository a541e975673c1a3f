//! IconPlate CLI - Bridge interface for the build
//!
//! Commands: targets, render, batch
//! Outputs JSON to stdout, logs to stderr
//! Returns 1 on fatal errors, 2 when some regions failed to rasterize

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use iconplate_core::{PipelineError, RenderConfig, RenderPipeline, RenderReport, ENGINE_VERSION};

#[derive(Parser)]
#[command(name = "iconplate-cli", version)]
#[command(about = "IconPlate CLI - renders icon plates from SVG artwork")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON render config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rasterizer executable (overrides config and ICONPLATE_RASTERIZER)
    #[arg(short, long, global = true)]
    rasterizer: Option<String>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the files a render would produce, without rendering
    Targets {
        /// Source SVG documents
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// Render one document
    Render {
        /// Source SVG document
        source: PathBuf,

        /// Existing output directory
        out_dir: PathBuf,
    },

    /// Render several documents into one output directory
    Batch {
        /// Existing output directory
        out_dir: PathBuf,

        /// Source SVG documents
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },
}

const EXIT_FATAL: u8 = 1;
const EXIT_REGION_FAILED: u8 = 2;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(cli: &Cli) -> Result<RenderConfig, PipelineError> {
    let config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(program) = &cli.rasterizer {
        config.rasterizer.program = program.clone();
    }
    Ok(config)
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("cannot serialize output: {}", e),
    }
}

fn fail(error: &PipelineError) -> ExitCode {
    log::error!("{}", error);
    print_json(&serde_json::json!({
        "success": false,
        "error": error.to_string(),
    }));
    ExitCode::from(EXIT_FATAL)
}

fn report_json(report: &RenderReport) -> serde_json::Value {
    serde_json::json!({
        "success": !report.has_failures(),
        "engine_version": ENGINE_VERSION,
        "report": report,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let pipeline = RenderPipeline::new(config);

    match cli.command {
        Commands::Targets { sources } => {
            let mut listed = vec![];
            for source in &sources {
                match pipeline.target_names(source) {
                    Ok(targets) => listed.push(serde_json::json!({
                        "source": source.display().to_string(),
                        "targets": targets.iter().map(|t| &t.output_path).collect::<Vec<_>>(),
                    })),
                    Err(e) => return fail(&e),
                }
            }
            print_json(&serde_json::Value::Array(listed));
            ExitCode::SUCCESS
        }

        Commands::Render { source, out_dir } => match pipeline.render(&source, &out_dir) {
            Ok(report) => {
                print_json(&report_json(&report));
                if report.has_failures() {
                    ExitCode::from(EXIT_REGION_FAILED)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(e) => fail(&e),
        },

        Commands::Batch { out_dir, sources } => {
            let results = match pipeline.render_batch(&sources, &out_dir) {
                Ok(r) => r,
                Err(e) => return fail(&e),
            };

            let mut fatal = false;
            let mut region_failed = false;
            let documents: Vec<_> = results
                .iter()
                .map(|result| match result {
                    Ok(report) => {
                        region_failed |= report.has_failures();
                        report_json(report)
                    }
                    Err(e) => {
                        fatal = true;
                        serde_json::json!({ "success": false, "error": e.to_string() })
                    }
                })
                .collect();
            print_json(&serde_json::Value::Array(documents));

            if fatal {
                ExitCode::from(EXIT_FATAL)
            } else if region_failed {
                ExitCode::from(EXIT_REGION_FAILED)
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}
