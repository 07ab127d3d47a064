use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use mlreview_classifier::CATEGORIES;
use mlreview_client::{
    ClientConfig, ErrorKind, HttpTransport, LifecycleState, Presentation, RequestController,
    SubmitOutcome, ENDPOINT_ENV,
};
use mlreview_editor::Editor;
use mlreview_protocol::serialize_json;
use serde::Serialize;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

mod report;
mod surface;

use report::{render_categories, render_presentation, ReportOptions};
use surface::SpinnerSurface;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "mlreview")]
#[command(about = "Review ML code with a remote analysis service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Analysis endpoint (overrides MLREVIEW_ENDPOINT and the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a source file for analysis and print the grouped findings
    Analyze(AnalyzeArgs),

    /// List the finding categories in display order
    Categories(CategoriesArgs),

    /// Print JSON schemas of the service request and response bodies
    Schema,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Source file to analyze (`-` reads stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output the presentation as JSON
    #[arg(long)]
    json: bool,

    /// Do not print code previews under findings
    #[arg(long)]
    no_preview: bool,
}

#[derive(Args)]
struct CategoriesArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    lifecycle: LifecycleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    presentation: &'a Presentation,
}

pub async fn main_entry() -> Result<ExitCode> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Analyze(args) => args.json,
        Commands::Categories(args) => args.json,
        Commands::Schema => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match &cli.command {
        Commands::Analyze(args) => {
            let config = resolve_config(&cli)?;
            run_analyze(args, config, cli.quiet).await
        }
        Commands::Categories(args) => {
            run_categories(args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Schema => {
            let schemas = mlreview_protocol::wire_schemas()?;
            print_stdout(&serde_json::to_string_pretty(&schemas)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let env_endpoint = env::var(ENDPOINT_ENV).ok();
    let config = ClientConfig::resolve(
        cli.endpoint.as_deref(),
        env_endpoint.as_deref(),
        cli.config.as_deref(),
    )
    .context("Failed to resolve client configuration")?;
    log::debug!("using analysis endpoint {}", config.endpoint);
    Ok(config)
}

fn read_source(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read source from stdin")?;
        return Ok(source);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

async fn run_analyze(args: &AnalyzeArgs, config: ClientConfig, quiet: bool) -> Result<ExitCode> {
    let editor = Editor::with_text(read_source(&args.input)?);
    log::debug!(
        "loaded {} line(s) from {}",
        editor.line_count(),
        args.input.display()
    );

    let transport = HttpTransport::new(&config).context("Failed to set up HTTP transport")?;
    let surface = Arc::new(SpinnerSurface::new(!quiet));
    let controller = RequestController::new(transport).with_observer(surface);

    let outcome = controller.submit(editor.text()).await;
    let settlement = match &outcome {
        SubmitOutcome::Settled(settlement) => settlement,
        SubmitOutcome::Rejected => anyhow::bail!("A submission is already in flight"),
    };

    let ui = controller.ui_state();
    let presentation = ui
        .results
        .presentation()
        .context("Submission settled without a rendered result")?;

    if args.json {
        let output = AnalyzeOutput {
            lifecycle: ui.lifecycle,
            error_kind: settlement.error_kind(),
            presentation,
        };
        print_stdout(&serialize_json(&output)?)?;
    } else {
        let options = ReportOptions {
            previews: !args.no_preview,
        };
        print_stdout(&render_presentation(presentation, options))?;
    }

    Ok(if settlement.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_categories(args: &CategoriesArgs) -> Result<()> {
    if args.json {
        print_stdout(&serialize_json(&CATEGORIES)?)?;
    } else {
        print_stdout(&render_categories(&CATEGORIES))?;
    }
    Ok(())
}
