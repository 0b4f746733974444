use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use rescope_manifest::ManifestGraph;
use rescope_resolver::{Engine, EngineConfig, RebuildDecision, RunSummary};
use std::fs;
use std::path::PathBuf;

mod report;

use report::ReportChannels;

#[derive(Parser)]
#[command(name = "rescope")]
#[command(about = "Selective-rebuild resolution for component catalogs", long_about = None)]
#[command(version)]
struct Cli {
    /// Manifest graph snapshot (JSON) produced by the catalog loader
    #[arg(long)]
    graph: PathBuf,

    /// Change list, one path per line
    #[arg(short, long, default_value = "infile.txt")]
    input: String,

    /// Directory the change list lives in
    #[arg(long, default_value = ".")]
    start_folder: PathBuf,

    /// Path-normalization root; overrides the snapshot's recorded root
    #[arg(long)]
    root: Option<PathBuf>,

    /// Where to write the affected-project ids
    #[arg(long, default_value = "rebuild-projects.txt")]
    projects_out: PathBuf,

    /// Where to write the affected-module ids
    #[arg(long, default_value = "rebuild-modules.txt")]
    modules_out: PathBuf,

    /// Manifest filename, top-level and per-module
    #[arg(long, default_value = rescope_resolver::DEFAULT_MANIFEST_NAME)]
    manifest_name: String,

    /// Path (relative to the root) whose change forces a full rebuild;
    /// repeatable. Default: the top-level manifest
    #[arg(long = "always-rebuild")]
    always_rebuild: Vec<PathBuf>,

    /// Module types worth reporting
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "driver,service,component,library"
    )]
    module_kinds: Vec<String>,

    /// Drop projects whose hardware the originating module does not support
    #[arg(long)]
    check_device_support: bool,

    /// Debug-log every project the change did not touch
    #[arg(long)]
    show_not_affected: bool,

    /// Print a machine-readable run summary to stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: Cli) -> Result<()> {
    let graph = ManifestGraph::from_snapshot_path(&cli.graph)
        .with_context(|| format!("loading graph snapshot '{}'", cli.graph.display()))?;
    log::debug!("loaded graph snapshot with {} nodes", graph.node_count());

    let config = engine_config(&cli, &graph);

    // Channels first: the fatal-input path below still emits its sentinel.
    let mut channels = ReportChannels::create(&cli.projects_out, &cli.modules_out)?;

    let input_path = cli.start_folder.join(&cli.input);
    let changes = match fs::read_to_string(&input_path) {
        Ok(changes) => changes,
        Err(e) => {
            log::error!("error opening change list '{}': {}", input_path.display(), e);
            channels.write_decision(&RebuildDecision::Nothing)?;
            emit_summary(&cli, &channels, &RebuildDecision::Nothing)?;
            std::process::exit(1);
        }
    };
    log::debug!("opened change list '{}'", input_path.display());

    let engine = Engine::new(&graph, config);
    let decision = engine.run(changes.lines())?;

    channels.write_decision(&decision)?;
    log::info!(
        "affected projects stored in '{}', affected modules in '{}'",
        channels.projects_path().display(),
        channels.modules_path().display()
    );
    emit_summary(&cli, &channels, &decision)?;

    Ok(())
}

fn engine_config(cli: &Cli, graph: &ManifestGraph) -> EngineConfig {
    let root = cli
        .root
        .clone()
        .or_else(|| graph.relative_root().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let always_rebuild = if cli.always_rebuild.is_empty() {
        vec![PathBuf::from(&cli.manifest_name)]
    } else {
        cli.always_rebuild.clone()
    };

    EngineConfig {
        root,
        manifest_name: cli.manifest_name.clone(),
        always_rebuild,
        module_kinds: cli.module_kinds.iter().cloned().collect(),
        check_device_support: cli.check_device_support,
        show_not_affected: cli.show_not_affected,
    }
}

fn emit_summary(cli: &Cli, channels: &ReportChannels, decision: &RebuildDecision) -> Result<()> {
    if !cli.json {
        return Ok(());
    }
    let summary = RunSummary::new(
        decision,
        channels.projects_path().display().to_string(),
        channels.modules_path().display().to_string(),
    );
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
