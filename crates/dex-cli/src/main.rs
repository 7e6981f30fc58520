// crates/dex-cli/src/main.rs
// ============================================================================
// Module: Dex CLI Entry Point
// Description: Command dispatcher for catalog sync and browsing.
// Purpose: Wire config, HTTP client, store, and sync log into one binary.
// Dependencies: clap, dex-config, dex-core, dex-fetch, dex-store-sqlite, rand.
// ============================================================================

//! ## Overview
//! `dex` loads `dex.toml` (or `--config` / `DEX_CONFIG`), opens the `SQLite`
//! catalog, and runs one command. Sync and backfill passes report per-id
//! failures and exit non-zero when any id failed; store failures abort the
//! command.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dex_cli::render;
use dex_cli::render::EntryView;
use dex_cli::t;
use dex_config::DexConfig;
use dex_config::LogSinkKind;
use dex_core::CatalogEntry;
use dex_core::CatalogId;
use dex_core::CatalogStore;
use dex_core::CatalogSync;
use dex_core::FileSyncLog;
use dex_core::IdRange;
use dex_core::NoopSyncLog;
use dex_core::StderrSyncLog;
use dex_core::SyncLogSink;
use dex_core::catalog_status;
use dex_core::random_entry;
use dex_core::search;
use dex_core::toggle_favorite;
use dex_fetch::HttpCatalogClient;
use dex_store_sqlite::SqliteCatalogStore;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dex", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (overrides `DEX_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch records into the local catalog, then backfill artwork.
    Sync(SyncCommand),
    /// Download artwork for stored entries that lack it.
    Backfill,
    /// Show how much of the catalog is stored.
    Status,
    /// List stored entries.
    List(ListCommand),
    /// Show one entry.
    Show(ShowCommand),
    /// Toggle the favorite flag of an entry.
    Favorite(FavoriteCommand),
    /// Show a random stored entry.
    Random(FormatArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `sync`.
#[derive(Args, Debug)]
struct SyncCommand {
    /// First id to fetch (defaults to the resume position).
    #[arg(long, value_name = "ID")]
    from: Option<u32>,
    /// Last id to fetch, inclusive (defaults to the expected total).
    #[arg(long, value_name = "ID")]
    to: Option<u32>,
}

/// Output format selection.
#[derive(Args, Debug)]
struct FormatArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
struct ListCommand {
    /// Case-insensitive name filter.
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,
    /// Only list favorites.
    #[arg(long, action = ArgAction::SetTrue)]
    favorites: bool,
    /// Output format.
    #[command(flatten)]
    output: FormatArgs,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
struct ShowCommand {
    /// Entry id.
    id: u32,
    /// Output format.
    #[command(flatten)]
    output: FormatArgs,
}

/// Arguments for `favorite`.
#[derive(Args, Debug)]
struct FavoriteCommand {
    /// Entry id.
    id: u32,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the config, then report the effective settings.
    Validate,
}

/// Output formats for structured CLI commands.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Pretty-printed JSON output.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_lines(&[t!("main.version", version = version)])?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        Cli::command()
            .print_help()
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };
    let config = DexConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;

    match command {
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(&config),
        Commands::Sync(command) => command_sync(&config, &command),
        Commands::Backfill => command_backfill(&config),
        Commands::Status => command_status(&config),
        Commands::List(command) => command_list(&config, &command),
        Commands::Show(command) => command_show(&config, &command),
        Commands::Favorite(command) => command_favorite(&config, &command),
        Commands::Random(output) => command_random(&config, &output),
    }
}

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Opens the configured `SQLite` catalog store.
fn open_store(config: &DexConfig) -> CliResult<SqliteCatalogStore> {
    SqliteCatalogStore::new(config.store.to_sqlite_config()).map_err(|err| {
        CliError::new(t!("store.open_failed", path = config.store.path.display(), error = err))
    })
}

/// Builds the configured HTTP client.
fn open_client(config: &DexConfig) -> CliResult<HttpCatalogClient> {
    HttpCatalogClient::new(config.source.to_client_config())
        .map_err(|err| CliError::new(t!("fetch.init_failed", error = err)))
}

/// Builds the configured sync log sink.
fn open_log(config: &DexConfig) -> CliResult<Box<dyn SyncLogSink>> {
    match (config.log.sink, config.log.path.as_deref()) {
        (LogSinkKind::None, _) => Ok(Box::new(NoopSyncLog)),
        (LogSinkKind::Stderr, _) => Ok(Box::new(StderrSyncLog)),
        (LogSinkKind::File, Some(path)) => FileSyncLog::new(path)
            .map(|log| Box::new(log) as Box<dyn SyncLogSink>)
            .map_err(|err| {
                CliError::new(t!("log.open_failed", path = path.display(), error = err))
            }),
        (LogSinkKind::File, None) => Err(CliError::new(t!(
            "config.load_failed",
            error = "log.path is required when log.sink = \"file\""
        ))),
    }
}

/// Resolves the id range requested by `sync`; `None` means resume.
fn sync_range(
    command: &SyncCommand,
    resume: CatalogId,
    expected_total: u32,
) -> CliResult<Option<IdRange>> {
    if command.from.is_none() && command.to.is_none() {
        return Ok(None);
    }
    let from = match command.from {
        Some(0) => return Err(invalid_id("--from", 0)),
        Some(from) => CatalogId::new(from),
        None => resume,
    };
    let to = match command.to {
        Some(0) => return Err(invalid_id("--to", 0)),
        Some(to) => to,
        None => expected_total,
    };
    Ok(Some(IdRange::through(from, CatalogId::new(to))))
}

/// Builds the error for an out-of-range id argument.
fn invalid_id(field: &str, value: u32) -> CliError {
    CliError::new(t!("sync.invalid_id", field = field, value = value))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `config validate`.
fn command_config_validate(config: &DexConfig) -> CliResult<ExitCode> {
    write_lines(&[t!(
        "config.validate.ok",
        base_url = config.source.base_url,
        store = config.store.path.display(),
        total = config.catalog.expected_total
    )])?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `sync`.
fn command_sync(config: &DexConfig, command: &SyncCommand) -> CliResult<ExitCode> {
    let store = open_store(config)?;
    let client = open_client(config)?;
    let log = open_log(config)?;
    let sync = CatalogSync::new(&client, &client, &store).with_log(log.as_ref());
    let expected_total = config.catalog.expected_total;
    let resume = sync
        .resume_position()
        .map_err(|err| CliError::new(t!("sync.failed", error = err)))?;
    let report = match sync_range(command, resume, expected_total)? {
        Some(range) => sync.synchronize(range),
        None => sync.trigger_resync(expected_total),
    }
    .map_err(|err| CliError::new(t!("sync.failed", error = err)))?;
    write_lines(&render::sync_lines(&report))?;
    Ok(exit_for(report.is_clean()))
}

/// Executes `backfill`.
fn command_backfill(config: &DexConfig) -> CliResult<ExitCode> {
    let store = open_store(config)?;
    let client = open_client(config)?;
    let log = open_log(config)?;
    let sync = CatalogSync::new(&client, &client, &store).with_log(log.as_ref());
    let report = sync
        .backfill_assets()
        .map_err(|err| CliError::new(t!("backfill.failed", error = err)))?;
    write_lines(&render::backfill_lines(&report))?;
    Ok(exit_for(report.failures.is_empty()))
}

/// Executes `status`.
fn command_status(config: &DexConfig) -> CliResult<ExitCode> {
    let store = open_store(config)?;
    let expected = usize::try_from(config.catalog.expected_total).unwrap_or(usize::MAX);
    let status = catalog_status(&store, expected).map_err(read_error)?;
    write_lines(&render::status_lines(&status))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `list`.
fn command_list(config: &DexConfig, command: &ListCommand) -> CliResult<ExitCode> {
    let store = open_store(config)?;
    let entries =
        search(&store, command.search.as_deref(), command.favorites).map_err(read_error)?;
    match command.output.format {
        OutputFormat::Json => {
            let views: Vec<EntryView> = entries.iter().map(EntryView::from).collect();
            write_json(&views)?;
        }
        OutputFormat::Text if entries.is_empty() => write_lines(&[t!("list.none")])?,
        OutputFormat::Text => {
            let lines: Vec<String> = entries.iter().map(render::entry_line).collect();
            write_lines(&lines)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `show`.
fn command_show(config: &DexConfig, command: &ShowCommand) -> CliResult<ExitCode> {
    let store = open_store(config)?;
    let id = CatalogId::new(command.id);
    let entry = store
        .get(id)
        .map_err(read_error)?
        .ok_or_else(|| CliError::new(t!("show.not_found", id = id)))?;
    write_entry(&entry, command.output.format)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `favorite`.
fn command_favorite(config: &DexConfig, command: &FavoriteCommand) -> CliResult<ExitCode> {
    let store = open_store(config)?;
    let id = CatalogId::new(command.id);
    let favorite = toggle_favorite(&store, id)
        .map_err(|err| CliError::new(t!("favorite.failed", id = id, error = err)))?;
    let name = store.get(id).map_err(read_error)?.map(|entry| entry.name).unwrap_or_default();
    let message = if favorite {
        t!("favorite.on", id = id, name = name)
    } else {
        t!("favorite.off", id = id, name = name)
    };
    write_lines(&[message])?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `random`.
fn command_random(config: &DexConfig, output: &FormatArgs) -> CliResult<ExitCode> {
    let store = open_store(config)?;
    let mut rng = rand::thread_rng();
    match random_entry(&store, &mut rng).map_err(read_error)? {
        Some(entry) => write_entry(&entry, output.format)?,
        None => write_lines(&[t!("random.empty")])?,
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Maps a pass outcome to an exit code.
fn exit_for(clean: bool) -> ExitCode {
    if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Wraps a store read failure.
fn read_error(err: dex_core::StoreError) -> CliError {
    CliError::new(t!("store.read_failed", error = err))
}

/// Writes one entry in the requested format.
fn write_entry(entry: &CatalogEntry, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Text => write_lines(&render::entry_detail(entry)),
        OutputFormat::Json => write_json(&EntryView::from(entry)),
    }
}

/// Writes pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_lines(&[rendered])
}

/// Writes lines to stdout.
fn write_lines(lines: &[String]) -> CliResult<()> {
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        writeln!(&mut stdout, "{line}").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
