use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crude::{
    app::{AppError, Ledger},
    config::{AppConfig, DEFAULT_HOME, DEFAULT_LOG_LEVEL},
    genesis::GenesisState,
    query::{QueryAllResourceRequest, QueryGetResourceRequest},
    resource::{Category, PageRequest, ResourceId},
    service::{Msg, MsgCreateResource, MsgDeleteResource, MsgUpdateResource},
    LedgerError,
};

//==================== CLI definition ====================//

#[derive(Parser)]
#[command(
    name = "crude",
    version,
    about = "Resource ledger: create, update, delete and query Resources"
)]
struct Cli {
    /// Directory holding the state file
    #[arg(long, global = true, env = "CRUDE_HOME", default_value = DEFAULT_HOME)]
    home: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, env = "CRUDE_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// State-mutating transactions
    Tx {
        #[command(subcommand)]
        cmd: TxCommand,
    },
    /// Read-only queries
    Query {
        #[command(subcommand)]
        cmd: QueryCommand,
    },
    /// Module state import/export
    Genesis {
        #[command(subcommand)]
        cmd: GenesisCommand,
    },
    /// Show height and state root
    Status,
}

#[derive(Subcommand)]
enum TxCommand {
    /// Create resource
    CreateResource {
        name: String,
        category: Category,
        /// Identity signing the transaction
        #[arg(long)]
        from: String,
    },
    /// Update resource
    UpdateResource {
        id: ResourceId,
        name: String,
        category: Category,
        #[arg(long)]
        from: String,
    },
    /// Delete resource
    DeleteResource {
        id: ResourceId,
        #[arg(long)]
        from: String,
    },
}

#[derive(Subcommand)]
enum QueryCommand {
    /// Shows a resource by id
    ShowResource { id: ResourceId },
    /// List all resource
    ListResource {
        /// Page size (0 selects the default)
        #[arg(long, default_value_t = 0)]
        limit: u64,
        #[arg(long, default_value_t = 0, conflicts_with = "key")]
        offset: u64,
        /// Resume from this id (the `next_key` of a previous page)
        #[arg(long)]
        key: Option<ResourceId>,
        #[arg(long)]
        count_total: bool,
        #[arg(long)]
        reverse: bool,
    },
}

#[derive(Subcommand)]
enum GenesisCommand {
    /// Write the current module state as genesis JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the module state with a genesis file
    Import {
        file: PathBuf,
        /// Overwrite existing state
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Status {
    height: u64,
    app_hash: String,
    next_id: ResourceId,
    state_file: Option<String>,
}

//==================== helpers ====================//

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_genesis(path: &Path) -> Result<GenesisState, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

//==================== commands ====================//

fn tx_cmd(ledger: &mut Ledger, cmd: TxCommand) -> Result<(), CliError> {
    let msg = match cmd {
        TxCommand::CreateResource {
            name,
            category,
            from,
        } => Msg::CreateResource(MsgCreateResource {
            creator: from.into(),
            name,
            category,
        }),
        TxCommand::UpdateResource {
            id,
            name,
            category,
            from,
        } => Msg::UpdateResource(MsgUpdateResource {
            creator: from.into(),
            id,
            name,
            category,
        }),
        TxCommand::DeleteResource { id, from } => Msg::DeleteResource(MsgDeleteResource {
            creator: from.into(),
            id,
        }),
    };
    let resp = ledger.deliver(msg)?;
    ledger.save()?;
    print_json(&resp)
}

fn query_cmd(ledger: &Ledger, cmd: QueryCommand) -> Result<(), CliError> {
    match cmd {
        QueryCommand::ShowResource { id } => {
            print_json(&ledger.query_resource(&QueryGetResourceRequest { id })?)
        }
        QueryCommand::ListResource {
            limit,
            offset,
            key,
            count_total,
            reverse,
        } => {
            let req = QueryAllResourceRequest {
                pagination: PageRequest {
                    key,
                    offset,
                    limit,
                    count_total,
                    reverse,
                },
            };
            print_json(&ledger.query_resource_all(&req)?)
        }
    }
}

fn genesis_cmd(ledger: &mut Ledger, cmd: GenesisCommand) -> Result<(), CliError> {
    match cmd {
        GenesisCommand::Export { out: None } => print_json(&ledger.export_genesis()?),
        GenesisCommand::Export { out: Some(path) } => {
            let bytes = serde_json::to_vec_pretty(&ledger.export_genesis()?)?;
            fs::write(&path, bytes).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "genesis exported");
            Ok(())
        }
        GenesisCommand::Import { file, force } => {
            let genesis = read_genesis(&file)?;
            ledger.import_genesis(&genesis, force)?;
            ledger.save()?;
            Ok(())
        }
    }
}

fn status_cmd(ledger: &Ledger) -> Result<(), CliError> {
    print_json(&Status {
        height: ledger.height(),
        app_hash: hex::encode(ledger.app_hash()),
        next_id: ledger.export_genesis()?.resource_count,
        state_file: ledger.path().map(|p| p.display().to_string()),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::new(cli.home, cli.log_level);
    let mut ledger = Ledger::open(config.state_file())?;
    match cli.command {
        Command::Tx { cmd } => tx_cmd(&mut ledger, cmd),
        Command::Query { cmd } => query_cmd(&ledger, cmd),
        Command::Genesis { cmd } => genesis_cmd(&mut ledger, cmd),
        Command::Status => status_cmd(&ledger),
    }
}

//==================== main ====================//

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let CliError::Ledger(e) | CliError::App(AppError::Ledger(e)) = &err {
                eprintln!("code: {}", e.code());
            }
            ExitCode::FAILURE
        }
    }
}
