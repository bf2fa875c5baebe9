//! Single-process host for the Resource module.
//!
//! Stands in for the execution engine: every delivered message gets its own
//! [`CacheStore`] transaction, committed on success and discarded on error.
//! Committed state is kept in a [`MemStore`] and persisted as one JSON file.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    error::LedgerError,
    genesis::{export_genesis, init_genesis, GenesisState},
    query::{
        QueryAllResourceRequest, QueryAllResourceResponse, QueryGetResourceRequest,
        QueryGetResourceResponse, QueryService,
    },
    service::{Msg, MsgResponse, ResourceService},
    store::{state_root, CacheStore, MemStore, StateRoot},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed state file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("state file {path} is corrupt: app hash {stored} does not match contents {computed}")]
    AppHashMismatch {
        path: PathBuf,
        stored: String,
        computed: String,
    },
    #[error("refusing to import genesis over a non-empty store")]
    StoreNotEmpty,
}

impl AppError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        AppError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize, Deserialize)]
struct StateFile {
    height: u64,
    app_hash: String,
    store: MemStore,
}

pub struct Ledger {
    store: MemStore,
    height: u64,
    app_hash: StateRoot,
    path: Option<PathBuf>,
}

impl Ledger {
    /// In-memory ledger initialised from `genesis`.
    pub fn new(genesis: &GenesisState) -> AppResult<Self> {
        let mut store = MemStore::new();
        init_genesis(&mut store, genesis)?;
        let app_hash = state_root(&store);
        Ok(Self {
            store,
            height: 0,
            app_hash,
            path: None,
        })
    }

    /// Loads the state file at `path`, or starts from the default genesis if
    /// it does not exist yet. Nothing is written until [`Ledger::save`].
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if !path.exists() {
            let mut ledger = Self::new(&GenesisState::default())?;
            ledger.path = Some(path);
            return Ok(ledger);
        }

        let raw = fs::read(&path).map_err(|e| AppError::io(&path, e))?;
        let file: StateFile =
            serde_json::from_slice(&raw).map_err(|e| AppError::json(&path, e))?;
        let computed = state_root(&file.store);
        if hex::encode(computed) != file.app_hash {
            return Err(AppError::AppHashMismatch {
                path,
                stored: file.app_hash,
                computed: hex::encode(computed),
            });
        }
        info!(path = %path.display(), height = file.height, "state loaded");
        Ok(Self {
            store: file.store,
            height: file.height,
            app_hash: computed,
            path: Some(path),
        })
    }

    /// Writes the committed state to the file given to [`Ledger::open`].
    /// In-memory ledgers have nothing to save.
    pub fn save(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        let file = StateFile {
            height: self.height,
            app_hash: hex::encode(self.app_hash),
            store: self.store.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file).map_err(|e| AppError::json(path, e))?;

        // write-then-rename so a crash never leaves a half-written state file
        let tmp = path.with_extension("json.tmp");
        let mut f = fs::File::create(&tmp).map_err(|e| AppError::io(&tmp, e))?;
        f.write_all(&bytes).map_err(|e| AppError::io(&tmp, e))?;
        f.sync_all().map_err(|e| AppError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| AppError::io(path, e))?;
        Ok(())
    }

    /// Runs `msg` as one atomic transaction.
    pub fn deliver(&mut self, msg: Msg) -> Result<MsgResponse, LedgerError> {
        let kind = msg.name();
        let signer = msg.signer().clone();

        let mut tx = CacheStore::new(&mut self.store);
        match ResourceService::handle(&mut tx, msg) {
            Ok(resp) => {
                let writes = tx.pending();
                tx.commit();
                self.height += 1;
                self.app_hash = state_root(&self.store);
                info!(
                    msg = kind,
                    signer = %signer,
                    writes,
                    height = self.height,
                    app_hash = %hex::encode(self.app_hash),
                    "transaction committed"
                );
                Ok(resp)
            }
            Err(err) => {
                tx.discard();
                warn!(
                    msg = kind,
                    signer = %signer,
                    code = err.code(),
                    error = %err,
                    "transaction rejected"
                );
                Err(err)
            }
        }
    }

    pub fn query_resource(
        &self,
        req: &QueryGetResourceRequest,
    ) -> Result<QueryGetResourceResponse, LedgerError> {
        QueryService::resource(&self.store, req)
    }

    pub fn query_resource_all(
        &self,
        req: &QueryAllResourceRequest,
    ) -> Result<QueryAllResourceResponse, LedgerError> {
        QueryService::resource_all(&self.store, req)
    }

    pub fn export_genesis(&self) -> Result<GenesisState, LedgerError> {
        export_genesis(&self.store)
    }

    /// Replaces the whole module state with `genesis` and resets the height.
    pub fn import_genesis(&mut self, genesis: &GenesisState, force: bool) -> AppResult<()> {
        if !force && !self.store.is_empty() && self.export_genesis()? != GenesisState::default() {
            return Err(AppError::StoreNotEmpty);
        }
        let mut store = MemStore::new();
        init_genesis(&mut store, genesis)?;
        self.store = store;
        self.height = 0;
        self.app_hash = state_root(&self.store);
        info!(
            resources = genesis.resource_list.len(),
            resource_count = genesis.resource_count,
            "genesis imported"
        );
        Ok(())
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn app_hash(&self) -> StateRoot {
        self.app_hash
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
