//! JSON-file backed store.
//!
//! One file holds the whole registry:
//!
//! ```json
//! {
//!   "format": 1,
//!   "symbols": [ { "id": "app/Cart@1.0.0", ... } ],
//!   "connections": [ { "id": "conn-...", "fromSymbolId": ... } ]
//! }
//! ```
//!
//! The file is read once on [`JsonFileStore::open`] and rewritten after every
//! successful mutation. Writes go to a sibling `.tmp` file that is then
//! renamed over the original, so a crash never leaves a half-written file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use symwire_core::{
    application::{
        ApplicationError,
        dto::{ConnectionDto, SymbolDto},
        ports::{ConnectionStore, SymbolStore},
    },
    domain::{Connection, ConnectionId, Symbol, SymbolId},
    error::{SymwireError, SymwireResult},
};

const FORMAT_VERSION: u32 = 1;

fn format_version() -> u32 {
    FORMAT_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryFile {
    #[serde(default = "format_version")]
    format: u32,
    #[serde(default)]
    symbols: Vec<SymbolDto>,
    #[serde(default)]
    connections: Vec<ConnectionDto>,
}

#[derive(Debug, Clone, Default)]
struct State {
    symbols: BTreeMap<SymbolId, Symbol>,
    connections: Vec<Connection>,
}

/// Symbol and connection store persisted to a single JSON file.
///
/// Implements both [`SymbolStore`] and [`ConnectionStore`]; share one
/// instance behind an `Arc` for both ports.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<State>,
}

impl JsonFileStore {
    /// Open `path`, loading its contents when it exists. A missing file is
    /// an empty registry and is created on the first write.
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path> + std::fmt::Debug) -> SymwireResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            load(&path)?
        } else {
            debug!("Registry file absent, starting empty");
            State::default()
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<R>(&self, f: impl FnOnce(&State) -> R) -> SymwireResult<R> {
        let state = self
            .state
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(f(&state))
    }

    /// Apply `f` to a copy, persist the copy, then commit it.
    fn mutate<R>(&self, f: impl FnOnce(&mut State) -> R) -> SymwireResult<R> {
        let mut state = self
            .state
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let mut next = state.clone();
        let result = f(&mut next);
        persist(&self.path, &next)?;
        *state = next;
        Ok(result)
    }
}

fn store_error(path: &Path, what: impl std::fmt::Display) -> SymwireError {
    ApplicationError::StoreError {
        reason: format!("{}: {what}", path.display()),
    }
    .into()
}

fn load(path: &Path) -> SymwireResult<State> {
    let raw = fs::read_to_string(path).map_err(|e| store_error(path, e))?;
    let file: RegistryFile = serde_json::from_str(&raw).map_err(|e| store_error(path, e))?;
    if file.format > FORMAT_VERSION {
        return Err(store_error(
            path,
            format!("unsupported format {} (newest known is {FORMAT_VERSION})", file.format),
        ));
    }

    let mut state = State::default();
    for dto in file.symbols {
        let symbol = Symbol::try_from(dto)?;
        state.symbols.insert(symbol.id().clone(), symbol);
    }
    for dto in file.connections {
        state.connections.push(Connection::try_from(dto)?);
    }
    debug!(
        symbols = state.symbols.len(),
        connections = state.connections.len(),
        "Loaded registry file"
    );
    Ok(state)
}

fn persist(path: &Path, state: &State) -> SymwireResult<()> {
    let file = RegistryFile {
        format: FORMAT_VERSION,
        symbols: state.symbols.values().map(SymbolDto::from).collect(),
        connections: state.connections.iter().map(ConnectionDto::from).collect(),
    };
    let json = serde_json::to_string_pretty(&file).map_err(|e| store_error(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| store_error(parent, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| store_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| store_error(path, e))?;
    debug!(path = %path.display(), "Registry file written");
    Ok(())
}

impl SymbolStore for JsonFileStore {
    fn get(&self, id: &SymbolId) -> SymwireResult<Option<Symbol>> {
        self.read(|s| s.symbols.get(id).cloned())
    }

    fn list(&self) -> SymwireResult<Vec<Symbol>> {
        self.read(|s| s.symbols.values().cloned().collect())
    }

    fn insert(&self, symbol: Symbol) -> SymwireResult<()> {
        self.mutate(|s| {
            s.symbols.insert(symbol.id().clone(), symbol);
        })
    }

    fn remove(&self, id: &SymbolId) -> SymwireResult<bool> {
        if !self.read(|s| s.symbols.contains_key(id))? {
            return Ok(false);
        }
        self.mutate(|s| s.symbols.remove(id).is_some())
    }
}

impl ConnectionStore for JsonFileStore {
    fn get(&self, id: &ConnectionId) -> SymwireResult<Option<Connection>> {
        self.read(|s| s.connections.iter().find(|c| &c.id == id).cloned())
    }

    fn list(&self) -> SymwireResult<Vec<Connection>> {
        self.read(|s| s.connections.clone())
    }

    fn insert(&self, connection: Connection) -> SymwireResult<()> {
        self.mutate(|s| match s.connections.iter_mut().find(|c| c.id == connection.id) {
            Some(existing) => *existing = connection,
            None => s.connections.push(connection),
        })
    }

    fn remove(&self, id: &ConnectionId) -> SymwireResult<bool> {
        if !self.read(|s| s.connections.iter().any(|c| &c.id == id))? {
            return Ok(false);
        }
        self.mutate(|s| {
            s.connections.retain(|c| &c.id != id);
            true
        })
    }
}
