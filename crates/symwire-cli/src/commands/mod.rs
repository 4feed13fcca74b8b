//! Command handlers. Each module maps one subcommand group onto
//! [`ArchitectureApi`] calls and hands the envelope to the output manager.

pub mod completions;
pub mod config;
pub mod generate;
pub mod graph;
pub mod init;
pub mod symbol;
pub mod validate;
pub mod wire;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::de::DeserializeOwned;

use tracing::{debug, instrument};

use symwire_adapters::{JsonFileStore, LocalFilesystem, emitter};
use symwire_core::application::{
    ArchitectureApi, CodeGenerator, GenerateOptions, GraphService, SymbolRegistry, WiringEngine,
    ports::{ConnectionStore, SymbolStore},
};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Everything a registry command needs.
pub struct Context {
    pub api: ArchitectureApi,
    pub config: AppConfig,
    pub output: OutputManager,
}

impl Context {
    /// Open the registry file and assemble the services over it.
    #[instrument(skip_all)]
    pub fn open(global: &GlobalArgs, config: AppConfig, output: OutputManager) -> CliResult<Self> {
        let path = global.store.clone().unwrap_or_else(|| config.store.path.clone());
        debug!(store = %path.display(), "Opening registry");

        let store = Arc::new(JsonFileStore::open(path)?);
        let symbols: Arc<dyn SymbolStore> = store.clone();
        let connections: Arc<dyn ConnectionStore> = store;

        let mut generator = CodeGenerator::new(symbols.clone(), Box::new(LocalFilesystem::new()))
            .with_default_language(config.generator.default_language.clone());
        for e in emitter::all() {
            generator = generator.with_emitter(e);
        }

        let api = ArchitectureApi::new(
            SymbolRegistry::new(symbols.clone()),
            WiringEngine::new(
                symbols.clone(),
                connections.clone(),
                config.wiring.type_check_mode,
            ),
            GraphService::new(symbols, connections),
            generator,
        );

        Ok(Self {
            api,
            config,
            output,
        })
    }

    /// Generation options from config, with an optional directory override.
    pub fn generate_options(&self, output_dir: Option<PathBuf>) -> GenerateOptions {
        GenerateOptions::new(
            output_dir.unwrap_or_else(|| self.config.generator.output_dir.clone()),
        )
        .overwrite_generated(self.config.generator.overwrite_generated)
    }
}

/// Read a JSON payload such as a symbol or a change set.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::IoError {
        message: format!("Failed to read '{}'", path.display()),
        source: e,
    })?;
    serde_json::from_str(&raw).map_err(|e| CliError::InvalidInput {
        message: format!("'{}' is not valid JSON for this command: {e}", path.display()),
        source: Some(Box::new(e)),
    })
}
