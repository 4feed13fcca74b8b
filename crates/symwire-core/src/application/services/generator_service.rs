//! Code Generator - Generation-Gap scaffolding for L1–L3 symbols.
//!
//! Each symbol yields two artifacts under `<out>/<namespace>/`:
//!
//! ```text
//! order_service.base.ts   regenerated; header carries the content hash
//! order_service.ts        user-owned; written once, never touched again
//! ```
//!
//! The base artifact is skipped when its hash is unchanged and
//! `overwrite_generated` is off. "Unchanged" is answered from the
//! [`GenerationManifest`] first and the existing file's header second.
//! Versions of one symbol share file names, so the manifest is keyed by
//! base path: it always describes what was last written there.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CodeEmitter, Filesystem, SymbolStore},
    },
    domain::{Level, Symbol, SymbolId},
    error::{SymwireError, SymwireResult},
};

const HASH_MARKER: &str = "content-hash: sha256:";

// ── Options and results ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub output_dir: PathBuf,
    /// Rewrite the base artifact even when its content hash is unchanged.
    pub overwrite_generated: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

impl GenerateOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite_generated: false,
            dry_run: false,
        }
    }

    pub fn overwrite_generated(mut self, overwrite: bool) -> Self {
        self.overwrite_generated = overwrite;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new("generated")
    }
}

/// What happened to one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactAction {
    Created,
    Overwritten,
    /// Base artifact left alone because its hash matched.
    Unchanged,
    /// User artifact already existed.
    Preserved,
    /// Dry run; nothing written.
    Planned,
}

impl ArtifactAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Overwritten => "overwritten",
            Self::Unchanged => "unchanged",
            Self::Preserved => "preserved",
            Self::Planned => "planned",
        }
    }

    pub const fn wrote(&self) -> bool {
        matches!(self, Self::Created | Self::Overwritten)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub symbol_id: SymbolId,
    pub language: String,
    pub base_path: PathBuf,
    pub user_path: PathBuf,
    /// Lowercase hex SHA-256 of the base body (header excluded).
    pub content_hash: String,
    pub base: ArtifactAction,
    pub user: ArtifactAction,
    pub generated_at: DateTime<Utc>,
    pub base_content: String,
    pub user_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Generated(Box<GenerationResult>),
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub symbol_id: String,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub items: Vec<BatchItem>,
}

impl BatchResult {
    pub(crate) fn push(&mut self, symbol_id: String, outcome: BatchOutcome) {
        self.total += 1;
        match &outcome {
            BatchOutcome::Generated(_) => self.succeeded += 1,
            BatchOutcome::Skipped { .. } => self.skipped += 1,
            BatchOutcome::Failed { .. } => self.failed += 1,
        }
        self.items.push(BatchItem { symbol_id, outcome });
    }
}

// ── GenerationManifest ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub symbol_id: SymbolId,
    pub content_hash: String,
    pub base_path: PathBuf,
    pub generated_at: DateTime<Utc>,
}

/// Last base artifact written per path, owned by one generator.
#[derive(Debug, Clone, Default)]
pub struct GenerationManifest {
    entries: HashMap<PathBuf, ManifestEntry>,
}

impl GenerationManifest {
    /// What was last written at `base_path`.
    pub fn at(&self, base_path: &Path) -> Option<&ManifestEntry> {
        self.entries.get(base_path)
    }

    /// Most recent entry written for `id`.
    pub fn get(&self, id: &SymbolId) -> Option<&ManifestEntry> {
        self.entries
            .values()
            .filter(|e| &e.symbol_id == id)
            .max_by_key(|e| e.generated_at)
    }

    pub fn record(&mut self, entry: ManifestEntry) {
        self.entries.insert(entry.base_path.clone(), entry);
    }

    /// Forget one symbol. Returns whether it was known.
    pub fn invalidate(&mut self, id: &SymbolId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|_, e| &e.symbol_id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Hashing and headers ──────────────────────────────────────────────────────

/// Lowercase hex SHA-256 of `body`.
pub fn content_hash(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Extract the recorded hash from a generated file's header.
pub fn parse_content_hash(content: &str) -> Option<&str> {
    content
        .lines()
        .take(8)
        .find_map(|line| line.split_once(HASH_MARKER).map(|(_, hash)| hash.trim()))
        .filter(|hash| !hash.is_empty())
}

fn render_header(prefix: &str, id: &SymbolId, hash: &str, at: &DateTime<Utc>) -> String {
    format!(
        "{prefix} @generated by symwire. Do not edit: this file is overwritten.\n\
         {prefix} symbol: {id}\n\
         {prefix} {HASH_MARKER}{hash}\n\
         {prefix} generated-at: {}\n\n",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Whether code generation applies to `level` (L1–L3).
pub fn is_generatable(level: Level) -> bool {
    matches!(level, Level::Component | Level::Module | Level::Subsystem)
}

// ── CodeGenerator ────────────────────────────────────────────────────────────

pub struct CodeGenerator {
    symbols: Arc<dyn SymbolStore>,
    filesystem: Box<dyn Filesystem>,
    emitters: Vec<Box<dyn CodeEmitter>>,
    default_language: String,
    manifest: RwLock<GenerationManifest>,
}

impl CodeGenerator {
    pub fn new(symbols: Arc<dyn SymbolStore>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            symbols,
            filesystem,
            emitters: Vec::new(),
            default_language: "typescript".into(),
            manifest: RwLock::new(GenerationManifest::default()),
        }
    }

    pub fn with_emitter(mut self, emitter: Box<dyn CodeEmitter>) -> Self {
        self.emitters.push(emitter);
        self
    }

    /// Emitter used for symbols whose language has no dedicated emitter.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Generatable symbols, ordered by id.
    pub fn list_generatable_symbols(&self) -> SymwireResult<Vec<Symbol>> {
        let mut symbols: Vec<Symbol> = self
            .symbols
            .list()?
            .into_iter()
            .filter(|s| is_generatable(s.level))
            .collect();
        symbols.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(symbols)
    }

    pub fn can_generate(&self, id: &SymbolId) -> SymwireResult<bool> {
        Ok(self
            .symbols
            .get(id)?
            .is_some_and(|s| is_generatable(s.level)))
    }

    #[instrument(skip_all, fields(id = %id, dry_run = options.dry_run))]
    pub fn generate_symbol(&self, id: &SymbolId, options: &GenerateOptions) -> SymwireResult<GenerationResult> {
        let symbol = self.load(id)?;
        self.generate_loaded(&symbol, options)
    }

    /// Dry-run generation into `output_dir`.
    pub fn preview_symbol(&self, id: &SymbolId, output_dir: &Path) -> SymwireResult<GenerationResult> {
        self.generate_symbol(id, &GenerateOptions::new(output_dir).dry_run())
    }

    /// Generate each id independently; failures do not stop the batch.
    #[instrument(skip_all, fields(count = ids.len()))]
    pub fn generate_multiple(&self, ids: &[SymbolId], options: &GenerateOptions) -> BatchResult {
        let mut batch = BatchResult::default();
        for id in ids {
            let outcome = match self.symbols.get(id) {
                Err(e) => BatchOutcome::Failed {
                    error: e.to_string(),
                },
                Ok(None) => BatchOutcome::Failed {
                    error: not_found(id).to_string(),
                },
                Ok(Some(symbol)) if !is_generatable(symbol.level) => BatchOutcome::Skipped {
                    reason: format!("level {} is not generatable", symbol.level),
                },
                Ok(Some(symbol)) => match self.generate_loaded(&symbol, options) {
                    Ok(result) => BatchOutcome::Generated(Box::new(result)),
                    Err(e) => BatchOutcome::Failed {
                        error: e.to_string(),
                    },
                },
            };
            if let BatchOutcome::Failed { error } = &outcome {
                warn!(id = %id, error = %error, "Generation failed");
            }
            batch.push(id.to_string(), outcome);
        }
        info!(
            succeeded = batch.succeeded,
            failed = batch.failed,
            skipped = batch.skipped,
            "Batch generation finished"
        );
        batch
    }

    /// Generate every generatable symbol.
    pub fn generate_all(&self, options: &GenerateOptions) -> SymwireResult<BatchResult> {
        let ids: Vec<SymbolId> = self
            .list_generatable_symbols()?
            .iter()
            .map(|s| s.id().clone())
            .collect();
        Ok(self.generate_multiple(&ids, options))
    }

    // ── Manifest ─────────────────────────────────────────────────────────────

    pub fn invalidate(&self, id: &SymbolId) -> SymwireResult<bool> {
        Ok(self
            .manifest
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .invalidate(id))
    }

    pub fn clear(&self) -> SymwireResult<()> {
        self.manifest
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .clear();
        Ok(())
    }

    pub fn manifest_hash(&self, id: &SymbolId) -> SymwireResult<Option<String>> {
        Ok(self
            .manifest
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?
            .get(id)
            .map(|e| e.content_hash.clone()))
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn load(&self, id: &SymbolId) -> SymwireResult<Symbol> {
        let symbol = self.symbols.get(id)?.ok_or_else(|| not_found(id))?;
        if !is_generatable(symbol.level) {
            return Err(ApplicationError::NotGeneratable {
                id: id.to_string(),
                level: symbol.level,
            }
            .into());
        }
        Ok(symbol)
    }

    fn emitter_for(&self, language: &str) -> SymwireResult<&dyn CodeEmitter> {
        let find = |lang: &str| {
            self.emitters
                .iter()
                .find(|e| e.language().eq_ignore_ascii_case(lang))
                .map(|e| e.as_ref())
        };
        find(language)
            .or_else(|| {
                debug!(language, fallback = %self.default_language, "No dedicated emitter");
                find(&self.default_language)
            })
            .ok_or_else(|| {
                ApplicationError::AdapterNotConfigured {
                    name: format!("code emitter for '{language}'"),
                }
                .into()
            })
    }

    fn generate_loaded(&self, symbol: &Symbol, options: &GenerateOptions) -> SymwireResult<GenerationResult> {
        let emitter = self.emitter_for(&symbol.language)?;
        let code = emitter.emit(symbol)?;

        let hash = content_hash(&code.base_body);
        let generated_at = Utc::now();
        let base_content = format!(
            "{}{}",
            render_header(emitter.comment_prefix(), symbol.id(), &hash, &generated_at),
            code.base_body
        );

        let dir = options.output_dir.join(symbol.namespace());
        let base_path = dir.join(&code.base_file);
        let user_path = dir.join(&code.user_file);

        let mut result = GenerationResult {
            symbol_id: symbol.id().clone(),
            language: emitter.language().to_string(),
            base_path,
            user_path,
            content_hash: hash,
            base: ArtifactAction::Planned,
            user: ArtifactAction::Planned,
            generated_at,
            base_content,
            user_content: code.user_body,
        };

        if options.dry_run {
            return Ok(result);
        }

        self.filesystem.create_dir_all(&dir).map_err(|e| generation_failed(symbol.id(), e))?;

        result.base = if !self.filesystem.exists(&result.base_path) {
            ArtifactAction::Created
        } else if !options.overwrite_generated && self.is_unchanged(&result)? {
            ArtifactAction::Unchanged
        } else {
            ArtifactAction::Overwritten
        };
        if result.base.wrote() {
            self.filesystem
                .write_file(&result.base_path, &result.base_content)
                .map_err(|e| generation_failed(symbol.id(), e))?;
        }

        result.user = if self.filesystem.exists(&result.user_path) {
            ArtifactAction::Preserved
        } else {
            self.filesystem
                .write_file(&result.user_path, &result.user_content)
                .map_err(|e| generation_failed(symbol.id(), e))?;
            ArtifactAction::Created
        };

        self.manifest
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .record(ManifestEntry {
                symbol_id: symbol.id().clone(),
                content_hash: result.content_hash.clone(),
                base_path: result.base_path.clone(),
                generated_at,
            });

        info!(
            base = result.base.as_str(),
            user = result.user.as_str(),
            hash = %result.content_hash,
            "Generated symbol"
        );
        Ok(result)
    }

    fn is_unchanged(&self, result: &GenerationResult) -> SymwireResult<bool> {
        let known = self
            .manifest
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?
            .at(&result.base_path)
            .map(|e| e.content_hash.clone());
        if let Some(known) = known {
            return Ok(known == result.content_hash);
        }
        // Manifest miss: fall back to the header of the file on disk.
        match self.filesystem.read_file(&result.base_path) {
            Ok(existing) => Ok(parse_content_hash(&existing) == Some(result.content_hash.as_str())),
            Err(e) => {
                debug!(error = %e, "Could not read existing base artifact");
                Ok(false)
            }
        }
    }
}

fn not_found(id: &SymbolId) -> SymwireError {
    ApplicationError::SymbolNotFound { id: id.to_string() }.into()
}

fn generation_failed(id: &SymbolId, cause: SymwireError) -> SymwireError {
    ApplicationError::GenerationFailed {
        id: id.to_string(),
        reason: cause.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{EmittedCode, MockFilesystem, MockSymbolStore};
    use crate::domain::{Port, SemVer, SymbolKind, TypeReference};
    use std::sync::Mutex;

    #[derive(Default, Clone)]
    struct MapFs(Arc<Mutex<HashMap<PathBuf, String>>>);

    impl Filesystem for MapFs {
        fn create_dir_all(&self, _path: &Path) -> SymwireResult<()> {
            Ok(())
        }
        fn write_file(&self, path: &Path, content: &str) -> SymwireResult<()> {
            self.0.lock().unwrap().insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
        fn read_file(&self, path: &Path) -> SymwireResult<String> {
            self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "missing".into(),
                }
                .into()
            })
        }
        fn exists(&self, path: &Path) -> bool {
            self.0.lock().unwrap().contains_key(path)
        }
    }

    struct PlainEmitter;

    impl CodeEmitter for PlainEmitter {
        fn language(&self) -> &'static str {
            "typescript"
        }
        fn emit(&self, symbol: &Symbol) -> SymwireResult<EmittedCode> {
            Ok(EmittedCode {
                base_file: format!("{}.base.ts", symbol.name()),
                base_body: format!(
                    "abstract class {}Base {{}} // {} inputs\n",
                    symbol.name(),
                    symbol.inputs().count()
                ),
                user_file: format!("{}.ts", symbol.name()),
                user_body: format!("class {} extends {}Base {{}}\n", symbol.name(), symbol.name()),
            })
        }
    }

    fn symbols() -> Vec<Symbol> {
        let v = SemVer::new(1, 0, 0);
        vec![
            Symbol::builder("app", "Svc", v)
                .port(Port::input("in", TypeReference::new("string")))
                .build()
                .unwrap(),
            Symbol::builder("app", "Money", v)
                .kind(SymbolKind::Record)
                .build()
                .unwrap(),
        ]
    }

    fn store() -> Arc<MockSymbolStore> {
        store_of(symbols())
    }

    fn store_of(all: Vec<Symbol>) -> Arc<MockSymbolStore> {
        let mut store = MockSymbolStore::new();
        let listed = all.clone();
        store.expect_list().returning(move || Ok(listed.clone()));
        store
            .expect_get()
            .returning(move |id| Ok(all.iter().find(|s| s.id() == id).cloned()));
        Arc::new(store)
    }

    fn generator(fs: MapFs) -> CodeGenerator {
        CodeGenerator::new(store(), Box::new(fs)).with_emitter(Box::new(PlainEmitter))
    }

    fn svc() -> SymbolId {
        SymbolId::parse("app/Svc@1.0.0").unwrap()
    }

    // ========================================================================
    // Generation-Gap behaviour
    // ========================================================================

    #[test]
    fn first_run_creates_both_artifacts() {
        let fs = MapFs::default();
        let result = generator(fs.clone())
            .generate_symbol(&svc(), &GenerateOptions::new("/out"))
            .unwrap();
        assert_eq!(result.base, ArtifactAction::Created);
        assert_eq!(result.user, ArtifactAction::Created);
        assert_eq!(result.base_path, PathBuf::from("/out/app/Svc.base.ts"));

        let base = fs.read_file(&result.base_path).unwrap();
        assert_eq!(parse_content_hash(&base), Some(result.content_hash.as_str()));
        assert!(base.contains("symbol: app/Svc@1.0.0"));
    }

    #[test]
    fn rerun_keeps_hash_and_user_file() {
        let fs = MapFs::default();
        let generator = generator(fs.clone());
        let first = generator
            .generate_symbol(&svc(), &GenerateOptions::new("/out"))
            .unwrap();

        fs.write_file(&first.user_path, "// my edits\n").unwrap();

        for overwrite in [false, true] {
            let again = generator
                .generate_symbol(
                    &svc(),
                    &GenerateOptions::new("/out").overwrite_generated(overwrite),
                )
                .unwrap();
            assert_eq!(again.content_hash, first.content_hash);
            assert_eq!(again.user, ArtifactAction::Preserved);
            assert_eq!(fs.read_file(&first.user_path).unwrap(), "// my edits\n");
            let expected = if overwrite {
                ArtifactAction::Overwritten
            } else {
                ArtifactAction::Unchanged
            };
            assert_eq!(again.base, expected);
        }
    }

    #[test]
    fn header_is_used_when_manifest_is_cleared() {
        let fs = MapFs::default();
        let generator = generator(fs.clone());
        generator
            .generate_symbol(&svc(), &GenerateOptions::new("/out"))
            .unwrap();
        generator.clear().unwrap();
        assert!(generator.manifest_hash(&svc()).unwrap().is_none());

        let again = generator
            .generate_symbol(&svc(), &GenerateOptions::new("/out"))
            .unwrap();
        assert_eq!(again.base, ArtifactAction::Unchanged);
    }

    #[test]
    fn versions_sharing_a_path_overwrite_each_other() {
        let mut all = symbols();
        all.push(
            Symbol::builder("app", "Svc", SemVer::new(2, 0, 0))
                .port(Port::input("in", TypeReference::new("string")))
                .port(Port::input("limit", TypeReference::new("int32")))
                .build()
                .unwrap(),
        );
        let fs = MapFs::default();
        let generator =
            CodeGenerator::new(store_of(all), Box::new(fs.clone())).with_emitter(Box::new(PlainEmitter));
        let v2 = SymbolId::parse("app/Svc@2.0.0").unwrap();
        let options = GenerateOptions::new("/out");

        let first = generator.generate_symbol(&svc(), &options).unwrap();
        let second = generator.generate_symbol(&v2, &options).unwrap();
        assert_eq!(first.base_path, second.base_path);
        assert_eq!(second.base, ArtifactAction::Overwritten);

        let back = generator.generate_symbol(&svc(), &options).unwrap();
        assert_eq!(back.base, ArtifactAction::Overwritten);
        let on_disk = fs.read_file(&back.base_path).unwrap();
        assert_eq!(parse_content_hash(&on_disk), Some(first.content_hash.as_str()));

        assert_eq!(
            generator.manifest_hash(&svc()).unwrap(),
            Some(first.content_hash.clone())
        );
        assert!(generator.invalidate(&svc()).unwrap());
        assert!(generator.manifest_hash(&svc()).unwrap().is_none());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let fs = MapFs::default();
        let result = generator(fs.clone())
            .preview_symbol(&svc(), Path::new("/out"))
            .unwrap();
        assert_eq!(result.base, ArtifactAction::Planned);
        assert!(!result.content_hash.is_empty());
        assert!(fs.0.lock().unwrap().is_empty());
    }

    #[test]
    fn primitives_are_not_generatable() {
        let generator = generator(MapFs::default());
        let money = SymbolId::parse("app/Money@1.0.0").unwrap();
        assert!(!generator.can_generate(&money).unwrap());
        assert!(generator.can_generate(&svc()).unwrap());
        let err = generator
            .generate_symbol(&money, &GenerateOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), "GENERATION_ERROR");
        assert_eq!(generator.list_generatable_symbols().unwrap().len(), 1);
    }

    // ========================================================================
    // Batches
    // ========================================================================

    #[test]
    fn batch_aggregates_outcomes() {
        let generator = generator(MapFs::default());
        let ids = vec![
            svc(),
            SymbolId::parse("app/Money@1.0.0").unwrap(),
            SymbolId::parse("app/Ghost@1.0.0").unwrap(),
        ];
        let batch = generator.generate_multiple(&ids, &GenerateOptions::new("/out"));
        assert_eq!(batch.total, 3);
        assert_eq!(batch.succeeded, 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.failed, 1);
    }

    #[test]
    fn write_failure_fails_one_item() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_exists().returning(|_| false);
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "read-only".into(),
            }
            .into())
        });
        let generator = CodeGenerator::new(store(), Box::new(fs)).with_emitter(Box::new(PlainEmitter));

        let batch = generator.generate_all(&GenerateOptions::new("/out")).unwrap();
        assert_eq!(batch.failed, 1);
        match &batch.items[0].outcome {
            BatchOutcome::Failed { error } => assert!(error.contains("read-only")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let generator = generator(MapFs::default());
        let emitter = generator.emitter_for("cobol").unwrap();
        assert_eq!(emitter.language(), "typescript");

        let strict = CodeGenerator::new(store(), Box::new(MapFs::default()));
        assert_eq!(
            strict.emitter_for("typescript").err().map(|e| e.code()),
            Some("CONFIGURATION_ERROR")
        );
    }
}
