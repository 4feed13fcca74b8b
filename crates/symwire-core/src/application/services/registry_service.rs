//! Symbol Registry - owner of canonical symbol records.
//!
//! The registry is the only writer of symbols. Every other service holds
//! ids and re-reads through the store. Query filters are answered from a
//! [`SymbolIndex`] that the registry builds lazily and drops on every
//! mutation.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::SymbolStore},
    domain::{
        BumpType, DomainValidator, Level, Origin, SemVer, Status, StatusInfo, Symbol,
        SymbolChanges, SymbolId, SymbolKind, ValidationContext, ValidationReport, bump_version,
        find_containment_cycles, parse_constraint,
    },
    error::{SymwireError, SymwireResult},
};

// ── Query types ──────────────────────────────────────────────────────────────

/// AND-combined filters; `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolQuery {
    pub namespace: Option<String>,
    pub level: Option<Level>,
    pub kind: Option<SymbolKind>,
    pub status: Option<Status>,
    pub origin: Option<Origin>,
    pub tag: Option<String>,
    /// Case-insensitive substring over name, namespace, id, description, tags.
    pub text: Option<String>,
}

impl SymbolQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// npm-style constraint; `None` admits every version.
    pub constraint: Option<String>,
    /// Pick the highest satisfying version, or the lowest when `false`.
    pub prefer_latest: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            constraint: None,
            prefer_latest: true,
        }
    }
}

/// Per-item outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub id: String,
    pub message: String,
}

// ── SymbolIndex ──────────────────────────────────────────────────────────────

/// Secondary indexes over the store, one per query filter.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    all: BTreeSet<SymbolId>,
    by_namespace: HashMap<String, BTreeSet<SymbolId>>,
    by_level: HashMap<Level, BTreeSet<SymbolId>>,
    by_kind: HashMap<SymbolKind, BTreeSet<SymbolId>>,
    by_status: HashMap<Status, BTreeSet<SymbolId>>,
    by_origin: HashMap<Origin, BTreeSet<SymbolId>>,
    by_tag: HashMap<String, BTreeSet<SymbolId>>,
    versions: HashMap<(String, String), Vec<SemVer>>,
}

impl SymbolIndex {
    pub fn build(symbols: &[Symbol]) -> Self {
        let mut index = Self::default();
        for symbol in symbols {
            let id = symbol.id().clone();
            index.all.insert(id.clone());
            index
                .by_namespace
                .entry(symbol.namespace().to_string())
                .or_default()
                .insert(id.clone());
            index.by_level.entry(symbol.level).or_default().insert(id.clone());
            index.by_kind.entry(symbol.kind).or_default().insert(id.clone());
            index.by_status.entry(symbol.status).or_default().insert(id.clone());
            index.by_origin.entry(symbol.origin).or_default().insert(id.clone());
            for tag in &symbol.tags {
                index
                    .by_tag
                    .entry(tag.to_lowercase())
                    .or_default()
                    .insert(id.clone());
            }
            index
                .versions
                .entry((symbol.namespace().to_string(), symbol.name().to_string()))
                .or_default()
                .push(symbol.version());
        }
        for versions in index.versions.values_mut() {
            versions.sort_by(|a, b| b.cmp(a));
        }
        index
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Ids passing every indexed filter of `query`. The text filter is not
    /// indexed and is left to the caller.
    pub fn candidates(&self, query: &SymbolQuery) -> BTreeSet<SymbolId> {
        fn narrow<K: std::hash::Hash + Eq>(
            current: BTreeSet<SymbolId>,
            map: &HashMap<K, BTreeSet<SymbolId>>,
            key: Option<&K>,
        ) -> BTreeSet<SymbolId> {
            match key {
                None => current,
                Some(k) => match map.get(k) {
                    Some(ids) => current.intersection(ids).cloned().collect(),
                    None => BTreeSet::new(),
                },
            }
        }

        let tag = query.tag.as_ref().map(|t| t.to_lowercase());
        let mut ids = self.all.clone();
        ids = narrow(ids, &self.by_namespace, query.namespace.as_ref());
        ids = narrow(ids, &self.by_level, query.level.as_ref());
        ids = narrow(ids, &self.by_kind, query.kind.as_ref());
        ids = narrow(ids, &self.by_status, query.status.as_ref());
        ids = narrow(ids, &self.by_origin, query.origin.as_ref());
        narrow(ids, &self.by_tag, tag.as_ref())
    }

    /// Registered versions of `namespace/name`, highest first.
    pub fn versions(&self, namespace: &str, name: &str) -> &[SemVer] {
        self.versions
            .get(&(namespace.to_string(), name.to_string()))
            .map_or(&[], Vec::as_slice)
    }
}

// ── SymbolRegistry ───────────────────────────────────────────────────────────

pub struct SymbolRegistry {
    store: Arc<dyn SymbolStore>,
    index: RwLock<Option<SymbolIndex>>,
}

impl SymbolRegistry {
    pub fn new(store: Arc<dyn SymbolStore>) -> Self {
        Self {
            store,
            index: RwLock::new(None),
        }
    }

    /// Register a new symbol. Fails with a conflict if the id is taken.
    #[instrument(skip_all, fields(id = %symbol.id()))]
    pub fn register(&self, symbol: Symbol) -> SymwireResult<Symbol> {
        if self.store.get(symbol.id())?.is_some() {
            warn!("Symbol already registered");
            return Err(ApplicationError::AlreadyExists {
                id: symbol.id().to_string(),
            }
            .into());
        }

        self.store.insert(symbol.clone())?;
        self.invalidate()?;
        info!("Symbol registered");
        Ok(symbol)
    }

    /// Register `id` bumped by `bump` as a new record; the old version stays.
    #[instrument(skip_all, fields(id = %id))]
    pub fn register_new_version(
        &self,
        id: &SymbolId,
        bump: BumpType,
        changes: SymbolChanges,
    ) -> SymwireResult<Symbol> {
        let current = self.get(id)?;
        let mut next = current.with_version(bump_version(current.version(), bump)?);
        changes.apply(&mut next)?;

        let now = Utc::now();
        next.status = Status::Declared;
        next.status_info = StatusInfo::fresh("registry:new-version");
        next.created_at = now;
        next.updated_at = now;

        info!(new_id = %next.id(), "Registering new version");
        self.register(next)
    }

    pub fn find(&self, id: &SymbolId) -> SymwireResult<Option<Symbol>> {
        self.store.get(id)
    }

    pub fn get(&self, id: &SymbolId) -> SymwireResult<Symbol> {
        self.store
            .get(id)?
            .ok_or_else(|| not_found(id))
    }

    pub fn exists(&self, id: &SymbolId) -> SymwireResult<bool> {
        Ok(self.store.get(id)?.is_some())
    }

    /// Every symbol, ordered by id.
    pub fn list(&self) -> SymwireResult<Vec<Symbol>> {
        let mut symbols = self.store.list()?;
        symbols.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(symbols)
    }

    /// Apply `changes` to mutable fields; identity never changes.
    #[instrument(skip_all, fields(id = %id))]
    pub fn update(&self, id: &SymbolId, changes: SymbolChanges) -> SymwireResult<Symbol> {
        let mut symbol = self.get(id)?;
        changes.apply(&mut symbol)?;
        symbol.updated_at = Utc::now();

        self.store.insert(symbol.clone())?;
        self.invalidate()?;
        info!("Symbol updated");
        Ok(symbol)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub fn remove(&self, id: &SymbolId) -> SymwireResult<Symbol> {
        let symbol = self.get(id)?;
        self.store.remove(id)?;
        self.invalidate()?;
        info!("Symbol removed");
        Ok(symbol)
    }

    #[instrument(skip_all, fields(id = %id, status = %status))]
    pub fn set_status(
        &self,
        id: &SymbolId,
        status: Status,
        source: impl Into<String>,
    ) -> SymwireResult<Symbol> {
        let mut symbol = self.get(id)?;
        let now = Utc::now();
        symbol.status = status;
        symbol.status_info = StatusInfo {
            source: source.into(),
            changed_at: now,
            note: None,
        };
        symbol.updated_at = now;

        self.store.insert(symbol.clone())?;
        self.invalidate()?;
        Ok(symbol)
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    #[instrument(skip_all)]
    pub fn query(&self, query: &SymbolQuery) -> SymwireResult<Vec<Symbol>> {
        let ids = self.with_index(|index| index.candidates(query))?;

        let mut symbols = Vec::with_capacity(ids.len());
        for id in &ids {
            // A concurrent removal leaves a stale id behind; skip it.
            let Some(symbol) = self.store.get(id)? else {
                continue;
            };
            if query
                .text
                .as_deref()
                .is_none_or(|text| symbol.matches_text(text))
            {
                symbols.push(symbol);
            }
        }
        Ok(symbols)
    }

    pub fn search(&self, text: &str) -> SymwireResult<Vec<Symbol>> {
        self.query(&SymbolQuery {
            text: Some(text.to_string()),
            ..Default::default()
        })
    }

    /// Registered versions of `namespace/name`, highest first.
    pub fn get_versions(&self, namespace: &str, name: &str) -> SymwireResult<Vec<SemVer>> {
        self.with_index(|index| index.versions(namespace, name).to_vec())
    }

    /// Pick one version of `namespace/name` according to `options`.
    #[instrument(skip(self, options))]
    pub fn resolve(
        &self,
        namespace: &str,
        name: &str,
        options: &ResolveOptions,
    ) -> SymwireResult<Symbol> {
        let versions = self.get_versions(namespace, name)?;
        let constraint = options.constraint.as_deref().unwrap_or("*");
        let range = parse_constraint(constraint)?;

        let mut matching = versions.into_iter().filter(|v| range.contains(v));
        // `versions` is sorted highest first.
        let picked = if options.prefer_latest {
            matching.next()
        } else {
            matching.last()
        };

        let version = picked.ok_or_else(|| {
            SymwireError::from(ApplicationError::VersionNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
                constraint: constraint.to_string(),
            })
        })?;
        self.get(&SymbolId::new(namespace, name, &version))
    }

    // ── Relationships ────────────────────────────────────────────────────────

    /// Registered children declared in `id`'s `contains` list.
    pub fn contains(&self, id: &SymbolId) -> SymwireResult<Vec<Symbol>> {
        let symbol = self.get(id)?;
        self.resolve_all(&symbol.contains)
    }

    /// Symbols whose `contains` list names `id`.
    pub fn contained_by(&self, id: &SymbolId) -> SymwireResult<Vec<Symbol>> {
        self.get(id)?;
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| s.contains.contains(id))
            .collect())
    }

    /// Registered targets of `id`'s declared dependencies.
    pub fn dependencies(&self, id: &SymbolId) -> SymwireResult<Vec<Symbol>> {
        let symbol = self.get(id)?;
        let targets: Vec<SymbolId> = symbol.dependencies.iter().map(|d| d.target.clone()).collect();
        self.resolve_all(&targets)
    }

    /// Symbols that declare a dependency on `id`.
    pub fn dependents(&self, id: &SymbolId) -> SymwireResult<Vec<Symbol>> {
        self.get(id)?;
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| s.dependencies.iter().any(|d| &d.target == id))
            .collect())
    }

    fn resolve_all(&self, ids: &[SymbolId]) -> SymwireResult<Vec<Symbol>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(symbol) = self.store.get(id)? {
                found.push(symbol);
            }
        }
        Ok(found)
    }

    // ── Validation ───────────────────────────────────────────────────────────

    /// Containment cycles across the whole registry.
    pub fn check_circular(&self) -> SymwireResult<Vec<Vec<SymbolId>>> {
        Ok(find_containment_cycles(&self.list()?))
    }

    #[instrument(skip_all)]
    pub fn validate(&self) -> SymwireResult<ValidationReport> {
        let report = DomainValidator::validate_all(&self.list()?);
        info!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Registry validated"
        );
        Ok(report)
    }

    pub fn validate_symbol(&self, id: &SymbolId) -> SymwireResult<ValidationReport> {
        let symbol = self.get(id)?;
        let symbols = self.list()?;
        let context = ValidationContext::new(&symbols);
        Ok(DomainValidator::validate_symbol(&symbol, &context))
    }

    // ── Bulk ─────────────────────────────────────────────────────────────────

    /// Register each symbol independently; existing ids are skipped.
    #[instrument(skip_all, fields(count = symbols.len()))]
    pub fn import(&self, symbols: Vec<Symbol>) -> SymwireResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for symbol in symbols {
            let id = symbol.id().to_string();
            match self.register(symbol) {
                Ok(_) => summary.imported += 1,
                Err(SymwireError::Application(ApplicationError::AlreadyExists { .. })) => {
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Import failed");
                    summary.failed += 1;
                    summary.errors.push(ImportFailure {
                        id,
                        message: e.to_string(),
                    });
                }
            }
        }
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.failed,
            "Import finished"
        );
        Ok(summary)
    }

    pub fn export(&self) -> SymwireResult<Vec<Symbol>> {
        self.list()
    }

    // ── Index cache ──────────────────────────────────────────────────────────

    /// Drop the query index; the next query rebuilds it.
    pub fn invalidate(&self) -> SymwireResult<()> {
        let mut guard = self
            .index
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        *guard = None;
        Ok(())
    }

    fn with_index<R>(&self, f: impl FnOnce(&SymbolIndex) -> R) -> SymwireResult<R> {
        {
            let guard = self
                .index
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(index) = guard.as_ref() {
                return Ok(f(index));
            }
        }

        let mut guard = self
            .index
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let index = match guard.take() {
            Some(index) => index,
            None => {
                let index = SymbolIndex::build(&self.store.list()?);
                debug!(symbols = index.len(), "Rebuilt symbol index");
                index
            }
        };
        let result = f(&index);
        *guard = Some(index);
        Ok(result)
    }
}

fn not_found(id: &SymbolId) -> SymwireError {
    ApplicationError::SymbolNotFound { id: id.to_string() }.into()
}
