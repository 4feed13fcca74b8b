//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use symwire_core::domain::{BumpType, Level, Origin, Status, SymbolKind};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "symwire",
    bin_name = "symwire",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Component-architecture registry with validated wiring",
    long_about = "symwire keeps a registry of versioned symbols with typed ports, \
                  wires them together without cycles and generates \
                  Generation-Gap code from them.\n\n\
                  Every command prints a JSON envelope: \
                  {\"success\": true, \"data\": ...} or \
                  {\"success\": false, \"error\": {\"code\", \"message\"}}.",
    after_help = "EXAMPLES:\n\
        \x20 symwire symbol import ./architecture\n\
        \x20 symwire wire connect shop/Catalog@1.0.0 selected shop/Cart@1.0.0 items\n\
        \x20 symwire graph order\n\
        \x20 symwire generate all --output-dir src/generated",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register, query and manage symbols.
    #[command(
        visible_alias = "sym",
        subcommand,
        about = "Manage registered symbols",
        after_help = "EXAMPLES:\n\
            \x20 symwire symbol register shop Cart 1.0.0 --port items:in:string\n\
            \x20 symwire symbol resolve shop Cart --constraint ^1.0.0\n\
            \x20 symwire symbol new-version shop/Cart@1.0.0 minor"
    )]
    Symbol(SymbolCommands),

    /// Connect ports between symbols.
    #[command(
        subcommand,
        about = "Manage port connections",
        after_help = "EXAMPLES:\n\
            \x20 symwire wire connect shop/Catalog@1.0.0 selected shop/Cart@1.0.0 items\n\
            \x20 symwire wire validate shop/Cart@1.0.0 total shop/Catalog@1.0.0 refresh\n\
            \x20 symwire wire unconnected"
    )]
    Wire(WireCommands),

    /// Inspect the dependency graph built from connections.
    #[command(subcommand, about = "Inspect the dependency graph")]
    Graph(GraphCommands),

    /// Run registry validation rules.
    #[command(
        about = "Validate symbols",
        after_help = "EXAMPLES:\n\
            \x20 symwire validate\n\
            \x20 symwire validate shop/Cart@1.0.0\n\
            \x20 symwire validate --circular"
    )]
    Validate(ValidateArgs),

    /// Generate code for L1–L3 symbols.
    #[command(
        visible_alias = "gen",
        subcommand,
        about = "Generate base and user artifacts",
        after_help = "EXAMPLES:\n\
            \x20 symwire generate symbol shop/Cart@1.0.0\n\
            \x20 symwire generate all --dry-run\n\
            \x20 symwire generate preview shop/Cart@1.0.0"
    )]
    Generate(GenerateCommands),

    /// Initialise a symwire configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 symwire init           # platform config directory\n\
            \x20 symwire init --local   # .symwire.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 symwire completions bash > ~/.local/share/bash-completion/completions/symwire\n\
            \x20 symwire completions zsh  > ~/.zfunc/_symwire\n\
            \x20 symwire completions fish > ~/.config/fish/completions/symwire.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the symwire configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 symwire config get store.path\n\
            \x20 symwire config set generator.default_language rust\n\
            \x20 symwire config list"
    )]
    Config(ConfigCommands),
}

// ── symbol ────────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum SymbolCommands {
    /// Register a symbol from flags or from a JSON file.
    Register(RegisterArgs),

    /// Fetch one symbol by id.
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List every registered symbol.
    #[command(visible_alias = "ls")]
    List,

    /// Filter symbols by indexed fields.
    Query(QueryArgs),

    /// Case-insensitive text search over names, ids, descriptions and tags.
    Search { text: String },

    /// Apply a partial update.
    Update(UpdateArgs),

    /// Remove a symbol and every connection touching it.
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List the versions registered for a name, newest first.
    Versions { namespace: String, name: String },

    /// Pick one version of a name that satisfies a constraint.
    Resolve {
        namespace: String,
        name: String,
        /// npm-style constraint such as `^1.2.0`, `~1.2`, `>=1.0.0 <2.0.0`.
        #[arg(long, value_name = "RANGE")]
        constraint: Option<String>,
        /// Pick the lowest satisfying version instead of the highest.
        #[arg(long)]
        oldest: bool,
    },

    /// Register a bumped copy of an existing symbol.
    NewVersion {
        #[arg(value_name = "ID")]
        id: String,
        /// `major`, `minor` or `patch`.
        bump: BumpType,
        /// JSON file with changes to apply to the copy.
        #[arg(long, value_name = "FILE")]
        changes: Option<PathBuf>,
    },

    /// Set a symbol's lifecycle status.
    Status {
        #[arg(value_name = "ID")]
        id: String,
        /// `declared`, `referenced`, `tested` or `executed`.
        status: Status,
        /// Who reported the status.
        #[arg(long, default_value = "cli")]
        source: String,
    },

    /// Walk a relationship from a symbol.
    Related {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_enum)]
        relation: Relation,
    },

    /// Import symbols and connections from manifest files.
    Import {
        /// A `.toml`/`.json` manifest or a directory of them.
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Export the registry as a manifest that `import` accepts.
    Export {
        /// Write to a file instead of printing. `.toml` selects TOML.
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the built-in primitive types.
    Types {
        /// Also register them as L0 symbols under `builtin/`.
        #[arg(long)]
        register: bool,
    },
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(required_unless_present = "file")]
    pub namespace: Option<String>,
    #[arg(required_unless_present = "file")]
    pub name: Option<String>,
    #[arg(required_unless_present = "file")]
    pub version: Option<String>,

    /// Read the full symbol from a JSON file instead.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["namespace", "name", "version"])]
    pub file: Option<PathBuf>,

    /// `L0`..`L4` or a level name.
    #[arg(long)]
    pub level: Option<Level>,
    #[arg(long)]
    pub kind: Option<SymbolKind>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// `name:direction:type`, e.g. `items:in:string` or `total:out:float64?`.
    /// Append `!` to the name for a required port and `*` for multiple.
    #[arg(long = "port", value_name = "SPEC")]
    pub ports: Vec<String>,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(long)]
    pub namespace: Option<String>,
    #[arg(long)]
    pub level: Option<Level>,
    #[arg(long)]
    pub kind: Option<SymbolKind>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(long)]
    pub origin: Option<Origin>,
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// JSON file with a full change set; flags below are applied on top.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub language: Option<String>,
    /// Replace the tag list.
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Relation {
    /// Symbols this one contains.
    Contains,
    /// Symbols that contain this one.
    ContainedBy,
    /// Symbols this one depends on.
    Dependencies,
    /// Symbols that depend on this one.
    Dependents,
}

// ── wire ──────────────────────────────────────────────────────────────────────

/// Both ends of a proposed connection.
#[derive(Debug, Args)]
pub struct Endpoints {
    pub from_symbol: String,
    pub from_port: String,
    pub to_symbol: String,
    pub to_port: String,
    /// Optional transform name recorded on the connection.
    #[arg(long)]
    pub transform: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum WireCommands {
    /// Create a connection after running the full validation pipeline.
    Connect(Endpoints),

    /// Remove a connection by id.
    Disconnect { id: String },

    /// Dry-run the pipeline and report every problem found.
    Validate(Endpoints),

    /// Fetch one connection.
    Get { id: String },

    /// List connections, optionally only those touching a symbol.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, value_name = "ID")]
        symbol: Option<String>,
    },

    /// Ports on TARGET that SYMBOL.PORT could connect to, best first.
    Compatible {
        symbol: String,
        port: String,
        target: String,
    },

    /// Required input ports with no inbound connection.
    Unconnected,
}

// ── graph ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum GraphCommands {
    /// Print the whole graph, or the part reachable from a root.
    Show {
        #[arg(long, value_name = "ID")]
        root: Option<String>,
    },
    /// Connection cycles, if any.
    Cycles,
    /// Topological order, or null when the graph is cyclic.
    Order,
    /// Node, edge, root, leaf and component counts.
    Stats,
    /// Everything that feeds into a symbol.
    Upstream { id: String },
    /// Everything a symbol feeds.
    Downstream { id: String },
    /// Immediate neighbours.
    Direct { id: String },
    /// Nodes with no inbound edges.
    Roots,
    /// Nodes with no outbound edges.
    Leaves,
    /// Weakly connected components.
    Components,
    /// Largest breadth-first distance from a root, -1 when cyclic.
    Depth,
    /// Whether an edge FROM -> TO would close a cycle.
    WouldCycle { from: String, to: String },
}

// ── validate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Validate only this symbol.
    #[arg(value_name = "ID", conflicts_with = "circular")]
    pub id: Option<String>,

    /// Only report containment cycles.
    #[arg(long)]
    pub circular: bool,
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GenerateFlags {
    /// Output root; defaults to `generator.output_dir`.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Rewrite base artifacts even when their hash is unchanged.
    #[arg(long)]
    pub overwrite: bool,

    /// Compute everything, write nothing.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum GenerateCommands {
    /// Generate one or more symbols; failures do not stop the batch.
    Symbol {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
        #[command(flatten)]
        flags: GenerateFlags,
    },
    /// Generate every generatable symbol.
    All {
        #[command(flatten)]
        flags: GenerateFlags,
    },
    /// Show the artifacts for a symbol without writing them.
    Preview {
        id: String,
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// List symbols code can be generated for.
    #[command(visible_alias = "ls")]
    List,
    /// Whether a symbol can be generated.
    Check { id: String },
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `symwire init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.symwire.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `symwire completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `symwire config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `store.path`.
        key: String,
    },
    /// Set a configuration key in the active configuration file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_connect() {
        let cli = Cli::parse_from([
            "symwire",
            "wire",
            "connect",
            "shop/Catalog@1.0.0",
            "selected",
            "shop/Cart@1.0.0",
            "items",
        ]);
        let Commands::Wire(WireCommands::Connect(ends)) = cli.command else {
            panic!("expected wire connect");
        };
        assert_eq!(ends.to_port, "items");
        assert!(ends.transform.is_none());
    }

    #[test]
    fn domain_values_parse_through_from_str() {
        let cli = Cli::parse_from(["symwire", "symbol", "query", "--level", "L2", "--status", "tested"]);
        let Commands::Symbol(SymbolCommands::Query(q)) = cli.command else {
            panic!("expected symbol query");
        };
        assert_eq!(q.level, Some(Level::Module));
        assert_eq!(q.status, Some(Status::Tested));
    }

    #[test]
    fn register_needs_identity_or_file() {
        assert!(Cli::try_parse_from(["symwire", "symbol", "register", "shop"]).is_err());
        assert!(Cli::try_parse_from(["symwire", "symbol", "register", "--file", "cart.json"]).is_ok());
    }

    #[test]
    fn gen_alias_and_multiple_ids() {
        let cli = Cli::parse_from(["symwire", "gen", "symbol", "a/B@1.0.0", "a/C@1.0.0", "--dry-run"]);
        let Commands::Generate(GenerateCommands::Symbol { ids, flags }) = cli.command else {
            panic!("expected generate symbol");
        };
        assert_eq!(ids.len(), 2);
        assert!(flags.dry_run);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["symwire", "--quiet", "--verbose", "graph", "stats"]);
        assert!(result.is_err());
    }
}
