//! `symwire config`: read and write configuration values.
//!
//! Keys are dotted paths into [`AppConfig`], e.g. `generator.output_dir`.

use std::{fs, path::Path};

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.print(&render(&get_config_value(config, &key)?))?;
        }

        ConfigCommands::Set { key, value } => {
            let target = global
                .config
                .clone()
                .unwrap_or_else(AppConfig::config_path);
            set_config_value(&target, &key, &value)?;
            output.success(&format!("{key} = {value}  ({})", target.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(&to_toml(config)?)?;
        }

        ConfigCommands::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(AppConfig::config_path);
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    }
}

fn to_toml<T: serde::Serialize>(value: &T) -> CliResult<String> {
    toml::to_string_pretty(value).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

fn render(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<serde_json::Value> {
    let mut node = serde_json::to_value(config)?;
    for part in key.split('.') {
        node = node
            .get_mut(part)
            .map(serde_json::Value::take)
            .ok_or_else(|| unknown_key(key))?;
    }
    if node.is_object() {
        return Err(unknown_key(key));
    }
    Ok(node)
}

/// Update one key in the TOML file at `path`, creating it if needed. The
/// result must still deserialize into [`AppConfig`] before it is written.
fn set_config_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    // Only keys that exist in the schema can be set.
    let current = get_config_value(&AppConfig::default(), key)?;
    let value = match current {
        serde_json::Value::Bool(_) => raw
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|e| invalid_value(key, raw, e))?,
        _ => toml::Value::String(raw.to_string()),
    };

    let mut table = if path.exists() {
        let text = fs::read_to_string(path).map_err(|e| CliError::IoError {
            message: format!("Failed to read '{}'", path.display()),
            source: e,
        })?;
        text.parse::<toml::Table>().map_err(|e| CliError::ConfigError {
            message: format!("'{}' is not valid TOML: {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let mut parts: Vec<&str> = key.split('.').collect();
    let leaf = parts.pop().ok_or_else(|| unknown_key(key))?;
    let mut node = &mut table;
    for part in parts {
        node = node
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .ok_or_else(|| unknown_key(key))?;
    }
    node.insert(leaf.to_string(), value);

    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .map_err(|e| invalid_value(key, raw, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_toml(&table)?).map_err(|e| CliError::IoError {
        message: format!("Failed to write '{}'", path.display()),
        source: e,
    })
}

fn invalid_value(
    key: &str,
    raw: &str,
    e: impl std::error::Error + Send + Sync + 'static,
) -> CliError {
    CliError::ConfigError {
        message: format!("Invalid value '{raw}' for '{key}'"),
        source: Some(Box::new(e)),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "generator.default_language").unwrap();
        assert_eq!(render(&value), "typescript");
    }

    #[test]
    fn get_unknown_or_section_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
        assert!(get_config_value(&cfg, "generator").is_err());
    }

    #[test]
    fn get_no_color_default() {
        let cfg = AppConfig::default();
        assert_eq!(render(&get_config_value(&cfg, "output.no_color").unwrap()), "false");
    }

    #[test]
    fn set_writes_nested_key_and_keeps_others() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[output]\nno_color = true\n").unwrap();

        set_config_value(&path, "wiring.type_check_mode", "strict").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(
            cfg.wiring.type_check_mode,
            symwire_core::domain::TypeCheckMode::Strict
        );
        assert!(cfg.output.no_color);
    }

    #[test]
    fn set_rejects_values_the_schema_refuses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        assert!(set_config_value(&path, "wiring.type_check_mode", "loose").is_err());
        assert!(set_config_value(&path, "output.no_color", "maybe").is_err());
        assert!(set_config_value(&path, "nope.key", "1").is_err());
        assert!(!path.exists());
    }
}
