//! Output management and formatting.
//!
//! Responses go to stdout as the JSON envelope; status lines from local
//! commands (`init`, `config`) use the coloured helpers.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use symwire_core::application::ApiResponse;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    /// Print a response envelope and turn a failed one into an error.
    ///
    /// Failures are printed even in quiet mode.
    pub fn emit<T: Serialize>(&self, response: ApiResponse<T>) -> CliResult<()> {
        if response.success && self.quiet {
            return Ok(());
        }
        self.term.write_line(&self.render(&response)?)?;
        match response.error {
            Some(error) => Err(CliError::Api(error)),
            None => Ok(()),
        }
    }

    /// Unwrap a response whose data feeds a larger report. A failure is
    /// printed as its own envelope and returned as an error.
    pub fn take<T>(&self, response: ApiResponse<T>) -> CliResult<T> {
        match response.into_result() {
            Ok(data) => Ok(data),
            Err(error) => {
                let failure: ApiResponse<()> = ApiResponse::fail(error.clone());
                self.term.write_line(&self.render(&failure)?)?;
                Err(CliError::Api(error))
            }
        }
    }

    fn render<T: Serialize>(&self, value: &T) -> CliResult<String> {
        Ok(match self.resolved_format {
            OutputFormat::Json => serde_json::to_string(value)?,
            _ => serde_json::to_string_pretty(value)?,
        })
    }

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use symwire_core::application::ApiError;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: true,
            config: None,
            store: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn json_format_renders_compact_envelope() {
        let out = make_manager(false, OutputFormat::Json);
        let rendered = out.render(&ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(rendered, r#"{"success":true,"data":[1,2]}"#);
    }

    #[test]
    fn failed_envelope_becomes_api_error_even_when_quiet() {
        let out = make_manager(true, OutputFormat::Plain);
        let response: ApiResponse<()> = ApiResponse::fail(ApiError {
            code: "NOT_FOUND".into(),
            message: "missing".into(),
            suggestions: Vec::new(),
        });
        let err = out.emit(response).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn quiet_success_is_silent_ok() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.emit(ApiResponse::ok("done")).is_ok());
    }

    #[test]
    fn plain_format_disables_color() {
        let out = make_manager(false, OutputFormat::Plain);
        assert!(!out.supports_color());
        assert_eq!(out.format(), OutputFormat::Plain);
    }
}
