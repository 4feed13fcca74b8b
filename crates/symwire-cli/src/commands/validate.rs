//! `symwire validate`

use tracing::warn;

use super::Context;
use crate::{cli::ValidateArgs, error::CliResult};

/// Print the report. An invalid registry is still a successful envelope;
/// it is only flagged in the log.
pub fn execute(args: ValidateArgs, ctx: &Context) -> CliResult<()> {
    let api = &ctx.api;
    if args.circular {
        return ctx.output.emit(api.check_circular());
    }

    let response = match args.id {
        Some(id) => api.validate_symbol(&id),
        None => api.validate_all(),
    };
    if let Some(report) = response.data.as_ref().filter(|r| !r.valid) {
        warn!(errors = report.errors.len(), "Registry has validation errors");
    }
    ctx.output.emit(response)
}
