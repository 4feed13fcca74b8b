//! `symwire generate`: Generation Gap artifacts.

use tracing::info;

use super::Context;
use crate::{
    cli::{GenerateCommands, GenerateFlags},
    error::CliResult,
};
use symwire_core::application::GenerateOptions;

pub fn execute(cmd: GenerateCommands, ctx: &Context) -> CliResult<()> {
    let api = &ctx.api;
    let out = &ctx.output;
    match cmd {
        GenerateCommands::Symbol { ids, flags } => {
            let options = options(ctx, flags);
            if let [id] = ids.as_slice() {
                out.emit(api.generate_symbol(id, &options))
            } else {
                out.emit(api.generate_multiple(&ids, &options))
            }
        }
        GenerateCommands::All { flags } => {
            let options = options(ctx, flags);
            let response = api.generate_all(&options);
            if let Some(batch) = &response.data {
                info!(
                    succeeded = batch.succeeded,
                    failed = batch.failed,
                    skipped = batch.skipped,
                    "Generation finished"
                );
            }
            out.emit(response)
        }
        GenerateCommands::Preview { id, output_dir } => {
            let dir = output_dir.unwrap_or_else(|| ctx.config.generator.output_dir.clone());
            out.emit(api.preview_symbol(&id, dir))
        }
        GenerateCommands::List => out.emit(api.list_generatable_symbols()),
        GenerateCommands::Check { id } => out.emit(api.can_generate(&id)),
    }
}

/// Config defaults, then flags.
fn options(ctx: &Context, flags: GenerateFlags) -> GenerateOptions {
    let options = ctx.generate_options(flags.output_dir);
    let options = if flags.overwrite {
        options.overwrite_generated(true)
    } else {
        options
    };
    if flags.dry_run { options.dry_run() } else { options }
}
