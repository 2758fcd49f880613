//! Artifact removal steps

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{interpolate_list, CommandRunner, Context};
use glob::Pattern;
use std::path::PathBuf;

/// Expand removal patterns into the existing paths they match
///
/// Patterns are relative to the working directory. Plain names resolve to at
/// most one path; glob patterns may match any number. Paths that do not
/// exist are dropped.
pub fn expand_remove_targets(patterns: &[String], ctx: &Context) -> ExecutionResult<Vec<PathBuf>> {
    let base = Pattern::escape(&ctx.working_dir.to_string_lossy());
    let mut targets = Vec::new();

    for pattern in interpolate_list(patterns, &ctx.vars)? {
        let full = format!("{}/{}", base.trim_end_matches('/'), pattern);
        let matches = glob::glob(&full).map_err(|e| ExecutionError::InvalidPattern {
            pattern: pattern.clone(),
            error: e.to_string(),
        })?;

        // Unreadable entries are skipped rather than failing the clean
        for path in matches.flatten() {
            if !targets.contains(&path) {
                targets.push(path);
            }
        }
    }

    Ok(targets)
}

/// Delete every path matching the patterns
pub fn execute_remove<R: CommandRunner + ?Sized>(
    patterns: &[String],
    ctx: &Context,
    runner: &mut R,
) -> ExecutionResult<usize> {
    ctx.print_run(&format!("remove {}", patterns.join(" ")));

    let targets = expand_remove_targets(patterns, ctx)?;
    if ctx.dry_run {
        for target in &targets {
            ctx.print_debug(&format!("would remove {}", target.display()));
        }
        return Ok(0);
    }

    for target in &targets {
        ctx.print_debug(&format!("removing {}", target.display()));
        runner.remove(target)?;
    }

    Ok(targets.len())
}
