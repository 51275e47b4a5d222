//! Route guard inspection.

use clap::Args;

use dishhub_core::error::AppError;
use dishhub_web::{GuardDecision, GuardedRouter};

use crate::context::CliContext;
use crate::output;

/// Arguments for route resolution
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Client path, e.g. `/upload` or `/dish/<id>`
    pub path: String,
}

/// Resolve a path the way the client's router would
pub async fn execute(ctx: &CliContext, args: &RouteArgs) -> Result<(), AppError> {
    let router = GuardedRouter::new(ctx.session.clone())?;

    match router.navigate_resolved(&args.path).await {
        GuardDecision::Render(route) => {
            output::print_success(&format!("{} renders {route}", args.path));
        }
        GuardDecision::Redirect(to) => {
            output::print_warning(&format!("{} redirects to {to}", args.path));
        }
        GuardDecision::Wait => {
            output::print_warning(&format!("{} is waiting for the session", args.path));
        }
    }
    Ok(())
}
