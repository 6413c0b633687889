//! Manual session eviction.

use clap::Args;

use quotagate_core::error::AppError;

use super::Cli;
use crate::output;

/// Arguments for the kick command
#[derive(Debug, Args)]
pub struct KickArgs {
    /// Stream name
    pub stream: String,
    /// Session ID
    pub session: String,
}

/// Execute the kick command
pub async fn execute(args: &KickArgs, cli: &Cli) -> Result<(), AppError> {
    let service = cli.connect().await?;

    if service.kick(&args.stream, &args.session).await? {
        output::print_success(&format!(
            "Kicked session '{}' on stream '{}'",
            args.session, args.stream
        ));
    } else {
        output::print_warning(&format!(
            "Relay did not accept the kick for '{}'; session removed from the registry",
            args.session
        ));
    }
    Ok(())
}
