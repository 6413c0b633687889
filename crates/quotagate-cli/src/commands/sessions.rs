//! Active session listing.

use serde::Serialize;
use tabled::Tabled;

use quotagate_core::error::AppError;

use super::Cli;
use crate::output;

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Stream
    stream: String,
    /// Session ID
    session_id: String,
    /// Token
    token: String,
}

/// Execute the sessions command
pub async fn execute(cli: &Cli) -> Result<(), AppError> {
    let service = cli.connect().await?;
    let snapshot = service.session_snapshot().await?;

    let rows: Vec<SessionRow> = snapshot
        .streams
        .iter()
        .flat_map(|(stream, sessions)| {
            sessions.iter().map(move |session| SessionRow {
                stream: stream.clone(),
                session_id: session.session_id.clone(),
                token: session.token.clone().unwrap_or_else(|| "-".to_string()),
            })
        })
        .collect();

    output::print_rows(&rows, &snapshot, cli.format);
    Ok(())
}
