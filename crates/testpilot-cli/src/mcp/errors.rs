//! Mapping of core errors onto MCP error data

use rmcp::ErrorData;
use testpilot_core::{ErrorKind, PilotError};

/// Converts a core error into an MCP error.
///
/// Caller mistakes (failed gates, disallowed transitions, busy runs, unknown
/// projects) become `invalid_params` so the assistant can correct its call;
/// everything else is reported as an internal error.
pub fn to_mcp_error(message: &str, error: &PilotError) -> ErrorData {
    let text = format!("{message}: {error}");
    match (error, error.kind()) {
        (PilotError::ProjectNotFound { .. }, _) | (_, ErrorKind::Validation) => {
            ErrorData::invalid_params(text, None)
        }
        _ => ErrorData::internal_error(text, None),
    }
}
