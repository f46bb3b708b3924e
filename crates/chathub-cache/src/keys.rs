//! Key builders for revocation store entries.

use uuid::Uuid;

/// Key of the liveness record for a session.
pub fn session(session_id: Uuid) -> String {
    format!("session:{session_id}")
}
