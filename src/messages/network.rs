//! Network messages - communication between App and Network layers

use crate::models::{PreparedRequest, RequestOutcome};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute one test request for a dialog session
    ExecuteRequest {
        id: u64,
        session: u64,
        request: PreparedRequest,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Completion report sent from Network layer to App layer
#[derive(Debug, Clone)]
pub struct NetworkResponse {
    pub id: u64,
    /// Test dialog session that issued the request
    pub session: u64,
    pub outcome: RequestOutcome,
}
