//! Network actor - runs test requests in the Tokio async runtime

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, execute_request};

/// Network actor that executes request commands
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>, timeout: Option<Duration>) -> Self {
        NetworkActor {
            client: create_client(timeout),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::ExecuteRequest { id, session, request }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            // In-flight requests are never cancelled; stale results are dropped by the app
                            self.active_requests.spawn(async move {
                                tracing::info!(id, session, url = %request.url, method = %request.method, "Executing request");
                                let outcome = execute_request(&client, request).await;
                                tracing::info!(id, status = ?outcome.status(), elapsed_ms = outcome.elapsed_ms(), "Request completed");
                                let _ = response_tx.send(NetworkResponse { id, session, outcome });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => break,
                    }
                }

                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpMethod, PreparedRequest, RequestOutcome};

    #[tokio::test]
    async fn test_failed_request_is_reported_with_ids() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (response_tx, mut response_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(response_tx, None).run(cmd_rx));

        cmd_tx
            .send(NetworkCommand::ExecuteRequest {
                id: 7,
                session: 3,
                request: PreparedRequest {
                    method: HttpMethod::GET,
                    url: format!("http://{}/", addr),
                    headers: Vec::new(),
                    body: None,
                },
            })
            .unwrap();

        let response = response_rx.recv().await.unwrap();
        assert_eq!(response.id, 7);
        assert_eq!(response.session, 3);
        assert!(matches!(response.outcome, RequestOutcome::Failed { .. }));

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
