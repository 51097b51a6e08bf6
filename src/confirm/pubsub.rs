//! Websocket signature subscription over the Solana pubsub client
//!
//! Each watch spawns a forwarding task that owns the websocket connection.
//! The task unsubscribes and drops the connection when a terminal
//! notification arrives, the stream ends, or the caller drops the receiver.

use async_trait::async_trait;
use futures::StreamExt;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::rpc_config::RpcSignatureSubscribeConfig;
use solana_client::rpc_response::RpcSignatureResult;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use tokio::sync::mpsc;
use tracing::debug;

use super::{ConfirmError, SignatureEvent, SignatureNotifier};

/// [`SignatureNotifier`] backed by a websocket signature subscription.
/// The endpoint is injected, never hardcoded.
pub struct PubsubNotifier {
    ws_url: String,
    commitment: CommitmentConfig,
}

impl PubsubNotifier {
    pub fn new(ws_url: &str, commitment: CommitmentConfig) -> Self {
        Self {
            ws_url: ws_url.to_string(),
            commitment,
        }
    }
}

#[async_trait]
impl SignatureNotifier for PubsubNotifier {
    async fn watch(
        &self,
        signature: &Signature,
    ) -> Result<mpsc::Receiver<SignatureEvent>, ConfirmError> {
        let (tx, rx) = mpsc::channel(16);
        let ws_url = self.ws_url.clone();
        let commitment = self.commitment;
        let signature = *signature;

        tokio::spawn(async move {
            run_subscription(ws_url, commitment, signature, tx).await;
        });

        Ok(rx)
    }
}

async fn run_subscription(
    ws_url: String,
    commitment: CommitmentConfig,
    signature: Signature,
    tx: mpsc::Sender<SignatureEvent>,
) {
    let client = match PubsubClient::new(&ws_url).await {
        Ok(client) => client,
        Err(err) => {
            let _ = tx
                .send(SignatureEvent::SubscriptionFailed {
                    message: format!("failed to connect to {}: {}", ws_url, err),
                })
                .await;
            return;
        }
    };

    let subscribe_config = RpcSignatureSubscribeConfig {
        commitment: Some(commitment),
        enable_received_notification: Some(true),
    };

    let (mut notifications, unsubscribe) = match client
        .signature_subscribe(&signature, Some(subscribe_config))
        .await
    {
        Ok(subscription) => subscription,
        Err(err) => {
            let _ = tx
                .send(SignatureEvent::SubscriptionFailed {
                    message: format!("failed to subscribe to {}: {}", signature, err),
                })
                .await;
            return;
        }
    };

    loop {
        tokio::select! {
            // caller dropped the receiver; tear the subscription down
            _ = tx.closed() => break,
            next = notifications.next() => match next {
                Some(response) => {
                    let event = match response.value {
                        RpcSignatureResult::ProcessedSignature(processed) => {
                            SignatureEvent::Processed { err: processed.err }
                        }
                        RpcSignatureResult::ReceivedSignature(_) => SignatureEvent::Received,
                    };

                    let terminal = matches!(event, SignatureEvent::Processed { .. });
                    if tx.send(event).await.is_err() || terminal {
                        break;
                    }
                }
                None => break,
            }
        }
    }

    drop(notifications);
    unsubscribe().await;
    debug!("released signature subscription for {}", signature);
}
