//! Signature confirmation tracking
//!
//! Waiting for confirmation is independent of submission: callers hand over a
//! signature and a timeout, and the service watches status notifications from
//! an injected [`SignatureNotifier`] until the cluster reports a verdict, the
//! deadline passes, or the caller cancels. The subscription is released on
//! every exit path.

use std::time::Duration;

use async_trait::async_trait;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::util::CancelToken;

#[cfg(feature = "rpc-client")]
mod pubsub;
#[cfg(feature = "rpc-client")]
pub use pubsub::PubsubNotifier;

/// Status notification for a watched signature
#[derive(Debug, Clone)]
pub enum SignatureEvent {
    /// The cluster has seen the signature but not yet processed it
    Received,
    /// The transaction was processed; `err` carries the on-chain error if it
    /// executed unsuccessfully
    Processed { err: Option<TransactionError> },
    /// The subscription could not be established or broke down
    SubscriptionFailed { message: String },
}

/// Source of status notifications for a signature.
///
/// Implementations own their subscription resources; dropping the returned
/// receiver must release them.
#[async_trait]
pub trait SignatureNotifier: Send + Sync {
    async fn watch(
        &self,
        signature: &Signature,
    ) -> Result<mpsc::Receiver<SignatureEvent>, ConfirmError>;
}

/// Lifecycle of a submitted transaction as observed by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    Submitted,
    Confirmed,
    Failed,
    TimedOut,
}

impl ConfirmationState {
    /// Map a confirmation outcome onto the lifecycle state
    pub fn from_outcome(outcome: &Result<(), ConfirmError>) -> Self {
        match outcome {
            Ok(()) => ConfirmationState::Confirmed,
            Err(ConfirmError::Timeout(_)) => ConfirmationState::TimedOut,
            Err(_) => ConfirmationState::Failed,
        }
    }
}

/// Watches signatures until the cluster reports a verdict
#[derive(Clone)]
pub struct ConfirmationService {
    notifier: std::sync::Arc<dyn SignatureNotifier>,
}

impl ConfirmationService {
    pub fn new(notifier: std::sync::Arc<dyn SignatureNotifier>) -> Self {
        Self { notifier }
    }

    /// Wait until `signature` is confirmed, fails, times out, or the caller
    /// cancels.
    ///
    /// An error-bearing notification returns
    /// [`ConfirmError::TransactionFailed`] immediately; resubmission would
    /// require a brand-new transaction, so it is never retried here.
    pub async fn await_confirmation(
        &self,
        signature: &Signature,
        timeout: Duration,
        mut cancel: CancelToken,
    ) -> Result<(), ConfirmError> {
        let mut events = self.notifier.watch(signature).await?;

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    warn!("no confirmation for {} within {:?}", signature, timeout);
                    return Err(ConfirmError::Timeout(timeout));
                }
                _ = cancel.cancelled() => {
                    return Err(ConfirmError::Cancelled);
                }
                event = events.recv() => match event {
                    Some(SignatureEvent::Received) => {
                        debug!("signature {} received by cluster", signature);
                    }
                    Some(SignatureEvent::Processed { err: Some(err) }) => {
                        return Err(ConfirmError::TransactionFailed { err });
                    }
                    Some(SignatureEvent::Processed { err: None }) => {
                        info!("transaction {} confirmed", signature);
                        return Ok(());
                    }
                    Some(SignatureEvent::SubscriptionFailed { message }) => {
                        return Err(ConfirmError::Subscribe { message });
                    }
                    None => return Err(ConfirmError::SubscriptionClosed),
                }
            }
        }
    }
}

/// Error types for confirmation waits
#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("transaction failed on chain: {err}")]
    TransactionFailed { err: TransactionError },

    #[error("no confirmation within {0:?}")]
    Timeout(Duration),

    #[error("confirmation wait cancelled")]
    Cancelled,

    #[error("signature subscription failed: {message}")]
    Subscribe { message: String },

    #[error("signature subscription closed before a verdict")]
    SubscriptionClosed,
}
