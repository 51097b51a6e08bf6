//! SOL transfer building, signing, and submission
//!
//! The core flow: construct a single system transfer instruction, assemble a
//! transaction with the sender as fee payer, sign it locally, and submit it
//! through the injected RPC transport. Submission is retried a bounded number
//! of times for transient blockhash failures, with a fresh blockhash fetched
//! before every retry so a stale one is never resubmitted.

pub mod retry;

use std::sync::Arc;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    signer::SignerError,
    system_instruction,
    transaction::Transaction,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::rpc::{RecentBlockhash, RpcError, SolanaRpc};
use crate::util::CancelToken;
pub use retry::{is_retryable, BackoffStrategy, RetryPolicy};

/// Builds, signs, and submits value transfers over an injected transport
#[derive(Clone)]
pub struct TransferService {
    rpc: Arc<dyn SolanaRpc>,
    policy: RetryPolicy,
}

impl TransferService {
    pub fn new(rpc: Arc<dyn SolanaRpc>, policy: RetryPolicy) -> Self {
        Self { rpc, policy }
    }

    /// Fetch the latest blockhash and its validity horizon
    pub async fn recent_blockhash(&self) -> Result<RecentBlockhash, TransferError> {
        self.rpc
            .latest_blockhash()
            .await
            .map_err(TransferError::Blockhash)
    }

    /// Build and sign a transfer of `amount` lamports from `from` to `to`.
    ///
    /// The sender is the fee payer. Signing fails if the keypair does not
    /// match the declared payer, so a mis-signed transaction can never reach
    /// submission.
    pub fn build_transfer(
        &self,
        from: &Keypair,
        to: &Pubkey,
        amount: u64,
        recent: &RecentBlockhash,
    ) -> Result<Transaction, TransferError> {
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }

        let instruction = system_instruction::transfer(&from.pubkey(), to, amount);
        let mut transaction =
            Transaction::new_with_payer(&[instruction], Some(&from.pubkey()));
        transaction.try_sign(&[from], recent.blockhash)?;

        Ok(transaction)
    }

    /// Submit a transfer and block until the cluster reports inclusion.
    ///
    /// The supplied blockhash anchors the first attempt. Transient failures
    /// (see [`retry::is_retryable`]) are retried up to the policy budget with
    /// a backoff pause and a freshly fetched blockhash per retry; any other
    /// failure aborts immediately. Exhausting the budget is itself terminal:
    /// [`TransferError::RetriesExhausted`] carries the last transient error.
    pub async fn transfer(
        &self,
        from: &Keypair,
        to: &Pubkey,
        amount: u64,
        recent: RecentBlockhash,
        mut cancel: CancelToken,
    ) -> Result<Signature, TransferError> {
        let mut recent = recent;

        for attempt in 1..=self.policy.max_attempts {
            if cancel.is_cancelled() {
                return Err(TransferError::Cancelled);
            }

            let transaction = self.build_transfer(from, to, amount, &recent)?;

            match self.rpc.send_and_confirm(&transaction).await {
                Ok(signature) => {
                    info!(
                        "transfer of {} lamports to {} confirmed: {}",
                        amount, to, signature
                    );
                    return Ok(signature);
                }
                Err(err) if is_retryable(&err) => {
                    warn!(
                        "attempt {}/{} failed: {}. Retrying...",
                        attempt, self.policy.max_attempts, err
                    );

                    if attempt == self.policy.max_attempts {
                        return Err(TransferError::RetriesExhausted {
                            attempts: self.policy.max_attempts,
                            source: err,
                        });
                    }

                    let delay = self.policy.backoff.calculate_delay(attempt - 1);
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancel.cancelled() => return Err(TransferError::Cancelled),
                    }

                    // Never resubmit with the blockhash that just failed.
                    recent = self.recent_blockhash().await?;
                }
                Err(err) => return Err(TransferError::Submit(err)),
            }
        }

        // max_attempts >= 1 is enforced by the loop returning on every path
        Err(TransferError::RetriesExhausted {
            attempts: self.policy.max_attempts,
            source: RpcError::Transport {
                message: "no submission attempted".to_string(),
            },
        })
    }
}

/// Error types for transfer operations
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("transfer amount must be greater than zero")]
    ZeroAmount,

    #[error("failed to sign transaction: {0}")]
    Sign(#[from] SignerError),

    #[error("failed to fetch recent blockhash: {0}")]
    Blockhash(#[source] RpcError),

    #[error("transaction submission failed: {0}")]
    Submit(#[source] RpcError),

    #[error("submission retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: RpcError,
    },

    #[error("transfer cancelled")]
    Cancelled,
}
