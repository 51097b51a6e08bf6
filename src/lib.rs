//! SolCourier SDK - reliable SOL transfer submission and confirmation
//!
//! Builds single-instruction value transfers, signs them locally, submits
//! them with a bounded retry policy for transient blockhash failures, and
//! separately awaits confirmation through a websocket signature subscription
//! with explicit timeout and cancellation semantics.

pub mod config;
pub mod confirm;
pub mod rpc;
pub mod transfer;
pub mod util;
pub mod wallet;

use std::sync::Arc;
use std::time::Duration;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
};
use thiserror::Error;

pub use config::CourierConfig;
pub use confirm::{ConfirmationState, SignatureNotifier};
pub use rpc::{RecentBlockhash, SolanaRpc};
pub use util::{CancelHandle, CancelToken};

/// Core SolCourier SDK instance
#[derive(Clone)]
pub struct SolCourier {
    /// Transfer builder and submitter
    transfers: transfer::TransferService,
    /// Signature confirmation watcher
    confirmations: confirm::ConfirmationService,
    /// RPC transport shared with the services
    rpc: Arc<dyn rpc::SolanaRpc>,
    /// Default deadline for confirmation waits
    confirm_timeout: Duration,
}

impl SolCourier {
    /// Initialize with real RPC and websocket transports from configuration
    #[cfg(feature = "rpc-client")]
    pub fn new(config: &CourierConfig) -> Result<Self, CourierError> {
        let commitment = config.commitment_config()?;
        let rpc: Arc<dyn rpc::SolanaRpc> =
            Arc::new(rpc::RpcClientTransport::new(&config.rpc_url, commitment));
        let notifier: Arc<dyn confirm::SignatureNotifier> =
            Arc::new(confirm::PubsubNotifier::new(&config.ws_url, commitment));

        Ok(Self::with_transports(config, rpc, notifier))
    }

    /// Initialize with injected transports (test harnesses, alternative
    /// networks)
    pub fn with_transports(
        config: &CourierConfig,
        rpc: Arc<dyn rpc::SolanaRpc>,
        notifier: Arc<dyn confirm::SignatureNotifier>,
    ) -> Self {
        Self {
            transfers: transfer::TransferService::new(rpc.clone(), config.retry.clone()),
            confirmations: confirm::ConfirmationService::new(notifier),
            rpc,
            confirm_timeout: config.confirm_timeout(),
        }
    }

    /// Fetch the latest blockhash and its validity horizon
    pub async fn recent_blockhash(&self) -> Result<RecentBlockhash, CourierError> {
        Ok(self.rpc.latest_blockhash().await?)
    }

    /// Current block height at the configured commitment
    pub async fn block_height(&self) -> Result<u64, CourierError> {
        Ok(self.rpc.block_height().await?)
    }

    /// Lamport balance of an account
    pub async fn balance(&self, account: &Pubkey) -> Result<u64, CourierError> {
        Ok(self.rpc.balance(account).await?)
    }

    /// Request a devnet/testnet airdrop
    pub async fn request_airdrop(
        &self,
        account: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, CourierError> {
        Ok(self.rpc.request_airdrop(account, lamports).await?)
    }

    /// Transfer `amount` lamports from `from` to `to`, anchored to `recent`,
    /// retrying transient failures per the configured policy
    pub async fn transfer(
        &self,
        from: &Keypair,
        to: &Pubkey,
        amount: u64,
        recent: RecentBlockhash,
        cancel: CancelToken,
    ) -> Result<Signature, CourierError> {
        Ok(self
            .transfers
            .transfer(from, to, amount, recent, cancel)
            .await?)
    }

    /// Wait until `signature` is confirmed, fails, or the configured default
    /// timeout elapses
    pub async fn await_confirmation(
        &self,
        signature: &Signature,
        cancel: CancelToken,
    ) -> Result<(), CourierError> {
        Ok(self
            .confirmations
            .await_confirmation(signature, self.confirm_timeout, cancel)
            .await?)
    }

    /// Wait for confirmation with an explicit timeout
    pub async fn await_confirmation_with_timeout(
        &self,
        signature: &Signature,
        timeout: Duration,
        cancel: CancelToken,
    ) -> Result<(), CourierError> {
        Ok(self
            .confirmations
            .await_confirmation(signature, timeout, cancel)
            .await?)
    }
}

/// Error types for SolCourier operations
#[derive(Debug, Error)]
pub enum CourierError {
    #[error("transfer error: {0}")]
    Transfer(#[from] transfer::TransferError),

    #[error("confirmation error: {0}")]
    Confirm(#[from] confirm::ConfirmError),

    #[error("rpc error: {0}")]
    Rpc(#[from] rpc::RpcError),

    #[error("wallet error: {0}")]
    Wallet(#[from] wallet::WalletError),

    #[error("configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}

/// Maximum submission attempts per transfer, including the first
pub const MAX_SUBMIT_ATTEMPTS: usize = 3;

/// Fixed pause between submission attempts, in seconds
pub const RETRY_BACKOFF_SECS: u64 = 2;

/// Default deadline for confirmation waits, in seconds
pub const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;
