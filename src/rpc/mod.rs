//! RPC transport seam for SolCourier
//!
//! Defines the capability set the transfer and confirmation paths need from a
//! Solana RPC endpoint, plus a structured error type. The real client lives in
//! [`client`] behind the `rpc-client` feature; tests inject stubs.

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
    transaction::TransactionError,
};
use thiserror::Error;

#[cfg(feature = "rpc-client")]
mod client;
#[cfg(feature = "rpc-client")]
pub use client::RpcClientTransport;

/// A blockhash paired with the last block height at which it is accepted.
///
/// Blockhashes expire after roughly 150 blocks; a transaction anchored to an
/// expired blockhash is rejected by the cluster and must be rebuilt with a
/// fresh one, never resubmitted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

impl RecentBlockhash {
    /// Whether the cluster has moved past the validity window
    pub fn is_expired(&self, current_block_height: u64) -> bool {
        current_block_height > self.last_valid_block_height
    }
}

/// Capabilities SolCourier consumes from a Solana RPC endpoint
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Fetch the latest blockhash and its validity horizon
    async fn latest_blockhash(&self) -> Result<RecentBlockhash, RpcError>;

    /// Current block height at the configured commitment
    async fn block_height(&self) -> Result<u64, RpcError>;

    /// Lamport balance of an account
    async fn balance(&self, account: &Pubkey) -> Result<u64, RpcError>;

    /// Request a devnet/testnet airdrop
    async fn request_airdrop(&self, account: &Pubkey, lamports: u64)
        -> Result<Signature, RpcError>;

    /// Submit a signed transaction and block until the cluster reports
    /// inclusion or an error
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, RpcError>;
}

/// Error surfaced by an RPC transport.
///
/// Transports that expose a typed transaction error report it structurally in
/// [`RpcError::Transaction`]; everything else degrades to the raw message.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    #[error("transaction error: {err}")]
    Transaction { err: TransactionError },

    #[error("rpc transport error: {message}")]
    Transport { message: String },
}

impl RpcError {
    /// The typed transaction error, when the transport surfaced one
    pub fn transaction_error(&self) -> Option<&TransactionError> {
        match self {
            RpcError::Transaction { err } => Some(err),
            RpcError::Transport { .. } => None,
        }
    }
}
