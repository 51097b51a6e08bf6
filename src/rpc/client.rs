//! Real RPC transport over the nonblocking Solana client

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

use super::{RecentBlockhash, RpcError, SolanaRpc};

/// [`SolanaRpc`] implementation backed by `solana_client`'s nonblocking
/// `RpcClient`. The endpoint and commitment are injected, never hardcoded.
pub struct RpcClientTransport {
    client: RpcClient,
}

impl RpcClientTransport {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
        }
    }
}

#[async_trait]
impl SolanaRpc for RpcClientTransport {
    async fn latest_blockhash(&self) -> Result<RecentBlockhash, RpcError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.client.commitment())
            .await?;

        Ok(RecentBlockhash {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn block_height(&self) -> Result<u64, RpcError> {
        Ok(self.client.get_block_height().await?)
    }

    async fn balance(&self, account: &Pubkey) -> Result<u64, RpcError> {
        Ok(self.client.get_balance(account).await?)
    }

    async fn request_airdrop(
        &self,
        account: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        Ok(self.client.request_airdrop(account, lamports).await?)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        Ok(self.client.send_and_confirm_transaction(transaction).await?)
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        // Preserve the typed transaction error (including preflight failures)
        // so the retry classifier can avoid substring matching.
        match err.get_transaction_error() {
            Some(tx_err) => RpcError::Transaction { err: tx_err },
            None => RpcError::Transport {
                message: err.to_string(),
            },
        }
    }
}
