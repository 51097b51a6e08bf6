//! Integration tests for the SolCourier SDK
//!
//! Exercise the facade end-to-end with injected stub transports, the same
//! seams a real deployment uses for RPC and websocket access.

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::{Transaction, TransactionError};
use solcourier::confirm::{ConfirmError, SignatureEvent, SignatureNotifier};
use solcourier::rpc::{RecentBlockhash, RpcError, SolanaRpc};
use solcourier::{util, CourierConfig, SolCourier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// In-memory cluster stub: tracks submissions, optionally failing the first
/// `failures` of them with a transient error
struct StubCluster {
    submissions: AtomicUsize,
    failures: usize,
    last_signature: Mutex<Option<Signature>>,
}

impl StubCluster {
    fn new(failures: usize) -> Self {
        Self {
            submissions: AtomicUsize::new(0),
            failures,
            last_signature: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SolanaRpc for StubCluster {
    async fn latest_blockhash(&self) -> Result<RecentBlockhash, RpcError> {
        Ok(RecentBlockhash {
            blockhash: Hash::default(),
            last_valid_block_height: 500,
        })
    }

    async fn block_height(&self) -> Result<u64, RpcError> {
        Ok(350)
    }

    async fn balance(&self, _account: &Pubkey) -> Result<u64, RpcError> {
        Ok(10_000_000_000)
    }

    async fn request_airdrop(
        &self,
        _account: &Pubkey,
        _lamports: u64,
    ) -> Result<Signature, RpcError> {
        Ok(Signature::default())
    }

    async fn send_and_confirm(&self, _transaction: &Transaction) -> Result<Signature, RpcError> {
        let submission = self.submissions.fetch_add(1, Ordering::SeqCst);
        if submission < self.failures {
            return Err(RpcError::Transaction {
                err: TransactionError::BlockhashNotFound,
            });
        }

        let mut bytes = [0u8; 64];
        bytes[0] = submission as u8 + 1;
        let signature = Signature::from(bytes);
        *self.last_signature.lock().unwrap() = Some(signature);
        Ok(signature)
    }
}

/// Notifier stub that reports every watched signature with a fixed verdict
struct StubNotifier {
    err: Option<TransactionError>,
}

#[async_trait]
impl SignatureNotifier for StubNotifier {
    async fn watch(
        &self,
        _signature: &Signature,
    ) -> Result<mpsc::Receiver<SignatureEvent>, ConfirmError> {
        let (tx, rx) = mpsc::channel(16);
        let err = self.err.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = tx.send(SignatureEvent::Received).await;
            let _ = tx.send(SignatureEvent::Processed { err }).await;
        });

        Ok(rx)
    }
}

fn courier(cluster: Arc<StubCluster>, err: Option<TransactionError>) -> SolCourier {
    SolCourier::with_transports(
        &CourierConfig::default(),
        cluster,
        Arc::new(StubNotifier { err }),
    )
}

#[tokio::test]
async fn test_transfer_and_confirm_flow() {
    let cluster = Arc::new(StubCluster::new(0));
    let courier = courier(cluster.clone(), None);
    let sender = Keypair::new();
    let recipient = Pubkey::new_unique();

    let balance = courier.balance(&sender.pubkey()).await.unwrap();
    assert!(balance > 0);

    let recent = courier.recent_blockhash().await.unwrap();
    assert!(!recent.is_expired(courier.block_height().await.unwrap()));

    let signature = courier
        .transfer(
            &sender,
            &recipient,
            1_000_000,
            recent,
            util::CancelToken::never(),
        )
        .await
        .unwrap();
    assert_eq!(
        Some(signature),
        *cluster.last_signature.lock().unwrap(),
        "returned signature should be the one the cluster assigned"
    );

    courier
        .await_confirmation(&signature, util::CancelToken::never())
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_transfer_retries_transient_failures() {
    let cluster = Arc::new(StubCluster::new(2));
    let courier = courier(cluster.clone(), None);

    let recent = courier.recent_blockhash().await.unwrap();
    let result = courier
        .transfer(
            &Keypair::new(),
            &Pubkey::new_unique(),
            42,
            recent,
            util::CancelToken::never(),
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(cluster.submissions.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_on_chain_failure_is_surfaced() {
    let cluster = Arc::new(StubCluster::new(0));
    let courier = courier(
        cluster,
        Some(TransactionError::InstructionError(
            0,
            solana_sdk::instruction::InstructionError::Custom(1),
        )),
    );

    let recent = courier.recent_blockhash().await.unwrap();
    let signature = courier
        .transfer(
            &Keypair::new(),
            &Pubkey::new_unique(),
            42,
            recent,
            util::CancelToken::never(),
        )
        .await
        .unwrap();

    let result = courier
        .await_confirmation(&signature, util::CancelToken::never())
        .await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_both_paths() {
    let cluster = Arc::new(StubCluster::new(usize::MAX));
    let courier = courier(cluster, None);
    let (handle, token) = util::cancel::pair();

    let recent = courier.recent_blockhash().await.unwrap();
    let task = tokio::spawn({
        let courier = courier.clone();
        let token = token.clone();
        async move {
            courier
                .transfer(&Keypair::new(), &Pubkey::new_unique(), 42, recent, token)
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.cancel();

    let result = task.await.unwrap();
    assert!(result.is_err());
}
