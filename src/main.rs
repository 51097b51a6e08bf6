//! SolCourier demonstration
//!
//! Runs the full transfer flow against the configured cluster: fund a sender,
//! check its balance, submit a transfer, and wait for confirmation in a
//! background task.

use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solcourier::{util, wallet, CourierConfig, SolCourier};
use std::str::FromStr;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("🚀 Starting SolCourier transfer demonstration...");

    let config = CourierConfig::load(None)?;
    info!("📡 Using RPC endpoint: {}", config.rpc_url);

    let courier = SolCourier::new(&config)?;

    // Sender comes from a solana-keygen file; without one we fall back to a
    // throwaway keypair funded by airdrop, which only works on dev clusters.
    let sender = match std::env::var("SOLCOURIER_KEYPAIR") {
        Ok(path) => wallet::load_keypair(path)?,
        Err(_) => {
            info!("SOLCOURIER_KEYPAIR not set, generating a throwaway account");
            Keypair::new()
        }
    };
    let recipient = match std::env::var("SOLCOURIER_RECIPIENT") {
        Ok(address) => Pubkey::from_str(&address)?,
        Err(_) => Keypair::new().pubkey(),
    };
    let amount: u64 = match std::env::var("SOLCOURIER_AMOUNT") {
        Ok(lamports) => lamports.parse()?,
        Err(_) => 1_000_000, // 0.001 SOL
    };

    info!("Sender: {}", sender.pubkey());
    info!("Recipient: {}", recipient);

    // Fund the sender if needed
    let balance = courier.balance(&sender.pubkey()).await?;
    info!(
        "Sender balance: {} lamports ({} SOL)",
        balance,
        balance as f64 / LAMPORTS_PER_SOL as f64
    );
    if balance < amount {
        info!("Requesting 1 SOL airdrop for the sender...");
        let airdrop_signature = courier
            .request_airdrop(&sender.pubkey(), LAMPORTS_PER_SOL)
            .await?;
        info!("Airdrop transaction signature: {}", airdrop_signature);
        // give the cluster a moment to land the airdrop
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    }

    // Fetch the blockhash anchoring the transfer
    let recent = courier.recent_blockhash().await?;
    info!(
        "Latest blockhash {} valid through height {}",
        recent.blockhash, recent.last_valid_block_height
    );

    // Submit the transfer with the bounded retry policy
    let (_cancel_handle, cancel) = util::cancel::pair();
    let signature = courier
        .transfer(&sender, &recipient, amount, recent, cancel.clone())
        .await?;
    info!("✅ Transfer submitted: {}", signature);

    // Watch for confirmation in the background while the caller moves on
    let watcher = tokio::spawn({
        let courier = courier.clone();
        async move { courier.await_confirmation(&signature, cancel).await }
    });

    match watcher.await? {
        Ok(()) => info!("🎉 Transaction confirmed!"),
        Err(e) => error!("❌ Confirmation failed: {}", e),
    }

    Ok(())
}
