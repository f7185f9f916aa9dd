use crate::client::LedgerClient;
use crate::core::{Config, SwapError, SwapResult};
use log::{debug, info};
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSimulateTransactionConfig};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::VersionedTransaction,
};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::sync::Arc;

/// Shared nonblocking RPC client with the configured timeout
pub fn connect(config: &Config) -> Arc<RpcClient> {
    Arc::new(RpcClient::new_with_timeout_and_commitment(
        config.rpc_url.clone(),
        config.timeout(),
        CommitmentConfig::confirmed(),
    ))
}

/// Re-sign a backend-built transaction with `signer` as fee payer
pub fn sign_transaction(
    transaction: VersionedTransaction,
    signer: &Keypair,
) -> SwapResult<VersionedTransaction> {
    VersionedTransaction::try_new(transaction.message, &[signer])
        .map_err(|e| SwapError::TransactionFailed(format!("Failed to sign transaction: {}", e)))
}

/// `LedgerClient` over Solana JSON-RPC
pub struct RpcLedger {
    rpc_client: Arc<RpcClient>,
}

impl RpcLedger {
    pub fn new(rpc_client: Arc<RpcClient>) -> Self {
        Self { rpc_client }
    }
}

#[async_trait::async_trait]
impl LedgerClient for RpcLedger {
    async fn refresh_chain_time(&self) -> SwapResult<i64> {
        let slot = self
            .rpc_client
            .get_slot_with_commitment(CommitmentConfig::finalized())
            .await?;
        let time = self.rpc_client.get_block_time(slot).await?;
        debug!("Chain time {} at slot {}", time, slot);
        Ok(time)
    }

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> SwapResult<Signature> {
        let signature = self
            .rpc_client
            .send_and_confirm_transaction(transaction)
            .await?;
        info!("Transaction confirmed: {}", signature);
        Ok(signature)
    }

    async fn simulation_logs(&self, transaction: &VersionedTransaction) -> SwapResult<Vec<String>> {
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            commitment: Some(CommitmentConfig::confirmed()),
            ..Default::default()
        };
        let result = self
            .rpc_client
            .simulate_transaction_with_config(transaction, config)
            .await?;
        Ok(result.value.logs.unwrap_or_default())
    }

    async fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> SwapResult<u64> {
        // The mint owner tells SPL Token and Token-2022 accounts apart
        let token_program = self.rpc_client.get_account(mint).await?.owner;
        if token_program != spl_token::id() && token_program != spl_token_2022::id() {
            return Err(SwapError::Other(format!(
                "{} is not a token mint (owner {})",
                mint, token_program
            )));
        }
        let ata = get_associated_token_address_with_program_id(owner, mint, &token_program);

        let balance = self.rpc_client.get_token_account_balance(&ata).await?;
        balance.amount.parse().map_err(|_| {
            SwapError::SerializationError(format!(
                "Invalid token balance for {}: {}",
                ata, balance.amount
            ))
        })
    }
}
