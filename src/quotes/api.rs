use crate::core::{PoolKeys, QuoteParams, RouteQuote, SwapError, SwapRequest, SwapResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::{pubkey::Pubkey, transaction::VersionedTransaction};
use std::str::FromStr;
use std::time::Duration;

/// Compute errors that mean "no candidate" rather than a failed request
const NO_ROUTE_MESSAGES: [&str; 2] = ["ROUTE_NOT_FOUND", "INSUFFICIENT_LIQUIDITY"];

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapTransactionRequest<'a> {
    compute_unit_price_micro_lamports: String,
    swap_response: &'a Value,
    tx_version: &'static str,
    wallet: String,
    wrap_sol: bool,
    unwrap_sol: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_account: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerializedTransaction {
    transaction: String,
}

/// Thin client over the Raydium compute, transaction and pool-key endpoints
pub struct RaydiumApi {
    client: Client,
    api_url: String,
    trade_api_url: String,
}

impl RaydiumApi {
    pub fn new(api_url: &str, trade_api_url: &str, timeout: Duration) -> SwapResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            trade_api_url: trade_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Quote `params` through the compute endpoint. A "no route" answer is an
    /// empty candidate list, any other failure is an error.
    pub async fn compute(&self, params: &QuoteParams) -> SwapResult<Vec<RouteQuote>> {
        let url = format!(
            "{}/compute/swap-base-in?inputMint={}&outputMint={}&amount={}&slippageBps={}&txVersion=V0",
            self.trade_api_url,
            params.pair.input_mint,
            params.pair.output_mint,
            params.amount_in,
            params.slippage_bps
        );
        debug!("Requesting quote: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SwapError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let envelope: Value = serde_json::from_str(&body)?;
        if !envelope["success"].as_bool().unwrap_or(false) {
            let msg = envelope["msg"].as_str().unwrap_or("Unknown error");
            if NO_ROUTE_MESSAGES.contains(&msg) {
                debug!("No Raydium route for {}: {}", params.pair, msg);
                return Ok(Vec::new());
            }
            return Err(SwapError::ApiError(msg.to_string()));
        }

        Ok(vec![parse_quote(envelope)?])
    }

    pub async fn pool_keys(&self, pool_ids: &[Pubkey]) -> SwapResult<Vec<PoolKeys>> {
        if pool_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = pool_ids.iter().map(|id| id.to_string()).collect();
        let url = format!("{}/pools/key/ids?ids={}", self.api_url, ids.join(","));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SwapError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let envelope: ApiResponse<Vec<Option<Value>>> = response.json().await?;
        if !envelope.success {
            return Err(SwapError::ApiError(
                envelope.msg.unwrap_or_else(|| "Pool key lookup failed".to_string()),
            ));
        }

        let entries = envelope.data.unwrap_or_default();
        pool_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let raw = entries
                    .get(i)
                    .cloned()
                    .flatten()
                    .ok_or_else(|| SwapError::PoolNotFound(id.to_string()))?;
                parse_pool_keys(id, raw)
            })
            .collect()
    }

    pub async fn swap_transactions(
        &self,
        request: &SwapRequest,
        input_account: Option<Pubkey>,
        output_account: Option<Pubkey>,
    ) -> SwapResult<Vec<VersionedTransaction>> {
        let body = SwapTransactionRequest {
            compute_unit_price_micro_lamports: request
                .priority_fee
                .unit_price_micro_lamports
                .to_string(),
            swap_response: &request.quote.response,
            tx_version: "V0",
            wallet: request.owner.to_string(),
            wrap_sol: request.wraps_sol(),
            unwrap_sol: request.unwraps_sol(),
            input_account: input_account.map(|a| a.to_string()),
            output_account: output_account.map(|a| a.to_string()),
        };

        let url = format!("{}/transaction/swap-base-in", self.trade_api_url);
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SwapError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let envelope: ApiResponse<Vec<SerializedTransaction>> = response.json().await?;
        if !envelope.success {
            return Err(SwapError::ApiError(
                envelope.msg.unwrap_or_else(|| "Transaction creation failed".to_string()),
            ));
        }

        let transactions = envelope.data.unwrap_or_default();
        if transactions.is_empty() {
            return Err(SwapError::ApiError("No transaction data returned".to_string()));
        }

        transactions
            .iter()
            .map(|tx| decode_transaction(&tx.transaction))
            .collect()
    }
}

/// Build a candidate from a successful compute response. The whole response
/// is kept, the transaction endpoint expects it back verbatim.
pub fn parse_quote(response: Value) -> SwapResult<RouteQuote> {
    let data = &response["data"];
    let pool_ids = data["routePlan"]
        .as_array()
        .map(|plan| {
            plan.iter()
                .filter_map(|step| step["poolId"].as_str())
                .map(Pubkey::from_str)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    if pool_ids.is_empty() {
        warn!("Quote response carries an empty route plan");
    }

    Ok(RouteQuote {
        pool_ids,
        amount_in: amount_field(data, "inputAmount")?,
        amount_out: amount_field(data, "outputAmount")?,
        min_amount_out: amount_field(data, "otherAmountThreshold")?,
        price_impact_pct: data["priceImpactPct"].as_f64().unwrap_or_default(),
        response,
    })
}

fn parse_pool_keys(id: &Pubkey, raw: Value) -> SwapResult<PoolKeys> {
    let program_id = raw["programId"]
        .as_str()
        .ok_or_else(|| SwapError::ApiError(format!("Pool {} has no programId", id)))?;
    Ok(PoolKeys {
        id: *id,
        program_id: Pubkey::from_str(program_id)?,
        raw,
    })
}

/// Amounts come back as decimal strings, occasionally as numbers
fn amount_field(data: &Value, field: &str) -> SwapResult<u64> {
    match &data[field] {
        Value::String(s) => s
            .parse()
            .map_err(|_| SwapError::SerializationError(format!("Invalid {}: {}", field, s))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| SwapError::SerializationError(format!("Invalid {}: {}", field, n))),
        _ => Err(SwapError::SerializationError(format!("Missing {}", field))),
    }
}

pub fn decode_transaction(encoded: &str) -> SwapResult<VersionedTransaction> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(bincode::deserialize(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PriorityFee, TradingPair, WSOL};
    use mockito::Matcher;
    use serde_json::json;
    use solana_sdk::message::{Message, VersionedMessage};

    fn params(input: Pubkey, output: Pubkey) -> QuoteParams {
        QuoteParams {
            pair: TradingPair::new(input, output),
            amount_in: 1_000_000,
            slippage_bps: 500,
            chain_time: 0,
        }
    }

    fn api(server: &mockito::Server) -> RaydiumApi {
        RaydiumApi::new(&server.url(), &server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_compute_parses_quote() {
        let mut server = mockito::Server::new_async().await;
        let output = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let body = json!({
            "id": "x",
            "success": true,
            "version": "V1",
            "data": {
                "swapType": "BaseIn",
                "inputMint": WSOL.to_string(),
                "inputAmount": "1000000",
                "outputMint": output.to_string(),
                "outputAmount": "52000",
                "otherAmountThreshold": "49400",
                "slippageBps": 500,
                "priceImpactPct": 0.12,
                "routePlan": [{ "poolId": pool.to_string() }]
            }
        });
        let mock = server
            .mock("GET", Matcher::Regex("^/compute/swap-base-in".into()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("inputMint".into(), WSOL.to_string()),
                Matcher::UrlEncoded("amount".into(), "1000000".into()),
                Matcher::UrlEncoded("slippageBps".into(), "500".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let quotes = api(&server).compute(&params(*WSOL, output)).await.unwrap();
        mock.assert_async().await;

        assert_eq!(quotes.len(), 1);
        let quote = &quotes[0];
        assert_eq!(quote.pool_ids, vec![pool]);
        assert_eq!(quote.amount_in, 1_000_000);
        assert_eq!(quote.amount_out, 52_000);
        assert_eq!(quote.min_amount_out, 49_400);
        assert_eq!(quote.response, body);
    }

    #[tokio::test]
    async fn test_compute_no_route_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex("^/compute/swap-base-in".into()))
            .with_status(200)
            .with_body(r#"{"id":"x","success":false,"version":"V1","msg":"ROUTE_NOT_FOUND"}"#)
            .create_async()
            .await;

        let quotes = api(&server)
            .compute(&params(*WSOL, Pubkey::new_unique()))
            .await
            .unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_compute_api_failure_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex("^/compute/swap-base-in".into()))
            .with_status(200)
            .with_body(r#"{"success":false,"msg":"REQ_SLIPPAGE_BPS_ERROR"}"#)
            .create_async()
            .await;

        let result = api(&server).compute(&params(*WSOL, Pubkey::new_unique())).await;
        assert!(matches!(result, Err(SwapError::ApiError(msg)) if msg == "REQ_SLIPPAGE_BPS_ERROR"));

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let result = api(&server).compute(&params(*WSOL, Pubkey::new_unique())).await;
        assert!(matches!(result, Err(SwapError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_pool_keys_missing_entry_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let known = Pubkey::new_unique();
        let unknown = Pubkey::new_unique();
        let body = json!({
            "success": true,
            "data": [
                { "id": known.to_string(), "programId": crate::core::RAYDIUM_AMM_V4_PROGRAM_ID },
                null
            ]
        });
        server
            .mock("GET", Matcher::Regex("^/pools/key/ids".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = api(&server);
        let result = api.pool_keys(&[known, unknown]).await;
        assert!(matches!(result, Err(SwapError::PoolNotFound(id)) if id == unknown.to_string()));

        let keys = api.pool_keys(&[known]).await.unwrap();
        assert_eq!(keys[0].id, known);
        assert_eq!(keys[0].program_id, *crate::core::AMM_V4_PROGRAM);
    }

    #[tokio::test]
    async fn test_swap_transactions_decodes_payload() {
        let mut server = mockito::Server::new_async().await;
        let owner = Pubkey::new_unique();
        let tx = VersionedTransaction {
            signatures: vec![Default::default()],
            message: VersionedMessage::Legacy(Message::new(&[], Some(&owner))),
        };
        let encoded = STANDARD.encode(bincode::serialize(&tx).unwrap());

        let mock = server
            .mock("POST", "/transaction/swap-base-in")
            .match_body(Matcher::PartialJson(json!({
                "computeUnitPriceMicroLamports": "2500",
                "txVersion": "V0",
                "wallet": owner.to_string(),
                "wrapSol": true,
                "unwrapSol": false
            })))
            .with_status(200)
            .with_body(json!({ "success": true, "data": [{ "transaction": encoded }] }).to_string())
            .create_async()
            .await;

        let output = Pubkey::new_unique();
        let request = SwapRequest {
            owner,
            pair: TradingPair::new(*WSOL, output),
            quote: RouteQuote {
                pool_ids: vec![],
                amount_in: 1,
                amount_out: 1,
                min_amount_out: 1,
                price_impact_pct: 0.0,
                response: json!({ "success": true }),
            },
            pool_keys: vec![],
            priority_fee: PriorityFee {
                unit_price_micro_lamports: 2_500,
            },
            input_token_program: spl_token::id(),
            output_token_program: spl_token::id(),
        };

        let transactions = api(&server)
            .swap_transactions(&request, None, Some(Pubkey::new_unique()))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].message.static_account_keys()[0], owner);
    }

    #[test]
    fn test_parse_quote_rejects_missing_amounts() {
        let result = parse_quote(json!({ "success": true, "data": { "routePlan": [] } }));
        assert!(matches!(result, Err(SwapError::SerializationError(_))));
    }
}
