//! Soroban RPC client: polls `getEvents` and decodes registry events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC is unreachable, rate-limits
//!   us, or returns a soft error, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Invalid-request / unknown-method errors are returned immediately.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, RegistryEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// JSON-RPC codes that signal a malformed request rather than a transient fault.
const HARD_ERROR_CODES: [i64; 2] = [-32600, -32601];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Decoded topic list.
    pub topic: Vec<String>,
    /// Decoded event data.
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of events plus what is needed to request the next one.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Fetching
// ─────────────────────────────────────────────────────────

/// Fetch a page of events for `contract_id`.
///
/// When `cursor` is set it takes precedence over `start_ledger`, so a
/// partially consumed ledger range is resumed exactly.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = INITIAL_BACKOFF_SECS;
    let params = build_params(contract_id, start_ledger, cursor, limit);

    loop {
        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = sleep_and_grow(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if HARD_ERROR_CODES.contains(&err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let result = body
            .result
            .ok_or_else(|| IndexerError::Decode("Empty result from getEvents".to_string()))?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

async fn sleep_and_grow(backoff: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(backoff)).await;
    next_backoff(backoff)
}

fn next_backoff(current: u64) -> u64 {
    (current * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events into [`RegistryEvent`]s.
///
/// Events from failed contract calls and events without a topic are skipped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<RegistryEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<RegistryEvent> {
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let donation_id = if kind.is_per_donation() {
        raw.topic.get(1).map(|t| extract_scalar_topic(t))
    } else {
        None
    };

    let data = decode_data(&raw.value, kind);

    let event_id = raw.id.clone().unwrap_or_else(|| {
        format!(
            "{}-{}-{}-{}",
            ledger,
            raw.tx_hash.as_deref().unwrap_or("-"),
            kind.as_str(),
            donation_id.as_deref().unwrap_or("-")
        )
    });

    Some(RegistryEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        donation_id,
        actor: data.actor,
        value: data.value,
        content_hash: data.content_hash,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

#[derive(Debug, Default, PartialEq)]
struct DecodedData {
    actor: Option<String>,
    value: Option<String>,
    content_hash: Option<String>,
}

/// Pull the interesting fields out of the event data object.
fn decode_data(value: &Value, kind: EventKind) -> DecodedData {
    match kind {
        EventKind::DonationRegistered => DecodedData {
            actor: extract_field(value, &["owner"]),
            value: extract_field(value, &["fee"]),
            content_hash: value.get("content_hash").and_then(normalize_hash),
        },
        EventKind::DonationUpdated => DecodedData {
            actor: extract_field(value, &["updater"]),
            value: extract_field(value, &["quantity"]),
            content_hash: None,
        },
        EventKind::StatusChanged => DecodedData {
            value: extract_field(value, &["active"]),
            ..Default::default()
        },
        EventKind::RecipientAssigned => DecodedData {
            actor: extract_field(value, &["recipient"]),
            ..Default::default()
        },
        EventKind::AuthoritySet => DecodedData {
            actor: extract_field(value, &["authority"]).or_else(|| scalar_to_string(value)),
            ..Default::default()
        },
        EventKind::FeeChanged => DecodedData {
            value: extract_field(value, &["fee"]),
            ..Default::default()
        },
        EventKind::MaxDonationsChanged => DecodedData {
            value: extract_field(value, &["max_donations"]),
            ..Default::default()
        },
        EventKind::Unknown => DecodedData::default(),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(scalar_to_string)
}

/// Render a scalar as a string. Typed wrappers such as
/// `{"address": "G..."}` or `{"u64": "5"}` are unwrapped.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) if map.len() == 1 => map.values().next().and_then(scalar_to_string),
        _ => None,
    }
}

/// Normalize a content hash to lower-case hex. Accepts a hex string, a
/// byte array, or either wrapped as `{"bytes": ...}`.
fn normalize_hash(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => hex::decode(s).ok().map(hex::encode),
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(hex::encode),
        Value::Object(map) => map.get("bytes").and_then(normalize_hash),
        _ => None,
    }
}

/// Extract a Soroban Symbol from the decoded topic string.
/// The RPC may return `{"type":"symbol","value":"created"}` or just the raw string.
fn extract_symbol(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v.get("value").and_then(|x| x.as_str()).map(String::from))
        .unwrap_or_else(|| raw.to_string())
}

/// Extract a numeric or string topic (the donation ID).
fn extract_scalar_topic(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(inner) = v.get("value").and_then(scalar_to_string) {
            return inner;
        }
    }
    raw.to_string()
}

/// Parse an RFC 3339 timestamp into Unix seconds.
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
