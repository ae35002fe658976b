//! Mock execution engine
//!
//! Stands in for both the chain (purchase confirmation) and the paid API
//! backend (endpoint calls). Latency comes from the injected [`Clock`],
//! randomness from the injected [`EntropySource`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::LedgerConfig;
use crate::entropy::EntropySource;
use crate::types::Identity;

/// Upper bound (exclusive) of `randomNumber` in the random endpoint
pub const RANDOM_NUMBER_BOUND: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiEndpoint {
    Weather,
    Crypto,
    Random,
}

impl ApiEndpoint {
    pub const ALL: [ApiEndpoint; 3] = [Self::Weather, Self::Crypto, Self::Random];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Crypto => "crypto",
            Self::Random => "random",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Weather => "/api/weather",
            Self::Crypto => "/api/crypto",
            Self::Random => "/api/random",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Weather => "Weather API",
            Self::Crypto => "Crypto Prices",
            Self::Random => "Random Data",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Weather => "Get current weather data",
            Self::Crypto => "Get cryptocurrency prices",
            Self::Random => "Generate random UUIDs and numbers",
        }
    }

    /// Match an identifier against endpoint ids and paths (exact)
    pub fn resolve(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.id() == identifier || e.path() == identifier)
    }

    pub fn info(&self) -> EndpointInfo {
        EndpointInfo {
            id: self.id(),
            path: self.path(),
            name: self.name(),
            description: self.description(),
        }
    }
}

/// Catalog entry shown in the playground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointInfo {
    pub id: &'static str,
    pub path: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiPayload {
    Weather(WeatherReport),
    Crypto(CryptoQuote),
    Random(RandomSample),
    Generic(GenericResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: i32,
    pub unit: String,
    pub conditions: String,
    pub humidity: u8,
    pub wind: Wind,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wind {
    pub speed: u32,
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoQuote {
    pub symbol: String,
    pub price: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    pub volume: u64,
    pub market_cap: u64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomSample {
    pub uuid: uuid::Uuid,
    pub random_number: u32,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericResponse {
    pub message: String,
    pub endpoint: String,
}

pub struct MockApiEngine {
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn EntropySource>,
    config: LedgerConfig,
}

impl MockApiEngine {
    pub fn new(
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn EntropySource>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            clock,
            entropy,
            config,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Wait out the simulated confirmation and return a synthetic tx hash
    pub async fn confirm_purchase(&self, identity: &Identity, amount: u64) -> String {
        log::debug!(
            "Simulating purchase confirmation for {} ({} credits, {:?})",
            identity,
            amount,
            self.config.purchase_latency
        );
        self.clock.sleep(self.config.purchase_latency).await;
        self.tx_hash(identity, amount, self.clock.now())
    }

    /// Wait out the simulated round trip and return the endpoint's payload
    pub async fn call(&self, endpoint: &str) -> ApiPayload {
        log::debug!(
            "Simulating API call to '{}' ({:?})",
            endpoint,
            self.config.consumption_latency
        );
        self.clock.sleep(self.config.consumption_latency).await;
        self.payload_for(endpoint, self.clock.now())
    }

    /// Payload for an endpoint at a given instant, without delay
    pub fn payload_for(&self, endpoint: &str, now: DateTime<Utc>) -> ApiPayload {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        match ApiEndpoint::resolve(endpoint) {
            Some(ApiEndpoint::Weather) => ApiPayload::Weather(WeatherReport {
                location: "San Francisco, CA".to_string(),
                temperature: 68,
                unit: "fahrenheit".to_string(),
                conditions: "Partly Cloudy".to_string(),
                humidity: 65,
                wind: Wind {
                    speed: 12,
                    direction: "NW".to_string(),
                },
                timestamp,
            }),
            Some(ApiEndpoint::Crypto) => ApiPayload::Crypto(CryptoQuote {
                symbol: "MON".to_string(),
                price: 2.45,
                change_24h: 5.67,
                volume: 1_250_000_000,
                market_cap: 4_800_000_000,
                timestamp,
            }),
            Some(ApiEndpoint::Random) => {
                let mut bytes = [0u8; 16];
                self.entropy.fill_bytes(&mut bytes);
                ApiPayload::Random(RandomSample {
                    uuid: uuid::Builder::from_random_bytes(bytes).into_uuid(),
                    random_number: self.entropy.below(RANDOM_NUMBER_BOUND),
                    timestamp,
                })
            }
            None => ApiPayload::Generic(GenericResponse {
                message: "Success".to_string(),
                endpoint: endpoint.to_string(),
            }),
        }
    }

    fn tx_hash(&self, identity: &Identity, amount: u64, now: DateTime<Utc>) -> String {
        let mut nonce = [0u8; 32];
        self.entropy.fill_bytes(&mut nonce);

        let mut hasher = Sha256::new();
        hasher.update(identity.as_str().as_bytes());
        hasher.update(amount.to_be_bytes());
        hasher.update(now.timestamp_millis().to_be_bytes());
        hasher.update(nonce);

        format!("0x{}", hex::encode(hasher.finalize()))
    }
}
