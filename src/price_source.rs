//! HTTP clients for metal spot prices and currency exchange rates.
//!
//! Each call makes exactly one request bounded by configured timeout. Any
//! failure is returned as `FetchError`, it is up to caller to decide what to
//! do about missing values. There are no retries here, that is scheduler's
//! concern.



use async_trait::async_trait;

use reqwest::{
    Client,
    RequestBuilder,
};

use serde::Deserialize;

use serde_json::{
    Map,
    Value,
};

use tracing::debug;

use crate::{
    config::SourceConfig,
    error::FetchError,
    price_info::Metal,
};



/// Metal price providers we know how to talk to.
///
/// `GoldApi` - goldapi.io, token in `x-access-token` header, body `{price}`.
/// `MetalsApi` - key in `access_key` query parameter, body `{success, rate}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GoldApi,
    MetalsApi,
}



impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::GoldApi => "GoldAPI",
            Provider::MetalsApi => "Metals-API",
        }
    }
}



#[async_trait]
pub trait PriceSource {
    /// Spot price of one troy ounce in USD.
    async fn fetch_price(&self, metal: Metal) -> Result<f64, FetchError>;

    /// How much of `quote` currency one unit of `base` buys.
    async fn fetch_exchange_rate(&self, base: &str, quote: &str)
        -> Result<f64, FetchError>;
}



pub struct HttpPriceSource {
    client: Client,
    config: SourceConfig,
}



impl HttpPriceSource {
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self::with_client(config, client))
    }



    /// Use prepared client. Caller is responsible for setting timeout on it.
    pub fn with_client(config: SourceConfig, client: Client) -> Self {
        Self {
            client,
            config,
        }
    }



    fn price_request(&self, metal: Metal) -> Result<RequestBuilder, FetchError> {
        let cfg = &self.config;

        let req = match cfg.provider {
            Provider::GoldApi => {
                let Some(ref key) = cfg.gold_api_key else {
                    return Err(FetchError::MissingCredentials("GOLD_API_KEY"))
                };

                let url = format!("{}/{}/USD", cfg.gold_api_url.trim_end_matches('/'),
                    metal.symbol()
                );

                self.client.get(url)
                    .header("x-access-token", key)
                    .header("Content-Type", "application/json")
            }

            Provider::MetalsApi => {
                let Some(ref key) = cfg.metals_api_key else {
                    return Err(FetchError::MissingCredentials("METALS_API_KEY"))
                };

                let url = format!("{}/{}", cfg.metals_api_url.trim_end_matches('/'),
                    metal.name()
                );

                self.client.get(url)
                    .query(&[("access_key", key)])
            }
        };

        Ok(req)
    }
}



/// Send request and return body of a successful response.
async fn body_get(req: RequestBuilder) -> Result<String, FetchError> {
    let response = req.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status))
    }

    Ok(response.text().await?)
}



#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_price(&self, metal: Metal) -> Result<f64, FetchError> {
        debug!("Fetching {} price from {}", metal, self.config.provider.name());

        let req = self.price_request(metal)?;
        let body = body_get(req).await?;

        price_decode(self.config.provider, &body)
    }



    async fn fetch_exchange_rate(&self, base: &str, quote: &str)
        -> Result<f64, FetchError>
    {
        debug!("Fetching {}/{} rate", base, quote);

        let url = format!("{}/{}", self.config.exchange_rate_url.trim_end_matches('/'),
            base
        );

        let body = body_get(self.client.get(url)).await?;

        rate_decode(&body, quote)
    }
}



/// Deserialized GoldAPI response. Only the field we use is declared.
#[derive(Deserialize, Debug, Clone)]
struct GoldApiBody {
    price: Option<f64>,
}



#[derive(Deserialize, Debug, Clone)]
struct MetalsApiBody {
    success: Option<bool>,
    rate: Option<f64>,
}



#[derive(Deserialize, Debug, Clone)]
struct ExchangeRateBody {
    rates: Option<Map<String, Value>>,
}



/// Extract price per ounce from provider specific response body.
pub fn price_decode(provider: Provider, body: &str) -> Result<f64, FetchError> {
    match provider {
        Provider::GoldApi => {
            let decoded: GoldApiBody = serde_json::from_str(body)?;

            let Some(price) = decoded.price else {
                return Err(FetchError::MissingField("price".to_string()))
            };

            positive(price)
        }

        Provider::MetalsApi => {
            let decoded: MetalsApiBody = serde_json::from_str(body)?;

            match decoded.success {
                Some(true) => {}
                Some(false) => return Err(FetchError::Rejected),
                None => return Err(FetchError::MissingField("success".to_string())),
            }

            let Some(rate) = decoded.rate else {
                return Err(FetchError::MissingField("rate".to_string()))
            };

            positive(rate)
        }
    }
}



/// Extract `quote` entry from `{"rates": {...}}` response body.
pub fn rate_decode(body: &str, quote: &str) -> Result<f64, FetchError> {
    let decoded: ExchangeRateBody = serde_json::from_str(body)?;

    let Some(rates) = decoded.rates else {
        return Err(FetchError::MissingField("rates".to_string()))
    };

    let Some(rate) = rates.get(quote).and_then(Value::as_f64) else {
        return Err(FetchError::MissingField(format!("rates.{}", quote)))
    };

    positive(rate)
}



#[inline]
fn positive(val: f64) -> Result<f64, FetchError> {
    if val.is_finite() && val > 0.0 {
        Ok(val)
    }
    else {
        Err(FetchError::InvalidValue(val))
    }
}
