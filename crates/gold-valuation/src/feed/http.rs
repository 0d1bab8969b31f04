//! HTTP Quote Feed
//!
//! Public JSON endpoints that need no API key: gold-api.com for spot gold
//! and open.er-api.com for USD exchange rates.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{FxRateFeed, SpotPriceFeed};
use crate::config::ValuationConfig;
use crate::error::FetchError;

pub struct HttpQuoteFeed {
    client: reqwest::Client,
    spot_price_url: String,
    fx_rate_url: String,
}

impl HttpQuoteFeed {
    pub fn new(
        spot_price_url: impl Into<String>,
        fx_rate_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            spot_price_url: spot_price_url.into(),
            fx_rate_url: fx_rate_url.into(),
        })
    }

    pub fn from_config(config: &ValuationConfig) -> Result<Self, FetchError> {
        Self::new(
            config.spot_price_url.clone(),
            config.fx_rate_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SpotPriceFeed for HttpQuoteFeed {
    async fn fetch_spot_price_usd_per_oz(&self) -> Result<Decimal, FetchError> {
        let body = self.get_json(&self.spot_price_url).await?;
        let price = parse_spot_price(&body)?;
        tracing::debug!(%price, "Fetched spot price");
        Ok(price)
    }

    fn name(&self) -> &str {
        "gold-api.com"
    }
}

#[async_trait]
impl FxRateFeed for HttpQuoteFeed {
    async fn fetch_fx_rate(&self, currency: &str) -> Result<Decimal, FetchError> {
        let body = self.get_json(&self.fx_rate_url).await?;
        let rate = parse_fx_rate(&body, currency)?;
        tracing::debug!(%rate, currency, "Fetched exchange rate");
        Ok(rate)
    }
}

/// `{"price": 3063.48, ...}`
fn parse_spot_price(body: &Value) -> Result<Decimal, FetchError> {
    let price = body
        .get("price")
        .ok_or_else(|| FetchError::MissingField("price".into()))?;
    let price = json_decimal(price)?;
    if price <= Decimal::ZERO {
        return Err(FetchError::NoPrice(format!("feed reported {price}")));
    }
    Ok(price)
}

/// `{"rates": {"TWD": 33.07, ...}, ...}`
fn parse_fx_rate(body: &Value, currency: &str) -> Result<Decimal, FetchError> {
    let rate = body
        .get("rates")
        .and_then(|rates| rates.get(currency))
        .ok_or_else(|| FetchError::MissingField(format!("rates.{currency}")))?;
    json_decimal(rate)
}

fn json_decimal(value: &Value) -> Result<Decimal, FetchError> {
    let number = value
        .as_f64()
        .ok_or_else(|| FetchError::Decode(format!("expected a number, got {value}")))?;
    Decimal::try_from(number).map_err(|e| FetchError::Decode(e.to_string()))
}
