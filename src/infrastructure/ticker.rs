//! # Price Feed
//!
//! Fetches the BTC spot price from a Coinbase-compatible HTTP endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::traits::{Quote, TickerSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SpotResponse {
    data: SpotData,
}

#[derive(Debug, Deserialize)]
struct SpotData {
    base: String,
    currency: String,
    amount: String,
}

pub struct HttpTicker {
    client: reqwest::Client,
    url: String,
}

impl HttpTicker {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

pub fn parse_spot(body: &str) -> Result<Quote, String> {
    let parsed: SpotResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;
    Ok(Quote {
        base: parsed.data.base,
        currency: parsed.data.currency,
        amount: parsed.data.amount,
    })
}

#[async_trait]
impl TickerSource for HttpTicker {
    async fn spot_price(&self) -> Result<Quote, String> {
        let response = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        parse_spot(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spot() {
        let body = r#"{"data":{"base":"BTC","currency":"USD","amount":"64250.12"}}"#;
        let quote = parse_spot(body).unwrap();
        assert_eq!(
            quote,
            Quote {
                base: "BTC".to_string(),
                currency: "USD".to_string(),
                amount: "64250.12".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_spot_rejects_unexpected_shape() {
        assert!(parse_spot(r#"{"errors":[{"id":"not_found"}]}"#).is_err());
        assert!(parse_spot("<html>").is_err());
    }
}
