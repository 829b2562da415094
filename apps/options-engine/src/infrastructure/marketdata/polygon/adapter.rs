//! Polygon implementation of `MarketDataPort`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;

use super::api_types::{
    ContractReference, LastTradeResponse, OptionSnapshot, Page, PreviousCloseResponse,
};
use super::config::{PolygonConfig, QuoteMode};
use super::http_client::PolygonHttpClient;
use crate::application::ports::{ChainSnapshot, ContractRecord, MarketDataPort, ProviderError};
use crate::domain::market_data::Quote;

/// Page size requested from the contracts reference endpoint.
const CONTRACTS_PAGE_LIMIT: u32 = 1000;

/// Page size requested from the chain snapshot endpoint.
const SNAPSHOT_PAGE_LIMIT: u32 = 250;

/// Polygon REST market data adapter.
///
/// Quotes come from either the last-trade or previous-close endpoint
/// depending on [`QuoteMode`]; run one adapter per mode to get a live source
/// and a daily-history fallback.
#[derive(Debug, Clone)]
pub struct PolygonMarketDataAdapter {
    http: PolygonHttpClient,
    quote_mode: QuoteMode,
    max_pages: usize,
}

impl PolygonMarketDataAdapter {
    /// Create a new Polygon market data adapter.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built.
    pub fn new(config: &PolygonConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: PolygonHttpClient::new(config)?,
            quote_mode: config.quote_mode,
            max_pages: config.max_pages.max(1),
        })
    }

    /// Follow `next_url` cursors up to `max_pages`.
    async fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        subject: &str,
    ) -> Result<Vec<T>, ProviderError> {
        let mut page: Page<T> = self.http.get(path, query, subject).await?;
        let mut items = std::mem::take(&mut page.results);
        let mut pages = 1;

        while let Some(next_url) = page.next_url.take() {
            if pages >= self.max_pages {
                tracing::warn!(
                    subject = %subject,
                    pages,
                    "Page limit reached, listing truncated"
                );
                break;
            }
            if !next_url.starts_with(self.http.base_url()) {
                tracing::warn!(subject = %subject, "Ignoring next_url on a foreign host");
                break;
            }
            page = self.http.get(&next_url, &[], subject).await?;
            items.append(&mut page.results);
            pages += 1;
        }

        tracing::debug!(subject = %subject, pages, items = items.len(), "Listing fetched");
        Ok(items)
    }

    async fn last_trade(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let response: LastTradeResponse = self
            .http
            .get(&format!("/v2/last/trade/{symbol}"), &[], symbol)
            .await?;
        let trade = response.results.ok_or_else(|| ProviderError::NotFound {
            symbol: symbol.to_string(),
        })?;
        let as_of = trade.timestamp_ns.map(DateTime::from_timestamp_nanos);
        Ok(Quote::new(symbol, trade.price, as_of))
    }

    async fn previous_close(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let response: PreviousCloseResponse = self
            .http
            .get(
                &format!("/v2/aggs/ticker/{symbol}/prev"),
                &[("adjusted", "true".to_string())],
                symbol,
            )
            .await?;
        let bar = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound {
                symbol: symbol.to_string(),
            })?;
        let as_of = bar.timestamp_ms.and_then(DateTime::from_timestamp_millis);
        Ok(Quote::new(symbol, bar.close, as_of))
    }
}

#[async_trait]
impl MarketDataPort for PolygonMarketDataAdapter {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        match self.quote_mode {
            QuoteMode::LastTrade => self.last_trade(symbol).await,
            QuoteMode::PreviousClose => self.previous_close(symbol).await,
        }
    }

    async fn list_contracts(&self, symbol: &str) -> Result<Vec<ContractRecord>, ProviderError> {
        let query = [
            ("underlying_ticker", symbol.to_string()),
            ("limit", CONTRACTS_PAGE_LIMIT.to_string()),
        ];
        let references: Vec<ContractReference> = self
            .paginate("/v3/reference/options/contracts", &query, symbol)
            .await?;
        Ok(references.into_iter().map(ContractRecord::from).collect())
    }

    async fn get_chain_snapshot(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<ChainSnapshot, ProviderError> {
        let query = [
            ("expiration_date", expiration.format("%Y-%m-%d").to_string()),
            ("limit", SNAPSHOT_PAGE_LIMIT.to_string()),
        ];
        let snapshots: Vec<OptionSnapshot> = self
            .paginate(&format!("/v3/snapshot/options/{symbol}"), &query, symbol)
            .await?;

        let underlying_price = snapshots.iter().find_map(OptionSnapshot::underlying_price);
        let as_of = snapshots.iter().filter_map(OptionSnapshot::quoted_at).max();
        Ok(ChainSnapshot {
            underlying_price,
            as_of,
            records: snapshots.into_iter().map(ContractRecord::from).collect(),
        })
    }
}
