//! Iron condor scan integration tests: provider → gateway → use case → scanner.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use options_engine::application::ports::{ChainSnapshot, ContractRecord};
use options_engine::application::services::{GatewayConfig, MarketDataGateway};
use options_engine::application::use_cases::{ScanIronCondorsUseCase, ScanOverrides};
use options_engine::config::ScannerConfig;
use options_engine::domain::condor::{LiquidityFilter, RankBy};
use options_engine::infrastructure::marketdata::{InMemoryMarketDataProvider, ProviderOperation};

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
}

fn contract(kind: &str, strike: f64, bid: f64, ask: f64, open_interest: u64) -> ContractRecord {
    let flag = if kind == "call" { 'C' } else { 'P' };
    ContractRecord {
        ticker: Some(format!("O:SPY260320{flag}{:08}", (strike * 1000.0) as u64)),
        contract_type: Some(kind.to_string()),
        expiration_date: Some("2026-03-20".to_string()),
        strike_price: Some(strike),
        bid: Some(bid),
        ask: Some(ask),
        volume: Some(100),
        open_interest: Some(open_interest),
        implied_volatility: Some(0.20),
        ..ContractRecord::default()
    }
}

fn snapshot(open_interest: u64) -> ChainSnapshot {
    ChainSnapshot {
        underlying_price: Some(100.0),
        as_of: Some(Utc.with_ymd_and_hms(2026, 2, 18, 15, 0, 0).unwrap()),
        records: vec![
            contract("put", 85.0, 0.40, 0.45, open_interest),
            contract("put", 90.0, 0.95, 1.00, open_interest),
            contract("put", 95.0, 2.00, 2.05, open_interest),
            contract("call", 105.0, 2.00, 2.05, open_interest),
            contract("call", 110.0, 0.95, 1.00, open_interest),
            contract("call", 115.0, 0.40, 0.45, open_interest),
        ],
    }
}

fn use_case(snapshot: ChainSnapshot) -> (Arc<InMemoryMarketDataProvider>, ScanIronCondorsUseCase) {
    let provider = Arc::new(InMemoryMarketDataProvider::new());
    provider.set_snapshot("SPY", expiry(), snapshot);
    let gateway = MarketDataGateway::new(provider.clone(), GatewayConfig::default());
    (provider, ScanIronCondorsUseCase::new(gateway, ScannerConfig::default()))
}

#[tokio::test]
async fn end_to_end_reference_condor() {
    let (_, scanner) = use_case(snapshot(500));
    let overrides = ScanOverrides {
        max_width_pct: Some(0.05),
        ..ScanOverrides::default()
    };

    let result = scanner.execute("SPY", expiry(), overrides).await.unwrap();

    // Five-dollar wings only: two spreads per side
    assert_eq!(result.evaluated, 4);
    assert_eq!(result.candidates.len(), 4);
    // Best return on risk is the 90/95/105/110 structure
    let condor = &result.candidates[0];
    assert_eq!(condor.put_long.strike, 90.0);
    assert_eq!(condor.put_short.strike, 95.0);
    assert_eq!(condor.call_short.strike, 105.0);
    assert_eq!(condor.call_long.strike, 110.0);
    assert!((condor.credit - 2.00).abs() < 1e-9);
    assert!((condor.put_width - 5.0).abs() < 1e-9);
    assert!((condor.max_loss - 3.00).abs() < 1e-9);
    assert!((condor.max_profit - 2.00).abs() < 1e-9);
    assert!((condor.lower_breakeven - 93.00).abs() < 1e-9);
    assert!((condor.upper_breakeven - 107.00).abs() < 1e-9);
    assert!((result.iv_estimate.unwrap() - 0.20).abs() < 1e-12);
    let pop = condor.probability_of_profit.unwrap();
    assert!(pop > 0.0 && pop < 1.0);
}

#[tokio::test]
async fn wider_search_ranks_every_combination() {
    let (_, scanner) = use_case(snapshot(500));

    let result = scanner
        .execute("SPY", expiry(), ScanOverrides::default())
        .await
        .unwrap();

    // Three credit spreads per side within 10% width
    assert_eq!(result.evaluated, 9);
    assert!(!result.candidates.is_empty());
    for pair in result.candidates.windows(2) {
        assert!(pair[0].return_on_risk >= pair[1].return_on_risk);
    }
}

#[tokio::test]
async fn ranking_and_top_n_overrides_apply() {
    let (_, scanner) = use_case(snapshot(500));
    let overrides = ScanOverrides {
        top_n: Some(2),
        rank_by: Some(RankBy::Credit),
        ..ScanOverrides::default()
    };

    let result = scanner.execute("SPY", expiry(), overrides).await.unwrap();

    assert_eq!(result.candidates.len(), 2);
    assert!(result.candidates[0].credit >= result.candidates[1].credit);
}

#[tokio::test]
async fn illiquid_chain_yields_no_candidates_and_a_note() {
    let (_, scanner) = use_case(snapshot(3));
    let overrides = ScanOverrides {
        liquidity: Some(LiquidityFilter {
            min_open_interest: 100,
            ..LiquidityFilter::default()
        }),
        ..ScanOverrides::default()
    };

    let result = scanner.execute("SPY", expiry(), overrides).await.unwrap();

    assert!(result.candidates.is_empty());
    assert!(
        result
            .notes
            .iter()
            .any(|note| note.contains("no option legs passed the liquidity filters"))
    );
}

#[tokio::test]
async fn repeated_scans_reuse_the_cached_chain() {
    let (provider, scanner) = use_case(snapshot(500));

    scanner
        .execute("SPY", expiry(), ScanOverrides::default())
        .await
        .unwrap();
    scanner
        .execute("spy", expiry(), ScanOverrides::default())
        .await
        .unwrap();

    assert_eq!(provider.calls(ProviderOperation::ChainSnapshot), 1);
}
