//! Sign in and dump one of the wallet lists as JSON lines.
//!
//! Connection settings come from `WALLET_*` environment variables (see
//! `client::config::ClientSettings`); credentials and the list to dump come
//! from the command line. With `--card-rate` and `--amount` the binary also
//! prints a payout quote including the account's VIP bonus.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use client::config::ClientSettings;
use client::domain::stores::CardRate;
use client::domain::{AppStores, Gated, ListOutcome, LoginCredentials, PaginatedListCache, SkipReason};
use client::outbound::rest::{RestApiClient, app_ports};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// List selectable with `--list`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListKind {
    Wallet,
    Notifications,
    Rebates,
    RechargeLogs,
}

/// `wallet-feed` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wallet-feed",
    about = "Dump wallet lists and payout quotes as JSON lines",
    version
)]
struct CliArgs {
    /// Account (phone number or e-mail) to sign in with.
    #[arg(long, value_name = "account")]
    account: String,
    /// Account password.
    #[arg(long, value_name = "password")]
    password: String,
    /// List to dump.
    #[arg(long, value_enum, default_value_t = ListKind::Wallet)]
    list: ListKind,
    /// Maximum number of pages to fetch.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
    /// Card rate for a payout quote.
    #[arg(long = "card-rate", value_name = "rate", requires = "amount")]
    card_rate: Option<Decimal>,
    /// Card face value for a payout quote.
    #[arg(long, value_name = "amount", requires = "card_rate")]
    amount: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;
    runtime.block_on(run(args))
}

/// Install the JSON subscriber on stderr; stdout carries the JSON lines.
fn init_tracing() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| eyre!("tracing init failed: {error}"))
}

async fn run(args: CliArgs) -> Result<()> {
    let settings = ClientSettings::load_from_iter([OsString::from("wallet-feed")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;
    let client = RestApiClient::new(
        settings.api_base_url()?,
        settings.request_timeout()?,
        settings.user_agent(),
    )
    .wrap_err("failed to build HTTP client")?;
    let stores = AppStores::new(app_ports(Arc::new(client)), settings.page_size()?);

    let credentials = LoginCredentials::try_from_parts(&args.account, &args.password)?;
    stores.login(&credentials).await?;

    let mut out = io::stdout().lock();
    let rows = match args.list {
        ListKind::Wallet => dump(stores.wallet(), args.pages, &mut out).await?,
        ListKind::Notifications => dump(stores.notifications(), args.pages, &mut out).await?,
        ListKind::Rebates => dump(stores.rebates(), args.pages, &mut out).await?,
        ListKind::RechargeLogs => dump(stores.recharge_logs(), args.pages, &mut out).await?,
    };
    info!(rows, "list dumped");

    if let (Some(rate), Some(amount)) = (args.card_rate, args.amount.as_deref()) {
        quote(&stores, rate, amount, &mut out).await?;
    }

    stores.logout()?;
    Ok(())
}

async fn dump<T, F>(
    cache: &PaginatedListCache<T, F>,
    pages: u32,
    out: &mut impl Write,
) -> Result<usize>
where
    T: Serialize + Clone + Send + 'static,
    F: Clone + PartialEq + Send + Sync + 'static,
{
    ensure_loaded(cache, cache.refresh().await?)?;
    for _ in 1..pages {
        match cache.load_more().await? {
            ListOutcome::Skipped(SkipReason::Exhausted) => break,
            outcome => ensure_loaded(cache, outcome)?,
        }
    }

    let snapshot = cache.snapshot()?;
    for item in snapshot.collection.items() {
        serde_json::to_writer(&mut *out, item)?;
        writeln!(out)?;
    }
    Ok(snapshot.collection.items().len())
}

fn ensure_loaded<T, F>(cache: &PaginatedListCache<T, F>, outcome: ListOutcome) -> Result<()>
where
    T: Clone + Send + 'static,
    F: Clone + PartialEq + Send + Sync + 'static,
{
    match outcome {
        ListOutcome::Applied => Ok(()),
        ListOutcome::Failed => {
            let snapshot = cache.snapshot()?;
            let reason = snapshot.collection.error().unwrap_or("unknown error");
            Err(eyre!("{} request failed: {reason}", cache.name()))
        }
        ListOutcome::Suppressed => Err(eyre!("session expired; sign in again")),
        other => Err(eyre!("{} was not loaded: {other:?}", cache.name())),
    }
}

async fn quote(
    stores: &AppStores,
    rate: Decimal,
    amount: &str,
    out: &mut impl Write,
) -> Result<()> {
    let calculator = stores.calculator();
    if let Gated::Expired = calculator.sync_vip().await? {
        return Err(eyre!("session expired; sign in again"));
    }
    calculator.select_card(CardRate {
        card_id: "cli".to_owned(),
        currency: "USD".to_owned(),
        rate,
    })?;
    let quote = calculator.quote(amount)?;
    let line = json!({
        "base_payout": quote.base_payout(),
        "bonus_amount": quote.bonus_amount(),
        "payout": quote.display_amount(),
    });
    writeln!(out, "{line}").wrap_err("failed to write quote")
}
