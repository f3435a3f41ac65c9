//! Display currency commands.

use anyhow::{Context as _, Result};
use buylock_commerce::{Currency, CurrencyService, RateTable};
use serde::Serialize;

use super::{CurrencyArgs, CurrencyCommand};
use crate::context::Context;

/// Run the currency command.
pub async fn run(args: CurrencyArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CurrencyCommand::List) => list_currencies(ctx).await,
        Some(CurrencyCommand::Show) | None => show_currency(ctx),
        Some(CurrencyCommand::Set { code }) => set_currency(&code, ctx),
    }
}

#[derive(Serialize)]
struct CurrencyRow {
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    flag: &'static str,
    rate: Option<f64>,
    selected: bool,
}

async fn list_currencies(ctx: &Context) -> Result<()> {
    let (session, _) = ctx.storefront().await?;
    let service = &session.currency;

    let rows: Vec<CurrencyRow> = service
        .supported()
        .iter()
        .map(|c| CurrencyRow {
            code: c.code(),
            name: c.name(),
            symbol: c.symbol(),
            flag: c.flag(),
            rate: service.rates().get(*c),
            selected: *c == service.current(),
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Supported Currencies");
    let widths = [1, 2, 4, 4, 12, 20];
    ctx.output
        .table_header(&["", "", "CODE", "SYM", "RATE", "NAME"], &widths);
    for row in &rows {
        let marker = if row.selected { "*" } else { " " };
        let rate = row
            .rate
            .map_or_else(|| "-".to_string(), |r| format!("{:.6}", r));
        ctx.output.table_row(
            &[marker, row.flag, row.code, row.symbol, &rate, row.name],
            &widths,
        );
    }

    Ok(())
}

fn show_currency(ctx: &Context) -> Result<()> {
    let service = CurrencyService::restore(ctx.store()?, RateTable::new());
    let current = service.current();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "code": current.code(),
            "name": current.name(),
            "symbol": current.symbol(),
        }));
        return Ok(());
    }

    ctx.output
        .info(&format!("{} {} ({})", current.flag(), current.code(), current.name()));
    Ok(())
}

fn set_currency(code: &str, ctx: &Context) -> Result<()> {
    let currency: Currency = code
        .parse()
        .with_context(|| format!("Choose one of: {}", supported_codes()))?;

    let mut service = CurrencyService::restore(ctx.store()?, RateTable::new());
    let previous = service.current();
    service.select(currency);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "previous": previous.code(),
            "current": currency.code(),
        }));
        return Ok(());
    }

    ctx.output
        .success(&format!("Display currency set to {} ({})", currency, currency.name()));
    Ok(())
}

fn supported_codes() -> String {
    Currency::ALL
        .iter()
        .map(Currency::code)
        .collect::<Vec<_>>()
        .join(", ")
}
