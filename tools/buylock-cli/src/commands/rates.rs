//! Exchange rate commands.

use anyhow::Result;
use buylock_commerce::provider::{Clock, RateOrigin, SystemClock};
use buylock_commerce::{Currency, RateTable, BASE_CURRENCY};

use super::RatesArgs;
use crate::context::Context;
use crate::output::format_age;

/// Run the rates command.
pub async fn run(args: RatesArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let provider = ctx.rate_provider(&store)?;

    let spinner = ctx.output.spinner("Loading exchange rates...");
    let load = if args.refresh {
        provider.refresh().await
    } else {
        provider.load().await
    };
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&load);
        return Ok(());
    }

    ctx.output.header("Exchange Rates");
    ctx.output.kv("base", BASE_CURRENCY.code());
    ctx.output.kv("source", origin_label(load.origin));
    if let Some(fetched_at) = load.fetched_at {
        let age = SystemClock.now_ms().saturating_sub(fetched_at);
        ctx.output.kv("fetched", &format!("{} ago", format_age(age)));
    }

    if load.origin == RateOrigin::Fallback {
        ctx.output.warn(&format!(
            "Could not reach {}; showing built-in rates",
            ctx.config.rates.endpoint
        ));
    }

    print_table(&load.table, ctx);

    let missing = load.table.missing();
    if !missing.is_empty() {
        let codes: Vec<&str> = missing.iter().map(Currency::code).collect();
        ctx.output.warn(&format!(
            "No usable rate for {}; amounts in these currencies are shown unconverted",
            codes.join(", ")
        ));
    }

    Ok(())
}

fn origin_label(origin: RateOrigin) -> &'static str {
    match origin {
        RateOrigin::Cache => "cache",
        RateOrigin::Network => "network",
        RateOrigin::Fallback => "fallback",
    }
}

fn print_table(table: &RateTable, ctx: &Context) {
    ctx.output.info("");
    ctx.output.table_header(&["CODE", "RATE", "NAME"], &[6, 14, 24]);
    for (code, rate) in table.iter() {
        let name = Currency::from_code(code).map_or("(unsupported)", |c| c.name());
        ctx.output
            .table_row(&[code, &format!("{:.6}", rate), name], &[6, 14, 24]);
    }
}
