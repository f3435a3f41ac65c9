//! Amount conversion command.

use anyhow::Result;
use buylock_commerce::{format_amount, Amount, Currency, BASE_CURRENCY};
use serde::Serialize;

use super::ConvertArgs;
use crate::context::Context;

#[derive(Serialize)]
struct Conversion {
    input: String,
    from: Currency,
    to: Currency,
    amount: f64,
    formatted: String,
}

/// Run the convert command.
pub async fn run(args: ConvertArgs, ctx: &Context) -> Result<()> {
    let from = parse_currency(args.from.as_deref())?.unwrap_or(BASE_CURRENCY);
    let to = parse_currency(args.to.as_deref())?;

    let (session, _) = ctx.storefront().await?;
    let service = &session.currency;
    let to = to.unwrap_or_else(|| service.current());

    let amount = match service.convert_between(Amount::from(args.amount.as_str()), from, to) {
        Ok(amount) => amount,
        Err(e) => {
            ctx.output.warn(&format!("{}; treating it as 0", e));
            0.0
        }
    };

    let conversion = Conversion {
        input: args.amount,
        from,
        to,
        amount,
        formatted: format_amount(amount, to),
    };

    if ctx.output.is_json() {
        ctx.output.json(&conversion);
        return Ok(());
    }

    ctx.output.debug(&format!(
        "{} -> {} ({} rate table entries)",
        from,
        to,
        service.rates().len()
    ));
    println!("{}", conversion.formatted);
    Ok(())
}

fn parse_currency(code: Option<&str>) -> Result<Option<Currency>> {
    Ok(code.map(str::parse::<Currency>).transpose()?)
}
