//! Guest cart commands.

use anyhow::{bail, Result};
use buylock_commerce::cart::{Appointment, CartLine, CatalogSnapshot, GuestCart, NewCartLine};
use buylock_commerce::{Amount, Currency, LineItemId, VendorId, BASE_CURRENCY};
use dialoguer::Confirm;
use serde::Serialize;

use super::{AddArgs, CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CartCommand::Show { currency }) => show_cart(currency.as_deref(), ctx).await,
        None => show_cart(None, ctx).await,
        Some(CartCommand::Add(add)) => add_item(add, ctx),
        Some(CartCommand::Update { id, quantity }) => update_quantity(&id, quantity, ctx),
        Some(CartCommand::Remove { id }) => remove_line(&id, ctx),
        Some(CartCommand::Clear { yes }) => clear_cart(yes, ctx),
        Some(CartCommand::Checkout) => checkout(ctx),
    }
}

#[derive(Serialize)]
struct CartSummary<'a> {
    currency: Currency,
    lines: &'a [CartLine],
    count: u64,
    total: f64,
    formatted_total: String,
}

async fn show_cart(currency: Option<&str>, ctx: &Context) -> Result<()> {
    let display = currency.map(str::parse::<Currency>).transpose()?;

    let (session, _) = ctx.storefront().await?;
    let cart = &session.cart;
    let prices = &session.currency;
    let display_currency = display.unwrap_or_else(|| prices.current());

    if ctx.output.is_json() {
        ctx.output.json(&CartSummary {
            currency: display_currency,
            lines: cart.lines(),
            count: cart.count(),
            total: prices.convert_between(cart.total(), BASE_CURRENCY, display_currency)?,
            formatted_total: session.cart_total_display(display),
        });
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    ctx.output.header("Guest Cart");
    let widths = [18, 28, 5, 14, 14];
    ctx.output
        .table_header(&["ID", "ITEM", "QTY", "UNIT", "SUBTOTAL"], &widths);
    for line in cart.lines() {
        let unit = line
            .unit_price()
            .map_or_else(|| "-".to_string(), |p| prices.format(p, display));
        ctx.output.table_row(
            &[
                line.id.as_str(),
                &describe(line),
                &line.quantity.to_string(),
                &unit,
                &prices.format(line.subtotal(), display),
            ],
            &widths,
        );

        if let Some(appointment) = &line.appointment {
            ctx.output.list_item(&describe_appointment(appointment));
        }
    }

    ctx.output.info("");
    ctx.output.kv("items", &cart.count().to_string());
    ctx.output.total("total", &session.cart_total_display(display));
    Ok(())
}

fn add_item(args: AddArgs, ctx: &Context) -> Result<()> {
    let item = build_line(args)?;
    let mut cart = GuestCart::open(ctx.store()?);
    let id = cart.add(item)?;

    if ctx.output.is_json() {
        ctx.output.json(&cart.get(&id));
        return Ok(());
    }

    let quantity = cart.get(&id).map_or(0, |line| line.quantity);
    ctx.output
        .success(&format!("Line {} now has quantity {}", id, quantity));
    Ok(())
}

fn build_line(args: AddArgs) -> Result<NewCartLine> {
    let mut item = match (args.product, args.service) {
        (Some(product), None) => NewCartLine::product(product, args.quantity),
        (None, Some(service)) => NewCartLine::service(service, args.quantity),
        _ => bail!("Specify exactly one of --product or --service"),
    };

    if args.name.is_some() || args.price.is_some() || args.vendor.is_some() {
        let id = item
            .product_id
            .as_ref()
            .map(|id| id.to_string())
            .or_else(|| item.service_id.as_ref().map(|id| id.to_string()))
            .unwrap_or_default();

        let snapshot = CatalogSnapshot {
            id,
            name: args.name.unwrap_or_default(),
            price: args.price.map(Amount::from),
            vendor_id: args.vendor.map(VendorId::from),
            ..CatalogSnapshot::default()
        };
        item = item.with_snapshot(snapshot);
    }

    if let Some(date) = args.date {
        item = item.with_appointment(Appointment {
            date,
            time: args.time,
            duration_minutes: args.duration,
            notes: args.notes,
        });
    }

    Ok(item)
}

fn update_quantity(id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let mut cart = GuestCart::open(ctx.store()?);
    let id = LineItemId::new(id);

    if !cart.update_quantity(&id, quantity) {
        bail!("No cart line with ID {}", id);
    }

    match cart.get(&id) {
        Some(line) => ctx
            .output
            .success(&format!("Line {} quantity set to {}", id, line.quantity)),
        None => ctx.output.success(&format!("Removed line {}", id)),
    }
    if ctx.output.is_json() {
        ctx.output.json(&cart.get(&id));
    }
    Ok(())
}

fn remove_line(id: &str, ctx: &Context) -> Result<()> {
    let mut cart = GuestCart::open(ctx.store()?);
    let id = LineItemId::new(id);

    if cart.remove(&id) {
        ctx.output.success(&format!("Removed line {}", id));
    } else {
        ctx.output.info(&format!("No cart line with ID {}", id));
    }
    Ok(())
}

fn clear_cart(yes: bool, ctx: &Context) -> Result<()> {
    let mut cart = GuestCart::open(ctx.store()?);

    if !cart.is_empty() && !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", cart.count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cart left unchanged");
            return Ok(());
        }
    }

    cart.clear();
    ctx.output.success("Cart cleared");
    Ok(())
}

fn checkout(ctx: &Context) -> Result<()> {
    let mut cart = GuestCart::open(ctx.store()?);
    if cart.is_empty() {
        bail!("Cart is empty; nothing to check out");
    }

    let lines = cart.take_for_checkout();
    ctx.output.json(&lines);
    ctx.output
        .debug(&format!("handed off {} lines", lines.len()));
    Ok(())
}

fn describe(line: &CartLine) -> String {
    if let Some(name) = line.name() {
        return name.to_string();
    }
    match (&line.product_id, &line.service_id) {
        (Some(product), _) => format!("product {}", product),
        (None, Some(service)) => format!("service {}", service),
        (None, None) => "(unknown item)".to_string(),
    }
}

fn describe_appointment(appointment: &Appointment) -> String {
    let mut text = format!("booked for {}", appointment.date);
    if let Some(time) = appointment.time {
        text.push_str(&format!(" at {}", time.format("%H:%M")));
    }
    if let Some(minutes) = appointment.duration_minutes {
        text.push_str(&format!(" ({} min)", minutes));
    }
    if let Some(notes) = &appointment.notes {
        text.push_str(&format!(" - {}", notes));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn add_args() -> AddArgs {
        AddArgs {
            product: None,
            service: None,
            quantity: 1,
            name: None,
            price: None,
            vendor: None,
            date: None,
            time: None,
            duration: None,
            notes: None,
        }
    }

    #[test]
    fn test_build_product_line_with_snapshot() {
        let item = build_line(AddArgs {
            product: Some("p1".to_string()),
            quantity: 3,
            name: Some("Maasai shuka".to_string()),
            price: Some("1200".to_string()),
            ..add_args()
        })
        .unwrap();

        assert_eq!(item.quantity, 3);
        let snapshot = item.product.unwrap();
        assert_eq!(snapshot.id, "p1");
        assert_eq!(snapshot.price.unwrap().value().unwrap(), 1200.0);
        assert!(item.service.is_none());
    }

    #[test]
    fn test_build_service_line_with_appointment() {
        let item = build_line(AddArgs {
            service: Some("s1".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 11, 2),
            duration: Some(90),
            ..add_args()
        })
        .unwrap();

        assert!(item.product.is_none());
        let appointment = item.appointment.unwrap();
        assert_eq!(appointment.duration_minutes, Some(90));
        assert!(describe_appointment(&appointment).contains("2026-11-02"));
    }

    #[test]
    fn test_build_line_requires_one_reference() {
        assert!(build_line(add_args()).is_err());
    }
}
