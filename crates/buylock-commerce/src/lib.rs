//! Client-side commerce state for the BuyLock marketplace.
//!
//! Prices are stored in Kenyan shillings (the base currency). This crate
//! provides:
//!
//! - **Currencies**: the supported display currencies and amount parsing
//! - **Rates**: rate tables, a cached exchange-rate provider and its fallback
//! - **Conversion**: base-pivoted conversion and display formatting
//! - **Cart**: a guest cart persisted to durable storage
//!
//! # Example
//!
//! ```rust,ignore
//! use buylock_commerce::prelude::*;
//! use buylock_store::{FileBackend, Store};
//!
//! let store = Store::new(FileBackend::open(".buylock")?);
//! let source = HttpRateSource::new(endpoint, Duration::from_secs(10))?;
//! let provider = ExchangeRateProvider::new(store.clone(), Arc::new(source));
//!
//! let (mut session, _) = Storefront::start(store, &provider).await;
//! session.currency.select(Currency::USD);
//! session.cart.add(NewCartLine::product("p1", 2))?;
//! println!("Total: {}", session.cart_total_display(None));
//! ```

pub mod amount;
pub mod cart;
pub mod context;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod ids;
pub mod provider;
pub mod rates;
pub mod storefront;

pub use amount::Amount;
pub use context::CurrencyService;
pub use conversion::{convert, format_amount};
pub use currency::{Currency, BASE_CURRENCY};
pub use error::CommerceError;
pub use ids::*;
pub use rates::RateTable;
pub use storefront::Storefront;

/// Storage keys shared with the web storefront.
pub mod keys {
    use buylock_store::store_key;

    const PREFIX: &str = "buylock";

    /// Selected display currency code.
    pub fn currency() -> String {
        store_key!(PREFIX, "currency")
    }

    /// Cached rate table.
    pub fn exchange_rates() -> String {
        store_key!(PREFIX, "exchange_rates")
    }

    /// Fetch time of the cached rate table, in epoch milliseconds.
    pub fn exchange_rates_timestamp() -> String {
        store_key!(PREFIX, "exchange_rates_timestamp")
    }

    /// Guest cart lines.
    pub fn guest_cart() -> String {
        store_key!(PREFIX, "guest_cart")
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::amount::Amount;
    pub use crate::context::CurrencyService;
    pub use crate::conversion::{convert, format_amount};
    pub use crate::currency::{Currency, BASE_CURRENCY};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::rates::RateTable;
    pub use crate::storefront::Storefront;

    // Rates
    pub use crate::provider::{
        Clock, ExchangeRateProvider, HttpRateSource, RateLoad, RateOrigin, RateSource,
        SystemClock,
    };

    // Cart
    pub use crate::cart::{Appointment, CartLine, CatalogSnapshot, GuestCart, NewCartLine};
}
