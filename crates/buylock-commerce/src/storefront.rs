//! Per-session bundle of the client-side state.

use buylock_store::Store;

use crate::cart::GuestCart;
use crate::context::CurrencyService;
use crate::currency::Currency;
use crate::provider::{ExchangeRateProvider, RateLoad};

/// Everything a storefront session reads and mutates locally.
///
/// Built once with [`Storefront::start`] and passed to the code that needs
/// it; [`Storefront::close`] writes the final state back.
#[derive(Debug)]
pub struct Storefront {
    pub currency: CurrencyService,
    pub cart: GuestCart,
}

impl Storefront {
    /// Load rates, restore the currency selection and open the guest cart.
    ///
    /// Also returns how the rates were obtained.
    pub async fn start(store: Store, provider: &ExchangeRateProvider) -> (Self, RateLoad) {
        let load = provider.load().await;
        let currency = CurrencyService::restore(store.clone(), load.table.clone());
        let cart = GuestCart::open(store);

        tracing::debug!(
            currency = %currency.current(),
            rates = ?load.origin,
            cart_lines = cart.len(),
            "storefront session started"
        );

        (Self { currency, cart }, load)
    }

    /// Cart total rendered in the current currency, or in `display`.
    pub fn cart_total_display(&self, display: Option<Currency>) -> String {
        self.currency.format(self.cart.total(), display)
    }

    /// Flush state to storage and end the session.
    pub fn close(self) {
        self.currency.persist();
        // A cleared cart has no stored copy; don't recreate one.
        if !self.cart.is_empty() {
            self.cart.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CatalogSnapshot, NewCartLine};
    use crate::error::CommerceError;
    use crate::provider::{FixedClock, RateOrigin, RateSource};
    use crate::rates::RateTable;
    use async_trait::async_trait;
    use buylock_store::MemoryBackend;
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl RateSource for Offline {
        async fn fetch(&self) -> Result<RateTable, CommerceError> {
            Err(CommerceError::RateFetch("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let store = Store::new(MemoryBackend::new());
        let provider = ExchangeRateProvider::new(store.clone(), Arc::new(Offline))
            .with_clock(Arc::new(FixedClock::new(1_000)));

        let (mut session, load) = Storefront::start(store.clone(), &provider).await;
        assert_eq!(load.origin, RateOrigin::Fallback);

        session.currency.select(Currency::USD);
        session
            .cart
            .add(
                NewCartLine::product("p1", 2)
                    .with_snapshot(CatalogSnapshot::new("p1", "Sisal bag", "1000")),
            )
            .unwrap();
        assert_eq!(session.cart_total_display(None), "$15.40");
        assert_eq!(session.cart_total_display(Some(Currency::KES)), "KSh 2,000");
        session.close();

        let (resumed, _) = Storefront::start(store, &provider).await;
        assert_eq!(resumed.currency.current(), Currency::USD);
        assert_eq!(resumed.cart.count(), 2);
    }
}
