//! Selected display currency plus the rate table it converts with.

use buylock_store::Store;

use crate::amount::Amount;
use crate::conversion;
use crate::currency::{Currency, BASE_CURRENCY};
use crate::error::CommerceError;
use crate::keys;
use crate::rates::RateTable;

/// Holds the current display currency and the active rate table.
///
/// Created once at start-up and handed to whatever renders prices. Selecting
/// a currency is a pure state change; the chosen code is also written to
/// durable storage so the next session starts with it.
#[derive(Debug, Clone)]
pub struct CurrencyService {
    store: Store,
    current: Currency,
    rates: RateTable,
}

impl CurrencyService {
    /// Create a service showing the base currency.
    pub fn new(store: Store, rates: RateTable) -> Self {
        Self {
            store,
            current: BASE_CURRENCY,
            rates,
        }
    }

    /// Create a service showing the previously selected currency.
    ///
    /// Falls back to the base currency when nothing usable was stored.
    pub fn restore(store: Store, rates: RateTable) -> Self {
        let current = match Self::stored_currency(&store) {
            Ok(Some(currency)) => currency,
            Ok(None) => BASE_CURRENCY,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored currency");
                BASE_CURRENCY
            }
        };

        Self {
            store,
            current,
            rates,
        }
    }

    /// Read the persisted currency selection.
    pub fn stored_currency(store: &Store) -> Result<Option<Currency>, CommerceError> {
        let code: Option<String> = store.get(&keys::currency())?;
        code.map(|code| code.parse()).transpose()
    }

    /// Every currency the shopper can pick.
    pub fn supported(&self) -> &'static [Currency] {
        &Currency::ALL
    }

    /// The current display currency.
    pub fn current(&self) -> Currency {
        self.current
    }

    /// The active rate table.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Replace the active rate table.
    pub fn set_rates(&mut self, rates: RateTable) {
        self.rates = rates;
    }

    /// Select a display currency and remember it.
    pub fn select(&mut self, currency: Currency) {
        self.current = currency;
        self.persist();
    }

    /// Write the current selection to storage. Failures are logged only.
    pub fn persist(&self) {
        if let Err(e) = self.store.set(&keys::currency(), self.current.code()) {
            tracing::warn!(error = %e, currency = %self.current, "failed to save currency");
        }
    }

    /// Convert a number from `from` into the current currency.
    pub fn convert(&self, amount: f64, from: Currency) -> f64 {
        conversion::convert(amount, from, self.current, &self.rates)
    }

    /// Convert between two arbitrary currencies with the active rates.
    pub fn convert_between(
        &self,
        amount: impl Into<Amount>,
        from: Currency,
        to: Currency,
    ) -> Result<f64, CommerceError> {
        conversion::convert_amount(amount, from, to, &self.rates)
    }

    /// Render a base-currency amount in the current currency, or in
    /// `display` when given. Unparsable amounts render as zero.
    pub fn format(&self, amount: impl Into<Amount>, display: Option<Currency>) -> String {
        conversion::format(amount, display.unwrap_or(self.current), &self.rates)
    }

    /// Like [`format`](Self::format), but reports unparsable amounts.
    pub fn try_format(
        &self,
        amount: impl Into<Amount>,
        display: Option<Currency>,
    ) -> Result<String, CommerceError> {
        conversion::try_format(amount, display.unwrap_or(self.current), &self.rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buylock_store::MemoryBackend;

    fn rates() -> RateTable {
        [("KES", 1.0), ("USD", 0.0062), ("GBP", 0.005)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_starts_in_base_currency() {
        let service = CurrencyService::new(Store::new(MemoryBackend::new()), rates());
        assert_eq!(service.current(), Currency::KES);
        assert_eq!(service.format(1500.0, None), "KSh 1,500");
    }

    #[test]
    fn test_select_persists_for_next_session() {
        let store = Store::new(MemoryBackend::new());
        let mut service = CurrencyService::new(store.clone(), rates());
        service.select(Currency::USD);
        assert_eq!(service.format(1000.0, None), "$6.20");

        let restored = CurrencyService::restore(store, rates());
        assert_eq!(restored.current(), Currency::USD);
    }

    #[test]
    fn test_restore_ignores_unknown_code() {
        let store = Store::new(MemoryBackend::new());
        store.set(&keys::currency(), "DOGE").unwrap();

        assert!(CurrencyService::stored_currency(&store).is_err());
        let service = CurrencyService::restore(store, rates());
        assert_eq!(service.current(), Currency::KES);
    }

    #[test]
    fn test_display_override() {
        let mut service = CurrencyService::new(Store::new(MemoryBackend::new()), rates());
        service.select(Currency::USD);
        assert_eq!(service.format("2000", Some(Currency::GBP)), "\u{00a3}10.00");
        assert_eq!(service.format("2000", Some(Currency::KES)), "KSh 2,000");
    }

    #[test]
    fn test_convert_into_current() {
        let mut service = CurrencyService::new(Store::new(MemoryBackend::new()), rates());
        assert_eq!(service.convert(500.0, Currency::KES), 500.0);

        service.select(Currency::GBP);
        assert!((service.convert(1000.0, Currency::KES) - 5.0).abs() < 1e-9);
        let kes = service
            .convert_between(5.0, Currency::GBP, Currency::KES)
            .unwrap();
        assert!((kes - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_garbage_is_zero() {
        let service = CurrencyService::new(Store::new(MemoryBackend::new()), rates());
        for currency in Currency::ALL {
            let label = service.format("not a price", Some(currency));
            assert!(!label.contains("NaN"));
        }
        assert!(service.try_format("not a price", None).is_err());
    }
}
