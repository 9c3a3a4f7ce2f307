//! Conversion of foreign-currency amounts into the settlement currency.
//!
//! Rates are supplied by the travel, never fetched. No rounding happens here:
//! converted amounts keep full decimal precision until they are displayed.

use crate::{
    error::EngineError,
    model::{CurrencyCode, ExchangeRate, Money},
};
use indexmap::IndexMap;
use rust_decimal::Decimal;

pub struct CurrencyConverter;

impl CurrencyConverter {
    /// `amount * rate`. The rate is positive by construction.
    pub fn to_settlement_currency(
        amount: Money,
        rate: ExchangeRate,
    ) -> Result<Money, EngineError> {
        amount
            .checked_mul(rate.as_decimal())
            .ok_or(EngineError::AmountOverflow)
    }
}

/// Per-travel exchange rates into a single settlement currency.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    settlement_currency: CurrencyCode,
    rates: IndexMap<CurrencyCode, ExchangeRate>,
}

impl RateTable {
    pub fn new(settlement_currency: CurrencyCode) -> Self {
        let mut rates = IndexMap::new();
        rates.insert(settlement_currency.clone(), ExchangeRate::ONE);
        Self {
            settlement_currency,
            rates,
        }
    }

    /// CNY settlement with the rates a new travel starts out with.
    pub fn cny_default() -> Self {
        let defaults = [
            ("USD", Decimal::new(72, 1)),
            ("EUR", Decimal::new(78, 1)),
            ("JPY", Decimal::new(5, 2)),
            ("KRW", Decimal::new(55, 4)),
            ("THB", Decimal::new(2, 1)),
        ];

        let mut table = Self::new(CurrencyCode::cny());
        for (code, rate) in defaults {
            table
                .rates
                .insert(CurrencyCode::new(code), ExchangeRate(rate));
        }
        table
    }

    pub fn settlement_currency(&self) -> &CurrencyCode {
        &self.settlement_currency
    }

    /// Sets the rate for `currency`. The settlement currency stays at 1.
    pub fn insert(&mut self, currency: CurrencyCode, rate: ExchangeRate) {
        if currency == self.settlement_currency {
            return;
        }
        self.rates.insert(currency, rate);
    }

    pub fn with_rate(mut self, currency: CurrencyCode, rate: ExchangeRate) -> Self {
        self.insert(currency, rate);
        self
    }

    pub fn rate_for(&self, currency: &CurrencyCode) -> Result<ExchangeRate, EngineError> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| EngineError::MissingRate(currency.clone()))
    }

    /// Picks the rate for an expense: an explicit custom rate wins over the table.
    pub fn resolve(
        &self,
        currency: &CurrencyCode,
        custom_rate: Option<Decimal>,
    ) -> Result<ExchangeRate, EngineError> {
        match custom_rate {
            Some(rate) => ExchangeRate::try_new(rate),
            None => self.rate_for(currency),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, ExchangeRate)> + '_ {
        self.rates.iter().map(|(code, rate)| (code, *rate))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::cny_default()
    }
}
