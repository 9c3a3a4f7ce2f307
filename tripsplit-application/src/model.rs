use rust_decimal::Decimal;
use serde::Serialize;
use tripsplit_domain::{
    Category, CurrencyCode, ExpenseId, ExpenseSummary, MemberId, Money, RateTable, SplitPolicy,
    Transfer, TravelSnapshot,
};

/// An expense as submitted, before rate resolution and splitting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub id: ExpenseId,
    /// Amount in `currency`.
    pub amount: Money,
    pub currency: CurrencyCode,
    /// Overrides the travel's rate table for this expense only.
    pub custom_rate: Option<Decimal>,
    pub payer: MemberId,
    pub participants: Vec<MemberId>,
    pub split: SplitPolicy,
    pub description: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TravelDraft {
    pub name: String,
    pub members: Vec<MemberId>,
    pub rates: RateTable,
    pub expenses: Vec<ExpenseDraft>,
}

/// A travel whose expenses have all been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTravel {
    pub name: String,
    pub settlement_currency: CurrencyCode,
    pub snapshot: TravelSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonBalance {
    pub id: MemberId,
    pub paid: Money,
    pub owed: Money,
    pub net: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementResult {
    pub travel: String,
    pub settlement_currency: CurrencyCode,
    pub balances: Vec<PersonBalance>,
    pub transfers: Vec<Transfer>,
    pub summary: ExpenseSummary,
}
