//! JSON travel documents.
//!
//! ```json
//! {
//!   "name": "Kyoto",
//!   "settlementCurrency": "CNY",
//!   "members": ["A", "B"],
//!   "exchangeRates": { "USD": 7.1 },
//!   "expenses": [
//!     { "amount": 10, "currency": "USD", "payer": "A", "participants": ["A", "B"],
//!       "splitMode": "equal", "description": "ramen", "category": "food" }
//!   ]
//! }
//! ```
//!
//! `ratios` (percentages) is required for `ratio` splits and `splits` (amounts)
//! for `custom` splits. `rate` on an expense overrides the travel's rate table.

use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use serde::Deserialize;
use tripsplit_application::{ExpenseDraft, TravelDraft, TravelParseError, TravelParser};
use tripsplit_domain::{
    Category, CurrencyCode, ExchangeRate, ExpenseId, MemberId, Money, RateTable, SplitMode,
    SplitPolicy,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTravelParser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TravelDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    settlement_currency: Option<CurrencyCode>,
    members: Vec<MemberId>,
    #[serde(default)]
    exchange_rates: IndexMap<CurrencyCode, Decimal>,
    #[serde(default)]
    expenses: Vec<ExpenseDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseDocument {
    #[serde(default)]
    id: Option<ExpenseId>,
    amount: Money,
    #[serde(default)]
    currency: Option<CurrencyCode>,
    #[serde(default)]
    rate: Option<Decimal>,
    payer: MemberId,
    participants: Vec<MemberId>,
    #[serde(default = "default_split_mode")]
    split_mode: SplitMode,
    #[serde(default)]
    ratios: Option<IndexMap<MemberId, Decimal>>,
    #[serde(default)]
    splits: Option<IndexMap<MemberId, Money>>,
    #[serde(default, alias = "desc")]
    description: String,
    #[serde(default)]
    category: Category,
}

fn default_split_mode() -> SplitMode {
    SplitMode::Equal
}

impl TravelParser for JsonTravelParser {
    fn parse(&self, content: &str) -> Result<TravelDraft, TravelParseError> {
        let document: TravelDocument =
            serde_json::from_str(content).map_err(|err| TravelParseError::Syntax {
                line: err.line(),
                column: err.column(),
                detail: err.to_string(),
            })?;

        let mut members = IndexSet::with_capacity(document.members.len());
        for member in document.members {
            if members.contains(&member) {
                return Err(TravelParseError::DuplicateMember(member));
            }
            members.insert(member);
        }

        let rates = rate_table(document.settlement_currency, document.exchange_rates)?;

        let mut expense_ids = IndexSet::with_capacity(document.expenses.len());
        let mut expenses = Vec::with_capacity(document.expenses.len());
        for (index, expense) in document.expenses.into_iter().enumerate() {
            let draft = expense_draft(index, expense, rates.settlement_currency())?;
            if !expense_ids.insert(draft.id.clone()) {
                return Err(TravelParseError::DuplicateExpense(draft.id));
            }
            expenses.push(draft);
        }

        tracing::debug!(
            travel = %document.name,
            member_count = members.len(),
            expense_count = expenses.len(),
            "Parsed travel document"
        );

        Ok(TravelDraft {
            name: document.name,
            members: members.into_iter().collect(),
            rates,
            expenses,
        })
    }
}

fn rate_table(
    settlement_currency: Option<CurrencyCode>,
    overrides: IndexMap<CurrencyCode, Decimal>,
) -> Result<RateTable, TravelParseError> {
    let mut table = match settlement_currency {
        Some(code) if code != CurrencyCode::cny() => RateTable::new(code),
        _ => RateTable::cny_default(),
    };
    for (currency, rate) in overrides {
        let rate = ExchangeRate::try_new(rate).map_err(|err| TravelParseError::InvalidField {
            field: format!("exchangeRates.{currency}"),
            detail: err.to_string(),
        })?;
        table.insert(currency, rate);
    }
    Ok(table)
}

fn expense_draft(
    index: usize,
    expense: ExpenseDocument,
    settlement_currency: &CurrencyCode,
) -> Result<ExpenseDraft, TravelParseError> {
    let missing = |field: &str| TravelParseError::InvalidField {
        field: format!("expenses[{index}].{field}"),
        detail: format!("required for `{:?}` splits", expense.split_mode).to_lowercase(),
    };

    let split = match expense.split_mode {
        SplitMode::Equal => SplitPolicy::Equal,
        SplitMode::Specific => SplitPolicy::Specific,
        SplitMode::Ratio => {
            SplitPolicy::Ratio(expense.ratios.ok_or_else(|| missing("ratios"))?)
        }
        SplitMode::Custom => {
            SplitPolicy::Custom(expense.splits.ok_or_else(|| missing("splits"))?)
        }
    };

    Ok(ExpenseDraft {
        id: expense
            .id
            .unwrap_or_else(|| ExpenseId::new((index + 1).to_string())),
        amount: expense.amount,
        currency: expense
            .currency
            .unwrap_or_else(|| settlement_currency.clone()),
        custom_rate: expense.rate,
        payer: expense.payer,
        participants: expense.participants,
        split,
        description: expense.description,
        category: expense.category,
    })
}
