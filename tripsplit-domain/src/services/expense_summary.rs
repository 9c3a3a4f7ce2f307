use crate::{
    error::EngineError,
    model::{Category, Money, TravelSnapshot},
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Money,
    /// Share of the grand total, 0-100. Zero when nothing was spent.
    pub percentage: Decimal,
}

/// Travel-wide overview shown next to the settlement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: Money,
    pub expense_count: usize,
    /// `total / member count`, zero for a travel without members.
    pub per_person: Money,
    pub categories: Vec<CategoryTotal>,
}

impl ExpenseSummary {
    /// Fails with [`EngineError::AmountOverflow`] when the grand total leaves the
    /// `Decimal` range.
    pub fn from_snapshot(snapshot: &TravelSnapshot) -> Result<Self, EngineError> {
        let expenses = snapshot.expenses();
        let total = Money::checked_sum(expenses.iter().map(|e| e.settlement_amount))
            .ok_or(EngineError::AmountOverflow)?;

        let per_person = match snapshot.members().len() {
            0 => Money::ZERO,
            n => total / Decimal::from(n),
        };

        let categories = Category::SUMMARY_BUCKETS
            .into_iter()
            .map(|category| -> Result<CategoryTotal, EngineError> {
                let bucket_total = Money::checked_sum(
                    expenses
                        .iter()
                        .filter(|e| e.category.summary_bucket() == category)
                        .map(|e| e.settlement_amount),
                )
                .ok_or(EngineError::AmountOverflow)?;
                let percentage = if total.is_zero() {
                    Decimal::ZERO
                } else {
                    bucket_total.as_decimal() / total.as_decimal() * Decimal::ONE_HUNDRED
                };
                Ok(CategoryTotal {
                    category,
                    total: bucket_total,
                    percentage,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            total,
            expense_count: expenses.len(),
            per_person,
            categories,
        })
    }
}
