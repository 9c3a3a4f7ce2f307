use crate::{
    error::RecordError,
    model::{ExpenseDraft, TravelDraft},
};
use tripsplit_domain::{
    CurrencyConverter, EngineError, Expense, SettlementEngine, UnknownMemberPolicy,
};

/// Validates expense drafts and turns them into immutable [`Expense`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpenseRecorder {
    engine: SettlementEngine,
}

impl ExpenseRecorder {
    pub fn new(engine: SettlementEngine) -> Self {
        Self { engine }
    }

    /// Records one draft against `travel`.
    ///
    /// Nothing is recorded unless every check passes.
    pub fn record(
        &self,
        travel: &TravelDraft,
        draft: &ExpenseDraft,
    ) -> Result<Expense, RecordError> {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(RecordError::EmptyDescription);
        }
        if !draft.amount.is_positive() {
            return Err(EngineError::InvalidAmount(draft.amount).into());
        }

        if self.engine.options().unknown_members == UnknownMemberPolicy::Reject {
            let unknown = std::iter::once(&draft.payer)
                .chain(&draft.participants)
                .find(|member| !travel.members.contains(member));
            if let Some(member) = unknown {
                return Err(EngineError::UnknownMember(member.clone()).into());
            }
        }

        let rate = travel.rates.resolve(&draft.currency, draft.custom_rate)?;
        let settlement_amount = CurrencyConverter::to_settlement_currency(draft.amount, rate)?;
        let splits = self.engine.split_calculator().calculate(
            settlement_amount,
            &draft.participants,
            &draft.split,
        )?;

        Ok(Expense {
            id: draft.id.clone(),
            amount: draft.amount,
            currency: draft.currency.clone(),
            rate,
            settlement_amount,
            payer: draft.payer.clone(),
            participants: splits.keys().cloned().collect(),
            split_mode: draft.split.mode(),
            splits,
            description: description.to_owned(),
            category: draft.category,
        })
    }
}
