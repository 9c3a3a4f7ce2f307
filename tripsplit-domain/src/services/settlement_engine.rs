use crate::{
    error::EngineError,
    model::{Settlement, TravelSnapshot},
    services::{
        BalanceAggregator, CustomSplitPolicy, DebtMinimizer, SplitCalculator, UnknownMemberPolicy,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettlementOptions {
    pub unknown_members: UnknownMemberPolicy,
    pub custom_splits: CustomSplitPolicy,
}

/// Stateless pipeline from a travel snapshot to balances and transfers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementEngine {
    options: SettlementOptions,
}

impl SettlementEngine {
    pub fn new(options: SettlementOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SettlementOptions {
        self.options
    }

    /// Split calculator configured with this engine's custom split policy.
    pub fn split_calculator(&self) -> SplitCalculator {
        SplitCalculator::new(self.options.custom_splits)
    }

    /// Recomputes the settlement from scratch.
    ///
    /// # Arguments
    /// * `snapshot` - Members and recorded expenses at the time of the call
    ///
    /// # Returns
    /// Per-member balances in member order and the transfers that zero them
    pub fn settle(&self, snapshot: &TravelSnapshot) -> Result<Settlement, EngineError> {
        let balances = BalanceAggregator::new(self.options.unknown_members)
            .aggregate(snapshot.members(), snapshot.expenses())?;

        let transfers = DebtMinimizer.minimize(
            balances
                .iter()
                .map(|(member, balance)| (member.clone(), balance.net())),
        );

        tracing::debug!(
            member_count = balances.len(),
            expense_count = snapshot.expenses().len(),
            transfer_count = transfers.len(),
            "Settled travel"
        );

        Ok(Settlement {
            balances,
            transfers,
        })
    }
}
