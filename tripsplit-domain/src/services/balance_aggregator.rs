use crate::{
    error::{EngineError, PolicyParseError},
    model::{Balance, Expense, MemberBalances, MemberId, Money},
};
use std::str::FromStr;

/// What to do with a payer or split member missing from the declared member list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownMemberPolicy {
    /// Fail the whole aggregation with [`EngineError::UnknownMember`].
    #[default]
    Reject,
    /// Append the member after the declared ones and fold its amounts normally.
    Register,
}

impl FromStr for UnknownMemberPolicy {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "register" => Ok(Self::Register),
            _ => Err(PolicyParseError::new("unknown member", value, &["reject", "register"])),
        }
    }
}

/// Folds expenses into paid / owed totals per member.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalanceAggregator {
    unknown_members: UnknownMemberPolicy,
}

impl BalanceAggregator {
    pub fn new(unknown_members: UnknownMemberPolicy) -> Self {
        Self { unknown_members }
    }

    pub fn aggregate(
        &self,
        members: &[MemberId],
        expenses: &[Expense],
    ) -> Result<MemberBalances, EngineError> {
        let mut balances: MemberBalances = members
            .iter()
            .cloned()
            .map(|member| (member, Balance::default()))
            .collect();

        for expense in expenses {
            let payer = self.entry(&mut balances, &expense.payer)?;
            accumulate(&mut payer.paid, expense.settlement_amount)?;
            for (member, share) in &expense.splits {
                accumulate(&mut self.entry(&mut balances, member)?.owed, *share)?;
            }
        }

        // Every net, and their sum, must stay in range for the minimizer.
        let total_net = balances
            .values()
            .try_fold(Money::ZERO, |total, balance| {
                total.checked_add(balance.paid.checked_sub(balance.owed)?)
            })
            .ok_or(EngineError::AmountOverflow)?;
        if !total_net.is_negligible() {
            tracing::warn!(
                member_count = balances.len(),
                expense_count = expenses.len(),
                total_net = %total_net.as_decimal(),
                "Aggregated balances do not sum to zero"
            );
        }

        Ok(balances)
    }

    fn entry<'b>(
        &self,
        balances: &'b mut MemberBalances,
        member: &MemberId,
    ) -> Result<&'b mut Balance, EngineError> {
        if !balances.contains_key(member) {
            match self.unknown_members {
                UnknownMemberPolicy::Reject => {
                    return Err(EngineError::UnknownMember(member.clone()));
                }
                UnknownMemberPolicy::Register => {
                    tracing::debug!(member = %member, "Registering undeclared member");
                    balances.insert(member.clone(), Balance::default());
                }
            }
        }
        balances
            .get_mut(member)
            .ok_or_else(|| EngineError::UnknownMember(member.clone()))
    }
}

fn accumulate(total: &mut Money, amount: Money) -> Result<(), EngineError> {
    *total = total
        .checked_add(amount)
        .ok_or(EngineError::AmountOverflow)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrencyCode, ExchangeRate, ExpenseId, Shares, SplitMode};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn expense(payer: &str, amount: i64, splits: &[(&str, i64)]) -> Expense {
        let splits: Shares = splits
            .iter()
            .map(|(member, share)| (MemberId::from(*member), Money::from_i64(*share)))
            .collect();
        Expense {
            id: ExpenseId::new(format!("{payer}-{amount}")),
            amount: Money::from_i64(amount),
            currency: CurrencyCode::cny(),
            rate: ExchangeRate::ONE,
            settlement_amount: Money::from_i64(amount),
            payer: MemberId::from(payer),
            participants: splits.keys().cloned().collect(),
            split_mode: SplitMode::Custom,
            splits,
            description: String::new(),
            category: Default::default(),
        }
    }

    fn members(names: &[&str]) -> Vec<MemberId> {
        names.iter().copied().map(MemberId::from).collect()
    }

    #[test]
    fn folds_paid_and_owed() {
        let expenses = [
            expense("A", 90, &[("A", 30), ("B", 30), ("C", 30)]),
            expense("B", 30, &[("C", 30)]),
        ];

        let balances = BalanceAggregator::default()
            .aggregate(&members(&["A", "B", "C"]), &expenses)
            .expect("all members are declared");

        let nets: Vec<(&str, Money, Money, Money)> = balances
            .iter()
            .map(|(member, balance)| (member.as_str(), balance.paid, balance.owed, balance.net()))
            .collect();
        assert_eq!(
            nets,
            vec![
                ("A", Money::from_i64(90), Money::from_i64(30), Money::from_i64(60)),
                ("B", Money::from_i64(30), Money::from_i64(30), Money::ZERO),
                ("C", Money::ZERO, Money::from_i64(60), Money::from_i64(-60)),
            ]
        );
    }

    #[test]
    fn declared_members_without_expenses_are_zero() {
        let balances = BalanceAggregator::default()
            .aggregate(&members(&["A", "B"]), &[])
            .expect("no expenses to reject");

        assert_eq!(balances.len(), 2);
        assert!(balances.values().all(|balance| *balance == Balance::default()));
    }

    #[rstest]
    #[case::unknown_payer(expense("Z", 10, &[("A", 10)]), "Z")]
    #[case::unknown_participant(expense("A", 10, &[("A", 5), ("Y", 5)]), "Y")]
    fn rejects_unknown_members(#[case] invalid: Expense, #[case] unknown: &str) {
        let err = BalanceAggregator::new(UnknownMemberPolicy::Reject)
            .aggregate(&members(&["A", "B"]), &[invalid])
            .expect_err("undeclared member must be rejected");

        assert_eq!(err, EngineError::UnknownMember(MemberId::from(unknown)));
    }

    #[test]
    fn registers_unknown_members_after_declared_ones() {
        let balances = BalanceAggregator::new(UnknownMemberPolicy::Register)
            .aggregate(
                &members(&["A", "B"]),
                &[expense("Z", 40, &[("A", 20), ("Z", 20)])],
            )
            .expect("undeclared members are registered");

        let order: Vec<&str> = balances.keys().map(MemberId::as_str).collect();
        assert_eq!(order, vec!["A", "B", "Z"]);
        assert_eq!(balances["Z"].net(), Money::from_i64(20));
        assert_eq!(balances["A"].net(), Money::from_i64(-20));
    }

    #[rstest]
    #[case::reject("reject", Ok(UnknownMemberPolicy::Reject))]
    #[case::register_mixed_case(" Register ", Ok(UnknownMemberPolicy::Register))]
    #[case::drop("drop", Err(()))]
    fn parses_policy_names(
        #[case] input: &str,
        #[case] expected: Result<UnknownMemberPolicy, ()>,
    ) {
        assert_eq!(input.parse::<UnknownMemberPolicy>().map_err(|_| ()), expected);
    }

    #[test]
    fn unbalanced_custom_splits_propagate_into_nets() {
        let balances = BalanceAggregator::default()
            .aggregate(&members(&["A", "B"]), &[expense("A", 100, &[("B", 10)])])
            .expect("members are declared");

        let total: Money = balances.values().map(Balance::net).sum();
        assert_eq!(total, Money::from_i64(90));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let mut oversized = expense("A", 1, &[("B", 1)]);
        let amount = Money::from_decimal(Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0));
        oversized.settlement_amount = amount;
        oversized.splits = Shares::from_iter([(MemberId::from("B"), amount)]);

        let err = BalanceAggregator::default()
            .aggregate(&members(&["A", "B"]), &[oversized.clone(), oversized])
            .expect_err("paid total leaves the decimal range");

        assert_eq!(err, EngineError::AmountOverflow);
    }
}
