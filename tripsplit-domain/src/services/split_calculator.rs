use crate::{
    error::{EngineError, PolicyParseError, SplitRejection},
    model::{MemberId, Money, SETTLEMENT_EPSILON, Shares, SplitPolicy},
};
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Allowed deviation of a percentage total from 100.
pub const RATIO_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Validation applied to custom (explicit amount) splits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CustomSplitPolicy {
    /// Amounts must cover exactly the participants and total the expense amount.
    #[default]
    Strict,
    /// Amounts are passed through untouched, even when they do not total the expense.
    Lenient,
}

impl FromStr for CustomSplitPolicy {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(PolicyParseError::new("custom split", value, &["strict", "lenient"])),
        }
    }
}

/// Turns an expense amount and a split policy into per-participant shares.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitCalculator {
    custom_splits: CustomSplitPolicy,
}

impl SplitCalculator {
    pub fn new(custom_splits: CustomSplitPolicy) -> Self {
        Self { custom_splits }
    }

    /// Calculate the owed share of every participant
    ///
    /// # Arguments
    /// * `amount` - Expense amount in the settlement currency
    /// * `participants` - Selected members; duplicates are ignored
    /// * `policy` - Split mode and its parameters
    ///
    /// # Returns
    /// Shares keyed by participant in selection order. Except for lenient custom
    /// splits, the shares total `amount`.
    pub fn calculate(
        &self,
        amount: Money,
        participants: &[MemberId],
        policy: &SplitPolicy,
    ) -> Result<Shares, EngineError> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(amount));
        }

        let participants: IndexSet<&MemberId> = participants.iter().collect();
        if participants.is_empty() {
            return Err(SplitRejection::NoParticipants.into());
        }

        let shares = match policy {
            SplitPolicy::Equal => split_equally(amount, &participants),
            SplitPolicy::Specific => split_to_single_payee(amount, &participants)?,
            SplitPolicy::Ratio(percentages) => split_by_ratio(amount, &participants, percentages)?,
            SplitPolicy::Custom(amounts) => match self.custom_splits {
                CustomSplitPolicy::Strict => split_custom(amount, &participants, amounts)?,
                CustomSplitPolicy::Lenient => amounts.clone(),
            },
        };

        tracing::trace!(
            split_mode = ?policy.mode(),
            participant_count = participants.len(),
            amount = %amount.as_decimal(),
            "Calculated expense shares"
        );

        Ok(shares)
    }
}

// The last participant absorbs the division residue, so the shares total the
// amount exactly instead of drifting by a fraction of a cent.
fn split_equally(amount: Money, participants: &IndexSet<&MemberId>) -> Shares {
    let count = participants.len();
    let share = amount / Decimal::from(count);

    let mut shares = Shares::with_capacity(count);
    let mut allocated = Money::ZERO;
    for (idx, member) in participants.iter().enumerate() {
        let value = if idx + 1 == count {
            amount - allocated
        } else {
            share
        };
        allocated += value;
        shares.insert((*member).clone(), value);
    }
    shares
}

fn split_to_single_payee(
    amount: Money,
    participants: &IndexSet<&MemberId>,
) -> Result<Shares, EngineError> {
    match participants.first() {
        Some(&payee) if participants.len() == 1 => {
            Ok(Shares::from_iter([(payee.clone(), amount)]))
        }
        _ => Err(SplitRejection::SinglePayeeCount {
            count: participants.len(),
        }
        .into()),
    }
}

fn split_by_ratio(
    amount: Money,
    participants: &IndexSet<&MemberId>,
    percentages: &IndexMap<MemberId, Decimal>,
) -> Result<Shares, EngineError> {
    reject_outsiders(participants, percentages.keys())?;

    let mut total = Decimal::ZERO;
    let mut shares = Shares::with_capacity(participants.len());
    for &member in participants {
        let Some(&percent) = percentages.get(member) else {
            return Err(SplitRejection::MissingRatio(member.clone()).into());
        };
        if percent < Decimal::ZERO {
            return Err(SplitRejection::NegativeRatio(member.clone()).into());
        }
        total = total
            .checked_add(percent)
            .ok_or(EngineError::AmountOverflow)?;
        let share = amount
            .checked_mul(percent)
            .ok_or(EngineError::AmountOverflow)?;
        shares.insert(member.clone(), share / Decimal::ONE_HUNDRED);
    }

    if (total - Decimal::ONE_HUNDRED).abs() > RATIO_TOLERANCE {
        return Err(SplitRejection::RatioTotal { total }.into());
    }
    Ok(shares)
}

fn split_custom(
    amount: Money,
    participants: &IndexSet<&MemberId>,
    amounts: &IndexMap<MemberId, Money>,
) -> Result<Shares, EngineError> {
    reject_outsiders(participants, amounts.keys())?;

    let mut shares = Shares::with_capacity(participants.len());
    for &member in participants {
        let Some(&share) = amounts.get(member) else {
            return Err(SplitRejection::MissingAmount(member.clone()).into());
        };
        if share.is_negative() {
            return Err(SplitRejection::NegativeAmount(member.clone()).into());
        }
        shares.insert(member.clone(), share);
    }

    let total =
        Money::checked_sum(shares.values().copied()).ok_or(EngineError::AmountOverflow)?;
    if (total - amount).abs() > SETTLEMENT_EPSILON {
        return Err(SplitRejection::CustomTotal {
            total,
            expected: amount,
        }
        .into());
    }
    Ok(shares)
}

fn reject_outsiders<'a>(
    participants: &IndexSet<&MemberId>,
    mut keys: impl Iterator<Item = &'a MemberId>,
) -> Result<(), EngineError> {
    match keys.find(|member| !participants.contains(member)) {
        Some(outsider) => Err(SplitRejection::NotAParticipant(outsider.clone()).into()),
        None => Ok(()),
    }
}
