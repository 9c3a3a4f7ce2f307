use crate::model::{CurrencyCode, MemberId, Money};
use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification of [`EngineError`], stable across message changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSplit,
    InvalidRate,
    UnknownMember,
    InvalidAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid split: {0}")]
    InvalidSplit(#[from] SplitRejection),
    #[error("exchange rate must be positive (found {0})")]
    InvalidRate(Decimal),
    #[error("no exchange rate configured for {0}")]
    MissingRate(CurrencyCode),
    #[error("`{0}` is not a member of this travel")]
    UnknownMember(MemberId),
    #[error("expense amount must be positive (found {0})")]
    InvalidAmount(Money),
    #[error("amount exceeds the supported range")]
    AmountOverflow,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidSplit(_) => ErrorKind::InvalidSplit,
            EngineError::InvalidRate(_) | EngineError::MissingRate(_) => ErrorKind::InvalidRate,
            EngineError::UnknownMember(_) => ErrorKind::UnknownMember,
            EngineError::InvalidAmount(_) | EngineError::AmountOverflow => {
                ErrorKind::InvalidAmount
            }
        }
    }
}

/// Why the split calculator refused a split request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitRejection {
    #[error("at least one participant is required")]
    NoParticipants,
    #[error("single-payee split needs exactly one participant (found {count})")]
    SinglePayeeCount { count: usize },
    #[error("percentages must total 100 (found {total})")]
    RatioTotal { total: Decimal },
    #[error("no percentage given for `{0}`")]
    MissingRatio(MemberId),
    #[error("negative percentage for `{0}`")]
    NegativeRatio(MemberId),
    #[error("`{0}` is not a participant of this expense")]
    NotAParticipant(MemberId),
    #[error("no amount given for `{0}`")]
    MissingAmount(MemberId),
    #[error("negative amount for `{0}`")]
    NegativeAmount(MemberId),
    #[error("custom amounts must total {expected} (found {total})")]
    CustomTotal { total: Money, expected: Money },
}

/// A policy name that does not match any known policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {policy} policy `{value}` (expected one of: {})", .expected.join(", "))]
pub struct PolicyParseError {
    policy: &'static str,
    value: String,
    expected: &'static [&'static str],
}

impl PolicyParseError {
    pub(crate) fn new(policy: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            policy,
            value: value.to_owned(),
            expected,
        }
    }
}
