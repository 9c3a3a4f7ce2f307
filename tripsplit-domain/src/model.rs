use crate::error::EngineError;
use fxhash::FxHashMap;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Borrow,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

/// Threshold used for every money comparison in the settlement pipeline.
pub const SETTLEMENT_EPSILON: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

/// Decimal places used when a money value is shown to a person.
pub const DISPLAY_SCALE: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ISO-style currency code, normalised to upper case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_uppercase())
    }

    pub fn cny() -> Self {
        Self("CNY".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// Conversion factor from a foreign currency into the settlement currency.
///
/// Always strictly positive; a non-positive rate cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(pub(crate) Decimal);

impl ExchangeRate {
    pub const ONE: Self = Self(Decimal::ONE);

    pub fn try_new(rate: Decimal) -> Result<Self, EngineError> {
        if rate <= Decimal::ZERO {
            return Err(EngineError::InvalidRate(rate));
        }
        Ok(Self(rate))
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = EngineError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(value: ExchangeRate) -> Self {
        value.0
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Monetary amount at full decimal precision.
///
/// Rounding happens only when the value is displayed; arithmetic never rounds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub const fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// True when the value is within [`SETTLEMENT_EPSILON`] of zero.
    pub fn is_negligible(self) -> bool {
        self.abs() <= SETTLEMENT_EPSILON
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    /// Sum of `values`, or `None` once a partial sum leaves the `Decimal` range.
    pub fn checked_sum(values: impl IntoIterator<Item = Self>) -> Option<Self> {
        values.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }

    pub fn approx_eq(self, other: Self) -> bool {
        (self - other).is_negligible()
    }

    /// Value rounded half away from zero to [`DISPLAY_SCALE`] places.
    pub fn display_rounded(self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(DISPLAY_SCALE);
        rounded
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_rounded())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    Equal,
    /// Single payee: one selected participant owes the whole amount.
    Specific,
    #[serde(alias = "proportional")]
    Ratio,
    Custom,
}

/// How an expense amount is divided among its participants.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitPolicy {
    Equal,
    Specific,
    /// Percentage per participant; must total 100.
    Ratio(IndexMap<MemberId, Decimal>),
    /// Explicit amount per participant, in the settlement currency.
    Custom(IndexMap<MemberId, Money>),
}

impl SplitPolicy {
    pub fn mode(&self) -> SplitMode {
        match self {
            SplitPolicy::Equal => SplitMode::Equal,
            SplitPolicy::Specific => SplitMode::Specific,
            SplitPolicy::Ratio(_) => SplitMode::Ratio,
            SplitPolicy::Custom(_) => SplitMode::Custom,
        }
    }
}

/// Owed share per participant, in participant order.
pub type Shares = IndexMap<MemberId, Money>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "交通")]
    Transport,
    #[serde(alias = "住宿")]
    Accommodation,
    #[serde(alias = "餐饮")]
    Food,
    #[serde(alias = "购物")]
    Shopping,
    #[serde(alias = "门票")]
    Tickets,
    #[serde(alias = "娱乐")]
    Entertainment,
    #[default]
    #[serde(alias = "其他", other)]
    Other,
}

impl Category {
    /// Buckets reported by the expense summary, in display order.
    pub const SUMMARY_BUCKETS: [Category; 5] = [
        Category::Transport,
        Category::Accommodation,
        Category::Food,
        Category::Shopping,
        Category::Other,
    ];

    pub fn summary_bucket(self) -> Category {
        match self {
            Category::Tickets | Category::Entertainment => Category::Other,
            other => other,
        }
    }
}

/// A recorded expense. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Amount in the currency it was paid in.
    pub amount: Money,
    pub currency: CurrencyCode,
    pub rate: ExchangeRate,
    /// `amount * rate`, in the settlement currency.
    pub settlement_amount: Money,
    pub payer: MemberId,
    pub participants: Vec<MemberId>,
    pub split_mode: SplitMode,
    pub splits: Shares,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub paid: Money,
    pub owed: Money,
}

impl Balance {
    pub fn net(&self) -> Money {
        self.paid - self.owed
    }
}

/// Balances keyed by member, in declaration order.
pub type MemberBalances = IndexMap<MemberId, Balance>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    pub balances: MemberBalances,
    pub transfers: Vec<Transfer>,
}

impl Settlement {
    pub fn net_balances(&self) -> impl Iterator<Item = (&MemberId, Money)> + '_ {
        self.balances
            .iter()
            .map(|(member, balance)| (member, balance.net()))
    }

    /// Checks that the transfers reproduce every member's net balance within
    /// [`SETTLEMENT_EPSILON`].
    pub fn verify(&self) -> bool {
        let mut flows: FxHashMap<&MemberId, Money> = FxHashMap::default();
        for transfer in &self.transfers {
            *flows.entry(&transfer.to).or_default() += transfer.amount;
            *flows.entry(&transfer.from).or_default() -= transfer.amount;
        }

        self.net_balances().all(|(member, net)| {
            let flow = flows.get(member).copied().unwrap_or_default();
            net.approx_eq(flow)
        }) && flows
            .keys()
            .all(|member| self.balances.contains_key(member.as_str()))
    }
}

/// Immutable view of a travel handed to the settlement engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TravelSnapshot {
    members: Vec<MemberId>,
    expenses: Vec<Expense>,
}

impl TravelSnapshot {
    pub fn new(members: Vec<MemberId>, expenses: Vec<Expense>) -> Self {
        Self { members, expenses }
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::exact(Money::from_decimal(dec!(50)), "50.00")]
    #[case::half_up(Money::from_decimal(dec!(0.125)), "0.13")]
    #[case::negative_half(Money::from_decimal(dec!(-0.125)), "-0.13")]
    #[case::thirds(Money::from_decimal(dec!(100) / dec!(3)), "33.33")]
    #[case::negative_dust(Money::from_decimal(dec!(-0.001)), "0.00")]
    fn money_displays_two_decimals(#[case] money: Money, #[case] expected: &str) {
        assert_eq!(money.to_string(), expected);
    }

    /// More than half of `Decimal::MAX`.
    fn oversized() -> Money {
        Money::from_decimal(Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0))
    }

    #[rstest]
    #[case::add(Money::from_decimal(Decimal::MAX).checked_add(Money::from_i64(1)))]
    #[case::sub(Money::from_decimal(Decimal::MIN).checked_sub(Money::from_i64(1)))]
    #[case::mul(Money::from_decimal(Decimal::MAX).checked_mul(dec!(7.2)))]
    #[case::sum(Money::checked_sum([oversized(); 2]))]
    fn checked_arithmetic_reports_overflow(#[case] result: Option<Money>) {
        assert_eq!(result, None);
    }

    #[test]
    fn checked_arithmetic_within_range() {
        assert_eq!(
            Money::checked_sum([Money::from_i64(40), Money::from_i64(2)]),
            Some(Money::from_i64(42))
        );
        assert_eq!(
            Money::from_i64(10).checked_mul(dec!(7.2)),
            Some(Money::from_i64(72))
        );
    }

    #[rstest]
    #[case::zero(dec!(0))]
    #[case::negative(dec!(-7.2))]
    fn exchange_rate_rejects_non_positive(#[case] rate: Decimal) {
        assert_eq!(
            ExchangeRate::try_new(rate),
            Err(EngineError::InvalidRate(rate))
        );
    }

    #[test]
    fn currency_code_is_upper_case() {
        assert_eq!(CurrencyCode::new(" usd ").as_str(), "USD");
    }

    #[test]
    fn tickets_and_entertainment_fold_into_other() {
        assert_eq!(Category::Tickets.summary_bucket(), Category::Other);
        assert_eq!(Category::Entertainment.summary_bucket(), Category::Other);
        assert_eq!(Category::Food.summary_bucket(), Category::Food);
    }

    #[test]
    fn verify_detects_missing_transfer() {
        let settlement = Settlement {
            balances: MemberBalances::from_iter([
                (
                    MemberId::from("A"),
                    Balance {
                        paid: Money::from_i64(100),
                        owed: Money::from_i64(50),
                    },
                ),
                (
                    MemberId::from("B"),
                    Balance {
                        paid: Money::ZERO,
                        owed: Money::from_i64(50),
                    },
                ),
            ]),
            transfers: Vec::new(),
        };

        assert!(!settlement.verify());
    }
}
