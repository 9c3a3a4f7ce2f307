#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{EngineError, ErrorKind, PolicyParseError, SplitRejection};
pub use model::{
    Balance, Category, CurrencyCode, DISPLAY_SCALE, ExchangeRate, Expense, ExpenseId,
    MemberBalances, MemberId, Money, SETTLEMENT_EPSILON, Settlement, Shares, SplitMode,
    SplitPolicy, Transfer, TravelSnapshot,
};
pub use services::{
    BalanceAggregator, CategoryTotal, CurrencyConverter, CustomSplitPolicy, DebtMinimizer,
    ExpenseSummary, RateTable, SettlementEngine, SettlementOptions, SplitCalculator,
    UnknownMemberPolicy,
};
