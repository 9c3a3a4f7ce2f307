pub mod balance_aggregator;
pub mod currency_converter;
pub mod debt_minimizer;
pub mod expense_summary;
pub mod settlement_engine;
pub mod split_calculator;

pub use balance_aggregator::{BalanceAggregator, UnknownMemberPolicy};
pub use currency_converter::{CurrencyConverter, RateTable};
pub use debt_minimizer::DebtMinimizer;
pub use expense_summary::{CategoryTotal, ExpenseSummary};
pub use settlement_engine::{SettlementEngine, SettlementOptions};
pub use split_calculator::{CustomSplitPolicy, RATIO_TOLERANCE, SplitCalculator};
