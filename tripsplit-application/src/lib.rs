#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod expense_recorder;
pub mod model;
pub mod ports;
pub mod settlement_service;

pub use error::{ProcessingError, RecordError, TravelParseError};
pub use expense_recorder::ExpenseRecorder;
pub use model::{ExpenseDraft, PersonBalance, RecordedTravel, SettlementResult, TravelDraft};
pub use ports::TravelParser;
pub use settlement_service::SettlementService;
