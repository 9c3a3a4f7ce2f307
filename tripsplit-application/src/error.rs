use thiserror::Error;
use tripsplit_domain::{EngineError, ErrorKind, ExpenseId, MemberId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelParseError {
    #[error("syntax error at line {line}, column {column}: {detail}")]
    Syntax {
        line: usize,
        column: usize,
        detail: String,
    },
    #[error("invalid `{field}`: {detail}")]
    InvalidField { field: String, detail: String },
    #[error("member `{0}` is declared more than once")]
    DuplicateMember(MemberId),
    #[error("expense id `{0}` is used more than once")]
    DuplicateExpense(ExpenseId),
}

/// Why a single expense draft could not be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl RecordError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            RecordError::EmptyDescription => None,
            RecordError::Engine(err) => Some(err.kind()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error("failed to read travel: {0}")]
    Parse(#[from] TravelParseError),
    #[error("expense #{index} (`{id}`) rejected: {source}")]
    Record {
        index: usize,
        id: ExpenseId,
        #[source]
        source: RecordError,
    },
    #[error("settlement failed: {0}")]
    Settlement(#[from] EngineError),
}
