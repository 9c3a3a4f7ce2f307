use crate::{error::TravelParseError, model::TravelDraft};

/// Turns a travel document into an unvalidated draft.
pub trait TravelParser: Send + Sync {
    fn parse(&self, content: &str) -> Result<TravelDraft, TravelParseError>;
}
