use tripsplit_application::{ProcessingError, RecordError, TravelParseError};

pub fn format_processing_error(error: &ProcessingError) -> String {
    match error {
        ProcessingError::Parse(err) => format_parse_error(err),
        ProcessingError::Record { index, id, source } => {
            tripsplit_i18n::expense_rejected(*index, id.to_string(), format_record_error(source))
                .to_string()
        }
        ProcessingError::Settlement(err) => {
            format!("{}: {err}", tripsplit_i18n::SETTLEMENT_CALCULATION_FAILED)
        }
    }
}

fn format_parse_error(error: &TravelParseError) -> String {
    match error {
        TravelParseError::Syntax {
            line,
            column,
            detail,
        } => tripsplit_i18n::syntax_error(*line, *column, detail.clone()).to_string(),
        TravelParseError::InvalidField { field, detail } => {
            tripsplit_i18n::invalid_field(field, detail)
        }
        TravelParseError::DuplicateMember(member) => tripsplit_i18n::duplicate_member(member),
        TravelParseError::DuplicateExpense(id) => tripsplit_i18n::duplicate_expense(id),
    }
}

fn format_record_error(error: &RecordError) -> String {
    match error {
        RecordError::EmptyDescription => tripsplit_i18n::empty_description().to_owned(),
        RecordError::Engine(err) => err.to_string(),
    }
}
