use crate::{
    error::{ProcessingError, TravelParseError},
    expense_recorder::ExpenseRecorder,
    model::{PersonBalance, RecordedTravel, SettlementResult, TravelDraft},
    ports::TravelParser,
};
use tripsplit_domain::{
    ExpenseSummary, MemberId, SettlementEngine, SettlementOptions, TravelSnapshot,
    UnknownMemberPolicy,
};

/// Drives a travel document from parsing to a settlement result.
#[derive(Clone, Copy)]
pub struct SettlementService<'a> {
    parser: &'a dyn TravelParser,
    engine: SettlementEngine,
}

impl<'a> SettlementService<'a> {
    pub fn new(parser: &'a dyn TravelParser, options: SettlementOptions) -> Self {
        Self {
            parser,
            engine: SettlementEngine::new(options),
        }
    }

    pub fn parse_travel(&self, content: &str) -> Result<TravelDraft, TravelParseError> {
        self.parser.parse(content)
    }

    /// Records every expense of `travel`, stopping at the first rejected one.
    pub fn record_all(&self, travel: &TravelDraft) -> Result<RecordedTravel, ProcessingError> {
        let recorder = ExpenseRecorder::new(self.engine);
        let mut members = travel.members.clone();
        let mut expenses = Vec::with_capacity(travel.expenses.len());

        for (index, draft) in travel.expenses.iter().enumerate() {
            let expense = recorder.record(travel, draft).map_err(|source| {
                tracing::warn!(
                    index,
                    expense_id = %draft.id,
                    reason = %source,
                    "Rejected expense"
                );
                ProcessingError::Record {
                    index,
                    id: draft.id.clone(),
                    source,
                }
            })?;

            if self.engine.options().unknown_members == UnknownMemberPolicy::Register {
                register_members(
                    &mut members,
                    std::iter::once(&expense.payer).chain(expense.splits.keys()),
                );
            }
            expenses.push(expense);
        }

        tracing::info!(
            travel = %travel.name,
            member_count = members.len(),
            expense_count = expenses.len(),
            "Recorded travel expenses"
        );

        Ok(RecordedTravel {
            name: travel.name.clone(),
            settlement_currency: travel.rates.settlement_currency().clone(),
            snapshot: TravelSnapshot::new(members, expenses),
        })
    }

    pub fn build_settlement_result(
        &self,
        travel: &RecordedTravel,
    ) -> Result<SettlementResult, ProcessingError> {
        let settlement = self.engine.settle(&travel.snapshot)?;

        let balances = settlement
            .balances
            .iter()
            .map(|(id, balance)| PersonBalance {
                id: id.clone(),
                paid: balance.paid,
                owed: balance.owed,
                net: balance.net(),
            })
            .collect();

        Ok(SettlementResult {
            travel: travel.name.clone(),
            settlement_currency: travel.settlement_currency.clone(),
            balances,
            transfers: settlement.transfers,
            summary: ExpenseSummary::from_snapshot(&travel.snapshot)?,
        })
    }

    /// Parses, records and settles `content` in one go.
    pub fn process(&self, content: &str) -> Result<SettlementResult, ProcessingError> {
        let draft = self.parse_travel(content)?;
        let recorded = self.record_all(&draft)?;
        self.build_settlement_result(&recorded)
    }
}

fn register_members<'m>(
    members: &mut Vec<MemberId>,
    seen: impl Iterator<Item = &'m MemberId>,
) {
    for member in seen {
        if !members.contains(member) {
            tracing::debug!(member = %member, "Registering undeclared member");
            members.push(member.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RecordError, model::ExpenseDraft};
    use rstest::{fixture, rstest};
    use tripsplit_domain::{
        Category, CurrencyCode, ExpenseId, Money, RateTable, SplitPolicy, Transfer,
    };

    fn draft(id: &str, payer: &str, amount: i64, participants: &[&str]) -> ExpenseDraft {
        ExpenseDraft {
            id: ExpenseId::new(id),
            amount: Money::from_i64(amount),
            currency: CurrencyCode::cny(),
            custom_rate: None,
            payer: payer.into(),
            participants: participants.iter().copied().map(MemberId::from).collect(),
            split: SplitPolicy::Equal,
            description: id.to_owned(),
            category: Category::Other,
        }
    }

    struct StubParser;

    impl TravelParser for StubParser {
        fn parse(&self, content: &str) -> Result<TravelDraft, TravelParseError> {
            if content.contains("SYNTAX") {
                return Err(TravelParseError::Syntax {
                    line: 1,
                    column: 1,
                    detail: "Syntax error - stub".to_string(),
                });
            }

            Ok(TravelDraft {
                name: "stub".to_owned(),
                members: vec!["A".into(), "B".into()],
                rates: RateTable::cny_default(),
                expenses: vec![
                    draft("e1", "A", 100, &["A", "B"]),
                    draft("e2", "B", 20, &["A", "Z"]),
                ],
            })
        }
    }

    #[fixture]
    fn service() -> SettlementService<'static> {
        SettlementService::new(&StubParser, SettlementOptions::default())
    }

    #[rstest]
    fn parse_errors_are_reported(service: SettlementService<'_>) {
        let err = service.process("SYNTAX").expect_err("stub rejects");
        assert!(matches!(
            err,
            ProcessingError::Parse(TravelParseError::Syntax { line: 1, .. })
        ));
    }

    #[rstest]
    fn first_rejected_expense_is_reported(service: SettlementService<'_>) {
        let err = service.process("ok").expect_err("Z is undeclared");
        assert!(matches!(
            err,
            ProcessingError::Record {
                index: 1,
                source: RecordError::Engine(_),
                ..
            }
        ));
    }

    #[test]
    fn register_policy_extends_member_list() {
        let service = SettlementService::new(
            &StubParser,
            SettlementOptions {
                unknown_members: UnknownMemberPolicy::Register,
                ..SettlementOptions::default()
            },
        );

        let result = service.process("ok").expect("Z is registered");

        let members: Vec<&str> = result.balances.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(members, vec!["A", "B", "Z"]);
        assert_eq!(result.summary.total, Money::from_i64(120));
        assert_eq!(result.summary.per_person, Money::from_i64(40));
        assert_eq!(
            result.transfers,
            vec![
                Transfer {
                    from: "B".into(),
                    to: "A".into(),
                    amount: Money::from_i64(30),
                },
                Transfer {
                    from: "Z".into(),
                    to: "A".into(),
                    amount: Money::from_i64(10),
                },
            ]
        );
    }
}
