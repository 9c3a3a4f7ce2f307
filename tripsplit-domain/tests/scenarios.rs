use indexmap::IndexMap;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tripsplit_domain::{
    CurrencyCode, CurrencyConverter, ExchangeRate, Expense, ExpenseId, MemberId, Money,
    RateTable, Settlement, SettlementEngine, Shares, SplitCalculator, SplitPolicy, Transfer,
    TravelSnapshot,
};

fn ids(names: &[&str]) -> Vec<MemberId> {
    names.iter().copied().map(MemberId::from).collect()
}

fn record(
    id: &str,
    payer: &str,
    amount: Money,
    participants: &[&str],
    policy: SplitPolicy,
) -> Expense {
    let participants = ids(participants);
    let splits = SplitCalculator::default()
        .calculate(amount, &participants, &policy)
        .expect("split is valid");
    Expense {
        id: ExpenseId::new(id),
        amount,
        currency: CurrencyCode::cny(),
        rate: ExchangeRate::ONE,
        settlement_amount: amount,
        payer: MemberId::from(payer),
        participants,
        split_mode: policy.mode(),
        splits,
        description: id.to_owned(),
        category: Default::default(),
    }
}

fn settle(members: &[&str], expenses: Vec<Expense>) -> Settlement {
    SettlementEngine::default()
        .settle(&TravelSnapshot::new(ids(members), expenses))
        .expect("snapshot is valid")
}

fn nets(settlement: &Settlement) -> Vec<(&str, Money)> {
    settlement
        .net_balances()
        .map(|(member, net)| (member.as_str(), net))
        .collect()
}

fn transfer(from: &str, to: &str, amount: i64) -> Transfer {
    Transfer {
        from: from.into(),
        to: to.into(),
        amount: Money::from_i64(amount),
    }
}

#[test]
fn two_members_equal_split() {
    let settlement = settle(
        &["A", "B"],
        vec![record(
            "dinner",
            "A",
            Money::from_i64(100),
            &["A", "B"],
            SplitPolicy::Equal,
        )],
    );

    assert_eq!(
        nets(&settlement),
        vec![("A", Money::from_i64(50)), ("B", Money::from_i64(-50))]
    );
    assert_eq!(settlement.transfers, vec![transfer("B", "A", 50)]);
}

#[test]
fn equal_and_single_payee_expenses() {
    let settlement = settle(
        &["A", "B", "C"],
        vec![
            record("hotel", "A", Money::from_i64(90), &["A", "B", "C"], SplitPolicy::Equal),
            record("taxi", "B", Money::from_i64(30), &["C"], SplitPolicy::Specific),
        ],
    );

    let totals: Vec<(&str, Money, Money)> = settlement
        .balances
        .iter()
        .map(|(member, balance)| (member.as_str(), balance.paid, balance.owed))
        .collect();
    assert_eq!(
        totals,
        vec![
            ("A", Money::from_i64(90), Money::from_i64(30)),
            ("B", Money::from_i64(30), Money::from_i64(30)),
            ("C", Money::ZERO, Money::from_i64(60)),
        ]
    );
    assert_eq!(
        nets(&settlement),
        vec![
            ("A", Money::from_i64(60)),
            ("B", Money::ZERO),
            ("C", Money::from_i64(-60)),
        ]
    );
    assert_eq!(settlement.transfers, vec![transfer("C", "A", 60)]);
}

#[test]
fn foreign_currency_is_converted_before_splitting() {
    let rates = RateTable::cny_default();
    let rate = rates
        .rate_for(&CurrencyCode::new("USD"))
        .expect("USD has a default rate");
    let converted = CurrencyConverter::to_settlement_currency(Money::from_i64(10), rate)
        .expect("amount is in range");
    assert_eq!(converted, Money::from_i64(72));

    let shares = SplitCalculator::default()
        .calculate(converted, &ids(&["m1", "m2"]), &SplitPolicy::Equal)
        .expect("equal split is valid");
    assert_eq!(
        shares,
        Shares::from_iter([
            (MemberId::from("m1"), Money::from_i64(36)),
            (MemberId::from("m2"), Money::from_i64(36)),
        ])
    );
}

#[test]
fn ratio_split() {
    let percentages: IndexMap<MemberId, Decimal> =
        [("A", dec!(50)), ("B", dec!(30)), ("C", dec!(20))]
            .into_iter()
            .map(|(member, pct)| (MemberId::from(member), pct))
            .collect();

    let shares = SplitCalculator::default()
        .calculate(
            Money::from_i64(200),
            &ids(&["A", "B", "C"]),
            &SplitPolicy::Ratio(percentages),
        )
        .expect("ratios total 100");

    let values: Vec<Money> = shares.values().copied().collect();
    assert_eq!(
        values,
        vec![Money::from_i64(100), Money::from_i64(60), Money::from_i64(40)]
    );
    assert_eq!(shares.values().sum::<Money>(), Money::from_i64(200));
}

#[rstest]
#[case::no_expenses(vec![])]
#[case::everyone_paid_their_share(vec![
    record("lunch", "A", Money::from_i64(60), &["A", "B"], SplitPolicy::Equal),
    record("dinner", "B", Money::from_i64(60), &["A", "B"], SplitPolicy::Equal),
])]
#[case::sub_cent_residue(vec![
    record("snack", "A", Money::new(1, 3), &["B"], SplitPolicy::Specific),
])]
fn already_settled(#[case] expenses: Vec<Expense>) {
    let settlement = settle(&["A", "B"], expenses);
    assert!(settlement.transfers.is_empty());
}
