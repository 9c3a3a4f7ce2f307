use crate::text_table::{Alignment, TextTableBuilder};
use rust_decimal::{Decimal, RoundingStrategy};
use std::borrow::Cow;
use tripsplit_application::{PersonBalance, SettlementResult};
use tripsplit_domain::{Category, CategoryTotal, ExpenseSummary, Money, Transfer};
use tripsplit_i18n as i18n;

pub struct SettlementPresenter;

pub struct SettlementView {
    pub overview: String,
    pub balance_table: String,
    /// `None` when nobody owes anything.
    pub transfer_table: Option<String>,
    pub category_table: String,
}

impl SettlementView {
    /// All sections joined for terminal output.
    pub fn to_text(&self) -> String {
        let transfers = match &self.transfer_table {
            Some(table) => Cow::Borrowed(table.as_str()),
            None => Cow::Owned(format!("{}\n", i18n::ALL_SETTLED)),
        };
        [
            self.overview.as_str(),
            self.balance_table.as_str(),
            &*transfers,
            self.category_table.as_str(),
        ]
        .join("\n")
    }
}

impl SettlementPresenter {
    pub fn render(result: &SettlementResult) -> SettlementView {
        let currency = result.settlement_currency.as_str();
        SettlementView {
            overview: Self::build_overview(&result.travel, currency, &result.summary),
            balance_table: Self::build_balance_table(&result.balances),
            transfer_table: (!result.transfers.is_empty())
                .then(|| Self::build_transfer_table(&result.transfers)),
            category_table: Self::build_category_table(&result.summary.categories),
        }
    }

    pub fn build_overview(travel: &str, currency: &str, summary: &ExpenseSummary) -> String {
        let mut overview = String::new();
        if !travel.is_empty() {
            overview.push_str(travel);
            overview.push('\n');
        }
        overview.push_str(&format!(
            "{}: {} {currency}\n{}: {}\n{}: {} {currency}\n",
            i18n::TOTAL_SPENT,
            summary.total,
            i18n::EXPENSE_COUNT,
            summary.expense_count,
            i18n::PER_PERSON,
            summary.per_person,
        ));
        overview
    }

    pub fn build_balance_table(person_balances: &[PersonBalance]) -> String {
        TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(i18n::MEMBER),
                Cow::Borrowed(i18n::PAID),
                Cow::Borrowed(i18n::OWED),
                Cow::Borrowed(i18n::NET),
            ])
            .rows(person_balances.iter().map(|person| {
                [
                    Cow::Borrowed(person.id.as_str()),
                    Cow::Owned(person.paid.to_string()),
                    Cow::Owned(person.owed.to_string()),
                    Cow::Owned(format_signed(person.net)),
                ]
            }))
            .build()
    }

    pub fn build_transfer_table(transfers: &[Transfer]) -> String {
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::FROM),
                Cow::Borrowed(i18n::TO),
                Cow::Borrowed(i18n::AMOUNT),
            ])
            .rows(transfers.iter().map(|transfer| {
                [
                    Cow::Borrowed(transfer.from.as_str()),
                    Cow::Borrowed(transfer.to.as_str()),
                    Cow::Owned(transfer.amount.to_string()),
                ]
            }))
            .build()
    }

    pub fn build_category_table(categories: &[CategoryTotal]) -> String {
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::CATEGORY),
                Cow::Borrowed(i18n::AMOUNT),
                Cow::Borrowed(i18n::SHARE),
            ])
            .rows(categories.iter().map(|category| {
                [
                    Cow::Borrowed(category_label(category.category)),
                    Cow::Owned(category.total.to_string()),
                    Cow::Owned(format_percentage(category.percentage)),
                ]
            }))
            .build()
    }
}

fn format_signed(amount: Money) -> String {
    let rounded = amount.display_rounded();
    if rounded.is_sign_positive() && !rounded.is_zero() {
        format!("+{amount}")
    } else {
        amount.to_string()
    }
}

fn format_percentage(percentage: Decimal) -> String {
    let rounded = percentage.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::Transport => i18n::TRANSPORT,
        Category::Accommodation => i18n::ACCOMMODATION,
        Category::Food => i18n::FOOD,
        Category::Shopping => i18n::SHOPPING,
        Category::Tickets => i18n::TICKETS,
        Category::Entertainment => i18n::ENTERTAINMENT,
        Category::Other => i18n::OTHER,
    }
}
