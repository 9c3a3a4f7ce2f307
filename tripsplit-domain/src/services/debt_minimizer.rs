use crate::model::{MemberId, Money, SETTLEMENT_EPSILON, Transfer};
use std::{cmp::Ordering, collections::BTreeMap};

/// Greedy largest-first transfer matching.
///
/// The result has at most `debtors + creditors - 1` transfers. It is practically
/// minimal, not provably minimal in transfer count.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebtMinimizer;

#[derive(Debug)]
struct Position {
    member: MemberId,
    remaining: Money,
}

impl DebtMinimizer {
    /// Builds the transfer list that zeroes `net`.
    ///
    /// # Arguments
    /// * `net` - Net balance per member. Positive means the member is owed money.
    ///   Repeated members are summed.
    ///
    /// # Returns
    /// Transfers in emission order. Balances within the settlement epsilon are
    /// treated as settled and residues below it are dropped.
    pub fn minimize(&self, net: impl IntoIterator<Item = (MemberId, Money)>) -> Vec<Transfer> {
        let mut folded: BTreeMap<MemberId, Money> = BTreeMap::new();
        for (member, amount) in net {
            *folded.entry(member).or_default() += amount;
        }

        let mut creditors = Vec::new();
        let mut debtors = Vec::new();
        for (member, amount) in folded {
            if amount > SETTLEMENT_EPSILON {
                creditors.push(Position {
                    member,
                    remaining: amount,
                });
            } else if amount < -SETTLEMENT_EPSILON {
                debtors.push(Position {
                    member,
                    remaining: amount.abs(),
                });
            }
        }
        creditors.sort_by(largest_first);
        debtors.sort_by(largest_first);

        let mut transfers = Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let (mut i, mut j) = (0, 0);
        while let (Some(debtor), Some(creditor)) = (debtors.get_mut(i), creditors.get_mut(j)) {
            let amount = debtor.remaining.min(creditor.remaining);
            if amount > SETTLEMENT_EPSILON {
                transfers.push(Transfer {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount,
                });
            }
            debtor.remaining -= amount;
            creditor.remaining -= amount;

            if debtor.remaining < SETTLEMENT_EPSILON {
                i += 1;
            }
            if creditor.remaining < SETTLEMENT_EPSILON {
                j += 1;
            }
        }

        tracing::trace!(
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            transfer_count = transfers.len(),
            "Matched debts"
        );
        transfers
    }
}

fn largest_first(a: &Position, b: &Position) -> Ordering {
    b.remaining
        .cmp(&a.remaining)
        .then_with(|| a.member.cmp(&b.member))
}
