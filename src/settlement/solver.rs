//! Settlement solver
//!
//! Turns member balances into a short list of debtor -> creditor transfers
//! by greedily matching the largest creditor with the largest debtor.

use crate::models::{Expense, GroupId, Member, MemberBalance, MemberId, Money, Settlement};

use super::balances::compute_balances;

/// One side of the matching: who, and how much is still outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    member_id: MemberId,
    remaining: Money,
}

/// Compute the transfers that settle a group's expenses
///
/// All returned settlements are unpaid. The result is deterministic for a
/// given input order.
pub fn compute_settlements(
    expenses: &[Expense],
    members: &[Member],
    group_id: GroupId,
) -> Vec<Settlement> {
    let balances = compute_balances(expenses, members);
    settle_balances(&balances, group_id)
}

/// Greedy largest-first matching over precomputed balances
///
/// Creditors and debtors are each sorted by outstanding amount, descending.
/// The sort is stable, so equal amounts keep the order of `balances`. Each
/// step transfers `min(creditor, debtor)` and advances whichever side hit
/// zero; the loop stops as soon as either side runs out. A floor-division
/// remainder therefore stays with its creditor.
pub fn settle_balances(balances: &[MemberBalance], group_id: GroupId) -> Vec<Settlement> {
    let (mut creditors, mut debtors) = partition(balances);

    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut settlements = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < creditors.len() && j < debtors.len() {
        let amount = creditors[i].remaining.min(debtors[j].remaining);

        if amount.is_positive() {
            settlements.push(Settlement::new(
                group_id,
                debtors[j].member_id,
                creditors[i].member_id,
                amount,
            ));
        }

        creditors[i].remaining -= amount;
        debtors[j].remaining -= amount;

        if creditors[i].remaining.is_zero() {
            i += 1;
        }
        if debtors[j].remaining.is_zero() {
            j += 1;
        }
    }

    settlements
}

/// Split balances into creditors (owed money) and debtors (owing money)
///
/// Debtor amounts are stored as positive magnitudes. Settled members are
/// left out of both lists.
fn partition(balances: &[MemberBalance]) -> (Vec<Position>, Vec<Position>) {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for balance in balances {
        if balance.is_creditor() {
            creditors.push(Position {
                member_id: balance.member_id,
                remaining: balance.balance,
            });
        } else if balance.is_debtor() {
            debtors.push(Position {
                member_id: balance.member_id,
                remaining: balance.balance.abs(),
            });
        }
    }

    (creditors, debtors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn members(group: GroupId, names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Member::with_sort_order(group, *name, i as i32))
            .collect()
    }

    fn expense(group: GroupId, payer: &Member, amount: i64, participants: &[&Member]) -> Expense {
        Expense::new(
            group,
            payer.id,
            "Expense",
            Money::new(amount),
            participants.iter().map(|m| m.id).collect(),
        )
    }

    fn triples(settlements: &[Settlement]) -> Vec<(MemberId, MemberId, Money)> {
        let mut keys: Vec<_> = settlements.iter().map(|s| s.transfer_key()).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_single_payer_example() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob", "Carol"]);
        let expenses = vec![expense(group, &ms[0], 3000, &[&ms[0], &ms[1], &ms[2]])];

        let settlements = compute_settlements(&expenses, &ms, group);

        assert_eq!(settlements.len(), 2);
        assert_eq!(settlements[0].from_member_id, ms[1].id);
        assert_eq!(settlements[0].to_member_id, ms[0].id);
        assert_eq!(settlements[0].amount, Money::new(1000));
        assert_eq!(settlements[1].from_member_id, ms[2].id);
        assert_eq!(settlements[1].to_member_id, ms[0].id);
        assert_eq!(settlements[1].amount, Money::new(1000));
        assert!(settlements.iter().all(|s| !s.is_paid && s.paid_at.is_none()));
        assert!(settlements.iter().all(|s| s.group_id == group));
    }

    #[test]
    fn test_no_expenses_gives_no_settlements() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob"]);
        assert!(compute_settlements(&[], &ms, group).is_empty());
    }

    #[test]
    fn test_one_sided_balances_give_no_settlements() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob"]);
        let balances = vec![
            MemberBalance::new(ms[0].id, "Alice", Money::new(500), Money::zero()),
            MemberBalance::new(ms[1].id, "Bob", Money::zero(), Money::zero()),
        ];
        assert!(settle_balances(&balances, group).is_empty());
    }

    #[test]
    fn test_largest_debtor_pays_largest_creditor_first() {
        let group = GroupId::new();
        let ms = members(group, &["A", "B", "C", "D"]);
        let balances = vec![
            MemberBalance::new(ms[0].id, "A", Money::new(300), Money::zero()),
            MemberBalance::new(ms[1].id, "B", Money::new(700), Money::zero()),
            MemberBalance::new(ms[2].id, "C", Money::zero(), Money::new(400)),
            MemberBalance::new(ms[3].id, "D", Money::zero(), Money::new(600)),
        ];

        let settlements = settle_balances(&balances, group);

        let got: Vec<_> = settlements
            .iter()
            .map(|s| (s.from_member_id, s.to_member_id, s.amount))
            .collect();
        assert_eq!(
            got,
            vec![
                (ms[3].id, ms[1].id, Money::new(600)),
                (ms[2].id, ms[1].id, Money::new(100)),
                (ms[2].id, ms[0].id, Money::new(300)),
            ]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let group = GroupId::new();
        let ms = members(group, &["A", "B", "C"]);
        let balances = vec![
            MemberBalance::new(ms[0].id, "A", Money::zero(), Money::new(500)),
            MemberBalance::new(ms[1].id, "B", Money::zero(), Money::new(500)),
            MemberBalance::new(ms[2].id, "C", Money::new(1000), Money::zero()),
        ];

        let settlements = settle_balances(&balances, group);

        assert_eq!(settlements.len(), 2);
        assert_eq!(settlements[0].from_member_id, ms[0].id);
        assert_eq!(settlements[1].from_member_id, ms[1].id);
    }

    #[test]
    fn test_remainder_stays_with_creditor() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob", "Carol"]);
        let expenses = vec![expense(group, &ms[0], 100, &[&ms[0], &ms[1], &ms[2]])];

        let settlements = compute_settlements(&expenses, &ms, group);

        assert_eq!(settlements.len(), 2);
        assert!(settlements.iter().all(|s| s.amount == Money::new(33)));
        let received: Money = settlements.iter().map(|s| s.amount).sum();
        assert_eq!(received, Money::new(66));
    }

    #[test]
    fn test_transfers_reproduce_balances() {
        let group = GroupId::new();
        let ms = members(group, &["A", "B", "C", "D", "E"]);
        let expenses = vec![
            expense(group, &ms[0], 5000, &[&ms[0], &ms[1], &ms[2], &ms[3], &ms[4]]),
            expense(group, &ms[1], 1200, &[&ms[1], &ms[2], &ms[3]]),
            expense(group, &ms[3], 800, &[&ms[0], &ms[4]]),
            expense(group, &ms[4], 3000, &[&ms[2]]),
        ];

        let balances = compute_balances(&expenses, &ms);
        let settlements = compute_settlements(&expenses, &ms, group);

        let mut received: HashMap<MemberId, Money> = HashMap::new();
        let mut paid: HashMap<MemberId, Money> = HashMap::new();
        for s in &settlements {
            assert!(s.amount.is_positive());
            *received.entry(s.to_member_id).or_default() += s.amount;
            *paid.entry(s.from_member_id).or_default() += s.amount;
        }

        for b in &balances {
            if b.is_creditor() {
                assert_eq!(received.get(&b.member_id).copied(), Some(b.balance));
                assert!(!paid.contains_key(&b.member_id));
            } else if b.is_debtor() {
                assert_eq!(paid.get(&b.member_id).copied(), Some(b.balance.abs()));
                assert!(!received.contains_key(&b.member_id));
            } else {
                assert!(!received.contains_key(&b.member_id));
                assert!(!paid.contains_key(&b.member_id));
            }
        }
    }

    #[test]
    fn test_idempotent_triples() {
        let group = GroupId::new();
        let ms = members(group, &["A", "B", "C"]);
        let expenses = vec![
            expense(group, &ms[0], 900, &[&ms[0], &ms[1], &ms[2]]),
            expense(group, &ms[1], 600, &[&ms[0], &ms[2]]),
        ];

        let first = compute_settlements(&expenses, &ms, group);
        let second = compute_settlements(&expenses, &ms, group);

        assert_eq!(triples(&first), triples(&second));
        assert_ne!(first[0].id, second[0].id);
    }
}
