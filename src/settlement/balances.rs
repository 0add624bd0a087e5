//! Balance calculation
//!
//! Reduces a group's expenses to one (paid, owed, net) summary per member.

use std::collections::HashMap;

use crate::models::{Expense, Member, MemberBalance, MemberId, Money};

/// Compute each member's balance, in the order of `members`
///
/// Every expense credits its full amount to the payer and charges each
/// participant `floor(amount / participants)`. The division remainder is
/// not charged to anyone and not refunded to the payer. Expenses without
/// participants are skipped, and ids that don't name a supplied member are
/// ignored.
pub fn compute_balances(expenses: &[Expense], members: &[Member]) -> Vec<MemberBalance> {
    let mut totals: HashMap<MemberId, (Money, Money)> = members
        .iter()
        .map(|m| (m.id, (Money::zero(), Money::zero())))
        .collect();

    for expense in expenses {
        let Some(share) = expense.share_per_participant() else {
            continue;
        };

        if let Some((paid, _)) = totals.get_mut(&expense.payer_id) {
            *paid += expense.amount;
        }

        for participant in &expense.participant_ids {
            if let Some((_, owed)) = totals.get_mut(participant) {
                *owed += share;
            }
        }
    }

    members
        .iter()
        .map(|member| {
            let (paid, owed) = totals
                .get(&member.id)
                .copied()
                .unwrap_or((Money::zero(), Money::zero()));
            MemberBalance::new(member.id, member.name.clone(), paid, owed)
        })
        .collect()
}

/// Amount that floor division left unallocated across all expenses
///
/// This is exactly `-(sum of all balances)` when every payer and
/// participant is a known member.
pub fn unallocated_remainder(expenses: &[Expense]) -> Money {
    expenses
        .iter()
        .filter_map(|e| {
            let share = e.share_per_participant()?;
            let charged: Money = std::iter::repeat(share).take(e.participant_ids.len()).sum();
            Some(e.amount - charged)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupId;

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

    #[test]
    fn test_even_split_paid_by_one() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob", "Carol"]);
        let expenses = vec![expense(group, &ms[0], 3000, &[&ms[0], &ms[1], &ms[2]])];

        let balances = compute_balances(&expenses, &ms);

        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].member_name, "Alice");
        assert_eq!(balances[0].total_paid, Money::new(3000));
        assert_eq!(balances[0].total_owed, Money::new(1000));
        assert_eq!(balances[0].balance, Money::new(2000));
        assert_eq!(balances[1].balance, Money::new(-1000));
        assert_eq!(balances[2].balance, Money::new(-1000));
    }

    #[test]
    fn test_uneven_split_drops_remainder() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob", "Carol"]);
        let expenses = vec![expense(group, &ms[0], 100, &[&ms[0], &ms[1], &ms[2]])];

        let balances = compute_balances(&expenses, &ms);

        assert_eq!(balances[0].total_owed, Money::new(33));
        assert_eq!(balances[0].balance, Money::new(67));
        assert_eq!(balances[1].balance, Money::new(-33));
        assert_eq!(balances[2].balance, Money::new(-33));

        let net: Money = balances.iter().map(|b| b.balance).sum();
        assert_eq!(net, Money::new(1));
        assert_eq!(unallocated_remainder(&expenses), Money::new(1));
    }

    #[test]
    fn test_no_expenses_gives_zero_balances() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob"]);

        let balances = compute_balances(&[], &ms);

        assert_eq!(balances.len(), 2);
        assert!(balances.iter().all(|b| b.total_paid.is_zero()
            && b.total_owed.is_zero()
            && b.is_settled()));
    }

    #[test]
    fn test_expense_without_participants_is_skipped() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob"]);
        let expenses = vec![expense(group, &ms[0], 5000, &[])];

        let balances = compute_balances(&expenses, &ms);

        assert!(balances.iter().all(|b| b.total_paid.is_zero()));
    }

    #[test]
    fn test_unknown_member_ids_are_ignored() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob"]);
        let stranger = Member::new(group, "Stranger");

        let expenses = vec![
            expense(group, &stranger, 2000, &[&ms[0], &ms[1]]),
            expense(group, &ms[0], 1000, &[&ms[0], &stranger]),
        ];

        let balances = compute_balances(&expenses, &ms);

        assert_eq!(balances[0].total_paid, Money::new(1000));
        assert_eq!(balances[0].total_owed, Money::new(1500));
        assert_eq!(balances[1].total_paid, Money::zero());
        assert_eq!(balances[1].total_owed, Money::new(1000));
    }

    #[test]
    fn test_payer_outside_participants() {
        let group = GroupId::new();
        let ms = members(group, &["Alice", "Bob", "Carol"]);
        let expenses = vec![expense(group, &ms[0], 2000, &[&ms[1], &ms[2]])];

        let balances = compute_balances(&expenses, &ms);

        assert_eq!(balances[0].balance, Money::new(2000));
        assert_eq!(balances[1].balance, Money::new(-1000));
        assert_eq!(balances[2].balance, Money::new(-1000));
    }

    #[test]
    fn test_net_equals_paid_minus_allocated() {
        let group = GroupId::new();
        let ms = members(group, &["A", "B", "C", "D"]);
        let expenses = vec![
            expense(group, &ms[0], 1001, &[&ms[0], &ms[1], &ms[2]]),
            expense(group, &ms[1], 999, &[&ms[1], &ms[3]]),
            expense(group, &ms[2], 7, &[&ms[0], &ms[1], &ms[2], &ms[3]]),
            expense(group, &ms[3], 4000, &[&ms[0], &ms[1], &ms[2], &ms[3]]),
        ];

        let balances = compute_balances(&expenses, &ms);

        let total_paid: Money = expenses.iter().map(|e| e.amount).sum();
        let allocated: Money = balances.iter().map(|b| b.total_owed).sum();
        let net: Money = balances.iter().map(|b| b.balance).sum();
        assert_eq!(net, total_paid - allocated);
        assert_eq!(net, unallocated_remainder(&expenses));
    }
}
