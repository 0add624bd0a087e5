//! Expense service
//!
//! Every mutation here changes who owes whom, so each one finishes by
//! running the settlement reconciler for the group.

use tracing::debug;

use crate::audit::EntityType;
use crate::error::{WarikanError, WarikanResult};
use crate::models::{Expense, ExpenseId, GroupId, MemberId, Money};
use crate::storage::Storage;

use super::settlement::SettlementService;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Input for recording a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub payer_id: MemberId,
    pub title: String,
    pub amount: Money,
    pub participant_ids: Vec<MemberId>,
}

/// Fields to change on an expense; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub payer_id: Option<MemberId>,
    pub title: Option<String>,
    pub amount: Option<Money>,
    pub participant_ids: Option<Vec<MemberId>>,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense and recalculate the group's settlements
    pub fn add(&self, group_id: GroupId, input: NewExpense) -> WarikanResult<Expense> {
        self.storage
            .groups
            .get(group_id)?
            .ok_or_else(|| WarikanError::group_not_found(group_id.to_string()))?;

        let expense = Expense::new(
            group_id,
            input.payer_id,
            input.title.trim(),
            input.amount,
            input.participant_ids,
        );
        self.validate(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.title.clone()),
            &expense,
        )?;

        debug!(expense = %expense.id, amount = %expense.amount, "expense added");
        SettlementService::new(self.storage).recalculate(group_id)?;

        Ok(expense)
    }

    /// A group's expenses, newest first
    pub fn list(&self, group_id: GroupId) -> WarikanResult<Vec<Expense>> {
        self.storage.expenses.get_by_group(group_id)
    }

    /// Find an expense of a group by id
    pub fn find(&self, group_id: GroupId, identifier: &str) -> WarikanResult<Expense> {
        self.storage
            .expenses
            .find_in_group(group_id, identifier)?
            .ok_or_else(|| WarikanError::expense_not_found(identifier))
    }

    /// Edit any field of an expense and recalculate
    pub fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> WarikanResult<Expense> {
        let before = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| WarikanError::expense_not_found(id.to_string()))?;

        let mut expense = before.clone();
        if let Some(payer_id) = changes.payer_id {
            expense.payer_id = payer_id;
        }
        if let Some(title) = changes.title {
            expense.title = title.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(participant_ids) = changes.participant_ids {
            expense.set_participants(participant_ids);
        }
        self.validate(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.title.clone()),
            &before,
            &expense,
            None,
        )?;

        SettlementService::new(self.storage).recalculate(expense.group_id)?;

        Ok(expense)
    }

    /// Delete an expense and recalculate
    pub fn delete(&self, id: ExpenseId) -> WarikanResult<Expense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| WarikanError::expense_not_found(id.to_string()))?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.title.clone()),
            &expense,
        )?;

        SettlementService::new(self.storage).recalculate(expense.group_id)?;

        Ok(expense)
    }

    /// Sum of every expense in the group
    pub fn total_spent(&self, group_id: GroupId) -> WarikanResult<Money> {
        Ok(self.list(group_id)?.iter().map(|e| e.amount).sum())
    }

    /// Field checks plus membership of the payer and every participant
    fn validate(&self, expense: &Expense) -> WarikanResult<()> {
        expense
            .validate()
            .map_err(|e| WarikanError::Validation(e.to_string()))?;

        let members = self.storage.members.get_by_group(expense.group_id)?;
        let in_group = |id: &MemberId| members.iter().any(|m| m.id == *id);

        if !in_group(&expense.payer_id) {
            return Err(WarikanError::Validation(format!(
                "Payer {} is not a member of this group",
                expense.payer_id
            )));
        }

        if let Some(stranger) = expense.participant_ids.iter().find(|id| !in_group(id)) {
            return Err(WarikanError::Validation(format!(
                "Participant {} is not a member of this group",
                stranger
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Member};

    fn setup() -> (Storage, GroupId, Vec<Member>) {
        let storage = Storage::in_memory();
        let group = Group::new("Trip");
        let group_id = group.id;
        storage.groups.upsert(group).unwrap();

        let members: Vec<_> = ["Alice", "Bob", "Carol"]
            .iter()
            .enumerate()
            .map(|(i, n)| Member::with_sort_order(group_id, *n, i as i32))
            .collect();
        for m in &members {
            storage.members.upsert(m.clone()).unwrap();
        }
        (storage, group_id, members)
    }

    fn dinner(members: &[Member], amount: i64) -> NewExpense {
        NewExpense {
            payer_id: members[0].id,
            title: " Dinner ".into(),
            amount: Money::new(amount),
            participant_ids: members.iter().map(|m| m.id).collect(),
        }
    }

    #[test]
    fn test_add_recalculates() {
        let (storage, group, members) = setup();
        let service = ExpenseService::new(&storage);

        let expense = service.add(group, dinner(&members, 3000)).unwrap();

        assert_eq!(expense.title, "Dinner");
        let settlements = storage.settlements.get_by_group(group).unwrap();
        assert_eq!(settlements.len(), 2);
        assert_eq!(service.total_spent(group).unwrap(), Money::new(3000));
    }

    #[test]
    fn test_add_validation() {
        let (storage, group, members) = setup();
        let service = ExpenseService::new(&storage);

        let mut zero = dinner(&members, 0);
        assert!(service.add(group, zero.clone()).unwrap_err().is_validation());

        zero.amount = Money::new(100);
        zero.participant_ids.clear();
        assert!(service.add(group, zero).unwrap_err().is_validation());

        let mut stranger = dinner(&members, 100);
        stranger.participant_ids.push(MemberId::new());
        assert!(service.add(group, stranger).unwrap_err().is_validation());

        let mut outsider = dinner(&members, 100);
        outsider.payer_id = MemberId::new();
        assert!(service.add(group, outsider).unwrap_err().is_validation());

        assert!(service.list(group).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_amounts_rejected_before_storing() {
        let (storage, group, members) = setup();
        let service = ExpenseService::new(&storage);

        let huge = Money::parse("5000000000000000000").unwrap();
        assert!(service.add(group, dinner(&members, huge.units())).unwrap_err().is_validation());
        assert!(service.add(group, dinner(&members, huge.units())).unwrap_err().is_validation());
        assert!(service.list(group).unwrap().is_empty());

        let max = service
            .add(group, dinner(&members, crate::models::MAX_EXPENSE_AMOUNT.units()))
            .unwrap();
        assert!(service
            .update(
                max.id,
                ExpenseUpdate {
                    amount: Some(Money::new(i64::MAX)),
                    ..Default::default()
                },
            )
            .unwrap_err()
            .is_validation());
        assert_eq!(storage.settlements.get_by_group(group).unwrap().len(), 2);
    }

    #[test]
    fn test_update_drops_stale_paid_status() {
        let (storage, group, members) = setup();
        let service = ExpenseService::new(&storage);
        let settlements = SettlementService::new(&storage);

        let expense = service.add(group, dinner(&members, 3000)).unwrap();
        let first = settlements.list(group).unwrap();
        settlements
            .set_paid(group, &first[0].id.to_string(), true)
            .unwrap();

        service
            .update(
                expense.id,
                ExpenseUpdate {
                    amount: Some(Money::new(4500)),
                    ..Default::default()
                },
            )
            .unwrap();

        let after = settlements.list(group).unwrap();
        assert!(after.iter().all(|s| s.amount == Money::new(1500) && !s.is_paid));
    }

    #[test]
    fn test_update_participants_collapses_duplicates() {
        let (storage, group, members) = setup();
        let service = ExpenseService::new(&storage);
        let expense = service.add(group, dinner(&members, 3000)).unwrap();

        let updated = service
            .update(
                expense.id,
                ExpenseUpdate {
                    participant_ids: Some(vec![members[1].id, members[1].id]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.participant_ids, vec![members[1].id]);
        let settlements = storage.settlements.get_by_group(group).unwrap();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].amount, Money::new(3000));
    }

    #[test]
    fn test_delete_clears_settlements() {
        let (storage, group, members) = setup();
        let service = ExpenseService::new(&storage);
        let expense = service.add(group, dinner(&members, 3000)).unwrap();

        service.delete(expense.id).unwrap();

        assert!(storage.settlements.get_by_group(group).unwrap().is_empty());
        assert!(service.delete(expense.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_newest_first() {
        let (storage, group, members) = setup();
        let service = ExpenseService::new(&storage);
        let first = service.add(group, dinner(&members, 300)).unwrap();
        let mut second = dinner(&members, 600);
        second.title = "Taxi".into();
        let second = service.add(group, second).unwrap();

        let ids: Vec<_> = service.list(group).unwrap().iter().map(|e| e.id).collect();
        if first.created_at == second.created_at {
            assert_eq!(ids.len(), 2);
        } else {
            assert_eq!(ids, vec![second.id, first.id]);
        }
        assert_eq!(service.find(group, &first.id.to_string()).unwrap().id, first.id);
    }
}
