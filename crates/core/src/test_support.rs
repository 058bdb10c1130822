//! In-memory repositories shared by the service unit tests.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus, NewGoal};
use crate::income::{
    IncomeEntry, IncomeEntryUpdate, IncomeFilter, IncomeRepositoryTrait, NewIncomeEntry,
};

/// Monotonic fake clock so `created_at` reflects insertion order.
fn tick(counter: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::seconds(counter as i64)
}

#[derive(Default)]
pub struct InMemoryIncomeRepository {
    entries: RwLock<Vec<IncomeEntry>>,
    inserted: RwLock<usize>,
}

impl InMemoryIncomeRepository {
    pub fn with_entries(entries: Vec<IncomeEntry>) -> Self {
        let count = entries.len();
        Self {
            entries: RwLock::new(entries),
            inserted: RwLock::new(count),
        }
    }
}

#[async_trait]
impl IncomeRepositoryTrait for InMemoryIncomeRepository {
    fn get_entry(&self, entry_id: &str) -> Result<IncomeEntry> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.id == entry_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Income entry".to_string()))
    }

    fn list_entries(&self, user_id: &str, filter: &IncomeFilter) -> Result<Vec<IncomeEntry>> {
        let mut entries: Vec<IncomeEntry> = self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        if let Some(limit) = filter.limit {
            entries.truncate(limit as usize);
        }
        Ok(entries)
    }

    async fn insert_entry(&self, user_id: String, new_entry: NewIncomeEntry) -> Result<IncomeEntry> {
        let mut counter = self.inserted.write().unwrap();
        *counter += 1;
        let now = tick(*counter);
        let entry = IncomeEntry {
            id: format!("entry-{}", *counter),
            user_id,
            amount: new_entry.amount,
            source: new_entry.source,
            description: new_entry.description,
            date: new_entry.date,
            created_at: now,
            updated_at: now,
        };
        self.entries.write().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        user_id: String,
        entry_id: String,
        update: IncomeEntryUpdate,
    ) -> Result<IncomeEntry> {
        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| Error::NotFound("Income entry".to_string()))?;
        entry.ensure_owned_by(&user_id)?;
        let now = entry.updated_at + Duration::seconds(1);
        entry.apply_update(&update, now);
        Ok(entry.clone())
    }

    async fn delete_entry(&self, user_id: String, entry_id: String) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        let position = entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| Error::NotFound("Income entry".to_string()))?;
        entries[position].ensure_owned_by(&user_id)?;
        entries.remove(position);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryGoalRepository {
    goals: RwLock<Vec<Goal>>,
}

impl InMemoryGoalRepository {
    pub fn with_goals(goals: Vec<Goal>) -> Self {
        Self {
            goals: RwLock::new(goals),
        }
    }
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryGoalRepository {
    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.goals
            .read()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Goal".to_string()))
    }

    fn list_goals(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .read()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id && status.map_or(true, |s| g.status == s))
            .cloned()
            .collect();
        goals.sort_by(|a, b| {
            a.target_date
                .cmp(&b.target_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(goals)
    }

    async fn insert_goal(&self, user_id: String, new_goal: NewGoal) -> Result<Goal> {
        let mut goals = self.goals.write().unwrap();
        let now = tick(goals.len() + 1);
        let goal = Goal {
            id: format!("goal-{}", goals.len() + 1),
            user_id,
            title: new_goal.title,
            description: new_goal.description,
            target_amount: new_goal.target_amount,
            target_date: new_goal.target_date,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        };
        goals.push(goal.clone());
        Ok(goal)
    }

    async fn update_status(
        &self,
        user_id: String,
        goal_id: String,
        status: GoalStatus,
    ) -> Result<Goal> {
        let mut goals = self.goals.write().unwrap();
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| Error::NotFound("Goal".to_string()))?;
        goal.ensure_owned_by(&user_id)?;
        goal.status = status;
        Ok(goal.clone())
    }

    async fn delete_goal(&self, user_id: String, goal_id: String) -> Result<()> {
        let mut goals = self.goals.write().unwrap();
        let position = goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| Error::NotFound("Goal".to_string()))?;
        goals[position].ensure_owned_by(&user_id)?;
        goals.remove(position);
        Ok(())
    }
}
