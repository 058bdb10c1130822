use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::goals_model::{Goal, GoalStatus, NewGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::constants::GOAL_TITLE_MAX_LENGTH;
use crate::errors::{Result, ValidationError};
use crate::utils::input::{to_money, validate_amount};

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(goal_repo: Arc<dyn GoalRepositoryTrait>) -> Self {
        GoalService { goal_repo }
    }

    async fn set_status(&self, user_id: &str, goal_id: &str, status: GoalStatus) -> Result<Goal> {
        let goal = self
            .goal_repo
            .update_status(user_id.to_string(), goal_id.to_string(), status)
            .await?;
        debug!("Goal {} is now {}", goal.id, goal.status);
        Ok(goal)
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn set_goal(&self, user_id: &str, mut new_goal: NewGoal) -> Result<Goal> {
        validate_amount(new_goal.target_amount, "targetAmount")?;
        if new_goal
            .title
            .as_deref()
            .is_some_and(|t| t.chars().count() > GOAL_TITLE_MAX_LENGTH)
        {
            return Err(ValidationError::invalid(
                "title",
                format!("must be at most {GOAL_TITLE_MAX_LENGTH} characters"),
            )
            .into());
        }
        new_goal.target_amount = to_money(new_goal.target_amount);
        self.goal_repo
            .insert_goal(user_id.to_string(), new_goal)
            .await
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let goal = self.goal_repo.get_goal(goal_id)?;
        goal.ensure_owned_by(user_id)?;
        Ok(goal)
    }

    async fn mark_completed(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.set_status(user_id, goal_id, GoalStatus::Completed).await
    }

    async fn mark_active(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.set_status(user_id, goal_id, GoalStatus::Active).await
    }

    fn list_active(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repo.list_goals(user_id, Some(GoalStatus::Active))
    }

    fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repo.list_goals(user_id, None)
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        self.goal_repo
            .delete_goal(user_id.to_string(), goal_id.to_string())
            .await
    }
}
