use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalStatus, NewGoal};
use async_trait::async_trait;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    /// Goals for a user ordered by target date ascending, optionally by status.
    fn list_goals(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>>;
    async fn insert_goal(&self, user_id: String, new_goal: NewGoal) -> Result<Goal>;
    /// Ownership-checked status change inside one write transaction.
    async fn update_status(
        &self,
        user_id: String,
        goal_id: String,
        status: GoalStatus,
    ) -> Result<Goal>;
    async fn delete_goal(&self, user_id: String, goal_id: String) -> Result<()>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn set_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal>;
    /// Ownership-checked read of a single goal.
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    async fn mark_completed(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    async fn mark_active(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    fn list_active(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()>;
}
