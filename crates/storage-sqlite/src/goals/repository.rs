use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use onekaday_core::errors::Error;
use onekaday_core::goals::{Goal, GoalRepositoryTrait, GoalStatus, NewGoal};
use onekaday_core::Result;

use super::model::GoalDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::goals;
use crate::utils::{decimal_to_text, now_utc};

pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

fn find_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<Goal> {
    goals::table
        .find(goal_id)
        .select(GoalDB::as_select())
        .first::<GoalDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::NotFound("Goal".to_string()))?
        .into_domain()
}

impl GoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        find_goal(&mut conn, goal_id)
    }

    fn list_goals(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = goals::table
            .filter(goals::user_id.eq(user_id))
            .select(GoalDB::as_select())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(goals::status.eq(status.as_str()));
        }
        query
            .order((goals::target_date.asc(), goals::created_at.asc()))
            .load::<GoalDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(GoalDB::into_domain)
            .collect()
    }

    async fn insert_goal(&self, user_id: String, new_goal: NewGoal) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let now = now_utc();
                let row = GoalDB {
                    id: Uuid::new_v4().to_string(),
                    user_id,
                    title: new_goal.title,
                    description: new_goal.description,
                    target_amount: decimal_to_text(new_goal.target_amount),
                    target_date: new_goal.target_date,
                    status: GoalStatus::Active.as_str().to_string(),
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(goals::table)
                    .values(&row)
                    .returning(GoalDB::as_returning())
                    .get_result::<GoalDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }

    async fn update_status(
        &self,
        user_id: String,
        goal_id: String,
        status: GoalStatus,
    ) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let goal = find_goal(conn, &goal_id)?;
                goal.ensure_owned_by(&user_id)?;
                diesel::update(goals::table.find(&goal_id))
                    .set((
                        goals::status.eq(status.as_str()),
                        goals::updated_at.eq(now_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                find_goal(conn, &goal_id)
            })
            .await
    }

    async fn delete_goal(&self, user_id: String, goal_id: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                find_goal(conn, &goal_id)?.ensure_owned_by(&user_id)?;
                diesel::delete(goals::table.find(&goal_id))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
