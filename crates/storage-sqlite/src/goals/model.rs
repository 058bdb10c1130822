//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use std::str::FromStr;

use onekaday_core::goals::{Goal, GoalStatus};
use onekaday_core::Result;

use crate::utils::parse_stored_decimal;

/// Database model for goals
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: String,
    pub target_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl GoalDB {
    pub fn into_domain(self) -> Result<Goal> {
        Ok(Goal {
            target_amount: parse_stored_decimal(&self.target_amount, "goals.target_amount")?,
            status: GoalStatus::from_str(&self.status)?,
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            target_date: self.target_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
