//! Goals domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::GOAL_TITLE_MAX_LENGTH;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::input::{normalize_text, parse_date, parse_raw_amount, RawAmount};

/// Lifecycle status of a goal. Transitions are user-initiated only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(Error::Unexpected(format!("Unknown goal status '{other}'"))),
        }
    }
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    pub fn ensure_owned_by(&self, user_id: &str) -> Result<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(Error::Forbidden("Goal".to_string()))
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

/// Validated input for creating a new goal
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub target_amount: Decimal,
    pub target_date: NaiveDate,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Goal fields as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub target_amount: Option<RawAmount>,
    pub target_date: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl GoalInput {
    pub fn into_new_goal(self) -> std::result::Result<NewGoal, ValidationError> {
        let target_amount = parse_raw_amount(self.target_amount.as_ref(), "targetAmount")?;
        let target_date = match self.target_date.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingField("targetDate".into())),
            Some(raw) => parse_date(raw, "targetDate")?,
        };
        Ok(NewGoal {
            target_amount,
            target_date,
            title: normalize_text(self.title, "title", Some(GOAL_TITLE_MAX_LENGTH))?,
            description: normalize_text(self.description, "description", None)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_round_trips_through_text() {
        for status in [GoalStatus::Active, GoalStatus::Completed] {
            assert_eq!(status.as_str().parse::<GoalStatus>().unwrap(), status);
        }
        assert!("archived".parse::<GoalStatus>().is_err());
    }

    #[test]
    fn goal_input_requires_amount_and_date() {
        let goal = GoalInput {
            target_amount: Some("1000".into()),
            target_date: Some("2024-12-31".into()),
            title: Some(" Holiday fund ".into()),
            description: None,
        }
        .into_new_goal()
        .unwrap();
        assert_eq!(goal.target_amount, dec!(1000.00));
        assert_eq!(goal.title.as_deref(), Some("Holiday fund"));

        let no_date = GoalInput {
            target_amount: Some("10".into()),
            ..Default::default()
        }
        .into_new_goal()
        .unwrap_err();
        assert_eq!(no_date.field(), Some("targetDate"));

        let zero = GoalInput {
            target_amount: Some("0".into()),
            target_date: Some("2024-12-31".into()),
            ..Default::default()
        }
        .into_new_goal()
        .unwrap_err();
        assert_eq!(zero.field(), Some("targetAmount"));
    }
}
