//! Reminder domain model.
//!
//! # Responsibility
//! - Define the reminder record and its due/shown lifecycle.
//! - Resolve relative reminder rules against a task deadline.
//!
//! # Invariants
//! - Reminder identity is the pair `(task_id, date)`; `shown` never
//!   participates in equality.
//! - Resolved reminder dates are never in the past at creation time.

use crate::model::task::TaskId;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One scheduled notification for a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Task this reminder belongs to.
    pub task_id: TaskId,
    /// Calendar date on which the reminder comes due.
    pub date: NaiveDate,
    /// Whether the scheduler already delivered this reminder.
    #[serde(default)]
    pub shown: bool,
}

impl Reminder {
    /// Creates an undelivered reminder.
    pub fn new(task_id: TaskId, date: NaiveDate) -> Self {
        Self {
            task_id,
            date,
            shown: false,
        }
    }

    /// Returns whether the reminder date has arrived.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.date <= today
    }
}

impl PartialEq for Reminder {
    fn eq(&self, other: &Self) -> bool {
        self.task_id == other.task_id && self.date == other.date
    }
}

impl Eq for Reminder {}

/// How a reminder date is chosen when creating a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderRule {
    /// Remind on this exact date, independent of any deadline.
    OnDate(NaiveDate),
    /// One day before the task deadline.
    DayBefore,
    /// Seven days before the task deadline.
    WeekBefore,
    /// One calendar month before the task deadline (day clamped as needed).
    MonthBefore,
}

impl ReminderRule {
    /// Resolves this rule to a concrete reminder date.
    ///
    /// # Errors
    /// - [`ReminderDateError::NoDeadline`] when a relative rule is applied to
    ///   a task without a deadline.
    /// - [`ReminderDateError::DateInPast`] when the resolved date is strictly
    ///   before `today`.
    pub fn resolve(
        self,
        deadline: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<NaiveDate, ReminderDateError> {
        let date = match self {
            Self::OnDate(date) => date,
            Self::DayBefore => sub_days(require_deadline(deadline)?, 1),
            Self::WeekBefore => sub_days(require_deadline(deadline)?, 7),
            Self::MonthBefore => require_deadline(deadline)?
                .checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDate::MIN),
        };

        if date < today {
            return Err(ReminderDateError::DateInPast(date));
        }
        Ok(date)
    }
}

/// Why a reminder rule could not produce a usable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderDateError {
    /// A relative rule needs a task deadline and the task has none.
    NoDeadline,
    /// The resolved date already lies in the past.
    DateInPast(NaiveDate),
}

impl Display for ReminderDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDeadline => write!(f, "task has no deadline to derive a reminder date from"),
            Self::DateInPast(date) => write!(f, "reminder date {date} is in the past"),
        }
    }
}

impl Error for ReminderDateError {}

fn require_deadline(deadline: Option<NaiveDate>) -> Result<NaiveDate, ReminderDateError> {
    deadline.ok_or(ReminderDateError::NoDeadline)
}

// Calendar underflow clamps to the representable minimum, which the in-past
// check then rejects.
fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}
