use chrono::NaiveDate;
use thiserror::Error;

/// Input errors raised by the allocator before any room is materialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("Room capacity must be a non-zero multiple of 9 no larger than 900 (got {capacity})")]
    InvalidCapacity { capacity: usize },

    #[error("No exams for any cohort on that date")]
    NoExamScheduled,

    #[error("At most 9 cohorts can share a room (got {count})")]
    TooManyCohorts { count: usize },

    #[error("Need at least {minimum} rooms based on students and capacity (got {requested})")]
    InsufficientRooms { requested: usize, minimum: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatingError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("No timetable entry for {date}")]
    NoTimetableEntry { date: NaiveDate },

    #[error("No students uploaded for the cohorts scheduled on {date}")]
    NoStudents { date: NaiveDate },
}
