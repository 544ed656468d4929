use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// Type aliases for clarity
pub type CohortId = u8;
pub type RoomCode = String;
pub type RollNumber = String;

/// Every room is laid out in rows of this many seats.
pub const COLUMNS_PER_ROW: usize = 9;

/// Largest room the allocator accepts (100 rows).
pub const MAX_CAPACITY: usize = 100 * COLUMNS_PER_ROW;

/// A physical exam room with `capacity / 9` rows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub code: RoomCode,
    pub capacity: usize,
}

/// One seat in one room. `roll` is `None` when the column's cohort ran out of students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    pub room_code: RoomCode,
    pub row: usize,
    pub col: usize,
    pub cohort: CohortId,
    pub roll: Option<RollNumber>,
}

/// The complete input for one allocation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub rosters: BTreeMap<CohortId, Vec<RollNumber>>,
    pub cohorts: BTreeSet<CohortId>,
    pub capacity: usize,
    pub room_limit: usize,
    pub start_room_code: RoomCode,
}

/// Two neighbouring filled seats in a row that hold the same cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyWarning {
    pub room_code: RoomCode,
    pub row: usize,
    pub left_col: usize,
    pub cohort: CohortId,
}

impl fmt::Display for AdjacencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] row {} columns {}-{} both seat cohort {}",
            self.room_code,
            self.row,
            self.left_col,
            self.left_col + 1,
            self.cohort
        )
    }
}

/// The final output of the allocator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationOutcome {
    pub assignments: Vec<SeatAssignment>,
    pub rooms: Vec<RoomCode>,
    pub filled_seats: usize,
    pub empty_seats: usize,
    pub adjacency_warnings: Vec<AdjacencyWarning>,
}

/// Tabular roster upload, already decoded from whatever file format it came in.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Per-date timetable entry; a blank or dash subject means that cohort sits no exam.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRow {
    pub date: NaiveDate,
    #[serde(default)]
    pub i_year_subject: Option<String>,
    #[serde(default)]
    pub ii_year_subject: Option<String>,
    #[serde(default)]
    pub iii_year_subject: Option<String>,
}

/// Flat seating listing entry as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub room: RoomCode,
    pub row: usize,
    pub col: usize,
    pub roll: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpload {
    pub cohort: Option<CohortId>,
    #[serde(default)]
    pub file_name: String,
    pub table: RosterTable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableUpload {
    pub rows: Vec<TimetableRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub date: NaiveDate,
    pub capacity: Option<usize>,
    pub rooms: Option<usize>,
    pub start: Option<RoomCode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub created_entries: usize,
    pub rooms: Vec<RoomCode>,
    pub filled_seats: usize,
    pub empty_seats: usize,
    pub adjacency_warnings: Vec<String>,
}

impl From<AllocationOutcome> for GenerateResponse {
    fn from(outcome: AllocationOutcome) -> Self {
        Self {
            created_entries: outcome.assignments.len(),
            rooms: outcome.rooms,
            filled_seats: outcome.filled_seats,
            empty_seats: outcome.empty_seats,
            adjacency_warnings: outcome
                .adjacency_warnings
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
