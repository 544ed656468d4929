use crate::allocator::{RoomRegistry, allocate};
use crate::data::{
    AllocationOutcome, AllocationRequest, COLUMNS_PER_ROW, CohortId, Room, RoomCode, RollNumber,
    SeatAssignment, SeatView, TimetableRow,
};
use crate::error::SeatingError;
use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Rooms keyed by code. The first capacity a room is created with sticks.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: BTreeMap<RoomCode, Room>,
}

impl RoomTable {
    pub fn get(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl RoomRegistry for RoomTable {
    fn get_or_create(&mut self, code: &str, capacity: usize) -> Room {
        self.rooms
            .entry(code.to_string())
            .or_insert_with(|| {
                debug!("Creating room {} with capacity {}", code, capacity);
                Room {
                    code: code.to_string(),
                    capacity,
                }
            })
            .clone()
    }
}

/// In-memory home for rosters, the timetable, rooms and generated seating.
#[derive(Debug, Default)]
pub struct SeatingStore {
    students: BTreeMap<CohortId, Vec<RollNumber>>,
    timetable: BTreeMap<NaiveDate, TimetableRow>,
    rooms: RoomTable,
    seatings: BTreeMap<NaiveDate, Vec<SeatAssignment>>,
}

impl SeatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds students to a cohort's roster, ignoring rolls already on it.
    ///
    /// Returns how many rolls were submitted, duplicates included.
    pub fn add_students(&mut self, cohort: CohortId, rolls: Vec<RollNumber>) -> usize {
        let submitted = rolls.len();
        let roster = self.students.entry(cohort).or_default();
        let mut known: HashSet<RollNumber> = roster.iter().cloned().collect();
        for roll in rolls {
            if known.insert(roll.clone()) {
                roster.push(roll);
            }
        }
        info!(
            "Cohort {} roster now holds {} students ({} submitted)",
            cohort,
            roster.len(),
            submitted
        );
        submitted
    }

    pub fn roster(&self, cohort: CohortId) -> &[RollNumber] {
        self.students.get(&cohort).map_or(&[][..], Vec::as_slice)
    }

    /// Inserts or replaces timetable rows by date.
    pub fn upsert_timetable(&mut self, rows: Vec<TimetableRow>) -> usize {
        let count = rows.len();
        for row in rows {
            self.timetable.insert(row.date, row);
        }
        count
    }

    /// Cohorts with an exam on `date`, whether or not they have students.
    pub fn scheduled_cohorts(&self, date: NaiveDate) -> Result<Vec<CohortId>, SeatingError> {
        self.timetable
            .get(&date)
            .map(TimetableRow::scheduled_cohorts)
            .ok_or(SeatingError::NoTimetableEntry { date })
    }

    /// Cohorts that sit an exam on `date` and have at least one student.
    pub fn participating_cohorts(&self, date: NaiveDate) -> Result<BTreeSet<CohortId>, SeatingError> {
        Ok(self
            .scheduled_cohorts(date)?
            .into_iter()
            .filter(|cohort| !self.roster(*cohort).is_empty())
            .collect())
    }

    /// Runs the allocator for `date` and stores the result, replacing any
    /// seating previously generated for that date. Nothing is stored on error.
    pub fn generate(
        &mut self,
        date: NaiveDate,
        capacity: usize,
        room_limit: usize,
        start_room_code: &str,
    ) -> Result<AllocationOutcome, SeatingError> {
        let cohorts = self.participating_cohorts(date)?;
        if cohorts.is_empty() && !self.scheduled_cohorts(date)?.is_empty() {
            return Err(SeatingError::NoStudents { date });
        }
        let request = AllocationRequest {
            rosters: cohorts
                .iter()
                .map(|cohort| (*cohort, self.roster(*cohort).to_vec()))
                .collect(),
            cohorts,
            capacity,
            room_limit,
            start_room_code: start_room_code.to_string(),
        };

        let outcome = allocate(&request, &mut self.rooms)?;
        if let Some(previous) = self.seatings.insert(date, outcome.assignments.clone()) {
            info!("Replaced {} earlier seats for {}", previous.len(), date);
        }
        Ok(outcome)
    }

    pub fn room(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Distinct room codes used on `date`, sorted.
    pub fn rooms_for_date(&self, date: NaiveDate) -> Vec<RoomCode> {
        self.seats(date)
            .iter()
            .map(|seat| seat.room_code.clone())
            .sorted()
            .dedup()
            .collect()
    }

    /// Every seat on `date`, ordered by room code, row, column.
    pub fn seating_for_date(&self, date: NaiveDate) -> Vec<SeatView> {
        self.seats(date)
            .iter()
            .map(|seat| SeatView {
                room: seat.room_code.clone(),
                row: seat.row,
                col: seat.col,
                roll: seat.roll.clone().unwrap_or_default(),
            })
            .sorted_by(|a, b| (&a.room, a.row, a.col).cmp(&(&b.room, b.row, b.col)))
            .collect()
    }

    /// Seating for `date` as room code -> rows of 9 roll strings, "" where empty.
    pub fn seating_grid_for_date(&self, date: NaiveDate) -> BTreeMap<RoomCode, Vec<Vec<String>>> {
        let mut grid: BTreeMap<RoomCode, Vec<Vec<String>>> = BTreeMap::new();
        for seat in self.seating_for_date(date) {
            let rows = grid.entry(seat.room).or_default();
            if rows.len() <= seat.row {
                rows.resize(seat.row + 1, vec![String::new(); COLUMNS_PER_ROW]);
            }
            rows[seat.row][seat.col] = seat.roll;
        }
        grid
    }

    fn seats(&self, date: NaiveDate) -> &[SeatAssignment] {
        self.seatings.get(&date).map_or(&[][..], Vec::as_slice)
    }
}
