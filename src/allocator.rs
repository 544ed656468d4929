use crate::data::{
    AdjacencyWarning, AllocationOutcome, AllocationRequest, COLUMNS_PER_ROW, CohortId,
    MAX_CAPACITY, Room, RoomCode, RollNumber, SeatAssignment,
};
use crate::error::AllocationError;
use itertools::Itertools;
use log::{debug, info, trace};
use std::collections::HashMap;
use std::slice::Iter;
use std::time::Instant;

/// Source of room records for an allocation run.
///
/// Looking up the same code twice within a run must yield the same room.
pub trait RoomRegistry {
    /// Returns the room with this code, creating it with `capacity` if it does not exist yet.
    fn get_or_create(&mut self, code: &str, capacity: usize) -> Room;
}

/// Seats every rostered student of the participating cohorts, room by room.
///
/// Each room is striped column-wise with the same 9-entry cohort pattern and
/// filled one column at a time, taking students from the front of their
/// cohort's roster. Validation happens before the first room is requested
/// from the registry, so a failed run never materializes anything.
///
/// The minimum reported by `InsufficientRooms` can exceed
/// `ceil(total_students / capacity)`: it is the larger of that and
/// [`striped_rooms`], since a cohort never spills into another cohort's
/// columns. The returned outcome always uses exactly that many rooms.
pub fn allocate<R: RoomRegistry + ?Sized>(
    request: &AllocationRequest,
    registry: &mut R,
) -> Result<AllocationOutcome, AllocationError> {
    let start_time = Instant::now();
    let capacity = request.capacity;
    if capacity == 0 || capacity % COLUMNS_PER_ROW != 0 || capacity > MAX_CAPACITY {
        return Err(AllocationError::InvalidCapacity { capacity });
    }
    if request.cohorts.is_empty() {
        return Err(AllocationError::NoExamScheduled);
    }

    let rosters: Vec<(CohortId, &[RollNumber])> = request
        .cohorts
        .iter()
        .map(|&cohort| {
            let roster = request.rosters.get(&cohort).map_or(&[][..], Vec::as_slice);
            (cohort, roster)
        })
        .collect();
    if rosters.len() > COLUMNS_PER_ROW {
        return Err(AllocationError::TooManyCohorts {
            count: rosters.len(),
        });
    }

    let rows = capacity / COLUMNS_PER_ROW;
    let counts: Vec<(CohortId, usize)> = rosters
        .iter()
        .map(|(cohort, roster)| (*cohort, roster.len()))
        .collect();
    let pattern = column_pattern(&counts);
    debug!("Column pattern: {:?}", pattern);

    let total_students: usize = counts.iter().map(|(_, n)| n).sum();
    let minimum =
        minimum_rooms(total_students, capacity).max(striped_rooms(&counts, &pattern, rows));
    if request.room_limit < minimum {
        return Err(AllocationError::InsufficientRooms {
            requested: request.room_limit,
            minimum,
        });
    }

    info!(
        "Allocating {} students from {} cohorts into rooms of {} (limit {}, minimum {})...",
        total_students,
        rosters.len(),
        capacity,
        request.room_limit,
        minimum
    );

    // slice iterators give O(1) pop-front without copying the rosters
    let mut queues: HashMap<CohortId, Iter<'_, RollNumber>> = rosters
        .iter()
        .map(|(cohort, roster)| (*cohort, roster.iter()))
        .collect();

    let mut assignments = Vec::with_capacity(minimum.checked_mul(capacity).unwrap_or_default());
    let mut rooms: Vec<RoomCode> = Vec::with_capacity(minimum);
    let mut room_code = request.start_room_code.clone();

    for _ in 0..request.room_limit {
        if queues.values().all(|queue| queue.as_slice().is_empty()) {
            break;
        }
        let room = registry.get_or_create(&room_code, capacity);
        trace!("Filling room {} ({} rows)", room.code, rows);

        for (col, cohort) in pattern.iter().enumerate() {
            let mut queue = queues.get_mut(cohort);
            for row in 0..rows {
                let roll = queue.as_mut().and_then(|q| q.next()).cloned();
                assignments.push(SeatAssignment {
                    room_code: room.code.clone(),
                    row,
                    col,
                    cohort: *cohort,
                    roll,
                });
            }
        }

        rooms.push(room.code);
        room_code = next_room_code(&room_code);
    }

    let filled_seats = assignments.iter().filter(|seat| seat.roll.is_some()).count();
    let empty_seats = assignments.len() - filled_seats;
    let adjacency_warnings = adjacency_warnings(&assignments);
    info!(
        "Seated {} students in {} rooms ({} empty seats) in {:.2?}",
        filled_seats,
        rooms.len(),
        empty_seats,
        start_time.elapsed()
    );

    Ok(AllocationOutcome {
        assignments,
        rooms,
        filled_seats,
        empty_seats,
        adjacency_warnings,
    })
}

/// Fewest rooms of `capacity` seats that hold `total_students`.
pub fn minimum_rooms(total_students: usize, capacity: usize) -> usize {
    total_students.div_ceil(capacity)
}

/// Rooms the stripe needs before every cohort's queue drains.
///
/// A cohort only ever sits in its own columns, so a large cohort with few
/// columns can need more rooms than the plain seat count suggests.
pub fn striped_rooms(counts: &[(CohortId, usize)], pattern: &[CohortId], rows: usize) -> usize {
    counts
        .iter()
        .map(|(cohort, n)| {
            let seats_per_room = pattern.iter().filter(|c| *c == cohort).count() * rows;
            match seats_per_room {
                0 => 0,
                seats => n.div_ceil(seats),
            }
        })
        .max()
        .unwrap_or(0)
}

/// Builds the column-to-cohort stripe shared by every room.
///
/// Cohorts are ordered by descending roster size, ties by ascending id, and
/// that order is repeated until all 9 columns are covered.
pub fn column_pattern(counts: &[(CohortId, usize)]) -> Vec<CohortId> {
    counts
        .iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .map(|(cohort, _)| *cohort)
        .cycle()
        .take(COLUMNS_PER_ROW)
        .collect()
}

/// Next room code in sequence: "MC101" -> "MC102", "B9" -> "B10".
///
/// Leading zeros in the digit run are not preserved. A code without trailing
/// digits gets an "a" appended instead.
pub fn next_room_code(code: &str) -> RoomCode {
    let prefix = code.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &code[prefix.len()..];
    if digits.is_empty() {
        return format!("{code}a");
    }
    format!("{prefix}{}", increment_decimal(digits))
}

// works on the digit string directly so long runs never overflow
fn increment_decimal(digits: &str) -> String {
    let mut out: Vec<char> = digits.trim_start_matches('0').chars().collect();
    let mut i = out.len();
    loop {
        if i == 0 {
            out.insert(0, '1');
            break;
        }
        i -= 1;
        if out[i] == '9' {
            out[i] = '0';
        } else {
            out[i] = char::from(out[i] as u8 + 1);
            break;
        }
    }
    out.into_iter().collect()
}

/// Pairs of horizontally neighbouring filled seats that hold the same cohort.
fn adjacency_warnings(assignments: &[SeatAssignment]) -> Vec<AdjacencyWarning> {
    let filled: HashMap<(&str, usize, usize), CohortId> = assignments
        .iter()
        .filter(|seat| seat.roll.is_some())
        .map(|seat| ((seat.room_code.as_str(), seat.row, seat.col), seat.cohort))
        .collect();

    assignments
        .iter()
        .filter(|seat| seat.roll.is_some() && seat.col + 1 < COLUMNS_PER_ROW)
        .filter(|seat| {
            filled.get(&(seat.room_code.as_str(), seat.row, seat.col + 1)) == Some(&seat.cohort)
        })
        .map(|seat| AdjacencyWarning {
            room_code: seat.room_code.clone(),
            row: seat.row,
            left_col: seat.col,
            cohort: seat.cohort,
        })
        .collect()
}
