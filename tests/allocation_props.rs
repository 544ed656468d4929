//! Property-based tests for the seat allocator

use proptest::prelude::*;
use seat_planner::allocator::{minimum_rooms, striped_rooms};
use seat_planner::data::COLUMNS_PER_ROW;
use seat_planner::{
    AllocationError, AllocationRequest, CohortId, RoomTable, allocate, column_pattern,
    next_room_code,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};

fn build_request(sizes: &[usize], rows: usize, room_limit: usize) -> AllocationRequest {
    let rosters: BTreeMap<CohortId, Vec<String>> = sizes
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let cohort = i as CohortId + 1;
            (cohort, (0..n).map(|r| format!("{cohort}-{r:04}")).collect())
        })
        .collect();
    AllocationRequest {
        cohorts: rosters.keys().copied().collect::<BTreeSet<_>>(),
        rosters,
        capacity: rows * COLUMNS_PER_ROW,
        room_limit,
        start_room_code: "MC101".to_string(),
    }
}

fn cohort_sizes() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..300, 1..=3)
}

proptest! {
    #[test]
    fn test_every_roll_seated_exactly_once(sizes in cohort_sizes(), rows in 1usize..12) {
        let request = build_request(&sizes, rows, 1000);
        let outcome = allocate(&request, &mut RoomTable::default()).unwrap();

        let total: usize = sizes.iter().sum();
        let seated: Vec<&String> = outcome.assignments.iter().filter_map(|s| s.roll.as_ref()).collect();
        prop_assert_eq!(seated.len(), total);
        prop_assert_eq!(outcome.filled_seats, total);

        let unique: HashSet<&String> = seated.iter().copied().collect();
        prop_assert_eq!(unique.len(), total);
        for roster in request.rosters.values() {
            for roll in roster {
                prop_assert!(unique.contains(roll));
            }
        }
    }

    #[test]
    fn test_cohort_order_is_preserved(sizes in cohort_sizes(), rows in 1usize..12) {
        let request = build_request(&sizes, rows, 1000);
        let outcome = allocate(&request, &mut RoomTable::default()).unwrap();

        for (cohort, roster) in &request.rosters {
            let placed: Vec<&String> = outcome
                .assignments
                .iter()
                .filter(|s| s.cohort == *cohort)
                .filter_map(|s| s.roll.as_ref())
                .collect();
            let expected: Vec<&String> = roster.iter().collect();
            prop_assert_eq!(placed, expected);
        }
    }

    #[test]
    fn test_room_count_is_the_reported_minimum(sizes in cohort_sizes(), rows in 1usize..12) {
        let request = build_request(&sizes, rows, 1000);
        let outcome = allocate(&request, &mut RoomTable::default()).unwrap();

        let counts: Vec<(CohortId, usize)> = request
            .rosters
            .iter()
            .map(|(cohort, roster)| (*cohort, roster.len()))
            .collect();
        let total: usize = sizes.iter().sum();
        let expected = minimum_rooms(total, request.capacity)
            .max(striped_rooms(&counts, &column_pattern(&counts), rows));
        prop_assert_eq!(outcome.rooms.len(), expected);
        prop_assert!(outcome.rooms.len() >= minimum_rooms(total, request.capacity));
        prop_assert_eq!(outcome.assignments.len(), outcome.rooms.len() * request.capacity);

        if let Some(short) = outcome.rooms.len().checked_sub(1) {
            let err = allocate(&build_request(&sizes, rows, short), &mut RoomTable::default())
                .unwrap_err();
            prop_assert_eq!(
                err,
                AllocationError::InsufficientRooms { requested: short, minimum: expected }
            );
        }
    }

    #[test]
    fn test_rooms_follow_code_sequence(sizes in cohort_sizes(), rows in 1usize..6) {
        let request = build_request(&sizes, rows, 1000);
        let outcome = allocate(&request, &mut RoomTable::default()).unwrap();

        let mut code = request.start_room_code.clone();
        for room in &outcome.rooms {
            prop_assert_eq!(room, &code);
            code = next_room_code(&code);
        }

        let positions: HashSet<(&str, usize, usize)> = outcome
            .assignments
            .iter()
            .map(|s| (s.room_code.as_str(), s.row, s.col))
            .collect();
        prop_assert_eq!(positions.len(), outcome.assignments.len());
    }

    #[test]
    fn test_rejects_capacity_off_the_grid(capacity in 1usize..500) {
        prop_assume!(capacity % COLUMNS_PER_ROW != 0);
        let mut request = build_request(&[10], 1, 10);
        request.capacity = capacity;
        prop_assert_eq!(
            allocate(&request, &mut RoomTable::default()).unwrap_err(),
            AllocationError::InvalidCapacity { capacity }
        );
    }
}

#[test]
fn test_two_hundred_students_in_two_rooms_of_ninety() {
    let request = build_request(&[200], 10, 2);
    let err = allocate(&request, &mut RoomTable::default()).unwrap_err();
    assert_eq!(
        err,
        AllocationError::InsufficientRooms {
            requested: 2,
            minimum: 3
        }
    );
}
