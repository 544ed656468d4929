//! Exam seat allocation: stripes students from several cohorts across rooms
//! so neighbouring columns hold different cohorts, plus a small HTTP service
//! for uploading rosters and timetables and querying the generated seating.

pub mod allocator;
pub mod config;
pub mod data;
pub mod error;
pub mod roster;
pub mod server;
pub mod store;

pub use allocator::{RoomRegistry, allocate, column_pattern, next_room_code};
pub use data::{AllocationOutcome, AllocationRequest, CohortId, Room, SeatAssignment};
pub use error::{AllocationError, SeatingError};
pub use store::{RoomTable, SeatingStore};
