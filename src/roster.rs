use crate::data::{CohortId, RollNumber, RosterTable, TimetableRow};

/// Header fragments that mark the roll-number column of an uploaded roster.
const ROLL_HEADER_KEYWORDS: [&str; 6] = ["roll", "rno", "reg", "register", "admission", "hall"];

/// Subject placeholders meaning "no exam for this cohort".
const NO_EXAM_MARKERS: [&str; 3] = ["", "-", "\u{2014}"];

/// Pulls the roll numbers out of a decoded roster table.
///
/// Uses the first column whose header contains a roll-like keyword, falling
/// back to the first column. Blank cells and "nan" placeholders are skipped.
pub fn parse_rolls(table: &RosterTable) -> Vec<RollNumber> {
    let column = table
        .headers
        .iter()
        .position(|header| {
            let header = header.to_lowercase();
            ROLL_HEADER_KEYWORDS.iter().any(|k| header.contains(k))
        })
        .unwrap_or(0);

    table
        .rows
        .iter()
        .filter_map(|row| row.get(column))
        .map(|cell| cell.trim())
        .filter(|roll| !roll.is_empty() && !roll.eq_ignore_ascii_case("nan"))
        .map(str::to_string)
        .collect()
}

/// Guesses the cohort from an upload's file name ("III year.xlsx" -> 3).
pub fn infer_cohort(file_name: &str) -> CohortId {
    let name = file_name.to_lowercase();
    if name.contains("iii") || name.contains('3') {
        3
    } else if name.contains("ii") || name.contains('2') {
        2
    } else {
        1
    }
}

pub fn has_exam(subject: Option<&str>) -> bool {
    subject.is_some_and(|s| !NO_EXAM_MARKERS.contains(&s.trim()))
}

impl TimetableRow {
    /// Cohorts with an exam on this row's date, ascending.
    pub fn scheduled_cohorts(&self) -> Vec<CohortId> {
        [
            (1, &self.i_year_subject),
            (2, &self.ii_year_subject),
            (3, &self.iii_year_subject),
        ]
        .into_iter()
        .filter(|(_, subject)| has_exam(subject.as_deref()))
        .map(|(cohort, _)| cohort)
        .collect()
    }
}
