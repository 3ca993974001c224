use crate::scoring;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

pub const COL_NAME: &str = "Name";
pub const COL_ID: &str = "ID";
pub const COL_SECTION: &str = "Section";
pub const COL_TOTAL: &str = "Total";
pub const COL_GPA: &str = "GPA";

/// Fixed and computed columns; never stored in a student's marks.
pub const RESERVED_COLUMNS: [&str; 5] = [COL_NAME, COL_ID, COL_SECTION, COL_TOTAL, COL_GPA];

pub fn is_reserved_column(name: &str) -> bool {
    RESERVED_COLUMNS.contains(&name)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RosterError {
    #[error("{0}")]
    Validation(String),
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub display_name: String,
    pub external_id: String,
    pub section: String,
    pub marks: HashMap<String, i64>,
    pub total: i64,
    pub grade_point: f64,
}

impl Student {
    pub fn mark(&self, column: &str) -> i64 {
        self.marks.get(column).copied().unwrap_or(0)
    }

    fn recompute(&mut self) {
        self.total = scoring::compute_total(&self.marks);
        self.grade_point = scoring::compute_grade_point(self.total);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    pub title: String,
    pub criteria_columns: Vec<String>,
    pub columns: Vec<String>,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameOutcome {
    pub renamed: bool,
    /// The new name already belonged to another criteria column whose marks
    /// were overwritten.
    pub merged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkUpdate {
    pub mark: i64,
    /// The raw text had no leading digits and was recorded as 0.
    pub coerced: bool,
    pub total: i64,
    pub grade_point: f64,
}

#[derive(Debug, Default)]
pub struct RosterStore {
    title: String,
    criteria_columns: Vec<String>,
    students: Vec<Student>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn criteria_columns(&self) -> &[String] {
        &self.criteria_columns
    }

    /// Display header: fixed columns, criteria in order, computed columns.
    pub fn display_columns(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.criteria_columns.len() + RESERVED_COLUMNS.len());
        out.extend([COL_NAME, COL_ID, COL_SECTION].iter().map(|s| s.to_string()));
        out.extend(self.criteria_columns.iter().cloned());
        out.extend([COL_TOTAL, COL_GPA].iter().map(|s| s.to_string()));
        out
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, index: usize) -> Option<&Student> {
        self.students.get(index)
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            title: self.title.clone(),
            criteria_columns: self.criteria_columns.clone(),
            columns: self.display_columns(),
            students: self.students.clone(),
        }
    }

    fn has_column(&self, name: &str) -> bool {
        is_reserved_column(name) || self.criteria_columns.iter().any(|c| c == name)
    }

    /// Returns false (and changes nothing) for blank or already-present names.
    pub fn add_criteria_column(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || self.has_column(name) {
            return false;
        }
        self.criteria_columns.push(name.to_string());
        for s in self.students.iter_mut() {
            s.marks.insert(name.to_string(), 0);
        }
        true
    }

    pub fn rename_criteria_column(
        &mut self,
        old_name: &str,
        new_name: &str,
    ) -> Result<RenameOutcome, RosterError> {
        let Some(pos) = self.criteria_columns.iter().position(|c| c == old_name) else {
            return Err(RosterError::NotFound {
                what: "column",
                key: old_name.to_string(),
            });
        };
        if new_name.trim().is_empty() {
            return Err(RosterError::Validation(
                "column name must not be empty".to_string(),
            ));
        }
        if is_reserved_column(new_name) {
            return Err(RosterError::Validation(format!(
                "column name is reserved: {}",
                new_name
            )));
        }
        if old_name == new_name {
            return Ok(RenameOutcome {
                renamed: false,
                merged: false,
            });
        }

        let collided = self.criteria_columns.iter().position(|c| c == new_name);
        self.criteria_columns[pos] = new_name.to_string();
        if let Some(other) = collided {
            self.criteria_columns.remove(other);
        }

        for s in self.students.iter_mut() {
            let v = s.marks.remove(old_name).unwrap_or(0);
            s.marks.insert(new_name.to_string(), v);
            if collided.is_some() {
                s.recompute();
            }
        }

        Ok(RenameOutcome {
            renamed: true,
            merged: collided.is_some(),
        })
    }

    /// Returns false when `name` is not a criteria column.
    pub fn delete_criteria_column(&mut self, name: &str) -> bool {
        let before = self.criteria_columns.len();
        self.criteria_columns.retain(|c| c != name);
        if self.criteria_columns.len() == before {
            return false;
        }
        for s in self.students.iter_mut() {
            s.marks.remove(name);
            s.recompute();
        }
        true
    }

    /// Appends a student; returns its index.
    pub fn add_student(
        &mut self,
        display_name: &str,
        external_id: &str,
        section: &str,
    ) -> Result<usize, RosterError> {
        let display_name = display_name.trim();
        let external_id = external_id.trim();
        let section = section.trim();
        if display_name.is_empty() || external_id.is_empty() || section.is_empty() {
            return Err(RosterError::Validation(
                "displayName, externalId and section are required".to_string(),
            ));
        }

        let marks = self
            .criteria_columns
            .iter()
            .map(|c| (c.clone(), 0))
            .collect();
        self.students.push(Student {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.to_string(),
            external_id: external_id.to_string(),
            section: section.to_string(),
            marks,
            total: 0,
            grade_point: 0.0,
        });
        Ok(self.students.len() - 1)
    }

    pub fn set_mark(
        &mut self,
        student_index: usize,
        column: &str,
        raw_value: &str,
    ) -> Result<MarkUpdate, RosterError> {
        if !self.criteria_columns.iter().any(|c| c == column) {
            return Err(RosterError::NotFound {
                what: "column",
                key: column.to_string(),
            });
        }
        let Some(student) = self.students.get_mut(student_index) else {
            return Err(RosterError::NotFound {
                what: "student",
                key: student_index.to_string(),
            });
        };

        let parsed = scoring::parse_mark(raw_value);
        let mark = parsed.unwrap_or(0);
        student.marks.insert(column.to_string(), mark);
        student.recompute();

        Ok(MarkUpdate {
            mark,
            coerced: parsed.is_none(),
            total: student.total,
            grade_point: student.grade_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks_match_columns(store: &RosterStore) -> bool {
        store.students().iter().all(|s| {
            s.marks.len() == store.criteria_columns().len()
                && store.criteria_columns().iter().all(|c| s.marks.contains_key(c))
        })
    }

    #[test]
    fn add_column_seeds_zero_for_existing_students() {
        let mut store = RosterStore::new();
        store.add_student("Alice", "S1", "A").expect("add alice");
        store.add_student("Bob", "S2", "A").expect("add bob");
        assert!(store.add_criteria_column("Quiz1"));
        assert!(store.add_criteria_column("Quiz2"));

        assert_eq!(store.criteria_columns(), &["Quiz1", "Quiz2"]);
        let cols = store.display_columns();
        let quiz2 = cols.iter().position(|c| c == "Quiz2").expect("quiz2");
        assert_eq!(cols[quiz2 + 1], COL_TOTAL);
        for s in store.students() {
            assert_eq!(s.marks.get("Quiz2"), Some(&0));
        }
        assert!(marks_match_columns(&store));
    }

    #[test]
    fn add_column_rejects_blank_and_duplicates() {
        let mut store = RosterStore::new();
        store.add_student("Alice", "S1", "A").expect("add alice");
        assert!(store.add_criteria_column("Quiz1"));

        assert!(!store.add_criteria_column(""));
        assert!(!store.add_criteria_column("   "));
        assert!(!store.add_criteria_column("Quiz1"));
        assert!(!store.add_criteria_column("Total"));
        assert!(!store.add_criteria_column("Name"));

        assert_eq!(store.criteria_columns(), &["Quiz1"]);
        assert_eq!(store.students()[0].marks.len(), 1);
    }

    #[test]
    fn new_student_gets_zero_for_every_column() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        store.add_criteria_column("Lab");
        let idx = store.add_student("Alice", "S1", "A").expect("add alice");
        let s = store.student(idx).expect("student");
        assert_eq!(s.mark("Quiz1"), 0);
        assert_eq!(s.mark("Lab"), 0);
        assert_eq!(s.total, 0);
        assert_eq!(s.grade_point, 0.0);
        assert!(!s.id.is_empty());
    }

    #[test]
    fn add_student_requires_all_fields() {
        let mut store = RosterStore::new();
        assert!(matches!(
            store.add_student("", "1", "A"),
            Err(RosterError::Validation(_))
        ));
        assert!(matches!(
            store.add_student("Alice", " ", "A"),
            Err(RosterError::Validation(_))
        ));
        assert!(matches!(
            store.add_student("Alice", "1", ""),
            Err(RosterError::Validation(_))
        ));
        assert!(store.students().is_empty());
    }

    #[test]
    fn student_ids_are_unique() {
        let mut store = RosterStore::new();
        store.add_student("Alice", "S1", "A").expect("add");
        store.add_student("Alice", "S1", "A").expect("add");
        assert_ne!(store.students()[0].id, store.students()[1].id);
    }

    #[test]
    fn total_is_recomputed_from_all_marks() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        store.add_criteria_column("Quiz2");
        store.add_criteria_column("Final");
        store.add_student("Alice", "S1", "A").expect("add");

        let edits = [
            ("Quiz1", "20"),
            ("Final", "50"),
            ("Quiz2", "x"),
            ("Quiz1", "25"),
            ("Quiz2", "12"),
        ];
        for (col, raw) in edits {
            let upd = store.set_mark(0, col, raw).expect("set mark");
            let s = &store.students()[0];
            assert_eq!(upd.total, s.marks.values().sum::<i64>());
            assert_eq!(s.total, upd.total);
        }
        let s = &store.students()[0];
        assert_eq!(s.total, 87);
        assert_eq!(s.grade_point, 3.75);
    }

    #[test]
    fn set_mark_coerces_garbage_to_zero() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        store.add_student("Alice", "S1", "A").expect("add");
        store.set_mark(0, "Quiz1", "60").expect("set");
        let upd = store.set_mark(0, "Quiz1", "n/a").expect("set");
        assert_eq!(upd.mark, 0);
        assert!(upd.coerced);
        assert_eq!(upd.total, 0);
        assert_eq!(upd.grade_point, 0.0);
    }

    #[test]
    fn set_mark_reports_coercion_only_without_leading_digits() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        store.add_student("Alice", "S1", "A").expect("add");

        let trailing = store.set_mark(0, "Quiz1", "abc5").expect("set");
        assert_eq!(trailing.mark, 0);
        assert!(trailing.coerced);

        let zero = store.set_mark(0, "Quiz1", "0").expect("set");
        assert_eq!(zero.mark, 0);
        assert!(!zero.coerced);

        let prefixed = store.set_mark(0, "Quiz1", "7pts").expect("set");
        assert_eq!(prefixed.mark, 7);
        assert!(!prefixed.coerced);
    }

    #[test]
    fn set_mark_rejects_unknown_targets() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        store.add_student("Alice", "S1", "A").expect("add");

        assert!(matches!(
            store.set_mark(3, "Quiz1", "5"),
            Err(RosterError::NotFound { what: "student", .. })
        ));
        assert!(matches!(
            store.set_mark(0, "Total", "5"),
            Err(RosterError::NotFound { what: "column", .. })
        ));
        assert!(marks_match_columns(&store));
    }

    #[test]
    fn rename_moves_marks_in_place() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        store.add_criteria_column("Quiz2");
        store.add_student("Alice", "S1", "A").expect("add");
        store.set_mark(0, "Quiz1", "92").expect("set");

        let out = store.rename_criteria_column("Quiz1", "Exam1").expect("rename");
        assert_eq!(
            out,
            RenameOutcome {
                renamed: true,
                merged: false
            }
        );
        assert_eq!(store.criteria_columns(), &["Exam1", "Quiz2"]);
        let s = &store.students()[0];
        assert_eq!(s.marks.get("Exam1"), Some(&92));
        assert!(!s.marks.contains_key("Quiz1"));
        assert_eq!(s.total, 92);
    }

    #[test]
    fn rename_onto_existing_column_overwrites_it() {
        let mut store = RosterStore::new();
        store.add_criteria_column("A");
        store.add_criteria_column("B");
        store.add_criteria_column("C");
        store.add_student("Alice", "S1", "A").expect("add");
        store.set_mark(0, "A", "10").expect("set");
        store.set_mark(0, "B", "30").expect("set");
        store.set_mark(0, "C", "5").expect("set");

        let out = store.rename_criteria_column("C", "A").expect("rename");
        assert!(out.merged);
        assert_eq!(store.criteria_columns(), &["B", "A"]);
        let s = &store.students()[0];
        assert_eq!(s.mark("A"), 5);
        assert_eq!(s.total, 35);
        assert!(marks_match_columns(&store));
    }

    #[test]
    fn rename_validation() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        assert!(matches!(
            store.rename_criteria_column("Nope", "X"),
            Err(RosterError::NotFound { .. })
        ));
        assert!(matches!(
            store.rename_criteria_column("Quiz1", ""),
            Err(RosterError::Validation(_))
        ));
        assert!(matches!(
            store.rename_criteria_column("Quiz1", "GPA"),
            Err(RosterError::Validation(_))
        ));
        let same = store.rename_criteria_column("Quiz1", "Quiz1").expect("same");
        assert!(!same.renamed);
        assert_eq!(store.criteria_columns(), &["Quiz1"]);
    }

    #[test]
    fn delete_drops_key_everywhere() {
        let mut store = RosterStore::new();
        store.add_criteria_column("Quiz1");
        store.add_criteria_column("Quiz2");
        store.add_student("Alice", "S1", "A").expect("add");
        store.add_student("Bob", "S2", "B").expect("add");
        store.set_mark(0, "Quiz1", "40").expect("set");
        store.set_mark(0, "Quiz2", "50").expect("set");

        assert!(store.delete_criteria_column("Quiz1"));
        assert!(!store.delete_criteria_column("Quiz1"));
        assert_eq!(store.criteria_columns(), &["Quiz2"]);
        for s in store.students() {
            assert!(!s.marks.contains_key("Quiz1"));
        }
        assert_eq!(store.students()[0].total, 50);
        assert_eq!(store.students()[0].grade_point, 0.0);
        assert!(marks_match_columns(&store));
    }
}
