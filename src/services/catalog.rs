use std::collections::{BTreeSet, HashSet};

use crate::db::models::GradeSubject;

/// Orders pairs by grade then subject and drops repeats. The sort is stable,
/// so rows the store already returns in that order keep their sequence.
pub(crate) fn distinct_grade_subjects(mut rows: Vec<GradeSubject>) -> Vec<GradeSubject> {
    rows.sort_by(|left, right| {
        left.grade.cmp(&right.grade).then_with(|| left.subject.cmp(&right.subject))
    });

    let mut seen = HashSet::new();
    rows.into_iter().filter(|row| seen.insert((row.grade, row.subject.clone()))).collect()
}

pub(crate) fn unique_grades(pairs: &[GradeSubject]) -> Vec<i32> {
    pairs.iter().map(|pair| pair.grade).collect::<BTreeSet<_>>().into_iter().collect()
}

pub(crate) fn subjects_for_grade(pairs: &[GradeSubject], grade: Option<i32>) -> Vec<String> {
    pairs
        .iter()
        .filter(|pair| grade.map_or(true, |selected| pair.grade == selected))
        .map(|pair| pair.subject.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(grade: i32, subject: &str) -> GradeSubject {
        GradeSubject { grade, subject: subject.to_string() }
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let rows = vec![pair(3, "Art"), pair(5, "Math"), pair(5, "Math")];
        let distinct = distinct_grade_subjects(rows);
        assert_eq!(distinct, vec![pair(3, "Art"), pair(5, "Math")]);
    }

    #[test]
    fn unsorted_input_comes_out_grade_first() {
        let rows = vec![pair(5, "Math"), pair(5, "Math"), pair(3, "Art")];
        let distinct = distinct_grade_subjects(rows);
        assert_eq!(distinct, vec![pair(3, "Art"), pair(5, "Math")]);
    }

    #[test]
    fn subjects_sorted_within_grade() {
        let rows = vec![pair(4, "Science"), pair(4, "Art"), pair(2, "Music"), pair(4, "Art")];
        let distinct = distinct_grade_subjects(rows);
        assert_eq!(distinct, vec![pair(2, "Music"), pair(4, "Art"), pair(4, "Science")]);
    }

    #[test]
    fn grades_sorted_numerically() {
        let pairs = vec![pair(10, "Math"), pair(2, "Art"), pair(10, "Art"), pair(9, "Math")];
        assert_eq!(unique_grades(&pairs), vec![2, 9, 10]);
    }

    #[test]
    fn subjects_filtered_by_grade() {
        let pairs = vec![pair(3, "Science"), pair(3, "Art"), pair(4, "Math"), pair(3, "Art")];
        assert_eq!(subjects_for_grade(&pairs, Some(3)), vec!["Art", "Science"]);
        assert_eq!(subjects_for_grade(&pairs, Some(4)), vec!["Math"]);
        assert!(subjects_for_grade(&pairs, Some(7)).is_empty());
    }

    #[test]
    fn no_grade_lists_every_subject() {
        let pairs = vec![pair(3, "Science"), pair(4, "Math"), pair(5, "Science")];
        assert_eq!(subjects_for_grade(&pairs, None), vec!["Math", "Science"]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(distinct_grade_subjects(Vec::new()).is_empty());
        assert!(unique_grades(&[]).is_empty());
        assert!(subjects_for_grade(&[], None).is_empty());
    }
}
