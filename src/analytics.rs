use std::collections::BTreeMap;

use crate::models::{
    Account, Attendance, AttendanceTrendPoint, DashboardStats, Grade, GradeBucket,
    GradeLevelCount, Student, Subject, SubjectPerformance,
};
use crate::stats::{group_by, percent, rounded_mean, subject_label};

// Growth needs historical enrollment snapshots the schema does not keep.
const STUDENT_GROWTH_PLACEHOLDER: i64 = 12;

const BUCKET_LABELS: [&str; 5] = [
    "Outstanding (90-100)",
    "Very Satisfactory (85-89)",
    "Satisfactory (80-84)",
    "Fairly Satisfactory (75-79)",
    "Did Not Meet (Below 75)",
];

pub fn dashboard_stats(
    students: &[Student],
    accounts: &[Account],
    subjects: &[Subject],
    attendance: &[Attendance],
    grades: &[Grade],
) -> DashboardStats {
    let total_days: i64 = attendance.iter().map(|a| i64::from(a.days_of_school)).sum();
    let total_present: i64 = attendance.iter().map(|a| i64::from(a.days_present)).sum();
    let ratings: Vec<f64> = grades.iter().filter_map(|g| g.final_rating).collect();

    DashboardStats {
        total_students: students.len() as i64,
        total_accounts: accounts.len() as i64,
        total_subjects: subjects.len() as i64,
        student_growth: STUDENT_GROWTH_PLACEHOLDER,
        attendance_rate: percent(total_present as f64, total_days as f64),
        average_grades: rounded_mean(&ratings),
    }
}

pub fn student_distribution(students: &[Student]) -> Vec<GradeLevelCount> {
    // BTreeMap gives ascending grade levels, with the null group first.
    let mut counts: BTreeMap<Option<i32>, i64> = BTreeMap::new();
    for student in students {
        *counts.entry(student.grade_level).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(grade_level, count)| GradeLevelCount { grade_level, count })
        .collect()
}

pub fn grade_performance(grades: &[Grade]) -> Vec<SubjectPerformance> {
    let mut groups = group_by(grades, |g| subject_label(&g.subject_name));
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    let mut performance = Vec::new();
    for (subject, rows) in groups {
        let ratings: Vec<f64> = rows.iter().filter_map(|g| g.final_rating).collect();
        performance.push(SubjectPerformance {
            subject,
            average: rounded_mean(&ratings),
        });
    }

    performance
}

pub fn attendance_trend(rows: &[Attendance]) -> Vec<AttendanceTrendPoint> {
    let mut trend = Vec::new();
    for (month, entries) in group_by(rows, |a| a.month.clone()) {
        trend.push(AttendanceTrendPoint {
            month,
            present: entries.iter().map(|a| i64::from(a.days_present)).sum(),
            absent: entries.iter().map(|a| i64::from(a.days_absent)).sum(),
            tardy: entries.iter().map(|a| i64::from(a.times_tardy)).sum(),
        });
    }

    trend
}

pub fn grade_distribution(grades: &[Grade]) -> Vec<GradeBucket> {
    let mut counts = [0i64; 5];
    for rating in grades.iter().filter_map(|g| g.final_rating) {
        let slot = if rating >= 90.0 {
            0
        } else if rating >= 85.0 {
            1
        } else if rating >= 80.0 {
            2
        } else if rating >= 75.0 {
            3
        } else {
            4
        };
        counts[slot] += 1;
    }

    BUCKET_LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| GradeBucket {
            grade: (*label).to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn student(grade_level: Option<i32>) -> Student {
        Student {
            id: Uuid::new_v4(),
            lrn: "123456789012".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            middle_name: None,
            birthdate: None,
            sex: None,
            age: None,
            grade_level,
            section: None,
            school_year: None,
            track: "N/A".to_string(),
            education_level: "elementary".to_string(),
            strand: None,
        }
    }

    fn grade(subject: &str, final_rating: Option<f64>) -> Grade {
        Grade {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            subject_name: subject.to_string(),
            q1: None,
            q2: None,
            q3: None,
            q4: None,
            final_rating,
            remarks: None,
            semester: "N/A".to_string(),
            subject_type: "standard".to_string(),
            sem_final_grade: None,
        }
    }

    fn attendance_row(month: &str, days: i32, present: i32, absent: i32, tardy: i32) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            month: month.to_string(),
            days_of_school: days,
            days_present: present,
            days_absent: absent,
            times_tardy: tardy,
        }
    }

    #[test]
    fn dashboard_tolerates_empty_collections() {
        let stats = dashboard_stats(&[], &[], &[], &[], &[]);
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.attendance_rate, 0);
        assert_eq!(stats.average_grades, 0);
    }

    #[test]
    fn dashboard_averages_exclude_null_ratings() {
        let grades = vec![
            grade("Mathematics", Some(95.0)),
            grade("Science", None),
            grade("English", Some(72.0)),
        ];
        let attendance = vec![attendance_row("June", 20, 18, 2, 0)];

        let stats = dashboard_stats(&[], &[], &[], &attendance, &grades);
        assert_eq!(stats.average_grades, 84);
        assert_eq!(stats.attendance_rate, 90);
        assert_eq!(stats.student_growth, 12);
    }

    #[test]
    fn distribution_orders_grade_levels_ascending() {
        let students = vec![
            student(Some(4)),
            student(Some(2)),
            student(Some(4)),
            student(None),
        ];

        let distribution = student_distribution(&students);
        let levels: Vec<Option<i32>> = distribution.iter().map(|d| d.grade_level).collect();
        assert_eq!(levels, vec![None, Some(2), Some(4)]);
        assert_eq!(distribution[2].count, 2);
    }

    #[test]
    fn performance_labels_blank_subjects_unknown() {
        let grades = vec![
            grade("Mathematics", Some(80.0)),
            grade("", Some(90.0)),
            grade("Mathematics", Some(90.0)),
        ];

        let performance = grade_performance(&grades);
        assert_eq!(performance.len(), 2);
        assert_eq!(performance[0].subject, "Mathematics");
        assert_eq!(performance[0].average, 85);
        assert_eq!(performance[1].subject, "Unknown");
    }

    #[test]
    fn subject_with_only_null_ratings_averages_zero() {
        let grades = vec![grade("Filipino", None), grade("Filipino", None)];
        let performance = grade_performance(&grades);
        assert_eq!(performance.len(), 1);
        assert_eq!(performance[0].average, 0);
    }

    #[test]
    fn trend_keeps_month_discovery_order() {
        let rows = vec![
            attendance_row("June", 20, 18, 2, 1),
            attendance_row("July", 22, 20, 2, 0),
            attendance_row("June", 20, 19, 1, 0),
        ];

        let trend = attendance_trend(&rows);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].month, "June");
        assert_eq!(trend[0].present, 37);
        assert_eq!(trend[0].absent, 3);
        assert_eq!(trend[0].tardy, 1);
        assert_eq!(trend[1].month, "July");
    }

    #[test]
    fn buckets_partition_every_rated_grade() {
        let grades = vec![
            grade("A", Some(95.0)),
            grade("B", Some(90.0)),
            grade("C", Some(89.9)),
            grade("D", Some(85.0)),
            grade("E", Some(80.0)),
            grade("F", Some(75.0)),
            grade("G", Some(74.9)),
            grade("H", None),
        ];

        let distribution = grade_distribution(&grades);
        let counts: Vec<i64> = distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 1, 1, 1]);

        let rated = grades.iter().filter(|g| g.final_rating.is_some()).count() as i64;
        assert_eq!(counts.iter().sum::<i64>(), rated);
    }

    #[test]
    fn empty_buckets_still_appear_in_fixed_order() {
        let distribution = grade_distribution(&[
            grade("Math", Some(95.0)),
            grade("Math", None),
            grade("Math", Some(72.0)),
        ]);
        let labels: Vec<&str> = distribution.iter().map(|b| b.grade.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Outstanding (90-100)",
                "Very Satisfactory (85-89)",
                "Satisfactory (80-84)",
                "Fairly Satisfactory (75-79)",
                "Did Not Meet (Below 75)",
            ]
        );
        assert_eq!(distribution[0].count, 1);
        assert_eq!(distribution[1].count, 0);
        assert_eq!(distribution[4].count, 1);
    }
}
