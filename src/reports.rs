use crate::models::{
    AttendanceSummary, AttendanceWithStudent, ClassSummary, Grade, GradeAnalytics,
    MonthlyAttendance, StudentRef, StudentStanding, StudentWithRecords, SubjectAnalytics,
};
use crate::stats::{group_by, percent, round_half_up, rounded_mean, subject_label};

pub fn class_summary(
    grade_level: Option<i32>,
    section: Option<&str>,
    records: &[StudentWithRecords],
) -> ClassSummary {
    let class_name = match (grade_level, section) {
        (Some(level), Some(section)) => format!("Grade {level} - Section {section}"),
        _ => "All Students".to_string(),
    };

    let students: Vec<StudentStanding> = records.iter().map(student_standing).collect();

    // Overall figures weigh every student equally, however many rows each has.
    let grade_values: Vec<f64> = students.iter().map(|s| s.average_grade as f64).collect();
    let attendance_values: Vec<f64> = students.iter().map(|s| s.attendance_rate as f64).collect();

    let mut top_performers = students.clone();
    // Stable sort: ties keep roster order.
    top_performers.sort_by(|a, b| b.average_grade.cmp(&a.average_grade));
    top_performers.truncate(5);

    let struggling_students: Vec<StudentStanding> = students
        .iter()
        .filter(|s| s.average_grade > 0 && s.average_grade < 75)
        .cloned()
        .collect();

    ClassSummary {
        class_name,
        total_students: students.len() as i64,
        average_grade: rounded_mean(&grade_values),
        attendance_rate: rounded_mean(&attendance_values),
        top_performers,
        struggling_students,
        students,
    }
}

fn student_standing(record: &StudentWithRecords) -> StudentStanding {
    let ratings: Vec<f64> = record.grades.iter().filter_map(|g| g.final_rating).collect();
    let total_days: i64 = record
        .attendance
        .iter()
        .map(|a| i64::from(a.days_of_school))
        .sum();
    let present_days: i64 = record
        .attendance
        .iter()
        .map(|a| i64::from(a.days_present))
        .sum();

    StudentStanding {
        id: record.student.id,
        name: record.student.full_name(),
        average_grade: rounded_mean(&ratings),
        attendance_rate: percent(present_days as f64, total_days as f64),
    }
}

pub fn grade_analytics(grades: &[Grade]) -> GradeAnalytics {
    let mut groups = group_by(grades, |g| subject_label(&g.subject_name));
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    let mut subjects = Vec::new();
    let mut all_ratings: Vec<f64> = Vec::new();

    for (name, rows) in groups {
        let ratings: Vec<f64> = rows.iter().filter_map(|g| g.final_rating).collect();
        if ratings.is_empty() {
            // A subject whose ratings are all pending still shows up.
            subjects.push(SubjectAnalytics {
                name,
                average: 0,
                highest: 0,
                lowest: 0,
                pass_rate: 0,
            });
            continue;
        }

        let highest = ratings.iter().copied().fold(f64::MIN, f64::max);
        let lowest = ratings.iter().copied().fold(f64::MAX, f64::min);
        let passing = ratings.iter().filter(|r| **r >= 75.0).count();

        subjects.push(SubjectAnalytics {
            name,
            average: rounded_mean(&ratings),
            highest: round_half_up(highest),
            lowest: round_half_up(lowest),
            pass_rate: percent(passing as f64, ratings.len() as f64),
        });
        all_ratings.extend(ratings);
    }

    let passing = all_ratings.iter().filter(|r| **r >= 75.0).count();
    let passing_rate = percent(passing as f64, all_ratings.len() as f64);

    GradeAnalytics {
        subjects,
        overall_average: rounded_mean(&all_ratings),
        passing_rate,
        failure_rate: 100 - passing_rate,
        total_grades_recorded: all_ratings.len() as i64,
    }
}

pub fn attendance_summary(rows: &[AttendanceWithStudent]) -> AttendanceSummary {
    let total_days: i64 = rows.iter().map(|r| i64::from(r.days_of_school)).sum();
    let total_present: i64 = rows.iter().map(|r| i64::from(r.days_present)).sum();
    let total_absent: i64 = rows.iter().map(|r| i64::from(r.days_absent)).sum();
    let total_tardy: i64 = rows.iter().map(|r| i64::from(r.times_tardy)).sum();

    let mut monthly_breakdown = Vec::new();
    for (month, entries) in group_by(rows, |r| r.month.clone()) {
        let days_of_school: i64 = entries.iter().map(|r| i64::from(r.days_of_school)).sum();
        let present: i64 = entries.iter().map(|r| i64::from(r.days_present)).sum();
        monthly_breakdown.push(MonthlyAttendance {
            month,
            days_of_school,
            present,
            absent: entries.iter().map(|r| i64::from(r.days_absent)).sum(),
            tardy: entries.iter().map(|r| i64::from(r.times_tardy)).sum(),
            present_rate: percent(present as f64, days_of_school as f64),
        });
    }

    // Perfect attendance needs at least one row; students outside the
    // attendance collection never qualify.
    let mut perfect_attendance_students = Vec::new();
    for (student_id, entries) in group_by(rows, |r| r.student_id) {
        let absent: i64 = entries.iter().map(|r| i64::from(r.days_absent)).sum();
        if absent == 0 {
            perfect_attendance_students.push(StudentRef {
                id: student_id,
                name: entries[0].student_name.clone(),
            });
        }
    }

    AttendanceSummary {
        school_year: "All Time".to_string(),
        total_days,
        present_rate: percent(total_present as f64, total_days as f64),
        absent_rate: percent(total_absent as f64, total_days as f64),
        tardy_rate: percent(total_tardy as f64, total_days as f64),
        monthly_breakdown,
        perfect_attendance_students,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attendance, Student};
    use uuid::Uuid;

    fn student(first_name: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            lrn: "123456789012".to_string(),
            first_name: first_name.to_string(),
            last_name: "Santos".to_string(),
            middle_name: None,
            birthdate: None,
            sex: None,
            age: None,
            grade_level: Some(4),
            section: Some("A".to_string()),
            school_year: None,
            track: "N/A".to_string(),
            education_level: "elementary".to_string(),
            strand: None,
        }
    }

    fn grade(student_id: Uuid, subject: &str, final_rating: Option<f64>) -> Grade {
        Grade {
            id: Uuid::new_v4(),
            student_id,
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

    fn attendance(student_id: Uuid, month: &str, days: i32, present: i32) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            student_id,
            month: month.to_string(),
            days_of_school: days,
            days_present: present,
            days_absent: days - present,
            times_tardy: 0,
        }
    }

    fn record(first_name: &str, ratings: &[Option<f64>]) -> StudentWithRecords {
        let student = student(first_name);
        let grades = ratings
            .iter()
            .map(|r| grade(student.id, "Mathematics", *r))
            .collect();
        StudentWithRecords {
            student,
            grades,
            attendance: Vec::new(),
        }
    }

    fn summary_row(
        student_id: Uuid,
        name: &str,
        month: &str,
        days: i32,
        present: i32,
        absent: i32,
        tardy: i32,
    ) -> AttendanceWithStudent {
        AttendanceWithStudent {
            student_id,
            student_name: name.to_string(),
            month: month.to_string(),
            days_of_school: days,
            days_present: present,
            days_absent: absent,
            times_tardy: tardy,
        }
    }

    #[test]
    fn per_student_average_excludes_null_ratings() {
        let summary = class_summary(None, None, &[record("Ana", &[Some(95.0), None, Some(72.0)])]);
        assert_eq!(summary.students[0].average_grade, 84);
    }

    #[test]
    fn overall_average_weighs_students_equally() {
        // One grade of 90 vs three grades of 70: straight mean over rows
        // would be 75, per-student weighting gives 80.
        let records = vec![
            record("Ana", &[Some(90.0)]),
            record("Ben", &[Some(70.0), Some(70.0), Some(70.0)]),
        ];

        let summary = class_summary(None, None, &records);
        assert_eq!(summary.average_grade, 80);
    }

    #[test]
    fn struggling_excludes_students_without_grades() {
        let records = vec![
            record("Ana", &[Some(70.0)]),
            record("Ben", &[]),
            record("Carla", &[Some(80.0)]),
        ];

        let summary = class_summary(None, None, &records);
        assert_eq!(summary.struggling_students.len(), 1);
        assert_eq!(summary.struggling_students[0].name, "Ana Santos");
    }

    #[test]
    fn top_performers_are_capped_and_stable() {
        let records = vec![
            record("Ana", &[Some(85.0)]),
            record("Ben", &[Some(90.0)]),
            record("Carla", &[Some(85.0)]),
            record("Dan", &[Some(88.0)]),
            record("Ella", &[Some(92.0)]),
            record("Fe", &[Some(80.0)]),
        ];

        let summary = class_summary(None, None, &records);
        assert_eq!(summary.top_performers.len(), 5);
        let names: Vec<&str> = summary
            .top_performers
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        // Ana ties Carla at 85 and entered the roster first.
        assert_eq!(
            names,
            vec![
                "Ella Santos",
                "Ben Santos",
                "Dan Santos",
                "Ana Santos",
                "Carla Santos"
            ]
        );
    }

    #[test]
    fn class_name_needs_both_filters() {
        let summary = class_summary(Some(4), Some("A"), &[]);
        assert_eq!(summary.class_name, "Grade 4 - Section A");

        let summary = class_summary(Some(4), None, &[]);
        assert_eq!(summary.class_name, "All Students");
    }

    #[test]
    fn student_attendance_rate_spans_all_rows() {
        let mut rec = record("Ana", &[]);
        rec.attendance = vec![
            attendance(rec.student.id, "June", 20, 18),
            attendance(rec.student.id, "July", 10, 10),
        ];

        let summary = class_summary(None, None, &[rec]);
        assert_eq!(summary.students[0].attendance_rate, 93);
    }

    #[test]
    fn analytics_reports_empty_subjects_as_zero() {
        let sid = Uuid::new_v4();
        let grades = vec![
            grade(sid, "Mathematics", Some(80.0)),
            grade(sid, "Science", None),
        ];

        let analytics = grade_analytics(&grades);
        assert_eq!(analytics.subjects.len(), 2);
        let science = analytics
            .subjects
            .iter()
            .find(|s| s.name == "Science")
            .unwrap();
        assert_eq!(science.average, 0);
        assert_eq!(science.pass_rate, 0);
        assert_eq!(analytics.total_grades_recorded, 1);
    }

    #[test]
    fn analytics_overall_is_weighted_by_count() {
        let sid = Uuid::new_v4();
        let grades = vec![
            grade(sid, "Mathematics", Some(90.0)),
            grade(sid, "Science", Some(70.0)),
            grade(sid, "Science", Some(70.0)),
            grade(sid, "Science", Some(70.0)),
        ];

        let analytics = grade_analytics(&grades);
        // (90 + 70 + 70 + 70) / 4, not the mean of subject means.
        assert_eq!(analytics.overall_average, 75);
        assert_eq!(analytics.passing_rate, 25);
        assert_eq!(analytics.failure_rate, 75);
    }

    #[test]
    fn analytics_subject_extremes_and_pass_rate() {
        let sid = Uuid::new_v4();
        let grades = vec![
            grade(sid, "Mathematics", Some(95.0)),
            grade(sid, "Mathematics", Some(60.0)),
            grade(sid, "Mathematics", Some(75.0)),
        ];

        let analytics = grade_analytics(&grades);
        let math = &analytics.subjects[0];
        assert_eq!(math.highest, 95);
        assert_eq!(math.lowest, 60);
        assert_eq!(math.pass_rate, 67);
    }

    #[test]
    fn monthly_breakdown_matches_worked_example() {
        let rows = vec![
            summary_row(Uuid::new_v4(), "Ana Santos", "June", 20, 18, 0, 0),
            summary_row(Uuid::new_v4(), "Ben Santos", "June", 10, 10, 0, 0),
        ];

        let summary = attendance_summary(&rows);
        assert_eq!(summary.monthly_breakdown.len(), 1);
        let june = &summary.monthly_breakdown[0];
        assert_eq!(june.days_of_school, 30);
        assert_eq!(june.present, 28);
        assert_eq!(june.absent, 0);
        assert_eq!(june.tardy, 0);
        assert_eq!(june.present_rate, 93);
    }

    #[test]
    fn attendance_rates_are_scale_invariant() {
        let id = Uuid::new_v4();
        let small = vec![summary_row(id, "Ana Santos", "June", 20, 15, 5, 2)];
        let large = vec![summary_row(id, "Ana Santos", "June", 60, 45, 15, 6)];

        let a = attendance_summary(&small);
        let b = attendance_summary(&large);
        assert_eq!(a.present_rate, b.present_rate);
        assert_eq!(a.absent_rate, b.absent_rate);
        assert_eq!(a.tardy_rate, b.tardy_rate);
    }

    #[test]
    fn perfect_attendance_requires_zero_total_absences() {
        let ana = Uuid::new_v4();
        let ben = Uuid::new_v4();
        let rows = vec![
            summary_row(ana, "Ana Santos", "June", 20, 20, 0, 0),
            summary_row(ana, "Ana Santos", "July", 20, 20, 0, 1),
            summary_row(ben, "Ben Santos", "June", 20, 19, 1, 0),
            summary_row(ben, "Ben Santos", "July", 20, 20, 0, 0),
        ];

        let summary = attendance_summary(&rows);
        assert_eq!(summary.perfect_attendance_students.len(), 1);
        assert_eq!(summary.perfect_attendance_students[0].name, "Ana Santos");
    }

    #[test]
    fn empty_attendance_yields_zero_rates() {
        let summary = attendance_summary(&[]);
        assert_eq!(summary.total_days, 0);
        assert_eq!(summary.present_rate, 0);
        assert_eq!(summary.monthly_breakdown.len(), 0);
        assert_eq!(summary.perfect_attendance_students.len(), 0);
    }
}
