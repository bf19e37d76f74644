use std::fmt::Write;

use crate::models::{ClassSummary, ReportCard};

fn mark(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => "-".to_string(),
    }
}

pub fn class_summary_markdown(summary: &ClassSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Class Summary: {}", summary.class_name);
    let _ = writeln!(output);
    let _ = writeln!(output, "- Students: {}", summary.total_students);
    let _ = writeln!(output, "- Average grade: {}", summary.average_grade);
    let _ = writeln!(output, "- Attendance rate: {}%", summary.attendance_rate);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Performers");
    if summary.top_performers.is_empty() {
        let _ = writeln!(output, "No graded students yet.");
    } else {
        for student in summary.top_performers.iter() {
            let _ = writeln!(
                output,
                "- {}: average {}, attendance {}%",
                student.name, student.average_grade, student.attendance_rate
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Needs Attention");
    if summary.struggling_students.is_empty() {
        let _ = writeln!(output, "No students below the passing mark.");
    } else {
        for student in summary.struggling_students.iter() {
            let _ = writeln!(
                output,
                "- {}: average {}, attendance {}%",
                student.name, student.average_grade, student.attendance_rate
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Roster");
    if summary.students.is_empty() {
        let _ = writeln!(output, "No students matched.");
    } else {
        let _ = writeln!(output, "| Student | Average Grade | Attendance |");
        let _ = writeln!(output, "| --- | --- | --- |");
        for student in summary.students.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {}% |",
                student.name, student.average_grade, student.attendance_rate
            );
        }
    }

    output
}

pub fn report_card_markdown(card: &ReportCard) -> String {
    let mut output = String::new();
    let student = &card.student;

    let _ = writeln!(output, "# Report Card: {}", student.full_name());
    let _ = writeln!(output);
    let _ = writeln!(output, "- LRN: {}", student.lrn);
    if let Some(level) = student.grade_level {
        let _ = writeln!(output, "- Grade level: {level}");
    }
    if let Some(section) = &student.section {
        let _ = writeln!(output, "- Section: {section}");
    }
    if let Some(school_year) = &student.school_year {
        let _ = writeln!(output, "- School year: {school_year}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grades");
    if card.grades.is_empty() {
        let _ = writeln!(output, "No grades recorded.");
    } else {
        let _ = writeln!(output, "| Subject | Q1 | Q2 | Q3 | Q4 | Final | Remarks |");
        let _ = writeln!(output, "| --- | --- | --- | --- | --- | --- | --- |");
        for grade in card.grades.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} |",
                grade.subject_name,
                mark(grade.q1),
                mark(grade.q2),
                mark(grade.q3),
                mark(grade.q4),
                mark(grade.final_rating),
                grade.remarks.as_deref().unwrap_or("-")
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance");
    if card.attendance.is_empty() {
        let _ = writeln!(output, "No attendance recorded.");
    } else {
        let _ = writeln!(output, "| Month | School Days | Present | Absent | Tardy |");
        let _ = writeln!(output, "| --- | --- | --- | --- | --- |");
        for entry in card.attendance.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                entry.month,
                entry.days_of_school,
                entry.days_present,
                entry.days_absent,
                entry.times_tardy
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Observed Values");
    if card.observed_values.is_empty() {
        let _ = writeln!(output, "No observed values recorded.");
    } else {
        let _ = writeln!(output, "| Core Value | Behavior Statement | Q1 | Q2 | Q3 | Q4 |");
        let _ = writeln!(output, "| --- | --- | --- | --- | --- | --- |");
        for value in card.observed_values.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} |",
                value.core_value,
                value.behavior_statement,
                value.q1.as_deref().unwrap_or("-"),
                value.q2.as_deref().unwrap_or("-"),
                value.q3.as_deref().unwrap_or("-"),
                value.q4.as_deref().unwrap_or("-")
            );
        }
    }

    output
}
