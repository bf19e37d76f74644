use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub lrn: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub grade_level: Option<i32>,
    pub section: Option<String>,
    pub school_year: Option<String>,
    pub track: String,
    pub education_level: String,
    pub strand: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_name: String,
    pub q1: Option<f64>,
    pub q2: Option<f64>,
    pub q3: Option<f64>,
    pub q4: Option<f64>,
    pub final_rating: Option<f64>,
    pub remarks: Option<String>,
    pub semester: String,
    pub subject_type: String,
    pub sem_final_grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub month: String,
    pub days_of_school: i32,
    pub days_present: i32,
    pub days_absent: i32,
    pub times_tardy: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedValue {
    pub id: Uuid,
    pub student_id: Uuid,
    pub core_value: String,
    pub behavior_statement: String,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
    pub q4: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedialClass {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_name: String,
    pub final_rating: Option<f64>,
    pub remedial_class_mark: Option<String>,
    pub recomputed_final_grade: Option<f64>,
    pub remarks: Option<String>,
    pub conducted_from: Option<NaiveDate>,
    pub conducted_to: Option<NaiveDate>,
    pub school: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub grade_level: i32,
    pub school_name: Option<String>,
    pub school_id: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub region: Option<String>,
    pub school_year: Option<String>,
    pub adviser: Option<String>,
    pub general_average: Option<f64>,
    pub action_taken: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Teacher,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Role {
        match value {
            "superadmin" => Role::Superadmin,
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            _ => Role::User,
        }
    }

    pub fn is_staff(self) -> bool {
        !matches!(self, Role::User)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct StudentWithRecords {
    pub student: Student,
    pub grades: Vec<Grade>,
    pub attendance: Vec<Attendance>,
}

// Attendance row flattened with its owner, for the attendance summary.
#[derive(Debug, Clone)]
pub struct AttendanceWithStudent {
    pub student_id: Uuid,
    pub student_name: String,
    pub month: String,
    pub days_of_school: i32,
    pub days_present: i32,
    pub days_absent: i32,
    pub times_tardy: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCard {
    #[serde(flatten)]
    pub student: Student,
    pub grades: Vec<Grade>,
    pub attendance: Vec<Attendance>,
    pub observed_values: Vec<ObservedValue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_accounts: i64,
    pub total_subjects: i64,
    pub student_growth: i64,
    pub attendance_rate: i64,
    pub average_grades: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeLevelCount {
    pub grade_level: Option<i32>,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject: String,
    pub average: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceTrendPoint {
    pub month: String,
    pub present: i64,
    pub absent: i64,
    pub tardy: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBucket {
    pub grade: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStanding {
    pub id: Uuid,
    pub name: String,
    pub average_grade: i64,
    pub attendance_rate: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub class_name: String,
    pub total_students: i64,
    pub average_grade: i64,
    pub attendance_rate: i64,
    pub top_performers: Vec<StudentStanding>,
    pub struggling_students: Vec<StudentStanding>,
    pub students: Vec<StudentStanding>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAnalytics {
    pub name: String,
    pub average: i64,
    pub highest: i64,
    pub lowest: i64,
    pub pass_rate: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeAnalytics {
    pub subjects: Vec<SubjectAnalytics>,
    pub overall_average: i64,
    pub passing_rate: i64,
    pub failure_rate: i64,
    pub total_grades_recorded: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendance {
    pub month: String,
    pub days_of_school: i64,
    pub present: i64,
    pub absent: i64,
    pub tardy: i64,
    pub present_rate: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub school_year: String,
    pub total_days: i64,
    pub present_rate: i64,
    pub absent_rate: i64,
    pub tardy_rate: i64,
    pub monthly_breakdown: Vec<MonthlyAttendance>,
    pub perfect_attendance_students: Vec<StudentRef>,
}
