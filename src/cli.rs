use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use uuid::Uuid;

use crate::models::Role;

#[derive(Parser)]
#[command(name = "report-card")]
#[command(about = "School report card records and analytics", long_about = None)]
pub struct Cli {
    /// Run with the visibility of this account instead of the operator
    #[arg(long, global = true)]
    pub acting_as: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Insert the subject catalog and the bootstrap superadmin
    Seed,
    /// Check a username and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Manage learners
    #[command(subcommand)]
    Student(StudentCommand),
    /// Manage grade rows
    #[command(subcommand)]
    Grade(GradeCommand),
    /// Manage monthly attendance
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Manage observed core values
    #[command(subcommand)]
    ObservedValue(ObservedValueCommand),
    /// Manage the subject catalog
    #[command(subcommand)]
    Subject(SubjectCommand),
    /// Manage remedial classes
    #[command(subcommand)]
    Remedial(RemedialCommand),
    /// Manage permanent school records
    #[command(subcommand)]
    SchoolRecord(SchoolRecordCommand),
    /// Manage login accounts
    #[command(subcommand)]
    Account(AccountCommand),
    /// School-wide analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
    /// Class and learner reports
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Enroll a learner
    Add(NewStudent),
    /// List learners
    List {
        #[arg(long)]
        grade_level: Option<i32>,
        #[arg(long)]
        section: Option<String>,
    },
    /// Show one learner
    #[command(group(
        ArgGroup::new("selector")
            .args(["id", "lrn"])
            .required(true)
            .multiple(false)
    ))]
    Show {
        #[arg(long)]
        id: Option<Uuid>,
        #[arg(long)]
        lrn: Option<String>,
    },
    /// Assemble a learner's full report card
    #[command(group(
        ArgGroup::new("selector")
            .args(["id", "lrn"])
            .required(true)
            .multiple(false)
    ))]
    ReportCard {
        #[arg(long)]
        id: Option<Uuid>,
        #[arg(long)]
        lrn: Option<String>,
        /// Write markdown to this file instead of printing JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import learners from a CSV roster
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Update a learner
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: StudentChanges,
    },
    /// Remove a learner and every dependent record
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum GradeCommand {
    /// Record a subject grade for a learner
    Add(NewGrade),
    /// List grade rows, all or for one learner
    List {
        #[arg(long)]
        student_id: Option<Uuid>,
    },
    /// Update a grade row
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: GradeChanges,
    },
    /// Delete a grade row
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum AttendanceCommand {
    /// Record a month of attendance for a learner
    Add(NewAttendance),
    /// List attendance rows, all or for one learner
    List {
        #[arg(long)]
        student_id: Option<Uuid>,
    },
    /// Update an attendance row
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: AttendanceChanges,
    },
}

#[derive(Subcommand)]
pub enum ObservedValueCommand {
    /// Record an observed core value for a learner
    Add(NewObservedValue),
    /// List a learner's observed values
    List {
        #[arg(long)]
        student_id: Uuid,
    },
    /// Update an observed value row
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: ObservedValueChanges,
    },
    /// Delete an observed value row
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum SubjectCommand {
    /// Add a subject to the catalog
    Add(NewSubject),
    /// List the subject catalog
    List,
    /// Show one subject
    Show {
        #[arg(long)]
        id: Uuid,
    },
    /// Update a subject
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: SubjectChanges,
    },
    /// Delete a subject
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum RemedialCommand {
    /// Record a remedial class for a learner
    Add(NewRemedial),
    /// List a learner's remedial classes
    List {
        #[arg(long)]
        student_id: Uuid,
    },
    /// Update a remedial class row
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: RemedialChanges,
    },
}

#[derive(Subcommand)]
pub enum SchoolRecordCommand {
    /// Record a permanent-record entry for a learner
    Add(NewSchoolRecord),
    /// List a learner's permanent record, earliest grade first
    List {
        #[arg(long)]
        student_id: Uuid,
    },
    /// Update a permanent-record entry
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: SchoolRecordChanges,
    },
}

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Create a login account
    Create(NewAccount),
    /// List accounts
    List,
    /// Show one account
    Show {
        #[arg(long)]
        id: Uuid,
    },
    /// Update an account
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        changes: AccountChanges,
    },
    /// Delete an account
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Change an account's role by username
    Promote {
        #[arg(long)]
        username: String,
        #[arg(long)]
        role: Role,
    },
}

#[derive(Subcommand)]
pub enum AnalyticsCommand {
    /// Headline counts and averages
    Dashboard,
    /// Learner counts per grade level
    StudentDistribution,
    /// Average final rating per subject
    GradePerformance,
    /// Monthly present, absent and tardy totals
    AttendanceTrend,
    /// Final ratings bucketed into achievement bands
    GradeDistribution,
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Summarize one class or the whole school
    ClassSummary {
        #[arg(long)]
        grade_level: Option<i32>,
        #[arg(long)]
        section: Option<String>,
        /// Write markdown to this file instead of printing JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Subject-by-subject grade statistics
    GradeAnalytics {
        #[arg(long)]
        grade_level: Option<i32>,
    },
    /// School-wide attendance summary
    AttendanceSummary,
}

#[derive(Args)]
pub struct NewStudent {
    #[arg(long)]
    pub lrn: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub middle_name: Option<String>,
    #[arg(long)]
    pub birthdate: Option<NaiveDate>,
    #[arg(long)]
    pub sex: Option<String>,
    #[arg(long)]
    pub age: Option<i32>,
    #[arg(long)]
    pub grade_level: Option<i32>,
    #[arg(long)]
    pub section: Option<String>,
    #[arg(long)]
    pub school_year: Option<String>,
    #[arg(long, default_value = "N/A")]
    pub track: String,
    #[arg(long, default_value = "elementary")]
    pub education_level: String,
    #[arg(long)]
    pub strand: Option<String>,
}

#[derive(Args)]
pub struct StudentChanges {
    #[arg(long)]
    pub lrn: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub middle_name: Option<String>,
    #[arg(long)]
    pub birthdate: Option<NaiveDate>,
    #[arg(long)]
    pub sex: Option<String>,
    #[arg(long)]
    pub age: Option<i32>,
    #[arg(long)]
    pub grade_level: Option<i32>,
    #[arg(long)]
    pub section: Option<String>,
    #[arg(long)]
    pub school_year: Option<String>,
    #[arg(long)]
    pub track: Option<String>,
    #[arg(long)]
    pub education_level: Option<String>,
    #[arg(long)]
    pub strand: Option<String>,
}

#[derive(Args)]
pub struct NewGrade {
    #[arg(long)]
    pub student_id: Uuid,
    #[arg(long)]
    pub subject_name: String,
    #[arg(long)]
    pub q1: Option<f64>,
    #[arg(long)]
    pub q2: Option<f64>,
    #[arg(long)]
    pub q3: Option<f64>,
    #[arg(long)]
    pub q4: Option<f64>,
    #[arg(long)]
    pub final_rating: Option<f64>,
    #[arg(long)]
    pub remarks: Option<String>,
    #[arg(long, default_value = "N/A")]
    pub semester: String,
    #[arg(long, default_value = "standard")]
    pub subject_type: String,
    #[arg(long)]
    pub sem_final_grade: Option<f64>,
}

#[derive(Args)]
pub struct GradeChanges {
    #[arg(long)]
    pub subject_name: Option<String>,
    #[arg(long)]
    pub q1: Option<f64>,
    #[arg(long)]
    pub q2: Option<f64>,
    #[arg(long)]
    pub q3: Option<f64>,
    #[arg(long)]
    pub q4: Option<f64>,
    #[arg(long)]
    pub final_rating: Option<f64>,
    #[arg(long)]
    pub remarks: Option<String>,
    #[arg(long)]
    pub semester: Option<String>,
    #[arg(long)]
    pub subject_type: Option<String>,
    #[arg(long)]
    pub sem_final_grade: Option<f64>,
}

#[derive(Args)]
pub struct NewAttendance {
    #[arg(long)]
    pub student_id: Uuid,
    #[arg(long)]
    pub month: String,
    #[arg(long, default_value_t = 0)]
    pub days_of_school: i32,
    #[arg(long, default_value_t = 0)]
    pub days_present: i32,
    #[arg(long, default_value_t = 0)]
    pub days_absent: i32,
    #[arg(long, default_value_t = 0)]
    pub times_tardy: i32,
}

#[derive(Args)]
pub struct AttendanceChanges {
    #[arg(long)]
    pub month: Option<String>,
    #[arg(long)]
    pub days_of_school: Option<i32>,
    #[arg(long)]
    pub days_present: Option<i32>,
    #[arg(long)]
    pub days_absent: Option<i32>,
    #[arg(long)]
    pub times_tardy: Option<i32>,
}

#[derive(Args)]
pub struct NewObservedValue {
    #[arg(long)]
    pub student_id: Uuid,
    #[arg(long)]
    pub core_value: String,
    #[arg(long)]
    pub behavior_statement: String,
    #[arg(long)]
    pub q1: Option<String>,
    #[arg(long)]
    pub q2: Option<String>,
    #[arg(long)]
    pub q3: Option<String>,
    #[arg(long)]
    pub q4: Option<String>,
}

#[derive(Args)]
pub struct ObservedValueChanges {
    #[arg(long)]
    pub core_value: Option<String>,
    #[arg(long)]
    pub behavior_statement: Option<String>,
    #[arg(long)]
    pub q1: Option<String>,
    #[arg(long)]
    pub q2: Option<String>,
    #[arg(long)]
    pub q3: Option<String>,
    #[arg(long)]
    pub q4: Option<String>,
}

#[derive(Args)]
pub struct NewSubject {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct SubjectChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct NewRemedial {
    #[arg(long)]
    pub student_id: Uuid,
    #[arg(long)]
    pub subject_name: String,
    #[arg(long)]
    pub final_rating: Option<f64>,
    #[arg(long)]
    pub remedial_class_mark: Option<String>,
    #[arg(long)]
    pub recomputed_final_grade: Option<f64>,
    #[arg(long)]
    pub remarks: Option<String>,
    #[arg(long)]
    pub conducted_from: Option<NaiveDate>,
    #[arg(long)]
    pub conducted_to: Option<NaiveDate>,
    #[arg(long)]
    pub school: Option<String>,
}

#[derive(Args)]
pub struct RemedialChanges {
    #[arg(long)]
    pub subject_name: Option<String>,
    #[arg(long)]
    pub final_rating: Option<f64>,
    #[arg(long)]
    pub remedial_class_mark: Option<String>,
    #[arg(long)]
    pub recomputed_final_grade: Option<f64>,
    #[arg(long)]
    pub remarks: Option<String>,
    #[arg(long)]
    pub conducted_from: Option<NaiveDate>,
    #[arg(long)]
    pub conducted_to: Option<NaiveDate>,
    #[arg(long)]
    pub school: Option<String>,
}

#[derive(Args)]
pub struct NewSchoolRecord {
    #[arg(long)]
    pub student_id: Uuid,
    #[arg(long)]
    pub grade_level: i32,
    #[arg(long)]
    pub school_name: Option<String>,
    #[arg(long)]
    pub school_id: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub division: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub school_year: Option<String>,
    #[arg(long)]
    pub adviser: Option<String>,
    #[arg(long)]
    pub general_average: Option<f64>,
    #[arg(long)]
    pub action_taken: Option<String>,
}

#[derive(Args)]
pub struct SchoolRecordChanges {
    #[arg(long)]
    pub grade_level: Option<i32>,
    #[arg(long)]
    pub school_name: Option<String>,
    #[arg(long)]
    pub school_id: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub division: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub school_year: Option<String>,
    #[arg(long)]
    pub adviser: Option<String>,
    #[arg(long)]
    pub general_average: Option<f64>,
    #[arg(long)]
    pub action_taken: Option<String>,
}

#[derive(Args)]
pub struct NewAccount {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long, default_value = "user")]
    pub role: Role,
}

#[derive(Args)]
pub struct AccountChanges {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub role: Option<Role>,
    #[arg(long)]
    pub is_active: Option<bool>,
}
