use anyhow::{bail, Context};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod analytics;
mod auth;
mod cli;
mod db;
mod models;
mod render;
mod reports;
mod stats;

use crate::auth::AccessScope;
use crate::cli::{
    AccountCommand, AnalyticsCommand, AttendanceCommand, Cli, Commands, GradeCommand,
    ObservedValueCommand, RemedialCommand, ReportCommand, SchoolRecordCommand, StudentCommand,
    SubjectCommand,
};
use crate::models::Student;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    tracing::debug!("connection pool ready");

    let scope = auth::resolve_scope(&pool, args.acting_as.as_deref()).await?;

    match args.command {
        Commands::InitDb => {
            scope.require_full()?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            scope.require_full()?;
            db::seed::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Login { username, password } => {
            // One message for both unknown users and bad passwords.
            let account = db::accounts::find_by_username(&pool, &username)
                .await?
                .context("invalid credentials")?;
            auth::verify_login(&account, &password)?;
            tracing::info!(username = %account.username, "login ok");
            print_json(&account)?;
        }
        Commands::Student(command) => run_student(&pool, &scope, command).await?,
        Commands::Grade(command) => run_grade(&pool, &scope, command).await?,
        Commands::Attendance(command) => run_attendance(&pool, &scope, command).await?,
        Commands::ObservedValue(command) => run_observed_value(&pool, &scope, command).await?,
        Commands::Subject(command) => run_subject(&pool, &scope, command).await?,
        Commands::Remedial(command) => run_remedial(&pool, &scope, command).await?,
        Commands::SchoolRecord(command) => run_school_record(&pool, &scope, command).await?,
        Commands::Account(command) => run_account(&pool, &scope, command).await?,
        Commands::Analytics(command) => run_analytics(&pool, &scope, command).await?,
        Commands::Report(command) => run_report(&pool, &scope, command).await?,
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn find_student(
    pool: &PgPool,
    id: Option<Uuid>,
    lrn: Option<&str>,
) -> anyhow::Result<Student> {
    match (id, lrn) {
        (Some(id), _) => db::students::find_by_id(pool, id)
            .await?
            .with_context(|| format!("student {id} not found")),
        (None, Some(lrn)) => db::students::find_by_lrn(pool, lrn)
            .await?
            .with_context(|| format!("no learner with LRN {lrn}")),
        (None, None) => bail!("pass --id or --lrn"),
    }
}

async fn run_student(
    pool: &PgPool,
    scope: &AccessScope,
    command: StudentCommand,
) -> anyhow::Result<()> {
    match command {
        StudentCommand::Add(new) => {
            scope.require_full()?;
            let student = db::students::insert(pool, &new).await?;
            print_json(&student)?;
        }
        StudentCommand::List {
            grade_level,
            section,
        } => {
            scope.require_full()?;
            let students = db::students::list(pool, grade_level, section.as_deref()).await?;
            print_json(&students)?;
        }
        StudentCommand::Show { id, lrn } => {
            let student = find_student(pool, id, lrn.as_deref()).await?;
            if !scope.allows_student(&student.lrn) {
                bail!("account may only view its own records");
            }
            print_json(&student)?;
        }
        StudentCommand::ReportCard { id, lrn, out } => {
            let student = find_student(pool, id, lrn.as_deref()).await?;
            if !scope.allows_student(&student.lrn) {
                bail!("account may only view its own records");
            }
            let card = db::students::fetch_report_card(pool, student).await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, render::report_card_markdown(&card))?;
                    println!("Report written to {}.", path.display());
                }
                None => print_json(&card)?,
            }
        }
        StudentCommand::Import { csv } => {
            scope.require_full()?;
            let imported = db::students::import_csv(pool, &csv).await?;
            println!("Imported {imported} learners from {}.", csv.display());
        }
        StudentCommand::Update { id, changes } => {
            scope.require_full()?;
            let student = db::students::update(pool, id, &changes)
                .await?
                .with_context(|| format!("student {id} not found"))?;
            print_json(&student)?;
        }
        StudentCommand::Delete { id } => {
            scope.require_full()?;
            if !db::students::delete(pool, id).await? {
                bail!("student {id} not found");
            }
            println!("Student {id} removed.");
        }
    }
    Ok(())
}

async fn run_grade(
    pool: &PgPool,
    scope: &AccessScope,
    command: GradeCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        GradeCommand::Add(new) => {
            let grade = db::grades::insert(pool, &new).await?;
            print_json(&grade)?;
        }
        GradeCommand::List { student_id } => {
            let grades = match student_id {
                Some(student_id) => db::grades::list_by_student(pool, student_id).await?,
                None => db::grades::list_for_grade_level(pool, None).await?,
            };
            print_json(&grades)?;
        }
        GradeCommand::Update { id, changes } => {
            let grade = db::grades::update(pool, id, &changes)
                .await?
                .with_context(|| format!("grade {id} not found"))?;
            print_json(&grade)?;
        }
        GradeCommand::Delete { id } => {
            if !db::grades::delete(pool, id).await? {
                bail!("grade {id} not found");
            }
            println!("Grade {id} removed.");
        }
    }
    Ok(())
}

async fn run_attendance(
    pool: &PgPool,
    scope: &AccessScope,
    command: AttendanceCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        AttendanceCommand::Add(new) => {
            let entry = db::attendance::insert(pool, &new).await?;
            print_json(&entry)?;
        }
        AttendanceCommand::List { student_id } => {
            let entries = match student_id {
                Some(student_id) => db::attendance::list_by_student(pool, student_id).await?,
                None => db::attendance::list_all(pool).await?,
            };
            print_json(&entries)?;
        }
        AttendanceCommand::Update { id, changes } => {
            let entry = db::attendance::update(pool, id, &changes)
                .await?
                .with_context(|| format!("attendance {id} not found"))?;
            print_json(&entry)?;
        }
    }
    Ok(())
}

async fn run_observed_value(
    pool: &PgPool,
    scope: &AccessScope,
    command: ObservedValueCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        ObservedValueCommand::Add(new) => {
            let value = db::observed_values::insert(pool, &new).await?;
            print_json(&value)?;
        }
        ObservedValueCommand::List { student_id } => {
            let values = db::observed_values::list_by_student(pool, student_id).await?;
            print_json(&values)?;
        }
        ObservedValueCommand::Update { id, changes } => {
            let value = db::observed_values::update(pool, id, &changes)
                .await?
                .with_context(|| format!("observed value {id} not found"))?;
            print_json(&value)?;
        }
        ObservedValueCommand::Delete { id } => {
            if !db::observed_values::delete(pool, id).await? {
                bail!("observed value {id} not found");
            }
            println!("Observed value {id} removed.");
        }
    }
    Ok(())
}

async fn run_subject(
    pool: &PgPool,
    scope: &AccessScope,
    command: SubjectCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        SubjectCommand::Add(new) => {
            let subject = db::subjects::insert(pool, &new).await?;
            print_json(&subject)?;
        }
        SubjectCommand::List => {
            let subjects = db::subjects::list(pool).await?;
            print_json(&subjects)?;
        }
        SubjectCommand::Show { id } => {
            let subject = db::subjects::find_by_id(pool, id)
                .await?
                .with_context(|| format!("subject {id} not found"))?;
            print_json(&subject)?;
        }
        SubjectCommand::Update { id, changes } => {
            let subject = db::subjects::update(pool, id, &changes)
                .await?
                .with_context(|| format!("subject {id} not found"))?;
            print_json(&subject)?;
        }
        SubjectCommand::Delete { id } => {
            if !db::subjects::delete(pool, id).await? {
                bail!("subject {id} not found");
            }
            println!("Subject {id} removed.");
        }
    }
    Ok(())
}

async fn run_remedial(
    pool: &PgPool,
    scope: &AccessScope,
    command: RemedialCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        RemedialCommand::Add(new) => {
            let class = db::remedial::insert(pool, &new).await?;
            print_json(&class)?;
        }
        RemedialCommand::List { student_id } => {
            let classes = db::remedial::list_by_student(pool, student_id).await?;
            print_json(&classes)?;
        }
        RemedialCommand::Update { id, changes } => {
            let class = db::remedial::update(pool, id, &changes)
                .await?
                .with_context(|| format!("remedial class {id} not found"))?;
            print_json(&class)?;
        }
    }
    Ok(())
}

async fn run_school_record(
    pool: &PgPool,
    scope: &AccessScope,
    command: SchoolRecordCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        SchoolRecordCommand::Add(new) => {
            let record = db::school_records::insert(pool, &new).await?;
            print_json(&record)?;
        }
        SchoolRecordCommand::List { student_id } => {
            let records = db::school_records::list_by_student(pool, student_id).await?;
            print_json(&records)?;
        }
        SchoolRecordCommand::Update { id, changes } => {
            let record = db::school_records::update(pool, id, &changes)
                .await?
                .with_context(|| format!("school record {id} not found"))?;
            print_json(&record)?;
        }
    }
    Ok(())
}

async fn run_account(
    pool: &PgPool,
    scope: &AccessScope,
    command: AccountCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        AccountCommand::Create(new) => {
            let account = db::accounts::insert(pool, &new).await?;
            print_json(&account)?;
        }
        AccountCommand::List => {
            let accounts = db::accounts::list(pool).await?;
            print_json(&accounts)?;
        }
        AccountCommand::Show { id } => {
            let account = db::accounts::find_by_id(pool, id)
                .await?
                .with_context(|| format!("account {id} not found"))?;
            print_json(&account)?;
        }
        AccountCommand::Update { id, changes } => {
            let account = db::accounts::update(pool, id, &changes)
                .await?
                .with_context(|| format!("account {id} not found"))?;
            print_json(&account)?;
        }
        AccountCommand::Delete { id } => {
            if !db::accounts::delete(pool, id).await? {
                bail!("account {id} not found");
            }
            println!("Account {id} removed.");
        }
        AccountCommand::Promote { username, role } => {
            let account = db::accounts::promote(pool, &username, role)
                .await?
                .with_context(|| format!("no account named {username}"))?;
            println!("{} is now {}.", account.username, account.role.as_str());
        }
    }
    Ok(())
}

async fn run_analytics(
    pool: &PgPool,
    scope: &AccessScope,
    command: AnalyticsCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        AnalyticsCommand::Dashboard => {
            let students = db::students::list(pool, None, None).await?;
            let accounts = db::accounts::list(pool).await?;
            let subjects = db::subjects::list(pool).await?;
            let attendance = db::attendance::list_all(pool).await?;
            let grades = db::grades::list_for_grade_level(pool, None).await?;
            let stats =
                analytics::dashboard_stats(&students, &accounts, &subjects, &attendance, &grades);
            print_json(&stats)?;
        }
        AnalyticsCommand::StudentDistribution => {
            let students = db::students::list(pool, None, None).await?;
            print_json(&analytics::student_distribution(&students))?;
        }
        AnalyticsCommand::GradePerformance => {
            let grades = db::grades::list_for_grade_level(pool, None).await?;
            print_json(&analytics::grade_performance(&grades))?;
        }
        AnalyticsCommand::AttendanceTrend => {
            let attendance = db::attendance::list_all(pool).await?;
            print_json(&analytics::attendance_trend(&attendance))?;
        }
        AnalyticsCommand::GradeDistribution => {
            let grades = db::grades::list_for_grade_level(pool, None).await?;
            print_json(&analytics::grade_distribution(&grades))?;
        }
    }
    Ok(())
}

async fn run_report(
    pool: &PgPool,
    scope: &AccessScope,
    command: ReportCommand,
) -> anyhow::Result<()> {
    scope.require_full()?;
    match command {
        ReportCommand::ClassSummary {
            grade_level,
            section,
            out,
        } => {
            let records =
                db::students::list_with_records(pool, grade_level, section.as_deref()).await?;
            let summary = reports::class_summary(grade_level, section.as_deref(), &records);
            match out {
                Some(path) => {
                    std::fs::write(&path, render::class_summary_markdown(&summary))?;
                    println!("Report written to {}.", path.display());
                }
                None => print_json(&summary)?,
            }
        }
        ReportCommand::GradeAnalytics { grade_level } => {
            let grades = db::grades::list_for_grade_level(pool, grade_level).await?;
            print_json(&reports::grade_analytics(&grades))?;
        }
        ReportCommand::AttendanceSummary => {
            let rows = db::attendance::list_with_students(pool).await?;
            print_json(&reports::attendance_summary(&rows))?;
        }
    }
    Ok(())
}
