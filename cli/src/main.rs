use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use school_portal::config::{ClientConfig, ConfigError};
use school_portal::net::transport::ReqwestTransport;
use school_portal::net::records::{
    DayOfWeek, EmploymentStatus, StudentFilter, StudentStatus, TeacherFilter, TimetableFilter, TimetableRequest,
    UserFilter,
};
use school_portal::net::types::{LoginCredentials, RegisterRequest, Role};
use school_portal::net::{ApiClient, ApiError, Method, RequestOptions};
use school_portal::session::SessionStore;
use school_portal::session::storage::{FileStorage, StorageError};
use school_portal::util::Navigator;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("session file error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
}

#[derive(Parser, Debug)]
#[command(name = "school-cli", about = "School management API client")]
struct Cli {
    /// API base URL; overrides `SCHOOL_API_BASE`.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "SCHOOL_SESSION_FILE", default_value = ".school-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the auth service is up.
    Health,
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "SCHOOL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Print the current user's profile.
    Me {
        /// Fetch from the server even if a profile is cached.
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Summarize the stored session without contacting the server.
    Whoami,
    /// Exchange the stored refresh token for a new token pair.
    Refresh,
    Register(RegisterArgs),
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        new: String,
    },
    /// Admin student records.
    #[command(subcommand)]
    Students(StudentsCommand),
    /// Admin teacher records.
    #[command(subcommand)]
    Teachers(TeachersCommand),
    /// Weekly timetable slots.
    #[command(subcommand)]
    Timetable(TimetableCommand),
    /// Exam results.
    #[command(subcommand)]
    Results(ResultsCommand),
    /// Admin user-account management.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Send an arbitrary authenticated request, e.g. `request GET /admin/students`.
    Request {
        method: String,
        endpoint: String,
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "SCHOOL_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// ADMIN, TEACHER, ACADEMIC_TEACHER, DISCIPLINE_TEACHER, STUDENT or PARENT.
    #[arg(long, default_value = "STUDENT")]
    role: String,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    gender: Option<String>,
}

#[derive(Args, Debug, Default)]
struct StudentQuery {
    #[arg(long)]
    search: Option<String>,
    /// ACTIVE, INACTIVE, GRADUATED, SUSPENDED, EXPELLED or TRANSFERRED.
    #[arg(long, value_parser = parse_upper::<StudentStatus>)]
    status: Option<StudentStatus>,
    #[arg(long = "class")]
    class_name: Option<String>,
    #[arg(long)]
    section: Option<String>,
}

impl From<StudentQuery> for StudentFilter {
    fn from(q: StudentQuery) -> Self {
        Self { search: q.search, status: q.status, class_name: q.class_name, section: q.section }
    }
}

#[derive(Subcommand, Debug)]
enum StudentsCommand {
    List(StudentQuery),
    Show { id: i64 },
    /// Read-only roster available to teacher roles.
    Roster(StudentQuery),
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum TeachersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        /// ACTIVE, ON_LEAVE, RESIGNED or TERMINATED.
        #[arg(long, value_parser = parse_upper::<EmploymentStatus>)]
        status: Option<EmploymentStatus>,
    },
    Show { id: i64 },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum TimetableCommand {
    List {
        #[arg(long = "class")]
        class_name: Option<String>,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        teacher_id: Option<i64>,
        /// MONDAY through SUNDAY.
        #[arg(long, value_parser = parse_upper::<DayOfWeek>)]
        day: Option<DayOfWeek>,
    },
    Show { id: i64 },
    /// Dry-run a slot given as timetable JSON against existing slots.
    Check {
        #[arg(long)]
        data: String,
        /// Slot being edited, so it does not collide with itself.
        #[arg(long)]
        exclude_id: Option<i64>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum ResultsCommand {
    Show { id: i64 },
    Student {
        student_id: i64,
        #[arg(long)]
        academic_year: Option<String>,
    },
    Class {
        class_name: String,
        #[arg(long)]
        section: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    List {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Show { id: i64 },
    Activate { id: i64 },
    Deactivate { id: i64 },
    Unlock { id: i64 },
    Delete { id: i64 },
}

/// Parse a backend enum name case-insensitively, e.g. `on_leave`.
fn parse_upper<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(raw.to_uppercase())).map_err(|_| format!("unknown value `{raw}`"))
}

/// Terminal stand-in for page navigation.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(%path, "session closed; sign in again to continue");
    }
}

#[derive(Serialize)]
struct Whoami {
    authenticated: bool,
    name: Option<String>,
    initials: String,
    role: Option<Role>,
    has_refresh_token: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base) = &cli.base_url {
        config = config.with_api_base(base);
    }

    let storage = FileStorage::open(&cli.session_file)?;
    let session = SessionStore::new(Rc::new(storage));
    let transport = ReqwestTransport::new(&config)?;
    let client = ApiClient::new(&config, session, Rc::new(transport), Rc::new(TerminalNavigator));
    tracing::debug!(base = %config.api_base, session_file = %cli.session_file.display(), "client ready");

    run(&client, cli.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Health => print_json(&client.health().await?),
        Command::Login { username, password } => {
            let credentials = LoginCredentials { username_or_email: username, password };
            let envelope = client.login(&credentials).await?;
            if client.session().is_authenticated() {
                tracing::info!("signed in");
            }
            print_json(&envelope)
        }
        Command::Logout => {
            client.logout().await?;
            Ok(())
        }
        Command::Me { refresh } => match client.session().user() {
            Some(user) if !refresh => print_json(&user),
            _ => print_json(&client.current_user().await?),
        },
        Command::Whoami => {
            let session = client.session();
            print_json(&Whoami {
                authenticated: session.is_authenticated(),
                name: session.display_name(),
                initials: session.user_initials(),
                role: session.role(),
                has_refresh_token: session.refresh_token().is_some(),
            })
        }
        Command::Refresh => print_json(&client.refresh().await?),
        Command::Register(args) => {
            let request = RegisterRequest {
                username: args.username,
                email: args.email,
                confirm_password: args.password.clone(),
                password: args.password,
                first_name: args.first_name,
                last_name: args.last_name,
                phone_number: args.phone_number,
                role: Role::from(args.role.to_uppercase()),
                gender: args.gender,
            };
            print_json(&client.register(&request).await?)
        }
        Command::ChangePassword { current, new } => print_json(&client.change_password(&current, &new, &new).await?),
        Command::ForgotPassword { email } => print_json(&client.forgot_password(&email).await?),
        Command::ResetPassword { token, new } => print_json(&client.reset_password(&token, &new, &new).await?),
        Command::Students(command) => run_students(client, command).await,
        Command::Teachers(command) => run_teachers(client, command).await,
        Command::Timetable(command) => run_timetable(client, command).await,
        Command::Results(command) => run_results(client, command).await,
        Command::Users(command) => run_users(client, command).await,
        Command::Request { method, endpoint, data } => {
            let method = method
                .to_uppercase()
                .parse::<Method>()
                .map_err(|_| CliError::InvalidMethod(method))?;
            let mut options = RequestOptions::with_method(method);
            if let Some(data) = data {
                let body = serde_json::from_str::<Value>(&data)?;
                options = options.json(&body)?;
            }
            print_json(&client.request(&endpoint, options).await?)
        }
    }
}

async fn run_students(client: &ApiClient, command: StudentsCommand) -> Result<(), CliError> {
    match command {
        StudentsCommand::List(query) => print_json(&client.list_students(&query.into()).await?),
        StudentsCommand::Show { id } => print_json(&client.get_student(id).await?),
        StudentsCommand::Roster(query) => print_json(&client.teacher_students(&query.into()).await?),
        StudentsCommand::Delete { id } => print_json(&client.delete_student(id).await?),
    }
}

async fn run_teachers(client: &ApiClient, command: TeachersCommand) -> Result<(), CliError> {
    match command {
        TeachersCommand::List { search, status } => {
            print_json(&client.list_teachers(&TeacherFilter { search, status }).await?)
        }
        TeachersCommand::Show { id } => print_json(&client.get_teacher(id).await?),
        TeachersCommand::Delete { id } => print_json(&client.delete_teacher(id).await?),
    }
}

async fn run_timetable(client: &ApiClient, command: TimetableCommand) -> Result<(), CliError> {
    match command {
        TimetableCommand::List { class_name, section, teacher_id, day } => {
            let filter = TimetableFilter { class_name, section, teacher_id, day_of_week: day };
            print_json(&client.list_timetable(&filter).await?)
        }
        TimetableCommand::Show { id } => print_json(&client.get_timetable_entry(id).await?),
        TimetableCommand::Check { data, exclude_id } => {
            let slot: TimetableRequest = serde_json::from_str(&data)?;
            print_json(&client.check_timetable_conflicts(&slot, exclude_id).await?)
        }
        TimetableCommand::Delete { id } => print_json(&client.delete_timetable_entry(id).await?),
    }
}

async fn run_results(client: &ApiClient, command: ResultsCommand) -> Result<(), CliError> {
    match command {
        ResultsCommand::Show { id } => print_json(&client.get_result(id).await?),
        ResultsCommand::Student { student_id, academic_year } => {
            print_json(&client.results_for_student(student_id, academic_year.as_deref()).await?)
        }
        ResultsCommand::Class { class_name, section } => {
            print_json(&client.results_for_class(&class_name, section.as_deref()).await?)
        }
        ResultsCommand::Delete { id } => print_json(&client.delete_result(id).await?),
    }
}

async fn run_users(client: &ApiClient, command: UsersCommand) -> Result<(), CliError> {
    match command {
        UsersCommand::List { role, search } => {
            let filter = UserFilter { role: role.map(|r| Role::from(r.to_uppercase())), search };
            print_json(&client.list_users(&filter).await?)
        }
        UsersCommand::Show { id } => print_json(&client.get_user(id).await?),
        UsersCommand::Activate { id } => print_json(&client.activate_user(id).await?),
        UsersCommand::Deactivate { id } => print_json(&client.deactivate_user(id).await?),
        UsersCommand::Unlock { id } => print_json(&client.unlock_user(id).await?),
        UsersCommand::Delete { id } => print_json(&client.delete_user(id).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn login_parses_credentials() {
        let cli = Cli::parse_from(["school-cli", "login", "--username", "ann", "--password", "pw"]);
        assert!(matches!(cli.command, Command::Login { ref username, .. } if username == "ann"));
        assert_eq!(cli.base_url, None);
    }

    #[test]
    fn request_takes_method_endpoint_and_body() {
        let cli = Cli::parse_from([
            "school-cli",
            "--base-url",
            "http://127.0.0.1:9000/api",
            "request",
            "post",
            "/timetable/check-conflicts",
            "--data",
            r#"{"dayOfWeek":"MONDAY"}"#,
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:9000/api"));
        let Command::Request { method, endpoint, data } = cli.command else {
            panic!("expected request command");
        };
        assert_eq!(method, "post");
        assert_eq!(endpoint, "/timetable/check-conflicts");
        assert!(data.is_some());
    }

    #[test]
    fn student_list_filters_parse_case_insensitively() {
        let cli = Cli::parse_from(["school-cli", "students", "list", "--status", "graduated", "--class", "Grade 6"]);
        let Command::Students(StudentsCommand::List(query)) = cli.command else {
            panic!("expected students list");
        };
        let filter = StudentFilter::from(query);
        assert_eq!(filter.status, Some(StudentStatus::Graduated));
        assert_eq!(filter.class_name.as_deref(), Some("Grade 6"));
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        assert!(Cli::try_parse_from(["school-cli", "timetable", "list", "--day", "funday"]).is_err());
        let cli = Cli::parse_from(["school-cli", "teachers", "list", "--status", "on_leave"]);
        assert!(matches!(
            cli.command,
            Command::Teachers(TeachersCommand::List { status: Some(EmploymentStatus::OnLeave), .. })
        ));
    }

    #[test]
    fn conflict_check_takes_slot_json_and_exclusion() {
        let cli = Cli::parse_from([
            "school-cli",
            "timetable",
            "check",
            "--data",
            r#"{"className":"Grade 6","subject":"Maths","teacherId":4,"dayOfWeek":"MONDAY","startTime":"09:00","endTime":"09:45"}"#,
            "--exclude-id",
            "10",
        ]);
        let Command::Timetable(TimetableCommand::Check { data, exclude_id }) = cli.command else {
            panic!("expected timetable check");
        };
        assert_eq!(exclude_id, Some(10));
        let slot: TimetableRequest = serde_json::from_str(&data).unwrap();
        assert_eq!(slot.day_of_week, DayOfWeek::Monday);
    }
}
