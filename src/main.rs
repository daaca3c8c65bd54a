//! `enrollctl` - command-line front end for the course-enrollment service.
//!
//! Each subcommand is one view: it loads the saved login, calls the API,
//! re-fetches what it changed and prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use course_enrollment_core::app::{
    self, courses::SessionField, enroll, student, view, CourseForm, EnrollmentForm,
    StatusFilter,
};
use course_enrollment_core::config::parse_base_url;
use course_enrollment_core::error::{ErrorKind, Result};
use course_enrollment_core::interface::{HttpClient, RequestApi};
use course_enrollment_core::model::structs::{Course, Id, Role};
use course_enrollment_core::{ApiClient, AuthContext, ClientConfig, SessionStore};

/// Course enrollment client
#[derive(Parser, Debug)]
#[command(name = "enrollctl", version, about, long_about = None)]
struct Cli {
    /// Verbose output. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// API base URL, overrides ENROLL_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Saved-login file, overrides ENROLL_SESSION_FILE.
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a student account and log in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: String,
    },
    /// Forget the saved session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// List or manage courses.
    #[command(subcommand)]
    Courses(CourseCommand),
    /// List the dates a course can be joined on.
    Dates { course_id: Id },
    /// Request enrollment in a course (students).
    Enroll(EnrollArgs),
    /// Show your own enrollments (students).
    MyEnrollments,
    /// Review enrollment requests (admins).
    Enrollments {
        /// all, pending, approved or rejected
        #[arg(long, default_value = "all")]
        filter: StatusFilter,
    },
    /// Approve a pending enrollment (admins).
    Approve { enrollment_id: Id },
    /// Reject a pending enrollment (admins).
    Reject { enrollment_id: Id },
    /// Show notifications (students).
    Notifications {
        /// Only unread notifications.
        #[arg(long)]
        unread: bool,
        /// Keep polling for new notifications.
        #[arg(long)]
        watch: bool,
    },
    /// Courses, enrollments and notifications at once (students).
    Overview,
}

#[derive(Subcommand, Debug)]
enum CourseCommand {
    /// List all courses.
    List,
    /// Create a course (admins).
    Create(CourseArgs),
    /// Edit a course (admins).
    Update {
        course_id: Id,
        #[command(flatten)]
        course: CourseArgs,
        /// Remove the session at this 1-based position. Repeatable.
        #[arg(long = "remove-session")]
        remove_sessions: Vec<usize>,
        /// Change one field: POSITION:FIELD=VALUE, e.g. 2:end_time=21:00:00.
        #[arg(long = "set-session")]
        set_sessions: Vec<String>,
    },
    /// Delete a course (admins).
    Delete { course_id: Id },
}

#[derive(Args, Debug)]
struct CourseArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    schedule: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    end_date: Option<NaiveDate>,
    /// Append a session: SLOT[,START[,END]], e.g. evening,18:00:00,20:00:00.
    #[arg(long = "add-session")]
    add_sessions: Vec<String>,
}

#[derive(Args, Debug)]
struct EnrollArgs {
    course_id: Id,
    /// YYYY-MM-DD, within the course period.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Session id of the course.
    #[arg(long)]
    session: Option<Id>,
    /// Preselect the course start date and first session.
    #[arg(long)]
    defaults: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return ExitCode::from(2);
        }
    };
    let store = SessionStore::new(&config.session_file);

    match run(cli.command, &config, &store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::warn!(error = %e, "command failed");
            eprintln!("{}", e.user_message());
            match store.invalidate_on(&e) {
                Ok(true) => {
                    eprintln!("Run `enrollctl login` to continue.");
                    ExitCode::from(3)
                }
                Ok(false) => ExitCode::FAILURE,
                Err(clear_err) => {
                    tracing::warn!("could not remove session file: {clear_err}");
                    ExitCode::from(3)
                }
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = parse_base_url(base_url)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file = path.clone();
    }
    tracing::debug!(base_url = %config.base_url, session_file = %config.session_file.display(), "configuration loaded");
    Ok(config)
}

async fn run(command: Commands, config: &ClientConfig, store: &SessionStore) -> Result<()> {
    let mut ctx = store.load()?;
    let mut client = ApiClient::new(config)?;
    app::authorize(&mut client, &ctx);

    match command {
        Commands::Login { email, password } => {
            let user = app::login(&mut client, &mut ctx, &email, &password).await?;
            println!("Logged in as {}", view::render_user(user));
            store.save(&ctx)?;
        }
        Commands::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let user = app::register(
                &mut client,
                &mut ctx,
                &name,
                &email,
                &password,
                &password_confirmation,
            )
            .await?;
            println!("Registered {}", view::render_user(user));
            store.save(&ctx)?;
        }
        Commands::Logout => {
            app::logout(&mut client, &mut ctx);
            store.save(&ctx)?;
            println!("Logged out.");
        }
        Commands::Whoami => match ctx.current_user() {
            Some(user) => println!("{}", view::render_user(user)),
            None => println!("Not logged in."),
        },
        Commands::Courses(command) => run_courses(command, &client, &ctx).await?,
        Commands::Dates { course_id } => {
            ctx.require_user()?;
            let courses = app::fetch_courses(&client).await?;
            let course = find_course(&courses, course_id)?;
            let dates = enroll::candidate_dates(course)?;
            print!("{}", view::render_dates(course, &dates));
        }
        Commands::Enroll(args) => {
            ctx.require_role(Role::Student)?;
            let courses = app::fetch_courses(&client).await?;
            let course = find_course(&courses, args.course_id)?;

            let mut form = if args.defaults {
                EnrollmentForm::with_defaults(course)
            } else {
                EnrollmentForm::new(course)
            };
            if args.date.is_some() {
                form = form.select_date(args.date);
            }
            if args.session.is_some() {
                form = form.select_session(args.session);
            }

            let enrollments = app::submit_enrollment(&client, &ctx, &form).await?;
            println!("Enrollment request submitted! Waiting for admin approval.");
            print!("{}", view::render_my_enrollments(&enrollments));
        }
        Commands::MyEnrollments => {
            let enrollments = app::my_enrollments(&client, &ctx).await?;
            print!("{}", view::render_my_enrollments(&enrollments));
        }
        Commands::Enrollments { filter } => {
            let enrollments = app::fetch_enrollments(&client, &ctx).await?;
            print!("{}", view::render_enrollment_board(&enrollments, filter));
        }
        Commands::Approve { enrollment_id } => {
            let enrollments = app::approve(&client, &ctx, enrollment_id).await?;
            println!("Enrollment {enrollment_id} approved.");
            print!(
                "{}",
                view::render_enrollment_board(&enrollments, StatusFilter::Pending)
            );
        }
        Commands::Reject { enrollment_id } => {
            let enrollments = app::reject(&client, &ctx, enrollment_id).await?;
            println!("Enrollment {enrollment_id} rejected.");
            print!(
                "{}",
                view::render_enrollment_board(&enrollments, StatusFilter::Pending)
            );
        }
        Commands::Notifications { unread, watch } => {
            if watch {
                println!(
                    "Watching notifications every {}s, Ctrl-C to stop.",
                    config.poll_interval.as_secs()
                );
                app::poll_notifications(&client, &ctx, config.poll_interval, None, |fresh| {
                    print!("{}", view::render_notifications(fresh));
                })
                .await?;
            } else {
                let notifications = app::fetch_notifications(&client, &ctx).await?;
                let shown: Vec<_> = if unread {
                    student::unread(&notifications).cloned().collect()
                } else {
                    notifications
                };
                print!("{}", view::render_notifications(&shown));
            }
        }
        Commands::Overview => {
            let overview = app::load_overview(&client, &ctx).await?;
            print!("{}", view::render_courses(&overview.courses, Role::Student));
            print!("{}", view::render_my_enrollments(&overview.enrollments));
            println!(
                "Remaining enrollment slots: {}",
                overview.summary.remaining_slots()
            );
            let unread = student::unread(&overview.notifications).count();
            println!("Unread notifications: {unread}");
        }
    }
    Ok(())
}

async fn run_courses<C: RequestApi>(
    command: CourseCommand,
    client: &C,
    ctx: &AuthContext,
) -> Result<()> {
    let role = ctx.require_user()?.role;

    let courses = match command {
        CourseCommand::List => app::fetch_courses(client).await?,
        CourseCommand::Create(args) => {
            let mut form = CourseForm::new();
            apply_course_args(&mut form, &args)?;
            let courses = app::create_course(client, ctx, &form).await?;
            println!("Course created.");
            courses
        }
        CourseCommand::Update {
            course_id,
            course,
            remove_sessions,
            set_sessions,
        } => {
            ctx.require_role(Role::Admin)?;
            let current = app::fetch_courses(client).await?;
            let mut form = CourseForm::from_course(find_course(&current, course_id)?);

            // highest position first so earlier removals don't shift later ones
            let mut positions = remove_sessions;
            positions.sort_unstable_by(|a, b| b.cmp(a));
            positions.dedup();
            for position in positions {
                form.remove_session(to_index(position)?)?;
            }
            for edit in &set_sessions {
                let (index, field, value) = parse_session_edit(edit)?;
                form.update_session(index, field, value)?;
            }
            apply_course_args(&mut form, &course)?;

            let courses = app::update_course(client, ctx, course_id, &form).await?;
            println!("Course {course_id} updated.");
            courses
        }
        CourseCommand::Delete { course_id } => {
            let courses = app::delete_course(client, ctx, course_id).await?;
            println!("Course {course_id} deleted.");
            courses
        }
    };

    print!("{}", view::render_courses(&courses, role));
    Ok(())
}

fn apply_course_args(form: &mut CourseForm, args: &CourseArgs) -> Result<()> {
    if let Some(title) = &args.title {
        form.title = title.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if let Some(schedule) = &args.schedule {
        form.schedule = schedule.clone();
    }
    if args.start_date.is_some() {
        form.start_date = args.start_date;
    }
    if args.end_date.is_some() {
        form.end_date = args.end_date;
    }

    for entry in &args.add_sessions {
        let index = form.add_session();
        let mut parts = entry.split(',');
        let fields = [
            SessionField::Status,
            SessionField::StartTime,
            SessionField::EndTime,
        ];
        for field in fields {
            match parts.next().map(str::trim) {
                Some(value) if !value.is_empty() => form.update_session(index, field, value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

/// `2:end_time=21:00:00` → (1, EndTime, "21:00:00")
fn parse_session_edit(edit: &str) -> Result<(usize, SessionField, &str)> {
    let invalid = || ErrorKind::InvalidInput(format!("expected POSITION:FIELD=VALUE, got {edit:?}"));
    let (position, rest) = edit.split_once(':').ok_or_else(invalid)?;
    let (field, value) = rest.split_once('=').ok_or_else(invalid)?;
    let position: usize = position.trim().parse().map_err(|_| invalid())?;
    let field = field.parse::<SessionField>().map_err(ErrorKind::InvalidInput)?;
    Ok((to_index(position)?, field, value.trim()))
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| ErrorKind::InvalidInput("session positions start at 1".to_string()).into())
}

fn find_course(courses: &[Course], course_id: Id) -> Result<&Course> {
    courses
        .iter()
        .find(|c| c.id == course_id)
        .ok_or_else(|| ErrorKind::NotFound(format!("course {course_id}")).into())
}
