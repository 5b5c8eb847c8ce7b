use anyhow::Context;
use clap::{Parser, Subcommand};
use coursereg::{Course, CourseClient, RegistrationForm};
use coursereg_core::KNOWN_SESSIONS;

// cargo run --bin course-client -- load Automne
// cargo run --bin course-client -- register --first-name Ada --last-name L --email a@b.c \
//     --matricule 123456 --course-code IFT1015 --session Automne

#[derive(Debug, Parser)]
#[command(name = "course-client", version, about = "Query the course catalog and submit registrations")]
struct Args {
    /// Server address
    #[arg(long, env = "COURSEREG_ADDR", default_value = "127.0.0.1:6000")]
    addr: String,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List the courses offered in a session (eg: "Automne", "Hiver", "Ete")
    Load { session: String },

    /// Register for a course
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        matricule: String,
        #[arg(long)]
        course_code: String,
        #[arg(long)]
        session: String,
        /// Optional, the server only records code and session
        #[arg(long, default_value = "")]
        course_title: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = CourseClient::new(args.addr);

    match args.action {
        Action::Load { session } => {
            if !KNOWN_SESSIONS.contains(&session.as_str()) {
                eprintln!("note: '{}' is not one of {:?}", session, KNOWN_SESSIONS);
            }

            let courses = client
                .load_courses(&session)
                .await
                .with_context(|| format!("failed to load courses for session '{}'", session))?;

            println!("Courses offered in session {}:", session);
            for course in courses {
                println!("  {}\t{}", course.code, course.title);
            }
        }
        Action::Register {
            first_name,
            last_name,
            email,
            matricule,
            course_code,
            session,
            course_title,
        } => {
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                matricule,
                course: Course::new(course_code, course_title, session),
            };
            form.check().context("invalid registration form")?;

            let message = client.register(&form).await.context("registration failed")?;
            println!("{}", message);
        }
    }

    Ok(())
}
