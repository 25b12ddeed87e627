//! classtest CLI: take tests as a student, review and grade as a teacher.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "classtest", version, about = "Classroom test taking and grading")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and sample catalog
    Init,

    /// Validate catalog TOML files
    Validate {
        /// Catalog file or directory (defaults to the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List available tests grouped by grade and subject
    Tests,

    /// Check that a test can be taken and show its questions
    Start {
        /// Student name
        #[arg(long)]
        student: String,

        /// Test variant ID
        #[arg(long)]
        variant: String,
    },

    /// Submit answers for a test
    Submit {
        /// Student name
        #[arg(long)]
        student: String,

        /// Test variant ID
        #[arg(long)]
        variant: String,

        /// Answer as QUESTION_ID=TEXT (repeat for each question)
        #[arg(long = "answer", value_parser = commands::student::parse_answer)]
        answers: Vec<(u32, String)>,
    },

    /// Show a student's own submissions
    Status {
        /// Student name
        #[arg(long)]
        student: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List submissions waiting for a score
    Pending {
        /// Teacher name
        #[arg(long)]
        teacher: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List graded submissions
    Graded {
        /// Teacher name
        #[arg(long)]
        teacher: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show a submission next to the expected answers
    Review {
        /// Teacher name
        #[arg(long)]
        teacher: String,

        /// Student name
        #[arg(long)]
        student: String,

        /// Test variant ID
        #[arg(long)]
        variant: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Score a submission
    Grade {
        /// Teacher name
        #[arg(long)]
        teacher: String,

        /// Student name
        #[arg(long)]
        student: String,

        /// Test variant ID
        #[arg(long)]
        variant: String,

        /// Score (below 45 allows a retake automatically)
        #[arg(long, allow_negative_numbers = true)]
        score: i32,
    },

    /// Allow a student to take a test again
    Retake {
        /// Teacher name
        #[arg(long)]
        teacher: String,

        /// Student name
        #[arg(long)]
        student: String,

        /// Test variant ID
        #[arg(long)]
        variant: String,
    },

    /// Per-student statistics
    Stats {
        /// Teacher name
        #[arg(long)]
        teacher: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("classtest=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { catalog } => commands::validate::execute(config, catalog),
        Commands::Tests => commands::tests::execute(config),
        Commands::Start { student, variant } => {
            commands::student::start(config, &student, &variant)
        }
        Commands::Submit {
            student,
            variant,
            answers,
        } => commands::student::submit(config, &student, &variant, answers),
        Commands::Status { student, format } => {
            commands::student::status(config, &student, &format)
        }
        Commands::Pending { teacher, format } => {
            commands::teacher::pending(config, &teacher, &format)
        }
        Commands::Graded { teacher, format } => {
            commands::teacher::graded(config, &teacher, &format)
        }
        Commands::Review {
            teacher,
            student,
            variant,
            format,
        } => commands::teacher::review(config, &teacher, &student, &variant, &format),
        Commands::Grade {
            teacher,
            student,
            variant,
            score,
        } => commands::teacher::grade(config, &teacher, &student, &variant, score),
        Commands::Retake {
            teacher,
            student,
            variant,
        } => commands::teacher::retake(config, &teacher, &student, &variant),
        Commands::Stats { teacher, format } => {
            commands::teacher::stats(config, &teacher, &format)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
