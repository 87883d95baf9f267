//! Main CLI application

use crate::error::Result;
use crate::runner::{Context, Package, TaskRunner, Verbosity, DEFAULT_TASK};
use crate::tools::{ToolRegistry, Toolchain};
use crate::ui;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Exit status after printing `--help`
pub const EXIT_HELP: i32 = 1;

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub task: String,
    pub file: Option<PathBuf>,
    pub overlays: Vec<String>,
    pub toolchain: Option<PathBuf>,
    pub verbosity: Verbosity,
    pub help: bool,
}

impl Args {
    fn from_matches(matches: &ArgMatches) -> Self {
        Args {
            task: matches
                .get_one::<String>("task")
                .cloned()
                .unwrap_or_else(|| DEFAULT_TASK.to_string()),
            file: matches.get_one::<PathBuf>("file").cloned(),
            overlays: matches
                .get_many::<String>("use-overlay")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            toolchain: matches.get_one::<PathBuf>("toolchain").cloned(),
            verbosity: get_verbosity(matches),
            help: matches.get_flag("help"),
        }
    }
}

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
}

impl App {
    pub fn new() -> Self {
        App {
            command: build_command(),
        }
    }

    /// Parse the process arguments; exits on malformed input
    pub fn parse(&self) -> Args {
        Args::from_matches(&self.command.clone().get_matches())
    }

    pub fn try_parse_from<I, T>(&self, args: I) -> std::result::Result<Args, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(args)?;
        Ok(Args::from_matches(&matches))
    }

    /// Run with parsed arguments and return the process exit status
    pub fn run(mut self, args: Args) -> Result<i32> {
        init_logging(args.verbosity);

        if args.help {
            self.print_help(&args);
            return Ok(EXIT_HELP);
        }

        let package = load_package(&args)?;
        let toolchain = args
            .toolchain
            .as_deref()
            .map(Toolchain::from_root)
            .unwrap_or_default();

        let mut ctx = Context::new()
            .with_working_dir(package.root.clone())
            .with_verbosity(args.verbosity);

        ctx.print_info(&format!("Building package {}...", package.name));
        TaskRunner::new(ToolRegistry::standard(&toolchain)).run(&package, &args.task, &mut ctx)?;
        ctx.print_info(&format!("Built package {}.", package.name));

        Ok(0)
    }

    /// Usage followed by the package's tasks, if a package can be loaded
    fn print_help(&mut self, args: &Args) {
        println!("{}", ui::banner("atbuild", crate::VERSION));
        println!("{}", self.command.render_help());

        match load_package(args) {
            Ok(package) => {
                println!("Tasks in {}:", package.name);
                for name in package.task_names() {
                    println!("  {}", name);
                }
            }
            Err(e) => println!("{}", ui::error(&e.to_string())),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn load_package(args: &Args) -> Result<Package> {
    match &args.file {
        Some(path) => Package::load(path, &args.overlays),
        None => Package::discover(&args.overlays),
    }
}

/// Build the clap command
fn build_command() -> Command {
    Command::new("atbuild")
        .version(crate::VERSION)
        .about("Package-driven build orchestrator")
        .disable_help_flag(true)
        .arg(
            Arg::new("task")
                .value_name("TASK")
                .help("Task to run (defaults to 'default')"),
        )
        .arg(
            Arg::new("help")
                .long("help")
                .help("Print usage and the package's tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to atbuild.yml"),
        )
        .arg(
            Arg::new("use-overlay")
                .long("use-overlay")
                .value_name("OVERLAY")
                .action(ArgAction::Append)
                .help("Apply a configuration overlay (repeatable)"),
        )
        .arg(
            Arg::new("toolchain")
                .long("toolchain")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Toolchain root containing usr/bin/swiftc"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn init_logging(verbosity: Verbosity) {
    let level = if verbosity >= Verbosity::Verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<i32> {
    let app = App::new();
    let args = app.parse();
    app.run(args)
}
