//! CLI entry point for snapcat

use std::error::Error as _;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use snapcat::config::{parse_file_size, parse_timeout};
use snapcat::help::{CAT_EXAMPLES, EXAMPLES, TREE_EXAMPLES, docs_text, info_text};
use snapcat::{CatOptions, CommonOptions, OutputFormat, SnapcatError, TreeOptions, logging};

#[derive(Parser, Debug)]
#[command(name = "snapcat")]
#[command(about = "Fast tree & cat snapshots of files, with hashes and metadata as JSON or Markdown")]
#[command(version)]
#[command(after_help = EXAMPLES)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a hierarchical tree of files and directories
    #[command(after_help = TREE_EXAMPLES)]
    Tree(TreeArgs),

    /// Read files matching glob patterns and output their metadata
    #[command(after_help = CAT_EXAMPLES)]
    Cat(CatArgs),

    /// Display documentation (readme, license, contributing, tutorial)
    Docs {
        /// Documentation topic
        topic: Option<String>,
    },

    /// Display version, features and quick start
    Info,
}

#[derive(Args, Debug)]
struct SharedArgs {
    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    format: OutputFormat,

    /// Save output to FILE instead of printing it
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Additional ignore patterns (space separated)
    #[arg(long = "ignore", value_name = "PATTERNS", num_args = 1..)]
    ignore: Vec<String>,

    /// Include file contents in the output
    #[arg(short = 'p', long = "preview")]
    preview: bool,

    /// Log a run summary and cache statistics
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Debug logging; also disables the metadata cache
    #[arg(long = "debug")]
    debug: bool,

    /// Disable the metadata cache
    #[arg(long = "no-cache")]
    no_cache: bool,

    /// Largest file to preview (default: 5M). Use suffixes: K, M, G
    #[arg(long = "max-size", value_name = "SIZE", value_parser = parse_file_size)]
    max_size: Option<u64>,

    /// Number of worker threads (0 = auto-detect)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,
}

impl SharedArgs {
    fn into_options(self) -> CommonOptions {
        CommonOptions {
            format: self.format,
            output: self.output,
            ignore: self.ignore,
            preview: self.preview,
            verbose: self.verbose,
            debug: self.debug,
            no_cache: self.no_cache,
            max_size: self.max_size,
            jobs: self.jobs,
        }
    }
}

#[derive(Args, Debug)]
struct TreeArgs {
    /// Directory to snapshot
    #[arg(default_value = ".")]
    target: PathBuf,

    /// Recurse into subdirectories (default)
    #[arg(short = 'r', long = "recursive", overrides_with = "no_recursive")]
    recursive: bool,

    /// Only list the target directory itself
    #[arg(long = "no-recursive", overrides_with = "recursive")]
    no_recursive: bool,

    /// Maximum depth for recursion (0-100)
    #[arg(short = 'd', long = "depth", value_name = "N", allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Include hidden files and directories
    #[arg(long = "show-hidden")]
    show_hidden: bool,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Args, Debug)]
struct CatArgs {
    /// Glob patterns, e.g. "*.ts" "src/**/*.{rs,toml}"
    #[arg(required = true, value_name = "PATTERNS")]
    patterns: Vec<String>,

    /// Processing timeout: milliseconds, or a duration like 30s
    #[arg(long = "timeout", value_name = "MS", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    #[command(flatten)]
    shared: SharedArgs,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => handle_parse_error(e),
    };

    let Some(command) = cli.command else {
        // No arguments: show help and succeed
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("snapcat: cannot determine current directory: {}", e);
        process::exit(1);
    });

    let (result, debug) = match command {
        Command::Tree(args) => {
            let shared = args.shared.into_options();
            init_logging(&shared);
            let options = TreeOptions {
                target: args.target,
                recursive: args.recursive || !args.no_recursive,
                depth: args.depth,
                show_hidden: args.show_hidden,
                common: shared,
            };
            (snapcat::run_tree(&options, &cwd), options.common.debug)
        }
        Command::Cat(args) => {
            let shared = args.shared.into_options();
            init_logging(&shared);
            let options = CatOptions {
                patterns: args.patterns,
                timeout: args.timeout,
                common: shared,
            };
            (snapcat::run_cat(&options, &cwd), options.common.debug)
        }
        Command::Docs { topic } => {
            println!("{}", docs_text(topic.as_deref()));
            return;
        }
        Command::Info => {
            println!("{}", info_text());
            return;
        }
    };

    if let Err(e) = result {
        report_error(&e, debug);
        process::exit(1);
    }
}

fn init_logging(options: &CommonOptions) {
    if let Err(e) = logging::init(options.debug, options.verbose) {
        eprintln!("snapcat: failed to initialise logging: {}", e);
    }
}

fn report_error(err: &SnapcatError, debug: bool) {
    eprintln!("snapcat: {}", err);
    if debug {
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        eprintln!("  debug: {:?}", err);
    }
}

fn handle_parse_error(err: clap::Error) -> ! {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = err.print();
            process::exit(0);
        }
        ErrorKind::InvalidSubcommand => {
            let _ = err.print();
            eprintln!("\nAvailable commands:");
            for sub in Cli::command().get_subcommands() {
                let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
                eprintln!("  {:<6} - {}", sub.get_name(), about);
            }
            eprintln!("\nUse \"snapcat --help\" for complete usage information");
            process::exit(1);
        }
        _ => {
            let _ = err.print();
            process::exit(1);
        }
    }
}
