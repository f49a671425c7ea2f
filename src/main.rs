use clap::{Args, Parser, Subcommand};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xcompile_native::analyzer::kind::{kind_table, table_mismatches};
use xcompile_native::analyzer::project::{IndexOptions, ProjectIndex};
use xcompile_native::{build_tree, to_json, TreeStats};

#[derive(Parser)]
#[command(author, version, about = "Clang AST to JSON tree", long_about = None)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one C/C++ file and print its top-level nodes as JSON
    Parse(ParseArgs),
    /// Parse every C/C++ file under a directory
    Index(IndexArgs),
    /// Print the cursor kind table
    Kinds(KindsArgs),
}

#[derive(Args, Debug)]
struct ParseArgs {
    file: PathBuf,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Compiler arguments, after `--`
    #[arg(last = true)]
    clang_args: Vec<String>,
}

#[derive(Args, Debug)]
struct IndexArgs {
    dir: PathBuf,

    /// Skip files whose path matches this pattern
    #[arg(long)]
    exclude: Option<Regex>,

    #[arg(long)]
    pretty: bool,

    /// Compiler arguments for every file, after `--`
    #[arg(last = true)]
    clang_args: Vec<String>,
}

#[derive(Args, Debug)]
struct KindsArgs {
    /// Print only the rows the loaded libclang spells differently
    #[arg(long)]
    check: bool,
}

#[derive(Serialize)]
struct ErrorOut {
    error: String,
}

fn fail(message: String) -> ! {
    // keep stdout JSON even on failure
    let out = ErrorOut { error: message };
    println!(
        "{}",
        serde_json::to_string(&out).unwrap_or_else(|_| r#"{"error":"unknown"}"#.to_string())
    );
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    match cli.command {
        Commands::Parse(args) => {
            let tree = build_tree(&args.file, &args.clang_args).unwrap_or_else(|e| fail(e.to_string()));
            let stats = TreeStats::of(&tree);
            tracing::debug!("{} nodes, depth {}", stats.nodes, stats.max_depth);
            let json = to_json(&tree, args.pretty).unwrap_or_else(|e| fail(e.to_string()));
            println!("{}", json);
        }
        Commands::Index(args) => {
            let options = IndexOptions {
                compile_args: args.clang_args,
                exclude: args.exclude,
                ..Default::default()
            };
            let index = ProjectIndex::index_project(&args.dir.to_string_lossy(), &options);
            let json = index.to_json(args.pretty).unwrap_or_else(|e| fail(e.to_string()));
            println!("{}", json);
        }
        Commands::Kinds(args) => {
            let json = if args.check {
                serde_json::to_string_pretty(&table_mismatches())
            } else {
                serde_json::to_string_pretty(kind_table())
            };
            println!("{}", json.unwrap_or_else(|e| fail(e.to_string())));
        }
    }
}
