//! CLI for byline - Resolve article authors and format their citations.

use std::fmt;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use byline::{
    generate_bibliography, generate_output, parse_catalog, process_catalog, resolve,
    style::builtin_style_descriptions, summary_line, JournalConfig, MatchOutcome, RawAuthorInput,
    RosterIndex, RosterSource, StructuredAuthor,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Resolve article authors against the contributor roster and format citations
#[derive(Parser)]
#[command(name = "byline")]
#[command(version)]
#[command(after_help = "\
Examples:
  byline process articles.json -o report.json
  byline process articles.json --roster team.json --bib articles.bib
  byline resolve \"Juan Pérez2\" --roster team.json
  byline styles")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Journal configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RosterArgs {
    /// Roster location: URL or local JSON/JSONL file (default: from config)
    #[arg(short, long)]
    roster: Option<String>,

    /// Don't load the roster; every author renders unlinked
    #[arg(long, conflicts_with = "roster")]
    no_roster: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an article catalog into per-article author and citation reports
    #[command(after_help = "\
Examples:
  byline process articles.json
  byline process articles.json --roster https://example.org/team/Team.json -o report.json
  byline process - --no-roster < articles.json")]
    Process {
        /// Article catalog (JSON array or JSONL; use '-' for stdin)
        catalog: PathBuf,

        #[command(flatten)]
        roster: RosterArgs,

        /// Output file for the JSON report (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write every BibTeX record to this file
        #[arg(long)]
        bib: Option<PathBuf>,
    },

    /// Resolve a single author name against the roster
    Resolve {
        /// Author name as written on the article
        name: Option<String>,

        /// Roster uid recorded for this author
        #[arg(long)]
        id: Option<String>,

        /// Given name, for structured lookups
        #[arg(long)]
        first_name: Option<String>,

        /// Family name, for structured lookups
        #[arg(long)]
        last_name: Option<String>,

        /// Author slug, tried after the exact name (requires a name)
        #[arg(long)]
        slug: Option<String>,

        #[command(flatten)]
        roster: RosterArgs,
    },

    /// List supported citation styles
    Styles,
}

// ---------------------------------------------------------------------------
// AppError: semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10: catalog not found / unreadable / invalid
    Catalog(String),
    /// Exit 11: configuration file not found / invalid
    Config(String),
    /// Exit 12: nothing to resolve
    Usage(String),
    /// Exit 15: cannot write output file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Catalog(_) => 10,
            AppError::Config(_) => 11,
            AppError::Usage(_) => 12,
            AppError::OutputFile(_) => 15,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Catalog(msg) => write!(
                f,
                "{}\n  hint: the catalog must be a JSON array of articles, or JSONL (one article per line)",
                msg
            ),
            AppError::Config(msg) => write!(
                f,
                "{}\n  hint: the configuration is a TOML file with keys journal_name, issn, domain, roster_url",
                msg
            ),
            AppError::Usage(msg) => write!(f, "{}", msg),
            AppError::OutputFile(msg) => write!(
                f,
                "{}\n  hint: check that the output directory exists and is writable",
                msg
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// Logs go to stderr so the report on stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = JournalConfig::load_or_default(cli.config.as_deref()).map_err(|e| {
        let path = cli.config.as_deref().unwrap_or(Path::new(""));
        AppError::Config(format!("'{}': {}", path.display(), e))
    })?;

    match cli.command {
        Commands::Process {
            catalog,
            roster,
            output,
            bib,
        } => {
            process_command(&config, &catalog, &roster, output.as_deref(), bib.as_deref()).await?;
        }
        Commands::Resolve {
            name,
            id,
            first_name,
            last_name,
            slug,
            roster,
        } => {
            let author = match (name, first_name, last_name, slug) {
                (Some(name), None, None, None) => RawAuthorInput::StringName(name),
                (name, first_name, last_name, slug) => RawAuthorInput::Structured(StructuredAuthor {
                    name,
                    first_name,
                    last_name,
                    slug,
                    ..Default::default()
                }),
            };
            resolve_command(&config, &author, id.as_deref(), &roster).await?;
        }
        Commands::Styles => {
            styles_command();
        }
    }

    Ok(())
}

fn roster_source(config: &JournalConfig, args: &RosterArgs) -> RosterSource {
    if args.no_roster {
        return RosterSource::Disabled;
    }
    match &args.roster {
        Some(location) => RosterSource::parse(location),
        None => RosterSource::parse(&config.roster_location()),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Process the article catalog.
async fn process_command(
    config: &JournalConfig,
    catalog: &Path,
    roster: &RosterArgs,
    output: Option<&Path>,
    bib: Option<&Path>,
) -> Result<(), AppError> {
    // 1. Read and parse the catalog; any failure here ends the run
    let content = if catalog == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::Catalog(format!("failed to read from stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(catalog)
            .map_err(|e| AppError::Catalog(format!("'{}': {}", catalog.display(), e)))?
    };
    let articles = parse_catalog(&content)
        .map_err(|e| AppError::Catalog(format!("'{}': {}", catalog.display(), e)))?;
    tracing::info!("{} article(s) loaded", articles.len());

    // 2. Load the roster; failures degrade to an empty index
    let source = roster_source(config, roster);
    let index = RosterIndex::load_or_empty(&source, config.roster_timeout()).await;

    // 3. Resolve and format every article
    let reports = process_catalog(&articles, &index, config);

    // 4. Write the report
    let report_json = generate_output(&reports)
        .map_err(|e| AppError::OutputFile(format!("failed to serialize report: {}", e)))?;

    if let Some(bib_path) = bib {
        fs::write(bib_path, generate_bibliography(&reports))
            .map_err(|e| AppError::OutputFile(format!("'{}': {}", bib_path.display(), e)))?;
    }

    if let Some(output_path) = output {
        fs::write(output_path, format!("{}\n", report_json))
            .map_err(|e| AppError::OutputFile(format!("'{}': {}", output_path.display(), e)))?;
        eprintln!("{}, wrote {}", summary_line(&reports), output_path.display());
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", report_json)
            .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))?;
        eprintln!("{}", summary_line(&reports));
    }

    Ok(())
}

/// Resolve one author and print the outcome.
async fn resolve_command(
    config: &JournalConfig,
    author: &RawAuthorInput,
    id: Option<&str>,
    roster: &RosterArgs,
) -> Result<(), AppError> {
    // the cascade needs a display name; a slug alone never matches
    let display_name = author.display_name();
    if display_name.trim().is_empty() {
        return Err(AppError::Usage(
            "nothing to resolve: give a name or --first-name/--last-name (--slug only refines a name)"
                .to_string(),
        ));
    }

    let source = roster_source(config, roster);
    let index = RosterIndex::load_or_empty(&source, config.roster_timeout()).await;

    match resolve(&index, author, id) {
        MatchOutcome::Resolved { author: member, strategy } => {
            println!("{} -> {} [{}]", display_name, member.display_name, strategy);
            if let Some(uid) = &member.uid {
                println!("  uid:   {}", uid);
            }
            if let Some(slug) = &member.slug {
                println!("  slug:  {}", slug);
            }
            if let Some(orcid) = &member.orcid {
                println!("  orcid: {}", orcid);
            }
            if let Some(email) = &member.email {
                println!("  email: {}", email);
            }
        }
        MatchOutcome::Unresolved => {
            println!("{} -> unresolved", display_name);
        }
    }

    Ok(())
}

/// List supported citation styles.
fn styles_command() {
    for (name, description) in builtin_style_descriptions() {
        println!("{:<8} {}", name, description);
    }
}
