use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use miette::{IntoDiagnostic, Result};

use devkin_affinity::ranking::analyze;
use devkin_affinity::similarity::Similarity;
use devkin_core::{CommitRecord, CommitWindow, DevkinConfig, DevkinError, OutputFormat};

#[derive(Parser)]
#[command(
    name = "devkin",
    version,
    about = "Find the most similar pairs of contributors in a repository",
    long_about = "devkin compares the files contributors touch across a window of recent\n\
                   commits and reports the pairs whose activity overlaps the most.\n\n\
                   Commits come from the GitHub API (pass owner/name or a URL) or from a\n\
                   local clone (pass --path).\n\n\
                   Examples:\n  \
                     devkin rust-lang/rust               Top 5 pairs, harmonic mean\n  \
                     devkin --path . -c -1               Local repo, all commits\n  \
                     devkin octocat/hello-world -f intersection -n 10\n  \
                     devkin tokio-rs/tokio --format json"
)]
struct Cli {
    /// GitHub repository to analyze (owner/name or URL)
    repo: Option<String>,

    /// Analyze a local repository at this path instead of GitHub
    #[arg(long, conflicts_with = "repo", value_name = "DIR")]
    path: Option<PathBuf>,

    /// Similarity function to use (default: harmonic)
    #[arg(
        short,
        long,
        long_help = "Similarity function to use.\n\n\
                       Functions:\n  \
                         intersection  Sum of min(freq1, freq2) over shared files\n  \
                         geometric     Sum of sqrt(freq1 * freq2) over shared files\n  \
                         harmonic      Sum of harmonic means over shared files (default)"
    )]
    function: Option<Similarity>,

    /// Number of pairs of contributors to show (default: 5)
    #[arg(short, long)]
    number: Option<i64>,

    /// Number of latest commits to consider, or -1 for all (default: 100)
    #[arg(short, long, allow_hyphen_values = true)]
    commits: Option<i64>,

    /// GitHub token (default: GITHUB_TOKEN or GH_TOKEN env var)
    #[arg(short, long)]
    token: Option<String>,

    /// Path to configuration file (default: .devkin.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        default_value = "text",
        long_help = "Output format for the report.\n\n\
                       Formats:\n  \
                         text      Aligned table, one pair per line (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Generate shell completion scripts
    #[arg(long, hide = true, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "devkin", &mut std::io::stdout());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => DevkinConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".devkin.toml");
            if default_path.exists() {
                DevkinConfig::from_file(default_path).into_diagnostic()?
            } else {
                DevkinConfig::default()
            }
        }
    };

    // CLI flags override the config file; reject bad values before any work
    let mut merged = config.clone();
    if let Some(n) = cli.number {
        merged.analysis.results = n;
    }
    if let Some(c) = cli.commits {
        merged.analysis.commits = c;
    }
    merged.validate().into_diagnostic()?;

    let function: Similarity = match cli.function {
        Some(f) => f,
        None => merged
            .analysis
            .function
            .parse()
            .map_err(DevkinError::Config)
            .into_diagnostic()?,
    };
    let results = merged.analysis.results as usize;
    let window = CommitWindow::from_raw(merged.analysis.commits).into_diagnostic()?;

    if cli.verbose {
        eprintln!("function: {function} | results: {results} | window: {window}");
    }

    let commits: Vec<CommitRecord> = if let Some(path) = &cli.path {
        eprintln!("Mining git history at {} ...", path.display());
        devkin_git::mine_commits(path, window).into_diagnostic()?
    } else if let Some(reference) = &cli.repo {
        let repo = devkin_github::parse_repo_reference(reference).into_diagnostic()?;
        let token = cli.token.clone().or_else(|| merged.github.token.clone());
        let client = devkin_github::GitHubClient::new(token.as_deref()).into_diagnostic()?;

        eprintln!("Listing commits of {repo} ...");
        let summaries = client.list_commits(&repo, window).await.into_diagnostic()?;

        let pb = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new(summaries.len() as u64);
            pb.set_style(
                indicatif::ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap(),
            );
            pb.set_message("downloading commit info");
            pb
        } else {
            indicatif::ProgressBar::hidden()
        };

        let mut commits = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let files = client
                .commit_files(&repo, &summary.sha)
                .await
                .inspect_err(|_| pb.finish_and_clear())
                .into_diagnostic()?;
            commits.push(CommitRecord {
                author: summary.author,
                files,
            });
            pb.inc(1);
        }
        pb.finish_and_clear();
        commits
    } else {
        miette::bail!(miette::miette!(
            help = "Pass a GitHub repository (owner/name or URL), or --path to a local clone",
            "No repository given"
        ));
    };

    let report = analyze(&commits, function, results);

    eprintln!(
        "Analyzed {} commits from {} contributors.",
        report.commits_analyzed, report.contributors,
    );
    if report.is_insufficient() {
        eprintln!("Fewer than 2 contributors in the window; no pairs to rank.");
    }

    match cli.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            print!("{}", report.to_markdown());
        }
        OutputFormat::Text => {
            print!("{report}");
        }
    }

    Ok(())
}
