use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use protocol_parts::heuristics::{collect_insights, HeuristicsConfig};
use protocol_parts::io::{FetchConfig, ProtocolFetcher};
use protocol_parts::models::Roster;
use protocol_parts::{
    read_heuristics_file, read_protocol_file, read_roster_file, render_parts, RenderConfig,
    Segmenter,
};

#[derive(Parser)]
#[command(name = "protocol-parts")]
#[command(author, version, about = "Committee protocol segmentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a protocol into headered, speaker-attributed parts
    Segment {
        /// Input protocol text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for machine-readable parts (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for human-readable parts (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        #[command(flatten)]
        roster: RosterArgs,

        /// Heuristics rules file (JSON)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Meeting id recorded in the output
        #[arg(long)]
        meeting_id: Option<u64>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report headers, speakers, attendance and votes without writing output
    Analyze {
        /// Input protocol text file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        roster: RosterArgs,

        /// Heuristics rules file (JSON)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Download a protocol text
    Fetch {
        /// URL of the protocol text
        #[arg(short, long)]
        url: String,

        /// File to save the text to
        #[arg(short, long)]
        output: PathBuf,

        /// Request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(clap::Args)]
struct RosterArgs {
    /// Roster file (JSON array of {person_id, name, aliases})
    #[arg(long, conflicts_with = "names")]
    roster: Option<PathBuf>,

    /// Comma-separated list of known speaker names
    #[arg(long)]
    names: Option<String>,
}

impl RosterArgs {
    fn load(&self) -> Result<Option<Roster>> {
        if let Some(path) = &self.roster {
            info!("Loading roster from {:?}", path);
            return read_roster_file(path).map(Some);
        }
        Ok(self.names.as_deref().map(Roster::from_names_string))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Segment {
            input,
            output,
            human_readable,
            roster,
            rules,
            meeting_id,
            verbose,
        } => {
            setup_logging(verbose);
            segment_file(
                &input,
                &output,
                human_readable.as_deref(),
                &roster,
                rules.as_deref(),
                meeting_id,
            )
        }
        Commands::Analyze {
            input,
            roster,
            rules,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_file(&input, &roster, rules.as_deref())
        }
        Commands::Fetch {
            url,
            output,
            timeout_secs,
            verbose,
        } => {
            setup_logging(verbose);
            fetch_protocol(&url, &output, timeout_secs).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(rules: Option<&Path>) -> Result<HeuristicsConfig> {
    match rules {
        Some(path) => {
            info!("Loading heuristics rules from {:?}", path);
            read_heuristics_file(path)
        }
        None => Ok(HeuristicsConfig::default()),
    }
}

fn segment_file(
    input: &Path,
    output: &Path,
    human_readable: Option<&Path>,
    roster_args: &RosterArgs,
    rules: Option<&Path>,
    meeting_id: Option<u64>,
) -> Result<()> {
    info!("Loading protocol from {:?}", input);
    let text = read_protocol_file(input).context("Failed to load input protocol")?;
    let config = load_config(rules)?;
    let roster = roster_args.load()?;

    let segmenter =
        Segmenter::from_config(&config, roster.as_ref()).context("Invalid header rules")?;
    let result = segmenter.segment(&text);

    let render = render_parts(
        &result.parts,
        meeting_id,
        Some(output),
        human_readable,
        &RenderConfig::default(),
    )?;

    if let Some(path) = render.machine_path {
        info!("Parts written to {:?}", path);
    }
    if let Some(path) = render.human_path {
        info!("Human-readable parts written to {:?}", path);
    }

    info!(
        "Complete: {} parts, {} attributed",
        result.parts.len(),
        result.attributed_parts
    );

    Ok(())
}

fn analyze_file(input: &Path, roster_args: &RosterArgs, rules: Option<&Path>) -> Result<()> {
    info!("Analyzing protocol from {:?}", input);
    let text = read_protocol_file(input).context("Failed to load input protocol")?;
    let config = load_config(rules)?;
    let roster = roster_args.load()?.unwrap_or_default();

    let segmenter = Segmenter::from_config(&config, Some(&roster)).context("Invalid header rules")?;
    let result = segmenter.segment(&text);
    let insights = collect_insights(&text, &result.parts, &roster, &config);

    println!("Protocol Analysis");
    println!("=================");
    println!("Lines: {}", text.lines().count());
    println!("Parts: {}", result.parts.len());
    println!("Parts with headers: {}", result.header_parts);
    println!("Attributed parts: {}", result.attributed_parts);
    println!();

    println!("Speakers");
    println!("--------");
    for entry in &roster.entries {
        let spoken: Vec<_> = result
            .parts
            .iter()
            .filter(|p| p.speaker.as_ref().is_some_and(|s| s.person_id == entry.person_id))
            .collect();
        if !spoken.is_empty() {
            let chars: usize = spoken.iter().map(|p| p.body.chars().count()).sum();
            println!(
                "{} ({}): {} parts, {} chars",
                entry.name,
                entry.person_id,
                spoken.len(),
                chars
            );
        }
    }
    let unattributed: Vec<&str> = result
        .parts
        .iter()
        .filter(|p| p.has_header() && p.speaker.is_none())
        .map(|p| p.header.as_str())
        .collect();
    for header in &unattributed {
        debug!("Unattributed header: {}", header);
    }
    println!("Unattributed headers: {}", unattributed.len());
    println!();

    println!("Attendance");
    println!("----------");
    for person_id in &insights.attended {
        if let Some(entry) = roster.get(*person_id) {
            println!("{} ({})", entry.name, person_id);
        }
    }
    println!("Members present: {}", insights.attended.len());
    println!();

    println!("Plenum");
    println!("------");
    match insights.plenum_meeting_number {
        Some(number) => println!("Session number: {}", number),
        None => println!("Session number: not found"),
    }
    for vote in &insights.votes {
        println!("Vote {} in part {}", vote.vote_number, vote.order);
    }

    Ok(())
}

async fn fetch_protocol(url: &str, output: &Path, timeout_secs: u64) -> Result<()> {
    let config = FetchConfig {
        timeout: std::time::Duration::from_secs(timeout_secs),
        ..Default::default()
    };
    let fetcher = ProtocolFetcher::new(&config)?;
    let text = fetcher.fetch_text(url).await?;

    std::fs::write(output, &text).with_context(|| format!("Failed to write file: {:?}", output))?;
    info!("Protocol saved to {:?} ({} lines)", output, text.lines().count());

    Ok(())
}
