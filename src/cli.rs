use crate::config::{Config, DEFAULT_DAYS};
use crate::error::GhstatsError;
use crate::github::{fetch_all, GitHubClient, DEFAULT_API_URL};
use crate::model::{DateWindow, StatsReport};
use crate::output::{format_output, write_output, OutputFormat, SeriesColors};
use crate::stats::{filter_repositories, process_stats};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "ghstats")]
#[command(about = "Fetch and visualize GitHub commit statistics across your repositories")]
#[command(version)]
pub struct Cli {
    #[arg(
        short,
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub personal access token (prefer the GITHUB_TOKEN env var)"
    )]
    pub token: Option<String>,

    #[arg(short, long, help = "Number of days to analyze [default: 30]")]
    pub days: Option<u32>,

    #[arg(short, long, help = "Start date (YYYY-MM-DD)")]
    pub since: Option<String>,

    #[arg(short, long, help = "End date (YYYY-MM-DD)")]
    pub until: Option<String>,

    #[arg(short, long, value_enum, help = "Output format [default: graph]")]
    pub output: Option<OutputFormat>,

    #[arg(short, long, help = "Save output to file instead of stdout")]
    pub file: Option<PathBuf>,

    #[arg(short, long, help = "Filter repositories (regex or glob pattern)")]
    pub repos: Option<String>,

    #[arg(short, long, help = "Exclude repositories (regex or glob pattern)")]
    pub exclude: Option<String>,

    #[arg(short, long, help = "Filter by branch (default: all branches)")]
    pub branch: Option<String>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, env = "GHSTATS_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub async fn execute(self) -> Result<()> {
        let config = Config::load();
        config.validate().context("Invalid configuration")?;

        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GhstatsError::MissingToken)?;

        let days = self.days.or(config.default_days).unwrap_or(DEFAULT_DAYS);
        let window = DateWindow::resolve(
            self.since.as_deref(),
            self.until.as_deref(),
            days,
            Utc::now().date_naive(),
        )?;
        info!("Date range: {} to {}", window.start, window.end);

        let client = GitHubClient::with_base_url(token, &self.api_url)?;

        let spinner = spinner(self.verbose);
        spinner.set_message("Validating GitHub token...");
        let username = client.validate_credential().await?;
        info!("Authenticated as {username}");

        spinner.set_message("Fetching repositories...");
        let all_repos = client
            .list_repositories(&spinner)
            .await
            .context("Failed to fetch repositories")?;
        spinner.finish_and_clear();
        info!("Fetched {} repositories", all_repos.len());

        let include = self.repos.clone().or_else(|| config.include_pattern());
        let exclude = self.exclude.clone().or_else(|| config.exclude_pattern());
        let repos = filter_repositories(&all_repos, include.as_deref(), exclude.as_deref())?;

        if repos.is_empty() {
            eprintln!(
                "{}",
                style("Warning: No repositories match the filter criteria").yellow()
            );
            return Ok(());
        }
        info!("Analyzing {} repositories...", repos.len());

        let branch = self.branch.clone().or_else(|| config.branch.clone());
        let progress = repo_progress(self.verbose, repos.len());
        let commits = fetch_all(&client, &repos, &window, branch.as_deref(), &progress).await;

        let rate = client.rate_limit_info();
        debug!(remaining = rate.remaining, reset = rate.reset, "rate limit after fetch");

        let report = process_stats(&commits, &username, &window);
        if report.is_empty() {
            print_no_commits(&report);
            return Ok(());
        }

        let format = self
            .output
            .or_else(|| config.output_format())
            .unwrap_or_default();
        let colors = SeriesColors::from_scheme(&config.color_scheme);

        match &self.file {
            Some(path) => {
                let colored = console::colors_enabled();
                console::set_colors_enabled(false);
                let rendered = format_output(&report, format, &colors);
                console::set_colors_enabled(colored);

                write_output(&rendered?, path)
                    .with_context(|| format!("Failed to write output to {}", path.display()))?;
                println!(
                    "{}",
                    style(format!("✓ Output written to {}", path.display())).green()
                );
            }
            None => println!("{}", format_output(&report, format, &colors)?),
        }

        Ok(())
    }
}

fn print_no_commits(report: &StatsReport) {
    println!("{}", style("No commits found for the specified period").yellow());
    println!("User: {}", report.user);
    println!("Period: {} to {}", report.period.start, report.period.end);
    println!("\nTry:");
    println!("  - Expanding the date range with --days or --since/--until");
    println!("  - Checking if repositories have commits in this period");
    println!("  - Verifying your GitHub username");
}

fn spinner(verbose: bool) -> ProgressBar {
    if !verbose {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn repo_progress(verbose: bool, total: usize) -> ProgressBar {
    if !verbose {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} repositories analyzed {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
