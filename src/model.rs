use crate::error::{GhstatsError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub private: bool,
}

impl Repository {
    /// Splits `owner/name` on the first slash.
    pub fn owner_and_name(&self) -> (&str, &str) {
        self.full_name
            .split_once('/')
            .unwrap_or(("", self.full_name.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub stats: Option<LineStats>,
}

impl CommitRecord {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn additions(&self) -> u64 {
        self.stats.map(|s| s.additions).unwrap_or(0)
    }

    pub fn deletions(&self) -> u64 {
        self.stats.map(|s| s.deletions).unwrap_or(0)
    }
}

/// Commits fetched for one repository, keyed by its full name.
#[derive(Debug, Clone)]
pub struct RepoCommits {
    pub repository: String,
    pub commits: Vec<CommitRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub additions: u64,
    pub deletions: u64,
    pub net: i64,
    pub commits: u32,
}

impl DailyStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            additions: 0,
            deletions: 0,
            net: 0,
            commits: 0,
        }
    }

    pub fn add_commit(&mut self, additions: u64, deletions: u64) {
        self.additions += additions;
        self.deletions += deletions;
        self.net = self.additions as i64 - self.deletions as i64;
        self.commits += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub name: String,
    pub additions: u64,
    pub deletions: u64,
    pub commits: u32,
}

impl RepositoryStats {
    pub fn new(name: String) -> Self {
        Self {
            name,
            additions: 0,
            deletions: 0,
            commits: 0,
        }
    }

    pub fn churn(&self) -> u64 {
        self.additions + self.deletions
    }

    pub fn net(&self) -> i64 {
        self.additions as i64 - self.deletions as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_additions: u64,
    pub total_deletions: u64,
    pub net_change: i64,
    pub active_days: u32,
    pub avg_lines_per_day: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub user: String,
    pub period: Period,
    pub summary: Summary,
    pub daily_stats: Vec<DailyStats>,
    pub repositories: Vec<RepositoryStats>,
}

impl StatsReport {
    pub fn total_commits(&self) -> u32 {
        self.repositories.iter().map(|r| r.commits).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total_additions == 0 && self.summary.total_deletions == 0
    }

    /// Number of calendar days covered by the period, both ends included.
    pub fn period_days(&self) -> i64 {
        (self.period.end - self.period.start).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(GhstatsError::InvalidDate(format!(
                "Invalid range: since ({start}) is after until ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Both bounds are used only when `since` and `until` are given together.
    /// `since` alone runs to today. Anything else is the `days` before today,
    /// so a lone `until` is checked for format but otherwise ignored.
    pub fn resolve(
        since: Option<&str>,
        until: Option<&str>,
        days: u32,
        today: NaiveDate,
    ) -> Result<Self> {
        match (since, until) {
            (Some(s), Some(u)) => Self::new(parse_date(s)?, parse_date(u)?),
            (Some(s), None) => Self::new(parse_date(s)?, today),
            (None, until) => {
                if let Some(u) = until {
                    parse_date(u)?;
                }
                let start = today
                    .checked_sub_signed(Duration::days(days.into()))
                    .ok_or_else(|| {
                        GhstatsError::InvalidDate(format!("{days} days before {today} is out of range"))
                    })?;
                Self::new(start, today)
            }
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn since_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn until_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| GhstatsError::InvalidDate(format!("'{input}' is not a YYYY-MM-DD date")))
}
