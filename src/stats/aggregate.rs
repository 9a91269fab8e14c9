use crate::model::{
    DailyStats, DateWindow, Period, RepoCommits, RepositoryStats, StatsReport, Summary,
};
use crate::util::rounded_ratio;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Folds fetched commits into daily and per-repository totals.
///
/// Every date of `window` gets a row, zero-filled when nothing was committed
/// that day. Commits dated outside the window are ignored so the daily,
/// repository and summary totals always agree.
pub fn process_stats(commits_by_repo: &[RepoCommits], user: &str, window: &DateWindow) -> StatsReport {
    let mut day_map: HashMap<NaiveDate, DailyStats> = HashMap::new();
    let mut repositories = Vec::with_capacity(commits_by_repo.len());

    for entry in commits_by_repo {
        let mut repo_stats = RepositoryStats::new(entry.repository.clone());

        for commit in &entry.commits {
            let date = commit.date();
            if !window.contains(date) {
                continue;
            }
            let (added, deleted) = (commit.additions(), commit.deletions());

            day_map
                .entry(date)
                .or_insert_with(|| DailyStats::empty(date))
                .add_commit(added, deleted);

            repo_stats.additions += added;
            repo_stats.deletions += deleted;
            repo_stats.commits += 1;
        }

        if repo_stats.commits > 0 {
            repositories.push(repo_stats);
        }
    }

    let daily_stats: Vec<DailyStats> = window
        .dates()
        .map(|date| day_map.remove(&date).unwrap_or_else(|| DailyStats::empty(date)))
        .collect();

    // stable: equal churn keeps fetch order
    repositories.sort_by(|a, b| b.churn().cmp(&a.churn()));

    let total_additions: u64 = repositories.iter().map(|r| r.additions).sum();
    let total_deletions: u64 = repositories.iter().map(|r| r.deletions).sum();
    let active_days = daily_stats.iter().filter(|d| d.commits > 0).count() as u32;

    StatsReport {
        user: user.to_string(),
        period: Period {
            start: window.start,
            end: window.end,
        },
        summary: Summary {
            total_additions,
            total_deletions,
            net_change: total_additions as i64 - total_deletions as i64,
            active_days,
            avg_lines_per_day: rounded_ratio(total_additions + total_deletions, active_days as u64),
        },
        daily_stats,
        repositories,
    }
}
