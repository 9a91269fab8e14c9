use crate::model::{DailyStats, StatsReport};
use crate::util::{format_number, format_signed, long_date, rounded_ratio, short_date};
use std::fmt::Write;

const TOP_N: usize = 5;

pub fn render(report: &StatsReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str("GitHub Commit Statistics\n");
    out.push_str("========================\n");
    let _ = writeln!(out, "User:                {}", report.user);
    let _ = writeln!(
        out,
        "Period:              {} - {}",
        long_date(&report.period.start),
        long_date(&report.period.end)
    );
    let _ = writeln!(out, "Repositories:        {} analyzed\n", report.repositories.len());

    out.push_str("Totals:\n");
    let _ = writeln!(out, "  Lines added:       {}", format_number(summary.total_additions as i64));
    let _ = writeln!(out, "  Lines deleted:     {}", format_number(summary.total_deletions as i64));
    let _ = writeln!(out, "  Net change:        {}\n", format_signed(summary.net_change));

    let period_days = report.period_days().max(0) as u64;
    let active_pct = rounded_ratio(summary.active_days as u64 * 100, period_days);
    let total_commits = report.total_commits();

    out.push_str("Activity:\n");
    let _ = writeln!(
        out,
        "  Active days:       {} of {} ({}%)",
        summary.active_days, period_days, active_pct
    );
    let _ = writeln!(out, "  Total commits:     {}", total_commits);
    let _ = writeln!(out, "  Avg lines/day:     {}", format_number(summary.avg_lines_per_day as i64));
    let _ = writeln!(
        out,
        "  Avg commits/day:   {}\n",
        rounded_ratio(total_commits as u64, summary.active_days as u64)
    );

    let top_days = top_days(&report.daily_stats);
    if !top_days.is_empty() {
        let _ = writeln!(out, "Top {TOP_N} Most Active Days:");
        for (i, day) in top_days.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}: {} lines ({} commits)",
                i + 1,
                short_date(&day.date),
                format_signed(day.net),
                day.commits
            );
        }
        out.push('\n');
    }

    if !report.repositories.is_empty() {
        let _ = writeln!(out, "Top {TOP_N} Repositories:");
        for (i, repo) in report.repositories.iter().take(TOP_N).enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}: {} lines ({} commits)",
                i + 1,
                repo.name,
                format_signed(repo.net()),
                repo.commits
            );
        }
    }

    out
}

/// Days with commits, highest net change first; ties keep date order.
fn top_days(daily: &[DailyStats]) -> Vec<&DailyStats> {
    let mut days: Vec<&DailyStats> = daily.iter().filter(|d| d.commits > 0).collect();
    days.sort_by(|a, b| b.net.cmp(&a.net));
    days.truncate(TOP_N);
    days
}
