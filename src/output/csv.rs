use crate::model::StatsReport;
use std::fmt::Write;

pub fn render(report: &StatsReport) -> String {
    let mut csv = String::new();
    let summary = &report.summary;

    csv.push_str("# Summary\nmetric,value\n");
    let _ = writeln!(csv, "user,{}", report.user);
    let _ = writeln!(csv, "period_start,{}", report.period.start);
    let _ = writeln!(csv, "period_end,{}", report.period.end);
    let _ = writeln!(csv, "total_additions,{}", summary.total_additions);
    let _ = writeln!(csv, "total_deletions,{}", summary.total_deletions);
    let _ = writeln!(csv, "net_change,{}", summary.net_change);
    let _ = writeln!(csv, "active_days,{}", summary.active_days);
    let _ = writeln!(csv, "avg_lines_per_day,{}", summary.avg_lines_per_day);
    let _ = writeln!(csv, "total_commits,{}", report.total_commits());
    let _ = writeln!(csv, "repositories_analyzed,{}", report.repositories.len());
    csv.push('\n');

    csv.push_str("# Daily Statistics\ndate,additions,deletions,net_change,commits\n");
    for day in &report.daily_stats {
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            day.date, day.additions, day.deletions, day.net, day.commits
        );
    }
    csv.push('\n');

    csv.push_str("# Repository Statistics\nrepository,additions,deletions,net_change,commits\n");
    for repo in &report.repositories {
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            repo.name,
            repo.additions,
            repo.deletions,
            repo.net(),
            repo.commits
        );
    }

    csv
}
