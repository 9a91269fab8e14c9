use crate::config::ColorScheme;
use crate::model::StatsReport;
use crate::util::{format_number, format_signed};
use console::{style, Color};
use std::fmt::Write;

const ADDITIONS_HEIGHT: usize = 15;
const NET_HEIGHT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColors {
    pub additions: Color,
    pub deletions: Color,
    pub net: Color,
}

impl Default for SeriesColors {
    fn default() -> Self {
        Self {
            additions: Color::Blue,
            deletions: Color::Red,
            net: Color::Cyan,
        }
    }
}

impl SeriesColors {
    pub fn from_scheme(scheme: &ColorScheme) -> Self {
        let defaults = Self::default();
        let pick = |name: &Option<String>, fallback| name.as_deref().and_then(parse_color).unwrap_or(fallback);
        Self {
            additions: pick(&scheme.additions, defaults.additions),
            deletions: pick(&scheme.deletions, defaults.deletions),
            net: pick(&scheme.neutral, defaults.net),
        }
    }
}

pub fn parse_color(name: &str) -> Option<Color> {
    let color = match name.trim().to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        other => Color::Color256(other.parse().ok()?),
    };
    Some(color)
}

/// Draws one or more series as a line chart scaled to `height` rows.
///
/// All series share the y axis. Each column after the first value is one step
/// along x.
pub fn plot(series: &[(&[f64], Color)], height: usize) -> String {
    let len = series.iter().map(|(values, _)| values.len()).max().unwrap_or(0);
    if len == 0 {
        return String::new();
    }

    let (min, max) = series
        .iter()
        .flat_map(|(values, _)| values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let range = max - min;
    let ratio = if range != 0.0 { height as f64 / range } else { 1.0 };
    let min2 = (min * ratio).round() as i64;
    let max2 = (max * ratio).round() as i64;
    let rows = (max2 - min2) as usize;
    let scaled = |v: f64| ((v * ratio).round() as i64 - min2) as usize;

    let width = len - 1;
    let mut grid = vec![vec![String::from(" "); width]; rows + 1];
    let mut axis = vec!['┤'; rows + 1];
    if min2 <= 0 && max2 >= 0 {
        axis[max2 as usize] = '┼';
    }

    for (values, color) in series {
        let paint = |ch: &str| style(ch).fg(*color).to_string();
        if let Some(first) = values.first() {
            axis[rows - scaled(*first)] = '┼';
        }
        for x in 0..values.len().saturating_sub(1) {
            let y0 = scaled(values[x]);
            let y1 = scaled(values[x + 1]);
            if y0 == y1 {
                grid[rows - y0][x] = paint("─");
                continue;
            }
            let (from_corner, to_corner) = if y0 > y1 { ("╮", "╰") } else { ("╯", "╭") };
            grid[rows - y1][x] = paint(to_corner);
            grid[rows - y0][x] = paint(from_corner);
            for y in y0.min(y1) + 1..y0.max(y1) {
                grid[rows - y][x] = paint("│");
            }
        }
    }

    let labels: Vec<String> = (0..=rows)
        .map(|row| {
            let value = if rows > 0 {
                max - row as f64 * range / rows as f64
            } else {
                max
            };
            format!("{value:.2}")
        })
        .collect();
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (row, cells) in grid.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>label_width$} {}{}",
            labels[row],
            axis[row],
            cells.concat()
        );
    }
    out
}

pub fn render(report: &StatsReport, colors: &SeriesColors) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style("GitHub Commit Statistics").bold());
    let _ = writeln!(out, "User: {}", report.user);
    let _ = writeln!(out, "Period: {} to {}\n", report.period.start, report.period.end);

    if !report.daily_stats.is_empty() {
        let additions: Vec<f64> = report.daily_stats.iter().map(|d| d.additions as f64).collect();
        let deletions: Vec<f64> = report.daily_stats.iter().map(|d| d.deletions as f64).collect();
        let net: Vec<f64> = report.daily_stats.iter().map(|d| d.net as f64).collect();

        out.push_str("Lines Added/Deleted per Day:\n");
        out.push_str(&plot(
            &[(additions.as_slice(), colors.additions), (deletions.as_slice(), colors.deletions)],
            ADDITIONS_HEIGHT,
        ));
        let _ = writeln!(out, "   {} Lines Added", style("──").fg(colors.additions));
        let _ = writeln!(out, "   {} Lines Deleted\n", style("──").fg(colors.deletions));

        out.push_str("Net Change per Day:\n");
        out.push_str(&plot(&[(net.as_slice(), colors.net)], NET_HEIGHT));
        out.push('\n');
    }

    let summary = &report.summary;
    out.push_str("Summary:\n");
    let _ = writeln!(out, "  Total lines added:    {}", format_number(summary.total_additions as i64));
    let _ = writeln!(out, "  Total lines deleted:  {}", format_number(summary.total_deletions as i64));
    let _ = writeln!(out, "  Net change:           {}", format_signed(summary.net_change));
    let _ = writeln!(out, "  Active days:          {}", summary.active_days);
    let _ = writeln!(out, "  Avg lines/day:        {}", format_number(summary.avg_lines_per_day as i64));

    out
}
