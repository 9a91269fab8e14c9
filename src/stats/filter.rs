use crate::error::Result;
use crate::model::Repository;
use regex::Regex;

/// Translates a repository pattern into a regex.
///
/// Only `*` is rewritten (to `.*`); anything else is regex syntax, so `a.b`
/// also matches `axb`.
pub fn pattern_regex(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&pattern.replace('*', ".*"))?)
}

fn matches(re: &Regex, repo: &Repository) -> bool {
    re.is_match(&repo.name) || re.is_match(&repo.full_name)
}

/// Keeps repositories matching `include` (by short or full name), then drops
/// those matching `exclude`. A missing pattern keeps everything.
pub fn filter_repositories(
    repositories: &[Repository],
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<Vec<Repository>> {
    let include = include.map(pattern_regex).transpose()?;
    let exclude = exclude.map(pattern_regex).transpose()?;

    Ok(repositories
        .iter()
        .filter(|repo| include.as_ref().map_or(true, |re| matches(re, repo)))
        .filter(|repo| !exclude.as_ref().is_some_and(|re| matches(re, repo)))
        .cloned()
        .collect())
}
