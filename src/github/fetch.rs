use super::client::GitHubClient;
use crate::model::{DateWindow, RepoCommits, Repository};
use futures::future::join_all;
use indicatif::ProgressBar;
use tracing::debug;

/// Repositories whose commits are fetched concurrently before the next batch starts.
pub const BATCH_SIZE: usize = 10;

/// Fetches commits for every repository in batches of [`BATCH_SIZE`].
///
/// A repository that fails is skipped without affecting the rest of its batch.
/// Repositories without commits are left out. The result follows the order of
/// `repositories`.
pub async fn fetch_all(
    client: &GitHubClient,
    repositories: &[Repository],
    window: &DateWindow,
    branch: Option<&str>,
    progress: &ProgressBar,
) -> Vec<RepoCommits> {
    let mut fetched = Vec::new();
    progress.set_length(repositories.len() as u64);

    for batch in repositories.chunks(BATCH_SIZE) {
        let outcomes = join_all(batch.iter().map(|repo| async move {
            let (owner, name) = repo.owner_and_name();
            let outcome = client.list_commits(owner, name, window, branch).await;
            progress.inc(1);
            (repo, outcome)
        }))
        .await;

        for (repo, outcome) in outcomes {
            match outcome {
                Ok(commits) if commits.is_empty() => {}
                Ok(commits) => fetched.push(RepoCommits {
                    repository: repo.full_name.clone(),
                    commits,
                }),
                Err(e) => {
                    progress.set_message(format!("error: {}", repo.full_name));
                    debug!(repo = %repo.full_name, error = %e, "skipping repository");
                }
            }
        }
    }

    progress.finish_with_message("Repositories analyzed");
    fetched
}
