//! The poll loop: drives rounds of transport queries until every tracked
//! check concludes or the deadline passes, then reduces to one verdict.

use std::time::{Duration, Instant};

use crate::client::ChecksClient;
use crate::model::{PollOutcome, TrackedOutcome};
use crate::parse::check_names_as_list;

/// Inputs for one poll invocation, excluding the injected capabilities.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Comma-separated check names to track, parsed per
    /// [`check_names_as_list`](crate::check_names_as_list).
    pub check_names: String,
    /// Total wall-clock budget. The deadline is fixed once at entry.
    pub timeout: Duration,
    /// Delay between rounds.
    pub interval: Duration,
    /// Repository owner, passed through to the transport verbatim.
    pub owner: String,
    /// Repository name, passed through verbatim.
    pub repo: String,
    /// Commit SHA, branch, or tag the checks are attached to.
    pub git_ref: String,
}

/// Polls every tracked check until all conclude or the deadline passes.
///
/// Each round queries the transport once per tracked name, in input order,
/// and records the conclusion of the first completed run it returns. The
/// round in progress is never cut short by the deadline; it is re-checked
/// only between rounds. Reduction order: any `failure` conclusion wins, then
/// any remaining `pending` means `timed_out`, otherwise `success`.
///
/// Transport errors are not retried and abort the invocation immediately.
pub async fn poll<C>(
    client: &C,
    mut log: impl FnMut(&str),
    opts: &PollOptions,
) -> anyhow::Result<PollOutcome>
where
    C: ChecksClient + ?Sized,
{
    let mut now = Instant::now();
    let deadline = now + opts.timeout;

    let names = check_names_as_list(&opts.check_names);
    log(&format!("tracking checks: {names:?}"));

    // Insertion-ordered; duplicate input names collapse onto one entry.
    let mut tracked: Vec<(String, TrackedOutcome)> = Vec::with_capacity(names.len());
    for name in names {
        if !tracked.iter().any(|(existing, _)| *existing == name) {
            tracked.push((name, TrackedOutcome::Pending));
        }
    }

    while now <= deadline {
        for (name, outcome) in &mut tracked {
            log(&format!(
                "listing check runs named {name} on {}/{}@{}",
                opts.owner, opts.repo, opts.git_ref
            ));
            let result = client
                .list_for_ref(&opts.owner, &opts.repo, &opts.git_ref, name)
                .await?;
            log(&format!(
                "retrieved {} check runs named {name}",
                result.check_runs.len()
            ));

            let completed = result
                .check_runs
                .iter()
                .find(|run| run.status.is_completed());
            if let Some(run) = completed {
                // A completed run always carries a conclusion.
                let conclusion = run.conclusion.clone().unwrap_or_default();
                log(&format!(
                    "found a completed check with id {} and conclusion {conclusion} for {name}",
                    run.id
                ));
                *outcome = TrackedOutcome::Concluded(conclusion);
            } else {
                log(&format!("still pending for {name}"));
            }
        }

        let mut pending_count = 0usize;
        for (name, outcome) in &tracked {
            log(&format!("conclusion set to {outcome} for {name}"));
            if outcome.is_pending() {
                pending_count += 1;
            }
        }

        if pending_count == 0 {
            break;
        }

        log(&format!(
            "{pending_count} checks still pending, waiting {}s before the next round",
            opts.interval.as_secs()
        ));
        tokio::time::sleep(opts.interval).await;
        now = Instant::now();
    }

    if tracked.iter().any(|(_, outcome)| outcome.is_failure()) {
        return Ok(PollOutcome::Failure);
    }

    if tracked.iter().any(|(_, outcome)| outcome.is_pending()) {
        log(&format!(
            "checks still pending after {}s, concluding timed_out",
            opts.timeout.as_secs()
        ));
        return Ok(PollOutcome::TimedOut);
    }

    Ok(PollOutcome::Success)
}
