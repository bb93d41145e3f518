use crate::output::print_json;
use crate::session::Session;
use kft_core::history::{self, HistoryEntry};
use kft_core::target::PodTarget;
use kft_core::transfer::{self, Direction, TransferOutcome, TransferRequest};

#[derive(serde::Serialize)]
struct TransferReport {
    request: TransferRequest,
    outcome: TransferOutcome,
}

// ---------------------------------------------------------------------------
// upload / download
// ---------------------------------------------------------------------------

pub fn upload(
    session: &Session,
    pod: &str,
    local: &[String],
    pod_path: Option<String>,
    container: Option<String>,
) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let target = session.target(&kubectl, pod, container)?;
    let pod_path = pod_path.unwrap_or_else(|| session.default_pod_path().to_string());
    let requests = TransferRequest::uploads(local, &pod_path, &target);
    run_all(session, &kubectl, requests)
}

pub fn download(
    session: &Session,
    pod: &str,
    pod_path: &str,
    local: &str,
    container: Option<String>,
) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let target = session.target(&kubectl, pod, container)?;
    let request = TransferRequest::new(Direction::Download, local, pod_path, target);
    run_all(session, &kubectl, vec![request])
}

// ---------------------------------------------------------------------------
// shared runner
// ---------------------------------------------------------------------------

/// Run requests one after another. Every request is attempted, even after
/// an earlier one failed or could not start; the command fails if any did.
pub(crate) fn run_all(
    session: &Session,
    kubectl: &kft_core::kubectl::Kubectl,
    requests: Vec<TransferRequest>,
) -> anyhow::Result<()> {
    let mut reports = Vec::with_capacity(requests.len());

    for request in requests {
        let request = request.normalized();
        if !session.json {
            println!(
                "{}: {} {} {}",
                request.direction.label(),
                request.local_path,
                arrow(request.direction),
                remote_display(&request.target, &request.pod_path),
            );
        }

        let outcome = match transfer::execute(kubectl, &request) {
            Ok(outcome) => {
                if session.config.history.enabled {
                    let entry = HistoryEntry::from_outcome(&request, &outcome);
                    if let Err(e) =
                        history::record(&session.home, entry, session.config.history.max_entries)
                    {
                        tracing::warn!(error = %e, "failed to record transfer history");
                    }
                }
                outcome
            }
            // Never ran, so nothing goes to history.
            Err(e) => not_started(&e),
        };

        if !session.json {
            if outcome.success {
                println!("  done in {} ms", outcome.duration_ms);
            } else {
                println!(
                    "  failed: {}",
                    outcome.error.as_deref().unwrap_or("transfer failed")
                );
            }
        }
        reports.push(TransferReport { request, outcome });
    }

    if session.json {
        print_json(&reports)?;
    }

    let failed = reports.iter().filter(|r| !r.outcome.success).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} transfer(s) failed", reports.len());
    }
    Ok(())
}

fn not_started(err: &kft_core::KftError) -> TransferOutcome {
    TransferOutcome {
        success: false,
        output: String::new(),
        error: Some(format!("could not start: {err}")),
        code: None,
        started_at: chrono::Utc::now(),
        duration_ms: 0,
    }
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Upload => "->",
        Direction::Download => "<-",
    }
}

fn remote_display(target: &PodTarget, pod_path: &str) -> String {
    match &target.container {
        Some(c) => format!("{} [{c}]", target.pod_ref(pod_path)),
        None => target.pod_ref(pod_path),
    }
}
