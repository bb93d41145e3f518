use crate::output::{print_json, print_table};
use crate::session::Session;
use anyhow::Context;

pub fn ls(
    session: &Session,
    pod: &str,
    path: Option<String>,
    container: Option<String>,
) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let target = session.target(&kubectl, pod, container)?;
    let path = path.unwrap_or_else(|| session.default_pod_path().to_string());

    let listing = kubectl
        .list_pod_files(&target, &path)
        .with_context(|| format!("failed to list '{path}' in {target}"))?;

    if session.json {
        return print_json(&listing);
    }

    if listing.entries.is_empty() {
        println!("{path} is empty.");
        return Ok(());
    }

    let rows = listing
        .entries
        .iter()
        .map(|e| {
            let name = match &e.link_target {
                Some(t) => format!("{} -> {t}", e.name),
                None => e.name.clone(),
            };
            vec![
                e.kind.as_str().to_string(),
                e.permissions.clone(),
                e.owner.clone(),
                e.size.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                e.modified.clone(),
                name,
            ]
        })
        .collect();
    print_table(&["KIND", "MODE", "OWNER", "SIZE", "MODIFIED", "NAME"], rows);
    Ok(())
}
