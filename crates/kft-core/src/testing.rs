//! Fake kubectl for unit tests: a shell script that records its argv to
//! `args.log` in the temp dir and then runs `body`.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn fake_kubectl(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("kubectl");
    let log = dir.path().join("args.log");
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\n{body}\n",
        log.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn recorded_args(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("args.log"))
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}
