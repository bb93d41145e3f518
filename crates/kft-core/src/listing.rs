use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    fn from_mode(mode: &str) -> Self {
        match mode.chars().next() {
            Some('-') => EntryKind::File,
            Some('d') => EntryKind::Directory,
            Some('l') => EntryKind::Symlink,
            _ => EntryKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
            EntryKind::Other => "other",
        }
    }
}

/// One line of `ls -la` output from inside a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodFileEntry {
    pub name: String,
    pub kind: EntryKind,
    pub permissions: String,
    pub links: u64,
    pub owner: String,
    pub group: String,
    /// `None` for device files, which print `major, minor` instead.
    pub size: Option<u64>,
    pub modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
}

/// Parse `ls -la` output (GNU coreutils or busybox). The `total` header,
/// `.`/`..` and lines that don't look like long-format entries are skipped.
pub fn parse_ls_long(stdout: &str) -> Vec<PodFileEntry> {
    stdout.lines().filter_map(parse_line).collect()
}

struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn next(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (tok, tail) = trimmed.split_at(end);
        self.rest = tail;
        (!tok.is_empty()).then_some(tok)
    }
}

fn parse_line(line: &str) -> Option<PodFileEntry> {
    let mut tokens = Tokens {
        rest: line.trim_end(),
    };

    let permissions = tokens.next()?;
    if permissions.len() < 10 || permissions == "total" {
        return None;
    }
    let links = tokens.next()?.parse().ok()?;
    let owner = tokens.next()?.to_string();
    let group = tokens.next()?.to_string();

    let size_tok = tokens.next()?;
    let size = if size_tok.ends_with(',') {
        // device file: "major, minor"
        tokens.next()?;
        None
    } else {
        Some(size_tok.parse().ok()?)
    };

    // `Mar  4 09:12` by default, `2024-03-04 09:12` with long-iso.
    let first = tokens.next()?;
    let modified = if is_iso_date(first) {
        let time = tokens.next()?;
        format!("{first} {time}")
    } else {
        let day = tokens.next()?;
        let time = tokens.next()?;
        format!("{first} {day} {time}")
    };

    // ls separates the date from the name with exactly one space; anything
    // after that belongs to the name.
    let rest = tokens.rest;
    let name_part = rest.strip_prefix(' ').unwrap_or(rest);
    if name_part.is_empty() {
        return None;
    }

    let kind = EntryKind::from_mode(permissions);
    let (name, link_target) = match (kind, name_part.split_once(" -> ")) {
        (EntryKind::Symlink, Some((n, t))) => (n.to_string(), Some(t.to_string())),
        _ => (name_part.to_string(), None),
    };
    if name == "." || name == ".." {
        return None;
    }

    Some(PodFileEntry {
        name,
        kind,
        permissions: permissions.to_string(),
        links,
        owner,
        group,
        size,
        modified,
        link_target,
    })
}

fn is_iso_date(tok: &str) -> bool {
    let parts: Vec<&str> = tok.split('-').collect();
    parts.len() == 3
        && parts[0].len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GNU: &str = "\
total 20
drwxrwxrwt 1 root root 4096 Mar  4 09:12 .
drwxr-xr-x 1 root root 4096 Mar  1 08:00 ..
-rw-r--r-- 1 app  app   512 Mar  4 09:12 report.csv
drwxr-xr-x 2 app  app  4096 Feb 28  2024 cache
lrwxrwxrwx 1 root root    9 Mar  1 08:00 latest -> report.csv
-rw-r--r-- 1 app  app     0 Mar  4 09:12 my notes.txt
";

    #[test]
    fn parses_gnu_output() {
        let entries = parse_ls_long(GNU);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["report.csv", "cache", "latest", "my notes.txt"]);
    }

    #[test]
    fn file_fields() {
        let entries = parse_ls_long(GNU);
        let report = &entries[0];
        assert_eq!(report.kind, EntryKind::File);
        assert_eq!(report.permissions, "-rw-r--r--");
        assert_eq!(report.links, 1);
        assert_eq!(report.owner, "app");
        assert_eq!(report.group, "app");
        assert_eq!(report.size, Some(512));
        assert_eq!(report.modified, "Mar 4 09:12");
    }

    #[test]
    fn directory_with_year() {
        let cache = &parse_ls_long(GNU)[1];
        assert_eq!(cache.kind, EntryKind::Directory);
        assert_eq!(cache.modified, "Feb 28 2024");
    }

    #[test]
    fn symlink_target_split() {
        let latest = &parse_ls_long(GNU)[2];
        assert_eq!(latest.kind, EntryKind::Symlink);
        assert_eq!(latest.link_target.as_deref(), Some("report.csv"));
    }

    #[test]
    fn busybox_spacing() {
        let out = "-rw-r--r--    1 root     root           42 Jan  1 00:00 hosts\n";
        let entries = parse_ls_long(out);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "hosts");
        assert_eq!(entries[0].size, Some(42));
    }

    #[test]
    fn device_file_has_no_size() {
        let out = "crw-rw-rw- 1 root root 1, 3 Mar  4 09:12 null\n";
        let entries = parse_ls_long(out);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Other);
        assert_eq!(entries[0].size, None);
        assert_eq!(entries[0].name, "null");
    }

    #[test]
    fn long_iso_time_style() {
        let out = "\
-rw-r--r-- 1 app app 512 2024-03-04 09:12 report.csv
-rw-r--r-- 1 app app   0 2024-03-04 09:12 my notes.txt
";
        let entries = parse_ls_long(out);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "report.csv");
        assert_eq!(entries[0].modified, "2024-03-04 09:12");
        assert_eq!(entries[1].name, "my notes.txt");
    }

    #[test]
    fn garbage_lines_skipped() {
        let out = "ls: /nope: No such file or directory\n\ntotal 0\n";
        assert!(parse_ls_long(out).is_empty());
    }
}
