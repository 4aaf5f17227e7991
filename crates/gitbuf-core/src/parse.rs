//! Parsers for git porcelain output.
//!
//! Every parser is a pure function of a single stdout string. Unknown
//! lines are skipped and partial records dropped, so a malformed or
//! truncated response degrades to an incomplete value rather than an
//! error.

use crate::domain::{
    BranchHeader, BranchInfo, CommitInfo, DiffHunk, FileDiff, StashInfo, StatusEntry,
    StatusSnapshot,
};

/// Parse `git status --porcelain=v2 --branch`.
pub fn status(output: &str) -> StatusSnapshot {
    let mut snapshot = StatusSnapshot::default();

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("# branch.oid ") {
            snapshot.branch.oid = rest.to_string();
        } else if let Some(rest) = line.strip_prefix("# branch.head ") {
            snapshot.branch.head = rest.to_string();
        } else if let Some(rest) = line.strip_prefix("# branch.upstream ") {
            snapshot.branch.upstream = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("# branch.ab ") {
            for part in rest.split_whitespace() {
                if let Some(n) = part.strip_prefix('+') {
                    snapshot.branch.ahead = n.parse().unwrap_or(0);
                } else if let Some(n) = part.strip_prefix('-') {
                    snapshot.branch.behind = n.parse().unwrap_or(0);
                }
            }
        } else if line.starts_with("1 ") {
            // 1 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <path>
            let mut fields = line.splitn(9, ' ');
            let _marker = fields.next();
            let Some(xy) = fields.next() else { continue };
            let Some(path) = fields.nth(6) else { continue };
            snapshot.entries.push(StatusEntry::Changed {
                xy: xy.to_string(),
                path: path.to_string(),
            });
        } else if line.starts_with("2 ") {
            // 2 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <Xscore> <path>\t<origPath>
            let mut fields = line.splitn(10, ' ');
            let _marker = fields.next();
            let Some(xy) = fields.next() else { continue };
            let Some(paths) = fields.nth(7) else { continue };
            let Some((path, orig_path)) = paths.split_once('\t') else {
                continue;
            };
            snapshot.entries.push(StatusEntry::Renamed {
                xy: xy.to_string(),
                path: path.to_string(),
                orig_path: orig_path.to_string(),
            });
        } else if line.starts_with("u ") {
            // u <XY> <sub> <m1> <m2> <m3> <mW> <h1> <h2> <h3> <path>
            let mut fields = line.splitn(11, ' ');
            let _marker = fields.next();
            let Some(xy) = fields.next() else { continue };
            let Some(path) = fields.nth(8) else { continue };
            snapshot.entries.push(StatusEntry::Unmerged {
                xy: xy.to_string(),
                path: path.to_string(),
            });
        } else if let Some(path) = line.strip_prefix("? ") {
            snapshot.entries.push(StatusEntry::Untracked {
                path: path.to_string(),
            });
        }
    }

    snapshot
}

/// Parse unified diff output into per-file diffs.
pub fn diff(output: &str) -> Vec<FileDiff> {
    let mut files = Vec::new();
    let mut current: Option<FileDiff> = None;
    let mut hunk: Option<DiffHunk> = None;

    fn flush_hunk(current: &mut Option<FileDiff>, hunk: &mut Option<DiffHunk>) {
        if let (Some(file), Some(hunk)) = (current.as_mut(), hunk.take()) {
            file.hunks.push(hunk);
        }
    }

    for line in output.lines() {
        if line.starts_with("diff --git ") {
            flush_hunk(&mut current, &mut hunk);
            if let Some(file) = current.take() {
                files.push(file);
            }
            current = Some(FileDiff {
                header: line.to_string(),
                ..FileDiff::default()
            });
        } else if let Some(rest) = line.strip_prefix("--- ") {
            if let Some(file) = current.as_mut() {
                if hunk.is_none() {
                    file.old_file = diff_path(rest);
                    continue;
                }
            }
            push_hunk_line(&mut hunk, line);
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            if let Some(file) = current.as_mut() {
                if hunk.is_none() {
                    file.file = diff_path(rest);
                    continue;
                }
            }
            push_hunk_line(&mut hunk, line);
        } else if line.starts_with("Binary files ") {
            if let Some(file) = current.as_mut() {
                file.binary = true;
            }
        } else if line.starts_with("@@") {
            flush_hunk(&mut current, &mut hunk);
            hunk = hunk_header(line);
        } else if line.starts_with(' ')
            || line.starts_with('+')
            || line.starts_with('-')
            || line.starts_with('\\')
        {
            push_hunk_line(&mut hunk, line);
        }
        // index, mode, similarity and rename/copy lines carry nothing we keep.
    }

    flush_hunk(&mut current, &mut hunk);
    if let Some(file) = current {
        files.push(file);
    }
    files
}

fn push_hunk_line(hunk: &mut Option<DiffHunk>, line: &str) {
    if let Some(hunk) = hunk.as_mut() {
        hunk.lines.push(line.to_string());
    }
}

fn diff_path(raw: &str) -> Option<String> {
    let raw = raw.trim_end();
    if raw == "/dev/null" {
        return None;
    }
    let raw = raw
        .strip_prefix("a/")
        .or_else(|| raw.strip_prefix("b/"))
        .unwrap_or(raw);
    Some(raw.to_string())
}

/// Parse `@@ -a[,b] +c[,d] @@[ context]`; missing counts default to 1.
fn hunk_header(line: &str) -> Option<DiffHunk> {
    let rest = line.strip_prefix("@@")?.trim_start();
    let (ranges, tail) = rest.split_once("@@")?;

    let mut it = ranges.trim().split_whitespace();
    let (old_start, old_count) = range(it.next()?.strip_prefix('-')?)?;
    let (new_start, new_count) = range(it.next()?.strip_prefix('+')?)?;

    let context = tail.trim();
    Some(DiffHunk {
        header: line.to_string(),
        old_start,
        old_count,
        new_start,
        new_count,
        context: (!context.is_empty()).then(|| context.to_string()),
        lines: Vec::new(),
    })
}

fn range(s: &str) -> Option<(u32, u32)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

/// Parse log output produced with `--format=%h%x00%s%x00%ar%x00%an%x00%D`.
pub fn log(output: &str) -> Vec<CommitInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('\0');
            let hash = parts.next().filter(|s| !s.is_empty())?.to_string();
            let subject = parts.next()?.to_string();
            let date = parts.next()?.to_string();
            let author = parts.next()?.to_string();
            let refs = parts
                .next()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from);
            Some(CommitInfo {
                hash,
                subject,
                date,
                author,
                refs,
            })
        })
        .collect()
}

/// Parse `git stash list` lines of the form `<ref>: <message>`.
pub fn stash_list(output: &str) -> Vec<StashInfo> {
    output
        .lines()
        .filter_map(|line| {
            let (reference, message) = line.split_once(": ")?;
            Some(StashInfo {
                reference: reference.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}

/// Parse branch listing lines of three NUL-delimited fields:
/// `refname:short`, `objectname:short`, `HEAD?`.
pub fn branch_list(output: &str) -> Vec<BranchInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('\0');
            let name = parts.next().filter(|s| !s.is_empty())?.to_string();
            let target = parts.next()?.to_string();
            let head = parts.next()?;
            Some(BranchInfo {
                current: head == "*",
                remote: name.starts_with("remotes/"),
                name,
                target,
            })
        })
        .collect()
}
