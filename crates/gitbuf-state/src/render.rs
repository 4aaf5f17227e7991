//! Renders a parsed snapshot plus view state into buffer text, overlay
//! spans and a section tree whose node spans index the rendered lines.

use crate::model::{GitData, OverlaySpan, OverlayTag, RenderedStatus, Shared};
use gitbuf_core::domain::{
    change_type, expand_key, CommitInfo, Face, FileDiff, StatusEntry, StatusKey,
};
use gitbuf_core::section::{DiffSource, Section, SectionData, SectionId, SectionTree};
use rustc_hash::{FxHashMap, FxHashSet};

pub struct ViewState<'a> {
    pub expanded_files: &'a FxHashSet<String>,
    pub expanded_commits: &'a FxHashSet<String>,
    pub commit_diffs: &'a FxHashMap<String, Shared<Vec<FileDiff>>>,
    pub collapsed_sections: &'a FxHashSet<StatusKey>,
    pub saved_cursor: usize,
}

pub fn render_status(data: &GitData, view: &ViewState) -> (SectionTree, RenderedStatus) {
    let mut r = Renderer::default();

    r.header(data);
    r.file_sections(data, view);
    r.commit_section(StatusKey::Unpushed, &data.unpushed, data, view);
    r.commit_section(StatusKey::Unpulled, &data.unpulled, data, view);
    r.commit_section(StatusKey::Log, &data.log, data, view);
    r.stash_section(data, view);

    let cursor = if r.text.is_empty() {
        0
    } else {
        view.saved_cursor.min(r.text.len() - 1)
    };

    (
        r.tree,
        RenderedStatus {
            text: r.text,
            overlays: r.overlays,
            cursor,
        },
    )
}

#[derive(Default)]
struct Renderer {
    tree: SectionTree,
    text: String,
    line_count: usize,
    overlays: Vec<OverlaySpan>,
}

impl Renderer {
    /// Append one line, returning its 0-indexed line number.
    fn push_line(&mut self, line: &str, face: Option<Face>) -> usize {
        let line_ix = self.line_count;
        let start = self.text.len();
        self.text.push_str(line);
        let end = self.text.len();
        self.text.push('\n');
        self.line_count += 1;

        if let Some(face) = face {
            let (tag, priority) = if face.is_diff() {
                (OverlayTag::GitDiff, 1)
            } else {
                (OverlayTag::GitFace, 0)
            };
            self.overlays.push(OverlaySpan {
                start_byte: start,
                end_byte: end,
                face,
                tag,
                priority,
            });
        }

        line_ix
    }

    fn header(&mut self, data: &GitData) {
        let branch = &data.status.branch;
        let head = if branch.head.is_empty() {
            "(detached)"
        } else {
            &branch.head
        };
        let oid = &branch.oid[..branch.oid.len().min(7)];

        let start = self.push_line(&format!("Head: {head} ({oid})"), Some(Face::Heading));
        let node = self
            .tree
            .push(Section::new(SectionData::Header, start, Face::Heading), None);

        let upstream = branch.upstream.as_deref().or(data.upstream.as_deref());
        if let Some(upstream) = upstream {
            let summary = match (branch.ahead, branch.behind) {
                (0, 0) => "up to date".to_string(),
                (ahead, 0) => format!("ahead {ahead}"),
                (0, behind) => format!("behind {behind}"),
                (ahead, behind) => format!("ahead {ahead}, behind {behind}"),
            };
            let end = self.push_line(
                &format!("Upstream: {upstream} ({summary})"),
                Some(Face::Heading),
            );
            self.tree.get_mut(node).end_line = end;
        }
    }

    /// Open a top-level section with its heading. Returns `None` when the
    /// section is collapsed: the heading is rendered, children are not.
    fn open_section(
        &mut self,
        key: StatusKey,
        count: usize,
        view: &ViewState,
    ) -> Option<SectionId> {
        self.push_line("", None);
        let start = self.push_line(
            &format!("{} ({count})", key.title()),
            Some(Face::SectionHeading),
        );
        let id = self.tree.push(
            Section::new(SectionData::SectionHeader { key }, start, Face::SectionHeading),
            None,
        );
        if view.collapsed_sections.contains(&key) {
            self.tree.get_mut(id).collapsed = true;
            None
        } else {
            Some(id)
        }
    }

    fn file_sections(&mut self, data: &GitData, view: &ViewState) {
        let entries = &data.status.entries;

        let untracked: Vec<&StatusEntry> = entries
            .iter()
            .filter(|e| matches!(e, StatusEntry::Untracked { .. }))
            .collect();
        let unstaged: Vec<&StatusEntry> = entries
            .iter()
            .filter(|e| matches!(e, StatusEntry::Unmerged { .. }) || e.unstaged())
            .collect();
        let staged: Vec<&StatusEntry> = entries
            .iter()
            .filter(|e| !matches!(e, StatusEntry::Unmerged { .. }) && e.staged())
            .collect();

        self.file_group(StatusKey::Untracked, &untracked, data, view);
        self.file_group(StatusKey::Unstaged, &unstaged, data, view);
        self.file_group(StatusKey::Staged, &staged, data, view);
    }

    fn file_group(
        &mut self,
        key: StatusKey,
        entries: &[&StatusEntry],
        data: &GitData,
        view: &ViewState,
    ) {
        if entries.is_empty() {
            return;
        }
        let Some(section) = self.open_section(key, entries.len(), view) else {
            return;
        };

        for entry in entries {
            let path = entry.path().to_string();
            let row = match entry.xy() {
                Some(xy) if key != StatusKey::Untracked => {
                    format!("  {}  {path}", change_type(xy, key))
                }
                _ => format!("  {path}"),
            };
            let start = self.push_line(&row, Some(Face::FileRow));

            let (source, diffs) = match key {
                StatusKey::Unstaged => (DiffSource::Unstaged, &data.unstaged),
                StatusKey::Staged => (DiffSource::Staged, &data.staged),
                _ => (DiffSource::Unstaged, &data.unstaged),
            };
            let diff_ix = match key {
                StatusKey::Untracked => None,
                _ => diffs.iter().position(|d| d.matches_path(&path)),
            };

            let ekey = expand_key(key, &path);
            let file_node = self.tree.push(
                Section::new(
                    SectionData::File {
                        key,
                        path,
                        expand_key: ekey.clone(),
                        diff: diff_ix.map(|ix| (source.clone(), ix)),
                    },
                    start,
                    Face::FileRow,
                ),
                Some(section),
            );

            if let Some(file_ix) = diff_ix {
                if view.expanded_files.contains(&ekey) {
                    let end = self.hunks(&diffs[file_ix], source.clone(), file_ix, file_node);
                    self.tree.get_mut(file_node).end_line = end;
                }
            }

            let end = self.tree.get(file_node).end_line;
            self.tree.get_mut(section).end_line = end;
        }
    }

    /// Render every hunk of `diff` as children of `parent`; returns the
    /// last rendered line.
    fn hunks(
        &mut self,
        diff: &FileDiff,
        source: DiffSource,
        file_ix: usize,
        parent: SectionId,
    ) -> usize {
        let mut last = self.tree.get(parent).end_line;
        for (hunk_ix, hunk) in diff.hunks.iter().enumerate() {
            let start = self.push_line(
                &format!("    {}", hunk.header),
                Some(Face::DiffHunkHeader),
            );
            let node = self.tree.push(
                Section::new(
                    SectionData::Hunk {
                        source: source.clone(),
                        file_ix,
                        hunk_ix,
                    },
                    start,
                    Face::DiffHunkHeader,
                ),
                Some(parent),
            );
            let mut end = start;
            for line in &hunk.lines {
                let face = match line.chars().next() {
                    Some('+') => Face::DiffAdd,
                    Some('-') => Face::DiffRemove,
                    _ => Face::DiffContext,
                };
                end = self.push_line(&format!("    {line}"), Some(face));
            }
            self.tree.get_mut(node).end_line = end;
            last = end;
        }
        last
    }

    fn commit_section(
        &mut self,
        key: StatusKey,
        commits: &[CommitInfo],
        _data: &GitData,
        view: &ViewState,
    ) {
        if commits.is_empty() {
            return;
        }
        let Some(section) = self.open_section(key, commits.len(), view) else {
            return;
        };

        for commit in commits {
            let mut row = format!("  {} {}  {}", commit.hash, commit.date, commit.subject);
            if let Some(refs) = &commit.refs {
                row.push_str(&format!(" ({refs})"));
            }
            let start = self.push_line(&row, Some(Face::CommitRow));
            let node = self.tree.push(
                Section::new(
                    SectionData::Commit {
                        hash: commit.hash.clone(),
                    },
                    start,
                    Face::CommitRow,
                ),
                Some(section),
            );

            if view.expanded_commits.contains(&commit.hash) {
                if let Some(diffs) = view.commit_diffs.get(&commit.hash) {
                    let source = DiffSource::Commit(commit.hash.clone());
                    let mut end = start;
                    for (file_ix, diff) in diffs.iter().enumerate() {
                        end = self.push_line(
                            &format!("    {}", diff.header),
                            Some(Face::DiffHunkHeader),
                        );
                        self.tree.get_mut(node).end_line = end;
                        end = self.hunks(diff, source.clone(), file_ix, node);
                    }
                    self.tree.get_mut(node).end_line = end;
                }
            }

            let end = self.tree.get(node).end_line;
            self.tree.get_mut(section).end_line = end;
        }
    }

    fn stash_section(&mut self, data: &GitData, view: &ViewState) {
        if data.stashes.is_empty() {
            return;
        }
        let Some(section) = self.open_section(StatusKey::Stash, data.stashes.len(), view) else {
            return;
        };

        for stash in &data.stashes {
            let start = self.push_line(
                &format!("  {}: {}", stash.reference, stash.message),
                Some(Face::StashRow),
            );
            self.tree.push(
                Section::new(
                    SectionData::Stash {
                        reference: stash.reference.clone(),
                    },
                    start,
                    Face::StashRow,
                ),
                Some(section),
            );
            self.tree.get_mut(section).end_line = start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitbuf_core::domain::{BranchHeader, StatusSnapshot};

    fn view<'a>(
        expanded_files: &'a FxHashSet<String>,
        expanded_commits: &'a FxHashSet<String>,
        commit_diffs: &'a FxHashMap<String, Shared<Vec<FileDiff>>>,
        collapsed_sections: &'a FxHashSet<StatusKey>,
    ) -> ViewState<'a> {
        ViewState {
            expanded_files,
            expanded_commits,
            commit_diffs,
            collapsed_sections,
            saved_cursor: 0,
        }
    }

    fn empty_sets() -> (
        FxHashSet<String>,
        FxHashSet<String>,
        FxHashMap<String, Shared<Vec<FileDiff>>>,
        FxHashSet<StatusKey>,
    ) {
        (
            FxHashSet::default(),
            FxHashSet::default(),
            FxHashMap::default(),
            FxHashSet::default(),
        )
    }

    fn sample_data() -> GitData {
        GitData {
            status: StatusSnapshot {
                branch: BranchHeader {
                    oid: "a1b2c3da99".to_string(),
                    head: "main".to_string(),
                    upstream: Some("origin/main".to_string()),
                    ahead: 0,
                    behind: 0,
                },
                entries: vec![
                    StatusEntry::Untracked {
                        path: "new.txt".to_string(),
                    },
                    StatusEntry::Changed {
                        xy: ".M".to_string(),
                        path: "a.txt".to_string(),
                    },
                    StatusEntry::Changed {
                        xy: ".M".to_string(),
                        path: "b.txt".to_string(),
                    },
                ],
            },
            unstaged: gitbuf_core::parse::diff(
                "diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n@@ -1,2 +1,3 @@\n one\n+two\n three\n",
            ),
            upstream: Some("origin/main".to_string()),
            ..GitData::default()
        }
    }

    #[test]
    fn renders_header_sections_and_rows_in_order() {
        let (files, commits, diffs, collapsed) = empty_sets();
        let view = view(&files, &commits, &diffs, &collapsed);
        let (_tree, rendered) = render_status(&sample_data(), &view);

        let lines: Vec<&str> = rendered.text.lines().collect();
        assert_eq!(lines[0], "Head: main (a1b2c3d)");
        assert_eq!(lines[1], "Upstream: origin/main (up to date)");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Untracked files (1)");
        assert_eq!(lines[4], "  new.txt");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Unstaged changes (2)");
        assert_eq!(lines[7], "  modified  a.txt");
        assert_eq!(lines[8], "  modified  b.txt");
    }

    #[test]
    fn ahead_behind_summary_variants() {
        let mut data = sample_data();
        data.status.branch.ahead = 2;
        data.status.branch.behind = 1;

        let (files, commits, diffs, collapsed) = empty_sets();
        let view = view(&files, &commits, &diffs, &collapsed);
        let (_tree, rendered) = render_status(&data, &view);
        assert!(rendered
            .text
            .contains("Upstream: origin/main (ahead 2, behind 1)"));
    }

    #[test]
    fn detached_head_renders_placeholder() {
        let mut data = sample_data();
        data.status.branch.head = String::new();
        data.status.branch.upstream = None;
        data.upstream = None;

        let (files, commits, diffs, collapsed) = empty_sets();
        let view = view(&files, &commits, &diffs, &collapsed);
        let (_tree, rendered) = render_status(&data, &view);
        assert!(rendered.text.starts_with("Head: (detached) (a1b2c3d)"));
    }

    #[test]
    fn expanded_file_renders_indented_hunks_with_diff_overlays() {
        let (mut files, commits, diffs, collapsed) = empty_sets();
        files.insert(expand_key(StatusKey::Unstaged, "a.txt"));
        let view = view(&files, &commits, &diffs, &collapsed);
        let (tree, rendered) = render_status(&sample_data(), &view);

        assert!(rendered.text.contains("    @@ -1,2 +1,3 @@"));
        assert!(rendered.text.contains("    +two"));

        // The hunk is a child of the file node and its span covers the
        // diff lines.
        let hunk_line = rendered
            .text
            .lines()
            .position(|l| l.starts_with("    @@"))
            .unwrap();
        let node = tree.section_at_line(hunk_line).unwrap();
        assert!(matches!(tree.get(node).data, SectionData::Hunk { .. }));
        assert_eq!(tree.get(node).end_line, hunk_line + 3);

        assert!(rendered
            .overlays
            .iter()
            .any(|o| o.tag == OverlayTag::GitDiff && o.face == Face::DiffAdd));
    }

    #[test]
    fn collapsed_section_renders_heading_only() {
        let (files, commits, diffs, mut collapsed) = empty_sets();
        collapsed.insert(StatusKey::Unstaged);
        let view = view(&files, &commits, &diffs, &collapsed);
        let (tree, rendered) = render_status(&sample_data(), &view);

        assert!(rendered.text.contains("Unstaged changes (2)"));
        assert!(!rendered.text.contains("  modified  a.txt"));

        let heading_line = rendered
            .text
            .lines()
            .position(|l| l.starts_with("Unstaged changes"))
            .unwrap();
        let node = tree.section_at_line(heading_line).unwrap();
        assert!(tree.get(node).collapsed);
        assert_eq!(tree.get(node).end_line, heading_line);
    }

    #[test]
    fn expanded_commit_renders_cached_diff() {
        let mut data = sample_data();
        data.log = vec![CommitInfo {
            hash: "abc123".to_string(),
            subject: "a subject".to_string(),
            date: "3 days ago".to_string(),
            author: "Alice".to_string(),
            refs: Some("HEAD -> main".to_string()),
        }];

        let (files, mut commits, mut diffs, collapsed) = empty_sets();
        commits.insert("abc123".to_string());
        diffs.insert(
            "abc123".to_string(),
            std::sync::Arc::new(gitbuf_core::parse::diff(
                "diff --git a/x.txt b/x.txt\n--- a/x.txt\n+++ b/x.txt\n@@ -1 +1 @@\n-old\n+new\n",
            )),
        );
        let view = view(&files, &commits, &diffs, &collapsed);
        let (_tree, rendered) = render_status(&data, &view);

        assert!(rendered
            .text
            .contains("  abc123 3 days ago  a subject (HEAD -> main)"));
        assert!(rendered.text.contains("    diff --git a/x.txt b/x.txt"));
        assert!(rendered.text.contains("    +new"));
    }

    #[test]
    fn cursor_is_clamped_to_the_rendered_text() {
        let (files, commits, diffs, collapsed) = empty_sets();
        let mut view = view(&files, &commits, &diffs, &collapsed);
        view.saved_cursor = usize::MAX;
        let (_tree, rendered) = render_status(&sample_data(), &view);
        assert_eq!(rendered.cursor, rendered.text.len() - 1);
    }

    #[test]
    fn stashes_render_reference_and_message() {
        let mut data = sample_data();
        data.stashes = vec![gitbuf_core::domain::StashInfo {
            reference: "stash@{0}".to_string(),
            message: "WIP on main".to_string(),
        }];

        let (files, commits, diffs, collapsed) = empty_sets();
        let view = view(&files, &commits, &diffs, &collapsed);
        let (_tree, rendered) = render_status(&data, &view);
        assert!(rendered.text.contains("Stashes (1)"));
        assert!(rendered.text.contains("  stash@{0}: WIP on main"));
    }
}
