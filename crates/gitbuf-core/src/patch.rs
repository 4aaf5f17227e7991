//! Construction of standalone patches from parsed diffs.
//!
//! Patches are fed to `git apply` on stdin; the file header always uses
//! `a/` and `b/` prefixes, substituting the opposite-side path for
//! additions and deletions (the parsed diff has already normalized
//! `/dev/null` away).

use crate::domain::{DiffHunk, FileDiff};

fn file_header(diff: &FileDiff) -> String {
    let old = diff.old_path().unwrap_or_default();
    let new = diff.new_path().unwrap_or_default();
    format!("diff --git a/{old} b/{new}\n--- a/{old}\n+++ b/{new}\n")
}

/// A standalone patch applying one whole hunk of `diff`.
pub fn hunk_patch(diff: &FileDiff, hunk: &DiffHunk) -> String {
    let mut out = file_header(diff);
    out.push_str(&hunk.header);
    out.push('\n');
    for line in &hunk.lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// A standalone patch applying only the hunk lines in the inclusive offset
/// range `[start, end]`.
///
/// Unselected additions are dropped; unselected deletions become context,
/// so the line is present on both sides and the remainder of the hunk
/// still aligns. The hunk header is re-synthesized from the resulting
/// counts. Returns `None` when the range is out of bounds or selects no
/// change.
///
/// With `reverse`, the constructed patch additionally gets the
/// [`reverse_patch`] transform applied, for use with `git apply --reverse`.
pub fn region_patch(
    diff: &FileDiff,
    hunk: &DiffHunk,
    start: usize,
    end: usize,
    reverse: bool,
) -> Option<String> {
    if start > end || end >= hunk.lines.len() {
        return None;
    }

    let mut old_count: u32 = 0;
    let mut new_count: u32 = 0;
    let mut body = String::new();
    let mut has_change = false;
    let mut prev_included = false;

    for (ix, line) in hunk.lines.iter().enumerate() {
        let selected = start <= ix && ix <= end;

        if line.starts_with('\\') {
            // `\ No newline at end of file` belongs to the previous line.
            if prev_included {
                body.push_str(line);
                body.push('\n');
            }
            continue;
        }

        match line.chars().next() {
            Some(' ') => {
                body.push_str(line);
                body.push('\n');
                old_count += 1;
                new_count += 1;
                prev_included = true;
            }
            Some('+') => {
                if selected {
                    body.push_str(line);
                    body.push('\n');
                    new_count += 1;
                    has_change = true;
                    prev_included = true;
                } else {
                    prev_included = false;
                }
            }
            Some('-') => {
                if selected {
                    body.push_str(line);
                    body.push('\n');
                    old_count += 1;
                    has_change = true;
                } else {
                    body.push(' ');
                    body.push_str(&line[1..]);
                    body.push('\n');
                    old_count += 1;
                    new_count += 1;
                }
                prev_included = true;
            }
            _ => {
                body.push_str(line);
                body.push('\n');
                prev_included = true;
            }
        }
    }

    if !has_change {
        return None;
    }

    let mut out = file_header(diff);
    out.push_str(&format!(
        "@@ -{},{old_count} +{},{new_count} @@\n",
        hunk.old_start, hunk.new_start
    ));
    out.push_str(&body);

    Some(if reverse { reverse_patch(&out) } else { out })
}

/// Swap the sense of a patch line-wise: leading `+` and `-` are exchanged;
/// the `--- ` / `+++ ` file markers are left alone.
pub fn reverse_patch(patch: &str) -> String {
    let mut out = String::with_capacity(patch.len());
    for line in patch.lines() {
        if line.starts_with("+++ ") || line.starts_with("--- ") {
            out.push_str(line);
        } else if let Some(rest) = line.strip_prefix('+') {
            out.push('-');
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix('-') {
            out.push('+');
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hunk(header: &str, lines: &[&str]) -> DiffHunk {
        let parsed = crate::parse::diff(&format!(
            "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n{header}\n{}\n",
            lines.join("\n")
        ));
        parsed[0].hunks[0].clone()
    }

    fn file() -> FileDiff {
        FileDiff {
            header: "diff --git a/f.txt b/f.txt".to_string(),
            file: Some("f.txt".to_string()),
            old_file: Some("f.txt".to_string()),
            ..FileDiff::default()
        }
    }

    #[test]
    fn hunk_patch_carries_file_header_and_all_lines() {
        let hunk = hunk("@@ -1,2 +1,3 @@", &[" ctx", "+new", " ctx2"]);
        let patch = hunk_patch(&file(), &hunk);
        assert_eq!(
            patch,
            "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n\
             @@ -1,2 +1,3 @@\n ctx\n+new\n ctx2\n"
        );
    }

    #[test]
    fn new_file_header_substitutes_the_new_path_on_both_sides() {
        let diff = FileDiff {
            header: "diff --git a/new.txt b/new.txt".to_string(),
            file: Some("new.txt".to_string()),
            old_file: None,
            ..FileDiff::default()
        };
        let hunk = hunk("@@ -0,0 +1,1 @@", &["+hello"]);
        let patch = hunk_patch(&diff, &hunk);
        assert!(patch.starts_with(
            "diff --git a/new.txt b/new.txt\n--- a/new.txt\n+++ b/new.txt\n"
        ));
    }

    #[test]
    fn region_patch_converts_unselected_additions_to_context() {
        let hunk = hunk("@@ -10,3 +10,4 @@", &[" ctx", "+add1", "+add2", " ctx"]);
        let patch = region_patch(&file(), &hunk, 1, 1, false).expect("patch");
        let lines: Vec<&str> = patch.lines().collect();
        assert_eq!(lines[3], "@@ -10,3 +10,4 @@");
        assert_eq!(&lines[4..], &[" ctx", "+add1", " ctx"]);
    }

    #[test]
    fn region_patch_converts_unselected_deletions_to_context() {
        let hunk = hunk("@@ -1,4 +1,3 @@", &[" a", "-b", "-c", " d"]);
        let patch = region_patch(&file(), &hunk, 2, 2, false).expect("patch");
        let lines: Vec<&str> = patch.lines().collect();
        assert_eq!(lines[3], "@@ -1,4 +1,3 @@");
        assert_eq!(&lines[4..], &[" a", " b", "-c", " d"]);
    }

    #[test]
    fn region_patch_over_full_range_matches_the_whole_hunk() {
        let hunk = hunk("@@ -5,3 +5,4 @@", &[" ctx", "-old", "+new", "+more", " ctx"]);
        let whole = hunk_patch(&file(), &hunk);
        let region = region_patch(&file(), &hunk, 0, hunk.lines.len() - 1, false).expect("patch");
        assert_eq!(region, whole);
    }

    #[test]
    fn region_patch_counts_follow_the_selection() {
        let hunk = hunk(
            "@@ -1,4 +1,5 @@",
            &[" a", "+add1", "-del1", "+add2", "-del2", " b"],
        );
        // Select only offsets 1..=2 (add1, del1).
        let patch = region_patch(&file(), &hunk, 1, 2, false).expect("patch");
        // context(2) + selected del(1) + unselected del(1 as context)
        //   -> old side 4
        // context(2) + selected add(1) + unselected del(1 as context)
        //   -> new side 4
        assert!(patch.contains("@@ -1,4 +1,4 @@"));
    }

    #[test]
    fn region_patch_rejects_out_of_range_and_changeless_selections() {
        let hunk = hunk("@@ -1,2 +1,2 @@", &[" a", " b"]);
        assert!(region_patch(&file(), &hunk, 0, 5, false).is_none());
        assert!(region_patch(&file(), &hunk, 0, 1, false).is_none());
    }

    #[test]
    fn reverse_swaps_change_lines_but_not_file_markers() {
        let patch = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n\
                     @@ -1,2 +1,3 @@\n ctx\n+new\n ctx\n";
        let reversed = reverse_patch(patch);
        assert!(reversed.contains("\n-new\n"));
        assert!(reversed.contains("\n--- a/f.txt\n"));
        assert!(reversed.contains("\n+++ b/f.txt\n"));
    }

    #[test]
    fn reverse_is_an_involution() {
        let hunk = hunk("@@ -1,3 +1,3 @@", &[" a", "-b", "+c", " d"]);
        let patch = hunk_patch(&file(), &hunk);
        assert_eq!(reverse_patch(&reverse_patch(&patch)), patch);
    }

    #[test]
    fn reversed_region_patch_equals_reverse_of_forward() {
        let hunk = hunk("@@ -1,3 +1,4 @@", &[" a", "+b", "-c", " d"]);
        let forward = region_patch(&file(), &hunk, 1, 2, false).expect("patch");
        let reversed = region_patch(&file(), &hunk, 1, 2, true).expect("patch");
        assert_eq!(reversed, reverse_patch(&forward));
    }

    #[test]
    fn hunk_patches_reparse_to_the_original_hunks() {
        let source = "\
diff --git a/f.txt b/f.txt
--- a/f.txt
+++ b/f.txt
@@ -1,3 +1,4 @@
 one
+two
-three
 four
@@ -10,2 +11,2 @@
 x
-y
+z
";
        let files = crate::parse::diff(source);
        let original = &files[0];

        let mut joined = String::new();
        for hunk in &original.hunks {
            joined.push_str(&hunk_patch(original, hunk));
        }

        let reparsed = crate::parse::diff(&joined);
        let hunks: Vec<_> = reparsed.iter().flat_map(|f| f.hunks.clone()).collect();
        assert_eq!(hunks.len(), original.hunks.len());
        for (a, b) in hunks.iter().zip(&original.hunks) {
            assert_eq!(a.lines, b.lines);
            assert_eq!(
                (a.old_start, a.old_count, a.new_start, a.new_count),
                (b.old_start, b.old_count, b.new_start, b.new_count)
            );
        }
    }
}
