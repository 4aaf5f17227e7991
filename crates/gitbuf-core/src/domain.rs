//! Parsed git data and the keys the status buffer is organized around.

/// The `# branch.*` header lines of a porcelain-v2 status.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BranchHeader {
    pub oid: String,
    pub head: String,
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StatusEntry {
    Changed {
        xy: String,
        path: String,
    },
    Renamed {
        xy: String,
        path: String,
        orig_path: String,
    },
    Unmerged {
        xy: String,
        path: String,
    },
    Untracked {
        path: String,
    },
}

impl StatusEntry {
    pub fn path(&self) -> &str {
        match self {
            Self::Changed { path, .. }
            | Self::Renamed { path, .. }
            | Self::Unmerged { path, .. }
            | Self::Untracked { path } => path,
        }
    }

    pub fn xy(&self) -> Option<&str> {
        match self {
            Self::Changed { xy, .. } | Self::Renamed { xy, .. } | Self::Unmerged { xy, .. } => {
                Some(xy)
            }
            Self::Untracked { .. } => None,
        }
    }

    /// The index side of the two-character code has a change.
    pub fn staged(&self) -> bool {
        self.xy()
            .and_then(|xy| xy.chars().next())
            .is_some_and(|c| c != '.')
    }

    /// The worktree side of the two-character code has a change.
    pub fn unstaged(&self) -> bool {
        self.xy()
            .and_then(|xy| xy.chars().nth(1))
            .is_some_and(|c| c != '.')
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusSnapshot {
    pub branch: BranchHeader,
    pub entries: Vec<StatusEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiffHunk {
    /// The raw `@@ … @@` line.
    pub header: String,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub context: Option<String>,
    /// Raw diff lines, each starting with ` `, `+`, `-` or `\`.
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileDiff {
    /// The raw `diff --git …` line.
    pub header: String,
    /// New path; absent for deletions.
    pub file: Option<String>,
    /// Old path; absent for additions.
    pub old_file: Option<String>,
    pub binary: bool,
    pub hunks: Vec<DiffHunk>,
}

impl FileDiff {
    /// The post-image path, substituting the old path for deletions.
    pub fn new_path(&self) -> Option<&str> {
        self.file.as_deref().or(self.old_file.as_deref())
    }

    /// The pre-image path, substituting the new path for additions.
    pub fn old_path(&self) -> Option<&str> {
        self.old_file.as_deref().or(self.file.as_deref())
    }

    pub fn matches_path(&self, path: &str) -> bool {
        self.file.as_deref() == Some(path) || self.old_file.as_deref() == Some(path)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiffArea {
    Unstaged,
    Staged,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitInfo {
    pub hash: String,
    pub subject: String,
    /// Relative date, e.g. `3 days ago`.
    pub date: String,
    pub author: String,
    pub refs: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StashInfo {
    /// `stash@{N}`
    pub reference: String,
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BranchInfo {
    pub name: String,
    pub target: String,
    pub current: bool,
    pub remote: bool,
}

/// The top-level groups of the status buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StatusKey {
    Untracked,
    Unstaged,
    Staged,
    Unpushed,
    Unpulled,
    Log,
    Stash,
}

impl StatusKey {
    pub fn title(self) -> &'static str {
        match self {
            Self::Untracked => "Untracked files",
            Self::Unstaged => "Unstaged changes",
            Self::Staged => "Staged changes",
            Self::Unpushed => "Unpushed commits",
            Self::Unpulled => "Unpulled commits",
            Self::Log => "Recent commits",
            Self::Stash => "Stashes",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Untracked => "untracked",
            Self::Unstaged => "unstaged",
            Self::Staged => "staged",
            Self::Unpushed => "unpushed",
            Self::Unpulled => "unpulled",
            Self::Log => "log",
            Self::Stash => "stash",
        }
    }
}

/// Key identifying a file's inline-diff state uniquely between the Staged
/// and Unstaged groups.
pub fn expand_key(key: StatusKey, path: &str) -> String {
    format!("{}:{path}", key.as_str())
}

/// Human-readable change type for a file row.
///
/// The Staged group reads the index character; every other group reads the
/// worktree character only.
pub fn change_type(xy: &str, key: StatusKey) -> &'static str {
    let mut chars = xy.chars();
    let index = chars.next().unwrap_or('.');
    let worktree = chars.next().unwrap_or('.');
    let index = match key {
        StatusKey::Staged => index,
        _ => '.',
    };
    match index {
        'M' => "modified",
        'A' => "new file",
        'D' => "deleted",
        'R' => "renamed",
        'C' => "copied",
        _ => match worktree {
            'M' => "modified",
            'D' => "deleted",
            _ => "changed",
        },
    }
}

/// Face keys attached to rendered lines; the host maps them to its theme.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Heading,
    SectionHeading,
    FileRow,
    DiffHunkHeader,
    DiffAdd,
    DiffRemove,
    DiffContext,
    CommitRow,
    StashRow,
}

impl Face {
    pub fn is_diff(self) -> bool {
        matches!(
            self,
            Self::DiffHunkHeader | Self::DiffAdd | Self::DiffRemove | Self::DiffContext
        )
    }
}
