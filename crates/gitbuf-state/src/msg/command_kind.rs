/// Classifies a finished git command so the reducer knows what follow-up
/// the completion needs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Branch,
    Commit,
    Push,
    Pull,
    Fetch,
    Merge,
    Rebase,
    CherryPick,
    Reset,
    Tag,
    Checkout,
    Log,
    Diff,
    StashPush,
    StashPop,
    StashApply,
    StashDrop,
    StashList,
    StageHunk,
    UnstageHunk,
    DiscardHunk,
    StagePaths,
    UnstagePaths,
    DiscardPaths,
    DeleteUntracked,
    ShowCommit { hash: String },
    StashShow { reference: String },
}

impl CommandKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Commit => "commit",
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Fetch => "fetch",
            Self::Merge => "merge",
            Self::Rebase => "rebase",
            Self::CherryPick => "cherry-pick",
            Self::Reset => "reset",
            Self::Tag => "tag",
            Self::Checkout => "checkout",
            Self::Log => "log",
            Self::Diff => "diff",
            Self::StashPush => "stash push",
            Self::StashPop => "stash pop",
            Self::StashApply => "stash apply",
            Self::StashDrop => "stash drop",
            Self::StashList => "stash list",
            Self::StageHunk => "stage hunk",
            Self::UnstageHunk => "unstage hunk",
            Self::DiscardHunk => "discard hunk",
            Self::StagePaths => "stage",
            Self::UnstagePaths => "unstage",
            Self::DiscardPaths => "discard",
            Self::DeleteUntracked => "delete",
            Self::ShowCommit { .. } => "show",
            Self::StashShow { .. } => "stash show",
        }
    }

    /// Whether completion should reconcile the status buffer with a
    /// refresh. Read-only views don't.
    pub fn refreshes_status(&self) -> bool {
        !matches!(
            self,
            Self::Log | Self::Diff | Self::StashList | Self::ShowCommit { .. } | Self::StashShow { .. }
        )
    }

    /// Whether the command may have rewritten worktree files, requiring
    /// open file buffers to be reverted.
    pub fn changes_worktree(&self) -> bool {
        matches!(
            self,
            Self::Checkout | Self::Pull | Self::StashPop | Self::StashApply | Self::Merge | Self::Rebase
        )
    }

    pub fn is_hunk_op(&self) -> bool {
        matches!(self, Self::StageHunk | Self::UnstageHunk | Self::DiscardHunk)
    }
}
