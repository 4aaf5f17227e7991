mod command_kind;
mod effect;
mod message;

pub use command_kind::CommandKind;
pub use effect::{Effect, SnapshotSlot};
pub use message::{Msg, SnapshotData};

use crate::model::BufferId;
use std::path::PathBuf;

/// Everything the host editor reacts to.
#[derive(Clone, Debug)]
pub enum StoreEvent {
    /// Emitted after every reduced message; the host re-reads the snapshot.
    StateChanged,
    /// A full status render for this buffer finished.
    StatusRefreshed { id: BufferId },
    CommitFinished { id: BufferId, exit: i32 },
    CommandFinished {
        id: BufferId,
        kind: CommandKind,
        exit: i32,
    },
    /// One-line message for the echo area.
    UserMessage { message: String },
    /// Open the working copy at a 0-indexed line.
    VisitFile { path: PathBuf, line: usize },
    /// Open a read-only view buffer holding `content`.
    VisitBlob {
        title: String,
        content: String,
        line: usize,
    },
    /// Open a read-only diff view.
    VisitDiff { title: String, text: String },
    /// A command rewrote the worktree; unmodified file-backed buffers
    /// should be reloaded from disk.
    RevertFileBuffers,
}
