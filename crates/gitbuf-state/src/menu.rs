//! The declarative command/flag matrix behind the transient menus.
//!
//! Each entry names a suffix action: the git subcommand it runs, the
//! switches its menu exposes, and where its positional argument comes
//! from. The transient widget owns the key/flag UI; `build_args` turns
//! the widget's state into an argv.

use crate::msg::CommandKind;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MenuCategory {
    Branch,
    Commit,
    Push,
    Pull,
    Fetch,
    Stash,
    Merge,
    Rebase,
    CherryPick,
    Reset,
    Tag,
    Log,
    Diff,
}

/// A boolean infix: `-x` on the menu maps to one git argument.
#[derive(Clone, Copy, Debug)]
pub struct Switch {
    pub key: char,
    pub arg: &'static str,
}

/// A value-carrying infix; the value is appended directly to `arg`
/// (`--author=` + `alice`, `-n` + `64`).
#[derive(Clone, Copy, Debug)]
pub struct OptionArg {
    pub key: char,
    pub arg: &'static str,
}

/// Where the suffix's positional argument comes from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Positional {
    None,
    /// Free-form prompt (rev, range, message for stash push, …).
    Prompt,
    /// Candidate picker (branch, remote, stash, tag).
    Picker,
    /// The configured upstream ref.
    Upstream,
    /// The push-remote cascade.
    PushRemote,
    /// The commit-message buffer; emitted as `-m <text>`.
    Message,
}

#[derive(Clone, Debug)]
pub struct MenuEntry {
    pub category: MenuCategory,
    pub key: &'static str,
    pub label: &'static str,
    pub args: &'static [&'static str],
    pub switches: &'static [Switch],
    pub options: &'static [OptionArg],
    pub positional: Positional,
    pub kind: CommandKind,
}

const COMMIT_SWITCHES: &[Switch] = &[
    Switch { key: 'a', arg: "--all" },
    Switch { key: 'e', arg: "--allow-empty" },
    Switch { key: 'n', arg: "--no-verify" },
    Switch { key: 's', arg: "--signoff" },
    Switch { key: 'R', arg: "--reset-author" },
    Switch { key: 'v', arg: "--verbose" },
];

const PUSH_SWITCHES: &[Switch] = &[
    Switch { key: 'f', arg: "--force-with-lease" },
    Switch { key: 'F', arg: "--force" },
    Switch { key: 'n', arg: "--no-verify" },
    Switch { key: 'u', arg: "--set-upstream" },
    Switch { key: 'h', arg: "--dry-run" },
];

const PULL_SWITCHES: &[Switch] = &[
    Switch { key: 'f', arg: "--ff-only" },
    Switch { key: 'r', arg: "--rebase" },
    Switch { key: 'A', arg: "--autostash" },
    Switch { key: 'n', arg: "--no-ff" },
    Switch { key: 'N', arg: "--no-rebase" },
];

const FETCH_SWITCHES: &[Switch] = &[
    Switch { key: 'p', arg: "--prune" },
    Switch { key: 't', arg: "--tags" },
    Switch { key: 'v', arg: "--verbose" },
];

const STASH_SWITCHES: &[Switch] = &[
    Switch { key: 'u', arg: "--include-untracked" },
    Switch { key: 'a', arg: "--all" },
    Switch { key: 'k', arg: "--keep-index" },
];

const MERGE_SWITCHES: &[Switch] = &[
    Switch { key: 'f', arg: "--ff-only" },
    Switch { key: 'n', arg: "--no-ff" },
    Switch { key: 's', arg: "--squash" },
    Switch { key: 'c', arg: "--no-commit" },
];

const REBASE_SWITCHES: &[Switch] = &[
    Switch { key: 'A', arg: "--autostash" },
    Switch { key: 'i', arg: "--interactive" },
    Switch { key: 'a', arg: "--autosquash" },
];

const CHERRY_PICK_SWITCHES: &[Switch] = &[
    Switch { key: 'n', arg: "--no-commit" },
    Switch { key: 'e', arg: "--edit" },
];

const LOG_SWITCHES: &[Switch] = &[
    Switch { key: 'a', arg: "--all" },
    Switch { key: 'd', arg: "--decorate" },
    Switch { key: 'g', arg: "--graph" },
];

const LOG_OPTIONS: &[OptionArg] = &[
    OptionArg { key: 'N', arg: "-n" },
    OptionArg { key: 'A', arg: "--author=" },
    OptionArg { key: 'S', arg: "--since=" },
    OptionArg { key: 'G', arg: "--grep=" },
];

const DIFF_SWITCHES: &[Switch] = &[
    Switch { key: 'w', arg: "-w" },
    Switch { key: 's', arg: "--stat" },
    Switch { key: 'c', arg: "--cached" },
];

const TAG_OPTIONS: &[OptionArg] = &[OptionArg { key: 'm', arg: "-m" }];

macro_rules! entry {
    ($category:ident, $key:literal, $label:literal, [$($arg:literal),*],
     $switches:expr, $options:expr, $positional:ident, $kind:expr) => {
        MenuEntry {
            category: MenuCategory::$category,
            key: $key,
            label: $label,
            args: &[$($arg),*],
            switches: $switches,
            options: $options,
            positional: Positional::$positional,
            kind: $kind,
        }
    };
}

const NO_SWITCHES: &[Switch] = &[];
const NO_OPTIONS: &[OptionArg] = &[];

pub const ENTRIES: &[MenuEntry] = &[
    // branch
    entry!(Branch, "b", "checkout", ["checkout"], NO_SWITCHES, NO_OPTIONS, Picker, CommandKind::Checkout),
    entry!(Branch, "c", "create and checkout", ["checkout", "-b"], NO_SWITCHES, NO_OPTIONS, Prompt, CommandKind::Checkout),
    entry!(Branch, "x", "delete", ["branch", "-d"], NO_SWITCHES, NO_OPTIONS, Picker, CommandKind::Branch),
    // commit
    entry!(Commit, "c", "commit", ["commit"], COMMIT_SWITCHES, NO_OPTIONS, Message, CommandKind::Commit),
    entry!(Commit, "a", "amend", ["commit", "--amend"], COMMIT_SWITCHES, NO_OPTIONS, Message, CommandKind::Commit),
    entry!(Commit, "w", "reword", ["commit", "--amend", "--only"], COMMIT_SWITCHES, NO_OPTIONS, Message, CommandKind::Commit),
    // push
    entry!(Push, "p", "push to push-remote", ["push"], PUSH_SWITCHES, NO_OPTIONS, PushRemote, CommandKind::Push),
    entry!(Push, "u", "push to upstream", ["push"], PUSH_SWITCHES, NO_OPTIONS, Upstream, CommandKind::Push),
    entry!(Push, "e", "push elsewhere", ["push"], PUSH_SWITCHES, NO_OPTIONS, Picker, CommandKind::Push),
    // pull
    entry!(Pull, "p", "pull from push-remote", ["pull"], PULL_SWITCHES, NO_OPTIONS, PushRemote, CommandKind::Pull),
    entry!(Pull, "u", "pull from upstream", ["pull"], PULL_SWITCHES, NO_OPTIONS, Upstream, CommandKind::Pull),
    entry!(Pull, "e", "pull elsewhere", ["pull"], PULL_SWITCHES, NO_OPTIONS, Prompt, CommandKind::Pull),
    // fetch
    entry!(Fetch, "p", "fetch from push-remote", ["fetch"], FETCH_SWITCHES, NO_OPTIONS, PushRemote, CommandKind::Fetch),
    entry!(Fetch, "u", "fetch from upstream", ["fetch"], FETCH_SWITCHES, NO_OPTIONS, Upstream, CommandKind::Fetch),
    entry!(Fetch, "e", "fetch remote", ["fetch"], FETCH_SWITCHES, NO_OPTIONS, Picker, CommandKind::Fetch),
    entry!(Fetch, "a", "fetch all remotes", ["fetch", "--all"], FETCH_SWITCHES, NO_OPTIONS, None, CommandKind::Fetch),
    // stash
    entry!(Stash, "z", "stash", ["stash", "push"], STASH_SWITCHES, NO_OPTIONS, Message, CommandKind::StashPush),
    entry!(Stash, "i", "stash index", ["stash", "push", "--staged"], STASH_SWITCHES, NO_OPTIONS, Message, CommandKind::StashPush),
    entry!(Stash, "p", "pop", ["stash", "pop"], NO_SWITCHES, NO_OPTIONS, Picker, CommandKind::StashPop),
    entry!(Stash, "a", "apply", ["stash", "apply"], NO_SWITCHES, NO_OPTIONS, Picker, CommandKind::StashApply),
    entry!(Stash, "x", "drop", ["stash", "drop"], NO_SWITCHES, NO_OPTIONS, Picker, CommandKind::StashDrop),
    entry!(Stash, "v", "show", ["stash", "show", "-p"], NO_SWITCHES, NO_OPTIONS, Picker, CommandKind::StashList),
    entry!(Stash, "l", "list", ["stash", "list"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::StashList),
    // merge
    entry!(Merge, "m", "merge", ["merge"], MERGE_SWITCHES, NO_OPTIONS, Picker, CommandKind::Merge),
    entry!(Merge, "a", "abort", ["merge", "--abort"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::Merge),
    // rebase
    entry!(Rebase, "u", "rebase onto upstream", ["rebase"], REBASE_SWITCHES, NO_OPTIONS, Upstream, CommandKind::Rebase),
    entry!(Rebase, "e", "rebase onto branch", ["rebase"], REBASE_SWITCHES, NO_OPTIONS, Picker, CommandKind::Rebase),
    entry!(Rebase, "s", "rebase onto rev", ["rebase"], REBASE_SWITCHES, NO_OPTIONS, Prompt, CommandKind::Rebase),
    entry!(Rebase, "c", "continue", ["rebase", "--continue"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::Rebase),
    entry!(Rebase, "k", "skip", ["rebase", "--skip"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::Rebase),
    entry!(Rebase, "a", "abort", ["rebase", "--abort"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::Rebase),
    // cherry-pick
    entry!(CherryPick, "c", "cherry-pick", ["cherry-pick"], CHERRY_PICK_SWITCHES, NO_OPTIONS, Prompt, CommandKind::CherryPick),
    entry!(CherryPick, "C", "continue", ["cherry-pick", "--continue"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::CherryPick),
    entry!(CherryPick, "a", "abort", ["cherry-pick", "--abort"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::CherryPick),
    // reset
    entry!(Reset, "s", "reset soft", ["reset", "--soft"], NO_SWITCHES, NO_OPTIONS, Prompt, CommandKind::Reset),
    entry!(Reset, "m", "reset mixed", ["reset", "--mixed"], NO_SWITCHES, NO_OPTIONS, Prompt, CommandKind::Reset),
    entry!(Reset, "h", "reset hard", ["reset", "--hard"], NO_SWITCHES, NO_OPTIONS, Prompt, CommandKind::Reset),
    // tag
    entry!(Tag, "t", "create", ["tag"], NO_SWITCHES, TAG_OPTIONS, Prompt, CommandKind::Tag),
    entry!(Tag, "x", "delete", ["tag", "-d"], NO_SWITCHES, NO_OPTIONS, Picker, CommandKind::Tag),
    entry!(Tag, "l", "list", ["tag", "--list"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::Tag),
    // log
    entry!(Log, "l", "log current", ["log"], LOG_SWITCHES, LOG_OPTIONS, None, CommandKind::Log),
    entry!(Log, "b", "log branch", ["log"], LOG_SWITCHES, LOG_OPTIONS, Picker, CommandKind::Log),
    entry!(Log, "f", "log file", ["log", "--follow", "--"], LOG_SWITCHES, LOG_OPTIONS, Prompt, CommandKind::Log),
    entry!(Log, "r", "reflog", ["reflog"], NO_SWITCHES, NO_OPTIONS, None, CommandKind::Log),
    // diff
    entry!(Diff, "d", "diff rev or range", ["diff"], DIFF_SWITCHES, NO_OPTIONS, Prompt, CommandKind::Diff),
];

pub fn entry(category: MenuCategory, key: &str) -> Option<&'static MenuEntry> {
    ENTRIES
        .iter()
        .find(|e| e.category == category && e.key == key)
}

pub fn entries_for(category: MenuCategory) -> impl Iterator<Item = &'static MenuEntry> {
    ENTRIES.iter().filter(move |e| e.category == category)
}

/// Assemble the argv for an entry from the transient's current state.
///
/// Positional values other than commit messages are whitespace-split, so a
/// resolved `origin main` pair lands as two arguments.
pub fn build_args(
    entry: &MenuEntry,
    enabled: &[char],
    options: &[(char, String)],
    positional: Option<&str>,
) -> Vec<String> {
    let mut args: Vec<String> = entry.args.iter().map(|s| s.to_string()).collect();

    for switch in entry.switches {
        if enabled.contains(&switch.key) {
            args.push(switch.arg.to_string());
        }
    }
    for spec in entry.options {
        if let Some((_, value)) = options.iter().find(|(key, _)| *key == spec.key) {
            args.push(format!("{}{value}", spec.arg));
        }
    }

    if let Some(value) = positional {
        match entry.positional {
            Positional::Message => {
                args.push("-m".to_string());
                args.push(value.to_string());
            }
            Positional::None => {}
            _ => args.extend(value.split_whitespace().map(String::from)),
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_builds_message_and_flags() {
        let entry = entry(MenuCategory::Commit, "c").unwrap();
        let args = build_args(entry, &['a', 's'], &[], Some("fix the thing"));
        assert_eq!(args, ["commit", "--all", "--signoff", "-m", "fix the thing"]);
    }

    #[test]
    fn amend_carries_the_amend_flag() {
        let entry = entry(MenuCategory::Commit, "a").unwrap();
        let args = build_args(entry, &[], &[], Some("msg"));
        assert_eq!(args[..2], ["commit", "--amend"]);
    }

    #[test]
    fn push_switches_map_to_git_arguments() {
        let entry = entry(MenuCategory::Push, "p").unwrap();
        let args = build_args(entry, &['f', 'u'], &[], Some("origin main"));
        assert_eq!(
            args,
            ["push", "--force-with-lease", "--set-upstream", "origin", "main"]
        );
    }

    #[test]
    fn log_options_append_their_values() {
        let entry = entry(MenuCategory::Log, "l").unwrap();
        let args = build_args(
            entry,
            &['g'],
            &[('N', "64".to_string()), ('A', "alice".to_string())],
            None,
        );
        assert_eq!(args, ["log", "--graph", "-n64", "--author=alice"]);
    }

    #[test]
    fn stash_show_takes_a_picked_reference() {
        let entry = entry(MenuCategory::Stash, "v").unwrap();
        let args = build_args(entry, &[], &[], Some("stash@{1}"));
        assert_eq!(args, ["stash", "show", "-p", "stash@{1}"]);
    }

    #[test]
    fn reset_modes_are_distinct_entries() {
        for (key, flag) in [("s", "--soft"), ("m", "--mixed"), ("h", "--hard")] {
            let entry = entry(MenuCategory::Reset, key).unwrap();
            let args = build_args(entry, &[], &[], Some("HEAD~1"));
            assert_eq!(args, ["reset", flag, "HEAD~1"]);
        }
    }

    #[test]
    fn every_category_has_entries_and_unique_keys() {
        use std::collections::HashSet;
        let mut seen: HashSet<(MenuCategory, &str)> = HashSet::new();
        for entry in ENTRIES {
            assert!(
                seen.insert((entry.category, entry.key)),
                "duplicate key {:?}/{}",
                entry.category,
                entry.key
            );
        }
        for category in [
            MenuCategory::Branch,
            MenuCategory::Commit,
            MenuCategory::Push,
            MenuCategory::Pull,
            MenuCategory::Fetch,
            MenuCategory::Stash,
            MenuCategory::Merge,
            MenuCategory::Rebase,
            MenuCategory::CherryPick,
            MenuCategory::Reset,
            MenuCategory::Tag,
            MenuCategory::Log,
            MenuCategory::Diff,
        ] {
            assert!(entries_for(category).next().is_some());
        }
    }
}
