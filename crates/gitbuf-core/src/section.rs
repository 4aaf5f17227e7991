//! The section tree behind a rendered status buffer.
//!
//! Nodes live in a per-tree arena and reference their parent by index, so
//! the tree can be rebuilt wholesale on every refresh without ownership
//! cycles. Spans are line ranges into the rendered buffer; a collapsed
//! node may span lines that are not currently rendered (its hidden
//! children), which navigation accounts for by flattening only visible
//! nodes.

use crate::domain::{Face, StatusKey};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SectionId(pub usize);

/// Which parsed diff list a hunk node points into.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DiffSource {
    Unstaged,
    Staged,
    Commit(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SectionData {
    /// The `Head:` / `Upstream:` lines at the top of the buffer.
    Header,
    SectionHeader {
        key: StatusKey,
    },
    File {
        key: StatusKey,
        path: String,
        expand_key: String,
        /// Index of the matching file diff, when one exists.
        diff: Option<(DiffSource, usize)>,
    },
    Hunk {
        source: DiffSource,
        file_ix: usize,
        hunk_ix: usize,
    },
    Commit {
        hash: String,
    },
    Stash {
        reference: String,
    },
}

#[derive(Clone, Debug)]
pub struct Section {
    pub data: SectionData,
    /// First line of the node's span, 0-indexed.
    pub start_line: usize,
    /// Last line of the node's span, inclusive.
    pub end_line: usize,
    pub collapsed: bool,
    pub face: Face,
    pub parent: Option<SectionId>,
    pub children: Vec<SectionId>,
}

impl Section {
    pub fn new(data: SectionData, start_line: usize, face: Face) -> Self {
        Self {
            data,
            start_line,
            end_line: start_line,
            collapsed: false,
            face,
            parent: None,
            children: Vec::new(),
        }
    }

    fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

#[derive(Clone, Debug, Default)]
pub struct SectionTree {
    nodes: Vec<Section>,
    roots: Vec<SectionId>,
}

impl SectionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, wiring the parent/child references.
    pub fn push(&mut self, mut section: Section, parent: Option<SectionId>) -> SectionId {
        let id = SectionId(self.nodes.len());
        section.parent = parent;
        self.nodes.push(section);
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn get(&self, id: SectionId) -> &Section {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: SectionId) -> &mut Section {
        &mut self.nodes[id.0]
    }

    pub fn roots(&self) -> &[SectionId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = SectionId> {
        (0..self.nodes.len()).map(SectionId)
    }

    /// The deepest node whose span contains `line`, not descending into
    /// collapsed nodes (their children are not visible).
    pub fn section_at_line(&self, line: usize) -> Option<SectionId> {
        let mut found = None;
        let mut candidates: &[SectionId] = &self.roots;

        'descend: loop {
            for &id in candidates {
                let node = self.get(id);
                if node.contains(line) {
                    found = Some(id);
                    if node.collapsed || node.children.is_empty() {
                        break 'descend;
                    }
                    candidates = &node.children;
                    continue 'descend;
                }
            }
            break;
        }

        found
    }

    /// All nodes in buffer order, omitting descendants of collapsed nodes.
    pub fn visible_sections(&self) -> Vec<SectionId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<SectionId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = self.get(id);
            if !node.collapsed {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Start line of the first visible node after `line`.
    pub fn next_section_line(&self, line: usize) -> Option<usize> {
        self.visible_sections()
            .into_iter()
            .map(|id| self.get(id).start_line)
            .find(|&start| start > line)
    }

    /// Start line of the last visible node before `line`.
    pub fn prev_section_line(&self, line: usize) -> Option<usize> {
        self.visible_sections()
            .into_iter()
            .map(|id| self.get(id).start_line)
            .filter(|&start| start < line)
            .last()
    }

    fn siblings_of(&self, id: SectionId) -> &[SectionId] {
        match self.get(id).parent {
            Some(parent) => &self.get(parent).children,
            None => &self.roots,
        }
    }

    pub fn next_sibling_line(&self, line: usize) -> Option<usize> {
        let id = self.section_at_line(line)?;
        self.siblings_of(id)
            .iter()
            .map(|&sib| self.get(sib).start_line)
            .find(|&start| start > line)
    }

    pub fn prev_sibling_line(&self, line: usize) -> Option<usize> {
        let id = self.section_at_line(line)?;
        self.siblings_of(id)
            .iter()
            .map(|&sib| self.get(sib).start_line)
            .filter(|&start| start < line)
            .last()
    }

    pub fn parent_section_line(&self, line: usize) -> Option<usize> {
        let id = self.section_at_line(line)?;
        let parent = self.get(id).parent?;
        Some(self.get(parent).start_line)
    }

    /// Flip the collapsed flag of the node at `line` if it has children.
    /// Returns true when something changed.
    pub fn toggle_at_line(&mut self, line: usize) -> bool {
        let Some(id) = self.section_at_line(line) else {
            return false;
        };
        if self.get(id).children.is_empty() {
            return false;
        }
        let node = self.get_mut(id);
        node.collapsed = !node.collapsed;
        true
    }

    /// Collapse every node whose depth is at or below `level`; roots have
    /// depth 1, so level 1 collapses all top-level headings and level 4
    /// expands everything.
    pub fn set_visibility_level(&mut self, level: usize) {
        let mut stack: Vec<(SectionId, usize)> =
            self.roots.iter().map(|&id| (id, 1usize)).collect();
        while let Some((id, depth)) = stack.pop() {
            self.get_mut(id).collapsed = depth >= level;
            let children = self.get(id).children.clone();
            stack.extend(children.into_iter().map(|c| (c, depth + 1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(mut section: Section, end: usize) -> Section {
        section.end_line = end;
        section
    }

    fn section_header(key: StatusKey, start: usize, end: usize) -> Section {
        span(
            Section::new(SectionData::SectionHeader { key }, start, Face::SectionHeading),
            end,
        )
    }

    fn file(key: StatusKey, path: &str, start: usize, end: usize) -> Section {
        span(
            Section::new(
                SectionData::File {
                    key,
                    path: path.to_string(),
                    expand_key: crate::domain::expand_key(key, path),
                    diff: None,
                },
                start,
                Face::FileRow,
            ),
            end,
        )
    }

    /// Two sections with files, the second file carrying a hunk.
    fn sample_tree() -> SectionTree {
        let mut tree = SectionTree::new();
        let unstaged = tree.push(section_header(StatusKey::Unstaged, 0, 5), None);
        tree.push(file(StatusKey::Unstaged, "a.txt", 1, 1), Some(unstaged));
        let b = tree.push(file(StatusKey::Unstaged, "b.txt", 2, 5), Some(unstaged));
        tree.push(
            span(
                Section::new(
                    SectionData::Hunk {
                        source: DiffSource::Unstaged,
                        file_ix: 1,
                        hunk_ix: 0,
                    },
                    3,
                    Face::DiffHunkHeader,
                ),
                5,
            ),
            Some(b),
        );
        let staged = tree.push(section_header(StatusKey::Staged, 7, 8), None);
        tree.push(file(StatusKey::Staged, "c.txt", 8, 8), Some(staged));
        tree
    }

    #[test]
    fn lookup_returns_deepest_containing_node() {
        let tree = sample_tree();

        let id = tree.section_at_line(1).expect("node at line 1");
        assert!(matches!(
            &tree.get(id).data,
            SectionData::File { path, .. } if path == "a.txt"
        ));

        let id = tree.section_at_line(4).expect("node at line 4");
        assert!(matches!(tree.get(id).data, SectionData::Hunk { .. }));

        // A line inside a child never resolves to the parent while the
        // parent is expanded.
        let node = tree.get(id);
        assert!(node.start_line <= 4 && 4 <= node.end_line);
        assert!(node.children.is_empty());
    }

    #[test]
    fn spans_nest_within_parents() {
        let tree = sample_tree();
        for id in tree.iter_ids() {
            let node = tree.get(id);
            assert!(node.start_line <= node.end_line);
            for &child in &node.children {
                let child = tree.get(child);
                assert!(node.start_line <= child.start_line);
                assert!(child.end_line <= node.end_line);
            }
        }
    }

    #[test]
    fn navigation_skips_children_of_collapsed_nodes() {
        // Roots at 0 (collapsed, spanning its hidden children up to 50)
        // and 52.
        let mut tree = SectionTree::new();
        let top = tree.push(section_header(StatusKey::Unstaged, 0, 50), None);
        tree.push(file(StatusKey::Unstaged, "a.txt", 1, 50), Some(top));
        tree.get_mut(top).collapsed = true;
        tree.push(section_header(StatusKey::Staged, 52, 60), None);

        assert_eq!(tree.next_section_line(10), Some(52));
        let at = tree.section_at_line(10).expect("collapsed root");
        assert_eq!(tree.get(at).start_line, 0);
    }

    #[test]
    fn sibling_navigation_stays_on_one_level() {
        let tree = sample_tree();
        // From a.txt to b.txt, not into b's hunk.
        assert_eq!(tree.next_sibling_line(1), Some(2));
        assert_eq!(tree.prev_sibling_line(2), Some(1));
        // Across roots.
        assert_eq!(tree.next_sibling_line(0), Some(7));
        // Parent of a file row is its section heading.
        assert_eq!(tree.parent_section_line(2), Some(0));
    }

    #[test]
    fn toggle_only_affects_nodes_with_children() {
        let mut tree = sample_tree();
        assert!(!tree.toggle_at_line(1), "leaf file has nothing to toggle");
        assert!(tree.toggle_at_line(0));
        let root = tree.section_at_line(0).unwrap();
        assert!(tree.get(root).collapsed);
    }

    #[test]
    fn visibility_levels_collapse_by_depth() {
        let mut tree = sample_tree();

        tree.set_visibility_level(1);
        assert!(tree.iter_ids().all(|id| tree.get(id).collapsed));

        tree.set_visibility_level(2);
        let root = tree.roots()[0];
        assert!(!tree.get(root).collapsed);
        let file = tree.get(root).children[1];
        assert!(tree.get(file).collapsed);

        tree.set_visibility_level(4);
        assert!(tree.iter_ids().all(|id| !tree.get(id).collapsed));
    }
}
