//! Path resolution and wildcard expansion.

use super::document::walk;
use super::node::Node;
use crate::path::{join_segments, Path, DEFAULT_SEPARATOR, WILDCARD};
use crate::value::{Container, Entry, Key, Value};
use tracing::{debug, trace};

impl Node {
    /// Resolves a `/`-separated path relative to this node.
    pub fn resolve(&self, path: &str) -> Option<Node> {
        self.resolve_with(path, DEFAULT_SEPARATOR)
    }

    /// Resolves a path relative to this node.
    ///
    /// A path without wildcards walks one segment at a time and returns the
    /// node at the end, leaf or container. A path with wildcards returns a
    /// detached container holding a copy of every match, in resolution
    /// order; it does not alias this node's storage.
    ///
    /// Wildcard expansion enumerates the product of the candidates at each
    /// wildcard position, so its cost grows with the branching factor of the
    /// data raised to the number of wildcards.
    pub fn resolve_with(&self, path: &str, separator: &str) -> Option<Node> {
        if path.is_empty() {
            return None;
        }
        if path == WILDCARD {
            return self.is_container().then(|| self.clone());
        }

        let parsed = Path::parse(path, separator);
        if parsed.is_wildcard() {
            return Some(self.expand(&parsed));
        }
        self.walk_segments(parsed.raw_segments())
    }

    /// Returns the concrete paths a query resolves through.
    pub fn matching_paths(&self, path: &str) -> Vec<String> {
        self.matching_paths_with(path, DEFAULT_SEPARATOR)
    }

    /// Returns the concrete paths a query resolves through, in resolution
    /// order. A path without wildcards yields itself if it resolves.
    pub fn matching_paths_with(&self, path: &str, separator: &str) -> Vec<String> {
        if path.is_empty() {
            return Vec::new();
        }
        let parsed = Path::parse(path, separator);
        if path == WILDCARD || !parsed.is_wildcard() {
            return match self.resolve_with(path, separator) {
                Some(_) => vec![path.to_string()],
                None => Vec::new(),
            };
        }
        self.surviving_paths(&parsed)
            .into_iter()
            .map(|(candidate, _)| candidate)
            .collect()
    }

    fn walk_segments(&self, segments: &[&str]) -> Option<Node> {
        let (last, init) = segments.split_last()?;
        let mut current = self.clone();
        for raw in init {
            match current.get(raw) {
                Some(next) if next.is_container() => current = next,
                _ => {
                    trace!(segment = *raw, "cannot descend");
                    return None;
                }
            }
        }
        current.get(last)
    }

    fn expand(&self, path: &Path<'_>) -> Node {
        let matches = self.surviving_paths(path);
        debug!(
            path = %join_segments(path.raw_segments(), path.separator()),
            matches = matches.len(),
            "expanded wildcard path"
        );
        walk(Container::from_values(
            matches.into_iter().map(|(_, node)| node.value()),
        ))
    }

    /// Resolves every candidate path, dropping the ones that do not resolve
    /// or that split into a different number of segments than `path`.
    fn surviving_paths(&self, path: &Path<'_>) -> Vec<(String, Node)> {
        let separator = path.separator();
        let candidates = self.candidate_paths(path);
        trace!(candidates = candidates.len(), "wildcard candidates");

        candidates
            .into_iter()
            .filter_map(|candidate| {
                let split = Path::parse(&candidate, separator);
                if split.len() != path.len() {
                    return None;
                }
                let node = self.walk_segments(split.raw_segments())?;
                Some((candidate, node))
            })
            .collect()
    }

    /// Builds the concrete paths for a wildcard path.
    ///
    /// The candidates of a wildcard position are the keys of the node reached
    /// at that depth. After a wildcard, the next depth is a flattened view of
    /// all children of that node, so a following wildcard draws on the keys
    /// one level further down.
    fn candidate_paths(&self, path: &Path<'_>) -> Vec<String> {
        let mut frontier = Some(self.clone());
        let mut choices: Vec<Vec<String>> = Vec::with_capacity(path.len());

        for raw in path.raw_segments() {
            if *raw == WILDCARD {
                match frontier.as_ref().filter(|node| node.is_container()) {
                    Some(node) => {
                        choices.push(node.keys().iter().map(Key::to_string).collect());
                        frontier = Some(flatten_children(node));
                    }
                    None => choices.push(Vec::new()),
                }
            } else {
                choices.push(vec![raw.to_string()]);
                frontier = frontier.and_then(|node| node.get(raw));
            }
        }

        cartesian(&choices)
            .into_iter()
            .map(|segments| join_segments(segments.as_slice(), path.separator()))
            .collect()
    }
}

/// Gathers the children of `node` one level down into a detached node.
///
/// Container children contribute their entries: integer keys are appended,
/// name keys overwrite earlier ones. Leaf children are appended themselves.
fn flatten_children(node: &Node) -> Node {
    let mut level = Container::new();
    for (_, child) in node.items() {
        match child.value() {
            Value::Container(grandchildren) => {
                for Entry { key, value } in grandchildren {
                    if key.is_index() {
                        level.push(value);
                    } else {
                        level.insert(key, value);
                    }
                }
            }
            leaf => {
                level.push(leaf);
            }
        }
    }
    walk(level)
}

/// Picks one option per position, earlier positions varying slowest.
fn cartesian(choices: &[Vec<String>]) -> Vec<Vec<&str>> {
    let mut combos: Vec<Vec<&str>> = vec![Vec::new()];
    for options in choices {
        combos = combos
            .iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| {
                    let mut combo = prefix.clone();
                    combo.push(option.as_str());
                    combo
                })
            })
            .collect();
    }
    combos
}
