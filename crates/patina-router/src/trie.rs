//! Per-method segment trie: registration-time building and request-time
//! backtracking lookup.

use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::pattern::Pattern;
use crate::scan::UrlSegment;
use crate::segment::{Segment, SegmentKind};

const ROOT: usize = 0;

/// One level of the trie.
///
/// Nodes live in an arena and address each other by index, so backtracking
/// never walks parent pointers and ownership stays acyclic.
struct Node<T> {
    /// The segment this edge represents; the synthetic root carries none.
    segment: Option<Segment>,
    /// Child indices, kept sorted ascending by (kind rank, segment text) so
    /// lookup tries the most specific edge first.
    children: Vec<usize>,
    /// Terminal pattern, present when a registered pattern ends here.
    leaf: Option<Pattern<T>>,
    /// Upper bound on URL segments matchable from this node down to any
    /// leaf; `None` once a greedy descendant makes it unbounded. Used to
    /// prune branches that cannot cover the rest of the path.
    max_remaining: Option<usize>,
}

/// The compressed trie holding every non-root pattern of one HTTP method.
pub(crate) struct PathTrie<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                segment: None,
                children: Vec::new(),
                leaf: None,
                max_remaining: None,
            }],
        }
    }
}

/// A backtracking frame.
///
/// `Node` frames iterate one node's children in priority order. `Greedy`
/// frames iterate (consumption length, continuation child) pairs for one
/// `**` node, growing the consumed span one URL segment at a time.
enum Frame {
    Node {
        node: usize,
        cursor: usize,
        url: usize,
    },
    Greedy {
        node: usize,
        consume: usize,
        cursor: usize,
        url: usize,
    },
}

/// What one frame step decided.
enum Step {
    Descend(Frame),
    Matched(usize),
    Backtrack,
}

impl<T> PathTrie<T> {
    /// Inserts a parsed pattern, merging equivalent segments with existing
    /// nodes and keeping sibling order by specificity.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicatePattern`] when a structurally
    /// equivalent pattern is already terminal at the same node.
    pub(crate) fn insert(&mut self, method: Method, pattern: Pattern<T>) -> Result<()> {
        let mut node = ROOT;
        for idx in 0..pattern.segments().len() {
            let bound = pattern.remaining_bound(idx);
            let segment = &pattern.segments()[idx];
            node = match self.find_equivalent_child(node, segment) {
                Some(child) => {
                    widen(&mut self.nodes[child].max_remaining, bound);
                    child
                }
                None => self.add_child(node, segment.clone(), bound),
            };
        }
        if self.nodes[node].leaf.is_some() {
            return Err(RouterError::DuplicatePattern {
                method,
                pattern: pattern.raw().to_string(),
            });
        }
        self.nodes[node].leaf = Some(pattern);
        Ok(())
    }

    /// Every terminal pattern in the trie, in arena order.
    pub(crate) fn patterns(&self) -> impl Iterator<Item = &Pattern<T>> {
        self.nodes.iter().filter_map(|node| node.leaf.as_ref())
    }

    fn find_equivalent_child(&self, node: usize, segment: &Segment) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&child| self.child_segment(child).is_equivalent(segment))
    }

    fn add_child(&mut self, parent: usize, segment: Segment, bound: Option<usize>) -> usize {
        let key = (segment.kind().rank(), segment.raw());
        let pos = self.nodes[parent]
            .children
            .iter()
            .position(|&c| {
                let s = self.child_segment(c);
                (s.kind().rank(), s.raw()) > key
            })
            .unwrap_or(self.nodes[parent].children.len());
        let child = self.nodes.len();
        self.nodes.push(Node {
            segment: Some(segment),
            children: Vec::new(),
            leaf: None,
            max_remaining: bound,
        });
        self.nodes[parent].children.insert(pos, child);
        child
    }

    fn child_segment(&self, node: usize) -> &Segment {
        self.nodes[node]
            .segment
            .as_ref()
            .expect("non-root nodes always carry a segment")
    }

    /// Walks the scanned segments against the trie and returns the most
    /// specific matching pattern.
    ///
    /// Iterative depth-first walk over an explicit frame stack; depth is
    /// bounded by the segment cap and backtracking restores the URL index
    /// recorded in the parent frame. Successful comparisons tag each
    /// [`UrlSegment`] with the kind that matched it, which capture
    /// extraction reads back later.
    pub(crate) fn lookup<'t>(
        &'t self,
        path: &str,
        segments: &mut [UrlSegment],
    ) -> Option<&'t Pattern<T>> {
        if segments.is_empty() {
            return None;
        }
        let mut stack = vec![Frame::Node {
            node: ROOT,
            cursor: 0,
            url: 0,
        }];
        while let Some(frame) = stack.last_mut() {
            let step = match frame {
                Frame::Node { node, cursor, url } => {
                    self.step_node(*node, cursor, *url, path, segments)
                }
                Frame::Greedy {
                    node,
                    consume,
                    cursor,
                    url,
                } => self.step_greedy(*node, consume, cursor, *url, path, segments),
            };
            match step {
                Step::Descend(next) => stack.push(next),
                Step::Matched(node) => return self.nodes[node].leaf.as_ref(),
                Step::Backtrack => {
                    stack.pop();
                }
            }
        }
        None
    }

    /// Tries the not-yet-tried children of `node` against the URL segment at
    /// `url`, advancing `cursor` across re-entries of the frame.
    fn step_node(
        &self,
        node: usize,
        cursor: &mut usize,
        url: usize,
        path: &str,
        segments: &mut [UrlSegment],
    ) -> Step {
        let total = segments.len();
        if url == total && self.nodes[node].leaf.is_some() {
            return Step::Matched(node);
        }
        let remaining = total - url;
        while *cursor < self.nodes[node].children.len() {
            let child = self.nodes[node].children[*cursor];
            *cursor += 1;
            if let Some(max) = self.nodes[child].max_remaining {
                if max < remaining {
                    continue;
                }
            }
            let segment = self.child_segment(child);
            if segment.kind() == SegmentKind::Greedy {
                if remaining == 0 {
                    // `**` may still match zero segments
                    if self.nodes[child].leaf.is_some() {
                        return Step::Matched(child);
                    }
                    continue;
                }
                if self.nodes[child].leaf.is_some() && self.nodes[child].children.is_empty() {
                    tag_greedy(&mut segments[url..]);
                    return Step::Matched(child);
                }
                return Step::Descend(Frame::Greedy {
                    node: child,
                    consume: 0,
                    cursor: 0,
                    url,
                });
            }
            if remaining == 0 {
                continue;
            }
            let text = segments[url].text(path);
            if segment.matches(text) {
                segments[url].matched = Some(segment.kind());
                return Step::Descend(Frame::Node {
                    node: child,
                    cursor: 0,
                    url: url + 1,
                });
            }
        }
        Step::Backtrack
    }

    /// Expands one `**` node: for the current consumption length, tries the
    /// node's continuation children against the first unconsumed segment;
    /// exhausting them grows the consumed span by one. When no length
    /// permits a continuation, the node's own leaf absorbs the remainder or
    /// the whole greedy branch is dead.
    fn step_greedy(
        &self,
        node: usize,
        consume: &mut usize,
        cursor: &mut usize,
        url: usize,
        path: &str,
        segments: &mut [UrlSegment],
    ) -> Step {
        let total = segments.len();
        loop {
            let probe = url + *consume;
            if probe >= total {
                if self.nodes[node].leaf.is_some() {
                    tag_greedy(&mut segments[url..]);
                    return Step::Matched(node);
                }
                return Step::Backtrack;
            }
            let remaining = total - probe;
            while *cursor < self.nodes[node].children.len() {
                let child = self.nodes[node].children[*cursor];
                *cursor += 1;
                if let Some(max) = self.nodes[child].max_remaining {
                    if max < remaining {
                        continue;
                    }
                }
                let segment = self.child_segment(child);
                let text = segments[probe].text(path);
                if segment.matches(text) {
                    tag_greedy(&mut segments[url..probe]);
                    segments[probe].matched = Some(segment.kind());
                    return Step::Descend(Frame::Node {
                        node: child,
                        cursor: 0,
                        url: probe + 1,
                    });
                }
            }
            *consume += 1;
            *cursor = 0;
        }
    }
}

fn widen(bound: &mut Option<usize>, incoming: Option<usize>) {
    *bound = match (*bound, incoming) {
        (Some(a), Some(b)) => Some(a.max(b)),
        _ => None,
    };
}

fn tag_greedy(segments: &mut [UrlSegment]) {
    for segment in segments {
        segment.matched = Some(SegmentKind::Greedy);
    }
}
