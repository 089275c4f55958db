//! Hierarchical tree layout.
//!
//! Positions are computed in two walks over the arena:
//!
//! 1. Bottom-up (post-order): every subtree is laid out relative to its own
//!    root. Children are placed left to right at the smallest shift that keeps
//!    them apart from the siblings already placed, and the parent is centred
//!    over its first and last child. Each placed subtree is summarised by its
//!    left and right contour (extreme spread positions per level).
//! 2. Top-down (pre-order): relative offsets are accumulated into absolute
//!    spread positions, then scaled into the configured extent.
//!
//! Spread positions are measured in separation units: 1 between siblings, 2
//! between nodes with different parents.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::animation::AnimationTiming;
use crate::domain::arena::FeedTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::InstanceRecord;

/// Direction the tree grows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Root at the top, depth along y
    #[default]
    TopDown,
    /// Root at the left, depth along x
    LeftRight,
}

impl FromStr for Orientation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-down" | "topdown" | "vertical" => Ok(Self::TopDown),
            "left-right" | "leftright" | "horizontal" => Ok(Self::LeftRight),
            other => Err(DomainError::InvalidLayout(format!("unknown orientation: {}", other))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopDown => write!(f, "top-down"),
            Self::LeftRight => write!(f, "left-right"),
        }
    }
}

/// How an edge is drawn between its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkShape {
    #[default]
    Curved,
    Straight,
}

impl FromStr for LinkShape {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curved" => Ok(Self::Curved),
            "straight" => Ok(Self::Straight),
            other => Err(DomainError::InvalidLayout(format!("unknown link shape: {}", other))),
        }
    }
}

/// Mapping from separation units and levels to layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum Sizing {
    /// Scale the whole tree into `width` x `height`
    Fit { width: f64, height: f64 },
    /// Fixed distance per separation unit and per level, root at spread 0
    NodeSize { spacing: f64, level: f64 },
}

impl Default for Sizing {
    fn default() -> Self {
        Self::Fit {
            width: 400.0,
            height: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub sizing: Sizing,
    pub orientation: Orientation,
    pub link_shape: LinkShape,
    /// Pack by same-level contours only. Nodes still never overlap, but
    /// sibling subtrees no longer occupy disjoint ranges along the spread
    /// axis: a shallow subtree may sit inside a deeper neighbour's extent.
    pub compact: bool,
    pub sibling_separation: f64,
    pub subtree_separation: f64,
    pub timing: AnimationTiming,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sizing: Sizing::default(),
            orientation: Orientation::default(),
            link_shape: LinkShape::default(),
            compact: false,
            sibling_separation: 1.0,
            subtree_separation: 2.0,
            timing: AnimationTiming::default(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> DomainResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(DomainError::InvalidLayout(format!("{} must be positive, got {}", name, v)))
            }
        };
        match self.sizing {
            Sizing::Fit { width, height } => {
                positive("width", width)?;
                positive("height", height)?;
            }
            Sizing::NodeSize { spacing, level } => {
                positive("spacing", spacing)?;
                positive("level", level)?;
            }
        }
        positive("sibling_separation", self.sibling_separation)?;
        positive("subtree_separation", self.subtree_separation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Geometry of one parent-child edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePath {
    /// Parent position
    pub source: Point,
    /// Child position
    pub target: Point,
    pub shape: LinkShape,
    pub orientation: Orientation,
}

impl EdgePath {
    /// SVG path data from source to target.
    ///
    /// Curved edges are cubic Béziers with both control points on the
    /// midline between the levels.
    pub fn svg_d(&self) -> String {
        let (s, t) = (self.source, self.target);
        match (self.shape, self.orientation) {
            (LinkShape::Straight, _) => format!("M{},{}L{},{}", s.x, s.y, t.x, t.y),
            (LinkShape::Curved, Orientation::TopDown) => {
                let my = (s.y + t.y) / 2.0;
                format!("M{},{}C{},{},{},{},{},{}", s.x, s.y, s.x, my, t.x, my, t.x, t.y)
            }
            (LinkShape::Curved, Orientation::LeftRight) => {
                let mx = (s.x + t.x) / 2.0;
                format!("M{},{}C{},{},{},{},{},{}", s.x, s.y, mx, s.y, mx, t.y, t.x, t.y)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode<'a, R> {
    pub record: &'a R,
    pub x: f64,
    pub y: f64,
    /// Edge count from the laid out root
    pub depth: usize,
    pub delay: Duration,
    /// Position of the parent in `Layout::nodes`
    pub parent: Option<usize>,
}

impl<'a, R: InstanceRecord> LayoutNode<'a, R> {
    pub fn id(&self) -> &'a R::Id {
        self.record.id()
    }

    pub fn position(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    pub fn is_selected(&self, selected: Option<&R::Id>) -> bool {
        selected.is_some_and(|s| s == self.record.id())
    }

    /// Where the node label goes for a node drawn with `radius`.
    pub fn label_anchor(&self, radius: f64) -> Point {
        Point {
            x: self.x - radius * 4.0,
            y: self.y + radius * 4.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutEdge<'a, R> {
    pub parent: &'a R,
    pub child: &'a R,
    pub path: EdgePath,
    /// Delay of the parent's level
    pub delay: Duration,
}

impl<'a, R: InstanceRecord> LayoutEdge<'a, R> {
    pub fn parent_id(&self) -> &'a R::Id {
        self.parent.id()
    }

    pub fn child_id(&self) -> &'a R::Id {
        self.child.id()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

/// Positioned nodes and edges of one tree.
///
/// Nodes are in pre-order, which is also the drawing order; edges follow the
/// order of their child nodes.
#[derive(Debug)]
pub struct Layout<'a, R: InstanceRecord> {
    nodes: Vec<LayoutNode<'a, R>>,
    edges: Vec<LayoutEdge<'a, R>>,
    index: HashMap<R::Id, usize>,
    max_depth: usize,
    timing: AnimationTiming,
}

impl<'a, R: InstanceRecord> Layout<'a, R> {
    pub fn empty(timing: AnimationTiming) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            max_depth: 0,
            timing,
        }
    }

    pub fn nodes(&self) -> &[LayoutNode<'a, R>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge<'a, R>] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn timing(&self) -> AnimationTiming {
        self.timing
    }

    /// Time until the whole tree has been revealed.
    pub fn total_duration(&self) -> Duration {
        if self.is_empty() {
            return Duration::ZERO;
        }
        self.timing.total_for_depth(self.max_depth)
    }

    pub fn node(&self, id: &R::Id) -> Option<&LayoutNode<'a, R>> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub fn selected_node(&self, selected: Option<&R::Id>) -> Option<&LayoutNode<'a, R>> {
        selected.and_then(|id| self.node(id))
    }

    pub fn parent(&self, node: &LayoutNode<'a, R>) -> Option<&LayoutNode<'a, R>> {
        node.parent.map(|slot| &self.nodes[slot])
    }

    /// Topmost node whose circle of `radius` contains the point.
    pub fn hit_test(&self, x: f64, y: f64, radius: f64) -> Option<&LayoutNode<'a, R>> {
        let r2 = radius * radius;
        self.nodes.iter().rev().find(|n| {
            let (dx, dy) = (n.x - x, n.y - y);
            dx * dx + dy * dy <= r2
        })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.nodes.first()?.position();
        let init = Bounds { min: first, max: first };
        Some(self.nodes.iter().fold(init, |b, n| Bounds {
            min: Point {
                x: b.min.x.min(n.x),
                y: b.min.y.min(n.y),
            },
            max: Point {
                x: b.max.x.max(n.x),
                y: b.max.y.max(n.y),
            },
        }))
    }
}

/// Left and right contour of a placed subtree, one entry per level,
/// relative to the subtree root.
///
/// Entries are stored without `offset`, so re-centring a subtree under its
/// parent does not touch the levels below.
#[derive(Debug, Clone, PartialEq)]
struct Contour {
    left: VecDeque<f64>,
    right: VecDeque<f64>,
    offset: f64,
}

impl Contour {
    fn leaf() -> Self {
        Self {
            left: VecDeque::from([0.0]),
            right: VecDeque::from([0.0]),
            offset: 0.0,
        }
    }

    fn levels(&self) -> usize {
        self.left.len()
    }

    fn left_at(&self, level: usize) -> f64 {
        self.left[level] + self.offset
    }

    fn right_at(&self, level: usize) -> f64 {
        self.right[level] + self.offset
    }

    fn merge(&mut self, other: &Contour, shift: f64) {
        let delta = other.offset + shift - self.offset;
        for (d, (&l, &r)) in other.left.iter().zip(&other.right).enumerate() {
            if d < self.levels() {
                self.left[d] = self.left[d].min(l + delta);
                self.right[d] = self.right[d].max(r + delta);
            } else {
                self.left.push_back(l + delta);
                self.right.push_back(r + delta);
            }
        }
    }

    /// Contour of the parent once its children contour is re-centred
    /// under it.
    fn under_parent(mut self, mid: f64) -> Self {
        self.offset -= mid;
        self.left.push_front(-self.offset);
        self.right.push_front(-self.offset);
        self
    }
}

pub struct TreeLayout {
    config: LayoutConfig,
}

impl TreeLayout {
    pub fn new(config: LayoutConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the first root; an empty tree gives an empty layout.
    #[instrument(level = "debug", skip_all)]
    pub fn layout_primary<'a, R: InstanceRecord>(&self, tree: &FeedTree<'a, R>) -> Layout<'a, R> {
        if tree.roots().len() > 1 {
            warn!(roots = tree.roots().len(), "multiple roots, laying out the first only");
        }
        match tree.primary_root() {
            Some(root) => self.layout(tree, root),
            None => Layout::empty(self.config.timing),
        }
    }

    /// Lay out the subtree below `root`.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn layout<'a, R: InstanceRecord>(&self, tree: &FeedTree<'a, R>, root: Index) -> Layout<'a, R> {
        let order: Vec<Index> = tree.iter_from(root).map(|(idx, _)| idx).collect();
        if order.is_empty() {
            return Layout::empty(self.config.timing);
        }
        let slot_of: HashMap<Index, usize> =
            order.iter().enumerate().map(|(slot, &idx)| (idx, slot)).collect();

        let n = order.len();
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut depth = vec![0usize; n];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (slot, &idx) in order.iter().enumerate() {
            let Some(node) = tree.get_node(idx) else { continue };
            // the laid out root may have a parent outside this subtree
            if slot > 0 {
                parent[slot] = node.parent.and_then(|p| slot_of.get(&p).copied());
            }
            if let Some(p) = parent[slot] {
                depth[slot] = depth[p] + 1;
            }
            children[slot] = node.children.iter().filter_map(|c| slot_of.get(c).copied()).collect();
        }

        let relative = self.first_walk(tree, root, &slot_of, &children);

        let mut spread = vec![0.0; n];
        for slot in 1..n {
            if let Some(p) = parent[slot] {
                spread[slot] = spread[p] + relative[slot];
            }
        }

        let max_depth = depth.iter().copied().max().unwrap_or(0);
        let coords = self.scale(&spread, &depth, &parent, max_depth);

        let timing = self.config.timing;
        let mut nodes = Vec::with_capacity(n);
        let mut index = HashMap::with_capacity(n);
        for (slot, &idx) in order.iter().enumerate() {
            let Some(record) = tree.record(idx) else { continue };
            index.insert(record.id().clone(), nodes.len());
            nodes.push(LayoutNode {
                record,
                x: coords[slot].x,
                y: coords[slot].y,
                depth: depth[slot],
                delay: timing.delay_for_depth(depth[slot]),
                parent: parent[slot],
            });
        }

        let edges: Vec<LayoutEdge<'a, R>> = nodes
            .iter()
            .filter_map(|child| {
                let p = &nodes[child.parent?];
                Some(LayoutEdge {
                    parent: p.record,
                    child: child.record,
                    path: EdgePath {
                        source: p.position(),
                        target: child.position(),
                        shape: self.config.link_shape,
                        orientation: self.config.orientation,
                    },
                    delay: p.delay,
                })
            })
            .collect();

        debug!(nodes = n, max_depth, "layout computed");
        Layout {
            nodes,
            edges,
            index,
            max_depth,
            timing,
        }
    }

    /// Bottom-up placement; returns each node's spread offset from its
    /// parent (0 for the root).
    fn first_walk<R: InstanceRecord>(
        &self,
        tree: &FeedTree<'_, R>,
        root: Index,
        slot_of: &HashMap<Index, usize>,
        children: &[Vec<usize>],
    ) -> Vec<f64> {
        let n = children.len();
        let mut relative = vec![0.0; n];
        let mut contours: Vec<Option<Contour>> = vec![None; n];

        for (idx, _) in tree.iter_postorder(root) {
            let Some(&slot) = slot_of.get(&idx) else { continue };
            let kids = &children[slot];
            if kids.is_empty() {
                contours[slot] = Some(Contour::leaf());
                continue;
            }

            let mut offsets = Vec::with_capacity(kids.len());
            let mut acc: Option<Contour> = None;
            for &kid in kids {
                let contour = contours[kid].take().unwrap_or_else(Contour::leaf);
                match acc.as_mut() {
                    None => {
                        offsets.push(0.0);
                        acc = Some(contour);
                    }
                    Some(placed) => {
                        let shift = self.shift_for(placed, &contour);
                        placed.merge(&contour, shift);
                        offsets.push(shift);
                    }
                }
            }

            let mid = (offsets[0] + offsets[offsets.len() - 1]) / 2.0;
            for (&kid, off) in kids.iter().zip(offsets) {
                relative[kid] = off - mid;
            }
            contours[slot] = acc.map(|c| c.under_parent(mid));
        }
        relative
    }

    fn separation(&self, siblings: bool) -> f64 {
        if siblings {
            self.config.sibling_separation
        } else {
            self.config.subtree_separation
        }
    }

    /// Smallest shift of `next` that keeps it clear of the siblings already
    /// `placed`. Level 0 of both contours holds the siblings themselves.
    fn shift_for(&self, placed: &Contour, next: &Contour) -> f64 {
        let siblings = placed.right_at(0) - next.left_at(0) + self.separation(true);
        let subtree = self.separation(false);
        if self.config.compact {
            return (1..placed.levels().min(next.levels()))
                .map(|d| placed.right_at(d) - next.left_at(d) + subtree)
                .fold(siblings, f64::max);
        }
        // any level of one subtree against any level of the other,
        // except the sibling pair itself
        let deep_right = (1..placed.levels())
            .map(|d| placed.right_at(d))
            .fold(f64::NEG_INFINITY, f64::max);
        let deep_left = (1..next.levels())
            .map(|d| next.left_at(d))
            .fold(f64::INFINITY, f64::min);
        let all_right = deep_right.max(placed.right_at(0));
        let all_left = deep_left.min(next.left_at(0));
        siblings
            .max(deep_right - all_left + subtree)
            .max(all_right - deep_left + subtree)
    }

    /// Map spread units and depths to layout coordinates.
    fn scale(
        &self,
        spread: &[f64],
        depth: &[usize],
        parent: &[Option<usize>],
        max_depth: usize,
    ) -> Vec<Point> {
        let (spread_pos, depth_pos): (Vec<f64>, Vec<f64>) = match self.config.sizing {
            Sizing::NodeSize { spacing, level } => (
                spread.iter().map(|s| s * spacing).collect(),
                depth.iter().map(|&d| d as f64 * level).collect(),
            ),
            Sizing::Fit { width, height } => {
                let (spread_len, depth_len) = match self.config.orientation {
                    Orientation::TopDown => (width, height),
                    Orientation::LeftRight => (height, width),
                };
                let (left, right) = extreme_slots(spread);
                let margin = if left == right {
                    1.0
                } else {
                    self.separation(parent[left] == parent[right]) / 2.0
                };
                let tx = margin - spread[left];
                let kx = spread_len / (spread[right] + margin + tx);
                let ky = depth_len / max_depth.max(1) as f64;
                (
                    spread.iter().map(|s| (s + tx) * kx).collect(),
                    depth.iter().map(|&d| d as f64 * ky).collect(),
                )
            }
        };

        spread_pos
            .into_iter()
            .zip(depth_pos)
            .map(|(s, d)| match self.config.orientation {
                Orientation::TopDown => Point { x: s, y: d },
                Orientation::LeftRight => Point { x: d, y: s },
            })
            .collect()
    }
}

/// Slots of the leftmost and rightmost node, first occurrence wins.
fn extreme_slots(spread: &[f64]) -> (usize, usize) {
    let mut left = 0;
    let mut right = 0;
    for (slot, &s) in spread.iter().enumerate() {
        if s < spread[left] {
            left = slot;
        }
        if s > spread[right] {
            right = slot;
        }
    }
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(compact: bool) -> TreeLayout {
        TreeLayout::new(LayoutConfig {
            compact,
            ..LayoutConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn given_two_leaves_when_shifting_then_uses_sibling_separation() {
        let shift = engine(false).shift_for(&Contour::leaf(), &Contour::leaf());
        assert_eq!(shift, 1.0);
    }

    fn contour(left: &[f64], right: &[f64]) -> Contour {
        Contour {
            left: left.iter().copied().collect(),
            right: right.iter().copied().collect(),
            offset: 0.0,
        }
    }

    fn levels_of(c: &Contour) -> (Vec<f64>, Vec<f64>) {
        (
            (0..c.levels()).map(|d| c.left_at(d)).collect(),
            (0..c.levels()).map(|d| c.right_at(d)).collect(),
        )
    }

    #[test]
    fn given_deep_neighbour_when_compact_then_only_same_level_counts() {
        // placed subtree reaches far right one level down
        let placed = contour(&[0.0, -0.5], &[0.0, 3.0]);
        let leaf = Contour::leaf();

        assert_eq!(engine(true).shift_for(&placed, &leaf), 1.0);
        assert_eq!(engine(false).shift_for(&placed, &leaf), 5.0);
    }

    #[test]
    fn given_sibling_row_when_not_compact_then_sibling_pair_keeps_sibling_separation() {
        // two leaves already placed at 0 and 1
        let mut placed = Contour::leaf();
        placed.merge(&Contour::leaf(), 1.0);

        assert_eq!(engine(false).shift_for(&placed, &Contour::leaf()), 2.0);
    }

    #[test]
    fn given_deep_next_subtree_when_not_compact_then_its_whole_extent_counts() {
        let placed = Contour::leaf();
        // next subtree reaches 4 units left one level down
        let next = contour(&[0.0, -4.0], &[0.0, 0.0]);

        assert_eq!(engine(false).shift_for(&placed, &next), 6.0);
        assert_eq!(engine(true).shift_for(&placed, &next), 1.0);
    }

    #[test]
    fn given_merged_contours_when_centring_then_parent_level_is_prepended() {
        let mut acc = Contour::leaf();
        acc.merge(&Contour::leaf(), 2.0);
        let parent = acc.under_parent(1.0);

        assert_eq!(levels_of(&parent), (vec![0.0, -1.0], vec![0.0, 1.0]));
    }

    #[test]
    fn given_nested_centring_when_merging_then_offsets_carry_over() {
        let mut inner = Contour::leaf();
        inner.merge(&Contour::leaf(), 2.0);
        let child = inner.under_parent(1.0);
        let mut acc = Contour::leaf();
        acc.merge(&child, 3.0);

        assert_eq!(levels_of(&acc), (vec![0.0, 2.0], vec![3.0, 4.0]));
    }

    #[test]
    fn given_ties_when_finding_extremes_then_first_slot_wins() {
        assert_eq!(extreme_slots(&[0.0, 0.0, 0.0]), (0, 0));
        assert_eq!(extreme_slots(&[0.0, -1.0, 1.0, 1.0]), (1, 2));
    }

    #[test]
    fn given_straight_shape_when_rendering_then_path_is_a_line() {
        let path = EdgePath {
            source: Point { x: 1.0, y: 2.0 },
            target: Point { x: 3.0, y: 4.0 },
            shape: LinkShape::Straight,
            orientation: Orientation::TopDown,
        };
        assert_eq!(path.svg_d(), "M1,2L3,4");
    }
}
