//! The typed relationship graph and its relation-mask filter.
//!
//! A simple undirected graph over three node kinds (style, game, skill) and
//! three edge kinds (style–game, game–skill, style–skill). Duplicate edge
//! insertion is idempotent, so the node/edge sets are independent of record
//! order; BTree-backed storage makes iteration deterministic as well. Every
//! edge is derivable from a record field — no edge exists without a backing
//! record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::record::{SkillGroup, StyleRecord};

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// What a node represents. Node identity is its name; a name registered
/// under two kinds keeps the first-inserted kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "group", rename_all = "lowercase")]
pub enum NodeKind {
  Style,
  Game,
  Skill(SkillGroup),
}

/// Which record field an edge is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
  StyleGame,
  GameSkill,
  StyleSkill,
}

// ─── Relation mask ───────────────────────────────────────────────────────────

/// Per-edge-kind display toggles. Defaults to everything enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RelationMask {
  #[serde(default = "enabled")]
  pub style_game:  bool,
  #[serde(default = "enabled")]
  pub game_skill:  bool,
  #[serde(default = "enabled")]
  pub style_skill: bool,
}

fn enabled() -> bool {
  true
}

impl Default for RelationMask {
  fn default() -> Self {
    Self { style_game: true, game_skill: true, style_skill: true }
  }
}

impl RelationMask {
  pub const ALL: Self =
    Self { style_game: true, game_skill: true, style_skill: true };
  pub const NONE: Self =
    Self { style_game: false, game_skill: false, style_skill: false };

  pub fn allows(&self, kind: EdgeKind) -> bool {
    match kind {
      EdgeKind::StyleGame => self.style_game,
      EdgeKind::GameSkill => self.game_skill,
      EdgeKind::StyleSkill => self.style_skill,
    }
  }
}

// ─── Graph ───────────────────────────────────────────────────────────────────

/// Undirected edge key: endpoint names in sorted order.
type EdgeKey = (String, String);

/// The relationship graph. Simple and undirected; no parallel edges, no
/// self-loops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleGraph {
  nodes: BTreeMap<String, NodeKind>,
  edges: BTreeMap<EdgeKey, EdgeKind>,
}

impl StyleGraph {
  /// Build the full graph from a record list. Order-independent: permuting
  /// the records yields identical node and edge sets.
  pub fn build(records: &[StyleRecord]) -> Self {
    let mut graph = Self::default();
    for record in records {
      graph.insert_node(&record.style, NodeKind::Style);
      graph.insert_node(&record.game, NodeKind::Game);
      graph.insert_edge(&record.style, &record.game, EdgeKind::StyleGame);

      for group in SkillGroup::iter() {
        for skill in record.skills(group) {
          graph.insert_node(skill, NodeKind::Skill(group));
          graph.insert_edge(&record.game, skill, EdgeKind::GameSkill);
          graph.insert_edge(&record.style, skill, EdgeKind::StyleSkill);
        }
      }
    }
    graph
  }

  fn insert_node(&mut self, name: &str, kind: NodeKind) {
    self.nodes.entry(name.to_string()).or_insert(kind);
  }

  fn insert_edge(&mut self, a: &str, b: &str, kind: EdgeKind) {
    if a == b {
      return;
    }
    let key = if a < b {
      (a.to_string(), b.to_string())
    } else {
      (b.to_string(), a.to_string())
    };
    self.edges.entry(key).or_insert(kind);
  }

  // ── Filtering ─────────────────────────────────────────────────────────

  /// Structural filter: copy only edges whose kind the mask enables, plus
  /// their endpoints (attributes preserved). Nodes with no retained edge
  /// are dropped — isolated nodes never appear in a filtered view.
  pub fn filtered(&self, mask: RelationMask) -> Self {
    let mut graph = Self::default();
    for ((a, b), kind) in &self.edges {
      if !mask.allows(*kind) {
        continue;
      }
      if let Some(kind_a) = self.nodes.get(a) {
        graph.insert_node(a, *kind_a);
      }
      if let Some(kind_b) = self.nodes.get(b) {
        graph.insert_node(b, *kind_b);
      }
      graph.insert_edge(a, b, *kind);
    }
    graph
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn node_kind(&self, name: &str) -> Option<NodeKind> {
    self.nodes.get(name).copied()
  }

  /// Nodes in deterministic (name) order.
  pub fn nodes(&self) -> impl Iterator<Item = (&str, NodeKind)> {
    self.nodes.iter().map(|(name, kind)| (name.as_str(), *kind))
  }

  /// Edges in deterministic (endpoint-pair) order.
  pub fn edges(&self) -> impl Iterator<Item = (&str, &str, EdgeKind)> {
    self
      .edges
      .iter()
      .map(|((a, b), kind)| (a.as_str(), b.as_str(), *kind))
  }

  pub fn has_edge(&self, a: &str, b: &str) -> bool {
    let key = if a < b { (a, b) } else { (b, a) };
    self
      .edges
      .contains_key(&(key.0.to_string(), key.1.to_string()))
  }

  /// Degree of `name` in this graph (zero for unknown nodes).
  pub fn degree(&self, name: &str) -> usize {
    self
      .edges
      .keys()
      .filter(|(a, b)| a == name || b == name)
      .count()
  }

  /// Adjacency lists in deterministic order, for partitioning.
  pub fn adjacency(&self) -> BTreeMap<&str, Vec<&str>> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> =
      self.nodes.keys().map(|n| (n.as_str(), Vec::new())).collect();
    // Edge endpoints are always registered nodes, see `insert_edge`.
    for (a, b) in self.edges.keys() {
      if let Some(neighbours) = adjacency.get_mut(a.as_str()) {
        neighbours.push(b);
      }
      if let Some(neighbours) = adjacency.get_mut(b.as_str()) {
        neighbours.push(a);
      }
    }
    adjacency
  }
}
