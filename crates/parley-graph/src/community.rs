//! Community partitioning.
//!
//! The partitioning algorithm sits behind [`CommunityDetector`] so the
//! renderer does not care which one is plugged in. The contract: an
//! undirected graph in, a map from node to non-negative community id out,
//! with no guarantee that ids are stable across runs. When the graph has no
//! edges, every node lands in a single default community.

use std::collections::BTreeMap;

use crate::graph::StyleGraph;

/// Partition a graph into communities.
pub trait CommunityDetector {
  fn partition(&self, graph: &StyleGraph) -> BTreeMap<String, usize>;
}

// ─── Label propagation ───────────────────────────────────────────────────────

/// Synchronous label propagation: every node repeatedly adopts the most
/// frequent label among its neighbours (ties broken towards the smallest
/// label) until a fixed point or the round limit.
#[derive(Debug, Clone)]
pub struct LabelPropagation {
  pub max_rounds: usize,
}

impl Default for LabelPropagation {
  fn default() -> Self {
    Self { max_rounds: 16 }
  }
}

impl CommunityDetector for LabelPropagation {
  fn partition(&self, graph: &StyleGraph) -> BTreeMap<String, usize> {
    // Edge-free graph: one default community for everything.
    if graph.edge_count() == 0 {
      return graph.nodes().map(|(name, _)| (name.to_string(), 0)).collect();
    }

    let adjacency = graph.adjacency();
    let names: Vec<&str> = adjacency.keys().copied().collect();
    let mut labels: BTreeMap<&str, usize> =
      names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    for _ in 0..self.max_rounds {
      let mut changed = false;
      for name in &names {
        let neighbours = &adjacency[name];
        if neighbours.is_empty() {
          continue;
        }
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for neighbour in neighbours {
          *counts.entry(labels[neighbour]).or_insert(0) += 1;
        }
        // Most frequent neighbour label; BTreeMap order breaks ties towards
        // the smallest label.
        let best = counts
          .iter()
          .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
          .map(|(label, _)| *label)
          .unwrap_or(labels[name]);
        if labels[name] != best {
          labels.insert(*name, best);
          changed = true;
        }
      }
      if !changed {
        break;
      }
    }

    // Compact labels to 0..k in first-seen order.
    let mut compact: BTreeMap<usize, usize> = BTreeMap::new();
    let mut result = BTreeMap::new();
    for name in names {
      let label = labels[name];
      let next = compact.len();
      let id = *compact.entry(label).or_insert(next);
      result.insert(name.to_string(), id);
    }
    result
  }
}
