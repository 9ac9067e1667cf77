//! Render payloads for the interactive visualization.
//!
//! The JS visualization library is an external collaborator; this module
//! only produces its node/edge JSON input. Styling is computed against the
//! filtered graph's degrees, so what is rendered always matches what is
//! shown.

use serde::Serialize;

use crate::{
  community::CommunityDetector,
  graph::{EdgeKind, NodeKind, StyleGraph},
  style::node_style,
};

/// Palette cycled by community id for the community view.
pub const COMMUNITY_PALETTE: [&str; 8] = [
  "#d1495b", "#30638e", "#6a994e", "#c9672e", "#7768ae", "#3c6e71",
  "#b08900", "#9a4f69",
];

// ─── Payload types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
  pub id:    String,
  pub label: String,
  pub color: String,
  pub size:  u32,
  pub shape: String,
  /// Grouping hint for the renderer: `style`, `game`, `skill:offensive`, …
  pub group: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub community: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEdge {
  pub from: String,
  pub to:   String,
  pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderGraph {
  pub nodes: Vec<RenderNode>,
  pub edges: Vec<RenderEdge>,
}

fn group_label(kind: NodeKind) -> String {
  match kind {
    NodeKind::Style => "style".to_string(),
    NodeKind::Game => "game".to_string(),
    NodeKind::Skill(group) => format!("skill:{group}"),
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Render `graph` with kind/degree styling.
pub fn render(graph: &StyleGraph) -> RenderGraph {
  let nodes = graph
    .nodes()
    .map(|(name, kind)| {
      let style = node_style(kind, graph.degree(name));
      RenderNode {
        id:        name.to_string(),
        label:     name.to_string(),
        color:     style.color.to_string(),
        size:      style.size,
        shape:     style.shape.to_string(),
        group:     group_label(kind),
        community: None,
      }
    })
    .collect();
  let edges = graph
    .edges()
    .map(|(a, b, kind)| RenderEdge {
      from: a.to_string(),
      to:   b.to_string(),
      kind,
    })
    .collect();
  RenderGraph { nodes, edges }
}

/// Render `graph` colored by community. Size and shape still follow the
/// kind/degree styling; only the color channel carries the partition.
pub fn render_communities(
  graph: &StyleGraph,
  detector: &dyn CommunityDetector,
) -> RenderGraph {
  let partition = detector.partition(graph);
  let mut payload = render(graph);
  for node in &mut payload.nodes {
    let community = partition.get(&node.id).copied().unwrap_or(0);
    node.community = Some(community);
    node.color =
      COMMUNITY_PALETTE[community % COMMUNITY_PALETTE.len()].to_string();
  }
  payload
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::community::LabelPropagation;
  use crate::record::StyleRecord;
  use std::collections::BTreeSet;

  fn sample_graph() -> StyleGraph {
    StyleGraph::build(&[StyleRecord {
      style:     "Judo".to_string(),
      game:      "Tag".to_string(),
      offensive: BTreeSet::from(["throw".to_string()]),
      ..Default::default()
    }])
  }

  #[test]
  fn render_emits_every_node_and_edge() {
    let payload = render(&sample_graph());
    assert_eq!(payload.nodes.len(), 3);
    assert_eq!(payload.edges.len(), 3);
  }

  #[test]
  fn node_sizes_follow_filtered_degree() {
    let payload = render(&sample_graph());
    // Every node in the triangle has degree 2.
    assert!(payload.nodes.iter().all(|n| n.size == 10 + 2 * 2));
  }

  #[test]
  fn groups_name_the_kind_and_skill_subgroup() {
    let payload = render(&sample_graph());
    let groups: Vec<&str> =
      payload.nodes.iter().map(|n| n.group.as_str()).collect();
    assert!(groups.contains(&"style"));
    assert!(groups.contains(&"game"));
    assert!(groups.contains(&"skill:offensive"));
  }

  #[test]
  fn community_view_sets_ids_and_palette_colors() {
    let payload =
      render_communities(&sample_graph(), &LabelPropagation::default());
    for node in &payload.nodes {
      let community = node.community.expect("community id");
      assert_eq!(
        node.color,
        COMMUNITY_PALETTE[community % COMMUNITY_PALETTE.len()]
      );
    }
  }

  #[test]
  fn payload_serialises_to_the_visualisation_contract() {
    let payload = render(&sample_graph());
    let json = serde_json::to_value(&payload).unwrap();
    let node = &json["nodes"][0];
    for key in ["id", "label", "color", "size", "shape", "group"] {
      assert!(node.get(key).is_some(), "missing key {key}");
    }
    // Plain render carries no community field.
    assert!(node.get("community").is_none());
    let edge = &json["edges"][0];
    for key in ["from", "to", "kind"] {
      assert!(edge.get(key).is_some(), "missing key {key}");
    }
  }
}
