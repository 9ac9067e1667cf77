//! Node styling for the rendered graph.
//!
//! Color and shape depend only on the node kind/group; size grows linearly
//! with the node's degree in the *filtered* graph, with a floor. Two nodes
//! with equal kind and equal filtered degree therefore always receive an
//! identical style tuple.

use serde::Serialize;

use crate::{
  graph::NodeKind,
  record::SkillGroup,
};

/// Minimum rendered node size.
pub const BASE_SIZE: u32 = 10;
/// Size gained per unit of degree.
pub const SIZE_STEP: u32 = 2;

/// The computed style tuple for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
  pub color: &'static str,
  pub size:  u32,
  pub shape: &'static str,
}

/// Compute the style for a node of `kind` with `degree` in the filtered
/// graph.
pub fn node_style(kind: NodeKind, degree: usize) -> NodeStyle {
  let (color, shape) = match kind {
    NodeKind::Style => ("#d1495b", "star"),
    NodeKind::Game => ("#30638e", "square"),
    NodeKind::Skill(SkillGroup::Offensive) => ("#c9672e", "dot"),
    NodeKind::Skill(SkillGroup::Defensive) => ("#3c6e71", "dot"),
    NodeKind::Skill(SkillGroup::Tactical) => ("#6a994e", "dot"),
  };
  let size = BASE_SIZE + SIZE_STEP * degree as u32;
  NodeStyle { color, size, shape }
}
