//! Relationship records — one registration of a style, a game, and the
//! skills it exercises, split across three skill groups.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{Error, Result};

/// The three skill subgroups. A skill node is tagged with the group it was
/// registered under.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SkillGroup {
  Offensive,
  Defensive,
  Tactical,
}

/// One registered relationship. Skill sets are `BTreeSet`s, so duplicates
/// within a record collapse and iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord {
  pub style: String,
  pub game:  String,
  #[serde(default)]
  pub offensive: BTreeSet<String>,
  #[serde(default)]
  pub defensive: BTreeSet<String>,
  #[serde(default)]
  pub tactical:  BTreeSet<String>,
}

impl StyleRecord {
  /// The skill set for `group`.
  pub fn skills(&self, group: SkillGroup) -> &BTreeSet<String> {
    match group {
      SkillGroup::Offensive => &self.offensive,
      SkillGroup::Defensive => &self.defensive,
      SkillGroup::Tactical => &self.tactical,
    }
  }

  /// Trim every field and drop empty skill entries.
  pub fn normalized(self) -> Self {
    let trim_set = |set: BTreeSet<String>| -> BTreeSet<String> {
      set
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
    };
    Self {
      style:     self.style.trim().to_string(),
      game:      self.game.trim().to_string(),
      offensive: trim_set(self.offensive),
      defensive: trim_set(self.defensive),
      tactical:  trim_set(self.tactical),
    }
  }

  /// Style and game are required; skills are not.
  pub fn validate(&self) -> Result<()> {
    if self.style.trim().is_empty() {
      return Err(Error::EmptyField("style"));
    }
    if self.game.trim().is_empty() {
      return Err(Error::EmptyField("game"));
    }
    Ok(())
  }
}
