//! Skill vocabulary catalogs.
//!
//! Each skill group may carry a plain-text catalog file (one skill per
//! line; blank lines and `#` comments ignored) that the input form offers
//! as suggestions. A missing or unreadable catalog silently falls back to
//! the built-in defaults.

use std::path::Path;

use serde::Serialize;

use crate::record::SkillGroup;

const DEFAULT_OFFENSIVE: [&str; 5] =
  ["strike", "throw", "sweep", "grapple", "feint"];
const DEFAULT_DEFENSIVE: [&str; 5] =
  ["block", "parry", "dodge", "counter", "guard"];
const DEFAULT_TACTICAL: [&str; 5] =
  ["positioning", "timing", "baiting", "pressure", "reading"];

/// The skill vocabularies currently in effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCatalog {
  pub offensive: Vec<String>,
  pub defensive: Vec<String>,
  pub tactical:  Vec<String>,
}

impl Default for SkillCatalog {
  fn default() -> Self {
    let owned = |items: [&str; 5]| items.map(str::to_string).to_vec();
    Self {
      offensive: owned(DEFAULT_OFFENSIVE),
      defensive: owned(DEFAULT_DEFENSIVE),
      tactical:  owned(DEFAULT_TACTICAL),
    }
  }
}

impl SkillCatalog {
  /// Load catalogs from `<dir>/offensive.txt`, `defensive.txt`,
  /// `tactical.txt`. Each group falls back to its built-in default
  /// independently; `None` means defaults for everything.
  pub fn load(dir: Option<&Path>) -> Self {
    let mut catalog = Self::default();
    let Some(dir) = dir else { return catalog };
    for group in
      [SkillGroup::Offensive, SkillGroup::Defensive, SkillGroup::Tactical]
    {
      let path = dir.join(format!("{group}.txt"));
      match std::fs::read_to_string(&path) {
        Ok(content) => {
          let skills = parse_lines(&content);
          if skills.is_empty() {
            // An empty file is treated as malformed, keep the defaults.
            continue;
          }
          *catalog.group_mut(group) = skills;
        }
        Err(_) => {
          tracing::debug!(path = %path.display(), "no catalog file, using built-in defaults");
        }
      }
    }
    catalog
  }

  pub fn group(&self, group: SkillGroup) -> &[String] {
    match group {
      SkillGroup::Offensive => &self.offensive,
      SkillGroup::Defensive => &self.defensive,
      SkillGroup::Tactical => &self.tactical,
    }
  }

  fn group_mut(&mut self, group: SkillGroup) -> &mut Vec<String> {
    match group {
      SkillGroup::Offensive => &mut self.offensive,
      SkillGroup::Defensive => &mut self.defensive,
      SkillGroup::Tactical => &mut self.tactical,
    }
  }
}

fn parse_lines(content: &str) -> Vec<String> {
  content
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with('#'))
    .map(str::to_string)
    .collect()
}
