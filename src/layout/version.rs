//! Major/minor classification of release identifiers.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::timeline::Timeline;

/// Where an identifier sits on the release line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VersionKind {
	/// Two components, e.g. `1.23`.
	Major,
	/// Three components, e.g. `1.23.1`, branching off `major`.
	Minor { major: String },
}

impl VersionKind {
	/// Classifies by component count. Anything other than two or three
	/// components is malformed.
	pub fn classify(identifier: &str) -> Option<VersionKind> {
		let parts: Vec<&str> = identifier.split('.').collect();
		match parts.len() {
			2 => Some(VersionKind::Major),
			3 => Some(VersionKind::Minor {
				major: format!("{}.{}", parts[0], parts[1]),
			}),
			_ => None,
		}
	}

	/// Major a revision branches off; `None` for majors.
	pub fn major_prefix(&self) -> Option<&str> {
		match self {
			VersionKind::Major => None,
			VersionKind::Minor { major } => Some(major),
		}
	}
}

/// Majors and their revisions, both in timeline order.
#[derive(Debug, Clone, Default)]
pub struct VersionIndex {
	majors: Vec<String>,
	major_rank: HashMap<String, usize>,
	minors_by_major: BTreeMap<String, Vec<String>>,
	malformed: Vec<String>,
}

impl VersionIndex {
	/// Classifies every identifier on the timeline.
	pub fn new(timeline: &Timeline) -> Self {
		let mut index = VersionIndex::default();
		for identifier in timeline.identifiers() {
			match VersionKind::classify(identifier) {
				Some(VersionKind::Major) => {
					index
						.major_rank
						.insert(identifier.to_string(), index.majors.len());
					index.majors.push(identifier.to_string());
				}
				Some(VersionKind::Minor { major }) => {
					index
						.minors_by_major
						.entry(major)
						.or_default()
						.push(identifier.to_string());
				}
				None => {
					log::warn!("Ignoring malformed release identifier {:?}", identifier);
					index.malformed.push(identifier.to_string());
				}
			}
		}
		index
	}

	/// Majors in timeline order.
	pub fn majors(&self) -> &[String] {
		&self.majors
	}

	/// Revision identifiers keyed by their major prefix.
	pub fn minors_by_major(&self) -> &BTreeMap<String, Vec<String>> {
		&self.minors_by_major
	}

	/// Zero-based position of `major` among all known majors.
	pub fn major_rank(&self, major: &str) -> Option<usize> {
		self.major_rank.get(major).copied()
	}

	/// Branch lane of a revision group; prefixes that never shipped as a
	/// release go below every known major.
	pub fn branch_lane(&self, major: &str) -> usize {
		self.major_rank(major).unwrap_or(self.majors.len()) + 1
	}

	/// Identifiers that are neither major nor revision.
	pub fn malformed(&self) -> &[String] {
		&self.malformed
	}
}
