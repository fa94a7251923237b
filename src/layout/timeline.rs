//! Canonical release order, the X axis.

use std::collections::HashMap;

use super::config::LayoutConfig;
use super::types::{Release, TimelineTick};

/// Canonical chronological order of every known release.
///
/// Releases are ordered by date and then by identifier, so two releases
/// published on the same day always land in the same slots.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
	releases: Vec<Release>,
	ranks: HashMap<String, usize>,
}

impl Timeline {
	/// Sorts by date then identifier, keeping the earliest of duplicates.
	pub fn new(releases: &[Release]) -> Self {
		let mut sorted = releases.to_vec();
		sorted.sort_by(|a, b| {
			a.release_date
				.cmp(&b.release_date)
				.then_with(|| a.identifier.cmp(&b.identifier))
		});

		let mut ranks = HashMap::with_capacity(sorted.len());
		let mut ordered = Vec::with_capacity(sorted.len());
		for release in sorted {
			if ranks.contains_key(&release.identifier) {
				log::debug!("Duplicate release {} ignored", release.identifier);
				continue;
			}
			ranks.insert(release.identifier.clone(), ordered.len());
			ordered.push(release);
		}

		Self {
			releases: ordered,
			ranks,
		}
	}

	/// Column of `identifier`, if it is a release.
	pub fn rank(&self, identifier: &str) -> Option<usize> {
		self.ranks.get(identifier).copied()
	}

	/// Number of distinct releases.
	pub fn len(&self) -> usize {
		self.releases.len()
	}

	/// No releases at all.
	pub fn is_empty(&self) -> bool {
		self.releases.is_empty()
	}

	/// Identifiers in timeline order.
	pub fn identifiers(&self) -> impl Iterator<Item = &str> {
		self.releases.iter().map(|r| r.identifier.as_str())
	}

	/// One axis label per release, at its column X.
	pub fn ticks(&self, config: &LayoutConfig) -> Vec<TimelineTick> {
		self.releases
			.iter()
			.enumerate()
			.map(|(rank, release)| TimelineTick {
				identifier: release.identifier.clone(),
				release_date: release.release_date,
				x: config.x_for_rank(rank),
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::test_support::release;
	use pretty_assertions::assert_eq;

	#[test]
	fn orders_by_date_then_identifier() {
		let timeline = Timeline::new(&[
			release("1.22", "2024-02-06"),
			release("1.21.9", "2024-04-03"),
			release("1.22.2", "2024-04-03"),
			release("1.21", "2023-08-08"),
		]);
		let order: Vec<&str> = timeline.identifiers().collect();
		assert_eq!(order, vec!["1.21", "1.22", "1.21.9", "1.22.2"]);
		assert_eq!(timeline.rank("1.21"), Some(0));
		assert_eq!(timeline.rank("1.22.2"), Some(3));
		assert_eq!(timeline.rank("1.23"), None);
	}

	#[test]
	fn input_order_does_not_change_ranks() {
		let forward = [
			release("1.20", "2023-02-01"),
			release("1.20.1", "2023-02-14"),
			release("1.21", "2023-08-08"),
		];
		let mut reversed = forward.clone();
		reversed.reverse();

		let a = Timeline::new(&forward);
		let b = Timeline::new(&reversed);
		for r in &forward {
			assert_eq!(a.rank(&r.identifier), b.rank(&r.identifier));
		}
	}

	#[test]
	fn duplicates_collapse_to_earliest() {
		let timeline = Timeline::new(&[
			release("1.21", "2023-08-08"),
			release("1.21", "2023-09-01"),
			release("1.22", "2024-02-06"),
		]);
		assert_eq!(timeline.len(), 2);
		assert_eq!(timeline.rank("1.22"), Some(1));
	}

	#[test]
	fn ticks_share_node_x() {
		let config = LayoutConfig::default();
		let timeline = Timeline::new(&[release("1.21", "2023-08-08"), release("1.22", "2024-02-06")]);
		let ticks = timeline.ticks(&config);
		assert_eq!(ticks.len(), 2);
		assert_eq!(ticks[1].identifier, "1.22");
		assert_eq!(ticks[1].x, config.x_for_rank(1));
	}
}
