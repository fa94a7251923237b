//! Package tracks, top to bottom.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::types::EvolutionIndex;

/// Assigns every package a track, oldest package first.
///
/// `listed` is the backend's package list; packages appearing only there
/// (no records) sort after every package with history, by name.
pub fn order_packages(index: &EvolutionIndex, listed: &[String]) -> Vec<String> {
	let names: BTreeSet<&str> = index
		.keys()
		.map(String::as_str)
		.chain(listed.iter().map(String::as_str))
		.collect();

	let mut keyed: Vec<(Option<DateTime<Utc>>, &str)> = names
		.into_iter()
		.map(|name| (first_appearance(index, name), name))
		.collect();

	// `None` must sort after every date, which is the reverse of Option's Ord.
	keyed.sort_by(|(a_date, a_name), (b_date, b_name)| {
		match (a_date, b_date) {
			(Some(a), Some(b)) => a.cmp(b),
			(Some(_), None) => std::cmp::Ordering::Less,
			(None, Some(_)) => std::cmp::Ordering::Greater,
			(None, None) => std::cmp::Ordering::Equal,
		}
		.then_with(|| a_name.cmp(b_name))
	});

	keyed
		.into_iter()
		.map(|(_, name)| name.to_string())
		.collect()
}

fn first_appearance(index: &EvolutionIndex, package: &str) -> Option<DateTime<Utc>> {
	index
		.get(package)?
		.iter()
		.map(|record| record.release_date)
		.min()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::test_support::record;
	use crate::layout::types::ChangeCategory;
	use pretty_assertions::assert_eq;

	#[test]
	fn earliest_record_decides_track() {
		let mut index = EvolutionIndex::new();
		index.insert(
			"slices".into(),
			vec![record("1.21", "2023-08-08", ChangeCategory::Added)],
		);
		index.insert(
			"net/http".into(),
			vec![
				record("1.22", "2024-02-06", ChangeCategory::Modified),
				record("1.20", "2023-02-01", ChangeCategory::Modified),
			],
		);
		index.insert(
			"maps".into(),
			vec![record("1.21", "2023-08-08", ChangeCategory::Added)],
		);

		assert_eq!(
			order_packages(&index, &[]),
			vec!["net/http", "maps", "slices"]
		);
	}

	#[test]
	fn packages_without_history_go_last_by_name() {
		let mut index = EvolutionIndex::new();
		index.insert(
			"os".into(),
			vec![record("1.21", "2023-08-08", ChangeCategory::Modified)],
		);
		index.insert("zeta".into(), Vec::new());

		let listed = vec!["alpha".to_string(), "os".to_string()];
		assert_eq!(order_packages(&index, &listed), vec!["os", "alpha", "zeta"]);
	}
}
