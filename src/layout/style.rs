//! Presentational attributes derived from a change category.
//!
//! This is the only place colors are chosen; nodes and edges carry the
//! result so the renderer never maps categories itself.

use serde::Serialize;

use super::types::ChangeCategory;

/// Outline pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
	/// Continuous line.
	Solid,
	/// Dash length and gap, in layout units.
	Dashed(u8, u8),
}

impl StrokeStyle {
	/// Canvas dash pattern; `None` for solid.
	pub fn dash_pattern(&self) -> Option<(f64, f64)> {
		match *self {
			StrokeStyle::Solid => None,
			StrokeStyle::Dashed(dash, gap) => Some((dash as f64, gap as f64)),
		}
	}
}

/// Colors of one node box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
	/// Box background.
	pub fill: &'static str,
	/// Box outline.
	pub border: &'static str,
	/// Label color.
	pub text: &'static str,
	/// Outline pattern.
	pub stroke: StrokeStyle,
	/// Whether the package name is struck out.
	pub strike_through: bool,
}

/// Colors of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeStyle {
	/// Line and arrowhead color.
	pub color: &'static str,
	/// Line pattern when not animated.
	pub stroke: StrokeStyle,
}

const NEUTRAL: NodeStyle = NodeStyle {
	fill: "#f8fafc",
	border: "#94a3b8",
	text: "#475569",
	stroke: StrokeStyle::Solid,
	strike_through: false,
};

/// Style for a category; unknown categories get the neutral default.
pub fn node_style(category: &ChangeCategory) -> NodeStyle {
	let (fill, border, text) = match category {
		ChangeCategory::Added => ("#dcfce7", "#16a34a", "#166534"),
		ChangeCategory::Modified => ("#fef3c7", "#d97706", "#92400e"),
		ChangeCategory::Deprecated => ("#fed7d7", "#e53e3e", "#c53030"),
		ChangeCategory::Removed => ("#f3f4f6", "#6b7280", "#374151"),
		ChangeCategory::BugFix => ("#dbeafe", "#2563eb", "#1e40af"),
		ChangeCategory::SecurityFix => ("#fee2e2", "#dc2626", "#991b1b"),
		ChangeCategory::TestFix => ("#ede9fe", "#7c3aed", "#5b21b6"),
		ChangeCategory::Compatibility => ("#cffafe", "#0891b2", "#155e75"),
		ChangeCategory::SecurityEnhancement => ("#fce7f3", "#db2777", "#9d174d"),
		ChangeCategory::Base => ("#e0e7ff", "#4f46e5", "#3730a3"),
		ChangeCategory::Other(_) => return NEUTRAL,
	};
	let stroke = match category {
		ChangeCategory::Deprecated => StrokeStyle::Dashed(5, 5),
		ChangeCategory::Removed => StrokeStyle::Dashed(10, 5),
		_ => StrokeStyle::Solid,
	};
	NodeStyle {
		fill,
		border,
		text,
		stroke,
		strike_through: *category == ChangeCategory::Removed,
	}
}

/// Edges take the look of the version they lead to.
pub fn edge_style(target: &ChangeCategory) -> EdgeStyle {
	let style = node_style(target);
	EdgeStyle {
		color: style.border,
		stroke: style.stroke,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_category_gets_neutral_style() {
		let style = node_style(&ChangeCategory::Other("Renamed".into()));
		assert_eq!(style, NEUTRAL);
	}

	#[test]
	fn every_known_category_has_distinct_border() {
		let borders: std::collections::HashSet<&str> = ChangeCategory::KNOWN
			.iter()
			.map(|c| node_style(c).border)
			.collect();
		assert_eq!(borders.len(), ChangeCategory::KNOWN.len());
	}

	#[test]
	fn removed_is_struck_through_and_dashed() {
		let style = node_style(&ChangeCategory::Removed);
		assert!(style.strike_through);
		assert_eq!(style.stroke.dash_pattern(), Some((10.0, 5.0)));
		assert_eq!(
			edge_style(&ChangeCategory::Deprecated),
			EdgeStyle {
				color: "#e53e3e",
				stroke: StrokeStyle::Dashed(5, 5),
			}
		);
	}
}
