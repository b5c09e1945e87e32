//! Visual theming for the explorer canvas.
//!
//! Provides colors for node kinds, expand/press states and arcs.

use super::model::{ExpandState, NodeState, PointerState};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors handed out to node kinds.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted, harmonious palette - slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	/// Warm earth tones - muted oranges and browns
	pub fn earth() -> Self {
		Self {
			colors: vec![
				Color::rgb(180, 136, 100), // Tan
				Color::rgb(160, 125, 100), // Taupe
				Color::rgb(170, 145, 115), // Khaki
				Color::rgb(145, 120, 95),  // Umber
				Color::rgb(175, 150, 120), // Sand
				Color::rgb(155, 130, 105), // Bronze
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	/// Stable palette slot for a kind tag, so a kind keeps its color across
	/// sessions.
	pub fn for_kind(&self, kind: &str) -> Color {
		let hash = kind
			.bytes()
			.fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
		self.get(hash)
	}
}

/// Node box style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// How much lighter an expanded node is drawn than a collapsed one.
	pub expanded_lighten: f64,
	/// Outline of a pressed or dragged node.
	pub pressed_border: Color,
	pub border_width: f64,
	/// Drop shadow behind a node being dragged.
	pub drag_shadow: Color,
	pub label_color: Color,
	pub font: &'static str,
	/// Line height of the label, in pixels.
	pub label_height: f64,
	/// Space between label and box edge, in pixels.
	pub padding: f64,
	/// Icon edge length, in pixels.
	pub icon_size: f64,
}

/// Arc connector style.
#[derive(Clone, Debug)]
pub struct ArcStyle {
	pub color: Color,
	pub label_color: Color,
	pub line_width: f64,
	pub arrow_size: f64,
	/// Dash pattern (dash, gap) for arcs that lead to collapsed leaves.
	pub leaf_dash: (f64, f64),
	pub font: &'static str,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub node: NodeStyle,
	pub arc: ArcStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Clean dark theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: Color::rgb(22, 27, 34),
			node: NodeStyle {
				expanded_lighten: 0.25,
				pressed_border: Color::rgba(255, 255, 255, 0.9),
				border_width: 2.0,
				drag_shadow: Color::rgba(0, 0, 0, 0.45),
				label_color: Color::rgb(240, 244, 248),
				font: "13px sans-serif",
				label_height: 16.0,
				padding: 8.0,
				icon_size: 16.0,
			},
			arc: ArcStyle {
				color: Color::rgba(140, 160, 180, 0.7),
				label_color: Color::rgba(190, 200, 215, 0.9),
				line_width: 1.5,
				arrow_size: 8.0,
				leaf_dash: (6.0, 4.0),
				font: "11px sans-serif",
			},
			palette: NodePalette::slate(),
		}
	}

	/// Warm earth tones theme
	pub fn ember() -> Self {
		Self {
			name: "ember",
			background: Color::rgb(28, 24, 22),
			arc: ArcStyle {
				color: Color::rgba(160, 130, 110, 0.7),
				label_color: Color::rgba(210, 190, 170, 0.9),
				..Self::default_theme().arc
			},
			palette: NodePalette::earth(),
			..Self::default_theme()
		}
	}

	/// Looks a theme up by name, falling back to the default.
	pub fn named(name: &str) -> Self {
		match name {
			"ember" => Self::ember(),
			_ => Self::default_theme(),
		}
	}

	/// Fill color for a node, from its kind and state.
	pub fn node_fill(&self, node: &NodeState) -> Color {
		let base = self.palette.for_kind(&node.kind);
		match (node.expand, node.pointer) {
			(_, PointerState::Dragging) => base.lighten(self.node.expanded_lighten).with_alpha(0.85),
			(ExpandState::Expanded, _) => base.lighten(self.node.expanded_lighten),
			(ExpandState::Collapsed, _) => base.darken(0.1),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expanded_nodes_are_lighter() {
		let theme = Theme::default();
		let collapsed = NodeState::new("a", 0, 0);
		let expanded = collapsed.clone().with_expand(ExpandState::Expanded);
		let (c, e) = (theme.node_fill(&collapsed), theme.node_fill(&expanded));
		assert!(e.r > c.r && e.g > c.g && e.b > c.b);
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}
}
