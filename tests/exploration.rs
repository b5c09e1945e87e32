use graph_explorer::components::graph_explorer::{
	Direction, Edge, ExpandState, Explorer, ExplorerConfig, GraphAccess, GraphData, GraphError,
	HeadlessRenderer, MemoryGraph, Node, PointerInput, Viewport,
};

fn open(json: &str) -> Explorer<MemoryGraph> {
	let data: GraphData = serde_json::from_str(json).expect("valid graph json");
	let graph = MemoryGraph::from_data(&data).expect("consistent graph");
	Explorer::new(
		graph,
		Box::new(HeadlessRenderer::default()),
		Viewport::fullscreen(1600, 1200),
		ExplorerConfig::default(),
		0.0,
	)
	.expect("explorer opens")
}

fn click<G: GraphAccess>(explorer: &mut Explorer<G>, id: &str, now: f64) {
	let node = explorer.scene().node(id).expect("clicked node is displayed");
	let input = PointerInput::at(node.x, node.y);
	explorer.mouse_down(id, input);
	explorer.mouse_up(input, now).expect("toggle succeeds");
	explorer.tick(now + 1_000.0);
}

fn assert_arc_sets_consistent<G: GraphAccess>(explorer: &Explorer<G>) {
	let scene = explorer.scene();
	for arc in scene.arcs() {
		assert!(scene.node(&arc.source).unwrap().out_arcs().contains(&arc.id));
		assert!(scene.node(&arc.destination).unwrap().in_arcs().contains(&arc.id));
	}
	for node in scene.nodes() {
		for arc in node.in_arcs().iter().chain(node.out_arcs()) {
			assert!(scene.arc(arc).is_some(), "{} lists stale arc {}", node.id, arc);
		}
	}
}

#[test]
fn collapsing_prunes_leaves_but_keeps_busy_neighbors() {
	let mut explorer = open(
		r#"{
			"home": "a",
			"nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}, {"id": "e"}],
			"links": [
				{"source": "a", "target": "b", "label": "owns"},
				{"source": "a", "target": "c", "label": "knows"},
				{"source": "c", "target": "d", "label": "knows"},
				{"source": "e", "target": "c", "label": "owns"}
			]
		}"#,
	);
	explorer.tick(1_000.0);

	click(&mut explorer, "c", 2_000.0);
	click(&mut explorer, "d", 4_000.0);
	click(&mut explorer, "e", 6_000.0);
	click(&mut explorer, "c", 8_000.0);
	assert_arc_sets_consistent(&explorer);

	let c = explorer.scene().node("c").unwrap();
	assert_eq!(c.expand, ExpandState::Collapsed);
	assert_eq!(c.degree(), 3);
	assert!(explorer.scene().node("d").is_some());

	click(&mut explorer, "a", 10_000.0);
	let scene = explorer.scene();
	assert_eq!(scene.node("a").unwrap().expand, ExpandState::Collapsed);
	assert!(scene.node("b").is_none());
	assert_eq!(scene.node("c").unwrap().degree(), 3);
	assert_eq!(scene.node("c").unwrap().expand, ExpandState::Collapsed);
	assert_arc_sets_consistent(&explorer);
}

#[test]
fn dragging_never_toggles() {
	let mut explorer = open(
		r#"{ "nodes": [{"id": "h"}, {"id": "x"}], "links": [{"source": "h", "target": "x"}] }"#,
	);
	explorer.tick(1_000.0);
	let h = explorer.scene().node("h").unwrap();
	let (hx, hy) = (h.x, h.y);

	explorer.mouse_down("h", PointerInput::at(hx, hy));
	explorer.mouse_move(PointerInput::at(hx + 40, hy + 10));
	explorer.mouse_up(PointerInput::at(hx + 40, hy + 10), 2_000.0).unwrap();

	let h = explorer.scene().node("h").unwrap();
	assert_eq!((h.x, h.y), (hx + 40, hy + 10));
	assert_eq!(h.expand, ExpandState::Expanded);
	assert!(explorer.scene().node("x").is_some());
	assert_eq!(explorer.captured(), None);
}

/// A ring of `n` nodes computed on the fly, with no backing storage at all.
struct Ring {
	n: usize,
	released: bool,
}

impl Ring {
	fn node(&self, i: usize) -> Node {
		Node {
			id: format!("n{}", i % self.n),
			content: format!("Node {}", i % self.n),
			kind: "ring".to_string(),
			icon_url: None,
		}
	}

	fn index(id: &str) -> Option<usize> {
		id.strip_prefix('n')?.parse().ok()
	}

	fn check(&self) -> Result<(), GraphError> {
		if self.released { Err(GraphError::Released) } else { Ok(()) }
	}
}

impl GraphAccess for Ring {
	fn resolve_node(&self, id: &str) -> Result<Option<Node>, GraphError> {
		self.check()?;
		Ok(Ring::index(id).filter(|&i| i < self.n).map(|i| self.node(i)))
	}

	fn edge_labels(&self) -> Result<Vec<String>, GraphError> {
		self.check()?;
		Ok(vec!["next".to_string()])
	}

	fn incident_edges(&self, node: &Node, label: &str, direction: Direction) -> Result<Vec<Edge>, GraphError> {
		self.check()?;
		let Some(i) = Ring::index(&node.id) else {
			return Ok(Vec::new());
		};
		if label != "next" {
			return Ok(Vec::new());
		}
		let (from, to) = match direction {
			Direction::Outgoing => (i, (i + 1) % self.n),
			Direction::Incoming => ((i + self.n - 1) % self.n, i),
		};
		Ok(vec![Edge {
			id: format!("e{}", from),
			source: format!("n{}", from),
			destination: format!("n{}", to),
			label: "next".to_string(),
		}])
	}

	fn source(&self, edge: &Edge) -> Result<Node, GraphError> {
		self.check()?;
		Ok(self.node(Ring::index(&edge.source).unwrap_or(0)))
	}

	fn destination(&self, edge: &Edge) -> Result<Node, GraphError> {
		self.check()?;
		Ok(self.node(Ring::index(&edge.destination).unwrap_or(0)))
	}

	fn home_node(&self) -> Result<Node, GraphError> {
		self.check()?;
		Ok(self.node(0))
	}

	fn release(&mut self) {
		self.released = true;
	}
}

#[test]
fn works_over_any_store() {
	let mut explorer = Explorer::new(
		Ring { n: 6, released: false },
		Box::new(HeadlessRenderer::default()),
		Viewport::fullscreen(800, 600),
		ExplorerConfig::default(),
		0.0,
	)
	.unwrap();
	explorer.tick(1_000.0);

	let mut ids: Vec<_> = explorer.scene().nodes().map(|n| n.id.clone()).collect();
	ids.sort();
	assert_eq!(ids, vec!["n0", "n1", "n5"]);
	assert_eq!(explorer.scene().arc_count(), 2);

	click(&mut explorer, "n1", 2_000.0);
	assert!(explorer.scene().node("n2").is_some());
	assert_arc_sets_consistent(&explorer);

	explorer.release();
	assert_eq!(explorer.graph().home_node(), Err(GraphError::Released));
}
