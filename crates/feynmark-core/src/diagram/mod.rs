//! Abstract diagram description consumed by the assembler.
//!
//! The JSON shape matches what diagram generators emit:
//!
//! ```json
//! {
//!   "nodes": { "v1": { "style": "blob" }, "v2": {} },
//!   "edges": [
//!     { "start": [0, 0], "end": [10, 0], "bend": 0.0, "type": "fermion",
//!       "start_node": "v1", "end_node": "v2", "label": "p", "is_anti": false }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::geom::{Point, is_finite};
use crate::style::{Particle, VertexStyle};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    pub id: String,
    pub style: Option<VertexStyle>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: VertexStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Whether this node needs a once-per-diagram vertex decoration.
    pub fn is_special(&self) -> bool {
        self.style.is_some_and(VertexStyle::is_special)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(default)]
    pub id: String,
    pub start_node: String,
    pub end_node: String,
    pub start: Point,
    pub end: Point,
    /// Signed control-point offset relative to the chord length; 0 is a straight edge.
    #[serde(default)]
    pub bend: f64,
    #[serde(rename = "type", default)]
    pub particle: Particle,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "is_anti", default)]
    pub anti: bool,
}

impl EdgeSpec {
    pub fn new(
        id: impl Into<String>,
        start_node: impl Into<String>,
        end_node: impl Into<String>,
        start: Point,
        end: Point,
    ) -> Self {
        Self {
            id: id.into(),
            start_node: start_node.into(),
            end_node: end_node.into(),
            start,
            end,
            bend: 0.0,
            particle: Particle::Fermion,
            label: None,
            anti: false,
        }
    }

    pub fn with_bend(mut self, bend: f64) -> Self {
        self.bend = bend;
        self
    }

    pub fn with_particle(mut self, particle: Particle) -> Self {
        self.particle = particle;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_anti(mut self, anti: bool) -> Self {
        self.anti = anti;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DiagramSpec {
    pub nodes: IndexMap<String, NodeSpec>,
    /// Order is significant: it decides which edge decorates a shared node.
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Deserialize)]
struct RawDiagram {
    #[serde(default)]
    nodes: IndexMap<String, RawNode>,
    #[serde(default)]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNode {
    #[serde(default)]
    style: Option<String>,
}

impl DiagramSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: NodeSpec) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    pub fn with_edge(mut self, edge: EdgeSpec) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.get(id)
    }

    pub fn is_special(&self, id: &str) -> bool {
        self.node(id).is_some_and(NodeSpec::is_special)
    }

    /// Decodes generator JSON and validates it.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawDiagram = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDiagram) -> Result<Self> {
        let nodes = raw
            .nodes
            .into_iter()
            .map(|(id, node)| {
                let style = node.style.as_deref().map(VertexStyle::from_tag);
                (id.clone(), NodeSpec { id, style })
            })
            .collect();

        let mut edges = raw.edges;
        for (idx, edge) in edges.iter_mut().enumerate() {
            if edge.id.is_empty() {
                edge.id = format!("e{idx}");
            }
        }

        let spec = Self { nodes, edges };
        spec.validate()?;
        Ok(spec)
    }

    /// Rejects input that cannot be assembled; runs before any edge is processed.
    pub fn validate(&self) -> Result<()> {
        if let Some(id) = self.nodes.keys().find(|id| id.trim().is_empty()) {
            return Err(Error::generation_input(format!(
                "node id must not be empty (got {id:?})"
            )));
        }
        for edge in &self.edges {
            if edge.start_node.trim().is_empty() || edge.end_node.trim().is_empty() {
                return Err(Error::generation_input(format!(
                    "edge {} is missing a start or end node id",
                    edge.id
                )));
            }
            if !is_finite(edge.start) || !is_finite(edge.end) {
                return Err(Error::generation_input(format!(
                    "edge {} has non-finite coordinates",
                    edge.id
                )));
            }
            if !edge.bend.is_finite() {
                return Err(Error::generation_input(format!(
                    "edge {} has a non-finite bend factor",
                    edge.id
                )));
            }
        }
        Ok(())
    }
}
