//! Knowledge graph of prerequisite relations and study-order computation.

mod order;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use order::topological_order;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("not a DAG: cycle through {unresolved:?}")]
    Cycle { unresolved: Vec<String> },
    #[error("unknown node {id} referenced by edge {from} -> {to}")]
    UnknownNode { id: String, from: String, to: String },
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 0 = basic, 1 = intermediate, 2 = advanced, 3 = expert
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub difficulty: String,
}

/// `source` is a prerequisite of `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default = "default_edge_weight")]
    pub weight: f64,
}

fn default_edge_weight() -> f64 {
    1.0
}

impl PrerequisiteEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            reason: String::new(),
            weight: default_edge_weight(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub nodes: Vec<KnowledgeNode>,
    #[serde(default)]
    pub edges: Vec<PrerequisiteEdge>,
}

impl KnowledgeGraph {
    pub fn node(&self, id: &str) -> Option<&KnowledgeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Node ids in a valid study order.
    pub fn learning_path(&self) -> Result<Vec<String>, GraphError> {
        let ids: Vec<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let edges: Vec<(&str, &str)> = self
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        topological_order(&ids, &edges)
    }

    /// Node names in study order.
    pub fn learning_path_names(&self) -> Result<Vec<String>, GraphError> {
        let path = self.learning_path()?;
        Ok(path
            .iter()
            .filter_map(|id| self.node(id).map(|n| n.name.clone()))
            .collect())
    }

    /// Checks ids are unique, every edge endpoint exists and there is no cycle.
    pub fn validate(&self) -> Result<(), GraphError> {
        self.learning_path().map(|_| ())
    }

    /// Level -> node names, each level in node order.
    pub fn nodes_by_level(&self) -> BTreeMap<u8, Vec<&str>> {
        let mut levels: BTreeMap<u8, Vec<&str>> = BTreeMap::new();
        for node in &self.nodes {
            levels.entry(node.level).or_default().push(node.name.as_str());
        }
        levels
    }
}
