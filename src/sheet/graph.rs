// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Recompute dependency graph.
//!
//! Each field key is a node; each binding contributes input → output edges.
//! Compilation topologically sorts the graph once, so a field change
//! re-evaluates exactly the affected derived fields, in dependency order,
//! deterministically. This replaces chained deferred updates with a single
//! evaluation pass and makes cyclic plans a construction-time error.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use super::plan::TestPlan;

pub struct RecalcGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
    /// Derived output keys in global topological order.
    order: Vec<String>,
    outputs: HashSet<String>,
}

impl RecalcGraph {
    /// Build and validate the dependency graph for a plan.
    pub fn compile(plan: &TestPlan) -> Result<RecalcGraph, String> {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
        let mut outputs: HashSet<String> = HashSet::new();

        let mut node_of = |graph: &mut DiGraph<String, ()>, key: &str| -> NodeIndex {
            if let Some(&idx) = nodes.get(key) {
                return idx;
            }
            let idx = graph.add_node(key.to_string());
            nodes.insert(key.to_string(), idx);
            idx
        };

        for binding in &plan.bindings {
            if !outputs.insert(binding.output.clone()) {
                return Err(format!(
                    "plan '{}' defines '{}' twice",
                    plan.id, binding.output
                ));
            }
            let out = node_of(&mut graph, &binding.output);
            for input in &binding.inputs {
                let src = node_of(&mut graph, input);
                graph.add_edge(src, out, ());
            }
        }

        let sorted = petgraph::algo::toposort(&graph, None)
            .map_err(|_| format!("plan '{}' has a dependency cycle", plan.id))?;

        let order = sorted
            .into_iter()
            .map(|idx| graph[idx].clone())
            .filter(|key| outputs.contains(key))
            .collect();

        Ok(RecalcGraph {
            graph,
            nodes,
            order,
            outputs,
        })
    }

    /// Derived fields downstream of `key` (inclusive when `key` itself is
    /// derived), in evaluation order. Unknown keys affect nothing.
    pub fn affected(&self, key: &str) -> Vec<String> {
        let Some(&start) = self.nodes.get(key) else {
            return Vec::new();
        };
        let mut reached: HashSet<&str> = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            reached.insert(self.graph[idx].as_str());
        }
        self.order
            .iter()
            .filter(|k| reached.contains(k.as_str()))
            .cloned()
            .collect()
    }

    /// Every derived field in evaluation order (full hydration pass).
    pub fn full_order(&self) -> &[String] {
        &self.order
    }

    pub fn is_output(&self, key: &str) -> bool {
        self.outputs.contains(key)
    }
}
