use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::entity::EntityKind;

/// Summary of the entity dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub self_references: Vec<String>,
}

/// Load order for the relational shape, parents before children.
#[derive(Debug, Clone, Serialize)]
pub struct LoadOrderReport {
    pub summary: GraphSummary,
    pub load_order: Option<Vec<EntityKind>>,
    pub cycle: Option<Vec<EntityKind>>,
}

/// Build a deterministic dependency report over foreign keys and polymorphic references.
///
/// Self references (the org unit hierarchy) do not constrain table order and
/// are reported separately.
pub fn build_load_order_report() -> LoadOrderReport {
    let (graph, self_references) = build_adjacency();
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = GraphSummary {
        nodes,
        edges,
        self_references: self_references
            .iter()
            .map(|kind| kind.name().to_string())
            .collect(),
    };

    match toposort(&graph) {
        Ok(order) => LoadOrderReport {
            summary,
            load_order: Some(order),
            cycle: None,
        },
        Err(cycle) => LoadOrderReport {
            summary,
            load_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency() -> (BTreeMap<EntityKind, BTreeSet<EntityKind>>, Vec<EntityKind>) {
    let mut graph: BTreeMap<EntityKind, BTreeSet<EntityKind>> = BTreeMap::new();
    let mut self_references = Vec::new();

    for kind in EntityKind::ALL {
        graph.entry(kind).or_default();

        let parents = kind
            .foreign_keys()
            .iter()
            .map(|fk| fk.target)
            .chain(kind.polymorphic_targets().iter().copied());
        for parent in parents {
            if parent == kind {
                self_references.push(kind);
                continue;
            }
            graph.entry(parent).or_default().insert(kind);
        }
    }

    (graph, self_references)
}

fn toposort(
    graph: &BTreeMap<EntityKind, BTreeSet<EntityKind>>,
) -> Result<Vec<EntityKind>, Vec<EntityKind>> {
    let mut indegree: BTreeMap<EntityKind, usize> = graph.keys().map(|node| (*node, 0)).collect();

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(*target).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<EntityKind> = indegree
        .iter()
        .filter_map(|(node, count)| if *count == 0 { Some(*node) } else { None })
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        order.push(node);

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*target);
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        Err(indegree
            .into_iter()
            .filter_map(|(node, count)| if count > 0 { Some(node) } else { None })
            .collect())
    }
}
