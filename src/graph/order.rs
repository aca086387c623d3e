use std::collections::{HashMap, VecDeque};

use super::GraphError;

/// Kahn's algorithm over `(prerequisite, dependent)` edges.
///
/// The initial queue follows the order of `nodes` and newly freed nodes follow
/// edge order, so identical input always yields the same sequence. Cycles,
/// unknown endpoints and duplicate ids are errors; a partial order is never
/// returned.
pub fn topological_order<N, E>(nodes: &[N], edges: &[(E, E)]) -> Result<Vec<String>, GraphError>
where
    N: AsRef<str>,
    E: AsRef<str>,
{
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let id = node.as_ref();
        if index.insert(id, i).is_some() {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree = vec![0usize; nodes.len()];

    for (source, target) in edges {
        let (source, target) = (source.as_ref(), target.as_ref());
        let lookup = |id: &str| {
            index.get(id).copied().ok_or_else(|| GraphError::UnknownNode {
                id: id.to_string(),
                from: source.to_string(),
                to: target.to_string(),
            })
        };
        let from = lookup(source)?;
        let to = lookup(target)?;
        adjacency[from].push(to);
        in_degree[to] += 1;
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for &next in &adjacency[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() < nodes.len() {
        let unresolved: Vec<String> = (0..nodes.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| nodes[i].as_ref().to_string())
            .collect();
        tracing::warn!(
            ordered = order.len(),
            total = nodes.len(),
            unresolved = ?unresolved,
            "prerequisite graph contains a cycle"
        );
        return Err(GraphError::Cycle { unresolved });
    }

    Ok(order
        .into_iter()
        .map(|i| nodes[i].as_ref().to_string())
        .collect())
}
