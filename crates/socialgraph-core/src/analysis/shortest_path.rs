use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::config::MAX_DEPTH_LIMIT;
use crate::error::GraphError;
use crate::models::{PathNode, ShortestPathResult, TraversalStats};
use crate::store::GraphDb;
use crate::validation::validate_range;

/// Shortest path between two users, following `CONECTADO` in either direction.
///
/// The search deepens one level at a time and issues a single neighbor
/// expansion per level, so a search bounded by `max_depth` never asks the
/// store about level `max_depth + 1`.
pub struct ShortestPath {
    db: Arc<GraphDb>,
}

impl ShortestPath {
    pub fn new(db: Arc<GraphDb>) -> Self {
        Self { db }
    }

    pub async fn find(
        &self,
        origin: i64,
        dest: i64,
        max_depth: usize,
    ) -> Result<ShortestPathResult, GraphError> {
        let (result, _) = self.find_traced(origin, dest, max_depth).await?;
        Ok(result)
    }

    /// Like [`ShortestPath::find`], also reporting how much of the graph was
    /// explored.
    pub async fn find_traced(
        &self,
        origin: i64,
        dest: i64,
        max_depth: usize,
    ) -> Result<(ShortestPathResult, TraversalStats), GraphError> {
        validate_range("max_depth", max_depth, 1, MAX_DEPTH_LIMIT)?;

        let origin_usuario = self
            .db
            .usuario(origin)
            .await?
            .ok_or_else(|| GraphError::not_found("usuario", origin))?;
        if origin == dest {
            let node = PathNode {
                id_usuario: origin,
                nombre_completo: origin_usuario.nombre_completo(),
            };
            return Ok((
                ShortestPathResult {
                    exists: true,
                    path: vec![node],
                    length: 0,
                },
                TraversalStats::default(),
            ));
        }
        self.db
            .usuario(dest)
            .await?
            .ok_or_else(|| GraphError::not_found("usuario", dest))?;

        let mut stats = TraversalStats::default();
        // vertex -> predecessor on a minimal path from origin
        let mut predecessor: HashMap<i64, i64> = HashMap::new();
        let mut visited: HashSet<i64> = HashSet::from([origin]);
        let mut frontier: Vec<i64> = vec![origin];

        for depth in 1..=max_depth {
            stats.depths_searched = depth;
            stats.vertices_expanded += frontier.len();

            let edges = self.db.edges_touching(&frontier).await?;
            let in_frontier: HashSet<i64> = frontier.iter().copied().collect();

            // Lowest-id predecessor wins so ties resolve deterministically.
            let mut discovered: BTreeMap<i64, i64> = BTreeMap::new();
            for edge in &edges {
                for (from, to) in [(edge.origen, edge.destino), (edge.destino, edge.origen)] {
                    if !in_frontier.contains(&from) || visited.contains(&to) {
                        continue;
                    }
                    discovered
                        .entry(to)
                        .and_modify(|pred| *pred = (*pred).min(from))
                        .or_insert(from);
                }
            }

            for (&vertex, &pred) in &discovered {
                visited.insert(vertex);
                predecessor.insert(vertex, pred);
            }

            if discovered.contains_key(&dest) {
                tracing::debug!(origin, dest, depth, "shortest path found");
                let ids = Self::walk_back(&predecessor, origin, dest);
                let path = self.resolve(&ids).await?;
                let result = ShortestPathResult {
                    exists: true,
                    length: path.len() - 1,
                    path,
                };
                return Ok((result, stats));
            }

            if discovered.is_empty() {
                break;
            }
            frontier = discovered.into_keys().collect();
        }

        tracing::debug!(origin, dest, max_depth, "no path within depth");
        Ok((ShortestPathResult::not_found(), stats))
    }

    fn walk_back(predecessor: &HashMap<i64, i64>, origin: i64, dest: i64) -> Vec<i64> {
        let mut ids = vec![dest];
        let mut current = dest;
        while current != origin {
            match predecessor.get(&current) {
                Some(&pred) => {
                    ids.push(pred);
                    current = pred;
                }
                None => break,
            }
        }
        ids.reverse();
        ids
    }

    async fn resolve(&self, ids: &[i64]) -> Result<Vec<PathNode>, GraphError> {
        let names: HashMap<i64, String> = self
            .db
            .usuarios(ids)
            .await?
            .into_iter()
            .map(|u| (u.id_usuario, u.nombre_completo()))
            .collect();

        ids.iter()
            .map(|id| {
                names
                    .get(id)
                    .map(|nombre| PathNode {
                        id_usuario: *id,
                        nombre_completo: nombre.clone(),
                    })
                    .ok_or_else(|| GraphError::not_found("usuario", id))
            })
            .collect()
    }
}
