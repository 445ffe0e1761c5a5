use std::collections::BTreeSet;
use std::sync::Arc;

use super::round_to;
use crate::config::{MAX_EGO_MAX_NODES, MIN_EGO_MAX_NODES};
use crate::error::GraphError;
use crate::models::{EgoEdge, EgoNetwork, EgoNode, GraphStats};
use crate::store::GraphDb;
use crate::validation::validate_range;

const DEFAULT_COLOR: &str = "#95a5a6";

/// Visualization color of a hobby. Unknown or missing hobbies get a neutral gray.
pub fn hobby_color(hobby: Option<&str>) -> &'static str {
    match hobby {
        Some("futbol") => "#ff6b6b",
        Some("basquetbol") => "#ee5a6f",
        Some("tenis") => "#f06595",
        Some("pintura") => "#4ecdc4",
        Some("escultura") => "#45b7d1",
        Some("fotografia") => "#96ceb4",
        Some("guitarra") => "#feca57",
        Some("piano") => "#ff9ff3",
        Some("lectura") => "#54a0ff",
        Some("cocina") => "#48dbfb",
        _ => DEFAULT_COLOR,
    }
}

/// Extracts the depth-1 neighborhood of a user.
pub struct EgoNetworkExtractor {
    db: Arc<GraphDb>,
}

impl EgoNetworkExtractor {
    pub fn new(db: Arc<GraphDb>) -> Self {
        Self { db }
    }

    /// The user, every user with an edge to or from it (lowest ids first, at
    /// most `max_nodes` vertices in total), and every edge among them.
    pub async fn extract(&self, user: i64, max_nodes: usize) -> Result<EgoNetwork, GraphError> {
        validate_range("max_nodes", max_nodes, MIN_EGO_MAX_NODES, MAX_EGO_MAX_NODES)?;

        self.db
            .usuario(user)
            .await?
            .ok_or_else(|| GraphError::not_found("usuario", user))?;

        let neighbors: BTreeSet<i64> = self
            .db
            .edges_touching(&[user])
            .await?
            .iter()
            .filter_map(|edge| edge.other(user))
            .collect();

        let mut ids = vec![user];
        ids.extend(neighbors.into_iter().take(max_nodes - 1));

        let usuarios = self.db.usuarios(&ids).await?;
        let hobbies = self.db.hobbies_for_users(Some(ids.as_slice())).await?;

        let mut nodes: Vec<EgoNode> = usuarios
            .into_iter()
            .map(|u| {
                let hobby = hobbies.get(&u.id_usuario).map(|h| h.nombre.clone());
                EgoNode {
                    id_usuario: u.id_usuario,
                    label: u.nombre_completo(),
                    edad: u.edad,
                    latitud: u.latitud,
                    longitud: u.longitud,
                    color: hobby_color(hobby.as_deref()).to_string(),
                    hobby,
                    is_center: u.id_usuario == user,
                }
            })
            .collect();
        // center first, then neighbors ascending
        nodes.sort_by_key(|n| (!n.is_center, n.id_usuario));

        let mut edges: Vec<EgoEdge> = self
            .db
            .edges_within(&ids)
            .await?
            .into_iter()
            .map(|e| EgoEdge {
                source: e.origen,
                target: e.destino,
            })
            .collect();
        edges.sort();

        let stats = graph_stats(nodes.len(), edges.len());
        tracing::debug!(user, nodes = stats.total_nodes, edges = stats.total_edges, "ego network extracted");

        Ok(EgoNetwork {
            center: user,
            nodes,
            edges,
            stats,
        })
    }
}

/// Density over the undirected pair count and average degree.
fn graph_stats(total_nodes: usize, total_edges: usize) -> GraphStats {
    let n = total_nodes as f64;
    let e = total_edges as f64;

    let density = if total_nodes > 1 {
        round_to(e / (n * (n - 1.0) / 2.0), 4)
    } else {
        0.0
    };
    let avg_degree = if total_nodes > 0 {
        round_to(2.0 * e / n, 2)
    } else {
        0.0
    };

    GraphStats {
        total_nodes,
        total_edges,
        density,
        avg_degree,
    }
}
