use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::GraphError;
use crate::models::{AllConnections, ConnectionStats, UsuarioConexiones};
use crate::store::GraphDb;

/// Lists every directed connection in the graph.
pub struct ConnectionLister {
    db: Arc<GraphDb>,
}

impl ConnectionLister {
    pub fn new(db: Arc<GraphDb>) -> Self {
        Self { db }
    }

    /// Users with at least one outgoing edge, by ascending id, each with its
    /// destinations ascending.
    pub async fn list_all(&self) -> Result<AllConnections, GraphError> {
        let edges = self.db.all_edges().await?;
        let total_conexiones = edges.len();

        let mut by_origin: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for edge in edges {
            by_origin.entry(edge.origen).or_default().push(edge.destino);
        }

        let conexiones: Vec<UsuarioConexiones> = by_origin
            .into_iter()
            .map(|(id_usuario, mut destinos)| {
                destinos.sort_unstable();
                UsuarioConexiones {
                    id_usuario,
                    conexiones: destinos,
                }
            })
            .collect();

        Ok(AllConnections {
            stats: ConnectionStats {
                total_usuarios_con_conexiones: conexiones.len(),
                total_conexiones,
            },
            conexiones,
        })
    }
}
