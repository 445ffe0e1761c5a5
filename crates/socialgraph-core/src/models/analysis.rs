//! Result records of the graph analyses.

use serde::{Deserialize, Serialize};

// =============================================================================
// Shortest path
// =============================================================================

/// A vertex on a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    pub id_usuario: i64,
    pub nombre_completo: String,
}

/// Outcome of a shortest-path search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathResult {
    pub exists: bool,
    /// Origin first, destination last. Empty when no path exists.
    pub path: Vec<PathNode>,
    /// Number of edges on the path.
    pub length: usize,
}

impl ShortestPathResult {
    pub fn not_found() -> Self {
        Self {
            exists: false,
            path: Vec::new(),
            length: 0,
        }
    }

    pub fn ids(&self) -> Vec<i64> {
        self.path.iter().map(|n| n.id_usuario).collect()
    }
}

/// Work performed by a bounded traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    /// Depth levels queried against the store.
    pub depths_searched: usize,
    /// Vertices whose incident edges were fetched.
    pub vertices_expanded: usize,
}

// =============================================================================
// Recommendations
// =============================================================================

/// A friend-of-friend recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id_usuario: i64,
    pub nombre_completo: String,
    /// Number of distinct direct connections linking to the candidate.
    pub common_friends: usize,
    /// Those connections, ascending.
    pub common_friend_ids: Vec<i64>,
    /// `common_friends` relative to the best candidate, two decimals.
    pub score: f64,
}

// =============================================================================
// Ego network
// =============================================================================

/// A vertex of an ego network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgoNode {
    pub id_usuario: i64,
    pub label: String,
    pub edad: i64,
    pub latitud: f64,
    pub longitud: f64,
    pub hobby: Option<String>,
    /// Hex color derived from the hobby.
    pub color: String,
    pub is_center: bool,
}

/// A directed `CONECTADO` edge inside an ego network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EgoEdge {
    pub source: i64,
    pub target: i64,
}

/// Size and density figures of a subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub density: f64,
    pub avg_degree: f64,
}

/// The one-hop neighborhood of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgoNetwork {
    pub center: i64,
    pub nodes: Vec<EgoNode>,
    pub edges: Vec<EgoEdge>,
    pub stats: GraphStats,
}

// =============================================================================
// Communities
// =============================================================================

/// What the members of a community share.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommunityKey {
    Hobby { id_hobby: i64, nombre: String },
    Categoria { id_categoria_hobby: i64, nombre: String },
    SinHobby,
}

impl CommunityKey {
    pub fn label(&self) -> &str {
        match self {
            CommunityKey::Hobby { nombre, .. } | CommunityKey::Categoria { nombre, .. } => nombre,
            CommunityKey::SinHobby => "sin hobby",
        }
    }
}

/// A group of users sharing a hobby or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub key: CommunityKey,
    /// Member ids, ascending.
    pub members: Vec<i64>,
    pub size: usize,
}

/// A partition of all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub algorithm: String,
    pub communities: Vec<Community>,
    pub total_communities: usize,
}

// =============================================================================
// Connection listing
// =============================================================================

/// Outgoing connections of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsuarioConexiones {
    pub id_usuario: i64,
    /// Destination ids, ascending.
    pub conexiones: Vec<i64>,
}

/// Aggregate figures over all connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStats {
    pub total_usuarios_con_conexiones: usize,
    pub total_conexiones: usize,
}

/// Every directed connection in the graph, grouped by origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllConnections {
    pub conexiones: Vec<UsuarioConexiones>,
    pub stats: ConnectionStats,
}
