//! Data models for the social graph.

mod analysis;
mod hobby;
mod usuario;

pub use analysis::{
    AllConnections, Community, CommunityKey, CommunityReport, ConnectionStats, EgoEdge, EgoNetwork,
    EgoNode, GraphStats, PathNode, Recommendation, ShortestPathResult, TraversalStats,
    UsuarioConexiones,
};
pub use hobby::{CategoriaHobby, Hobby, HobbyConCategoria};
pub use usuario::{HobbyCambio, NuevoUsuario, Page, Usuario, UsuarioCambios, UsuarioDetalle, UsuarioResumen};
