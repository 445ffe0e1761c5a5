//! Entity repositories over the graph store.
//!
//! - [`UsuarioRepository`] - user vertices, their hobby and `CONECTADO` edges
//! - [`HobbyRepository`] - read-only hobby catalog

mod hobby;
mod usuario;

pub use hobby::{GraphHobbyRepository, HobbyRepository};
pub use usuario::{GraphUsuarioRepository, UsuarioRepository};
