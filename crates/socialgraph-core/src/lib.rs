pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod social;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::GraphError;
pub use repository::{HobbyRepository, UsuarioRepository};
pub use social::SocialGraph;
pub use store::{Catalog, GraphDb};
