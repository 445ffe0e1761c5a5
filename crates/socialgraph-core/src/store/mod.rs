//! Graph storage on embedded SurrealDB.

pub mod db;
pub mod seed;

pub use db::{Edge, GraphDb};
pub use seed::{Catalog, HobbySemilla};
