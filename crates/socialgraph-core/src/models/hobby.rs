//! Hobby reference data.

use serde::{Deserialize, Serialize};

/// A hobby vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hobby {
    pub id_hobby: i64,
    pub nombre: String,
}

/// A hobby category vertex. Terminal node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriaHobby {
    pub id_categoria_hobby: i64,
    pub nombre: String,
}

/// A hobby joined with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HobbyConCategoria {
    pub id_hobby: i64,
    pub nombre: String,
    pub categoria: CategoriaHobby,
}
