//! Hobby reference data loaded into an empty store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::models::CategoriaHobby;

/// A hobby and the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HobbySemilla {
    pub id_hobby: i64,
    pub nombre: String,
    pub id_categoria_hobby: i64,
}

impl HobbySemilla {
    fn new(id_hobby: i64, nombre: &str, id_categoria_hobby: i64) -> Self {
        Self {
            id_hobby,
            nombre: nombre.to_string(),
            id_categoria_hobby,
        }
    }
}

/// Categories and hobbies to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categorias: Vec<CategoriaHobby>,
    pub hobbies: Vec<HobbySemilla>,
}

impl Catalog {
    /// Ids must be positive and unique, and every hobby must point at a
    /// listed category.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut categorias = HashSet::new();
        for categoria in &self.categorias {
            if categoria.id_categoria_hobby < 1 || !categorias.insert(categoria.id_categoria_hobby) {
                return Err(GraphError::validation(
                    "id_categoria_hobby",
                    format!("{} is not a unique positive id", categoria.id_categoria_hobby),
                ));
            }
        }

        let mut hobbies = HashSet::new();
        for hobby in &self.hobbies {
            if hobby.id_hobby < 1 || !hobbies.insert(hobby.id_hobby) {
                return Err(GraphError::validation(
                    "id_hobby",
                    format!("{} is not a unique positive id", hobby.id_hobby),
                ));
            }
            if !categorias.contains(&hobby.id_categoria_hobby) {
                return Err(GraphError::validation(
                    "id_categoria_hobby",
                    format!(
                        "hobby {} references unknown category {}",
                        hobby.id_hobby, hobby.id_categoria_hobby
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let categoria = |id: i64, nombre: &str| CategoriaHobby {
            id_categoria_hobby: id,
            nombre: nombre.to_string(),
        };

        Self {
            categorias: vec![
                categoria(1, "deportes"),
                categoria(2, "arte y cultura"),
                categoria(3, "musica"),
                categoria(4, "otros"),
            ],
            hobbies: vec![
                HobbySemilla::new(1, "futbol", 1),
                HobbySemilla::new(2, "basquetbol", 1),
                HobbySemilla::new(3, "tenis", 1),
                HobbySemilla::new(4, "pintura", 2),
                HobbySemilla::new(5, "escultura", 2),
                HobbySemilla::new(6, "fotografia", 2),
                HobbySemilla::new(7, "guitarra", 3),
                HobbySemilla::new(8, "piano", 3),
                HobbySemilla::new(9, "lectura", 4),
                HobbySemilla::new(10, "cocina", 4),
            ],
        }
    }
}
