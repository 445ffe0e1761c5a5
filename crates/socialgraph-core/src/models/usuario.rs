//! User vertex and the records built around it.

use serde::{Deserialize, Serialize};

use super::hobby::HobbyConCategoria;

/// A user vertex as stored in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    /// System-assigned id, immutable after creation.
    pub id_usuario: i64,
    pub nombre: String,
    pub apellidos: String,
    pub edad: i64,
    pub latitud: f64,
    pub longitud: f64,
}

impl Usuario {
    /// "nombre apellidos".
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellidos)
    }
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub apellidos: String,
    pub edad: i64,
    pub latitud: f64,
    pub longitud: f64,
    #[serde(default)]
    pub hobby_id: Option<i64>,
}

impl NuevoUsuario {
    pub fn new(
        nombre: impl Into<String>,
        apellidos: impl Into<String>,
        edad: i64,
        latitud: f64,
        longitud: f64,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            apellidos: apellidos.into(),
            edad,
            latitud,
            longitud,
            hobby_id: None,
        }
    }

    pub fn with_hobby(mut self, hobby_id: i64) -> Self {
        self.hobby_id = Some(hobby_id);
        self
    }
}

/// What to do with a user's hobby on update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HobbyCambio {
    /// Leave the current hobby untouched.
    #[default]
    Keep,
    /// Detach the current hobby.
    Clear,
    /// Replace the current hobby.
    Set(i64),
}

/// Partial update of a user. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsuarioCambios {
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    pub edad: Option<i64>,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub hobby: HobbyCambio,
}

impl UsuarioCambios {
    /// Full replacement: every field is overwritten and a missing hobby
    /// clears the current one.
    pub fn reemplazo(nuevo: NuevoUsuario) -> Self {
        Self {
            nombre: Some(nuevo.nombre),
            apellidos: Some(nuevo.apellidos),
            edad: Some(nuevo.edad),
            latitud: Some(nuevo.latitud),
            longitud: Some(nuevo.longitud),
            hobby: match nuevo.hobby_id {
                Some(id) => HobbyCambio::Set(id),
                None => HobbyCambio::Clear,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.apellidos.is_none()
            && self.edad.is_none()
            && self.latitud.is_none()
            && self.longitud.is_none()
            && self.hobby == HobbyCambio::Keep
    }

    /// Apply the field changes on top of `current`.
    pub fn apply(&self, current: &Usuario) -> Usuario {
        Usuario {
            id_usuario: current.id_usuario,
            nombre: self.nombre.clone().unwrap_or_else(|| current.nombre.clone()),
            apellidos: self.apellidos.clone().unwrap_or_else(|| current.apellidos.clone()),
            edad: self.edad.unwrap_or(current.edad),
            latitud: self.latitud.unwrap_or(current.latitud),
            longitud: self.longitud.unwrap_or(current.longitud),
        }
    }
}

/// A user with its hobby and outgoing connection ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsuarioDetalle {
    #[serde(flatten)]
    pub usuario: Usuario,
    pub hobby: Option<HobbyConCategoria>,
    /// Targets of outgoing `CONECTADO` edges, ascending.
    pub conexiones: Vec<i64>,
}

/// A user with its hobby, without connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsuarioResumen {
    #[serde(flatten)]
    pub usuario: Usuario,
    pub hobby: Option<HobbyConCategoria>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit)
        }
    }

    pub fn current_page(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.skip / self.limit + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario() -> Usuario {
        Usuario {
            id_usuario: 3,
            nombre: "ana".to_string(),
            apellidos: "lopez".to_string(),
            edad: 30,
            latitud: 10.0,
            longitud: -20.0,
        }
    }

    #[test]
    fn test_partial_apply_keeps_untouched_fields() {
        let cambios = UsuarioCambios {
            edad: Some(31),
            ..Default::default()
        };
        let updated = cambios.apply(&usuario());
        assert_eq!(updated.edad, 31);
        assert_eq!(updated.nombre, "ana");
        assert_eq!(updated.id_usuario, 3);
    }

    #[test]
    fn test_reemplazo_without_hobby_clears() {
        let cambios = UsuarioCambios::reemplazo(NuevoUsuario::new("a", "b", 20, 0.0, 0.0));
        assert_eq!(cambios.hobby, HobbyCambio::Clear);
        assert!(!cambios.is_empty());
        assert!(UsuarioCambios::default().is_empty());
    }

    #[test]
    fn test_page_math() {
        let page: Page<i64> = Page {
            items: vec![],
            total: 250,
            skip: 200,
            limit: 100,
        };
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.current_page(), 3);
    }
}
