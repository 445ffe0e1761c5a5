use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MAX_PAGE_SIZE;
use crate::error::GraphError;
use crate::models::{
    HobbyCambio, HobbyConCategoria, NuevoUsuario, Page, Usuario, UsuarioCambios, UsuarioDetalle,
    UsuarioResumen,
};
use crate::store::GraphDb;
use crate::validation::{validate_nuevo, validate_range, validate_usuario};

/// CRUD on user vertices and their `CONECTADO` edges.
#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    /// Validate and create a user, optionally attached to a hobby.
    async fn create(&self, nuevo: NuevoUsuario) -> Result<UsuarioDetalle, GraphError>;

    /// The user with its hobby and outgoing connections, if it exists.
    async fn find_by_id(&self, id: i64) -> Result<Option<UsuarioDetalle>, GraphError>;

    /// Apply full or partial changes. A hobby change replaces the previous
    /// `TIENE_HOBBY` in the same transaction as the property update.
    async fn update(&self, id: i64, cambios: UsuarioCambios) -> Result<UsuarioDetalle, GraphError>;

    /// Delete a user together with every incident edge.
    async fn delete(&self, id: i64) -> Result<(), GraphError>;

    /// Create the directed edge `origin -> dest`.
    async fn create_connection(&self, origin: i64, dest: i64) -> Result<(), GraphError>;

    /// Remove the directed edge `origin -> dest`.
    async fn delete_connection(&self, origin: i64, dest: i64) -> Result<(), GraphError>;

    /// Targets of the user's outgoing edges, ordered by id.
    async fn list_connections(&self, id: i64) -> Result<Vec<UsuarioResumen>, GraphError>;

    /// One page of users ordered by id.
    async fn find_all(&self, skip: usize, limit: usize) -> Result<Page<UsuarioResumen>, GraphError>;

    async fn count(&self) -> Result<usize, GraphError>;

    /// "nombre apellidos" of an existing user.
    async fn full_name(&self, id: i64) -> Result<String, GraphError>;
}

/// [`UsuarioRepository`] backed by [`GraphDb`].
pub struct GraphUsuarioRepository {
    db: Arc<GraphDb>,
}

impl GraphUsuarioRepository {
    pub fn new(db: Arc<GraphDb>) -> Self {
        Self { db }
    }

    async fn require(&self, id: i64) -> Result<Usuario, GraphError> {
        self.db
            .usuario(id)
            .await?
            .ok_or_else(|| GraphError::not_found("usuario", id))
    }

    async fn require_hobby(&self, hobby_id: i64) -> Result<HobbyConCategoria, GraphError> {
        self.db
            .hobbies_con_categoria(Some(std::slice::from_ref(&hobby_id)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GraphError::not_found("hobby", hobby_id))
    }

    /// Reject a name already carried by a user other than `except`.
    async fn ensure_unique_name(
        &self,
        nombre: &str,
        apellidos: &str,
        except: Option<i64>,
    ) -> Result<(), GraphError> {
        let owners = self.db.usuarios_con_nombre(nombre, apellidos).await?;
        if owners.iter().any(|owner| Some(*owner) != except) {
            tracing::warn!(nombre, apellidos, "duplicate usuario name rejected");
            return Err(GraphError::Conflict(format!(
                "a usuario named '{} {}' already exists",
                nombre, apellidos
            )));
        }
        Ok(())
    }

    async fn resumenes(&self, usuarios: Vec<Usuario>) -> Result<Vec<UsuarioResumen>, GraphError> {
        let ids: Vec<i64> = usuarios.iter().map(|u| u.id_usuario).collect();
        let mut hobbies: HashMap<i64, HobbyConCategoria> =
            self.db.hobbies_for_users(Some(ids.as_slice())).await?;

        Ok(usuarios
            .into_iter()
            .map(|usuario| UsuarioResumen {
                hobby: hobbies.remove(&usuario.id_usuario),
                usuario,
            })
            .collect())
    }
}

#[async_trait]
impl UsuarioRepository for GraphUsuarioRepository {
    async fn create(&self, nuevo: NuevoUsuario) -> Result<UsuarioDetalle, GraphError> {
        let nuevo = validate_nuevo(&nuevo)?;
        self.ensure_unique_name(&nuevo.nombre, &nuevo.apellidos, None).await?;

        let hobby = match nuevo.hobby_id {
            Some(hobby_id) => Some(self.require_hobby(hobby_id).await?),
            None => None,
        };

        let usuario = Usuario {
            id_usuario: self.db.next_usuario_id().await?,
            nombre: nuevo.nombre,
            apellidos: nuevo.apellidos,
            edad: nuevo.edad,
            latitud: nuevo.latitud,
            longitud: nuevo.longitud,
        };
        self.db.insert_usuario(&usuario, nuevo.hobby_id).await?;

        tracing::info!(id_usuario = usuario.id_usuario, hobby = ?nuevo.hobby_id, "usuario created");
        Ok(UsuarioDetalle {
            usuario,
            hobby,
            conexiones: Vec::new(),
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UsuarioDetalle>, GraphError> {
        let Some(usuario) = self.db.usuario(id).await? else {
            return Ok(None);
        };

        let hobby = self
            .db
            .hobbies_for_users(Some(std::slice::from_ref(&id)))
            .await?
            .remove(&id);
        let mut conexiones: Vec<i64> = self
            .db
            .edges_from(&[id])
            .await?
            .into_iter()
            .map(|e| e.destino)
            .collect();
        conexiones.sort_unstable();

        Ok(Some(UsuarioDetalle {
            usuario,
            hobby,
            conexiones,
        }))
    }

    async fn update(&self, id: i64, cambios: UsuarioCambios) -> Result<UsuarioDetalle, GraphError> {
        let current = self.require(id).await?;
        let updated = validate_usuario(&cambios.apply(&current), cambios.hobby)?;

        if updated.nombre != current.nombre || updated.apellidos != current.apellidos {
            self.ensure_unique_name(&updated.nombre, &updated.apellidos, Some(id))
                .await?;
        }
        if let HobbyCambio::Set(hobby_id) = cambios.hobby {
            self.require_hobby(hobby_id).await?;
        }

        self.db.update_usuario(&updated, cambios.hobby).await?;
        tracing::info!(id_usuario = id, hobby = ?cambios.hobby, "usuario updated");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| GraphError::not_found("usuario", id))
    }

    async fn delete(&self, id: i64) -> Result<(), GraphError> {
        self.require(id).await?;
        self.db.delete_usuario(id).await?;
        tracing::info!(id_usuario = id, "usuario deleted");
        Ok(())
    }

    async fn create_connection(&self, origin: i64, dest: i64) -> Result<(), GraphError> {
        if origin == dest {
            tracing::warn!(id_usuario = origin, "self connection rejected");
            return Err(GraphError::SelfLoop(origin));
        }
        self.require(origin).await?;
        self.require(dest).await?;

        if self.db.edge_exists(origin, dest).await? {
            tracing::warn!(origin, dest, "duplicate connection rejected");
            return Err(GraphError::Conflict(format!(
                "connection {} -> {} already exists",
                origin, dest
            )));
        }
        // The unique (origen, destino) index rejects a concurrent duplicate.
        self.db.insert_conectado(origin, dest).await?;

        tracing::info!(origin, dest, "connection created");
        Ok(())
    }

    async fn delete_connection(&self, origin: i64, dest: i64) -> Result<(), GraphError> {
        if origin == dest {
            return Err(GraphError::SelfLoop(origin));
        }
        self.require(origin).await?;
        self.require(dest).await?;

        if !self.db.delete_conectado(origin, dest).await? {
            return Err(GraphError::not_found(
                "conexion",
                format!("{} -> {}", origin, dest),
            ));
        }

        tracing::info!(origin, dest, "connection deleted");
        Ok(())
    }

    async fn list_connections(&self, id: i64) -> Result<Vec<UsuarioResumen>, GraphError> {
        self.require(id).await?;

        let targets: Vec<i64> = self
            .db
            .edges_from(&[id])
            .await?
            .into_iter()
            .map(|e| e.destino)
            .collect();
        let usuarios = self.db.usuarios(&targets).await?;
        self.resumenes(usuarios).await
    }

    async fn find_all(&self, skip: usize, limit: usize) -> Result<Page<UsuarioResumen>, GraphError> {
        validate_range("limit", limit, 1, MAX_PAGE_SIZE)?;

        let total = self.db.count_usuarios().await?;
        let usuarios = self.db.usuarios_page(skip, limit).await?;
        let items = self.resumenes(usuarios).await?;

        Ok(Page {
            items,
            total,
            skip,
            limit,
        })
    }

    async fn count(&self) -> Result<usize, GraphError> {
        self.db.count_usuarios().await
    }

    async fn full_name(&self, id: i64) -> Result<String, GraphError> {
        Ok(self.require(id).await?.nombre_completo())
    }
}
