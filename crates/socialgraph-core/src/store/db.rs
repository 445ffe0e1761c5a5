//! SurrealDB embedded database holding the social graph.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::{Response, Surreal};

use super::seed::Catalog;
use crate::error::GraphError;
use crate::models::{CategoriaHobby, Hobby, HobbyCambio, HobbyConCategoria, Usuario};

const USUARIO_FIELDS: &str = "id_usuario, nombre, apellidos, edad, latitud, longitud";

/// A directed `CONECTADO` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub origen: i64,
    pub destino: i64,
}

impl Edge {
    /// The endpoint opposite to `id`, if `id` is an endpoint.
    pub fn other(&self, id: i64) -> Option<i64> {
        if self.origen == id {
            Some(self.destino)
        } else if self.destino == id {
            Some(self.origen)
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: i64,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id_usuario: i64,
}

#[derive(Debug, Deserialize)]
struct SequenceRow {
    valor: i64,
}

#[derive(Debug, Deserialize)]
struct HobbyAssignment {
    id_usuario: i64,
    id_hobby: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct PerteneceA {
    id_hobby: i64,
    id_categoria_hobby: i64,
}

/// Database connection for the social graph.
///
/// Every statement batch sent to SurrealDB goes through [`GraphDb::record`],
/// which keeps a running count used to bound traversal cost in tests.
pub struct GraphDb {
    db: Surreal<Db>,
    queries: AtomicUsize,
}

impl GraphDb {
    /// Open or create a RocksDB-backed database at the given path.
    pub async fn open(path: &Path, namespace: &str, database: &str) -> Result<Self, GraphError> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(namespace).use_db(database).await?;

        Ok(Self {
            db,
            queries: AtomicUsize::new(0),
        })
    }

    /// Create a database that lives only in memory.
    pub async fn in_memory(namespace: &str, database: &str) -> Result<Self, GraphError> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns(namespace).use_db(database).await?;

        Ok(Self {
            db,
            queries: AtomicUsize::new(0),
        })
    }

    /// Number of statement batches issued so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    fn record(&self, sql: &str) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(sql = sql.trim(), "graph query");
    }

    /// Surface statement-level errors, which SurrealDB keeps inside the response.
    fn check(mut response: Response) -> Result<Response, GraphError> {
        let errors: Vec<(usize, surrealdb::Error)> = response.take_errors().into_iter().collect();
        match GraphError::from_statement_errors(errors) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    /// Initialize tables, indexes and the user id sequence. Idempotent.
    pub async fn initialize_schema(&self) -> Result<(), GraphError> {
        // ===========================================================================
        // VERTEX TABLES
        // ===========================================================================

        let vertices = r#"
            DEFINE TABLE IF NOT EXISTS usuario SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS id_usuario ON usuario TYPE int;
            DEFINE FIELD IF NOT EXISTS nombre ON usuario TYPE string;
            DEFINE FIELD IF NOT EXISTS apellidos ON usuario TYPE string;
            DEFINE FIELD IF NOT EXISTS edad ON usuario TYPE int;
            DEFINE FIELD IF NOT EXISTS latitud ON usuario TYPE float;
            DEFINE FIELD IF NOT EXISTS longitud ON usuario TYPE float;
            DEFINE INDEX IF NOT EXISTS usuario_id ON usuario FIELDS id_usuario UNIQUE;
            DEFINE INDEX IF NOT EXISTS usuario_nombre ON usuario FIELDS nombre, apellidos UNIQUE;

            DEFINE TABLE IF NOT EXISTS hobby SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS id_hobby ON hobby TYPE int;
            DEFINE FIELD IF NOT EXISTS nombre ON hobby TYPE string;
            DEFINE INDEX IF NOT EXISTS hobby_id ON hobby FIELDS id_hobby UNIQUE;

            DEFINE TABLE IF NOT EXISTS categoria_hobby SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS id_categoria_hobby ON categoria_hobby TYPE int;
            DEFINE FIELD IF NOT EXISTS nombre ON categoria_hobby TYPE string;
            DEFINE INDEX IF NOT EXISTS categoria_hobby_id ON categoria_hobby FIELDS id_categoria_hobby UNIQUE;
        "#;
        self.record(vertices);
        Self::check(self.db.query(vertices).await?)?;

        // ===========================================================================
        // EDGE TABLES - plain tables with scalar endpoints
        // ===========================================================================

        let edges = r#"
            DEFINE TABLE IF NOT EXISTS conectado SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS origen ON conectado TYPE int;
            DEFINE FIELD IF NOT EXISTS destino ON conectado TYPE int;
            DEFINE INDEX IF NOT EXISTS conectado_par ON conectado FIELDS origen, destino UNIQUE;
            DEFINE INDEX IF NOT EXISTS conectado_origen ON conectado FIELDS origen;
            DEFINE INDEX IF NOT EXISTS conectado_destino ON conectado FIELDS destino;

            DEFINE TABLE IF NOT EXISTS tiene_hobby SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS id_usuario ON tiene_hobby TYPE int;
            DEFINE FIELD IF NOT EXISTS id_hobby ON tiene_hobby TYPE int;
            DEFINE INDEX IF NOT EXISTS tiene_hobby_usuario ON tiene_hobby FIELDS id_usuario UNIQUE;
            DEFINE INDEX IF NOT EXISTS tiene_hobby_hobby ON tiene_hobby FIELDS id_hobby;

            DEFINE TABLE IF NOT EXISTS pertenece_a SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS id_hobby ON pertenece_a TYPE int;
            DEFINE FIELD IF NOT EXISTS id_categoria_hobby ON pertenece_a TYPE int;
            DEFINE INDEX IF NOT EXISTS pertenece_a_hobby ON pertenece_a FIELDS id_hobby UNIQUE;
        "#;
        self.record(edges);
        Self::check(self.db.query(edges).await?)?;

        // ===========================================================================
        // ID SEQUENCE
        // ===========================================================================

        let sequence = r#"
            DEFINE TABLE IF NOT EXISTS secuencia SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS valor ON secuencia TYPE int;
        "#;
        self.record(sequence);
        Self::check(self.db.query(sequence).await?)?;

        let sql = "SELECT valor FROM secuencia:usuario";
        self.record(sql);
        let existing: Vec<SequenceRow> = Self::check(self.db.query(sql).await?)?.take(0)?;

        if existing.is_empty() {
            // Seed from the data already present so ids keep increasing.
            let sql = "SELECT id_usuario FROM usuario ORDER BY id_usuario DESC LIMIT 1";
            self.record(sql);
            let max: Vec<IdRow> = Self::check(self.db.query(sql).await?)?.take(0)?;
            let valor = max.first().map(|r| r.id_usuario).unwrap_or(0);

            let sql = "CREATE secuencia:usuario SET valor = $valor";
            self.record(sql);
            Self::check(self.db.query(sql).bind(("valor", valor)).await?)?;
            tracing::debug!(valor, "usuario sequence created");
        }

        Ok(())
    }

    /// Load hobby reference data. Returns `false` when hobbies already exist.
    pub async fn load_catalog(&self, catalog: &Catalog) -> Result<bool, GraphError> {
        catalog.validate()?;
        if catalog.hobbies.is_empty() || self.count_table("hobby").await? > 0 {
            return Ok(false);
        }

        let hobbies: Vec<Hobby> = catalog
            .hobbies
            .iter()
            .map(|h| Hobby {
                id_hobby: h.id_hobby,
                nombre: h.nombre.clone(),
            })
            .collect();
        let pertenece: Vec<PerteneceA> = catalog
            .hobbies
            .iter()
            .map(|h| PerteneceA {
                id_hobby: h.id_hobby,
                id_categoria_hobby: h.id_categoria_hobby,
            })
            .collect();

        let sql = r#"
            BEGIN TRANSACTION;
            INSERT INTO categoria_hobby $categorias;
            INSERT INTO hobby $hobbies;
            INSERT INTO pertenece_a $pertenece;
            COMMIT TRANSACTION;
        "#;
        self.record(sql);
        let response = self
            .db
            .query(sql)
            .bind(("categorias", catalog.categorias.clone()))
            .bind(("hobbies", hobbies))
            .bind(("pertenece", pertenece))
            .await?;
        Self::check(response)?;

        tracing::info!(
            categorias = catalog.categorias.len(),
            hobbies = catalog.hobbies.len(),
            "hobby catalog loaded"
        );
        Ok(true)
    }

    async fn count_table(&self, table: &str) -> Result<usize, GraphError> {
        let sql = format!("SELECT count() FROM {} GROUP ALL", table);
        self.record(&sql);
        let result: Option<CountResult> = Self::check(self.db.query(&sql).await?)?.take(0)?;
        Ok(result.map(|r| r.count as usize).unwrap_or(0))
    }

    // ===========================================================================
    // USUARIO VERTICES
    // ===========================================================================

    /// Allocate the next user id. Single atomic statement; a failed creation
    /// afterwards leaves a gap, never a duplicate.
    pub async fn next_usuario_id(&self) -> Result<i64, GraphError> {
        let sql = "UPDATE secuencia:usuario SET valor += 1 RETURN valor";
        self.record(sql);
        let rows: Vec<SequenceRow> = Self::check(self.db.query(sql).await?)?.take(0)?;
        rows.first()
            .map(|r| r.valor)
            .ok_or_else(|| GraphError::Database("usuario sequence missing, schema not initialized".to_string()))
    }

    /// Create a user and, optionally, its `TIENE_HOBBY` edge in one transaction.
    pub async fn insert_usuario(&self, usuario: &Usuario, hobby: Option<i64>) -> Result<(), GraphError> {
        let mut sql = String::from("BEGIN TRANSACTION;\nCREATE usuario CONTENT $usuario;\n");
        if hobby.is_some() {
            sql.push_str("CREATE tiene_hobby CONTENT { id_usuario: $id, id_hobby: $hobby };\n");
        }
        sql.push_str("COMMIT TRANSACTION;");

        self.record(&sql);
        let mut query = self
            .db
            .query(&sql)
            .bind(("usuario", usuario.clone()))
            .bind(("id", usuario.id_usuario));
        if let Some(hobby_id) = hobby {
            query = query.bind(("hobby", hobby_id));
        }
        Self::check(query.await?)?;
        Ok(())
    }

    /// Replace the properties of a user and apply a hobby change, atomically.
    pub async fn update_usuario(&self, usuario: &Usuario, hobby: HobbyCambio) -> Result<(), GraphError> {
        let mut sql = String::from(
            "BEGIN TRANSACTION;\n\
             UPDATE usuario SET nombre = $nombre, apellidos = $apellidos, edad = $edad, \
             latitud = $latitud, longitud = $longitud WHERE id_usuario = $id;\n",
        );
        match hobby {
            HobbyCambio::Keep => {}
            HobbyCambio::Clear => {
                sql.push_str("DELETE tiene_hobby WHERE id_usuario = $id;\n");
            }
            HobbyCambio::Set(_) => {
                sql.push_str("DELETE tiene_hobby WHERE id_usuario = $id;\n");
                sql.push_str("CREATE tiene_hobby CONTENT { id_usuario: $id, id_hobby: $hobby };\n");
            }
        }
        sql.push_str("COMMIT TRANSACTION;");

        self.record(&sql);
        let mut query = self
            .db
            .query(&sql)
            .bind(("id", usuario.id_usuario))
            .bind(("nombre", usuario.nombre.clone()))
            .bind(("apellidos", usuario.apellidos.clone()))
            .bind(("edad", usuario.edad))
            .bind(("latitud", usuario.latitud))
            .bind(("longitud", usuario.longitud));
        if let HobbyCambio::Set(hobby_id) = hobby {
            query = query.bind(("hobby", hobby_id));
        }
        Self::check(query.await?)?;
        Ok(())
    }

    /// Detach-delete a user: the vertex, every incident `CONECTADO` and its
    /// `TIENE_HOBBY` go in one transaction. The hobby vertex stays.
    pub async fn delete_usuario(&self, id: i64) -> Result<(), GraphError> {
        let sql = r#"
            BEGIN TRANSACTION;
            DELETE conectado WHERE origen = $id OR destino = $id;
            DELETE tiene_hobby WHERE id_usuario = $id;
            DELETE usuario WHERE id_usuario = $id;
            COMMIT TRANSACTION;
        "#;
        self.record(sql);
        Self::check(self.db.query(sql).bind(("id", id)).await?)?;
        Ok(())
    }

    /// Get a user by id.
    pub async fn usuario(&self, id: i64) -> Result<Option<Usuario>, GraphError> {
        let sql = format!("SELECT {} FROM usuario WHERE id_usuario = $id LIMIT 1", USUARIO_FIELDS);
        self.record(&sql);
        let rows: Vec<Usuario> = Self::check(self.db.query(&sql).bind(("id", id)).await?)?.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Get the users with the given ids, ordered by id. Unknown ids are skipped.
    pub async fn usuarios(&self, ids: &[i64]) -> Result<Vec<Usuario>, GraphError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM usuario WHERE id_usuario IN $ids ORDER BY id_usuario",
            USUARIO_FIELDS
        );
        self.record(&sql);
        let rows: Vec<Usuario> = Self::check(self.db.query(&sql).bind(("ids", ids.to_vec())).await?)?.take(0)?;
        Ok(rows)
    }

    /// One page of users ordered by id.
    pub async fn usuarios_page(&self, skip: usize, limit: usize) -> Result<Vec<Usuario>, GraphError> {
        let sql = format!(
            "SELECT {} FROM usuario ORDER BY id_usuario LIMIT {} START {}",
            USUARIO_FIELDS, limit, skip
        );
        self.record(&sql);
        let rows: Vec<Usuario> = Self::check(self.db.query(&sql).await?)?.take(0)?;
        Ok(rows)
    }

    /// Every user id, ascending.
    pub async fn usuario_ids(&self) -> Result<Vec<i64>, GraphError> {
        let sql = "SELECT id_usuario FROM usuario";
        self.record(sql);
        let rows: Vec<IdRow> = Self::check(self.db.query(sql).await?)?.take(0)?;
        let mut ids: Vec<i64> = rows.into_iter().map(|r| r.id_usuario).collect();
        ids.sort_unstable();
        Ok(ids)
    }

    pub async fn count_usuarios(&self) -> Result<usize, GraphError> {
        self.count_table("usuario").await
    }

    /// Ids of users carrying exactly this (normalized) name.
    pub async fn usuarios_con_nombre(&self, nombre: &str, apellidos: &str) -> Result<Vec<i64>, GraphError> {
        let sql = "SELECT id_usuario FROM usuario WHERE nombre = $nombre AND apellidos = $apellidos";
        self.record(sql);
        let response = self
            .db
            .query(sql)
            .bind(("nombre", nombre.to_string()))
            .bind(("apellidos", apellidos.to_string()))
            .await?;
        let rows: Vec<IdRow> = Self::check(response)?.take(0)?;
        Ok(rows.into_iter().map(|r| r.id_usuario).collect())
    }

    // ===========================================================================
    // CONECTADO EDGES
    // ===========================================================================

    /// Create a directed edge. A duplicate violates the unique pair index and
    /// surfaces as [`GraphError::Conflict`].
    pub async fn insert_conectado(&self, origen: i64, destino: i64) -> Result<(), GraphError> {
        let sql = "CREATE conectado CONTENT { origen: $origen, destino: $destino }";
        self.record(sql);
        let response = self
            .db
            .query(sql)
            .bind(("origen", origen))
            .bind(("destino", destino))
            .await?;
        Self::check(response)?;
        Ok(())
    }

    /// Remove a directed edge. Returns `false` when it did not exist.
    pub async fn delete_conectado(&self, origen: i64, destino: i64) -> Result<bool, GraphError> {
        if !self.edge_exists(origen, destino).await? {
            return Ok(false);
        }
        let sql = "DELETE conectado WHERE origen = $origen AND destino = $destino";
        self.record(sql);
        let response = self
            .db
            .query(sql)
            .bind(("origen", origen))
            .bind(("destino", destino))
            .await?;
        Self::check(response)?;
        Ok(true)
    }

    pub async fn edge_exists(&self, origen: i64, destino: i64) -> Result<bool, GraphError> {
        let sql = "SELECT origen, destino FROM conectado WHERE origen = $origen AND destino = $destino LIMIT 1";
        self.record(sql);
        let response = self
            .db
            .query(sql)
            .bind(("origen", origen))
            .bind(("destino", destino))
            .await?;
        let rows: Vec<Edge> = Self::check(response)?.take(0)?;
        Ok(!rows.is_empty())
    }

    async fn select_edges(&self, filter: &str, ids: &[i64]) -> Result<Vec<Edge>, GraphError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT origen, destino FROM conectado WHERE {}", filter);
        self.record(&sql);
        let rows: Vec<Edge> = Self::check(self.db.query(&sql).bind(("ids", ids.to_vec())).await?)?.take(0)?;
        Ok(rows)
    }

    /// Edges leaving any of `ids`.
    pub async fn edges_from(&self, ids: &[i64]) -> Result<Vec<Edge>, GraphError> {
        self.select_edges("origen IN $ids", ids).await
    }

    /// Edges entering or leaving any of `ids`, in one query.
    pub async fn edges_touching(&self, ids: &[i64]) -> Result<Vec<Edge>, GraphError> {
        self.select_edges("origen IN $ids OR destino IN $ids", ids).await
    }

    /// Edges with both endpoints in `ids`.
    pub async fn edges_within(&self, ids: &[i64]) -> Result<Vec<Edge>, GraphError> {
        self.select_edges("origen IN $ids AND destino IN $ids", ids).await
    }

    /// Every `CONECTADO` edge.
    pub async fn all_edges(&self) -> Result<Vec<Edge>, GraphError> {
        let sql = "SELECT origen, destino FROM conectado";
        self.record(sql);
        let rows: Vec<Edge> = Self::check(self.db.query(sql).await?)?.take(0)?;
        Ok(rows)
    }

    // ===========================================================================
    // HOBBIES
    // ===========================================================================

    /// Hobbies joined with their category, ordered by `id_hobby`.
    /// `None` returns the whole catalog.
    pub async fn hobbies_con_categoria(&self, ids: Option<&[i64]>) -> Result<Vec<HobbyConCategoria>, GraphError> {
        let filter = match ids {
            Some([]) => return Ok(Vec::new()),
            Some(_) => " WHERE id_hobby IN $ids",
            None => "",
        };
        let bound: Vec<i64> = ids.map(|i| i.to_vec()).unwrap_or_default();

        let sql = format!("SELECT id_hobby, nombre FROM hobby{}", filter);
        self.record(&sql);
        let hobbies: Vec<Hobby> = Self::check(self.db.query(&sql).bind(("ids", bound.clone())).await?)?.take(0)?;

        let sql = format!("SELECT id_hobby, id_categoria_hobby FROM pertenece_a{}", filter);
        self.record(&sql);
        let pertenece: Vec<PerteneceA> = Self::check(self.db.query(&sql).bind(("ids", bound)).await?)?.take(0)?;

        let sql = "SELECT id_categoria_hobby, nombre FROM categoria_hobby";
        self.record(sql);
        let categorias: Vec<CategoriaHobby> = Self::check(self.db.query(sql).await?)?.take(0)?;

        let categoria_de: HashMap<i64, i64> = pertenece
            .into_iter()
            .map(|p| (p.id_hobby, p.id_categoria_hobby))
            .collect();
        let categorias: HashMap<i64, CategoriaHobby> = categorias
            .into_iter()
            .map(|c| (c.id_categoria_hobby, c))
            .collect();

        let mut joined = hobbies
            .into_iter()
            .map(|h| {
                let categoria = categoria_de
                    .get(&h.id_hobby)
                    .and_then(|id| categorias.get(id))
                    .cloned()
                    .ok_or_else(|| {
                        GraphError::Database(format!("hobby {} has no category", h.id_hobby))
                    })?;
                Ok(HobbyConCategoria {
                    id_hobby: h.id_hobby,
                    nombre: h.nombre,
                    categoria,
                })
            })
            .collect::<Result<Vec<_>, GraphError>>()?;
        joined.sort_by_key(|h| h.id_hobby);
        Ok(joined)
    }

    /// `(id_usuario, id_hobby)` pairs of `TIENE_HOBBY`. `None` returns all.
    pub async fn hobby_assignments(&self, user_ids: Option<&[i64]>) -> Result<Vec<(i64, i64)>, GraphError> {
        let rows: Vec<HobbyAssignment> = match user_ids {
            Some([]) => return Ok(Vec::new()),
            Some(ids) => {
                let sql = "SELECT id_usuario, id_hobby FROM tiene_hobby WHERE id_usuario IN $ids";
                self.record(sql);
                Self::check(self.db.query(sql).bind(("ids", ids.to_vec())).await?)?.take(0)?
            }
            None => {
                let sql = "SELECT id_usuario, id_hobby FROM tiene_hobby";
                self.record(sql);
                Self::check(self.db.query(sql).await?)?.take(0)?
            }
        };
        Ok(rows.into_iter().map(|r| (r.id_usuario, r.id_hobby)).collect())
    }

    /// Current hobby (with category) of each user that has one.
    pub async fn hobbies_for_users(
        &self,
        user_ids: Option<&[i64]>,
    ) -> Result<HashMap<i64, HobbyConCategoria>, GraphError> {
        let assignments = self.hobby_assignments(user_ids).await?;
        if assignments.is_empty() {
            return Ok(HashMap::new());
        }

        let mut hobby_ids: Vec<i64> = assignments.iter().map(|(_, h)| *h).collect();
        hobby_ids.sort_unstable();
        hobby_ids.dedup();

        let hobbies: HashMap<i64, HobbyConCategoria> = self
            .hobbies_con_categoria(Some(hobby_ids.as_slice()))
            .await?
            .into_iter()
            .map(|h| (h.id_hobby, h))
            .collect();

        assignments
            .into_iter()
            .map(|(usuario, hobby)| {
                hobbies
                    .get(&hobby)
                    .cloned()
                    .map(|h| (usuario, h))
                    .ok_or_else(|| GraphError::Database(format!("hobby {} referenced by usuario {} is missing", hobby, usuario)))
            })
            .collect()
    }
}
