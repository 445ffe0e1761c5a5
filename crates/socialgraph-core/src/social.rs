//! Entry point tying the store, repositories and analyses together.

use std::sync::Arc;

use crate::analysis::{
    CommunityDetector, ConnectionLister, EgoNetworkExtractor, FriendOfFriendRecommender,
    ShortestPath,
};
use crate::config::{StoreConfig, DEFAULT_DATABASE, DEFAULT_NAMESPACE};
use crate::error::GraphError;
use crate::repository::{GraphHobbyRepository, GraphUsuarioRepository};
use crate::store::{Catalog, GraphDb};

/// The social graph: one shared store handle, cheap component constructors.
///
/// ```ignore
/// use socialgraph_core::{SocialGraph, UsuarioRepository};
///
/// let graph = SocialGraph::in_memory().await?;
/// graph.load_catalog(&Catalog::default()).await?;
/// let ana = graph.usuarios().create(NuevoUsuario::new("Ana", "Pérez", 30, 0.0, 0.0)).await?;
/// ```
#[derive(Clone)]
pub struct SocialGraph {
    db: Arc<GraphDb>,
}

impl SocialGraph {
    /// Open the store described by `config` and make sure the schema exists.
    pub async fn open(config: &StoreConfig) -> Result<Self, GraphError> {
        let db = if config.in_memory {
            GraphDb::in_memory(&config.namespace, &config.database).await?
        } else {
            let path = config.store_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    GraphError::Database(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
            GraphDb::open(&path, &config.namespace, &config.database).await?
        };

        tracing::debug!(
            in_memory = config.in_memory,
            path = %config.path,
            database = %config.database,
            "graph store opened"
        );
        Self::with_db(db).await
    }

    /// Fresh in-memory graph with the default namespace.
    pub async fn in_memory() -> Result<Self, GraphError> {
        let db = GraphDb::in_memory(DEFAULT_NAMESPACE, DEFAULT_DATABASE).await?;
        Self::with_db(db).await
    }

    async fn with_db(db: GraphDb) -> Result<Self, GraphError> {
        db.initialize_schema().await?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Load hobby reference data unless hobbies already exist.
    pub async fn load_catalog(&self, catalog: &Catalog) -> Result<bool, GraphError> {
        self.db.load_catalog(catalog).await
    }

    pub fn db(&self) -> &Arc<GraphDb> {
        &self.db
    }

    pub fn usuarios(&self) -> GraphUsuarioRepository {
        GraphUsuarioRepository::new(Arc::clone(&self.db))
    }

    pub fn hobbies(&self) -> GraphHobbyRepository {
        GraphHobbyRepository::new(Arc::clone(&self.db))
    }

    pub fn shortest_path(&self) -> ShortestPath {
        ShortestPath::new(Arc::clone(&self.db))
    }

    pub fn recommender(&self) -> FriendOfFriendRecommender {
        FriendOfFriendRecommender::new(Arc::clone(&self.db))
    }

    pub fn ego_networks(&self) -> EgoNetworkExtractor {
        EgoNetworkExtractor::new(Arc::clone(&self.db))
    }

    pub fn communities(&self) -> CommunityDetector {
        CommunityDetector::new(Arc::clone(&self.db))
    }

    pub fn connections(&self) -> ConnectionLister {
        ConnectionLister::new(Arc::clone(&self.db))
    }
}
