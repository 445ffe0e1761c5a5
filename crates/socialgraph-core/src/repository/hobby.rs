use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GraphError;
use crate::models::HobbyConCategoria;
use crate::store::GraphDb;

/// Read access to the hobby catalog.
#[async_trait]
pub trait HobbyRepository: Send + Sync {
    /// Every hobby with its category, ordered by `id_hobby`.
    async fn list(&self) -> Result<Vec<HobbyConCategoria>, GraphError>;

    /// A single hobby with its category.
    async fn find_by_id(&self, id: i64) -> Result<Option<HobbyConCategoria>, GraphError>;
}

/// [`HobbyRepository`] backed by [`GraphDb`].
pub struct GraphHobbyRepository {
    db: Arc<GraphDb>,
}

impl GraphHobbyRepository {
    pub fn new(db: Arc<GraphDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HobbyRepository for GraphHobbyRepository {
    async fn list(&self) -> Result<Vec<HobbyConCategoria>, GraphError> {
        self.db.hobbies_con_categoria(None).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<HobbyConCategoria>, GraphError> {
        let hobbies = self.db.hobbies_con_categoria(Some(std::slice::from_ref(&id))).await?;
        Ok(hobbies.into_iter().next())
    }
}
