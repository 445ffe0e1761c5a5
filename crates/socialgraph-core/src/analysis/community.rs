use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::GraphError;
use crate::models::{Community, CommunityKey, CommunityReport, HobbyConCategoria};
use crate::store::GraphDb;

const BY_HOBBY: &str = "Hobby-based clustering";
const BY_CATEGORY: &str = "Category-based clustering";

/// Groups every user by what it shares with others.
pub struct CommunityDetector {
    db: Arc<GraphDb>,
}

impl CommunityDetector {
    pub fn new(db: Arc<GraphDb>) -> Self {
        Self { db }
    }

    /// One community per hobby in use, plus one for users without a hobby.
    pub async fn by_hobby(&self) -> Result<CommunityReport, GraphError> {
        self.partition(BY_HOBBY, |hobby| CommunityKey::Hobby {
            id_hobby: hobby.id_hobby,
            nombre: hobby.nombre.clone(),
        })
        .await
    }

    /// One community per hobby category in use, plus one for users without a hobby.
    pub async fn by_category(&self) -> Result<CommunityReport, GraphError> {
        self.partition(BY_CATEGORY, |hobby| CommunityKey::Categoria {
            id_categoria_hobby: hobby.categoria.id_categoria_hobby,
            nombre: hobby.categoria.nombre.clone(),
        })
        .await
    }

    async fn partition<F>(&self, algorithm: &str, key_of: F) -> Result<CommunityReport, GraphError>
    where
        F: Fn(&HobbyConCategoria) -> CommunityKey,
    {
        let ids = self.db.usuario_ids().await?;
        let hobbies = self.db.hobbies_for_users(None).await?;

        let mut groups: BTreeMap<CommunityKey, Vec<i64>> = BTreeMap::new();
        for id in ids {
            let key = hobbies.get(&id).map(&key_of).unwrap_or(CommunityKey::SinHobby);
            groups.entry(key).or_default().push(id);
        }

        let mut communities: Vec<Community> = groups
            .into_iter()
            .map(|(key, members)| Community {
                key,
                size: members.len(),
                members,
            })
            .collect();
        communities.sort_by(|a, b| (Reverse(a.size), &a.key).cmp(&(Reverse(b.size), &b.key)));

        tracing::debug!(algorithm, communities = communities.len(), "communities detected");
        Ok(CommunityReport {
            algorithm: algorithm.to_string(),
            total_communities: communities.len(),
            communities,
        })
    }
}
