use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use super::round_to;
use crate::config::{MAX_MIN_COMMON_FRIENDS, MAX_RECOMMENDATION_LIMIT};
use crate::error::GraphError;
use crate::models::Recommendation;
use crate::store::GraphDb;
use crate::validation::validate_range;

/// Recommends users reachable through the user's outgoing connections.
pub struct FriendOfFriendRecommender {
    db: Arc<GraphDb>,
}

impl FriendOfFriendRecommender {
    pub fn new(db: Arc<GraphDb>) -> Self {
        Self { db }
    }

    /// Candidates two outgoing hops away, excluding the user and everyone it
    /// already connects to, ranked by the number of common friends (ties by
    /// ascending id).
    pub async fn recommend(
        &self,
        user: i64,
        min_common_friends: usize,
        limit: usize,
    ) -> Result<Vec<Recommendation>, GraphError> {
        validate_range("min_common_friends", min_common_friends, 1, MAX_MIN_COMMON_FRIENDS)?;
        validate_range("limit", limit, 1, MAX_RECOMMENDATION_LIMIT)?;

        self.db
            .usuario(user)
            .await?
            .ok_or_else(|| GraphError::not_found("usuario", user))?;

        let friends: BTreeSet<i64> = self
            .db
            .edges_from(&[user])
            .await?
            .into_iter()
            .map(|e| e.destino)
            .collect();
        if friends.is_empty() {
            return Ok(Vec::new());
        }

        let friend_ids: Vec<i64> = friends.iter().copied().collect();
        let mut via: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
        for edge in self.db.edges_from(&friend_ids).await? {
            if edge.destino == user || friends.contains(&edge.destino) {
                continue;
            }
            via.entry(edge.destino).or_default().insert(edge.origen);
        }

        let mut ranked: Vec<(i64, Vec<i64>)> = via
            .into_iter()
            .filter(|(_, common)| common.len() >= min_common_friends)
            .map(|(candidate, common)| (candidate, common.into_iter().collect()))
            .collect();
        ranked.sort_by_key(|(candidate, common)| (Reverse(common.len()), *candidate));
        ranked.truncate(limit);

        let candidate_ids: Vec<i64> = ranked.iter().map(|(id, _)| *id).collect();
        let names: HashMap<i64, String> = self
            .db
            .usuarios(&candidate_ids)
            .await?
            .into_iter()
            .map(|u| (u.id_usuario, u.nombre_completo()))
            .collect();

        let max_common = ranked.first().map(|(_, common)| common.len()).unwrap_or(0);
        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .map(|(id_usuario, common)| Recommendation {
                id_usuario,
                nombre_completo: names.get(&id_usuario).cloned().unwrap_or_default(),
                common_friends: common.len(),
                score: score(common.len(), max_common),
                common_friend_ids: common,
            })
            .collect();

        tracing::debug!(
            user,
            friends = friends.len(),
            recommendations = recommendations.len(),
            "recommendations computed"
        );
        Ok(recommendations)
    }
}

/// Common-friend count relative to the best candidate, two decimals.
fn score(common: usize, max_common: usize) -> f64 {
    if max_common == 0 {
        return 0.0;
    }
    round_to(common as f64 / max_common as f64, 2)
}
