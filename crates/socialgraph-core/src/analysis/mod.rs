//! Graph analyses over the `CONECTADO` network.
//!
//! Every component validates its parameters and the referenced users before
//! touching the graph, and never caches graph state between calls.
//!
//! - [`ShortestPath`] - bounded iterative deepening between two users
//! - [`FriendOfFriendRecommender`] - candidates reached through direct connections
//! - [`EgoNetworkExtractor`] - one-hop neighborhood with visualization data
//! - [`CommunityDetector`] - partition of users by hobby or category
//! - [`ConnectionLister`] - every directed connection grouped by origin

mod community;
mod connections;
mod ego;
mod recommend;
mod shortest_path;

pub use community::CommunityDetector;
pub use connections::ConnectionLister;
pub use ego::{hobby_color, EgoNetworkExtractor};
pub use recommend::FriendOfFriendRecommender;
pub use shortest_path::ShortestPath;

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(1.0, 2), 1.0);
    }
}
