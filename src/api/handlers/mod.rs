pub mod health;
pub mod leaderboard;
pub mod metrics;
pub mod settlement;
