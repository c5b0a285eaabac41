pub mod leaderboard;
pub mod settlement;
