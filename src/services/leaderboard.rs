use serde::Serialize;

use crate::errors::{AppError, StoreError};
use crate::models::{LeaderboardEntry, Standing, Tournament};
use crate::store::SettlementStore;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const MAX_PAGE_LIMIT: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardPage {
    pub tournament: Tournament,
    pub data: Vec<LeaderboardEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LeaderboardQueryError {
    #[error("tournament_id must be a positive integer")]
    InvalidTournament,
    #[error("limit must be between 1 and 500")]
    InvalidLimit,
    #[error("offset must be non-negative")]
    InvalidOffset,
}

impl From<LeaderboardQueryError> for AppError {
    fn from(e: LeaderboardQueryError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

/// Validated leaderboard request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub tournament_id: i64,
    pub limit: u32,
    pub offset: u32,
}

impl LeaderboardQuery {
    pub fn parse(
        tournament_id: i64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Self, LeaderboardQueryError> {
        if tournament_id <= 0 {
            return Err(LeaderboardQueryError::InvalidTournament);
        }

        let limit = match limit {
            None => DEFAULT_PAGE_LIMIT,
            Some(l) if (1..=i64::from(MAX_PAGE_LIMIT)).contains(&l) => l as u32,
            Some(_) => return Err(LeaderboardQueryError::InvalidLimit),
        };

        let offset = match offset {
            None => 0,
            Some(o) => u32::try_from(o).map_err(|_| LeaderboardQueryError::InvalidOffset)?,
        };

        Ok(Self {
            tournament_id,
            limit,
            offset,
        })
    }
}

/// Competition ranking ("1224"): equal points share a rank and the next
/// distinct total takes its 1-based position. Input must already be ordered.
pub fn rank_standings(standings: &[Standing]) -> Vec<LeaderboardEntry> {
    let mut ranked = Vec::with_capacity(standings.len());
    let mut rank = 0u32;
    let mut previous: Option<i64> = None;

    for (index, standing) in standings.iter().enumerate() {
        if previous != Some(standing.points) {
            rank = saturating_u32(index).saturating_add(1);
        }
        previous = Some(standing.points);

        ranked.push(LeaderboardEntry {
            rank,
            user_id: standing.user_id,
            username: standing.username.clone(),
            points: standing.points,
        });
    }

    ranked
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Rank the full table, then cut the requested page so ranks stay global.
pub fn leaderboard_page(
    tournament: Tournament,
    standings: &[Standing],
    query: LeaderboardQuery,
) -> LeaderboardPage {
    let total = saturating_u32(standings.len());
    let data = rank_standings(standings)
        .into_iter()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .collect();

    LeaderboardPage {
        tournament,
        data,
        pagination: Pagination {
            total,
            limit: query.limit,
            offset: query.offset,
            has_more: u64::from(query.offset) + u64::from(query.limit) < u64::from(total),
        },
    }
}

pub async fn get_leaderboard(
    store: &dyn SettlementStore,
    query: LeaderboardQuery,
) -> Result<LeaderboardPage, StoreError> {
    let tournament = store
        .get_tournament(query.tournament_id)
        .await?
        .ok_or_else(|| {
            StoreError::NotFound(format!("Tournament {} not found", query.tournament_id))
        })?;

    let standings = store.tournament_standings(query.tournament_id).await?;
    Ok(leaderboard_page(tournament, &standings, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn standings(points: &[i64]) -> Vec<Standing> {
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| Standing {
                user_id: Uuid::new_v4(),
                username: format!("user{i:02}"),
                points: p,
            })
            .collect()
    }

    fn cup() -> Tournament {
        Tournament {
            id: 1,
            name: "Cup".into(),
        }
    }

    fn query_for(tournament_id: i64, limit: u32, offset: u32) -> LeaderboardQuery {
        LeaderboardQuery {
            tournament_id,
            limit,
            offset,
        }
    }

    #[test]
    fn test_ties_share_rank_and_next_rank_skips() {
        let ranked = rank_standings(&standings(&[100, 90, 90, 80]));
        let ranks: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 4]);
    }

    #[test]
    fn test_all_tied() {
        let ranked = rank_standings(&standings(&[6, 6, 6]));
        assert!(ranked.iter().all(|e| e.rank == 1));
    }

    #[test]
    fn test_empty_table() {
        assert!(rank_standings(&[]).is_empty());
        let page = leaderboard_page(cup(), &[], query_for(1, 10, 0));
        assert_eq!(page.pagination.total, 0);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_page_keeps_global_ranks() {
        let table = standings(&[12, 9, 9, 9, 3]);
        let page = leaderboard_page(cup(), &table, query_for(1, 2, 2));

        let ranks: Vec<u32> = page.data.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![2, 2]);
        assert_eq!(page.pagination.total, 5);
        assert!(page.pagination.has_more);

        let last = leaderboard_page(cup(), &table, query_for(1, 2, 4));
        assert_eq!(last.data.len(), 1);
        assert_eq!(last.data[0].rank, 5);
        assert!(!last.pagination.has_more);
    }

    #[test]
    fn test_page_carries_tournament() {
        let page = leaderboard_page(cup(), &standings(&[3]), query_for(1, 10, 0));
        assert_eq!(page.tournament, cup());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["tournament"]["id"], 1);
        assert_eq!(json["tournament"]["name"], "Cup");
    }

    #[test]
    fn test_counts_saturate_instead_of_wrapping() {
        assert_eq!(saturating_u32(7), 7);
        assert_eq!(saturating_u32(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(saturating_u32(u32::MAX as usize + 5), u32::MAX);
    }

    #[test]
    fn test_query_defaults() {
        let q = LeaderboardQuery::parse(7, None, None).unwrap();
        assert_eq!(q, query_for(7, DEFAULT_PAGE_LIMIT, 0));
    }

    #[test]
    fn test_query_rejects_out_of_range() {
        assert_eq!(
            LeaderboardQuery::parse(0, None, None),
            Err(LeaderboardQueryError::InvalidTournament)
        );
        assert_eq!(
            LeaderboardQuery::parse(1, Some(0), None),
            Err(LeaderboardQueryError::InvalidLimit)
        );
        assert_eq!(
            LeaderboardQuery::parse(1, Some(501), None),
            Err(LeaderboardQueryError::InvalidLimit)
        );
        assert_eq!(
            LeaderboardQuery::parse(1, None, Some(-1)),
            Err(LeaderboardQueryError::InvalidOffset)
        );
        assert!(LeaderboardQuery::parse(1, Some(500), Some(0)).is_ok());
    }
}
