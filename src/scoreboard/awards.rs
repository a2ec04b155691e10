//! Award assignment from a finished ranking.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::ScoreboardRow;
use crate::errors::ConfigurationError;
use crate::model::{AwardsSettings, ContestInfo, GroupId, MedalTiebreakMode, TeamId};

/// One granted award with the teams that received it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Award {
    Winner {
        id: String,
        citation: String,
        teams: BTreeSet<TeamId>,
    },
    GroupChampion {
        id: String,
        citation: String,
        group_id: GroupId,
        teams: BTreeSet<TeamId>,
    },
    Medal {
        id: String,
        citation: String,
        teams: BTreeSet<TeamId>,
    },
    Custom {
        id: String,
        citation: String,
        teams: BTreeSet<TeamId>,
    },
}

impl Award {
    pub fn teams(&self) -> &BTreeSet<TeamId> {
        match self {
            Award::Winner { teams, .. }
            | Award::GroupChampion { teams, .. }
            | Award::Medal { teams, .. }
            | Award::Custom { teams, .. } => teams,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Award::Winner { id, .. }
            | Award::GroupChampion { id, .. }
            | Award::Medal { id, .. }
            | Award::Custom { id, .. } => id,
        }
    }
}

/// Reject award settings the engine cannot honor. Called once at startup.
pub fn validate_awards(settings: &AwardsSettings) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for medal in &settings.medals {
        if medal.count == 0 {
            return Err(ConfigurationError::EmptyMedalBand(medal.id.clone()));
        }
        if !seen.insert(medal.id.as_str()) {
            return Err(ConfigurationError::DuplicateAwardId(medal.id.clone()));
        }
    }
    for manual in &settings.manual {
        if !seen.insert(manual.id.as_str()) {
            return Err(ConfigurationError::DuplicateAwardId(manual.id.clone()));
        }
    }
    Ok(())
}

fn medal_eligible(row: &ScoreboardRow, min_score: Option<f64>) -> bool {
    match min_score {
        Some(min) => row.total_score >= min,
        None => row.total_score > 0.0,
    }
}

/// Derive all awards from the ranked team order.
///
/// Only teams present in `order` (official, ranked teams) can receive
/// rank-based awards; manual awards go to whatever known teams the settings
/// list.
pub(super) fn assign(
    info: &ContestInfo,
    rows: &BTreeMap<TeamId, ScoreboardRow>,
    order: &[TeamId],
    ranks: &[u32],
) -> Vec<Award> {
    let settings = &info.awards;
    let mut awards = Vec::new();

    if let Some(title) = &settings.champion_title {
        let teams: BTreeSet<TeamId> = order
            .iter()
            .zip(ranks)
            .take_while(|(_, rank)| **rank == 1)
            .filter(|(team, _)| {
                rows.get(*team)
                    .is_some_and(|row| row.total_score > 0.0)
            })
            .map(|(team, _)| team.clone())
            .collect();
        if !teams.is_empty() {
            awards.push(Award::Winner {
                id: "winner".to_string(),
                citation: title.clone(),
                teams,
            });
        }
    }

    for (group_id, title) in &settings.groups_champion_titles {
        // Best-ranked block of the group; ties within it all champion.
        let mut best_rank = None;
        let mut teams = BTreeSet::new();
        for (team, rank) in order.iter().zip(ranks) {
            let in_group = info
                .teams
                .get(team)
                .is_some_and(|t| t.groups.contains(group_id));
            if !in_group {
                continue;
            }
            match best_rank {
                None => {
                    best_rank = Some(*rank);
                    teams.insert(team.clone());
                }
                Some(best) if *rank == best => {
                    teams.insert(team.clone());
                }
                Some(_) => break,
            }
        }
        let scored = teams.iter().any(|team| {
            rows.get(team)
                .is_some_and(|row| row.total_score > 0.0)
        });
        if scored {
            awards.push(Award::GroupChampion {
                id: format!("group-winner-{group_id}"),
                citation: title.clone(),
                group_id: group_id.clone(),
                teams,
            });
        }
    }

    // Medal bands consume the order front to back.
    let mut cursor = 0usize;
    for medal in &settings.medals {
        let mut teams = BTreeSet::new();
        let mut taken = 0usize;
        while cursor < order.len() && taken < medal.count {
            let team = &order[cursor];
            if !rows
                .get(team)
                .is_some_and(|row| medal_eligible(row, medal.min_score))
            {
                break;
            }
            teams.insert(team.clone());
            cursor += 1;
            taken += 1;
        }
        // A tie straddling the band edge either extends the band or trims
        // the tied block off, per the medal's tiebreak mode.
        if taken == medal.count && cursor > 0 && cursor < order.len() {
            let edge_rank = ranks[cursor - 1];
            if ranks[cursor] == edge_rank {
                match medal.tiebreak_mode {
                    MedalTiebreakMode::All => {
                        while cursor < order.len() && ranks[cursor] == edge_rank {
                            let team = &order[cursor];
                            if !rows
                                .get(team)
                                .is_some_and(|row| medal_eligible(row, medal.min_score))
                            {
                                break;
                            }
                            teams.insert(team.clone());
                            cursor += 1;
                        }
                    }
                    MedalTiebreakMode::None => {
                        while cursor > 0 && ranks[cursor - 1] == edge_rank {
                            cursor -= 1;
                            teams.remove(&order[cursor]);
                        }
                    }
                }
            }
        }
        if !teams.is_empty() {
            awards.push(Award::Medal {
                id: medal.id.clone(),
                citation: medal.citation.clone(),
                teams,
            });
        }
    }

    for manual in &settings.manual {
        let teams: BTreeSet<TeamId> = manual
            .team_ids
            .iter()
            .filter(|team| info.teams.contains_key(*team))
            .cloned()
            .collect();
        if !teams.is_empty() {
            awards.push(Award::Custom {
                id: manual.id.clone(),
                citation: manual.citation.clone(),
                teams,
            });
        }
    }

    awards
}
