//! Teams, groups, organizations and languages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ids::{GroupId, LanguageId, OrganizationId, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: TeamId,
    pub display_name: String,
    pub full_name: String,
    /// Group memberships drive group-champion award eligibility.
    #[serde(default)]
    pub groups: BTreeSet<GroupId>,
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// Hidden teams are removed from every scoreboard entirely.
    #[serde(default)]
    pub is_hidden: bool,
    /// Out-of-contest teams stay visible but are excluded from official
    /// ranking and awards.
    #[serde(default)]
    pub is_out_of_contest: bool,
}

impl TeamInfo {
    pub fn new(id: impl Into<TeamId>, display_name: &str) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.to_string(),
            full_name: display_name.to_string(),
            groups: BTreeSet::new(),
            organization_id: None,
            is_hidden: false,
            is_out_of_contest: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: GroupId,
    pub display_name: String,
    #[serde(default)]
    pub is_hidden: bool,
    /// Teams of an out-of-contest group are shown but not ranked.
    #[serde(default)]
    pub is_out_of_contest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub id: OrganizationId,
    pub display_name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub id: LanguageId,
    pub name: String,
}
