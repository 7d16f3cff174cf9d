//! Typed query parameters for the ORKL endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrklError;

/// Date field used to order library entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    FileCreationDate,
    FileModificationDate,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "created_at",
            OrderBy::UpdatedAt => "updated_at",
            OrderBy::FileCreationDate => "file_creation_date",
            OrderBy::FileModificationDate => "file_modification_date",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Parameters for listing the most recent threat reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestReportsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: OrderBy,
    pub order: SortOrder,
}

/// Parameters for a full-text library search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    /// Include the report plain text in results
    pub full: bool,
    pub limit: u32,
}

// == Clear Category ==
/// Endpoint family whose cached responses `clear_cache` drops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearCategory {
    ThreatReports,
    ThreatActors,
    Sources,
    #[default]
    All,
}

impl ClearCategory {
    /// Fingerprint prefix of the family, `None` for everything.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            ClearCategory::ThreatReports => Some("/library/"),
            ClearCategory::ThreatActors => Some("/ta/"),
            ClearCategory::Sources => Some("/source/"),
            ClearCategory::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearCategory::ThreatReports => "threat_reports",
            ClearCategory::ThreatActors => "threat_actors",
            ClearCategory::Sources => "sources",
            ClearCategory::All => "all",
        }
    }
}

impl FromStr for ClearCategory {
    type Err = OrklError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threat_reports" => Ok(ClearCategory::ThreatReports),
            "threat_actors" => Ok(ClearCategory::ThreatActors),
            "sources" => Ok(ClearCategory::Sources),
            "all" => Ok(ClearCategory::All),
            other => Err(OrklError::InvalidArguments(format!(
                "Invalid category: {}. Valid values: threat_reports, threat_actors, sources, all",
                other
            ))),
        }
    }
}
