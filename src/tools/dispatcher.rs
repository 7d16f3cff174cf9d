//! Tool Dispatcher
//!
//! Maps named tool invocations and resource URIs onto [`UpstreamClient`]
//! operations and shapes their results.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};

use crate::client::{ClearCategory, UpstreamClient};
use crate::error::{OrklError, Result};
use crate::models::{
    ActorDetailsArgs, ClearCacheArgs, LatestReportsArgs, ReportByHashArgs, ReportDetailsArgs,
    SearchArgs, SourceDetailsArgs,
};
use crate::tools::ResourceUri;

// == Tool Name ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    FetchLatestThreatReports,
    FetchThreatReportDetails,
    FetchThreatReportByHash,
    SearchThreatReports,
    GetLibraryInfo,
    GetLibraryVersion,
    FetchThreatActors,
    FetchThreatActorDetails,
    FetchSources,
    FetchSourceDetails,
    ClearCache,
}

impl ToolName {
    pub const ALL: [ToolName; 11] = [
        ToolName::FetchLatestThreatReports,
        ToolName::FetchThreatReportDetails,
        ToolName::FetchThreatReportByHash,
        ToolName::SearchThreatReports,
        ToolName::GetLibraryInfo,
        ToolName::GetLibraryVersion,
        ToolName::FetchThreatActors,
        ToolName::FetchThreatActorDetails,
        ToolName::FetchSources,
        ToolName::FetchSourceDetails,
        ToolName::ClearCache,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::FetchLatestThreatReports => "fetch_latest_threat_reports",
            ToolName::FetchThreatReportDetails => "fetch_threat_report_details",
            ToolName::FetchThreatReportByHash => "fetch_threat_report_by_hash",
            ToolName::SearchThreatReports => "search_threat_reports",
            ToolName::GetLibraryInfo => "get_library_info",
            ToolName::GetLibraryVersion => "get_library_version",
            ToolName::FetchThreatActors => "fetch_threat_actors",
            ToolName::FetchThreatActorDetails => "fetch_threat_actor_details",
            ToolName::FetchSources => "fetch_sources",
            ToolName::FetchSourceDetails => "fetch_source_details",
            ToolName::ClearCache => "clear_cache",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::FetchLatestThreatReports => {
                "Retrieve the most recent threat intelligence reports from the ORKL library"
            }
            ToolName::FetchThreatReportDetails => {
                "Retrieve detailed information about a specific threat report by ID"
            }
            ToolName::FetchThreatReportByHash => {
                "Retrieve a specific threat report using its SHA1 hash"
            }
            ToolName::SearchThreatReports => {
                "Search the ORKL library for threat reports matching specific criteria"
            }
            ToolName::GetLibraryInfo => {
                "Retrieve general information about the ORKL threat intelligence library"
            }
            ToolName::GetLibraryVersion => {
                "Retrieve the latest version information for the ORKL library"
            }
            ToolName::FetchThreatActors => "Retrieve a list of all threat actors in the ORKL database",
            ToolName::FetchThreatActorDetails => {
                "Retrieve detailed information about a specific threat actor"
            }
            ToolName::FetchSources => "Retrieve a list of all sources in the ORKL database",
            ToolName::FetchSourceDetails => "Retrieve detailed information about a specific source",
            ToolName::ClearCache => {
                "Clear the server's cache for more up-to-date information retrieval"
            }
        }
    }

    /// JSON Schema of the tool's argument object.
    pub fn input_schema(&self) -> Value {
        match self {
            ToolName::FetchLatestThreatReports => json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "minimum": 0, "default": 10},
                    "offset": {"type": "integer", "minimum": 0},
                    "order_by": {
                        "type": "string",
                        "enum": ["created_at", "updated_at", "file_creation_date", "file_modification_date"],
                        "default": "created_at"
                    },
                    "order": {"type": "string", "enum": ["asc", "desc"], "default": "desc"}
                }
            }),
            ToolName::FetchThreatReportDetails => id_schema("report_id"),
            ToolName::FetchThreatReportByHash => id_schema("sha1_hash"),
            ToolName::SearchThreatReports => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Use quoted terms for exact matches"},
                    "full": {"type": "boolean", "default": false},
                    "limit": {"type": "integer", "minimum": 0, "default": 1000}
                },
                "required": ["query"]
            }),
            ToolName::FetchThreatActorDetails => id_schema("actor_id"),
            ToolName::FetchSourceDetails => json!({
                "type": "object",
                "properties": {
                    "source_id": {"type": "string"},
                    "full": {"type": "boolean", "default": false}
                },
                "required": ["source_id"]
            }),
            ToolName::ClearCache => json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "enum": ["threat_reports", "threat_actors", "sources", "all"],
                        "default": "all"
                    }
                }
            }),
            ToolName::GetLibraryInfo
            | ToolName::GetLibraryVersion
            | ToolName::FetchThreatActors
            | ToolName::FetchSources => json!({"type": "object", "properties": {}}),
        }
    }
}

impl FromStr for ToolName {
    type Err = OrklError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| OrklError::UnknownTool(name.to_string()))
    }
}

fn id_schema(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": { field: {"type": "string"} },
        "required": [field]
    })
}

/// Advertised tool, as listed by `GET /tools`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL
        .iter()
        .map(|tool| ToolDefinition {
            name: tool.as_str(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

// == Tool Dispatcher ==
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    client: UpstreamClient,
}

impl ToolDispatcher {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    // == Call ==
    /// Runs tool `name` with JSON `args` (an object, or null for no arguments).
    pub async fn call(&self, name: &str, args: Value) -> Result<Value> {
        let tool: ToolName = name.parse()?;
        debug!("Calling tool {}", tool.as_str());

        let result = self.dispatch(tool, args).await;
        match &result {
            Err(e) if e.is_retryable() => warn!("Tool {} failed, retry later: {}", tool.as_str(), e),
            Err(e) => error!("Error running tool {}: {}", tool.as_str(), e),
            Ok(_) => {}
        }
        result
    }

    async fn dispatch(&self, tool: ToolName, args: Value) -> Result<Value> {
        let client = &self.client;
        match tool {
            ToolName::FetchLatestThreatReports => {
                let args: LatestReportsArgs = parse_args(args)?;
                Ok(extract_data(client.latest_threat_reports(&args.into()).await?))
            }
            ToolName::FetchThreatReportDetails => {
                let args: ReportDetailsArgs = parse_args(args)?;
                check(args.validate())?;
                Ok(present(client.threat_report(args.report_id.trim()).await?))
            }
            ToolName::FetchThreatReportByHash => {
                let args: ReportByHashArgs = parse_args(args)?;
                check(args.validate())?;
                Ok(present(
                    client.threat_report_by_hash(args.sha1_hash.trim()).await?,
                ))
            }
            ToolName::SearchThreatReports => {
                let args: SearchArgs = parse_args(args)?;
                check(args.validate())?;
                Ok(extract_data(client.search_threat_reports(&args.into()).await?))
            }
            ToolName::GetLibraryInfo => Ok(extract_data(client.library_info().await?)),
            ToolName::GetLibraryVersion => Ok(extract_data(client.library_version().await?)),
            ToolName::FetchThreatActors => Ok(extract_data(client.threat_actors().await?)),
            ToolName::FetchThreatActorDetails => {
                let args: ActorDetailsArgs = parse_args(args)?;
                check(args.validate())?;
                Ok(present(client.threat_actor(args.actor_id.trim()).await?))
            }
            ToolName::FetchSources => Ok(extract_data(client.sources().await?)),
            ToolName::FetchSourceDetails => {
                let args: SourceDetailsArgs = parse_args(args)?;
                check(args.validate())?;
                Ok(present(client.source(args.source_id.trim(), args.full).await?))
            }
            ToolName::ClearCache => {
                let args: ClearCacheArgs = parse_args(args)?;
                let category = match args.category.as_deref() {
                    Some(raw) => raw.parse::<ClearCategory>()?,
                    None => ClearCategory::default(),
                };
                let removed = client.clear_cache(category).await;
                Ok(json!({
                    "status": "success",
                    "message": "Cache cleared",
                    "category": category.as_str(),
                    "removed": removed,
                }))
            }
        }
    }

    // == Resources ==
    /// Resolves a resource URI through the same path as the matching tool.
    pub async fn read_resource(&self, uri: &str) -> Result<Value> {
        let resource: ResourceUri = uri.parse()?;
        debug!("Reading resource {:?}", resource);

        let payload = match &resource {
            ResourceUri::ThreatReport(id) => self.client.threat_report(id).await,
            ResourceUri::ThreatActor(id) => self.client.threat_actor(id).await,
            ResourceUri::Source(id) => self.client.source(id, false).await,
        };
        match payload {
            Ok(payload) => Ok(present(payload)),
            Err(e) => {
                error!("Error reading resource {}: {}", uri, e);
                Err(e)
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| OrklError::InvalidArguments(e.to_string()))
}

fn check(problem: Option<String>) -> Result<()> {
    match problem {
        Some(message) => Err(OrklError::InvalidArguments(message)),
        None => Ok(()),
    }
}

/// Unwraps the `data` envelope of an ORKL response when there is one.
pub fn extract_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Absent entities become `null` rather than an error.
fn present(payload: Option<Value>) -> Value {
    payload.map(extract_data).unwrap_or(Value::Null)
}
