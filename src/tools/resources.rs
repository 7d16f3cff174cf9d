//! Addressable Resources
//!
//! `threat_reports://{report_id}`, `threat_actors://{actor_id}` and
//! `sources://{source_id}` URIs.

use std::str::FromStr;

use serde::Serialize;

use crate::error::OrklError;

// == Resource URI ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    ThreatReport(String),
    ThreatActor(String),
    Source(String),
}

impl FromStr for ResourceUri {
    type Err = OrklError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let (scheme, id) = uri
            .split_once("://")
            .ok_or_else(|| OrklError::UnknownResource(uri.to_string()))?;

        let id = id.trim().trim_end_matches('/');
        let build: fn(String) -> ResourceUri = match scheme {
            "threat_reports" => ResourceUri::ThreatReport,
            "threat_actors" => ResourceUri::ThreatActor,
            "sources" => ResourceUri::Source,
            _ => return Err(OrklError::UnknownResource(uri.to_string())),
        };

        if id.is_empty() {
            return Err(OrklError::InvalidArguments(format!(
                "resource URI '{}' is missing an identifier",
                uri
            )));
        }
        Ok(build(id.to_string()))
    }
}

/// Advertised resource URI pattern.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceTemplate {
    pub uri_template: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn resource_templates() -> Vec<ResourceTemplate> {
    vec![
        ResourceTemplate {
            uri_template: "threat_reports://{report_id}",
            name: "threat_report",
            description: "Direct access to a specific threat report",
        },
        ResourceTemplate {
            uri_template: "threat_actors://{actor_id}",
            name: "threat_actor",
            description: "Direct access to a specific threat actor profile",
        },
        ResourceTemplate {
            uri_template: "sources://{source_id}",
            name: "source",
            description: "Direct access to a specific source",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_schemes() {
        assert_eq!(
            "threat_reports://r1".parse::<ResourceUri>().unwrap(),
            ResourceUri::ThreatReport("r1".to_string())
        );
        assert_eq!(
            "threat_actors://a-42".parse::<ResourceUri>().unwrap(),
            ResourceUri::ThreatActor("a-42".to_string())
        );
        assert_eq!(
            "sources://s9/".parse::<ResourceUri>().unwrap(),
            ResourceUri::Source("s9".to_string())
        );
    }

    #[test]
    fn test_unknown_scheme() {
        assert!(matches!(
            "malware://x".parse::<ResourceUri>(),
            Err(OrklError::UnknownResource(_))
        ));
        assert!(matches!(
            "no-scheme".parse::<ResourceUri>(),
            Err(OrklError::UnknownResource(_))
        ));
    }

    #[test]
    fn test_missing_identifier() {
        assert!(matches!(
            "sources://".parse::<ResourceUri>(),
            Err(OrklError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_templates_cover_all_schemes() {
        let templates = resource_templates();
        assert_eq!(templates.len(), 3);
        for template in templates {
            let sample = template.uri_template.replace(|c: char| c == '{' || c == '}', "");
            assert!(sample.parse::<ResourceUri>().is_ok(), "{}", template.uri_template);
        }
    }
}
