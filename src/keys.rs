//! Cache Key Builders
//!
//! Deterministic cache keys for the dashboard's API endpoints. Two requests
//! that mean the same thing always produce the same key, whatever order
//! their parameters were assembled in.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::CacheError;
use crate::registry::CacheTier;

// == Resource ==
/// Backend resources whose responses are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Games,
    Teams,
    Players,
    Rosters,
    ScoutingReports,
    Analytics,
    Standings,
    Seasons,
    Users,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Games,
        Resource::Teams,
        Resource::Players,
        Resource::Rosters,
        Resource::ScoutingReports,
        Resource::Analytics,
        Resource::Standings,
        Resource::Seasons,
        Resource::Users,
    ];

    /// Endpoint name; also the leading segment of every key for the resource.
    pub fn endpoint(self) -> &'static str {
        match self {
            Resource::Games => "games",
            Resource::Teams => "teams",
            Resource::Players => "players",
            Resource::Rosters => "rosters",
            Resource::ScoutingReports => "scouting",
            Resource::Analytics => "analytics",
            Resource::Standings => "standings",
            Resource::Seasons => "seasons",
            Resource::Users => "users",
        }
    }

    /// Tier the resource's responses are cached in.
    pub fn tier(self) -> CacheTier {
        match self {
            Resource::Teams | Resource::Seasons => CacheTier::Reference,
            Resource::Users => CacheTier::Session,
            _ => CacheTier::Api,
        }
    }

    /// Resources whose cached views are derived from this one and go stale
    /// when it changes.
    pub fn dependents(self) -> &'static [Resource] {
        match self {
            Resource::Games => &[Resource::Analytics, Resource::Standings],
            Resource::Teams => &[Resource::Rosters, Resource::Standings],
            Resource::Players => &[Resource::Rosters, Resource::Analytics],
            Resource::Seasons => &[Resource::Games, Resource::Standings],
            _ => &[],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for Resource {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.endpoint() == s)
            .ok_or_else(|| CacheError::UnknownResource(s.to_string()))
    }
}

// == Builders ==
/// Key for a parameterized request: `"{endpoint}_{canonical params}"`.
///
/// Object members are sorted and `null` members dropped, recursively.
/// `build_key("games", &json!({}))` is `"games_{}"`.
pub fn build_key(endpoint: &str, params: &Value) -> String {
    format!("{}_{}", endpoint, canonicalize(params))
}

/// Key for a resource list request.
pub fn list_key(resource: Resource, params: &Value) -> String {
    build_key(resource.endpoint(), params)
}

/// Key for a single record: `"{endpoint}_{id}"`.
pub fn detail_key(resource: Resource, id: impl fmt::Display) -> String {
    format!("{}_{}", resource.endpoint(), id)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(members) => {
            let mut sorted: Vec<(&String, &Value)> =
                members.iter().filter(|(_, v)| !v.is_null()).collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));

            let mut canonical = Map::new();
            for (name, member) in sorted {
                canonical.insert(name.clone(), canonicalize(member));
            }
            Value::Object(canonical)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_params() {
        assert_eq!(build_key("games", &json!({})), "games_{}");
    }

    #[test]
    fn test_param_order_does_not_matter() {
        let a = build_key("games", &json!({"status": "done", "page": 2}));
        let b = build_key("games", &json!({"page": 2, "status": "done"}));
        assert_eq!(a, b);
        assert_eq!(a, "games_{\"page\":2,\"status\":\"done\"}");
    }

    #[test]
    fn test_null_params_dropped() {
        assert_eq!(
            build_key("players", &json!({"team": null, "position": "PG"})),
            build_key("players", &json!({"position": "PG"}))
        );
    }

    #[test]
    fn test_nested_objects_canonicalized() {
        let a = build_key("analytics", &json!({"range": {"to": 5, "from": 1}}));
        assert_eq!(a, "analytics_{\"range\":{\"from\":1,\"to\":5}}");
    }

    #[test]
    fn test_array_order_preserved() {
        assert_ne!(
            build_key("teams", &json!({"ids": [1, 2]})),
            build_key("teams", &json!({"ids": [2, 1]}))
        );
    }

    #[test]
    fn test_list_and_detail_keys() {
        assert_eq!(
            list_key(Resource::ScoutingReports, &json!({})),
            "scouting_{}"
        );
        assert_eq!(detail_key(Resource::Games, 42), "games_42");
    }

    #[test]
    fn test_resource_from_str() {
        assert_eq!("teams".parse::<Resource>().unwrap(), Resource::Teams);
        assert_eq!(
            "scouting".parse::<Resource>().unwrap(),
            Resource::ScoutingReports
        );
        assert!(matches!(
            "referees".parse::<Resource>(),
            Err(CacheError::UnknownResource(_))
        ));
    }

    #[test]
    fn test_endpoints_do_not_contain_each_other() {
        // Pattern invalidation on one endpoint must not hit another's keys.
        for a in Resource::ALL {
            for b in Resource::ALL {
                if a != b {
                    assert!(!b.endpoint().contains(a.endpoint()), "{} in {}", a, b);
                }
            }
        }
    }
}
