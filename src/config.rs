use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::network::Network;
use crate::{Cost, DvResult, RouterId};

/// A network topology as declared in a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub routers: Vec<RouterId>,
    pub links: Vec<LinkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub from: RouterId,
    pub to: RouterId,
    pub cost: Cost,
}

impl TopologyConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read topology file {}", path.display()))?;
        let config: TopologyConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse topology file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Instantiates the declared topology. Link validation (existing
    /// endpoints, finite non-negative costs) happens in `Network::add_link`.
    pub fn build(&self) -> DvResult<Network> {
        let mut network = Network::new();
        for id in &self.routers {
            network.add_router(id.clone())?;
        }
        for link in &self.links {
            network.add_link(&link.from, &link.to, link.cost)?;
        }
        Ok(network)
    }

    /// The demo topology: 6 routers, 9 weighted bidirectional links.
    pub fn example() -> Self {
        let link = |from: &str, to: &str, cost: Cost| LinkConfig {
            from: from.to_string(),
            to: to.to_string(),
            cost,
        };
        Self {
            routers: ["A", "B", "C", "D", "E", "F"]
                .into_iter()
                .map(String::from)
                .collect(),
            links: vec![
                link("A", "B", 1.0),
                link("A", "F", 3.0),
                link("B", "C", 3.0),
                link("B", "F", 1.0),
                link("B", "E", 5.0),
                link("C", "D", 2.0),
                link("D", "E", 1.0),
                link("E", "F", 2.0),
                link("D", "F", 6.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DvError;

    #[test]
    fn parses_topology_json() {
        let json = r#"{
            "routers": ["A", "B"],
            "links": [{ "from": "A", "to": "B", "cost": 2.5 }]
        }"#;
        let config: TopologyConfig = serde_json::from_str(json).unwrap();
        let net = config.build().unwrap();
        assert_eq!(net.len(), 2);
        assert_eq!(net.get_router("A").unwrap().neighbors().get("B"), Some(&2.5));
    }

    #[test]
    fn build_propagates_link_errors() {
        let config = TopologyConfig {
            routers: vec!["A".to_string()],
            links: vec![LinkConfig {
                from: "A".to_string(),
                to: "B".to_string(),
                cost: 1.0,
            }],
        };
        assert!(matches!(
            config.build(),
            Err(DvError::UnknownRouter(_))
        ));
    }

    #[test]
    fn example_topology_round_trips_through_json() {
        let config = TopologyConfig::example();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TopologyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.routers.len(), 6);
        assert_eq!(parsed.links.len(), 9);
        assert!(parsed.build().is_ok());
    }
}
