use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{Cost, DvError, DvResult, RouterId};

/// One routing table row: the best known cost to a destination and the
/// neighbor that advertised it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingEntry {
    pub cost: Cost,
    pub next_hop: RouterId,
}

/// Per-router mapping from destination to `RoutingEntry`.
///
/// Each `Router` exclusively owns its table. Other routers never hold a
/// reference into it; the round driver hands out clones as read-only
/// snapshots. `BTreeMap` keeps iteration order sorted by destination id so
/// that rounds and printed tables are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutingTable {
    entries: BTreeMap<RouterId, RoutingEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, destination: RouterId, entry: RoutingEntry) {
        self.entries.insert(destination, entry);
    }

    pub fn get(&self, destination: &str) -> Option<&RoutingEntry> {
        self.entries.get(destination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouterId, &RoutingEntry)> {
        self.entries.iter()
    }
}

/// A simulated router: its direct-neighbor link costs and its routing table.
///
/// There is no removal operation; within a run a table only grows or its
/// costs improve.
#[derive(Debug, Clone)]
pub struct Router {
    id: RouterId,
    neighbors: BTreeMap<RouterId, Cost>,
    routing_table: RoutingTable,
}

impl Router {
    /// Creates a router that initially knows only itself, at cost 0.
    pub fn new(id: impl Into<RouterId>) -> Self {
        let id = id.into();
        let mut routing_table = RoutingTable::new();
        routing_table.insert(
            id.clone(),
            RoutingEntry {
                cost: 0.0,
                next_hop: id.clone(),
            },
        );
        Self {
            id,
            neighbors: BTreeMap::new(),
            routing_table,
        }
    }

    pub fn id(&self) -> &RouterId {
        &self.id
    }

    pub fn neighbors(&self) -> &BTreeMap<RouterId, Cost> {
        &self.neighbors
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Records a direct link to `neighbor_id` and (re)writes the table entry
    /// for it as the direct route.
    ///
    /// The overwrite is unconditional even when a cheaper indirect route had
    /// already been learned: a direct-link announcement always wins over
    /// memory, modeling "link cost just communicated". Subsequent rounds
    /// rediscover the cheaper path if one exists.
    pub fn add_neighbor(&mut self, neighbor_id: impl Into<RouterId>, cost: Cost) {
        let neighbor_id = neighbor_id.into();
        self.neighbors.insert(neighbor_id.clone(), cost);
        self.routing_table.insert(
            neighbor_id.clone(),
            RoutingEntry {
                cost,
                next_hop: neighbor_id,
            },
        );
        // A router always reaches itself at cost 0.
        self.routing_table.insert(
            self.id.clone(),
            RoutingEntry {
                cost: 0.0,
                next_hop: self.id.clone(),
            },
        );
    }

    /// Bellman-Ford relaxation against one neighbor's advertised table.
    ///
    /// For every destination the neighbor knows, considers the path through
    /// that neighbor and adopts it only on strict improvement: an established
    /// route is sticky against an equally-good alternative. Returns whether
    /// any entry changed.
    ///
    /// Calling this with an id that is not a direct neighbor is a contract
    /// violation in the driver and yields `DvError::UnknownNeighbor`.
    pub fn relax_from(
        &mut self,
        neighbor_id: &str,
        neighbor_table: &RoutingTable,
    ) -> DvResult<bool> {
        let link_cost = *self
            .neighbors
            .get(neighbor_id)
            .ok_or_else(|| DvError::UnknownNeighbor {
                router: self.id.clone(),
                neighbor: neighbor_id.to_string(),
            })?;

        let mut changed = false;
        for (dest, advertised) in neighbor_table.iter() {
            let candidate = link_cost + advertised.cost;
            let better = match self.routing_table.get(dest) {
                Some(current) => candidate < current.cost,
                None => true,
            };
            if better {
                debug!(
                    "{}: route to {} now costs {} via {}",
                    self.id, dest, candidate, neighbor_id
                );
                self.routing_table.insert(
                    dest.clone(),
                    RoutingEntry {
                        cost: candidate,
                        next_hop: neighbor_id.to_string(),
                    },
                );
                changed = true;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cost: Cost, next_hop: &str) -> RoutingEntry {
        RoutingEntry {
            cost,
            next_hop: next_hop.to_string(),
        }
    }

    #[test]
    fn new_router_knows_itself() {
        let r = Router::new("A");
        assert_eq!(r.routing_table().get("A"), Some(&entry(0.0, "A")));
        assert_eq!(r.routing_table().len(), 1);
    }

    #[test]
    fn add_neighbor_seeds_direct_route() {
        let mut r = Router::new("A");
        r.add_neighbor("B", 4.0);
        assert_eq!(r.neighbors().get("B"), Some(&4.0));
        assert_eq!(r.routing_table().get("B"), Some(&entry(4.0, "B")));
        // Self route survives the mutation.
        assert_eq!(r.routing_table().get("A"), Some(&entry(0.0, "A")));
    }

    #[test]
    fn add_neighbor_overwrites_learned_route() {
        let mut r = Router::new("A");
        r.add_neighbor("B", 5.0);
        r.add_neighbor("C", 1.0);

        // C advertises a cheap route to B; A adopts it.
        let mut c_table = RoutingTable::new();
        c_table.insert("B".to_string(), entry(1.0, "B"));
        assert!(r.relax_from("C", &c_table).unwrap());
        assert_eq!(r.routing_table().get("B"), Some(&entry(2.0, "C")));

        // A re-announced direct link resets the entry even though the
        // learned route was cheaper.
        r.add_neighbor("B", 5.0);
        assert_eq!(r.routing_table().get("B"), Some(&entry(5.0, "B")));
    }

    #[test]
    fn relax_adopts_strictly_better_routes_only() {
        let mut r = Router::new("A");
        r.add_neighbor("B", 1.0);

        let mut b_table = RoutingTable::new();
        b_table.insert("X".to_string(), entry(3.0, "X"));
        assert!(r.relax_from("B", &b_table).unwrap());
        assert_eq!(r.routing_table().get("X"), Some(&entry(4.0, "B")));

        // Same advertisement again: tie, no change.
        assert!(!r.relax_from("B", &b_table).unwrap());

        // An equally-good route via another neighbor does not displace the
        // established one.
        r.add_neighbor("C", 2.0);
        let mut c_table = RoutingTable::new();
        c_table.insert("X".to_string(), entry(2.0, "X"));
        assert!(!r.relax_from("C", &c_table).unwrap());
        assert_eq!(r.routing_table().get("X"), Some(&entry(4.0, "B")));
    }

    #[test]
    fn relax_never_worsens_self_route() {
        let mut r = Router::new("A");
        r.add_neighbor("B", 1.0);
        let mut b_table = RoutingTable::new();
        b_table.insert("A".to_string(), entry(1.0, "A"));
        r.relax_from("B", &b_table).unwrap();
        assert_eq!(r.routing_table().get("A"), Some(&entry(0.0, "A")));
    }

    #[test]
    fn relax_from_unknown_neighbor_is_an_error() {
        let mut r = Router::new("A");
        let err = r.relax_from("Z", &RoutingTable::new()).unwrap_err();
        assert!(matches!(err, DvError::UnknownNeighbor { .. }));
    }
}
