//! Single-source shortest paths, computed centrally.
//!
//! The distance-vector protocol learns these costs in a distributed way; this
//! module computes them directly from the full topology so converged tables
//! can be checked against an independent algorithm.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::network::Network;
use crate::{Cost, DvError, DvResult, RouterId};

#[derive(Debug)]
struct State {
    cost: Cost,
    router: RouterId,
}

impl Eq for State {}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap. Costs are finite (enforced at link
        // creation), so total_cmp agrees with the usual order.
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm from `source` over the network's link topology.
///
/// Returns the cost to every reachable router, the source itself at 0.
/// Unreachable routers are absent from the result.
pub fn shortest_path_costs(network: &Network, source: &str) -> DvResult<BTreeMap<RouterId, Cost>> {
    if network.get_router(source).is_none() {
        return Err(DvError::UnknownRouter(source.to_string()));
    }

    let mut distances: BTreeMap<RouterId, Cost> = BTreeMap::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source.to_string(), 0.0);
    heap.push(State {
        cost: 0.0,
        router: source.to_string(),
    });

    while let Some(State { cost, router }) = heap.pop() {
        // Skip stale heap entries superseded by a better path.
        match distances.get(&router) {
            Some(&best) if cost > best => continue,
            _ => {}
        }

        let Some(node) = network.get_router(&router) else {
            continue;
        };
        for (neighbor, &link_cost) in node.neighbors() {
            let candidate = cost + link_cost;
            let improved = match distances.get(neighbor) {
                Some(&best) => candidate < best,
                None => true,
            };
            if improved {
                distances.insert(neighbor.clone(), candidate);
                heap.push(State {
                    cost: candidate,
                    router: neighbor.clone(),
                });
            }
        }
    }

    Ok(distances)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Network {
        let mut net = Network::new();
        for id in ["A", "B", "C"] {
            net.add_router(id).unwrap();
        }
        net.add_link("A", "B", 1.0).unwrap();
        net.add_link("B", "C", 1.0).unwrap();
        net.add_link("A", "C", 5.0).unwrap();
        net
    }

    #[test]
    fn prefers_multi_hop_path_when_cheaper() {
        let net = triangle();
        let costs = shortest_path_costs(&net, "A").unwrap();
        assert_eq!(costs["A"], 0.0);
        assert_eq!(costs["B"], 1.0);
        assert_eq!(costs["C"], 2.0);
    }

    #[test]
    fn unreachable_routers_are_absent() {
        let mut net = triangle();
        net.add_router("Z").unwrap();
        let costs = shortest_path_costs(&net, "A").unwrap();
        assert!(!costs.contains_key("Z"));
        assert_eq!(costs.len(), 3);
    }

    #[test]
    fn unknown_source_is_an_error() {
        let net = triangle();
        assert!(matches!(
            shortest_path_costs(&net, "Q"),
            Err(DvError::UnknownRouter(_))
        ));
    }
}
