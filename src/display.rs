//! Console rendering of routers and topology. Presentation only; the
//! simulation core never prints.

use std::fmt::Write;

use crate::network::Network;
use crate::router::Router;

pub fn format_routing_table(router: &Router) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Routing table for router {}:", router.id());
    let _ = writeln!(out, "Destination | Cost  | Next hop");
    let _ = writeln!(out, "{}", "-".repeat(35));
    for (dest, entry) in router.routing_table().iter() {
        let _ = writeln!(
            out,
            "{:^11} | {:^5} | {:^8}",
            dest, entry.cost, entry.next_hop
        );
    }
    out
}

pub fn format_link_costs(network: &Network) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Link costs:");
    for router in network.routers() {
        for (neighbor, cost) in router.neighbors() {
            // Each undirected link appears once.
            if router.id() < neighbor {
                let _ = writeln!(out, "  {}-{}: {}", router.id(), neighbor, cost);
            }
        }
    }
    out
}
