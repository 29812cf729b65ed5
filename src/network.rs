use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::router::{Router, RoutingTable};
use crate::{Cost, DvError, DvResult, RouterId};

/// Terminal status of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConvergenceStatus {
    /// A full round produced no table change anywhere in the network.
    Converged,
    /// The round cap elapsed before a quiet round. Not an error; the tables
    /// reached so far remain valid partial state.
    Exhausted,
}

/// What `Network::simulate` reports back to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    pub status: ConvergenceStatus,
    /// Rounds executed, including the quiet round that established
    /// convergence.
    pub rounds: usize,
}

impl SimulationOutcome {
    pub fn converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }
}

/// The set of routers and the undirected weighted topology linking them.
///
/// Topology is static for the duration of a run: routers and links are only
/// added, never removed. The round driver is single-threaded and synchronous;
/// routers are visited in sorted-id order so runs are reproducible.
#[derive(Debug, Clone, Default)]
pub struct Network {
    routers: BTreeMap<RouterId, Router>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty router. Duplicate ids are rejected rather than silently
    /// replacing the existing router and its links.
    pub fn add_router(&mut self, id: impl Into<RouterId>) -> DvResult<()> {
        let id = id.into();
        if self.routers.contains_key(&id) {
            return Err(DvError::DuplicateRouter(id));
        }
        self.routers.insert(id.clone(), Router::new(id));
        Ok(())
    }

    /// Adds a bidirectional link between two existing routers.
    ///
    /// All validation happens before either router is touched, so a rejected
    /// link leaves both untouched and the symmetry invariant
    /// `routers[u].neighbors[v] == routers[v].neighbors[u]` always holds.
    /// Costs must be finite and non-negative; negative costs would break the
    /// monotone-relaxation argument that guarantees convergence.
    pub fn add_link(&mut self, u: &str, v: &str, cost: Cost) -> DvResult<()> {
        if u == v {
            return Err(DvError::SelfLink(u.to_string()));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(DvError::InvalidLinkCost {
                a: u.to_string(),
                b: v.to_string(),
                cost,
            });
        }
        for id in [u, v] {
            if !self.routers.contains_key(id) {
                return Err(DvError::UnknownRouter(id.to_string()));
            }
        }

        if let Some(router) = self.routers.get_mut(u) {
            router.add_neighbor(v, cost);
        }
        if let Some(router) = self.routers.get_mut(v) {
            router.add_neighbor(u, cost);
        }
        debug!("link {}-{} cost {}", u, v, cost);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn get_router(&self, id: &str) -> Option<&Router> {
        self.routers.get(id)
    }

    /// Read-only view of one router's current table, for display.
    pub fn get_routing_table(&self, id: &str) -> Option<&RoutingTable> {
        self.routers.get(id).map(Router::routing_table)
    }

    /// Routers in sorted-id order.
    pub fn routers(&self) -> impl Iterator<Item = &Router> {
        self.routers.values()
    }

    /// Runs one synchronous exchange round and reports whether any table
    /// changed.
    ///
    /// Each router, in sorted-id order, pulls a snapshot of each neighbor's
    /// table (neighbors also in sorted-id order) and relaxes against it. The
    /// snapshot is taken at the moment of use, not frozen at round start: a
    /// router processed earlier in the round advertises its already-improved
    /// table to routers processed later. Transient per-round contents are
    /// therefore order-dependent, but the fixed point is not.
    pub fn run_round(&mut self) -> DvResult<bool> {
        let ids: Vec<RouterId> = self.routers.keys().cloned().collect();
        let mut any_changed = false;

        for id in &ids {
            let neighbor_ids: Vec<RouterId> = self
                .routers
                .get(id)
                .map(|r| r.neighbors().keys().cloned().collect())
                .unwrap_or_default();

            for neighbor_id in neighbor_ids {
                let snapshot = self
                    .routers
                    .get(&neighbor_id)
                    .ok_or_else(|| DvError::UnknownRouter(neighbor_id.clone()))?
                    .routing_table()
                    .clone();

                let router = self
                    .routers
                    .get_mut(id)
                    .ok_or_else(|| DvError::UnknownRouter(id.clone()))?;
                if router.relax_from(&neighbor_id, &snapshot)? {
                    any_changed = true;
                }
            }
        }

        Ok(any_changed)
    }

    /// Drives rounds until a quiet round or `max_rounds`, whichever first.
    ///
    /// State machine: RUNNING -> RUNNING while rounds keep producing changes,
    /// RUNNING -> CONVERGED on the first quiet round, RUNNING -> EXHAUSTED
    /// when the cap elapses. Exhaustion is a reported terminal status, not an
    /// error.
    pub fn simulate(&mut self, max_rounds: usize) -> DvResult<SimulationOutcome> {
        info!(
            "starting distance-vector simulation: {} routers, cap {} rounds",
            self.routers.len(),
            max_rounds
        );

        for round in 1..=max_rounds {
            if !self.run_round()? {
                info!("network converged after {} rounds", round);
                return Ok(SimulationOutcome {
                    status: ConvergenceStatus::Converged,
                    rounds: round,
                });
            }
            debug!("round {}: tables still changing", round);
        }

        warn!(
            "round cap of {} reached without convergence",
            max_rounds
        );
        Ok(SimulationOutcome {
            status: ConvergenceStatus::Exhausted,
            rounds: max_rounds,
        })
    }
}
