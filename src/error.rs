use thiserror::Error;

use crate::{Cost, RouterId};

/// Errors raised by topology construction and the simulation driver.
///
/// Reaching the round cap without convergence is NOT an error; it is the
/// `Exhausted` terminal status reported by `Network::simulate`.
#[derive(Debug, Error)]
pub enum DvError {
    #[error("router {0} does not exist in the network")]
    UnknownRouter(RouterId),

    #[error("router {0} already exists in the network")]
    DuplicateRouter(RouterId),

    #[error("router {router} has no neighbor {neighbor}")]
    UnknownNeighbor { router: RouterId, neighbor: RouterId },

    #[error("link {a}-{b} has invalid cost {cost}: costs must be finite and non-negative")]
    InvalidLinkCost { a: RouterId, b: RouterId, cost: Cost },

    #[error("cannot link router {0} to itself")]
    SelfLink(RouterId),
}

pub type DvResult<T> = Result<T, DvError>;
