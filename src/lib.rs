pub mod algorithms;
pub mod config;
pub mod display;
pub mod error;
pub mod network;
pub mod router;

pub type RouterId = String;
pub type Cost = f64;

pub use error::{DvError, DvResult};
pub use network::{ConvergenceStatus, Network, SimulationOutcome};
pub use router::{Router, RoutingEntry, RoutingTable};
