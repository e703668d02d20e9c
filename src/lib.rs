pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod grid;
pub mod location;
pub mod path;
pub mod placement;
pub mod race;
pub mod report;
pub mod search;
pub mod topology;
pub mod trace;

pub mod visual;
pub use visual::*;

pub use config::*;
pub use error::*;
pub use generator::{build_world, GeneratedWorld, GenerationReport, RejectReason};
pub use grid::*;
pub use location::*;
pub use path::AgentPath;
pub use placement::*;
pub use race::*;
pub use report::*;
pub use search::{assign_algorithms, run_search, search, AlgorithmKind, SearchMetrics, SearchParams};
pub use topology::*;
pub use trace::*;
