//! Multi-agent orchestration
//!
//! Tasks are executed by a [`Crew`] in declaration order, each agent building
//! on the answers of the agents before it.

mod sequential;

pub use sequential::Crew;
