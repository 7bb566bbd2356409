//! Agents: whatever chooses actions for a seat.
//!
//! The engine never calls agents; the driving loop in [`crate::play`] does.
//! Strategy agents live outside this crate and only need to implement
//! [`Agent`].

pub mod agent;
pub mod random;
pub mod scripted;
pub mod registry;

pub use agent::Agent;
pub use random::RandomAgent;
pub use scripted::ScriptedAgent;
pub use registry::{AgentFactory, AgentRegistry};
