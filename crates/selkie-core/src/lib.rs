#![forbid(unsafe_code)]

//! Graph clustering and selection-state engine for property-graph canvases
//! (headless).
//!
//! Design goals:
//! - deterministic, testable state transitions (one event dispatch point, no
//!   hidden cross-component mutation)
//! - rendering and fetch collaborators stay external behind explicit seams
//! - registry-mutating operations complete fully or abort before mutating
//!
//! The canvas shows nodes and edges pulled from a graph database and lets the
//! user expand them progressively. Neighbors reached through one relationship
//! in one direction can be rolled up into a cluster glyph; the originals are
//! duplicated first so a mixed-relationship node can stay on the canvas while
//! one of its edges lives inside a cluster, and so opening the cluster can
//! restore exactly the pre-cluster state. [`VisualizationCanvas`] owns all of
//! it and is the only entry point.

pub mod canvas;
pub mod cluster;
pub mod config;
pub mod detail;
pub mod driver;
pub mod duplicate;
pub mod error;
pub mod event;
pub mod geom;
pub mod model;
pub mod registry;
pub mod selection;

pub use canvas::VisualizationCanvas;
pub use cluster::{BuildOutcome, ClusterRecord, ClusterRegistry};
pub use config::CanvasConfig;
pub use detail::{DetailPanel, DetailRequest, DetailResolver, Delivery};
pub use driver::{ClusterSeed, PointerTarget, RenderingDriver};
pub use error::{Error, Result, ServiceError};
pub use event::{CanvasEvent, Effect, Notice};
pub use model::{Direction, EdgeId, GraphEdgeId, GraphNodeId, NodeId};
pub use registry::EntityRegistry;
pub use selection::SelectionTracker;

#[cfg(test)]
mod tests;
