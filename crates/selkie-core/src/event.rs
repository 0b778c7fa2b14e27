//! Canvas events and the effects they produce.
//!
//! Rendering libraries surface interaction through event emitters; the engine
//! takes them as one flat enum through a single dispatch point instead, which
//! keeps the whole state machine drivable from tests without a live canvas.

use crate::detail::DetailRequest;
use crate::driver::PointerTarget;
use crate::geom::Point;
use crate::model::NodeId;

/// One user interaction, as reported by the rendering driver's host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    Click { point: Point },
    DoubleClick { point: Point },
    /// Right-click.
    Context { point: Point },
    DragStart { point: Point },
    DragEnd,
    NodeSelected,
    NodeDeselected,
    EdgeSelected,
    EdgeDeselected,
    NodeHovered { target: PointerTarget },
    NodeBlurred { target: PointerTarget },
}

/// User-facing message the host must surface; the engine assumes nothing
/// about how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoRelationships { node: NodeId },
    ClusteringError { message: String },
}

/// Asynchronous work or user-visible output requested by the engine. The
/// host performs these; registry state has already been updated by the time
/// effects are returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch one level of neighbors for a node from the expansion service.
    RequestExpansion { node: NodeId, limit: usize },
    /// Fetch snippet data for the current detail selection.
    RequestDetail(DetailRequest),
    Notice(Notice),
}
