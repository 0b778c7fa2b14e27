//! Detail-panel request arbitration.
//!
//! Node, edge and cluster selections each map to a distinct detail view; edge
//! and cluster views need a snippet fetch. Selections and responses race, so
//! every selection change bumps a generation counter, outbound requests carry
//! the generation they were issued under, and a response is applied only if
//! its token still matches. Cancellation is observed at resolution: a late
//! response for a superseded request is dropped even if it arrives after the
//! newer request's response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ServiceError;
use crate::model::{ClusterId, EdgeId, GraphEdgeId, NodeId};

/// Identifies the selection generation a request was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// An edge as the snippet service understands it: always the original
/// endpoints, even when the canvas shows a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeReference {
    pub edge_id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
}

/// A fetch the host should run against the snippet service. The token must be
/// echoed back through [`DetailResolver::deliver`].
#[derive(Debug, Clone, PartialEq)]
pub enum DetailRequest {
    EdgeSnippets {
        token: RequestToken,
        edge: EdgeReference,
        page: usize,
        limit: usize,
    },
    ClusterSnippets {
        token: RequestToken,
        cluster: ClusterId,
        edges: Vec<EdgeReference>,
        page: usize,
        limit: usize,
    },
}

impl DetailRequest {
    pub fn token(&self) -> RequestToken {
        match self {
            DetailRequest::EdgeSnippets { token, .. } => *token,
            DetailRequest::ClusterSnippets { token, .. } => *token,
        }
    }
}

/// One unit of textual evidence for a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// One page of snippets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetPage {
    pub snippets: Vec<Snippet>,
    pub page: usize,
    pub total: u64,
}

/// What the detail fetch was about; kept on loaded and error states so the
/// panel can label what it is showing, and so page requests can be re-issued
/// without consulting the registries again.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailSubject {
    Edge(EdgeReference),
    Cluster {
        id: ClusterId,
        /// The member edges' original endpoints, the snippet service's query.
        edges: Vec<EdgeReference>,
    },
}

/// What the resolver decided the panel should show for the current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailTarget {
    None,
    /// A single original node; its data is read straight from the registry.
    Node(NodeId),
    /// A single edge; snippets must be fetched.
    Edge(GraphEdgeId),
    /// A cluster glyph; snippets for its member edges must be fetched.
    Cluster(ClusterId),
}

/// Current panel contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailPanel {
    #[default]
    Empty,
    Node {
        node: NodeId,
    },
    Loading {
        subject: DetailSubject,
    },
    Loaded {
        subject: DetailSubject,
        snippets: SnippetPage,
    },
    /// A fetch failed while this selection was still current. Distinct from
    /// `Empty`.
    Failed {
        subject: DetailSubject,
        error: ServiceError,
    },
}

/// Outcome of delivering a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    /// The response was for a superseded request and was discarded.
    Stale,
}

#[derive(Default)]
pub struct DetailResolver {
    generation: u64,
    panel: DetailPanel,
}

impl DetailResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> &DetailPanel {
        &self.panel
    }

    /// Records a selection change. Always supersedes whatever fetch is in
    /// flight; returns the request the new selection needs, if any.
    ///
    /// `subject_for` supplies the fetch subject for edge and cluster targets
    /// (the resolver does not read the registries itself).
    pub fn on_selection(
        &mut self,
        target: DetailTarget,
        subject_for: impl FnOnce(DetailTarget) -> Option<DetailSubject>,
        page: usize,
        limit: usize,
    ) -> Option<DetailRequest> {
        self.generation += 1;
        match target {
            DetailTarget::None => {
                self.panel = DetailPanel::Empty;
                None
            }
            DetailTarget::Node(node) => {
                self.panel = DetailPanel::Node { node };
                None
            }
            DetailTarget::Edge(_) | DetailTarget::Cluster(_) => {
                let Some(subject) = subject_for(target) else {
                    self.panel = DetailPanel::Empty;
                    return None;
                };
                self.panel = DetailPanel::Loading {
                    subject: subject.clone(),
                };
                Some(self.request_for(subject, page, limit))
            }
        }
    }

    /// Re-issues the current subject's fetch for another page. Also bumps the
    /// generation, so an in-flight page is superseded like any other fetch.
    pub fn request_page(&mut self, page: usize, limit: usize) -> Option<DetailRequest> {
        let subject = match &self.panel {
            DetailPanel::Loading { subject }
            | DetailPanel::Loaded { subject, .. }
            | DetailPanel::Failed { subject, .. } => subject.clone(),
            DetailPanel::Empty | DetailPanel::Node { .. } => return None,
        };
        self.generation += 1;
        self.panel = DetailPanel::Loading {
            subject: subject.clone(),
        };
        Some(self.request_for(subject, page, limit))
    }

    /// Applies a response if its token is still current, drops it otherwise.
    pub fn deliver(
        &mut self,
        token: RequestToken,
        result: Result<SnippetPage, ServiceError>,
    ) -> Delivery {
        if token.0 != self.generation {
            debug!(
                token = token.0,
                current = self.generation,
                "dropped stale detail response"
            );
            return Delivery::Stale;
        }
        let subject = match &self.panel {
            DetailPanel::Loading { subject }
            | DetailPanel::Loaded { subject, .. }
            | DetailPanel::Failed { subject, .. } => subject.clone(),
            // The panel moved on without issuing a new fetch; nothing to
            // attach the response to.
            DetailPanel::Empty | DetailPanel::Node { .. } => return Delivery::Stale,
        };
        self.panel = match result {
            Ok(snippets) => DetailPanel::Loaded { subject, snippets },
            Err(error) => DetailPanel::Failed { subject, error },
        };
        Delivery::Applied
    }

    fn request_for(&self, subject: DetailSubject, page: usize, limit: usize) -> DetailRequest {
        let token = RequestToken(self.generation);
        match subject {
            DetailSubject::Edge(edge) => DetailRequest::EdgeSnippets {
                token,
                edge,
                page,
                limit,
            },
            DetailSubject::Cluster { id, edges } => DetailRequest::ClusterSnippets {
                token,
                cluster: id,
                edges,
                page,
                limit,
            },
        }
    }
}
