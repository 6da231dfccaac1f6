//! Request routing: screening, retrieval and selection in one call.

use std::sync::Arc;
use toolwise_config::SelectionConfig;
use toolwise_core::error::DecisionError;
use toolwise_core::search::{SimilaritySearch, ToolCandidate};
use toolwise_core::tool::ToolCatalog;

use crate::guard::guard;
use crate::screening::IntentScreener;
use crate::selection::{SelectionDecision, ToolSelector};

/// Where a request should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Answer conversationally.
    DirectReply,
    /// Invoke this tool.
    Tool(String),
    /// A tool was needed but the user declined to pick one.
    NoSelection,
}

/// Turns ranked candidates into a route: relevance check, distance-based
/// selection and the catalog fallback behind "more ...".
pub struct CandidateRouter {
    selector: ToolSelector,
    catalog: Arc<ToolCatalog>,
    tool_dependence: f32,
}

impl CandidateRouter {
    pub fn new(selector: ToolSelector, catalog: Arc<ToolCatalog>, tool_dependence: f32) -> Self {
        Self {
            selector,
            catalog,
            tool_dependence,
        }
    }

    /// Route a request whose candidates are ordered closest first.
    pub fn route(&self, candidates: &[ToolCandidate]) -> Result<Route, DecisionError> {
        let Some(closest) = candidates.first().map(|c| c.distance) else {
            tracing::info!("No tool candidates retrieved, replying directly");
            return Ok(Route::DirectReply);
        };
        if closest > self.tool_dependence {
            tracing::info!(closest, tool_dependence = self.tool_dependence, "No candidate is close enough");
            return Ok(Route::DirectReply);
        }

        let route = match self.selector.select_by_distance(candidates, closest)? {
            SelectionDecision::Cancelled => Route::NoSelection,
            decision => match decision.index().and_then(|i| candidates.get(i)) {
                Some(candidate) => Route::Tool(candidate.name.clone()),
                None => self.catalog_fallback()?,
            },
        };
        tracing::info!(?route, "Request routed");
        Ok(route)
    }

    fn catalog_fallback(&self) -> Result<Route, DecisionError> {
        if self.catalog.is_empty() {
            tracing::warn!("Catalog is empty, nothing to offer beyond the candidates");
            return Ok(Route::NoSelection);
        }
        Ok(match self.selector.select_from_catalog(&self.catalog.names())? {
            Some(name) => Route::Tool(name),
            None => Route::NoSelection,
        })
    }
}

pub struct DecisionPipeline {
    screener: IntentScreener,
    search: Arc<dyn SimilaritySearch>,
    router: CandidateRouter,
    top_n: usize,
}

impl DecisionPipeline {
    pub fn new(
        screener: IntentScreener,
        search: Arc<dyn SimilaritySearch>,
        selector: ToolSelector,
        catalog: Arc<ToolCatalog>,
        config: &SelectionConfig,
    ) -> Self {
        Self {
            screener,
            search,
            router: CandidateRouter::new(selector, catalog, config.tool_dependence),
            top_n: config.top_n,
        }
    }

    pub async fn route(&self, request: &str) -> Result<Route, DecisionError> {
        if !self.screener.requires_tool(request).await? {
            return Ok(Route::DirectReply);
        }

        let candidates = guard("selection.search", self.search.search(request, self.top_n)).await?;
        self.router.route(&candidates)
    }

    /// Route already-retrieved candidates, skipping screening and search.
    pub fn route_candidates(&self, candidates: &[ToolCandidate]) -> Result<Route, DecisionError> {
        self.router.route(candidates)
    }
}
