//! Nutriscan MCP Server Implementation
//!
//! Exposes nutrition lookup, detection enrichment, feedback and status as
//! MCP tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{Detection, FeedbackCreate};
use crate::resolve::BulkResolver;
use crate::tools::feedback;
use crate::tools::lookup;
use crate::tools::status::StatusTracker;

/// Nutriscan MCP Service
#[derive(Clone)]
pub struct NutriscanService {
    status_tracker: Arc<StatusTracker>,
    resolver: BulkResolver,
    database: Database,
    tool_router: ToolRouter<NutriscanService>,
}

impl NutriscanService {
    pub fn new(status_tracker: StatusTracker, resolver: BulkResolver, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(status_tracker),
            resolver,
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupNutritionParams {
    /// Raw food labels as produced by the detector (e.g. ["Apple", "hot_dog"])
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EnrichDetectionsParams {
    /// Detector output; each item needs a `label`, all other fields are kept
    pub detections: Vec<Detection>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordFeedbackParams {
    /// Label the detector produced
    pub original: String,
    /// Label the user says is correct
    pub correction: String,
    /// Detector confidence (0-100)
    pub confidence: Option<f64>,
    /// Identifier of the analysed image
    pub image_id: Option<String>,
    /// SHA-256 of the analysed image
    pub sha256: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFeedbackParams {
    /// Maximum entries to return, newest first (default 50)
    #[serde(default = "default_feedback_limit")]
    pub limit: i64,
}

fn default_feedback_limit() -> i64 { 50 }

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriscanService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutriscan service including build info, detector model, resolution cache statistics, and process information. Use as a health check.")]
    async fn nutriscan_status(&self) -> Result<CallToolResult, McpError> {
        let cache = self.resolver.cache().stats().await;
        to_json(&self.status_tracker.get_status(cache))
    }

    // --- Nutrition ---

    #[tool(description = "Look up per-100g nutrition facts (energy kJ/kcal, fat, carbs, sugars, protein) for food labels. Labels are normalized and deduplicated; the result maps each normalized label to a record or null when no data exists.")]
    async fn lookup_nutrition(&self, Parameters(p): Parameters<LookupNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = lookup::lookup_nutrition(&self.resolver, &p.labels).await;
        to_json(&result)
    }

    #[tool(description = "Attach per-100g nutrition facts to detector output. Each detection is returned unchanged with an added nutrition_per_100g field (null when no data exists).")]
    async fn enrich_detections(&self, Parameters(p): Parameters<EnrichDetectionsParams>) -> Result<CallToolResult, McpError> {
        let result = lookup::enrich_detections(&self.resolver, p.detections).await;
        to_json(&result)
    }

    // --- Feedback ---

    #[tool(description = "Record user feedback correcting a detected label. Entries are append-only.")]
    fn record_feedback(&self, Parameters(p): Parameters<RecordFeedbackParams>) -> Result<CallToolResult, McpError> {
        let data = FeedbackCreate {
            original: p.original, correction: p.correction, confidence: p.confidence,
            image_id: p.image_id, sha256: p.sha256,
        };
        let result = feedback::record_feedback(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the most recent label-correction feedback entries")]
    fn list_feedback(&self, Parameters(p): Parameters<ListFeedbackParams>) -> Result<CallToolResult, McpError> {
        let result = feedback::list_feedback(&self.database, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriscanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriscan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutriscan".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutriscan - per-100g nutrition facts for detected food labels, sourced from Open Food Facts. \
                 Nutrition: lookup_nutrition (labels -> records), enrich_detections (detector output -> \
                 detections with nutrition_per_100g). A null record means no usable data exists; it is not an error. \
                 Feedback: record_feedback, list_feedback. Health: nutriscan_status."
                    .into(),
            ),
        }
    }
}
