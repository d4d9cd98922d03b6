//! Template listing and preview endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::{deserialize_variables, RenderedEmail, TemplateListResponse, Variables};

#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,
}

/// Rendered template plus the placeholders no variable was supplied for
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub rendered: RenderedEmail,
    pub missing_variables: Vec<String>,
}

/// GET /api/email-templates - List all templates, active or not
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<TemplateListResponse>> {
    let templates = state.templates.list().await?;
    let total = templates.len();

    Ok(Json(TemplateListResponse { templates, total }))
}

/// POST /api/email-templates/{name}/preview - Render without sending
#[tracing::instrument(name = "http.preview_template", skip(state, payload))]
pub async fn preview_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: std::result::Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>> {
    let Json(request) = payload?;

    let template = state
        .templates
        .find_active(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Email template '{}' not found", name)))?;

    Ok(Json(PreviewResponse {
        rendered: template.render(&request.variables),
        missing_variables: template.missing_variables(&request.variables),
    }))
}
