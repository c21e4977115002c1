use crate::error::{ServerError, ServerResult};
use crate::fetch::fetch_page_text;
use crate::state::ServerState;
use assessrec::{prepare_query, NormalizedQuery, Recommendation};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /api/v1/recommend`
#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    /// Job description or recruiter note; wins over `url` when non-blank
    #[serde(default)]
    pub text: Option<String>,
    /// Page whose text is used as the query
    #[serde(default)]
    pub url: Option<String>,
    /// Result size, clamped to `[1, max_k]`
    #[serde(default)]
    pub k: Option<i64>,
    #[serde(default)]
    pub diversify: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub count: usize,
    pub items: Vec<Recommendation>,
}

/// Recommend assessments for a text or a page URL
pub async fn recommend(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RecommendRequest>,
) -> ServerResult<Json<RecommendResponse>> {
    let query = resolve_query(&state, &request).await?;

    let engine_config = state.recommender.config();
    let k = request
        .k
        .map(|k| engine_config.clamp_k(k))
        .unwrap_or(engine_config.default_k);
    let diversify = request.diversify.unwrap_or(engine_config.diversify);

    let items = state
        .recommender
        .recommend(query.as_str(), k, diversify)
        .await?;

    Ok(Json(RecommendResponse {
        count: items.len(),
        items,
    }))
}

async fn resolve_query(
    state: &ServerState,
    request: &RecommendRequest,
) -> ServerResult<NormalizedQuery> {
    if let Ok(query) = prepare_query(request.text.as_deref()) {
        return Ok(query);
    }

    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Provide either 'text' or 'url'.".into()))?;

    let query = fetch_page_text(&state.http, url).await;
    if query.char_len() < state.config.min_url_text_chars {
        tracing::info!(url, chars = query.char_len(), "url_text_insufficient");
        return Err(ServerError::BadRequest(
            "Could not extract sufficient text from URL.".into(),
        ));
    }
    Ok(query)
}
