//! POST /chat/completions

use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::chat::{ChatRequest, ChatResponse};
use crate::handlers::ApiError;
use crate::middleware::AuthContext;
use crate::routes::validated;

/// Send a conversation to the completion backend.
///
/// The session gate has already authenticated the caller; both chat rate
/// limit tiers are enforced by the service.
pub async fn completions(
    ctx: AuthContext,
    state: web::Data<AppState>,
    request: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = validated(request)?;

    let reply = state.chat.send_message(ctx.id, &request.messages).await?;

    Ok(HttpResponse::Ok().json(ChatResponse { reply }))
}
