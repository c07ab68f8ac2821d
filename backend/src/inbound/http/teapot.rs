//! Every API needs a 418 somewhere.

use actix_web::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use super::context::RequestContext;
use super::dispatcher::HandlerResult;
use super::request::ApiRequest;
use super::respond::respond;
use super::schemas::LyricsEnvelope;

/// The song.
pub const LYRICS: &str = "I'm a little teapot, Short and stout,
Here is my handle. Here is my spout.
When I get all steamed up, Hear me shout,
Tip me over and pour me out!";

/// Teapot payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Lyrics {
    /// Verse text.
    pub lyrics: String,
}

/// Sing.
///
/// # Errors
/// Never fails.
#[utoipa::path(
    get,
    path = "/v1/teapot",
    responses((status = 418, description = "Short and stout", body = LyricsEnvelope)),
    tags = ["teapot"],
    operation_id = "teapot"
)]
pub async fn teapot(ctx: RequestContext, _req: ApiRequest) -> HandlerResult {
    let verse = Lyrics {
        lyrics: LYRICS.to_owned(),
    };
    Ok(respond(&ctx, [verse], StatusCode::IM_A_TEAPOT))
}
