use axum::{
    extract::State,
    http::{HeaderName, header},
    response::{IntoResponse, Sse},
};
use std::time::Duration;
use util::config;
use util::events::EventStream;
use util::state::AppState;

/// GET /api/admin/events
///
/// Long-lived Server-Sent Events stream for admin UI refresh. The first frame
/// is a `CONNECTION_ESTABLISHED` acknowledgment; afterwards every bus
/// notification arrives as a `data: <json>` frame, with `: heartbeat` comment
/// frames while idle. Browsers connect via `EventSource`, which cannot set
/// headers, so the admin guard also accepts the token as `?token=`.
///
/// `X-Accel-Buffering: no` stops reverse proxies from buffering the body.
pub async fn event_stream(State(app_state): State<AppState>) -> impl IntoResponse {
    let stream = EventStream::open(
        app_state.events_clone(),
        Duration::from_secs(config::sse_heartbeat_seconds()),
    );

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Sse::new(stream),
    )
}
