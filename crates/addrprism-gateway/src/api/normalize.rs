//! `/expand` and `/parser`.
//!
//! Each handler starts a `RequestTimer` first thing, then reads the body, calls
//! the engine and builds the response. The status is taken from the finished
//! response, so the metric label matches what the client receives.

use axum::{
    body::Body,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use addrprism_core::error::Result;
use addrprism_core::protocol::response::ParsedComponent;

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::obs::RequestTimer;
use crate::transport::body::read_query;

pub const EXPAND_PATH: &str = "/expand";
pub const PARSE_PATH: &str = "/parser";

pub async fn expand(State(app): State<AppState>, method: Method, body: Body) -> Response {
    let timer = RequestTimer::start(app.metrics(), EXPAND_PATH, method.as_str());
    let response = respond(run_expand(&app, body).await);
    timer.finish(response.status().as_u16());
    response
}

pub async fn parse(State(app): State<AppState>, method: Method, body: Body) -> Response {
    let timer = RequestTimer::start(app.metrics(), PARSE_PATH, method.as_str());
    let response = respond(run_parse(&app, body).await);
    timer.finish(response.status().as_u16());
    response
}

async fn run_expand(app: &AppState, body: Body) -> Result<Vec<String>> {
    let req = read_query(body, app.decode_mode(), app.max_body_bytes()).await?;
    app.address().expand(req.query).await
}

async fn run_parse(app: &AppState, body: Body) -> Result<Vec<ParsedComponent>> {
    let req = read_query(body, app.decode_mode(), app.max_body_bytes()).await?;
    app.address().parse(req.query).await
}

fn respond<T: serde::Serialize>(res: Result<T>) -> Response {
    match res {
        Ok(v) => (StatusCode::OK, Json(v)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
