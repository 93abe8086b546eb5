use actix_web::web::{self, Data};
use actix_web::{HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{HOLES_PER_ROUND, HoleInput, check_hole_number};
use crate::score::{
    apply_hole_edit, load_match_report, load_round_report, load_standings, load_teams,
    set_round_lock,
};
use crate::storage::Storage;

pub type SharedStorage = Data<Arc<dyn Storage>>;

fn error_response(e: &CoreError) -> HttpResponse {
    let body = json!({ "error": e.to_string() });
    match e {
        CoreError::InvalidInput(_) | CoreError::Parse(_) => HttpResponse::BadRequest().json(body),
        CoreError::Locked { .. } => HttpResponse::Conflict().json(body),
        CoreError::MissingReference(_) => HttpResponse::UnprocessableEntity().json(body),
        CoreError::NotFound(_) => HttpResponse::NotFound().json(body),
        CoreError::Db(_) => {
            tracing::error!(error = %e, "request failed");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: serde::Serialize>(result: Result<T, CoreError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

fn tournament_param(query: &HashMap<String, String>) -> Option<&str> {
    query
        .get("tournament")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn match_report(path: web::Path<String>, storage: SharedStorage) -> impl Responder {
    respond(load_match_report(storage.get_ref().as_ref(), &path).await)
}

/// The hole segment is taken as text so that out-of-range or non-numeric holes
/// get the same JSON 400 as hole 19.
fn parse_hole_segment(raw: &str) -> Result<u8, CoreError> {
    let hole = raw
        .parse::<u8>()
        .map_err(|_| CoreError::InvalidInput(format!("hole number {raw} is outside 1..={HOLES_PER_ROUND}")))?;
    check_hole_number(hole)?;
    Ok(hole)
}

pub async fn edit_hole(
    path: web::Path<(String, String)>,
    body: web::Json<HoleInput>,
    storage: SharedStorage,
) -> impl Responder {
    let (match_id, raw_hole) = path.into_inner();
    let result = match parse_hole_segment(&raw_hole) {
        Ok(hole) => {
            apply_hole_edit(storage.get_ref().as_ref(), &match_id, hole, body.into_inner()).await
        }
        Err(e) => Err(e),
    };
    respond(result)
}

pub async fn round(path: web::Path<String>, storage: SharedStorage) -> impl Responder {
    respond(load_round_report(storage.get_ref().as_ref(), &path).await)
}

#[derive(Deserialize)]
pub struct LockRequest {
    pub locked: bool,
}

pub async fn lock_round(
    path: web::Path<String>,
    body: web::Json<LockRequest>,
    storage: SharedStorage,
) -> impl Responder {
    respond(set_round_lock(storage.get_ref().as_ref(), &path, body.locked).await)
}

pub async fn standings(
    query: web::Query<HashMap<String, String>>,
    storage: SharedStorage,
) -> impl Responder {
    respond(load_standings(storage.get_ref().as_ref(), tournament_param(&query)).await)
}

pub async fn teams(
    query: web::Query<HashMap<String, String>>,
    storage: SharedStorage,
) -> impl Responder {
    respond(load_teams(storage.get_ref().as_ref(), tournament_param(&query)).await)
}
