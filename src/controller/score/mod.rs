pub mod http_handlers;

use actix_web::web;

pub use http_handlers::*;

/// Routes of the scoring API; shared by the binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/standings", web::get().to(standings))
        .route("/teams", web::get().to(teams))
        .route("/rounds/{round_id}", web::get().to(round))
        .route("/rounds/{round_id}/lock", web::post().to(lock_round))
        .route("/matches/{match_id}", web::get().to(match_report))
        .route("/matches/{match_id}/holes/{hole}", web::put().to(edit_hole));
}
