mod common;

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use common::{base_seed, seed};
use rowdy_matchplay::controller::score::configure;
use rowdy_matchplay::storage::{MemoryStorage, Storage};
use serde_json::{Value, json};
use std::sync::Arc;

async fn seeded_storage() -> Arc<dyn Storage> {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    seed(storage.as_ref(), &base_seed()).await;
    storage
}

fn singles_body(a: u8, b: u8) -> Value {
    json!({ "kind": "singles", "teamAPlayerGross": a, "teamBPlayerGross": b })
}

#[actix_web::test]
async fn test5_edit_and_read_match() {
    let storage = seeded_storage().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(storage.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/matches/m1/holes/1")
        .set_json(singles_body(3, 4))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["matchId"], "m1");
    assert_eq!(body["state"], "inProgress");
    assert_eq!(body["status"]["thru"], 1);
    assert_eq!(body["status"]["leader"], "teamA");
    assert_eq!(body["holes"][0]["winner"], "teamA");

    let req = test::TestRequest::get().uri("/matches/m1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"]["holesWonA"], 1);
    assert_eq!(body["editableHoles"].as_array().map(Vec::len), Some(18));
}

#[actix_web::test]
async fn test5_error_statuses() {
    let storage = seeded_storage().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(storage.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/matches/m1/holes/19")
        .set_json(singles_body(4, 4))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    for hole in ["300", "0", "seven"] {
        let req = test::TestRequest::put()
            .uri(&format!("/matches/m1/holes/{hole}"))
            .set_json(singles_body(4, 4))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "hole {hole}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().is_some_and(|e| e.contains("hole number")));
    }

    let req = test::TestRequest::put()
        .uri("/matches/m1/holes/1")
        .set_json(json!({ "kind": "scramble", "teamAGross": 4, "teamBGross": 4 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/matches/nope").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/rounds/r1/lock")
        .set_json(json!({ "locked": true }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["locked"], true);

    let req = test::TestRequest::put()
        .uri("/matches/m1/holes/1")
        .set_json(singles_body(4, 4))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some_and(|e| e.contains("locked")));

    storage
        .put_match(&common::singles_match("m9", "deleted-round"))
        .await
        .expect("put orphan");
    let req = test::TestRequest::put()
        .uri("/matches/m9/holes/1")
        .set_json(singles_body(4, 4))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_web::test]
async fn test5_standings_round_and_teams() {
    let storage = seeded_storage().await;
    for hole in 1..=10 {
        storage
            .apply_hole_edit("m1", hole, common::singles(3, 4))
            .await
            .expect("edit");
    }
    let app = test::init_service(
        App::new()
            .app_data(Data::new(storage.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/standings?tournament=t1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["standings"]["finalized"]["a"], 1.0);
    assert_eq!(body["rounds"][0]["matches"][0]["label"], "Aces 10&8 (F)");

    let req = test::TestRequest::get().uri("/rounds/r2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["round"]["format"], "scramble");
    assert_eq!(body["matches"][0]["state"], "notStarted");

    let req = test::TestRequest::get().uri("/teams").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["name"], "Aces");
    assert_eq!(body[1]["side"], "teamB");

    let req = test::TestRequest::get()
        .uri("/standings?tournament=missing")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
