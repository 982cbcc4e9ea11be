// Integration tests for the SF rent prediction service

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use sf_rent_api::core::{LinearModel, Predictor};
use sf_rent_api::routes::{self, handle_json_payload_error, AppState};
use sf_rent_api::services::ModelStore;
use std::sync::Arc;

const MODEL_JSON: &str = include_str!("../model/model.json");

fn loaded_state() -> AppState {
    let store = ModelStore::new("1.0.0");
    let model = LinearModel::from_json_str(MODEL_JSON, true).expect("bundled model should load");
    store.install(Predictor::new(model)).unwrap();
    AppState { store: Arc::new(store) }
}

fn empty_state() -> AppState {
    AppState {
        store: Arc::new(ModelStore::new("1.0.0")),
    }
}

fn scenario_body() -> Value {
    json!({
        "sqft": 800,
        "beds": 2,
        "bath": 1,
        "laundry": "(a) in-unit",
        "pets": "(d) no pets",
        "housing_type": "(a) single",
        "parking": "(b) protected",
        "hood_district": 4.0
    })
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_home_identity() {
    let app = app!(loaded_state());
    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "San Francisco Rental Price Prediction");
    assert_eq!(body["version"], "1.0.0");
}

#[actix_web::test]
async fn test_health_reports_model_state() {
    let app = app!(empty_state());
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["model_loaded"], false);

    let app = app!(loaded_state());
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["model_loaded"], true);
}

#[actix_web::test]
async fn test_health_flips_after_install() {
    let store = Arc::new(ModelStore::new("1.0.0"));
    let state = AppState { store: Arc::clone(&store) };
    let app = app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["model_loaded"], false);

    let model = LinearModel::from_json_str(MODEL_JSON, true).unwrap();
    store.install(Predictor::new(model)).unwrap();

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["model_loaded"], true);
}

#[actix_web::test]
async fn test_predict_scenario() {
    let app = app!(loaded_state());
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(scenario_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Prediction successful");

    let rent = body["predicted_rent"].as_f64().unwrap();
    assert!(rent.is_finite() && rent > 0.0);
    assert_eq!(rent, (rent * 100.0).round() / 100.0, "rent should be rounded to cents");
}

#[actix_web::test]
async fn test_predict_matches_library() {
    let app = app!(loaded_state());
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(scenario_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let query = serde_json::from_value(scenario_body()).unwrap();
    let predictor = Predictor::new(LinearModel::from_json_str(MODEL_JSON, true).unwrap());
    let expected = predictor.predict(&query).unwrap();

    assert_eq!(body["predicted_rent"].as_f64().unwrap(), expected.rent);
}

#[actix_web::test]
async fn test_predict_out_of_range_district_rejected() {
    let app = app!(loaded_state());
    let mut body = scenario_body();
    body["hood_district"] = json!(11.0);

    let req = test::TestRequest::post().uri("/predict").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 422);
    assert!(body["message"].as_str().unwrap().contains("hood_district"));
}

#[actix_web::test]
async fn test_predict_unknown_label_rejected() {
    let app = app!(loaded_state());
    let mut body = scenario_body();
    body["laundry"] = json!("invalid");

    let req = test::TestRequest::post().uri("/predict").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_predict_fractional_district_is_invalid_category() {
    // 4.5 is inside the declared range but has no zone
    let app = app!(loaded_state());
    let mut body = scenario_body();
    body["hood_district"] = json!(4.5);

    let req = test::TestRequest::post().uri("/predict").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("hood_district"));
}

#[actix_web::test]
async fn test_predict_unpriceable_listing_rejected() {
    // sqft has no upper bound in the schema, but exp() of the estimate overflows
    let app = app!(loaded_state());
    let mut body = scenario_body();
    body["sqft"] = json!(20_000_000);

    let req = test::TestRequest::post().uri("/predict").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 422);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid input:"));
}

#[actix_web::test]
async fn test_predict_malformed_json() {
    let app = app!(loaded_state());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"sqft\": \"big\"")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_predict_missing_field() {
    let app = app!(loaded_state());
    let mut body = scenario_body();
    body.as_object_mut().unwrap().remove("parking");

    let req = test::TestRequest::post().uri("/predict").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_predict_without_model() {
    let app = app!(empty_state());
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(scenario_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
