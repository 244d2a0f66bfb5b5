//! Client wrapper tests against a canned service
//!
//! A throwaway axum server stands in for anpr-svc; the tests assert the
//! wrapper hits the right endpoints and decodes both response shapes.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use anpr_client::{PlateReaderClient, RecognitionOutcome};

async fn spawn_service() -> String {
    let app = Router::new()
        .route(
            "/readPlateNumberFromImage",
            post(|| async { Json(json!({ "plate_number": "c180mv78" })) }),
        )
        .route(
            "/readPlateNumberFromID",
            get(|Query(params): Query<Vec<(String, String)>>| async move {
                match params.iter().find(|(k, _)| k == "id") {
                    Some((_, id)) if id == "10022" => {
                        Json(json!({ "plate_number": "o156gh199" })).into_response()
                    }
                    Some(_) => (
                        StatusCode::NOT_FOUND,
                        Json(json!({ "error": "image not found" })),
                    )
                        .into_response(),
                    None => (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": "field \"id\" not found" })),
                    )
                        .into_response(),
                }
            }),
        )
        .route(
            "/readPlateNumberFromIDs",
            get(|| async {
                Json(json!({
                    "plate_number_0": "o156gh199",
                    "plate_number_1": "c180mv78",
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn from_image_decodes_single_plate() {
    let host = spawn_service().await;
    let client = PlateReaderClient::new(host).unwrap();

    let outcome = client
        .read_plate_number_from_image(b"\xff\xd8jpeg".to_vec())
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RecognitionOutcome::Plates(vec![("plate_number".to_string(), "c180mv78".to_string())])
    );
}

#[tokio::test]
async fn from_id_decodes_single_plate() {
    let host = spawn_service().await;
    let client = PlateReaderClient::new(host).unwrap();

    let outcome = client.read_plate_number_from_id("10022").await.unwrap();
    assert_eq!(
        outcome,
        RecognitionOutcome::Plates(vec![("plate_number".to_string(), "o156gh199".to_string())])
    );
}

#[tokio::test]
async fn from_id_surfaces_service_error() {
    let host = spawn_service().await;
    let client = PlateReaderClient::new(host).unwrap();

    let outcome = client.read_plate_number_from_id("18").await.unwrap();
    assert_eq!(
        outcome,
        RecognitionOutcome::Failed {
            message: "image not found".to_string(),
            status: 404,
        }
    );
}

#[tokio::test]
async fn from_ids_decodes_numbered_plates() {
    let host = spawn_service().await;
    let client = PlateReaderClient::new(host).unwrap();

    let outcome = client
        .read_plate_number_from_ids(&["9965", "10022"])
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RecognitionOutcome::Plates(vec![
            ("plate_number_0".to_string(), "o156gh199".to_string()),
            ("plate_number_1".to_string(), "c180mv78".to_string()),
        ])
    );
}

#[tokio::test]
async fn unreachable_service_is_a_client_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PlateReaderClient::new(format!("http://{}", addr)).unwrap();
    let err = client.read_plate_number_from_id("10022").await.unwrap_err();
    assert!(matches!(err, anpr_client::ClientError::Network(_)));
}
