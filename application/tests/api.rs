//! REST API tests driving the [`Router`] directly.

use std::time::Duration;

use application::router;
use axum::{body::Body, Router};
use mockito::Matcher;
use serde_json::{json, Value};
use service::infra::{geocoder::nominatim, Nominatim, Sqlite};
use tower::ServiceExt as _;

async fn app(geocoder_url: Option<String>) -> Router {
    let db = Sqlite::new(Sqlite::IN_MEMORY).await.unwrap();
    db.migrate().await.unwrap();

    let geocoder = Nominatim::new(nominatim::Config {
        base_url: geocoder_url.unwrap_or_else(|| "http://127.0.0.1:9".into()),
        ..nominatim::Config::default()
    })
    .unwrap();

    router(service::Service::new(
        service::Config {
            geocoding_retry_delay: Duration::ZERO,
        },
        db,
        geocoder,
    ))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (http::StatusCode, Value) {
    let req = http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => req
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn rental_body() -> Value {
    json!({
        "address": "台北市信義區信義路五段7號",
        "lat": 25.0330,
        "lng": 121.5654,
        "rent_price": 25000,
        "room_type": "套房",
        "facilities": "冷氣, ,網路",
        "landlord_rating": 4,
        "location_rating": 5,
        "value_rating": 3,
    })
}

#[tokio::test]
async fn responds_404_for_unknown_rental() {
    let app = app(None).await;

    let (status, body) = call(&app, "GET", "/api/rentals/9999", None).await;

    assert_eq!(status, http::StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "RENTAL_NOT_FOUND");
}

#[tokio::test]
async fn names_missing_fields() {
    let app = app(None).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/rentals",
        Some(json!({ "address": "台北市信義區", "lng": 121.5 })),
    )
    .await;

    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required fields: lat");
}

#[tokio::test]
async fn rejects_malformed_requests() {
    let app = app(None).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/rentals",
        Some(json!({ "address": "x", "lat": "north", "lng": 1.0 })),
    )
    .await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = call(&app, "GET", "/api/rentals/abc", None).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "GET", "/api/rentals?page=-1", None).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trims_padded_text_fields() {
    let app = app(None).await;

    let mut rental = rental_body();
    rental["address"] = json!("台北市信義區信義路五段7號 ");
    rental["room_type"] = json!(" 套房");
    let (status, body) = call(&app, "POST", "/api/rentals", Some(rental)).await;
    assert_eq!(status, http::StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/rentals/{id}/ratings"),
        Some(json!({
            "user_name": "Amy ",
            "landlord_rating": 4,
            "location_rating": 4,
            "value_rating": 4,
            "comment": "  ",
        })),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);
    let rating_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) =
        call(&app, "GET", &format!("/api/rentals/{id}"), None).await;
    assert_eq!(body["data"]["address"], "台北市信義區信義路五段7號");
    assert_eq!(body["data"]["room_type"], "套房");

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/rentals/{id}/ratings/{rating_id}"),
        None,
    )
    .await;
    assert_eq!(body["data"]["user_name"], "Amy");
    assert_eq!(body["data"]["comment"], Value::Null);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/rentals/{id}"),
        Some(json!({ "address": " 台北市中山區南京東路二段100號 " })),
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["data"]["address"], "台北市中山區南京東路二段100號");
}

#[tokio::test]
async fn creates_and_aggregates_ratings() {
    let app = app(None).await;

    let (status, body) =
        call(&app, "POST", "/api/rentals", Some(rental_body())).await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["overall_rating"], 4.0);
    let id = body["data"]["id"].as_i64().unwrap();

    let ratings = format!("/api/rentals/{id}/ratings");
    let (status, _) = call(
        &app,
        "POST",
        &ratings,
        Some(json!({
            "landlord_rating": 4,
            "location_rating": 5,
            "value_rating": 3,
        })),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);
    let (status, body) = call(
        &app,
        "POST",
        "/api/ratings",
        Some(json!({
            "rental_id": id,
            "user_name": "阿明",
            "landlord_rating": 5,
            "location_rating": 4,
            "value_rating": 4,
            "comment": "還不錯",
        })),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);
    let overall = body["data"]["overall_rating"].as_f64().unwrap();
    assert!((overall - 4.166_666_666).abs() < 1e-6);

    let (status, body) =
        call(&app, "GET", &format!("/api/rentals/{id}"), None).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["data"]["landlord_rating"], 5);
    assert_eq!(body["data"]["location_rating"], 5);
    assert_eq!(body["data"]["value_rating"], 4);
    assert_eq!(body["data"]["facilities"], "冷氣,網路");

    let (status, body) = call(&app, "GET", &ratings, None).await;
    assert_eq!(status, http::StatusCode::OK);
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["user_name"], "阿明");
}

#[tokio::test]
async fn updates_and_deletes_ratings() {
    let app = app(None).await;
    let (_, body) =
        call(&app, "POST", "/api/rentals", Some(rental_body())).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = call(
        &app,
        "POST",
        &format!("/api/rentals/{id}/ratings"),
        Some(json!({
            "landlord_rating": 1,
            "location_rating": 1,
            "value_rating": 1,
        })),
    )
    .await;
    let rating = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/rentals/{id}/ratings/{rating}");

    let (status, body) = call(
        &app,
        "PUT",
        &uri,
        Some(json!({ "value_rating": 4, "comment": "改善很多" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["data"]["overall_rating"], 2.0);
    assert_eq!(body["data"]["comment"], "改善很多");

    let (status, body) =
        call(&app, "GET", &format!("/api/rentals/{id}"), None).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["data"]["value_rating"], 4);
    assert_eq!(body["data"]["overall_rating"], 2.0);

    let (status, _) = call(&app, "DELETE", &uri, None).await;
    assert_eq!(status, http::StatusCode::OK);
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "RATING_NOT_FOUND");

    let (status, body) = call(
        &app,
        "PUT",
        &uri,
        Some(json!({ "value_rating": 9 })),
    )
    .await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid fields: value_rating");
}

#[tokio::test]
async fn patches_and_deletes_rental_with_ratings() {
    let app = app(None).await;
    let (_, body) =
        call(&app, "POST", "/api/rentals", Some(rental_body())).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/rentals/{id}");
    _ = call(
        &app,
        "POST",
        &format!("{uri}/ratings"),
        Some(json!({
            "landlord_rating": 3,
            "location_rating": 3,
            "value_rating": 3,
        })),
    )
    .await;

    let (status, body) = call(
        &app,
        "PUT",
        &uri,
        Some(json!({ "rent_price": null, "description": "近捷運" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["data"]["rent_price"], Value::Null);
    assert_eq!(body["data"]["description"], "近捷運");
    assert_eq!(body["data"]["address"], "台北市信義區信義路五段7號");

    let (status, _) = call(&app, "DELETE", &uri, None).await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, _) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    let (status, body) =
        call(&app, "GET", &format!("{uri}/ratings"), None).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = call(&app, "DELETE", &uri, None).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lists_rentals_sorted_and_paginated() {
    let app = app(None).await;
    for price in [30000, 10000, 20000] {
        let mut body = rental_body();
        body["rent_price"] = json!(price);
        _ = call(&app, "POST", "/api/rentals", Some(body)).await;
    }

    let (status, body) = call(
        &app,
        "GET",
        "/api/rentals?sort=rent_price&order=asc&limit=2",
        None,
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    let prices: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rent_price"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, [10000, 20000]);

    let (_, body) = call(
        &app,
        "GET",
        "/api/rentals?sort=rent_price&order=asc&limit=2&page=2",
        None,
    )
    .await;
    assert_eq!(body["data"][0]["rent_price"], 30000);
}

#[tokio::test]
async fn geocodes_with_simplified_address() {
    let mut server = mockito::Server::new_async().await;
    let full = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "台北市信義區信義路五段7號".into(),
        ))
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;
    let simplified = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "台北市信義區信義路五段".into(),
        ))
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "display_name": "信義路五段, 信義區, 臺北市",
                "lat": "25.0330",
                "lon": "121.5654",
            }])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let app = app(Some(server.url())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/geocoding",
        Some(json!({ "address": "台北市信義區信義路五段7號" })),
    )
    .await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["data"]["status"], "OK");
    let result = &body["data"]["results"][0];
    assert_eq!(result["geometry"]["location"]["lat"], 25.0330);
    assert_eq!(result["original_address"], "台北市信義區信義路五段7號");
    assert_eq!(result["matched_address"], "台北市信義區信義路五段");
    full.assert_async().await;
    simplified.assert_async().await;
}

#[tokio::test]
async fn reports_unresolvable_address() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(4)
        .create_async()
        .await;
    let app = app(Some(server.url())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/geocode",
        Some(json!({ "address": "台北市信義區信義路五段7號" })),
    )
    .await;

    assert_eq!(status, http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "ZERO_RESULTS");
    mock.assert_async().await;
}

#[tokio::test]
async fn hides_geocoder_failures() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;
    let app = app(Some(server.url())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/geocoding",
        Some(json!({ "address": "anywhere" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Geocoding service is temporarily unavailable",
    );

    let (status, body) =
        call(&app, "POST", "/api/geocoding", Some(json!({}))).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: address");
}
