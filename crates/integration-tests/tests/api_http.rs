//! HTTP-level tests through the full router.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use integration_tests::{TestApp, ADMIN_TOKEN};
use serde_json::{json, Value};
use services::VotePolicy;
use tower::ServiceExt;

const BOUNDARY: &str = "X-BOUNDARY";

fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields)))
        .unwrap()
}

fn multipart_with_image(uri: &str, fields: &[(&str, &str)], image: &[u8]) -> Request<Body> {
    let mut body = multipart_body(fields).into_bytes();
    body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(image);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn register_payload(aadhar: &str, email: &str) -> Value {
    json!({
        "first_name": "Meena",
        "last_name": "R",
        "age": 28,
        "aadhar_number": aadhar,
        "email": email,
        "phnumber": "7777777777",
        "password": "hunter2hunter2",
    })
}

#[tokio::test]
async fn complaint_registration_round_trips() {
    let app = TestApp::spawn(VotePolicy::default()).await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/complaints/register",
            &[
                ("title", "Pothole on Main St"),
                ("description", "Deep pothole near the junction"),
                ("department", "roads"),
                ("latitude", "13.08"),
                ("longitude", "80.22"),
                ("locationName", "Main St"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["id"].is_string());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/complaints/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["department"], "roads");
    assert_eq!(listed[0]["process"], "unassigned");
}

#[tokio::test]
async fn uploaded_images_are_served_back() {
    let app = TestApp::spawn(VotePolicy::default()).await;
    let image = b"\x89PNG\r\n\x1a\nnot really a png";

    let response = app
        .router
        .clone()
        .oneshot(multipart_with_image(
            "/complaints/register",
            &[
                ("title", "Fallen tree blocking the lane"),
                ("description", "Tree across the cycle lane"),
                ("department", "roads"),
                ("latitude", "13.08"),
                ("longitude", "80.22"),
                ("locationName", "Lake View Rd"),
            ],
            image,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let image_url = body["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/"));

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&image_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&served[..], image);
}

#[tokio::test]
async fn out_of_range_coordinates_are_a_bad_request() {
    let app = TestApp::spawn(VotePolicy::default()).await;
    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/complaints/register",
            &[
                ("title", "Pothole"),
                ("description", "Deep"),
                ("department", "roads"),
                ("latitude", "91.0"),
                ("longitude", "80.22"),
                ("locationName", "Main St"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("latitude"));
}

#[tokio::test]
async fn users_register_and_login_over_http() {
    let app = TestApp::spawn(VotePolicy::default()).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/register",
            &register_payload("123456789012", "meena@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let registered = json_body(response).await;
    let user_id = registered["user_id"].as_str().unwrap().to_string();

    // duplicate aadhaar conflicts
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/register",
            &register_payload("123456789012", "other@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/login",
            &json!({ "email": "meena@example.com", "password": "hunter2hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let logged_in = json_body(response).await;
    assert_eq!(logged_in["user_id"].as_str().unwrap(), user_id);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/login",
            &json!({ "email": "meena@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_surface_is_token_gated() {
    let app = TestApp::spawn(VotePolicy::default()).await;
    let id = app.file_complaint("roads").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/admin/complaints/{id}/process"),
            &json!({ "process": "assigned" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = json_request(
        Method::PUT,
        &format!("/admin/complaints/{id}/process"),
        &json!({ "process": "assigned" }),
    );
    request
        .headers_mut()
        .insert("x-admin-token", ADMIN_TOKEN.parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["process"], "assigned");
}

#[tokio::test]
async fn admin_deletes_a_complaint() {
    let app = TestApp::spawn(VotePolicy::default()).await;
    let id = app.file_complaint("water").await;

    let mut request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/admin/complaints/{id}"))
        .body(Body::empty())
        .unwrap();
    request
        .headers_mut()
        .insert("x-admin-token", ADMIN_TOKEN.parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let mut request = Request::builder()
        .uri(format!("/admin/get_complaint/{id}"))
        .body(Body::empty())
        .unwrap();
    request
        .headers_mut()
        .insert("x-admin-token", ADMIN_TOKEN.parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn votes_flow_over_http() {
    let app = TestApp::spawn(VotePolicy {
        resolve_threshold: 2,
        ..VotePolicy::default()
    })
    .await;
    let id = app.file_complaint("roads").await;
    app.lifecycle
        .set_process(id, "pending_verification")
        .await
        .unwrap();
    let a = app.register_citizen("asha").await;
    let b = app.register_citizen("bala").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/votes/pending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let pending = json_body(response).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    // missing user_id is unprocessable, not a parse failure
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/votes/{id}"),
            &json!({ "vote_type": "resolved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/votes/{id}"),
            &json!({ "user_id": a.to_string(), "vote_type": "resolved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/votes/{id}"),
            &json!({ "user_id": b.to_string(), "vote_type": "resolved" }),
        ))
        .await
        .unwrap();
    let outcome = json_body(response).await;
    assert_eq!(outcome["status"], "resolved");
    assert_eq!(outcome["process"], "complaint_sent");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/votes/{id}/summary"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let summary = json_body(response).await;
    assert_eq!(summary["tally"]["resolved"], 2);
    assert_eq!(summary["tally"]["total"], 2);
    assert_eq!(summary["round"], 1);
    assert!(summary.get("caller_vote").is_none());

    // naming a voter returns their own vote with the tally
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/votes/{id}/summary?user_id={a}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let summary = json_body(response).await;
    assert_eq!(summary["caller_vote"], "resolved");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/complaints/resolved")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let resolved = json_body(response).await;
    assert_eq!(resolved.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn assist_endpoint_returns_a_suggestion() {
    let app = TestApp::spawn(VotePolicy::default()).await;
    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/AIhelp/assist",
            &[("title", "Pothole"), ("description", "Near the school")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let suggestion = json_body(response).await;
    assert_eq!(suggestion["suggested_department"], "roads");
}
