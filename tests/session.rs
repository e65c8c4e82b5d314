mod common;

use common::TestApp;
use rocket::http::{ContentType, Status};
use rocket::serde::json::{json, Value};

#[test]
fn signup_creates_user_and_session() {
    let app = TestApp::spawn();
    let body = app.signup("ann", "pw123");

    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "ann");
    assert!(body["created_at"].as_str().unwrap().ends_with('Z'));
    assert_eq!(body.as_object().unwrap().len(), 3);

    let (status, access) = app.get_json("/api");
    assert_eq!(status, Status::Ok);
    assert_eq!(access, json!({ "user_id": 1, "msg": "Access granted." }));

    let (_, users) = app.get_json("/api/users");
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "ann");
    assert_eq!(users[0]["is_admin"], false);
    assert!(users[0].get("password_hash").is_none());
}

#[test]
fn duplicate_username_is_rejected() {
    let app = TestApp::spawn();
    app.signup("ann", "pw123");

    let response = app
        .client
        .post("/api/signup")
        .json(&json!({ "username": "ann", "password": "another" }))
        .dispatch();
    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = response.into_json::<Value>().unwrap();
    assert_eq!(body["errors"]["username"][0], "username already exists");

    let (_, users) = app.get_json("/api/users");
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[test]
fn signup_validates_payload() {
    let app = TestApp::spawn();
    let response = app
        .client
        .post("/api/signup")
        .json(&json!({ "username": "al", "password": "pw" }))
        .dispatch();
    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = response.into_json::<Value>().unwrap();
    assert!(body["errors"]["username"].is_array());
    assert_eq!(body["errors"]["password"][0], "Password too short");

    let (status, _) = app.get_json("/api");
    assert_eq!(status, Status::Unauthorized);
}

#[test]
fn login_with_correct_password_sets_session() {
    let app = TestApp::spawn();
    app.signup("ann", "pw123");
    app.logout();
    assert_eq!(app.get_json("/api").0, Status::Unauthorized);

    let response = app
        .client
        .post("/api/login")
        .json(&json!({ "username": "ann", "password": "pw123" }))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().unwrap();
    assert_eq!(body["username"], "ann");

    let (status, access) = app.get_json("/api");
    assert_eq!(status, Status::Ok);
    assert_eq!(access["user_id"], body["id"]);
}

#[test]
fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn();
    app.signup("ann", "pw123");
    app.logout();

    let response = app
        .client
        .post("/api/login")
        .json(&json!({ "username": "ann", "password": "pw124" }))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_json::<Value>().unwrap();
    assert_eq!(body["error"], "Invalid username or password. Try again.");
    assert_eq!(app.get_json("/api").0, Status::Unauthorized);
}

#[test]
fn login_requires_exact_username() {
    let app = TestApp::spawn();
    app.signup("annabel", "pw123");
    app.logout();

    assert_eq!(app.login("anna", "pw123"), Status::Unauthorized);
    assert_eq!(app.login("nabe", "pw123"), Status::Unauthorized);
    assert_eq!(app.login("ANNABEL", "pw123"), Status::Unauthorized);
    assert_eq!(app.login("nobody", "pw123"), Status::Unauthorized);
    assert_eq!(app.login("annabel", "pw123"), Status::Ok);
}

#[test]
fn logout_ends_the_session() {
    let app = TestApp::spawn();
    app.signup("ann", "pw123");
    assert_eq!(app.get_json("/api/submitted-recipes").0, Status::Ok);

    app.logout();

    let (status, body) = app.get_json("/api/submitted-recipes");
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["error"], "Unauthorized. Please log in.");
    assert_eq!(app.get_json("/api/favorited-recipes").0, Status::Unauthorized);
}

#[test]
fn logout_without_session_is_harmless() {
    let app = TestApp::spawn();
    app.logout();
    assert_eq!(app.get_json("/api").0, Status::Unauthorized);
}

#[test]
fn forged_session_cookie_is_ignored() {
    let app = TestApp::spawn();
    app.signup("ann", "pw123");
    app.logout();

    let response = app
        .client
        .get("/api")
        .cookie(rocket::http::Cookie::new("user_id", "1"))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}

#[test]
fn unknown_path_returns_json_404() {
    let app = TestApp::spawn();
    let (status, body) = app.get_json("/api/nope");
    assert_eq!(status, Status::NotFound);
    assert_eq!(body, json!({ "error": "Page not found." }));
}

#[test]
fn signup_accepts_json_without_json_content_type() {
    let app = TestApp::spawn();
    let response = app
        .client
        .post("/api/signup")
        .header(ContentType::Plain)
        .body(json!({ "username": "ann", "password": "pw123" }).to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Created);
    let body = response.into_json::<Value>().unwrap();
    assert_eq!(body["username"], "ann");
    app.logout();

    let response = app
        .client
        .post("/api/login")
        .header(ContentType::Form)
        .body(json!({ "username": "ann", "password": "pw123" }).to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
}
