//! Shared harness for the integration tests: every `TestApp` runs the full
//! Rocket application against its own throwaway SQLite file.
#![allow(dead_code)]

use recipe_box::config::AppConfig;
use rocket::http::Status;
use rocket::local::blocking::Client;
use rocket::serde::json::{json, Value};
use rocket::{Build, Rocket};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

const TEST_SECRET_KEY: &str = "8f3c1a9e0b7d4f2a6c5e9d1b3a7f0c4e2d6b8a1f9e3c7d5b0a2f4e6c8d1b3a5f";

pub struct TestApp {
    pub client: Client,
    db_path: PathBuf,
}

impl TestApp {
    pub fn spawn() -> TestApp {
        TestApp::spawn_with(|rocket| rocket)
    }

    /// Like `spawn`, but lets a test mount extra routes before launch.
    pub fn spawn_with<F>(customize: F) -> TestApp
    where
        F: FnOnce(Rocket<Build>) -> Rocket<Build>,
    {
        let db_path = env::temp_dir().join(format!(
            "recipe-box-test-{}-{}.sqlite3",
            process::id(),
            NEXT_DB.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_file(&db_path);

        let config = AppConfig {
            database_url: db_path.to_string_lossy().into_owned(),
            pool_size: 4,
            bcrypt_cost: 4,
            secret_key: Some(TEST_SECRET_KEY.to_string()),
        };
        let rocket = recipe_box::rocket(config).expect("application builds");
        let client = Client::tracked(customize(rocket)).expect("valid rocket instance");
        TestApp { client, db_path }
    }

    pub fn signup(&self, username: &str, password: &str) -> Value {
        let response = self
            .client
            .post("/api/signup")
            .json(&json!({ "username": username, "password": password }))
            .dispatch();
        assert_eq!(response.status(), Status::Created);
        response.into_json::<Value>().expect("signup body")
    }

    pub fn login(&self, username: &str, password: &str) -> Status {
        self.client
            .post("/api/login")
            .json(&json!({ "username": username, "password": password }))
            .dispatch()
            .status()
    }

    pub fn logout(&self) {
        let response = self.client.delete("/api/logout").dispatch();
        assert_eq!(response.status(), Status::NoContent);
    }

    pub fn create_recipe(&self, name: &str, vegetarian: bool) -> Value {
        let response = self
            .client
            .post("/api/recipes")
            .json(&json!({
                "name": name,
                "image": format!("https://img.example/{}.jpg", name.to_lowercase()),
                "ingredients": "flour, water, salt",
                "directions": "mix and bake",
                "vegetarian": vegetarian,
            }))
            .dispatch();
        assert_eq!(response.status(), Status::Created);
        response.into_json::<Value>().expect("recipe body")
    }

    pub fn get_json(&self, uri: &str) -> (Status, Value) {
        let response = self.client.get(uri).dispatch();
        let status = response.status();
        (status, response.into_json::<Value>().unwrap_or(Value::Null))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
    }
}

pub fn names(recipes: &Value) -> Vec<String> {
    recipes
        .as_array()
        .expect("a list of recipes")
        .iter()
        .map(|recipe| recipe["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
