// tests/common/mod.rs
//
// Shared helpers for tests that need a live Postgres at DATABASE_URL.

#![allow(dead_code)]

use olympics_backend::{config::Config, routes, state::AppState};
use serde_json::{Value, json};
use sqlx::{PgPool, postgres::PgPoolOptions};

pub struct TestApp {
    pub address: String,
    pub pool: PgPool,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port against the migrated test database.
pub async fn spawn_app() -> TestApp {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url,
        jwt_secret: "integration_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        admin_username: None,
        admin_password: None,
    };

    let app = routes::create_router(AppState {
        pool: pool.clone(),
        config,
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        client: reqwest::Client::new(),
    }
}

pub fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a user, sets its role directly, then logs in.
    /// Returns `(user_id, token)`.
    pub async fn user_with_role(&self, role: &str) -> (i64, String) {
        let username = unique("u");
        let credentials = json!({"username": username, "password": "password123"});

        let registered: Value = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&credentials)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = registered["id"].as_i64().unwrap();

        sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role)
            .bind(id)
            .execute(&self.pool)
            .await
            .unwrap();

        let login: Value = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&credentials)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        (id, login["token"].as_str().unwrap().to_string())
    }

    pub async fn subject(&self, admin_token: &str) -> i64 {
        let subject: Value = self
            .client
            .post(self.url("/api/admin/subjects"))
            .bearer_auth(admin_token)
            .json(&json!({"name": unique("subject")}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        subject["id"].as_i64().unwrap()
    }

    pub async fn question(&self, admin_token: &str, subject: i64, answer: &str) -> i64 {
        let created: Value = self
            .client
            .post(self.url("/api/admin/questions"))
            .bearer_auth(admin_token)
            .json(&json!({
                "subject": subject,
                "question": "Pick the right option",
                "options": ["A", "B", "C"],
                "answer": answer
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        created["id"].as_i64().unwrap()
    }
}
