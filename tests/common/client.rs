//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per endpoint. When routes or request
//! formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Automatically handle session cookies
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client logged in as the regular test user.
    pub async fn authenticated(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(TEST_USER, TEST_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Test user authentication failed: {:?}",
            response.text().await
        );

        client
    }

    /// Creates a client logged in as the agent test user.
    pub async fn authenticated_agent(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(AGENT_USER, AGENT_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Agent authentication failed: {:?}",
            response.text().await
        );

        client
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /api/auth/login
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// POST /api/auth/register
    pub async fn register(&self, username: &str, password: &str, role: Option<&str>) -> Response {
        let mut body = json!({ "username": username, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Register request failed")
    }

    /// POST /api/auth/google
    pub async fn google_login(&self, token: &str) -> Response {
        self.client
            .post(format!("{}/api/auth/google", self.base_url))
            .json(&json!({ "token": token }))
            .send()
            .await
            .expect("Google login request failed")
    }

    /// POST /api/auth/logout
    pub async fn logout(&self) -> Response {
        self.client
            .post(format!("{}/api/auth/logout", self.base_url))
            .send()
            .await
            .expect("Logout request failed")
    }

    /// GET /api/auth/verify
    pub async fn verify(&self) -> Response {
        self.client
            .get(format!("{}/api/auth/verify", self.base_url))
            .send()
            .await
            .expect("Verify request failed")
    }

    /// GET /api/auth/session
    pub async fn get_session(&self) -> Response {
        self.client
            .get(format!("{}/api/auth/session", self.base_url))
            .send()
            .await
            .expect("Get session request failed")
    }

    /// GET / (server stats; echoes the session token when logged in)
    pub async fn get_stats(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Stats request failed")
    }

    // ========================================================================
    // Course Endpoints
    // ========================================================================

    /// GET /api/courses
    pub async fn list_courses(&self, category: Option<&str>) -> Response {
        let mut request = self.client.get(format!("{}/api/courses", self.base_url));
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        request.send().await.expect("List courses request failed")
    }

    /// GET /api/courses/{id}
    pub async fn get_course(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/courses/{}", self.base_url, id))
            .send()
            .await
            .expect("Get course request failed")
    }

    /// GET /api/courses/categories/all
    pub async fn get_categories(&self) -> Response {
        self.client
            .get(format!("{}/api/courses/categories/all", self.base_url))
            .send()
            .await
            .expect("Get categories request failed")
    }

    /// POST /api/courses
    pub async fn create_course(&self, draft: &serde_json::Value) -> Response {
        self.client
            .post(format!("{}/api/courses", self.base_url))
            .json(draft)
            .send()
            .await
            .expect("Create course request failed")
    }

    /// PUT /api/courses/{id}
    pub async fn update_course(&self, id: &str, draft: &serde_json::Value) -> Response {
        self.client
            .put(format!("{}/api/courses/{}", self.base_url, id))
            .json(draft)
            .send()
            .await
            .expect("Update course request failed")
    }

    /// DELETE /api/courses/{id}
    pub async fn delete_course(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/api/courses/{}", self.base_url, id))
            .send()
            .await
            .expect("Delete course request failed")
    }

    // ========================================================================
    // Cart Endpoints
    // ========================================================================

    /// GET /api/cart
    pub async fn get_cart(&self) -> Response {
        self.client
            .get(format!("{}/api/cart", self.base_url))
            .send()
            .await
            .expect("Get cart request failed")
    }

    /// POST /api/cart
    pub async fn add_to_cart(&self, course_id: &str) -> Response {
        self.client
            .post(format!("{}/api/cart", self.base_url))
            .json(&json!({ "courseId": course_id }))
            .send()
            .await
            .expect("Add to cart request failed")
    }

    /// PUT /api/cart/{courseId}
    pub async fn set_cart_quantity(&self, course_id: &str, quantity: i64) -> Response {
        self.client
            .put(format!("{}/api/cart/{}", self.base_url, course_id))
            .json(&json!({ "quantity": quantity }))
            .send()
            .await
            .expect("Set cart quantity request failed")
    }

    /// DELETE /api/cart/{courseId}
    pub async fn remove_from_cart(&self, course_id: &str) -> Response {
        self.client
            .delete(format!("{}/api/cart/{}", self.base_url, course_id))
            .send()
            .await
            .expect("Remove from cart request failed")
    }

    /// POST /api/cart/clear
    pub async fn clear_cart(&self) -> Response {
        self.client
            .post(format!("{}/api/cart/clear", self.base_url))
            .send()
            .await
            .expect("Clear cart request failed")
    }

    /// GET /api/cart/count
    pub async fn cart_count(&self) -> Response {
        self.client
            .get(format!("{}/api/cart/count", self.base_url))
            .send()
            .await
            .expect("Cart count request failed")
    }
}
