//! Record fixtures
//!
//! Builders for request bodies and helpers that create records through the
//! HTTP API, so fixtures exercise the same paths as real clients.

use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use license_inventory::shared::inventory::{Application, License, User};

/// Today, as the server sees it
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

/// Body of `POST /api/licenses`
pub fn license_body(application_id: Uuid, renewal_date: NaiveDate, users: &[User]) -> Value {
    json!({
        "applicationId": application_id,
        "renewalDate": renewal_date,
        "autoRenewal": false,
        "cost": 49.99,
        "renewalInterval": "yearly",
        "category": "Design",
        "status": "active",
        "contactPerson": "Grace Hopper",
        "additionalContactInfo": "grace@example.com",
        "comment": "",
        "users": users,
    })
}

/// Client-side application value
pub fn sample_application(name: &str) -> Application {
    let mut application = Application::blank();
    application.name = name.to_string();
    application.link = format!("https://{}.example.com", name.to_lowercase());
    application
}

/// Client-side license value belonging to `application`
pub fn sample_license(application: &Application) -> License {
    let mut license = License::blank();
    license.application_id = application.id;
    license.application = Some(application.clone());
    license.cost = 10.0;
    license.contact_person = "Ada Lovelace".to_string();
    license
}

#[cfg(feature = "ssr")]
pub mod api {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use serde_json::json;
    use uuid::Uuid;

    use license_inventory::shared::inventory::{
        Application, FindOrCreateUserResponse, License, User,
    };

    pub async fn create_application(server: &TestServer, name: &str) -> Application {
        let response = server
            .post("/api/applications")
            .json(&json!({
                "name": name,
                "link": format!("https://{}.example.com", name.to_lowercase()),
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json()
    }

    pub async fn create_user(server: &TestServer, name: &str) -> User {
        let response = server
            .post("/api/user/find-or-create")
            .json(&json!({ "name": name }))
            .await;
        assert!(response.status_code().is_success());
        response.json::<FindOrCreateUserResponse>().user
    }

    pub async fn create_license(
        server: &TestServer,
        application_id: Uuid,
        renewal_date: NaiveDate,
        users: &[User],
    ) -> License {
        let response = server
            .post("/api/licenses")
            .json(&super::license_body(application_id, renewal_date, users))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json()
    }

    pub async fn get_license(server: &TestServer, id: Uuid) -> License {
        let response = server.get(&format!("/api/licenses/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        response.json()
    }

    pub async fn list_applications(server: &TestServer) -> Vec<Application> {
        server.get("/api/applications").await.json()
    }
}
