//! Resource store tests
//!
//! Each test scripts the API on a wiremock server and checks what ends up
//! in the stores, the request-state tracker and the notifications.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{error_body, inventory_for, mock_inventory, sample_application, sample_license};
use license_inventory::client::{ClientError, NotificationKind, RequestKey, RequestStatus};
use license_inventory::shared::inventory::{FindOrCreateUserResponse, LicenseCounts, User};
use license_inventory::shared::ApiError;

#[tokio::test]
async fn test_fetch_applications() {
    let (server, inventory) = mock_inventory().await;
    let figma = sample_application("Figma");
    let slack = sample_application("Slack");

    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![&figma, &slack]))
        .expect(1)
        .mount(&server)
        .await;

    inventory.applications.fetch_all().await.unwrap();

    assert_eq!(inventory.applications.items().get(), vec![figma, slack]);
    let state = inventory.context.tracker.state(RequestKey::ApplicationFetch);
    assert_eq!(state.status, RequestStatus::Success);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_add_application_prepends_and_notifies() {
    let (server, inventory) = mock_inventory().await;
    let existing = sample_application("Slack");
    inventory.applications.items().set(vec![existing.clone()]);

    let draft = sample_application("Figma");
    let mut created = draft.clone();
    created.license_associations = 0;

    Mock::given(method("POST"))
        .and(path("/api/applications"))
        .and(body_partial_json(json!({ "id": draft.id, "name": "Figma" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    let returned = inventory.applications.add(&draft).await.unwrap();

    assert_eq!(returned, created);
    assert_eq!(inventory.applications.items().get(), vec![created, existing]);
    assert!(!inventory.context.tracker.buttons_disabled().get());

    let notifications = inventory.context.notifications.items();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
}

#[tokio::test]
async fn test_update_conflict_is_recorded() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    inventory.applications.items().set(vec![application.clone()]);

    Mock::given(method("PUT"))
        .and(path(format!("/api/applications/{}", application.id)))
        .respond_with(ResponseTemplate::new(409).set_body_json(error_body(
            409,
            "UpdateConflict",
            "Failed to update application because of data conflict.",
        )))
        .mount(&server)
        .await;

    let mut edited = application.clone();
    edited.name = "Figma Enterprise".into();
    let err = inventory.applications.update(&edited).await.unwrap_err();

    assert_matches!(err, ClientError::Api(ApiError::UpdateConflict(_)));
    assert_eq!(inventory.applications.items().get(), vec![application]);

    let state = inventory.context.tracker.state(RequestKey::ApplicationPost);
    assert_eq!(state.status, RequestStatus::Error);
    assert_matches!(state.error, Some(ApiError::UpdateConflict(_)));
    assert!(!inventory.context.tracker.buttons_disabled().get());

    let notifications = inventory.context.notifications.items();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Alert);
    assert_eq!(
        notifications[0].message,
        "Failed to update application because of data conflict."
    );
}

#[tokio::test]
async fn test_unstructured_error_body() {
    let (server, inventory) = mock_inventory().await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = inventory.users.fetch_all().await.unwrap_err();
    let error = err.to_api_error();
    assert_matches!(error, ApiError::InternalServerError(_));
    assert_eq!(error.status(), 502);
    assert_eq!(error.details().details, "Bad Gateway");
}

#[tokio::test]
async fn test_delete_application_removes_item() {
    let (server, inventory) = mock_inventory().await;
    let figma = sample_application("Figma");
    let slack = sample_application("Slack");
    inventory.applications.items().set(vec![figma.clone(), slack.clone()]);

    Mock::given(method("DELETE"))
        .and(path(format!("/api/applications/{}", figma.id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    inventory.applications.delete(figma.id).await.unwrap();
    assert_eq!(inventory.applications.items().get(), vec![slack]);
}

#[tokio::test]
async fn test_license_update_sends_token_and_patches_item() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    let current = sample_license(&application);
    let other = sample_license(&application);
    inventory
        .licenses
        .items()
        .set(vec![other.clone(), current.clone()]);

    let mut edited = current.clone();
    edited.comment = "renewed".into();
    let mut stored = edited.clone();
    stored.updated_at = current.updated_at + chrono::Duration::milliseconds(1);

    Mock::given(method("PUT"))
        .and(path(format!("/api/licenses/{}", current.id)))
        .and(body_partial_json(json!({
            "currentLicense": { "applicationId": application.id },
            "updatedLicense": { "comment": "renewed", "updatedAt": current.updated_at },
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/licenses/{}", current.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(&stored))
        .expect(1)
        .mount(&server)
        .await;

    inventory.licenses.current().set(current.clone());
    let refreshed = inventory.licenses.update(&current, &edited).await.unwrap();

    assert_eq!(refreshed, Some(stored.clone()));
    assert_eq!(inventory.licenses.items().get(), vec![other, stored.clone()]);
    assert_eq!(inventory.licenses.current().get(), stored);
}

#[tokio::test]
async fn test_license_update_saves_again_with_refreshed_token() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    let original = sample_license(&application);
    inventory.licenses.items().set(vec![original.clone()]);
    inventory.licenses.current().set(original.clone());

    let mut stored = original.clone();
    stored.comment = "first".into();
    stored.updated_at = original.updated_at + chrono::Duration::milliseconds(1);

    Mock::given(method("PUT"))
        .and(path(format!("/api/licenses/{}", original.id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/licenses/{}", original.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(&stored))
        .mount(&server)
        .await;

    let mut first = original.clone();
    first.comment = "first".into();
    inventory.licenses.update(&original, &first).await.unwrap();

    let current = inventory.licenses.current().get();
    assert_eq!(current.updated_at, stored.updated_at);

    let mut second = current.clone();
    second.comment = "second".into();
    inventory.licenses.update(&current, &second).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let puts: Vec<serde_json::Value> = requests
        .iter()
        .filter(|request| request.method.as_str() == "PUT")
        .map(|request| request.body_json().unwrap())
        .collect();
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[1]["updatedLicense"]["updatedAt"], json!(stored.updated_at));
}

#[tokio::test]
async fn test_license_update_survives_failed_refresh() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    let current = sample_license(&application);
    inventory.licenses.items().set(vec![current.clone()]);

    Mock::given(method("PUT"))
        .and(path(format!("/api/licenses/{}", current.id)))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/licenses/{}", current.id)))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            500,
            "InternalServerError",
            "An unexpected server error occurred.",
        )))
        .mount(&server)
        .await;

    let mut edited = current.clone();
    edited.comment = "renewed".into();
    let refreshed = inventory.licenses.update(&current, &edited).await.unwrap();

    assert_eq!(refreshed, None);
    assert_eq!(
        inventory.context.tracker.state(RequestKey::LicensePost).status,
        RequestStatus::Success
    );
    assert_eq!(
        inventory.context.tracker.state(RequestKey::LicenseFetch).status,
        RequestStatus::Error
    );

    let kinds: Vec<NotificationKind> = inventory
        .context
        .notifications
        .items()
        .iter()
        .map(|item| item.kind)
        .collect();
    assert_eq!(kinds, vec![NotificationKind::Success, NotificationKind::Alert]);
}

#[tokio::test]
async fn test_add_license_prepends_and_notifies() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    let existing = sample_license(&application);
    inventory.licenses.items().set(vec![existing.clone()]);

    let draft = sample_license(&application);
    let mut created = draft.clone();
    created.updated_at = draft.updated_at + chrono::Duration::milliseconds(1);

    Mock::given(method("POST"))
        .and(path("/api/licenses"))
        .and(body_partial_json(json!({
            "id": draft.id,
            "applicationId": application.id,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    let returned = inventory.licenses.add(&draft).await.unwrap();

    assert_eq!(returned, created);
    assert_eq!(inventory.licenses.items().get(), vec![created, existing]);
    assert_eq!(
        inventory.context.tracker.state(RequestKey::LicensePost).status,
        RequestStatus::Success
    );
    let notifications = inventory.context.notifications.items();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
}

#[tokio::test]
async fn test_failed_license_add_leaves_collection() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    let existing = sample_license(&application);
    inventory.licenses.items().set(vec![existing.clone()]);

    Mock::given(method("POST"))
        .and(path("/api/licenses"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "NotFound",
            "Application could not be found.",
        )))
        .mount(&server)
        .await;

    let err = inventory
        .licenses
        .add(&sample_license(&application))
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Api(ApiError::NotFound(_)));
    assert_eq!(inventory.licenses.items().get(), vec![existing]);
    assert_matches!(
        inventory.context.tracker.error(RequestKey::LicensePost),
        Some(ApiError::NotFound(_))
    );
    let notifications = inventory.context.notifications.items();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Alert);
    assert_eq!(notifications[0].message, "Application could not be found.");
}

#[tokio::test]
async fn test_delete_license() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    let gone = sample_license(&application);
    let kept = sample_license(&application);
    inventory.licenses.items().set(vec![gone.clone(), kept.clone()]);

    Mock::given(method("DELETE"))
        .and(path(format!("/api/licenses/{}", gone.id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/licenses/{}", kept.id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "NotFound",
            "License could not be found.",
        )))
        .mount(&server)
        .await;

    inventory.licenses.delete(gone.id).await.unwrap();
    assert_eq!(inventory.licenses.items().get(), vec![kept.clone()]);

    let err = inventory.licenses.delete(kept.id).await.unwrap_err();
    assert_matches!(err, ClientError::Api(ApiError::NotFound(_)));
    assert_eq!(inventory.licenses.items().get(), vec![kept]);
    assert_eq!(
        inventory.context.tracker.state(RequestKey::LicenseDelete).status,
        RequestStatus::Error
    );
    assert!(!inventory.context.tracker.buttons_disabled().get());
}

#[tokio::test]
async fn test_fetch_counts() {
    let (server, inventory) = mock_inventory().await;
    let counts = LicenseCounts {
        all: 4,
        assigned: 3,
        unassigned: 1,
        near_expiration: 2,
        expired: 1,
    };

    Mock::given(method("GET"))
        .and(path("/api/licenses/counts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(counts))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(inventory.licenses.fetch_counts().await.unwrap(), counts);
    assert_eq!(inventory.licenses.counts().get(), counts);
}

#[tokio::test]
async fn test_delete_user() {
    let (server, inventory) = mock_inventory().await;
    let ada = User {
        id: Uuid::new_v4(),
        name: "Ada".into(),
    };
    let grace = User {
        id: Uuid::new_v4(),
        name: "Grace".into(),
    };
    inventory.users.items().set(vec![ada.clone(), grace.clone()]);

    Mock::given(method("DELETE"))
        .and(path(format!("/api/user/delete/{}", ada.id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/user/delete/{}", grace.id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "NotFound",
            "User could not be found.",
        )))
        .mount(&server)
        .await;

    inventory.users.delete(ada.id).await.unwrap();
    assert_eq!(inventory.users.items().get(), vec![grace.clone()]);

    let err = inventory.users.delete(grace.id).await.unwrap_err();
    assert_matches!(err, ClientError::Api(ApiError::NotFound(_)));
    assert_eq!(inventory.users.items().get(), vec![grace]);
    assert_matches!(
        inventory.context.tracker.error(RequestKey::UserDelete),
        Some(ApiError::NotFound(_))
    );
}

#[tokio::test]
async fn test_truncated_error_body_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\n\
                  Content-Type: application/json\r\n\
                  Content-Length: 200\r\n\r\n\
                  {\"status\":500",
            )
            .await
            .unwrap();
    });

    let inventory = inventory_for(&format!("http://{}", address));
    let err = inventory.users.fetch_all().await.unwrap_err();

    assert_matches!(err, ClientError::Transport(_));
    assert_eq!(
        inventory.context.tracker.state(RequestKey::UserFetch).status,
        RequestStatus::Error
    );
}

#[tokio::test]
async fn test_load_current_copies_license() {
    let inventory = crate::common::offline_inventory();
    let application = sample_application("Figma");
    let license = sample_license(&application);
    inventory.licenses.items().set(vec![license.clone()]);

    let loaded = inventory.licenses.load_current(license.id);
    assert_eq!(loaded, Some(license.clone()));

    inventory.licenses.current().update(|current| current.comment = "draft".into());
    assert_eq!(inventory.licenses.items().get()[0].comment, license.comment);
    assert_eq!(inventory.context.tracker.error(RequestKey::LicenseFetch), None);
}

#[tokio::test]
async fn test_load_current_missing_license() {
    let inventory = crate::common::offline_inventory();

    assert_eq!(inventory.licenses.load_current(Uuid::new_v4()), None);
    assert_matches!(
        inventory.context.tracker.error(RequestKey::LicenseFetch),
        Some(ApiError::NotFound(_))
    );
}

#[tokio::test]
async fn test_find_or_create_existing_user_is_not_prepended() {
    let (server, inventory) = mock_inventory().await;
    let ada = User {
        id: Uuid::new_v4(),
        name: "Ada".into(),
    };
    inventory.users.items().set(vec![ada.clone()]);

    Mock::given(method("POST"))
        .and(path("/api/user/find-or-create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(FindOrCreateUserResponse {
            user: ada.clone(),
            created: false,
        }))
        .mount(&server)
        .await;

    let user = inventory.users.find_or_create("Ada").await.unwrap();
    assert_eq!(user, ada);
    assert_eq!(inventory.users.items().get(), vec![ada]);
}

#[tokio::test]
async fn test_find_or_create_new_user_is_prepended() {
    let (server, inventory) = mock_inventory().await;
    let grace = User {
        id: Uuid::new_v4(),
        name: "Grace".into(),
    };

    Mock::given(method("POST"))
        .and(path("/api/user/find-or-create"))
        .and(body_partial_json(json!({ "name": "Grace" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(FindOrCreateUserResponse {
            user: grace.clone(),
            created: true,
        }))
        .mount(&server)
        .await;

    inventory.users.find_or_create("Grace").await.unwrap();
    assert_eq!(inventory.users.items().get(), vec![grace]);
}

#[tokio::test]
async fn test_reset_waits_for_completion() {
    let inventory = crate::common::offline_inventory();
    let application = sample_application("Figma");
    inventory.applications.current().set(application.clone());

    let reset = inventory.applications.begin_reset();
    assert_eq!(inventory.applications.current().get(), application);

    reset.complete();
    let current = inventory.applications.current().get();
    assert_ne!(current.id, application.id);
    assert!(current.name.is_empty());
}

#[tokio::test]
async fn test_load_all() {
    let (server, inventory) = mock_inventory().await;
    let application = sample_application("Figma");
    let license = sample_license(&application);
    let counts = LicenseCounts {
        all: 1,
        unassigned: 1,
        ..LicenseCounts::default()
    };

    Mock::given(method("GET"))
        .and(path("/api/licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![&license]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![&application]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<User>::new()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/licenses/counts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(counts))
        .mount(&server)
        .await;

    inventory.load_all().await.unwrap();

    assert_eq!(inventory.licenses.items().get(), vec![license]);
    assert_eq!(inventory.applications.items().get(), vec![application]);
    assert_eq!(inventory.licenses.counts().get(), counts);
    assert_eq!(
        inventory.context.tracker.state(RequestKey::InitialLoad).status,
        RequestStatus::Success
    );
}

#[tokio::test]
async fn test_load_all_failure() {
    let (server, inventory) = mock_inventory().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            500,
            "InternalServerError",
            "An unexpected server error occurred.",
        )))
        .mount(&server)
        .await;

    assert!(inventory.load_all().await.is_err());

    let state = inventory.context.tracker.state(RequestKey::InitialLoad);
    assert_eq!(state.status, RequestStatus::Error);
    assert_matches!(state.error, Some(ApiError::InternalServerError(_)));
    assert!(!inventory.context.notifications.items().is_empty());
}

#[tokio::test]
async fn test_load_all_settles_every_request_on_failure() {
    let (server, inventory) = mock_inventory().await;
    let delay = std::time::Duration::from_millis(200);

    Mock::given(method("GET"))
        .and(path("/api/licenses"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            500,
            "InternalServerError",
            "An unexpected server error occurred.",
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![sample_application("Figma")])
                .set_delay(delay),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(Vec::<User>::new())
                .set_delay(delay),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/licenses/counts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(LicenseCounts::default())
                .set_delay(delay),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = inventory.load_all().await.unwrap_err();
    assert_matches!(err, ClientError::Api(ApiError::InternalServerError(_)));

    let tracker = &inventory.context.tracker;
    assert_eq!(tracker.state(RequestKey::ApplicationFetch).status, RequestStatus::Success);
    assert_eq!(tracker.state(RequestKey::UserFetch).status, RequestStatus::Success);
    assert_eq!(tracker.state(RequestKey::LicenseFetch).status, RequestStatus::Error);
    assert_eq!(tracker.state(RequestKey::InitialLoad).status, RequestStatus::Error);
    assert_eq!(inventory.applications.items().get().len(), 1);
}
