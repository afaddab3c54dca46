//! API Integration Tests
//!
//! Each service's full app over in-memory storage.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use bank_services::{ServiceKind, Storage};
use serde_json::{json, Value};

mod common;

use common::{get, memory_app, post, put, send, send_request};

// =========================================================================
// Account
// =========================================================================

fn account_details() -> Value {
    json!({
        "passportId": 10,
        "accountNumber": 40817810,
        "bankDetailsId": 3,
        "money": "1500.25",
        "negativeBalance": false,
        "profileId": 7
    })
}

#[tokio::test]
async fn test_account_details_lifecycle() {
    let app = memory_app(ServiceKind::Account);

    // 1. Create ignores the client id
    let mut body = account_details();
    body["id"] = json!(999);
    let created = post(&app, "/details/create", body).await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["id"], 1);
    assert_eq!(created.body["accountNumber"], 40817810);

    // 2. Read it back
    let read = get(&app, "/details/1").await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body, created.body);
    assert_eq!(get(&app, "/details/999").await.status, StatusCode::NOT_FOUND);

    // 3. Partial update keeps omitted fields
    let updated = put(&app, "/details/update/1", json!({"money": "-20.50", "negativeBalance": true})).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["id"], 1);
    assert_eq!(updated.body["money"], "-20.50");
    assert_eq!(updated.body["negativeBalance"], true);
    assert_eq!(updated.body["profileId"], 7);

    // 4. Both writes were audited
    let create_audit = get(&app, "/audit/1").await;
    assert_eq!(create_audit.status, StatusCode::OK);
    assert_eq!(create_audit.body["entityType"], "AccountDetails");
    assert_eq!(create_audit.body["operationType"], "create");
    assert_eq!(create_audit.body["createdBy"], "integration-test");

    let update_audit = get(&app, "/audit/2").await;
    assert_eq!(update_audit.body["operationType"], "update");
    assert!(update_audit.body["newEntityJson"]
        .as_str()
        .unwrap()
        .contains("-20.50"));
    assert_eq!(get(&app, "/audit/3").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_batch_read_is_strict() {
    let app = memory_app(ServiceKind::Account);
    post(&app, "/details/create", account_details()).await;
    post(&app, "/details/create", account_details()).await;

    let both = get(&app, "/details/read/all?ids=2&ids=1").await;
    assert_eq!(both.status, StatusCode::OK);
    let ids: Vec<_> = both.body.as_array().unwrap().iter().map(|d| d["id"].clone()).collect();
    assert_eq!(ids, vec![json!(2), json!(1)]);

    let partial = get(&app, "/details/read/all?ids=1,5").await;
    assert_eq!(partial.status, StatusCode::NOT_FOUND);
    assert_eq!(partial.body["error_code"], "not_found");
    assert_eq!(partial.body["details"], "5");
}

#[tokio::test]
async fn test_update_unknown_id_is_404_and_changes_nothing() {
    let app = memory_app(ServiceKind::Account);
    post(&app, "/details/create", account_details()).await;

    let missing = put(&app, "/details/update/42", json!({"money": "1.00"})).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    assert_eq!(get(&app, "/details/42").await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/details/1").await.body["money"], "1500.25");
    // Only the create was audited
    assert_eq!(get(&app, "/audit/2").await.status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Request validation
// =========================================================================

#[tokio::test]
async fn test_unparseable_path_id_is_bare_404() {
    let app = memory_app(ServiceKind::Account);

    let response = get(&app, "/details/abc").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.raw.is_empty());
}

#[tokio::test]
async fn test_missing_or_invalid_body_is_400() {
    let app = memory_app(ServiceKind::Account);

    let no_body = send(&app, "POST", "/details/create", None).await;
    assert_eq!(no_body.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_body.body["error_code"], "invalid_request");

    let request = Request::builder()
        .method("PUT")
        .uri("/details/update/1")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    assert_eq!(send_request(&app, request).await.status, StatusCode::BAD_REQUEST);

    let wrong_type = post(&app, "/details/create", json!({"accountNumber": "many"})).await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_ids_parameter_is_400() {
    let app = memory_app(ServiceKind::Account);

    assert_eq!(get(&app, "/details/read/all").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(get(&app, "/details/read/all?ids=").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(get(&app, "/details/read/all?ids=x").await.status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Antifraud
// =========================================================================

#[tokio::test]
async fn test_antifraud_families_are_independent() {
    let app = memory_app(ServiceKind::Antifraud);

    for kind in ["account", "card", "phone"] {
        let base = format!("/suspicious/{}/transfer", kind);
        let transfer_field = format!("{}TransferId", kind);

        let mut body = json!({
            "isBlocked": false,
            "isSuspicious": true,
            "suspiciousReason": "velocity"
        });
        body[transfer_field.as_str()] = json!(77);

        let created = post(&app, &format!("{}/create", base), body).await;
        assert_eq!(created.status, StatusCode::OK, "{} create failed", kind);
        assert_eq!(created.body["id"], 1);
        assert_eq!(created.body[transfer_field.as_str()], 77);

        let blocked = put(
            &app,
            &format!("{}/1", base),
            json!({"isBlocked": true, "blockedReason": "confirmed"}),
        )
        .await;
        assert_eq!(blocked.status, StatusCode::OK);
        assert_eq!(blocked.body["isBlocked"], true);
        assert_eq!(blocked.body["suspiciousReason"], "velocity");

        let one = get(&app, &format!("{}?ids=1", base)).await;
        assert_eq!(one.status, StatusCode::OK);
        assert_eq!(one.body.as_array().unwrap().len(), 1);

        let strict = get(&app, &format!("{}?ids=1&ids=2", base)).await;
        assert_eq!(strict.status, StatusCode::NOT_FOUND);
    }

    // Six audited writes across the three families
    assert_eq!(get(&app, "/audit/6").await.status, StatusCode::OK);
    assert_eq!(get(&app, "/audit/7").await.status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Authorization
// =========================================================================

#[tokio::test]
async fn test_authorization_user_routes() {
    let app = memory_app(ServiceKind::Authorization);

    let created = post(
        &app,
        "/create",
        json!({"id": 50, "role": "ADMIN", "profileId": 3, "password": "hash"}),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["id"], 1);

    let read = get(&app, "/read/1").await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["role"], "ADMIN");

    let updated = put(&app, "/1/update", json!({"role": "USER"})).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["role"], "USER");
    assert_eq!(updated.body["profileId"], 3);

    assert_eq!(get(&app, "/read/all?ids=1").await.status, StatusCode::OK);
    assert_eq!(get(&app, "/read/all?ids=1&ids=2").await.status, StatusCode::NOT_FOUND);
    assert_eq!(put(&app, "/9/update", json!({})).await.status, StatusCode::NOT_FOUND);
}

// =========================================================================
// History
// =========================================================================

#[tokio::test]
async fn test_history_routes_and_strict_batch() {
    let app = memory_app(ServiceKind::History);

    let created = post(&app, "/api/history", json!({"accountAuditId": 31, "transferAuditId": 4})).await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["id"], 1);
    assert!(created.body["profileAuditId"].is_null());

    let updated = put(&app, "/api/history/1", json!({"profileAuditId": 12})).await;
    assert_eq!(updated.body["profileAuditId"], 12);
    assert_eq!(updated.body["accountAuditId"], 31);

    let read = get(&app, "/api/history/1").await;
    assert_eq!(read.body["profileAuditId"], 12);

    // Batch reads use the `id` parameter
    let batch = get(&app, "/api/history?id=1").await;
    assert_eq!(batch.status, StatusCode::OK);
    assert_eq!(batch.body.as_array().unwrap().len(), 1);
    assert_eq!(get(&app, "/api/history?ids=1").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(get(&app, "/api/history?id=1&id=3").await.status, StatusCode::NOT_FOUND);

    // No audit table in this service
    assert_eq!(get(&app, "/audit/1").await.status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Profile
// =========================================================================

#[tokio::test]
async fn test_profile_batch_read_is_lenient() {
    let app = memory_app(ServiceKind::Profile);

    let created = post(
        &app,
        "/profile/create",
        json!({"phoneNumber": 79990001122i64, "email": "anna@bank.test", "nameOnCard": "ANNA IVANOVA"}),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);

    let read = get(&app, "/profile/read/1").await;
    assert_eq!(read.body["email"], "anna@bank.test");

    let subset = get(&app, "/profile/read/all?ids=1&ids=2").await;
    assert_eq!(subset.status, StatusCode::OK);
    assert_eq!(subset.body.as_array().unwrap().len(), 1);

    let none = get(&app, "/profile/read/all?ids=8").await;
    assert_eq!(none.status, StatusCode::OK);
    assert_eq!(none.body, json!([]));

    assert_eq!(get(&app, "/profile/read/2").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_families_have_own_id_spaces() {
    let app = memory_app(ServiceKind::Profile);

    let passport = post(
        &app,
        "/passport/create",
        json!({"series": 4510, "number": 123456, "lastName": "Ivanova", "birthDate": "1990-05-17"}),
    )
    .await;
    assert_eq!(passport.body["id"], 1);
    assert_eq!(passport.body["birthDate"], "1990-05-17");

    let registration = post(&app, "/registration/create", json!({"country": "RU", "index": 101000})).await;
    assert_eq!(registration.body["id"], 1);

    let actual = post(&app, "/actual/registration/create", json!({"country": "RU", "city": "Kazan"})).await;
    assert_eq!(actual.body["id"], 1);
    let moved = put(&app, "/actual/registration/update/1", json!({"flatNumber": "40"})).await;
    assert_eq!(moved.body["city"], "Kazan");
    assert_eq!(moved.body["flatNumber"], "40");

    let link = post(&app, "/account/details/create", json!({"accountId": 5, "profileId": 1})).await;
    assert_eq!(link.body["id"], 1);
    assert_eq!(get(&app, "/account/details/read/1").await.body["accountId"], 5);

    // Audit ids are shared by every family of the service
    let audit = get(&app, "/audit/5").await;
    assert_eq!(audit.status, StatusCode::OK);
    assert_eq!(audit.body["entityType"], "AccountDetailsId");
}

// =========================================================================
// Public info
// =========================================================================

#[tokio::test]
async fn test_public_info_atm_embeds_branch() {
    let app = memory_app(ServiceKind::PublicInfo);

    let branch = post(
        &app,
        "/branch/create",
        json!({"address": "Lenina 1", "phoneNumber": 88001234567i64, "startOfWork": "09:00:00", "endOfWork": "18:00:00"}),
    )
    .await;
    assert_eq!(branch.status, StatusCode::OK);
    assert_eq!(branch.body["startOfWork"], "09:00:00");

    let atm = post(
        &app,
        "/atm/create",
        json!({"id": 77, "address": "Lenina 1, lobby", "allHours": true, "branch": branch.body}),
    )
    .await;
    assert_eq!(atm.status, StatusCode::OK);
    assert_eq!(atm.body["id"], 1);
    assert_eq!(atm.body["branch"]["id"], 1);
    assert_eq!(atm.body["branch"]["address"], "Lenina 1");

    let updated = put(&app, "/atm/update/1", json!({"allHours": false})).await;
    assert_eq!(updated.body["allHours"], false);
    assert_eq!(updated.body["branch"]["id"], 1);

    let lenient = get(&app, "/atm/read/all?ids=1,2,3").await;
    assert_eq!(lenient.status, StatusCode::OK);
    assert_eq!(lenient.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_public_info_documents() {
    let app = memory_app(ServiceKind::PublicInfo);

    let bank = post(
        &app,
        "/bank/details/create",
        json!({"bik": 44525225, "inn": 7707083893i64, "kpp": 773601001, "corAccount": "30101810400000000225", "name": "Northern Bank"}),
    )
    .await;
    assert_eq!(bank.status, StatusCode::OK);
    assert_eq!(bank.body["corAccount"], "30101810400000000225");

    let license = post(
        &app,
        "/license/create",
        json!({"photoLicense": "c2Nhbg==", "bankDetails": {"id": 1}}),
    )
    .await;
    assert_eq!(license.status, StatusCode::OK);
    assert_eq!(license.body["photoLicense"], "c2Nhbg==");
    assert_eq!(license.body["bankDetails"]["id"], 1);

    let certificate = post(&app, "/certificate/create", json!({"photoCertificate": "AQID"})).await;
    assert_eq!(certificate.body["id"], 1);
    assert!(certificate.body["bankDetails"].is_null());

    let bad_photo = post(&app, "/certificate/create", json!({"photoCertificate": "***"})).await;
    assert_eq!(bad_photo.status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Ambient endpoints
// =========================================================================

#[tokio::test]
async fn test_context_path_info_and_health() {
    let app = common::app_with(ServiceKind::Account, &Storage::InMemory, "/api/account");

    let health = get(&app, "/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.raw, b"OK");

    let info = get(&app, "/api/account/actuator/info").await;
    assert_eq!(info.status, StatusCode::OK);
    assert_eq!(info.body["name"], "account");
    assert_eq!(info.body["contextPath"], "/api/account");
    assert_eq!(info.body["version"], env!("CARGO_PKG_VERSION"));

    assert_eq!(
        post(&app, "/api/account/details/create", account_details()).await.status,
        StatusCode::OK
    );
    assert_eq!(get(&app, "/details/1").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_correlation_id_is_echoed_or_generated() {
    let app = memory_app(ServiceKind::History);

    let generated = get(&app, "/health").await;
    let value = generated.headers.get("x-correlation-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(value).is_ok());

    let id = uuid::Uuid::new_v4();
    let request = Request::builder()
        .uri("/health")
        .header("x-correlation-id", id.to_string())
        .body(Body::empty())
        .unwrap();
    let echoed = send_request(&app, request).await;
    assert_eq!(
        echoed.headers.get("x-correlation-id").unwrap().to_str().unwrap(),
        id.to_string()
    );
}
