use super::*;
use crate::error::AuthError;
use crate::net::http::{AUTHORIZATION, Method};
use crate::net::types::{Project, Role};
use crate::state::router::{View, ViewRouter};
use crate::state::storage::MemoryStorage;
use crate::state::test_support::{ScriptedTransport, make_user, signed_in_store, user_json};

// =============================================================
// paths
// =============================================================

#[test]
fn status_change_path_formats_expected_path() {
    assert_eq!(status_change_path(42), "/api/admin/users/42/statusChange");
}

#[test]
fn delete_property_path_formats_expected_path() {
    assert_eq!(delete_property_path(7), "/deleteRealestate/7");
}

#[test]
fn search_path_omits_empty_query() {
    assert_eq!(search_path(&SearchParams::default()), "/searchRealestate");
    let params = SearchParams { building_type: "Apartment".to_owned(), ..SearchParams::default() };
    assert_eq!(search_path(&params), "/searchRealestate?searchBuildingType=Apartment");
}

#[test]
fn check_maps_statuses() {
    assert!(check(ApiResponse::new(204, ""), "x").is_ok());
    assert_eq!(check(ApiResponse::new(403, r#"{"message":"no"}"#), "x").unwrap_err(), ApiError::Forbidden);
    assert_eq!(
        check(ApiResponse::new(500, ""), "fallback").unwrap_err(),
        ApiError::Status { status: 500, message: "fallback".to_owned() }
    );
    assert_eq!(
        check(ApiResponse::new(400, r#"{"message":"bad"}"#), "fallback").unwrap_err().to_string(),
        "bad"
    );
}

// =============================================================
// profile
// =============================================================

#[tokio::test]
async fn update_user_info_applies_fields_when_body_is_not_a_user() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    transport.push_json(200, serde_json::json!({"message": "updated"}));
    let update = ProfileUpdate {
        username: "taro2".to_owned(),
        email: "new@example.com".to_owned(),
        display_name: "Taro II".to_owned(),
        ..ProfileUpdate::default()
    };

    let message = update_user_info(&store, &update).await.unwrap();

    assert_eq!(message, "updated");
    let session = store.current_session();
    let user = session.user().unwrap();
    assert_eq!(user.username, "taro2");
    assert_eq!(user.display_name, "Taro II");
    assert_eq!(user.role, Role::User);

    let request = transport.last_request();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.url, CHANGE_USER_INFO_PATH);
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert!(body.get("newPassword").is_none());
}

#[tokio::test]
async fn update_user_info_prefers_returned_user() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    let mut returned = user_json("USER");
    returned["displayName"] = "From Server".into();
    transport.push_json(200, returned);

    let message = update_user_info(&store, &ProfileUpdate::default()).await.unwrap();

    assert_eq!(message, PROFILE_UPDATED);
    assert_eq!(store.current_session().user().unwrap().display_name, "From Server");
}

#[tokio::test]
async fn update_user_info_failure_keeps_cached_user() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    transport.push_json(400, serde_json::json!({"message": "Current password is incorrect"}));

    let err = update_user_info(&store, &ProfileUpdate::default()).await.unwrap_err();

    assert_eq!(err.to_string(), "Current password is incorrect");
    assert_eq!(store.current_session().user(), Some(&make_user(Role::User)));
}

#[tokio::test]
async fn delete_account_logs_out_after_success() {
    let transport = ScriptedTransport::new();
    let storage = MemoryStorage::default();
    let store = signed_in_store(&transport, &storage, "USER").await;
    transport.push_status(200).push_status(200);

    delete_account(&store).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[1].method, Method::Delete);
    assert_eq!(requests[1].url, DELETE_USER_PATH);
    assert!(!store.current_session().is_authenticated());
    assert_eq!(storage.peek(), None);
}

#[tokio::test]
async fn delete_account_failure_keeps_session() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    transport.push_status(500);

    assert!(delete_account(&store).await.is_err());
    assert!(store.current_session().is_authenticated());
}

// =============================================================
// admin
// =============================================================

#[tokio::test]
async fn list_users_decodes_array() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "ADMIN").await;
    transport.push_json(200, serde_json::json!([user_json("ADMIN"), user_json("GUEST")]));

    let users = list_users(&store).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].role, Role::Guest);
    assert_eq!(transport.last_request().header_value(AUTHORIZATION), Some("Bearer t1"));
}

#[tokio::test]
async fn list_users_403_is_forbidden_and_keeps_session() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    transport.push_json(403, serde_json::json!({"message": "Access denied"}));

    let err = list_users(&store).await.unwrap_err();

    assert_eq!(err, ApiError::Forbidden);
    assert!(!err.is_session_expired());
    assert!(store.current_session().is_authenticated());
}

#[tokio::test]
async fn list_users_401_reports_expired_session() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "ADMIN").await;
    transport.push_status(401).push_status(200);

    let err = list_users(&store).await.unwrap_err();

    assert_eq!(err, ApiError::Auth(AuthError::SessionExpired));
    assert!(err.is_session_expired());
    assert!(!store.current_session().is_authenticated());
}

#[tokio::test]
async fn change_user_status_sends_unlock_body() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "ADMIN").await;
    transport.push_status(200);
    let mut locked = make_user(Role::User);
    locked.login_failed_attempts = 5;
    locked.account_locked_until = Some("2030-01-01T00:00:00".to_owned());
    let change = UserStatusChange::for_user(&locked, Role::User, true, true);

    change_user_status(&store, 9, &change).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.url, "/api/admin/users/9/statusChange");
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"role": "USER", "enabled": true, "loginFailedAttempts": 0, "accountLockedUntil": null})
    );
}

#[tokio::test]
async fn demoting_yourself_rereads_account_and_leaves_admin_view() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "ADMIN").await;
    let mut router = ViewRouter::new(View::Admin);
    assert_eq!(router.sync(&store.current_session()), None);
    transport.push_status(200).push_json(200, user_json("USER"));
    let me = store.current_session().user().cloned().unwrap();
    let change = UserStatusChange::for_user(&me, Role::User, true, false);

    change_user_status(&store, me.id, &change).await.unwrap();

    assert_eq!(transport.last_request().url, "/api/auth/me");
    assert_eq!(store.current_session().role(), Some(Role::User));
    assert_eq!(router.sync(&store.current_session()), Some(View::Search));
    assert_eq!(router.active(), View::Search);
}

#[tokio::test]
async fn changing_another_user_does_not_reread_account() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "ADMIN").await;
    transport.push_status(200);
    let change = UserStatusChange::for_user(&make_user(Role::User), Role::Admin, true, false);

    change_user_status(&store, 9, &change).await.unwrap();

    assert_eq!(transport.requests().len(), 2);
    assert!(store.current_session().is_admin());
}

#[tokio::test]
async fn failed_reread_still_reports_status_change() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "ADMIN").await;
    transport.push_status(200).push_status(500);
    let change = UserStatusChange::for_user(&make_user(Role::Admin), Role::Admin, false, false);

    change_user_status(&store, 1, &change).await.unwrap();

    assert_eq!(transport.requests().len(), 3);
    assert!(store.current_session().is_admin());
}

// =============================================================
// properties
// =============================================================

#[tokio::test]
async fn search_properties_tolerates_partial_records() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "GUEST").await;
    transport.push_json(
        200,
        serde_json::json!([
            {"id": 1, "project": {"id": 10, "projectName": "Sakura"}},
            {"id": 2}
        ]),
    );
    let params = SearchParams { project_name: "Sakura Heights".to_owned(), ..SearchParams::default() };

    let list = search_properties(&store, &params).await.unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].project_name(), "Sakura");
    assert_eq!(list[1].project_name(), "");
    assert_eq!(transport.last_request().url, "/searchRealestate?searchProjectName=Sakura+Heights");
}

#[tokio::test]
async fn search_properties_bad_body_is_decode_error() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    transport.push_json(200, serde_json::json!({"not": "a list"}));

    assert!(matches!(search_properties(&store, &SearchParams::default()).await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn register_and_update_property_use_expected_methods() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    transport.push_status(201).push_status(200);
    let property = RealEstate {
        project: Some(Project { project_name: "Sakura".to_owned(), ..Project::default() }),
        ..RealEstate::default()
    }
    .filled();

    register_property(&store, &property).await.unwrap();
    update_property(&store, &property).await.unwrap();

    let requests = transport.requests();
    assert_eq!((requests[1].method, requests[1].url.as_str()), (Method::Post, REGISTER_PROPERTY_PATH));
    assert_eq!((requests[2].method, requests[2].url.as_str()), (Method::Put, UPDATE_PROPERTY_PATH));
    let body: serde_json::Value = serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["project"]["projectName"], "Sakura");
    assert_eq!(body["incomeAndExpenses"]["rent"], 0);
}

#[tokio::test]
async fn delete_property_failure_surfaces_fallback() {
    let transport = ScriptedTransport::new();
    let store = signed_in_store(&transport, &MemoryStorage::default(), "USER").await;
    transport.push_status(500);

    let err = delete_property(&store, 3).await.unwrap_err();

    assert_eq!(err.to_string(), PROPERTY_DELETE_FAILED);
    assert_eq!(transport.last_request().url, "/deleteRealestate/3");
}
