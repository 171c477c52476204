//! Typed REST calls for the profile, admin and property screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every helper goes through `SessionStore::authenticated_fetch`, so bearer
//! injection and the 401 forced logout apply uniformly. Helpers only translate
//! statuses and bodies into [`ApiError`] and typed results.
//!
//! ERROR HANDLING
//! ==============
//! 403 is always [`ApiError::Forbidden`] and leaves the session alone. Other
//! non-2xx statuses carry the backend's `message` when it sent one.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;

use super::http::{ApiRequest, ApiResponse, Transport};
use super::types::{ProfileUpdate, RealEstate, SearchParams, User, UserStatusChange};
use crate::error::ApiError;
use crate::state::storage::TokenStorage;
use crate::state::store::SessionStore;

pub const CHANGE_USER_INFO_PATH: &str = "/changeUserInfo";
pub const DELETE_USER_PATH: &str = "/auth/deleteUser";
pub const ADMIN_USERS_PATH: &str = "/api/admin/users";
pub const SEARCH_PATH: &str = "/searchRealestate";
pub const REGISTER_PROPERTY_PATH: &str = "/registerRealestate";
pub const UPDATE_PROPERTY_PATH: &str = "/updateRealestate";

pub const PROFILE_UPDATED: &str = "Your profile was updated.";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed.";
const ACCOUNT_DELETE_FAILED: &str = "Account deletion failed.";
const USERS_FETCH_FAILED: &str = "Could not load users.";
const STATUS_CHANGE_FAILED: &str = "Status change failed.";
const SEARCH_FAILED: &str = "Could not load properties.";
const PROPERTY_SAVE_FAILED: &str = "Saving the property failed.";
const PROPERTY_DELETE_FAILED: &str = "Deleting the property failed.";

fn status_change_path(user_id: i64) -> String {
    format!("{ADMIN_USERS_PATH}/{user_id}/statusChange")
}

fn delete_property_path(id: i64) -> String {
    format!("/deleteRealestate/{id}")
}

fn search_path(params: &SearchParams) -> String {
    let query = params.query_string();
    if query.is_empty() { SEARCH_PATH.to_owned() } else { format!("{SEARCH_PATH}?{query}") }
}

/// Pass 2xx through; map everything else into [`ApiError`].
fn check(response: ApiResponse, fallback: &str) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    if response.status == 403 {
        return Err(ApiError::Forbidden);
    }
    Err(ApiError::Status { status: response.status, message: response.message_or(fallback) })
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

fn json_request<B: serde::Serialize>(request: ApiRequest, body: &B) -> Result<ApiRequest, ApiError> {
    request.json(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `PUT /changeUserInfo`, then refresh the cached user.
///
/// The backend may answer with the updated user; otherwise the submitted
/// fields are applied to the cached copy. Returns the message to display.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn update_user_info<T: Transport, S: TokenStorage>(
    store: &SessionStore<T, S>,
    update: &ProfileUpdate,
) -> Result<String, ApiError> {
    let request = json_request(ApiRequest::put(CHANGE_USER_INFO_PATH), update)?;
    let response = check(store.authenticated_fetch(request).await?, PROFILE_UPDATE_FAILED)?;

    let refreshed = match response.json::<User>() {
        Ok(user) => Some(user),
        Err(_) => store.current_session().user().map(|user| update.apply_to(user)),
    };
    if let Some(user) = refreshed {
        store.replace_user(user);
    }
    Ok(response.message_or(PROFILE_UPDATED))
}

/// `DELETE /auth/deleteUser`, then end the local session.
///
/// # Errors
///
/// See the module-level error mapping. The session is kept when deletion fails.
pub async fn delete_account<T: Transport, S: TokenStorage>(store: &SessionStore<T, S>) -> Result<(), ApiError> {
    let response = store.authenticated_fetch(ApiRequest::delete(DELETE_USER_PATH)).await?;
    check(response, ACCOUNT_DELETE_FAILED)?;
    log::info!("account deleted");
    store.logout().await;
    Ok(())
}

/// `GET /api/admin/users`.
///
/// # Errors
///
/// [`ApiError::Forbidden`] when the caller is not an administrator.
pub async fn list_users<T: Transport, S: TokenStorage>(store: &SessionStore<T, S>) -> Result<Vec<User>, ApiError> {
    let response = store.authenticated_fetch(ApiRequest::get(ADMIN_USERS_PATH)).await?;
    decode(&check(response, USERS_FETCH_FAILED)?)
}

/// `PUT /api/admin/users/{id}/statusChange`.
///
/// When `user_id` is the signed-in user the cached record is re-read from
/// `/api/auth/me`, so a self-demotion reaches the router gate.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn change_user_status<T: Transport, S: TokenStorage>(
    store: &SessionStore<T, S>,
    user_id: i64,
    change: &UserStatusChange,
) -> Result<(), ApiError> {
    let request = json_request(ApiRequest::put(status_change_path(user_id)), change)?;
    check(store.authenticated_fetch(request).await?, STATUS_CHANGE_FAILED)?;
    log::info!("status of user {user_id} changed to {} (enabled: {})", change.role.as_str(), change.enabled);
    if store.current_session().user().is_some_and(|user| user.id == user_id) {
        if let Err(e) = store.refresh_user().await {
            log::warn!("own status changed but the account could not be re-read: {e}");
        }
    }
    Ok(())
}

/// `GET /searchRealestate` with the non-blank filters.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn search_properties<T: Transport, S: TokenStorage>(
    store: &SessionStore<T, S>,
    params: &SearchParams,
) -> Result<Vec<RealEstate>, ApiError> {
    let response = store.authenticated_fetch(ApiRequest::get(search_path(params))).await?;
    decode(&check(response, SEARCH_FAILED)?)
}

/// `POST /registerRealestate`.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn register_property<T: Transport, S: TokenStorage>(
    store: &SessionStore<T, S>,
    property: &RealEstate,
) -> Result<(), ApiError> {
    let request = json_request(ApiRequest::post(REGISTER_PROPERTY_PATH), property)?;
    check(store.authenticated_fetch(request).await?, PROPERTY_SAVE_FAILED)?;
    Ok(())
}

/// `PUT /updateRealestate`.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn update_property<T: Transport, S: TokenStorage>(
    store: &SessionStore<T, S>,
    property: &RealEstate,
) -> Result<(), ApiError> {
    let request = json_request(ApiRequest::put(UPDATE_PROPERTY_PATH), property)?;
    check(store.authenticated_fetch(request).await?, PROPERTY_SAVE_FAILED)?;
    Ok(())
}

/// `DELETE /deleteRealestate/{id}`; `id` comes from [`RealEstate::delete_id`].
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn delete_property<T: Transport, S: TokenStorage>(
    store: &SessionStore<T, S>,
    id: i64,
) -> Result<(), ApiError> {
    let response = store.authenticated_fetch(ApiRequest::delete(delete_property_path(id))).await?;
    check(response, PROPERTY_DELETE_FAILED)?;
    Ok(())
}
