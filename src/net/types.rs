//! Wire DTOs for the backend JSON API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Nested property sections
//! and most scalar fields default when absent, because list endpoints return
//! partially populated records.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::validation::{self, FieldErrors};

/// Shared demo account. Kept here so the guest path has one source of truth.
pub const GUEST_USERNAME: &str = "guest";
pub const GUEST_PASSWORD: &str = "guest123";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Guest,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Guest, Role::Admin];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Guest => "GUEST",
            Self::Admin => "ADMIN",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Account record owned by the backend; the client caches a read-mostly copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub login_failed_attempts: u32,
    #[serde(default)]
    pub account_locked_until: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

fn default_true() -> bool {
    true
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn locked_until(&self) -> Option<NaiveDateTime> {
        self.account_locked_until.as_deref().and_then(parse_timestamp)
    }

    /// Locked when the lock timestamp parses and lies after `now`.
    #[must_use]
    pub fn is_locked(&self, now: NaiveDateTime) -> bool {
        self.locked_until().is_some_and(|until| until > now)
    }

    #[must_use]
    pub fn last_login(&self) -> Option<NaiveDateTime> {
        self.last_login_at.as_deref().and_then(parse_timestamp)
    }
}

/// Accepts RFC 3339 (converted to UTC) or a bare ISO local date-time.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    #[must_use]
    pub fn guest() -> Self {
        Self::new(GUEST_USERNAME, GUEST_PASSWORD)
    }

    /// Both fields are required; the username is trimmed before sending.
    ///
    /// # Errors
    ///
    /// Returns the message for the first missing field.
    pub fn validate(&self) -> Result<Self, &'static str> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Enter your username.");
        }
        if self.password.is_empty() {
            return Err("Enter your password.");
        }
        Ok(Self::new(username, self.password.clone()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
}

impl RegistrationRequest {
    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.check("username", validation::username(&self.username));
        errors.check("password", validation::password(&self.password));
        errors.check("email", validation::email(&self.email));
        errors.check("displayName", validation::display_name(&self.display_name));
        errors
    }
}

/// `POST /api/auth/login` success body.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_info: User,
}

/// `GET /api/auth/validate` body.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default)]
    pub user_info: Option<User>,
}

/// Generic `{ "message": ... }` body used by the backend for errors and acks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Profile edit payload. Password fields are only sent when changing it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl ProfileUpdate {
    /// Cached user with this update's identity fields applied.
    #[must_use]
    pub fn apply_to(&self, user: &User) -> User {
        User {
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            ..user.clone()
        }
    }
}

/// Admin status-change body for `PUT /api/admin/users/{id}/statusChange`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusChange {
    pub role: Role,
    pub enabled: bool,
    pub login_failed_attempts: u32,
    pub account_locked_until: Option<String>,
}

impl UserStatusChange {
    /// Unlocking resets the failure counter and clears the lock; otherwise the
    /// user's current lock state is echoed back unchanged.
    #[must_use]
    pub fn for_user(user: &User, role: Role, enabled: bool, unlock: bool) -> Self {
        if unlock {
            Self { role, enabled, login_failed_attempts: 0, account_locked_until: None }
        } else {
            Self {
                role,
                enabled,
                login_failed_attempts: user.login_failed_attempts,
                account_locked_until: user.account_locked_until.clone(),
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub project_name: String,
    pub is_deleted: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parcel {
    pub parcel_price: i64,
    pub parcel_address: String,
    pub parcel_category: String,
    pub parcel_size: f64,
    pub parcel_remark: String,
    pub is_deleted: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Building {
    pub building_price: i64,
    pub building_type: String,
    pub building_structure: String,
    pub building_size: f64,
    /// ISO date (`YYYY-MM-DD`) or empty.
    pub building_date: String,
    pub building_remark: String,
    pub is_deleted: bool,
}

/// Monthly income and cost lines for a property.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeAndExpenses {
    pub rent: i64,
    pub maintenance_cost: i64,
    pub repair_fund: i64,
    pub management_fee: i64,
    pub principal: i64,
    pub interest: i64,
    pub tax: i64,
    pub water_bill: i64,
    pub electric_bill: i64,
    pub gas_bill: i64,
    pub fire_insurance: i64,
    pub other: String,
    pub is_deleted: bool,
}

/// A registered investment property as returned by `/searchRealestate`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealEstate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub project: Option<Project>,
    pub parcel: Option<Parcel>,
    pub building: Option<Building>,
    pub income_and_expenses: Option<IncomeAndExpenses>,
}

impl RealEstate {
    /// Identifier used by `/deleteRealestate/{id}`: the project id, else the record id.
    #[must_use]
    pub fn delete_id(&self) -> Option<i64> {
        self.project.as_ref().and_then(|p| p.id).or(self.id)
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        self.project.as_ref().map_or("", |p| p.project_name.as_str())
    }

    /// Copy with every section populated, for the edit dialog.
    #[must_use]
    pub fn filled(&self) -> Self {
        Self {
            id: self.id,
            project: Some(self.project.clone().unwrap_or_default()),
            parcel: Some(self.parcel.clone().unwrap_or_default()),
            building: Some(self.building.clone().unwrap_or_default()),
            income_and_expenses: Some(self.income_and_expenses.clone().unwrap_or_default()),
        }
    }
}

/// Filters for `/searchRealestate`. Blank filters are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub project_name: String,
    pub parcel_address: String,
    pub building_type: String,
    pub building_structure: String,
}

impl SearchParams {
    #[must_use]
    pub fn query_string(&self) -> String {
        [
            ("searchProjectName", &self.project_name),
            ("searchParcelAddress", &self.parcel_address),
            ("searchBuildingType", &self.building_type),
            ("searchBuildingStructure", &self.building_structure),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| format!("{key}={}", encode_query_component(value)))
        .collect::<Vec<_>>()
        .join("&")
    }
}

/// Percent-encode a query value (`application/x-www-form-urlencoded`, spaces as `+`).
#[must_use]
pub fn encode_query_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => out.push(char::from(byte)),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
