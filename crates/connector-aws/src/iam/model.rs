//! IAM domain records, shaped after the service's response fields.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cumulo_spi::SchemaObject;

/// An IAM user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub path: String,
    pub user_name: String,
    pub user_id: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_last_used: Option<DateTime<Utc>>,
}

impl SchemaObject for User {
    const CANONICAL_NAME: &'static str = "aws.iam.user";
}

/// An MFA device assigned to a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MfaDevice {
    pub user_name: String,
    pub serial_number: String,
    pub enable_date: DateTime<Utc>,
}

impl SchemaObject for MfaDevice {
    const CANONICAL_NAME: &'static str = "aws.iam.mfa-device";
}

/// The account-wide password policy.
///
/// Accounts without a policy produce no record at all rather than a record
/// of nulls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PasswordPolicy {
    #[serde(default)]
    pub minimum_password_length: Option<u32>,
    #[serde(default)]
    pub require_symbols: bool,
    #[serde(default)]
    pub require_numbers: bool,
    #[serde(default)]
    pub require_uppercase_characters: bool,
    #[serde(default)]
    pub require_lowercase_characters: bool,
    #[serde(default)]
    pub allow_users_to_change_password: bool,
    #[serde(default)]
    pub expire_passwords: bool,
    #[serde(default)]
    pub max_password_age: Option<u32>,
    #[serde(default)]
    pub password_reuse_prevention: Option<u32>,
    #[serde(default)]
    pub hard_expiry: Option<bool>,
}

impl SchemaObject for PasswordPolicy {
    const CANONICAL_NAME: &'static str = "aws.iam.password-policy";
}

/// Entity usage and quota counters for one account.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSummary {
    /// Counter name to value, as reported by the service.
    #[serde(default)]
    pub summary_map: IndexMap<String, i64>,
}

impl SchemaObject for AccountSummary {
    const CANONICAL_NAME: &'static str = "aws.iam.account-summary";
}
