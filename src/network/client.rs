//! API client - stateless request/response translation for the finance API
//!
//! Every operation is a single round trip: build the request (with a bearer
//! token where required), await the response, map non-2xx statuses to
//! `ApiError::Status` carrying the server-provided message. No retries,
//! no caching.

use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{Account, DashboardData, NewTransaction, Transaction, User};

/// Fallback when the error body is unparsable
const GENERIC_ERROR: &str = "something went wrong";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
struct AccountsEnvelope {
    accounts: Vec<Account>,
}

#[derive(Deserialize)]
struct TransactionsEnvelope {
    transactions: Vec<Transaction>,
}

/// Login response as observed in the wild: the access token arrives either
/// nested under `tokens.access` or as a top-level `access_token`, and user
/// identity fields may be a `user` object, loose top-level fields, or absent.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    tokens: Option<TokenPair>,
    access_token: Option<String>,
    user: Option<User>,
    user_id: Option<i64>,
    username: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenPair {
    access: Option<String>,
}

impl LoginResponse {
    /// Extract the access token and user identity, tolerating both observed
    /// shapes. Missing identity fields fall back to the submitted username.
    pub fn into_auth(self, fallback_username: &str) -> Result<(String, User), ApiError> {
        let token = self
            .tokens
            .and_then(|t| t.access)
            .or(self.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Auth("access token missing in login response".to_string()))?;

        let user = self.user.unwrap_or_else(|| User {
            id: self.user_id.unwrap_or_default(),
            username: self
                .username
                .unwrap_or_else(|| fallback_username.to_string()),
            email: self.email.unwrap_or_default(),
        });

        Ok((token, user))
    }
}

/// Check the status and parse a JSON payload, or extract the server error
async fn parse<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let resp = check(resp).await?;
    Ok(resp.json::<T>().await?)
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| GENERIC_ERROR.to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

// ============================================================================
// Auth
// ============================================================================

pub async fn login(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<(String, User), ApiError> {
    let resp = client
        .post(format!("{base_url}/login"))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await?;
    let body: LoginResponse = parse(resp).await?;
    body.into_auth(username)
}

pub async fn register(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let resp = client
        .post(format!("{base_url}/register"))
        .json(&serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

/// Register, then log in with the same credentials: the register endpoint
/// does not return a full user profile, so the follow-up login populates it.
pub async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(String, User), ApiError> {
    register(client, base_url, username, email, password).await?;
    login(client, base_url, username, password).await
}

// ============================================================================
// Accounts
// ============================================================================

pub async fn list_accounts(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
) -> Result<Vec<Account>, ApiError> {
    let resp = client
        .get(format!("{base_url}/accounts"))
        .bearer_auth(token)
        .send()
        .await?;
    let body: AccountsEnvelope = parse(resp).await?;
    Ok(body.accounts)
}

pub async fn create_account(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    balance: f64,
) -> Result<(), ApiError> {
    let resp = client
        .post(format!("{base_url}/accounts"))
        .bearer_auth(token)
        .json(&serde_json::json!({ "name": name, "balance": balance }))
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

pub async fn rename_account(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    account_id: i64,
    name: &str,
) -> Result<(), ApiError> {
    let resp = client
        .put(format!("{base_url}/accounts/{account_id}"))
        .bearer_auth(token)
        .json(&serde_json::json!({ "name": name }))
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

pub async fn delete_account(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    account_id: i64,
) -> Result<(), ApiError> {
    let resp = client
        .delete(format!("{base_url}/accounts/{account_id}"))
        .bearer_auth(token)
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

// ============================================================================
// Transactions
// ============================================================================

pub async fn list_transactions(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    account_id: Option<i64>,
) -> Result<Vec<Transaction>, ApiError> {
    let mut req = client
        .get(format!("{base_url}/transactions"))
        .bearer_auth(token);
    if let Some(account_id) = account_id {
        req = req.query(&[("account_id", account_id)]);
    }
    let body: TransactionsEnvelope = parse(req.send().await?).await?;
    Ok(body.transactions)
}

pub async fn create_transaction(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    transaction: &NewTransaction,
) -> Result<(), ApiError> {
    let resp = client
        .post(format!("{base_url}/transactions"))
        .bearer_auth(token)
        .json(transaction)
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

pub async fn delete_transaction(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    transaction_id: i64,
) -> Result<(), ApiError> {
    let resp = client
        .delete(format!("{base_url}/transactions/{transaction_id}"))
        .bearer_auth(token)
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

// ============================================================================
// Dashboard
// ============================================================================

pub async fn get_dashboard(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
) -> Result<DashboardData, ApiError> {
    let resp = client
        .get(format!("{base_url}/dashboard"))
        .bearer_auth(token)
        .send()
        .await?;
    parse(resp).await
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_token_nested_under_tokens_access() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"tokens": {"access": "abc"}, "user_id": 3, "username": "alice", "email": "a@b.c"}"#,
        )
        .unwrap();
        let (token, user) = body.into_auth("alice").unwrap();
        assert_eq!(token, "abc");
        assert_eq!(user.id, 3);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@b.c");
    }

    #[test]
    fn login_token_as_top_level_field() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"access_token": "xyz", "user": {"id": 5, "username": "bob", "email": "b@c.d"}}"#,
        )
        .unwrap();
        let (token, user) = body.into_auth("bob").unwrap();
        assert_eq!(token, "xyz");
        assert_eq!(user.id, 5);
    }

    #[test]
    fn nested_token_wins_over_top_level() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"tokens": {"access": "nested"}, "access_token": "flat"}"#,
        )
        .unwrap();
        let (token, _) = body.into_auth("x").unwrap();
        assert_eq!(token, "nested");
    }

    #[test]
    fn missing_identity_falls_back_to_submitted_username() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"access_token": "tok"}"#).unwrap();
        let (_, user) = body.into_auth("carol").unwrap();
        assert_eq!(user.username, "carol");
        assert_eq!(user.id, 0);
        assert_eq!(user.email, "");
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"message": "welcome"}"#).unwrap();
        let err = body.into_auth("x").unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
    }

    #[test]
    fn empty_token_is_an_auth_error() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"tokens": {"access": ""}}"#).unwrap();
        assert!(body.into_auth("x").is_err());
    }
}
