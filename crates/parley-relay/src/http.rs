// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP clients for the account and contact services.
//!
//! Both services live under `relay.http_url` and speak JSON. A definite
//! answer from a service maps to an outcome value; only transport failures
//! are errors.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use tracing::{debug, warn};

use parley_config::model::RelayConfig;
use parley_core::{
    AccountOutcome, AccountService, AdapterType, ContactOutcome, ContactService, HealthStatus,
    Identifier, LoginOutcome, ParleyError, PluginAdapter,
};

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct NewContact<'a> {
    contact_of: &'a str,
    contact_name: &'a str,
}

/// Shared reqwest client plus the service base URL.
#[derive(Debug, Clone)]
struct ServiceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ServiceClient {
    fn new(config: &RelayConfig) -> Result<Self, ParleyError> {
        let base_url = Url::parse(&config.http_url).map_err(|e| {
            ParleyError::Config(format!("invalid service url `{}`: {e}", config.http_url))
        })?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ParleyError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<StatusCode, ParleyError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ParleyError::connection_with(format!("POST {path} failed"), e))?;
        Ok(response.status())
    }
}

/// Account service client: `POST /create_account`, `POST /login`.
#[derive(Debug, Clone)]
pub struct HttpAccountService {
    inner: ServiceClient,
}

impl HttpAccountService {
    pub fn new(config: &RelayConfig) -> Result<Self, ParleyError> {
        Ok(Self {
            inner: ServiceClient::new(config)?,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpAccountService {
    fn name(&self) -> &str {
        "http-account"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Account
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn create_account(
        &self,
        username: &Identifier,
        password: &str,
    ) -> Result<AccountOutcome, ParleyError> {
        let body = Credentials {
            username: username.as_str(),
            password,
        };
        let status = self.inner.post_json("/create_account", &body).await?;
        debug!(user = %username, %status, "create_account answered");
        match status {
            StatusCode::CONFLICT => Ok(AccountOutcome::Conflict),
            s if s.is_success() => Ok(AccountOutcome::Created),
            s => Err(ParleyError::Auth {
                message: format!("account service refused to create `{username}` ({s})"),
            }),
        }
    }

    async fn login(
        &self,
        username: &Identifier,
        password: &str,
    ) -> Result<LoginOutcome, ParleyError> {
        let body = Credentials {
            username: username.as_str(),
            password,
        };
        let status = self.inner.post_json("/login", &body).await?;
        debug!(user = %username, %status, "login answered");
        Ok(match status {
            StatusCode::OK => LoginOutcome::Success,
            StatusCode::NOT_FOUND => LoginOutcome::NotFound,
            s => LoginOutcome::Rejected(s.as_u16()),
        })
    }
}

/// Contact service client: `POST /add_contact`, `GET /contacts?owner=`.
#[derive(Debug, Clone)]
pub struct HttpContactService {
    inner: ServiceClient,
}

impl HttpContactService {
    pub fn new(config: &RelayConfig) -> Result<Self, ParleyError> {
        Ok(Self {
            inner: ServiceClient::new(config)?,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpContactService {
    fn name(&self) -> &str {
        "http-contacts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Contacts
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl ContactService for HttpContactService {
    async fn add_contact(
        &self,
        owner: &Identifier,
        name: &Identifier,
    ) -> Result<ContactOutcome, ParleyError> {
        let body = NewContact {
            contact_of: owner.as_str(),
            contact_name: name.as_str(),
        };
        let status = self.inner.post_json("/add_contact", &body).await?;
        if status.is_success() {
            Ok(ContactOutcome::Created)
        } else {
            warn!(owner = %owner, contact = %name, %status, "contact service rejected contact");
            Ok(ContactOutcome::Rejected)
        }
    }

    async fn get_contacts(&self, owner: &Identifier) -> Result<Vec<String>, ParleyError> {
        let mut url = self.inner.endpoint("/contacts");
        url.query_pairs_mut().append_pair("owner", owner.as_str());

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ParleyError::connection_with("GET /contacts failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParleyError::Internal(format!(
                "contact service answered {status} for `{owner}`"
            )));
        }
        response
            .json::<Vec<String>>()
            .await
            .map_err(|e| ParleyError::Internal(format!("invalid contact list: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> RelayConfig {
        RelayConfig {
            http_url: server.uri(),
            ..RelayConfig::default()
        }
    }

    fn ident(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn login_maps_status_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(serde_json::json!({"username": "alice", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(serde_json::json!({"username": "ghost", "password": "pw"})))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(serde_json::json!({"username": "alice", "password": "bad"})))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let accounts = HttpAccountService::new(&config_for(&server)).unwrap();
        assert_eq!(
            accounts.login(&ident("alice"), "pw").await.unwrap(),
            LoginOutcome::Success
        );
        assert_eq!(
            accounts.login(&ident("ghost"), "pw").await.unwrap(),
            LoginOutcome::NotFound
        );
        assert_eq!(
            accounts.login(&ident("alice"), "bad").await.unwrap(),
            LoginOutcome::Rejected(401)
        );
    }

    #[tokio::test]
    async fn create_account_reports_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create_account"))
            .and(body_json(serde_json::json!({"username": "alice", "password": "pw"})))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/create_account"))
            .and(body_json(serde_json::json!({"username": "bob", "password": "pw"})))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let accounts = HttpAccountService::new(&config_for(&server)).unwrap();
        assert_eq!(
            accounts.create_account(&ident("alice"), "pw").await.unwrap(),
            AccountOutcome::Created
        );
        assert_eq!(
            accounts.create_account(&ident("bob"), "pw").await.unwrap(),
            AccountOutcome::Conflict
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_a_connection_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = RelayConfig {
            http_url: format!("http://{addr}"),
            ..RelayConfig::default()
        };

        let accounts = HttpAccountService::new(&config).unwrap();
        let err = accounts.login(&ident("alice"), "pw").await.unwrap_err();
        assert!(err.is_connection(), "got {err}");
        let err = accounts.create_account(&ident("alice"), "pw").await.unwrap_err();
        assert!(err.is_connection(), "got {err}");

        let contacts = HttpContactService::new(&config).unwrap();
        let err = contacts.add_contact(&ident("alice"), &ident("bob")).await.unwrap_err();
        assert!(err.is_connection(), "got {err}");
    }

    #[tokio::test]
    async fn contacts_round_trip_through_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add_contact"))
            .and(body_json(
                serde_json::json!({"contact_of": "alice", "contact_name": "bob"}),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/contacts"))
            .and(query_param("owner", "alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["bob"])))
            .mount(&server)
            .await;

        let contacts = HttpContactService::new(&config_for(&server)).unwrap();
        assert_eq!(
            contacts.add_contact(&ident("alice"), &ident("bob")).await.unwrap(),
            ContactOutcome::Created
        );
        assert_eq!(
            contacts.get_contacts(&ident("alice")).await.unwrap(),
            vec!["bob".to_string()]
        );
    }

    #[tokio::test]
    async fn rejected_contact_is_an_outcome_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add_contact"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let contacts = HttpContactService::new(&config_for(&server)).unwrap();
        assert_eq!(
            contacts.add_contact(&ident("alice"), &ident("bob")).await.unwrap(),
            ContactOutcome::Rejected
        );
    }
}
