//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::TimeDelta;

use vaultlink_domain::config_entry::{ConfigEntry, ConnectionConfig};
use vaultlink_domain::connection::ConnectionInfo;
use vaultlink_domain::device::Device;
use vaultlink_domain::error::{SecretsServerError, VaultLinkError};
use vaultlink_domain::id::{DeviceId, IdentityId, RefreshTokenId};
use vaultlink_domain::identity::{AccessToken, RefreshToken, SystemIdentity};
use vaultlink_domain::session::LoginResponse;
use vaultlink_domain::time;

use crate::ports::{
    ConfigEntryRepository, DeviceRepository, IdentityProvider, IntegrationContext, KeyValueStore,
    SecretsServer,
};

pub fn connection_config() -> ConnectionConfig {
    ConnectionConfig {
        address: "http://vault.test".to_string(),
        username: "alice".to_string(),
        password: "hunter2".to_string(),
        email: "alice@example.com".to_string(),
    }
}

pub fn login_response(client_token: &str) -> LoginResponse {
    serde_json::from_value(serde_json::json!({
        "request_id": "req",
        "auth": { "client_token": client_token, "policies": ["default"] }
    }))
    .unwrap()
}

/// How the fake answers the next login calls.
#[derive(Debug, Clone)]
pub enum LoginBehavior {
    Succeed(String),
    Status(u16),
    Transport,
}

#[derive(Debug, Clone)]
pub struct PublishCall {
    pub email: String,
    pub client_token: String,
    pub info: ConnectionInfo,
}

pub struct FakeSecretsServer {
    login: Mutex<LoginBehavior>,
    publish_status: Mutex<Option<u16>>,
    pub login_calls: AtomicUsize,
    pub published: Mutex<Vec<PublishCall>>,
}

impl FakeSecretsServer {
    pub fn new(login: LoginBehavior) -> Self {
        Self {
            login: Mutex::new(login),
            publish_status: Mutex::new(None),
            login_calls: AtomicUsize::new(0),
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn set_login(&self, login: LoginBehavior) {
        *self.login.lock().unwrap() = login;
    }

    pub fn fail_publish_with(&self, status: u16) {
        *self.publish_status.lock().unwrap() = Some(status);
    }

    pub fn login_count(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn publish_calls(&self) -> Vec<PublishCall> {
        self.published.lock().unwrap().clone()
    }
}

impl SecretsServer for FakeSecretsServer {
    async fn login(&self, _config: &ConnectionConfig) -> Result<LoginResponse, SecretsServerError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.login.lock().unwrap().clone();
        match behavior {
            LoginBehavior::Succeed(token) => Ok(login_response(&token)),
            LoginBehavior::Status(status) => Err(SecretsServerError::Status {
                status,
                body: r#"{"errors":["permission denied"]}"#.to_string(),
            }),
            LoginBehavior::Transport => Err(SecretsServerError::Transport(Box::new(
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ))),
        }
    }

    async fn publish(
        &self,
        config: &ConnectionConfig,
        client_token: &str,
        info: &ConnectionInfo,
    ) -> Result<(), SecretsServerError> {
        let failure = *self.publish_status.lock().unwrap();
        if let Some(status) = failure {
            return Err(SecretsServerError::Status {
                status,
                body: String::new(),
            });
        }
        self.published.lock().unwrap().push(PublishCall {
            email: config.email.clone(),
            client_token: client_token.to_string(),
            info: info.clone(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryIdentityProvider {
    pub identities: Mutex<HashMap<IdentityId, SystemIdentity>>,
    pub refresh_tokens: Mutex<HashMap<RefreshTokenId, RefreshToken>>,
}

impl InMemoryIdentityProvider {
    pub fn identity_count(&self) -> usize {
        self.identities.lock().unwrap().len()
    }

    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.lock().unwrap().len()
    }

    pub fn insert_identity(&self, identity: SystemIdentity) {
        self.identities.lock().unwrap().insert(identity.id, identity);
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    async fn get_identity(&self, id: IdentityId) -> Result<Option<SystemIdentity>, VaultLinkError> {
        Ok(self.identities.lock().unwrap().get(&id).cloned())
    }

    async fn create_system_identity(
        &self,
        name: &str,
        group_ids: Vec<String>,
    ) -> Result<SystemIdentity, VaultLinkError> {
        let identity = SystemIdentity::new(name, group_ids);
        self.insert_identity(identity.clone());
        Ok(identity)
    }

    async fn create_refresh_token(
        &self,
        identity: &SystemIdentity,
        client_name: &str,
        access_token_expiration: TimeDelta,
    ) -> Result<RefreshToken, VaultLinkError> {
        let token = RefreshToken {
            id: RefreshTokenId::new(),
            identity_id: identity.id,
            client_name: client_name.to_string(),
            access_token_expiration,
            jwt_key: "key".to_string(),
            created_at: time::now(),
        };
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(token.id, token.clone());
        Ok(token)
    }

    fn create_access_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<AccessToken, VaultLinkError> {
        Ok(AccessToken::new(format!("access-{}", refresh_token.id)))
    }

    async fn list_refresh_tokens(
        &self,
        identity_id: IdentityId,
    ) -> Result<Vec<RefreshToken>, VaultLinkError> {
        Ok(self
            .refresh_tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.identity_id == identity_id)
            .cloned()
            .collect())
    }

    async fn remove_refresh_token(&self, id: RefreshTokenId) -> Result<(), VaultLinkError> {
        self.refresh_tokens.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    pub records: Mutex<HashMap<String, (u32, serde_json::Value)>>,
    pub saves: AtomicUsize,
}

impl KeyValueStore for InMemoryKeyValueStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, VaultLinkError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, data)| data.clone()))
    }

    async fn save(
        &self,
        key: &str,
        version: u32,
        data: serde_json::Value,
    ) -> Result<(), VaultLinkError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), (version, data));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDeviceRepo {
    pub store: Mutex<HashMap<DeviceId, Device>>,
}

impl DeviceRepository for InMemoryDeviceRepo {
    async fn create(&self, device: Device) -> Result<Device, VaultLinkError> {
        self.store.lock().unwrap().insert(device.id, device.clone());
        Ok(device)
    }

    async fn get_by_id(&self, id: DeviceId) -> Result<Option<Device>, VaultLinkError> {
        Ok(self.store.lock().unwrap().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Device>, VaultLinkError> {
        Ok(self.store.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_integration_unique_id(
        &self,
        integration: &str,
        unique_id: &str,
    ) -> Result<Option<Device>, VaultLinkError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .values()
            .find(|d| d.integration == integration && d.unique_id == unique_id)
            .cloned())
    }

    async fn update(&self, device: Device) -> Result<Device, VaultLinkError> {
        self.store.lock().unwrap().insert(device.id, device.clone());
        Ok(device)
    }
}

#[derive(Default)]
pub struct InMemoryConfigEntryRepo {
    pub entries: Mutex<Vec<ConfigEntry>>,
}

impl ConfigEntryRepository for InMemoryConfigEntryRepo {
    async fn create(&self, entry: ConfigEntry) -> Result<ConfigEntry, VaultLinkError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn get_all(&self) -> Result<Vec<ConfigEntry>, VaultLinkError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn find_by_unique_id(
        &self,
        unique_id: &str,
    ) -> Result<Option<ConfigEntry>, VaultLinkError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.unique_id == unique_id)
            .cloned())
    }
}

/// Context that records registered devices.
#[derive(Default)]
pub struct RecordingContext {
    pub devices: Mutex<Vec<Device>>,
}

impl IntegrationContext for RecordingContext {
    async fn upsert_device(&self, device: Device) -> Result<Device, VaultLinkError> {
        self.devices.lock().unwrap().push(device.clone());
        Ok(device)
    }
}
