//! In-memory directory fakes and a recording audit sink.
#![allow(dead_code)] // each test binary uses a different subset

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use dirsync_connector::{
    AdminType, AuthRole, AuthUser, ConnectorError, ConnectorResult, NomisRole, NomisUser,
    SourceDirectory, TargetDirectory,
};
use dirsync_engine::AuditSink;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn auth_role(code: &str, name: &str, admin_type: &[AdminType]) -> AuthRole {
    AuthRole {
        role_code: code.to_string(),
        role_name: name.to_string(),
        admin_type: admin_type.to_vec(),
    }
}

pub fn nomis_role(code: &str, name: &str, admin_role_only: bool) -> NomisRole {
    NomisRole {
        code: code.to_string(),
        name: name.to_string(),
        admin_role_only,
    }
}

pub fn auth_user(username: &str, email: Option<&str>) -> AuthUser {
    AuthUser {
        username: username.to_string(),
        email: email.map(str::to_string),
    }
}

pub fn nomis_user(username: &str, email: Option<&str>) -> NomisUser {
    NomisUser {
        username: username.to_string(),
        email: email.map(str::to_string),
    }
}

fn write_error(detail: &str) -> ConnectorError {
    ConnectorError::HttpStatus {
        status: 500,
        detail: detail.to_string(),
    }
}

/// Fake authentication directory.
#[derive(Default)]
pub struct FakeSource {
    pub roles: Mutex<Vec<AuthRole>>,
    pub users: Mutex<Vec<AuthUser>>,
    pub fail_fetch_roles: Mutex<bool>,
    pub fail_fetch_users: Mutex<bool>,
}

impl FakeSource {
    pub fn with_roles(roles: Vec<AuthRole>) -> Self {
        Self {
            roles: Mutex::new(roles),
            ..Self::default()
        }
    }

    pub fn with_users(users: Vec<AuthUser>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub fn failing_role_fetch() -> Self {
        Self {
            fail_fetch_roles: Mutex::new(true),
            ..Self::default()
        }
    }

    pub fn failing_user_fetch() -> Self {
        Self {
            fail_fetch_users: Mutex::new(true),
            ..Self::default()
        }
    }
}

#[async_trait]
impl SourceDirectory for FakeSource {
    async fn fetch_all_roles(&self) -> ConnectorResult<Vec<AuthRole>> {
        if *self.fail_fetch_roles.lock().unwrap() {
            return Err(write_error("source role fetch down"));
        }
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn fetch_all_users(&self) -> ConnectorResult<Vec<AuthUser>> {
        if *self.fail_fetch_users.lock().unwrap() {
            return Err(write_error("source user fetch down"));
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_role(&self, _role: &AuthRole) -> ConnectorResult<()> {
        unreachable!("the engine never writes to the source directory");
    }

    async fn update_role(&self, _code: &str, _name: &str) -> ConnectorResult<()> {
        unreachable!("the engine never writes to the source directory");
    }

    async fn update_role_admin_type(
        &self,
        _code: &str,
        _types: &[AdminType],
    ) -> ConnectorResult<()> {
        unreachable!("the engine never writes to the source directory");
    }
}

/// Fake prison-systems directory that absorbs successful writes into its
/// role set, so a second reconciliation run sees the corrected state.
#[derive(Default)]
pub struct FakeTarget {
    pub roles: Mutex<Vec<NomisRole>>,
    pub users: Mutex<Vec<NomisUser>>,
    pub fail_fetch_roles: Mutex<bool>,
    pub fail_fetch_users: Mutex<bool>,
    /// Role codes whose create/update calls fail.
    pub failing_codes: Mutex<HashSet<String>>,
    pub created: Mutex<Vec<(String, String, bool)>>,
    pub updated: Mutex<Vec<(String, String, bool)>>,
}

impl FakeTarget {
    pub fn with_roles(roles: Vec<NomisRole>) -> Self {
        Self {
            roles: Mutex::new(roles),
            ..Self::default()
        }
    }

    pub fn with_users(users: Vec<NomisUser>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub fn failing_role_fetch() -> Self {
        Self {
            fail_fetch_roles: Mutex::new(true),
            ..Self::default()
        }
    }

    pub fn failing_user_fetch() -> Self {
        Self {
            fail_fetch_users: Mutex::new(true),
            ..Self::default()
        }
    }

    pub fn fail_writes_for(&self, code: &str) {
        self.failing_codes.lock().unwrap().insert(code.to_string());
    }

    pub fn write_count(&self) -> usize {
        self.created.lock().unwrap().len() + self.updated.lock().unwrap().len()
    }
}

#[async_trait]
impl TargetDirectory for FakeTarget {
    async fn fetch_all_roles(&self) -> ConnectorResult<Vec<NomisRole>> {
        if *self.fail_fetch_roles.lock().unwrap() {
            return Err(write_error("target role fetch down"));
        }
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn fetch_all_users(&self) -> ConnectorResult<Vec<NomisUser>> {
        if *self.fail_fetch_users.lock().unwrap() {
            return Err(write_error("target user fetch down"));
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_role(
        &self,
        code: &str,
        name: &str,
        admin_role_only: bool,
    ) -> ConnectorResult<()> {
        self.created
            .lock()
            .unwrap()
            .push((code.to_string(), name.to_string(), admin_role_only));
        if self.failing_codes.lock().unwrap().contains(code) {
            return Err(write_error("create rejected"));
        }
        self.roles.lock().unwrap().push(NomisRole {
            code: code.to_string(),
            name: name.to_string(),
            admin_role_only,
        });
        Ok(())
    }

    async fn update_role(
        &self,
        code: &str,
        name: &str,
        admin_role_only: bool,
    ) -> ConnectorResult<()> {
        self.updated
            .lock()
            .unwrap()
            .push((code.to_string(), name.to_string(), admin_role_only));
        if self.failing_codes.lock().unwrap().contains(code) {
            return Err(write_error("update rejected"));
        }
        let mut roles = self.roles.lock().unwrap();
        if let Some(role) = roles.iter_mut().find(|r| r.code == code) {
            role.name = name.to_string();
            role.admin_role_only = admin_role_only;
        }
        Ok(())
    }
}

/// Audit sink that records every emitted event.
#[derive(Default)]
pub struct RecordingAudit {
    pub events: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl RecordingAudit {
    pub fn events_named(&self, name: &str) -> Vec<HashMap<String, String>> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(event, _)| event == name)
            .map(|(_, attrs)| attrs.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl AuditSink for RecordingAudit {
    fn emit(&self, event: &str, attributes: HashMap<String, String>) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), attributes));
    }
}
