use cucumber::World;
use serde_json::Value;

/// Bearer token the test runner configures as admin.
pub const ADMIN_TOKEN: &str = "admin-token";
/// A well-formed token that carries no privileges.
pub const USER_TOKEN: &str = "u1-token";

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct CertWorld {
    pub server_addr: Option<String>,
    pub client: reqwest::Client,
    pub last_status: Option<u16>,
    pub last_body: Option<Value>,
}

impl CertWorld {
    pub fn new() -> Self {
        Self {
            server_addr: None,
            client: reqwest::Client::new(),
            last_status: None,
            last_body: None,
        }
    }

    pub fn url(&self, path: &str) -> String {
        let addr = self
            .server_addr
            .as_deref()
            .expect("server_addr not initialized");
        format!("{addr}{path}")
    }

    /// Map a role named in a step to the token it sends.
    pub fn token_for(role: &str) -> Option<&'static str> {
        match role {
            "admin" => Some(ADMIN_TOKEN),
            "user" => Some(USER_TOKEN),
            "anonymous" => None,
            other => panic!("unknown role '{other}'"),
        }
    }

    pub fn body(&self) -> &Value {
        self.last_body.as_ref().expect("no response")
    }
}

impl Default for CertWorld {
    fn default() -> Self {
        Self::new()
    }
}
