use serde::{Deserialize, Serialize};

/// Self-description served at `GET /`: every resource path and the HTTP
/// methods it answers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRoot {
    pub name: String,
    pub version: String,
    pub resources: Vec<ApiResource>,
}

impl ApiRoot {
    pub fn new(resources: Vec<ApiResource>) -> Self {
        Self {
            name: "cliento".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resources,
        }
    }
}

/// One routed path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResource {
    pub name: String,
    pub path: String,
    pub methods: Vec<String>,
    pub authenticated: bool,
}

impl ApiResource {
    /// A CRUD collection: `/<name>/` and `/<name>/{id}/`.
    pub fn collection(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: format!("/{}/", name),
            methods: ["GET", "POST", "PUT", "PATCH", "DELETE"]
                .into_iter()
                .map(String::from)
                .collect(),
            authenticated: true,
        }
    }

    pub fn endpoint(name: &str, path: &str, methods: &[&str], authenticated: bool) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
            authenticated,
        }
    }
}
