//! Static "general contract" call descriptors.
//!
//! Loaded once at startup from JSON. The poller does not execute these; an
//! external multicall job publishes their results through
//! [`CacheWriter::write_general_batch`](crate::cache::CacheWriter::write_general_batch),
//! and the read API exposes one route per keyless method.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use strata_core::{StrataError, StrataResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContractCall {
    pub name: String,
    pub address: String,
    /// Solidity-style signatures, e.g. `getUnderlyingPrice(address)`.
    pub methods: Vec<String>,
    /// One argument list per method.
    #[serde(default)]
    pub args: Vec<Vec<Value>>,
    /// Static cache keys, one per method. When present the methods are not routed.
    #[serde(default)]
    pub keys: Vec<String>,
}

fn valid_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn arg_segment(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ContractCall {
    pub fn validate(&self) -> StrataResult<()> {
        if !valid_segment(&self.name) {
            return Err(StrataError::Config(format!(
                "contract name {:?} must be non-empty [A-Za-z0-9_.-]",
                self.name
            )));
        }
        if self.args.len() != self.methods.len() {
            return Err(StrataError::Config(format!(
                "contract {}: {} methods but {} argument lists",
                self.name,
                self.methods.len(),
                self.args.len()
            )));
        }
        if !self.keys.is_empty() && self.keys.len() != self.methods.len() {
            return Err(StrataError::Config(format!(
                "contract {}: {} methods but {} keys",
                self.name,
                self.methods.len(),
                self.keys.len()
            )));
        }
        for route in self.routes() {
            let bad = route
                .trim_start_matches('/')
                .split('/')
                .any(|seg| !valid_segment(seg));
            if bad {
                return Err(StrataError::Config(format!(
                    "contract {}: route {route} has an invalid segment",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Routes for keyless methods: `/<name>/<method>[/<first arg>]`.
    pub fn routes(&self) -> Vec<String> {
        if !self.keys.is_empty() {
            return Vec::new();
        }
        self.methods
            .iter()
            .enumerate()
            .map(|(i, method)| {
                let method_name = method.split('(').next().unwrap_or(method);
                let mut route = format!("/{}/{}", self.name, method_name);
                if let Some(first) = self.args.get(i).and_then(|a| a.first()) {
                    route.push('/');
                    route.push_str(&arg_segment(first));
                }
                route
            })
            .collect()
    }

    /// Cache key per method: the static key if given, else the route without
    /// its leading slash.
    pub fn cache_keys(&self) -> Vec<String> {
        if !self.keys.is_empty() {
            return self.keys.clone();
        }
        self.routes()
            .into_iter()
            .map(|r| r.trim_start_matches('/').to_owned())
            .collect()
    }
}

pub fn parse_contracts(json: &str) -> StrataResult<Vec<ContractCall>> {
    let calls: Vec<ContractCall> = serde_json::from_str(json)
        .map_err(|e| StrataError::Config(format!("contracts file is not valid: {e}")))?;
    for call in &calls {
        call.validate()?;
    }

    let mut seen = std::collections::HashSet::new();
    for route in calls.iter().flat_map(ContractCall::routes) {
        if route.starts_with("/v1/") || !seen.insert(route.clone()) {
            return Err(StrataError::Config(format!(
                "contract route {route} collides with another route"
            )));
        }
    }
    Ok(calls)
}

pub fn load_contracts(path: &Path) -> StrataResult<Vec<ContractCall>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        StrataError::Config(format!("cannot read contracts file {}: {e}", path.display()))
    })?;
    let calls = parse_contracts(&json)?;
    tracing::info!(path = %path.display(), contracts = calls.len(), "loaded contract calls");
    Ok(calls)
}
