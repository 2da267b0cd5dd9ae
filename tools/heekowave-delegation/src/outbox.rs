//! File-backed delegation relay.
//!
//! Signed delegations are appended to a JSON outbox that the relayer service
//! picks up. The file is rewritten atomically on every submission.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, ensure, Context, Result};
use heekowave_caveat_codec::{CodecError, DelegationRelay};
use heekowave_delegation_types::DelegationInfo;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub struct OutboxRelay {
    path: PathBuf,
    network: String,
}

impl OutboxRelay {
    pub fn new(path: impl Into<PathBuf>, network: impl Into<String>) -> Self {
        Self { path: path.into(), network: network.into() }
    }

    fn append(&self, info: &DelegationInfo) -> Result<usize> {
        let now = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        let existing = if self.path.exists() {
            fs::read_to_string(&self.path)
                .with_context(|| format!("failed reading {}", self.path.display()))?
        } else {
            String::new()
        };

        let mut root: Value = if existing.trim().is_empty() {
            json!({ "network": self.network, "delegations": [] })
        } else {
            serde_json::from_str(&existing)
                .with_context(|| format!("failed parsing JSON in {}", self.path.display()))?
        };
        self.check_outbox(&root)?;

        root["network"] = json!(self.network);
        root["updated_at"] = json!(now);
        if root.get("delegations").is_none() {
            root["delegations"] = json!([]);
        }

        let mut entry = serde_json::to_value(info).context("failed serialising delegation")?;
        entry["queued_at"] = json!(now);

        let delegations = root["delegations"]
            .as_array_mut()
            .context("outbox `delegations` is not an array")?;
        delegations.push(entry);
        let queued = delegations.len();

        write_json_atomic(&self.path, &root)?;
        Ok(queued)
    }

    /// Refuse to rewrite a file that is not an outbox for this network.
    fn check_outbox(&self, root: &Value) -> Result<()> {
        let path = self.path.display();
        let Some(fields) = root.as_object() else {
            bail!("{path} is not an outbox: top-level JSON is not an object");
        };
        if let Some(delegations) = fields.get("delegations") {
            ensure!(delegations.is_array(), "{path} is not an outbox: `delegations` is not an array");
        }
        if let Some(network) = fields.get("network") {
            ensure!(
                network.as_str() == Some(self.network.as_str()),
                "{path} queues delegations for network {network}, not {}",
                self.network
            );
        }
        Ok(())
    }
}

impl DelegationRelay for OutboxRelay {
    fn submit(&self, info: &DelegationInfo) -> Result<String, CodecError> {
        let queued = self.append(info).map_err(|e| CodecError::Relay(format!("{e:#}")))?;
        Ok(format!("{}#{}", self.path.display(), queued - 1))
    }
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising outbox JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
