//! Directory session
//!
//! The [`DirectorySession`] trait exposes the four primitives the account
//! engine needs (`search`, `modify`, `add`, `unbind`) and
//! [`LdapDirectorySession`] implements them over ldap3.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, LdapResult, Mod, SearchEntry};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::DirectoryConfig;
use crate::entry::{AttributeValue, Entry};
use crate::error::{DirectoryError, DirectoryResult};
use crate::operation::{AddRequest, ModifyOp, SearchScope};

/// An authenticated channel to the directory.
///
/// One session per unit of work; `unbind` must be called on every exit path.
/// Implementations are not required to support concurrent use from multiple
/// threads unless they document it.
#[async_trait]
pub trait DirectorySession: Send + Sync {
    /// Search under `base_dn` and return matching entries.
    ///
    /// An empty result set is not an error; it is the "no matching entry"
    /// outcome. Callers that require exactly one entry enforce that
    /// themselves.
    async fn search(
        &self,
        base_dn: &str,
        scope: SearchScope,
        filter: &str,
        attrs: &[&str],
    ) -> DirectoryResult<Vec<Entry>>;

    /// Apply attribute modifications to the entry at `dn`.
    async fn modify(&self, dn: &str, ops: Vec<ModifyOp>) -> DirectoryResult<()>;

    /// Create a new entry at `dn`.
    async fn add(&self, dn: &str, request: AddRequest) -> DirectoryResult<()>;

    /// Close the session. Idempotent; safe to call after a failure.
    async fn unbind(&self) -> DirectoryResult<()>;

    /// Whether the channel is encrypted end to end. Credential writes are
    /// refused by Active Directory on channels that are not.
    fn is_secure(&self) -> bool;
}

/// Map a server result code to the domain error taxonomy.
///
/// Directory-standard codes; `dn` names the entry the operation targeted so
/// lookup failures stay actionable.
fn result_code_error(rc: u32, text: &str, dn: &str) -> DirectoryError {
    match rc {
        3 => DirectoryError::Timeout {
            message: format!("server time limit exceeded: {text}"),
        },
        19 => DirectoryError::ConstraintViolation {
            diagnostic: text.to_string(),
        },
        32 => DirectoryError::NotFound { dn: dn.to_string() },
        49 => DirectoryError::BindFailed,
        50 => DirectoryError::InsufficientAccessRights {
            diagnostic: text.to_string(),
        },
        53 => DirectoryError::PolicyViolation {
            diagnostic: text.to_string(),
        },
        68 => DirectoryError::AlreadyExists { dn: dn.to_string() },
        _ => DirectoryError::operation_failed(rc, text),
    }
}

/// Check a server result, mapping non-zero codes to errors.
fn check_result(result: &LdapResult, dn: &str) -> DirectoryResult<()> {
    if result.rc != 0 {
        return Err(result_code_error(result.rc, &result.text, dn));
    }
    Ok(())
}

/// Map a transport-level ldap3 error.
fn transport_error(context: &str, err: LdapError) -> DirectoryError {
    match err {
        LdapError::Timeout { .. } => DirectoryError::Timeout {
            message: context.to_string(),
        },
        LdapError::LdapResult { result } => result_code_error(result.rc, &result.text, context),
        other => DirectoryError::connection_failed_with_source(context.to_string(), other),
    }
}

/// ldap3-backed directory session.
pub struct LdapDirectorySession {
    /// Server URL, for diagnostics.
    url: String,

    /// Whether the connection is SSL or STARTTLS.
    secure: bool,

    /// The LDAP handle; taken on unbind.
    connection: Arc<RwLock<Option<Ldap>>>,
}

impl LdapDirectorySession {
    /// Connect and authenticate against the configured server.
    ///
    /// Performs a simple bind with the configured DN and password. The
    /// connection driver runs on a spawned task until unbind.
    pub async fn bind(config: &DirectoryConfig) -> DirectoryResult<Self> {
        config.validate()?;

        let url = config.url();
        debug!(url = %url, "Connecting to directory server");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .set_starttls(config.use_starttls);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &url)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("failed to connect to directory server at {url}"),
                    e,
                )
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bind_dn = &config.bind_dn;
        let bind_password = config.bind_password.as_deref().unwrap_or("");

        debug!(bind_dn = %bind_dn, "Performing simple bind");

        let result = ldap
            .simple_bind(bind_dn, bind_password)
            .await
            .map_err(|e| transport_error("bind request failed", e))?;

        if result.rc == 49 {
            return Err(DirectoryError::BindFailed);
        }
        check_result(&result, bind_dn)?;

        info!(url = %url, "Directory session established");

        Ok(Self {
            url,
            secure: config.is_secure(),
            connection: Arc::new(RwLock::new(Some(ldap))),
        })
    }

    /// Clone the live handle, or fail if the session was unbound.
    async fn handle(&self) -> DirectoryResult<Ldap> {
        let guard = self.connection.read().await;
        guard
            .as_ref()
            .cloned()
            .ok_or_else(|| DirectoryError::connection_failed("session is closed"))
    }

    /// Convert an ldap3 search entry to the entry model, keeping binary
    /// attributes binary.
    fn convert_entry(entry: SearchEntry) -> Entry {
        let mut converted = Entry::new(entry.dn);

        for (name, values) in entry.attrs {
            converted.set(name, values.into_iter().map(AttributeValue::Text).collect());
        }

        for (name, values) in entry.bin_attrs {
            let values: Vec<AttributeValue> =
                values.into_iter().map(AttributeValue::Binary).collect();
            converted
                .attrs
                .entry(name)
                .or_default()
                .extend(values);
        }

        converted
    }

    /// Render a modify operation into the wire form. Attribute names and
    /// values both travel as bytes so binary credential values survive
    /// untouched.
    fn convert_ops(ops: Vec<ModifyOp>) -> Vec<Mod<Vec<u8>>> {
        fn byte_set(values: Vec<AttributeValue>) -> HashSet<Vec<u8>> {
            values
                .into_iter()
                .map(|v| v.as_bytes().to_vec())
                .collect()
        }

        ops.into_iter()
            .map(|op| match op {
                ModifyOp::Add { attribute, values } => {
                    Mod::Add(attribute.into_bytes(), byte_set(values))
                }
                ModifyOp::Delete { attribute, values } => {
                    Mod::Delete(attribute.into_bytes(), byte_set(values))
                }
                ModifyOp::Replace { attribute, values } => {
                    Mod::Replace(attribute.into_bytes(), byte_set(values))
                }
            })
            .collect()
    }
}

#[async_trait]
impl DirectorySession for LdapDirectorySession {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn search(
        &self,
        base_dn: &str,
        scope: SearchScope,
        filter: &str,
        attrs: &[&str],
    ) -> DirectoryResult<Vec<Entry>> {
        let mut ldap = self.handle().await?;

        let ldap3::SearchResult(result_entries, result) = ldap
            .search(base_dn, scope.into(), filter, attrs.to_vec())
            .await
            .map_err(|e| transport_error("search request failed", e))?;

        check_result(&result, base_dn)?;

        let entries: Vec<Entry> = result_entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(Self::convert_entry)
            .collect();

        debug!(base_dn = %base_dn, count = entries.len(), "Search completed");

        Ok(entries)
    }

    #[instrument(skip(self, ops), fields(url = %self.url))]
    async fn modify(&self, dn: &str, ops: Vec<ModifyOp>) -> DirectoryResult<()> {
        let mut ldap = self.handle().await?;

        let mods = Self::convert_ops(ops);
        let result = ldap
            .modify(dn, mods)
            .await
            .map_err(|e| transport_error("modify request failed", e))?;

        check_result(&result, dn)?;

        debug!(dn = %dn, "Modify completed");
        Ok(())
    }

    #[instrument(skip(self, request), fields(url = %self.url))]
    async fn add(&self, dn: &str, request: AddRequest) -> DirectoryResult<()> {
        let mut ldap = self.handle().await?;

        let attrs: Vec<(Vec<u8>, HashSet<Vec<u8>>)> = request
            .iter()
            .map(|(name, values)| {
                (
                    name.as_bytes().to_vec(),
                    values.iter().map(|v| v.as_bytes().to_vec()).collect(),
                )
            })
            .collect();

        let result = ldap
            .add(dn, attrs)
            .await
            .map_err(|e| transport_error("add request failed", e))?;

        check_result(&result, dn)?;

        debug!(dn = %dn, "Entry added");
        Ok(())
    }

    async fn unbind(&self) -> DirectoryResult<()> {
        let mut guard = self.connection.write().await;
        if let Some(mut ldap) = guard.take() {
            if let Err(e) = ldap.unbind().await {
                warn!(error = %e, "Error during unbind");
            }
            info!(url = %self.url, "Directory session closed");
        }
        Ok(())
    }

    fn is_secure(&self) -> bool {
        self.secure
    }
}

impl std::fmt::Debug for LdapDirectorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapDirectorySession")
            .field("url", &self.url)
            .field("secure", &self.secure)
            .finish()
    }
}
