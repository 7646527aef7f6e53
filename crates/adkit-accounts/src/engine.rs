//! Account mutation engine
//!
//! Builds and issues directory modify/add requests for account intents and
//! interprets the session's results into typed outcomes. Each operation is
//! one directory round trip; there are no retries and no compensating
//! transactions; mutations are not idempotent, so retry policy belongs to
//! the caller.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument};

use adkit_directory::{
    AddRequest, AttributeValue, DirectoryError, DirectoryResult, DirectorySession, Entry, ModifyOp,
    SearchScope,
};

use crate::codec::{encode_password, encode_spn, escape_dn_value};
use crate::control::{AccountState, ACCOUNT_ENABLED};

const ATTR_SERVICE_PRINCIPAL_NAME: &str = "servicePrincipalName";
const ATTR_UNICODE_PWD: &str = "unicodePwd";
const ATTR_USER_ACCOUNT_CONTROL: &str = "userAccountControl";
const ATTR_SAM_ACCOUNT_NAME: &str = "sAMAccountName";
const ATTR_USER_PRINCIPAL_NAME: &str = "userPrincipalName";
const ATTR_COMMON_NAME: &str = "cn";
const ATTR_DISTINGUISHED_NAME: &str = "distinguishedName";

/// Matches any entry; used for base-scoped reads of a known DN.
const FILTER_ANY: &str = "(objectClass=*)";

/// Object class chain for a new user entry.
const USER_OBJECT_CLASSES: [&str; 4] = ["top", "person", "organizationalPerson", "user"];

/// Engine settings injected from the environment.
#[derive(Debug, Clone)]
pub struct AccountSettings {
    /// Domain suffix for derived `userPrincipalName` values
    /// (e.g. "example.com" yields `bob@example.com`).
    pub upn_domain: String,
}

impl AccountSettings {
    /// Create settings with the given UPN domain suffix.
    pub fn new(upn_domain: impl Into<String>) -> Self {
        Self {
            upn_domain: upn_domain.into(),
        }
    }
}

/// One row of a `search_entries` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    /// Distinguished name of the entry.
    pub dn: String,
    /// Common name, when the entry carries one.
    pub common_name: Option<String>,
    /// Account name (`sAMAccountName`), when the entry carries one.
    pub account_name: Option<String>,
}

/// The account mutation engine.
///
/// Holds the session it was constructed with and no other state; safe to
/// use from one thread at a time. Construct one engine per session.
pub struct AccountManager<S: DirectorySession> {
    session: S,
    settings: AccountSettings,
}

impl<S: DirectorySession> AccountManager<S> {
    /// Create an engine over an authenticated session.
    pub fn new(session: S, settings: AccountSettings) -> Self {
        Self { session, settings }
    }

    /// Borrow the underlying session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Close the underlying session. Idempotent.
    pub async fn unbind(&self) -> DirectoryResult<()> {
        self.session.unbind().await
    }

    /// Read the entry at `dn`, requiring exactly one match.
    ///
    /// Zero matches is `NotFound`; more than one is `AmbiguousResult`. The
    /// engine never silently picks the first.
    async fn single_entry(&self, dn: &str, attrs: &[&str]) -> DirectoryResult<Entry> {
        let mut entries = self
            .session
            .search(dn, SearchScope::Base, FILTER_ANY, attrs)
            .await?;

        match entries.len() {
            0 => Err(DirectoryError::not_found(dn)),
            1 => Ok(entries.remove(0)),
            count => Err(DirectoryError::AmbiguousResult {
                dn: dn.to_string(),
                count,
            }),
        }
    }

    /// List the service principal names registered on an entry.
    ///
    /// An absent attribute is an empty set, not an error.
    #[instrument(skip(self))]
    pub async fn list_service_principals(&self, dn: &str) -> DirectoryResult<BTreeSet<String>> {
        let entry = self
            .single_entry(dn, &[ATTR_SERVICE_PRINCIPAL_NAME])
            .await?;

        let spns: BTreeSet<String> = entry
            .texts(ATTR_SERVICE_PRINCIPAL_NAME)
            .into_iter()
            .map(str::to_string)
            .collect();

        debug!(dn = %dn, count = spns.len(), "Listed service principals");
        Ok(spns)
    }

    /// Register a service principal name on an entry.
    ///
    /// The directory enforces forest-wide SPN uniqueness; a duplicate
    /// anywhere surfaces as `ConstraintViolation`.
    #[instrument(skip(self))]
    pub async fn add_service_principal(&self, dn: &str, spn: &str) -> DirectoryResult<()> {
        self.session
            .modify(
                dn,
                vec![ModifyOp::Add {
                    attribute: ATTR_SERVICE_PRINCIPAL_NAME.to_string(),
                    values: vec![encode_spn(spn)],
                }],
            )
            .await?;

        info!(dn = %dn, spn = %spn, "Service principal added");
        Ok(())
    }

    /// Remove a service principal name from an entry.
    ///
    /// Not idempotent: the directory errors when the value is not currently
    /// present, and that error is surfaced, never masked as success.
    #[instrument(skip(self))]
    pub async fn remove_service_principal(&self, dn: &str, spn: &str) -> DirectoryResult<()> {
        self.session
            .modify(
                dn,
                vec![ModifyOp::Delete {
                    attribute: ATTR_SERVICE_PRINCIPAL_NAME.to_string(),
                    values: vec![encode_spn(spn)],
                }],
            )
            .await?;

        info!(dn = %dn, spn = %spn, "Service principal removed");
        Ok(())
    }

    /// Search a subtree with a caller-supplied filter.
    ///
    /// The filter is opaque to the engine. Zero matches is an empty list.
    #[instrument(skip(self))]
    pub async fn search_entries(
        &self,
        base_dn: &str,
        filter: &str,
    ) -> DirectoryResult<Vec<AccountSummary>> {
        let entries = self
            .session
            .search(
                base_dn,
                SearchScope::Subtree,
                filter,
                &[
                    ATTR_DISTINGUISHED_NAME,
                    ATTR_COMMON_NAME,
                    ATTR_SAM_ACCOUNT_NAME,
                ],
            )
            .await?;

        let summaries: Vec<AccountSummary> = entries
            .into_iter()
            .map(|entry| AccountSummary {
                common_name: entry.first_text(ATTR_COMMON_NAME).map(str::to_string),
                account_name: entry.first_text(ATTR_SAM_ACCOUNT_NAME).map(str::to_string),
                dn: entry.dn,
            })
            .collect();

        debug!(base_dn = %base_dn, count = summaries.len(), "Search completed");
        Ok(summaries)
    }

    /// Read the full attribute map of an entry.
    #[instrument(skip(self))]
    pub async fn get_all_attributes(&self, dn: &str) -> DirectoryResult<Entry> {
        self.single_entry(dn, &["*"]).await
    }

    /// Replace an account's credential.
    ///
    /// The new value is encoded per the `unicodePwd` contract and replaces
    /// the old one in a single indivisible write. The directory only accepts
    /// this over an encrypted channel, so that is checked up front; policy
    /// rejections (complexity, history) surface as `PolicyViolation`.
    #[instrument(skip(self, new_password))]
    pub async fn reset_password(&self, dn: &str, new_password: &str) -> DirectoryResult<()> {
        self.require_secure_channel()?;

        let encoded = encode_password(new_password)?;

        let result = self
            .session
            .modify(
                dn,
                vec![ModifyOp::Replace {
                    attribute: ATTR_UNICODE_PWD.to_string(),
                    values: vec![AttributeValue::Binary(encoded)],
                }],
            )
            .await;

        // AD reports password policy failures on this attribute as a
        // constraint violation (e.g. 0000052D in the diagnostic).
        result.map_err(|e| match e {
            DirectoryError::ConstraintViolation { diagnostic } => {
                DirectoryError::PolicyViolation { diagnostic }
            }
            other => other,
        })?;

        info!(dn = %dn, "Password reset");
        Ok(())
    }

    /// Set an account's enabled/disabled state.
    ///
    /// Writes the canonical control value, overwriting any other flags on
    /// the entry (see `AccountState::to_control`).
    #[instrument(skip(self))]
    pub async fn set_account_state(&self, dn: &str, state: AccountState) -> DirectoryResult<()> {
        self.session
            .modify(
                dn,
                vec![ModifyOp::Replace {
                    attribute: ATTR_USER_ACCOUNT_CONTROL.to_string(),
                    values: vec![AttributeValue::Text(state.to_control().to_string())],
                }],
            )
            .await?;

        info!(dn = %dn, state = %state, "Account state set");
        Ok(())
    }

    /// Read an account's enabled/disabled state.
    #[instrument(skip(self))]
    pub async fn account_state(&self, dn: &str) -> DirectoryResult<AccountState> {
        let entry = self.single_entry(dn, &[ATTR_USER_ACCOUNT_CONTROL]).await?;

        let value = entry
            .first_text(ATTR_USER_ACCOUNT_CONTROL)
            .unwrap_or("512");

        let control = value.parse::<u32>().map_err(|_| {
            DirectoryError::encoding(format!("invalid userAccountControl value: {value}"))
        })?;

        Ok(AccountState::from_control(control))
    }

    /// Create a new, enabled user account with an initial credential.
    ///
    /// The entry is created in one atomic `add`: object classes, names, the
    /// derived principal name, the encoded credential, and the enabled
    /// control value. Returns the DN of the created entry.
    #[instrument(skip(self, password))]
    pub async fn create_account(
        &self,
        parent_ou: &str,
        cn: &str,
        account_name: &str,
        password: &str,
    ) -> DirectoryResult<String> {
        self.require_secure_channel()?;

        if self.settings.upn_domain.is_empty() {
            return Err(DirectoryError::invalid_configuration(
                "a UPN domain suffix is required to create accounts",
            ));
        }

        let dn = account_dn(parent_ou, cn)?;
        let encoded = encode_password(password)?;
        let principal_name = format!("{}@{}", account_name, self.settings.upn_domain);

        let request = AddRequest::new()
            .with_values(
                "objectClass",
                USER_OBJECT_CLASSES
                    .iter()
                    .map(|oc| AttributeValue::from(*oc))
                    .collect(),
            )
            .with(ATTR_COMMON_NAME, cn)
            .with(ATTR_SAM_ACCOUNT_NAME, account_name)
            .with(ATTR_USER_PRINCIPAL_NAME, principal_name)
            .with(ATTR_UNICODE_PWD, AttributeValue::Binary(encoded))
            .with(ATTR_USER_ACCOUNT_CONTROL, ACCOUNT_ENABLED.to_string());

        self.session.add(&dn, request).await?;

        info!(dn = %dn, "Account created");
        Ok(dn)
    }

    /// Credential writes require an encrypted channel; AD rejects them
    /// otherwise, with a diagnostic that does not name the actual problem.
    fn require_secure_channel(&self) -> DirectoryResult<()> {
        if !self.session.is_secure() {
            return Err(DirectoryError::invalid_configuration(
                "an SSL or STARTTLS connection is required for password operations; \
                 the directory rejects unicodePwd writes over plaintext",
            ));
        }
        Ok(())
    }
}

/// Compose the DN for a new account under a parent container, escaping the
/// CN per RFC 4514.
fn account_dn(parent_ou: &str, cn: &str) -> DirectoryResult<String> {
    if cn.is_empty() {
        return Err(DirectoryError::invalid_configuration(
            "cn cannot be empty for DN construction",
        ));
    }
    if parent_ou.is_empty() {
        return Err(DirectoryError::invalid_configuration(
            "parent OU cannot be empty for DN construction",
        ));
    }

    Ok(format!("CN={},{}", escape_dn_value(cn), parent_ou))
}
