//! API credential handling.

use keyring::Entry;
use std::env;
use std::fmt;

/// Keyring service under which provider keys are looked up.
pub const KEYRING_SERVICE: &str = "voice-catalog";

/// Opaque API key supplied by the caller.
///
/// The client only forwards it in the refresh request body; it is never
/// logged, serialized or stored beyond the lifetime of the value itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Empty or whitespace-only keys count as missing.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Resolve a provider key from the OS keyring, then `<PROVIDER>_API_KEY`.
    pub fn from_keyring_or_env(provider_id: &str) -> Option<Self> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, provider_id) {
            if let Ok(key) = entry.get_password() {
                let cred = Self(key);
                if !cred.is_blank() {
                    return Some(cred);
                }
            }
        }

        // 2. Try Environment Variable (PROVIDER_API_KEY)
        let env_var = format!("{}_API_KEY", provider_id.to_uppercase());
        env::var(env_var)
            .ok()
            .map(Self)
            .filter(|c| !c.is_blank())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(***)")
        }
    }
}

impl From<&str> for Credential {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Credential {
    fn from(s: String) -> Self {
        Self(s)
    }
}
