use sha2::{Digest, Sha256};
use std::collections::HashMap;

// API key identity - key string plus read-only flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyInfo {
    pub key: String,
    pub read_only: bool,
}

// Fixed key -> identity table, built once at startup and never mutated.
// Stands in for a real credential store; anything that can produce
// ApiKeyInfo records can back it.
pub struct KeyDirectory {
    keys: HashMap<String, ApiKeyInfo>,
}

impl KeyDirectory {
    pub fn new(keys: impl IntoIterator<Item = ApiKeyInfo>) -> Self {
        Self {
            keys: keys.into_iter().map(|info| (info.key.clone(), info)).collect(),
        }
    }

    // The two keys the service ships with
    pub fn bundled() -> Self {
        Self::new([
            ApiKeyInfo {
                key: "qa-key".to_string(),
                read_only: false,
            },
            ApiKeyInfo {
                key: "read-key".to_string(),
                read_only: true,
            },
        ])
    }

    // Missing and empty candidates resolve the same as unknown ones
    pub fn resolve(&self, candidate: Option<&str>) -> Option<&ApiKeyInfo> {
        match candidate {
            Some(key) if !key.is_empty() => self.keys.get(key),
            _ => None,
        }
    }
}

// Short hash of an API key so raw keys never land in logs
pub fn fingerprint(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key);
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_key() {
        let directory = KeyDirectory::bundled();
        let info = directory.resolve(Some("qa-key")).unwrap();
        assert_eq!(info.key, "qa-key");
        assert!(!info.read_only);

        let info = directory.resolve(Some("read-key")).unwrap();
        assert!(info.read_only);
    }

    #[test]
    fn unknown_key_is_not_found() {
        let directory = KeyDirectory::bundled();
        assert!(directory.resolve(Some("nope")).is_none());
    }

    #[test]
    fn absent_and_empty_keys_are_not_found() {
        let directory = KeyDirectory::bundled();
        assert!(directory.resolve(None).is_none());
        assert!(directory.resolve(Some("")).is_none());
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        assert_eq!(fingerprint("qa-key"), fingerprint("qa-key"));
        assert_ne!(fingerprint("qa-key"), fingerprint("read-key"));
        assert_eq!(fingerprint("qa-key").len(), 12);
    }
}
