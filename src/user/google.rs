use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};
use serde::Deserialize;

/// Claims we care about from a Google sign-in credential.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GoogleProfile {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleProfile {
    /// Parses either a JWT credential (payload segment only, signature is
    /// checked upstream by the identity provider SDK) or a bare JSON profile.
    pub fn parse(credential: &str) -> Option<Self> {
        Self::from_jwt(credential).or_else(|| serde_json::from_str(credential).ok())
    }

    fn from_jwt(credential: &str) -> Option<Self> {
        let mut segments = credential.split('.');
        let (_header, payload) = (segments.next()?, segments.next()?);
        segments.next()?;
        let decoded = BASE64_URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&decoded).ok()
    }

    /// Display name, falling back to the email local part.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }
}
