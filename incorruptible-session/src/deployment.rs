//! The deployment descriptor: the handful of facts about where the service
//! is actually reachable, kept separate from the token format itself.

use std::error::Error;
use std::fmt;

/// Where this deployment lives: scheme, host, and an optional path prefix.
/// Derives the cookie `Domain`/`Path`/`Secure` attributes, the cookie name,
/// and the localhost/development flag.
#[derive(Debug, Clone)]
pub struct Deployment {
    scheme: String,
    host: String,
    path_prefix: String,
    doc_url: String,
}

/// The fixed cookie name used when the deployment has no path prefix to
/// derive one from.
const FALLBACK_COOKIE_NAME: &str = "i";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentError {
    Malformed,
    UnsupportedScheme,
}

impl fmt::Display for DeploymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentError::Malformed => write!(f, "deployment base URL is malformed"),
            DeploymentError::UnsupportedScheme => {
                write!(f, "deployment base URL must use http or https")
            }
        }
    }
}

impl Error for DeploymentError {}

impl Deployment {
    /// Parses a base URL of the form `scheme://host[:port][/path]`.
    /// `doc_url` is the deployment-wide constant embedded in JSON error
    /// bodies.
    pub fn new(base_url: &str, doc_url: impl Into<String>) -> Result<Self, DeploymentError> {
        let (scheme, rest) = base_url.split_once("://").ok_or(DeploymentError::Malformed)?;
        if scheme != "http" && scheme != "https" {
            return Err(DeploymentError::UnsupportedScheme);
        }
        let (host, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        if host.is_empty() {
            return Err(DeploymentError::Malformed);
        }
        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            path_prefix: path.trim_end_matches('/').to_string(),
            doc_url: doc_url.into(),
        })
    }

    /// Whether this deployment is `http://localhost...`: the development
    /// flag that downgrades Check/Vet rejections to passthroughs.
    pub fn is_localhost(&self) -> bool {
        self.scheme == "http" && {
            let host = self.host.split(':').next().unwrap_or(&self.host);
            host == "localhost" || host == "127.0.0.1" || host == "::1"
        }
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }

    pub fn cookie_domain(&self) -> &str {
        let host = self.host.split(':').next().unwrap_or(&self.host);
        host
    }

    pub fn cookie_path(&self) -> &str {
        if self.path_prefix.is_empty() {
            "/"
        } else {
            &self.path_prefix
        }
    }

    /// The last non-empty segment of the path prefix, or a fixed short name
    /// when no path was given.
    pub fn cookie_name(&self) -> String {
        self.path_prefix
            .trim_matches('/')
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_COOKIE_NAME.to_string())
    }

    pub fn doc_url(&self) -> &str {
        &self.doc_url
    }
}
