//! Configuration file parsing
//!
//! The configuration is a small XML document pointing the agent at the
//! device management server:
//!
//! ```xml
//! <config>
//!     <jss_url>https://jss.example.com:8443</jss_url>
//!     <jss_username>monitor</jss_username>
//!     <jss_password>secret</jss_password>
//! </config>
//! ```
//!
//! Child order is not significant. Field values are taken verbatim beyond
//! XML decoding. A missing or empty field fails the whole parse; no partial
//! configuration ever escapes.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root element tag expected in the configuration document.
const ROOT_TAG: &str = "config";

const URL_TAG: &str = "jss_url";
const USERNAME_TAG: &str = "jss_username";
const PASSWORD_TAG: &str = "jss_password";

/// Parsed credentials and endpoint for one sampling cycle.
///
/// Built fresh from the file each cycle and dropped with it; credentials are
/// not cached across runs.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub endpoint_url: String,
    pub username: String,
    pub password: String,
}

/// Errors raised while parsing the configuration file. All variants abort
/// the current sampling cycle; no retry happens in-process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration is not well-formed XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("unexpected root element <{0}>, expected <{ROOT_TAG}>")]
    WrongRoot(String),

    #[error("missing or empty <{0}> element in configuration")]
    MissingField(&'static str),
}

/// Parse the configuration file at `path`.
pub fn parse(path: &Path) -> Result<Configuration, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&content)
}

/// Parse a configuration document from memory.
pub fn parse_str(content: &str) -> Result<Configuration, ConfigError> {
    let doc = roxmltree::Document::parse(content)?;
    let root = doc.root_element();

    if root.tag_name().name() != ROOT_TAG {
        return Err(ConfigError::WrongRoot(root.tag_name().name().to_string()));
    }

    Ok(Configuration {
        endpoint_url: child_text(root, URL_TAG)?,
        username: child_text(root, USERNAME_TAG)?,
        password: child_text(root, PASSWORD_TAG)?,
    })
}

fn child_text(
    root: roxmltree::Node<'_, '_>,
    name: &'static str,
) -> Result<String, ConfigError> {
    let text = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .unwrap_or_default();

    if text.is_empty() {
        Err(ConfigError::MissingField(name))
    } else {
        Ok(text.to_string())
    }
}
