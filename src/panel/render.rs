//! HTML rendering of the panel.
//!
//! Dynamic values go through Handlebars' HTML escaping, and the only script
//! allowed to run is the inline block carrying the session nonce.

use handlebars::Handlebars;
use serde_json::json;

use crate::error::RenderError;

use super::state::PanelSnapshot;

const TEMPLATE_NAME: &str = "panel";
const NONCE_LENGTH: usize = 32;
const NONCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
/// Largest multiple of the alphabet size that fits in a byte.
const UNBIASED_LIMIT: usize = 256 - 256 % NONCE_ALPHABET.len();

/// Renders [`PanelSnapshot`]s into complete HTML documents.
pub struct HtmlRenderer {
    registry: Handlebars<'static>,
    nonce: String,
}

impl HtmlRenderer {
    /// Create a renderer with a fresh per-session nonce.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_nonce(generate_nonce()?)
    }

    fn with_nonce(nonce: String) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(TEMPLATE_NAME, include_str!("panel.hbs"))
            .map_err(|e| RenderError::Template(Box::new(e)))?;
        Ok(Self { registry, nonce })
    }

    pub fn render(&self, snapshot: &PanelSnapshot) -> Result<String, RenderError> {
        let ctx = json!({
            "nonce": self.nonce,
            "commit": snapshot.commit,
            "description": snapshot.description,
            "branchOrIssue": snapshot.branch_or_issue,
        });
        self.registry
            .render(TEMPLATE_NAME, &ctx)
            .map_err(|e| RenderError::Render(Box::new(e)))
    }
}

/// 32 random alphanumeric characters, each drawn uniformly.
pub fn generate_nonce() -> Result<String, RenderError> {
    let mut nonce = String::with_capacity(NONCE_LENGTH);
    let mut bytes = [0u8; NONCE_LENGTH];
    while nonce.len() < NONCE_LENGTH {
        getrandom::getrandom(&mut bytes).map_err(RenderError::Nonce)?;
        let missing = NONCE_LENGTH - nonce.len();
        nonce.extend(bytes.iter().filter_map(|b| nonce_char(*b)).take(missing));
    }
    Ok(nonce)
}

/// Map a random byte to an alphabet character, rejecting the biased tail.
fn nonce_char(byte: u8) -> Option<char> {
    let byte = byte as usize;
    (byte < UNBIASED_LIMIT).then(|| NONCE_ALPHABET[byte % NONCE_ALPHABET.len()] as char)
}
