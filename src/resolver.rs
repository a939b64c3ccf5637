//! Icon name resolution and per-instance configuration.
//!
//! An icon is addressed by a short name ("heart") that is qualified with
//! the active display mode ("ios-heart") unless it already carries a mode
//! prefix, then joined with the assets directory into the [`AssetUrl`] the
//! loader fetches and caches under. The rules are deterministic string
//! transforms; nothing here touches the cache.

use serde::{Deserialize, Serialize};

/// Mode prefixes recognized on icon names.
///
/// A name starting with one of these is used as given instead of being
/// qualified with the active mode. Matching is on the prefix only; a name
/// merely containing `ios-` in the middle still gets qualified.
pub const MODE_PREFIXES: [&str; 3] = ["ios-", "md-", "logo-"];

/// File suffix appended to every resolved icon name.
pub const SVG_SUFFIX: &str = ".svg";

// ============================================================================
// AssetUrl
// ============================================================================

/// Canonical identifier for one fetchable SVG asset.
///
/// Two logical requests that resolve to the same `AssetUrl` are guaranteed
/// to share one fetch and one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetUrl(String);

impl AssetUrl {
    /// Wraps an already-resolved URL string.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// IconProps
// ============================================================================

/// Configuration for a single icon instance.
///
/// Serializes to a flat camelCase structure so configurations can cross
/// process boundaries as JSON:
///
/// ```json
/// { "name": "heart", "mode": "ios", "assetsDir": "assets/icons" }
/// ```
///
/// All fields have defaults, so partial documents deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconProps {
    /// Which icon to use. Qualified with the active mode unless it
    /// already carries a recognized mode prefix.
    pub name: String,

    /// Override name used instead of `name` when the mode is `ios`.
    pub ios: String,

    /// Override name used instead of `name` when the mode is `md`.
    pub md: String,

    /// Active display mode, supplied externally by the theming layer.
    pub mode: String,

    /// Directory the SVG assets are served from.
    pub assets_dir: String,

    /// If true, the icon is rendered with the `hidden` host attribute.
    pub hidden: bool,

    /// Explicit accessibility label. When absent, one is derived from
    /// the resolved icon name.
    pub label: Option<String>,
}

impl Default for IconProps {
    fn default() -> Self {
        Self {
            name: String::new(),
            ios: String::new(),
            md: String::new(),
            mode: "md".to_string(),
            assets_dir: "src".to_string(),
            hidden: false,
            label: None,
        }
    }
}

impl IconProps {
    /// Creates props for a named icon, everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Resolves the icon name for the current mode.
    ///
    /// Rules, in order:
    /// 1. An empty `name` resolves to nothing.
    /// 2. A name without a recognized mode prefix is qualified as
    ///    `{mode}-{name}`; an already-prefixed name is used as given.
    /// 3. A per-mode override (`ios` / `md`) matching the current mode
    ///    replaces the result entirely.
    pub fn icon_name(&self) -> Option<String> {
        if self.name.is_empty() {
            return None;
        }

        if !self.ios.is_empty() && self.mode == "ios" {
            return Some(self.ios.clone());
        }
        if !self.md.is_empty() && self.mode == "md" {
            return Some(self.md.clone());
        }

        if MODE_PREFIXES.iter().any(|p| self.name.starts_with(p)) {
            Some(self.name.clone())
        } else {
            Some(format!("{}-{}", self.mode, self.name))
        }
    }

    /// Resolves the asset URL for the current configuration, or `None`
    /// when no icon name is set.
    pub fn svg_url(&self) -> Option<AssetUrl> {
        let name = self.icon_name()?;
        Some(AssetUrl::new(format!(
            "{}/{}{}",
            self.assets_dir, name, SVG_SUFFIX
        )))
    }

    /// The accessibility label for this icon.
    ///
    /// An explicit `label` wins; otherwise the label is derived from the
    /// resolved icon name by stripping a leading `ios-`/`md-` prefix and
    /// mapping the remaining separators to spaces. `None` when no name
    /// resolves and no explicit label is set.
    pub fn aria_label(&self) -> Option<String> {
        if let Some(label) = &self.label {
            return Some(label.clone());
        }
        self.icon_name().map(|name| derive_label(&name))
    }

    /// Serializes to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserializes from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Derives a human-readable label from a resolved icon name.
fn derive_label(resolved_name: &str) -> String {
    let stripped = resolved_name
        .strip_prefix("ios-")
        .or_else(|| resolved_name.strip_prefix("md-"))
        .unwrap_or(resolved_name);
    stripped.replace('-', " ")
}
