//! inline-icons: named vector icons as inline SVG markup
//!
//! This crate resolves a named icon to its SVG asset URL based on a display
//! mode and optional per-mode overrides, fetches the asset over an abstract
//! transport exactly once per distinct URL no matter how many instances ask
//! for it concurrently, and presents each instance as one of three states:
//! no asset, loading, or ready with inline markup.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use inline_icons::{FetchError, Icon, IconLoader, IconProps};
//!
//! // Any closure of the right shape is a fetcher; HttpFetcher covers the
//! // conventional HTTP GET case.
//! let loader = IconLoader::new(Arc::new(|url: &str| -> Result<String, FetchError> {
//!     Ok(format!("<svg data-src=\"{url}\"/>"))
//! }));
//!
//! let icon = Icon::new(IconProps {
//!     name: "heart".into(),
//!     mode: "ios".into(),
//!     ..Default::default()
//! });
//!
//! // First render: cache miss, interest registered, fetch started.
//! let node = icon.render(&loader);
//! assert!(node.state.is_pending());
//!
//! // Pump completions on the owning context, then render again.
//! loader.wait_idle();
//! let node = icon.render(&loader);
//! assert!(node.state.is_ready());
//! assert_eq!(node.attributes.label.as_deref(), Some("heart"));
//! assert!(node.to_html().contains("src/ios-heart.svg"));
//! ```
//!
//! # One fetch, many waiters
//!
//! The [`IconLoader`] is the shared service at the heart of the crate: it
//! owns the write-once [`SvgCache`] and collapses every concurrent request
//! for one URL into a single fetch, fanning the result out to all
//! registered callbacks in registration order.
//!
//! ```
//! use std::sync::Arc;
//! use inline_icons::{FetchError, Icon, IconLoader};
//!
//! let loader = IconLoader::new(Arc::new(|_: &str| -> Result<String, FetchError> {
//!     Ok("<svg/>".into())
//! }));
//!
//! let (a, b) = (Icon::named("heart"), Icon::named("heart"));
//! a.render(&loader);
//! b.render(&loader);
//! loader.wait_idle();
//!
//! // Both instances resolved from the same single fetch.
//! assert!(a.render(&loader).state.is_ready());
//! assert!(b.render(&loader).state.is_ready());
//! ```

mod cache;
mod fetch;
mod icon;
mod loader;
mod resolver;

pub use cache::SvgCache;
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchError, MAX_OK_STATUS, SvgFetcher};
pub use icon::{HostAttributes, Icon, IconNode, RenderState};
pub use loader::{IconLoader, LoadCallback, LoadUpdate};
pub use resolver::{AssetUrl, IconProps, MODE_PREFIXES, SVG_SUFFIX};
