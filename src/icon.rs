//! The icon component: per-instance state and presentation.
//!
//! An [`Icon`] pairs its [`IconProps`] with a small shared slot that the
//! loader's callback writes into. [`Icon::render`] is a pure function of
//! that state: it resolves the asset URL, consults the loader, and reports
//! one of three presentations: no asset, still loading, or ready with
//! inline SVG markup.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::loader::{IconLoader, LoadUpdate};
use crate::resolver::{AssetUrl, IconProps};

// ============================================================================
// Presentation
// ============================================================================

/// What an icon instance should currently show.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    /// No asset URL resolves (no icon name configured).
    NoAsset,

    /// Interest is registered; content has not arrived yet.
    Pending,

    /// The asset is available as inline SVG markup.
    Ready(Arc<str>),
}

impl RenderState {
    /// True for [`RenderState::Ready`].
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// True for [`RenderState::Pending`].
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Accessibility attributes computed for the icon's host element.
#[derive(Debug, Clone, PartialEq)]
pub struct HostAttributes {
    /// Always `img`.
    pub role: &'static str,

    /// Emitted as a bare `hidden` attribute when set.
    pub hidden: bool,

    /// The `aria-label` value, explicit or derived from the icon name.
    pub label: Option<String>,
}

/// One render pass's output: presentation state plus host attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct IconNode {
    pub state: RenderState,
    pub attributes: HostAttributes,
}

impl IconNode {
    /// Emits the node as an HTML fragment.
    ///
    /// Placeholders carry the `missing-svg` / `loading-svg` classes; ready
    /// content is injected verbatim as trusted markup inside the host
    /// element.
    pub fn to_html(&self) -> String {
        let mut attrs = format!(" role=\"{}\"", self.attributes.role);
        if self.attributes.hidden {
            attrs.push_str(" hidden");
        }
        if let Some(label) = &self.attributes.label {
            attrs.push_str(&format!(" aria-label=\"{}\"", escape_attribute(label)));
        }

        match &self.state {
            RenderState::NoAsset => {
                format!("<div{attrs} class=\"missing-svg\"></div>")
            }
            RenderState::Pending => {
                format!("<div{attrs} class=\"loading-svg\"></div>")
            }
            RenderState::Ready(svg) => format!("<div{attrs}>{svg}</div>"),
        }
    }
}

/// Escapes a string for use inside a double-quoted HTML attribute.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Icon
// ============================================================================

/// State written by the loader callback, shared with it via `Rc`.
///
/// `requested` is the URL this instance last registered interest in (or
/// applied content for); it doubles as the stale-key guard: a completion
/// for any other URL is ignored. The slot outlives the `Icon` if a
/// callback is still pending when the instance is dropped, so a late
/// completion is harmless.
#[derive(Debug, Default)]
struct SvgSlot {
    requested: Option<AssetUrl>,
    content: Option<Arc<str>>,
}

/// A single icon instance.
///
/// Mutate [`props`](Self::props) freely between renders; a changed name
/// simply resolves to a new URL and restarts resolution independently.
pub struct Icon {
    /// This instance's configuration.
    pub props: IconProps,
    slot: Rc<RefCell<SvgSlot>>,
}

impl Icon {
    /// Creates an icon from its configuration.
    pub fn new(props: IconProps) -> Self {
        Self {
            props,
            slot: Rc::new(RefCell::new(SvgSlot::default())),
        }
    }

    /// Creates an icon for a named asset, everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(IconProps::named(name))
    }

    /// Computes this instance's current presentation.
    ///
    /// Never blocks. On a cache miss, interest is registered with the
    /// loader once; renders repeated while the fetch is outstanding
    /// return [`RenderState::Pending`] without re-registering. The
    /// instance flips to ready when the owner pumps the loader
    /// ([`IconLoader::poll`] / [`IconLoader::wait_idle`]) and renders
    /// again.
    pub fn render(&self, loader: &IconLoader) -> IconNode {
        let attributes = self.host_attributes();
        let state = self.resolve_state(loader);
        IconNode { state, attributes }
    }

    /// Host accessibility attributes for the current props.
    pub fn host_attributes(&self) -> HostAttributes {
        HostAttributes {
            role: "img",
            hidden: self.props.hidden,
            label: self.props.aria_label(),
        }
    }

    fn resolve_state(&self, loader: &IconLoader) -> RenderState {
        let Some(url) = self.props.svg_url() else {
            return RenderState::NoAsset;
        };

        // Already resolved (or waiting) for this exact URL?
        {
            let slot = self.slot.borrow();
            if slot.requested.as_ref() == Some(&url) {
                return match &slot.content {
                    Some(content) => RenderState::Ready(Arc::clone(content)),
                    None => RenderState::Pending,
                };
            }
        }

        if let Some(content) = loader.cached(&url) {
            let mut slot = self.slot.borrow_mut();
            slot.requested = Some(url);
            slot.content = Some(Arc::clone(&content));
            return RenderState::Ready(content);
        }

        {
            let mut slot = self.slot.borrow_mut();
            slot.requested = Some(url.clone());
            slot.content = None;
        }

        let slot = Rc::clone(&self.slot);
        let completed_for = url.clone();
        loader.request(
            &url,
            Box::new(move |update| {
                let mut slot = slot.borrow_mut();
                // The instance may have re-resolved to a different URL
                // (or been dropped) since registering; apply nothing then.
                if slot.requested.as_ref() != Some(&completed_for) {
                    return;
                }
                match update {
                    LoadUpdate::Ready(content) => slot.content = Some(Arc::clone(content)),
                    // Forget the attempt so the next render retries.
                    LoadUpdate::Failed(_) => slot.requested = None,
                }
            }),
        );
        RenderState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, SvgFetcher};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher answering every URL with markup that names it.
    struct EchoFetcher {
        count: AtomicUsize,
        fail_first: usize,
    }

    impl EchoFetcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                count: AtomicUsize::new(0),
                fail_first: 0,
            })
        }

        fn failing_once() -> Arc<Self> {
            Arc::new(Self {
                count: AtomicUsize::new(0),
                fail_first: 1,
            })
        }

        fn calls(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl SvgFetcher for EchoFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let call = self.count.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 500,
                })
            } else {
                Ok(format!("<svg data-src=\"{url}\"/>"))
            }
        }
    }

    fn loader() -> (Arc<EchoFetcher>, IconLoader) {
        let fetcher = EchoFetcher::new();
        let loader = IconLoader::new(Arc::clone(&fetcher) as Arc<dyn SvgFetcher>);
        (fetcher, loader)
    }

    #[test]
    fn empty_name_renders_no_asset_and_never_fetches() {
        let (fetcher, loader) = loader();
        let icon = Icon::new(IconProps::default());

        let node = icon.render(&loader);
        assert_eq!(node.state, RenderState::NoAsset);
        assert_eq!(
            node.to_html(),
            "<div role=\"img\" class=\"missing-svg\"></div>"
        );

        loader.wait_idle();
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn pending_then_ready_after_pump() {
        let (fetcher, loader) = loader();
        let icon = Icon::new(IconProps {
            name: "heart".into(),
            mode: "ios".into(),
            ..Default::default()
        });

        let node = icon.render(&loader);
        assert!(node.state.is_pending());
        assert!(node.to_html().contains("loading-svg"));

        loader.wait_idle();

        let node = icon.render(&loader);
        match &node.state {
            RenderState::Ready(svg) => assert!(svg.contains("src/ios-heart.svg")),
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn repeated_renders_while_pending_register_once() {
        let (fetcher, loader) = loader();
        let icon = Icon::named("heart");

        for _ in 0..10 {
            assert!(icon.render(&loader).state.is_pending());
        }
        loader.wait_idle();
        assert!(icon.render(&loader).state.is_ready());
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn two_instances_share_one_fetch_and_identical_content() {
        let (fetcher, loader) = loader();
        let a = Icon::named("heart");
        let b = Icon::named("heart");

        assert!(a.render(&loader).state.is_pending());
        assert!(b.render(&loader).state.is_pending());

        loader.wait_idle();

        let (a, b) = (a.render(&loader).state, b.render(&loader).state);
        let (RenderState::Ready(a), RenderState::Ready(b)) = (a, b) else {
            panic!("both instances should be ready");
        };
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn second_instance_hits_cache_synchronously() {
        let (fetcher, loader) = loader();
        let first = Icon::named("heart");
        first.render(&loader);
        loader.wait_idle();

        // Fresh instance, same resolved URL: ready on its very first render.
        let second = Icon::named("heart");
        assert!(second.render(&loader).state.is_ready());
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn renaming_while_pending_discards_the_stale_completion() {
        let (_fetcher, loader) = loader();
        let mut icon = Icon::named("heart");

        assert!(icon.render(&loader).state.is_pending());

        icon.props.name = "star".into();
        assert!(icon.render(&loader).state.is_pending());

        loader.wait_idle();

        // Both fetches completed; only the current URL's content applies.
        match icon.render(&loader).state {
            RenderState::Ready(svg) => assert!(svg.contains("src/md-star.svg")),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn renaming_after_ready_restarts_resolution() {
        let (fetcher, loader) = loader();
        let mut icon = Icon::named("heart");
        icon.render(&loader);
        loader.wait_idle();
        assert!(icon.render(&loader).state.is_ready());

        icon.props.name = "star".into();
        assert!(icon.render(&loader).state.is_pending());
        loader.wait_idle();
        match icon.render(&loader).state {
            RenderState::Ready(svg) => assert!(svg.contains("src/md-star.svg")),
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn failed_fetch_leaves_pending_and_next_render_retries() {
        let fetcher = EchoFetcher::failing_once();
        let loader = IconLoader::new(Arc::clone(&fetcher) as Arc<dyn SvgFetcher>);
        let icon = Icon::named("heart");

        assert!(icon.render(&loader).state.is_pending());
        loader.wait_idle();
        assert!(loader.cached(&icon.props.svg_url().unwrap()).is_none());

        // No failure presentation exists; the next render is a fresh miss.
        assert!(icon.render(&loader).state.is_pending());
        loader.wait_idle();
        assert!(icon.render(&loader).state.is_ready());
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn dropping_an_icon_before_completion_is_harmless() {
        let (fetcher, loader) = loader();
        {
            let icon = Icon::named("heart");
            assert!(icon.render(&loader).state.is_pending());
        }
        // The slot outlives the dropped instance; delivery has no one to
        // notify but must not panic, and the content is cached for others.
        loader.wait_idle();
        assert_eq!(fetcher.calls(), 1);
        assert!(Icon::named("heart").render(&loader).state.is_ready());
    }

    #[test]
    fn host_attributes_carry_role_label_and_hidden() {
        let icon = Icon::new(IconProps {
            name: "heart-half".into(),
            mode: "ios".into(),
            hidden: true,
            ..Default::default()
        });
        let attrs = icon.host_attributes();
        assert_eq!(attrs.role, "img");
        assert!(attrs.hidden);
        assert_eq!(attrs.label.as_deref(), Some("heart half"));

        let (_fetcher, loader) = loader();
        let html = icon.render(&loader).to_html();
        assert!(html.contains("role=\"img\""));
        assert!(html.contains(" hidden"));
        assert!(html.contains("aria-label=\"heart half\""));
    }

    #[test]
    fn ready_markup_inlines_the_svg() {
        let (_fetcher, loader) = loader();
        let icon = Icon::named("heart");
        icon.render(&loader);
        loader.wait_idle();

        let html = icon.render(&loader).to_html();
        assert!(html.starts_with("<div role=\"img\" aria-label=\"heart\">"));
        assert!(html.contains("<svg data-src=\"src/md-heart.svg\"/>"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let icon = Icon::new(IconProps {
            name: "heart".into(),
            label: Some("a \"quoted\" <label>".into()),
            ..Default::default()
        });
        let (_fetcher, loader) = loader();
        let html = icon.render(&loader).to_html();
        assert!(html.contains("aria-label=\"a &quot;quoted&quot; &lt;label&gt;\""));
    }
}
