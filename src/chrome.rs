//! Site chrome: the navigation bar and footer shared with the hand-written
//! pages of the site.
//!
//! Paper pages embed these fragments verbatim. The markup belongs to the rest
//! of the site, so it is supplied through the [`Chrome`] trait rather than
//! built here. [`StockChrome`] carries the fragments the site currently uses.
//! Renderers must not escape or inspect them.

use std::fmt;

/// Top-level destination a page belongs to, highlighted in the navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Research,
    Services,
    About,
    Collaborate,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Research => "research",
            Section::Services => "services",
            Section::About => "about",
            Section::Collaborate => "collaborate",
        })
    }
}

/// Supplier of pre-built navigation and footer markup.
///
/// `Sync` so pages can render in parallel against one instance.
pub trait Chrome: Sync {
    /// Navigation fragment with `active` marked as the current section.
    fn navigation(&self, active: Section) -> String;

    /// Footer fragment.
    fn footer(&self) -> String;
}

/// The site's current navigation and footer, for pages one directory below
/// the site root.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockChrome;

const ACTIVE_LINK: &str = " site-nav__link--active";

fn active_class(section: Section, active: Section) -> &'static str {
    if section == active { ACTIVE_LINK } else { "" }
}

impl Chrome for StockChrome {
    fn navigation(&self, active: Section) -> String {
        format!(
            r#"  <!-- Site Navigation -->
  <nav class="site-nav">
    <div class="site-nav__inner">
      <a href="../index.html" class="site-nav__brand">
        <img src="../assets/dissensus-logo-white.svg" alt="" class="site-nav__brand-logo">
        dissensus<span class="site-nav__brand-ai">AI</span>
      </a>
      <button class="site-nav__toggle" onclick="document.querySelector('.site-nav__links').classList.toggle('is-open')" aria-label="Toggle menu">
        <span></span><span></span><span></span>
      </button>
      <div class="site-nav__links">
        <a href="../index.html" class="site-nav__link{research}">Research</a>
        <a href="../services.html" class="site-nav__link{services}">Services</a>
        <a href="../about.html" class="site-nav__link{about}">About</a>
        <a href="../collaborate.html" class="site-nav__link{collaborate}">Collaborate</a>
        <a href="mailto:research@dissensus.ai" class="site-nav__cta">Contact &rarr;</a>
      </div>
    </div>
  </nav>"#,
            research = active_class(Section::Research, active),
            services = active_class(Section::Services, active),
            about = active_class(Section::About, active),
            collaborate = active_class(Section::Collaborate, active),
        )
    }

    fn footer(&self) -> String {
        r#"  <footer>
    <div class="container">
      <div>
        <p>&copy; 2026 Dissensus AI Ltd <span style="opacity: 0.5;">&middot; Friction is the cost of existence.</span></p>
        <p class="footer__company">Incorporation pending &middot; England &amp; Wales</p>
      </div>
      <div>
        <div class="footer-links">
          <a href="../index.html">Research</a> &middot;
          <a href="../services.html">Services</a> &middot;
          <a href="../about.html">About</a> &middot;
          <a href="../collaborate.html">Collaborate</a> &middot;
          <a href="../manifesto.html">Manifesto</a> &middot;
          <a href="../subscribe.html">Subscribe</a> &middot;
          <a href="../privacy.html">Privacy</a> &middot;
          <a href="../terms.html">Terms</a> &middot;
          <a href="../feed.xml" title="RSS Feed">RSS</a>
        </div>
      </div>
    </div>
  </footer>"#
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_marks_only_active_section() {
        let nav = StockChrome.navigation(Section::Research);
        assert_eq!(nav.matches(ACTIVE_LINK).count(), 1);
        assert!(nav.contains(r#"class="site-nav__link site-nav__link--active">Research<"#));
        assert!(nav.contains(r#"class="site-nav__link">Services<"#));
    }

    #[test]
    fn navigation_follows_active_argument() {
        let nav = StockChrome.navigation(Section::About);
        assert!(nav.contains(r#"class="site-nav__link site-nav__link--active">About<"#));
        assert!(nav.contains(r#"class="site-nav__link">Research<"#));
    }

    #[test]
    fn footer_links_feed() {
        let footer = StockChrome.footer();
        assert!(footer.starts_with("  <footer>"));
        assert!(footer.contains("../feed.xml"));
    }

    #[test]
    fn section_display() {
        assert_eq!(Section::Research.to_string(), "research");
        assert_eq!(Section::Collaborate.to_string(), "collaborate");
    }
}
