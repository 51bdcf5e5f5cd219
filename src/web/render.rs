//! HTML rendering of the landing page.
//!
//! Sections render in the session's current order, each anchored by an
//! `id` equal to its key so fragment links (`#benefits`) keep working in
//! any order. Reorders on the live page move the existing elements rather
//! than re-creating them, so section-internal state survives.

use crate::registry::{SectionKey, SectionRegistry};

const STYLE: &str = "\
body { margin: 0; font-family: system-ui, sans-serif; color: #1d1d1f; }\n\
header { position: sticky; top: 0; background: #fff; border-bottom: 1px solid #e5e5e5; padding: 0.75rem 1.5rem; }\n\
header nav a { margin-right: 1rem; text-decoration: none; color: inherit; }\n\
.hero { padding: 4rem 1.5rem; text-align: center; }\n\
section { padding: 3rem 1.5rem; max-width: 56rem; margin: 0 auto; opacity: 0.4; transition: opacity 0.6s ease; }\n\
section.visible { opacity: 1; }\n\
footer { padding: 2rem 1.5rem; border-top: 1px solid #e5e5e5; text-align: center; }\n";

/// Page script: observes each section's viewport intersection, reports
/// entries over the WebSocket, and applies pushed reorders by moving the
/// existing DOM nodes (element identity, and therefore section state, is
/// preserved).
const SCRIPT: &str = r#"
(function () {
  var threshold = __THRESHOLD__;
  var container = document.getElementById('sections');
  var ws = new WebSocket(
    (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '/ws'
  );

  var observer = new IntersectionObserver(function (entries) {
    entries.forEach(function (entry) {
      if (!entry.isIntersecting) return;
      entry.target.classList.add('visible');
      if (ws.readyState === WebSocket.OPEN) {
        ws.send(JSON.stringify({
          type: 'section_entered',
          key: entry.target.id,
          visible_fraction: entry.intersectionRatio
        }));
      }
    });
  }, { threshold: threshold });

  function observeAll() {
    container.querySelectorAll('section').forEach(function (el) {
      observer.observe(el);
    });
  }

  ws.addEventListener('message', function (event) {
    var msg = JSON.parse(event.data);
    if (msg.type !== 'order_changed') return;
    observer.disconnect();
    msg.order.forEach(function (key) {
      var el = document.getElementById(key);
      if (el) container.appendChild(el);
    });
    observeAll();
  });

  window.addEventListener('beforeunload', function () {
    observer.disconnect();
    ws.close();
  });

  observeAll();
})();
"#;

/// Render the orderable sections in the given order.
pub fn render_sections(registry: &SectionRegistry, order: &[SectionKey]) -> String {
    let mut out = String::new();
    for key in order {
        if let Some(section) = registry.get(key) {
            out.push_str(&format!(
                "<section id=\"{id}\">\n{body}\n</section>\n",
                id = section.key,
                body = section.body_html,
            ));
        }
    }
    out
}

/// Render the complete landing page: header with fragment-anchor nav,
/// hero, the adaptive sections, footer and the reporting script.
pub fn render_page(
    registry: &SectionRegistry,
    order: &[SectionKey],
    visible_fraction: f64,
) -> String {
    let nav: String = registry
        .sections()
        .iter()
        .map(|s| format!("<a href=\"#{key}\">{title}</a>", key = s.key, title = escape(&s.title)))
        .collect();

    let sections = render_sections(registry, order);
    let script = SCRIPT.replace("__THRESHOLD__", &format!("{visible_fraction}"));

    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Checkin Assistant</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
         <header><nav>{nav}</nav></header>\n\
         <div class=\"hero\"><h1>Guest conversations, answered for you</h1>\
         <p>An AI assistant for accommodation hosts.</p></div>\n\
         <main id=\"sections\">\n{sections}</main>\n\
         <footer><small>&copy; Checkin Assistant</small></footer>\n\
         <script>{script}</script>\n</body>\n</html>\n"
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SectionRegistry {
        SectionRegistry::default_landing()
    }

    fn anchor_position(html: &str, key: &str) -> usize {
        html.find(&format!("<section id=\"{key}\">"))
            .unwrap_or_else(|| panic!("missing anchor for {key}"))
    }

    #[test]
    fn sections_render_in_given_order() {
        let registry = registry();
        let order: Vec<_> = ["contact", "benefits", "faq", "testimonials"]
            .iter()
            .map(|k| SectionKey::from(*k))
            .collect();
        let html = render_sections(&registry, &order);

        assert!(anchor_position(&html, "contact") < anchor_position(&html, "benefits"));
        assert!(anchor_position(&html, "benefits") < anchor_position(&html, "faq"));
        assert!(anchor_position(&html, "faq") < anchor_position(&html, "testimonials"));
    }

    #[test]
    fn anchors_are_stable_across_orders() {
        let registry = registry();
        let default = registry.default_order();
        let mut reversed = default.clone();
        reversed.reverse();

        for order in [&default, &reversed] {
            let html = render_sections(&registry, order);
            for key in &default {
                assert!(html.contains(&format!("<section id=\"{key}\">")));
            }
        }
    }

    #[test]
    fn page_carries_nav_links_and_threshold() {
        let registry = registry();
        let html = render_page(&registry, &registry.default_order(), 0.1);

        assert!(html.contains("<a href=\"#benefits\">"));
        assert!(html.contains("<a href=\"#contact\">"));
        assert!(html.contains("var threshold = 0.1;"));
        assert!(html.contains("id=\"sections\""));
    }

    #[test]
    fn nav_order_is_declaration_order_regardless_of_render_order() {
        let registry = registry();
        let mut reversed = registry.default_order();
        reversed.reverse();
        let html = render_page(&registry, &reversed, 0.1);

        let nav_benefits = html.find("<a href=\"#benefits\">").unwrap();
        let nav_contact = html.find("<a href=\"#contact\">").unwrap();
        assert!(nav_benefits < nav_contact);
    }
}
