//! Static HTML rendering of the dashboard. The visibility sentinel at the
//! bottom of the list is the hook a live host wires to `request_more`; this
//! renderer only marks it, plus the explicit end-of-results and empty states.
use crate::dashboard::{Dashboard, Phase};
use crate::model::AdRecord;

const FEATURE_REQUEST_URL: &str =
    "https://docs.google.com/document/d/1jEj68TC8x322BNhvTUiBtbpxhZUpQQMiM8lZQoZ_jjM/edit?tab=t.0";

/// Render the full page for the controller's current phase.
pub fn render_dashboard(dash: &Dashboard) -> String {
    match dash.phase() {
        Phase::Loading => page("Newsletter Ads Dashboard", &render_loading()),
        Phase::Failed(message) => page("Newsletter Ads Dashboard", &render_error(message)),
        Phase::Ready => page("Newsletter Ads Dashboard", &render_ready(dash)),
    }
}

fn render_ready(dash: &Dashboard) -> String {
    let mut body = String::new();
    body.push_str(&render_header(dash.total_records()));
    body.push_str(&render_filter_panel(dash));

    let visible = dash.visible();
    let filtered = dash.filtered_len();
    let noun = if filtered == 1 { "ad" } else { "ads" };
    let suffix = if dash.selection().is_empty() {
        ""
    } else {
        " (filtered)"
    };
    body.push_str(&format!(
        "<p class=\"showing\">Showing {} {}{}</p>\n",
        filtered, noun, suffix
    ));

    if visible.is_empty() {
        body.push_str(
            "<div class=\"empty\"><p>No ads found matching your filters.</p>\
             <a class=\"reset\" href=\"?\">Clear filters</a></div>\n",
        );
        return body;
    }

    body.push_str("<div class=\"grid\">\n");
    for ad in visible {
        body.push_str(&render_card(ad));
    }
    body.push_str("</div>\n");

    if dash.has_more() {
        // The live host observes this sentinel entering the viewport and
        // calls request_more.
        body.push_str("<div id=\"load-more-sentinel\" class=\"sentinel\"></div>\n");
    } else {
        body.push_str("<div class=\"end\">End of results</div>\n");
    }
    body
}

fn render_header(total: usize) -> String {
    format!(
        "<header><div class=\"title\"><h1>Newsletter Ads Dashboard</h1>\
         <p class=\"hint\">Browse and filter newsletter advertisements</p></div>\
         <div class=\"meta\"><a class=\"feature\" href=\"{}\" target=\"_blank\" \
         rel=\"noopener noreferrer\">Feature Request</a>\
         <div class=\"total\"><span>Total Ads</span><strong>{}</strong></div></div></header>\n",
        html_attr(FEATURE_REQUEST_URL),
        total
    )
}

fn render_filter_panel(dash: &Dashboard) -> String {
    let facets = dash.facets();
    let selection = dash.selection();

    let mut panel = String::from("<section class=\"filters\"><h2>Filters</h2>\n");
    if !selection.is_empty() {
        panel.push_str("<a class=\"reset\" href=\"?\">Clear filters</a>\n");
    }

    panel.push_str(&render_select(
        "sponsor",
        "All Sponsors",
        &facets.sponsors.values,
        |v| facets.sponsors.count(v),
        selection.sponsor.as_deref(),
    ));
    panel.push_str(&render_select(
        "newsletter",
        "All Newsletters",
        &facets.newsletters.values,
        |v| facets.newsletters.count(v),
        selection.newsletter.as_deref(),
    ));

    let start = selection
        .start_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let end = selection
        .end_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    panel.push_str(&format!(
        "<label for=\"start-date\">From</label>\
         <input type=\"date\" id=\"start-date\" value=\"{}\" />\n",
        html_attr(&start)
    ));
    panel.push_str(&format!(
        "<label for=\"end-date\">To</label>\
         <input type=\"date\" id=\"end-date\" value=\"{}\" />\n",
        html_attr(&end)
    ));
    panel.push_str("</section>\n");
    panel
}

fn render_select<F>(
    id: &str,
    all_label: &str,
    values: &[String],
    count: F,
    selected: Option<&str>,
) -> String
where
    F: Fn(&str) -> usize,
{
    let mut out = format!(
        "<label for=\"{id}\">{label}</label><select id=\"{id}\">\
         <option value=\"\">{all_label}</option>\n",
        id = id,
        label = capitalize(id),
        all_label = html_escape(all_label),
    );
    for value in values {
        let marker = if selected == Some(value.as_str()) {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "<option value=\"{}\"{}>{} ({})</option>\n",
            html_attr(value),
            marker,
            html_escape(value),
            count(value.as_str())
        ));
    }
    out.push_str("</select>\n");
    out
}

fn render_card(ad: &AdRecord) -> String {
    let mut card = String::from("<div class=\"card\">");
    if let Some(url) = &ad.image_url {
        card.push_str(&format!(
            "<img src=\"{}\" alt=\"{} ad\" />",
            html_attr(url),
            html_attr(&ad.sponsor)
        ));
    }
    card.push_str(&format!(
        "<div class=\"card-head\"><h3>{}</h3><span class=\"badge\">ID: {}</span></div>",
        html_escape(&ad.sponsor),
        ad.id
    ));
    card.push_str(&format!(
        "<div class=\"card-meta\"><span class=\"newsletter\">{}</span>\
         <span class=\"sent\">{}</span></div>",
        html_escape(&ad.newsletter_name),
        ad.sent_date.format("%b %d, %Y - %-I:%M %p")
    ));
    card.push_str(&format!(
        "<p class=\"ad-text\">{}</p></div>\n",
        html_escape(&ad.ad_text)
    ));
    card
}

fn render_loading() -> String {
    "<div class=\"loading\"><p>Loading newsletter ads...</p></div>\n".to_string()
}

/// Full-page fetch failure: the store error's message with a manual retry
/// affordance that re-runs the whole fetch sequence.
pub fn render_error(message: &str) -> String {
    let message = if message.trim().is_empty() {
        "Failed to fetch ads"
    } else {
        message
    };
    format!(
        "<div class=\"error\"><h2>Failed to Load Ads</h2><p>{}</p>\
         <a class=\"retry\" href=\"?\">Try Again</a></div>\n",
        html_escape(message)
    )
}

/// The password gate page. `error` shows the inline mismatch message with a
/// cleared input.
pub fn render_gate(error: bool) -> String {
    let mut body = String::from(
        "<div class=\"gate\"><h1>Newsletter Ads Dashboard</h1>\
         <p>Please enter the password to access the dashboard</p>\
         <form method=\"post\"><label for=\"password\">Password</label>\
         <input type=\"password\" id=\"password\" name=\"password\" value=\"\" \
         placeholder=\"Enter password\" autofocus />\n",
    );
    if error {
        body.push_str("<p class=\"gate-error\">Incorrect password. Please try again.</p>\n");
    }
    body.push_str("<button type=\"submit\">Access Dashboard</button></form></div>\n");
    page("Newsletter Ads Dashboard", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{}</title>
    <link rel="stylesheet" href="static/style.css">
  </head>
  <body>
    <main>
      {}
    </main>
  </body>
</html>"#,
        html_escape(title),
        body
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn html_attr(s: &str) -> String {
    html_escape(s).replace('"', "&quot;")
}

pub const DEFAULT_STYLE: &str = r#"
:root {
  color-scheme: light dark;
  --fg: #222;
  --bg: #f6f7f8;
  --card: #fff;
  --muted: #666;
  --accent: #2563eb;
}

@media (prefers-color-scheme: dark) {
  :root {
    --fg: #eee;
    --bg: #121212;
    --card: #1d1d1f;
    --muted: #aaa;
  }
}

html,
body {
  margin: 0;
  padding: 0;
  background: var(--bg);
  color: var(--fg);
  font: 14px/1.6 -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto,
        'Helvetica Neue', Arial, 'Noto Sans', sans-serif;
}

main {
  padding: 16px;
  max-width: 1100px;
  margin: 0 auto;
}

header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 16px 0;
  border-bottom: 1px solid #ddd4;
}

.hint {
  color: var(--muted);
}

.filters {
  background: var(--card);
  border-radius: 8px;
  padding: 16px;
  margin: 16px 0;
}

.filters label {
  display: block;
  font-weight: 600;
  margin-top: 8px;
}

.grid {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 16px;
}

@media (max-width: 800px) {
  .grid {
    grid-template-columns: 1fr;
  }
}

.card {
  background: var(--card);
  border-radius: 8px;
  padding: 16px;
  box-shadow: 0 1px 3px #0002;
}

.card img {
  max-width: 100%;
  display: block;
  margin-bottom: 8px;
}

.badge {
  font-size: 11px;
  color: var(--muted);
  background: #8881;
  padding: 2px 6px;
  border-radius: 4px;
}

.ad-text {
  white-space: pre-wrap;
  border-top: 1px solid #ddd4;
  padding-top: 8px;
}

.end,
.empty,
.loading,
.error,
.gate {
  text-align: center;
  padding: 32px 0;
  color: var(--muted);
}

.gate-error {
  color: #dc2626;
}

a.reset,
a.retry,
a.feature {
  color: var(--accent);
  text-decoration: none;
}

.sentinel {
  height: 1px;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ad(id: i64, sponsor: &str, image: Option<&str>) -> AdRecord {
        AdRecord {
            idx: id,
            id,
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            sponsor: sponsor.into(),
            ad_text: "Big <sale> & more".into(),
            image_url: image.map(str::to_string),
            newsletter_name: "Morning Brew".into(),
            sent_date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn card_escapes_and_formats() {
        let html = render_card(&ad(7, "Acme & Co", None));
        assert!(html.contains("Acme &amp; Co"));
        assert!(html.contains("ID: 7"));
        assert!(html.contains("Morning Brew"));
        assert!(html.contains("Jun 15, 2024 - 10:30 AM"));
        assert!(html.contains("Big &lt;sale&gt; &amp; more"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn card_renders_optional_image() {
        let html = render_card(&ad(1, "Acme", Some("https://cdn/x.png")));
        assert!(html.contains("<img src=\"https://cdn/x.png\""));
    }

    #[test]
    fn error_page_falls_back_to_generic_message() {
        assert!(render_error("  ").contains("Failed to fetch ads"));
        assert!(render_error("store error 500: boom").contains("store error 500: boom"));
    }

    #[test]
    fn gate_shows_inline_error_only_on_mismatch() {
        assert!(!render_gate(false).contains("Incorrect password"));
        assert!(render_gate(true).contains("Incorrect password. Please try again."));
    }

    #[test]
    fn loading_phase_renders_loading_panel() {
        let dash = Dashboard::new();
        let html = render_dashboard(&dash);
        assert!(html.contains("Loading newsletter ads"));
    }
}
