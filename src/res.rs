use axum::{
    debug_handler,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::view::View;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        include_res!(str, "/style.css"),
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders user-written markdown. Raw HTML in the input is shown as text.
pub fn markdown(text: &str) -> String {
    use pulldown_cmark::{Event, Parser};

    let parser = Parser::new(text).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

/// Fills `{key}` placeholders in one pass over `template`. Inserted values
/// are never scanned again, and unknown keys stay as written.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = tail[1..].find('}').and_then(|end| {
            let key = &tail[1..=end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end + 2))
        });

        match value {
            Some((value, len)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Wraps a body in the site layout.
pub fn page(title: &str, body: &str) -> String {
    layout(None, title, body)
}

/// Like [`page`], with `view` highlighted in the navigation.
pub fn view_page(view: View, title: &str, body: &str) -> String {
    layout(Some(view), title, body)
}

fn layout(view: Option<View>, title: &str, body: &str) -> String {
    let nav = match view {
        Some(view) => view.nav(),
        None => View::Discover.nav().replace(" class=\"current\"", ""),
    };
    fill(
        include_res!(str, "/pages/layout.html"),
        &[("title", escape(title).as_str()), ("nav", nav.as_str()), ("body", body)],
    )
}

pub fn sorry(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(page(
            "Not found",
            &fill(include_res!(str, "/pages/sorry.html"), &[("what", escape(what).as_str())]),
        )),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn fill_does_not_rescan_values() {
        let html = fill(
            "<p>{location}</p><h1>{title}</h1>{missing}{",
            &[("location", "Table {title} at {description}"), ("title", "Rooftop")],
        );
        assert_eq!(
            html,
            "<p>Table {title} at {description}</p><h1>Rooftop</h1>{missing}{"
        );
    }

    #[test]
    fn markdown_keeps_formatting_but_not_html() {
        let html = markdown("see you at **8**<script>alert(1)</script>");
        assert!(html.contains("<strong>8</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
