use minijinja::{context, Environment};
use serde::Serialize;
use viewer_core::{Body, DisplayTree, FooterLink};

/// Registered with an `.html` name so minijinja auto-escapes every interpolation.
const PAGE_TEMPLATE_NAME: &str = "page.html";
const PAGE_TEMPLATE: &str = include_str!("page.html.jinja");
const STYLESHEET: &str = "style.css";

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BodyView<'a> {
    Empty,
    Artifact { heading: &'a str, path: &'a str },
    Error { message: &'a str },
}

impl<'a> From<&'a Body> for BodyView<'a> {
    fn from(body: &'a Body) -> Self {
        match body {
            Body::Empty => BodyView::Empty,
            Body::Artifact { heading, path } => BodyView::Artifact { heading, path },
            Body::Error { message } => BodyView::Error { message },
        }
    }
}

#[derive(Serialize)]
struct LinkView {
    label: &'static str,
    /// Footer hrefs are compile-time constants and are emitted unescaped.
    href: &'static str,
}

impl From<&FooterLink> for LinkView {
    fn from(link: &FooterLink) -> Self {
        Self {
            label: link.label,
            href: link.href,
        }
    }
}

/// Renders the display tree into a complete HTML document.
pub(crate) fn render_document(tree: &DisplayTree) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
    let template = env.get_template(PAGE_TEMPLATE_NAME)?;

    let footer: Vec<LinkView> = tree.footer.iter().map(LinkView::from).collect();
    template.render(context! {
        title => tree.title,
        stylesheet => STYLESHEET,
        body => BodyView::from(&tree.body),
        footer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewer_core::{APP_TITLE, FOOTER_LINKS};

    fn tree(body: Body) -> DisplayTree {
        DisplayTree {
            title: APP_TITLE,
            body,
            footer: &FOOTER_LINKS,
        }
    }

    #[test]
    fn empty_body_keeps_header_and_footer() {
        let html = render_document(&tree(Body::Empty)).unwrap();

        assert!(html.contains(&format!("<h1>{APP_TITLE}</h1>")));
        assert!(!html.contains("<section"));
        assert_eq!(html.matches("<a href=").count(), 4);
        assert!(html.contains("href=\"https://conda-forge.org/docs/\""));
    }

    #[test]
    fn artifact_body_shows_heading_and_path() {
        let html = render_document(&tree(Body::Artifact {
            heading: "numpy v1.24.0".into(),
            path: "numpy-1.24.0.tar.bz2".into(),
        }))
        .unwrap();

        assert!(html.contains("<section class=\"artifact\">"));
        assert!(html.contains("<h2>numpy v1.24.0</h2>"));
        assert!(html.contains("<code>numpy-1.24.0.tar.bz2</code>"));
    }

    #[test]
    fn error_message_is_escaped() {
        let html = render_document(&tree(Body::Error {
            message: "expected `<` & \"quote\"".into(),
        }))
        .unwrap();

        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("expected `&lt;` &amp; &quot;quote&quot;"));
        assert!(!html.contains("<` &"));
    }
}
