//! Jinja templates loaded from the templates directory.
//!
//! Templates ending in `.html` are auto-escaped; values that already carry
//! markup (rendered lyrics, data URIs) are printed with `| safe`.

use std::path::PathBuf;

use minijinja::{path_loader, Environment};
use serde_json::Value;

use super::TemplateRenderer;
use crate::error::{Error, Result};

/// Loads templates by file name from one directory.
///
/// The environment keeps each template after its first load.
pub struct TemplateStore {
    env: Environment<'static>,
}

impl TemplateStore {
    /// Create a store reading templates from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir.into()));
        Self { env }
    }
}

impl TemplateRenderer for TemplateStore {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        let tmpl = self
            .env
            .get_template(template)
            .map_err(|e| Error::Template(format!("{template}: {e}")))?;
        tmpl.render(context).map_err(|e| Error::Template(format!("{template}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use serde_json::json;

    use super::*;

    fn store_with(name: &str, source: &str) -> (tempfile::TempDir, TemplateStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(name), source).unwrap();
        let store = TemplateStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn html_is_escaped_unless_safe() {
        let (_dir, store) = store_with("page.html", "{{ title }}|{{ lyrics | safe }}");
        let html = store.render("page.html", &json!({"title": "Tom & Jerry", "lyrics": "a<br>b"})).unwrap();
        assert_eq!(html, "Tom &amp; Jerry|a<br>b");
    }

    #[test]
    fn branches_on_sort_order() {
        let src = r#"{% if sort_order == "id" %}ID{% elif sort_order == "title" %}ABC{% else %}?{% endif %}"#;
        let (_dir, store) = store_with("toc.html", src);
        assert_eq!(store.render("toc.html", &json!({"sort_order": "id"})).unwrap(), "ID");
        assert_eq!(store.render("toc.html", &json!({"sort_order": "title"})).unwrap(), "ABC");
        assert_eq!(store.render("toc.html", &json!({})).unwrap(), "?");
    }

    #[test]
    fn loops_and_column_indexing() {
        let src = "{% for s in songs %}{{ loop.index }}.{{ s.title }}{% if not loop.last %},{% endif %}{% endfor %}\
                   |{{ columns[0] }}{% if columns[1] %}+{{ columns[1] }}{% endif %}";
        let (_dir, store) = store_with("list.html", src);
        let ctx = json!({"songs": [{"title": "A"}, {"title": "B"}], "columns": ["left"]});
        assert_eq!(store.render("list.html", &ctx).unwrap(), "1.A,2.B|left");
    }

    #[test]
    fn loaded_templates_are_kept() {
        let (dir, store) = store_with("page.html", "<h1>{{ title }}</h1>");
        assert_eq!(store.render("page.html", &json!({"title": "Alma"})).unwrap(), "<h1>Alma</h1>");
        std::fs::remove_file(dir.path().join("page.html")).unwrap();
        assert_eq!(store.render("page.html", &json!({"title": "Béke"})).unwrap(), "<h1>Béke</h1>");
    }

    #[test]
    fn missing_and_broken_templates_are_errors() {
        let (_dir, store) = store_with("broken.html", "{% if x %}open");
        assert!(matches!(store.render("absent.html", &json!({})), Err(Error::Template(_))));
        assert!(matches!(store.render("broken.html", &json!({})), Err(Error::Template(_))));
    }
}
