//! Theme templates (Tera)
//!
//! A theme lives in `themes/<name>/` with `templates/post.html`,
//! `templates/index.html`, an optional `static/` tree and an optional
//! `config.toml`. Templates are HTML-autoescaped, so rendered page content
//! must be emitted with `{{ content | safe }}`.

use crate::error::{PressError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

pub const POST_TEMPLATE: &str = "post.html";
pub const INDEX_TEMPLATE: &str = "index.html";

// Built-in default theme, also written out by `t2press init`
pub const BUILTIN_BASE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% block title %}{{ site_name }}{% endblock title %}</title>
  <link rel="stylesheet" href="{{ base_url }}static/style.css">
  <link rel="stylesheet" href="{{ base_url }}static/highlight.css">
</head>
<body>
  <header><a href="{{ base_url }}index.html">{{ site_name }}</a></header>
  <main>{% block content %}{% endblock content %}</main>
</body>
</html>
"#;

pub const BUILTIN_POST: &str = r#"{% extends "base.html" %}
{% block title %}{{ title }} | {{ site_name }}{% endblock title %}
{% block content %}
<article>
  <h1>{{ title }}</h1>
  {% if date %}<time datetime="{{ date }}">{{ date }}</time>{% endif %}
  {% if tags %}<ul class="tags">{% for tag in tags %}<li>{{ tag }}</li>{% endfor %}</ul>{% endif %}
  {{ content | safe }}
</article>
{% endblock content %}
"#;

pub const BUILTIN_INDEX: &str = r#"{% extends "base.html" %}
{% block content %}
<ul class="posts">
{% for post in posts %}
  <li>
    <a href="{{ base_url }}{{ post.url }}">{{ post.title }}</a>
    {% if post.date %}<time datetime="{{ post.date }}">{{ post.date }}</time>{% endif %}
    {% if post.summary %}<p>{{ post.summary }}</p>{% endif %}
  </li>
{% endfor %}
</ul>
{% endblock content %}
"#;

pub const BUILTIN_STYLE: &str = r#"body { max-width: 48rem; margin: 0 auto; padding: 1rem; font-family: sans-serif; line-height: 1.7; }
.code-block pre { overflow-x: auto; padding: 1rem; background: #f6f8fa; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ccc; padding: 0.25rem 0.5rem; }
th.corner { position: relative; }
th.corner .corner-divider { position: absolute; inset: 0; width: 100%; height: 100%; }
.checkbox label { display: flex; gap: 0.5rem; }
"#;

pub const BUILTIN_THEME_CONFIG: &str = "code_theme = \"InspiredGitHub\"\n";

/// A loaded set of templates
pub struct Theme {
    tera: Tera,
    static_dir: Option<PathBuf>,
}

impl Theme {
    /// Load the theme at `theme_dir`, or the built-in theme if it has no templates
    pub fn load(theme_dir: &Path) -> Result<Self> {
        let templates_dir = theme_dir.join("templates");
        if !templates_dir.is_dir() {
            log::info!(
                "no templates in {}, using the built-in theme",
                theme_dir.display()
            );
            return Self::builtin();
        }

        let pattern = templates_dir.join("**").join("*.html");
        let tera = Tera::new(&pattern.to_string_lossy())?;
        for required in [POST_TEMPLATE, INDEX_TEMPLATE] {
            if !tera.get_template_names().any(|name| name == required) {
                return Err(PressError::Config(format!(
                    "Theme at {} is missing templates/{}",
                    theme_dir.display(),
                    required
                )));
            }
        }

        let static_dir = theme_dir.join("static");
        Ok(Theme {
            tera,
            static_dir: static_dir.is_dir().then_some(static_dir),
        })
    }

    /// The built-in default theme
    pub fn builtin() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BUILTIN_BASE),
            (POST_TEMPLATE, BUILTIN_POST),
            (INDEX_TEMPLATE, BUILTIN_INDEX),
        ])?;
        Ok(Theme {
            tera,
            static_dir: None,
        })
    }

    /// Static asset directory of this theme, if any
    pub fn static_dir(&self) -> Option<&Path> {
        self.static_dir.as_deref()
    }

    pub fn render_post(&self, context: &Context) -> Result<String> {
        Ok(self.tera.render(POST_TEMPLATE, context)?)
    }

    pub fn render_index(&self, context: &Context) -> Result<String> {
        Ok(self.tera.render(INDEX_TEMPLATE, context)?)
    }

    /// Render a standalone template file (e.g. `static/style.css.j2`)
    pub fn render_file(&self, path: &Path, context: &Context) -> Result<String> {
        let source = fs::read_to_string(path)?;
        Ok(Tera::one_off(&source, context, false)?)
    }
}
