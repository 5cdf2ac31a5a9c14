use std::fs;
use std::path::Path;

use chrono::{DateTime, Datelike, Utc};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext as HandlebarsRenderContext,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ServerError, ServerResult};

/// Name of the layout partial every page wraps itself in.
pub const LAYOUT: &str = "base";

const BUILT_IN_LAYOUT: &str = include_str!("../templates/base.hbs");

/// Page templates with their built-in sources.
pub const PAGES: [(&str, &str); 12] = [
    ("home", include_str!("../templates/home.hbs")),
    ("articles", include_str!("../templates/articles.hbs")),
    ("article_detail", include_str!("../templates/article_detail.hbs")),
    ("fragments", include_str!("../templates/fragments.hbs")),
    ("fragment_detail", include_str!("../templates/fragment_detail.hbs")),
    ("shelf", include_str!("../templates/shelf.hbs")),
    ("shelf_detail", include_str!("../templates/shelf_detail.hbs")),
    ("pixels", include_str!("../templates/pixels.hbs")),
    ("about", include_str!("../templates/about.hbs")),
    ("now", include_str!("../templates/now.hbs")),
    ("uses", include_str!("../templates/uses.hbs")),
    ("not_found", include_str!("../templates/not_found.hbs")),
];

const TEMPLATE_EXTENSION: &str = "hbs";

/// Query-value encoding: everything except unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Templates compiled once at startup and executed per request.
pub struct TemplateCache {
    registry: Handlebars<'static>,
    site_title: String,
}

impl TemplateCache {
    /// Compiles the layout and every page, preferring `<dir>/<name>.hbs` when present.
    pub fn load(dir: Option<&Path>, site_title: impl Into<String>) -> ServerResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_helper("formatDate", Box::new(format_date_helper));
        registry.register_helper("urlencode", Box::new(urlencode_helper));

        let layout = template_source(dir, LAYOUT, BUILT_IN_LAYOUT)?;
        registry
            .register_partial(LAYOUT, layout)
            .map_err(|source| ServerError::TemplateSyntax {
                name: LAYOUT.to_string(),
                source: Box::new(source),
            })?;

        for (name, built_in) in PAGES {
            let source = template_source(dir, name, built_in)?;
            registry
                .register_template_string(name, source)
                .map_err(|source| ServerError::TemplateSyntax {
                    name: name.to_string(),
                    source: Box::new(source),
                })?;
        }

        Ok(TemplateCache {
            registry,
            site_title: site_title.into(),
        })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    /// Executes `name` against `data` with `year` and `site_title` injected.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> ServerResult<String> {
        let mut context = serde_json::to_value(data)?;
        if let Value::Object(fields) = &mut context {
            fields.insert("year".into(), Value::from(Utc::now().year()));
            fields.insert("site_title".into(), Value::from(self.site_title.clone()));
        }

        self.registry
            .render(name, &context)
            .map_err(|source| ServerError::Template {
                name: name.to_string(),
                source: Box::new(source),
            })
    }
}

fn template_source(dir: Option<&Path>, name: &str, built_in: &str) -> ServerResult<String> {
    let Some(dir) = dir else {
        return Ok(built_in.to_string());
    };

    let path = dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
    if !path.is_file() {
        return Ok(built_in.to_string());
    }

    tracing::debug!(template = name, path = %path.display(), "using template override");
    fs::read_to_string(&path).map_err(|source| ServerError::TemplateRead { path, source })
}

/// `{{formatDate date}}`: RFC 3339 timestamps become `January 2, 2006`.
fn format_date_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HandlebarsRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&format_date(raw))?;
    Ok(())
}

/// `{{urlencode tag}}`: percent-encodes a value for use inside a query string.
fn urlencode_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HandlebarsRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&utf8_percent_encode(raw, QUERY_VALUE).to_string())?;
    Ok(())
}

fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
