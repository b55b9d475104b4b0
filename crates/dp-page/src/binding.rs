//! Helpers exposed to page templates.
//!
//! A [`Binding`] is built for one render call. It holds the page's headings
//! and borrowed collaborators, and turns them into the [`HelperTable`] the
//! template is evaluated against. Partials get a child binding one level
//! deeper, so nesting is bounded.

use std::fmt::Write;

use dp_renderer::{MarkdownRenderer, slugify};
use dp_template::{CallArgs, Evaluator, HelperError, HelperTable, Value};

use crate::collaborators::Collaborators;
use crate::image::image_html;
use crate::renderer::PageRendererConfig;
use crate::webhooks::webhook_description;

#[derive(Clone)]
pub(crate) struct Binding<'a> {
    headings: &'a [String],
    collaborators: Collaborators<'a>,
    /// `docs/<basename>`, the page's own asset directory.
    image_path: String,
    config: &'a PageRendererConfig,
    markdown: &'a MarkdownRenderer,
    depth: usize,
}

impl<'a> Binding<'a> {
    pub(crate) fn new(
        headings: &'a [String],
        collaborators: Collaborators<'a>,
        basename: &str,
        config: &'a PageRendererConfig,
        markdown: &'a MarkdownRenderer,
    ) -> Self {
        Self {
            headings,
            collaborators,
            image_path: format!("docs/{basename}"),
            config,
            markdown,
            depth: 0,
        }
    }

    /// Every helper a page template can call.
    pub(crate) fn helper_table(&self) -> HelperTable<'_> {
        HelperTable::new()
            .with("webhook_description", |args| {
                let event = args.str_arg(0)?;
                let description = webhook_description(event);
                if description.is_none() {
                    tracing::debug!(event, "Unknown webhook event");
                }
                Ok(Value::from(description))
            })
            .with("toc", move |_| Ok(Value::Str(self.toc())))
            .with("estimated_time", |args| {
                let description = args.get(0).ok_or(HelperError::MissingArgument { index: 0 })?;
                Ok(Value::Str(estimated_time(description)))
            })
            .with("image", move |args| {
                let name = args.str_arg(0)?;
                image_html(&self.image_url(name), name, args.options()).map(Value::Str)
            })
            .with("paginated_resource_docs_url", move |_| {
                Ok(Value::Str(format!(
                    "{}/rest-api#pagination",
                    self.config.docs_path
                )))
            })
            .with("t", move |args| {
                let key = args.str_arg(0)?;
                Ok(Value::Str(self.collaborators.translator.translate(key)))
            })
            .with("render", move |args| self.render_partial(args).map(Value::Str))
            .with("render_markdown", move |args| {
                let partial = self.render_partial(args)?;
                Ok(Value::Str(self.markdown.render(&partial)))
            })
    }

    /// Table of contents linking to every `##` heading, or nothing for pages
    /// with fewer than two headings.
    fn toc(&self) -> String {
        if self.headings.len() <= 1 {
            return String::new();
        }

        let mut html = String::from(r#"<div class="Docs__toc"><p>On this page:</p><ul>"#);
        for heading in self.headings {
            let _ = write!(
                html,
                r##"<li><a href="#{}">{heading}</a></li>"##,
                slugify(heading)
            );
        }
        html.push_str("</ul></div>");
        html
    }

    fn image_url(&self, name: &str) -> String {
        let dir = self
            .image_path
            .strip_prefix("docs/")
            .unwrap_or(&self.image_path)
            .trim_end_matches('/');
        let name = name.trim_start_matches('/');
        let logical_path = if dir.is_empty() {
            name.to_owned()
        } else {
            format!("{dir}/{name}")
        };
        self.collaborators.assets.asset_url(&logical_path)
    }

    /// Evaluate the partial at `args[0]` with keyword options bound as locals.
    fn render_partial(&self, args: &CallArgs) -> Result<String, HelperError> {
        let path = format!("{}{}", args.str_arg(0)?, self.config.partial_extension);
        if args.positional().len() > 1 {
            return Err(HelperError::InvalidArgument(format!(
                "partial locals for {path} must be keyword options"
            )));
        }

        let depth = self.depth + 1;
        if depth > self.config.max_partial_depth {
            return Err(HelperError::PartialDepth(self.config.max_partial_depth));
        }

        let source = self
            .collaborators
            .partials
            .partial_source(&path)
            .ok_or_else(|| HelperError::PartialNotFound(path.clone()))?;
        tracing::debug!(partial = %path, depth, "Rendering partial");

        let child = Self {
            depth,
            ..self.clone()
        };
        let helpers = child.helper_table();
        Evaluator::new(&helpers)
            .evaluate_with_locals(&source, args.options().to_vec())
            .map_err(|source| HelperError::Partial {
                path,
                source: Box::new(source),
            })
    }
}

fn estimated_time(description: &Value) -> String {
    format!(r#"<p class="Docs__time-estimate">Estimated time: {description}</p>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MapTranslator, MemoryPartials, StaticAssets};
    use dp_template::TemplateError;
    use pretty_assertions::assert_eq;

    struct Fixture {
        assets: StaticAssets,
        translator: MapTranslator,
        partials: MemoryPartials,
        config: PageRendererConfig,
        markdown: MarkdownRenderer,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                assets: StaticAssets::new("/assets"),
                translator: MapTranslator::new().with("pipelines.title", "Pipelines"),
                partials: MemoryPartials::new()
                    .with("shared/_note.md", "Note for <%= who %>")
                    .with("shared/_list.md", "- one\n- two\n")
                    .with("shared/_outer.md", "[<%= render(\"shared/_note\", who: \"outer\") %>]")
                    .with("shared/_loop.md", "<%= render(\"shared/_loop\") %>")
                    .with("shared/_broken.md", "<%= nope %>"),
                config: PageRendererConfig::default(),
                markdown: MarkdownRenderer::new(),
            }
        }

        fn binding<'a>(&'a self, headings: &'a [String]) -> Binding<'a> {
            Binding::new(
                headings,
                Collaborators::new(&self.assets, &self.translator, &self.partials),
                "agent/v3/hooks",
                &self.config,
                &self.markdown,
            )
        }
    }

    fn eval(binding: &Binding<'_>, source: &str) -> Result<String, TemplateError> {
        let helpers = binding.helper_table();
        Evaluator::new(&helpers).evaluate(source)
    }

    fn headings(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|&l| l.to_owned()).collect()
    }

    #[test]
    fn test_toc_empty_for_zero_or_one_heading() {
        let fixture = Fixture::new();
        assert_eq!(fixture.binding(&[]).toc(), "");
        assert_eq!(fixture.binding(&headings(&["Only"])).toc(), "");
    }

    #[test]
    fn test_toc_lists_headings_in_order() {
        let fixture = Fixture::new();
        let labels = headings(&["Getting started", "Agent tags", "Getting started"]);
        assert_eq!(
            fixture.binding(&labels).toc(),
            concat!(
                r#"<div class="Docs__toc"><p>On this page:</p><ul>"#,
                r##"<li><a href="#getting-started">Getting started</a></li>"##,
                r##"<li><a href="#agent-tags">Agent tags</a></li>"##,
                r##"<li><a href="#getting-started">Getting started</a></li>"##,
                "</ul></div>"
            )
        );
    }

    #[test]
    fn test_webhook_description_helper() {
        let fixture = Fixture::new();
        let binding = fixture.binding(&[]);
        assert_eq!(
            eval(&binding, r#"<%= webhook_description("build.scheduled") %>"#).unwrap(),
            "A build has been scheduled"
        );
        assert_eq!(
            eval(&binding, r#"[<%= webhook_description("unknown.event") %>]"#).unwrap(),
            "[]"
        );
    }

    #[test]
    fn test_estimated_time() {
        let fixture = Fixture::new();
        let binding = fixture.binding(&[]);
        assert_eq!(
            eval(&binding, r#"<%= estimated_time "5 minutes" %>"#).unwrap(),
            r#"<p class="Docs__time-estimate">Estimated time: 5 minutes</p>"#
        );
        assert_eq!(
            eval(&binding, "<%= estimated_time(10) %>").unwrap(),
            r#"<p class="Docs__time-estimate">Estimated time: 10</p>"#
        );
        assert!(eval(&binding, "<%= estimated_time %>").is_err());
    }

    #[test]
    fn test_image_url_strips_docs_prefix() {
        let fixture = Fixture::new();
        let binding = fixture.binding(&[]);
        assert_eq!(
            binding.image_url("diagram.png"),
            "/assets/agent/v3/hooks/diagram.png"
        );
    }

    #[test]
    fn test_image_helper() {
        let fixture = Fixture::new();
        let binding = fixture.binding(&[]);
        assert_eq!(
            eval(&binding, r#"<%= image "pic.png", size: "100x50" %>"#).unwrap(),
            r#"<div style="max-width: 100px"><div class="responsive-image-container" style="padding-bottom: 50%"><img src="/assets/agent/v3/hooks/pic.png" alt="Pic"></div></div>"#
        );
        assert_eq!(
            eval(&binding, r#"<%= image("pic.png") %>"#).unwrap(),
            r#"<img src="/assets/agent/v3/hooks/pic.png" alt="Pic">"#
        );
    }

    #[test]
    fn test_paginated_resource_docs_url() {
        let fixture = Fixture::new();
        assert_eq!(
            eval(&fixture.binding(&[]), "<%= paginated_resource_docs_url %>").unwrap(),
            "/docs/rest-api#pagination"
        );
    }

    #[test]
    fn test_translate() {
        let fixture = Fixture::new();
        assert_eq!(
            eval(&fixture.binding(&[]), r#"<%= t("pipelines.title") %>"#).unwrap(),
            "Pipelines"
        );
    }

    #[test]
    fn test_render_partial_with_locals() {
        let fixture = Fixture::new();
        assert_eq!(
            eval(
                &fixture.binding(&[]),
                r#"<%= render "shared/_note", who: "agents" %>"#
            )
            .unwrap(),
            "Note for agents"
        );
    }

    #[test]
    fn test_nested_partials() {
        let fixture = Fixture::new();
        assert_eq!(
            eval(&fixture.binding(&[]), r#"<%= render("shared/_outer") %>"#).unwrap(),
            "[Note for outer]"
        );
    }

    #[test]
    fn test_render_markdown_partial() {
        let fixture = Fixture::new();
        assert_eq!(
            eval(&fixture.binding(&[]), r#"<%= render_markdown("shared/_list") %>"#).unwrap(),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_missing_partial() {
        let fixture = Fixture::new();
        let err = eval(&fixture.binding(&[]), r#"<%= render("shared/_absent") %>"#).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Helper {
                source: HelperError::PartialNotFound(ref path),
                ..
            } if path == "shared/_absent.md"
        ));
    }

    #[test]
    fn test_recursive_partial_hits_depth_limit() {
        let fixture = Fixture::new();
        let err = eval(&fixture.binding(&[]), r#"<%= render("shared/_loop") %>"#).unwrap_err();

        let mut source: &dyn std::error::Error = &err;
        while let Some(next) = source.source() {
            source = next;
        }
        assert_eq!(source.to_string(), "partials nested deeper than 10 levels");
    }

    #[test]
    fn test_partial_error_names_partial() {
        let fixture = Fixture::new();
        let err = eval(&fixture.binding(&[]), r#"<%= render("shared/_broken") %>"#).unwrap_err();
        let TemplateError::Helper {
            source: HelperError::Partial { path, source },
            ..
        } = &err
        else {
            panic!("expected a partial error, got {err:?}");
        };
        assert_eq!(path, "shared/_broken.md");
        assert!(matches!(**source, TemplateError::Undefined { ref name, .. } if name == "nope"));
    }

    #[test]
    fn test_partial_locals_must_be_options() {
        let fixture = Fixture::new();
        let err = eval(
            &fixture.binding(&[]),
            r#"<%= render("shared/_note", "agents") %>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Helper {
                source: HelperError::InvalidArgument(_),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_helper_is_error() {
        let fixture = Fixture::new();
        let err = eval(&fixture.binding(&[]), "<%= table_of_contents %>").unwrap_err();
        assert!(matches!(err, TemplateError::Undefined { .. }));
    }
}
