//! Markup for the `image` helper.

use std::fmt::Write;

use dp_renderer::escape_html;
use dp_template::{HelperError, Value};

const RESPONSIVE_CONTAINER_CLASS: &str = "responsive-image-container";

/// Build image markup for `src`.
///
/// `size: "WxH"` is shorthand for `width` and `height` and overrides both.
/// When width and height are known, the image sits in a container whose
/// `padding-bottom` keeps the aspect ratio, inside a wrapper capped at the
/// image width. Otherwise a plain `<img>` carries the options as attributes.
///
/// `alt` defaults to the humanized file stem of `name`, on both paths. Plain
/// images gain an `alt` the caller did not pass; every other option goes
/// through as given.
pub(crate) fn image_html(
    src: &str,
    name: &str,
    options: &[(String, Value)],
) -> Result<String, HelperError> {
    let mut attrs: Vec<(String, Value)> = options
        .iter()
        .filter(|(key, _)| key != "size")
        .cloned()
        .collect();

    if let Some((_, size)) = options.iter().find(|(key, _)| key == "size") {
        let (width, height) = parse_size(size)?;
        set_attr(&mut attrs, "width", Value::Int(width.into()));
        set_attr(&mut attrs, "height", Value::Int(height.into()));
    }

    if !attrs.iter().any(|(key, _)| key == "alt") {
        attrs.insert(0, ("alt".to_owned(), Value::Str(humanize_stem(name))));
    }

    let (Some(width), Some(height)) = (attr(&attrs, "width"), attr(&attrs, "height")) else {
        return Ok(img_tag(src, &attrs));
    };
    let width = dimension(width, "width")?;
    let height = dimension(height, "height")?;
    attrs.retain(|(key, _)| !matches!(key.as_str(), "width" | "height" | "max_width"));

    let padding = f64::from(height) / f64::from(width) * 100.0;
    Ok(format!(
        r#"<div style="max-width: {width}px"><div class="{RESPONSIVE_CONTAINER_CLASS}" style="padding-bottom: {padding}%">{}</div></div>"#,
        img_tag(src, &attrs)
    ))
}

fn img_tag(src: &str, attrs: &[(String, Value)]) -> String {
    let mut tag = format!(r#"<img src="{}""#, escape_html(src));
    for (key, value) in attrs {
        match value {
            Value::Nil | Value::Bool(false) => {}
            Value::Bool(true) => {
                let _ = write!(tag, r#" {key}="{key}""#);
            }
            other => {
                let _ = write!(tag, r#" {key}="{}""#, escape_html(&other.to_string()));
            }
        }
    }
    tag.push('>');
    tag
}

fn attr<'v>(attrs: &'v [(String, Value)], key: &str) -> Option<&'v Value> {
    attrs.iter().find_map(|(k, v)| (k == key).then_some(v))
}

fn set_attr(attrs: &mut Vec<(String, Value)>, key: &str, value: Value) {
    match attrs.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value,
        None => attrs.push((key.to_owned(), value)),
    }
}

/// Parse `"640x480"` into width and height.
fn parse_size(size: &Value) -> Result<(u32, u32), HelperError> {
    let invalid = || {
        HelperError::InvalidArgument(format!(
            "image size must look like `WIDTHxHEIGHT`, got `{size}`"
        ))
    };
    let (width, height) = size
        .as_str()
        .and_then(|s| s.split_once('x'))
        .ok_or_else(invalid)?;
    let parse = |n: &str| n.trim().parse::<u32>().ok().filter(|&n| n > 0);
    match (parse(width), parse(height)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(invalid()),
    }
}

fn dimension(value: &Value, field: &str) -> Result<u32, HelperError> {
    value
        .to_int()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            HelperError::InvalidArgument(format!(
                "image {field} must be a positive integer, got `{value}`"
            ))
        })
}

/// `"images/pipeline_upload-step.png"` becomes `"Pipeline upload step"`.
fn humanize_stem(name: &str) -> String {
    let file = name.rsplit('/').next().unwrap_or(name);
    let stem = match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    };
    let words = stem.replace(['-', '_'], " ").to_lowercase();

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
