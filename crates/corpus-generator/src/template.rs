//! Template parsing.
//!
//! A template is split into an ordered list of field references, each with
//! the literal bytes that precede it, plus the literal bytes after the last
//! reference. Two syntaxes produce the same layout:
//!
//! - placeholders: `{"host":{{.host.name}}}`
//! - function calls: `{"host":{{ generate "host.name" }}}`
//!
//! The placeholder engine never fails: anything that is not a complete
//! placeholder is kept as literal text. The function-call engine treats every
//! `{{` as an action and rejects actions it does not understand.

use crate::error::GeneratorError;
use corpus_core::FieldCatalog;

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";
const GENERATE: &[u8] = b"generate";

/// One field reference and the literal text written before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReference {
    pub name: String,
    pub literal_before: Vec<u8>,
}

/// Lossless split of a template into literal and substitution regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateLayout {
    references: Vec<TemplateReference>,
    trailing_literal: Vec<u8>,
}

impl TemplateLayout {
    pub fn new(references: Vec<TemplateReference>, trailing_literal: Vec<u8>) -> Self {
        Self {
            references,
            trailing_literal,
        }
    }

    pub fn references(&self) -> &[TemplateReference] {
        &self.references
    }

    /// Referenced field names in template order, repeats included.
    pub fn ordered_field_names(&self) -> Vec<&str> {
        self.references.iter().map(|r| r.name.as_str()).collect()
    }

    /// Literal preceding the first reference to `name`.
    pub fn literal_before(&self, name: &str) -> Option<&[u8]> {
        self.references
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.literal_before.as_slice())
    }

    pub fn trailing_literal(&self) -> &[u8] {
        &self.trailing_literal
    }

    /// Write the layout back out in placeholder syntax.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for reference in &self.references {
            out.extend_from_slice(&reference.literal_before);
            out.extend_from_slice(b"{{.");
            out.extend_from_slice(reference.name.as_bytes());
            out.extend_from_slice(CLOSE);
        }
        out.extend_from_slice(&self.trailing_literal);
        out
    }
}

/// A template syntax.
pub trait TemplateEngine {
    fn parse(&self, template: &[u8]) -> Result<TemplateLayout, GeneratorError>;
}

/// `{{.field.name}}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEngine;

impl TemplateEngine for PlaceholderEngine {
    fn parse(&self, template: &[u8]) -> Result<TemplateLayout, GeneratorError> {
        Ok(parse_placeholders(template))
    }
}

/// `{{ generate "field.name" }}` actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionCallEngine;

impl TemplateEngine for FunctionCallEngine {
    fn parse(&self, template: &[u8]) -> Result<TemplateLayout, GeneratorError> {
        parse_function_calls(template)
    }
}

/// Split a placeholder template. Infallible.
pub fn parse_placeholders(template: &[u8]) -> TemplateLayout {
    let mut references = Vec::new();
    let mut literal = Vec::new();
    let mut pos = 0;

    while pos < template.len() {
        if template[pos..].starts_with(OPEN) {
            if let Some((name, end)) = match_placeholder(template, pos) {
                references.push(TemplateReference {
                    name,
                    literal_before: std::mem::take(&mut literal),
                });
                pos = end;
                continue;
            }
        }
        literal.push(template[pos]);
        pos += 1;
    }

    TemplateLayout::new(references, literal)
}

/// Match `{{ .name }}` at `start`, returning the name and the end offset.
fn match_placeholder(template: &[u8], start: usize) -> Option<(String, usize)> {
    let mut pos = skip_whitespace(template, start + OPEN.len());
    if template.get(pos) != Some(&b'.') {
        return None;
    }
    pos += 1;

    let name_start = pos;
    while let Some(&b) = template.get(pos) {
        if b.is_ascii_whitespace() || b == b'}' {
            break;
        }
        if b == b'{' {
            return None;
        }
        pos += 1;
    }
    let name = std::str::from_utf8(&template[name_start..pos]).ok()?;
    if name.is_empty() {
        return None;
    }

    pos = skip_whitespace(template, pos);
    if !template[pos..].starts_with(CLOSE) {
        return None;
    }
    Some((name.to_string(), pos + CLOSE.len()))
}

/// Split a function-call template.
pub fn parse_function_calls(template: &[u8]) -> Result<TemplateLayout, GeneratorError> {
    let mut references = Vec::new();
    let mut literal = Vec::new();
    let mut pos = 0;

    while pos < template.len() {
        if !template[pos..].starts_with(OPEN) {
            literal.push(template[pos]);
            pos += 1;
            continue;
        }

        let body_start = pos + OPEN.len();
        let close = find(&template[body_start..], CLOSE).ok_or_else(|| {
            GeneratorError::TemplateSyntax {
                offset: pos,
                message: "unterminated action".to_string(),
            }
        })?;
        let body = &template[body_start..body_start + close];
        let name = parse_generate_call(body).map_err(|message| GeneratorError::TemplateSyntax {
            offset: pos,
            message,
        })?;

        references.push(TemplateReference {
            name,
            literal_before: std::mem::take(&mut literal),
        });
        pos = body_start + close + CLOSE.len();
    }

    Ok(TemplateLayout::new(references, literal))
}

fn parse_generate_call(body: &[u8]) -> Result<String, String> {
    let body = body.trim_ascii();
    let unsupported = || format!("unsupported action '{}'", String::from_utf8_lossy(body));

    let args = body.strip_prefix(GENERATE).ok_or_else(unsupported)?;
    if !args.first().is_some_and(|b| b.is_ascii_whitespace()) {
        return Err(unsupported());
    }

    let quoted = args
        .trim_ascii()
        .strip_prefix(b"\"")
        .and_then(|rest| rest.strip_suffix(b"\""))
        .ok_or_else(|| "generate expects one quoted field name".to_string())?;
    if quoted.is_empty() || quoted.contains(&b'"') {
        return Err("generate expects one quoted field name".to_string());
    }

    std::str::from_utf8(quoted)
        .map(str::to_string)
        .map_err(|_| "field name is not valid UTF-8".to_string())
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A JSON object template covering every catalog field.
///
/// Concrete fields become `"name":{{.name}}` members. Open object fields are
/// bare placeholders since their values are written as inline members.
pub fn default_template(catalog: &FieldCatalog) -> Result<Vec<u8>, GeneratorError> {
    let mut out = vec![b'{'];
    for (i, field) in catalog.fields().iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        if !field.is_open_object() {
            serde_json::to_writer(&mut out, &field.name)?;
            out.push(b':');
        }
        out.extend_from_slice(b"{{.");
        out.extend_from_slice(field.name.as_bytes());
        out.extend_from_slice(CLOSE);
    }
    out.push(b'}');
    Ok(out)
}
