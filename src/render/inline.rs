//! Inline documentation markup → markdown.
//!
//! - `<see cref="T:..."/>` → type link (see [`crate::resolve`])
//! - `<see cref="M:..."/>` and other member crefs → inline code
//! - `<c>x</c>`, `<paramref name="x"/>`, `<see langword="x"/>` → `` `x` ``
//! - `<code>...</code>` → fenced block
//! - `<para>` → paragraph break

use crate::parser::member_id::extract_parameters;
use crate::render::RenderContext;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<code(?:\s[^>]*)?>(.*?)</code>").unwrap());

static RE_PARA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?para\s*/?>").unwrap());

static RE_SEE_CREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<see(?:also)?\s+cref="([^"]*)"\s*(?:/>|>(.*?)</see(?:also)?>)"#).unwrap()
});

static RE_LANGWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<see\s+langword="([^"]*)"\s*/>"#).unwrap());

static RE_PARAMREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<(?:type)?paramref\s+name="([^"]*)"\s*/>"#).unwrap());

static RE_INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<c>(.*?)</c>").unwrap());

static RE_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<a\s+href="([^"]*)"\s*>(.*?)</a>"#).unwrap());

static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert one tag's inner markup to markdown for the current page.
pub fn convert(text: &str, ctx: &RenderContext) -> String {
    let mut out = String::new();
    let mut last = 0;
    for caps in RE_CODE_BLOCK.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&convert_prose(&text[last..whole.start()], ctx));
        out.push_str("\n\n```\n");
        out.push_str(unindent(&decode_entities(&caps[1])).trim_matches('\n'));
        out.push_str("\n```\n\n");
        last = whole.end();
    }
    out.push_str(&convert_prose(&text[last..], ctx));

    RE_BLANK_RUN.replace_all(out.trim(), "\n\n").into_owned()
}

fn convert_prose(text: &str, ctx: &RenderContext) -> String {
    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    let text = RE_PARA.replace_all(&text, "\n\n");
    let text = RE_SEE_CREF.replace_all(&text, |caps: &Captures| {
        cref_markdown(&caps[1], caps.get(2).map(|m| m.as_str()), ctx)
    });
    let text = RE_LANGWORD.replace_all(&text, "`$1`");
    let text = RE_PARAMREF.replace_all(&text, "`$1`");
    let text = RE_INLINE_CODE.replace_all(&text, "`$1`");
    let text = RE_ANCHOR.replace_all(&text, "[$2]($1)");
    decode_entities(&text)
}

/// Markdown for a `cref` target. Types link; members render as code.
fn cref_markdown(cref: &str, label: Option<&str>, ctx: &RenderContext) -> String {
    match cref.split_once(':') {
        Some(("T", name)) => ctx.link_name(name),
        Some((_, member)) => match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => format!("`{}`", label),
            None => format!("`{}`", member_label(member)),
        },
        None => format!("`{}`", cref),
    }
}

/// `Acme.Client.GetUser(System.Int32)` → `Client.GetUser`
fn member_label(member: &str) -> String {
    let (name, _) = extract_parameters(member);
    let name = name.replace("#ctor", "ctor");
    let segments: Vec<&str> = name.rsplitn(3, '.').collect();
    match segments.as_slice() {
        [member, owner, ..] => format!("{}.{}", owner, member),
        _ => name.to_string(),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Remove common leading indentation from a multi-line string.
fn unindent(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let start = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(0);
    if start >= lines.len() {
        return text.to_string();
    }

    let min_indent = lines[start..]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);

    lines[start..]
        .iter()
        .map(|l| &l[indent_width(l).min(min_indent)..])
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leading spaces and tabs. Other whitespace is content.
fn indent_width(line: &str) -> usize {
    line.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}
