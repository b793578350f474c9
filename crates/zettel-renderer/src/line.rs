//! The line renderer: one line of markdown in, one HTML fragment out.
//!
//! Pure function, no state. The preview engine calls this for every line
//! that is a candidate for rendering and decides what to do with the
//! result; nothing here touches decorations or the host widget.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape_html;
use crate::link::NoteIndex;

/// Upper bound on the byte length of a single line the renderer will
/// accept. Pathological lines (minified JSON pasted into a note, binary
/// garbage) are not worth running the matchers over; the engine shows
/// them raw instead.
pub const MAX_LINE_LEN: usize = 10_000;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static HR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}(-{3,}|\*{3,}|_{3,})\s*$").unwrap());
static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s?(.*)$").unwrap());
static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+\[( |x|X)\]\s+(.*)$").unwrap());
static LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:([-*+])|(\d{1,9})\.)\s+(.*)$").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~([^~]+)~~").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Which construct type a line rendered as.
///
/// At most one per line; see the crate docs for the single-construct
/// policy and the precedence order in [`render_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Heading(u8),
    HorizontalRule,
    Blockquote,
    TaskItem,
    ListItem,
    InlineCode,
    Strong,
    Emphasis,
    Strikethrough,
    Link,
}

/// Result of rendering a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRender {
    /// HTML fragment for the line. When `construct` is `None` this is
    /// just the escaped source text and visually indistinct from raw.
    pub html: String,
    /// The construct type that was applied, if any.
    pub construct: Option<Construct>,
}

impl LineRender {
    fn raw(line: &str) -> Self {
        Self {
            html: escape_html(line),
            construct: None,
        }
    }

    fn rendered(html: String, construct: Construct) -> Self {
        Self {
            html,
            construct: Some(construct),
        }
    }
}

/// Faults the renderer can raise on malformed input.
///
/// The preview engine treats any of these as "show the line raw".
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("line exceeds maximum renderable length ({len} > {MAX_LINE_LEN} bytes)")]
    LineTooLong { len: usize },
    #[error("input contains a line break; the line renderer takes exactly one line")]
    NotSingleLine,
}

/// Render one line of markdown to an HTML fragment.
///
/// Precedence order (first matching construct type wins, others on the
/// same line stay escaped raw text): heading, horizontal rule,
/// blockquote, task item, list item, inline code, strong, emphasis,
/// strikethrough, link.
///
/// Inline construct types are applied to every occurrence on the line
/// (`replace_all` semantics), but only for the single winning type.
///
/// Block markers with no content (`"# "`, `"> "`, `"- "`) stay raw: the
/// resulting element would display nothing while covering the marker
/// characters, and rendering must never hide content.
pub fn render_line<N: NoteIndex>(line: &str, index: &N) -> Result<LineRender, RenderError> {
    if line.contains('\n') {
        return Err(RenderError::NotSingleLine);
    }
    if line.len() > MAX_LINE_LEN {
        return Err(RenderError::LineTooLong { len: line.len() });
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        // A bare marker ("# ") renders to an empty element, which would
        // hide the marker characters while showing nothing in their
        // place. No content, no construct.
        if caps[2].trim().is_empty() {
            return Ok(LineRender::raw(line));
        }
        let level = caps[1].len() as u8;
        let html = format!("<h{level}>{}</h{level}>", escape_html(&caps[2]));
        return Ok(LineRender::rendered(html, Construct::Heading(level)));
    }

    if HR_RE.is_match(line) {
        return Ok(LineRender::rendered(
            "<hr />".to_string(),
            Construct::HorizontalRule,
        ));
    }

    if let Some(caps) = BLOCKQUOTE_RE.captures(line) {
        if caps[1].trim().is_empty() {
            return Ok(LineRender::raw(line));
        }
        let html = format!("<blockquote>{}</blockquote>", escape_html(&caps[1]));
        return Ok(LineRender::rendered(html, Construct::Blockquote));
    }

    if let Some(caps) = TASK_RE.captures(line) {
        let checked = !caps[1].trim().is_empty();
        let box_attr = if checked { " checked" } else { "" };
        let html = format!(
            "<li class=\"task-item\"><input type=\"checkbox\" disabled{box_attr} /> {}</li>",
            escape_html(&caps[2])
        );
        return Ok(LineRender::rendered(html, Construct::TaskItem));
    }

    if let Some(caps) = LIST_RE.captures(line) {
        if caps[3].trim().is_empty() {
            return Ok(LineRender::raw(line));
        }
        let html = match caps.get(2) {
            Some(n) => format!("<li value=\"{}\">{}</li>", n.as_str(), escape_html(&caps[3])),
            None => format!("<li>{}</li>", escape_html(&caps[3])),
        };
        return Ok(LineRender::rendered(html, Construct::ListItem));
    }

    // Inline constructs, matched against the raw line so that the note
    // index sees unescaped link targets. Surrounding text is escaped
    // segment by segment.
    if CODE_RE.is_match(line) {
        let html = replace_escaped(line, &CODE_RE, |caps| {
            format!("<code>{}</code>", escape_html(&caps[1]))
        });
        return Ok(LineRender::rendered(html, Construct::InlineCode));
    }

    if STRONG_RE.is_match(line) {
        let html = replace_escaped(line, &STRONG_RE, |caps| {
            format!("<strong>{}</strong>", escape_html(&caps[1]))
        });
        return Ok(LineRender::rendered(html, Construct::Strong));
    }

    if EMPHASIS_RE.is_match(line) {
        let html = replace_escaped(line, &EMPHASIS_RE, |caps| {
            format!("<em>{}</em>", escape_html(&caps[1]))
        });
        return Ok(LineRender::rendered(html, Construct::Emphasis));
    }

    if STRIKE_RE.is_match(line) {
        let html = replace_escaped(line, &STRIKE_RE, |caps| {
            format!("<del>{}</del>", escape_html(&caps[1]))
        });
        return Ok(LineRender::rendered(html, Construct::Strikethrough));
    }

    if LINK_RE.is_match(line) {
        let html = replace_escaped(line, &LINK_RE, |caps| {
            let target = &caps[2];
            let class = if index.contains_note(target) {
                "internal-link"
            } else {
                "internal-link broken"
            };
            format!(
                "<a href=\"{}\" class=\"{class}\">{}</a>",
                escape_html(target),
                escape_html(&caps[1])
            )
        });
        return Ok(LineRender::rendered(html, Construct::Link));
    }

    tracing::trace!(
        target: "zettel::render",
        line_len = line.len(),
        "no construct matched, line stays raw"
    );
    Ok(LineRender::raw(line))
}

/// Replace every match of `re` in `line` via `render`, escaping the
/// unmatched text between matches.
fn replace_escaped<F>(line: &str, re: &Regex, mut render: F) -> String
where
    F: FnMut(&Captures) -> String,
{
    let mut out = String::with_capacity(line.len() + 16);
    let mut last = 0;
    for caps in re.captures_iter(line) {
        let m = caps.get(0).expect("capture group 0 always exists");
        out.push_str(&escape_html(&line[last..m.start()]));
        out.push_str(&render(&caps));
        last = m.end();
    }
    out.push_str(&escape_html(&line[last..]));
    out
}
