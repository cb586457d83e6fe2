//! Markdown → HTML rendering for chat answers.
//!
//! Converts the constrained Markdown dialect produced by the summarizer
//! (headings, bold, italic, inline code, links, lists, horizontal rules,
//! paragraphs) into an HTML fragment. The substitutions run in a fixed
//! order; several carry intentional first-match-only semantics that are
//! pinned by tests below, since changing them changes rendered output for
//! existing content.
//!
//! The renderer does **not** escape HTML. Input is trusted content
//! (summarizer output over already-published articles); any escaping of
//! untrusted text must happen before it reaches this function.

use std::sync::LazyLock;

use regex::Regex;

static H3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").expect("valid regex"));
static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").expect("valid regex"));
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").expect("valid regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));
static STAR_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\* (.*)$").expect("valid regex"));
static DASH_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").expect("valid regex"));
static LI_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<li>.*</li>\n?)+").expect("valid regex"));
static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+)\. (.*)$").expect("valid regex"));
static HR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^---$").expect("valid regex"));
static EMPTY_P_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*</p>").expect("valid regex"));
static P_BEFORE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>(<h[1-6]>)").expect("valid regex"));
static P_CLOSE_BEFORE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>(<h[1-6]>)").expect("valid regex"));
static P_BEFORE_UL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>(<ul>)").expect("valid regex"));

/// Render a Markdown string to an HTML fragment.
///
/// Deterministic and stateless: same input, same output. Bold, italic, and
/// inline code are converted for the **first occurrence only** in the whole
/// string; headings, links, list items, and rules are converted globally.
pub fn render(markdown: &str) -> String {
    // Headings, deepest first so "###" is not half-eaten by the "#" pass.
    let text = H3_RE.replace_all(markdown, "<h3>$1</h3>");
    let text = H2_RE.replace_all(&text, "<h2>$1</h2>");
    let text = H1_RE.replace_all(&text, "<h1>$1</h1>");

    // Inline emphasis: first match only.
    let text = BOLD_RE.replace(&text, "<strong>$1</strong>");
    let text = ITALIC_RE.replace(&text, "<em>$1</em>");
    let text = CODE_RE.replace(&text, "<code>$1</code>");

    let text = LINK_RE.replace_all(&text, "<a href=\"$2\" target=\"_blank\">$1</a>");

    // Bulleted items, then wrap each run of consecutive items in a <ul>.
    let text = STAR_ITEM_RE.replace_all(&text, "<li>$1</li>");
    let text = DASH_ITEM_RE.replace_all(&text, "<li>$1</li>");
    let text = LI_RUN_RE.replace_all(&text, "<ul>$0</ul>");

    // Numbered items convert after the wrap pass, so they end up as bare
    // <li> elements outside any <ul>.
    let text = NUMBERED_ITEM_RE.replace_all(&text, "<li>$2</li>");

    let text = HR_RE.replace_all(&text, "<hr>");

    // Paragraphs: each blank line is a boundary, one outer wrapper.
    let text = text.replace("\n\n", "</p><p>");
    let text = format!("<p>{text}</p>");

    // Cleanup: drop empty paragraphs and paragraph tags that would
    // otherwise nest around block elements.
    let text = EMPTY_P_RE.replace_all(&text, "");
    let text = P_BEFORE_HEADING_RE.replace_all(&text, "$1");
    let text = P_CLOSE_BEFORE_HEADING_RE.replace_all(&text, "$1");
    let text = P_BEFORE_UL_RE.replace_all(&text, "$1");
    text.replace("</ul></p>", "</ul>")
}
