//! Prompt templates for the summarization service.
//!
//! The summarizer is asked for one `##`-headed block per article, in the
//! order the articles were submitted. The answer flow pairs headings back
//! to articles by position, so the order instruction matters.

use scraper::Html;

use crate::models::Post;

/// Words of article body included in the summarization context.
const CONTEXT_WORD_LIMIT: usize = 200;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful assistant that provides brief \
summaries. Always respond in markdown format with clear headings.";

/// Build the summarization prompt for a batch of posts.
pub fn summary_prompt(posts: &[Post]) -> String {
    let mut context = String::new();
    for (index, post) in posts.iter().enumerate() {
        context.push_str(&format!("## Article {}: {}\n\n", index + 1, post.title));
        context.push_str(&truncate_words(
            &strip_tags(&post.content),
            CONTEXT_WORD_LIMIT,
        ));
        context.push_str("\n\n");
    }

    format!(
        "Based on the following articles, provide a brief summary (<30 words) for each article.\n\n\
         Articles:\n\n{context}\n\n\
         Format your response in markdown as:\n\
         ## Article Title\n\
         Summary in less than 30 words\n\n"
    )
}

/// Reduce an HTML fragment to its text content.
pub fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep at most `limit` whitespace-separated words.
pub fn truncate_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}
