//! The question-answering flow behind `POST /message`.
//!
//! Three tiers, degrading left to right:
//!
//! 1. retrieval + summarization: query the ZeroEntropy collection, map
//!    result paths back to local posts, summarize them through the LLM and
//!    render the Markdown answer to HTML. If posts resolve but the
//!    summarizer fails, a plain listing of the result paths is returned
//!    instead (tier 2b).
//! 2. remote forwarding: hand the question to a configured external
//!    answer engine.
//! 3. the configured static default response.
//!
//! `answer` never returns an error: every upstream failure is caught at
//! its tier boundary and logged, and the caller always gets a string.

use std::sync::Arc;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::ChatConfig;
use crate::db::PostStore;
use crate::error::{NewsdeskError, Result};
use crate::llm::{prompts, SummarizerProvider};
use crate::markdown;
use crate::models::Post;
use crate::retrieval::{extract_post_id, RetrievalProvider, RetrievalResult};

static SUMMARY_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##\s*(.+)").expect("valid regex"));

/// One `## `-headed section of the summarizer's reply. Paired with the
/// submitted posts by position, not by title.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SummaryBlock {
    title: String,
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RemoteAnswer {
    answer: Option<String>,
}

#[derive(Clone)]
pub struct AnswerService {
    store: Arc<dyn PostStore>,
    retrieval: RetrievalProvider,
    summarizer: SummarizerProvider,
    chat: ChatConfig,
    http: reqwest::Client,
}

impl AnswerService {
    pub fn new(
        store: Arc<dyn PostStore>,
        retrieval: RetrievalProvider,
        summarizer: SummarizerProvider,
        chat: ChatConfig,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(chat.remote_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            store,
            retrieval,
            summarizer,
            chat,
            http,
        }
    }

    /// Answer a question. Never fails: the worst case is the configured
    /// default response.
    pub async fn answer(&self, question: &str) -> String {
        let question = question.trim();

        if !self.chat.enabled {
            return self.chat.default_response.clone();
        }

        info!(
            question,
            collection = self.retrieval.collection().unwrap_or("<none>"),
            "Chat question received"
        );

        if self.retrieval.is_available() {
            match self.retrieve_and_summarize(question).await {
                Ok(answer) => return answer,
                Err(e) => warn!(error = %e, "Retrieval tier failed, falling through"),
            }
        }

        if self.chat.use_remote {
            if let Some(remote_url) = &self.chat.remote_url {
                match self.forward_remote(remote_url, question).await {
                    Ok(answer) => return answer,
                    Err(e) => warn!(error = %e, "Remote engine failed, falling through"),
                }
            }
        }

        self.chat.default_response.clone()
    }

    async fn retrieve_and_summarize(&self, question: &str) -> Result<String> {
        let results = self.retrieval.top_documents(question).await?;
        info!(results = results.len(), "Retrieval returned documents");

        if results.is_empty() {
            return Err(NewsdeskError::NoResults(
                "Retrieval returned no documents".to_string(),
            ));
        }

        let posts = self.resolve_posts(&results).await;
        info!(posts = posts.len(), "Resolved local posts from result paths");

        if posts.is_empty() {
            return Ok(Self::path_listing(&results));
        }

        match self.summarize(&posts).await {
            Ok(html) => Ok(html),
            Err(e) => {
                warn!(error = %e, "Summarization failed, listing result paths");
                Ok(Self::path_listing(&results))
            }
        }
    }

    /// Map result paths to local posts. Paths without a `post_<id>` marker
    /// and ids with no matching post are skipped, not errors.
    async fn resolve_posts(&self, results: &[RetrievalResult]) -> Vec<Post> {
        let mut posts = Vec::new();
        for result in results {
            let Some(id) = extract_post_id(&result.path) else {
                continue;
            };
            match self.store.get_post(id).await {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {}
                Err(e) => warn!(post_id = id, error = %e, "Post lookup failed, skipping"),
            }
        }
        posts
    }

    async fn summarize(&self, posts: &[Post]) -> Result<String> {
        let prompt = prompts::summary_prompt(posts);
        let content = self
            .summarizer
            .complete(&prompt, Some(prompts::SUMMARY_SYSTEM_PROMPT))
            .await?;

        let blocks = split_summary_blocks(&content);
        if blocks.is_empty() {
            return Err(NewsdeskError::MalformedResponse(
                "Summarizer reply contained no headed sections".to_string(),
            ));
        }

        // Positional pairing: block i belongs to submitted post i. A
        // summarizer that omits or reorders headings mislinks articles;
        // accepted behavior, not corrected here.
        let mut answer = String::new();
        for (index, block) in blocks.iter().enumerate() {
            answer.push_str(&format!("## {}\n\n", block.title));
            answer.push_str(&format!("{}\n\n", block.summary));
            if let Some(post) = posts.get(index) {
                answer.push_str(&format!("[Read more]({})\n\n", post.link));
            }
        }

        Ok(markdown::render(&answer))
    }

    /// Tier 2b: the raw result paths as a plain listing.
    fn path_listing(results: &[RetrievalResult]) -> String {
        let mut answer = format!("Found {} relevant document(s):\n\n", results.len());
        for (index, result) in results.iter().enumerate() {
            answer.push_str(&format!("Document {}: {}\n\n", index + 1, result.path));
        }
        answer
    }

    async fn forward_remote(&self, remote_url: &str, question: &str) -> Result<String> {
        let response = self
            .http
            .post(remote_url)
            .json(&json!({ "question": question }))
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await?;
        let parsed: RemoteAnswer = serde_json::from_str(&body)
            .map_err(|e| NewsdeskError::MalformedResponse(format!("remote answer: {e}")))?;
        parsed.answer.ok_or_else(|| {
            NewsdeskError::MalformedResponse("Remote answer missing 'answer' field".to_string())
        })
    }
}

/// Split the summarizer's Markdown reply on `##` heading boundaries. Each
/// heading opens a block whose body runs to the next heading or the end of
/// the text.
fn split_summary_blocks(content: &str) -> Vec<SummaryBlock> {
    let matches: Vec<_> = SUMMARY_HEADING_RE.captures_iter(content).collect();

    let mut blocks = Vec::with_capacity(matches.len());
    for (index, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).expect("match");
        let title = caps[1].trim().to_string();
        let body_end = matches
            .get(index + 1)
            .map(|next| next.get(0).expect("match").start())
            .unwrap_or(content.len());
        let summary = content[whole.end()..body_end].trim().to_string();
        blocks.push(SummaryBlock { title, summary });
    }
    blocks
}
