use std::sync::Arc;

use crate::config::Config;
use crate::db::PostStore;
use crate::importer::ImportService;
use crate::llm::SummarizerProvider;
use crate::retrieval::RetrievalProvider;
use crate::services::{AnswerService, SyncService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn PostStore>,
    pub retrieval: RetrievalProvider,
    pub summarizer: SummarizerProvider,
    pub answer: AnswerService,
    pub sync: SyncService,
    pub importer: ImportService,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn PostStore>,
        retrieval: RetrievalProvider,
        summarizer: SummarizerProvider,
    ) -> Self {
        let config = Arc::new(config);
        let answer = AnswerService::new(
            store.clone(),
            retrieval.clone(),
            summarizer.clone(),
            config.chat.clone(),
        );
        let sync = SyncService::new(store.clone(), retrieval.clone(), config.sync.clone());
        let importer = ImportService::new(
            store.clone(),
            config.importer.clone(),
            config.server.public_url.clone(),
        );

        Self {
            config,
            store,
            retrieval,
            summarizer,
            answer,
            sync,
            importer,
        }
    }
}
