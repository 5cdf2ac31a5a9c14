use std::sync::Arc;

use journal_config::Config;
use journal_content::ContentStore;

use crate::error::ServerResult;
use crate::templates::TemplateCache;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Reads content from disk per request
    pub store: Arc<ContentStore>,

    /// Templates compiled at startup
    pub templates: Arc<TemplateCache>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: ContentStore, templates: TemplateCache, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            templates: Arc::new(templates),
            config: Arc::new(config),
        }
    }

    /// State wired from configuration: content root, template overrides and site title.
    pub fn from_config(config: Config) -> ServerResult<Self> {
        let store = ContentStore::from_settings(&config.content);
        let templates = TemplateCache::load(config.templates.dir.as_deref(), &config.site.title)?;
        Ok(Self::new(store, templates, config))
    }
}
