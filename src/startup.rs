use std::sync::Arc;

use anyhow::Context;

use crate::{
    configuration::Settings,
    ghost_client::GhostClient,
    signup::SignupWidget,
    storage::{FileStore, FlagStorage, MemoryStore},
    ui::{Page, UiController},
};

/// A configured widget wired to an in-memory page.
pub struct Application {
    widget: SignupWidget,
    page: Arc<Page>,
    base_url: String,
}

impl Application {
    pub fn build(config: &Settings) -> Result<Self, anyhow::Error> {
        let storage = get_flag_storage(config);
        let page = Arc::new(Page::new(config.ui.with_wrapper));
        let controller = UiController::new(storage, page.clone(), config.ui.display_duration());
        let ghost_client = GhostClient::new(
            config.ghost.client_version.clone(),
            config.ghost.timeout(),
        )
        .context("Failed to build the HTTP client")?;

        Ok(Self {
            widget: SignupWidget::new(ghost_client, controller),
            page,
            base_url: config.ghost.base_url.clone(),
        })
    }

    pub fn widget(&self) -> &SignupWidget {
        &self.widget
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

pub fn get_flag_storage(config: &Settings) -> FlagStorage {
    if !config.storage.enabled {
        tracing::warn!("Storage is disabled, flags will not be remembered");
        return FlagStorage::unavailable();
    }
    FlagStorage::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FileStore::new(config.storage.permanent_path.clone())),
    )
}
