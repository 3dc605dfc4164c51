//! Consumer-facing facade over loader, store and accessors.

use std::sync::Arc;

use tokio::sync::watch;

use crate::source::{HttpPageSource, PageSource};
use crate::store::StoreHandle;
use crate::types::{ImageBlock, ImageBlockList, LoadStatus, PageDocument, TextBlock, TextBlockList};
use crate::{CmsConfig, PageLoader, Result, accessors};

/// Everything a UI needs to show CMS content for one page at a time.
///
/// ```rust,no_run
/// use cms_core::{CmsClient, CmsConfig};
///
/// # async fn run() -> cms_core::Result<()> {
/// let client = CmsClient::new(CmsConfig::new("https://api.example.com/cms", None)?)?;
/// client.load_page_data("home").await?;
///
/// if let Some(message) = client.error() {
///     eprintln!("could not load page: {message}");
/// } else if let Some(greeting) = client.text_content("greeting") {
///     println!("{greeting}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CmsClient<S = HttpPageSource> {
    loader: PageLoader<S>,
}

impl CmsClient<HttpPageSource> {
    /// Create a client that fetches over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: CmsConfig) -> Result<Self> {
        Ok(Self::with_source(HttpPageSource::new(config)?))
    }
}

impl<S: PageSource> CmsClient<S> {
    /// Create a client over any page source, with its own store.
    pub fn with_source(source: S) -> Self {
        Self::with_store(source, StoreHandle::new())
    }

    /// Create a client over `source` writing into an existing store.
    pub fn with_store(source: S, store: StoreHandle) -> Self {
        Self {
            loader: PageLoader::new(source, store),
        }
    }

    /// Loader backing this client.
    #[must_use]
    pub const fn loader(&self) -> &PageLoader<S> {
        &self.loader
    }

    /// Store backing this client.
    #[must_use]
    pub const fn store(&self) -> &StoreHandle {
        self.loader.store()
    }

    /// Load a page; see [`PageLoader::load`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPageId`] for an empty id. Fetch failures
    /// are reported through [`CmsClient::error`].
    pub async fn load_page_data(&self, page_id: &str) -> Result<()> {
        self.loader.load(page_id).await
    }

    /// Abort any in-flight request and clear all page state.
    pub fn clean_up(&self) {
        self.loader.reset();
    }

    /// Currently loaded page.
    #[must_use]
    pub fn page_data(&self) -> Option<Arc<PageDocument>> {
        self.store().read(crate::PageStore::shared_document)
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store().read(crate::PageStore::is_loading)
    }

    /// Message of the last failed load.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.store().read(|store| store.error().map(String::from))
    }

    /// Page id most recently requested.
    #[must_use]
    pub fn page_id(&self) -> Option<String> {
        self.store().read(|store| store.page_id().map(String::from))
    }

    /// Current request lifecycle state.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.store().status()
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.store().subscribe()
    }

    /// Text block with the given id on the current page.
    #[must_use]
    pub fn text_block(&self, id: &str) -> Option<TextBlock> {
        self.with_document(|doc| accessors::text_block(doc, id).cloned())
    }

    /// Image block with the given id on the current page.
    #[must_use]
    pub fn image_block(&self, id: &str) -> Option<ImageBlock> {
        self.with_document(|doc| accessors::image_block(doc, id).cloned())
    }

    /// Content of the text block with the given id.
    #[must_use]
    pub fn text_content(&self, id: &str) -> Option<String> {
        self.with_document(|doc| accessors::text_content(doc, id).map(String::from))
    }

    /// URL of the image block with the given id.
    #[must_use]
    pub fn image_url(&self, id: &str) -> Option<String> {
        self.with_document(|doc| accessors::image_url(doc, id).map(String::from))
    }

    /// Text block list with the given id on the current page.
    #[must_use]
    pub fn text_block_list(&self, id: &str) -> Option<TextBlockList> {
        self.with_document(|doc| accessors::text_block_list(doc, id).cloned())
    }

    /// Image block list with the given id on the current page.
    #[must_use]
    pub fn image_block_list(&self, id: &str) -> Option<ImageBlockList> {
        self.with_document(|doc| accessors::image_block_list(doc, id).cloned())
    }

    fn with_document<T>(&self, f: impl FnOnce(Option<&PageDocument>) -> T) -> T {
        self.store().read(|store| f(store.document()))
    }
}
