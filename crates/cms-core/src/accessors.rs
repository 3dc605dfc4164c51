//! Point lookups against a loaded page.
//!
//! Every lookup is a linear scan returning the first match; pages hold tens of
//! blocks, so no index is kept. The free functions take an optional document so
//! callers can pass whatever the store currently holds without checking first.

use crate::types::{ImageBlock, ImageBlockList, PageDocument, TextBlock, TextBlockList};

impl PageDocument {
    /// First text block with the given id.
    #[must_use]
    pub fn text_block(&self, id: &str) -> Option<&TextBlock> {
        self.text_blocks.iter().find(|block| block.id == id)
    }

    /// First image block with the given id.
    #[must_use]
    pub fn image_block(&self, id: &str) -> Option<&ImageBlock> {
        self.images.iter().find(|block| block.id == id)
    }

    /// Content of the text block with the given id.
    #[must_use]
    pub fn text_content(&self, id: &str) -> Option<&str> {
        self.text_block(id)?.content.as_deref()
    }

    /// Image URL of the image block with the given id.
    #[must_use]
    pub fn image_url(&self, id: &str) -> Option<&str> {
        self.image_block(id)?.image_url.as_deref()
    }

    /// First text block list with the given id.
    #[must_use]
    pub fn text_block_list(&self, id: &str) -> Option<&TextBlockList> {
        self.text_block_lists.iter().find(|list| list.id == id)
    }

    /// First image block list with the given id.
    #[must_use]
    pub fn image_block_list(&self, id: &str) -> Option<&ImageBlockList> {
        self.image_block_lists.iter().find(|list| list.id == id)
    }
}

/// Look up a text block in an optional document.
#[must_use]
pub fn text_block<'a>(doc: Option<&'a PageDocument>, id: &str) -> Option<&'a TextBlock> {
    doc?.text_block(id)
}

/// Look up an image block in an optional document.
#[must_use]
pub fn image_block<'a>(doc: Option<&'a PageDocument>, id: &str) -> Option<&'a ImageBlock> {
    doc?.image_block(id)
}

/// Look up text content in an optional document.
#[must_use]
pub fn text_content<'a>(doc: Option<&'a PageDocument>, id: &str) -> Option<&'a str> {
    doc?.text_content(id)
}

/// Look up an image URL in an optional document.
#[must_use]
pub fn image_url<'a>(doc: Option<&'a PageDocument>, id: &str) -> Option<&'a str> {
    doc?.image_url(id)
}

/// Look up a text block list in an optional document.
#[must_use]
pub fn text_block_list<'a>(doc: Option<&'a PageDocument>, id: &str) -> Option<&'a TextBlockList> {
    doc?.text_block_list(id)
}

/// Look up an image block list in an optional document.
#[must_use]
pub fn image_block_list<'a>(
    doc: Option<&'a PageDocument>,
    id: &str,
) -> Option<&'a ImageBlockList> {
    doc?.image_block_list(id)
}
