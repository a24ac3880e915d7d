/// Per-window session state
///
/// The catalog snapshot, the thumbnail cache, and the current selection
/// all live here, on one object owned by the application and passed
/// around explicitly. The event loop is the only writer, so none of this
/// needs locking.

use iced::widget::image::Handle;
use std::collections::HashMap;

use crate::drive::DriveFile;

/// State of one thumbnail slot in the cache.
#[derive(Debug, Clone)]
pub enum ThumbnailState {
    /// Download/decode task still in flight
    Loading,
    /// Decoded preview bitmap
    Ready(Handle),
    /// Download or decode failed; rendered as a placeholder
    Failed,
}

/// The currently enlarged image.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Drive file id
    pub id: String,
    /// Display name, used as the default save name
    pub name: String,
    /// Full-resolution content exactly as downloaded
    pub bytes: Vec<u8>,
    /// Decoded bitmap for display
    pub handle: Handle,
}

/// Catalog + thumbnail cache + selection for one gallery window.
///
/// The cache is an unbounded map cleared wholesale on refresh; there is
/// deliberately no eviction (workloads are small and user-paced).
#[derive(Debug, Default)]
pub struct GallerySession {
    catalog: Vec<DriveFile>,
    thumbnails: HashMap<String, ThumbnailState>,
    selection: Option<Selection>,
}

impl GallerySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current catalog snapshot, in listing order.
    pub fn catalog(&self) -> &[DriveFile] {
        &self.catalog
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Drop the selection and the whole thumbnail cache ahead of a new
    /// listing. The catalog keeps showing the previous snapshot until
    /// the new one arrives.
    pub fn begin_refresh(&mut self) {
        self.selection = None;
        self.thumbnails.clear();
    }

    /// Install a new catalog snapshot and open a Loading slot per entry.
    pub fn install_catalog(&mut self, files: Vec<DriveFile>) {
        self.thumbnails = files
            .iter()
            .map(|f| (f.id.clone(), ThumbnailState::Loading))
            .collect();
        self.catalog = files;
    }

    /// Record a finished thumbnail task. Results for ids without a slot
    /// (tasks spawned before the last refresh) are dropped.
    pub fn store_thumbnail(&mut self, id: &str, thumbnail: Option<Handle>) {
        if let Some(slot) = self.thumbnails.get_mut(id) {
            *slot = match thumbnail {
                Some(handle) => ThumbnailState::Ready(handle),
                None => ThumbnailState::Failed,
            };
        }
    }

    pub fn thumbnail(&self, id: &str) -> Option<&ThumbnailState> {
        self.thumbnails.get(id)
    }

    /// Replace the selection. The previous selection's buffer is dropped
    /// here; full-resolution content is never cached.
    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: &str) -> DriveFile {
        DriveFile {
            id: id.to_string(),
            name: format!("{id}.jpg"),
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn handle() -> Handle {
        Handle::from_rgba(1, 1, vec![0, 0, 0, 255])
    }

    fn selection(id: &str, bytes: Vec<u8>) -> Selection {
        Selection {
            id: id.to_string(),
            name: format!("{id}.jpg"),
            bytes,
            handle: handle(),
        }
    }

    #[test]
    fn test_install_catalog_opens_slot_per_entry() {
        let mut session = GallerySession::new();
        session.install_catalog(vec![file("a"), file("b"), file("c")]);

        assert_eq!(session.catalog().len(), 3);
        for id in ["a", "b", "c"] {
            assert!(matches!(
                session.thumbnail(id),
                Some(ThumbnailState::Loading)
            ));
        }
    }

    #[test]
    fn test_thumbnail_results_fill_their_slot() {
        let mut session = GallerySession::new();
        session.install_catalog(vec![file("a"), file("b")]);

        session.store_thumbnail("a", Some(handle()));
        session.store_thumbnail("b", None);

        assert!(matches!(
            session.thumbnail("a"),
            Some(ThumbnailState::Ready(_))
        ));
        assert!(matches!(session.thumbnail("b"), Some(ThumbnailState::Failed)));
    }

    #[test]
    fn test_stale_thumbnail_results_are_dropped() {
        let mut session = GallerySession::new();
        session.install_catalog(vec![file("a")]);
        session.begin_refresh();

        // A task spawned for the previous snapshot finishes late.
        session.store_thumbnail("a", Some(handle()));

        assert!(session.thumbnail("a").is_none());
    }

    #[test]
    fn test_selecting_replaces_previous_selection() {
        let mut session = GallerySession::new();
        session.install_catalog(vec![file("x"), file("y")]);

        session.select(selection("x", vec![1, 2, 3]));
        session.select(selection("y", vec![9, 9]));

        let current = session.selection().unwrap();
        assert_eq!(current.id, "y");
        assert_eq!(current.bytes, vec![9, 9]);
    }

    #[test]
    fn test_selection_buffer_is_kept_verbatim() {
        let mut session = GallerySession::new();
        let content = vec![0xFF, 0xD8, 0x00, 0x42, 0xFF, 0xD9];

        session.select(selection("x", content.clone()));

        assert_eq!(session.selection().unwrap().bytes, content);
    }

    #[test]
    fn test_refresh_clears_selection_and_cache() {
        let mut session = GallerySession::new();
        session.install_catalog(vec![file("a")]);
        session.store_thumbnail("a", Some(handle()));
        session.select(selection("a", vec![1]));

        session.begin_refresh();

        assert!(session.selection().is_none());
        assert!(session.thumbnail("a").is_none());
        // The stale snapshot stays visible until the new listing lands.
        assert_eq!(session.catalog().len(), 1);
    }

    #[test]
    fn test_catalog_after_delete_no_longer_contains_the_id() {
        let mut session = GallerySession::new();
        session.install_catalog(vec![file("a"), file("b")]);
        session.select(selection("a", vec![1]));

        // Delete flow: reset, then the fresh listing arrives without "a".
        session.begin_refresh();
        session.install_catalog(vec![file("b")]);

        assert!(session.selection().is_none());
        assert!(session.catalog().iter().all(|f| f.id != "a"));
        assert!(session.thumbnail("a").is_none());
    }
}
