/// UI building blocks outside the application shell
///
/// - Thumbnail grid (gallery.rs)
/// - Enlarged-view pane with the mutation actions (viewer.rs)

pub mod gallery;
pub mod viewer;
