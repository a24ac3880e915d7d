use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;
use std::sync::Arc;

mod drive;
mod imaging;
mod state;
mod ui;

use drive::{DriveClient, DriveFile};
use state::session::{GallerySession, Selection};

/// Main application state
struct DriveGallery {
    /// Authenticated Drive handle, shared with background tasks
    client: Arc<DriveClient>,
    /// Catalog, thumbnail cache, and current selection
    session: GallerySession,
    /// Whether the last listing attempt failed; an empty catalog is
    /// rendered differently depending on this
    load_failed: bool,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Listing finished (errors already flattened to text)
    CatalogLoaded(Result<Vec<DriveFile>, String>),
    /// A thumbnail task finished for the given file id
    ThumbnailLoaded(String, Option<Handle>),
    /// User clicked a thumbnail
    OpenImage(String),
    /// Full-resolution download finished
    ImageOpened(Result<Selection, String>),
    /// User clicked "Refresh Gallery"
    Refresh,
    /// User clicked "Download"
    SaveImage,
    /// Local save finished
    ImageSaved(Result<PathBuf, String>),
    /// User clicked "Delete from Drive"
    DeleteImage,
    /// Remote delete finished
    ImageDeleted(Result<(), String>),
}

impl DriveGallery {
    /// Create a new instance of the application and kick off the first
    /// listing. Authentication already happened in `main`.
    fn new(client: DriveClient) -> (Self, Task<Message>) {
        let client = Arc::new(client);
        let status = format!("Connected as {}. Loading gallery...", client.account());

        let gallery = DriveGallery {
            client: client.clone(),
            session: GallerySession::new(),
            load_failed: false,
            status,
        };

        (gallery, load_catalog(client))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(Ok(files)) => {
                self.load_failed = false;
                self.status = if files.is_empty() {
                    "No image files found in Drive.".to_string()
                } else {
                    format!("Found {} image files.", files.len())
                };
                println!("Catalog loaded: {} image files", files.len());

                self.session.install_catalog(files);

                // One background task per entry, spawned in listing
                // order. Results land as ThumbnailLoaded messages; the
                // grid itself is driven by catalog order, not by which
                // download wins.
                let thumbnails = self.session.catalog().iter().map(|file| {
                    let id = file.id.clone();
                    Task::perform(
                        fetch_thumbnail(self.client.clone(), id.clone()),
                        move |thumb| Message::ThumbnailLoaded(id.clone(), thumb),
                    )
                });

                Task::batch(thumbnails)
            }
            Message::CatalogLoaded(Err(error)) => {
                eprintln!("Failed to load gallery: {error}");
                self.load_failed = true;
                self.session.install_catalog(Vec::new());
                self.status = "Failed to load the gallery.".to_string();
                show_error(
                    "Drive Error",
                    &format!("Failed to load images from Drive: {error}"),
                );

                Task::none()
            }
            Message::ThumbnailLoaded(id, thumbnail) => {
                self.session.store_thumbnail(&id, thumbnail);

                Task::none()
            }
            Message::OpenImage(id) => {
                let Some(file) = self.session.catalog().iter().find(|f| f.id == id) else {
                    return Task::none();
                };

                self.status = format!("Loading {}...", file.name);

                Task::perform(
                    fetch_full_image(self.client.clone(), file.clone()),
                    Message::ImageOpened,
                )
            }
            Message::ImageOpened(Ok(selection)) => {
                self.status = format!("Viewing {}.", selection.name);
                self.session.select(selection);

                Task::none()
            }
            Message::ImageOpened(Err(error)) => {
                eprintln!("Failed to load full image: {error}");
                self.session.clear_selection();
                self.status = "Failed to display the image.".to_string();
                show_error("Drive Error", &format!("Failed to display image: {error}"));

                Task::none()
            }
            Message::Refresh => {
                self.session.begin_refresh();
                self.status = "Refreshing gallery...".to_string();

                load_catalog(self.client.clone())
            }
            Message::SaveImage => {
                let Some(selection) = self.session.selection() else {
                    return Task::none();
                };

                // Native save dialog, pre-filled with the remote name.
                let Some(path) = FileDialog::new()
                    .set_title("Save Image As")
                    .set_file_name(&selection.name)
                    .save_file()
                else {
                    return Task::none();
                };

                // Write the buffer exactly as downloaded.
                let bytes = selection.bytes.clone();
                Task::perform(
                    async move {
                        tokio::fs::write(&path, bytes)
                            .await
                            .map(|_| path)
                            .map_err(|e| e.to_string())
                    },
                    Message::ImageSaved,
                )
            }
            Message::ImageSaved(Ok(path)) => {
                self.status = format!("Saved to {}.", path.display());
                show_info("Success", &format!("Image saved to {}", path.display()));

                Task::none()
            }
            Message::ImageSaved(Err(error)) => {
                eprintln!("Failed to save image: {error}");
                show_error("Error", &format!("Error saving image: {error}"));

                Task::none()
            }
            Message::DeleteImage => {
                let Some(selection) = self.session.selection() else {
                    return Task::none();
                };

                let confirmed = MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title("Confirm Delete")
                    .set_description(
                        format!(
                            "Are you sure you want to delete '{}' from Drive?",
                            selection.name
                        )
                        .as_str(),
                    )
                    .set_buttons(MessageButtons::YesNo)
                    .show();
                if !matches!(confirmed, MessageDialogResult::Yes) {
                    return Task::none();
                }

                self.status = format!("Deleting {}...", selection.name);
                let client = self.client.clone();
                let id = selection.id.clone();

                Task::perform(
                    async move { client.delete_file(&id).await.map_err(|e| e.to_string()) },
                    Message::ImageDeleted,
                )
            }
            Message::ImageDeleted(Ok(())) => {
                println!("Image deleted from Drive.");
                show_info("Success", "Image deleted from Drive.");

                // Deletion invalidates the whole snapshot: drop the
                // selection and cache and re-list from scratch.
                self.session.begin_refresh();
                self.status = "Image deleted. Refreshing gallery...".to_string();

                load_catalog(self.client.clone())
            }
            Message::ImageDeleted(Err(error)) => {
                eprintln!("Failed to delete image: {error}");
                self.status = "Failed to delete the image.".to_string();
                show_error(
                    "Error",
                    &format!("Error deleting image from Drive: {error}"),
                );

                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let left = column![
            text("Drive Image Gallery").size(20),
            ui::gallery::view(&self.session, self.load_failed),
            button("Refresh Gallery")
                .padding(10)
                .on_press(Message::Refresh),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .width(Length::Fixed(400.0));

        let panes = row![
            container(left).height(Length::Fill).padding(10),
            container(ui::viewer::view(self.session.selection()))
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(10),
        ]
        .spacing(10)
        .height(Length::Fill);

        column![panes, text(&self.status).size(14)]
            .spacing(5)
            .padding(10)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    let key_path = drive::auth::default_key_path();

    // Without a session handle there is nothing to show: surface the
    // failure and stop before the event loop ever starts.
    let client = match DriveClient::from_key_file(&key_path) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("Authentication failed: {error}");
            show_error(
                "Authentication Error",
                &format!("Failed to authenticate with Drive: {error}"),
            );
            std::process::exit(1);
        }
    };

    println!("Authenticated with Drive as {}", client.account());

    iced::application("Drive Image Gallery", DriveGallery::update, DriveGallery::view)
        .theme(DriveGallery::theme)
        .window_size((1200.0, 700.0))
        .centered()
        .run_with(move || DriveGallery::new(client))
}

/// Kick off a full listing in the background.
fn load_catalog(client: Arc<DriveClient>) -> Task<Message> {
    Task::perform(
        async move { client.list_images().await.map_err(|e| e.to_string()) },
        Message::CatalogLoaded,
    )
}

/// Download and downsample one thumbnail. `None` marks the slot failed
/// and the grid renders a placeholder for it.
async fn fetch_thumbnail(client: Arc<DriveClient>, file_id: String) -> Option<Handle> {
    let bytes = match client.download_file(&file_id).await {
        Ok(bytes) => bytes,
        Err(error) => {
            eprintln!("Thumbnail download failed for {file_id}: {error}");
            return None;
        }
    };

    match imaging::make_thumbnail(&bytes) {
        Ok(bitmap) => Some(Handle::from_rgba(bitmap.width, bitmap.height, bitmap.pixels)),
        Err(error) => {
            eprintln!("Thumbnail decode failed for {file_id}: {error}");
            None
        }
    }
}

/// Download the full-resolution content for the enlarged view. The raw
/// buffer is kept alongside the decoded bitmap so a later save can write
/// it back verbatim.
async fn fetch_full_image(client: Arc<DriveClient>, file: DriveFile) -> Result<Selection, String> {
    let bytes = client
        .download_file(&file.id)
        .await
        .map_err(|e| e.to_string())?;
    let bitmap = imaging::decode_full(&bytes).map_err(|e| e.to_string())?;

    Ok(Selection {
        id: file.id,
        name: file.name,
        bytes,
        handle: Handle::from_rgba(bitmap.width, bitmap.height, bitmap.pixels),
    })
}

/// Modal error dialog; blocking, like every dialog in this app.
fn show_error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn show_info(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
