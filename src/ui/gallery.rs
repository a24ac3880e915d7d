/// Scrollable thumbnail grid
///
/// Renders the catalog as a fixed two-column grid of clickable previews
/// in listing order, one cell per catalog entry. Slots still loading or
/// failed render as placeholder cells, so the grid shape never depends
/// on download timing.

use iced::widget::{button, container, image, scrollable, text, Column, Row};
use iced::{Alignment, Element, Length};

use crate::state::session::{GallerySession, ThumbnailState};
use crate::Message;

/// Thumbnails per grid row.
pub const GRID_COLUMNS: usize = 2;

/// Edge length of one grid cell.
const CELL_SIZE: f32 = 130.0;

pub fn view(session: &GallerySession, load_failed: bool) -> Element<'_, Message> {
    if session.catalog().is_empty() {
        // An empty catalog means different things depending on whether
        // the listing itself failed; say which one it was.
        let notice = if load_failed {
            "Could not load the gallery."
        } else {
            "No image files found in Drive."
        };

        return container(text(notice).size(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .into();
    }

    let mut grid = Column::new().spacing(10).padding(5);
    for chunk in session.catalog().chunks(GRID_COLUMNS) {
        let mut grid_row = Row::new().spacing(10);
        for file in chunk {
            grid_row = grid_row.push(cell(session, &file.id));
        }
        grid = grid.push(grid_row);
    }

    scrollable(grid)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// One grid cell: a clickable thumbnail, or a placeholder while the
/// preview is loading or after it failed.
fn cell<'a>(session: &'a GallerySession, id: &str) -> Element<'a, Message> {
    match session.thumbnail(id) {
        Some(ThumbnailState::Ready(handle)) => button(
            image(handle.clone())
                .width(Length::Fixed(CELL_SIZE))
                .height(Length::Fixed(CELL_SIZE)),
        )
        .padding(0)
        .on_press(Message::OpenImage(id.to_string()))
        .into(),
        Some(ThumbnailState::Failed) => placeholder("Error"),
        // Loading, or a cleared cache awaiting the next listing.
        _ => placeholder("Loading..."),
    }
}

fn placeholder(label: &str) -> Element<'_, Message> {
    container(text(label).size(14))
        .width(Length::Fixed(CELL_SIZE))
        .height(Length::Fixed(CELL_SIZE))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .into()
}
