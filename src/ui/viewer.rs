/// Enlarged-view pane
///
/// Shows the selected image scaled to the viewport (aspect ratio
/// preserved; layout re-fits it on every window resize) together with
/// the download and delete actions. Without a selection it shows a
/// prompt and keeps both actions disabled.

use iced::widget::{button, column, container, image, row, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::session::Selection;
use crate::Message;

pub fn view(selection: Option<&Selection>) -> Element<'_, Message> {
    let display: Element<'_, Message> = match selection {
        Some(current) => image(current.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => container(text("Select a thumbnail to view it here.").size(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .into(),
    };

    let controls = row![
        button("Download")
            .padding(10)
            .on_press_maybe(selection.map(|_| Message::SaveImage)),
        button("Delete from Drive")
            .padding(10)
            .on_press_maybe(selection.map(|_| Message::DeleteImage)),
    ]
    .spacing(10);

    column![
        text("Enlarged View").size(20),
        container(display)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10),
        container(controls).center_x(Length::Fill),
    ]
    .spacing(10)
    .align_x(Alignment::Center)
    .into()
}
