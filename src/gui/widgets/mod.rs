use iced::{
    Color, Element, Theme, border,
    widget::{container, container::Style, row},
};
use iced_widget::container::bordered_box;

use crate::controller::NoticeLevel;

/// Checkbox-like label for toggle buttons
pub fn toggle_label(label: &str, checked: bool) -> String {
    format!("[{}] {}", if checked { "x" } else { " " }, label)
}

/// Tinted banner per notice level
pub fn notice_style(level: NoticeLevel) -> impl Fn(&Theme) -> Style {
    move |theme: &Theme| {
        let background = match level {
            NoticeLevel::Info => Color::from_rgb8(0xdb, 0xea, 0xfe),
            NoticeLevel::Success => Color::from_rgb8(0xdc, 0xfc, 0xe7),
            NoticeLevel::Error => Color::from_rgb8(0xfe, 0xe2, 0xe2),
            NoticeLevel::Fatal => Color::from_rgb8(0xfc, 0xa5, 0xa5),
        };
        bordered_box(theme)
            .border(border::width(1))
            .background(background)
    }
}

/// Options sidebar on the left, main content filling the rest
pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(row![
        container(sidebar.into())
            .style(bordered_box)
            .height(iced::Length::Fill)
            .width(iced::Length::FillPortion(1)),
        container(main_content.into()).width(iced::Length::FillPortion(3)),
    ])
    .center_x(iced::Length::Fill)
    .center_y(iced::Length::Fill)
    .into()
}
