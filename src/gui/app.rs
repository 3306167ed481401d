use iced::{Element, Task};

use super::{
    AppState, Message,
    screens::{Screen, ScreenData, ScreenMessage, loading_page::LoadingPageScreen},
};
use crate::config::AppConfig;

pub struct OcrPadApp {
    state: AppState,
    screen: ScreenData,
}

impl OcrPadApp {
    /// Start on the loading screen and load the engine for the default options
    pub fn new(config: AppConfig) -> (Self, Task<Message>) {
        (
            Self {
                state: AppState::new(config),
                screen: ScreenData::LoadingPage(LoadingPageScreen),
            },
            Task::done(Message::LoadEngine),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        self.screen
            .update(message, &mut self.state)
            .map(|msg| match msg {
                ScreenMessage::ScreenMessage(msg) => msg,
                ScreenMessage::ParentMessage(never) => match never {},
            })
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.screen.view(&self.state).map(|msg| match msg {
            ScreenMessage::ScreenMessage(msg) => msg,
            ScreenMessage::ParentMessage(never) => match never {},
        })
    }
}
