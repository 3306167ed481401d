pub mod loading_page;
pub mod ocr_page;

use iced::{Element, Task};

use crate::{
    controller::Controller,
    config::OcrOptions,
    error::EngineInitError,
    gui::{AppState, Message},
};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug + Clone;
    type ParentMessage: std::fmt::Debug + Clone;
    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    LoadingPage(loading_page::LoadingPageScreen),
    OcrPage(ocr_page::OcrPageScreen),
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        match self {
            ScreenData::LoadingPage(screen) => {
                screen.view(state).map(Message::LoadingPageMessage)
            }
            ScreenData::OcrPage(screen) => screen.view(state).map(Message::OcrPageMessage),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (x, Message::ChangeScreen(screen)) => {
                *x = screen;
                Task::none()
            }
            (x, Message::LoadEngine) => {
                *x = ScreenData::LoadingPage(loading_page::LoadingPageScreen);
                let controller = state.controller.clone();
                let options = state.session.options.clone();
                let config = options.engine_config();
                Task::perform(load_engine(controller, options), move |status| {
                    ScreenMessage::ScreenMessage(Message::EngineLoaded(config.clone(), status))
                })
            }
            (x, Message::EngineLoaded(config, status)) => {
                state
                    .controller
                    .apply_engine_status(&mut state.session, &config, status);
                *x = ScreenData::OcrPage(ocr_page::OcrPageScreen);
                Task::none()
            }
            // An extraction may land after the screen moved on; the session must still leave Extracting
            (
                _,
                Message::OcrPageMessage(ScreenMessage::ScreenMessage(
                    ocr_page::OcrPageMessage::ExtractFinished(outcome),
                )),
            ) => {
                ocr_page::apply_extraction(state, outcome);
                Task::none()
            }
            (ScreenData::OcrPage(page), Message::OcrPageMessage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::OcrPageMessage)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(parent_msg) => match parent_msg {
                    ocr_page::ParentMessage::EngineConfigChanged => {
                        Task::done(ScreenMessage::ScreenMessage(Message::LoadEngine))
                    }
                },
            },
            _ => Task::none(),
        }
    }
}

/// Build the engine off the UI thread; model loading can take a while
async fn load_engine(controller: Controller, options: OcrOptions) -> Result<(), EngineInitError> {
    tokio::task::spawn_blocking(move || controller.prepare_engine(&options).map(|_| ()))
        .await
        .unwrap_or_else(|e| Err(loader_crashed(e)))
}

/// A panic in the factory is not a model problem; keep it distinguishable
fn loader_crashed(error: tokio::task::JoinError) -> EngineInitError {
    tracing::error!(error = %error, "engine loading task did not complete");
    EngineInitError::LoaderCrashed(error.to_string())
}
