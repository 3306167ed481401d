use iced::{
    Element, Length, Task,
    widget::{Column, button, column, container, row, scrollable, text, text_editor},
};
use rfd::AsyncFileDialog;

use crate::{
    controller::{Action, ExtractJob, ExtractOutcome, NoticeLevel, Phase},
    detection::adapter::SUPPORTED_EXTENSIONS,
    error::OcrInferenceError,
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{layout, notice_style, toggle_label},
    },
    models::Language,
};

/// Upload, extract and edit screen
#[derive(Debug, Clone)]
pub struct OcrPageScreen;

#[derive(Debug, Clone)]
pub enum OcrPageMessage {
    PickImage,
    ImagePicked(Option<(String, Vec<u8>)>),
    ToggleLanguage(Language),
    SetAcceleration(bool),
    SetShowBoxes(bool),
    Extract,
    ExtractFinished(ExtractOutcome),
    Edit(text_editor::Action),
    Clear,
    Copy,
    DismissNotice(usize),
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    EngineConfigChanged,
}

impl Screen for OcrPageScreen {
    type Message = OcrPageMessage;
    type ParentMessage = ParentMessage;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        layout(sidebar(state), main_content(state))
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            OcrPageMessage::PickImage => Task::perform(pick_image(), |picked| {
                ScreenMessage::ScreenMessage(OcrPageMessage::ImagePicked(picked))
            }),
            OcrPageMessage::ImagePicked(None) => Task::none(),
            OcrPageMessage::ImagePicked(Some((file_name, bytes))) => {
                dispatch(state, Action::Upload { file_name, bytes });
                state.refresh_previews();
                Task::none()
            }
            OcrPageMessage::ToggleLanguage(language) => {
                change_engine_options(state, Action::ToggleLanguage(language))
            }
            OcrPageMessage::SetAcceleration(enabled) => {
                change_engine_options(state, Action::SetAcceleration(enabled))
            }
            OcrPageMessage::SetShowBoxes(enabled) => {
                dispatch(state, Action::SetShowBoxes(enabled));
                Task::none()
            }
            OcrPageMessage::Extract => {
                match state.controller.begin_extract(&mut state.session) {
                    Some(job) => Task::perform(run_extract(job), |outcome| {
                        ScreenMessage::ScreenMessage(OcrPageMessage::ExtractFinished(outcome))
                    }),
                    None => Task::none(),
                }
            }
            OcrPageMessage::ExtractFinished(outcome) => {
                apply_extraction(state, outcome);
                Task::none()
            }
            OcrPageMessage::Edit(action) => {
                let is_edit = action.is_edit();
                state.editor.perform(action);
                if is_edit {
                    let text = state.editor.text();
                    dispatch(state, Action::EditText(text));
                }
                Task::none()
            }
            OcrPageMessage::Clear => {
                dispatch(state, Action::Clear);
                state.sync_editor();
                Task::none()
            }
            OcrPageMessage::Copy => {
                dispatch(state, Action::CopyToClipboard);
                Task::none()
            }
            OcrPageMessage::DismissNotice(index) => {
                dispatch(state, Action::DismissNotice(index));
                Task::none()
            }
        }
    }
}

/// Land a finished extraction in the session and refresh the widgets mirroring it
pub fn apply_extraction(state: &mut AppState, outcome: ExtractOutcome) {
    state.controller.finish_extract(&mut state.session, outcome);
    state.sync_editor();
    state.refresh_previews();
}

fn dispatch(state: &mut AppState, action: Action) {
    state.controller.dispatch(&mut state.session, action);
}

/// Apply an option change and ask for an engine reload if the configuration moved
fn change_engine_options(state: &mut AppState, action: Action) -> Task<ScreenMessage<OcrPageScreen>> {
    let before = state.session.options.engine_config();
    dispatch(state, action);
    if state.session.options.engine_config() != before {
        Task::done(ScreenMessage::ParentMessage(ParentMessage::EngineConfigChanged))
    } else {
        Task::none()
    }
}

async fn pick_image() -> Option<(String, Vec<u8>)> {
    let handle = AsyncFileDialog::new()
        .set_title("Upload an image")
        .add_filter("Images", &SUPPORTED_EXTENSIONS)
        .pick_file()
        .await?;
    let bytes = handle.read().await;
    Some((handle.file_name(), bytes))
}

async fn run_extract(job: ExtractJob) -> ExtractOutcome {
    tokio::task::spawn_blocking(move || job.run())
        .await
        .unwrap_or_else(|e| Err(OcrInferenceError::new(e.to_string())))
}

fn msg(message: OcrPageMessage) -> ScreenMessage<OcrPageScreen> {
    ScreenMessage::ScreenMessage(message)
}

fn sidebar(state: &AppState) -> Element<'_, ScreenMessage<OcrPageScreen>> {
    let options = &state.session.options;
    // Options are locked until the running extraction lands
    let editable = state.session.phase != Phase::Extracting;

    let mut languages = Column::new().spacing(4);
    for language in Language::ALL {
        let selected = options.languages.contains(&language);
        languages = languages.push(
            button(text(toggle_label(language.code(), selected)))
                .width(Length::Fill)
                .on_press_maybe(editable.then(|| msg(OcrPageMessage::ToggleLanguage(language)))),
        );
    }

    let order = options.engine_config().language_codes();

    column![
        text("OCR options").size(20),
        text("Languages (preferred order):"),
        languages,
        text(if order.is_empty() { "none selected".to_string() } else { order }),
        button(text(toggle_label("Use GPU (if available)", options.use_acceleration)))
            .on_press_maybe(
                editable.then(|| msg(OcrPageMessage::SetAcceleration(!options.use_acceleration))),
            ),
        button(text(toggle_label("Show detected boxes", options.show_boxes)))
            .on_press_maybe(editable.then(|| msg(OcrPageMessage::SetShowBoxes(!options.show_boxes)))),
        text("Tip: the first run loads the models and may take a while.").size(12),
    ]
    .spacing(10)
    .padding(10)
    .into()
}

fn main_content(state: &AppState) -> Element<'_, ScreenMessage<OcrPageScreen>> {
    let session = &state.session;
    let mut content = Column::new()
        .spacing(16)
        .padding(20)
        .push(text("OCR Pad").size(32))
        .push(text("Image reader (OCR)").size(20));

    for (index, notice) in session.notices.iter().enumerate() {
        let mut banner = row![text(notice.message.as_str()).width(Length::Fill)].spacing(10);
        if notice.level != NoticeLevel::Fatal {
            banner = banner.push(button("x").on_press(msg(OcrPageMessage::DismissNotice(index))));
        }
        content = content.push(
            container(banner)
                .style(notice_style(notice.level))
                .padding(8)
                .width(Length::Fill),
        );
    }

    content = content.push(
        button("Upload image (.png, .jpg, .jpeg)")
            .on_press_maybe((session.phase != Phase::Extracting).then(|| msg(OcrPageMessage::PickImage))),
    );

    match &state.upload_preview {
        Some(handle) => {
            content = content
                .push(iced::widget::image(handle.clone()).width(Length::Fill))
                .push(text("Uploaded image").size(12));
        }
        None => {
            content = content.push(text(
                "Upload an image to begin. Document photos, screenshots and phone pictures all work.",
            ));
        }
    }

    if session.image.is_some() {
        content = content.push(
            button("Extract text (OCR)")
                .on_press_maybe(session.can_extract().then(|| msg(OcrPageMessage::Extract))),
        );
    }

    if session.phase == Phase::Extracting {
        content = content.push(text("Processing image and running OCR..."));
    }

    if let Some(handle) = &state.annotated_preview {
        content = content
            .push(iced::widget::image(handle.clone()).width(Length::Fill))
            .push(text("OCR detections").size(12));
    }

    content = content
        .push(text("Extracted text").size(20))
        .push(
            text_editor(&state.editor)
                .placeholder("Text detected by OCR (you can edit it)")
                .on_action(|action| msg(OcrPageMessage::Edit(action)))
                .height(Length::Fixed(240.0)),
        )
        .push(
            row![
                button("Copy text to clipboard").on_press(msg(OcrPageMessage::Copy)),
                button("Clear extracted text").on_press(msg(OcrPageMessage::Clear)),
            ]
            .spacing(20),
        );

    scrollable(content).into()
}
