//! Compact image drop for the dashboard: uploads a label photo, hands the
//! OCR suggestions to the parent and shows a short confirmation.

use common::model::upload::{check_upload, OcrResult};
use web_sys::{DragEvent, File, HtmlInputElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::endpoints;
use crate::helpers::show_toast;

/// How long the "complete" state stays visible.
const COMPLETE_DISPLAY_MS: u32 = 2000;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Uploading,
    Complete,
    Failed(String),
}

pub enum Msg {
    Picked(File),
    Dragging(bool),
    Finished(Result<Option<OcrResult>, String>),
    Reset,
}

#[derive(Properties, PartialEq)]
pub struct QuickOcrUploadProps {
    pub on_extracted: Callback<OcrResult>,
}

pub struct QuickOcrUpload {
    state: UploadState,
    dragging: bool,
    file_input_ref: NodeRef,
}

impl Component for QuickOcrUpload {
    type Message = Msg;
    type Properties = QuickOcrUploadProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            state: UploadState::Idle,
            dragging: false,
            file_input_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Dragging(dragging) => {
                self.dragging = dragging;
                true
            }
            Msg::Picked(file) => {
                self.dragging = false;
                if self.state == UploadState::Uploading {
                    return false;
                }
                if let Err(rejection) = check_upload(&file.type_(), file.size() as u64) {
                    self.state = UploadState::Failed(rejection.to_string());
                    return true;
                }
                self.state = UploadState::Uploading;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = endpoints::upload_image(file, None)
                        .await
                        .map(|response| response.ocr_result)
                        .map_err(|err| err.to_string());
                    link.send_message(Msg::Finished(result));
                });
                true
            }
            Msg::Finished(Ok(Some(result))) => {
                show_toast(&format!(
                    "Extracted {} medication(s)",
                    result.suggested_medications.len()
                ));
                ctx.props().on_extracted.emit(result);
                self.state = UploadState::Complete;
                let link = ctx.link().clone();
                spawn_local(async move {
                    gloo_timers::future::TimeoutFuture::new(COMPLETE_DISPLAY_MS).await;
                    link.send_message(Msg::Reset);
                });
                true
            }
            Msg::Finished(Ok(None)) => {
                self.state = UploadState::Failed("No text could be read from this image".to_string());
                true
            }
            Msg::Finished(Err(message)) => {
                show_toast(&message);
                self.state = UploadState::Failed(message);
                true
            }
            Msg::Reset => {
                self.state = UploadState::Idle;
                if let Some(input) = self.file_input_ref.cast::<HtmlInputElement>() {
                    input.set_value("");
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_change = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input.files().and_then(|files| files.get(0)).map(Msg::Picked)
        });
        let on_drop = link.batch_callback(|e: DragEvent| {
            e.prevent_default();
            e.data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0))
                .map(Msg::Picked)
        });
        let on_drag_over = link.callback(|e: DragEvent| {
            e.prevent_default();
            Msg::Dragging(true)
        });
        let on_drag_leave = link.callback(|_: DragEvent| Msg::Dragging(false));
        let input_ref = self.file_input_ref.clone();
        let on_pick = Callback::from(move |_: MouseEvent| {
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        });

        let (class, text) = match &self.state {
            UploadState::Idle => ("idle", "Drop a medication label or click to upload".to_string()),
            UploadState::Uploading => ("uploading", "Reading image…".to_string()),
            UploadState::Complete => ("complete", "Medications extracted".to_string()),
            UploadState::Failed(message) => ("failed", message.clone()),
        };

        html! {
            <>
                <input type="file"
                       accept="image/jpeg,image/png,image/gif"
                       class="hidden"
                       ref={self.file_input_ref.clone()}
                       onchange={on_change} />
                <div class={classes!("quick-ocr", class, self.dragging.then_some("dragging"))}
                     ondrop={on_drop}
                     ondragover={on_drag_over}
                     ondragleave={on_drag_leave}
                     onclick={on_pick}>
                    <span>{ text }</span>
                </div>
            </>
        }
    }
}
