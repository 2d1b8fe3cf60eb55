use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

use super::state::ReviewedSuggestion;
use super::{Msg, SuggestionField, UploadPage};
use crate::components::badges::confidence_badge;
use crate::helpers::{input_value, select_value};
use crate::pages::error_banner;

pub fn view(page: &UploadPage, ctx: &Context<UploadPage>) -> Html {
    html! {
        <div class="page upload">
            <header class="page-header">
                <h1>{ "OCR Upload" }</h1>
                <p class="muted">{ "Extract medications from a pill bottle or prescription label" }</p>
            </header>
            { error_banner(&page.error) }
            <div class="grid two">
                { build_picker(page, ctx) }
                { build_results(page, ctx) }
            </div>
        </div>
    }
}

fn build_picker(page: &UploadPage, ctx: &Context<UploadPage>) -> Html {
    let link = ctx.link();
    let on_patient = link.callback(|e: Event| Msg::SelectPatient(select_value(e).parse().ok()));
    let on_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.files().and_then(|files| files.get(0)).map(Msg::PickFile)
    });
    let on_drop = link.batch_callback(|e: DragEvent| {
        e.prevent_default();
        e.data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
            .map(Msg::PickFile)
    });
    let on_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::Dragging(true)
    });
    let on_drag_leave = link.callback(|_: DragEvent| Msg::Dragging(false));
    let on_process = link.callback(|_| Msg::Process);
    let selected = page.patient_id.map(|id| id.to_string()).unwrap_or_default();

    html! {
        <section class="card">
            <h2>{ "1. Choose patient and image" }</h2>
            <label>
                { "Patient" }
                <select onchange={on_patient}>
                    <option value="" selected={selected.is_empty()}>{ "Select a patient" }</option>
                    { for page.patients.iter().map(|p| {
                        let id = p.id.to_string();
                        html! {
                            <option value={id.clone()} selected={id == selected}>
                                { format!("{} {}", p.first_name, p.last_name) }
                            </option>
                        }
                    }) }
                </select>
            </label>
            <label class={classes!("dropzone", page.dragging.then_some("dragging"))}
                   ondrop={on_drop}
                   ondragover={on_drag_over}
                   ondragleave={on_drag_leave}>
                <input type="file" accept="image/jpeg,image/png,image/gif" class="hidden" onchange={on_change} />
                {
                    match &page.preview {
                        Some(url) => html! { <img class="preview" src={url.to_string()} alt="Selected label" /> },
                        None => html! { <span>{ "Drop an image here or click to browse (JPEG, PNG, GIF up to 5 MB)" }</span> },
                    }
                }
            </label>
            if let Some(file) = &page.file {
                <p class="muted">{ file.name() }</p>
            }
            <button class="primary"
                    disabled={page.file.is_none() || page.processing}
                    onclick={on_process}>
                { if page.processing { "Processing…" } else { "Extract medications" } }
            </button>
        </section>
    }
}

fn build_results(page: &UploadPage, ctx: &Context<UploadPage>) -> Html {
    let Some(response) = &page.response else {
        return html! {
            <section class="card empty">
                <h2>{ "2. Review results" }</h2>
                <p class="muted">{ "Extracted medications will appear here." }</p>
            </section>
        };
    };
    let link = ctx.link();
    let approved = page.suggestions.iter().filter(|s| s.approved).count();
    let on_save = link.callback(|_| Msg::Save);
    let on_reset = link.callback(|_| Msg::Reset);

    html! {
        <section class="card">
            <h2>{ "2. Review results" }</h2>
            if let Some(result) = &response.ocr_result {
                <div class="row">
                    <span>{ "Confidence" }</span>
                    { confidence_badge(result.confidence) }
                </div>
                <details>
                    <summary>{ "Extracted text" }</summary>
                    <pre>{ result.text.clone() }</pre>
                </details>
            }
            <ul class="suggestions">
                { for page.suggestions.iter().enumerate().map(|(index, item)| build_suggestion(index, item, ctx)) }
            </ul>
            <div class="actions">
                <button onclick={on_reset}>{ "Start over" }</button>
                <button class="primary"
                        disabled={approved == 0 || page.patient_id.is_none() || page.saving}
                        onclick={on_save}>
                    { if page.saving { "Saving…".to_string() } else { format!("Save {} approved", approved) } }
                </button>
            </div>
        </section>
    }
}

fn build_suggestion(index: usize, item: &ReviewedSuggestion, ctx: &Context<UploadPage>) -> Html {
    let link = ctx.link();
    let edit = |field: SuggestionField| {
        link.callback(move |e: InputEvent| Msg::EditSuggestion(index, field, input_value(e)))
    };
    let on_toggle = link.callback(move |_| Msg::ToggleApproved(index));
    let on_remove = link.callback(move |_| Msg::RemoveSuggestion(index));
    let s = &item.suggestion;

    html! {
        <li class={classes!("suggestion", item.approved.then_some("approved"))}>
            <input placeholder="Name" value={s.name.clone()} oninput={edit(SuggestionField::Name)} />
            <input placeholder="Dosage" value={s.dosage.clone()} oninput={edit(SuggestionField::Dosage)} />
            <input placeholder="Frequency" value={s.frequency.clone()} oninput={edit(SuggestionField::Frequency)} />
            <small class="muted">{ s.raw_text.clone() }</small>
            <div class="actions">
                <button class={classes!(item.approved.then_some("primary"))} onclick={on_toggle}>
                    { if item.approved { "Approved" } else { "Approve" } }
                </button>
                <button class="danger" onclick={on_remove}>{ "Remove" }</button>
            </div>
        </li>
    }
}
