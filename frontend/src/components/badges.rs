use common::model::medication::MedicationSource;
use common::model::reconciliation::ReconciliationStatus;
use common::review::OCR_CONFIDENCE_THRESHOLD;
use yew::prelude::*;

pub fn status_badge(status: ReconciliationStatus) -> Html {
    html! {
        <span class={classes!("badge", format!("status-{}", status.as_str()))}>
            { status.label() }
        </span>
    }
}

pub fn source_badge(source: MedicationSource) -> Html {
    html! {
        <span class={classes!("badge", format!("source-{}", source.as_str()))}>
            { source.label() }
        </span>
    }
}

/// OCR confidence chip; anything under the review threshold needs a second look.
pub fn confidence_badge(confidence: u8) -> Html {
    let level = if confidence >= OCR_CONFIDENCE_THRESHOLD {
        "high"
    } else if confidence >= 60 {
        "medium"
    } else {
        "low"
    };
    html! {
        <span class={classes!("badge", format!("confidence-{}", level))}>
            { format!("{}% confidence", confidence) }
        </span>
    }
}
