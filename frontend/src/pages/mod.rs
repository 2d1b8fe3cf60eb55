pub mod analytics;
pub mod dashboard;
pub mod login;
pub mod medications;
pub mod patients;
pub mod reconciliation_detail;
pub mod reconciliations;
pub mod register;
pub mod upload;

use yew::prelude::*;

/// Inline error banner shown above forms and lists.
pub fn error_banner(error: &Option<String>) -> Html {
    match error {
        Some(message) => html! { <div class="alert error">{ message }</div> },
        None => Html::default(),
    }
}
