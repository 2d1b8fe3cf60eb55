//! Review screen of one reconciliation.
//!
//! The clinician approves or rejects each of the patient's medications,
//! may correct a medication inline, and completes the session once every
//! medication has a decision. Decisions live in a local
//! [`ReviewSession`](common::review::ReviewSession); only the aggregated
//! counts are sent, right before the completion call.

use yew::prelude::*;

mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::ReconciliationDetailPage;

#[derive(Properties, PartialEq, Clone)]
pub struct ReconciliationDetailProps {
    pub id: i64,
}

impl Component for ReconciliationDetailPage {
    type Message = Msg;
    type Properties = ReconciliationDetailProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        ReconciliationDetailPage::new()
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().id != old_props.id {
            *self = ReconciliationDetailPage::new();
            ctx.link().send_message(Msg::Load);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
