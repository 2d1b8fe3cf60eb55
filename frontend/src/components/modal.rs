use uuid::Uuid;
use yew::{html, Callback, Component, Context, Html, Properties};

/// Dialog sliding down from the top of the page, shown while `open` is set.
pub struct Modal {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub title: String,
    pub open: bool,
    pub on_close: Callback<()>,
}

impl Component for Modal {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let class = if props.open { "top-sheet show" } else { "top-sheet" };
        let title_id = format!("{}-title", self.id);
        let on_close = props.on_close.reform(|_| ());

        html! {
            <div class={class} id={self.id.clone()} role="dialog" aria-labelledby={title_id.clone()}>
                <div class="top-sheet-header">
                    <h2 id={title_id}>{ &props.title }</h2>
                    <button class="icon-button" title="Close" onclick={on_close}>{"×"}</button>
                </div>
                if props.open {
                    <div class="top-sheet-body">{ props.children.clone() }</div>
                }
            </div>
        }
    }
}
