use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::cache::QueryClient;
use crate::routes::{switch, Route};

/// Root component: owns the query cache shared by every page and mounts the router.
pub struct App {
    client: QueryClient,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            client: QueryClient::default(),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <ContextProvider<QueryClient> context={self.client.clone()}>
                <BrowserRouter>
                    <Switch<Route> render={switch} />
                </BrowserRouter>
            </ContextProvider<QueryClient>>
        }
    }
}
