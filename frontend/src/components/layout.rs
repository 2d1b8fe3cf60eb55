//! Dashboard frame: sidebar navigation, signed-in provider and logout.
//! Visitors without a token are sent to the login page before anything loads.

use common::model::user::User;
use common::query::QueryKey;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::cache::query_client;
use crate::api::endpoints;
use crate::api::storage::session;
use crate::helpers::show_toast;
use crate::routes::Route;

pub enum Msg {
    UserLoaded(User),
    Logout,
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub current: Route,
    #[prop_or_default]
    pub children: Html,
}

pub struct Layout {
    user: Option<User>,
    authenticated: bool,
}

impl Component for Layout {
    type Message = Msg;
    type Properties = LayoutProps;

    fn create(ctx: &Context<Self>) -> Self {
        let authenticated = session().is_authenticated();
        if authenticated {
            let link = ctx.link().clone();
            let client = query_client(ctx);
            spawn_local(async move {
                match client.fetch(QueryKey::CurrentUser, endpoints::current_user).await {
                    Ok(user) => link.send_message(Msg::UserLoaded(user)),
                    Err(err) => gloo_console::error!(format!("loading current user: {}", err)),
                }
            });
        }
        Self {
            user: None,
            authenticated,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UserLoaded(user) => {
                self.user = Some(user);
                true
            }
            Msg::Logout => {
                session().logout();
                query_client(ctx).clear();
                self.user = None;
                self.authenticated = false;
                show_toast("Signed out");
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if !self.authenticated {
            return html! { <Redirect<Route> to={Route::Login} /> };
        }

        let current = &ctx.props().current;
        let active = |route: &Route| {
            route == current
                || (*route == Route::Reconciliations
                    && matches!(current, Route::ReconciliationDetail { .. }))
        };

        html! {
            <div class="layout">
                <aside class="sidebar">
                    <div class="brand">{"MedRec"}</div>
                    <nav>
                        { for Route::NAVIGATION.iter().map(|(route, label)| html! {
                            <Link<Route>
                                to={route.clone()}
                                classes={classes!("nav-link", active(route).then_some("active"))}>
                                { *label }
                            </Link<Route>>
                        }) }
                    </nav>
                </aside>
                <div class="main">
                    <header class="topbar">
                        { self.view_user() }
                        <button class="button secondary" onclick={ctx.link().callback(|_| Msg::Logout)}>
                            {"Logout"}
                        </button>
                    </header>
                    <main class="content">{ ctx.props().children.clone() }</main>
                </div>
            </div>
        }
    }
}

impl Layout {
    fn view_user(&self) -> Html {
        match &self.user {
            Some(user) => html! {
                <div class="user-chip">
                    <span class="avatar">{ user.initials() }</span>
                    <div>
                        <strong>{ &user.name }</strong>
                        <span class="muted">{ user.specialty.clone().unwrap_or_default() }</span>
                    </div>
                </div>
            },
            None => html! { <div class="user-chip muted">{"Loading…"}</div> },
        }
    }
}
