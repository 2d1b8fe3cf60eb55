use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::layout::Layout;
use crate::pages::analytics::AnalyticsPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;
use crate::pages::medications::MedicationsPage;
use crate::pages::patients::PatientsPage;
use crate::pages::reconciliation_detail::ReconciliationDetailPage;
use crate::pages::reconciliations::ReconciliationsPage;
use crate::pages::register::RegisterPage;
use crate::pages::upload::UploadPage;

#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/")]
    Home,
    #[at("/dashboard")]
    Dashboard,
    #[at("/patients")]
    Patients,
    #[at("/medications")]
    Medications,
    #[at("/upload")]
    Upload,
    #[at("/reconciliations")]
    Reconciliations,
    #[at("/reconciliations/:id")]
    ReconciliationDetail { id: i64 },
    #[at("/analytics")]
    Analytics,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Entries of the sidebar, in display order.
    pub const NAVIGATION: [(Route, &'static str); 6] = [
        (Route::Dashboard, "Dashboard"),
        (Route::Patients, "Patients"),
        (Route::Medications, "Medications"),
        (Route::Upload, "OCR Upload"),
        (Route::Reconciliations, "Reconciliations"),
        (Route::Analytics, "Analytics"),
    ];
}

/// Renders a route. Everything but the auth pages sits inside the
/// dashboard layout, which sends anonymous visitors to the login page.
pub fn switch(route: Route) -> Html {
    match route {
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::Home | Route::NotFound => html! { <Redirect<Route> to={Route::Dashboard} /> },
        protected => html! {
            <Layout current={protected.clone()}>
                { page(protected) }
            </Layout>
        },
    }
}

fn page(route: Route) -> Html {
    match route {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Patients => html! { <PatientsPage /> },
        Route::Medications => html! { <MedicationsPage /> },
        Route::Upload => html! { <UploadPage /> },
        Route::Reconciliations => html! { <ReconciliationsPage /> },
        Route::ReconciliationDetail { id } => html! { <ReconciliationDetailPage {id} /> },
        Route::Analytics => html! { <AnalyticsPage /> },
        Route::Login | Route::Register | Route::Home | Route::NotFound => Html::default(),
    }
}
