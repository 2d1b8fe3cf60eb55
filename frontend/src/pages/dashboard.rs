//! Landing page: today's numbers, the seven-day trend, recent activity and
//! the sessions still waiting for review.

use common::analytics::{
    daily_trend, pending_reconciliations, recent_activity, source_distribution, time_ago,
    DashboardStats,
};
use common::model::medication::Medication;
use common::model::patient::Patient;
use common::model::reconciliation::Reconciliation;
use common::model::upload::OcrResult;
use common::model::user::User;
use common::query::QueryKey;
use common::requests::ReconciliationQuery;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::cache::{query_client, QueryClient};
use crate::api::{endpoints, ApiError};
use crate::components::badges::status_badge;
use crate::components::charts::{daily_trend_chart, metric_card, source_chart};
use crate::components::quick_ocr_upload::QuickOcrUpload;
use crate::helpers::{format_count, now_local};
use crate::pages::error_banner;
use crate::routes::Route;

pub struct DashboardData {
    user: Option<User>,
    reconciliations: Vec<Reconciliation>,
    patients: Vec<Patient>,
    medications: Vec<Medication>,
}

pub enum Msg {
    Loaded(Result<DashboardData, ApiError>),
    Extracted(OcrResult),
}

pub struct DashboardPage {
    data: Option<DashboardData>,
    error: Option<String>,
    extracted: Option<OcrResult>,
}

async fn load(client: QueryClient) -> Result<DashboardData, ApiError> {
    let reconciliations = client
        .fetch(QueryKey::Reconciliations, || {
            endpoints::list_reconciliations(ReconciliationQuery::default())
        })
        .await?;
    let patients = client.fetch(QueryKey::Patients, endpoints::list_patients).await?;
    let medications = client
        .fetch(QueryKey::Medications(None), || endpoints::list_medications(None))
        .await?;
    let user = client
        .fetch(QueryKey::CurrentUser, endpoints::current_user)
        .await
        .ok();
    Ok(DashboardData {
        user,
        reconciliations,
        patients,
        medications,
    })
}

impl Component for DashboardPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let client = query_client(ctx);
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::Loaded(load(client).await));
        });
        Self {
            data: None,
            error: None,
            extracted: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(Ok(data)) => {
                self.data = Some(data);
                self.error = None;
            }
            Msg::Loaded(Err(err)) => self.error = Some(err.to_string()),
            Msg::Extracted(result) => self.extracted = Some(result),
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(data) = &self.data else {
            return html! {
                <div class="page">
                    { error_banner(&self.error) }
                    if self.error.is_none() {
                        <p class="muted">{"Loading dashboard…"}</p>
                    }
                </div>
            };
        };

        let now = now_local();
        let stats = DashboardStats::compute(
            &data.reconciliations,
            &data.patients,
            &data.medications,
            now,
        );
        let greeting = data
            .user
            .as_ref()
            .map(|u| format!("Welcome back, {}", u.name))
            .unwrap_or_else(|| "Welcome back".to_string());

        html! {
            <div class="page dashboard">
                <div class="page-header">
                    <div>
                        <h1>{ greeting }</h1>
                        <p class="muted">{"Here's your medication reconciliation overview for today."}</p>
                    </div>
                    <span class="muted">{ now.format("%A, %B %-d, %Y").to_string() }</span>
                </div>

                <div class="metrics">
                    { metric_card(
                        "Completed Today",
                        format_count(stats.completed_today),
                        &format!("+{} this week", stats.completed_this_week.saturating_sub(stats.completed_today)),
                    ) }
                    { metric_card("Active Reconciliations", format_count(stats.active_reconciliations), "Pending review") }
                    { metric_card(
                        "Total Patients",
                        format_count(stats.total_patients),
                        &format!("{} medications", format_count(stats.total_medications)),
                    ) }
                    { metric_card(
                        "Completion Rate",
                        format!("{}%", stats.completion_rate),
                        &format!("{} conflicts found", stats.conflicts_found),
                    ) }
                </div>

                <div class="columns">
                    <div class="column wide">
                        <section class="card">
                            <h2>{"Reconciliation trend"}</h2>
                            { daily_trend_chart(&daily_trend(&data.reconciliations, now)) }
                        </section>
                        { self.view_activity(data, now) }
                    </div>
                    <div class="column">
                        <section class="card">
                            <h2>{"Quick OCR"}</h2>
                            <QuickOcrUpload on_extracted={ctx.link().callback(Msg::Extracted)} />
                            { self.view_extracted() }
                        </section>
                        { self.view_pending(data, now) }
                        <section class="card">
                            <h2>{"Medication sources"}</h2>
                            { source_chart(&source_distribution(&data.medications)) }
                        </section>
                    </div>
                </div>
            </div>
        }
    }
}

impl DashboardPage {
    fn view_activity(&self, data: &DashboardData, now: chrono::DateTime<chrono::FixedOffset>) -> Html {
        let activity = recent_activity(&data.reconciliations, &data.patients);
        html! {
            <section class="card">
                <div class="card-header">
                    <h2>{"Recent Activity"}</h2>
                    <Link<Route> to={Route::Reconciliations}>{"View all"}</Link<Route>>
                </div>
                if activity.is_empty() {
                    <div class="empty">
                        <p>{"No recent activity"}</p>
                        <p class="muted">{"Start your first reconciliation to see activity here"}</p>
                    </div>
                } else {
                    <ul class="activity">
                        { for activity.iter().map(|item| html! {
                            <li key={item.reconciliation_id}>
                                <Link<Route> to={Route::ReconciliationDetail { id: item.reconciliation_id }}>
                                    { &item.title }
                                </Link<Route>>
                                { status_badge(item.status) }
                                <span class="muted">{ &item.patient_name }</span>
                                <span class="muted">{ time_ago(item.time, now) }</span>
                                if item.conflicts > 0 {
                                    <span class="warning">{ format!("{} conflicts found", item.conflicts) }</span>
                                }
                            </li>
                        }) }
                    </ul>
                }
            </section>
        }
    }

    fn view_pending(&self, data: &DashboardData, now: chrono::DateTime<chrono::FixedOffset>) -> Html {
        let pending = pending_reconciliations(&data.reconciliations, &data.patients);
        html! {
            <section class="card">
                <h2>
                    {"Needs Attention"}
                    if !pending.is_empty() {
                        <span class="badge count">{ pending.len() }</span>
                    }
                </h2>
                if pending.is_empty() {
                    <div class="empty">
                        <p>{"All caught up!"}</p>
                        <p class="muted">{"No pending reconciliations"}</p>
                    </div>
                } else {
                    { for pending.iter().map(|item| {
                        let rec = &item.reconciliation;
                        html! {
                            <Link<Route> to={Route::ReconciliationDetail { id: rec.id }} classes={classes!("pending-item")}>
                                <div class="row-between">
                                    <strong>{ &item.patient_name }</strong>
                                    { status_badge(rec.status) }
                                </div>
                                <div class="row-between muted">
                                    <span>{ format!("{} medications", rec.total_medications) }</span>
                                    <span>{ time_ago(rec.created_at, now) }</span>
                                </div>
                                if rec.conflicts_found > 0 {
                                    <span class="warning">{ format!("{} conflicts", rec.conflicts_found) }</span>
                                }
                            </Link<Route>>
                        }
                    }) }
                }
            </section>
        }
    }

    fn view_extracted(&self) -> Html {
        let Some(result) = &self.extracted else {
            return Html::default();
        };
        html! {
            <div class="extracted">
                <p class="muted">{ format!("OCR confidence {}%", result.confidence) }</p>
                if result.suggested_medications.is_empty() {
                    <p>{"No medications recognised in this image."}</p>
                } else {
                    <ul>
                        { for result.suggested_medications.iter().map(|m| html! {
                            <li>
                                <strong>{ &m.name }</strong>
                                { format!(" {} {}", m.dosage, m.frequency) }
                            </li>
                        }) }
                    </ul>
                    <Link<Route> to={Route::Upload}>{"Assign to a patient in OCR Upload"}</Link<Route>>
                }
            </div>
        }
    }
}
