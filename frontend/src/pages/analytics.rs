//! Summary analytics over every reconciliation, medication and patient,
//! with a CSV export of the reconciliation history.

use std::collections::BTreeSet;

use common::analytics::{
    daily_trend, source_distribution, status_distribution, weekly_performance, SummaryStats,
};
use common::model::medication::Medication;
use common::model::patient::Patient;
use common::model::reconciliation::Reconciliation;
use common::query::{QueryFamily, QueryKey};
use common::requests::ReconciliationQuery;
use gloo_file::{Blob, ObjectUrl};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::cache::{query_client, QueryClient};
use crate::api::{endpoints, ApiError};
use crate::components::charts::{
    conflict_chart, daily_trend_chart, metric_card, source_chart, status_chart, weekly_chart,
};
use crate::helpers::{format_count, now_local, show_toast};
use crate::pages::error_banner;

const EXPORT_FILENAME: &str = "reconciliations.csv";

/// How long the export's object URL outlives the click that starts the download.
const DOWNLOAD_URL_LIFETIME_MS: u32 = 10_000;

/// Chart groups the user can show or hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Metric {
    Trends,
    Sources,
    Performance,
    Conflicts,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Trends,
        Metric::Sources,
        Metric::Performance,
        Metric::Conflicts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Trends => "Reconciliation Trends",
            Metric::Sources => "Medication Sources",
            Metric::Performance => "Performance",
            Metric::Conflicts => "Conflicts",
        }
    }
}

/// Adds `metric` when hidden, removes it when shown.
pub fn toggle_metric(selected: &mut BTreeSet<Metric>, metric: Metric) {
    if !selected.remove(&metric) {
        selected.insert(metric);
    }
}

pub struct AnalyticsData {
    reconciliations: Vec<Reconciliation>,
    medications: Vec<Medication>,
    patients: Vec<Patient>,
}

pub enum Msg {
    Load,
    Loaded(Result<AnalyticsData, ApiError>),
    Refresh,
    ToggleMetric(Metric),
    Export,
    Exported(Result<Vec<u8>, ApiError>),
}

pub struct AnalyticsPage {
    data: Option<AnalyticsData>,
    error: Option<String>,
    loading: bool,
    exporting: bool,
    selected_metrics: BTreeSet<Metric>,
}

async fn load(client: QueryClient) -> Result<AnalyticsData, ApiError> {
    let reconciliations = client
        .fetch(QueryKey::Reconciliations, || {
            endpoints::list_reconciliations(ReconciliationQuery::default())
        })
        .await?;
    let medications = client
        .fetch(QueryKey::Medications(None), || endpoints::list_medications(None))
        .await?;
    let patients = client.fetch(QueryKey::Patients, endpoints::list_patients).await?;
    Ok(AnalyticsData {
        reconciliations,
        medications,
        patients,
    })
}

/// Hands the CSV to the browser as a file download. The object URL is
/// released only after [`DOWNLOAD_URL_LIFETIME_MS`].
fn save_csv(bytes: &[u8]) -> Result<(), String> {
    let blob = Blob::new_with_options(bytes, Some("text/csv"));
    let url = ObjectUrl::from(blob);
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let anchor = document
        .create_element("a")
        .map_err(|_| "could not create link")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| "could not create link")?;
    anchor.set_href(&url);
    anchor.set_download(EXPORT_FILENAME);
    anchor.click();
    spawn_local(async move {
        TimeoutFuture::new(DOWNLOAD_URL_LIFETIME_MS).await;
        drop(url);
    });
    Ok(())
}

impl Component for AnalyticsPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        Self {
            data: None,
            error: None,
            loading: false,
            exporting: false,
            selected_metrics: Metric::ALL.into_iter().collect(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Load => {
                self.loading = true;
                let client = query_client(ctx);
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Loaded(load(client).await));
                });
            }
            Msg::Loaded(Ok(data)) => {
                self.loading = false;
                self.data = Some(data);
                self.error = None;
            }
            Msg::Loaded(Err(err)) => {
                self.loading = false;
                self.error = Some(err.to_string());
            }
            Msg::Refresh => {
                if self.loading {
                    return false;
                }
                query_client(ctx).invalidate_all(&[
                    QueryFamily::Reconciliations,
                    QueryFamily::Medications,
                    QueryFamily::Patients,
                ]);
                ctx.link().send_message(Msg::Load);
                return false;
            }
            Msg::ToggleMetric(metric) => toggle_metric(&mut self.selected_metrics, metric),
            Msg::Export => {
                if self.exporting {
                    return false;
                }
                self.exporting = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Exported(endpoints::export_reconciliations().await));
                });
            }
            Msg::Exported(result) => {
                self.exporting = false;
                match result.map_err(|err| err.to_string()).and_then(|bytes| save_csv(&bytes)) {
                    Ok(()) => show_toast("Report exported"),
                    Err(message) => {
                        gloo_console::error!(format!("export failed: {}", message));
                        show_toast(&message);
                    }
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(data) = &self.data else {
            return html! {
                <div class="page">
                    { error_banner(&self.error) }
                    if self.error.is_none() {
                        <p class="muted">{ "Loading analytics…" }</p>
                    }
                </div>
            };
        };

        let link = ctx.link();
        let now = now_local();
        let stats = SummaryStats::compute(&data.reconciliations, &data.medications, &data.patients);
        let weeks = weekly_performance(&data.reconciliations, now);
        let shown = |metric: Metric| self.selected_metrics.contains(&metric);

        html! {
            <div class="page analytics">
                <div class="page-header">
                    <div>
                        <h1>{ "Analytics" }</h1>
                        <p class="muted">{ "Reconciliation performance and medication sources" }</p>
                    </div>
                    <div class="actions">
                        <button disabled={self.loading} onclick={link.callback(|_| Msg::Refresh)}>
                            { if self.loading { "Refreshing…" } else { "Refresh" } }
                        </button>
                        <button class="primary" disabled={self.exporting} onclick={link.callback(|_| Msg::Export)}>
                            { if self.exporting { "Exporting…" } else { "Export" } }
                        </button>
                    </div>
                </div>
                { error_banner(&self.error) }

                <section class="card">
                    <h2>{ "Metrics to Display" }</h2>
                    <div class="metric-toggles">
                        { for Metric::ALL.into_iter().map(|metric| html! {
                            <label>
                                <input type="checkbox"
                                       checked={shown(metric)}
                                       onchange={link.callback(move |_| Msg::ToggleMetric(metric))} />
                                { metric.label() }
                            </label>
                        }) }
                    </div>
                </section>

                <div class="metrics">
                    { metric_card(
                        "Total Reconciliations",
                        format_count(stats.total_reconciliations),
                        &format!("{} completed", format_count(stats.completed_reconciliations)),
                    ) }
                    { metric_card("Completion Rate", format!("{}%", stats.completion_rate), "Of all sessions") }
                    { metric_card("Conflicts Found", stats.total_conflicts.to_string(), "Across all sessions") }
                    { metric_card(
                        "OCR Usage",
                        format!("{}%", stats.ocr_usage_rate),
                        &format!("{}% manual entry", stats.manual_entry_rate),
                    ) }
                    { metric_card("Patients", format_count(stats.total_patients), "Registered") }
                    { metric_card("Medications", format_count(stats.total_medications), "On file") }
                </div>

                <div class="grid two">
                    if shown(Metric::Trends) {
                        <section class="card">
                            <h2>{ "Last 7 Days" }</h2>
                            { daily_trend_chart(&daily_trend(&data.reconciliations, now)) }
                        </section>
                        <section class="card">
                            <h2>{ "Reconciliation Status" }</h2>
                            { status_chart(&status_distribution(&data.reconciliations)) }
                        </section>
                    }
                    if shown(Metric::Sources) {
                        <section class="card">
                            <h2>{ "Medication Sources" }</h2>
                            { source_chart(&source_distribution(&data.medications)) }
                        </section>
                    }
                    if shown(Metric::Performance) {
                        <section class="card">
                            <h2>{ "Weekly Performance" }</h2>
                            { weekly_chart(&weeks) }
                        </section>
                    }
                    if shown(Metric::Conflicts) {
                        <section class="card">
                            <h2>{ "Conflict Analysis" }</h2>
                            { conflict_chart(&weeks) }
                        </section>
                    }
                </div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metric_starts_shown_and_toggles_independently() {
        let mut selected: BTreeSet<Metric> = Metric::ALL.into_iter().collect();
        toggle_metric(&mut selected, Metric::Sources);
        assert!(!selected.contains(&Metric::Sources));
        assert_eq!(selected.len(), 3);

        toggle_metric(&mut selected, Metric::Sources);
        assert_eq!(selected, Metric::ALL.into_iter().collect());
    }
}
