//! Plain HTML/CSS charts for the dashboard and analytics pages. Bar lengths
//! are inline percentages of the largest value in the series.

use common::analytics::{DayTrend, SourceCount, StatusCount, WeekPerformance};
use yew::prelude::*;

use crate::components::badges::status_badge;
use crate::helpers::format_count;

fn share(value: usize, max: usize) -> f64 {
    if max == 0 {
        0.0
    } else {
        value as f64 / max as f64 * 100.0
    }
}

pub fn metric_card(title: &str, value: String, hint: &str) -> Html {
    html! {
        <div class="card metric-card">
            <span class="metric-title">{ title }</span>
            <strong class="metric-value">{ value }</strong>
            if !hint.is_empty() {
                <span class="metric-hint">{ hint }</span>
            }
        </div>
    }
}

/// Stacked column per day: completed, in progress and pending.
pub fn daily_trend_chart(days: &[DayTrend]) -> Html {
    let max = days.iter().map(|d| d.total).max().unwrap_or(0);
    html! {
        <div class="trend-chart">
            { for days.iter().map(|day| {
                let segment = |value: usize, class: &'static str| html! {
                    <div class={classes!("segment", class)}
                         style={format!("height: {:.1}%", share(value, max))}
                         title={format!("{} {}", value, class.replace('-', " "))} />
                };
                html! {
                    <div class="trend-column" title={day.date.format("%Y-%m-%d").to_string()}>
                        <div class="trend-stack">
                            { segment(day.pending, "pending") }
                            { segment(day.in_progress, "in-progress") }
                            { segment(day.completed, "completed") }
                        </div>
                        <span class="trend-label">{ &day.label }</span>
                    </div>
                }
            }) }
        </div>
    }
}

fn horizontal_bar(label: Html, count: usize, total: usize, class: String) -> Html {
    let percent = share(count, total);
    html! {
        <div class="hbar-row">
            <div class="hbar-label">{ label }</div>
            <div class="hbar-track">
                <div class={classes!("hbar-fill", class)} style={format!("width: {:.1}%", percent)} />
            </div>
            <div class="hbar-value">{ format!("{} ({:.0}%)", format_count(count), percent) }</div>
        </div>
    }
}

pub fn source_chart(sources: &[SourceCount]) -> Html {
    if sources.is_empty() {
        return html! { <p class="empty">{"No medications yet"}</p> };
    }
    let total = sources.iter().map(|s| s.count).sum();
    html! {
        <div class="hbar-chart">
            { for sources.iter().map(|s| horizontal_bar(
                html! { <span>{ s.label }</span> },
                s.count,
                total,
                format!("source-{}", s.source.as_str()),
            )) }
        </div>
    }
}

pub fn status_chart(statuses: &[StatusCount]) -> Html {
    if statuses.is_empty() {
        return html! { <p class="empty">{"No reconciliations yet"}</p> };
    }
    let total = statuses.iter().map(|s| s.count).sum();
    html! {
        <div class="hbar-chart">
            { for statuses.iter().map(|s| horizontal_bar(
                status_badge(s.status),
                s.count,
                total,
                format!("status-{}", s.status.as_str()),
            )) }
        </div>
    }
}

pub fn weekly_chart(weeks: &[WeekPerformance]) -> Html {
    let max = weeks.iter().map(|w| w.completed).max().unwrap_or(0);
    html! {
        <table class="table weekly-table">
            <thead>
                <tr>
                    <th>{"Week"}</th>
                    <th>{"Completed"}</th>
                    <th>{"Conflicts"}</th>
                    <th>{"Efficiency"}</th>
                </tr>
            </thead>
            <tbody>
                { for weeks.iter().map(|w| html! {
                    <tr>
                        <td>{ &w.label }</td>
                        <td>
                            <div class="hbar-track inline">
                                <div class="hbar-fill completed" style={format!("width: {:.1}%", share(w.completed, max))} />
                            </div>
                            { w.completed }
                        </td>
                        <td>{ w.conflicts }</td>
                        <td>{ format!("{}%", w.efficiency) }</td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}

/// Conflicts found per week, as shares of every conflict in the window.
pub fn conflict_chart(weeks: &[WeekPerformance]) -> Html {
    let total = weeks.iter().map(|w| w.conflicts as usize).sum();
    if total == 0 {
        return html! { <p class="empty">{"No conflicts found"}</p> };
    }
    html! {
        <div class="hbar-chart">
            { for weeks.iter().map(|w| horizontal_bar(
                html! { <span>{ w.label.clone() }</span> },
                w.conflicts as usize,
                total,
                "conflicts".to_string(),
            )) }
        </div>
    }
}
