//! Browser helpers shared by the pages: toasts, confirmations, form events
//! and the local clock.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

/// Shows a transient notification at the bottom of the page for three seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                toast.set_class_name("toast");
                let html_toast: HtmlElement = toast.unchecked_into();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Blocking browser confirmation; a missing window counts as "no".
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn input_value(e: InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn textarea_value(e: InputEvent) -> String {
    let textarea: HtmlTextAreaElement = e.target_unchecked_into();
    textarea.value()
}

pub fn select_value(e: Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}

/// The browser's current time in its local offset.
pub fn now_local() -> DateTime<FixedOffset> {
    let date = js_sys::Date::new_0();
    let offset = FixedOffset::west_opt(date.get_timezone_offset() as i32 * 60)
        .unwrap_or_else(|| Utc.fix());
    Utc.timestamp_millis_opt(date.get_time() as i64)
        .single()
        .unwrap_or_default()
        .with_timezone(&offset)
}

pub fn today() -> NaiveDate {
    now_local().date_naive()
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

pub fn format_count(value: usize) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Parses an `<input type="date">` value; blank or malformed input gives `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(now_local().offset())
        .format("%b %-d, %Y %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_inputs_round_trip_through_iso_strings() {
        let date = parse_date(" 2024-02-29 ");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(format_date(date), "2024-02-29");
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("02/29/2024"), None);
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn counts_use_thousands_separators() {
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(12), "12");
    }
}
