//! Plain-text rendering of the offer view

use crate::api_client::ApiClient;
use crate::view::{Screen, ViewState, available_actions};
use offer_admin_core::Offer;
use std::fmt::Write;

const HEADERS: [&str; 7] = [
    "Title",
    "Description",
    "Price",
    "Status",
    "Confirmation",
    "Actions",
    "Image",
];

const ROW_ACTIONS: &str = "Archive / Delete";

/// Render the view as text: a loading line, the error, or the offers table
pub fn render(state: &ViewState, client: &ApiClient) -> String {
    let mut out = String::new();

    let avatar = state
        .admin_avatar
        .as_deref()
        .map_or_else(|| "-".to_string(), |file| client.avatar_url(file));
    let _ = writeln!(out, "AdminPanel  (admin avatar: {avatar})");

    match state.screen() {
        Screen::Loading => out.push_str("Loading...\n"),
        Screen::Error(message) => {
            let _ = writeln!(out, "{message}");
        }
        Screen::Table(offers) => out.push_str(&render_table(offers, client)),
    }

    out
}

/// Render only the offers table
pub fn render_table(offers: &[Offer], client: &ApiClient) -> String {
    let rows: Vec<[String; 7]> = offers.iter().map(|offer| row(offer, client)).collect();

    let mut widths = HEADERS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for cells in &rows {
        push_line(&mut out, cells, &widths);
    }
    if rows.is_empty() {
        out.push_str("(no offers)\n");
    }
    out
}

fn row(offer: &Offer, client: &ApiClient) -> [String; 7] {
    let confirmation = available_actions(offer.status)
        .iter()
        .map(|action| action.label())
        .collect::<Vec<_>>()
        .join(" / ");

    let image = offer
        .image
        .as_deref()
        .map_or_else(|| "-".to_string(), |file| client.offer_image_url(file));

    [
        format!("#{} {}", offer.id, offer.title),
        offer.description.clone(),
        offer.price.to_string(),
        offer.status.label(),
        confirmation,
        ROW_ACTIONS.to_string(),
        image,
    ]
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
