// HTML extraction for the switch's CGI pages.
//
// The firmware renders fixed-format tables with no ids or classes to hook
// onto, so extraction is regex-based and tightly coupled to one firmware's
// markup. Every function here is total: a pattern miss yields `None` or an
// empty collection, never an error. The known-fragile scans (PoE state,
// speed/duplex window) are kept exactly as the device's UI implies and are
// pinned by the fixture tests in `tests/`.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::model::{FlowControl, PoeState, SpeedDuplex};

/// One row of the port-statistics table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRow {
    pub id: u32,
    pub state: String,
    pub link: String,
    pub tx_good: u64,
    pub tx_bad: u64,
    pub rx_good: u64,
    pub rx_bad: u64,
}

static STATS_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        <tr>\s*<td>Port\s*(\d+)</td>\s*
        <td>([^<]+)</td>\s*
        <td>([^<]+)</td>\s*
        <td>(\d+)</td>\s*
        <td>(\d+)</td>\s*
        <td>(\d+)</td>\s*
        <td>(\d+)</td>",
    )
    .expect("valid regex")
});

static POE_WATTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name="pse_con_pwr" value="([\d.]+)""#).expect("valid regex")
});

static MAC_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        <tr>\s*<td>\d+</td>\s*
        <td>((?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2})</td>\s*
        <td>[^<]*</td>\s*
        <td>[^<]*</td>\s*
        <td>(?:Port\s*)?(\d+)</td>",
    )
    .expect("valid regex")
});

static SPEED_SELECTED: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r#"speed_duplex.*?<option\s+value="(\d)"[^>]*\bselected"#)
        .dot_matches_new_line(true)
        .build()
        .expect("valid regex")
});

static FLOW_SELECTED: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r#""flow".*?<option\s+value="(\d)"[^>]*\bselected"#)
        .dot_matches_new_line(true)
        .build()
        .expect("valid regex")
});

static POE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\b(Enable|Disable)d?\b")
        .case_insensitive(true)
        .build()
        .expect("valid regex")
});

/// Extract the `<td>` value following a `<th>` cell containing `label`.
///
/// Used on the device-info page for identity fields ("Device Model",
/// "MAC Address", ...). Returns `None` when the label never appears.
pub fn labeled_value(html: &str, label: &str) -> Option<String> {
    // The row pattern depends on the label, so it is built per call.
    let pattern = format!(
        r"<th[^>]*>\s*{}\s*</th>\s*<td[^>]*>([^<]+)</td>",
        regex::escape(label)
    );
    let row = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    row.captures(html)
        .map(|caps| caps[1].trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Total PoE consumption from the PoE-system page, read out of the
/// `pse_con_pwr` input element's value attribute.
pub fn poe_total_watts(html: &str) -> Option<f64> {
    POE_WATTS
        .captures(html)
        .and_then(|caps| caps[1].parse().ok())
}

/// All well-formed rows of the port-statistics table.
///
/// This page alone decides which ports exist in a snapshot; every other
/// page only annotates ports found here.
pub fn port_stats(html: &str) -> Vec<StatsRow> {
    STATS_ROW
        .captures_iter(html)
        .filter_map(|caps| {
            Some(StatsRow {
                id: caps[1].parse().ok()?,
                state: caps[2].trim().to_owned(),
                link: caps[3].trim().to_owned(),
                tx_good: caps[4].parse().ok()?,
                tx_bad: caps[5].parse().ok()?,
                rx_good: caps[6].parse().ok()?,
                rx_bad: caps[7].parse().ok()?,
            })
        })
        .collect()
}

/// Speed/duplex and flow-control codes for one port from the port-settings
/// page.
///
/// The scan anchors on the port's label and then looks for the first
/// `selected` option after the `speed_duplex` / `flow` markers in the rest
/// of the document. The window is not scoped to the port's own form
/// fragment, so a markup shift can attribute a neighbour's setting; treat
/// results as best-effort (see the fixture tests).
pub fn port_settings(html: &str, port: u32) -> (Option<SpeedDuplex>, Option<FlowControl>) {
    let Some(window) = port_window(html, port) else {
        return (None, None);
    };
    let speed = SPEED_SELECTED
        .captures(window)
        .and_then(|caps| caps[1].parse().ok())
        .and_then(SpeedDuplex::from_code);
    let flow = FLOW_SELECTED
        .captures(window)
        .and_then(|caps| caps[1].parse().ok())
        .and_then(FlowControl::from_code);
    (speed, flow)
}

/// PoE power state for one port from the PoE-ports page.
///
/// Scans for the first literal "Enable"/"Disable" after the port's label
/// anywhere in the remaining document. When neither marker follows the
/// label (or the label is missing), the state is `Unknown` -- the page
/// layout has drifted and guessing would silently report the wrong port.
pub fn poe_state(html: &str, port: u32) -> PoeState {
    let Some(window) = port_window(html, port) else {
        return PoeState::Unknown;
    };
    match POE_MARKER.captures(window) {
        Some(caps) if caps[1].eq_ignore_ascii_case("enable") => PoeState::Enabled,
        Some(_) => PoeState::Disabled,
        None => PoeState::Unknown,
    }
}

/// `(port, mac)` pairs from the MAC forwarding-table page, in document
/// order. Duplicates are the caller's concern (the client deduplicates per
/// port, keeping insertion order).
pub fn mac_table(html: &str) -> Vec<(u32, String)> {
    MAC_ROW
        .captures_iter(html)
        .filter_map(|caps| {
            let port = caps[2].parse().ok()?;
            Some((port, caps[1].to_owned()))
        })
        .collect()
}

/// The document slice following the first `Port N` label, `None` when the
/// label never appears. The `\b` keeps "Port 1" from anchoring on "Port 10".
fn port_window(html: &str, port: u32) -> Option<&str> {
    let anchor = RegexBuilder::new(&format!(r"Port\s*{port}\b"))
        .case_insensitive(true)
        .build()
        .ok()?;
    let m = anchor.find(html)?;
    Some(&html[m.end()..])
}
