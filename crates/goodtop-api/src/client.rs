// Scraping HTTP client
//
// Wraps `reqwest::Client` with Goodtop-specific URL construction, the
// session cookie, and the page-by-page snapshot assembly. Each public
// operation builds its own HTTP client, performs a strictly sequential
// series of requests, and drops the client on return -- no session reuse,
// no shared mutable state between overlapping calls.

use reqwest::header;
use secrecy::SecretString;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{SESSION_COOKIE, session_token};
use crate::error::Error;
use crate::model::{DeviceSnapshot, FlowControl, PortRecord, SpeedDuplex};
use crate::parse;
use crate::transport::TransportConfig;

/// Client for one Goodtop switch.
///
/// Holds the normalized base URL, the credentials, and the derived session
/// token. Cheap to clone; cloning shares nothing but the configuration.
#[derive(Debug, Clone)]
pub struct GoodtopClient {
    base_url: Url,
    username: String,
    password: SecretString,
    token: String,
    transport: TransportConfig,
}

impl GoodtopClient {
    /// Create a client for the switch at `host`.
    ///
    /// `host` may be a bare address (`192.168.200.11`), in which case the
    /// `http://` scheme is assumed, or a full `http(s)://` URL. A trailing
    /// slash is stripped either way.
    pub fn new(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let trimmed = host.trim_end_matches('/');
        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_owned()
        } else {
            format!("http://{trimmed}")
        };
        let base_url = Url::parse(&with_scheme)?;
        let username = username.into();
        let token = session_token(&username, &password);
        Ok(Self {
            base_url,
            username,
            password,
            token,
            transport,
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// The derived session token (md5 hex of username+password).
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    // ── URL / request helpers ────────────────────────────────────────

    /// Build a full URL for a CGI page path (may carry a query string,
    /// e.g. `port.cgi?page=stats`).
    pub(crate) fn page_url(&self, page: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{page}"))?)
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        self.transport.build_client()
    }

    /// GET a page with the session cookie, returning the HTML body.
    ///
    /// Anything but HTTP 200 is a failure; the firmware never uses other
    /// success codes.
    async fn get_page(&self, http: &reqwest::Client, page: &str) -> Result<String, Error> {
        let url = self.page_url(page)?;
        debug!(%url, "GET");
        let resp = http
            .get(url)
            .header(
                header::COOKIE,
                format!("{SESSION_COOKIE}={}", self.token),
            )
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(Error::Transport)
    }

    /// POST a form-encoded body, succeeding only on HTTP 200.
    async fn post_form(
        &self,
        http: &reqwest::Client,
        page: &str,
        form: &[(&str, String)],
    ) -> Result<(), Error> {
        let url = self.page_url(page)?;
        debug!(%url, "POST");
        let resp = http
            .post(url)
            .header(
                header::COOKIE,
                format!("{SESSION_COOKIE}={}", self.token),
            )
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    // ── Connectivity ─────────────────────────────────────────────────

    /// Probe the device: GET the info page and check it looks like a
    /// Goodtop management UI. Transport failures propagate so callers can
    /// distinguish "unreachable" from "reachable but not this device".
    pub async fn test_connection(&self) -> Result<bool, Error> {
        let http = self.http()?;
        let body = self.get_page(&http, "info.cgi").await?;
        Ok(body.contains("Device Model") || body.contains("MAC Address"))
    }

    // ── Snapshot ─────────────────────────────────────────────────────

    /// Fetch one full device snapshot.
    ///
    /// Visits each page in a fixed order, best-effort per page: a
    /// transport failure or parse miss leaves that page's fields at their
    /// defaults and never aborts the rest. Always returns a snapshot, even
    /// an all-default one. The statistics page decides which ports exist;
    /// the settings, PoE and MAC-table pages only annotate those.
    pub async fn fetch_snapshot(&self) -> DeviceSnapshot {
        let mut snapshot = DeviceSnapshot::default();

        let http = match self.http() {
            Ok(http) => http,
            Err(err) => {
                warn!(%err, "could not build HTTP client");
                return snapshot;
            }
        };

        self.fetch_device_info(&http, &mut snapshot).await;
        self.fetch_poe_system(&http, &mut snapshot).await;
        self.fetch_port_stats(&http, &mut snapshot).await;
        self.fetch_port_settings(&http, &mut snapshot).await;
        self.fetch_poe_ports(&http, &mut snapshot).await;
        self.fetch_mac_table(&http, &mut snapshot).await;

        snapshot
    }

    async fn fetch_device_info(&self, http: &reqwest::Client, snapshot: &mut DeviceSnapshot) {
        match self.get_page(http, "info.cgi").await {
            Ok(html) => {
                let field = |label| parse::labeled_value(&html, label).unwrap_or_default();
                snapshot.model = field("Device Model");
                snapshot.mac_address = field("MAC Address");
                snapshot.ip_address = field("IP Address");
                snapshot.firmware_version = field("Firmware Version");
                snapshot.hardware_version = field("Hardware Version");
            }
            Err(err) => debug!(%err, "device info page failed"),
        }
    }

    async fn fetch_poe_system(&self, http: &reqwest::Client, snapshot: &mut DeviceSnapshot) {
        match self.get_page(http, "pse_system.cgi").await {
            Ok(html) => {
                if let Some(watts) = parse::poe_total_watts(&html) {
                    snapshot.poe_total_watts = watts;
                }
            }
            Err(err) => debug!(%err, "PoE system page failed"),
        }
    }

    async fn fetch_port_stats(&self, http: &reqwest::Client, snapshot: &mut DeviceSnapshot) {
        match self.get_page(http, "port.cgi?page=stats").await {
            Ok(html) => {
                for row in parse::port_stats(&html) {
                    snapshot.ports.insert(
                        row.id,
                        PortRecord {
                            id: row.id,
                            state: row.state,
                            link: row.link,
                            tx_good: row.tx_good,
                            tx_bad: row.tx_bad,
                            rx_good: row.rx_good,
                            rx_bad: row.rx_bad,
                            ..PortRecord::default()
                        },
                    );
                }
            }
            Err(err) => debug!(%err, "port stats page failed"),
        }
    }

    async fn fetch_port_settings(&self, http: &reqwest::Client, snapshot: &mut DeviceSnapshot) {
        match self.get_page(http, "port.cgi").await {
            Ok(html) => {
                for port in snapshot.ports.values_mut() {
                    let (speed, flow) = parse::port_settings(&html, port.id);
                    if let Some(speed) = speed {
                        port.speed_duplex = speed;
                    }
                    if let Some(flow) = flow {
                        port.flow_control = flow;
                    }
                }
            }
            Err(err) => debug!(%err, "port settings page failed"),
        }
    }

    async fn fetch_poe_ports(&self, http: &reqwest::Client, snapshot: &mut DeviceSnapshot) {
        match self.get_page(http, "pse_port.cgi").await {
            Ok(html) => {
                for port in snapshot.ports.values_mut() {
                    port.poe = parse::poe_state(&html, port.id);
                }
            }
            Err(err) => debug!(%err, "PoE ports page failed"),
        }
    }

    /// The forwarding table is the one page that refuses an unauthenticated
    /// session, so this fetch logs in first (best-effort like the rest).
    async fn fetch_mac_table(&self, http: &reqwest::Client, snapshot: &mut DeviceSnapshot) {
        if let Err(err) = self.login(http).await {
            debug!(%err, "login before MAC table failed");
            return;
        }
        match self.get_page(http, "mac.cgi?page=fwd_tbl").await {
            Ok(html) => {
                for (port_id, mac) in parse::mac_table(&html) {
                    // Rows for ports the stats page never reported are dropped.
                    if let Some(port) = snapshot.ports.get_mut(&port_id) {
                        if !port.mac_addresses.contains(&mac) {
                            port.mac_addresses.push(mac);
                        }
                    }
                }
            }
            Err(err) => debug!(%err, "MAC table page failed"),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Toggle PoE power on a port. `port` is the 1-indexed number shown in
    /// the snapshot; the wire form is 0-indexed.
    ///
    /// Returns `true` on HTTP 200 (after a best-effort save to NVRAM),
    /// `false` on any transport failure or other status. No in-memory
    /// state changes: re-fetch the snapshot to observe the result.
    pub async fn set_poe(&self, port: u32, enabled: bool) -> bool {
        match self.try_set_poe(port, enabled).await {
            Ok(()) => true,
            Err(err) => {
                warn!(port, enabled, %err, "set_poe failed");
                false
            }
        }
    }

    async fn try_set_poe(&self, port: u32, enabled: bool) -> Result<(), Error> {
        let http = self.http()?;
        self.login_best_effort(&http).await;

        let form = [
            ("portid", wire_port_id(port)),
            ("state", wire_state(enabled)),
            // The endpoint inspects the submit-button label like a legacy
            // HTML form would; the exact text matters.
            ("submit", "Apply".to_owned()),
            ("cmd", "poe".to_owned()),
            ("language", "EN".to_owned()),
        ];
        debug!(port, enabled, "setting PoE state");
        self.post_form(&http, "pse_port.cgi", &form).await?;
        self.save_best_effort(&http).await;
        Ok(())
    }

    /// Enable or disable a port administratively.
    ///
    /// The form requires resubmitting the current speed/duplex and
    /// flow-control codes even when unchanged, or the firmware resets them
    /// to defaults -- pass the values from the latest snapshot.
    pub async fn set_port_state(
        &self,
        port: u32,
        enabled: bool,
        speed_duplex: SpeedDuplex,
        flow_control: FlowControl,
    ) -> bool {
        match self
            .try_set_port_state(port, enabled, speed_duplex, flow_control)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(port, enabled, %err, "set_port_state failed");
                false
            }
        }
    }

    async fn try_set_port_state(
        &self,
        port: u32,
        enabled: bool,
        speed_duplex: SpeedDuplex,
        flow_control: FlowControl,
    ) -> Result<(), Error> {
        let http = self.http()?;
        self.login_best_effort(&http).await;

        let form = [
            ("portid", wire_port_id(port)),
            ("state", wire_state(enabled)),
            ("speed_duplex", speed_duplex.code().to_string()),
            ("flow", flow_control.code().to_string()),
            ("submit", "+++Apply+++".to_owned()),
            ("cmd", "port".to_owned()),
            ("language", "EN".to_owned()),
        ];
        debug!(port, enabled, "setting admin state");
        self.post_form(&http, "port.cgi", &form).await?;
        self.save_best_effort(&http).await;
        Ok(())
    }

    /// Persist the running config to non-volatile storage.
    ///
    /// Issued after every successful mutation; also exposed for callers
    /// that batch several changes and save once.
    pub async fn save(&self) -> bool {
        match self.http() {
            Ok(http) => self.try_save(&http).await.is_ok(),
            Err(err) => {
                warn!(%err, "save failed");
                false
            }
        }
    }

    async fn try_save(&self, http: &reqwest::Client) -> Result<(), Error> {
        let form = [("cmd", "save".to_owned())];
        self.post_form(http, "save.cgi", &form).await
    }

    async fn save_best_effort(&self, http: &reqwest::Client) {
        if let Err(err) = self.try_save(http).await {
            warn!(%err, "saving to NVRAM failed, change is volatile");
        }
    }
}

/// Translate a caller-facing 1-indexed port number to the 0-indexed id the
/// CGI forms expect. Port 0 is rejected upstream by the CLI; here it
/// saturates rather than wrapping.
fn wire_port_id(port: u32) -> String {
    port.saturating_sub(1).to_string()
}

fn wire_state(enabled: bool) -> String {
    (if enabled { "1" } else { "0" }).to_owned()
}
