#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use wiremock::MockServer;

use zendesk_mcp::clock::FixedClock;
use zendesk_mcp::config::Config;
use zendesk_mcp::zendesk_client::ZendeskClient;

pub const EMAIL: &str = "agent@acme.com";
pub const TOKEN: &str = "zd_test_token_9f8e7d";

/// `Basic base64("agent@acme.com/token:zd_test_token_9f8e7d")`
pub const AUTH_HEADER: &str = "Basic YWdlbnRAYWNtZS5jb20vdG9rZW46emRfdGVzdF90b2tlbl85ZjhlN2Q=";

pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new("acme", EMAIL, TOKEN);
    config.base_url_override = Some(format!("{}/api/v2", server.uri()));
    config
}

/// Client pointed at the mock server, with the clock pinned to
/// 2026-02-26T12:00:00Z.
pub fn client_for(server: &MockServer) -> ZendeskClient {
    client_with_config(&config_for(server))
}

pub fn client_with_config(config: &Config) -> ZendeskClient {
    let now = Utc.with_ymd_and_hms(2026, 2, 26, 12, 0, 0).unwrap();
    ZendeskClient::new(config)
        .expect("client")
        .with_clock(FixedClock(now))
}
