// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport using wiremock.

use std::time::Duration;

use tcpbulb_lib::command::{DeviceCommand, RoomGetCarouselCommand};
use tcpbulb_lib::protocol::{HttpTransport, Transport};
use tcpbulb_lib::types::{Level, PowerState};
use tcpbulb_lib::{Error, Gateway, GatewayConfig, GatewayError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CAROUSEL: &str = "<gip><version>1</version><rc>200</rc>\
    <room><rid>0</rid><name>Kitchen</name>\
        <device><did>216438039298518643</did><state>1</state><level>80</level></device>\
        <device><did>216438039298518644</did><state>0</state></device>\
    </room></gip>";

const ACK: &str = "<gip><version>1</version><rc>200</rc></gip>";
const NOT_SYNCED: &str = "<gip><version>1</version><rc>404</rc></gip>";

fn config_for(server: &MockServer) -> GatewayConfig {
    let addr = server.address();
    GatewayConfig::new(addr.ip().to_string(), "e2de937chr0lhrlq")
        .with_port(addr.port())
        .with_http()
}

fn carousel_mock(body: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/gwr/gop.php"))
        .and(body_string_contains("cmd=RoomGetCarousel"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
}

// ============================================================================
// HttpTransport Tests
// ============================================================================

mod http_transport {
    use super::*;

    #[tokio::test]
    async fn posts_form_body_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gwr/gop.php"))
            .and(header("content-type", "text/xml"))
            .and(body_string_contains("cmd=RoomGetCarousel"))
            .and(body_string_contains("%3Ctoken%3Ee2de937chr0lhrlq%3C%2Ftoken%3E"))
            .and(body_string_contains("fmt=xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CAROUSEL))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&config_for(&server)).unwrap();
        let response = transport
            .send_command(&RoomGetCarouselCommand, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(response.body().contains("Kitchen"));
    }

    #[tokio::test]
    async fn not_synced_sentinel_is_distinguished() {
        let server = MockServer::start().await;
        carousel_mock(NOT_SYNCED).mount(&server).await;

        let transport = HttpTransport::new(&config_for(&server)).unwrap();
        let err = transport
            .send_command(&RoomGetCarouselCommand, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::NotSynced);
        assert!(!err.is_connectivity());
    }

    #[tokio::test]
    async fn other_return_code_is_rejected() {
        let server = MockServer::start().await;
        carousel_mock("<gip><version>1</version><rc>500</rc></gip>")
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&config_for(&server)).unwrap();
        let err = transport
            .send_command(&RoomGetCarouselCommand, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::CommandRejected(500));
    }

    #[tokio::test]
    async fn http_error_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&config_for(&server)).unwrap();
        let err = transport
            .send_command(&RoomGetCarouselCommand, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::ConnectionFailed(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn slow_gateway_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(CAROUSEL)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&config_for(&server)).unwrap();
        let err = transport
            .send_command(&RoomGetCarouselCommand, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::Timeout(100));
    }

    #[tokio::test]
    async fn closed_port_is_connection_refused() {
        // Nothing listens on port 1.
        let config = GatewayConfig::new("127.0.0.1", "e2de937chr0lhrlq")
            .with_port(1)
            .with_http();

        let transport = HttpTransport::new(&config).unwrap();
        let err = transport
            .send_command(&RoomGetCarouselCommand, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::ConnectionRefused);
    }

    #[tokio::test]
    async fn brightness_command_marks_level_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("cmd=DeviceSendCommand"))
            .and(body_string_contains("%3Cdid%3E7%3C%2Fdid%3E"))
            .and(body_string_contains("%3Cvalue%3E35%3C%2Fvalue%3E"))
            .and(body_string_contains("%3Ctype%3Elevel%3C%2Ftype%3E"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACK))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&config_for(&server)).unwrap();
        transport
            .send_command(
                &DeviceCommand::level("7", Level::new(35).unwrap()),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
    }
}

// ============================================================================
// Gateway Tests
// ============================================================================

mod gateway {
    use super::*;

    #[tokio::test]
    async fn discover_lists_bulbs() {
        let server = MockServer::start().await;
        carousel_mock(CAROUSEL).expect(1).mount(&server).await;

        let config = config_for(&server).with_device_name("216438039298518644", "Sink");
        let gateway = Gateway::new(config).unwrap();
        let devices = gateway.discover().await.unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name(), "Bulb 216438039298518643");
        assert_eq!(devices[0].room_name(), "Kitchen");
        assert_eq!(devices[0].state().level().value(), 80);
        assert_eq!(devices[1].name(), "Sink");
        assert_eq!(devices[1].state().level(), Level::MIN);
    }

    #[tokio::test]
    async fn concurrent_reads_hit_gateway_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("cmd=RoomGetCarousel"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(CAROUSEL)
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let (a, b, c) = tokio::join!(gateway.listing(), gateway.listing(), gateway.listing());

        assert_eq!(a.unwrap().len(), 2);
        assert_eq!(b.unwrap().len(), 2);
        assert_eq!(c.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn write_invalidates_cached_listing() {
        let server = MockServer::start().await;
        carousel_mock(CAROUSEL).expect(2).mount(&server).await;
        Mock::given(method("POST"))
            .and(body_string_contains("cmd=DeviceSendCommand"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACK))
            .expect(1)
            .mount(&server)
            .await;

        let gateway =
            Gateway::new(config_for(&server).with_cache_ttl(Duration::from_secs(60))).unwrap();
        let device = gateway.discover().await.unwrap().remove(0);

        device.set_power(PowerState::Off).await.unwrap();
        assert!(!device.state().is_on());

        // Served by a fresh fetch, not by the cached "on" listing.
        assert!(device.get_power().await.unwrap());
    }

    #[tokio::test]
    async fn rejected_write_is_surfaced() {
        let server = MockServer::start().await;
        carousel_mock(CAROUSEL).mount(&server).await;
        Mock::given(method("POST"))
            .and(body_string_contains("cmd=DeviceSendCommand"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NOT_SYNCED))
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let device = gateway.discover().await.unwrap().remove(0);

        let err = device.set_power(false).await.unwrap_err();

        assert!(matches!(err, Error::Gateway(GatewayError::NotSynced)));
        assert!(device.state().is_on());
    }
}
