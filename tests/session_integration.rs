// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the normal-mode session against a mock bulb.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockBulb, Reply, answer_with, lit, notification, ok};
use parking_lot::Mutex;
use serde_json::json;
use yeelight_lib::flow::{Flow, FlowAction, Transition};
use yeelight_lib::subscription::Subscribable;
use yeelight_lib::types::{CronType, Effect, PowerMode, PowerState};
use yeelight_lib::{
    Bulb, BulbBuilder, BulbType, DeviceError, Error, PropertySource, PropertyValue,
};

fn builder_for(mock: &MockBulb) -> BulbBuilder {
    Bulb::builder(mock.host()).with_port(mock.port())
}

fn bulb_for(mock: &MockBulb) -> Bulb {
    builder_for(mock).build().unwrap()
}

/// Builds the bulb and queries it once, so the cache knows it is on.
async fn lit_bulb(builder: BulbBuilder) -> Bulb {
    let mut bulb = builder.build().unwrap();
    bulb.get_properties().await.unwrap();
    assert!(bulb.last_properties().is_powered_on());
    bulb
}

// ============================================================================
// Request encoding
// ============================================================================

mod requests {
    use super::*;

    #[tokio::test]
    async fn rgb_is_packed_and_decorated() {
        let mock = MockBulb::start(lit(|c| Reply::Lines(vec![ok(c)]))).await;
        let mut bulb = lit_bulb(builder_for(&mock)).await;

        let response = bulb.set_rgb(255, 255, 0).await.unwrap();

        assert!(response.is_ok());
        let sent = mock.commands();
        assert_eq!(sent[0]["method"], "set_rgb");
        assert_eq!(sent[0]["params"], json!([16_776_960, "smooth", 300]));
    }

    #[tokio::test]
    async fn command_ids_increase_from_zero() {
        let mock = MockBulb::start(|c| Reply::Lines(vec![ok(c)])).await;
        let mut bulb = bulb_for(&mock);

        bulb.toggle().await.unwrap();
        bulb.stop_flow().await.unwrap();
        bulb.set_default().await.unwrap();

        let ids: Vec<_> = mock.received().iter().map(|c| c["id"].clone()).collect();
        assert_eq!(ids, vec![json!(0), json!(1), json!(2)]);
        assert_eq!(mock.connection_count(), 1);
    }

    #[tokio::test]
    async fn color_temperature_is_clamped() {
        let mock = MockBulb::start(lit(|c| Reply::Lines(vec![ok(c)]))).await;
        let mut bulb = lit_bulb(builder_for(&mock)).await;

        bulb.set_color_temp(1400).await.unwrap();
        bulb.set_color_temp(8400).await.unwrap();

        let sent = mock.commands();
        assert_eq!(sent[0]["params"][0], json!(1700));
        assert_eq!(sent[1]["params"][0], json!(6500));
    }

    #[tokio::test]
    async fn hsv_with_value_is_sent_as_flow() {
        let mock = MockBulb::start(lit(|c| Reply::Lines(vec![ok(c)]))).await;
        let builder = builder_for(&mock)
            .with_effect(Effect::Sudden)
            .with_duration(500);
        let mut bulb = lit_bulb(builder).await;

        bulb.set_hsv(200, 100, Some(10)).await.unwrap();
        bulb.set_hsv(200, 100, None).await.unwrap();

        let sent = mock.commands();
        assert_eq!(sent[0]["method"], "start_cf");
        assert_eq!(sent[0]["params"], json!([1, 1, "50, 1, 43263, 10"]));
        assert_eq!(sent[1]["method"], "set_hsv");
        assert_eq!(sent[1]["params"], json!([200, 100, "sudden", 500]));
    }

    #[tokio::test]
    async fn flow_and_power_mode() {
        let mock = MockBulb::start(lit(|c| Reply::Lines(vec![ok(c)]))).await;
        let mut bulb = lit_bulb(builder_for(&mock)).await;

        let flow = Flow::builder()
            .count(2)
            .action(FlowAction::Stay)
            .transition(Transition::rgb(255, 255, 0).with_duration(300))
            .transition(Transition::sleep(400))
            .build()
            .unwrap();
        bulb.start_flow(flow).await.unwrap();
        bulb.set_power_mode(PowerMode::Moonlight).await.unwrap();
        bulb.cron_add(CronType::Off, 15).await.unwrap();
        bulb.set_name("desk").await.unwrap();

        let sent = mock.commands();
        assert_eq!(
            sent[0]["params"],
            json!([4, 1, "300, 1, 16776960, 100, 400, 7, 1, 2"])
        );
        assert_eq!(sent[1]["params"], json!(["on", "smooth", 300, 5]));
        assert_eq!(sent[2]["params"], json!([0, 15]));
        assert_eq!(sent[3]["params"], json!(["desk"]));
    }
}

// ============================================================================
// Response handling
// ============================================================================

mod responses {
    use super::*;

    #[tokio::test]
    async fn notification_before_response_updates_cache() {
        let mock = MockBulb::start(lit(|c| {
            Reply::Lines(vec![
                notification(json!({"power": "on", "bright": "10"})),
                ok(c),
            ])
        }))
        .await;
        let mut bulb = lit_bulb(builder_for(&mock)).await;

        let response = bulb.set_brightness(10).await.unwrap();

        assert!(response.is_ok());
        let cache = bulb.last_properties();
        assert_eq!(cache.brightness(), Some(10));
        assert!(cache.is_powered_on());
        assert_eq!(cache.entry("bright").unwrap().source, PropertySource::Notified);
    }

    #[tokio::test]
    async fn notification_and_response_in_one_segment() {
        let mock = MockBulb::start(|c| {
            let text = format!("{}\r\n{}\r\n", notification(json!({"ct": 3500})), ok(c));
            Reply::Raw(text.into_bytes())
        })
        .await;
        let mut bulb = bulb_for(&mock);

        assert!(bulb.toggle().await.unwrap().is_ok());
        assert_eq!(bulb.last_properties().get("ct"), Some(&PropertyValue::Known(json!(3500))));
    }

    #[tokio::test]
    async fn device_error_keeps_connection() {
        let mock = MockBulb::start(|c| {
            if c["method"] == "set_adjust" {
                Reply::Lines(vec![
                    json!({"id": c["id"], "error": {"code": -1, "message": "unsupported method"}})
                        .to_string(),
                ])
            } else {
                Reply::Lines(vec![ok(c)])
            }
        })
        .await;
        let mut bulb = bulb_for(&mock);

        let err = bulb
            .set_adjust(
                yeelight_lib::types::AdjustAction::Increase,
                yeelight_lib::types::AdjustProperty::Color,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::CommandRejected(ref payload)) if payload["code"] == json!(-1)
        ));

        bulb.toggle().await.unwrap();
        assert_eq!(mock.connection_count(), 1);
    }

    #[tokio::test]
    async fn dropped_connection_is_reported_and_reopened() {
        let mock = MockBulb::start(|c| {
            if c["method"] == "toggle" {
                Reply::Close
            } else {
                Reply::Lines(vec![ok(c)])
            }
        })
        .await;
        let mut bulb = bulb_for(&mock);

        let err = bulb.toggle().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::CommandRejected(ref payload)) if payload == "connection closed"
        ));
        assert!(!bulb.session().is_connected());

        bulb.turn_off().await.unwrap();
        assert_eq!(mock.connection_count(), 2);
    }

    #[tokio::test]
    async fn silence_times_out_as_closed_connection() {
        let mock = MockBulb::start(|_| Reply::Silent).await;
        let mut bulb = Bulb::builder(mock.host())
            .with_port(mock.port())
            .with_timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let err = bulb.stop_flow().await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::CommandRejected(_))));
        assert!(!bulb.session().is_connected());
    }

    #[tokio::test]
    async fn garbage_line_is_invalid_command() {
        let mock = MockBulb::start(|_| Reply::Lines(vec!["{\"id\":0,\"res".to_string()])).await;
        let mut bulb = bulb_for(&mock);

        let response = bulb.stop_flow().await.unwrap();
        assert_eq!(response.first(), Some(&json!("invalid command")));
    }
}

// ============================================================================
// Properties and power handling
// ============================================================================

mod properties {
    use super::*;

    #[tokio::test]
    async fn query_replaces_cache() {
        let mock = MockBulb::start(answer_with(json!({
            "power": "on",
            "bright": "80",
            "ct": "4000",
            "rgb": "",
            "name": "desk"
        })))
        .await;
        let mut bulb = bulb_for(&mock);

        let cache = bulb.get_properties().await.unwrap();
        assert!(cache.is_powered_on());
        assert_eq!(cache.brightness(), Some(80));
        assert_eq!(cache.get("rgb"), Some(&PropertyValue::Inapplicable));
        assert_eq!(cache.name(), Some("desk"));

        assert_eq!(bulb.bulb_type(), BulbType::WhiteTemp);
        assert_eq!(bulb.current_brightness(), Some(80));
        let sent = mock.received();
        assert_eq!(sent[0]["method"], "get_prop");
        assert_eq!(sent[0]["params"][0], "power");
    }

    #[tokio::test]
    async fn auto_on_turns_light_on_once() {
        let mock = MockBulb::start(answer_with(json!({"power": "off"}))).await;
        let mut bulb = Bulb::builder(mock.host())
            .with_port(mock.port())
            .with_auto_on(true)
            .build()
            .unwrap();

        bulb.set_brightness(50).await.unwrap();

        assert_eq!(mock.methods(), vec!["get_prop", "set_power", "set_bright"]);
        assert_eq!(mock.received()[1]["params"], json!(["on", "smooth", 300]));
    }

    #[tokio::test]
    async fn auto_on_skips_power_when_already_on() {
        let mock = MockBulb::start(answer_with(json!({"power": "on"}))).await;
        let mut bulb = Bulb::builder(mock.host())
            .with_port(mock.port())
            .with_auto_on(true)
            .build()
            .unwrap();

        bulb.set_rgb(0, 0, 255).await.unwrap();

        assert_eq!(mock.methods(), vec!["get_prop", "set_rgb"]);
    }

    #[tokio::test]
    async fn known_off_without_auto_on_fails_before_sending() {
        let mock = MockBulb::start(answer_with(json!({"power": "off"}))).await;
        let mut bulb = bulb_for(&mock);
        bulb.get_properties().await.unwrap();

        let err = bulb.set_color_temp(3000).await.unwrap_err();

        assert!(matches!(err, Error::Device(DeviceError::PoweredOff)));
        assert_eq!(mock.methods(), vec!["get_prop"]);

        // power commands are never blocked
        bulb.turn_on().await.unwrap();
        assert_eq!(mock.methods(), vec!["get_prop", "set_power"]);
    }

    #[tokio::test]
    async fn unknown_power_without_auto_on_fails_before_connecting() {
        let mock = MockBulb::start(answer_with(json!({"power": "off"}))).await;
        let mut bulb = bulb_for(&mock);

        let err = bulb.set_brightness(40).await.unwrap_err();

        assert!(matches!(err, Error::Device(DeviceError::PoweredOff)));
        assert!(mock.received().is_empty());
        assert_eq!(mock.connection_count(), 0);
        assert_eq!(bulb.session().next_command_id(), 0);
    }

    #[tokio::test]
    async fn callbacks_see_queried_and_notified_changes() {
        let mock = MockBulb::start(|c| {
            if c["method"] == "get_prop" {
                Reply::Lines(vec![json!({"id": c["id"], "result": ["off"]}).to_string()])
            } else {
                Reply::Lines(vec![notification(json!({"power": "on"})), ok(c)])
            }
        })
        .await;
        let mut bulb = bulb_for(&mock);

        let powers = Arc::new(Mutex::new(Vec::new()));
        let sources = Arc::new(Mutex::new(Vec::new()));
        let powers_clone = Arc::clone(&powers);
        bulb.on_power_changed(move |state| powers_clone.lock().push(state));
        let sources_clone = Arc::clone(&sources);
        bulb.on_property_changed(move |change| sources_clone.lock().push(change.source));

        bulb.query_properties(&[yeelight_lib::Property::Power])
            .await
            .unwrap();
        bulb.turn_on().await.unwrap();

        assert_eq!(*powers.lock(), vec![PowerState::Off, PowerState::On]);
        assert_eq!(
            *sources.lock(),
            vec![PropertySource::Queried, PropertySource::Notified]
        );
    }
}
