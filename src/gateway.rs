// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway client: the entry point tying transport, cache and devices together.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::config::GatewayConfig;
use crate::device::{Device, DeviceContext};
use crate::dispatcher::CommandDispatcher;
use crate::error::Error;
use crate::event::{EventBus, GatewayEvent};
use crate::fetch::{FetchCoordinator, StatusCache};
use crate::protocol::Transport;
#[cfg(feature = "http")]
use crate::protocol::HttpTransport;
use crate::registry::DeviceRegistry;
use crate::response::GatewayListing;

/// Client for one Connected by TCP gateway.
///
/// All devices obtained from a gateway share its transport, status cache and
/// fetch coordinator, so concurrent status reads across every bulb collapse
/// into at most one carousel request at a time.
///
/// # Examples
///
/// ```no_run
/// use tcpbulb_lib::{Gateway, GatewayConfig};
///
/// # async fn example() -> tcpbulb_lib::Result<()> {
/// let config = GatewayConfig::new("192.168.1.20", "e2de937chr0lhrlq");
/// let gateway = Gateway::new(config)?;
///
/// for device in gateway.discover().await? {
///     println!("{} in {}: on={}", device.name(), device.room_name(), device.get_power().await?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Gateway<T: Transport> {
    config: GatewayConfig,
    context: DeviceContext<T>,
    devices: RwLock<Vec<Device<T>>>,
}

#[cfg(feature = "http")]
impl Gateway<HttpTransport> {
    /// Creates a client talking to the gateway over HTTP(S).
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the HTTP transport cannot be created.
    pub fn new(config: GatewayConfig) -> Result<Self, Error> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> Gateway<T> {
    /// Creates a client using a custom transport.
    #[must_use]
    pub fn with_transport(transport: T, config: GatewayConfig) -> Self {
        let transport = Arc::new(transport);
        let timeout = config.request_timeout();
        let cache = Arc::new(Mutex::new(StatusCache::new(config.cache_ttl())));

        tracing::debug!(
            name = config.name(),
            host = config.host(),
            timeout_ms = timeout.as_millis(),
            cache_ttl_ms = config.cache_ttl().as_millis(),
            "Creating gateway client"
        );

        let context = DeviceContext {
            registry: Arc::new(DeviceRegistry::from_config(&config)),
            coordinator: Arc::new(FetchCoordinator::new(
                Arc::clone(&transport),
                Arc::clone(&cache),
                timeout,
            )),
            dispatcher: Arc::new(CommandDispatcher::new(transport, cache, timeout)),
            events: EventBus::new(),
        };

        Self {
            config,
            context,
            devices: RwLock::new(Vec::new()),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Subscribes to discovery and state-change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.context.events.subscribe()
    }

    /// Returns the current carousel listing, through the cache and coordinator.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the listing cannot be fetched.
    pub async fn listing(&self) -> Result<Arc<GatewayListing>, Error> {
        Ok(self.context.coordinator.fetch().await?)
    }

    /// Lists every bulb the gateway knows, in gateway order.
    ///
    /// Bulbs already known keep their `Device` handle and have their state
    /// reconciled; new ones are announced with [`GatewayEvent::DeviceDiscovered`].
    /// Bulbs absent from this listing are kept.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the listing cannot be fetched.
    pub async fn discover(&self) -> Result<Vec<Device<T>>, Error> {
        let listing = self.context.coordinator.fetch().await?;
        let discovered = self.context.registry.discover(&listing);

        let mut announced = Vec::new();
        let result = {
            let mut devices = self.devices.write();
            let mut result = Vec::with_capacity(discovered.len());

            for found in discovered {
                if let Some(existing) = devices.iter().find(|d| d.id() == found.info.id()) {
                    existing.reconcile(&listing);
                    result.push(existing.clone());
                    continue;
                }
                announced.push(GatewayEvent::DeviceDiscovered {
                    device_id: found.info.id().to_string(),
                    name: found.info.name().to_string(),
                    room_name: found.info.room_name().to_string(),
                });
                let device = Device::new(found.info, found.state, self.context.clone());
                devices.push(device.clone());
                result.push(device);
            }
            result
        };

        for event in announced {
            tracing::info!(device_id = event.device_id(), "New device");
            self.context.events.publish(event);
        }

        Ok(result)
    }

    /// Returns every device discovered so far, without contacting the gateway.
    #[must_use]
    pub fn devices(&self) -> Vec<Device<T>> {
        self.devices.read().clone()
    }

    /// Returns a discovered device by identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if no such device has been discovered.
    pub fn device(&self, device_id: &str) -> Result<Device<T>, Error> {
        self.devices
            .read()
            .iter()
            .find(|d| d.id() == device_id)
            .cloned()
            .ok_or_else(|| Error::DeviceNotFound(device_id.to_string()))
    }

    /// Marks the cached listing stale so the next read goes to the gateway.
    pub fn invalidate_cache(&self) {
        self.context.coordinator.cache().lock().invalidate();
    }
}

impl<T: Transport> fmt::Debug for Gateway<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("name", &self.config.name())
            .field("host", &self.config.host())
            .field("devices", &self.devices.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::GatewayError;
    use crate::protocol::scripted::{ScriptedTransport, carousel_xml};
    use crate::types::Level;

    fn gateway(transport: ScriptedTransport) -> Gateway<ScriptedTransport> {
        let config = GatewayConfig::new("10.0.0.2", "tok")
            .with_cache_ttl(Duration::from_millis(100))
            .with_device_name("2", "Desk");
        Gateway::with_transport(transport, config)
    }

    #[tokio::test(start_paused = true)]
    async fn discover_builds_devices_in_order() {
        let gateway = gateway(ScriptedTransport::new());

        let devices = gateway.discover().await.unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id(), "1");
        assert_eq!(devices[0].name(), "Bulb 1");
        assert_eq!(devices[0].room_name(), "Room");
        assert!(devices[0].state().is_on());
        assert_eq!(devices[1].name(), "Desk");
        assert_eq!(devices[1].state().level(), Level::MIN);
    }

    #[tokio::test(start_paused = true)]
    async fn discover_announces_new_devices_once() {
        let gateway = gateway(ScriptedTransport::new());
        let mut rx = gateway.subscribe();

        gateway.discover().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        gateway.discover().await.unwrap();

        let mut discovered = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if event.is_discovery() {
                discovered.push(event.device_id().to_string());
            }
        }
        assert_eq!(discovered, ["1", "2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn rediscovery_reuses_handles_and_reconciles() {
        let transport = Arc::new(ScriptedTransport::new());
        let gateway = Gateway::with_transport(
            Arc::clone(&transport),
            GatewayConfig::new("10.0.0.2", "tok"),
        );
        let first = gateway.discover().await.unwrap();

        transport.set_listing(carousel_xml(&[("1", 0, Some(10)), ("3", 1, None)]));
        let second = gateway.discover().await.unwrap();

        assert_eq!(second.len(), 2);
        assert!(!first[0].state().is_on());
        assert_eq!(first[0].state().level().value(), 10);
        assert_eq!(gateway.devices().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn device_lookup() {
        let gateway = gateway(ScriptedTransport::new());
        assert!(matches!(gateway.device("1"), Err(Error::DeviceNotFound(id)) if id == "1"));

        gateway.discover().await.unwrap();

        assert_eq!(gateway.device("2").unwrap().name(), "Desk");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_reads_across_devices_share_one_fetch() {
        let transport = Arc::new(ScriptedTransport::with_delay(Duration::from_millis(50)));
        let gateway = Gateway::with_transport(
            Arc::clone(&transport),
            GatewayConfig::new("10.0.0.2", "tok"),
        );
        let devices = gateway.discover().await.unwrap();

        let (a, b) = tokio::join!(devices[0].get_power(), devices[1].get_brightness());

        assert!(a.unwrap());
        assert_eq!(b.unwrap(), Level::MIN);
        assert_eq!(transport.carousel_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_cache_forces_fetch() {
        let transport = Arc::new(ScriptedTransport::new());
        let gateway = Gateway::with_transport(
            Arc::clone(&transport),
            GatewayConfig::new("10.0.0.2", "tok").with_cache_ttl(Duration::from_secs(60)),
        );

        gateway.listing().await.unwrap();
        gateway.listing().await.unwrap();
        gateway.invalidate_cache();
        gateway.listing().await.unwrap();

        assert_eq!(transport.carousel_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn discover_surfaces_not_synced() {
        let transport = ScriptedTransport::new();
        transport.push_body("<gip><version>1</version><rc>404</rc></gip>");
        let gateway = gateway(transport);

        let err = gateway.discover().await.unwrap_err();

        assert!(matches!(err, Error::Gateway(GatewayError::NotSynced)));
        assert!(gateway.devices().is_empty());
    }
}
