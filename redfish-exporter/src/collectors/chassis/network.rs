use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::collectors::catalog::*;
use crate::collectors::{emit_status, label_values, SampleSink, ScrapeContext, SubsystemCollector};
use crate::redfish::models::{Chassis, NetworkAdapter};

/// Network adapters and, per adapter, their ports
pub struct NetworkCollector;

#[async_trait]
impl SubsystemCollector for NetworkCollector {
    fn name(&self) -> &'static str {
        "network"
    }

    async fn collect(&self, ctx: &ScrapeContext, chassis: &Chassis, sink: &SampleSink) {
        debug!(chassis_id = %chassis.id, "Collecting network metrics");
        let adapters = match ctx.fetch(ctx.client.network_adapters(chassis)).await {
            Ok(Some(adapters)) => adapters,
            Ok(None) => {
                warn!(chassis_id = %chassis.id, "No network adapter information for chassis");
                return;
            }
            Err(e) => {
                error!(chassis_id = %chassis.id, error = %e, "Failed to get network adapter information for chassis");
                return;
            }
        };

        for adapter in &adapters {
            let labels = label_values(&["network_adapter", &chassis.id, &adapter.name, &adapter.id]);
            emit_status(sink, NETWORK_ADAPTER_HEALTH, NETWORK_ADAPTER_STATE, &adapter.status, &labels);

            match adapter.metrics {
                Some(metrics) => {
                    sink.emit(NETWORK_ADAPTER_TX_BYTES, metrics.tx_bytes as f64, &labels);
                    sink.emit(NETWORK_ADAPTER_RX_BYTES, metrics.rx_bytes as f64, &labels);
                }
                None => debug!(chassis_id = %chassis.id, adapter_id = %adapter.id, "No traffic counters for network adapter"),
            }

            collect_ports(ctx, chassis, adapter, &labels, sink).await;
        }
    }
}

async fn collect_ports(
    ctx: &ScrapeContext,
    chassis: &Chassis,
    adapter: &NetworkAdapter,
    adapter_labels: &[String],
    sink: &SampleSink,
) {
    let ports = match ctx.fetch(ctx.client.network_ports(adapter)).await {
        Ok(Some(ports)) => ports,
        Ok(None) => {
            warn!(chassis_id = %chassis.id, adapter_id = %adapter.id, "No network port information for network adapter");
            return;
        }
        Err(e) => {
            error!(chassis_id = %chassis.id, adapter_id = %adapter.id, error = %e, "Failed to get network port information for network adapter");
            return;
        }
    };

    for port in &ports {
        let speed = port.link_speed_mbps.to_string();
        let mut labels = adapter_labels.to_vec();
        labels.extend(label_values(&[
            &port.name,
            &port.id,
            &speed,
            &port.link_technology,
            &port.physical_port_number,
        ]));

        emit_status(sink, NETWORK_PORT_HEALTH, NETWORK_PORT_STATE, &port.status, &labels);
        let link = if port.link_up { 1.0 } else { 0.0 };
        sink.emit(NETWORK_PORT_LINK_STATUS, link, &labels);
    }
}
