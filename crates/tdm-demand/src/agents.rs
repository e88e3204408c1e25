//! Expansion of OD volumes into discrete trip agents.

use rustc_hash::FxHashMap;

use tdm_core::{AgentId, NodeId, SimRng, ZoneId};
use tdm_grid::ZoneSystem;
use tdm_net::NetworkModel;

use crate::gravity::TripTable;
use crate::{DemandError, DemandResult};

/// Mode tag carried by every synthesized agent.
pub const AGENT_MODE: &str = "v";

/// Departure window: minutes past this base hour.
const DEPARTURE_BASE_HOUR: u32 = 7;

/// One synthesized trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripAgent {
    pub id: AgentId,
    pub mode: &'static str,
    pub origin_zone: ZoneId,
    pub destination_zone: ZoneId,
    /// Concrete endpoint sampled from the origin zone's member nodes.
    pub origin_node: NodeId,
    /// Concrete endpoint sampled from the destination zone's member nodes.
    pub destination_node: NodeId,
    /// 4-digit clock string, e.g. `0731`.
    pub departure: String,
}

/// Expand every OD cell into `ceil(volume)` agents with sampled endpoints
/// and departure times.
///
/// Endpoints are drawn uniformly, with replacement, from the member-node
/// lists of the respective zones.  An OD pair with positive volume whose
/// zone has no member nodes is a fatal lookup error — no agent can be
/// placed there.
pub fn sample_agents(
    trips: &TripTable,
    zones: &ZoneSystem,
    net: &NetworkModel,
    rng: &mut SimRng,
) -> DemandResult<Vec<TripAgent>> {
    // Member nodes per zone, from the node back-references.
    let mut members: FxHashMap<ZoneId, Vec<NodeId>> = FxHashMap::default();
    for node in &net.nodes {
        if let Some(zone) = node.zone {
            members.entry(zone).or_default().push(node.id);
        }
    }

    let mut agents = Vec::new();
    let mut next_id = 1u32;
    for (i, origin) in zones.zones().iter().enumerate() {
        for (j, destination) in zones.zones().iter().enumerate() {
            let count = trips.volumes.get(i, j).ceil() as u64;
            for _ in 0..count {
                let origin_node = pick(&members, origin.id, rng)?;
                let destination_node = pick(&members, destination.id, rng)?;
                agents.push(TripAgent {
                    id: AgentId(next_id),
                    mode: AGENT_MODE,
                    origin_zone: origin.id,
                    destination_zone: destination.id,
                    origin_node,
                    destination_node,
                    departure: departure_time(rng),
                });
                next_id += 1;
            }
        }
    }

    log::info!("number of agents = {}", agents.len());
    if agents.is_empty() {
        log::warn!(
            "no agents generated; empty POI demand or an all-zero trip matrix is the usual cause"
        );
    }
    Ok(agents)
}

fn pick(
    members: &FxHashMap<ZoneId, Vec<NodeId>>,
    zone: ZoneId,
    rng: &mut SimRng,
) -> DemandResult<NodeId> {
    members
        .get(&zone)
        .and_then(|nodes| rng.choose(nodes))
        .copied()
        .ok_or(DemandError::EmptyZone(zone))
}

/// A departure minute drawn uniformly from the 59-minute window past the
/// base hour, rounded up to a whole minute; the final minute rolls over to
/// the top of the next hour.
fn departure_time(rng: &mut SimRng) -> String {
    let minute = rng.gen_range(1.0f64..60.0).ceil() as u32;
    if minute == 60 {
        format!("{:02}00", DEPARTURE_BASE_HOUR + 1)
    } else {
        format!("{DEPARTURE_BASE_HOUR:02}{minute:02}")
    }
}
