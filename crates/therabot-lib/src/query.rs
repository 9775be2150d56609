//! Query operations over cached and searched connection data.
//!
//! Listing reads the live cache snapshot; the closest-connection lookup
//! bypasses the cache with a server-filtered fetch, because the directory
//! can narrow by search term on its side.

use chrono::Utc;

use crate::cache::ConnectionCache;
use crate::connection::{WormholeConnection, WormholeSize};
use crate::error::{Error, Result};
use crate::scout::ScoutClient;

/// A cached connection decorated for display.
#[derive(Debug, Clone)]
pub struct ConnectionListing {
    pub connection: WormholeConnection,
    pub size: WormholeSize,
    /// Signed whole hours until estimated collapse; `None` when the
    /// directory reported no estimate.
    pub hours_remaining: Option<i64>,
}

/// List every connection in the current cache snapshot.
///
/// Fails with [`Error::DataUnavailable`] when the last refresh failed or no
/// refresh has completed yet; callers must not render a list from a failed
/// snapshot.
pub async fn list_connections(cache: &ConnectionCache) -> Result<Vec<ConnectionListing>> {
    let snapshot = cache.snapshot().await;
    if !snapshot.last_fetch_succeeded {
        return Err(Error::DataUnavailable {
            reason: "the last directory refresh failed; waiting for the next cycle".to_string(),
        });
    }

    let now = Utc::now();
    Ok(snapshot
        .connections
        .into_iter()
        .map(|connection| ConnectionListing {
            size: connection.size(),
            hours_remaining: connection.hours_remaining(now),
            connection,
        })
        .collect())
}

/// Find the connection closest to the searched system.
///
/// Issues a live server-filtered fetch, discards zero-jump artifacts, and
/// returns the record with the fewest jumps. Equal-jump candidates resolve
/// to whichever came first in the payload; the sort is stable and the
/// upstream order is the only tie-break there is.
pub async fn closest_connection(
    scout: &ScoutClient,
    system_name: &str,
) -> Result<WormholeConnection> {
    let system_name = system_name.trim();
    if system_name.is_empty() {
        return Err(Error::EmptySystemName);
    }

    let records = scout
        .search(system_name)
        .await
        .map_err(|err| Error::search_unavailable(&err))?;

    let mut usable = discard_search_artifacts(records, system_name);
    sort_by_jumps(&mut usable);

    usable
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoConnectionFound {
            system: system_name.to_string(),
        })
}

/// Drop zero-jump records whose destination is not the searched system.
///
/// The directory reports zero jumps for wormhole-space systems matched by a
/// search; only a record whose destination *is* the searched system
/// legitimately carries a zero. The name comparison ignores case.
pub fn discard_search_artifacts(
    records: Vec<WormholeConnection>,
    searched_system: &str,
) -> Vec<WormholeConnection> {
    records
        .into_iter()
        .filter(|record| {
            record.jumps != 0
                || record
                    .destination_solar_system
                    .name
                    .eq_ignore_ascii_case(searched_system)
        })
        .collect()
}

/// Stable ascending sort by jump count; equal-jump records keep payload order.
pub fn sort_by_jumps(records: &mut [WormholeConnection]) {
    records.sort_by_key(|record| record.jumps);
}

#[cfg(test)]
mod tests {
    use crate::connection::{Region, SolarSystem};

    use super::*;

    fn record(destination: &str, jumps: u32, signature: &str) -> WormholeConnection {
        WormholeConnection {
            signature_id: signature.to_string(),
            wormhole_destination_signature_id: "XYZ-000".to_string(),
            source_wormhole_type: "E587".to_string(),
            destination_wormhole_type: "K162".to_string(),
            destination_solar_system: SolarSystem {
                name: destination.to_string(),
                security: 0.5,
                region: Region {
                    name: "Somewhere".to_string(),
                },
            },
            jumps,
            wormhole_eol: "stable".to_string(),
            wormhole_mass: "stable".to_string(),
            wormhole_estimated_eol: None,
        }
    }

    #[test]
    fn artifact_rule_discards_mismatched_zero_jump_records() {
        let records = vec![
            record("Jita", 3, "AAA-001"),
            record("Jita", 1, "BBB-002"),
            record("Amarr", 0, "CCC-003"),
        ];

        let usable = discard_search_artifacts(records, "Jita");
        assert_eq!(usable.len(), 2);
        assert!(usable.iter().all(|r| r.destination_solar_system.name == "Jita"));
    }

    #[test]
    fn artifact_rule_keeps_matching_zero_jump_record() {
        let records = vec![record("Jita", 0, "AAA-001")];
        assert_eq!(discard_search_artifacts(records, "Jita").len(), 1);
    }

    #[test]
    fn artifact_rule_ignores_name_case() {
        for searched in ["jita", "JITA", "jItA"] {
            let records = vec![record("Jita", 0, "AAA-001"), record("Amarr", 0, "BBB-002")];
            let usable = discard_search_artifacts(records, searched);
            assert_eq!(usable.len(), 1, "searched as {searched}");
            assert_eq!(usable[0].destination_solar_system.name, "Jita");
        }
    }

    #[test]
    fn filter_and_sort_pipeline_is_idempotent() {
        let records = vec![
            record("Jita", 4, "AAA-001"),
            record("Jita", 2, "BBB-002"),
            record("Amarr", 0, "CCC-003"),
            record("Jita", 2, "DDD-004"),
        ];

        let mut once = discard_search_artifacts(records, "Jita");
        sort_by_jumps(&mut once);

        let mut twice = discard_search_artifacts(once.clone(), "Jita");
        sort_by_jumps(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn equal_jump_records_keep_payload_order() {
        let mut records = vec![
            record("Jita", 2, "AAA-001"),
            record("Jita", 1, "BBB-002"),
            record("Jita", 1, "CCC-003"),
        ];
        sort_by_jumps(&mut records);

        assert_eq!(records[0].signature_id, "BBB-002");
        assert_eq!(records[1].signature_id, "CCC-003");
    }
}
