#![allow(dead_code)]

use serde_json::{json, Value};

/// Directory record with the same type tag on both sides.
pub fn record(signature: &str, destination: &str, jumps: u32, wormhole_type: &str) -> Value {
    json!({
        "signatureId": signature,
        "wormholeDestinationSignatureId": format!("{signature}-IN"),
        "sourceWormholeType": wormhole_type,
        "destinationWormholeType": wormhole_type,
        "destinationSolarSystem": {
            "name": destination,
            "security": 0.5,
            "region": { "name": "Metropolis" }
        },
        "jumps": jumps,
        "wormholeEol": "stable",
        "wormholeMass": "stable"
    })
}

/// Directory record whose destination side reads K162.
pub fn k162_record(signature: &str, destination: &str, jumps: u32, source_type: &str) -> Value {
    let mut value = record(signature, destination, jumps, source_type);
    value["destinationWormholeType"] = json!("K162");
    value
}

/// Attach a collapse estimate to a record.
pub fn with_estimated_eol(mut value: Value, timestamp: &str) -> Value {
    value["wormholeEstimatedEol"] = json!(timestamp);
    value
}
