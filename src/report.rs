//! Human readable status lines about fetched values and how they changed
//! since the previous run. Nothing here affects what is persisted.



use tracing::info;

use crate::snapshot::Snapshot;



#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub label: &'static str,
    pub delta: f64,
}



/// Differences in local currency valuations between previous and fresh
/// snapshot.
pub fn changes(prior: &Snapshot, fresh: &Snapshot) -> Vec<Change> {
    let fields: [(&'static str, fn(&Snapshot) -> f64); 3] = [
        ("Sovereign", |s| s.sovereign_value_ils),
        ("Half-Shekel (9g)", |s| s.half_shekel_9g_ils),
        ("Half-Shekel (9.6g)", |s| s.half_shekel_96g_ils),
    ];

    fields.into_iter()
        .map(|(label, get)| Change {
            label,
            delta: get(fresh) - get(prior),
        })
        .collect()
}



pub fn values_log(snapshot: &Snapshot, quote: &str) {
    info!("Calculated: sovereign ({}g gold) {:.2} {}, \
        half-shekel 9g {:.2} {}, half-shekel 9.6g {:.2} {}",
        snapshot.sovereign_gold_grams, snapshot.sovereign_value_ils, quote,
        snapshot.half_shekel_9g_ils, quote, snapshot.half_shekel_96g_ils, quote
    );
}



pub fn changes_log(changes: &[Change], quote: &str) {
    if changes.is_empty() {
        return
    }

    let line = changes.iter()
        .map(|c| format!("{}: {:+.2} {}", c.label, c.delta, quote))
        .collect::<Vec<_>>()
        .join(", ");

    info!("Changes from last update: {}", line);
}
