use serde::{
    Deserialize,
    Serialize,
};



/// Latest prices and valuations, as published to the display front-end.
///
/// Field names are the on-disk contract, they must not be renamed. Local
/// currency fields carry `ils` suffix because that is what consumers read,
/// even if different quote currency is configured.
///
/// All money fields are rounded to 2 decimal places, `usd_ils_rate` to 4.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub gold_price_oz_usd: f64,
    pub gold_price_gram_usd: f64,
    pub sovereign_value_ils: f64,
    pub sovereign_value_usd: f64,
    pub sovereign_gold_grams: f64,

    pub silver_price_oz_usd: f64,
    pub silver_price_gram_usd: f64,
    pub half_shekel_9g_ils: f64,
    pub half_shekel_9g_usd: f64,
    pub half_shekel_96g_ils: f64,
    pub half_shekel_96g_usd: f64,

    pub usd_ils_rate: f64,

    pub last_updated: String,
    pub last_updated_hebrew: String,
    pub last_updated_timestamp: i64,
}
