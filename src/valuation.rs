//! Turns raw spot prices and exchange rate into a complete `Snapshot`.
//!
//! Everything here is pure: same inputs and the same `now` always give the
//! same snapshot. Intermediate values are kept unrounded, each output field
//! is rounded exactly once when it is stored.



use chrono::{
    DateTime,
    TimeZone,
};

use crate::{
    config::Weights,
    snapshot::Snapshot,
    units::{
        item_value,
        per_gram,
        round_to,
        to_local,
    },
};



const MONEY_DP: u32 = 2;
const RATE_DP: u32 = 4;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FORMAT_LOCAL: &str = "%d.%m.%Y, %H:%M";



pub fn compute<Tz: TimeZone>(gold_usd_per_oz: f64, silver_usd_per_oz: f64,
    usd_to_local_rate: f64, weights: &Weights, now: &DateTime<Tz>
)
    -> Snapshot
    where Tz::Offset: std::fmt::Display
{
    let money = |value: f64| round_to(value, MONEY_DP);

    let gold_gram = per_gram(gold_usd_per_oz);
    let sovereign_usd = item_value(gold_gram, weights.sovereign_gold_grams);
    let sovereign_local = to_local(sovereign_usd, usd_to_local_rate);

    let silver_gram = per_gram(silver_usd_per_oz);
    let opinion_a_usd = item_value(silver_gram, weights.half_shekel_opinion_a_grams);
    let opinion_a_local = to_local(opinion_a_usd, usd_to_local_rate);
    let opinion_b_usd = item_value(silver_gram, weights.half_shekel_opinion_b_grams);
    let opinion_b_local = to_local(opinion_b_usd, usd_to_local_rate);

    let mut snapshot = Snapshot {
        gold_price_oz_usd: money(gold_usd_per_oz),
        gold_price_gram_usd: money(gold_gram),
        sovereign_value_ils: money(sovereign_local),
        sovereign_value_usd: money(sovereign_usd),
        sovereign_gold_grams: weights.sovereign_gold_grams,

        silver_price_oz_usd: money(silver_usd_per_oz),
        silver_price_gram_usd: money(silver_gram),
        half_shekel_9g_ils: money(opinion_a_local),
        half_shekel_9g_usd: money(opinion_a_usd),
        half_shekel_96g_ils: money(opinion_b_local),
        half_shekel_96g_usd: money(opinion_b_usd),

        usd_ils_rate: round_to(usd_to_local_rate, RATE_DP),

        last_updated: String::new(),
        last_updated_hebrew: String::new(),
        last_updated_timestamp: 0,
    };

    refresh_timestamps(&mut snapshot, now);

    snapshot
}



/// Overwrite only the timestamp fields. Both string renderings and the Unix
/// timestamp describe the same instant.
pub fn refresh_timestamps<Tz: TimeZone>(snapshot: &mut Snapshot, now: &DateTime<Tz>)
    where Tz::Offset: std::fmt::Display
{
    snapshot.last_updated = now.format(TIMESTAMP_FORMAT).to_string();
    snapshot.last_updated_hebrew = now.format(TIMESTAMP_FORMAT_LOCAL).to_string();
    snapshot.last_updated_timestamp = now.timestamp();
}
