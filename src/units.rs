//! Unit conversions between troy ounces, grams and currencies.



use rust_decimal::{
    Decimal,
    RoundingStrategy,
};



pub const TROY_OUNCE_GRAMS: f64 = 31.1034768;



/// Price per gram from price per troy ounce.
pub fn per_gram(price_per_oz: f64) -> f64 {
    price_per_oz / TROY_OUNCE_GRAMS
}



/// Value of an item that contains `pure_weight_grams` of metal.
pub fn item_value(per_gram_price: f64, pure_weight_grams: f64) -> f64 {
    per_gram_price * pure_weight_grams
}



pub fn to_local(usd: f64, rate: f64) -> f64 {
    usd * rate
}



/// Round to `dp` decimal places, half away from zero.
///
/// Rounding is done on the shortest decimal representation of `value`, so
/// `123.455` becomes `123.46` even though its binary value is slightly below
/// the midpoint.
pub fn round_to(value: f64, dp: u32) -> f64 {
    let Ok(dec) = value.to_string().parse::<Decimal>() else {
        // Out of Decimal range, plain float rounding is good enough there.
        let mul = 10f64.powi(dp as i32);
        return (value * mul).round() / mul
    };

    let rounded = dec.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);

    // Parsing decimal text gives the nearest f64, which is what ends up in
    // JSON output.
    rounded.to_string().parse().unwrap_or(value)
}
