use std::fmt;



#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metal {
    Gold,
    Silver,
}



impl Metal {
    /// ISO 4217 style symbol, i.e. XAU for gold.
    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Gold => "XAU",
            Metal::Silver => "XAG",
        }
    }



    pub fn name(&self) -> &'static str {
        match self {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
        }
    }
}



impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}



/// Raw values gathered during one run.
///
/// `gold`, `silver` - spot price per troy ounce in USD.
/// `rate` - base to quote exchange rate, i.e. USD/ILS.
///
/// Each is `None` if fetching it has failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceInfo {
    pub gold: Option<f64>,
    pub silver: Option<f64>,
    pub rate: Option<f64>,
}



impl PriceInfo {
    /// Returns all three values only if every one of them was fetched.
    pub fn complete(&self) -> Option<(f64, f64, f64)> {
        Some((self.gold?, self.silver?, self.rate?))
    }
}
