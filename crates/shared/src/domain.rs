use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of backend "kind" strings. Unknown values decode to `Other`
/// instead of failing, and matching ignores ASCII case.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub enum $name {
            $($variant,)+
            #[default]
            Other,
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other => "other",
                }
            }

            pub fn from_wire(raw: &str) -> Self {
                let raw = raw.trim();
                $(
                    if raw.eq_ignore_ascii_case($wire) {
                        return Self::$variant;
                    }
                )+
                Self::Other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw.as_deref().map(Self::from_wire).unwrap_or_default())
            }
        }
    };
}

/// `#[serde(default)]` only covers a missing key; the backend also sends
/// explicit `null` for lists and text it did not fill in.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

wire_enum!(
    /// Why a restaurant is running a deal.
    DealType {
        Clearance => "clearance",
        ClosingSoon => "closing_soon",
        SlowSales => "slow_sales",
        Innovative => "innovative",
    }
);

wire_enum!(
    Urgency {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

wire_enum!(
    PriceRange {
        Budget => "budget",
        Mid => "mid",
        Premium => "premium",
    }
);

wire_enum!(
    MealType {
        Breakfast => "breakfast",
        Lunch => "lunch",
        Dinner => "dinner",
        Snack => "snack",
    }
);

/// City the user is browsing for. Opaque to the client; the backend
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(pub String);

impl Location {
    /// Cities offered by the location picker. Any other string is still a
    /// valid location.
    pub const SUPPORTED: [&'static str; 5] = ["Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata"];

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn supported() -> Vec<Location> {
        Self::SUPPORTED.iter().map(|name| Location::new(*name)).collect()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(Self::SUPPORTED[0])
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Location {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "temperature")]
    pub temperature_c: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub humidity: f64,
    #[serde(default, deserialize_with = "null_as_default", rename = "food_suggestions")]
    pub suggested_dishes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FestivalEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub significance: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", rename = "foods")]
    pub traditional_foods: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popular_orders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dish_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisine: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "reason")]
    pub reason_text: String,
    #[serde(default, rename = "explanation", skip_serializing_if = "Option::is_none")]
    pub explanation_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub meal_type: MealType,
}

impl Recommendation {
    pub const HEADLINE_TAG_COUNT: usize = 3;

    /// Confidence as a whole percentage in `0..=100`.
    pub fn confidence_percent(&self) -> u8 {
        if !self.confidence.is_finite() {
            return 0;
        }
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// The long explanation when the backend supplied one, else the short reason.
    pub fn display_text(&self) -> &str {
        match self.explanation_text.as_deref() {
            Some(explanation) if !explanation.trim().is_empty() => explanation,
            _ => &self.reason_text,
        }
    }

    pub fn headline_tags(&self) -> &[String] {
        let end = self.tags.len().min(Self::HEADLINE_TAG_COUNT);
        &self.tags[..end]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Deal {
    #[serde(default, deserialize_with = "null_as_default")]
    pub restaurant: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "deal")]
    pub deal_text: String,
    #[serde(default, rename = "type")]
    pub deal_type: DealType,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<String>,
}

impl Deal {
    /// Both prices, or nothing. A deal carrying only one of them has no
    /// usable price pair.
    pub fn price_pair(&self) -> Option<(f64, f64)> {
        match (self.original_price, self.discounted_price) {
            (Some(original), Some(discounted)) => Some((original, discounted)),
            _ => None,
        }
    }

    pub fn savings(&self) -> f64 {
        self.price_pair()
            .map(|(original, discounted)| original - discounted)
            .unwrap_or(0.0)
    }
}
