//! Fixed sample data shown when the live backend cannot be reached.
//!
//! Only deals have a sample set. A failed recommendation fetch shows an
//! empty list and its error message instead.

use shared::domain::{Deal, DealType, Urgency};

struct SampleDeal {
    restaurant: &'static str,
    deal_text: &'static str,
    deal_type: DealType,
    urgency: Urgency,
    prices: Option<(f64, f64)>,
    rationale: &'static str,
    cuisine: &'static str,
    rating: f64,
    expires_in: &'static str,
}

const SAMPLE_DEALS: [SampleDeal; 5] = [
    SampleDeal {
        restaurant: "Tandoori Tales",
        deal_text: "30% off Paneer Tikka",
        deal_type: DealType::Clearance,
        urgency: Urgency::High,
        prices: Some((150.0, 105.0)),
        rationale: "Low stock needs clearing before closing",
        cuisine: "Indian",
        rating: 4.0,
        expires_in: "2 hours",
    },
    SampleDeal {
        restaurant: "Dragon Bowl",
        deal_text: "25% off all menu",
        deal_type: DealType::SlowSales,
        urgency: Urgency::Medium,
        prices: None,
        rationale: "Boost evening sales with attractive discounts",
        cuisine: "Chinese",
        rating: 4.3,
        expires_in: "4 hours",
    },
    SampleDeal {
        restaurant: "Pizza & Co.",
        deal_text: "40% off Pepperoni Pizza",
        deal_type: DealType::ClosingSoon,
        urgency: Urgency::High,
        prices: Some((220.0, 132.0)),
        rationale: "Restaurant closing in 2 hours, clear inventory",
        cuisine: "Italian",
        rating: 4.4,
        expires_in: "2 hours",
    },
    SampleDeal {
        restaurant: "Chaat Corner",
        deal_text: "Buy 2 Get 1 Free Pani Puri",
        deal_type: DealType::Innovative,
        urgency: Urgency::Medium,
        prices: None,
        rationale: "High demand item, boost customer satisfaction",
        cuisine: "Street Food",
        rating: 4.2,
        expires_in: "3 hours",
    },
    SampleDeal {
        restaurant: "Bento Box",
        deal_text: "35% off Sushi Rolls",
        deal_type: DealType::Clearance,
        urgency: Urgency::High,
        prices: Some((200.0, 130.0)),
        rationale: "Premium ingredients need to be used today",
        cuisine: "Japanese",
        rating: 4.7,
        expires_in: "1 hour",
    },
];

/// The sample deal list, identical on every call.
pub fn fallback_deals() -> Vec<Deal> {
    SAMPLE_DEALS
        .iter()
        .map(|sample| Deal {
            restaurant: sample.restaurant.to_string(),
            deal_text: sample.deal_text.to_string(),
            deal_type: sample.deal_type,
            urgency: sample.urgency,
            original_price: sample.prices.map(|(original, _)| original),
            discounted_price: sample.prices.map(|(_, discounted)| discounted),
            rationale: Some(sample.rationale.to_string()),
            cuisine: Some(sample.cuisine.to_string()),
            rating: Some(sample.rating),
            expires_in: Some(sample.expires_in.to_string()),
        })
        .collect()
}
