//! Demo listings used when the listing source is unavailable, and as test fixtures.

use crate::models::{Coordinate, Listing, ListingStatus, SpaceType};

struct Seed {
    id: &'static str,
    title: &'static str,
    space_type: SpaceType,
    price_cents: i64,
    city: &'static str,
    address: &'static str,
    lat: f64,
    lng: f64,
    description: &'static str,
}

const SEEDS: [Seed; 6] = [
    Seed {
        id: "1",
        title: "Downtown Billboard, Times Square",
        space_type: SpaceType::Billboard,
        price_cents: 150_000,
        city: "New York",
        address: "1560 Broadway, New York, NY 10036",
        lat: 40.758,
        lng: -73.9855,
        description: "Premium digital billboard in the heart of Times Square. Over 380,000 daily pedestrian visits.",
    },
    Seed {
        id: "2",
        title: "Wrapped Delivery Van",
        space_type: SpaceType::Vehicle,
        price_cents: 45_000,
        city: "Chicago",
        address: "Chicago Metro Area, IL",
        lat: 41.8827,
        lng: -87.6233,
        description: "Full vehicle wrap on a delivery van covering downtown, Lincoln Park and Wicker Park.",
    },
    Seed {
        id: "3",
        title: "Airport Terminal Screen",
        space_type: SpaceType::Digital,
        price_cents: 90_000,
        city: "Los Angeles",
        address: "LAX Terminal B, Los Angeles, CA 90045",
        lat: 33.9425,
        lng: -118.408,
        description: "Digital screen in the international departures terminal. Over 50,000 daily travelers.",
    },
    Seed {
        id: "4",
        title: "Rooftop Mural Wall",
        space_type: SpaceType::Outdoor,
        price_cents: 60_000,
        city: "Austin",
        address: "412 Congress Ave, Austin, TX 78701",
        lat: 30.2672,
        lng: -97.7431,
        description: "Rooftop mural wall on a 6-story building, visible from 6th Street and I-35.",
    },
    Seed {
        id: "5",
        title: "Mall Atrium Display",
        space_type: SpaceType::Indoor,
        price_cents: 35_000,
        city: "Miami",
        address: "7535 N Kendall Dr, Miami, FL 33156",
        lat: 25.7617,
        lng: -80.1918,
        description: "Center-court display in the Dadeland Mall atrium. 45 million annual visitors.",
    },
    Seed {
        id: "6",
        title: "Festival Grounds Banner",
        space_type: SpaceType::Event,
        price_cents: 25_000,
        city: "Nashville",
        address: "Centennial Park, Nashville, TN 37203",
        lat: 36.1627,
        lng: -86.7816,
        description: "Banner placement across festival stages. 5,000 to 20,000 attendees each weekend.",
    },
];

pub fn demo_listings() -> Vec<Listing> {
    SEEDS
        .iter()
        .map(|s| Listing {
            id: s.id.to_string(),
            title: s.title.to_string(),
            space_type: s.space_type,
            price_cents: s.price_cents,
            city: Some(s.city.to_string()),
            address: Some(s.address.to_string()),
            coordinate: Some(Coordinate::new(s.lat, s.lng)),
            description: s.description.to_string(),
            image_url: None,
            status: ListingStatus::Published,
            created_at: String::new(),
        })
        .collect()
}
