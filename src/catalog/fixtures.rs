// Seed data for the mocked catalog backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::types::{Artwork, ProvenanceRecord};

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}

fn provenance(date: &str, owner: &str, location: &str) -> ProvenanceRecord {
    ProvenanceRecord {
        date: date.to_string(),
        owner: owner.to_string(),
        location: location.to_string(),
        verified: true,
    }
}

struct Seed<'a> {
    id: &'a str,
    title: &'a str,
    artist_id: &'a str,
    artist_name: &'a str,
    year: u16,
    medium: &'a str,
    dimensions: &'a str,
    edition: &'a str,
    price: i64,
    image_url: &'a str,
    description: &'a str,
    tag_id: &'a str,
    provenance: Vec<ProvenanceRecord>,
    created_at: &'a str,
    updated_at: &'a str,
}

impl Seed<'_> {
    fn into_artwork(self) -> Artwork {
        Artwork {
            id: self.id.to_string(),
            title: self.title.to_string(),
            artist_id: self.artist_id.to_string(),
            artist_name: self.artist_name.to_string(),
            seller_id: "seller-789".to_string(),
            year: self.year,
            medium: self.medium.to_string(),
            dimensions: self.dimensions.to_string(),
            edition: self.edition.to_string(),
            price: Decimal::from(self.price),
            currency: "USD".to_string(),
            image_url: self.image_url.to_string(),
            description: self.description.to_string(),
            tag_id: self.tag_id.to_string(),
            provenance: self.provenance,
            created_at: at(self.created_at),
            updated_at: at(self.updated_at),
        }
    }
}

pub fn seed_artworks() -> Vec<Artwork> {
    vec![
        Seed {
            id: "artwork-123",
            title: "Convergence of Time",
            artist_id: "artist-456",
            artist_name: "Elena Rodriguez",
            year: 2024,
            medium: "Digital Print on Canvas",
            dimensions: "60 × 90 cm",
            edition: "2/15",
            price: 1200,
            image_url: "https://images.unsplash.com/photo-1531913764164-f85c52e6e654",
            description: "A contemplative exploration of time and space through generative algorithm techniques and traditional painting methods.",
            tag_id: "nfc-7d8e9f-art123",
            provenance: vec![
                provenance("2024-01-15", "Gallery Modern", "New York, NY"),
                provenance("2024-05-10", "Private Collection", "San Francisco, CA"),
            ],
            created_at: "2024-01-15T10:30:00Z",
            updated_at: "2024-05-10T14:22:00Z",
        },
        Seed {
            id: "artwork-1",
            title: "Abstract Harmony",
            artist_id: "a1",
            artist_name: "Elena Rodriguez",
            year: 2023,
            medium: "Oil on Canvas",
            dimensions: "24 × 36 in",
            edition: "1/1",
            price: 2500,
            image_url: "https://images.unsplash.com/photo-1500375592092-40eb2168fd21",
            description: "A vibrant exploration of color and form, inspired by the rhythmic patterns found in nature and music.",
            tag_id: "NFC-4A2B9C-8D7E-1",
            provenance: vec![provenance("2023-06-15", "Modern Space Gallery", "New York, NY")],
            created_at: "2023-06-15T09:00:00Z",
            updated_at: "2023-06-15T09:00:00Z",
        },
        Seed {
            id: "artwork-2",
            title: "Urban Reflections",
            artist_id: "a2",
            artist_name: "Marcus Chen",
            year: 2022,
            medium: "Acrylic on Canvas",
            dimensions: "30 × 40 in",
            edition: "1/1",
            price: 1800,
            image_url: "https://images.unsplash.com/photo-1506744038136-46273834b3fb",
            description: "City light folded back on itself across wet pavement.",
            tag_id: "nfc-2b3c4d-art2",
            provenance: vec![provenance("2022-11-02", "Marcus Chen Studio", "Chicago, IL")],
            created_at: "2022-11-02T12:00:00Z",
            updated_at: "2023-02-20T16:45:00Z",
        },
        Seed {
            id: "artwork-5",
            title: "Serene Forest",
            artist_id: "a5",
            artist_name: "Lina Park",
            year: 2023,
            medium: "Watercolor on Paper",
            dimensions: "18 × 24 in",
            edition: "1/1",
            price: 4500,
            image_url: "https://images.unsplash.com/photo-1465146344425-f00d5f5c8f07",
            description: "Layered washes of green and grey that settle into a quiet woodland.",
            tag_id: "nfc-5e6f7a-art5",
            provenance: vec![provenance("2023-03-08", "Northlight Gallery", "Seattle, WA")],
            created_at: "2023-03-08T08:15:00Z",
            updated_at: "2023-03-08T08:15:00Z",
        },
        Seed {
            id: "artwork-7",
            title: "Sunset Meditation",
            artist_id: "a7",
            artist_name: "Carmen Diaz",
            year: 2024,
            medium: "Oil on Linen",
            dimensions: "20 × 20 in",
            edition: "1/1",
            price: 1950,
            image_url: "https://images.unsplash.com/photo-1509316975850-ff9c5deb0cd9",
            description: "A slow gradient of the last light over the desert.",
            tag_id: "nfc-8b9c0d-art7",
            provenance: vec![provenance("2024-02-01", "Carmen Diaz", "Santa Fe, NM")],
            created_at: "2024-02-01T18:30:00Z",
            updated_at: "2024-02-01T18:30:00Z",
        },
    ]
    .into_iter()
    .map(Seed::into_artwork)
    .collect()
}
