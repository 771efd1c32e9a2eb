//! Seeds the `Places` collection with the Berkeley demo catalog.
//!
//! Usage: `cargo run --bin seed_places [-- --force]`. An already-populated
//! collection is left untouched unless `--force` is given, in which case it
//! is cleared and reseeded. Ids are assigned sequentially from 1 so the
//! catalog order is stable across reseeds.

use chrono::Utc;
use mongodb::bson::doc;
use mongodb::Collection;

use city_companion_api::db::mongo::{create_mongo_client, DB_NAME};
use city_companion_api::models::place::{Coordinates, Place};

#[actix_web::main]
async fn main() {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let force = std::env::args().any(|arg| arg == "--force");

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = create_mongo_client(&mongo_uri).await;
    let places: Collection<Place> = client.database(DB_NAME).collection("Places");

    let existing = match places.count_documents(doc! {}).await {
        Ok(count) => count,
        Err(err) => {
            eprintln!("Failed to count existing places: {}", err);
            std::process::exit(1);
        }
    };

    if existing > 0 {
        if !force {
            println!(
                "Places collection already contains {} documents. Re-run with --force to reseed.",
                existing
            );
            return;
        }
        match places.delete_many(doc! {}).await {
            Ok(result) => println!("Cleared {} existing places", result.deleted_count),
            Err(err) => {
                eprintln!("Failed to clear places: {}", err);
                std::process::exit(1);
            }
        }
    }

    let mut catalog = berkeley_catalog();
    let now = Utc::now();
    for place in &mut catalog {
        place.created_at = Some(now);
    }

    match places.insert_many(&catalog).await {
        Ok(result) => {
            println!(
                "Seeded {} of {} places into {}.Places",
                result.inserted_ids.len(),
                catalog.len(),
                DB_NAME
            );
        }
        Err(err) => {
            eprintln!("Failed to seed places: {}", err);
            std::process::exit(1);
        }
    }
}

fn place(
    id: i32,
    name: &str,
    category: &str,
    description: &str,
    ai_summary: &str,
    rating: f64,
    review_count: i32,
    price_level: i32,
    walking_time: i32,
    driving_time: i32,
    (lat, lng): (f64, f64),
    tags: &[&str],
    vibe: &[&str],
) -> Place {
    Place {
        id,
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        ai_summary: ai_summary.to_string(),
        rating,
        review_count,
        price_level,
        walking_time,
        driving_time,
        coordinates: Coordinates { lat, lng },
        tags: tags.iter().map(|t| t.to_string()).collect(),
        vibe: vibe.iter().map(|v| v.to_string()).collect(),
        image_url: Some("/placeholder.svg".to_string()),
        created_at: None,
    }
}

/// The demo dataset: two dozen Berkeley spots with hand-written summaries.
/// Walking and driving times are minutes from the downtown BART station.
fn berkeley_catalog() -> Vec<Place> {
    vec![
        place(
            1,
            "Vintage Berkeley Post Office",
            "Historic Site",
            "A beautifully preserved 1914 post office building with stunning architecture",
            "Step into a time capsule of early 20th century Berkeley. The ornate details and quiet atmosphere make this a perfect spot for reflection and photography.",
            4.7,
            234,
            0,
            5,
            2,
            (37.8715, -122.2730),
            &["historic", "architecture", "photo-worthy"],
            &["quiet", "vintage", "reflective"],
        ),
        place(
            2,
            "Hidden Gem Coffee Roasters",
            "Café",
            "Artisan coffee shop tucked away in a converted warehouse",
            "This intimate café feels like a secret only locals know. The aroma of freshly roasted beans and the warm lighting create the perfect cozy atmosphere.",
            4.9,
            567,
            2,
            8,
            3,
            (37.8695, -122.2710),
            &["coffee", "cozy", "artisan"],
            &["warm", "intimate", "creative"],
        ),
        place(
            3,
            "Telegraph Avenue Vintage Market",
            "Shopping",
            "Eclectic vintage store with curated finds from the 60s-90s",
            "A treasure trove for vintage enthusiasts. Each item tells a story, and the owner is always ready to share the history behind the pieces.",
            4.6,
            189,
            2,
            12,
            5,
            (37.8685, -122.2590),
            &["vintage", "shopping", "unique"],
            &["nostalgic", "eclectic", "discovery"],
        ),
        place(
            4,
            "Berkeley Rose Garden",
            "Park",
            "Terraced amphitheater garden with over 3,000 rose bushes",
            "A hidden oasis above the city. The terraced design offers stunning views while the fragrant roses create a sensory experience unlike any other.",
            4.8,
            892,
            0,
            25,
            8,
            (37.8795, -122.2650),
            &["nature", "scenic", "peaceful"],
            &["serene", "romantic", "beautiful"],
        ),
        place(
            5,
            "Cheese Board Collective",
            "Restaurant",
            "Worker-owned cooperative serving legendary vegetarian pizza",
            "More than just pizza—it's a Berkeley institution. The daily-changing menu and live music create a vibrant community atmosphere.",
            4.7,
            1234,
            1,
            15,
            6,
            (37.8795, -122.2685),
            &["food", "vegetarian", "local-favorite"],
            &["lively", "community", "delicious"],
        ),
        place(
            6,
            "Moe's Books",
            "Bookstore",
            "Four-story independent bookstore with rare and used books",
            "Get lost in the labyrinth of literary treasures. Each floor reveals new discoveries, and the creaky wooden floors add to the charm.",
            4.8,
            445,
            1,
            10,
            4,
            (37.8680, -122.2595),
            &["books", "culture", "browsing"],
            &["intellectual", "cozy", "timeless"],
        ),
        place(
            7,
            "Berkeley Art Studio",
            "Gallery",
            "Contemporary art space featuring local emerging artists",
            "Raw creativity on display. The rotating exhibitions showcase Berkeley's vibrant art scene and often feature interactive installations.",
            4.5,
            156,
            0,
            18,
            7,
            (37.8705, -122.2720),
            &["art", "culture", "contemporary"],
            &["creative", "inspiring", "modern"],
        ),
        place(
            8,
            "Tilden Park Steam Trains",
            "Attraction",
            "Miniature steam train rides through redwood groves",
            "A whimsical journey through nature. The vintage trains and scenic route make this a delightful escape from the urban environment.",
            4.9,
            678,
            1,
            45,
            15,
            (37.8925, -122.2475),
            &["family", "nature", "unique"],
            &["playful", "nostalgic", "scenic"],
        ),
        place(
            9,
            "Guerrilla Café",
            "Café",
            "Minimalist café known for exceptional espresso and pastries",
            "A coffee purist's dream. The baristas are true craftspeople, and the simple aesthetic lets the quality of the coffee shine through.",
            4.8,
            423,
            2,
            7,
            3,
            (37.8700, -122.2680),
            &["coffee", "minimalist", "quality"],
            &["focused", "modern", "refined"],
        ),
        place(
            10,
            "Indian Rock Park",
            "Park",
            "Natural rock formation with panoramic bay views",
            "Climb to the top for breathtaking 360-degree views. It's a local favorite for sunset watching and a surprisingly peaceful escape.",
            4.7,
            512,
            0,
            30,
            10,
            (37.8890, -122.2710),
            &["nature", "views", "hiking"],
            &["adventurous", "scenic", "peaceful"],
        ),
        place(
            11,
            "Chez Panisse",
            "Restaurant",
            "Legendary farm-to-table restaurant by Alice Waters",
            "The birthplace of California cuisine. Every dish is a celebration of local, seasonal ingredients prepared with reverence and creativity.",
            4.9,
            2341,
            3,
            20,
            8,
            (37.8795, -122.2695),
            &["fine-dining", "farm-to-table", "iconic"],
            &["elegant", "sophisticated", "memorable"],
        ),
        place(
            12,
            "Berkeley Flea Market",
            "Shopping",
            "Weekend market with vintage finds, crafts, and local goods",
            "Every visit is different. From antique furniture to handmade jewelry, you never know what treasures you'll discover among the stalls.",
            4.4,
            287,
            1,
            35,
            12,
            (37.8650, -122.2800),
            &["vintage", "crafts", "local"],
            &["bustling", "eclectic", "treasure-hunt"],
        ),
        place(
            13,
            "Habitot Children's Museum",
            "Attraction",
            "Interactive museum designed for young children",
            "A wonderland for little ones. The hands-on exhibits encourage creativity and learning through play in a safe, engaging environment.",
            4.6,
            534,
            1,
            22,
            9,
            (37.8720, -122.2750),
            &["family", "educational", "interactive"],
            &["playful", "colorful", "energetic"],
        ),
        place(
            14,
            "Elmwood Café",
            "Café",
            "Neighborhood café with outdoor seating and fresh pastries",
            "The heart of the Elmwood district. Perfect for people-watching while enjoying a latte and the best croissants in Berkeley.",
            4.5,
            398,
            2,
            16,
            6,
            (37.8600, -122.2620),
            &["coffee", "pastries", "outdoor-seating"],
            &["relaxed", "neighborhood", "friendly"],
        ),
        place(
            15,
            "Berkeley Marina",
            "Park",
            "Waterfront park with walking trails and bay views",
            "Where the city meets the water. The pier extends into the bay, offering stunning views of San Francisco and the Golden Gate Bridge.",
            4.7,
            1089,
            0,
            50,
            15,
            (37.8650, -122.3150),
            &["waterfront", "views", "walking"],
            &["breezy", "expansive", "refreshing"],
        ),
        place(
            16,
            "Amoeba Music",
            "Shopping",
            "Massive independent music store with vinyl, CDs, and memorabilia",
            "A music lover's paradise. Spend hours browsing through rare vinyl, catching in-store performances, and discovering new artists.",
            4.8,
            876,
            2,
            11,
            4,
            (37.8675, -122.2585),
            &["music", "vinyl", "culture"],
            &["nostalgic", "vibrant", "discovery"],
        ),
        place(
            17,
            "The Foundry",
            "Gallery",
            "Industrial-chic gallery space showcasing digital and mixed media art",
            "Where technology meets artistry. This converted warehouse hosts cutting-edge exhibitions that push the boundaries of contemporary art.",
            4.7,
            203,
            0,
            14,
            5,
            (37.8710, -122.2695),
            &["art", "digital", "contemporary"],
            &["creative", "modern", "innovative"],
        ),
        place(
            18,
            "Makers Workshop",
            "Attraction",
            "Community makerspace with 3D printers, laser cutters, and workshops",
            "Bring your ideas to life. This collaborative space empowers creators with tools and knowledge to build anything they can imagine.",
            4.9,
            312,
            1,
            19,
            7,
            (37.8688, -122.2715),
            &["technology", "workshop", "hands-on"],
            &["creative", "inspiring", "collaborative"],
        ),
        place(
            19,
            "Lightbox Studio",
            "Gallery",
            "Photography gallery featuring emerging and established artists",
            "Every image tells a story. The carefully curated exhibitions showcase powerful visual narratives that challenge and inspire.",
            4.6,
            178,
            0,
            13,
            5,
            (37.8702, -122.2708),
            &["photography", "art", "visual"],
            &["inspiring", "modern", "thought-provoking"],
        ),
        place(
            20,
            "Urban Canvas",
            "Gallery",
            "Street art gallery celebrating graffiti and urban culture",
            "Art without boundaries. This vibrant space brings street art indoors while maintaining its raw, rebellious energy.",
            4.8,
            267,
            0,
            16,
            6,
            (37.8692, -122.2598),
            &["street-art", "urban", "graffiti"],
            &["creative", "bold", "modern"],
        ),
        place(
            21,
            "Nexus Innovation Hub",
            "Café",
            "Tech-forward café with coworking space and startup events",
            "Where ideas meet execution. This sleek space buzzes with entrepreneurial energy and serves excellent coffee to fuel innovation.",
            4.7,
            445,
            2,
            12,
            4,
            (37.8698, -122.2672),
            &["coworking", "tech", "networking"],
            &["modern", "inspiring", "dynamic"],
        ),
        place(
            22,
            "Prism Design Studio",
            "Gallery",
            "Multidisciplinary design studio with rotating installations",
            "Design in all its forms. From furniture to fashion, this studio showcases how thoughtful design shapes our daily lives.",
            4.8,
            189,
            0,
            15,
            6,
            (37.8705, -122.2685),
            &["design", "installation", "multidisciplinary"],
            &["creative", "inspiring", "modern"],
        ),
        place(
            23,
            "The Glass House",
            "Café",
            "Minimalist café with floor-to-ceiling windows and natural light",
            "A sanctuary of light and space. The transparent design creates a seamless connection between inside and outside.",
            4.9,
            521,
            2,
            10,
            4,
            (37.8708, -122.2678),
            &["coffee", "architecture", "minimalist"],
            &["modern", "serene", "inspiring"],
        ),
        place(
            24,
            "Velocity Art Collective",
            "Gallery",
            "Artist-run gallery featuring experimental and avant-garde works",
            "Art that challenges conventions. This collective pushes boundaries and invites viewers to question their perceptions.",
            4.6,
            234,
            0,
            17,
            7,
            (37.8695, -122.2702),
            &["experimental", "avant-garde", "collective"],
            &["creative", "bold", "inspiring"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_sequential() {
        let catalog = berkeley_catalog();
        for (i, place) in catalog.iter().enumerate() {
            assert_eq!(place.id, i as i32 + 1);
        }
    }

    #[test]
    fn test_catalog_entries_are_complete() {
        for place in berkeley_catalog() {
            assert!(!place.name.is_empty());
            assert!(!place.category.is_empty());
            assert!(!place.ai_summary.is_empty());
            assert!((0.0..=5.0).contains(&place.rating));
            assert!((0..=4).contains(&place.price_level));
            assert!(place.walking_time > 0);
            assert!(place.driving_time > 0);
            assert_eq!(place.tags.len(), 3);
            assert_eq!(place.vibe.len(), 3);
            // All demo spots are in Berkeley
            assert!((37.8..38.0).contains(&place.coordinates.lat));
            assert!((-122.4..-122.2).contains(&place.coordinates.lng));
        }
    }
}
