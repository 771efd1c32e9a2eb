use crate::models::place::Place;

pub const MAX_RECOMMENDATIONS: usize = 6;

/// Related vibe words accepted as a soft match for each mood.
pub fn mood_synonyms(mood: &str) -> &'static [&'static str] {
    match mood {
        "relaxed" => &["peaceful", "serene", "calm", "quiet", "tranquil", "cozy"],
        "adventurous" => &["exciting", "bold", "daring", "playful", "energetic"],
        "curious" => &["discovery", "exploring", "intellectual", "thought-provoking"],
        "energetic" => &["lively", "vibrant", "dynamic", "bustling", "playful"],
        "creative" => &["inspiring", "artistic", "innovative", "modern"],
        "romantic" => &["intimate", "elegant", "beautiful", "warm"],
        "social" => &["community", "friendly", "lively", "bustling"],
        "peaceful" => &["serene", "quiet", "calm", "tranquil", "relaxed"],
        "inspired" => &["inspiring", "creative", "thought-provoking", "modern"],
        "nostalgic" => &["vintage", "timeless", "reflective", "classic"],
        _ => &[],
    }
}

/// Scores one place against the requested mood and interests.
///
/// - mood found verbatim in the place's vibes: +2, otherwise +1 per vibe
///   that is a synonym of the mood
/// - +1 per interest present in the tags, +1 per interest contained in the
///   category name
/// - rating >= 4.8: +2, rating >= 4.5: +1
pub fn score_place(place: &Place, mood: &str, interests: &[String]) -> i32 {
    let mut score = 0;

    let mood = mood.to_lowercase();
    if !mood.is_empty() {
        let vibes: Vec<String> = place.vibe.iter().map(|v| v.to_lowercase()).collect();
        if vibes.iter().any(|v| *v == mood) {
            score += 2; // Exact match
        } else {
            let synonyms = mood_synonyms(&mood);
            for vibe in &vibes {
                if synonyms.contains(&vibe.as_str()) {
                    score += 1;
                }
            }
        }
    }

    if !interests.is_empty() {
        let tags: Vec<String> = place.tags.iter().map(|t| t.to_lowercase()).collect();
        let category = place.category.to_lowercase();

        for interest in interests {
            let interest = interest.to_lowercase();
            if tags.iter().any(|t| *t == interest) {
                score += 1;
            }
            if category.contains(&interest) {
                score += 1;
            }
        }
    }

    if place.rating >= 4.8 {
        score += 2;
    } else if place.rating >= 4.5 {
        score += 1;
    }

    score
}

/// Ranks candidate places and keeps the best six. The sort is stable, so
/// places with equal scores keep their catalog order.
pub fn top_recommendations(mut places: Vec<Place>, mood: &str, interests: &[String]) -> Vec<Place> {
    let mut scored: Vec<(i32, Place)> = places
        .drain(..)
        .map(|place| (score_place(&place, mood, interests), place))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(MAX_RECOMMENDATIONS);
    scored.into_iter().map(|(_, place)| place).collect()
}
