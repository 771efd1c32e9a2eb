use crate::models::place::Place;

/// Builds the journey narrative shown on a saved route, stitched from the
/// member places' summaries in visiting order.
pub fn generate_route_narrative(places: &[Place]) -> String {
    if places.is_empty() {
        return "Your journey awaits!".to_string();
    }

    if places.len() == 1 {
        let place = &places[0];
        return format!(
            "Visit {}, where {}.",
            place.name,
            summary_or(place, "adventure awaits")
        );
    }

    let mut parts: Vec<String> = Vec::new();

    let first = &places[0];
    parts.push(format!(
        "Begin your journey at {}, where {}.",
        first.name,
        summary_or(first, "your adventure starts")
    ));

    if places.len() > 2 {
        for place in &places[1..places.len() - 1] {
            let summary = shorten(summary_or(place, "new experiences await"));
            parts.push(format!(
                "From there, let the path guide you to {}, {}.",
                place.name, summary
            ));
        }
    }

    let last = &places[places.len() - 1];
    let last_summary = shorten(summary_or(last, "your journey concludes"));
    parts.push(format!(
        "Finally, complete your adventure at {}, {}.",
        last.name, last_summary
    ));

    parts.join(" ")
}

fn summary_or<'a>(place: &'a Place, fallback: &'a str) -> &'a str {
    if place.ai_summary.is_empty() {
        fallback
    } else {
        &place.ai_summary
    }
}

/// Summaries longer than 100 characters get cut to 97 plus an ellipsis.
/// Counted in characters, so multi-byte text never splits mid-codepoint.
fn shorten(summary: &str) -> String {
    if summary.chars().count() > 100 {
        let mut cut: String = summary.chars().take(97).collect();
        cut.push_str("...");
        cut
    } else {
        summary.to_string()
    }
}
