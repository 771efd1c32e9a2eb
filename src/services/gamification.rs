use serde::{Deserialize, Serialize};

/// Calculate total Street Cred from exploration activity.
///
/// Each visited place is worth 10 points, each created route 25.
pub fn calculate_street_cred(visited_places: usize, routes_created: u64) -> i32 {
    (visited_places as i32) * 10 + (routes_created as i32) * 25
}

/// Level grows every 100 points: floor(cred / 100) + 1.
pub fn calculate_level(street_cred: i32) -> i32 {
    street_cred.max(0) / 100 + 1
}

pub fn level_title(level: i32) -> &'static str {
    match level {
        1 => "Novice Explorer",
        2..=3 => "Local Wanderer",
        4..=6 => "City Connoisseur",
        7..=10 => "Urban Legend",
        11..=15 => "Master Navigator",
        16..=20 => "City Sage",
        _ => "Legendary Explorer",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelProgress {
    pub level: i32,
    pub title: String,
    pub current_points: i32,
    pub points_to_next_level: i32,
    pub progress_percentage: f64,
}

/// Position within the current level, for the frontend's progress bar.
pub fn level_progress(street_cred: i32) -> LevelProgress {
    let level = calculate_level(street_cred);
    let current_threshold = (level - 1) * 100;
    let next_threshold = level * 100;
    let points_in_level = street_cred - current_threshold;

    let progress = (points_in_level as f64 / 100.0) * 100.0;

    LevelProgress {
        level,
        title: level_title(level).to_string(),
        current_points: street_cred,
        points_to_next_level: next_threshold - street_cred,
        progress_percentage: (progress * 10.0).round() / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_cred_formula() {
        assert_eq!(calculate_street_cred(0, 0), 0);
        assert_eq!(calculate_street_cred(3, 0), 30);
        assert_eq!(calculate_street_cred(0, 2), 50);
        assert_eq!(calculate_street_cred(5, 4), 150);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(99), 1);
        assert_eq!(calculate_level(100), 2);
        assert_eq!(calculate_level(250), 3);
        assert_eq!(calculate_level(2100), 22);
    }

    #[test]
    fn test_level_titles() {
        assert_eq!(level_title(1), "Novice Explorer");
        assert_eq!(level_title(2), "Local Wanderer");
        assert_eq!(level_title(3), "Local Wanderer");
        assert_eq!(level_title(4), "City Connoisseur");
        assert_eq!(level_title(6), "City Connoisseur");
        assert_eq!(level_title(7), "Urban Legend");
        assert_eq!(level_title(10), "Urban Legend");
        assert_eq!(level_title(11), "Master Navigator");
        assert_eq!(level_title(16), "City Sage");
        assert_eq!(level_title(21), "Legendary Explorer");
        assert_eq!(level_title(40), "Legendary Explorer");
    }

    #[test]
    fn test_level_progress_midway() {
        let progress = level_progress(145);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.title, "Local Wanderer");
        assert_eq!(progress.current_points, 145);
        assert_eq!(progress.points_to_next_level, 55);
        assert_eq!(progress.progress_percentage, 45.0);
    }

    #[test]
    fn test_level_progress_fresh_user() {
        let progress = level_progress(0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.points_to_next_level, 100);
        assert_eq!(progress.progress_percentage, 0.0);
    }
}
