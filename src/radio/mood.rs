use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete mood bucket derived from free-text DJ output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory {
    Happy,
    Romantic,
    Dance,
    Sad,
    Rock,
    Neutral,
}

/// Target audio features passed to the recommendation endpoint
/// Valence, energy and danceability are in [0, 1]; loudness is in dB
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetFeatures {
    pub valence: Option<f32>,
    pub energy: Option<f32>,
    pub danceability: Option<f32>,
    pub loudness: Option<f32>,
}

/// Result of classifying a mood description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodProfile {
    pub category: MoodCategory,
    pub features: TargetFeatures,
}

/// Keyword sets in match priority order; the sets overlap, so order decides ties
const KEYWORD_PRIORITY: [(MoodCategory, &[&str]); 5] = [
    (MoodCategory::Happy, &["masaya", "happy", "energetic"]),
    (MoodCategory::Romantic, &["romantic", "love", "ballad", "hugot"]),
    (MoodCategory::Dance, &["dance", "sayaw", "party", "disco"]),
    (MoodCategory::Sad, &["sad", "malungkot", "emo"]),
    (MoodCategory::Rock, &["rock", "metal", "alternative"]),
];

/// Map a free-text mood phrase to a category and its feature vector
pub fn classify(mood_text: &str) -> MoodProfile {
    let lowered = mood_text.to_lowercase();
    let category = KEYWORD_PRIORITY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|word| lowered.contains(*word)))
        .map(|(category, _)| *category)
        .unwrap_or(MoodCategory::Neutral);

    MoodProfile::from(category)
}

impl From<MoodCategory> for MoodProfile {
    fn from(category: MoodCategory) -> Self {
        MoodProfile {
            category,
            features: category.target_features(),
        }
    }
}

impl MoodCategory {
    #[cfg(test)]
    pub const ALL: [MoodCategory; 6] = [
        MoodCategory::Happy,
        MoodCategory::Romantic,
        MoodCategory::Dance,
        MoodCategory::Sad,
        MoodCategory::Rock,
        MoodCategory::Neutral,
    ];

    /// Ordered keyword queries for full-text search
    pub fn queries(self) -> &'static [&'static str] {
        match self {
            MoodCategory::Happy => &["OPM happy", "Filipino pop upbeat", "Pinoy rock energetic"],
            MoodCategory::Romantic => &[
                "OPM love songs",
                "Filipino ballad",
                "Pinoy romantic",
                "hugot songs",
            ],
            MoodCategory::Dance => &["OPM dance", "Filipino party songs", "Pinoy disco"],
            MoodCategory::Sad => &["OPM sad", "Filipino emotional", "Pinoy emo"],
            MoodCategory::Rock => &[
                "OPM rock",
                "Filipino rock",
                "Pinoy alternative",
                "Pinoy metal",
            ],
            MoodCategory::Neutral => &["OPM hits", "Filipino pop", "Pinoy classics"],
        }
    }

    pub fn target_features(self) -> TargetFeatures {
        let (valence, energy, danceability, loudness) = match self {
            MoodCategory::Happy => (Some(0.8), Some(0.7), None, None),
            MoodCategory::Romantic => (Some(0.6), Some(0.4), None, None),
            MoodCategory::Dance => (None, Some(0.8), Some(0.8), None),
            MoodCategory::Sad => (Some(0.3), Some(0.4), None, None),
            MoodCategory::Rock => (None, Some(0.8), None, Some(-5.0)),
            MoodCategory::Neutral => (Some(0.6), Some(0.6), None, None),
        };
        TargetFeatures {
            valence,
            energy,
            danceability,
            loudness,
        }
    }

    /// Neighbouring moods the aggregator mixes in for variety
    pub fn alternates(self) -> &'static [MoodCategory] {
        match self {
            MoodCategory::Happy => &[MoodCategory::Dance, MoodCategory::Rock],
            MoodCategory::Romantic => &[MoodCategory::Sad, MoodCategory::Happy],
            MoodCategory::Dance => &[MoodCategory::Happy, MoodCategory::Rock],
            MoodCategory::Sad => &[MoodCategory::Romantic, MoodCategory::Neutral],
            MoodCategory::Rock => &[MoodCategory::Happy, MoodCategory::Sad],
            MoodCategory::Neutral => &[MoodCategory::Happy, MoodCategory::Romantic],
        }
    }
}

impl fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MoodCategory::Happy => "happy",
            MoodCategory::Romantic => "romantic",
            MoodCategory::Dance => "dance",
            MoodCategory::Sad => "sad",
            MoodCategory::Rock => "rock",
            MoodCategory::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

impl TargetFeatures {
    /// Recommendation query parameters, e.g. `("target_valence", "0.8")`
    pub fn query_params(&self) -> Vec<(String, String)> {
        [
            ("valence", self.valence),
            ("energy", self.energy),
            ("danceability", self.danceability),
            ("loudness", self.loudness),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (format!("target_{name}"), v.to_string())))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_beach_party_is_happy() {
        let profile = classify("masayang energetic beach party");

        assert_eq!(profile.category, MoodCategory::Happy);
        assert_relative_eq!(profile.features.valence.unwrap(), 0.8);
        assert_relative_eq!(profile.features.energy.unwrap(), 0.7);
        assert!(profile.features.danceability.is_none());
    }

    #[test]
    fn test_priority_order_breaks_ties() {
        // "party" is a dance keyword, "love" a romantic one: romantic comes first
        assert_eq!(classify("love party").category, MoodCategory::Romantic);
        assert_eq!(classify("sad rock ballad").category, MoodCategory::Romantic);
        assert_eq!(classify("emo metal").category, MoodCategory::Sad);
        assert_eq!(classify("happy hugot").category, MoodCategory::Happy);
    }

    #[test]
    fn test_each_category_reachable() {
        assert_eq!(classify("Romantic Ballad").category, MoodCategory::Romantic);
        assert_eq!(classify("energetic dance track").category, MoodCategory::Happy);
        assert_eq!(classify("sayaw tayo").category, MoodCategory::Dance);
        assert_eq!(classify("malungkot na kanta").category, MoodCategory::Sad);
        assert_eq!(classify("alternative").category, MoodCategory::Rock);
    }

    #[test]
    fn test_unrecognized_and_empty_fall_back_to_neutral() {
        for text in ["", "   ", "jazz fusion", "kundiman"] {
            let profile = classify(text);
            assert_eq!(profile.category, MoodCategory::Neutral);
            assert_relative_eq!(profile.features.valence.unwrap(), 0.6);
            assert_relative_eq!(profile.features.energy.unwrap(), 0.6);
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let text = "chill hugot acoustic";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_rock_features_include_loudness() {
        let params = MoodCategory::Rock.target_features().query_params();
        assert_eq!(
            params,
            vec![
                ("target_energy".to_string(), "0.8".to_string()),
                ("target_loudness".to_string(), "-5".to_string()),
            ]
        );
    }

    #[test]
    fn test_alternates_never_include_self() {
        for category in MoodCategory::ALL {
            assert!(!category.alternates().contains(&category));
            assert!(!category.queries().is_empty());
        }
    }
}
