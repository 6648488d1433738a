use crate::models::Track;

pub const DEFAULT_INTRO: &str = "Kamusta mga ka-tropa!";
pub const DEFAULT_MOOD: &str = "happy upbeat song";
pub const DEFAULT_HYPE: &str = "Pakinggan natin ang magandang kantang ito!";

/// Script used when the chat completion call fails
pub const FALLBACK_SCRIPT: &str = "INTRO: Kamusta mga ka-tropa! Narito si DJ AI para sa inyong paboritong kanta!
MOOD: masayang pop song
HYPE: Pakinggan natin ang bagong hit na siguradong magpapasaya sa inyong araw!";

/// Prompt asking for a labeled Tagalog DJ script
pub const DJ_SCRIPT_PROMPT: &str = "Ikaw ay isang radio DJ na masigla sa isang Tagalog radio station.

Gumawa ng:
1. Magandang DJ intro/patter sa Tagalog (2-3 sentences)
2. Describe kung anong mood/genre ng kanta na gusto mo i-play (e.g., \"masayang pop song\", \"romantic ballad\", \"energetic dance track\")
3. Include marketing hype about the upcoming song

Format your response as:
INTRO: [your tagalog DJ intro]
MOOD: [mood/genre you want to play]
HYPE: [marketing line about the song]

Be engaging, fun, and authentically Filipino!";

/// A DJ script split into its labeled parts
#[derive(Debug, Clone, PartialEq)]
pub struct DjScript {
    pub raw: String,
    pub intro: String,
    pub mood: String,
    pub hype: String,
}

impl DjScript {
    /// Parse `INTRO:`, `MOOD:` and `HYPE:` lines; missing or blank parts get defaults
    pub fn parse(text: &str) -> DjScript {
        DjScript {
            raw: text.trim().to_string(),
            intro: labeled_line(text, "INTRO:").unwrap_or_else(|| DEFAULT_INTRO.to_string()),
            mood: labeled_line(text, "MOOD:").unwrap_or_else(|| DEFAULT_MOOD.to_string()),
            hype: labeled_line(text, "HYPE:").unwrap_or_else(|| DEFAULT_HYPE.to_string()),
        }
    }

    pub fn fallback() -> DjScript {
        DjScript::parse(FALLBACK_SCRIPT)
    }

    /// Spoken narration introducing the selected track
    pub fn narration(&self, track: &Track) -> String {
        format!(
            "{} {} Narito ang {} ni {}!",
            self.intro,
            self.hype,
            track.name,
            track.primary_artist()
        )
    }
}

/// Short spoken link between tracks in continuous play
pub fn transition_line(track: &Track, artist_note: &str) -> String {
    format!(
        "Susunod, {} ni {}. {}",
        track.name,
        track.primary_artist(),
        artist_note
    )
}

pub fn album_art_prompt(mood: &str, track_name: &str) -> String {
    format!(
        "{mood} abstract album art for {track_name}, vibrant Filipino-inspired colors, modern design"
    )
}

pub fn playlist_cover_prompt(mood: &str) -> String {
    format!("{mood} OPM radio playlist cover, bold typography-free collage, Filipino-inspired colors")
}

fn labeled_line(text: &str, label: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| line.starts_with(label))
        .map(|line| line[label.len()..].trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Artist;

    #[test]
    fn test_parses_labeled_lines() {
        let script = DjScript::parse(
            "INTRO: Magandang gabi, Maynila!\nMOOD: romantic ballad\nHYPE: Siguradong kikiligin kayo!",
        );

        assert_eq!(script.intro, "Magandang gabi, Maynila!");
        assert_eq!(script.mood, "romantic ballad");
        assert_eq!(script.hype, "Siguradong kikiligin kayo!");
    }

    #[test]
    fn test_missing_lines_use_defaults() {
        let script = DjScript::parse("Walang format ang sagot na ito.");

        assert_eq!(script.intro, DEFAULT_INTRO);
        assert_eq!(script.mood, DEFAULT_MOOD);
        assert_eq!(script.hype, DEFAULT_HYPE);
    }

    #[test]
    fn test_blank_label_uses_default() {
        let script = DjScript::parse("  INTRO: Hello!\nMOOD:   \n");
        assert_eq!(script.intro, "Hello!");
        assert_eq!(script.mood, DEFAULT_MOOD);
    }

    #[test]
    fn test_fallback_script_is_happy() {
        let script = DjScript::fallback();
        assert_eq!(script.mood, "masayang pop song");
        assert!(script.intro.starts_with("Kamusta"));
    }

    #[test]
    fn test_narration_names_track_and_artist() {
        let script = DjScript::parse("INTRO: Hi!\nHYPE: Sakto!");
        let track = Track {
            id: "x".to_string(),
            name: "Kathang Isip".to_string(),
            artists: vec![Artist {
                id: None,
                name: "Ben&Ben".to_string(),
            }],
            ..Track::default()
        };

        assert_eq!(script.narration(&track), "Hi! Sakto! Narito ang Kathang Isip ni Ben&Ben!");
        assert!(
            album_art_prompt("chill", "Kathang Isip")
                .starts_with("chill abstract album art for Kathang Isip")
        );
    }
}
