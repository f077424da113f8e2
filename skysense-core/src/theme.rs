use crate::model::Theme;

/// Keyword groups checked in order; the first group with a hit wins.
const RULES: &[(&[&str], Theme)] = &[
    (&["sun", "clear"], Theme::Sunny),
    (&["rain", "drizzle"], Theme::Rainy),
    (&["storm", "thunder"], Theme::Stormy),
    (&["snow"], Theme::Snowy),
    (&["cloud"], Theme::Cloudy),
];

/// Map a free-text condition label to a theme.
///
/// Matching is a case-insensitive substring test. `Theme::Night` is never
/// produced here.
pub fn classify(condition: &str) -> Theme {
    let condition = condition.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| condition.contains(k)))
        .map(|(_, theme)| *theme)
        .unwrap_or(Theme::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_group() {
        let cases = [
            ("Sunny", Theme::Sunny),
            ("Clear sky", Theme::Sunny),
            ("Light Rain", Theme::Rainy),
            ("drizzle", Theme::Rainy),
            ("Thunderstorms expected", Theme::Stormy),
            ("Heavy SNOW", Theme::Snowy),
            ("Overcast clouds", Theme::Cloudy),
            ("Fog", Theme::Default),
            ("", Theme::Default),
        ];

        for (condition, expected) in cases {
            assert_eq!(classify(condition), expected, "condition: {condition:?}");
        }
    }

    #[test]
    fn earlier_group_wins() {
        assert_eq!(classify("cloudy with thunderstorms"), Theme::Stormy);
        assert_eq!(classify("Sun and rain showers"), Theme::Sunny);
        assert_eq!(classify("Rain turning to snow"), Theme::Rainy);
    }

    #[test]
    fn never_yields_night() {
        for condition in ["Clear night", "night", "Moonlit", "Partly cloudy night"] {
            assert_ne!(classify(condition), Theme::Night);
        }
    }
}
