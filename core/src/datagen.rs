//! Unique names, filler text and random picks for test fixtures.

use chrono::Local;
use rand::Rng;

use crate::config::{validate_date_time_format, Config, ConfigError};

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

#[derive(Debug, Clone)]
pub struct TestDataGenerator {
    date_time_format: String,
}

impl TestDataGenerator {
    pub fn new(date_time_format: &str) -> Result<Self, ConfigError> {
        validate_date_time_format(date_time_format)?;
        Ok(Self {
            date_time_format: date_time_format.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Self {
        // Config has already validated the pattern.
        Self {
            date_time_format: config.date_time_format().to_string(),
        }
    }

    /// Local time rendered with the configured strftime pattern.
    pub fn timestamp(&self) -> String {
        Local::now().format(&self.date_time_format).to_string()
    }

    /// `prefix` followed by the current timestamp.
    pub fn generate_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.timestamp())
    }

    /// One paragraph of lorem ipsum, between two and four sentences.
    pub fn card_description(&self) -> String {
        let mut rng = rand::rng();
        let sentences = rng.random_range(2..=4);
        (0..sentences)
            .map(|_| {
                let words = rng.random_range(4..=10);
                let mut sentence = (0..words)
                    .map(|_| LOREM[rng.random_range(0..LOREM.len())])
                    .collect::<Vec<_>>()
                    .join(" ");
                if let Some(first) = sentence.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                sentence.push('.');
                sentence
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Uniform integer in `[min, max]`. Reversed bounds are swapped.
    pub fn random_int(&self, min: i32, max: i32) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        rand::rng().random_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_starts_with_prefix_and_ends_with_timestamp() {
        let generator = TestDataGenerator::new("%Y").unwrap();
        let name = generator.generate_name("Test Board-");
        let year = Local::now().format("%Y").to_string();
        assert!(name.starts_with("Test Board-"));
        // Tolerate a year rollover between the two clock reads.
        assert_eq!(name.len(), "Test Board-".len() + year.len());
    }

    #[test]
    fn rejects_broken_pattern() {
        assert!(matches!(
            TestDataGenerator::new("%Y%"),
            Err(ConfigError::InvalidDateTimeFormat(_))
        ));
        // Parses as a specifier, but chrono can only use it when parsing.
        assert!(matches!(
            TestDataGenerator::new("%#z"),
            Err(ConfigError::InvalidDateTimeFormat(_))
        ));
    }

    #[test]
    fn random_int_stays_within_inclusive_bounds() {
        let generator = TestDataGenerator::new("%S").unwrap();
        let mut seen = [false; 3];
        for _ in 0..500 {
            let n = generator.random_int(0, 2);
            assert!((0..=2).contains(&n));
            seen[n as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
        assert_eq!(generator.random_int(7, 7), 7);
        assert!((1..=5).contains(&generator.random_int(5, 1)));
    }

    #[test]
    fn description_is_capitalized_sentences() {
        let generator = TestDataGenerator::new("%S").unwrap();
        let text = generator.card_description();
        assert!(text.ends_with('.'));
        assert!(text.chars().next().unwrap().is_ascii_uppercase());
        let sentences = text.matches('.').count();
        assert!((2..=4).contains(&sentences));
    }
}
