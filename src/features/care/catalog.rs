//! Catalog of care metrics the bot knows about
//!
//! Each metric has a default interval, a reminder text and the wording used
//! in command replies. Adding a metric means adding a definition here.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Water and fertilizer definitions

use crate::core::Config;

pub const WATER: &str = "water";
pub const FERTILIZER: &str = "fertilizer";

/// Used for metrics that are not in the catalog
pub const FALLBACK_INTERVAL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub name: String,
    pub default_interval_days: i64,
    /// Message posted to the thread when the metric becomes due
    pub reminder_text: String,
    /// Reply after the action is logged
    pub action_reply: String,
    /// Past tense used in the status view ("watered")
    pub past_tense: String,
    /// Noun used when the interval changes ("Watering")
    pub interval_label: String,
}

#[derive(Debug, Clone)]
pub struct MetricCatalog {
    definitions: Vec<MetricDefinition>,
    day_seconds: i64,
}

impl MetricCatalog {
    pub fn new(definitions: Vec<MetricDefinition>, day_seconds: i64) -> Self {
        MetricCatalog {
            definitions,
            day_seconds,
        }
    }

    /// Water and fertilizer with the given defaults
    pub fn standard(water_days: i64, fertilizer_days: i64, day_seconds: i64) -> Self {
        Self::new(
            vec![
                MetricDefinition {
                    name: WATER.to_string(),
                    default_interval_days: water_days,
                    reminder_text: "💧 **Water reminder!** Time to check soil moisture 🌱"
                        .to_string(),
                    action_reply: "💧 Watered! Timer reset.".to_string(),
                    past_tense: "watered".to_string(),
                    interval_label: "Watering".to_string(),
                },
                MetricDefinition {
                    name: FERTILIZER.to_string(),
                    default_interval_days: fertilizer_days,
                    reminder_text: "🌿 **Fertilizer reminder!** Time to fertilize your plant 💚"
                        .to_string(),
                    action_reply: "🌿 Fertilized! Timer reset.".to_string(),
                    past_tense: "fertilized".to_string(),
                    interval_label: "Fertilizer".to_string(),
                },
            ],
            day_seconds,
        )
    }

    pub fn from_config(config: &Config) -> Self {
        Self::standard(
            config.water_interval_days,
            config.fertilizer_interval_days,
            config.day_seconds,
        )
    }

    pub fn day_seconds(&self) -> i64 {
        self.day_seconds
    }

    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.definitions.iter()
    }

    pub fn default_interval_seconds(&self, name: &str) -> i64 {
        let days = self
            .get(name)
            .map(|def| def.default_interval_days)
            .unwrap_or(FALLBACK_INTERVAL_DAYS);
        days.saturating_mul(self.day_seconds).max(1)
    }

    pub fn reminder_text(&self, name: &str) -> String {
        match self.get(name) {
            Some(def) => def.reminder_text.clone(),
            None => format!("⏰ **{name} reminder!** Time to look after your plant 🌱"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_defaults() {
        let catalog = MetricCatalog::standard(7, 30, 86_400);
        assert_eq!(catalog.default_interval_seconds(WATER), 7 * 86_400);
        assert_eq!(catalog.default_interval_seconds(FERTILIZER), 30 * 86_400);
        assert_eq!(catalog.iter().count(), 2);
    }

    #[test]
    fn test_accelerated_day_length() {
        let catalog = MetricCatalog::standard(7, 30, 60);
        assert_eq!(catalog.default_interval_seconds(WATER), 420);
        assert_eq!(catalog.day_seconds(), 60);
    }

    #[test]
    fn test_unknown_metric_fallbacks() {
        let catalog = MetricCatalog::standard(7, 30, 10);
        assert_eq!(catalog.default_interval_seconds("mist"), 70);
        assert!(catalog.reminder_text("mist").contains("mist reminder"));
        assert!(catalog.get("mist").is_none());
    }

    #[test]
    fn test_reminder_texts_differ_per_metric() {
        let catalog = MetricCatalog::standard(7, 30, 86_400);
        assert!(catalog.reminder_text(WATER).contains("Water reminder"));
        assert!(catalog.reminder_text(FERTILIZER).contains("Fertilizer reminder"));
    }
}
