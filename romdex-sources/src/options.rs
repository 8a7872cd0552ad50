use romdex_core::RegionTag;

/// Options shared by every adapter in a scrape session.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Region preference order for release dates and region-keyed media.
    pub region_priorities: Vec<RegionTag>,
    /// Preferred language for localized text (descriptions, genre names)
    pub language: String,
    /// Resolve cover-art URLs. When off, the cover step is skipped entirely.
    pub fetch_covers: bool,
    /// Resolve screenshot URLs. When off, the screenshot step is skipped.
    pub fetch_screenshots: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            region_priorities: RegionTag::default_priorities().to_vec(),
            language: "en".to_string(),
            fetch_covers: true,
            fetch_screenshots: true,
        }
    }
}

impl ScrapeOptions {
    /// Replace the region priority order, keeping everything else.
    pub fn with_region_priorities(mut self, priorities: Vec<RegionTag>) -> Self {
        if !priorities.is_empty() {
            self.region_priorities = priorities;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_media_and_language() {
        let options = ScrapeOptions::default();
        assert!(options.fetch_covers);
        assert!(options.fetch_screenshots);
        assert_eq!(options.language, "en");
        assert_eq!(options.region_priorities[0], RegionTag::Europe);
    }

    #[test]
    fn empty_priority_override_keeps_defaults() {
        let options = ScrapeOptions::default().with_region_priorities(Vec::new());
        assert!(!options.region_priorities.is_empty());
        let options =
            ScrapeOptions::default().with_region_priorities(vec![RegionTag::Usa, RegionTag::Japan]);
        assert_eq!(
            options.region_priorities,
            vec![RegionTag::Usa, RegionTag::Japan]
        );
    }
}
