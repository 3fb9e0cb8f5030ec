use std::collections::HashSet;
use std::sync::Arc;

/// Diagnostic categories enabled for `info!` conversion traces, parsed from a
/// comma separated list such as `upcast,downcast`. `all` or `*` enables
/// everything.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    categories: Arc<HashSet<String>>,
}

impl Diagnostics {
    pub fn parse(raw: &str) -> Self {
        let categories = raw
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>();
        Self {
            categories: Arc::new(categories),
        }
    }

    pub fn from_setting(setting: Option<&str>) -> Self {
        setting.map(Self::parse).unwrap_or_default()
    }

    pub fn enabled(&self, category: &str) -> bool {
        self.categories.contains("all")
            || self.categories.contains("*")
            || self.categories.contains(&category.to_ascii_lowercase())
    }
}
