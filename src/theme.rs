//! Static report styling, resolved once from configuration.

use once_cell::sync::OnceCell;

use crate::config::ThemeConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub brand: String,
    pub report_title: String,
    pub primary_color: String,
    pub accent_color: String,
    pub rows_per_page: usize,
    /// Column widths of the workforce table: id, name, role, assigned,
    /// completed, rate.
    pub worker_columns: [usize; 6],
    /// Column widths of the tasks table: id, title, status, priority, date,
    /// workers.
    pub task_columns: [usize; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from(&ThemeConfig::default())
    }
}

impl From<&ThemeConfig> for Theme {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            brand: config.brand.clone(),
            report_title: config.report_title.clone(),
            primary_color: config.primary_color.clone(),
            accent_color: config.accent_color.clone(),
            rows_per_page: config.rows_per_page,
            worker_columns: [10, 22, 16, 9, 10, 6],
            task_columns: [10, 26, 12, 9, 11, 20],
        }
    }
}

static THEME: OnceCell<Theme> = OnceCell::new();

/// Installs the theme. Only the first call has an effect; returns whether
/// this call installed it.
pub fn install(theme: Theme) -> bool {
    THEME.set(theme).is_ok()
}

/// The installed theme, or the built-in default when none was installed.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_reads_config_values() {
        let config = ThemeConfig {
            brand: "Palm Grove".into(),
            rows_per_page: 40,
            ..ThemeConfig::default()
        };
        let theme = Theme::from(&config);
        assert_eq!(theme.brand, "Palm Grove");
        assert_eq!(theme.rows_per_page, 40);
        assert_eq!(theme.report_title, "Labor Management Report");
    }

    #[test]
    fn current_is_stable() {
        let first = current() as *const Theme;
        assert!(!install(Theme::default()));
        assert_eq!(first, current() as *const Theme);
    }
}
