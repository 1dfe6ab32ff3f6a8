//! 亮/暗主题
//!
//! 当前主题、LocalStorage 中的 `theme` 键以及 `<html>` 上的 `dark` class 三者保持一致。

use leptos::prelude::*;
use maestro_shared::{STORAGE_THEME_KEY, Theme};

use crate::web::{KeyValueStore, ThemeTarget};

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: RwSignal<Theme>,
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeContext {
    pub fn new() -> Self {
        Self {
            theme: RwSignal::new(Theme::default()),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.theme.get().is_dark()
    }

    /// 读取保存的主题，没有则跟随系统偏好
    pub fn init<S: KeyValueStore, T: ThemeTarget>(&self, storage: &S, target: &T) {
        let stored = storage.get(STORAGE_THEME_KEY);
        let theme = Theme::resolve(stored.as_deref(), target.prefers_dark());
        self.theme.set(theme);
        target.set_root_class(Theme::DARK_CLASS, theme.is_dark());
    }

    pub fn toggle<S: KeyValueStore, T: ThemeTarget>(&self, storage: &S, target: &T) {
        let theme = self.theme.get_untracked().toggled();
        self.theme.set(theme);
        storage.set(STORAGE_THEME_KEY, theme.as_str());
        target.set_root_class(Theme::DARK_CLASS, theme.is_dark());
    }
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::{MockStorage, MockThemeTarget};

    #[test]
    fn test_init_follows_system_when_unset() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();
        let target = MockThemeTarget::default();
        target.dark_preference.set(true);

        let ctx = ThemeContext::new();
        ctx.init(&storage, &target);
        assert_eq!(ctx.theme.get_untracked(), Theme::Dark);
        assert!(target.has_class("dark"));
        // 仅初始化不写入存储
        assert!(!storage.contains(STORAGE_THEME_KEY));
    }

    #[test]
    fn test_stored_value_wins_over_system() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new().with(STORAGE_THEME_KEY, "light");
        let target = MockThemeTarget::default();
        target.dark_preference.set(true);

        let ctx = ThemeContext::new();
        ctx.init(&storage, &target);
        assert_eq!(ctx.theme.get_untracked(), Theme::Light);
        assert!(!target.has_class("dark"));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new().with(STORAGE_THEME_KEY, "dark");
        let target = MockThemeTarget::default();

        let ctx = ThemeContext::new();
        ctx.init(&storage, &target);

        ctx.toggle(&storage, &target);
        assert_eq!(storage.get(STORAGE_THEME_KEY).as_deref(), Some("light"));
        assert!(!target.has_class("dark"));

        ctx.toggle(&storage, &target);
        assert_eq!(storage.get(STORAGE_THEME_KEY).as_deref(), Some("dark"));
        assert!(target.has_class("dark"));
        assert_eq!(ctx.theme.get_untracked(), Theme::Dark);
    }
}
