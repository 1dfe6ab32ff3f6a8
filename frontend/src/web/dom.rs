//! 文档根节点与系统偏好

/// 主题作用的目标：`<html>` 的 class 与系统配色偏好
pub trait ThemeTarget {
    fn set_root_class(&self, class: &str, enabled: bool);
    fn prefers_dark(&self) -> bool;
}

/// 浏览器中的 `document.documentElement`
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRoot;

impl ThemeTarget for DocumentRoot {
    fn set_root_class(&self, class: &str, enabled: bool) {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        if let Err(e) = root.class_list().toggle_with_force(class, enabled) {
            log::warn!("[Theme] Failed to toggle root class '{}': {:?}", class, e);
        }
    }

    fn prefers_dark(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .is_some_and(|mql| mql.matches())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeSet;

    #[derive(Default)]
    pub struct MockThemeTarget {
        pub classes: RefCell<BTreeSet<String>>,
        pub dark_preference: Cell<bool>,
    }

    impl MockThemeTarget {
        pub fn has_class(&self, class: &str) -> bool {
            self.classes.borrow().contains(class)
        }
    }

    impl ThemeTarget for MockThemeTarget {
        fn set_root_class(&self, class: &str, enabled: bool) {
            let mut classes = self.classes.borrow_mut();
            if enabled {
                classes.insert(class.to_string());
            } else {
                classes.remove(class);
            }
        }

        fn prefers_dark(&self) -> bool {
            self.dark_preference.get()
        }
    }
}
