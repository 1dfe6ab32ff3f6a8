use leptos::prelude::*;

/// 持有期间 `loading` 为 true，drop 时复位
pub struct LoadingGuard(RwSignal<bool>);

impl LoadingGuard {
    pub fn start(flag: RwSignal<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        // 所属组件可能已经卸载
        let _ = self.0.try_set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_resets_on_drop() {
        let owner = Owner::new();
        owner.set();
        let flag = RwSignal::new(false);

        {
            let _guard = LoadingGuard::start(flag);
            assert!(flag.get_untracked());
        }
        assert!(!flag.get_untracked());
    }

    #[test]
    fn test_drop_after_dispose_is_silent() {
        let owner = Owner::new();
        owner.set();
        let flag = RwSignal::new(false);
        let guard = LoadingGuard::start(flag);

        flag.dispose();
        drop(guard);
    }
}
