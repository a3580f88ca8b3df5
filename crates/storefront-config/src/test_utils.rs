use std::env;

/// Environment overrides that are undone when the guard drops, so a failing
/// assertion cannot leak variables into the next test.
#[derive(Default)]
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.remember(key);
        env::set_var(key, value);
        self
    }

    pub fn unset(mut self, key: &str) -> Self {
        self.remember(key);
        env::remove_var(key);
        self
    }

    fn remember(&mut self, key: &str) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_string(), env::var(key).ok()));
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            match value {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_scoped_env_restores_on_drop() {
        env::set_var("STOREFRONT_SCOPED_KEEP", "before");
        env::remove_var("STOREFRONT_SCOPED_NEW");

        {
            let _env = ScopedEnv::new()
                .set("STOREFRONT_SCOPED_NEW", "during")
                .unset("STOREFRONT_SCOPED_KEEP")
                .set("STOREFRONT_SCOPED_KEEP", "changed");
            assert_eq!(env::var("STOREFRONT_SCOPED_KEEP").unwrap(), "changed");
            assert_eq!(env::var("STOREFRONT_SCOPED_NEW").unwrap(), "during");
        }

        assert_eq!(env::var("STOREFRONT_SCOPED_KEEP").unwrap(), "before");
        assert!(env::var("STOREFRONT_SCOPED_NEW").is_err());
        env::remove_var("STOREFRONT_SCOPED_KEEP");
    }
}
