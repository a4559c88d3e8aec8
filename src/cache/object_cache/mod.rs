pub mod moka;
pub mod redis;

use std::sync::Once;

static REGISTER: Once = Once::new();

/// 注册内置缓存后端（可重复调用）
pub fn register_builtin_plugins() {
    REGISTER.call_once(|| {
        moka::register_plugin();
        redis::register_plugin();
        tracing::debug!(
            "Registered cache backends: {:?}",
            crate::cache::register::registered_object_cache_plugins()
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::register::{build_object_cache, registered_object_cache_plugins};

    #[test]
    fn test_builtin_backends_registered() {
        register_builtin_plugins();
        register_builtin_plugins();
        let names = registered_object_cache_plugins();
        assert!(names.contains(&"moka".to_string()));
        assert!(names.contains(&"redis".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_backend_is_an_error() {
        register_builtin_plugins();
        let err = build_object_cache("memcached").await.err().unwrap();
        assert!(err.to_string().contains("memcached"));
    }
}
