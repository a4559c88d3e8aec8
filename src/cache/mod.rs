//! 对象缓存
//!
//! 缓存后端以插件形式注册，启动时按 `cache.type` 选择。
//! 目前只用于缓存已认证用户，键为 `user:{id}`。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::models::users::entities::User;

pub use object_cache::register_builtin_plugins;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法确定键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

impl dyn ObjectCache {
    pub async fn get_user(&self, user_id: i64) -> CacheResult<User> {
        match self.get_raw(&user_cache_key(user_id)).await {
            CacheResult::Found(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => CacheResult::Found(user),
                Err(e) => {
                    tracing::warn!("缓存中的用户数据无法解析: user_id={}, {}", user_id, e);
                    CacheResult::NotFound
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    pub async fn insert_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                self.insert_raw(
                    user_cache_key(user.id),
                    raw,
                    AppConfig::get().cache.default_ttl,
                )
                .await
            }
            Err(e) => tracing::warn!("用户序列化失败，跳过缓存: user_id={}, {}", user.id, e),
        }
    }

    pub async fn evict_user(&self, user_id: i64) {
        self.remove(&user_cache_key(user_id)).await;
    }
}

/// 声明缓存插件，生成 `register_plugin()`
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        pub fn register_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
