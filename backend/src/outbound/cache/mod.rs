//! Redis cache adapter for the availability count.

mod redis_availability_cache;

pub use redis_availability_cache::RedisAvailabilityCache;
