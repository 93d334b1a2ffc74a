pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod redis;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;
pub use redis::RedisTest;

pub mod prelude {
    pub use crate::{
        constant::{TEST_SYSTEM_ID, TEST_USER_AGENT},
        fixtures::killmail::factory,
        TestBuilder, TestContext, TestError,
    };
}
