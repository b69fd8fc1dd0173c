//! 版本与运行时元信息
//!
//! 设计原则：
//! - **Crate Version** → Cargo.toml（唯一权威源）
//! - **Runtime Metadata** → 本模块

/// crate semver，来自 Cargo.toml
///
/// 禁止手写版本号，必须用 `env!("CARGO_PKG_VERSION")` 与 Cargo.toml 保持同步。
pub const HELPER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// git commit（由 vergen 在 build.rs 中生成）
pub const GIT_SHA: &str = env!("VERGEN_GIT_SHA");

/// build time（由 vergen 在 build.rs 中生成）
pub const BUILD_TIME: &str = env!("VERGEN_BUILD_TIMESTAMP");
