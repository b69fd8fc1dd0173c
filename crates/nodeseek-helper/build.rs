//! 编译期生成 GIT_SHA、BUILD_TIMESTAMP 等元信息（供 version.rs 使用）
//! 源码不在 git 仓库内（如发布包构建）时，vergen 会退化为幂等默认值

use vergen::EmitBuilder;

fn main() {
    let _ = EmitBuilder::builder()
        .build_timestamp()
        .git_sha(false)
        .emit();
}
