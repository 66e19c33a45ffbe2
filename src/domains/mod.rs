// 领域模块 - 用于组织应用的业务逻辑
//
// 将 AppState 按业务领域分组，包含3个领域：平台、文档、运营

pub mod documents;
pub mod operations;
pub mod platform;

pub use documents::DocumentsDomain;
pub use operations::OperationsDomain;
pub use platform::PlatformDomain;
