// Modules Layer - 业务模块
//
// 按照六边形架构组织的业务模块：
// - chat: 聊天模块，处理会话记录、同意标记和症状服务交互
// - config: 配置模块，处理服务地址和显示设置

pub mod chat;
pub mod config;

pub use chat::ChatModule;
pub use config::ConfigModule;
