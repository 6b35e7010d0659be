// Chat Ports Layer
// 端口定义了模块与外部世界的接口：远端症状服务和显示界面

mod render_port;
mod symptom_service_port;

pub use render_port::*;
pub use symptom_service_port::*;
