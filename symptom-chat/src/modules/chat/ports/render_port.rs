use super::super::domain::Message;

/// 显示端口
///
/// 渲染是纯粹的显示更新，不反馈到会话状态
pub trait RenderPort: Send + Sync {
    /// 显示一条会话消息
    fn render_message(&self, message: &Message);

    /// 显示提示信息（不属于会话记录）
    fn render_notice(&self, notice: &str);

    /// 显示错误信息
    fn render_error(&self, error: &str);
}
