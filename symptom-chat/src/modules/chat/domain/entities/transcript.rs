use super::{Message, MessageRole};

/// 会话记录
///
/// 只追加的有序消息列表，插入顺序即对话顺序
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加消息并返回其引用
    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 统计某个角色的消息数
    pub fn count_by_role(&self, role: MessageRole) -> usize {
        self.messages.iter().filter(|m| m.role() == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::new_bot("Hallo"));
        transcript.push(Message::new_user("Kopfschmerzen"));
        transcript.push(Message::new_bot("Seit wann?"));

        let contents: Vec<&str> = transcript.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["Hallo", "Kopfschmerzen", "Seit wann?"]);
        assert_eq!(transcript.count_by_role(MessageRole::Bot), 2);
    }

    #[test]
    fn test_identical_messages_are_distinct_entries() {
        let mut transcript = Transcript::new();
        transcript.push(Message::new_user("Ja"));
        transcript.push(Message::new_user("Ja"));

        assert_eq!(transcript.len(), 2);
    }
}
