/// 同意标记
///
/// 初始为 false，只能单向置为 true，之后不会重置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsentFlag(bool);

impl ConsentFlag {
    pub fn new() -> Self {
        Self(false)
    }

    pub fn is_granted(&self) -> bool {
        self.0
    }

    /// 标记为已同意，返回本次调用是否改变了状态
    pub fn grant(&mut self) -> bool {
        let changed = !self.0;
        self.0 = true;
        changed
    }
}

impl From<ConsentFlag> for bool {
    fn from(flag: ConsentFlag) -> Self {
        flag.0
    }
}
