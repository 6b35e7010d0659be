use serde::{Deserialize, Serialize};

/// 默认的同意关键字
pub const DEFAULT_CONSENT_TOKEN: &str = "ja";

/// 同意关键字的匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentMatchMode {
    /// 小写文本中包含关键字即可（服务端约定的行为）
    #[default]
    Substring,
    /// 关键字必须作为完整单词出现
    Word,
}

/// 同意检测服务
///
/// 领域服务：判断用户消息是否表达了同意
#[derive(Debug, Clone)]
pub struct ConsentDetector {
    token: String,
    mode: ConsentMatchMode,
}

impl ConsentDetector {
    pub fn new(token: impl Into<String>, mode: ConsentMatchMode) -> Self {
        Self {
            token: token.into().to_lowercase(),
            mode,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn mode(&self) -> ConsentMatchMode {
        self.mode
    }

    /// 判断文本是否包含同意关键字
    pub fn is_affirmative(&self, text: &str) -> bool {
        // 空关键字永远不匹配
        if self.token.is_empty() {
            return false;
        }

        let normalized = text.to_lowercase();
        match self.mode {
            ConsentMatchMode::Substring => normalized.contains(&self.token),
            ConsentMatchMode::Word => normalized
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == self.token),
        }
    }
}

impl Default for ConsentDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CONSENT_TOKEN, ConsentMatchMode::Substring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        let detector = ConsentDetector::default();

        assert!(detector.is_affirmative("Ja, seit gestern"));
        assert!(detector.is_affirmative("JA"));
        assert!(!detector.is_affirmative("Nein"));
        assert!(!detector.is_affirmative(""));
    }

    #[test]
    fn test_substring_match_is_not_word_aware() {
        let detector = ConsentDetector::default();
        assert!(detector.is_affirmative("I use Java at work"));
    }

    #[test]
    fn test_word_match() {
        let detector = ConsentDetector::new("ja", ConsentMatchMode::Word);

        assert!(detector.is_affirmative("Ja, seit gestern"));
        assert!(detector.is_affirmative("ok... ja!"));
        assert!(!detector.is_affirmative("I use Java at work"));
    }

    #[test]
    fn test_token_is_normalized() {
        let detector = ConsentDetector::new("YES", ConsentMatchMode::Substring);
        assert_eq!(detector.token(), "yes");
        assert!(detector.is_affirmative("Yes please"));
    }

    #[test]
    fn test_empty_token_never_matches() {
        let detector = ConsentDetector::new("", ConsentMatchMode::Substring);
        assert!(!detector.is_affirmative("ja"));
    }
}
