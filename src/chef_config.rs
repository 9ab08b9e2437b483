use serde::{Deserialize, Serialize};

// Define chef personalities
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChefPersonality {
    Professional,
    Friendly,
    Motherly,
    Coach,
    Scientific,
    Custom,
}

impl ChefPersonality {
    /// Behavioural description used in the system prompt. `Custom` has no canned
    /// text of its own; see [`ChefConfig::personality_description`].
    pub fn description(&self) -> Option<&'static str> {
        match self {
            ChefPersonality::Professional => Some(
                "정확하고 전문적인 설명을 제공합니다. 요리 용어를 정확히 사용하고, 체계적으로 안내합니다.",
            ),
            ChefPersonality::Friendly => Some(
                "친근하고 편안한 친구처럼 대화합니다. 격의 없이 말하며, 재미있는 요리 경험을 제공합니다.",
            ),
            ChefPersonality::Motherly => Some(
                "따뜻하고 다정한 엄마처럼 케어합니다. 꼼꼼하게 챙기고, 격려와 칭찬을 아끼지 않습니다.",
            ),
            ChefPersonality::Coach => Some(
                "열정적인 코치처럼 동기부여합니다. 할 수 있다는 자신감을 주고, 도전을 격려합니다.",
            ),
            ChefPersonality::Scientific => Some(
                "요리 과학을 설명합니다. 왜 이렇게 해야 하는지, 화학적/물리적 원리를 쉽게 풀어줍니다.",
            ),
            ChefPersonality::Custom => None,
        }
    }

    pub fn all_personalities() -> Vec<ChefPersonality> {
        vec![
            ChefPersonality::Professional,
            ChefPersonality::Friendly,
            ChefPersonality::Motherly,
            ChefPersonality::Coach,
            ChefPersonality::Scientific,
            ChefPersonality::Custom,
        ]
    }
}

pub const DEFAULT_CUSTOM_PERSONALITY: &str = "사용자 맞춤 성격입니다.";
pub const DEFAULT_COOKING_PHILOSOPHY: &str = "맛있고 건강한 요리를 쉽게 만들 수 있도록 돕습니다.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    Formal,
    Casual,
}

impl Formality {
    pub fn description(&self) -> &'static str {
        match self {
            Formality::Formal => "존댓말을 사용합니다.",
            Formality::Casual => "반말을 사용합니다.",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmojiUsage {
    High,
    Medium,
    Low,
    None,
}

impl EmojiUsage {
    pub fn description(&self) -> &'static str {
        match self {
            EmojiUsage::High => "이모지를 적극적으로 사용합니다 (문장마다 1-2개).",
            EmojiUsage::Medium => "이모지를 적절히 사용합니다 (중요한 포인트에만).",
            EmojiUsage::Low => "이모지를 최소한으로 사용합니다.",
            EmojiUsage::None => "이모지를 사용하지 않습니다.",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Technicality {
    Expert,
    General,
    Beginner,
}

impl Technicality {
    pub fn description(&self) -> &'static str {
        match self {
            Technicality::Expert => "전문 요리 용어를 자유롭게 사용합니다.",
            Technicality::General => "일반인이 이해하기 쉬운 용어를 사용합니다.",
            Technicality::Beginner => "완전 초보자도 이해할 수 있도록 쉽게 설명합니다.",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingStyle {
    pub formality: Formality,
    pub emoji_usage: EmojiUsage,
    pub technicality: Technicality,
}

impl SpeakingStyle {
    /// Formality, emoji and technicality sentences, in that order.
    pub fn description(&self) -> String {
        format!(
            "{} {} {}",
            self.formality.description(),
            self.emoji_usage.description(),
            self.technicality.description()
        )
    }
}

/// A complete persona. The whole value travels with every request; the server
/// keeps no persona state of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChefConfig {
    pub name: String,
    pub personality: ChefPersonality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_personality: Option<String>,
    pub expertise: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_philosophy: Option<String>,
    pub speaking_style: SpeakingStyle,
}

impl ChefConfig {
    pub fn personality_description(&self) -> &str {
        match self.personality.description() {
            Some(text) => text,
            None => self
                .custom_personality
                .as_deref()
                .filter(|text| !text.is_empty())
                .unwrap_or(DEFAULT_CUSTOM_PERSONALITY),
        }
    }

    pub fn cooking_philosophy_or_default(&self) -> &str {
        self.cooking_philosophy
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_COOKING_PHILOSOPHY)
    }
}
