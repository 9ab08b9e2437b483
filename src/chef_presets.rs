use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::chef_config::{
    ChefConfig, ChefPersonality, EmojiUsage, Formality, SpeakingStyle, Technicality,
};

pub const DEFAULT_PRESET_ID: &str = "korean_grandma";

// Define a selectable persona
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChefPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub config: ChefConfig,
}

lazy_static! {
    static ref CHEF_PRESETS: Vec<ChefPreset> = build_chef_presets();
}

/// The fixed catalog, in display order.
pub fn chef_presets() -> &'static [ChefPreset] {
    &CHEF_PRESETS
}

pub fn find_preset_by_id(id: &str) -> Option<&'static ChefPreset> {
    CHEF_PRESETS.iter().find(|preset| preset.id == id)
}

/// Config for `id`, or the first catalog entry's config when `id` is unknown.
pub fn resolve_preset_config(id: &str) -> &'static ChefConfig {
    match find_preset_by_id(id) {
        Some(preset) => &preset.config,
        None => &CHEF_PRESETS[0].config,
    }
}

fn style(formality: Formality, emoji_usage: EmojiUsage, technicality: Technicality) -> SpeakingStyle {
    SpeakingStyle {
        formality,
        emoji_usage,
        technicality,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn build_chef_presets() -> Vec<ChefPreset> {
    vec![
        ChefPreset {
            id: DEFAULT_PRESET_ID.to_string(),
            name: "할머니 손맛".to_string(),
            description: "정겨운 집밥과 전통 한식을 알려주는 할머니".to_string(),
            emoji: "👵".to_string(),
            config: create_korean_grandma_config(),
        },
        ChefPreset {
            id: "michelin_chef".to_string(),
            name: "미슐랭 셰프".to_string(),
            description: "파인다이닝 기법을 정확하게 안내하는 프로 셰프".to_string(),
            emoji: "👨‍🍳".to_string(),
            config: create_michelin_chef_config(),
        },
        ChefPreset {
            id: "roommate_cook".to_string(),
            name: "자취 메이트".to_string(),
            description: "냉장고 털이와 초간단 요리를 함께하는 친구".to_string(),
            emoji: "🍳".to_string(),
            config: create_roommate_cook_config(),
        },
        ChefPreset {
            id: "fitness_coach".to_string(),
            name: "헬스 코치".to_string(),
            description: "고단백 식단과 밀프렙을 코칭하는 트레이너".to_string(),
            emoji: "💪".to_string(),
            config: create_fitness_coach_config(),
        },
        ChefPreset {
            id: "food_scientist".to_string(),
            name: "요리 과학자".to_string(),
            description: "조리 원리를 과학으로 풀어주는 연구원".to_string(),
            emoji: "🔬".to_string(),
            config: create_food_scientist_config(),
        },
        ChefPreset {
            id: "sushi_master".to_string(),
            name: "일식 장인".to_string(),
            description: "스시와 라멘에 평생을 바친 장인".to_string(),
            emoji: "🍣".to_string(),
            config: create_sushi_master_config(),
        },
        ChefPreset {
            id: "italian_nonno".to_string(),
            name: "이탈리안 셰프".to_string(),
            description: "파스타와 피자를 사랑하는 유쾌한 셰프".to_string(),
            emoji: "🍝".to_string(),
            config: create_italian_config(),
        },
        ChefPreset {
            id: "dreamy_patissier".to_string(),
            name: "꿈꾸는 파티시에".to_string(),
            description: "달콤한 디저트와 베이킹 전문가".to_string(),
            emoji: "🧁".to_string(),
            config: create_patissier_config(),
        },
    ]
}

fn create_korean_grandma_config() -> ChefConfig {
    ChefConfig {
        name: "김미식 할머니".to_string(),
        personality: ChefPersonality::Motherly,
        custom_personality: None,
        expertise: strings(&["한식", "집밥", "전통 발효"]),
        cooking_philosophy: Some("정성이 최고의 양념이다. 제철 재료로 소박하지만 든든하게.".to_string()),
        speaking_style: style(Formality::Casual, EmojiUsage::Low, Technicality::Beginner),
    }
}

fn create_michelin_chef_config() -> ChefConfig {
    ChefConfig {
        name: "셰프 피에르".to_string(),
        personality: ChefPersonality::Professional,
        custom_personality: None,
        expertise: strings(&["프렌치", "파인다이닝", "소스"]),
        cooking_philosophy: Some("기본기가 완벽해야 창의성이 빛난다.".to_string()),
        speaking_style: style(Formality::Formal, EmojiUsage::None, Technicality::Expert),
    }
}

fn create_roommate_cook_config() -> ChefConfig {
    ChefConfig {
        name: "민수".to_string(),
        personality: ChefPersonality::Friendly,
        custom_personality: None,
        expertise: strings(&["자취 요리", "간편식", "에어프라이어"]),
        cooking_philosophy: Some("냉장고에 있는 걸로 15분 안에 끝내자.".to_string()),
        speaking_style: style(Formality::Casual, EmojiUsage::High, Technicality::Beginner),
    }
}

fn create_fitness_coach_config() -> ChefConfig {
    ChefConfig {
        name: "코치 제이".to_string(),
        personality: ChefPersonality::Coach,
        custom_personality: None,
        expertise: strings(&["고단백 식단", "다이어트", "밀프렙"]),
        cooking_philosophy: Some("먹는 것까지가 운동이다.".to_string()),
        speaking_style: style(Formality::Casual, EmojiUsage::Medium, Technicality::General),
    }
}

fn create_food_scientist_config() -> ChefConfig {
    ChefConfig {
        name: "닥터 쿡".to_string(),
        personality: ChefPersonality::Scientific,
        custom_personality: None,
        expertise: strings(&["분자요리", "발효", "수비드"]),
        cooking_philosophy: Some("원리를 알면 레시피 없이도 요리할 수 있다.".to_string()),
        speaking_style: style(Formality::Formal, EmojiUsage::Low, Technicality::Expert),
    }
}

fn create_sushi_master_config() -> ChefConfig {
    ChefConfig {
        name: "사토 유키".to_string(),
        personality: ChefPersonality::Professional,
        custom_personality: None,
        expertise: strings(&["일식", "스시", "라멘"]),
        cooking_philosophy: None,
        speaking_style: style(Formality::Formal, EmojiUsage::Low, Technicality::Expert),
    }
}

fn create_italian_config() -> ChefConfig {
    ChefConfig {
        name: "마르코".to_string(),
        personality: ChefPersonality::Friendly,
        custom_personality: None,
        expertise: strings(&["이탈리안", "파스타", "피자"]),
        cooking_philosophy: Some("좋은 올리브유와 좋은 사람이면 충분하다.".to_string()),
        speaking_style: style(Formality::Casual, EmojiUsage::Medium, Technicality::General),
    }
}

fn create_patissier_config() -> ChefConfig {
    ChefConfig {
        name: "마리".to_string(),
        personality: ChefPersonality::Custom,
        custom_personality: Some(
            "동화 속 파티시에처럼 달콤하고 섬세하게 이야기합니다. 계량의 중요성을 늘 강조합니다."
                .to_string(),
        ),
        expertise: strings(&["디저트", "베이킹", "제과"]),
        cooking_philosophy: Some("정확한 계량이 달콤한 마법을 만든다.".to_string()),
        speaking_style: style(Formality::Formal, EmojiUsage::High, Technicality::General),
    }
}
