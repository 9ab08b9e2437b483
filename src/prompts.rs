//! Prompt text for the chef persona and the two completion flows.
//!
//! Prompts are assembled by plain interpolation. Every ingredient, tool and
//! preference the caller supplies appears verbatim in the output.

use crate::chef_config::ChefConfig;
use crate::models::ChatContext;
use crate::recipe::RecipeRequest;

pub const NO_PREFERENCE: &str = "상관없음";

const CHEF_RULES: &str = "## 절대 규칙
1. 다른 사용자의 정보를 절대 참조하지 마세요.
2. 이 사용자의 개인정보를 외부에 공유하지 마세요.
3. 요리와 관련된 질문에만 답변하세요.
4. 안전하지 않은 요리 방법은 경고와 함께 올바른 방법을 안내하세요.
5. 항상 사용자의 보유 재료와 도구를 고려하여 현실적인 조언을 제공하세요.";

const RECIPE_REQUEST_INSTRUCTION: &str = "## 요청
위 재료와 도구로 만들 수 있는 맞춤 레시피를 추천해주세요.";

const RECIPE_RESPONSE_FORMAT: &str = r#"## 응답 형식 (JSON)
다음 형식으로 응답해주세요:
```json
{
  "title": "요리명",
  "description": "한 줄 설명",
  "cuisine": "요리 스타일",
  "difficulty": "easy|medium|hard",
  "cookingTime": 조리시간(분),
  "servings": 인원수,
  "ingredients": [
    {
      "name": "재료명",
      "quantity": "양",
      "unit": "단위",
      "isAvailable": true/false,
      "substitute": "대체 재료 (없으면 null)"
    }
  ],
  "tools": [
    {
      "name": "도구명",
      "isAvailable": true/false,
      "alternative": "대체 방법 (없으면 null)"
    }
  ],
  "instructions": [
    {
      "step": 1,
      "title": "단계 제목",
      "description": "상세 설명",
      "time": 소요시간(분),
      "tips": "팁 (없으면 null)"
    }
  ],
  "nutrition": {
    "calories": 칼로리,
    "protein": 단백질(g),
    "carbs": 탄수화물(g),
    "fat": 지방(g)
  },
  "chefNote": "셰프의 한마디"
}
```"#;

pub fn generate_chef_system_prompt(config: &ChefConfig) -> String {
    format!(
        "당신의 이름은 \"{name}\"입니다.
당신은 {expertise} 요리를 전문으로 하는 AI 셰프입니다.

## 성격
{personality}

## 말투 스타일
{style}

## 요리 철학
{philosophy}

{rules}",
        name = config.name,
        expertise = config.expertise.join(", "),
        personality = config.personality_description(),
        style = config.speaking_style.description(),
        philosophy = config.cooking_philosophy_or_default(),
        rules = CHEF_RULES,
    )
}

/// Inventory lines appended after the system prompt. Empty lists render nothing.
pub fn render_chat_context(context: Option<&ChatContext>) -> String {
    let mut rendered = String::new();
    let Some(context) = context else {
        return rendered;
    };

    if let Some(ingredients) = context.ingredients.as_ref().filter(|items| !items.is_empty()) {
        rendered.push_str(&format!("\n\n[보유 재료]: {}", ingredients.join(", ")));
    }
    if let Some(tools) = context.tools.as_ref().filter(|items| !items.is_empty()) {
        rendered.push_str(&format!("\n[보유 도구]: {}", tools.join(", ")));
    }
    rendered
}

pub fn generate_chat_prompt(message: &str, config: &ChefConfig, context: Option<&ChatContext>) -> String {
    format!(
        "{}{}\n\n사용자: {}",
        generate_chef_system_prompt(config),
        render_chat_context(context),
        message
    )
}

pub fn generate_recipe_prompt(request: &RecipeRequest) -> String {
    let prefs = &request.preferences;

    let cuisine = prefs.cuisine.as_deref().filter(|c| !c.is_empty()).unwrap_or(NO_PREFERENCE);
    let difficulty = prefs.difficulty.map(|d| d.as_str()).unwrap_or(NO_PREFERENCE);
    let cooking_time = match prefs.cooking_time {
        Some(minutes) if minutes != 0.0 => format!("{}분 이내", minutes),
        _ => NO_PREFERENCE.to_string(),
    };
    let servings = match prefs.servings {
        Some(count) if count != 0.0 => count,
        _ => 1.0,
    };

    format!(
        "{system}

## 사용자 정보
- 보유 재료: {ingredients}
- 보유 도구: {tools}
- 선호 요리 스타일: {cuisine}
- 난이도: {difficulty}
- 조리 시간: {cooking_time}
- 인원: {servings}인분

{request_instruction}

{response_format}",
        system = generate_chef_system_prompt(&request.chef_config),
        ingredients = request.ingredients.join(", "),
        tools = request.tools.join(", "),
        request_instruction = RECIPE_REQUEST_INSTRUCTION,
        response_format = RECIPE_RESPONSE_FORMAT,
    )
}

/// Opening line a persona uses when a conversation starts.
pub fn chef_greeting(config: &ChefConfig) -> String {
    format!("안녕하세요! {}입니다. 오늘 어떤 요리를 도와드릴까요?", config.name)
}
