use std::time::Duration;

use rand::Rng;

/// Default bounds for the simulated "thinking" pause, in milliseconds.
/// The delay is drawn uniformly from [min, max).
pub const DEFAULT_THINKING_MIN_MS: u64 = 1000;
pub const DEFAULT_THINKING_MAX_MS: u64 = 2000;

/// The coaching directions the agent can answer in.
///
/// Every user message maps to exactly one category; `Fallback` catches
/// everything the keyword stems don't cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCategory {
    Interview,
    Text,
    Plan,
    Idea,
    Fallback,
}

const INTERVIEW_RESPONSE: &str = r#"Понял, готовимся к собеседованию.

**Начнём с базы:**

1. **Расскажи о себе** — это всегда первый вопрос. Нужна версия на 60-90 секунд
2. **Почему эта компания/позиция** — покажи, что ты понимаешь, куда идёшь
3. **Сложная ситуация и как её решил** — конкретный кейс с результатом

**Следующий шаг:**
Напиши, на какую позицию готовишься — подберу релевантные вопросы и разберём структуру ответов."#;

const TEXT_RESPONSE: &str = r#"Давай улучшим текст.

**Чтобы дать точную обратную связь, мне нужно:**
- Сам текст (можешь вставить прямо сюда)
- Контекст: для кого он и какая цель

**Пока жду, общие принципы сильного текста:**
1. Первое предложение — самое важное
2. Конкретика вместо абстракций
3. Активный залог, короткие предложения

Вставляй текст — разберём."#;

const PLAN_RESPONSE: &str = r#"Хорошо, превращаем цель в план.

**Для начала:**
Опиши цель одним предложением — что именно хочешь получить в результате?

Пример: "Хочу найти работу product-менеджером в IT за 2 месяца" или "Хочу запустить свой подкаст".

**Дальше разложим на:**
- Ключевые этапы
- Конкретные действия на неделю
- Метрики прогресса

Что за цель?"#;

const IDEA_RESPONSE: &str = r#"Давай разберём идею.

**Опиши её в свободной форме** — даже если пока сырая, это нормально.

Я помогу:
- Структурировать мысль
- Найти сильные стороны
- Увидеть слабые места
- Понять, какие шаги сделают её реализуемой

Что за идея?"#;

const FALLBACK_RESPONSE: &str = r#"Понял. Давай разберёмся.

Расскажи подробнее:
- Какой результат хочешь получить?
- Что уже пробовал?

Так смогу дать конкретные рекомендации."#;

impl ResponseCategory {
    /// The canned response body for this category.
    pub fn body(self) -> &'static str {
        match self {
            ResponseCategory::Interview => INTERVIEW_RESPONSE,
            ResponseCategory::Text => TEXT_RESPONSE,
            ResponseCategory::Plan => PLAN_RESPONSE,
            ResponseCategory::Idea => IDEA_RESPONSE,
            ResponseCategory::Fallback => FALLBACK_RESPONSE,
        }
    }

    /// Short name for log lines.
    pub fn name(self) -> &'static str {
        match self {
            ResponseCategory::Interview => "interview",
            ResponseCategory::Text => "text",
            ResponseCategory::Plan => "plan",
            ResponseCategory::Idea => "idea",
            ResponseCategory::Fallback => "fallback",
        }
    }
}

/// Pick a response category for a user message.
///
/// Matching is case-insensitive substring search over keyword stems,
/// checked in fixed priority order; the first category that matches wins
/// even if later ones would match too. The original message is never
/// modified — lowercasing happens on a copy, for matching only.
pub fn classify(input: &str) -> ResponseCategory {
    let lower = input.to_lowercase();

    if lower.contains("интервью") || lower.contains("собеседован") {
        ResponseCategory::Interview
    } else if lower.contains("текст") || lower.contains("письм") || lower.contains("резюме") {
        ResponseCategory::Text
    } else if lower.contains("план") || lower.contains("цел") {
        ResponseCategory::Plan
    } else if lower.contains("идея") || lower.contains("идею") {
        ResponseCategory::Idea
    } else {
        ResponseCategory::Fallback
    }
}

/// Full dispatch: classify the message and return the canned body.
pub fn respond(input: &str) -> &'static str {
    let category = classify(input);
    tracing::debug!(category = category.name(), "dispatched response");
    category.body()
}

/// Draw a random "thinking" pause from [min_ms, max_ms).
///
/// Falls back to the default bounds when the configured range is empty.
pub fn thinking_delay(min_ms: u64, max_ms: u64) -> Duration {
    let (min_ms, max_ms) = if min_ms < max_ms {
        (min_ms, max_ms)
    } else {
        (DEFAULT_THINKING_MIN_MS, DEFAULT_THINKING_MAX_MS)
    };
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..max_ms))
}

/// A pre-written prompt the welcome screen offers as a shortcut.
///
/// Selecting one submits its prompt through the same pipeline as typed
/// text — there is no special handling downstream.
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        title: "Подготовка к интервью",
        description: "Отработать ответы и подачу",
        prompt: "Помоги подготовиться к собеседованию. Какие вопросы мне стоит отработать?",
    },
    QuickAction {
        title: "Улучшить текст",
        description: "Резюме, письмо или пост",
        prompt: "Хочу улучшить текст для профессиональной презентации. Помоги сделать его сильнее.",
    },
    QuickAction {
        title: "Создать план действий",
        description: "Из идеи в конкретные шаги",
        prompt: "У меня есть цель, но не знаю с чего начать. Помоги превратить её в план действий.",
    },
    QuickAction {
        title: "Развить идею",
        description: "Доработать и структурировать",
        prompt: "У меня есть сырая идея, хочу её развить и понять, стоит ли она внимания.",
    },
];
