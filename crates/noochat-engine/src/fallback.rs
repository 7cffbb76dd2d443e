//! Deterministic local fallback replies.
//!
//! A conversational circuit breaker, not a quality fallback: when the webhook
//! is unreachable or returns an unparsable body, the user still gets a
//! topic-appropriate canned reply instead of a dead-end error. Selection is a
//! keyword-substring match over the lowercased utterance with a stage-specific
//! default, so the same `(utterance, stage)` pair always yields the same text.

/// Returns the canned reply for the given utterance and stage.
///
/// Pure and total: never panics, never returns an empty string.
pub fn respond(utterance: &str, stage: &str) -> &'static str {
    let lower = utterance.to_lowercase();

    if let Some(rest) = stage.strip_prefix("kaztrans_") {
        return kaztrans_reply(agent_number(rest), &lower);
    }
    if stage.contains("audio") {
        return VOICE_RECEIVED;
    }
    match stage {
        "briefing_chat" => briefing_reply(&lower),
        "onboarding" => ONBOARDING_DEFAULT,
        // "chat", "main_chat" and anything unrecognized get the health table.
        _ => health_reply(&lower),
    }
}

/// Trailing number of a `agent_<n>` / `audio_<n>` stage suffix.
fn agent_number(stage_rest: &str) -> Option<u32> {
    stage_rest.rsplit('_').next()?.parse().ok()
}

fn health_reply(lower: &str) -> &'static str {
    if lower.contains("усталость") || lower.contains("fatigue") {
        return HEALTH_FATIGUE;
    }
    if lower.contains("сон") || lower.contains("sleep") {
        return HEALTH_SLEEP;
    }
    if lower.contains("голов") {
        return HEALTH_HEADACHE;
    }
    if lower.contains("пищеварен") {
        return HEALTH_DIGESTION;
    }
    if lower.contains("weeks") {
        return HEALTH_WEEKS;
    }
    HEALTH_GREETING
}

fn briefing_reply(lower: &str) -> &'static str {
    if lower.contains("компани") || lower.contains("сфера") {
        return BRIEFING_COMPANY;
    }
    if lower.contains("звонк") || lower.contains("контрол") || lower.contains("качеств") {
        return BRIEFING_CALLS;
    }
    if lower.contains("автоматизир") || lower.contains("процесс") {
        return BRIEFING_AUTOMATION;
    }
    BRIEFING_DEFAULT
}

fn kaztrans_reply(agent: Option<u32>, lower: &str) -> &'static str {
    match agent {
        Some(1) => {
            if lower.contains("отпуск") {
                KAZTRANS_HR_VACATION
            } else {
                KAZTRANS_HR_DEFAULT
            }
        }
        Some(2) => {
            if lower.contains("ваканси") {
                KAZTRANS_RECRUITER_VACANCIES
            } else {
                KAZTRANS_RECRUITER_DEFAULT
            }
        }
        Some(3) => {
            if lower.contains("пульс") || lower.contains("команд") {
                KAZTRANS_DASHBOARD_PULSE
            } else {
                KAZTRANS_DASHBOARD_DEFAULT
            }
        }
        Some(4) => {
            if lower.contains("roi") || lower.contains("эффект") {
                KAZTRANS_ANALYTICS_ROI
            } else {
                KAZTRANS_ANALYTICS_DEFAULT
            }
        }
        _ => KAZTRANS_DEFAULT,
    }
}

// --- Health assistant (main chat / onboarding surfaces) ---

const HEALTH_GREETING: &str = "Привет! Я ваш персональный ассистент здоровья. Расскажите, что вас беспокоит? Может быть, есть симптомы, которые влияют на ваше самочувствие?";

const HEALTH_FATIGUE: &str = "Понимаю, усталость может сильно влиять на качество жизни. Давайте разберемся в причинах. Как давно вы чувствуете упадок сил?";

const HEALTH_SLEEP: &str =
    "Качественный сон - основа здоровья. Что именно вас беспокоит больше всего?";

const HEALTH_HEADACHE: &str = "Головные боли могут иметь разные причины - от напряжения до нарушений сна. Как часто они возникают и в какое время дня?";

const HEALTH_DIGESTION: &str = "Пищеварение тесно связано с питанием и образом жизни. Расскажите, после чего обычно возникает дискомфорт?";

const HEALTH_WEEKS: &str = "Несколько недель усталости - это повод для внимания. Связываете ли вы это с какими-то изменениями в жизни? Может быть, стресс, изменения в режиме питания или физической активности?";

const ONBOARDING_DEFAULT: &str = "Понимаю вас! 🤗 Давайте вместе разберемся, как улучшить ваше самочувствие. Что беспокоит больше всего?";

// --- Briefing surface ---

const BRIEFING_COMPANY: &str = "## Отлично! 🏢\n\n**Спасибо за информацию о компании!**\n\nТеперь давайте перейдем к следующему важному вопросу:\n\n### Расскажите о текущей системе контроля качества звонков:\n- Как сейчас проверяются звонки?\n- Какой процент звонков проходит проверку?\n- По каким критериям оцениваете качество?";

const BRIEFING_CALLS: &str = "## Понятно! 📞\n\n**Благодарю за детали о контроле качества.**\n\nТеперь важно понять потенциал автоматизации:\n\n### Какие AI-решения вас интересуют больше всего?\n\n- 🎯 **Автоматическая транскрибация** разговоров\n- 📋 **Проверка соблюдения скриптов** операторами\n- 🚫 **Выявление запрещенных слов** и ошибок\n- 📊 **Анализ эмоций** клиентов и операторов\n- 📈 **Автоматические отчеты** по KPI";

const BRIEFING_AUTOMATION: &str = "## Интересно! 🤖\n\n**AI может помочь в разных направлениях:**\n\n### Популярные решения для автоматизации:\n\n**🎯 Продажи и маркетинг:**\n- Лидогенерация и скоринг\n- Прогнозирование продаж\n\n**👥 HR и обучение:**\n- Автоматический подбор персонала\n- Анализ резюме и собеседований\n\n**📄 Документооборот:**\n- Обработка заявок и договоров\n\nКакое направление наиболее приоритетно для вас?";

const BRIEFING_DEFAULT: &str = "## Благодарю за ответ! ✨\n\n**Я анализирую предоставленную информацию** и готовлю персонализированные рекомендации по внедрению AI в ваши бизнес-процессы.\n\n### Следующие шаги:\n- Детализация технических требований\n- Оценка ROI от внедрения AI\n- План поэтапного внедрения";

// --- KazTransOil agent dashboard surfaces ---

const KAZTRANS_HR_VACATION: &str = "## Информация об отпусках 🏖️\n\n**У вас осталось 14 дней отпуска в этом году.**\n\n### Как оформить отпуск:\n1. Согласуйте даты с руководителем\n2. Подайте заявление за 2 недели\n3. Дождитесь одобрения в системе";

const KAZTRANS_HR_DEFAULT: &str = "## Добро пожаловать! 👋\n\nЯ Айсулу, ваш персональный AI-наставник.\n\n### Чем могу помочь:\n- 📅 Отпуска и больничные\n- 📄 Справки и документы\n- 📚 Обучение и развитие\n\nЗадайте ваш вопрос!";

const KAZTRANS_RECRUITER_VACANCIES: &str = "## Активные вакансии 🎯\n\n**Сейчас открыто 12 вакансий:**\n\n### Приоритетные позиции:\n- 👨‍💼 Инженер-механик НПС Атырау\n- 👩‍💻 Специалист по ТБ НПС Павлодар\n- 🏗️ Ведущий геолог НПС Шымкент";

const KAZTRANS_RECRUITER_DEFAULT: &str = "## AI-Рекрутер КазТрансОйл 🎯\n\n### Текущая статистика:\n- 12 активных вакансий\n- 87 кандидатов в воронке\n- 15% конверсия откликов\n\nЧто вас интересует?";

const KAZTRANS_DASHBOARD_PULSE: &str = "## Пульс команды 💗\n\n**Индекс вовлеченности: 7.8/10** ↗️ +0.3\n\n### Топ обсуждаемых тем:\n1. 🍽️ Питание в столовой\n2. 🆕 Новое оборудование\n3. 🎁 Премии и бонусы";

const KAZTRANS_DASHBOARD_DEFAULT: &str = "## Стратегический дашборд 📊\n\n### Ключевые метрики:\n- Пульс настроений: 7.8/10\n- Эффективность обучения: 82%\n- Безопасность: 89% соответствие\n\nВыберите раздел для детализации.";

const KAZTRANS_ANALYTICS_ROI: &str = "## ROI внедрения AI 💰\n\n### Экономический эффект:\n**520 млн ₸** годовая экономия\n\n### Окупаемость:\nПолная окупаемость через **8 месяцев**";

const KAZTRANS_ANALYTICS_DEFAULT: &str = "## Глобальная аналитика КТО AI-Core 🌐\n\n### Операционное здоровье: ✅\n- eNPS: +15 за последний месяц\n- Готовность кадрового резерва: 75%\n\nЧто детализировать?";

const KAZTRANS_DEFAULT: &str =
    "## Добро пожаловать в систему КазТрансОйл! 🛢️\n\nВыберите нужного AI-ассистента для работы.";

// --- Audio path ---

const VOICE_RECEIVED: &str =
    "## Голосовое сообщение принято! 🎤\n\nЯ анализирую ваш вопрос и подготавливаю ответ.";

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_identical_arguments() {
        let first = respond("у меня болит голова", "chat");
        let second = respond("у меня болит голова", "chat");
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn health_keywords_select_topic_replies() {
        assert_eq!(respond("Чувствую постоянную усталость", "chat"), HEALTH_FATIGUE);
        assert_eq!(respond("У меня проблемы со сном", "main_chat"), HEALTH_SLEEP);
        assert_eq!(respond("частые головные боли", "chat"), HEALTH_HEADACHE);
        assert_eq!(respond("fatigue", "chat"), HEALTH_FATIGUE);
    }

    #[test]
    fn unmatched_utterance_gets_stage_default() {
        assert_eq!(respond("просто привет", "chat"), HEALTH_GREETING);
        assert_eq!(respond("просто привет", "onboarding"), ONBOARDING_DEFAULT);
        assert_eq!(respond("просто привет", "briefing_chat"), BRIEFING_DEFAULT);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(respond("УСТАЛОСТЬ и слабость", "chat"), HEALTH_FATIGUE);
    }

    #[test]
    fn briefing_keywords() {
        assert_eq!(
            respond("Наша компания занимается логистикой", "briefing_chat"),
            BRIEFING_COMPANY
        );
        assert_eq!(
            respond("контроль качества звонков вручную", "briefing_chat"),
            BRIEFING_CALLS
        );
        assert_eq!(
            respond("хотим автоматизировать процессы", "briefing_chat"),
            BRIEFING_AUTOMATION
        );
    }

    #[test]
    fn kaztrans_agents_have_own_tables() {
        assert_eq!(
            respond("как оформить отпуск", "kaztrans_agent_1"),
            KAZTRANS_HR_VACATION
        );
        assert_eq!(
            respond("покажи вакансии", "kaztrans_agent_2"),
            KAZTRANS_RECRUITER_VACANCIES
        );
        assert_eq!(
            respond("пульс команды", "kaztrans_agent_3"),
            KAZTRANS_DASHBOARD_PULSE
        );
        assert_eq!(respond("какой roi", "kaztrans_agent_4"), KAZTRANS_ANALYTICS_ROI);
        assert_eq!(respond("привет", "kaztrans_agent_9"), KAZTRANS_DEFAULT);
    }

    #[test]
    fn kaztrans_audio_stage_keeps_agent_table() {
        assert_eq!(
            respond("голосовое сообщение", "kaztrans_audio_1"),
            KAZTRANS_HR_DEFAULT
        );
    }

    #[test]
    fn audio_stages_get_voice_acknowledgement() {
        assert_eq!(respond("🎤 Голосовое сообщение", "briefing_audio"), VOICE_RECEIVED);
    }

    #[test]
    fn unknown_stage_never_returns_empty() {
        assert!(!respond("", "totally_unknown_stage").is_empty());
    }
}
