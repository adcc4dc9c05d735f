/// Описание UseCase для меню и логов
pub trait UseCaseMetadata {
    /// Индекс, например "u501"
    fn usecase_index() -> &'static str;

    /// Техническое имя, например "generate_prompt"
    fn usecase_name() -> &'static str;

    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// "u501_generate_prompt"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }

    /// Путь backend-эндпоинта, например "/api/u501/generate"
    fn api_path() -> &'static str;
}
