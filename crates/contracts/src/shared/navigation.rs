//! Explicit navigation state for the single-page UI.
//!
//! Which screen is visible is plain data (`NavState`), and every transition
//! is a `NavAction` applied by `NavState::reduce`. The frontend keeps one
//! `NavState` in a signal and re-renders the matching view; nothing here
//! depends on the UI framework.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Home,
    FamilyPicker,
    Library,
    Editor,
    Generator,
    InjectJson,
    Assistant,
}

impl ViewMode {
    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Home => "Home",
            ViewMode::FamilyPicker => "Families",
            ViewMode::Library => "Library",
            ViewMode::Editor => "Editor",
            ViewMode::Generator => "Generate",
            ViewMode::InjectJson => "Inject JSON",
            ViewMode::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Error,
}

/// User-visible message shown above the current view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub view: ViewMode,
    /// Currently selected family, kept across views
    pub family: Option<String>,
    /// Use case opened in the editor or generator; `None` in the editor means "new"
    pub use_case: Option<String>,
    pub banner: Option<Banner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    GoHome,
    PickFamily,
    SelectFamily(String),
    OpenLibrary,
    NewUseCase,
    EditUseCase { family: String, use_case: String },
    OpenGenerator { family: String, use_case: String },
    OpenInject,
    OpenAssistant,
    ShowBanner(Banner),
    DismissBanner,
}

impl NavState {
    /// Apply one action. Transitions are not validated: any view can be
    /// reached from any other.
    pub fn reduce(mut self, action: NavAction) -> NavState {
        match action {
            NavAction::GoHome => self.switch(ViewMode::Home, None),
            NavAction::PickFamily => self.switch(ViewMode::FamilyPicker, None),
            NavAction::SelectFamily(family) => {
                self.family = Some(family);
                self.view = ViewMode::Library;
                self.use_case = None;
            }
            NavAction::OpenLibrary => self.switch(ViewMode::Library, None),
            NavAction::NewUseCase => self.switch(ViewMode::Editor, None),
            NavAction::EditUseCase { family, use_case } => {
                self.family = Some(family);
                self.switch(ViewMode::Editor, Some(use_case));
            }
            NavAction::OpenGenerator { family, use_case } => {
                self.family = Some(family);
                self.switch(ViewMode::Generator, Some(use_case));
            }
            NavAction::OpenInject => self.switch(ViewMode::InjectJson, None),
            NavAction::OpenAssistant => self.switch(ViewMode::Assistant, None),
            NavAction::ShowBanner(banner) => self.banner = Some(banner),
            NavAction::DismissBanner => self.banner = None,
        }
        self
    }

    fn switch(&mut self, view: ViewMode, use_case: Option<String>) {
        self.view = view;
        self.use_case = use_case;
        self.banner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_home() {
        assert_eq!(NavState::default().view, ViewMode::Home);
    }

    #[test]
    fn test_select_family_keeps_banner_and_opens_library() {
        let state = NavState::default()
            .reduce(NavAction::ShowBanner(Banner::info("loaded")))
            .reduce(NavAction::SelectFamily("Marketing".into()));
        assert_eq!(state.view, ViewMode::Library);
        assert_eq!(state.family.as_deref(), Some("Marketing"));
        assert_eq!(state.banner, Some(Banner::info("loaded")));
    }

    #[test]
    fn test_switching_view_clears_banner_but_keeps_family() {
        let state = NavState::default()
            .reduce(NavAction::SelectFamily("Marketing".into()))
            .reduce(NavAction::ShowBanner(Banner::error("boom")))
            .reduce(NavAction::OpenInject);
        assert_eq!(state.view, ViewMode::InjectJson);
        assert_eq!(state.banner, None);
        assert_eq!(state.family.as_deref(), Some("Marketing"));
    }

    #[test]
    fn test_generator_and_editor_carry_use_case() {
        let state = NavState::default().reduce(NavAction::OpenGenerator {
            family: "Engineering".into(),
            use_case: "Code review".into(),
        });
        assert_eq!(state.view, ViewMode::Generator);
        assert_eq!(state.use_case.as_deref(), Some("Code review"));

        let state = state.reduce(NavAction::NewUseCase);
        assert_eq!(state.view, ViewMode::Editor);
        assert_eq!(state.use_case, None);
        assert_eq!(state.family.as_deref(), Some("Engineering"));
    }
}
