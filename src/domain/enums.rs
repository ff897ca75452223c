use serde::{Deserialize, Serialize};

/// Which subset of tasks the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Parse an exact filter name ("all", "active" or "completed")
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Name used in the persisted snapshot
    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Label shown on the footer button
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Next filter in footer order (wraps around)
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn all() -> &'static [Filter] {
        &[Filter::All, Filter::Active, Filter::Completed]
    }
}

// Unknown names show everything rather than failing the whole snapshot
impl From<String> for Filter {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or_default()
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        filter.name().to_string()
    }
}

/// View state of a single task: `Viewing ⇄ Editing`
///
/// Persisted as the boolean `editing` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum TaskMode {
    #[default]
    Viewing,
    Editing,
}

impl TaskMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Viewing => Self::Editing,
            Self::Editing => Self::Viewing,
        }
    }
}

impl From<bool> for TaskMode {
    fn from(editing: bool) -> Self {
        if editing {
            Self::Editing
        } else {
            Self::Viewing
        }
    }
}

impl From<TaskMode> for bool {
    fn from(mode: TaskMode) -> Self {
        mode.is_editing()
    }
}

/// Boolean task fields that can be flipped by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFlag {
    Done,
    Editing,
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingLabel,
}

/// Focused field of the add-task form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputField {
    #[default]
    Label,
    Minutes,
    Seconds,
}

impl InputField {
    pub fn next(&self) -> Self {
        match self {
            Self::Label => Self::Minutes,
            Self::Minutes => Self::Seconds,
            Self::Seconds => Self::Label,
        }
    }
}
