use indexmap::IndexMap;

use crate::source::{SourceId, Span};

/// Diagnostic kinds, grouped by the pass that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Parser
    UnexpectedToken,
    InvalidCharacter,
    UnterminatedString,
    UnclosedDelimiter,
    ExpectedDefinition,
    ExpectedName,
    ExpectedSelectionSet,
    ExpectedType,
    ExpectedValue,
    NonExecutableDefinition,

    // Structural rules: decidable from one document
    LoneAnonymousOperation,
    UnknownType,
    FragmentOnNonCompositeType,
    VariableNotInputType,
    SelectionOnLeafField,
    MissingSelectionSet,
    ImpossibleFragmentSpread,
    InvalidValue,
    VariableInWrongPosition,

    // Global rules: need every operation and fragment of the batch
    DuplicateOperationName,
    SubscriptionMultipleRootFields,
    UnknownField,
    DuplicateFragmentName,
    FragmentCycle,
    DuplicateVariable,
    UndefinedVariable,
    UnusedVariable,
    UnknownDirective,
    MisplacedDirective,
    DuplicateDirective,
    UnknownArgument,
    DuplicateArgument,
    MissingRequiredArgument,
    FieldsConflict,
    DuplicateInputField,
    InvalidFragmentDependency,

    // Compilation
    UndefinedFragment,
    MultipleRootQueries,
}

/// Which pass produced a diagnostic; decides its public id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticPhase {
    Syntax,
    Structural,
    Global,
    Resolution,
    Compilation,
}

impl DiagnosticKind {
    pub fn phase(&self) -> DiagnosticPhase {
        use DiagnosticKind::*;
        match self {
            UnexpectedToken
            | InvalidCharacter
            | UnterminatedString
            | UnclosedDelimiter
            | ExpectedDefinition
            | ExpectedName
            | ExpectedSelectionSet
            | ExpectedType
            | ExpectedValue
            | NonExecutableDefinition => DiagnosticPhase::Syntax,

            LoneAnonymousOperation
            | UnknownType
            | FragmentOnNonCompositeType
            | VariableNotInputType
            | SelectionOnLeafField
            | MissingSelectionSet
            | ImpossibleFragmentSpread
            | InvalidValue
            | VariableInWrongPosition => DiagnosticPhase::Structural,

            UndefinedFragment => DiagnosticPhase::Resolution,
            MultipleRootQueries => DiagnosticPhase::Compilation,

            _ => DiagnosticPhase::Global,
        }
    }

    /// Stable machine-readable id, shared by every kind of the same failure class.
    pub fn code(&self) -> &'static str {
        match self.phase() {
            DiagnosticPhase::Syntax => "85911",
            DiagnosticPhase::Structural => "85907",
            DiagnosticPhase::Global => "85901",
            DiagnosticPhase::Resolution => "85908",
            DiagnosticPhase::Compilation => "85910",
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected token",
            Self::InvalidCharacter => "invalid character",
            Self::UnterminatedString => "unterminated string",
            Self::UnclosedDelimiter => "missing closing delimiter",
            Self::ExpectedDefinition => "expected an operation or fragment definition",
            Self::ExpectedName => "expected a name",
            Self::ExpectedSelectionSet => "expected a selection set",
            Self::ExpectedType => "expected a type",
            Self::ExpectedValue => "expected a value",
            Self::NonExecutableDefinition => "type system definitions are not allowed in queries",

            Self::LoneAnonymousOperation => {
                "an anonymous operation must be the only operation in its document"
            }
            Self::UnknownType => "unknown type",
            Self::FragmentOnNonCompositeType => "fragments can only condition on composite types",
            Self::VariableNotInputType => "variables must be of input type",
            Self::SelectionOnLeafField => "leaf fields cannot have a selection set",
            Self::MissingSelectionSet => "fields of composite type need a selection set",
            Self::ImpossibleFragmentSpread => "fragment can never apply here",
            Self::InvalidValue => "invalid value",
            Self::VariableInWrongPosition => "variable type does not fit its position",

            Self::DuplicateOperationName => "duplicate operation name",
            Self::SubscriptionMultipleRootFields => {
                "subscriptions must select exactly one top-level field"
            }
            Self::UnknownField => "unknown field",
            Self::DuplicateFragmentName => "duplicate fragment name",
            Self::FragmentCycle => "fragment spreads itself",
            Self::DuplicateVariable => "duplicate variable",
            Self::UndefinedVariable => "undefined variable",
            Self::UnusedVariable => "unused variable",
            Self::UnknownDirective => "unknown directive",
            Self::MisplacedDirective => "directive not allowed here",
            Self::DuplicateDirective => "directive used more than once",
            Self::UnknownArgument => "unknown argument",
            Self::DuplicateArgument => "duplicate argument",
            Self::MissingRequiredArgument => "missing required argument",
            Self::FieldsConflict => "fields conflict",
            Self::DuplicateInputField => "duplicate input field",
            Self::InvalidFragmentDependency => "operation depends on an invalid fragment",

            Self::UndefinedFragment => "undefined fragment",
            Self::MultipleRootQueries => "multiple root queries in one file",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnclosedDelimiter => "missing closing `{}`".to_string(),
            Self::UnknownType => "unknown type `{}`".to_string(),
            Self::UnknownField => "cannot query field {}".to_string(),
            Self::UnknownArgument => "unknown argument {}".to_string(),
            Self::UnknownDirective => "unknown directive `@{}`".to_string(),
            Self::DuplicateDirective => "directive `@{}` is used more than once here".to_string(),
            Self::DuplicateOperationName => {
                "there can be only one operation named `{}`".to_string()
            }
            Self::DuplicateFragmentName => "there can be only one fragment named `{}`".to_string(),
            Self::DuplicateVariable => "there can be only one variable named `${}`".to_string(),
            Self::DuplicateArgument => "there can be only one argument named `{}`".to_string(),
            Self::DuplicateInputField => {
                "there can be only one input field named `{}`".to_string()
            }
            Self::UndefinedFragment => "unknown fragment `{}`".to_string(),
            Self::InvalidFragmentDependency => {
                "operation depends on invalid fragment `{}`".to_string()
            }
            Self::FragmentCycle => "cannot spread fragment `{}` within itself".to_string(),

            // Rules that phrase the whole sentence themselves
            Self::LoneAnonymousOperation
            | Self::FragmentOnNonCompositeType
            | Self::VariableNotInputType
            | Self::SelectionOnLeafField
            | Self::MissingSelectionSet
            | Self::ImpossibleFragmentSpread
            | Self::InvalidValue
            | Self::VariableInWrongPosition
            | Self::SubscriptionMultipleRootFields
            | Self::UndefinedVariable
            | Self::UnusedVariable
            | Self::MisplacedDirective
            | Self::MissingRequiredArgument
            | Self::FieldsConflict
            | Self::MultipleRootQueries
            | Self::NonExecutableDefinition => "{}".to_string(),

            // Standard pattern: fallback + context
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

/// Replacement text for the primary span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) source: SourceId,
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(source: SourceId, span: Span, message: impl Into<String>) -> Self {
        Self {
            source,
            span,
            message: message.into(),
        }
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Which source file this diagnostic belongs to.
    pub(crate) source: SourceId,
    /// The range shown to the user (underlined in output).
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
    /// Structured details for tooling, e.g. `fragmentName`.
    pub(crate) context: IndexMap<&'static str, String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(
        source: SourceId,
        kind: DiagnosticKind,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source,
            span,
            message: message.into(),
            fix: None,
            related: Vec::new(),
            context: IndexMap::new(),
        }
    }

    pub(crate) fn with_default_message(source: SourceId, kind: DiagnosticKind, span: Span) -> Self {
        Self::new(source, kind, span, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fix(&self) -> Option<&Fix> {
        self.fix.as_ref()
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn context(&self) -> &IndexMap<&'static str, String> {
        &self.context
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error[{}] at {}..{}: {}",
            self.code(),
            self.span.start,
            self.span.end,
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message, related.span.start, related.span.end
            )?;
        }
        Ok(())
    }
}
