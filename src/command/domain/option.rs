//! Option-parsing capability attached to commands.
//!
//! An [`OptionSpec`] declares the flags a command recognizes and how their
//! arguments are validated. Parsing never panics: malformed input yields a
//! [`UsageError`] that the dispatcher turns into a help reply.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::UsageError;

/// Names registered for the built-in help flag.
pub const HELP_OPTION_NAMES: [&str; 3] = ["?", "h", "help"];

/// Canonical long name of the help flag.
pub const HELP_OPTION: &str = "help";

/// Type of value an option argument accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free-form string value.
    String,
    /// Signed 64-bit integer value.
    Integer,
    /// Boolean value (`true` or `false`, case-insensitive).
    Boolean,
    /// One of a fixed set of values, matched case-insensitively.
    Choice(Vec<String>),
}

impl ValueType {
    /// Returns the indicator shown in help output.
    #[must_use]
    pub fn indicator(&self) -> String {
        match self {
            Self::String => "String".to_owned(),
            Self::Integer => "Integer".to_owned(),
            Self::Boolean => "Boolean".to_owned(),
            Self::Choice(options) => options.join("|"),
        }
    }

    fn validate(&self, option: &str, raw: &str) -> Result<String, UsageError> {
        let invalid = |reason: String| UsageError::InvalidArgument {
            option: option.to_owned(),
            value: raw.to_owned(),
            reason,
        };
        match self {
            Self::String => Ok(raw.to_owned()),
            Self::Integer => raw
                .parse::<i64>()
                .map(|_| raw.to_owned())
                .map_err(|_| invalid("expected an integer number".to_owned())),
            Self::Boolean => match raw.to_ascii_lowercase().as_str() {
                value @ ("true" | "false") => Ok(value.to_owned()),
                _ => Err(invalid("expected true or false".to_owned())),
            },
            Self::Choice(options) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(raw))
                .cloned()
                .ok_or_else(|| invalid(format!("expected one of [{}]", options.join(", ")))),
        }
    }
}

/// Argument accepted by an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionArgument {
    required: bool,
    value_type: ValueType,
    description: String,
}

impl OptionArgument {
    /// Creates an argument that must be supplied whenever the option is.
    #[must_use]
    pub fn required(value_type: ValueType) -> Self {
        Self {
            required: true,
            value_type,
            description: String::new(),
        }
    }

    /// Creates an argument that may be omitted.
    #[must_use]
    pub fn optional(value_type: ValueType) -> Self {
        Self {
            required: false,
            value_type,
            description: String::new(),
        }
    }

    /// Sets the argument description shown in help output.
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns whether the argument is mandatory.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the accepted value type.
    #[must_use]
    pub const fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Returns the argument description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// One recognized option and all of its spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    names: Vec<String>,
    description: String,
    argument: Option<OptionArgument>,
    required: bool,
    for_help: bool,
}

impl OptionDescriptor {
    /// Creates an option recognized under every given name.
    ///
    /// Names are stored shortest first; blank and duplicate names are
    /// dropped.
    #[must_use]
    pub fn new(
        names: impl IntoIterator<Item = impl Into<String>>,
        description: impl Into<String>,
    ) -> Self {
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.trim().is_empty())
            .collect();
        names.sort_by(|left, right| left.len().cmp(&right.len()).then_with(|| left.cmp(right)));
        names.dedup();
        Self {
            names,
            description: description.into(),
            argument: None,
            required: false,
            for_help: false,
        }
    }

    /// Makes the option accept an argument.
    #[must_use]
    pub fn with_argument(mut self, argument: OptionArgument) -> Self {
        self.argument = Some(argument);
        self
    }

    /// Marks the option as mandatory.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the option as a help request, which suspends required-option
    /// checks.
    #[must_use]
    pub const fn for_help(mut self) -> Self {
        self.for_help = true;
        self
    }

    /// Returns every spelling of the option, shortest first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the option description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the accepted argument, if any.
    #[must_use]
    pub const fn argument(&self) -> Option<&OptionArgument> {
        self.argument.as_ref()
    }

    /// Returns whether the option must be supplied.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns whether the option requests help.
    #[must_use]
    pub const fn is_for_help(&self) -> bool {
        self.for_help
    }

    /// Returns whether `name` is one of this option's spellings.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    fn label(&self) -> String {
        self.names.join("/")
    }
}

/// Declared options and positional parameters of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    options: Vec<OptionDescriptor>,
    positional: Option<String>,
    allow_unrecognized: bool,
}

impl OptionSpec {
    /// Creates an empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recognized option.
    #[must_use]
    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    /// Describes the positional (non-option) parameters. Lines are separated
    /// by `\n`.
    #[must_use]
    pub fn with_positional(mut self, description: impl Into<String>) -> Self {
        self.positional = Some(description.into());
        self
    }

    /// Treats unrecognized options as positional arguments instead of
    /// rejecting them.
    #[must_use]
    pub const fn allowing_unrecognized(mut self) -> Self {
        self.allow_unrecognized = true;
        self
    }

    /// Registers the `-h`/`--help`/`-?` flag unless a `help` option exists.
    #[must_use]
    pub fn accepting_help(mut self) -> Self {
        if self.find(HELP_OPTION).is_none() {
            self.options
                .push(OptionDescriptor::new(HELP_OPTION_NAMES, "Display the help").for_help());
        }
        self
    }

    /// Returns the recognized options in declaration order.
    #[must_use]
    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// Returns the positional parameter description.
    #[must_use]
    pub fn positional(&self) -> Option<&str> {
        self.positional.as_deref()
    }

    /// Returns whether unrecognized options are tolerated.
    #[must_use]
    pub const fn allows_unrecognized(&self) -> bool {
        self.allow_unrecognized
    }

    /// Returns whether no option is recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over every recognized option spelling.
    pub fn recognized_names(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .flat_map(|option| option.names().iter().map(String::as_str))
    }

    /// Finds the option recognized under `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|option| option.accepts(name))
    }

    /// Parses command tokens into detected options and positional arguments.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] when an option is unknown (and unrecognized
    /// options are not tolerated), misses its argument, receives an
    /// argument it does not take or an invalid one, or when a required
    /// option is absent and no help flag was given.
    pub fn parse(&self, tokens: &[String]) -> Result<ParsedOptions, UsageError> {
        let mut parsed = ParsedOptions::default();
        let mut index = 0;
        while let Some(token) = tokens.get(index) {
            index += 1;
            if token == "--" {
                parsed
                    .positionals
                    .extend(tokens.iter().skip(index).cloned());
                break;
            }
            if let Some(body) = token.strip_prefix("--") {
                index = self.parse_long(token, body, tokens, index, &mut parsed)?;
            } else if let Some(body) = token.strip_prefix('-').filter(|body| !body.is_empty()) {
                index = self.parse_short(token, body, tokens, index, &mut parsed)?;
            } else {
                parsed.positionals.push(token.clone());
            }
        }
        self.ensure_required(&parsed)?;
        Ok(parsed)
    }

    fn parse_long(
        &self,
        token: &str,
        body: &str,
        tokens: &[String],
        index: usize,
        parsed: &mut ParsedOptions,
    ) -> Result<usize, UsageError> {
        let (name, attached) = split_attached(body);
        match self.find(name) {
            Some(option) => apply(option, attached, tokens, index, parsed),
            None => self.unrecognized(token, parsed).map(|()| index),
        }
    }

    fn parse_short(
        &self,
        token: &str,
        body: &str,
        tokens: &[String],
        index: usize,
        parsed: &mut ParsedOptions,
    ) -> Result<usize, UsageError> {
        let (name, attached) = split_attached(body);
        if let Some(option) = self.find(name) {
            return apply(option, attached, tokens, index, parsed);
        }

        let mut characters = body.chars();
        if let Some(first) = characters.next() {
            let rest = characters.as_str();
            if let Some(option) = self.find(first.encode_utf8(&mut [0; 4]))
                && option.argument().is_some()
            {
                return apply(option, Some(rest), tokens, index, parsed);
            }
        }

        let cluster: Option<Vec<&OptionDescriptor>> = body
            .chars()
            .map(|flag| {
                self.find(flag.encode_utf8(&mut [0; 4]))
                    .filter(|option| option.argument().is_none())
            })
            .collect();
        match cluster {
            Some(options) => {
                for option in options {
                    parsed.record(option, None);
                }
                Ok(index)
            }
            None => self.unrecognized(token, parsed).map(|()| index),
        }
    }

    fn unrecognized(&self, token: &str, parsed: &mut ParsedOptions) -> Result<(), UsageError> {
        if self.allow_unrecognized {
            parsed.positionals.push(token.to_owned());
            Ok(())
        } else {
            Err(UsageError::Unrecognized(token.to_owned()))
        }
    }

    fn ensure_required(&self, parsed: &ParsedOptions) -> Result<(), UsageError> {
        let help_requested = self
            .options
            .iter()
            .any(|option| option.is_for_help() && parsed.detected(option));
        if help_requested {
            return Ok(());
        }
        let missing: Vec<String> = self
            .options
            .iter()
            .filter(|option| option.is_required() && !parsed.detected(option))
            .map(OptionDescriptor::label)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(UsageError::MissingRequired(missing))
        }
    }
}

fn split_attached(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}

fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

fn apply(
    option: &OptionDescriptor,
    attached: Option<&str>,
    tokens: &[String],
    index: usize,
    parsed: &mut ParsedOptions,
) -> Result<usize, UsageError> {
    let Some(argument) = option.argument() else {
        if attached.is_some() {
            return Err(UsageError::UnexpectedArgument {
                option: option.label(),
            });
        }
        parsed.record(option, None);
        return Ok(index);
    };

    if let Some(raw) = attached {
        let value = argument.value_type().validate(&option.label(), raw)?;
        parsed.record(option, Some(value));
        return Ok(index);
    }

    let next = tokens
        .get(index)
        .filter(|next| argument.is_required() || !looks_like_option(next));
    match next {
        Some(raw) => {
            let value = argument.value_type().validate(&option.label(), raw)?;
            parsed.record(option, Some(value));
            Ok(index + 1)
        }
        None if argument.is_required() => Err(UsageError::MissingArgument {
            option: option.label(),
        }),
        None => {
            parsed.record(option, None);
            Ok(index)
        }
    }
}

/// Options and positional arguments detected in one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    detected: BTreeMap<String, Vec<String>>,
    positionals: Vec<String>,
}

impl ParsedOptions {
    fn record(&mut self, option: &OptionDescriptor, value: Option<String>) {
        for name in option.names() {
            let values = self.detected.entry(name.clone()).or_default();
            if let Some(value) = &value {
                values.push(value.clone());
            }
        }
    }

    fn detected(&self, option: &OptionDescriptor) -> bool {
        option
            .names()
            .first()
            .is_some_and(|name| self.detected.contains_key(name))
    }

    /// Returns whether the option spelled `name` was given.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.detected.contains_key(name)
    }

    /// Returns the first argument given to the option spelled `name`.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.detected
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every argument given to the option spelled `name`.
    #[must_use]
    pub fn values_of(&self, name: &str) -> &[String] {
        self.detected.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the first argument of `name` as an integer.
    #[must_use]
    pub fn integer_of(&self, name: &str) -> Option<i64> {
        self.value_of(name).and_then(|raw| raw.parse().ok())
    }

    /// Returns the first argument of `name` as a boolean.
    #[must_use]
    pub fn flag_of(&self, name: &str) -> Option<bool> {
        self.value_of(name).and_then(|raw| raw.parse().ok())
    }

    /// Returns the positional (non-option) arguments.
    #[must_use]
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }
}
